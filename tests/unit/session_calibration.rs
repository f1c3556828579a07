//! Unit tests for the four-orientation calibration session

use crate::common::mock_interface::MockInterface;
use crate::common::{assert_float_eq, create_mock_driver, test_utils};
use msa301::{CalibrationSession, DataRate, Error, Msa301Driver, PowerMode, Range, Resolution};

/// Feed one orientation into the mock and capture it
fn capture_orientation(
    driver: &mut Msa301Driver<MockInterface>,
    interface: &MockInterface,
    session: &mut CalibrationSession,
    reading: [i16; 3],
) {
    interface.set_accel_sequence(vec![reading]);
    driver
        .calibration_capture(session, &mut test_utils::MockDelay)
        .unwrap();
}

#[test]
fn test_begin_switches_to_acquisition_config() {
    let (mut driver, interface) = create_mock_driver();

    // Distinctive pre-session configuration
    driver.set_range(Range::G8).unwrap();
    driver.set_power_mode(PowerMode::LowPower).unwrap();
    driver.write_offsets([5, -5, 10]).unwrap();

    let session = driver.calibration_begin().unwrap();
    assert_eq!(session.captured(), 0);
    assert!(!session.is_complete());

    // ±2g, 14-bit, normal power, 1000 Hz, new-data interrupt enabled,
    // offsets cleared
    assert_eq!(interface.get_register(0x0F), 0x00);
    assert_eq!(interface.get_register(0x10) & 0x0F, 0x0A);
    assert_eq!(interface.get_register(0x11) & 0xC0, 0x00);
    assert_eq!(interface.get_register(0x17) & 0x10, 0x10);
    assert_eq!(interface.get_register(0x38), 0x00);
    assert_eq!(interface.get_register(0x39), 0x00);
    assert_eq!(interface.get_register(0x3A), 0x00);

    // The driver caches must track the acquisition settings
    assert_eq!(driver.range(), Range::G2);
    assert_eq!(driver.resolution(), Resolution::Bits14);
    assert_eq!(driver.power_mode(), PowerMode::Normal);
}

#[test]
fn test_capture_counts_toward_completion() {
    let (mut driver, interface) = create_mock_driver();

    let mut session = driver.calibration_begin().unwrap();

    let orientations = [
        [16384, 0, 0],
        [-16384, 0, 0],
        [0, 16384, 0],
        [0, 0, 16384],
    ];
    for (i, reading) in orientations.into_iter().enumerate() {
        capture_orientation(&mut driver, &interface, &mut session, reading);
        assert_eq!(session.captured(), i + 1);
    }
    assert!(session.is_complete());

    // A fifth orientation has nowhere to go
    let result = driver.calibration_capture(&mut session, &mut test_utils::MockDelay);
    assert!(matches!(result, Err(Error::InvalidConfig)));
    assert_eq!(session.captured(), 4);
}

#[test]
fn test_captured_samples_are_in_g() {
    let (mut driver, interface) = create_mock_driver();

    let mut session = driver.calibration_begin().unwrap();
    capture_orientation(&mut driver, &interface, &mut session, [16384, -8192, 0]);

    let samples = session.samples();
    assert_eq!(samples.len(), 1);
    assert_float_eq(samples[0].x, 1.0, 1e-6);
    assert_float_eq(samples[0].y, -0.5, 1e-6);
    assert_float_eq(samples[0].z, 0.0, 1e-6);
}

#[test]
fn test_full_session_ideal_orientations() {
    let (mut driver, interface) = create_mock_driver();

    let mut session = driver.calibration_begin().unwrap();
    for reading in [
        [16384, 0, 0],
        [-16384, 0, 0],
        [0, 16384, 0],
        [0, 0, 16384],
    ] {
        capture_orientation(&mut driver, &interface, &mut session, reading);
    }

    let outcome = driver.calibration_finish(session).unwrap();

    // Four unit vectors lie on the unit sphere centered at the origin
    assert!(outcome.calibration.bias.x.abs() < 1e-5);
    assert!(outcome.calibration.bias.y.abs() < 1e-5);
    assert!(outcome.calibration.bias.z.abs() < 1e-5);
    assert_float_eq(outcome.calibration.scale, 1.0, 1e-5);

    // This arrangement grades sqrt(14)/3, scoring 2/(q + 1/q)
    assert_float_eq(outcome.quality, 1.247_219_1, 1e-4);
    assert_float_eq(outcome.score, 0.976_084_5, 1e-4);
    assert_float_eq(outcome.normalized_uncertainty, outcome.quality, 1e-6);

    // Constant readings have no noise
    assert_float_eq(outcome.noise_sigma, 0.0, 1e-9);
    assert_float_eq(outcome.axis_uncertainty.x, 0.0, 1e-9);
    assert_float_eq(outcome.axis_uncertainty.y, 0.0, 1e-9);
    assert_float_eq(outcome.axis_uncertainty.z, 0.0, 1e-9);
}

#[test]
fn test_session_recovers_injected_bias() {
    let (mut driver, interface) = create_mock_driver();

    // The same four orientations with a constant bias of
    // (200, -50, 200) LSB added to every reading
    let mut session = driver.calibration_begin().unwrap();
    for reading in [
        [16584, -50, 200],
        [-16184, -50, 200],
        [200, 16334, 200],
        [200, -50, 16584],
    ] {
        capture_orientation(&mut driver, &interface, &mut session, reading);
    }

    let outcome = driver.calibration_finish(session).unwrap();

    // Shifting every sample moves the fitted center by exactly the
    // shift and leaves radius and quality untouched
    assert_float_eq(outcome.calibration.bias.x, 200.0 / 16384.0, 1e-5);
    assert_float_eq(outcome.calibration.bias.y, -50.0 / 16384.0, 1e-5);
    assert_float_eq(outcome.calibration.bias.z, 200.0 / 16384.0, 1e-5);
    assert_float_eq(outcome.calibration.scale, 1.0, 1e-5);
    assert_float_eq(outcome.quality, 1.247_219_1, 1e-3);

    // Programming the result lands the negated quantized bias in the
    // offset registers
    driver.apply_offsets(&outcome.calibration).unwrap();
    assert_eq!(interface.get_register(0x38), 0xFD);
    assert_eq!(interface.get_register(0x39), 0x01);
    assert_eq!(interface.get_register(0x3A), 0xFD);
}

#[test]
fn test_finish_restores_configuration() {
    let (mut driver, interface) = create_mock_driver();

    driver.set_range(Range::G8).unwrap();
    driver.set_power_mode(PowerMode::Normal).unwrap();
    driver.set_data_rate(DataRate::Hz250).unwrap();
    driver.write_offsets([5, -5, 10]).unwrap();

    let mut session = driver.calibration_begin().unwrap();
    for reading in [
        [16384, 0, 0],
        [-16384, 0, 0],
        [0, 16384, 0],
        [0, 0, 16384],
    ] {
        capture_orientation(&mut driver, &interface, &mut session, reading);
    }
    driver.calibration_finish(session).unwrap();

    // Registers return to their pre-session values bit for bit
    assert_eq!(interface.get_register(0x0F), 0x02);
    assert_eq!(interface.get_register(0x10), 0x08);
    assert_eq!(interface.get_register(0x11), 0x1E);
    assert_eq!(interface.get_register(0x17), 0x00);
    assert_eq!(driver.read_offsets().unwrap(), [5, -5, 10]);

    // So do the cached settings
    assert_eq!(driver.range(), Range::G8);
    assert_eq!(driver.power_mode(), PowerMode::Normal);
}

#[test]
fn test_finish_restores_even_when_degenerate() {
    let (mut driver, interface) = create_mock_driver();

    // All four orientations in the XY plane cannot pin down the sphere
    let mut session = driver.calibration_begin().unwrap();
    for reading in [
        [16384, 0, 0],
        [-16384, 0, 0],
        [0, 16384, 0],
        [0, -16384, 0],
    ] {
        capture_orientation(&mut driver, &interface, &mut session, reading);
    }

    let result = driver.calibration_finish(session);
    assert!(matches!(result, Err(Error::DegenerateGeometry)));

    // The failed fit must not leave the acquisition settings active
    assert_eq!(interface.get_register(0x10), 0x0F);
    assert_eq!(interface.get_register(0x11), 0x9E);
    assert_eq!(interface.get_register(0x17), 0x00);
    assert_eq!(driver.power_mode(), PowerMode::Suspend);
}

#[test]
fn test_capture_timeout() {
    let (mut driver, interface) = create_mock_driver();

    let mut session = driver.calibration_begin().unwrap();

    // The device never signals a fresh conversion
    interface.set_register(0x0A, 0x00);

    let result = driver.calibration_capture(&mut session, &mut test_utils::MockDelay);
    assert!(matches!(result, Err(Error::DataTimeout)));
    assert_eq!(session.captured(), 0);
}

#[test]
fn test_capture_rejects_moving_device() {
    let (mut driver, interface) = create_mock_driver();

    let mut session = driver.calibration_begin().unwrap();

    // Readings 1000 LSB apart exceed the allowed spread of
    // 16384 / 20 = 819 LSB
    interface.set_accel_sequence(vec![[0, 0, 16384], [1000, 0, 16384]]);
    let result = driver.calibration_capture(&mut session, &mut test_utils::MockDelay);
    assert!(matches!(result, Err(Error::DeviceMoving)));
    assert_eq!(session.captured(), 0, "Rejected capture must not count");

    // Once the device settles the same orientation can be retried
    capture_orientation(&mut driver, &interface, &mut session, [0, 0, 16384]);
    assert_eq!(session.captured(), 1);
}

#[test]
fn test_finish_requires_complete_session() {
    let (mut driver, interface) = create_mock_driver();

    let mut session = driver.calibration_begin().unwrap();
    capture_orientation(&mut driver, &interface, &mut session, [16384, 0, 0]);
    capture_orientation(&mut driver, &interface, &mut session, [0, 16384, 0]);

    let result = driver.calibration_finish(session);
    assert!(matches!(result, Err(Error::InvalidConfig)));
}
