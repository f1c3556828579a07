//! Unit tests for the hardware offset registers and calibration storage

use crate::common::{assert_float_eq, create_mock_driver};
use msa301::{AccelDataG, BiasCalibration, BiasStore, Error, MemoryBiasStore};

#[test]
fn test_write_and_read_offsets() {
    let (mut driver, interface) = create_mock_driver();

    driver.write_offsets([10, -20, 30]).unwrap();

    // Negative offsets are stored as two's complement bytes
    assert_eq!(interface.get_register(0x38), 0x0A);
    assert_eq!(interface.get_register(0x39), 0xEC);
    assert_eq!(interface.get_register(0x3A), 0x1E);

    let offsets = driver.read_offsets().unwrap();
    assert_eq!(offsets, [10, -20, 30]);
}

#[test]
fn test_offsets_full_span_round_trip() {
    let (mut driver, interface) = create_mock_driver();

    driver.write_offsets([i8::MIN, i8::MAX, -1]).unwrap();

    assert_eq!(interface.get_register(0x38), 0x80);
    assert_eq!(interface.get_register(0x39), 0x7F);
    assert_eq!(interface.get_register(0x3A), 0xFF);

    let offsets = driver.read_offsets().unwrap();
    assert_eq!(offsets, [i8::MIN, i8::MAX, -1]);
}

#[test]
fn test_apply_offsets() {
    let (mut driver, interface) = create_mock_driver();

    // 100 mg bias on X quantizes to -26 LSB of compensation at
    // 3.90625 mg per step
    let calibration = BiasCalibration {
        bias: AccelDataG {
            x: 0.1,
            y: -0.050_781_25,
            z: 0.0,
        },
        scale: 1.0,
    };
    driver.apply_offsets(&calibration).unwrap();

    assert_eq!(interface.get_register(0x38), 0xE6);
    assert_eq!(interface.get_register(0x39), 0x0D);
    assert_eq!(interface.get_register(0x3A), 0x00);

    let offsets = driver.read_offsets().unwrap();
    assert_eq!(offsets, [-26, 13, 0]);
}

#[test]
fn test_apply_offsets_overflow() {
    let (mut driver, interface) = create_mock_driver();

    // 600 mg is outside the ±500 mg offset register span
    let calibration = BiasCalibration {
        bias: AccelDataG {
            x: 0.6,
            y: 0.0,
            z: 0.0,
        },
        scale: 1.0,
    };

    let result = driver.apply_offsets(&calibration);
    assert!(matches!(result, Err(Error::CalibrationOverflow)));

    // Nothing may be written when the bias does not fit
    assert_eq!(interface.get_register(0x38), 0x00);
    assert_eq!(interface.get_register(0x39), 0x00);
    assert_eq!(interface.get_register(0x3A), 0x00);
}

#[test]
fn test_software_correction_matches_hardware_sign() {
    // A positive bias is cancelled by a negative register value, and
    // apply() subtracts the same bias in software
    let calibration = BiasCalibration {
        bias: AccelDataG {
            x: 0.1,
            y: 0.0,
            z: 0.0,
        },
        scale: 1.0,
    };

    let corrected = calibration.apply(AccelDataG {
        x: 0.1,
        y: 0.0,
        z: 1.0,
    });
    assert_float_eq(corrected.x, 0.0, 1e-6);
    assert_float_eq(corrected.z, 1.0, 1e-6);

    let registers = calibration.offset_registers().unwrap();
    assert!(registers[0] < 0, "Positive bias needs negative compensation");
}

#[test]
fn test_memory_bias_store_round_trip() {
    let mut store = MemoryBiasStore::new();
    assert_eq!(store.load().unwrap(), None);

    let calibration = BiasCalibration {
        bias: AccelDataG {
            x: 0.015,
            y: -0.007,
            z: 0.031,
        },
        scale: 0.998,
    };
    store.save(&calibration).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, calibration, "Stored values must round-trip exactly");
}

#[test]
fn test_store_replaces_previous_calibration() {
    let mut store = MemoryBiasStore::new();

    let first = BiasCalibration::default();
    let second = BiasCalibration {
        bias: AccelDataG {
            x: 0.02,
            y: 0.0,
            z: 0.0,
        },
        scale: 1.0,
    };

    store.save(&first).unwrap();
    store.save(&second).unwrap();

    assert_eq!(store.load().unwrap(), Some(second));
}
