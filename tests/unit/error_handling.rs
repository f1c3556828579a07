//! Unit tests for error handling and recovery

use crate::common::mock_interface::MockInterface;
use crate::common::{create_mock_driver, test_utils};
use msa301::{Error, Msa301Driver, Range};

#[test]
fn test_read_failure_basic() {
    let (mut driver, interface) = create_mock_driver();

    // Inject a read failure
    interface.fail_next_read();

    let result = driver.read_accel();
    assert!(
        matches!(result, Err(Error::Bus(_))),
        "Read should fail when error is injected"
    );
}

#[test]
fn test_read_failure_recovery() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_next_read();

    let result = driver.read_accel();
    assert!(result.is_err(), "First read should fail");

    // Set valid data for next read
    interface.set_accel_data(100, 200, 300);

    // Subsequent read should succeed (error was only for one operation)
    let result = driver.read_accel();
    assert!(
        result.is_ok(),
        "Subsequent read should succeed after single failure"
    );
}

#[test]
fn test_write_failure_basic() {
    let (mut driver, interface) = create_mock_driver();

    // Inject a write failure
    interface.fail_next_write();

    let result = driver.set_range(Range::G8);
    assert!(
        matches!(result, Err(Error::Bus(_))),
        "Write should fail when error is injected"
    );
}

#[test]
fn test_multiple_read_failures() {
    let (mut driver, interface) = create_mock_driver();

    // Test multiple failures in sequence
    for i in 0..3 {
        interface.fail_next_read();
        let result = driver.read_accel();
        assert!(
            result.is_err(),
            "Read {} should fail when error is injected",
            i
        );
    }

    // Recovery should still work
    interface.set_accel_data(100, 200, 300);
    let result = driver.read_accel();
    assert!(result.is_ok(), "Should recover after multiple failures");
}

#[test]
fn test_consecutive_write_failures() {
    let (mut driver, interface) = create_mock_driver();

    for _ in 0..3 {
        interface.fail_next_write();
        let result = driver.set_range(Range::G4);
        assert!(result.is_err(), "Each write should fail");
    }

    // Should eventually succeed
    let result = driver.set_range(Range::G4);
    assert!(result.is_ok(), "Should succeed after failures are cleared");
}

#[test]
fn test_alternating_failures() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_next_read();
    let result = driver.read_accel();
    assert!(result.is_err(), "Read should fail");

    interface.fail_next_write();
    let result = driver.set_range(Range::G8);
    assert!(result.is_err(), "Write should fail");

    // Both should work now
    interface.set_accel_data(100, 200, 300);
    let result = driver.read_accel();
    assert!(result.is_ok(), "Read should succeed");

    let result = driver.set_range(Range::G8);
    assert!(result.is_ok(), "Write should succeed");
}

#[test]
fn test_invalid_device_id() {
    let interface = MockInterface::new();
    interface.set_part_id(0x42);

    // The read part ID is reported back for diagnostics
    let result = Msa301Driver::new(interface);
    assert!(matches!(result, Err(Error::InvalidDevice(0x42))));
}

#[test]
fn test_part_id_read_failure() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_next_read();

    let result = driver.part_id();
    assert!(matches!(result, Err(Error::Bus(_))));
}

#[test]
fn test_error_during_quick_calibration() {
    let (mut driver, interface) = create_mock_driver();

    interface.set_accel_sequence(vec![[100, 200, 16584]; 100]);

    // One of the sampling reads fails; the error must propagate
    interface.fail_next_read();

    let result = driver.calibrate_offsets(50);
    assert!(
        matches!(result, Err(Error::Bus(_))),
        "Calibration should fail if read fails during sampling"
    );
}

#[test]
fn test_error_during_session_begin() {
    let (mut driver, interface) = create_mock_driver();

    // The configuration snapshot read fails
    interface.fail_next_read();

    let result = driver.calibration_begin();
    assert!(matches!(result, Err(Error::Bus(_))));
}

#[test]
fn test_error_during_capture_then_retry() {
    let (mut driver, interface) = create_mock_driver();

    interface.set_accel_sequence(vec![[0, 0, 16384]; 1]);
    let mut session = driver.calibration_begin().unwrap();

    interface.fail_next_read();

    let result = driver.calibration_capture(&mut session, &mut test_utils::MockDelay);
    assert!(result.is_err(), "Capture should fail on a bus error");
    assert_eq!(session.captured(), 0, "Failed capture must not be recorded");

    // The same orientation can be captured again once the bus recovers
    driver
        .calibration_capture(&mut session, &mut test_utils::MockDelay)
        .unwrap();
    assert_eq!(session.captured(), 1);
}

#[test]
fn test_error_state_isolation() {
    let (mut driver, interface) = create_mock_driver();

    // Create error condition
    interface.fail_next_read();
    let result = driver.read_accel();
    assert!(result.is_err());

    // Error should not affect unrelated operations
    let ready = driver.new_data_ready();
    assert!(
        ready.is_ok(),
        "Error in accel read should not affect status read"
    );

    // And subsequent accel reads should work
    interface.set_accel_data(100, 200, 300);
    let result = driver.read_accel();
    assert!(result.is_ok(), "Accel read should recover");
}
