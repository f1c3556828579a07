//! Unit tests for interrupt configuration and status decoding

use crate::common::create_mock_driver;
use msa301::{
    InterruptLatch, InterruptMap, InterruptPinConfig, MotionInterruptConfig, OrientationXY,
};

#[test]
fn test_configure_interrupts_all_sources() {
    let (mut driver, interface) = create_mock_driver();

    let config = MotionInterruptConfig {
        orientation: true,
        single_tap: true,
        double_tap: true,
        activity_x: true,
        activity_y: true,
        activity_z: true,
        freefall: true,
        new_data: true,
    };
    driver.configure_interrupts(&config).unwrap();

    // INT_SET_0: orientation bit 6, taps bits 5/4, activity bits 2/1/0
    assert_eq!(interface.get_register(0x16), 0x77);
    // INT_SET_1: new-data bit 4, freefall bit 3
    assert_eq!(interface.get_register(0x17), 0x18);
}

#[test]
fn test_configure_interrupts_presets() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .configure_interrupts(&MotionInterruptConfig::new_data_only())
        .unwrap();
    assert_eq!(interface.get_register(0x16), 0x00);
    assert_eq!(interface.get_register(0x17), 0x10);

    driver
        .configure_interrupts(&MotionInterruptConfig::tap_detection())
        .unwrap();
    assert_eq!(interface.get_register(0x16), 0x30);
    assert_eq!(interface.get_register(0x17), 0x00);

    driver
        .configure_interrupts(&MotionInterruptConfig::activity_all_axes())
        .unwrap();
    assert_eq!(interface.get_register(0x16), 0x07);
}

#[test]
fn test_disable_all_interrupts() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .configure_interrupts(&MotionInterruptConfig::tap_detection())
        .unwrap();

    let config = MotionInterruptConfig::default();
    assert!(!config.any_enabled());
    driver.configure_interrupts(&config).unwrap();

    assert_eq!(interface.get_register(0x16), 0x00);
    assert_eq!(interface.get_register(0x17), 0x00);
}

#[test]
fn test_interrupt_map_bytes() {
    let (mut driver, interface) = create_mock_driver();

    driver.configure_interrupt_map(&InterruptMap::all()).unwrap();
    // INT_MAP_0: orientation bit 6, taps bits 5/4, activity bit 2,
    // freefall bit 0; INT_MAP_1: new-data bit 0
    assert_eq!(interface.get_register(0x19), 0x75);
    assert_eq!(interface.get_register(0x1A), 0x01);

    driver
        .configure_interrupt_map(&InterruptMap::new_data_only())
        .unwrap();
    assert_eq!(interface.get_register(0x19), 0x00);
    assert_eq!(interface.get_register(0x1A), 0x01);
}

#[test]
fn test_interrupt_pin_config() {
    let (mut driver, interface) = create_mock_driver();

    let config = InterruptPinConfig {
        active_high: true,
        open_drain: true,
    };
    driver.configure_interrupt_pin(config).unwrap();
    assert_eq!(interface.get_register(0x20), 0x03);

    driver
        .configure_interrupt_pin(InterruptPinConfig::shared_line())
        .unwrap();
    assert_eq!(interface.get_register(0x20), 0x02);

    // Hardware reset state: active-low push-pull
    driver
        .configure_interrupt_pin(InterruptPinConfig::default())
        .unwrap();
    assert_eq!(interface.get_register(0x20), 0x00);
}

#[test]
fn test_interrupt_latch_modes() {
    let (mut driver, interface) = create_mock_driver();

    driver.set_interrupt_latch(InterruptLatch::Latched).unwrap();
    assert_eq!(interface.get_register(0x21) & 0x0F, 0x07);

    driver.set_interrupt_latch(InterruptLatch::Ms50).unwrap();
    assert_eq!(interface.get_register(0x21) & 0x0F, 0x0D);

    driver
        .set_interrupt_latch(InterruptLatch::NonLatched)
        .unwrap();
    assert_eq!(interface.get_register(0x21) & 0x0F, 0x00);
}

#[test]
fn test_reset_latched_interrupts() {
    let (mut driver, interface) = create_mock_driver();

    driver.set_interrupt_latch(InterruptLatch::Latched).unwrap();
    driver.reset_latched_interrupts().unwrap();

    // Reset bit 7 is set without disturbing the latch mode
    assert_eq!(interface.get_register(0x21), 0x87);
}

#[test]
fn test_motion_interrupt_status_decode() {
    let (mut driver, interface) = create_mock_driver();

    // MOTION_INTERRUPT: orientation bit 6, taps bits 5/4, activity
    // bit 2, freefall bit 0
    interface.set_register(0x09, 0x75);
    interface.set_register(0x0A, 0x01);

    let status = driver.motion_interrupt_status().unwrap();
    assert!(status.orientation);
    assert!(status.single_tap);
    assert!(status.double_tap);
    assert!(status.activity);
    assert!(status.freefall);
    assert!(status.new_data);
    assert!(status.any_set());

    interface.set_register(0x09, 0x00);
    interface.set_register(0x0A, 0x00);

    let status = driver.motion_interrupt_status().unwrap();
    assert!(!status.any_set());
}

#[test]
fn test_tap_activity_status_decode() {
    let (mut driver, interface) = create_mock_driver();

    // TAP_ACTIVE_STATUS: tap sign bit 7, tap first X bit 6, active
    // first X bit 2
    interface.set_register(0x0B, 0xC4);

    let status = driver.tap_activity_status().unwrap();
    assert!(status.tap_sign_negative);
    assert!(status.tap_first_x);
    assert!(!status.tap_first_y);
    assert!(!status.tap_first_z);
    assert!(!status.active_sign_negative);
    assert!(status.active_first_x);
    assert!(!status.active_first_y);
    assert!(!status.active_first_z);
}

#[test]
fn test_orientation_status_decode() {
    let (mut driver, interface) = create_mock_driver();

    let cases = [
        (0x00, OrientationXY::PortraitUpright, false),
        (0x10, OrientationXY::PortraitUpsideDown, false),
        (0x60, OrientationXY::LandscapeLeft, true),
        (0x30, OrientationXY::LandscapeRight, false),
    ];

    for (raw, expected_xy, expected_z) in cases {
        interface.set_register(0x0C, raw);
        let status = driver.orientation_status().unwrap();
        assert_eq!(status.xy, expected_xy, "raw byte {:#04x}", raw);
        assert_eq!(status.z_downward, expected_z, "raw byte {:#04x}", raw);
    }
}

#[test]
fn test_new_data_ready() {
    let (mut driver, interface) = create_mock_driver();

    interface.set_register(0x0A, 0x01);
    assert!(driver.new_data_ready().unwrap());

    interface.set_register(0x0A, 0x00);
    assert!(!driver.new_data_ready().unwrap());
}
