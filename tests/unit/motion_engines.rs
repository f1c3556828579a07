//! Unit tests for the tap, freefall, activity and orientation engines

use crate::common::create_mock_driver;
use msa301::{
    ActiveConfig, Error, FreefallConfig, FreefallMode, OrientBlockMode, OrientConfig,
    OrientSymmetry, TapConfig, TapDuration, TapQuiet, TapShock,
};

#[test]
fn test_tap_config_default_matches_reset() {
    let (mut driver, interface) = create_mock_driver();

    driver.configure_tap(&TapConfig::default()).unwrap();

    // The defaults reproduce the power-on register values
    assert_eq!(interface.get_register(0x2A), 0x04);
    assert_eq!(interface.get_register(0x2B), 0x0A);
}

#[test]
fn test_tap_config_custom() {
    let (mut driver, interface) = create_mock_driver();

    let config = TapConfig {
        quiet: TapQuiet::Ms20,
        shock: TapShock::Ms50,
        duration: TapDuration::Ms100,
        threshold: 31,
    };
    driver.configure_tap(&config).unwrap();

    // TAP_DUR: quiet bit 7, shock bit 6, duration bits 0-2
    assert_eq!(interface.get_register(0x2A), 0xC1);
    assert_eq!(interface.get_register(0x2B), 0x1F);
}

#[test]
fn test_tap_threshold_validation() {
    let (mut driver, interface) = create_mock_driver();

    let config = TapConfig {
        threshold: 32,
        ..TapConfig::default()
    };

    let result = driver.configure_tap(&config);
    assert!(matches!(result, Err(Error::InvalidConfig)));

    // Nothing may be written when validation fails
    assert_eq!(interface.get_register(0x2A), 0x04);
    assert_eq!(interface.get_register(0x2B), 0x0A);
}

#[test]
fn test_freefall_config_default_matches_reset() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .configure_freefall(&FreefallConfig::default())
        .unwrap();

    assert_eq!(interface.get_register(0x22), 0x09);
    assert_eq!(interface.get_register(0x23), 0x30);
    assert_eq!(interface.get_register(0x24), 0x01);
}

#[test]
fn test_freefall_config_custom() {
    let (mut driver, interface) = create_mock_driver();

    let config = FreefallConfig {
        duration: 20,
        threshold: 96,
        hysteresis: 2,
        mode: FreefallMode::Sum,
    };
    driver.configure_freefall(&config).unwrap();

    assert_eq!(interface.get_register(0x22), 0x14);
    assert_eq!(interface.get_register(0x23), 0x60);
    // FREEFALL_HY: mode bit 2, hysteresis bits 0-1
    assert_eq!(interface.get_register(0x24), 0x06);
}

#[test]
fn test_freefall_hysteresis_validation() {
    let (mut driver, _interface) = create_mock_driver();

    let config = FreefallConfig {
        hysteresis: 4,
        ..FreefallConfig::default()
    };

    let result = driver.configure_freefall(&config);
    assert!(matches!(result, Err(Error::InvalidConfig)));
}

#[test]
fn test_active_config_registers() {
    let (mut driver, interface) = create_mock_driver();

    driver.configure_active(&ActiveConfig::default()).unwrap();
    assert_eq!(interface.get_register(0x27), 0x00);
    assert_eq!(interface.get_register(0x28), 0x14);

    let config = ActiveConfig {
        duration: 3,
        threshold: 50,
    };
    driver.configure_active(&config).unwrap();
    assert_eq!(interface.get_register(0x27), 0x03);
    assert_eq!(interface.get_register(0x28), 0x32);
}

#[test]
fn test_active_duration_validation() {
    let (mut driver, _interface) = create_mock_driver();

    let config = ActiveConfig {
        duration: 4,
        ..ActiveConfig::default()
    };

    let result = driver.configure_active(&config);
    assert!(matches!(result, Err(Error::InvalidConfig)));
}

#[test]
fn test_orient_config_registers() {
    let (mut driver, interface) = create_mock_driver();

    driver.configure_orient(&OrientConfig::default()).unwrap();
    assert_eq!(interface.get_register(0x2C), 0x18);
    assert_eq!(interface.get_register(0x2D), 0x08);

    let config = OrientConfig {
        symmetry: OrientSymmetry::HighAsymmetrical,
        blocking: OrientBlockMode::NoBlocking,
        hysteresis: 4,
        z_block_threshold: 12,
    };
    driver.configure_orient(&config).unwrap();

    // ORIENT_HY: hysteresis bits 4-6, blocking bits 2-3, mode bits 0-1
    assert_eq!(interface.get_register(0x2C), 0x41);
    assert_eq!(interface.get_register(0x2D), 0x0C);
}

#[test]
fn test_orient_config_validation() {
    let (mut driver, _interface) = create_mock_driver();

    let config = OrientConfig {
        hysteresis: 8,
        ..OrientConfig::default()
    };
    let result = driver.configure_orient(&config);
    assert!(matches!(result, Err(Error::InvalidConfig)));

    let config = OrientConfig {
        z_block_threshold: 16,
        ..OrientConfig::default()
    };
    let result = driver.configure_orient(&config);
    assert!(matches!(result, Err(Error::InvalidConfig)));
}
