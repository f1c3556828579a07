#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod accelerometer;
pub mod calibration;
pub mod device;
pub mod interface;
pub mod interrupt;
pub mod motion;
pub mod power;
pub mod registers;

// Re-export main types
pub use accelerometer::{AccelDataG, AxesConfig, DataRate, Range, Resolution};
pub use calibration::geometry::{DegenerateGeometryError, SphereFit};
pub use calibration::score::{harmonic_score, InvalidQualityError, ScoreFn, UncertaintyScore};
pub use calibration::{
    BiasCalibration, BiasStore, CalibrationOutcome, CalibrationSession, MemoryBiasStore,
    RunningStats,
};
pub use device::{AccelData, Msa301Driver};
pub use interface::I2cInterface;
pub use interrupt::{
    InterruptLatch, InterruptMap, InterruptPinConfig, MotionInterruptConfig, MotionInterruptStatus,
    OrientationStatus, TapActivityStatus,
};
pub use motion::{
    ActiveConfig, FreefallConfig, FreefallMode, OrientBlockMode, OrientConfig, OrientSymmetry,
    OrientationXY, TapConfig, TapDuration, TapQuiet, TapShock,
};
pub use power::{LowPowerBandwidth, PowerMode};

/// MSA301 I2C address (fixed: 0x26)
///
/// The MSA301 has no address select pin; all parts respond at this
/// address. Use [`I2cInterface::new()`] to wrap a bus with it.
pub const I2C_ADDRESS: u8 = 0x26;

/// Expected value of the `PART_ID` register
pub const PART_ID_VALUE: u8 = 0x13;

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Invalid `PART_ID` register value (contains the actual value read)
    InvalidDevice(u8),
    /// Invalid configuration parameter
    InvalidConfig,
    /// Device is moving during calibration (spread exceeds threshold)
    DeviceMoving,
    /// Calibration offset does not fit the hardware offset registers (±500 mg span)
    CalibrationOverflow,
    /// New-data flag did not assert within the polling budget
    DataTimeout,
    /// Calibration orientations are too close to a common plane to fit a sphere
    DegenerateGeometry,
    /// Calibration produced a quality figure outside its contract
    InvalidQuality,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
