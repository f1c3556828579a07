//! Power management
//!
//! The MSA301 has three power modes:
//! - **Normal mode**: continuous conversion at the configured output data rate
//! - **Low-power mode**: duty-cycled conversion, bandwidth set separately
//! - **Suspend mode**: no conversions, registers remain accessible
//!
//! # Power Consumption (typical)
//! - Normal mode: ~265 μA
//! - Low-power mode (1.95 Hz bandwidth): ~2 μA
//! - Suspend mode: < 2 μA
//!
//! The part powers up in suspend mode; call
//! [`crate::Msa301Driver::set_power_mode`] with [`PowerMode::Normal`] (or
//! run [`crate::Msa301Driver::init`]) before expecting data.

/// Power mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Normal operation mode - continuous conversion
    Normal = 0,
    /// Low-power mode - duty-cycled conversion
    LowPower = 1,
    /// Suspend mode - no conversions, minimum power
    Suspend = 2,
}

/// Low-power mode bandwidth
///
/// Sets the effective filter bandwidth while duty cycling. Lower bandwidths
/// consume less power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LowPowerBandwidth {
    /// 1.95 Hz bandwidth (512 ms period) - lowest power
    Hz1_95 = 2,
    /// 3.9 Hz bandwidth (256 ms period)
    Hz3_9 = 3,
    /// 7.81 Hz bandwidth (128 ms period)
    Hz7_81 = 4,
    /// 15.63 Hz bandwidth (64 ms period)
    Hz15_63 = 5,
    /// 31.25 Hz bandwidth (32 ms period)
    Hz31_25 = 6,
    /// 62.5 Hz bandwidth (16 ms period)
    Hz62_5 = 7,
    /// 125 Hz bandwidth (8 ms period)
    Hz125 = 8,
    /// 250 Hz bandwidth (4 ms period)
    Hz250 = 9,
    /// 500 Hz bandwidth (2 ms period)
    Hz500 = 10,
}

impl LowPowerBandwidth {
    /// Get the bandwidth in Hz
    #[must_use]
    pub const fn bandwidth_hz(self) -> f32 {
        match self {
            Self::Hz1_95 => 1.95,
            Self::Hz3_9 => 3.9,
            Self::Hz7_81 => 7.81,
            Self::Hz15_63 => 15.63,
            Self::Hz31_25 => 31.25,
            Self::Hz62_5 => 62.5,
            Self::Hz125 => 125.0,
            Self::Hz250 => 250.0,
            Self::Hz500 => 500.0,
        }
    }

    /// Get register value for the bandwidth field
    #[must_use]
    pub const fn bandwidth_value(self) -> u8 {
        self as u8
    }
}
