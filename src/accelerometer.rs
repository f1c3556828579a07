//! Accelerometer measurement types and configuration
//!
//! Provides types, enums, and utility functions for the MSA301's 3-axis
//! accelerometer output.

use crate::power::PowerMode;

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Range {
    /// ±2g range (most sensitive, least range)
    G2 = 0,
    /// ±4g range
    G4 = 1,
    /// ±8g range
    G8 = 2,
    /// ±16g range (least sensitive, most range)
    G16 = 3,
}

impl Range {
    /// Get the sensitivity in LSB/g (Least Significant Bit per g)
    ///
    /// The MSA301 left-justifies its output, so the sensitivity refers to
    /// the full 16-bit value regardless of the configured resolution.
    #[must_use]
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::G2 => 16384.0, // LSB/g
            Self::G4 => 8192.0,  // LSB/g
            Self::G8 => 4096.0,  // LSB/g
            Self::G16 => 2048.0, // LSB/g
        }
    }

    /// Get the maximum value in g
    #[must_use]
    pub const fn max_value(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }
}

/// Accelerometer output resolution
///
/// Lower resolutions trade noise for conversion time. Output data is always
/// left-justified 16-bit; at lower resolutions the unused low bits read zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 14-bit output
    Bits14 = 0,
    /// 12-bit output
    Bits12 = 1,
    /// 10-bit output
    Bits10 = 2,
    /// 8-bit output
    Bits8 = 3,
}

impl Resolution {
    /// Number of significant bits in the output
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits14 => 14,
            Self::Bits12 => 12,
            Self::Bits10 => 10,
            Self::Bits8 => 8,
        }
    }
}

/// Accelerometer output data rate
///
/// Not every rate is available in every power mode: the two slowest rates
/// require low-power mode and the two fastest require normal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    /// 1 Hz (low-power mode only)
    Hz1 = 0,
    /// 1.95 Hz (low-power mode only)
    Hz1_95 = 1,
    /// 3.9 Hz
    Hz3_9 = 2,
    /// 7.81 Hz
    Hz7_81 = 3,
    /// 15.63 Hz
    Hz15_63 = 4,
    /// 31.25 Hz
    Hz31_25 = 5,
    /// 62.5 Hz
    Hz62_5 = 6,
    /// 125 Hz
    Hz125 = 7,
    /// 250 Hz
    Hz250 = 8,
    /// 500 Hz (normal mode only)
    Hz500 = 9,
    /// 1000 Hz (normal mode only)
    Hz1000 = 10,
}

impl DataRate {
    /// Get the nominal output rate in Hz
    #[must_use]
    pub const fn frequency_hz(self) -> f32 {
        match self {
            Self::Hz1 => 1.0,
            Self::Hz1_95 => 1.95,
            Self::Hz3_9 => 3.9,
            Self::Hz7_81 => 7.81,
            Self::Hz15_63 => 15.63,
            Self::Hz31_25 => 31.25,
            Self::Hz62_5 => 62.5,
            Self::Hz125 => 125.0,
            Self::Hz250 => 250.0,
            Self::Hz500 => 500.0,
            Self::Hz1000 => 1000.0,
        }
    }

    /// Whether this rate can be selected in the given power mode
    #[must_use]
    pub const fn is_available(self, mode: PowerMode) -> bool {
        match mode {
            PowerMode::Normal => !matches!(self, Self::Hz1 | Self::Hz1_95),
            PowerMode::LowPower => !matches!(self, Self::Hz500 | Self::Hz1000),
            PowerMode::Suspend => true,
        }
    }
}

/// Axis enable, polarity and swap configuration
///
/// Maps the sensor's mechanical mounting onto the board's coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxesConfig {
    /// Enable X-axis measurement
    pub x_enabled: bool,
    /// Enable Y-axis measurement
    pub y_enabled: bool,
    /// Enable Z-axis measurement
    pub z_enabled: bool,
    /// Invert the X-axis sign
    pub x_inverted: bool,
    /// Invert the Y-axis sign
    pub y_inverted: bool,
    /// Invert the Z-axis sign
    pub z_inverted: bool,
    /// Exchange the X and Y axes
    pub xy_swapped: bool,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            x_enabled: true,
            y_enabled: true,
            z_enabled: true,
            x_inverted: false,
            y_inverted: false,
            z_inverted: false,
            xy_swapped: false,
        }
    }
}

/// Accelerometer data in physical units (g-force)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelDataG {
    /// X-axis acceleration in g
    pub x: f32,
    /// Y-axis acceleration in g
    pub y: f32,
    /// Z-axis acceleration in g
    pub z: f32,
}

impl AccelDataG {
    /// Create from raw sensor values
    ///
    /// # Arguments
    ///
    /// * `raw_x` - Raw X-axis value
    /// * `raw_y` - Raw Y-axis value
    /// * `raw_z` - Raw Z-axis value
    /// * `sensitivity` - Sensitivity in LSB/g (from `Range::sensitivity()`)
    #[must_use]
    pub fn from_raw(raw_x: i16, raw_y: i16, raw_z: i16, sensitivity: f32) -> Self {
        Self {
            x: f32::from(raw_x) / sensitivity,
            y: f32::from(raw_y) / sensitivity,
            z: f32::from(raw_z) / sensitivity,
        }
    }

    /// Get the magnitude of the acceleration vector
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Normalize the acceleration vector (make magnitude = 1.0)
    #[must_use]
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
                z: self.z / mag,
            }
        } else {
            *self
        }
    }
}
