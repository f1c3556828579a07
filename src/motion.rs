//! Motion engine configuration
//!
//! The MSA301 detects taps, freefall, activity and orientation changes in
//! hardware. Each engine has its own thresholds and timing windows; results
//! are signalled through the interrupt logic (see [`crate::interrupt`]).
//!
//! Threshold units depend on the engine: freefall, orientation and Z-block
//! thresholds are in fixed mg steps, while tap and activity thresholds scale
//! with the configured range.

use crate::accelerometer::Range;

/// Tap quiet window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapQuiet {
    /// 30 ms quiet window
    Ms30 = 0,
    /// 20 ms quiet window
    Ms20 = 1,
}

/// Tap shock window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapShock {
    /// 70 ms shock window
    Ms70 = 0,
    /// 50 ms shock window
    Ms50 = 1,
}

/// Double-tap time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapDuration {
    /// 50 ms window
    Ms50 = 0,
    /// 100 ms window
    Ms100 = 1,
    /// 150 ms window
    Ms150 = 2,
    /// 200 ms window
    Ms200 = 3,
    /// 250 ms window
    Ms250 = 4,
    /// 375 ms window
    Ms375 = 5,
    /// 500 ms window
    Ms500 = 6,
    /// 700 ms window
    Ms700 = 7,
}

/// Tap detection configuration
///
/// Maps onto the `TAP_DUR` (0x2A) and `TAP_TH` (0x2B) registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapConfig {
    /// Quiet window after a tap
    pub quiet: TapQuiet,
    /// Shock window around a tap
    pub shock: TapShock,
    /// Window within which a second tap counts as a double tap
    pub duration: TapDuration,
    /// Tap threshold (0-31); threshold = value * range / 32 g
    pub threshold: u8,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            quiet: TapQuiet::Ms30,
            shock: TapShock::Ms70,
            duration: TapDuration::Ms250,
            threshold: 10,
        }
    }
}

impl TapConfig {
    /// Tap threshold in g for the given range
    #[must_use]
    pub fn threshold_g(&self, range: Range) -> f32 {
        f32::from(self.threshold) * f32::from(range.max_value()) / 32.0
    }
}

/// Freefall detection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FreefallMode {
    /// Each axis is compared to the threshold on its own
    Single = 0,
    /// The summed magnitude is compared to the threshold
    Sum = 1,
}

/// Freefall detection configuration
///
/// Maps onto the `FREEFALL_DUR` (0x22), `FREEFALL_TH` (0x23) and
/// `FREEFALL_HY` (0x24) registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FreefallConfig {
    /// Freefall duration (0-255); delay = (value + 1) * 2 ms
    pub duration: u8,
    /// Freefall threshold (0-255); threshold = value * 7.8125 mg
    pub threshold: u8,
    /// Freefall hysteresis (0-3); hysteresis = value * 125 mg
    pub hysteresis: u8,
    /// Detection mode
    pub mode: FreefallMode,
}

impl Default for FreefallConfig {
    fn default() -> Self {
        Self {
            duration: 9,
            threshold: 48,
            hysteresis: 1,
            mode: FreefallMode::Single,
        }
    }
}

impl FreefallConfig {
    /// Freefall delay in ms
    #[must_use]
    pub const fn duration_ms(&self) -> u16 {
        (self.duration as u16 + 1) * 2
    }

    /// Freefall threshold in mg
    #[must_use]
    pub fn threshold_mg(&self) -> f32 {
        f32::from(self.threshold) * 7.8125
    }
}

/// Activity detection configuration
///
/// Maps onto the `ACTIVE_DUR` (0x27) and `ACTIVE_TH` (0x28) registers. Which
/// axes participate is selected through
/// [`crate::interrupt::MotionInterruptConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveConfig {
    /// Activity duration (0-3); duration = (value + 1) ms
    pub duration: u8,
    /// Activity threshold (0-255); threshold = value * range / 512 g
    pub threshold: u8,
}

impl Default for ActiveConfig {
    fn default() -> Self {
        Self {
            duration: 0,
            threshold: 20,
        }
    }
}

impl ActiveConfig {
    /// Activity threshold in g for the given range
    #[must_use]
    pub fn threshold_g(&self, range: Range) -> f32 {
        f32::from(self.threshold) * f32::from(range.max_value()) / 512.0
    }
}

/// Orientation detection symmetry mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OrientSymmetry {
    /// Symmetrical thresholds
    Symmetrical = 0,
    /// High asymmetrical thresholds
    HighAsymmetrical = 1,
    /// Low asymmetrical thresholds
    LowAsymmetrical = 2,
}

/// Orientation detection Z-axis blocking mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OrientBlockMode {
    /// No blocking
    NoBlocking = 0,
    /// Block on Z-axis acceleration
    ZAxisBlocking = 1,
    /// Block on Z-axis acceleration or slope
    ZAxisAndSlopeBlocking = 2,
}

/// Orientation detection configuration
///
/// Maps onto the `ORIENT_HY` (0x2C) and `Z_BLOCK` (0x2D) registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OrientConfig {
    /// Symmetry mode for the portrait/landscape thresholds
    pub symmetry: OrientSymmetry,
    /// Z-axis blocking mode
    pub blocking: OrientBlockMode,
    /// Orientation hysteresis (0-7); hysteresis = value * 62.5 mg
    pub hysteresis: u8,
    /// Z blocking threshold (0-15); threshold = value * 62.5 mg
    pub z_block_threshold: u8,
}

impl Default for OrientConfig {
    fn default() -> Self {
        Self {
            symmetry: OrientSymmetry::Symmetrical,
            blocking: OrientBlockMode::ZAxisAndSlopeBlocking,
            hysteresis: 1,
            z_block_threshold: 8,
        }
    }
}

/// Portrait/landscape orientation reported by the orientation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OrientationXY {
    /// Portrait upright
    PortraitUpright = 0,
    /// Portrait upside down
    PortraitUpsideDown = 1,
    /// Landscape left
    LandscapeLeft = 2,
    /// Landscape right
    LandscapeRight = 3,
}
