//! Interrupt configuration and management
//!
//! The MSA301 has a single interrupt pin (INT) that can be triggered by the
//! motion engines and by new-data events:
//! - New data ready
//! - Freefall
//! - Activity (per axis)
//! - Single tap / double tap
//! - Orientation change
//!
//! Each source is enabled separately and then routed to the pin through the
//! interrupt map. Latching behavior and the pin's electrical characteristics
//! are configured independently.
//!
//! # Example
//!
//! ```ignore
//! # use msa301::{Msa301Driver, interrupt::{MotionInterruptConfig, InterruptMap}};
//! # let mut accel: Msa301Driver<_> = todo!();
//! // Enable the new-data interrupt and route it to the INT pin
//! accel.configure_interrupts(&MotionInterruptConfig::new_data_only())?;
//! accel.configure_interrupt_map(&InterruptMap::new_data_only())?;
//! # Ok::<(), msa301::Error<()>>(())
//! ```

use crate::motion::OrientationXY;

/// Interrupt source enable configuration
///
/// Maps onto the `INT_SET_0` (0x16) and `INT_SET_1` (0x17) registers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct MotionInterruptConfig {
    /// Enable the orientation interrupt
    pub orientation: bool,
    /// Enable the single-tap interrupt
    pub single_tap: bool,
    /// Enable the double-tap interrupt
    pub double_tap: bool,
    /// Enable activity detection on the X-axis
    pub activity_x: bool,
    /// Enable activity detection on the Y-axis
    pub activity_y: bool,
    /// Enable activity detection on the Z-axis
    pub activity_z: bool,
    /// Enable the freefall interrupt
    pub freefall: bool,
    /// Enable the new-data interrupt
    pub new_data: bool,
}

impl MotionInterruptConfig {
    /// Create configuration with only the new-data interrupt enabled
    pub const fn new_data_only() -> Self {
        Self {
            orientation: false,
            single_tap: false,
            double_tap: false,
            activity_x: false,
            activity_y: false,
            activity_z: false,
            freefall: false,
            new_data: true,
        }
    }

    /// Create configuration for tap detection (single and double tap)
    pub const fn tap_detection() -> Self {
        Self {
            orientation: false,
            single_tap: true,
            double_tap: true,
            activity_x: false,
            activity_y: false,
            activity_z: false,
            freefall: false,
            new_data: false,
        }
    }

    /// Create configuration for activity detection on all axes
    pub const fn activity_all_axes() -> Self {
        Self {
            orientation: false,
            single_tap: false,
            double_tap: false,
            activity_x: true,
            activity_y: true,
            activity_z: true,
            freefall: false,
            new_data: false,
        }
    }

    /// Check if any interrupt source is enabled
    pub const fn any_enabled(&self) -> bool {
        self.orientation
            || self.single_tap
            || self.double_tap
            || self.activity_x
            || self.activity_y
            || self.activity_z
            || self.freefall
            || self.new_data
    }
}

/// Interrupt pin routing configuration
///
/// Maps onto the `INT_MAP_0` (0x19) and `INT_MAP_1` (0x1A) registers. An
/// enabled source only drives the INT pin when it is also routed here.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct InterruptMap {
    /// Route the orientation interrupt to the INT pin
    pub orientation: bool,
    /// Route the single-tap interrupt to the INT pin
    pub single_tap: bool,
    /// Route the double-tap interrupt to the INT pin
    pub double_tap: bool,
    /// Route the activity interrupt to the INT pin
    pub activity: bool,
    /// Route the freefall interrupt to the INT pin
    pub freefall: bool,
    /// Route the new-data interrupt to the INT pin
    pub new_data: bool,
}

impl InterruptMap {
    /// Route only the new-data interrupt
    pub const fn new_data_only() -> Self {
        Self {
            orientation: false,
            single_tap: false,
            double_tap: false,
            activity: false,
            freefall: false,
            new_data: true,
        }
    }

    /// Route every interrupt source
    pub const fn all() -> Self {
        Self {
            orientation: true,
            single_tap: true,
            double_tap: true,
            activity: true,
            freefall: true,
            new_data: true,
        }
    }

    /// Check if any source is routed
    pub const fn any_routed(&self) -> bool {
        self.orientation
            || self.single_tap
            || self.double_tap
            || self.activity
            || self.freefall
            || self.new_data
    }
}

/// Interrupt pin electrical configuration
///
/// Maps onto the `INT_CONFIG` (0x20) register. The hardware reset state is
/// active-low push-pull, which is what `Default` produces.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptPinConfig {
    /// Active high (true) or active low (false)
    pub active_high: bool,
    /// Open-drain (true) or push-pull (false)
    pub open_drain: bool,
}

impl InterruptPinConfig {
    /// Create configuration for an active-low, open-drain interrupt line
    /// shared with other devices
    pub const fn shared_line() -> Self {
        Self {
            active_high: false,
            open_drain: true,
        }
    }
}

/// Interrupt latch mode
///
/// Maps onto the `latch_int` field of `INT_LATCH` (0x21). Temporary modes
/// keep the interrupt asserted for a fixed time; `Latched` keeps it asserted
/// until cleared via [`crate::Msa301Driver::reset_latched_interrupts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptLatch {
    /// Non-latched, the interrupt tracks its source
    NonLatched = 0b0000,
    /// Latched for 250 ms
    Ms250 = 0b0001,
    /// Latched for 500 ms
    Ms500 = 0b0010,
    /// Latched for 1 s
    S1 = 0b0011,
    /// Latched for 2 s
    S2 = 0b0100,
    /// Latched for 4 s
    S4 = 0b0101,
    /// Latched for 8 s
    S8 = 0b0110,
    /// Latched until cleared
    Latched = 0b0111,
    /// Latched for 1 ms
    Ms1 = 0b1010,
    /// Latched for 2 ms
    Ms2 = 0b1011,
    /// Latched for 25 ms
    Ms25 = 0b1100,
    /// Latched for 50 ms
    Ms50 = 0b1101,
    /// Latched for 100 ms
    Ms100 = 0b1110,
}

impl InterruptLatch {
    /// Get register value for the latch field
    #[must_use]
    pub const fn latch_value(self) -> u8 {
        self as u8
    }
}

/// Motion and data interrupt status flags
///
/// Read from the `MOTION_INTERRUPT` (0x09) and `DATA_INTERRUPT` (0x0A)
/// registers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct MotionInterruptStatus {
    /// Orientation interrupt flag
    pub orientation: bool,
    /// Single-tap interrupt flag
    pub single_tap: bool,
    /// Double-tap interrupt flag
    pub double_tap: bool,
    /// Activity interrupt flag
    pub activity: bool,
    /// Freefall interrupt flag
    pub freefall: bool,
    /// New data ready flag
    pub new_data: bool,
}

impl MotionInterruptStatus {
    /// Create empty interrupt status
    pub const fn new() -> Self {
        Self {
            orientation: false,
            single_tap: false,
            double_tap: false,
            activity: false,
            freefall: false,
            new_data: false,
        }
    }

    /// Check if any interrupt flag is set
    pub const fn any_set(&self) -> bool {
        self.orientation
            || self.single_tap
            || self.double_tap
            || self.activity
            || self.freefall
            || self.new_data
    }
}

/// Tap and activity source flags
///
/// Read from the `TAP_ACTIVE_STATUS` (0x0B) register; identifies the axis
/// and sign that triggered the most recent tap or activity interrupt.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct TapActivityStatus {
    /// Tap trigger was in the negative direction
    pub tap_sign_negative: bool,
    /// X-axis triggered the tap interrupt
    pub tap_first_x: bool,
    /// Y-axis triggered the tap interrupt
    pub tap_first_y: bool,
    /// Z-axis triggered the tap interrupt
    pub tap_first_z: bool,
    /// Activity trigger was in the negative direction
    pub active_sign_negative: bool,
    /// X-axis triggered the activity interrupt
    pub active_first_x: bool,
    /// Y-axis triggered the activity interrupt
    pub active_first_y: bool,
    /// Z-axis triggered the activity interrupt
    pub active_first_z: bool,
}

/// Orientation status
///
/// Read from the `ORIENTATION_STATUS` (0x0C) register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OrientationStatus {
    /// Portrait/landscape orientation in the XY plane
    pub xy: OrientationXY,
    /// Z-axis is downward looking
    pub z_downward: bool,
}
