//! High-level driver API for the MSA301
//!
//! This module provides a user-friendly interface to the MSA301 sensor,
//! handling device configuration, data reading, motion engine setup and
//! the four-orientation offset calibration workflow.

use crate::registers::Msa301 as RegisterDevice;
use crate::{Error, PART_ID_VALUE};

/// Default motion detection threshold divisor for calibration
///
/// During calibration, the sensor must remain stationary. The threshold is
/// calculated as: `max_spread` = sensitivity / divisor
/// - Divisor 20 = ~5% spread allowed (balanced, recommended)
/// - Lower values are more lenient, higher values are stricter
const DEFAULT_MOTION_DETECTION_THRESHOLD_DIVISOR: i16 = 20;

/// Readings averaged per orientation by `calibration_capture`
///
/// At the 1000 Hz acquisition rate one orientation takes about 100 ms.
const SAMPLES_PER_ORIENTATION: u16 = 100;

// Only import RegisterInterface when not using async feature
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

use crate::accelerometer::{AccelDataG, AxesConfig, DataRate, Range, Resolution};
use crate::calibration::score::{harmonic_score, ScoreFn};
use crate::calibration::{
    self, AcquisitionSnapshot, BiasCalibration, CalibrationOutcome, CalibrationSession,
    RunningStats, SessionError,
};
use crate::interrupt::{
    InterruptLatch, InterruptMap, InterruptPinConfig, MotionInterruptConfig,
    MotionInterruptStatus, OrientationStatus, TapActivityStatus,
};
use crate::motion::{
    ActiveConfig, FreefallConfig, FreefallMode, OrientConfig, OrientationXY, TapConfig, TapQuiet,
    TapShock,
};
use crate::power::{LowPowerBandwidth, PowerMode};

/// Accelerometer data (raw 16-bit values)
///
/// Values are left-justified: the configured resolution occupies the top
/// bits and the remainder reads zero, so the scale in LSB/g is the same
/// at every resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelData {
    /// X-axis acceleration (raw)
    pub x: i16,
    /// Y-axis acceleration (raw)
    pub y: i16,
    /// Z-axis acceleration (raw)
    pub z: i16,
}

/// Main driver for the MSA301
pub struct Msa301Driver<I> {
    device: RegisterDevice<I>,
    // Cached measurement settings, needed to scale raw readings
    range: Range,
    resolution: Resolution,
    power_mode: PowerMode,
}

impl<I> Msa301Driver<I> {
    /// Consume the driver and return the underlying interface
    pub fn release(self) -> I {
        self.device.interface
    }

    /// Get a reference to the underlying register device (for advanced usage)
    pub const fn device(&self) -> &crate::registers::Msa301<I> {
        &self.device
    }

    /// Get a mutable reference to the underlying register device (for advanced usage)
    pub const fn device_mut(&mut self) -> &mut crate::registers::Msa301<I> {
        &mut self.device
    }

    /// The currently configured full-scale range
    #[must_use]
    pub const fn range(&self) -> Range {
        self.range
    }

    /// The currently configured output resolution
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// The currently configured power mode
    #[must_use]
    pub const fn power_mode(&self) -> PowerMode {
        self.power_mode
    }

    fn cache_snapshot_settings(&mut self, snapshot: &AcquisitionSnapshot) {
        self.range = match snapshot.res_range & 0x03 {
            0 => Range::G2,
            1 => Range::G4,
            2 => Range::G8,
            _ => Range::G16,
        };
        self.resolution = match (snapshot.res_range >> 2) & 0x03 {
            0 => Resolution::Bits14,
            1 => Resolution::Bits12,
            2 => Resolution::Bits10,
            _ => Resolution::Bits8,
        };
        // Both 0b10 and 0b11 select suspend on this part
        self.power_mode = match (snapshot.power_bw >> 6) & 0x03 {
            0 => PowerMode::Normal,
            1 => PowerMode::LowPower,
            _ => PowerMode::Suspend,
        };
    }
}

#[cfg(not(feature = "async"))]
impl<I> Msa301Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new MSA301 driver instance
    ///
    /// This will verify the `PART_ID` register but will not initialize the
    /// device. Call `init()` after construction to configure the device.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `PART_ID` register contains an unexpected value
    pub fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let device = RegisterDevice::new(interface);
        let mut driver = Self {
            device,
            // Power-on defaults
            range: Range::G2,
            resolution: Resolution::Bits14,
            power_mode: PowerMode::Suspend,
        };

        let part_id = driver.part_id()?;
        if part_id != PART_ID_VALUE {
            return Err(Error::InvalidDevice(part_id));
        }

        Ok(driver)
    }

    /// Initialize the device with default settings
    ///
    /// This performs a soft reset, then configures normal power mode,
    /// ±2 g range, 14-bit resolution, 250 Hz output rate and all axes
    /// enabled.
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay provider implementing `embedded_hal::delay::DelayNs`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use embassy_time::Delay;
    /// let mut delay = Delay;
    /// driver.init(&mut delay)?;
    /// ```
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        const MAX_WAIT_MS: u32 = 100;
        const POLL_INTERVAL_MS: u32 = 1;

        // Reset the device; all registers reload their defaults
        self.device.soft_reset().modify(|w| {
            w.set_soft_reset(true);
        })?;

        // Wait for the reset to complete by polling until the part
        // responds with its ID again
        for _ in 0..(MAX_WAIT_MS / POLL_INTERVAL_MS) {
            delay.delay_ms(POLL_INTERVAL_MS);
            if self
                .device
                .part_id()
                .read()
                .is_ok_and(|reg| reg.part_id() == PART_ID_VALUE)
            {
                break;
            }
        }
        self.range = Range::G2;
        self.resolution = Resolution::Bits14;
        self.power_mode = PowerMode::Suspend;

        // Wake up with a full-resolution, all-axes configuration
        self.set_power_mode(PowerMode::Normal)?;
        self.set_low_power_bandwidth(LowPowerBandwidth::Hz500)?;
        self.set_range(Range::G2)?;
        self.set_resolution(Resolution::Bits14)?;
        self.set_data_rate(DataRate::Hz250)?;
        self.set_axes_config(AxesConfig::default())?;

        // Wait and verify by checking the configuration took effect
        for _ in 0..(MAX_WAIT_MS / POLL_INTERVAL_MS) {
            delay.delay_ms(POLL_INTERVAL_MS);
            if self
                .device
                .power_mode()
                .read()
                .is_ok_and(|reg| reg.power_mode() == PowerMode::Normal as u8)
            {
                return Ok(());
            }
        }

        Ok(())
    }

    /// Read the `PART_ID` register
    ///
    /// Should return 0x13 for a valid MSA301.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn part_id(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.part_id().read()?;
        Ok(reg.part_id())
    }

    /// Restore every configuration register to its documented power-on value
    ///
    /// Unlike `init()` this does not trigger a soft reset, so it can be
    /// used to get back to a known state without re-verifying the device.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset_defaults(&mut self) -> Result<(), Error<I::Error>> {
        // Power-on values from the datasheet register map
        const RESET_VALUES: [(u8, u8); 22] = [
            (0x0F, 0x00), // RES_RANGE: 14-bit, ±2 g
            (0x10, 0x0F), // ODR
            (0x11, 0x9E), // POWER_MODE: suspend
            (0x12, 0x00), // SWAP_POLARITY
            (0x16, 0x00), // INT_SET_0
            (0x17, 0x00), // INT_SET_1
            (0x19, 0x00), // INT_MAP_0
            (0x1A, 0x00), // INT_MAP_1
            (0x20, 0x00), // INT_CONFIG
            (0x21, 0x00), // INT_LATCH
            (0x22, 0x09), // FREEFALL_DUR: 20 ms
            (0x23, 0x30), // FREEFALL_TH: 375 mg
            (0x24, 0x01), // FREEFALL_HY
            (0x27, 0x00), // ACTIVE_DUR
            (0x28, 0x14), // ACTIVE_TH
            (0x2A, 0x04), // TAP_DUR: 250 ms
            (0x2B, 0x0A), // TAP_TH
            (0x2C, 0x18), // ORIENT_HY
            (0x2D, 0x08), // Z_BLOCK: 500 mg
            (0x38, 0x00), // OFFSET_X
            (0x39, 0x00), // OFFSET_Y
            (0x3A, 0x00), // OFFSET_Z
        ];

        for (address, value) in RESET_VALUES {
            self.device.interface.write_register(address, 8, &[value])?;
        }

        self.range = Range::G2;
        self.resolution = Resolution::Bits14;
        self.power_mode = PowerMode::Suspend;

        Ok(())
    }

    /// Set the full-scale measurement range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_range(&mut self, range: Range) -> Result<(), Error<I::Error>> {
        self.device.res_range().modify(|w| {
            w.set_range(range as u8);
        })?;
        self.range = range;
        Ok(())
    }

    /// Set the output resolution
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<I::Error>> {
        self.device.res_range().modify(|w| {
            w.set_resolution(resolution as u8);
        })?;
        self.resolution = resolution;
        Ok(())
    }

    /// Set the output data rate
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the rate is not available in the
    /// current power mode (the two slowest rates require low power, the two
    /// fastest require normal power), or an error if communication with the
    /// device fails.
    pub fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Error<I::Error>> {
        if !rate.is_available(self.power_mode) {
            return Err(Error::InvalidConfig);
        }

        self.device.odr().modify(|w| {
            w.set_odr(rate as u8);
        })?;
        Ok(())
    }

    /// Set the power mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<I::Error>> {
        self.device.power_mode().modify(|w| {
            w.set_power_mode(mode as u8);
        })?;
        self.power_mode = mode;
        Ok(())
    }

    /// Set the bandwidth used in low-power mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_low_power_bandwidth(
        &mut self,
        bandwidth: LowPowerBandwidth,
    ) -> Result<(), Error<I::Error>> {
        self.device.power_mode().modify(|w| {
            w.set_low_power_bandwidth(bandwidth.bandwidth_value());
        })?;
        Ok(())
    }

    /// Configure axis enables, polarity and XY swap
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_axes_config(&mut self, config: AxesConfig) -> Result<(), Error<I::Error>> {
        self.device.odr().modify(|w| {
            w.set_x_axis_disable(!config.x_enabled);
            w.set_y_axis_disable(!config.y_enabled);
            w.set_z_axis_disable(!config.z_enabled);
        })?;

        self.device.swap_polarity().modify(|w| {
            w.set_x_polarity(config.x_inverted);
            w.set_y_polarity(config.y_inverted);
            w.set_z_polarity(config.z_inverted);
            w.set_xy_swap(config.xy_swapped);
        })?;

        Ok(())
    }

    /// Enable or disable the motion and data interrupt sources
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn configure_interrupts(
        &mut self,
        config: &MotionInterruptConfig,
    ) -> Result<(), Error<I::Error>> {
        self.device.int_set_0().write(|w| {
            w.set_orient_int_en(config.orientation);
            w.set_s_tap_int_en(config.single_tap);
            w.set_d_tap_int_en(config.double_tap);
            w.set_active_int_en_x(config.activity_x);
            w.set_active_int_en_y(config.activity_y);
            w.set_active_int_en_z(config.activity_z);
        })?;

        self.device.int_set_1().write(|w| {
            w.set_freefall_int_en(config.freefall);
            w.set_new_data_int_en(config.new_data);
        })?;

        Ok(())
    }

    /// Route interrupt sources to the INT pin
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn configure_interrupt_map(&mut self, map: &InterruptMap) -> Result<(), Error<I::Error>> {
        self.device.int_map_0().write(|w| {
            w.set_int_orient(map.orientation);
            w.set_int_s_tap(map.single_tap);
            w.set_int_d_tap(map.double_tap);
            w.set_int_active(map.activity);
            w.set_int_freefall(map.freefall);
        })?;

        self.device.int_map_1().write(|w| {
            w.set_int_new_data(map.new_data);
        })?;

        Ok(())
    }

    /// Configure the electrical behavior of the INT pin
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn configure_interrupt_pin(
        &mut self,
        config: InterruptPinConfig,
    ) -> Result<(), Error<I::Error>> {
        self.device.int_config().write(|w| {
            w.set_int_pin_lvl(config.active_high);
            w.set_int_pin_od(config.open_drain);
        })?;
        Ok(())
    }

    /// Set the interrupt latch mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_interrupt_latch(&mut self, latch: InterruptLatch) -> Result<(), Error<I::Error>> {
        self.device.int_latch().modify(|w| {
            w.set_latch_int(latch.latch_value());
        })?;
        Ok(())
    }

    /// Clear any latched interrupt
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset_latched_interrupts(&mut self) -> Result<(), Error<I::Error>> {
        self.device.int_latch().modify(|w| {
            w.set_reset_int(true);
        })?;
        Ok(())
    }

    /// Read which interrupts are currently active
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn motion_interrupt_status(&mut self) -> Result<MotionInterruptStatus, Error<I::Error>> {
        let motion = self.device.motion_interrupt().read()?;
        let data = self.device.data_interrupt().read()?;

        Ok(MotionInterruptStatus {
            orientation: motion.orient_int(),
            single_tap: motion.s_tap_int(),
            double_tap: motion.d_tap_int(),
            activity: motion.active_int(),
            freefall: motion.freefall_int(),
            new_data: data.new_data_int(),
        })
    }

    /// Whether a new acceleration sample is ready to read
    ///
    /// Requires the new-data interrupt source to be enabled via
    /// [`configure_interrupts`](Self::configure_interrupts).
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn new_data_ready(&mut self) -> Result<bool, Error<I::Error>> {
        let reg = self.device.data_interrupt().read()?;
        Ok(reg.new_data_int())
    }

    /// Read which axis and sign triggered the most recent tap or activity
    /// interrupt
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn tap_activity_status(&mut self) -> Result<TapActivityStatus, Error<I::Error>> {
        let reg = self.device.tap_active_status().read()?;

        Ok(TapActivityStatus {
            tap_sign_negative: reg.tap_sign(),
            tap_first_x: reg.tap_first_x(),
            tap_first_y: reg.tap_first_y(),
            tap_first_z: reg.tap_first_z(),
            active_sign_negative: reg.active_sign(),
            active_first_x: reg.active_first_x(),
            active_first_y: reg.active_first_y(),
            active_first_z: reg.active_first_z(),
        })
    }

    /// Read the current device orientation
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn orientation_status(&mut self) -> Result<OrientationStatus, Error<I::Error>> {
        let reg = self.device.orientation_status().read()?;

        let xy = match reg.orient_xy() {
            0 => OrientationXY::PortraitUpright,
            1 => OrientationXY::PortraitUpsideDown,
            2 => OrientationXY::LandscapeLeft,
            _ => OrientationXY::LandscapeRight,
        };

        Ok(OrientationStatus {
            xy,
            z_downward: reg.orient_z(),
        })
    }

    /// Configure single and double tap detection
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the threshold exceeds the 5-bit
    /// register field, or an error if communication with the device fails.
    pub fn configure_tap(&mut self, config: &TapConfig) -> Result<(), Error<I::Error>> {
        if config.threshold > 0x1F {
            return Err(Error::InvalidConfig);
        }

        self.device.tap_dur().write(|w| {
            w.set_tap_dur(config.duration as u8);
            w.set_tap_shock(matches!(config.shock, TapShock::Ms50));
            w.set_tap_quiet(matches!(config.quiet, TapQuiet::Ms20));
        })?;

        self.device.tap_th().write(|w| {
            w.set_tap_th(config.threshold);
        })?;

        Ok(())
    }

    /// Configure freefall detection
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the hysteresis exceeds the 2-bit
    /// register field, or an error if communication with the device fails.
    pub fn configure_freefall(&mut self, config: &FreefallConfig) -> Result<(), Error<I::Error>> {
        if config.hysteresis > 0x03 {
            return Err(Error::InvalidConfig);
        }

        self.device.freefall_dur().write(|w| {
            w.set_freefall_dur(config.duration);
        })?;

        self.device.freefall_th().write(|w| {
            w.set_freefall_th(config.threshold);
        })?;

        self.device.freefall_hy().write(|w| {
            w.set_freefall_hy(config.hysteresis);
            w.set_freefall_mode(matches!(config.mode, FreefallMode::Sum));
        })?;

        Ok(())
    }

    /// Configure activity detection
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the duration exceeds the 2-bit
    /// register field, or an error if communication with the device fails.
    pub fn configure_active(&mut self, config: &ActiveConfig) -> Result<(), Error<I::Error>> {
        if config.duration > 0x03 {
            return Err(Error::InvalidConfig);
        }

        self.device.active_dur().write(|w| {
            w.set_active_dur(config.duration);
        })?;

        self.device.active_th().write(|w| {
            w.set_active_th(config.threshold);
        })?;

        Ok(())
    }

    /// Configure orientation detection
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the hysteresis or Z blocking
    /// threshold exceeds its register field, or an error if communication
    /// with the device fails.
    pub fn configure_orient(&mut self, config: &OrientConfig) -> Result<(), Error<I::Error>> {
        if config.hysteresis > 0x07 || config.z_block_threshold > 0x0F {
            return Err(Error::InvalidConfig);
        }

        self.device.orient_hy().write(|w| {
            w.set_orient_mode(config.symmetry as u8);
            w.set_orient_blocking(config.blocking as u8);
            w.set_orient_hyst(config.hysteresis);
        })?;

        self.device.z_block().write(|w| {
            w.set_z_block(config.z_block_threshold);
        })?;

        Ok(())
    }

    /// Read accelerometer data
    ///
    /// Returns raw left-justified 16-bit values for X, Y, Z axes.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_accel(&mut self) -> Result<AccelData, Error<I::Error>> {
        // Read all 6 bytes in one transaction to prevent torn samples
        // Register addresses: ACC_X_LSB (0x02) through ACC_Z_MSB (0x07)
        const ACC_X_LSB: u8 = 0x02;
        let mut buffer = [0u8; 6];
        self.device
            .interface
            .read_register(ACC_X_LSB, 48, &mut buffer)?;

        let x = i16::from_le_bytes([buffer[0], buffer[1]]);
        let y = i16::from_le_bytes([buffer[2], buffer[3]]);
        let z = i16::from_le_bytes([buffer[4], buffer[5]]);

        Ok(AccelData { x, y, z })
    }

    /// Read accelerometer data scaled to g
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_accel_g(&mut self) -> Result<AccelDataG, Error<I::Error>> {
        let raw = self.read_accel()?;
        Ok(AccelDataG::from_raw(
            raw.x,
            raw.y,
            raw.z,
            self.range.sensitivity(),
        ))
    }

    /// Read the hardware offset compensation registers
    ///
    /// Values are signed, 3.90625 mg per LSB; the device adds them to its
    /// output.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_offsets(&mut self) -> Result<[i8; 3], Error<I::Error>> {
        let x = self.device.offset_x().read()?.offset_x();
        let y = self.device.offset_y().read()?.offset_y();
        let z = self.device.offset_z().read()?.offset_z();

        #[allow(clippy::cast_possible_wrap)]
        Ok([x as i8, y as i8, z as i8])
    }

    /// Write the hardware offset compensation registers
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn write_offsets(&mut self, offsets: [i8; 3]) -> Result<(), Error<I::Error>> {
        #[allow(clippy::cast_sign_loss)]
        let [x, y, z] = offsets.map(|value| value as u8);

        self.device.offset_x().write(|w| {
            w.set_offset_x(x);
        })?;
        self.device.offset_y().write(|w| {
            w.set_offset_y(y);
        })?;
        self.device.offset_z().write(|w| {
            w.set_offset_z(z);
        })?;

        Ok(())
    }

    /// Program a fitted bias into the hardware offset registers
    ///
    /// The programmed values cancel `calibration.bias`; the scale factor
    /// cannot be expressed in hardware and is ignored here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CalibrationOverflow`] if the bias does not fit the
    /// ±500 mg offset span, or an error if communication with the device
    /// fails.
    pub fn apply_offsets(&mut self, calibration: &BiasCalibration) -> Result<(), Error<I::Error>> {
        let registers = calibration
            .offset_registers()
            .ok_or(Error::CalibrationOverflow)?;

        self.write_offsets(registers)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Offset registers programmed: x={}, y={}, z={}",
            registers[0],
            registers[1],
            registers[2]
        );

        Ok(())
    }

    /// Calibrate the offsets with the default motion detection threshold.
    ///
    /// Convenience wrapper for
    /// [`calibrate_offsets_with_threshold`](Self::calibrate_offsets_with_threshold)
    /// using the default threshold divisor (5% of full scale).
    ///
    /// # Arguments
    ///
    /// * `samples` - Number of samples to average (more samples = better accuracy)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails or if the
    /// device is moving during calibration.
    pub fn calibrate_offsets(&mut self, samples: u16) -> Result<BiasCalibration, Error<I::Error>> {
        self.calibrate_offsets_with_threshold(samples, DEFAULT_MOTION_DETECTION_THRESHOLD_DIVISOR)
    }

    /// Calibrate the offsets by averaging samples in a single orientation.
    ///
    /// The device must rest on a level surface with the Z-axis pointing up:
    /// X and Y are expected to read zero and Z to read +1 g, and the
    /// deviation is programmed into the hardware offset registers. For a
    /// calibration that does not require a level surface, use the
    /// four-orientation workflow starting at
    /// [`calibration_begin`](Self::calibration_begin).
    ///
    /// # Arguments
    ///
    /// * `samples` - Number of samples to average (more samples = better accuracy)
    /// * `motion_threshold_divisor` - Controls motion detection sensitivity.
    ///   Smaller values are more lenient (allow more spread).
    ///   - 100: Very strict (1% spread allowed)
    ///   - 33: Strict (3% spread allowed)
    ///   - 20: Balanced (5% spread allowed, recommended)
    ///   - 10: Lenient (10% spread allowed)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails, if the
    /// device is moving during calibration, or if the measured bias does
    /// not fit the offset registers.
    pub fn calibrate_offsets_with_threshold(
        &mut self,
        samples: u16,
        motion_threshold_divisor: i16,
    ) -> Result<BiasCalibration, Error<I::Error>> {
        // Validate input
        if samples == 0 {
            return Err(Error::InvalidConfig);
        }

        let mut sum_x: i64 = 0;
        let mut sum_y: i64 = 0;
        let mut sum_z: i64 = 0;

        // For motion detection
        let mut min_x = i16::MAX;
        let mut max_x = i16::MIN;
        let mut min_y = i16::MAX;
        let mut max_y = i16::MIN;
        let mut min_z = i16::MAX;
        let mut max_z = i16::MIN;

        for _ in 0..samples {
            let accel_data = self.read_accel()?;
            sum_x += i64::from(accel_data.x);
            sum_y += i64::from(accel_data.y);
            sum_z += i64::from(accel_data.z);

            // Track spread for motion detection
            min_x = min_x.min(accel_data.x);
            max_x = max_x.max(accel_data.x);
            min_y = min_y.min(accel_data.y);
            max_y = max_y.max(accel_data.y);
            min_z = min_z.min(accel_data.z);
            max_z = max_z.max(accel_data.z);
        }

        // Check for motion during calibration
        #[allow(clippy::cast_possible_truncation)]
        let max_spread = self.range.sensitivity() as i16 / motion_threshold_divisor;

        let spread_x = max_x.saturating_sub(min_x);
        let spread_y = max_y.saturating_sub(min_y);
        let spread_z = max_z.saturating_sub(min_z);

        if spread_x > max_spread || spread_y > max_spread || spread_z > max_spread {
            return Err(Error::DeviceMoving);
        }

        let avg_x = i16::try_from(sum_x / i64::from(samples)).map_err(|_| Error::InvalidConfig)?;
        let avg_y = i16::try_from(sum_y / i64::from(samples)).map_err(|_| Error::InvalidConfig)?;
        let avg_z = i16::try_from(sum_z / i64::from(samples)).map_err(|_| Error::InvalidConfig)?;

        // X and Y should read zero, Z should read +1 g
        let sensitivity = self.range.sensitivity();
        let calibration = BiasCalibration {
            bias: AccelDataG {
                x: f32::from(avg_x) / sensitivity,
                y: f32::from(avg_y) / sensitivity,
                z: f32::from(avg_z) / sensitivity - 1.0,
            },
            scale: 1.0,
        };

        self.apply_offsets(&calibration)?;

        Ok(calibration)
    }

    /// Start a four-orientation calibration session
    ///
    /// Captures the current acquisition configuration, then switches the
    /// device to ±2 g range, 14-bit resolution, normal power and 1000 Hz
    /// output with the new-data interrupt enabled, and zeroes the offset
    /// registers so the captured samples are uncompensated. The original
    /// configuration is restored by
    /// [`calibration_finish`](Self::calibration_finish).
    ///
    /// Unlike [`calibrate_offsets`](Self::calibrate_offsets) this workflow
    /// needs no level surface: any four stable orientations work, and the
    /// result is graded by how well they were chosen.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut session = driver.calibration_begin()?;
    /// for _ in 0..4 {
    ///     // Place the device in a new stable orientation, then:
    ///     driver.calibration_capture(&mut session, &mut delay)?;
    /// }
    /// let outcome = driver.calibration_finish(session)?;
    /// driver.apply_offsets(&outcome.calibration)?;
    /// ```
    pub fn calibration_begin(&mut self) -> Result<CalibrationSession, Error<I::Error>> {
        const RES_RANGE: u8 = 0x0F;
        const INT_SET_1: u8 = 0x17;
        const OFFSET_X: u8 = 0x38;

        // Capture the acquisition-related registers as raw bytes so the
        // session can restore them bit-exactly
        let mut config = [0u8; 3];
        self.device
            .interface
            .read_register(RES_RANGE, 24, &mut config)?;
        let mut int_set_1 = [0u8; 1];
        self.device
            .interface
            .read_register(INT_SET_1, 8, &mut int_set_1)?;
        let mut offsets = [0u8; 3];
        self.device
            .interface
            .read_register(OFFSET_X, 24, &mut offsets)?;

        let snapshot = AcquisitionSnapshot {
            res_range: config[0],
            odr_axis: config[1],
            power_bw: config[2],
            int_set_1: int_set_1[0],
            offsets,
        };

        // Acquisition configuration: most sensitive range, full
        // resolution, fastest conversion
        self.set_range(Range::G2)?;
        self.set_resolution(Resolution::Bits14)?;
        self.set_power_mode(PowerMode::Normal)?;
        self.set_data_rate(DataRate::Hz1000)?;
        self.device.int_set_1().modify(|w| {
            w.set_new_data_int_en(true);
        })?;
        self.write_offsets([0; 3])?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Calibration session started");

        Ok(CalibrationSession::new(snapshot))
    }

    /// Capture one averaged orientation sample into a session
    ///
    /// Hold the device still in a new orientation before calling. Averages
    /// 100 readings and records the mean and its noise; at the 1000 Hz
    /// acquisition rate this takes about 100 ms.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the session already holds four
    /// orientations, [`Error::DeviceMoving`] if the readings spread too far
    /// (re-settle and retry), [`Error::DataTimeout`] if the device stops
    /// producing samples, or an error if communication fails.
    pub fn calibration_capture<D>(
        &mut self,
        session: &mut CalibrationSession,
        delay: &mut D,
    ) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        if session.is_complete() {
            return Err(Error::InvalidConfig);
        }

        let (mean, variance) = self.read_averaged_sample(delay, SAMPLES_PER_ORIENTATION)?;
        session.push(mean, variance);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Captured orientation {}/{}",
            session.captured(),
            calibration::SESSION_SAMPLES
        );

        Ok(())
    }

    /// Finish a calibration session: restore the device, fit and grade
    ///
    /// Restores the configuration captured by
    /// [`calibration_begin`](Self::calibration_begin), fits the sphere
    /// through the four orientation samples and scores the result. The
    /// returned [`CalibrationOutcome`] is owned by the caller; nothing is
    /// programmed into the device until
    /// [`apply_offsets`](Self::apply_offsets) is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the session is not complete,
    /// [`Error::DegenerateGeometry`] if the orientations are too similar to
    /// determine a sphere (choose more distinct orientations and start
    /// over), [`Error::InvalidQuality`] if the fit produced a non-physical
    /// grade, or an error if communication with the device fails. The
    /// device configuration is restored even when the fit fails.
    pub fn calibration_finish(
        &mut self,
        session: CalibrationSession,
    ) -> Result<CalibrationOutcome, Error<I::Error>> {
        self.calibration_finish_with(session, harmonic_score)
    }

    /// Finish a calibration session with a caller-supplied scoring curve
    ///
    /// Identical to [`calibration_finish`](Self::calibration_finish) except
    /// the mapping from fit quality to confidence score.
    ///
    /// # Errors
    ///
    /// Same as [`calibration_finish`](Self::calibration_finish).
    pub fn calibration_finish_with(
        &mut self,
        session: CalibrationSession,
        score_fn: ScoreFn,
    ) -> Result<CalibrationOutcome, Error<I::Error>> {
        if !session.is_complete() {
            return Err(Error::InvalidConfig);
        }

        // Restore the captured configuration before touching the math, so
        // a degenerate fit cannot leave the acquisition settings active
        let snapshot = session.snapshot;
        for (address, value) in [
            (0x0F, snapshot.res_range),
            (0x10, snapshot.odr_axis),
            (0x11, snapshot.power_bw),
            (0x17, snapshot.int_set_1),
            (0x38, snapshot.offsets[0]),
            (0x39, snapshot.offsets[1]),
            (0x3A, snapshot.offsets[2]),
        ] {
            self.device.interface.write_register(address, 8, &[value])?;
        }
        self.cache_snapshot_settings(&snapshot);

        let outcome = calibration::evaluate_session(session.samples, session.variances, score_fn)
            .map_err(|error| match error {
                SessionError::DegenerateGeometry => Error::DegenerateGeometry,
                SessionError::InvalidQuality => Error::InvalidQuality,
            })?;

        #[cfg(feature = "defmt")]
        {
            let resolution_g = calibration::OFFSET_MG_PER_LSB / 1000.0;
            let uncertainty = outcome.axis_uncertainty;
            if uncertainty.x > resolution_g
                || uncertainty.y > resolution_g
                || uncertainty.z > resolution_g
            {
                defmt::warn!("Calibration uncertainty exceeds the offset register resolution");
            }
            if outcome.calibration.offset_registers().is_none() {
                defmt::warn!("Fitted bias exceeds the hardware offset span");
            }
        }

        Ok(outcome)
    }

    /// Average `count` fresh samples and estimate the noise of the mean
    fn read_averaged_sample<D>(
        &mut self,
        delay: &mut D,
        count: u16,
    ) -> Result<(AccelDataG, [f32; 3]), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        const MAX_WAIT_MS: u32 = 100;
        const POLL_INTERVAL_MS: u32 = 1;

        if count == 0 {
            return Err(Error::InvalidConfig);
        }

        let sensitivity = self.range.sensitivity();
        #[allow(clippy::cast_possible_truncation)]
        let max_spread = sensitivity as i16 / DEFAULT_MOTION_DETECTION_THRESHOLD_DIVISOR;

        let mut stats = [RunningStats::new(); 3];
        let mut min = [i16::MAX; 3];
        let mut max = [i16::MIN; 3];

        for _ in 0..count {
            // Wait for a fresh conversion
            let mut ready = false;
            for _ in 0..(MAX_WAIT_MS / POLL_INTERVAL_MS) {
                if self.new_data_ready()? {
                    ready = true;
                    break;
                }
                delay.delay_ms(POLL_INTERVAL_MS);
            }
            if !ready {
                return Err(Error::DataTimeout);
            }

            let data = self.read_accel()?;
            for (axis, value) in [data.x, data.y, data.z].into_iter().enumerate() {
                min[axis] = min[axis].min(value);
                max[axis] = max[axis].max(value);
                stats[axis].push(f32::from(value) / sensitivity);
            }
        }

        for axis in 0..3 {
            if max[axis].saturating_sub(min[axis]) > max_spread {
                return Err(Error::DeviceMoving);
            }
        }

        let mean = AccelDataG {
            x: stats[0].mean(),
            y: stats[1].mean(),
            z: stats[2].mean(),
        };
        let variance = [
            stats[0].variance_of_mean(),
            stats[1].variance_of_mean(),
            stats[2].variance_of_mean(),
        ];

        Ok((mean, variance))
    }
}

#[cfg(feature = "async")]
impl<I> Msa301Driver<I>
where
    I: device_driver::AsyncRegisterInterface<AddressType = u8>,
{
    /// Create a new MSA301 driver instance
    ///
    /// This will verify the `PART_ID` register but will not initialize the
    /// device. Call `init()` after construction to configure the device.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `PART_ID` register contains an unexpected value
    pub async fn new(interface: I) -> Result<Self, Error<I::Error>> {
        let device = RegisterDevice::new(interface);
        let mut driver = Self {
            device,
            // Power-on defaults
            range: Range::G2,
            resolution: Resolution::Bits14,
            power_mode: PowerMode::Suspend,
        };

        let part_id = driver.part_id().await?;
        if part_id != PART_ID_VALUE {
            return Err(Error::InvalidDevice(part_id));
        }

        Ok(driver)
    }

    /// Initialize the device with default settings
    ///
    /// This performs a soft reset, then configures normal power mode,
    /// ±2 g range, 14-bit resolution, 250 Hz output rate and all axes
    /// enabled.
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay provider implementing `embedded_hal_async::delay::DelayNs`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use embassy_time::Delay;
    /// let mut delay = Delay;
    /// driver.init(&mut delay).await?;
    /// ```
    pub async fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        const MAX_WAIT_MS: u32 = 100;
        const POLL_INTERVAL_MS: u32 = 1;

        // Reset the device; all registers reload their defaults
        self.device
            .soft_reset()
            .modify_async(|w| {
                w.set_soft_reset(true);
            })
            .await?;

        // Wait for the reset to complete by polling until the part
        // responds with its ID again
        for _ in 0..(MAX_WAIT_MS / POLL_INTERVAL_MS) {
            delay.delay_ms(POLL_INTERVAL_MS).await;
            if self
                .device
                .part_id()
                .read_async()
                .await
                .is_ok_and(|reg| reg.part_id() == PART_ID_VALUE)
            {
                break;
            }
        }
        self.range = Range::G2;
        self.resolution = Resolution::Bits14;
        self.power_mode = PowerMode::Suspend;

        // Wake up with a full-resolution, all-axes configuration
        self.set_power_mode(PowerMode::Normal).await?;
        self.set_low_power_bandwidth(LowPowerBandwidth::Hz500).await?;
        self.set_range(Range::G2).await?;
        self.set_resolution(Resolution::Bits14).await?;
        self.set_data_rate(DataRate::Hz250).await?;
        self.set_axes_config(AxesConfig::default()).await?;

        // Wait and verify by checking the configuration took effect
        for _ in 0..(MAX_WAIT_MS / POLL_INTERVAL_MS) {
            delay.delay_ms(POLL_INTERVAL_MS).await;
            if self
                .device
                .power_mode()
                .read_async()
                .await
                .is_ok_and(|reg| reg.power_mode() == PowerMode::Normal as u8)
            {
                return Ok(());
            }
        }

        Ok(())
    }

    /// Read the `PART_ID` register
    ///
    /// Should return 0x13 for a valid MSA301.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn part_id(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.part_id().read_async().await?;
        Ok(reg.part_id())
    }

    /// Restore every configuration register to its documented power-on value
    ///
    /// Unlike `init()` this does not trigger a soft reset, so it can be
    /// used to get back to a known state without re-verifying the device.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn reset_defaults(&mut self) -> Result<(), Error<I::Error>> {
        // Power-on values from the datasheet register map
        const RESET_VALUES: [(u8, u8); 22] = [
            (0x0F, 0x00), // RES_RANGE: 14-bit, ±2 g
            (0x10, 0x0F), // ODR
            (0x11, 0x9E), // POWER_MODE: suspend
            (0x12, 0x00), // SWAP_POLARITY
            (0x16, 0x00), // INT_SET_0
            (0x17, 0x00), // INT_SET_1
            (0x19, 0x00), // INT_MAP_0
            (0x1A, 0x00), // INT_MAP_1
            (0x20, 0x00), // INT_CONFIG
            (0x21, 0x00), // INT_LATCH
            (0x22, 0x09), // FREEFALL_DUR: 20 ms
            (0x23, 0x30), // FREEFALL_TH: 375 mg
            (0x24, 0x01), // FREEFALL_HY
            (0x27, 0x00), // ACTIVE_DUR
            (0x28, 0x14), // ACTIVE_TH
            (0x2A, 0x04), // TAP_DUR: 250 ms
            (0x2B, 0x0A), // TAP_TH
            (0x2C, 0x18), // ORIENT_HY
            (0x2D, 0x08), // Z_BLOCK: 500 mg
            (0x38, 0x00), // OFFSET_X
            (0x39, 0x00), // OFFSET_Y
            (0x3A, 0x00), // OFFSET_Z
        ];

        for (address, value) in RESET_VALUES {
            self.device
                .interface
                .write_register(address, 8, &[value])
                .await?;
        }

        self.range = Range::G2;
        self.resolution = Resolution::Bits14;
        self.power_mode = PowerMode::Suspend;

        Ok(())
    }

    /// Set the full-scale measurement range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_range(&mut self, range: Range) -> Result<(), Error<I::Error>> {
        self.device
            .res_range()
            .modify_async(|w| {
                w.set_range(range as u8);
            })
            .await?;
        self.range = range;
        Ok(())
    }

    /// Set the output resolution
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<I::Error>> {
        self.device
            .res_range()
            .modify_async(|w| {
                w.set_resolution(resolution as u8);
            })
            .await?;
        self.resolution = resolution;
        Ok(())
    }

    /// Set the output data rate
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the rate is not available in the
    /// current power mode (the two slowest rates require low power, the two
    /// fastest require normal power), or an error if communication with the
    /// device fails.
    pub async fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Error<I::Error>> {
        if !rate.is_available(self.power_mode) {
            return Err(Error::InvalidConfig);
        }

        self.device
            .odr()
            .modify_async(|w| {
                w.set_odr(rate as u8);
            })
            .await?;
        Ok(())
    }

    /// Set the power mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<I::Error>> {
        self.device
            .power_mode()
            .modify_async(|w| {
                w.set_power_mode(mode as u8);
            })
            .await?;
        self.power_mode = mode;
        Ok(())
    }

    /// Set the bandwidth used in low-power mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_low_power_bandwidth(
        &mut self,
        bandwidth: LowPowerBandwidth,
    ) -> Result<(), Error<I::Error>> {
        self.device
            .power_mode()
            .modify_async(|w| {
                w.set_low_power_bandwidth(bandwidth.bandwidth_value());
            })
            .await?;
        Ok(())
    }

    /// Configure axis enables, polarity and XY swap
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_axes_config(&mut self, config: AxesConfig) -> Result<(), Error<I::Error>> {
        self.device
            .odr()
            .modify_async(|w| {
                w.set_x_axis_disable(!config.x_enabled);
                w.set_y_axis_disable(!config.y_enabled);
                w.set_z_axis_disable(!config.z_enabled);
            })
            .await?;

        self.device
            .swap_polarity()
            .modify_async(|w| {
                w.set_x_polarity(config.x_inverted);
                w.set_y_polarity(config.y_inverted);
                w.set_z_polarity(config.z_inverted);
                w.set_xy_swap(config.xy_swapped);
            })
            .await?;

        Ok(())
    }

    /// Enable or disable the motion and data interrupt sources
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn configure_interrupts(
        &mut self,
        config: &MotionInterruptConfig,
    ) -> Result<(), Error<I::Error>> {
        self.device
            .int_set_0()
            .write_async(|w| {
                w.set_orient_int_en(config.orientation);
                w.set_s_tap_int_en(config.single_tap);
                w.set_d_tap_int_en(config.double_tap);
                w.set_active_int_en_x(config.activity_x);
                w.set_active_int_en_y(config.activity_y);
                w.set_active_int_en_z(config.activity_z);
            })
            .await?;

        self.device
            .int_set_1()
            .write_async(|w| {
                w.set_freefall_int_en(config.freefall);
                w.set_new_data_int_en(config.new_data);
            })
            .await?;

        Ok(())
    }

    /// Route interrupt sources to the INT pin
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn configure_interrupt_map(
        &mut self,
        map: &InterruptMap,
    ) -> Result<(), Error<I::Error>> {
        self.device
            .int_map_0()
            .write_async(|w| {
                w.set_int_orient(map.orientation);
                w.set_int_s_tap(map.single_tap);
                w.set_int_d_tap(map.double_tap);
                w.set_int_active(map.activity);
                w.set_int_freefall(map.freefall);
            })
            .await?;

        self.device
            .int_map_1()
            .write_async(|w| {
                w.set_int_new_data(map.new_data);
            })
            .await?;

        Ok(())
    }

    /// Configure the electrical behavior of the INT pin
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn configure_interrupt_pin(
        &mut self,
        config: InterruptPinConfig,
    ) -> Result<(), Error<I::Error>> {
        self.device
            .int_config()
            .write_async(|w| {
                w.set_int_pin_lvl(config.active_high);
                w.set_int_pin_od(config.open_drain);
            })
            .await?;
        Ok(())
    }

    /// Set the interrupt latch mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_interrupt_latch(
        &mut self,
        latch: InterruptLatch,
    ) -> Result<(), Error<I::Error>> {
        self.device
            .int_latch()
            .modify_async(|w| {
                w.set_latch_int(latch.latch_value());
            })
            .await?;
        Ok(())
    }

    /// Clear any latched interrupt
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn reset_latched_interrupts(&mut self) -> Result<(), Error<I::Error>> {
        self.device
            .int_latch()
            .modify_async(|w| {
                w.set_reset_int(true);
            })
            .await?;
        Ok(())
    }

    /// Read which interrupts are currently active
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn motion_interrupt_status(
        &mut self,
    ) -> Result<MotionInterruptStatus, Error<I::Error>> {
        let motion = self.device.motion_interrupt().read_async().await?;
        let data = self.device.data_interrupt().read_async().await?;

        Ok(MotionInterruptStatus {
            orientation: motion.orient_int(),
            single_tap: motion.s_tap_int(),
            double_tap: motion.d_tap_int(),
            activity: motion.active_int(),
            freefall: motion.freefall_int(),
            new_data: data.new_data_int(),
        })
    }

    /// Whether a new acceleration sample is ready to read
    ///
    /// Requires the new-data interrupt source to be enabled via
    /// [`configure_interrupts`](Self::configure_interrupts).
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn new_data_ready(&mut self) -> Result<bool, Error<I::Error>> {
        let reg = self.device.data_interrupt().read_async().await?;
        Ok(reg.new_data_int())
    }

    /// Read which axis and sign triggered the most recent tap or activity
    /// interrupt
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn tap_activity_status(&mut self) -> Result<TapActivityStatus, Error<I::Error>> {
        let reg = self.device.tap_active_status().read_async().await?;

        Ok(TapActivityStatus {
            tap_sign_negative: reg.tap_sign(),
            tap_first_x: reg.tap_first_x(),
            tap_first_y: reg.tap_first_y(),
            tap_first_z: reg.tap_first_z(),
            active_sign_negative: reg.active_sign(),
            active_first_x: reg.active_first_x(),
            active_first_y: reg.active_first_y(),
            active_first_z: reg.active_first_z(),
        })
    }

    /// Read the current device orientation
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn orientation_status(&mut self) -> Result<OrientationStatus, Error<I::Error>> {
        let reg = self.device.orientation_status().read_async().await?;

        let xy = match reg.orient_xy() {
            0 => OrientationXY::PortraitUpright,
            1 => OrientationXY::PortraitUpsideDown,
            2 => OrientationXY::LandscapeLeft,
            _ => OrientationXY::LandscapeRight,
        };

        Ok(OrientationStatus {
            xy,
            z_downward: reg.orient_z(),
        })
    }

    /// Configure single and double tap detection
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the threshold exceeds the 5-bit
    /// register field, or an error if communication with the device fails.
    pub async fn configure_tap(&mut self, config: &TapConfig) -> Result<(), Error<I::Error>> {
        if config.threshold > 0x1F {
            return Err(Error::InvalidConfig);
        }

        self.device
            .tap_dur()
            .write_async(|w| {
                w.set_tap_dur(config.duration as u8);
                w.set_tap_shock(matches!(config.shock, TapShock::Ms50));
                w.set_tap_quiet(matches!(config.quiet, TapQuiet::Ms20));
            })
            .await?;

        self.device
            .tap_th()
            .write_async(|w| {
                w.set_tap_th(config.threshold);
            })
            .await?;

        Ok(())
    }

    /// Configure freefall detection
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the hysteresis exceeds the 2-bit
    /// register field, or an error if communication with the device fails.
    pub async fn configure_freefall(
        &mut self,
        config: &FreefallConfig,
    ) -> Result<(), Error<I::Error>> {
        if config.hysteresis > 0x03 {
            return Err(Error::InvalidConfig);
        }

        self.device
            .freefall_dur()
            .write_async(|w| {
                w.set_freefall_dur(config.duration);
            })
            .await?;

        self.device
            .freefall_th()
            .write_async(|w| {
                w.set_freefall_th(config.threshold);
            })
            .await?;

        self.device
            .freefall_hy()
            .write_async(|w| {
                w.set_freefall_hy(config.hysteresis);
                w.set_freefall_mode(matches!(config.mode, FreefallMode::Sum));
            })
            .await?;

        Ok(())
    }

    /// Configure activity detection
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the duration exceeds the 2-bit
    /// register field, or an error if communication with the device fails.
    pub async fn configure_active(&mut self, config: &ActiveConfig) -> Result<(), Error<I::Error>> {
        if config.duration > 0x03 {
            return Err(Error::InvalidConfig);
        }

        self.device
            .active_dur()
            .write_async(|w| {
                w.set_active_dur(config.duration);
            })
            .await?;

        self.device
            .active_th()
            .write_async(|w| {
                w.set_active_th(config.threshold);
            })
            .await?;

        Ok(())
    }

    /// Configure orientation detection
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the hysteresis or Z blocking
    /// threshold exceeds its register field, or an error if communication
    /// with the device fails.
    pub async fn configure_orient(&mut self, config: &OrientConfig) -> Result<(), Error<I::Error>> {
        if config.hysteresis > 0x07 || config.z_block_threshold > 0x0F {
            return Err(Error::InvalidConfig);
        }

        self.device
            .orient_hy()
            .write_async(|w| {
                w.set_orient_mode(config.symmetry as u8);
                w.set_orient_blocking(config.blocking as u8);
                w.set_orient_hyst(config.hysteresis);
            })
            .await?;

        self.device
            .z_block()
            .write_async(|w| {
                w.set_z_block(config.z_block_threshold);
            })
            .await?;

        Ok(())
    }

    /// Read accelerometer data
    ///
    /// Returns raw left-justified 16-bit values for X, Y, Z axes.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_accel(&mut self) -> Result<AccelData, Error<I::Error>> {
        // Read all 6 bytes in one transaction to prevent torn samples
        // Register addresses: ACC_X_LSB (0x02) through ACC_Z_MSB (0x07)
        const ACC_X_LSB: u8 = 0x02;
        let mut buffer = [0u8; 6];
        self.device
            .interface
            .read_register(ACC_X_LSB, 48, &mut buffer)
            .await?;

        let x = i16::from_le_bytes([buffer[0], buffer[1]]);
        let y = i16::from_le_bytes([buffer[2], buffer[3]]);
        let z = i16::from_le_bytes([buffer[4], buffer[5]]);

        Ok(AccelData { x, y, z })
    }

    /// Read accelerometer data scaled to g
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_accel_g(&mut self) -> Result<AccelDataG, Error<I::Error>> {
        let raw = self.read_accel().await?;
        Ok(AccelDataG::from_raw(
            raw.x,
            raw.y,
            raw.z,
            self.range.sensitivity(),
        ))
    }

    /// Read the hardware offset compensation registers
    ///
    /// Values are signed, 3.90625 mg per LSB; the device adds them to its
    /// output.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_offsets(&mut self) -> Result<[i8; 3], Error<I::Error>> {
        let x = self.device.offset_x().read_async().await?.offset_x();
        let y = self.device.offset_y().read_async().await?.offset_y();
        let z = self.device.offset_z().read_async().await?.offset_z();

        #[allow(clippy::cast_possible_wrap)]
        Ok([x as i8, y as i8, z as i8])
    }

    /// Write the hardware offset compensation registers
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn write_offsets(&mut self, offsets: [i8; 3]) -> Result<(), Error<I::Error>> {
        #[allow(clippy::cast_sign_loss)]
        let [x, y, z] = offsets.map(|value| value as u8);

        self.device
            .offset_x()
            .write_async(|w| {
                w.set_offset_x(x);
            })
            .await?;
        self.device
            .offset_y()
            .write_async(|w| {
                w.set_offset_y(y);
            })
            .await?;
        self.device
            .offset_z()
            .write_async(|w| {
                w.set_offset_z(z);
            })
            .await?;

        Ok(())
    }

    /// Program a fitted bias into the hardware offset registers
    ///
    /// The programmed values cancel `calibration.bias`; the scale factor
    /// cannot be expressed in hardware and is ignored here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CalibrationOverflow`] if the bias does not fit the
    /// ±500 mg offset span, or an error if communication with the device
    /// fails.
    pub async fn apply_offsets(
        &mut self,
        calibration: &BiasCalibration,
    ) -> Result<(), Error<I::Error>> {
        let registers = calibration
            .offset_registers()
            .ok_or(Error::CalibrationOverflow)?;

        self.write_offsets(registers).await?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Offset registers programmed: x={}, y={}, z={}",
            registers[0],
            registers[1],
            registers[2]
        );

        Ok(())
    }

    /// Calibrate the offsets with the default motion detection threshold.
    ///
    /// Convenience wrapper for
    /// [`calibrate_offsets_with_threshold`](Self::calibrate_offsets_with_threshold)
    /// using the default threshold divisor (5% of full scale).
    ///
    /// # Arguments
    ///
    /// * `samples` - Number of samples to average (more samples = better accuracy)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails or if the
    /// device is moving during calibration.
    pub async fn calibrate_offsets(
        &mut self,
        samples: u16,
    ) -> Result<BiasCalibration, Error<I::Error>> {
        self.calibrate_offsets_with_threshold(samples, DEFAULT_MOTION_DETECTION_THRESHOLD_DIVISOR)
            .await
    }

    /// Calibrate the offsets by averaging samples in a single orientation.
    ///
    /// The device must rest on a level surface with the Z-axis pointing up:
    /// X and Y are expected to read zero and Z to read +1 g, and the
    /// deviation is programmed into the hardware offset registers. For a
    /// calibration that does not require a level surface, use the
    /// four-orientation workflow starting at
    /// [`calibration_begin`](Self::calibration_begin).
    ///
    /// # Arguments
    ///
    /// * `samples` - Number of samples to average (more samples = better accuracy)
    /// * `motion_threshold_divisor` - Controls motion detection sensitivity.
    ///   Smaller values are more lenient (allow more spread).
    ///   - 100: Very strict (1% spread allowed)
    ///   - 33: Strict (3% spread allowed)
    ///   - 20: Balanced (5% spread allowed, recommended)
    ///   - 10: Lenient (10% spread allowed)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails, if the
    /// device is moving during calibration, or if the measured bias does
    /// not fit the offset registers.
    pub async fn calibrate_offsets_with_threshold(
        &mut self,
        samples: u16,
        motion_threshold_divisor: i16,
    ) -> Result<BiasCalibration, Error<I::Error>> {
        // Validate input
        if samples == 0 {
            return Err(Error::InvalidConfig);
        }

        let mut sum_x: i64 = 0;
        let mut sum_y: i64 = 0;
        let mut sum_z: i64 = 0;

        // For motion detection
        let mut min_x = i16::MAX;
        let mut max_x = i16::MIN;
        let mut min_y = i16::MAX;
        let mut max_y = i16::MIN;
        let mut min_z = i16::MAX;
        let mut max_z = i16::MIN;

        for _ in 0..samples {
            let accel_data = self.read_accel().await?;
            sum_x += i64::from(accel_data.x);
            sum_y += i64::from(accel_data.y);
            sum_z += i64::from(accel_data.z);

            // Track spread for motion detection
            min_x = min_x.min(accel_data.x);
            max_x = max_x.max(accel_data.x);
            min_y = min_y.min(accel_data.y);
            max_y = max_y.max(accel_data.y);
            min_z = min_z.min(accel_data.z);
            max_z = max_z.max(accel_data.z);
        }

        // Check for motion during calibration
        #[allow(clippy::cast_possible_truncation)]
        let max_spread = self.range.sensitivity() as i16 / motion_threshold_divisor;

        let spread_x = max_x.saturating_sub(min_x);
        let spread_y = max_y.saturating_sub(min_y);
        let spread_z = max_z.saturating_sub(min_z);

        if spread_x > max_spread || spread_y > max_spread || spread_z > max_spread {
            return Err(Error::DeviceMoving);
        }

        let avg_x = i16::try_from(sum_x / i64::from(samples)).map_err(|_| Error::InvalidConfig)?;
        let avg_y = i16::try_from(sum_y / i64::from(samples)).map_err(|_| Error::InvalidConfig)?;
        let avg_z = i16::try_from(sum_z / i64::from(samples)).map_err(|_| Error::InvalidConfig)?;

        // X and Y should read zero, Z should read +1 g
        let sensitivity = self.range.sensitivity();
        let calibration = BiasCalibration {
            bias: AccelDataG {
                x: f32::from(avg_x) / sensitivity,
                y: f32::from(avg_y) / sensitivity,
                z: f32::from(avg_z) / sensitivity - 1.0,
            },
            scale: 1.0,
        };

        self.apply_offsets(&calibration).await?;

        Ok(calibration)
    }

    /// Start a four-orientation calibration session
    ///
    /// Captures the current acquisition configuration, then switches the
    /// device to ±2 g range, 14-bit resolution, normal power and 1000 Hz
    /// output with the new-data interrupt enabled, and zeroes the offset
    /// registers so the captured samples are uncompensated. The original
    /// configuration is restored by
    /// [`calibration_finish`](Self::calibration_finish).
    ///
    /// Unlike [`calibrate_offsets`](Self::calibrate_offsets) this workflow
    /// needs no level surface: any four stable orientations work, and the
    /// result is graded by how well they were chosen.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut session = driver.calibration_begin().await?;
    /// for _ in 0..4 {
    ///     // Place the device in a new stable orientation, then:
    ///     driver.calibration_capture(&mut session, &mut delay).await?;
    /// }
    /// let outcome = driver.calibration_finish(session).await?;
    /// driver.apply_offsets(&outcome.calibration).await?;
    /// ```
    pub async fn calibration_begin(&mut self) -> Result<CalibrationSession, Error<I::Error>> {
        const RES_RANGE: u8 = 0x0F;
        const INT_SET_1: u8 = 0x17;
        const OFFSET_X: u8 = 0x38;

        // Capture the acquisition-related registers as raw bytes so the
        // session can restore them bit-exactly
        let mut config = [0u8; 3];
        self.device
            .interface
            .read_register(RES_RANGE, 24, &mut config)
            .await?;
        let mut int_set_1 = [0u8; 1];
        self.device
            .interface
            .read_register(INT_SET_1, 8, &mut int_set_1)
            .await?;
        let mut offsets = [0u8; 3];
        self.device
            .interface
            .read_register(OFFSET_X, 24, &mut offsets)
            .await?;

        let snapshot = AcquisitionSnapshot {
            res_range: config[0],
            odr_axis: config[1],
            power_bw: config[2],
            int_set_1: int_set_1[0],
            offsets,
        };

        // Acquisition configuration: most sensitive range, full
        // resolution, fastest conversion
        self.set_range(Range::G2).await?;
        self.set_resolution(Resolution::Bits14).await?;
        self.set_power_mode(PowerMode::Normal).await?;
        self.set_data_rate(DataRate::Hz1000).await?;
        self.device
            .int_set_1()
            .modify_async(|w| {
                w.set_new_data_int_en(true);
            })
            .await?;
        self.write_offsets([0; 3]).await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Calibration session started");

        Ok(CalibrationSession::new(snapshot))
    }

    /// Capture one averaged orientation sample into a session
    ///
    /// Hold the device still in a new orientation before calling. Averages
    /// 100 readings and records the mean and its noise; at the 1000 Hz
    /// acquisition rate this takes about 100 ms.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the session already holds four
    /// orientations, [`Error::DeviceMoving`] if the readings spread too far
    /// (re-settle and retry), [`Error::DataTimeout`] if the device stops
    /// producing samples, or an error if communication fails.
    pub async fn calibration_capture<D>(
        &mut self,
        session: &mut CalibrationSession,
        delay: &mut D,
    ) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        if session.is_complete() {
            return Err(Error::InvalidConfig);
        }

        let (mean, variance) = self
            .read_averaged_sample(delay, SAMPLES_PER_ORIENTATION)
            .await?;
        session.push(mean, variance);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Captured orientation {}/{}",
            session.captured(),
            calibration::SESSION_SAMPLES
        );

        Ok(())
    }

    /// Finish a calibration session: restore the device, fit and grade
    ///
    /// Restores the configuration captured by
    /// [`calibration_begin`](Self::calibration_begin), fits the sphere
    /// through the four orientation samples and scores the result. The
    /// returned [`CalibrationOutcome`] is owned by the caller; nothing is
    /// programmed into the device until
    /// [`apply_offsets`](Self::apply_offsets) is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the session is not complete,
    /// [`Error::DegenerateGeometry`] if the orientations are too similar to
    /// determine a sphere (choose more distinct orientations and start
    /// over), [`Error::InvalidQuality`] if the fit produced a non-physical
    /// grade, or an error if communication with the device fails. The
    /// device configuration is restored even when the fit fails.
    pub async fn calibration_finish(
        &mut self,
        session: CalibrationSession,
    ) -> Result<CalibrationOutcome, Error<I::Error>> {
        self.calibration_finish_with(session, harmonic_score).await
    }

    /// Finish a calibration session with a caller-supplied scoring curve
    ///
    /// Identical to [`calibration_finish`](Self::calibration_finish) except
    /// the mapping from fit quality to confidence score.
    ///
    /// # Errors
    ///
    /// Same as [`calibration_finish`](Self::calibration_finish).
    pub async fn calibration_finish_with(
        &mut self,
        session: CalibrationSession,
        score_fn: ScoreFn,
    ) -> Result<CalibrationOutcome, Error<I::Error>> {
        if !session.is_complete() {
            return Err(Error::InvalidConfig);
        }

        // Restore the captured configuration before touching the math, so
        // a degenerate fit cannot leave the acquisition settings active
        let snapshot = session.snapshot;
        for (address, value) in [
            (0x0F, snapshot.res_range),
            (0x10, snapshot.odr_axis),
            (0x11, snapshot.power_bw),
            (0x17, snapshot.int_set_1),
            (0x38, snapshot.offsets[0]),
            (0x39, snapshot.offsets[1]),
            (0x3A, snapshot.offsets[2]),
        ] {
            self.device
                .interface
                .write_register(address, 8, &[value])
                .await?;
        }
        self.cache_snapshot_settings(&snapshot);

        let outcome = calibration::evaluate_session(session.samples, session.variances, score_fn)
            .map_err(|error| match error {
                SessionError::DegenerateGeometry => Error::DegenerateGeometry,
                SessionError::InvalidQuality => Error::InvalidQuality,
            })?;

        #[cfg(feature = "defmt")]
        {
            let resolution_g = calibration::OFFSET_MG_PER_LSB / 1000.0;
            let uncertainty = outcome.axis_uncertainty;
            if uncertainty.x > resolution_g
                || uncertainty.y > resolution_g
                || uncertainty.z > resolution_g
            {
                defmt::warn!("Calibration uncertainty exceeds the offset register resolution");
            }
            if outcome.calibration.offset_registers().is_none() {
                defmt::warn!("Fitted bias exceeds the hardware offset span");
            }
        }

        Ok(outcome)
    }

    /// Average `count` fresh samples and estimate the noise of the mean
    async fn read_averaged_sample<D>(
        &mut self,
        delay: &mut D,
        count: u16,
    ) -> Result<(AccelDataG, [f32; 3]), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        const MAX_WAIT_MS: u32 = 100;
        const POLL_INTERVAL_MS: u32 = 1;

        if count == 0 {
            return Err(Error::InvalidConfig);
        }

        let sensitivity = self.range.sensitivity();
        #[allow(clippy::cast_possible_truncation)]
        let max_spread = sensitivity as i16 / DEFAULT_MOTION_DETECTION_THRESHOLD_DIVISOR;

        let mut stats = [RunningStats::new(); 3];
        let mut min = [i16::MAX; 3];
        let mut max = [i16::MIN; 3];

        for _ in 0..count {
            // Wait for a fresh conversion
            let mut ready = false;
            for _ in 0..(MAX_WAIT_MS / POLL_INTERVAL_MS) {
                if self.new_data_ready().await? {
                    ready = true;
                    break;
                }
                delay.delay_ms(POLL_INTERVAL_MS).await;
            }
            if !ready {
                return Err(Error::DataTimeout);
            }

            let data = self.read_accel().await?;
            for (axis, value) in [data.x, data.y, data.z].into_iter().enumerate() {
                min[axis] = min[axis].min(value);
                max[axis] = max[axis].max(value);
                stats[axis].push(f32::from(value) / sensitivity);
            }
        }

        for axis in 0..3 {
            if max[axis].saturating_sub(min[axis]) > max_spread {
                return Err(Error::DeviceMoving);
            }
        }

        let mean = AccelDataG {
            x: stats[0].mean(),
            y: stats[1].mean(),
            z: stats[2].mean(),
        };
        let variance = [
            stats[0].variance_of_mean(),
            stats[1].variance_of_mean(),
            stats[2].variance_of_mean(),
        ];

        Ok((mean, variance))
    }
}
