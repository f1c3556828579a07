//! Register definitions for the MSA301
//!
//! This module contains the register definitions for the MSA301 accelerometer.
//! The MSA301 has a flat 8-bit register space; acceleration data is stored as
//! left-justified little-endian 16-bit values in 0x02-0x07, and the offset
//! compensation registers live at 0x38-0x3A.
//!
//! Reset values listed per register are the power-on defaults from the
//! datasheet; [`crate::Msa301Driver::reset_defaults`] writes them back
//! explicitly.

device_driver::create_device!(
    device_name: Msa301,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = LE;
        }

        // ==================== IDENTIFICATION AND RESET ====================

        /// SOFT_RESET - Soft Reset (0x00)
        /// Writing 1 to `soft_reset` reloads all registers with their defaults.
        register SoftReset {
            const ADDRESS = 0x00;
            const SIZE_BITS = 8;

            reserved_4_0: uint = 0..5,
            /// Trigger a soft reset
            soft_reset: bool = 5,
            reserved_7_6: uint = 6..8,
        },

        /// PART_ID - Device ID Register (0x01)
        /// Expected value: 0x13
        register PartId {
            const ADDRESS = 0x01;
            const SIZE_BITS = 8;

            /// Device ID (should read 0x13)
            part_id: uint = 0..8,
        },

        // ==================== ACCELERATION DATA ====================
        // Left-justified little-endian 16-bit values; at resolutions below
        // 14 bits the unused low bits read zero.

        /// ACC_X_LSB - X-axis Acceleration Low Byte (0x02)
        register AccXLsb {
            const ADDRESS = 0x02;
            const SIZE_BITS = 8;

            /// X-axis acceleration data low byte
            acc_x_lsb: uint = 0..8,
        },

        /// ACC_X_MSB - X-axis Acceleration High Byte (0x03)
        register AccXMsb {
            const ADDRESS = 0x03;
            const SIZE_BITS = 8;

            /// X-axis acceleration data high byte
            acc_x_msb: uint = 0..8,
        },

        /// ACC_Y_LSB - Y-axis Acceleration Low Byte (0x04)
        register AccYLsb {
            const ADDRESS = 0x04;
            const SIZE_BITS = 8;

            /// Y-axis acceleration data low byte
            acc_y_lsb: uint = 0..8,
        },

        /// ACC_Y_MSB - Y-axis Acceleration High Byte (0x05)
        register AccYMsb {
            const ADDRESS = 0x05;
            const SIZE_BITS = 8;

            /// Y-axis acceleration data high byte
            acc_y_msb: uint = 0..8,
        },

        /// ACC_Z_LSB - Z-axis Acceleration Low Byte (0x06)
        register AccZLsb {
            const ADDRESS = 0x06;
            const SIZE_BITS = 8;

            /// Z-axis acceleration data low byte
            acc_z_lsb: uint = 0..8,
        },

        /// ACC_Z_MSB - Z-axis Acceleration High Byte (0x07)
        register AccZMsb {
            const ADDRESS = 0x07;
            const SIZE_BITS = 8;

            /// Z-axis acceleration data high byte
            acc_z_msb: uint = 0..8,
        },

        // ==================== INTERRUPT STATUS ====================

        /// MOTION_INTERRUPT - Motion Interrupt Status (0x09)
        register MotionInterrupt {
            const ADDRESS = 0x09;
            const SIZE_BITS = 8;

            /// Freefall interrupt active
            freefall_int: bool = 0,
            reserved_1: uint = 1..2,
            /// Activity interrupt active
            active_int: bool = 2,
            reserved_3: uint = 3..4,
            /// Double-tap interrupt active
            d_tap_int: bool = 4,
            /// Single-tap interrupt active
            s_tap_int: bool = 5,
            /// Orientation interrupt active
            orient_int: bool = 6,
            reserved_7: uint = 7..8,
        },

        /// DATA_INTERRUPT - Data Interrupt Status (0x0A)
        register DataInterrupt {
            const ADDRESS = 0x0A;
            const SIZE_BITS = 8;

            /// New data ready
            new_data_int: bool = 0,
            reserved_7_1: uint = 1..8,
        },

        /// TAP_ACTIVE_STATUS - Tap and Activity Source (0x0B)
        /// Identifies which axis and sign triggered the most recent tap or
        /// activity interrupt.
        register TapActiveStatus {
            const ADDRESS = 0x0B;
            const SIZE_BITS = 8;

            /// Z-axis triggered the activity interrupt
            active_first_z: bool = 0,
            /// Y-axis triggered the activity interrupt
            active_first_y: bool = 1,
            /// X-axis triggered the activity interrupt
            active_first_x: bool = 2,
            /// Sign of the activity trigger (1 = negative)
            active_sign: bool = 3,
            /// Z-axis triggered the tap interrupt
            tap_first_z: bool = 4,
            /// Y-axis triggered the tap interrupt
            tap_first_y: bool = 5,
            /// X-axis triggered the tap interrupt
            tap_first_x: bool = 6,
            /// Sign of the tap trigger (1 = negative)
            tap_sign: bool = 7,
        },

        /// ORIENTATION_STATUS - Orientation Source (0x0C)
        register OrientationStatus {
            const ADDRESS = 0x0C;
            const SIZE_BITS = 8;

            reserved_3_0: uint = 0..4,
            /// Portrait/landscape orientation:
            /// 0 = portrait upright
            /// 1 = portrait upside down
            /// 2 = landscape left
            /// 3 = landscape right
            orient_xy: uint = 4..6,
            /// Z orientation (0 = upward looking, 1 = downward looking)
            orient_z: bool = 6,
            reserved_7: uint = 7..8,
        },

        // ==================== MEASUREMENT CONFIGURATION ====================

        /// RES_RANGE - Resolution and Range (0x0F)
        /// Reset value: 0x00 (14-bit, ±2g)
        register ResRange {
            const ADDRESS = 0x0F;
            const SIZE_BITS = 8;

            /// Full-scale range (0=±2g, 1=±4g, 2=±8g, 3=±16g)
            range: uint = 0..2,
            /// Output resolution (0=14-bit, 1=12-bit, 2=10-bit, 3=8-bit)
            resolution: uint = 2..4,
            reserved_7_4: uint = 4..8,
        },

        /// ODR - Output Data Rate and Axis Enable (0x10)
        /// Reset value: 0x0F
        register Odr {
            const ADDRESS = 0x10;
            const SIZE_BITS = 8;

            /// Output data rate:
            /// 0b0000 = 1 Hz (low power only)
            /// 0b0001 = 1.95 Hz (low power only)
            /// 0b0010 = 3.9 Hz
            /// 0b0011 = 7.81 Hz
            /// 0b0100 = 15.63 Hz
            /// 0b0101 = 31.25 Hz
            /// 0b0110 = 62.5 Hz
            /// 0b0111 = 125 Hz
            /// 0b1000 = 250 Hz
            /// 0b1001 = 500 Hz (normal mode only)
            /// 0b1010 = 1000 Hz (normal mode only)
            odr: uint = 0..4,
            reserved_4: uint = 4..5,
            /// Disable Z-axis measurement
            z_axis_disable: bool = 5,
            /// Disable Y-axis measurement
            y_axis_disable: bool = 6,
            /// Disable X-axis measurement
            x_axis_disable: bool = 7,
        },

        /// POWER_MODE - Power Mode and Low-Power Bandwidth (0x11)
        /// Reset value: 0x9E (suspend)
        register PowerMode {
            const ADDRESS = 0x11;
            const SIZE_BITS = 8;

            reserved_0: uint = 0..1,
            /// Low-power mode bandwidth:
            /// 0b0010 = 1.95 Hz
            /// 0b0011 = 3.9 Hz
            /// 0b0100 = 7.81 Hz
            /// 0b0101 = 15.63 Hz
            /// 0b0110 = 31.25 Hz
            /// 0b0111 = 62.5 Hz
            /// 0b1000 = 125 Hz
            /// 0b1001 = 250 Hz
            /// 0b1010 = 500 Hz
            low_power_bandwidth: uint = 1..5,
            reserved_5: uint = 5..6,
            /// Power mode (0=normal, 1=low power, 2=suspend)
            power_mode: uint = 6..8,
        },

        /// SWAP_POLARITY - Axis Polarity and Swap (0x12)
        /// Reset value: 0x00
        register SwapPolarity {
            const ADDRESS = 0x12;
            const SIZE_BITS = 8;

            /// Exchange the X and Y axes
            xy_swap: bool = 0,
            /// Invert the Z-axis sign
            z_polarity: bool = 1,
            /// Invert the Y-axis sign
            y_polarity: bool = 2,
            /// Invert the X-axis sign
            x_polarity: bool = 3,
            reserved_7_4: uint = 4..8,
        },

        // ==================== INTERRUPT CONFIGURATION ====================

        /// INT_SET_0 - Motion Interrupt Enable (0x16)
        /// Reset value: 0x00
        register IntSet0 {
            const ADDRESS = 0x16;
            const SIZE_BITS = 8;

            /// Enable activity detection on the X-axis
            active_int_en_x: bool = 0,
            /// Enable activity detection on the Y-axis
            active_int_en_y: bool = 1,
            /// Enable activity detection on the Z-axis
            active_int_en_z: bool = 2,
            reserved_3: uint = 3..4,
            /// Enable the double-tap interrupt
            d_tap_int_en: bool = 4,
            /// Enable the single-tap interrupt
            s_tap_int_en: bool = 5,
            /// Enable the orientation interrupt
            orient_int_en: bool = 6,
            reserved_7: uint = 7..8,
        },

        /// INT_SET_1 - Data Interrupt Enable (0x17)
        /// Reset value: 0x00
        register IntSet1 {
            const ADDRESS = 0x17;
            const SIZE_BITS = 8;

            reserved_2_0: uint = 0..3,
            /// Enable the freefall interrupt
            freefall_int_en: bool = 3,
            /// Enable the new-data interrupt
            new_data_int_en: bool = 4,
            reserved_7_5: uint = 5..8,
        },

        /// INT_MAP_0 - Motion Interrupt Pin Mapping (0x19)
        /// Reset value: 0x00
        register IntMap0 {
            const ADDRESS = 0x19;
            const SIZE_BITS = 8;

            /// Route the freefall interrupt to the INT pin
            int_freefall: bool = 0,
            reserved_1: uint = 1..2,
            /// Route the activity interrupt to the INT pin
            int_active: bool = 2,
            reserved_3: uint = 3..4,
            /// Route the double-tap interrupt to the INT pin
            int_d_tap: bool = 4,
            /// Route the single-tap interrupt to the INT pin
            int_s_tap: bool = 5,
            /// Route the orientation interrupt to the INT pin
            int_orient: bool = 6,
            reserved_7: uint = 7..8,
        },

        /// INT_MAP_1 - Data Interrupt Pin Mapping (0x1A)
        /// Reset value: 0x00
        register IntMap1 {
            const ADDRESS = 0x1A;
            const SIZE_BITS = 8;

            /// Route the new-data interrupt to the INT pin
            int_new_data: bool = 0,
            reserved_7_1: uint = 1..8,
        },

        /// INT_CONFIG - Interrupt Pin Electrical Configuration (0x20)
        /// Reset value: 0x00
        register IntConfig {
            const ADDRESS = 0x20;
            const SIZE_BITS = 8;

            /// INT pin level (0 = active low, 1 = active high)
            int_pin_lvl: bool = 0,
            /// INT pin output type (0 = push-pull, 1 = open drain)
            int_pin_od: bool = 1,
            reserved_7_2: uint = 2..8,
        },

        /// INT_LATCH - Interrupt Latch Configuration (0x21)
        /// Reset value: 0x00
        register IntLatch {
            const ADDRESS = 0x21;
            const SIZE_BITS = 8;

            /// Latch mode:
            /// 0b0000 = non-latched
            /// 0b0001 = 250 ms
            /// 0b0010 = 500 ms
            /// 0b0011 = 1 s
            /// 0b0100 = 2 s
            /// 0b0101 = 4 s
            /// 0b0110 = 8 s
            /// 0b0111 = latched
            /// 0b1010 = 1 ms
            /// 0b1011 = 2 ms
            /// 0b1100 = 25 ms
            /// 0b1101 = 50 ms
            /// 0b1110 = 100 ms
            latch_int: uint = 0..4,
            reserved_6_4: uint = 4..7,
            /// Clear any latched interrupt
            reset_int: bool = 7,
        },

        // ==================== MOTION ENGINE CONFIGURATION ====================

        /// FREEFALL_DUR - Freefall Duration (0x22)
        /// Reset value: 0x09 (20 ms)
        register FreefallDur {
            const ADDRESS = 0x22;
            const SIZE_BITS = 8;

            /// Freefall duration; delay = (value + 1) * 2 ms
            freefall_dur: uint = 0..8,
        },

        /// FREEFALL_TH - Freefall Threshold (0x23)
        /// Reset value: 0x30 (375 mg)
        register FreefallTh {
            const ADDRESS = 0x23;
            const SIZE_BITS = 8;

            /// Freefall threshold; threshold = value * 7.8125 mg
            freefall_th: uint = 0..8,
        },

        /// FREEFALL_HY - Freefall Hysteresis (0x24)
        /// Reset value: 0x01
        register FreefallHy {
            const ADDRESS = 0x24;
            const SIZE_BITS = 8;

            /// Freefall hysteresis; hysteresis = value * 125 mg
            freefall_hy: uint = 0..2,
            /// Freefall mode (0 = single, 1 = sum)
            freefall_mode: bool = 2,
            reserved_7_3: uint = 3..8,
        },

        /// ACTIVE_DUR - Activity Duration (0x27)
        /// Reset value: 0x00
        register ActiveDur {
            const ADDRESS = 0x27;
            const SIZE_BITS = 8;

            /// Activity duration; duration = (value + 1) ms
            active_dur: uint = 0..2,
            reserved_7_2: uint = 2..8,
        },

        /// ACTIVE_TH - Activity Threshold (0x28)
        /// Reset value: 0x14
        register ActiveTh {
            const ADDRESS = 0x28;
            const SIZE_BITS = 8;

            /// Activity threshold; threshold = value * range / 512 g
            active_th: uint = 0..8,
        },

        /// TAP_DUR - Tap Duration (0x2A)
        /// Reset value: 0x04
        register TapDur {
            const ADDRESS = 0x2A;
            const SIZE_BITS = 8;

            /// Double-tap window:
            /// 0b000 = 50 ms,  0b001 = 100 ms, 0b010 = 150 ms, 0b011 = 200 ms
            /// 0b100 = 250 ms, 0b101 = 375 ms, 0b110 = 500 ms, 0b111 = 700 ms
            tap_dur: uint = 0..3,
            reserved_5_3: uint = 3..6,
            /// Tap shock window (0 = 70 ms, 1 = 50 ms)
            tap_shock: bool = 6,
            /// Tap quiet window (0 = 30 ms, 1 = 20 ms)
            tap_quiet: bool = 7,
        },

        /// TAP_TH - Tap Threshold (0x2B)
        /// Reset value: 0x0A
        register TapTh {
            const ADDRESS = 0x2B;
            const SIZE_BITS = 8;

            /// Tap threshold; threshold = value * range / 32 g
            tap_th: uint = 0..5,
            reserved_7_5: uint = 5..8,
        },

        /// ORIENT_HY - Orientation Hysteresis and Mode (0x2C)
        /// Reset value: 0x18
        register OrientHy {
            const ADDRESS = 0x2C;
            const SIZE_BITS = 8;

            /// Orientation mode (0 = symmetrical, 1 = high asymmetrical,
            /// 2 = low asymmetrical)
            orient_mode: uint = 0..2,
            /// Z-axis blocking (0 = none, 1 = z-axis, 2 = z-axis and slope)
            orient_blocking: uint = 2..4,
            /// Orientation hysteresis; hysteresis = value * 62.5 mg
            orient_hyst: uint = 4..7,
            reserved_7: uint = 7..8,
        },

        /// Z_BLOCK - Orientation Z Blocking Threshold (0x2D)
        /// Reset value: 0x08 (500 mg)
        register ZBlock {
            const ADDRESS = 0x2D;
            const SIZE_BITS = 8;

            /// Z blocking threshold; threshold = value * 62.5 mg
            z_block: uint = 0..4,
            reserved_7_4: uint = 4..8,
        },

        // ==================== OFFSET COMPENSATION ====================
        // Two's-complement, 3.90625 mg/LSB. The compensation value is added
        // to the acceleration output by the sensor.

        /// OFFSET_X - X-axis Offset Compensation (0x38)
        /// Reset value: 0x00
        register OffsetX {
            const ADDRESS = 0x38;
            const SIZE_BITS = 8;

            /// X-axis offset, two's-complement, 3.90625 mg/LSB
            offset_x: uint = 0..8,
        },

        /// OFFSET_Y - Y-axis Offset Compensation (0x39)
        /// Reset value: 0x00
        register OffsetY {
            const ADDRESS = 0x39;
            const SIZE_BITS = 8;

            /// Y-axis offset, two's-complement, 3.90625 mg/LSB
            offset_y: uint = 0..8,
        },

        /// OFFSET_Z - Z-axis Offset Compensation (0x3A)
        /// Reset value: 0x00
        register OffsetZ {
            const ADDRESS = 0x3A;
            const SIZE_BITS = 8;

            /// Z-axis offset, two's-complement, 3.90625 mg/LSB
            offset_z: uint = 0..8,
        }
    }
);

// Re-export commonly used types for convenience
pub use Msa301 as RegisterDevice;
