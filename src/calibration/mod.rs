//! Zero-g offset calibration
//!
//! A static accelerometer measures gravity only: hold the device still in
//! any orientation and the reading is a point on a sphere of radius 1 g.
//! A constant per-axis bias shifts that sphere's center away from zero
//! without changing its radius, so four sufficiently distinct orientations
//! determine the bias as the center of the sphere through the four
//! averaged readings. No reference surface or precise alignment is needed.
//!
//! [`geometry`] fits the sphere and grades the chosen orientations;
//! [`score`] turns the grade into a confidence figure. The driver
//! orchestrates acquisition through `calibration_begin`,
//! `calibration_capture` and `calibration_finish` on
//! [`Msa301Driver`](crate::device::Msa301Driver). The resulting
//! [`BiasCalibration`] is owned by the caller, who applies it in software
//! with [`BiasCalibration::apply`] or programs it into the hardware
//! offset registers with the driver's `apply_offsets`.

pub mod geometry;
pub mod score;

use crate::accelerometer::AccelDataG;

/// Offset register resolution, mg per LSB
pub const OFFSET_MG_PER_LSB: f32 = 3.906_25;

/// Number of orientations a calibration session captures
pub const SESSION_SAMPLES: usize = 4;

/// A fitted zero-g offset correction
///
/// Produced by a calibration session and owned by the caller; the driver
/// never stores or applies one on its own. Apply it in software with
/// [`apply`](Self::apply), program the bias part into the hardware offset
/// registers with the driver's `apply_offsets`, or persist it through a
/// [`BiasStore`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BiasCalibration {
    /// Zero-g offset per axis, in g
    pub bias: AccelDataG,
    /// Shared sensitivity correction from the fitted sphere radius
    ///
    /// A perfectly calibrated part reads exactly 1 g when static; the
    /// reciprocal of the fitted radius corrects a uniform deviation.
    /// Hardware offsets cannot express this, so it only takes effect
    /// through [`apply`](Self::apply).
    pub scale: f32,
}

impl Default for BiasCalibration {
    fn default() -> Self {
        Self {
            bias: AccelDataG {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            scale: 1.0,
        }
    }
}

impl BiasCalibration {
    /// Correct a measurement: subtract the bias, then rescale
    #[must_use]
    pub fn apply(&self, sample: AccelDataG) -> AccelDataG {
        AccelDataG {
            x: (sample.x - self.bias.x) * self.scale,
            y: (sample.y - self.bias.y) * self.scale,
            z: (sample.z - self.bias.z) * self.scale,
        }
    }

    /// Offset-register values cancelling this bias
    ///
    /// The device adds the offset registers to its output, so the
    /// programmed values are the negated bias, quantized to the
    /// 3.90625 mg register step. Returns `None` when an axis falls
    /// outside the ±500 mg register span.
    #[must_use]
    pub fn offset_registers(&self) -> Option<[i8; 3]> {
        Some([
            offset_lsb(self.bias.x)?,
            offset_lsb(self.bias.y)?,
            offset_lsb(self.bias.z)?,
        ])
    }

    /// Reconstruct the bias cancelled by a set of offset-register values
    #[must_use]
    pub fn from_offset_registers(registers: [i8; 3]) -> Self {
        Self {
            bias: AccelDataG {
                x: cancelled_bias_g(registers[0]),
                y: cancelled_bias_g(registers[1]),
                z: cancelled_bias_g(registers[2]),
            },
            scale: 1.0,
        }
    }
}

fn offset_lsb(bias_g: f32) -> Option<i8> {
    let lsb = libm::roundf(-bias_g * 1000.0 / OFFSET_MG_PER_LSB);
    if lsb < f32::from(i8::MIN) || lsb > f32::from(i8::MAX) {
        return None;
    }
    Some(lsb as i8)
}

fn cancelled_bias_g(lsb: i8) -> f32 {
    -f32::from(lsb) * OFFSET_MG_PER_LSB / 1000.0
}

/// Persistence seam for calibration values
///
/// The storage medium is up to the implementation (flash page, EEPROM,
/// host filesystem). Values must round-trip bit-exactly.
pub trait BiasStore {
    /// Storage error
    type Error;

    /// Persist a calibration, replacing any previous one
    fn save(&mut self, calibration: &BiasCalibration) -> Result<(), Self::Error>;

    /// Load the stored calibration, if one was saved
    fn load(&self) -> Result<Option<BiasCalibration>, Self::Error>;
}

/// Volatile in-memory [`BiasStore`], for hosts and tests
#[derive(Debug, Default)]
pub struct MemoryBiasStore {
    stored: Option<BiasCalibration>,
}

impl MemoryBiasStore {
    /// Create an empty store
    #[must_use]
    pub const fn new() -> Self {
        Self { stored: None }
    }
}

impl BiasStore for MemoryBiasStore {
    type Error = core::convert::Infallible;

    fn save(&mut self, calibration: &BiasCalibration) -> Result<(), Self::Error> {
        self.stored = Some(*calibration);
        Ok(())
    }

    fn load(&self) -> Result<Option<BiasCalibration>, Self::Error> {
        Ok(self.stored)
    }
}

/// Online mean and variance accumulator (Welford's algorithm)
///
/// Numerically stable for long runs of samples; used to average readings
/// per orientation and to estimate the noise of that average.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningStats {
    count: u32,
    mean: f32,
    m2: f32,
}

impl RunningStats {
    /// Create an empty accumulator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Add one sample
    pub fn push(&mut self, value: f32) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f32;
        self.m2 += delta * (value - self.mean);
    }

    /// Number of samples pushed
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Mean of the pushed samples (0.0 when empty)
    #[must_use]
    pub const fn mean(&self) -> f32 {
        self.mean
    }

    /// Variance of the mean, `m2 / (n * (n - 1))`
    ///
    /// This is the squared standard error of [`mean`](Self::mean), not of
    /// an individual sample. Returns 0.0 for fewer than two samples.
    #[must_use]
    pub fn variance_of_mean(&self) -> f32 {
        if self.count < 2 {
            return 0.0;
        }
        self.m2 / (self.count as f32 * (self.count - 1) as f32)
    }
}

/// Raw register values captured by `calibration_begin` and written back
/// by `calibration_finish`, so a session leaves the device exactly as it
/// found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AcquisitionSnapshot {
    pub(crate) res_range: u8,
    pub(crate) odr_axis: u8,
    pub(crate) power_bw: u8,
    pub(crate) int_set_1: u8,
    pub(crate) offsets: [u8; 3],
}

/// An in-progress four-orientation calibration
///
/// Created by the driver's `calibration_begin`; the caller owns it,
/// threads it through `calibration_capture` once per stable orientation,
/// and exchanges the full session for a [`CalibrationOutcome`] with
/// `calibration_finish`. Dropping a session without finishing leaves the
/// device in the acquisition configuration.
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    pub(crate) samples: [AccelDataG; SESSION_SAMPLES],
    pub(crate) variances: [[f32; 3]; SESSION_SAMPLES],
    pub(crate) count: usize,
    pub(crate) snapshot: AcquisitionSnapshot,
}

impl CalibrationSession {
    pub(crate) fn new(snapshot: AcquisitionSnapshot) -> Self {
        Self {
            samples: [AccelDataG {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            }; SESSION_SAMPLES],
            variances: [[0.0; 3]; SESSION_SAMPLES],
            count: 0,
            snapshot,
        }
    }

    /// Number of orientations captured so far
    #[must_use]
    pub fn captured(&self) -> usize {
        self.count
    }

    /// Whether all orientations have been captured
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.count == SESSION_SAMPLES
    }

    /// The averaged samples captured so far, in g
    #[must_use]
    pub fn samples(&self) -> &[AccelDataG] {
        &self.samples[..self.count]
    }

    pub(crate) fn push(&mut self, sample: AccelDataG, variance: [f32; 3]) {
        self.samples[self.count] = sample;
        self.variances[self.count] = variance;
        self.count += 1;
    }
}

/// Result of a completed calibration session
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationOutcome {
    /// The fitted correction, ready to apply or persist
    pub calibration: BiasCalibration,
    /// Orientation quality from the sphere fit, 1.0 for the geometric
    /// optimum
    pub quality: f32,
    /// Error-bar width relative to the sensor's own noise floor
    pub normalized_uncertainty: f32,
    /// Confidence in (0, 1]
    pub score: f32,
    /// Standard error of the fitted bias per axis, in g
    pub axis_uncertainty: AccelDataG,
    /// Pooled per-sample radial noise sigma, in g
    pub noise_sigma: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionError {
    DegenerateGeometry,
    InvalidQuality,
}

/// Fit, grade and score a complete set of session samples.
///
/// Pure; shared by the blocking and async `calibration_finish`.
pub(crate) fn evaluate_session(
    samples: [AccelDataG; SESSION_SAMPLES],
    variances: [[f32; 3]; SESSION_SAMPLES],
    score_fn: score::ScoreFn,
) -> Result<CalibrationOutcome, SessionError> {
    let (fit, sensitivities) = geometry::solve_with_sensitivities(samples)
        .map_err(|_| SessionError::DegenerateGeometry)?;

    // Noise sigma per sample along its radial direction, the direction
    // the fit responds to, projected from the per-axis variances.
    let mut sigmas = [0.0f32; SESSION_SAMPLES];
    let mut pooled_sq = 0.0f32;
    for (i, (sample, variance)) in samples.iter().zip(&variances).enumerate() {
        let radial = AccelDataG {
            x: sample.x - fit.center.x,
            y: sample.y - fit.center.y,
            z: sample.z - fit.center.z,
        }
        .normalize();
        let var = radial.x * radial.x * variance[0]
            + radial.y * radial.y * variance[1]
            + radial.z * radial.z * variance[2];
        sigmas[i] = libm::sqrtf(var);
        pooled_sq += var;
    }
    let noise_sigma = libm::sqrtf(pooled_sq / SESSION_SAMPLES as f32);

    let scored = score::score_with(fit.quality, noise_sigma, score_fn)
        .map_err(|_| SessionError::InvalidQuality)?;

    // First-order propagation of each sample's noise through the fit
    // into the center estimate, per axis
    let mut axis_var = [0.0f32; 3];
    for (sensitivity, sigma) in sensitivities.iter().zip(&sigmas) {
        for (var, s) in axis_var.iter_mut().zip(sensitivity) {
            let shift = s * sigma;
            *var += shift * shift;
        }
    }
    let axis_uncertainty = AccelDataG {
        x: libm::sqrtf(axis_var[0]),
        y: libm::sqrtf(axis_var[1]),
        z: libm::sqrtf(axis_var[2]),
    };

    Ok(CalibrationOutcome {
        calibration: BiasCalibration {
            bias: fit.center,
            scale: 1.0 / fit.radius,
        },
        quality: fit.quality,
        normalized_uncertainty: scored.normalized_uncertainty,
        score: scored.score,
        axis_uncertainty,
        noise_sigma,
    })
}
