//! Calibration confidence scoring
//!
//! Turns the geometry quality from [`crate::calibration::geometry`] into a
//! bounded confidence figure. The quality says how much the chosen
//! orientations amplify measurement noise into the fitted bias; the score
//! compresses that into (0, 1] where 1.0 is the ideal orientation set.
//!
//! The score approximates the cumulative fraction of uniformly random
//! four-orientation choices that would calibrate at least as well as the
//! one just performed: a score of 0.21 means roughly 21% of random
//! orientation sets do as well or better. The closed form was fitted
//! against Monte-Carlo simulation of that distribution; it is an
//! approximation, not an exact law, and is kept pluggable for that reason.

/// Floor below which a quality value is treated as a contract violation
const MIN_QUALITY: f32 = 1e-6;

/// A non-physical quality or noise value was passed to the scorer.
///
/// This is a contract violation by the caller, not an environmental
/// fault: quality must be finite and positive (the solver produces values
/// >= 1.0), and the noise sigma must be finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidQualityError;

/// Scored calibration uncertainty
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UncertaintyScore {
    /// How much wider the calibration's error bar is than the sensor's
    /// own noise floor; 1.0 means the orientations added nothing
    pub normalized_uncertainty: f32,
    /// Confidence in (0, 1], 1.0 for the ideal orientation set
    pub score: f32,
}

/// A scoring function mapping normalized uncertainty to a score
pub type ScoreFn = fn(f32) -> f32;

/// The fitted scoring curve: `2 / (uq + 1/uq)`
///
/// Evaluates to 1.0 at `uq = 1`, decreases strictly for `uq > 1` and
/// tends to zero as `uq` grows. The form is symmetric under
/// `uq <-> 1/uq`, which is physically meaningful because the solver
/// guarantees `uq >= 1` by normalizing against the true geometric
/// optimum.
#[must_use]
pub fn harmonic_score(uq: f32) -> f32 {
    2.0 / (uq + 1.0 / uq)
}

/// Score a calibration with the default scoring curve
///
/// `quality` comes from the sphere fit; `sensor_noise_sigma` is the
/// pooled per-axis measurement noise of the samples, in g. The sigma
/// scales the absolute error bar but cancels out of the normalized
/// figure, so it participates in validation only.
///
/// # Errors
///
/// Returns [`InvalidQualityError`] if `quality` is not finite and
/// positive, or if `sensor_noise_sigma` is negative or not finite.
pub fn score(
    quality: f32,
    sensor_noise_sigma: f32,
) -> Result<UncertaintyScore, InvalidQualityError> {
    score_with(quality, sensor_noise_sigma, harmonic_score)
}

/// Score a calibration with a caller-supplied scoring curve
///
/// Validation is identical to [`score`]; only the quality-to-score
/// mapping changes.
///
/// # Errors
///
/// Returns [`InvalidQualityError`] under the same conditions as
/// [`score`].
pub fn score_with(
    quality: f32,
    sensor_noise_sigma: f32,
    score_fn: ScoreFn,
) -> Result<UncertaintyScore, InvalidQualityError> {
    if !quality.is_finite() || quality < MIN_QUALITY {
        return Err(InvalidQualityError);
    }
    if !sensor_noise_sigma.is_finite() || sensor_noise_sigma < 0.0 {
        return Err(InvalidQualityError);
    }

    let normalized_uncertainty = quality;
    Ok(UncertaintyScore {
        normalized_uncertainty,
        score: score_fn(normalized_uncertainty),
    })
}
