//! Sphere fit through four gravity samples
//!
//! While the device sits still, the accelerometer measures gravity plus a
//! constant zero-g bias. Samples taken in different orientations therefore
//! lie on a sphere whose center is the bias and whose radius is the local
//! gravity magnitude. Four samples determine that sphere exactly: expanding
//! `|p_i - c|^2 = r^2` and subtracting the first sample's equation from the
//! other three eliminates `r^2` and leaves a 3x3 linear system in the
//! center `c`, solved here by Cramer's rule.
//!
//! The system's determinant is proportional to the volume of the
//! tetrahedron spanned by the samples. Near-coplanar orientations make it
//! vanish and the fit meaningless, so solving such geometry is refused
//! outright instead of returning a center with hidden error bars.
//!
//! For usable geometry the fit also grades itself: the quality figure says
//! how much the center moves per unit of radial measurement noise,
//! normalized so the best possible arrangement (samples forming a regular
//! tetrahedron) reads 1.0 and everything else reads larger. Quality is
//! invariant under translation, rotation and scaling of the sample set,
//! so it measures the shape of the orientations alone.

use crate::accelerometer::AccelDataG;

/// Relative determinant threshold below which geometry counts as degenerate.
///
/// The determinant is compared against the cube of the RMS row length of
/// the linear system, which makes the test invariant to units and overall
/// scale. Well-spread orientations score around 0.4-0.7 on that ratio;
/// values below this threshold mean the four points are nearly coplanar.
const DEGENERACY_EPS: f32 = 1e-4;

/// Center sensitivity of the ideal sample arrangement (regular
/// tetrahedron), used to normalize quality so the optimum reads 1.0.
/// The exact value is sqrt(3)/2.
const IDEAL_SENSITIVITY: f32 = 0.866_025_4;

/// The four orientations are too close to a common plane (or to each
/// other) for the sphere to be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DegenerateGeometryError;

/// Result of fitting a sphere through four sample points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SphereFit {
    /// Sphere center: the estimated zero-g bias, in g
    pub center: AccelDataG,
    /// Sphere radius: the estimated gravity magnitude, in g
    pub radius: f32,
    /// Geometry quality, >= 1.0 with 1.0 the regular-tetrahedron optimum
    pub quality: f32,
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn det3(m: &[[f32; 3]; 3]) -> f32 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Solve `a * x = rhs` by Cramer's rule; `det` is `det(a)`, known nonzero.
fn solve_cramer(a: &[[f32; 3]; 3], rhs: [f32; 3], det: f32) -> [f32; 3] {
    let mut x = [0.0f32; 3];
    for col in 0..3 {
        let mut m = *a;
        for row in 0..3 {
            m[row][col] = rhs[row];
        }
        x[col] = det3(&m) / det;
    }
    x
}

/// Fit a sphere through four acceleration samples
///
/// Returns the fitted sphere together with its geometry quality. The
/// quality is 1.0 for samples forming a regular tetrahedron and grows as
/// the orientations crowd together; pass it to
/// [`score`](crate::calibration::score::score) to turn it into a
/// confidence figure.
///
/// # Errors
///
/// Returns [`DegenerateGeometryError`] when the samples are too close to
/// a common plane. This is a property of the chosen orientations, not of
/// measurement noise; retrying with the same orientations will fail again.
pub fn solve(samples: [AccelDataG; 4]) -> Result<SphereFit, DegenerateGeometryError> {
    let (fit, _) = solve_with_sensitivities(samples)?;
    Ok(fit)
}

/// Like [`solve`], but also returns the center's sensitivity vector for
/// each sample: the first-order center displacement per unit of radial
/// perturbation of that sample. The quality figure is the RMS of these
/// vectors over the three center coordinates, normalized to the ideal
/// arrangement.
pub(crate) fn solve_with_sensitivities(
    samples: [AccelDataG; 4],
) -> Result<(SphereFit, [[f32; 3]; 4]), DegenerateGeometryError> {
    let p: [[f32; 3]; 4] = [
        [samples[0].x, samples[0].y, samples[0].z],
        [samples[1].x, samples[1].y, samples[1].z],
        [samples[2].x, samples[2].y, samples[2].z],
        [samples[3].x, samples[3].y, samples[3].z],
    ];

    // Row i: 2 * (p_{i+1} - p_0), rhs: |p_{i+1}|^2 - |p_0|^2
    let sq_first = dot(p[0], p[0]);
    let mut a = [[0.0f32; 3]; 3];
    let mut b = [0.0f32; 3];
    for i in 0..3 {
        for k in 0..3 {
            a[i][k] = 2.0 * (p[i + 1][k] - p[0][k]);
        }
        b[i] = dot(p[i + 1], p[i + 1]) - sq_first;
    }

    let det = det3(&a);

    let row_sq = (dot(a[0], a[0]) + dot(a[1], a[1]) + dot(a[2], a[2])) / 3.0;
    let scale = row_sq * libm::sqrtf(row_sq);
    if libm::fabsf(det) <= DEGENERACY_EPS * scale {
        return Err(DegenerateGeometryError);
    }

    let center = solve_cramer(&a, b, det);

    let mut radii = [0.0f32; 4];
    for i in 0..4 {
        let d = [
            p[i][0] - center[0],
            p[i][1] - center[1],
            p[i][2] - center[2],
        ];
        radii[i] = libm::sqrtf(dot(d, d));
    }
    let radius = (radii[0] + radii[1] + radii[2] + radii[3]) / 4.0;

    // Columns of the inverse matrix, for the first-order perturbation of
    // the solution. Moving sample i+1 radially by eps shifts the center by
    // 2 * eps * r_{i+1} * inv_col[i]; moving the first sample shifts every
    // row and rhs at once, giving -2 * eps * r_0 * (inverse row sum).
    let mut inv_col = [[0.0f32; 3]; 3];
    for j in 0..3 {
        let mut e = [0.0f32; 3];
        e[j] = 1.0;
        inv_col[j] = solve_cramer(&a, e, det);
    }
    let mut inv_sum = [0.0f32; 3];
    for k in 0..3 {
        inv_sum[k] = inv_col[0][k] + inv_col[1][k] + inv_col[2][k];
    }

    let mut sensitivities = [[0.0f32; 3]; 4];
    for k in 0..3 {
        sensitivities[0][k] = -2.0 * radii[0] * inv_sum[k];
        sensitivities[1][k] = 2.0 * radii[1] * inv_col[0][k];
        sensitivities[2][k] = 2.0 * radii[2] * inv_col[1][k];
        sensitivities[3][k] = 2.0 * radii[3] * inv_col[2][k];
    }

    let mut sum_sq = 0.0f32;
    for s in &sensitivities {
        sum_sq += dot(*s, *s);
    }
    let raw = libm::sqrtf(sum_sq / 3.0);
    // Rounding can land a hair under the analytic optimum; clamp so the
    // quality contract (>= 1.0) holds exactly
    let quality = (raw / IDEAL_SENSITIVITY).max(1.0);

    let fit = SphereFit {
        center: AccelDataG {
            x: center[0],
            y: center[1],
            z: center[2],
        },
        radius,
        quality,
    };
    Ok((fit, sensitivities))
}
