//! Homogeneous Direct Linear Transform.
//!
//! Each correspondence `p -> p'` contributes two rows of `p' x (H p) = 0`;
//! the stacked (2N)x9 system is solved for the unit vector minimizing
//! `|A h|`, i.e. the right singular vector of the smallest singular value.

use crate::normalize::condition;
use crate::point::{check_finite, is_collinear_set, HPoint};
use crate::{EstimatorParams, HomographyError, ProjectiveMatrix};
use nalgebra::{DMatrix, DVector, Matrix3};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Minimal number of correspondences; 8 independent equations fix the 9
/// entries of `H` up to scale.
pub const MIN_CORRESPONDENCES: usize = 4;

/// Unknowns in the flattened homography.
const UNKNOWNS: usize = 9;

/// The two independent rows of `p' x (H p) = 0` for one correspondence, in
/// the row-major unknown order `h00, h01, ..., h22`.
fn constraint_rows(p: &HPoint, q: &HPoint) -> [[f64; UNKNOWNS]; 2] {
    let (x, y, w) = (p.x, p.y, p.z);
    let (xp, yp, wp) = (q.x, q.y, q.z);
    [
        [
            0.0,
            0.0,
            0.0,
            -wp * x,
            -wp * y,
            -wp * w,
            yp * x,
            yp * y,
            yp * w,
        ],
        [
            wp * x,
            wp * y,
            wp * w,
            0.0,
            0.0,
            0.0,
            -xp * x,
            -xp * y,
            -xp * w,
        ],
    ]
}

/// Build the (2N)x9 coefficient matrix of the DLT system.
///
/// `src` and `dst` are read pairwise; extra entries of the longer list are
/// ignored.
pub fn dlt_system(src: &[HPoint], dst: &[HPoint]) -> DMatrix<f64> {
    let n = src.len().min(dst.len());
    let mut a = DMatrix::<f64>::zeros(2 * n, UNKNOWNS);
    for (k, (p, q)) in src.iter().zip(dst).enumerate() {
        for (offset, row) in constraint_rows(p, q).iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                a[(2 * k + offset, c)] = *v;
            }
        }
    }
    a
}

fn reshape_row_major(h: &[f64]) -> Matrix3<f64> {
    Matrix3::from_fn(|r, c| h[3 * r + c])
}

/// `|A vec(P)|` with `P` scaled to unit Frobenius norm.
pub fn algebraic_residual(src: &[HPoint], dst: &[HPoint], p: &ProjectiveMatrix) -> f64 {
    let unit = p.to_unit_frobenius();
    let h = DVector::from_iterator(UNKNOWNS, unit.h.transpose().iter().copied());
    (dlt_system(src, dst) * h).norm()
}

pub(crate) fn validate_counts(src: &[HPoint], dst: &[HPoint]) -> Result<(), HomographyError> {
    if src.len() != dst.len() {
        return Err(HomographyError::LengthMismatch {
            src: src.len(),
            dst: dst.len(),
        });
    }
    if src.len() < MIN_CORRESPONDENCES {
        return Err(HomographyError::TooFewConstraints {
            needed: 2 * MIN_CORRESPONDENCES,
            got: 2 * src.len(),
        });
    }
    Ok(())
}

/// [`projective_dlt_with`] using default thresholds.
pub fn projective_dlt(src: &[HPoint], dst: &[HPoint]) -> Result<ProjectiveMatrix, HomographyError> {
    projective_dlt_with(src, dst, &EstimatorParams::default())
}

/// Estimate `H` with `dst ~ H * src` from N >= 4 correspondences.
///
/// The returned matrix has unit Frobenius norm. For N = 4 noiseless
/// correspondences it is exact up to scale; for N > 4 it minimizes the
/// algebraic error `|A h|`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src, dst, params), fields(n = src.len()))
)]
pub fn projective_dlt_with(
    src: &[HPoint],
    dst: &[HPoint],
    params: &EstimatorParams,
) -> Result<ProjectiveMatrix, HomographyError> {
    validate_counts(src, dst)?;
    check_finite(src)?;
    check_finite(dst)?;

    // Degeneracy is judged in the normalized frame of each side; raw pixel
    // coordinates would make both measures depend on the offset from the
    // origin.
    let (src_c, dst_c) = (condition(src), condition(dst));
    if is_collinear_set(&src_c, params.collinearity_tolerance)
        || is_collinear_set(&dst_c, params.collinearity_tolerance)
    {
        log::warn!("DLT input is collinear, homography is not determined");
        return Err(HomographyError::CollinearSet);
    }
    check_rank(dlt_system(&src_c, &dst_c), params)?;

    // A thin SVD of an 8x9 system only yields 8 right singular vectors; zero
    // rows keep the null space and expose the 9th.
    let a = padded(dlt_system(src, dst));
    log::debug!("DLT system {}x{}", a.nrows(), a.ncols());

    let svd = a.svd(false, true);
    let v_t = svd.v_t.ok_or(HomographyError::Singular { stage: "DLT SVD" })?;
    let smallest = svd
        .singular_values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .ok_or(HomographyError::Singular { stage: "DLT SVD" })?;

    let h: Vec<f64> = v_t.row(smallest).iter().copied().collect();
    Ok(ProjectiveMatrix::new(reshape_row_major(&h)))
}

fn padded(a: DMatrix<f64>) -> DMatrix<f64> {
    if a.nrows() < UNKNOWNS {
        a.resize_vertically(UNKNOWNS, 0.0)
    } else {
        a
    }
}

/// Require 8 independent constraints: the second-smallest singular value of
/// `a` must stay above `rank_tolerance` relative to the largest.
fn check_rank(a: DMatrix<f64>, params: &EstimatorParams) -> Result<(), HomographyError> {
    let mut sigma: Vec<f64> = padded(a).singular_values().iter().copied().collect();
    sigma.sort_by(|x, y| x.total_cmp(y));
    let (second, largest) = (sigma[1], sigma[sigma.len() - 1]);
    log::debug!(
        "DLT singular values: min {:e}, second {:e}, max {:e}",
        sigma[0],
        second,
        largest
    );

    let ratio = if largest > 0.0 { second / largest } else { 0.0 };
    let rank_deficient = params.rank_tolerance > 0.0 && ratio <= params.rank_tolerance;
    if rank_deficient || largest == 0.0 {
        log::warn!("DLT system is rank deficient (ratio {ratio:e})");
        return Err(HomographyError::RankDeficient { ratio });
    }
    Ok(())
}
