//! Projective map from the canonical basis onto four points.

use crate::normalize::conditioning_transform;
use crate::point::{collinearity, HPoint};
use crate::{EstimatorParams, HomographyError};
use nalgebra::Matrix3;

const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];

/// Reject a quadruple in which any three points share a line.
pub(crate) fn check_general_position(
    points: &[HPoint; 4],
    params: &EstimatorParams,
) -> Result<(), HomographyError> {
    for [i, j, k] in TRIPLES {
        let c = collinearity(&points[i], &points[j], &points[k]);
        if c <= params.collinearity_tolerance {
            log::warn!("points {i}, {j}, {k} are collinear (measure {c:e})");
            return Err(HomographyError::CollinearPoints { indices: [i, j, k] });
        }
    }
    Ok(())
}

/// The matrix `B` with `B e1 ~ p0`, `B e2 ~ p1`, `B e3 ~ p2` and
/// `B (e1 + e2 + e3) ~ p3`.
///
/// The points are first moved to their normalized frame `T`, so the
/// general-position check and the solve of `[q0 q1 q2] * l = q3` do not
/// depend on where the quadruple sits in the plane. The result is
/// `T^-1 * [l0 q0, l1 q1, l2 q2]`.
pub fn basis_mapping(
    points: &[HPoint; 4],
    params: &EstimatorParams,
) -> Result<Matrix3<f64>, HomographyError> {
    let t = conditioning_transform(points);
    let q = match &t {
        Some(t) => {
            let m = t.matrix();
            (*points).map(|p| m * p)
        }
        None => *points,
    };
    check_general_position(&q, params)?;

    let a = Matrix3::from_columns(&[q[0], q[1], q[2]]);
    let lambda = a
        .col_piv_qr()
        .solve(&q[3])
        .ok_or(HomographyError::Singular {
            stage: "basis mapping",
        })?;

    if lambda.iter().any(|l| !l.is_finite() || *l == 0.0) {
        return Err(HomographyError::Singular {
            stage: "basis mapping",
        });
    }

    let b = Matrix3::from_columns(&[q[0] * lambda[0], q[1] * lambda[1], q[2] * lambda[2]]);
    Ok(match t {
        Some(t) => t.inverse_matrix() * b,
        None => b,
    })
}
