//! Exact homography from four correspondences via two basis mappings.

use crate::basis::basis_mapping;
use crate::point::{check_finite, HPoint};
use crate::{EstimatorParams, HomographyError, ProjectiveMatrix};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// [`naive_projective_4pts_with`] using default thresholds.
pub fn naive_projective_4pts(
    src: &[HPoint],
    dst: &[HPoint],
) -> Result<ProjectiveMatrix, HomographyError> {
    naive_projective_4pts_with(src, dst, &EstimatorParams::default())
}

/// Compute `P = B_dst * B_src^-1`, where `B_*` maps the canonical
/// projective basis onto each side's four points.
///
/// Both sides must hold exactly four points in general position. For
/// noiseless data related by a homography `H` the result is proportional to
/// `H`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src, dst, params), fields(n = src.len()))
)]
pub fn naive_projective_4pts_with(
    src: &[HPoint],
    dst: &[HPoint],
    params: &EstimatorParams,
) -> Result<ProjectiveMatrix, HomographyError> {
    let (Ok(src4), Ok(dst4)) = (
        <&[HPoint; 4]>::try_from(src),
        <&[HPoint; 4]>::try_from(dst),
    ) else {
        log::warn!(
            "naive estimator needs 4 points per side, got {} and {}",
            src.len(),
            dst.len()
        );
        return Err(HomographyError::WrongPointCount {
            expected: 4,
            src: src.len(),
            dst: dst.len(),
        });
    };
    check_finite(src)?;
    check_finite(dst)?;

    let p1 = basis_mapping(src4, params)?;
    let p2 = basis_mapping(dst4, params)?;

    let p1_inv = p1.try_inverse().ok_or(HomographyError::Singular {
        stage: "source basis inverse",
    })?;

    Ok(ProjectiveMatrix::new(p2 * p1_inv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::hpoint;
    use crate::ErrorKind;

    fn unit_square() -> Vec<HPoint> {
        vec![
            hpoint(0.0, 0.0),
            hpoint(1.0, 0.0),
            hpoint(1.0, 1.0),
            hpoint(0.0, 1.0),
        ]
    }

    #[test]
    fn doubled_square_gives_diag_2_2_1() {
        let src = unit_square();
        let dst: Vec<HPoint> = src.iter().map(|p| hpoint(2.0 * p.x, 2.0 * p.y)).collect();

        let p = naive_projective_4pts(&src, &dst).expect("estimate");
        let n = p.to_unit_h22().expect("h22 != 0");
        let expected = [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]];
        for (r, row) in expected.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                assert!((n.h[(r, c)] - v).abs() < 1e-12, "entry ({r},{c})");
            }
        }
    }

    #[test]
    fn wrong_counts_are_invalid_arguments() {
        let src = unit_square();
        for n in [3usize, 5] {
            let dst: Vec<HPoint> = (0..n).map(|i| hpoint(i as f64, (i * i) as f64)).collect();
            let err = naive_projective_4pts(&src, &dst).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert_eq!(
                err,
                HomographyError::WrongPointCount {
                    expected: 4,
                    src: 4,
                    dst: n
                }
            );
        }
    }

    #[test]
    fn collinear_destination_is_degenerate() {
        let src = unit_square();
        let dst = vec![
            hpoint(0.0, 0.0),
            hpoint(1.0, 0.0),
            hpoint(2.0, 0.0),
            hpoint(0.0, 1.0),
        ];
        let err = naive_projective_4pts(&src, &dst).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateConfiguration);
    }
}
