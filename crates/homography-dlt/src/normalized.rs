//! DLT on Hartley-normalized coordinates.

use crate::dlt::{projective_dlt_with, validate_counts};
use crate::normalize::normalize_points;
use crate::point::{check_finite, dehomogenize, HPoint};
use crate::{EstimatorParams, HomographyError, ProjectiveMatrix};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

fn dehomogenize_all(points: &[HPoint]) -> Result<Vec<Point2<f64>>, HomographyError> {
    points
        .iter()
        .enumerate()
        .map(|(index, p)| dehomogenize(p).ok_or(HomographyError::PointAtInfinity { index }))
        .collect()
}

/// [`normalized_dlt_with`] using default thresholds.
pub fn normalized_dlt(src: &[HPoint], dst: &[HPoint]) -> Result<ProjectiveMatrix, HomographyError> {
    normalized_dlt_with(src, dst, &EstimatorParams::default())
}

/// Estimate `H` with `dst ~ H * src` after conditioning both sides.
///
/// Source and destination sets are normalized independently (`T`, `T'`),
/// DLT runs on the normalized points and the result is mapped back as
/// `T'^-1 * P' * T`, returned with unit Frobenius norm. Points may carry any
/// finite non-zero `w`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src, dst, params), fields(n = src.len()))
)]
pub fn normalized_dlt_with(
    src: &[HPoint],
    dst: &[HPoint],
    params: &EstimatorParams,
) -> Result<ProjectiveMatrix, HomographyError> {
    validate_counts(src, dst)?;
    check_finite(src)?;
    check_finite(dst)?;

    let src_2d = dehomogenize_all(src)?;
    let dst_2d = dehomogenize_all(dst)?;

    let t_src = normalize_points(&src_2d)?;
    let t_dst = normalize_points(&dst_2d)?;
    log::debug!(
        "normalization scales: src {:.6e}, dst {:.6e}",
        t_src.scale,
        t_dst.scale
    );

    let src_n: Vec<HPoint> = src_2d.iter().map(|&p| t_src.apply_homogeneous(p)).collect();
    let dst_n: Vec<HPoint> = dst_2d.iter().map(|&p| t_dst.apply_homogeneous(p)).collect();

    let p_n = projective_dlt_with(&src_n, &dst_n, params)?;

    let p = t_dst.inverse_matrix() * p_n.h * t_src.matrix();
    Ok(ProjectiveMatrix::new(p).to_unit_frobenius())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::hpoint;
    use crate::ErrorKind;

    #[test]
    fn doubled_square_gives_diag_2_2_1() {
        let src = [
            hpoint(0.0, 0.0),
            hpoint(1.0, 0.0),
            hpoint(1.0, 1.0),
            hpoint(0.0, 1.0),
        ];
        let dst: Vec<HPoint> = src.iter().map(|p| hpoint(2.0 * p.x, 2.0 * p.y)).collect();
        let p = normalized_dlt(&src, &dst).expect("estimate");
        let expected = ProjectiveMatrix::from_array([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(p.is_proportional_to(&expected, 1e-12));
    }

    #[test]
    fn accepts_non_unit_w() {
        let src = [
            HPoint::new(0.0, 0.0, 3.0),
            HPoint::new(2.0, 0.0, 2.0),
            HPoint::new(-1.0, -1.0, -1.0),
            HPoint::new(0.0, 0.5, 0.5),
            hpoint(0.5, 0.25),
        ];
        let h = ProjectiveMatrix::from_array([[1.0, 0.2, 3.0], [-0.1, 0.8, 1.0], [0.05, 0.02, 1.0]]);
        let dst: Vec<HPoint> = src.iter().map(|p| h.apply(p) * 4.0).collect();
        let p = normalized_dlt(&src, &dst).expect("estimate");
        assert!(p.is_proportional_to(&h, 1e-10), "got\n{p}");
    }

    #[test]
    fn point_at_infinity_is_degenerate() {
        let mut src = vec![
            hpoint(0.0, 0.0),
            hpoint(1.0, 0.0),
            hpoint(1.0, 1.0),
            hpoint(0.0, 1.0),
        ];
        let dst = src.clone();
        src[2] = HPoint::new(1.0, 1.0, 0.0);
        let err = normalized_dlt(&src, &dst).unwrap_err();
        assert_eq!(err, HomographyError::PointAtInfinity { index: 2 });
        assert_eq!(err.kind(), ErrorKind::DegenerateConfiguration);
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let src = [hpoint(3.0, 3.0); 4];
        let dst = [
            hpoint(0.0, 0.0),
            hpoint(1.0, 0.0),
            hpoint(1.0, 1.0),
            hpoint(0.0, 1.0),
        ];
        assert!(matches!(
            normalized_dlt(&src, &dst),
            Err(HomographyError::CoincidentPoints { .. })
        ));
    }
}
