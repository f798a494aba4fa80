//! Hartley isotropic normalization.
//!
//! Translates a point set so its centroid sits at the origin, then scales it
//! uniformly so the mean distance to the origin is sqrt(2).

use crate::point::{dehomogenize, HPoint};
use crate::HomographyError;
use nalgebra::{Matrix3, Point2, Vector2};

/// `x -> scale * x + translation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityTransform2D {
    pub scale: f64,
    pub translation: Vector2<f64>,
}

impl SimilarityTransform2D {
    /// `Scale(s) o Translate(-center)`.
    pub fn scale_about(center: Point2<f64>, s: f64) -> Self {
        Self {
            scale: s,
            translation: -center.coords * s,
        }
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        let s = self.scale;
        let t = self.translation;
        Matrix3::new(s, 0.0, t.x, 0.0, s, t.y, 0.0, 0.0, 1.0)
    }

    /// Closed form of `matrix().try_inverse()`; `scale` is never zero for a
    /// transform built by [`normalize_points`].
    pub fn inverse_matrix(&self) -> Matrix3<f64> {
        let inv = 1.0 / self.scale;
        let t = -self.translation * inv;
        Matrix3::new(inv, 0.0, t.x, 0.0, inv, t.y, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        Point2::from(p.coords * self.scale + self.translation)
    }

    /// Applies the transform and lifts the result to `w = 1`.
    #[inline]
    pub fn apply_homogeneous(&self, p: Point2<f64>) -> HPoint {
        let q = self.apply(p);
        HPoint::new(q.x, q.y, 1.0)
    }

    pub fn normalize_set(&self, points: &[Point2<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|&p| self.apply(p)).collect()
    }
}

pub fn centroid(points: &[Point2<f64>]) -> Option<Point2<f64>> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + p.coords);
    Some(Point2::from(sum / n))
}

pub fn mean_distance(center: Point2<f64>, points: &[Point2<f64>]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| (*p - center).norm()).sum::<f64>() / points.len() as f64
}

/// Compute the similarity that moves the centroid of `points` to the origin
/// and makes their mean distance to it sqrt(2).
///
/// Fails on an empty set and on coincident points, where the scale is
/// undefined.
pub fn normalize_points(points: &[Point2<f64>]) -> Result<SimilarityTransform2D, HomographyError> {
    let center = centroid(points).ok_or(HomographyError::EmptyInput)?;
    let mean_dist = mean_distance(center, points);

    let floor = f64::EPSILON * center.coords.norm().max(1.0);
    if mean_dist.is_nan() || mean_dist <= floor {
        log::warn!("normalization rejected coincident points (mean distance {mean_dist:e})");
        return Err(HomographyError::CoincidentPoints { mean_dist });
    }

    let s = std::f64::consts::SQRT_2 / mean_dist;
    Ok(SimilarityTransform2D::scale_about(center, s))
}

/// Normalizing similarity of the finite members of a homogeneous set, or
/// `None` when they do not span a distance.
///
/// Unlike [`normalize_points`] this tolerates points at infinity; they are
/// mapped along with the rest by the resulting matrix.
pub(crate) fn conditioning_transform(points: &[HPoint]) -> Option<SimilarityTransform2D> {
    let finite: Vec<Point2<f64>> = points.iter().filter_map(dehomogenize).collect();
    let center = centroid(&finite)?;
    let mean_dist = mean_distance(center, &finite);
    let floor = f64::EPSILON * center.coords.norm().max(1.0);
    if mean_dist.is_nan() || mean_dist <= floor {
        return None;
    }
    Some(SimilarityTransform2D::scale_about(
        center,
        std::f64::consts::SQRT_2 / mean_dist,
    ))
}

/// `points` expressed in their normalized frame. Incidence (collinearity,
/// rank of the DLT system) is unchanged, while the coordinates become
/// independent of where the set sits in the plane.
pub(crate) fn condition(points: &[HPoint]) -> Vec<HPoint> {
    match conditioning_transform(points) {
        Some(t) => {
            let m = t.matrix();
            points.iter().map(|p| m * p).collect()
        }
        None => points.to_vec(),
    }
}
