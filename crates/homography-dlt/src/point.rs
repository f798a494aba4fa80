//! Homogeneous 2D points and point correspondences.

use crate::HomographyError;
use nalgebra::{Matrix3, Point2, SymmetricEigen, Vector3};
use serde::{Deserialize, Serialize};

/// A 2D point in homogeneous coordinates `(x, y, w)`.
pub type HPoint = Vector3<f64>;

/// Affine point `(x, y)` lifted to `(x, y, 1)`.
#[inline]
pub fn hpoint(x: f64, y: f64) -> HPoint {
    HPoint::new(x, y, 1.0)
}

/// `(x / w, y / w)`, or `None` for a point at infinity.
#[inline]
pub fn dehomogenize(p: &HPoint) -> Option<Point2<f64>> {
    if p.z.abs() < f64::EPSILON {
        return None;
    }
    Some(Point2::new(p.x / p.z, p.y / p.z))
}

/// A source point together with its image under the sought homography.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    pub src: HPoint,
    pub dst: HPoint,
}

impl Correspondence {
    pub fn new(src: HPoint, dst: HPoint) -> Self {
        Self { src, dst }
    }

    pub fn affine(src: (f64, f64), dst: (f64, f64)) -> Self {
        Self::new(hpoint(src.0, src.1), hpoint(dst.0, dst.1))
    }
}

/// Split a correspondence set into the parallel `(src, dst)` lists the
/// estimators take.
pub fn split_correspondences(set: &[Correspondence]) -> (Vec<HPoint>, Vec<HPoint>) {
    set.iter().map(|c| (c.src, c.dst)).unzip()
}

/// Pair up points entered alternately as source, destination, source, ...
pub fn from_interleaved(points: &[HPoint]) -> Result<Vec<Correspondence>, HomographyError> {
    if points.len() % 2 != 0 {
        return Err(HomographyError::OddPointCount(points.len()));
    }
    Ok(points
        .chunks_exact(2)
        .map(|pair| Correspondence::new(pair[0], pair[1]))
        .collect())
}

pub(crate) fn check_finite(points: &[HPoint]) -> Result<(), HomographyError> {
    match points.iter().position(|p| p.iter().any(|v| !v.is_finite())) {
        Some(index) => Err(HomographyError::NonFinite { index }),
        None => Ok(()),
    }
}

/// `|det[a b c]|` relative to the product of the norms; zero for collinear
/// points regardless of their homogeneous scale.
pub(crate) fn collinearity(a: &HPoint, b: &HPoint, c: &HPoint) -> f64 {
    let denom = a.norm() * b.norm() * c.norm();
    if denom <= f64::MIN_POSITIVE {
        return 0.0;
    }
    Matrix3::from_columns(&[*a, *b, *c]).determinant().abs() / denom
}

/// True when every point of the set lies on one projective line.
///
/// The scatter matrix of the unit-normalized points has rank at most two in
/// that case, so its smallest eigenvalue vanishes relative to the largest.
pub(crate) fn is_collinear_set(points: &[HPoint], tol: f64) -> bool {
    if points.len() < 3 {
        return true;
    }
    let mut scatter = Matrix3::<f64>::zeros();
    for p in points {
        let n = p.norm();
        if n <= f64::MIN_POSITIVE {
            continue;
        }
        let u = p / n;
        scatter += u * u.transpose();
    }
    let eig = SymmetricEigen::new(scatter);
    let max = eig.eigenvalues.max();
    let min = eig.eigenvalues.min();
    max <= f64::MIN_POSITIVE || min / max <= tol
}
