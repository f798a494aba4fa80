use crate::point::{dehomogenize, HPoint};
use nalgebra::{Matrix3, Point2};
use serde::{Deserialize, Serialize};

/// A 3x3 homography, meaningful only up to a non-zero scale factor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectiveMatrix {
    pub h: Matrix3<f64>,
}

impl ProjectiveMatrix {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_fn(|r, c| rows[r][c]))
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.h[(0, 0)], self.h[(0, 1)], self.h[(0, 2)]],
            [self.h[(1, 0)], self.h[(1, 1)], self.h[(1, 2)]],
            [self.h[(2, 0)], self.h[(2, 1)], self.h[(2, 2)]],
        ]
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.h
    }

    pub fn determinant(&self) -> f64 {
        self.h.determinant()
    }

    /// Homogeneous image `H * p`.
    #[inline]
    pub fn apply(&self, p: &HPoint) -> HPoint {
        self.h * p
    }

    /// Image of the affine point `p`, or `None` when it maps to infinity.
    #[inline]
    pub fn project(&self, p: Point2<f64>) -> Option<Point2<f64>> {
        dehomogenize(&self.apply(&HPoint::new(p.x, p.y, 1.0)))
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }

    /// Representative with unit Frobenius norm and a positive
    /// largest-magnitude entry. Two matrices of the same class map to the
    /// same representative.
    pub fn to_unit_frobenius(&self) -> Self {
        let norm = self.h.norm();
        if norm <= f64::MIN_POSITIVE {
            return *self;
        }
        let pivot = self.h.iter().copied().fold(0.0_f64, |acc, v| {
            if v.abs() > acc.abs() {
                v
            } else {
                acc
            }
        });
        let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
        Self::new(self.h * (sign / norm))
    }

    /// Representative with `h22 = 1`; `None` when `h22` vanishes.
    pub fn to_unit_h22(&self) -> Option<Self> {
        let s = self.h[(2, 2)];
        if s.abs() < 1e-12 * self.h.norm().max(f64::MIN_POSITIVE) {
            return None;
        }
        Some(Self::new(self.h / s))
    }

    /// Whether `self` and `other` describe the same projective map, judged
    /// entry-wise on their unit-Frobenius representatives.
    pub fn is_proportional_to(&self, other: &Self, tol: f64) -> bool {
        self.distance_to(other) <= tol
    }

    /// Frobenius distance between the unit-norm representatives, minimized
    /// over the sign ambiguity.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let a = self.to_unit_frobenius().h;
        let b = other.to_unit_frobenius().h;
        (a - b).norm().min((a + b).norm())
    }
}

impl std::fmt::Display for ProjectiveMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..3 {
            writeln!(
                f,
                "{}\t{}\t{}",
                self.h[(r, 0)],
                self.h[(r, 1)],
                self.h[(r, 2)]
            )?;
        }
        Ok(())
    }
}

/// Euclidean distance between `P * src` and `dst` for each correspondence,
/// `None` where either side is at infinity.
pub fn transfer_errors(p: &ProjectiveMatrix, src: &[HPoint], dst: &[HPoint]) -> Vec<Option<f64>> {
    src.iter()
        .zip(dst)
        .map(|(s, d)| {
            let mapped = dehomogenize(&p.apply(s))?;
            let target = dehomogenize(d)?;
            Some((mapped - target).norm())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::hpoint;

    fn assert_close(a: Point2<f64>, b: Point2<f64>, tol: f64) {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        assert!(
            dx < tol && dy < tol,
            "expected ({:.9},{:.9}) ~ ({:.9},{:.9}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    #[test]
    fn inverse_round_trips_points() {
        let h = ProjectiveMatrix::new(Matrix3::new(
            1.2, 0.1, 5.0, //
            -0.05, 0.9, 3.0, //
            0.001, 0.0005, 1.0,
        ));
        let inv = h.inverse().expect("invertible");

        for p in [
            Point2::new(0.0, 0.0),
            Point2::new(50.0, -20.0),
            Point2::new(320.0, 200.0),
        ] {
            let q = h.project(p).expect("finite image");
            let back = inv.project(q).expect("finite preimage");
            assert_close(back, p, 1e-9);
        }
    }

    #[test]
    fn scale_does_not_change_the_class() {
        let h = ProjectiveMatrix::from_array([[2.0, 0.0, 1.0], [0.0, 2.0, -1.0], [0.0, 0.1, 1.0]]);
        let scaled = ProjectiveMatrix::new(h.h * -3.5);
        assert!(h.is_proportional_to(&scaled, 1e-12));
        assert!((h.to_unit_frobenius().h.norm() - 1.0).abs() < 1e-12);

        let other = ProjectiveMatrix::from_array([[2.0, 0.0, 1.0], [0.0, 2.0, -1.0], [0.0, 0.0, 1.0]]);
        assert!(!h.is_proportional_to(&other, 1e-6));
    }

    #[test]
    fn h22_normalization() {
        let h = ProjectiveMatrix::from_array([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 2.0]]);
        let n = h.to_unit_h22().expect("h22 != 0");
        assert_eq!(n.to_array(), [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]]);

        let affine_free = ProjectiveMatrix::from_array([[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert!(affine_free.to_unit_h22().is_none());
    }

    #[test]
    fn projection_to_infinity_is_none() {
        let h = ProjectiveMatrix::from_array([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, -1.0]]);
        assert!(h.project(Point2::new(1.0, 5.0)).is_none());
        assert!(h.project(Point2::new(2.0, 5.0)).is_some());
    }

    #[test]
    fn transfer_errors_measure_image_distance() {
        let h = ProjectiveMatrix::from_array([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]]);
        let src = [hpoint(1.0, 1.0), hpoint(0.0, 3.0)];
        let dst = [hpoint(2.0, 2.0), hpoint(3.0, 6.0)];
        let errs = transfer_errors(&h, &src, &dst);
        assert_eq!(errs[0], Some(0.0));
        assert!((errs[1].expect("finite") - 3.0).abs() < 1e-12);
    }

    #[test]
    fn display_prints_tab_separated_rows() {
        let h = ProjectiveMatrix::from_array([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(h.to_string(), "2\t0\t0\n0\t2\t0\n0\t0\t1\n");
    }
}
