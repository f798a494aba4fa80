//! Planar homography estimation from point correspondences.
//!
//! Three estimators of increasing numerical care, all pure functions over
//! homogeneous points (`nalgebra::Vector3<f64>`):
//!
//! - [`naive_projective_4pts`]: exactly four correspondences, solved by
//!   composing two maps from the canonical projective basis.
//! - [`projective_dlt`]: the homogeneous Direct Linear Transform for N >= 4
//!   correspondences, solved by SVD.
//! - [`normalized_dlt`]: DLT wrapped in Hartley isotropic normalization;
//!   the one to use on pixel-scale data.
//!
//! Every estimator returns a [`ProjectiveMatrix`] (defined up to scale) or a
//! [`HomographyError`] naming why the input cannot determine one.
//!
//! ```
//! use homography_dlt::{hpoint, normalized_dlt};
//!
//! let src = [hpoint(0.0, 0.0), hpoint(1.0, 0.0), hpoint(1.0, 1.0), hpoint(0.0, 1.0)];
//! let dst = [hpoint(0.0, 0.0), hpoint(2.0, 0.0), hpoint(2.0, 2.0), hpoint(0.0, 2.0)];
//!
//! let p = normalized_dlt(&src, &dst)?.to_unit_h22().expect("affine");
//! assert!((p.h[(0, 0)] - 2.0).abs() < 1e-9);
//! # Ok::<(), homography_dlt::HomographyError>(())
//! ```

mod basis;
mod dlt;
mod error;
mod logger;
mod matrix;
mod naive;
mod normalize;
mod normalized;
mod params;
mod point;

pub use basis::basis_mapping;
pub use dlt::{
    algebraic_residual, dlt_system, projective_dlt, projective_dlt_with, MIN_CORRESPONDENCES,
};
pub use error::{ErrorKind, HomographyError};
pub use matrix::{transfer_errors, ProjectiveMatrix};
pub use naive::{naive_projective_4pts, naive_projective_4pts_with};
pub use normalize::{centroid, mean_distance, normalize_points, SimilarityTransform2D};
pub use normalized::{normalized_dlt, normalized_dlt_with};
pub use params::{EstimatorParams, Method};
pub use point::{
    dehomogenize, from_interleaved, hpoint, split_correspondences, Correspondence, HPoint,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

/// Run the estimator selected by `method`.
pub fn estimate(
    method: Method,
    src: &[HPoint],
    dst: &[HPoint],
    params: &EstimatorParams,
) -> Result<ProjectiveMatrix, HomographyError> {
    log::debug!("estimating homography with {method} from {} pairs", src.len());
    match method {
        Method::Naive => naive_projective_4pts_with(src, dst, params),
        Method::Dlt => projective_dlt_with(src, dst, params),
        Method::NormalizedDlt => normalized_dlt_with(src, dst, params),
    }
}
