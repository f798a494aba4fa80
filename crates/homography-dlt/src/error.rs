/// Coarse classification of a [`HomographyError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    DegenerateConfiguration,
    RankDeficiency,
}

/// Errors returned by the homography estimators.
///
/// Every variant is raised before (or directly after) the linear algebra it
/// guards; no estimator returns a sentinel matrix.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HomographyError {
    #[error("expected exactly {expected} points per side, got {src} source and {dst} destination")]
    WrongPointCount {
        expected: usize,
        src: usize,
        dst: usize,
    },

    #[error("source and destination lists differ in length ({src} vs {dst})")]
    LengthMismatch { src: usize, dst: usize },

    #[error("point list must contain at least one point")]
    EmptyInput,

    #[error("odd number of interleaved points ({0}); every source point needs a destination")]
    OddPointCount(usize),

    #[error("non-finite coordinate at index {index}")]
    NonFinite { index: usize },

    #[error("points {indices:?} are collinear")]
    CollinearPoints { indices: [usize; 3] },

    #[error("point set is collinear or coincident")]
    CollinearSet,

    #[error("point {index} lies at infinity and cannot be dehomogenized")]
    PointAtInfinity { index: usize },

    #[error("points are coincident (mean distance to centroid {mean_dist:e})")]
    CoincidentPoints { mean_dist: f64 },

    #[error("singular matrix in {stage}")]
    Singular { stage: &'static str },

    #[error("too few independent constraints: need {needed}, got {got}")]
    TooFewConstraints { needed: usize, got: usize },

    #[error("linear system is rank deficient (singular value ratio {ratio:e})")]
    RankDeficient { ratio: f64 },
}

impl HomographyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WrongPointCount { .. }
            | Self::LengthMismatch { .. }
            | Self::EmptyInput
            | Self::OddPointCount(_)
            | Self::NonFinite { .. } => ErrorKind::InvalidArgument,
            Self::CollinearPoints { .. }
            | Self::CollinearSet
            | Self::PointAtInfinity { .. }
            | Self::CoincidentPoints { .. }
            | Self::Singular { .. } => ErrorKind::DegenerateConfiguration,
            Self::TooFewConstraints { .. } | Self::RankDeficient { .. } => {
                ErrorKind::RankDeficiency
            }
        }
    }
}
