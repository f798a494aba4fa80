use serde::{Deserialize, Serialize};

/// Numerical thresholds shared by the estimators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorParams {
    /// Three points count as collinear when `|det[a b c]|` divided by
    /// `|a| |b| |c|` is at most this value. The same threshold bounds the
    /// relative smallest eigenvalue of a whole set's scatter matrix.
    pub collinearity_tolerance: f64,
    /// The DLT system is rejected as rank deficient when its second-smallest
    /// singular value is at most `rank_tolerance` times the largest one.
    ///
    /// Set to `0.0` to disable the check.
    pub rank_tolerance: f64,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            collinearity_tolerance: 1e-9,
            rank_tolerance: 1e-10,
        }
    }
}

/// Which estimator to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Exactly 4 correspondences, two basis mappings composed.
    Naive,
    /// Homogeneous DLT on the raw coordinates.
    Dlt,
    /// DLT on Hartley-normalized coordinates.
    #[default]
    NormalizedDlt,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Naive, Method::Dlt, Method::NormalizedDlt];

    pub fn name(self) -> &'static str {
        match self {
            Method::Naive => "naive",
            Method::Dlt => "dlt",
            Method::NormalizedDlt => "normalized_dlt",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: EstimatorParams =
            serde_json::from_str(r#"{ "rank_tolerance": 0.0 }"#).expect("valid json");
        assert_eq!(params.rank_tolerance, 0.0);
        assert_eq!(
            params.collinearity_tolerance,
            EstimatorParams::default().collinearity_tolerance
        );
    }

    #[test]
    fn method_names_match_serde() {
        for m in Method::ALL {
            let json = serde_json::to_string(&m).expect("serialize");
            assert_eq!(json, format!("\"{}\"", m.name()));
        }
    }
}
