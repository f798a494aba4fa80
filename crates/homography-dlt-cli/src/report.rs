//! Text and JSON rendering of an estimation result.

use homography_dlt::{Method, ProjectiveMatrix};
use nalgebra::Point2;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProjectedPoint {
    pub input: [f64; 2],
    /// `None` when the point maps to infinity.
    pub output: Option<[f64; 2]>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub method: Method,
    pub correspondences: usize,
    pub matrix: [[f64; 3]; 3],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projected: Vec<ProjectedPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_rms: Option<f64>,
}

impl Report {
    pub fn new(method: Method, correspondences: usize, p: &ProjectiveMatrix) -> Self {
        Self {
            method,
            correspondences,
            matrix: p.to_array(),
            projected: Vec::new(),
            transfer_rms: None,
        }
    }

    pub fn project_all(&mut self, p: &ProjectiveMatrix, points: &[(f64, f64)]) {
        self.projected = points
            .iter()
            .map(|&(x, y)| ProjectedPoint {
                input: [x, y],
                output: p.project(Point2::new(x, y)).map(|q| [q.x, q.y]),
            })
            .collect();
    }

    pub fn render_text(&self) -> String {
        let mut out = format!("Projective matrix P ({}):\n", self.method);
        out.push_str(&ProjectiveMatrix::from_array(self.matrix).to_string());
        for pp in &self.projected {
            match pp.output {
                Some([u, v]) => out.push_str(&format!(
                    "P * ({}, {}) = ({}, {})\n",
                    pp.input[0], pp.input[1], u, v
                )),
                None => out.push_str(&format!(
                    "P * ({}, {}) lies at infinity\n",
                    pp.input[0], pp.input[1]
                )),
            }
        }
        if let Some(rms) = self.transfer_rms {
            out.push_str(&format!("transfer RMS: {rms:e}\n"));
        }
        out
    }
}

/// Root mean square of the finite transfer errors.
pub fn rms(errors: &[Option<f64>]) -> Option<f64> {
    let finite: Vec<f64> = errors.iter().flatten().copied().collect();
    if finite.is_empty() {
        return None;
    }
    Some((finite.iter().map(|e| e * e).sum::<f64>() / finite.len() as f64).sqrt())
}
