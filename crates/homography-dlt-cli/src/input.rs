//! Correspondence files.
//!
//! Accepted layouts:
//! - JSON `{"correspondences": [{"src": [x, y, w], "dst": [x, y, w]}, ...]}`
//! - JSON `{"points": [[x, y], ...]}`, alternating source and destination
//! - plain text, one `x y` (or `x y w`) point per line, alternating source
//!   and destination; `#` starts a comment, commas count as whitespace

use crate::CliError;
use homography_dlt::{from_interleaved, Correspondence, HPoint};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputFile {
    Pairs {
        correspondences: Vec<Correspondence>,
    },
    Interleaved {
        points: Vec<Vec<f64>>,
    },
}

fn point_from_values(values: &[f64], location: &str) -> Result<HPoint, CliError> {
    match *values {
        [x, y] => Ok(HPoint::new(x, y, 1.0)),
        [x, y, w] => Ok(HPoint::new(x, y, w)),
        _ => Err(CliError::Input(format!(
            "{location}: expected 2 or 3 coordinates, got {}",
            values.len()
        ))),
    }
}

pub fn parse_json(raw: &str) -> Result<Vec<Correspondence>, CliError> {
    match serde_json::from_str::<InputFile>(raw)? {
        InputFile::Pairs { correspondences } => Ok(correspondences),
        InputFile::Interleaved { points } => {
            let pts = points
                .iter()
                .enumerate()
                .map(|(i, v)| point_from_values(v, &format!("point {i}")))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(from_interleaved(&pts)?)
        }
    }
}

pub fn parse_text(raw: &str) -> Result<Vec<Correspondence>, CliError> {
    let mut pts = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let values = content
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|tok| !tok.is_empty())
            .map(|tok| {
                tok.parse::<f64>().map_err(|e| {
                    CliError::Input(format!("line {}: invalid number {tok:?}: {e}", lineno + 1))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        pts.push(point_from_values(&values, &format!("line {}", lineno + 1))?);
    }
    Ok(from_interleaved(&pts)?)
}

/// Load correspondences, choosing the parser from the extension or, when
/// that is not `.json`, from the first non-blank character.
pub fn load(path: &Path) -> Result<Vec<Correspondence>, CliError> {
    let raw = fs::read_to_string(path)?;
    let is_json = path.extension().is_some_and(|ext| ext == "json")
        || raw.trim_start().starts_with('{');
    let set = if is_json {
        parse_json(&raw)?
    } else {
        parse_text(&raw)?
    };
    log::info!("loaded {} correspondences from {}", set.len(), path.display());
    Ok(set)
}

/// Multiply the affine coordinates of every point by `scale`.
pub fn scale_points(set: &mut [Correspondence], scale: f64) {
    for c in set {
        for p in [&mut c.src, &mut c.dst] {
            p.x *= scale;
            p.y *= scale;
        }
    }
}
