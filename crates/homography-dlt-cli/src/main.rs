//! `homography-dlt`: estimate a planar homography from a correspondence file.

mod input;
mod report;

use clap::{Parser, ValueEnum};
use homography_dlt::{
    estimate, split_correspondences, transfer_errors, EstimatorParams, HomographyError, Method,
};
use log::LevelFilter;
use report::Report;
use std::{fs, path::PathBuf, process::ExitCode};

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Estimate(#[from] HomographyError),
    #[error("{0}")]
    Input(String),
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodArg {
    Naive,
    Dlt,
    NormalizedDlt,
}

impl From<MethodArg> for Method {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Naive => Method::Naive,
            MethodArg::Dlt => Method::Dlt,
            MethodArg::NormalizedDlt => Method::NormalizedDlt,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Format {
    #[default]
    Text,
    Json,
}

/// Estimate the homography mapping source points onto destination points.
#[derive(Parser, Debug)]
#[command(name = "homography-dlt", version, about)]
struct Args {
    /// Correspondence file (JSON or whitespace-separated text, see docs).
    input: PathBuf,

    /// Estimator to run.
    #[arg(short, long, value_enum, default_value_t = MethodArg::NormalizedDlt)]
    method: MethodArg,

    /// Multiply every input coordinate by this factor before estimating.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// JSON file with estimator thresholds.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the matrix scaled so that h22 = 1 (when possible).
    #[arg(long)]
    h22: bool,

    /// Project an extra point `x,y` with the estimated matrix. Repeatable.
    #[arg(short, long = "project", value_parser = parse_point, allow_hyphen_values = true)]
    project: Vec<(f64, f64)>,

    /// Also report the RMS transfer error over the input correspondences.
    #[arg(long)]
    report_transfer: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate {v:?}: {e}"))
    };
    Ok((parse(x)?, parse(y)?))
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn load_params(path: Option<&PathBuf>) -> Result<EstimatorParams, CliError> {
    match path {
        Some(path) => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => Ok(EstimatorParams::default()),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    #[cfg(not(feature = "tracing"))]
    homography_dlt::init_with_level(level_for(args.verbose))?;
    #[cfg(feature = "tracing")]
    homography_dlt::init_tracing(level_for(args.verbose));

    if !(args.scale.is_finite() && args.scale != 0.0) {
        return Err(CliError::Input(format!(
            "scale must be finite and non-zero, got {}",
            args.scale
        )));
    }

    let params = load_params(args.params.as_ref())?;
    let mut set = input::load(&args.input)?;
    input::scale_points(&mut set, args.scale);
    let (src, dst) = split_correspondences(&set);

    let method = Method::from(args.method);
    let mut p = estimate(method, &src, &dst, &params)?;
    if args.h22 {
        match p.to_unit_h22() {
            Some(n) => p = n,
            None => log::warn!("h22 is zero, printing the matrix unscaled"),
        }
    }

    let mut report = Report::new(method, set.len(), &p);
    report.project_all(&p, &args.project);
    if args.report_transfer {
        report.transfer_rms = report::rms(&transfer_errors(&p, &src, &dst));
    }

    match args.format {
        Format::Text => print!("{}", report.render_text()),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
