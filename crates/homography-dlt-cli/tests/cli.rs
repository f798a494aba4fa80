use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const DOUBLED_SQUARE: &str = "\
# source, destination, source, destination, ...
0 0
0 0
1 0
2 0
1 1
2 2
0 1
0 2
";

fn points_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

fn cmd() -> Command {
    Command::cargo_bin("homography-dlt").expect("binary built")
}

#[test]
fn every_method_prints_the_doubling_matrix() {
    let file = points_file(DOUBLED_SQUARE, ".txt");
    for method in ["naive", "dlt", "normalized-dlt"] {
        cmd()
            .arg(file.path())
            .args(["--method", method, "--h22", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::function(|out: &str| {
                let v: serde_json::Value = serde_json::from_str(out).expect("json");
                let m = &v["matrix"];
                let expected = [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 1.0]];
                (0..3).all(|r| {
                    (0..3).all(|c| {
                        let got = m[r][c].as_f64().unwrap_or(f64::NAN);
                        (got - expected[r][c]).abs() < 1e-9
                    })
                })
            }));
    }
}

#[test]
fn projects_extra_points() {
    let file = points_file(DOUBLED_SQUARE, ".txt");
    cmd()
        .arg(file.path())
        .args(["--h22", "-p", "3,-4", "--report-transfer"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Projective matrix P (normalized_dlt):"))
        .stdout(predicate::str::contains("P * (3, -4) = ("))
        .stdout(predicate::str::contains("transfer RMS:"));
}

#[test]
fn json_correspondences_are_accepted() {
    let json = r#"{"correspondences": [
        {"src": [0, 0, 1], "dst": [1, 1, 1]},
        {"src": [1, 0, 1], "dst": [2, 1, 1]},
        {"src": [1, 1, 1], "dst": [2, 2, 1]},
        {"src": [0, 1, 1], "dst": [1, 2, 1]},
        {"src": [0.5, 0.25, 1], "dst": [1.5, 1.25, 1]}
    ]}"#;
    let file = points_file(json, ".json");
    cmd()
        .arg(file.path())
        .args(["--method", "dlt", "--h22"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\t1\n"));
}

#[test]
fn naive_with_wrong_count_fails_with_message() {
    let mut contents = DOUBLED_SQUARE.to_string();
    contents.push_str("0.5 0.5\n1 1\n");
    let file = points_file(&contents, ".txt");
    cmd()
        .arg(file.path())
        .args(["--method", "naive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected exactly 4 points per side"));
}

#[test]
fn odd_point_count_fails() {
    let file = points_file("0 0\n1 1\n2 0\n", ".txt");
    cmd()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("odd number of interleaved points"));
}

#[test]
fn params_file_overrides_thresholds() {
    let points = points_file(DOUBLED_SQUARE, ".txt");
    let params = points_file(r#"{ "collinearity_tolerance": 0.9 }"#, ".json");
    cmd()
        .arg(points.path())
        .arg("--params")
        .arg(params.path())
        .args(["--method", "naive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("collinear"));
}
