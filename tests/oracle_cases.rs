// JSON case files, batch evaluation, and the command-line front end.

use stat_oracle::{evaluate_batch, DistributionKind, Mode, OracleCase, OracleError};
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

const CASES: &str = r#"[
    {"distribution": "bernoulli", "x": 1.0, "p": 0.0001},
    {"distribution": "normal", "x": [3.1, -2.3, 1.3], "mu": -0.2,
     "sigma": [[1.0, 0.3, 0.2], [0.3, 2.0, -0.3], [0.2, -0.3, 3.0]]},
    {"distribution": "uniform", "x": 0.45, "min": -3.2415, "max": 0.5231},
    {"distribution": "wishart",
     "x": [[10.0, 2.0, 3.0], [2.0, 10.0, 1.0], [3.0, 1.0, 10.0]],
     "v": [[5.0, 1.0, 0.0], [1.0, 5.0, 1.0], [0.0, 1.0, 5.0]],
     "n": 4.0}
]"#;

fn write_cases(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_parse_case_file() {
    let file = write_cases(CASES);
    let text = std::fs::read_to_string(file.path()).unwrap();
    let cases: Vec<OracleCase> = serde_json::from_str(&text).unwrap();

    let kinds: Vec<_> = cases.iter().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            DistributionKind::Bernoulli,
            DistributionKind::Normal,
            DistributionKind::Uniform,
            DistributionKind::Wishart
        ]
    );
    let codes: Vec<_> = cases.iter().map(|c| c.variant_code().unwrap()).collect();
    assert_eq!(codes, vec!["ss", "vsm", "sss", "mms"]);
}

#[test]
fn test_batch_results_line_up_with_cases() {
    let cases: Vec<OracleCase> = serde_json::from_str(CASES).unwrap();
    let results = evaluate_batch(&cases, Mode::Backward);
    let lengths: Vec<_> = results.iter().map(|r| r.as_ref().unwrap().len()).collect();
    assert_eq!(lengths, vec![1, 13, 2, 18]);

    let forward = evaluate_batch(&cases, Mode::Forward);
    assert!(forward.iter().all(|r| r.as_ref().unwrap().len() == 1));
}

#[test]
fn test_batch_reports_failures_per_case() {
    let text = r#"[
        {"distribution": "cauchy", "x": 0.0, "loc": 0.0, "scale": -1.0},
        {"distribution": "cauchy", "x": [0.0, 1.0], "loc": [0.0], "scale": 1.0},
        {"distribution": "normal", "x": 0.0, "mu": [0.0, 1.0], "sigma": 1.0},
        {"distribution": "cauchy", "x": 0.0, "loc": 0.0, "scale": 1.0}
    ]"#;
    let cases: Vec<OracleCase> = serde_json::from_str(text).unwrap();
    let results = evaluate_batch(&cases, Mode::Backward);

    assert!(matches!(
        results[0],
        Err(OracleError::NumericDomain { param: "scale", .. })
    ));
    assert!(matches!(
        results[1],
        Err(OracleError::ShapeMismatch {
            param: "loc",
            expected: 2,
            found: 1
        })
    ));
    assert!(matches!(
        &results[2],
        Err(OracleError::UnsupportedVariant { distribution: "normal", variant }) if variant == "svs"
    ));
    assert!(results[3].is_ok());
}

#[test]
fn test_malformed_json_values() {
    let ragged = r#"{"distribution": "normal", "x": [1.0, 2.0], "mu": 0.0, "sigma": [[1.0, 0.0], [0.0]]}"#;
    assert!(serde_json::from_str::<OracleCase>(ragged).is_err());

    let empty = r#"{"distribution": "uniform", "x": [], "min": 0.0, "max": 1.0}"#;
    assert!(serde_json::from_str::<OracleCase>(empty).is_err());

    let unknown = r#"{"distribution": "gamma", "x": 1.0}"#;
    assert!(serde_json::from_str::<OracleCase>(unknown).is_err());
}

// ============================================================================
// Command line
// ============================================================================

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_stat-oracle"))
}

#[test]
fn test_cli_eval_uses_distribution_precision() {
    let out = cli().args(["eval", "bernoulli", "ss"]).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let line = stdout.lines().next().unwrap();
    // x = 0, p = 0.0001 gives -1/(1 - p)
    assert!(line.starts_with("-1.000100010001000"));
    assert_eq!(line.split('.').nth(1).unwrap().len(), 20);
}

#[test]
fn test_cli_eval_bernoulli_success_fixture() {
    let out = cli().args(["eval", "bernoulli", "ss_x_one"]).output().unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "10000.00000000000000000000\n"
    );
}

#[test]
fn test_cli_eval_forward_with_precision() {
    let out = cli()
        .args(["eval", "uniform", "sss", "--mode", "forward", "--precision", "4"])
        .output()
        .unwrap();
    assert!(out.status.success());
    // -ln(0.5231 + 3.2415)
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "-1.3256\n");
}

#[test]
fn test_cli_eval_rejects_unknown_variant() {
    let out = cli().args(["eval", "wishart", "vss"]).output().unwrap();
    assert!(!out.status.success());
}

#[test]
fn test_cli_run_case_file() {
    let file = write_cases(CASES);
    let out = cli()
        .args(["run", file.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let blocks: Vec<_> = stdout.split("\n\n").collect();
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[1].lines().count(), 13);
}

#[test]
fn test_cli_run_fails_on_bad_case() {
    let file = write_cases(r#"[{"distribution": "bernoulli", "x": 0.5, "p": 0.3}]"#);
    let out = cli()
        .args(["run", file.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn test_cli_list() {
    let out = cli().arg("list").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 5);
    assert!(stdout.contains("vsm vvm"));
    assert!(stdout.contains("ss vs vv ss_x_one"));
}
