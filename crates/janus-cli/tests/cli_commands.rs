use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_janus(args: &[&str], working_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_janus"))
        .args(args)
        .current_dir(working_dir)
        .env("RUST_LOG", "warn")
        .output()
        .expect("janus binary should run")
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("file should be written");
}

#[test]
fn beamspot_writes_database_and_report() {
    let temp = TempDir::new().expect("tempdir should be created");
    let config_path = temp.path().join("sampler.json");
    write_file(
        &config_path,
        r#"{ "samplesPerOffset": 50, "offsetExtent": 0.01 }"#,
    );

    let output = run_janus(
        &[
            "beamspot",
            "--config",
            "sampler.json",
            "--seed",
            "11",
            "--threads",
            "2",
            "--report",
            "summary.json",
        ],
        temp.path(),
    );

    assert!(
        output.status.success(),
        "beamspot should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let database = fs::read_to_string(temp.path().join("beamspotDatabase.txt"))
        .expect("database should be written to the default path");
    let lines: Vec<&str> = database.lines().collect();
    assert_eq!(lines.len(), 27);
    assert_eq!(lines[0], "-0.01,-0.01");
    assert_eq!(lines[1].split(',').count(), 32);
    assert_eq!(lines[2].split(',').count(), 24);
    assert_eq!(lines[24], "0.01,0.01");

    let report: Value = serde_json::from_str(
        &fs::read_to_string(temp.path().join("summary.json")).expect("report should exist"),
    )
    .expect("report should be valid json");
    assert_eq!(report["seed"], 11);
    assert_eq!(report["samplesPerOffset"], 50);
    assert_eq!(report["cells"], 9);
    assert_eq!(
        report["validSamples"].as_u64().expect("valid samples")
            + report["discardedSamples"].as_u64().expect("discarded samples"),
        450
    );
}

#[test]
fn beamspot_output_is_reproducible_for_a_seed() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_file(&temp.path().join("tiny.json"), r#"{ "offsetExtent": 0.02 }"#);

    for (name, threads) in [("one.txt", "1"), ("three.txt", "3")] {
        let output = run_janus(
            &[
                "beamspot", "--config", "tiny.json", "--samples", "40", "--seed", "5",
                "--threads", threads, "--output", name,
            ],
            temp.path(),
        );
        assert!(
            output.status.success(),
            "beamspot should succeed, stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let one = fs::read_to_string(temp.path().join("one.txt")).expect("first database");
    let three = fs::read_to_string(temp.path().join("three.txt")).expect("second database");
    assert_eq!(one.lines().count(), 75);
    assert_eq!(one, three);
}

#[test]
fn beamspot_reports_missing_configuration_file() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_janus(&["beamspot", "--config", "absent.json"], temp.path());

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [IO.BEAMSPOT_CONFIG]"));
    assert!(stderr.contains("FATAL EXIT CODE: 3"));
}

#[test]
fn beamspot_rejects_invalid_configuration() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_file(&temp.path().join("bad.json"), r#"{ "alpha": 0.5 }"#);

    let output = run_janus(&["beamspot", "--config", "bad.json"], temp.path());

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [INPUT.BEAMSPOT_CROSS_SECTION]"));
    assert!(!temp.path().join("beamspotDatabase.txt").exists());
}

#[test]
fn phi_pattern_prints_downstream_ranges() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_janus(&["phi-pattern", "0.1", "0.05", "1", "5"], temp.path());

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "19.49,27.66,35.83,44.00,52.17\n\
         1\n13.2,40.0\n\
         1\n-180.0,180.0\n\
         1\n-180.0,180.0\n\
         1\n-180.0,180.0\n\
         1\n-172.7,-134.0\n\
         26.8,360.0,360.0,360.0,360.0,360.0,360.0,360.0,38.7\n"
    );
}

#[test]
fn phi_pattern_writes_upstream_ranges_to_file() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_janus(
        &["phi-pattern", "-0.15", "0.1", "0", "4", "--output", "phi.txt"],
        temp.path(),
    );

    assert!(
        output.status.success(),
        "phi-pattern should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stdout.is_empty());
    assert_eq!(
        fs::read_to_string(temp.path().join("phi.txt")).expect("pattern should be written"),
        "131.06,142.01,152.96,163.91\n\
         1\n-48.7,-18.6\n\
         1\n-180.0,180.0\n\
         1\n-180.0,180.0\n\
         1\n134.9,157.8\n\
         30.1,360.0,360.0,360.0,360.0,315.1,22.9\n"
    );
}

#[test]
fn phi_pattern_rejects_unknown_detector() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_janus(&["phi-pattern", "0.0", "0.0", "2", "5"], temp.path());

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [INPUT.PHI_DETECTOR]"));
    assert!(stderr.contains("FATAL EXIT CODE: 2"));
}

#[test]
fn chisq_reports_bounds_and_writes_heatmaps() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_file(
        &temp.path().join("fit.chisq"),
        "0.5\t0.1\t0.6\t1.4\t2.0\n\
         0.6\t0.1\t1.2\t2.8\t4.0\n\
         0.5\t0.2\t1.5\t1.0\t2.5\n\
         0.6\t0.2\t3.0\t3.0\t6.0\n",
    );

    let output = run_janus(
        &["chisq", "fit.chisq", "--levels", "4+1", "2+1", "2+1", "0+1"],
        temp.path(),
    );

    assert!(
        output.status.success(),
        "chisq should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "X axis: <4^+_1|E2|2^+_1> eb\n\
         Y axis: <2^+_1|E2|0^+_1> eb\n\
         Matrix Element One Best Fit: (0.5)\n\
         Matrix Element One Bounds: (0.5,0.5)\n\
         Matrix Element Two Best Fit: (0.1)\n\
         Matrix Element Two Bounds: (0.1,0.2)\n"
    );
    for suffix in ["_proj", "_targ", "_tot", "_tot_onesigma"] {
        let path = temp.path().join(format!("fit{}.png", suffix));
        assert!(path.is_file(), "{} should be written", path.display());
    }
}

#[test]
fn chisq_rejects_malformed_levels() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_file(&temp.path().join("fit.chisq"), "0.5\t0.1\t1\t1\t2\n");

    let output = run_janus(
        &["chisq", "fit.chisq", "--levels", "2+1", "0+1", "22", "2+1"],
        temp.path(),
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: [INPUT.CLI_USAGE]"));
}

#[test]
fn missing_arguments_are_usage_errors() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_janus(&["phi-pattern", "0.1"], temp.path());

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: [INPUT.CLI_USAGE]"));
}
