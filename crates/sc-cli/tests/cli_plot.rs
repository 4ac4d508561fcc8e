use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use sc_analysis::EVENT_FIELDS;
use sc_sample::{write_segments, Sample};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_shapecmp"))
}

fn tmp_path(filename: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("shapecmp_cli_{}_{}_{}", std::process::id(), nanos, filename));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

/// Synthesize an events sample where every row passes the signal selection.
fn fixture_sample(offset: f64, n: usize) -> Sample {
    let columns = EVENT_FIELDS
        .iter()
        .map(|&f| {
            let col: Vec<f64> = (0..n)
                .map(|i| match f {
                    "nJets" => 2.0 + (i % 3) as f64,
                    "nLeptons" => 0.0,
                    "phCentrality" => 0.2,
                    "weightModified" => 0.5 + 0.1 * i as f64,
                    "mJJ" => 500.0 + 150.0 * i as f64 + offset,
                    _ => offset + i as f64,
                })
                .collect();
            (f.to_string(), col)
        })
        .collect();
    Sample::from_columns(columns).unwrap()
}

/// Write a fixture file as two sub-tables of the same logical table.
fn write_fixture(path: &PathBuf, offset: f64) {
    let a = fixture_sample(offset, 5);
    let b = fixture_sample(offset + 10.0, 4);
    write_segments(path, "ntuple", &[(1, a), (2, b)]).unwrap();
}

#[test]
fn plot_renders_every_variable_and_writes_artifact() {
    let sig_path = tmp_path("sig.parquet");
    let bg_path = tmp_path("bg.parquet");
    write_fixture(&sig_path, 100.0);
    write_fixture(&bg_path, 0.0);

    let out_dir = tmp_path("plots");
    let artifact_out = tmp_path("overlay.json");

    let out = run(&[
        "plot",
        "--signal",
        sig_path.to_string_lossy().as_ref(),
        "--background",
        bg_path.to_string_lossy().as_ref(),
        "--region",
        "signal",
        "--out-dir",
        out_dir.to_string_lossy().as_ref(),
        "--artifact-out",
        artifact_out.to_string_lossy().as_ref(),
        "--bins",
        "10",
    ]);
    assert!(
        out.status.success(),
        "plot should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let artifact: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&artifact_out).unwrap()).unwrap();
    assert_eq!(
        artifact.get("schema_version").and_then(|v| v.as_str()),
        Some("shapecmp_overlay_v1")
    );
    assert_eq!(
        artifact.get("region_label").and_then(|v| v.as_str()),
        Some("Signal region")
    );

    let variables = artifact
        .get("variables")
        .and_then(|v| v.as_array())
        .expect("variables should be an array");
    // 14 fields minus the two bookkeeping columns.
    assert_eq!(variables.len(), 12);

    let region_dir = out_dir.join("signal");
    for var in variables {
        let name = var.get("name").and_then(|v| v.as_str()).unwrap();
        let svg_path = region_dir.join(format!("{name}.svg"));
        assert!(svg_path.exists(), "missing plot: {}", svg_path.display());
        let svg = std::fs::read_to_string(&svg_path).unwrap();
        assert!(svg.contains("Fraction of events"));
        assert!(svg.contains("Signal region"));

        for series in ["signal", "background"] {
            let y = var
                .get(series)
                .and_then(|s| s.get("y"))
                .and_then(|v| v.as_array())
                .unwrap()
                .iter()
                .map(|x| x.as_f64().unwrap())
                .collect::<Vec<_>>();
            let sum: f64 = y.iter().sum();
            assert!(
                (sum - 1.0).abs() < 1e-9,
                "{name}/{series} fractions should sum to 1, got {sum}"
            );
        }
    }

    let _ = std::fs::remove_file(&sig_path);
    let _ = std::fs::remove_file(&bg_path);
    let _ = std::fs::remove_file(&artifact_out);
    let _ = std::fs::remove_dir_all(&out_dir);
}

#[test]
fn inspect_reports_counts() {
    let sig_path = tmp_path("sig.parquet");
    let bg_path = tmp_path("bg.parquet");
    write_fixture(&sig_path, 100.0);
    write_fixture(&bg_path, 0.0);

    let out = run(&[
        "inspect",
        "--signal",
        sig_path.to_string_lossy().as_ref(),
        "--background",
        bg_path.to_string_lossy().as_ref(),
        "--region",
        "zgamma",
    ]);
    assert!(
        out.status.success(),
        "inspect should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Z gamma region"));
    assert!(stdout.contains("signal:"));
    assert!(stdout.contains("background:"));
    // All 9 fixture rows pass the zgamma cuts.
    assert!(stdout.contains("9 events"));

    let _ = std::fs::remove_file(&sig_path);
    let _ = std::fs::remove_file(&bg_path);
}

#[test]
fn missing_input_fails_with_path_in_stderr() {
    let missing = tmp_path("does_not_exist.parquet");
    let bg_path = tmp_path("bg.parquet");
    write_fixture(&bg_path, 0.0);

    let out = run(&[
        "plot",
        "--signal",
        missing.to_string_lossy().as_ref(),
        "--background",
        bg_path.to_string_lossy().as_ref(),
    ]);
    assert!(!out.status.success(), "plot with a missing input should fail");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains(missing.file_name().unwrap().to_str().unwrap()),
        "stderr should name the missing file, got: {stderr}"
    );

    let _ = std::fs::remove_file(&bg_path);
}

#[test]
fn cuts_override_changes_selection() {
    let sig_path = tmp_path("sig.parquet");
    let bg_path = tmp_path("bg.parquet");
    write_fixture(&sig_path, 100.0);
    write_fixture(&bg_path, 0.0);

    // Impossible mJJ threshold: every event fails the signal selection.
    let cuts_path = tmp_path("cuts.json");
    std::fs::write(&cuts_path, r#"{"mjj_min": 1e12}"#).unwrap();

    let out = run(&[
        "inspect",
        "--signal",
        sig_path.to_string_lossy().as_ref(),
        "--background",
        bg_path.to_string_lossy().as_ref(),
        "--region",
        "signal",
        "--cuts",
        cuts_path.to_string_lossy().as_ref(),
    ]);
    assert!(
        out.status.success(),
        "inspect should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("0 events"), "expected empty selection, got: {stdout}");

    // The individual flag wins over the JSON file.
    let out = run(&[
        "inspect",
        "--signal",
        sig_path.to_string_lossy().as_ref(),
        "--background",
        bg_path.to_string_lossy().as_ref(),
        "--region",
        "signal",
        "--cuts",
        cuts_path.to_string_lossy().as_ref(),
        "--mjj-min",
        "0",
    ]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("9 events"), "expected full selection, got: {stdout}");

    let _ = std::fs::remove_file(&sig_path);
    let _ = std::fs::remove_file(&bg_path);
    let _ = std::fs::remove_file(&cuts_path);
}
