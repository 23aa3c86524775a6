use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn sample_csv(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("people.csv");
    fs::write(
        &path,
        "age,income,city\n23,31000,Berlin\n35,52000,Paris\n47,61000,Rome\n",
    )
    .unwrap();
    path
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("quickplot").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("quickplot"))
        .stdout(predicate::str::contains("plot"))
        .stdout(predicate::str::contains("theme"));
}

#[test]
fn plot_prints_svg_without_out() {
    let dir = tempfile::tempdir().unwrap();
    let csv = sample_csv(dir.path());
    let mut cmd = Command::cargo_bin("quickplot").unwrap();
    cmd.arg("plot")
        .arg(&csv)
        .args(["--x", "age", "--y", "income", "--opt", "label=people"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<svg"))
        .stdout(predicate::str::contains("Scatter of income vs age"));
}

#[test]
fn plot_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let csv = sample_csv(dir.path());
    let out = dir.path().join("ages.png");
    let mut cmd = Command::cargo_bin("quickplot").unwrap();
    cmd.arg("plot")
        .arg(&csv)
        .args(["--kind", "hist", "--x", "age", "--theme", "dark", "--opt", "bins=3"])
        .arg("--out")
        .arg(&out);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Wrote chart to"));
    assert!(fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn plot_reports_dispatch_errors() {
    let dir = tempfile::tempdir().unwrap();
    let csv = sample_csv(dir.path());
    let mut cmd = Command::cargo_bin("quickplot").unwrap();
    cmd.arg("plot").arg(&csv).args(["--kind", "pie", "--x", "age"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unsupported kind 'pie'"));

    let mut cmd = Command::cargo_bin("quickplot").unwrap();
    cmd.arg("plot").arg(&csv).args(["--x", "age"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Scatter requires x and y"));
}

#[test]
fn theme_prints_overrides_as_json() {
    let output = Command::cargo_bin("quickplot")
        .unwrap()
        .args(["theme", "dark"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["axes.facecolor"], "#111111");
    assert_eq!(v["grid.alpha"], 0.4);
    assert_eq!(v["axes.titlesize"], 13.0);
}

#[test]
fn unknown_theme_resolves_to_modern() {
    let mut cmd = Command::cargo_bin("quickplot").unwrap();
    cmd.args(["theme", "neon"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"grid.linestyle\": \"dashed\""));
}
