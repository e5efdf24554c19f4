use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "hubsim-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn delivery_sim_prints_report_and_json() {
    let dir = unique_temp_dir("delivery");
    let report_json = dir.join("report.json");

    let output = Command::new(env!("CARGO_BIN_EXE_delivery_sim"))
        .args([
            "--quiet",
            "--seed",
            "5",
            "--parcels",
            "2000",
            "--threshold",
            "3",
            "--threshold",
            "4",
            "--threshold",
            "5",
            "--report-json",
            report_json.to_str().unwrap(),
        ])
        .output()
        .expect("run delivery_sim");
    assert!(
        output.status.success(),
        "delivery_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|l| l.starts_with("average_total_days=")));
    assert!(stdout.lines().any(|l| l.starts_with("median_total_days=")));
    assert_eq!(
        stdout.lines().filter(|l| l.starts_with("p_exceed ")).count(),
        3
    );

    let raw = fs::read_to_string(&report_json).expect("read report.json");
    let v: Value = serde_json::from_str(&raw).expect("parse report.json");
    assert_eq!(v["parcels"], 2000);
    assert!(v["mean_total_days"].as_f64().unwrap() >= 3.0);
    let fractions: Vec<f64> = v["exceedance"]
        .as_array()
        .expect("exceedance array")
        .iter()
        .map(|e| e["fraction"].as_f64().unwrap())
        .collect();
    assert_eq!(fractions.len(), 3);
    assert!(fractions.windows(2).all(|w| w[0] >= w[1]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn delivery_sim_rejects_bad_probability() {
    let output = Command::new(env!("CARGO_BIN_EXE_delivery_sim"))
        .args(["--quiet", "--weather-prob", "1.5", "--parcels", "10"])
        .output()
        .expect("run delivery_sim");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}
