use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use assert_cmd::Command;
use tempfile::tempdir;

// Kitchen: opening to 25% runs Up for 25 s * 25 / 100 = 6250 ms.
const VALID: &str = r#"
name = "Test bridge"

[transport]
tty = "/dev/null"

[[devices.rfy]]
device_id = "0x010203/1"
name = "Kitchen"
open_duration_seconds = 30
close_duration_seconds = 25

[[devices.rfy]]
device_id = "0x010203/2"
name = "Porch"
open_close_duration_seconds = 0.2

[[devices.switch]]
device_id = "0x0101/2"
name = "Lamp"
type = "Lighting2"
subtype = "AC"

[[devices.weather_sensor]]
device_id = "0x7A01"
name = "Garden"
type = "temperaturehumidity1"
"#;

fn write_config(dir: &tempfile::TempDir, toml: &str) -> PathBuf {
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn rfx(cfg: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("rfx").unwrap();
    cmd.arg("--config").arg(cfg);
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["check"], 0, "config OK: 4 accessories", "stdout")]
#[case(&["plan", "--device", "Kitchen", "--to", "25"], 0, "up for 6250 ms (increasing)", "stdout")]
#[case(&["plan", "--device", "0x010203/1", "--from", "25", "--to", "25"], 0, "nothing to send", "stdout")]
#[case(&["plan", "--device", "Kitchen", "--to", "150"], 4, "not a valid target", "stderr")]
#[case(&["plan", "--device", "Attic", "--to", "50"], 5, "No accessory named 'Attic'", "stderr")]
#[case(&["plan", "--device", "Lamp", "--to", "50"], 5, "Lamp", "stderr")]
#[case(&["plan", "--device", "Kitchen"], 2, "--to", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);

    let assert = rfx(&cfg).args(args).assert().code(exit_code);

    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[test]
fn check_lists_kinds_and_stable_uuids() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);

    let first = rfx(&cfg).args(["--json", "check"]).output().unwrap();
    let second = rfx(&cfg).args(["--json", "check"]).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let lines: Vec<serde_json::Value> = String::from_utf8(first.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0]["kind"], "RFYDevice");
    assert_eq!(lines[2]["kind"], "SwitchDevice");
    assert_eq!(lines[3]["kind"], "WeatherSensorDevice");
    assert_ne!(lines[0]["uuid"], lines[1]["uuid"]);
    assert_eq!(lines[4]["ok"], true);
    assert_eq!(lines[4]["accessories"], 4);
}

#[test]
fn missing_config_is_explained() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("nope.toml");
    rfx(&cfg)
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not be read"));
}

#[test]
fn invalid_durations_fail_validation() {
    let dir = tempdir().unwrap();
    let cfg = write_config(
        &dir,
        r#"
[[devices.rfy]]
device_id = "0x01/1"
name = "Kitchen"
open_duration_seconds = -1
close_duration_seconds = 10
"#,
    );
    rfx(&cfg)
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration is invalid"));
}

#[test]
fn unknown_switch_type_is_rejected() {
    let dir = tempdir().unwrap();
    let cfg = write_config(
        &dir,
        r#"
[[devices.switch]]
device_id = "0x01/1"
name = "Lamp"
type = "UnknownType"
subtype = "AC"
"#,
    );
    rfx(&cfg)
        .args(["--json", "check"])
        .assert()
        .code(6)
        .stdout(predicate::str::contains("\"reason\":\"UnknownDeviceType\""));
}

#[test]
fn plan_json_reports_command_and_travel() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);
    let out = rfx(&cfg)
        .args(["--json", "plan", "--device", "Kitchen", "--from", "50", "--to", "25"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["command"], "down");
    assert_eq!(v["motion"], "decreasing");
    assert_eq!(v["travel_ms"], 7500);
    assert_eq!(v["stop"], true);
}

#[test]
fn simulate_sends_stop_after_travel_time() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);
    let out = rfx(&cfg)
        .args(["--json", "simulate", "--device", "Kitchen", "--targets", "25"])
        .output()
        .unwrap();
    assert!(out.status.success());

    assert_eq!(
        command_events(&out.stdout),
        vec![(0, "up".to_string()), (6250, "stop".to_string())]
    );

    let events: Vec<serde_json::Value> = String::from_utf8(out.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let done = events.last().unwrap();
    assert_eq!(done["event"], "done");
    assert_eq!(done["motion"], "stopped");
    assert_eq!(done["current"], 25.0);
}

fn command_events(stdout: &[u8]) -> Vec<(u64, String)> {
    String::from_utf8(stdout.to_vec())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .filter(|e| e["event"] == "command")
        .map(|e| {
            (
                e["t_ms"].as_u64().unwrap(),
                e["command"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[test]
fn simulate_step_preempts_pending_stop() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);
    // Re-targeted 1 s into the move to 50: the first stop never goes out.
    let out = rfx(&cfg)
        .args([
            "--json", "simulate", "--device", "Kitchen", "--targets", "50,25", "--step-ms", "1000",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(
        command_events(&out.stdout),
        vec![
            (0, "up".to_string()),
            (1000, "up".to_string()),
            (7250, "stop".to_string())
        ]
    );
}

#[test]
fn simulate_transport_failure_exits_3() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);
    rfx(&cfg)
        .env("RFX_TEST_SIM_FAIL", "1")
        .args(["simulate", "--device", "Kitchen", "--targets", "25"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("What happened: Sending 'up'"));
}

#[test]
fn run_serves_stdin_until_quit() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);
    rfx(&cfg)
        .arg("run")
        .write_stdin("set Kitchen 50\nget Kitchen\nswitch Lamp on\nget Lamp\nget Attic\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kitchen: ok"))
        .stdout(predicate::str::contains(
            "Kitchen: increasing target=50 current=0",
        ))
        .stdout(predicate::str::contains("Lamp: on"))
        .stdout(predicate::str::contains("Attic: error"));
}

#[test]
fn run_drains_pending_stop_at_end_of_input() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);
    rfx(&cfg)
        .args(["--json", "run"])
        .write_stdin("sensor Garden temperature=21.5 humidity=40\nget Garden\nset Porch 50\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"temperature\":21.5"))
        .stdout(predicate::str::contains("{\"name\":\"Porch\",\"ok\":true}"))
        .stderr(predicate::str::contains("\"command\":\"stop\""));
}
