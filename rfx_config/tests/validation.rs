use rfx_config::{load_file, load_toml};
use rstest::rstest;

const VALID: &str = r#"
name = "RFXCOM"

[transport]
tty = "/dev/ttyUSB0"
debug = false

[logging]
level = "debug"
rotation = "daily"

[[devices.rfy]]
device_id = "0x123456/1"
name = "Living room"
reversed = false
open_duration_seconds = 30
close_duration_seconds = 25
force_close_at_startup = true

[[devices.switch]]
device_id = "0x00F1A2/1"
name = "Garden light"
type = "Lighting2"
subtype = "AC"
force_off_at_startup = true

[[devices.weather_sensor]]
device_id = "0x1234"
name = "Terrace"
type = "temperaturehumidity1"
"#;

#[rstest]
fn accepts_full_config() {
    let cfg = load_toml(VALID).expect("parse TOML");
    cfg.validate().expect("valid config should pass");

    let rfy = &cfg.devices.rfy[0];
    assert_eq!(rfy.device_id, "0x123456/1");
    assert_eq!(rfy.open_seconds(), Some(30.0));
    assert_eq!(rfy.close_seconds(), Some(25.0));
    assert!(rfy.force_close_at_startup);

    let sw = &cfg.devices.switch[0];
    assert_eq!(sw.kind, "Lighting2");
    assert_eq!(sw.subtype, "AC");

    assert_eq!(cfg.devices.weather_sensor[0].kind, "temperaturehumidity1");
}

#[rstest]
#[case("open_duration_seconds = -1\nclose_duration_seconds = 25", "finite value >= 0")]
#[case("open_duration_seconds = 30\nclose_duration_seconds = 7200", "unreasonably large")]
#[case("open_duration_seconds = 30", "are required")]
#[case("open_duration_seconds = nan\nclose_duration_seconds = 25", "finite value >= 0")]
fn rejects_bad_durations(#[case] durations: &str, #[case] needle: &str) {
    let toml = format!(
        "[[devices.rfy]]\ndevice_id = \"0x01/1\"\nname = \"Blind\"\n{durations}\n"
    );
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "expected '{needle}' in '{err}'"
    );
}

#[rstest]
fn zero_durations_are_allowed() {
    let toml = r#"
[[devices.rfy]]
device_id = "0x01/1"
name = "Blind"
open_duration_seconds = 0
close_duration_seconds = 0
"#;
    load_toml(toml).unwrap().validate().unwrap();
}

#[rstest]
fn rejects_duplicate_names_across_kinds() {
    let toml = r#"
[[devices.rfy]]
device_id = "0x01/1"
name = "Hall"
open_duration_seconds = 10
close_duration_seconds = 10

[[devices.switch]]
device_id = "0x02/1"
name = "Hall"
type = "Lighting2"
subtype = "AC"
"#;
    let err = load_toml(toml).unwrap().validate().unwrap_err();
    assert!(format!("{err}").contains("duplicate device name 'Hall'"));
}

#[rstest]
fn rejects_empty_device_id() {
    let toml = r#"
[[devices.weather_sensor]]
device_id = ""
name = "Attic"
type = "temperature1"
"#;
    let err = load_toml(toml).unwrap().validate().unwrap_err();
    assert!(format!("{err}").contains("non-empty device_id"));
}

#[rstest]
fn rejects_unknown_rotation() {
    let toml = "[logging]\nrotation = \"weekly\"\n";
    let err = load_toml(toml).unwrap().validate().unwrap_err();
    assert!(format!("{err}").contains("never|daily|hourly"));
}

#[rstest]
fn missing_required_field_is_parse_error() {
    let toml = "[[devices.switch]]\ndevice_id = \"0x02/1\"\nname = \"Lamp\"\n";
    assert!(load_toml(toml).is_err());
}

#[rstest]
fn load_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridge.toml");
    std::fs::write(&path, VALID).unwrap();
    let cfg = load_file(&path).unwrap();
    assert_eq!(cfg.devices.rfy.len(), 1);

    let err = load_file(&dir.path().join("missing.toml")).unwrap_err();
    assert!(format!("{err}").contains("read config"));
}
