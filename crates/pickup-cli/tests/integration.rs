#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SECRET: &str = "letmein";
const WEEK: &str = "2024-06-02";

fn pickup(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pickup").unwrap();
    cmd.current_dir(dir.path())
        .env("PICKUP_ROOT", dir.path())
        .env("PICKUP_ADMIN_PASSWORD", SECRET)
        .env_remove("PICKUP_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn init_schedule(dir: &TempDir) {
    pickup(dir).arg("init").assert().success();
}

fn add_person(dir: &TempDir, name: &str, phone: &str) {
    pickup(dir)
        .args(["--password", SECRET, "people", "add", name, "--phone", phone])
        .assert()
        .success();
}

fn read_json(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = pickup(dir).arg("--json").args(args).output().unwrap();
    assert!(output.status.success(), "{args:?} failed");
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// pickup init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_schedule() {
    let dir = TempDir::new().unwrap();
    pickup(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .pickup/config.yaml"));

    assert!(dir.path().join(".pickup/config.yaml").exists());
    assert!(dir.path().join(".pickup/schedule.json").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    pickup(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .pickup/config.yaml"));
}

#[test]
fn commands_require_init() {
    let dir = TempDir::new().unwrap();
    pickup(&dir)
        .arg("week")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pickup init"));
}

#[test]
fn config_validate_accepts_defaults() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    pickup(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

// ---------------------------------------------------------------------------
// roster
// ---------------------------------------------------------------------------

#[test]
fn people_add_and_list() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    add_person(&dir, "Dana", "0501234567");

    pickup(&dir)
        .args(["people", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dana"))
        .stdout(predicate::str::contains("0501234567"));
}

#[test]
fn people_add_requires_admin() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    pickup(&dir)
        .args(["people", "add", "Dana"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("admin login required"));

    let people = read_json(&dir, &["people", "list"]);
    assert_eq!(people.as_array().unwrap().len(), 0);
}

#[test]
fn duplicate_person_rejected() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    add_person(&dir, "Dana", "0501234567");
    pickup(&dir)
        .args(["--password", SECRET, "people", "add", "Dana"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let people = read_json(&dir, &["people", "list"]);
    assert_eq!(people.as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// week / assign / remind
// ---------------------------------------------------------------------------

#[test]
fn assign_shows_in_week_and_reminder() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    add_person(&dir, "Dana", "0501234567");

    pickup(&dir)
        .args(["assign", "0", "Dana", "--week", WEEK])
        .assert()
        .success()
        .stdout(predicate::str::contains("Assigned Dana to Sunday 02/06"));

    let week = read_json(&dir, &["week", "--week", WEEK]);
    assert_eq!(week["week"], WEEK);
    assert_eq!(week["slots"].as_array().unwrap().len(), 6);
    assert_eq!(week["slots"][0]["assignment"]["person_name"], "Dana");
    assert!(week["slots"][1]["assignment"].is_null());

    pickup(&dir)
        .args(["remind", "--week", WEEK])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://wa.me/972501234567?text="));
}

#[test]
fn assign_accepts_day_names_and_any_date_in_week() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    add_person(&dir, "Dana", "0501234567");

    pickup(&dir)
        .args(["assign", "wed", "Dana", "--week", "2024-06-06"])
        .assert()
        .success();

    let week = read_json(&dir, &["week", "--week", WEEK]);
    assert_eq!(week["slots"][3]["assignment"]["person_name"], "Dana");
}

#[test]
fn assign_unknown_person_fails() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    pickup(&dir)
        .args(["assign", "0", "Nobody", "--week", WEEK])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in the roster"));
}

#[test]
fn invalid_day_is_rejected() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    add_person(&dir, "Dana", "0501234567");
    pickup(&dir)
        .args(["assign", "6", "Dana", "--week", WEEK])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid slot"));
}

// ---------------------------------------------------------------------------
// admin gates
// ---------------------------------------------------------------------------

#[test]
fn clear_requires_admin() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    add_person(&dir, "Dana", "0501234567");
    pickup(&dir)
        .args(["assign", "0", "Dana", "--week", WEEK])
        .assert()
        .success();

    pickup(&dir)
        .args(["clear", "0", "--week", WEEK])
        .assert()
        .failure()
        .stderr(predicate::str::contains("admin login required"));

    pickup(&dir)
        .args(["--password", SECRET, "clear", "0", "--week", WEEK])
        .assert()
        .success();
    let week = read_json(&dir, &["week", "--week", WEEK]);
    assert!(week["slots"][0]["assignment"].is_null());
}

#[test]
fn wrong_password_is_refused() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    pickup(&dir)
        .args(["--password", "guess", "clear", "0", "--week", WEEK])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong admin password"));
}

#[test]
fn reset_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    add_person(&dir, "Dana", "0501234567");
    pickup(&dir)
        .args(["assign", "1", "Dana", "--week", WEEK])
        .assert()
        .success();

    pickup(&dir)
        .args(["--password", SECRET, "reset", "--week", WEEK])
        .assert()
        .failure()
        .stderr(predicate::str::contains("confirmation"));
    let week = read_json(&dir, &["week", "--week", WEEK]);
    assert_eq!(week["slots"][1]["assignment"]["person_name"], "Dana");

    pickup(&dir)
        .args(["--password", SECRET, "reset", "--yes", "--week", WEEK])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed 1"));
}

// ---------------------------------------------------------------------------
// pickup shell
// ---------------------------------------------------------------------------

#[test]
fn shell_keeps_session_between_lines() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);

    pickup(&dir)
        .arg("shell")
        .write_stdin(format!(
            "people add Dana --phone 0501234567\nlogin {SECRET}\npeople add Dana --phone 0501234567\nassign 0 Dana\nlogout\nclear 0\nquit\n"
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as admin."))
        .stdout(predicate::str::contains("Added Dana"))
        .stdout(predicate::str::contains("Assigned Dana to Sunday"))
        .stderr(predicate::str::contains("admin login required to add people"))
        .stderr(predicate::str::contains("admin login required to clear slots"));
}

#[test]
fn shell_reports_unknown_commands_and_continues() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);

    pickup(&dir)
        .arg("shell")
        .write_stdin("dance\npeople\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown command 'dance'"))
        .stdout(predicate::str::contains("No people yet."));
}

#[test]
fn shell_keeps_spacing_inside_names() {
    let dir = TempDir::new().unwrap();
    init_schedule(&dir);
    add_person(&dir, "Dana  Levi", "0501234567");

    pickup(&dir)
        .arg("shell")
        .write_stdin("assign 0   Dana  Levi\nassign 1 Dana Levi\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Assigned Dana  Levi to Sunday"))
        .stderr(predicate::str::contains("not in the roster"));
}
