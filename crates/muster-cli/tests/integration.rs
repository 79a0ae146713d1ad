use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn muster(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("muster").unwrap();
    cmd.current_dir(dir.path()).env("MUSTER_ROOT", dir.path());
    cmd
}

fn init_workspace(dir: &TempDir) {
    muster(dir).arg("init").assert().success();
}

fn seed_population(dir: &TempDir) {
    for args in [
        vec!["roster", "add-coordinator", "1", "--name", "avery"],
        vec!["roster", "add-coordinator", "2", "--name", "blake"],
        vec!["roster", "add-subject", "10"],
        vec!["roster", "add-subject", "11"],
        vec!["roster", "add-subject", "12"],
        vec!["roster", "add-subject", "13"],
    ] {
        muster(dir).args(&args).assert().success();
    }
}

// ---------------------------------------------------------------------------
// muster init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    muster(&dir).arg("init").assert().success();

    assert!(dir.path().join(".muster").is_dir());
    assert!(dir.path().join(".muster/units").is_dir());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    muster(&dir).arg("init").assert().success();
    muster(&dir).arg("init").assert().success();
}

#[test]
fn commands_fail_before_init() {
    let dir = TempDir::new().unwrap();
    muster(&dir)
        .arg("setup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// roster
// ---------------------------------------------------------------------------

#[test]
fn roster_add_and_show() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_population(&dir);

    muster(&dir)
        .args(["roster", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("avery"))
        .stdout(predicate::str::contains("blake"))
        .stdout(predicate::str::contains("13"));
}

#[test]
fn roster_set_eligible_requires_known_id() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    muster(&dir)
        .args(["roster", "set-eligible", "99", "false"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not on the roster"));
}

#[test]
fn rosters_are_per_unit() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    muster(&dir)
        .args(["--unit", "1", "roster", "add-coordinator", "5"])
        .assert()
        .success();

    muster(&dir)
        .args(["--unit", "2", "roster", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5").not());
}

// ---------------------------------------------------------------------------
// setup / whois / stats
// ---------------------------------------------------------------------------

#[test]
fn setup_stripes_every_subject() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_population(&dir);

    muster(&dir)
        .args(["config", "set-stripes", "2"])
        .assert()
        .success();

    muster(&dir)
        .arg("setup")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "striped 4 subjects across 2 coordinators",
        ));

    // With two coordinators and stripe count 2, both hold every subject.
    for subject in ["10", "11", "12", "13"] {
        let output = muster(&dir)
            .args(["whois", subject, "--json"])
            .output()
            .unwrap();
        let holders: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(holders.as_array().unwrap().len(), 2, "subject {subject}");
    }
}

#[test]
fn zen_mark_moves_stats() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_population(&dir);
    muster(&dir).arg("setup").assert().success();

    muster(&dir)
        .args(["zen", "mark", "1", "10"])
        .assert()
        .success();

    let output = muster(&dir)
        .args(["zen", "stats", "1", "--json"])
        .output()
        .unwrap();
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats[0]["contacted"], 1);
}

#[test]
fn zen_stats_without_assignments_shows_na() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    muster(&dir)
        .args(["roster", "add-coordinator", "1"])
        .assert()
        .success();
    muster(&dir).arg("setup").assert().success();

    muster(&dir)
        .args(["zen", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("n/a"));
}

#[test]
fn zen_roster_renders_template() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_population(&dir);
    muster(&dir)
        .args(["config", "set-zen-template", "ping {subject}"])
        .assert()
        .success();
    muster(&dir).arg("setup").assert().success();

    muster(&dir)
        .args(["zen", "roster", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ping 1"));
}

// ---------------------------------------------------------------------------
// arrived / reassign
// ---------------------------------------------------------------------------

#[test]
fn arrived_assigns_new_subject() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_population(&dir);
    muster(&dir).arg("setup").assert().success();

    muster(&dir)
        .args(["roster", "add-subject", "14"])
        .assert()
        .success();
    muster(&dir)
        .args(["arrived", "14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("assigned 14"));

    let output = muster(&dir)
        .args(["whois", "14", "--json"])
        .output()
        .unwrap();
    let holders: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!holders.as_array().unwrap().is_empty());
}

#[test]
fn arrived_without_coordinators_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    muster(&dir)
        .args(["roster", "add-subject", "14"])
        .assert()
        .success();

    muster(&dir)
        .args(["arrived", "14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("left unassigned"));
}

#[test]
fn reassign_unknown_pair_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_population(&dir);

    muster(&dir)
        .args(["reassign", "10", "--from", "1", "--to", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not assigned"));
}

// ---------------------------------------------------------------------------
// check / repair
// ---------------------------------------------------------------------------

#[test]
fn check_and_repair_after_demotion() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_population(&dir);
    muster(&dir).arg("setup").assert().success();

    muster(&dir)
        .args(["check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("still eligible"));

    muster(&dir)
        .args(["roster", "set-eligible", "1", "false"])
        .assert()
        .success();

    muster(&dir)
        .args(["check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lost role"));

    muster(&dir)
        .args(["repair"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed 1 coordinator"));

    // Everything now sits with coordinator 2.
    for subject in ["10", "11", "12", "13"] {
        let output = muster(&dir)
            .args(["whois", subject, "--json"])
            .output()
            .unwrap();
        let holders: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let ids: Vec<u64> = holders
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["coordinator"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![2], "subject {subject}");
    }
}

#[test]
fn repair_with_no_eligible_targets_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_population(&dir);
    muster(&dir).arg("setup").assert().success();

    muster(&dir)
        .args(["roster", "set-eligible", "1", "false"])
        .assert()
        .success();
    muster(&dir)
        .args(["roster", "set-eligible", "2", "false"])
        .assert()
        .success();

    muster(&dir)
        .args(["repair"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no eligible coordinators"));

    // The table survives untouched.
    let output = muster(&dir)
        .args(["whois", "10", "--json"])
        .output()
        .unwrap();
    let holders: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!holders.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// update round
// ---------------------------------------------------------------------------

#[test]
fn update_round_mark_status_reset() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_population(&dir);
    muster(&dir).arg("setup").assert().success();

    muster(&dir)
        .args(["update", "mark", "10", "1"])
        .assert()
        .success();
    muster(&dir)
        .args(["update", "status", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("avery"));

    // Subject 10 drops off every whip roster once anyone has reached them.
    muster(&dir)
        .args(["update", "roster", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reminder for 10").not());

    muster(&dir).args(["update", "reset"]).assert().success();
    muster(&dir)
        .args(["update", "status", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nobody has reached 10"));
}

#[test]
fn update_mark_unknown_coordinator_fails() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);
    seed_population(&dir);

    muster(&dir)
        .args(["update", "mark", "10", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown coordinator"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_roundtrip() {
    let dir = TempDir::new().unwrap();
    init_workspace(&dir);

    muster(&dir)
        .args(["config", "set-stripes", "5"])
        .assert()
        .success();
    muster(&dir)
        .args(["config", "set-whip-template", "chase {subject} now"])
        .assert()
        .success();

    let output = muster(&dir)
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["stripe_count"], 5);
    assert_eq!(config["whip_template"], "chase {subject} now");
}
