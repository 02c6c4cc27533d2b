use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with an isolated config file and no inherited token
fn whoisbatch(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("whoisbatch").unwrap();
    cmd.env("WHOISBATCH_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("WHOISBATCH_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    whoisbatch(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lookup"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_lookup_without_targets_fails() {
    let dir = TempDir::new().unwrap();
    whoisbatch(&dir)
        .arg("lookup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No targets given"));
}

#[test]
fn test_simple_mode_json() {
    let dir = TempDir::new().unwrap();
    whoisbatch(&dir)
        .args(["lookup", "--simple", "-o", "json", "8.8.8.8", "example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""target": "8.8.8.8""#))
        .stdout(predicate::str::contains(r#""source": "simple""#))
        .stdout(predicate::str::contains("virustotal.com"));
}

#[test]
fn test_simple_mode_csv_from_file() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("targets.txt");
    std::fs::write(&list, "# suspicious\n203.0.113.9\n\n2001:db8::1 # v6\n").unwrap();

    whoisbatch(&dir)
        .args(["lookup", "--simple", "-o", "csv", "-f"])
        .arg(&list)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "target,organization,country_code,country_name,classification,status,links",
        ))
        .stdout(predicate::str::contains("203.0.113.9,N/A,N/A,N/A,Standard Connection,Success (Simple)"))
        .stdout(predicate::str::contains("2001:db8::1"));
}

#[test]
fn test_missing_targets_file() {
    let dir = TempDir::new().unwrap();
    whoisbatch(&dir)
        .args(["lookup", "--simple", "-f"])
        .arg(dir.path().join("nope.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read targets"));
}

#[test]
fn test_config_set_and_show() {
    let dir = TempDir::new().unwrap();
    whoisbatch(&dir)
        .args(["config", "set", "preset", "fast"])
        .assert()
        .success();
    whoisbatch(&dir)
        .args(["config", "set", "api_key", "abcdefghijkl"])
        .assert()
        .success();

    whoisbatch(&dir)
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""workers": 2"#))
        .stdout(predicate::str::contains(r#""politeness_delay_ms": 1400"#))
        .stdout(predicate::str::contains("abcdefghijkl").not());
}

#[test]
fn test_config_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    whoisbatch(&dir)
        .args(["config", "set", "workers", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers must be at least 1"));
    whoisbatch(&dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_path_honours_env() {
    let dir = TempDir::new().unwrap();
    whoisbatch(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
