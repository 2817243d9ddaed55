// Configuration layering as seen by the binary: file, TERRAPRICE__* variables
// and the hosted backend's own variable names

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FILE: &str = r#"
[backend]
table = "floorplan_submissions"

[review]
min_reason_length = 12
"#;

fn terraprice_in(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("terraprice").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_ANON_KEY")
        .env_remove("TERRAPRICE__BACKEND__URL")
        .env_remove("TERRAPRICE__BACKEND__API_KEY")
        .env_remove("TERRAPRICE__REVIEW__MIN_REASON_LENGTH")
        .env_remove("RUST_LOG");
    cmd
}

fn dir_with_config() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("terraprice.toml"), FILE).unwrap();
    dir
}

#[test]
fn test_file_values_are_used_without_overrides() {
    let dir = dir_with_config();
    terraprice_in(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("min_reason_length = 12"));
}

#[test]
fn test_prefixed_variable_overrides_file() {
    let dir = dir_with_config();
    terraprice_in(&dir)
        .arg("config")
        .env("TERRAPRICE__REVIEW__MIN_REASON_LENGTH", "4")
        .assert()
        .success()
        .stdout(predicate::str::contains("min_reason_length = 4"))
        .stdout(predicate::str::contains("min_reason_length = 12").not());
}

#[test]
fn test_prefixed_backend_url_wins_over_supabase_url() {
    let dir = dir_with_config();
    terraprice_in(&dir)
        .arg("config")
        .env("TERRAPRICE__BACKEND__URL", "https://primary.example.co")
        .env("SUPABASE_URL", "https://fallback.example.co")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://primary.example.co"))
        .stdout(predicate::str::contains("https://fallback.example.co").not());
}

#[test]
fn test_supabase_variables_fill_missing_backend_settings() {
    let dir = dir_with_config();
    terraprice_in(&dir)
        .arg("config")
        .env("SUPABASE_URL", "https://fallback.example.co")
        .env("SUPABASE_ANON_KEY", "anon-secret-key")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://fallback.example.co"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("anon-secret-key").not());
}

#[test]
fn test_explicit_config_path_is_honored() {
    let dir = TempDir::new().unwrap();
    let elsewhere = dir.path().join("review.toml");
    std::fs::write(&elsewhere, "[review]\nmin_reason_length = 25\n").unwrap();

    terraprice_in(&dir)
        .args(["--config", elsewhere.to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("min_reason_length = 25"));
}
