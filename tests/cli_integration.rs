//! Integration tests for the sitepass CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`. Commands
//! that ask for master secrets need a terminal, so we cover the paths that
//! finish or fail before any prompt: help, listing, lookup errors and
//! completions.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const FIXTURE: &str = "\
site_name,id,seed,plen,char,update_date,start,rm_cha,upper_lower
example.com,me@example.com,s33d-one,16,an,2024/05/17,0,0O,lower
mail.example,,s33d-two,20.0,ans,2019/03/01,,,
example.com,me@example.com,s33d-three,12,a,2024/06/01,1,,upper
";

/// Helper: get a Command pointing at the sitepass binary, run in `dir`.
fn sitepass(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("sitepass").expect("binary should exist");
    cmd.current_dir(dir.path())
        .env_remove("SITEPASS_STORE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_flag_shows_usage() {
    let tmp = TempDir::new().unwrap();
    sitepass(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stateless site password generator"))
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag_shows_version() {
    let tmp = TempDir::new().unwrap();
    sitepass(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sitepass"));
}

#[test]
fn no_args_shows_help() {
    let tmp = TempDir::new().unwrap();
    sitepass(&tmp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn list_on_missing_store_is_empty() {
    let tmp = TempDir::new().unwrap();
    sitepass(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sites"));

    // Listing never creates the store.
    tmp.child("sites.csv").assert(predicate::path::missing());
}

#[test]
fn list_shows_latest_row_per_site() {
    let tmp = TempDir::new().unwrap();
    tmp.child("sites.csv").write_str(FIXTURE).unwrap();

    sitepass(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 site(s)"))
        .stdout(predicate::str::contains("example.com"))
        .stdout(predicate::str::contains("mail.example"))
        .stdout(predicate::str::contains("2024/06/01"))
        .stdout(predicate::str::contains("s33d").not());
}

#[test]
fn list_json_omits_seeds() {
    let tmp = TempDir::new().unwrap();
    tmp.child("sites.csv").write_str(FIXTURE).unwrap();

    let output = sitepass(&tmp).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());

    let sites: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let sites = sites.as_array().unwrap();
    assert_eq!(sites.len(), 2);

    assert_eq!(sites[0]["site_name"], "example.com");
    assert_eq!(sites[0]["plen"], 12);
    assert_eq!(sites[0]["char"], "a");
    assert_eq!(sites[0]["upper_lower"], "upper");
    assert_eq!(sites[0]["update_date"], "2024-06-01");
    assert!(sites[0].get("seed").is_none());

    assert_eq!(sites[1]["site_name"], "mail.example");
    assert_eq!(sites[1]["plen"], 20);
    assert_eq!(sites[1]["start"], 1);
}

#[test]
fn store_flag_selects_file() {
    let tmp = TempDir::new().unwrap();
    tmp.child("elsewhere").create_dir_all().unwrap();
    tmp.child("elsewhere/params.csv").write_str(FIXTURE).unwrap();

    sitepass(&tmp)
        .args(["list", "--store", "elsewhere/params.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mail.example"));
}

#[test]
fn store_env_var_selects_file() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.child("from-env.csv");
    store.write_str(FIXTURE).unwrap();

    sitepass(&tmp)
        .env("SITEPASS_STORE", store.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("mail.example"));
}

#[test]
fn config_file_selects_store() {
    let tmp = TempDir::new().unwrap();
    tmp.child("private").create_dir_all().unwrap();
    tmp.child("private/sites.csv").write_str(FIXTURE).unwrap();
    tmp.child(".sitepass.toml")
        .write_str("store_path = \"private/sites.csv\"\n")
        .unwrap();

    sitepass(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 site(s)"));
}

#[test]
fn broken_config_file_fails() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".sitepass.toml")
        .write_str("default_length = \"long\"\n")
        .unwrap();

    sitepass(&tmp)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file error"));
}

#[test]
fn show_unknown_site_fails_before_prompting() {
    let tmp = TempDir::new().unwrap();
    tmp.child("sites.csv").write_str(FIXTURE).unwrap();

    sitepass(&tmp)
        .args(["show", "nowhere.example"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stdout(predicate::str::contains("Canary").not());
}

#[test]
fn show_with_unsupported_mode_fails_before_prompting() {
    let tmp = TempDir::new().unwrap();
    tmp.child("sites.csv")
        .write_str("site_name,seed,char\nbad.example,s,xyz\n")
        .unwrap();

    sitepass(&tmp)
        .args(["show", "bad.example"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported mode 'xyz'"))
        .stdout(predicate::str::contains("Canary").not());
}

#[test]
fn show_with_zero_length_fails_before_prompting() {
    let tmp = TempDir::new().unwrap();
    tmp.child("sites.csv")
        .write_str("site_name,seed,plen\nzero.example,s,0\n")
        .unwrap();

    sitepass(&tmp)
        .args(["show", "zero.example"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid parameter"));
}

#[test]
fn completions_bash_generates_script() {
    let tmp = TempDir::new().unwrap();
    sitepass(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sitepass"));
}

#[test]
fn completions_invalid_shell_fails() {
    let tmp = TempDir::new().unwrap();
    sitepass(&tmp)
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown shell"));
}

#[cfg(feature = "audit-log")]
#[test]
fn history_on_fresh_directory_is_empty() {
    let tmp = TempDir::new().unwrap();
    sitepass(&tmp)
        .arg("history")
        .assert()
        .success();
}
