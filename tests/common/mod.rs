#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const DISCLOSURE_PREFIX: &str = "You are the Secret Santa for";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        Self { _tmp: tmp, home }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("gifter");
        cmd.env("HOME", &self.home).env_remove("RUST_LOG");
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_fail(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        let err: Value = serde_json::from_slice(&out).expect("error json output");
        assert_eq!(err["ok"], false);
        err
    }

    /// Guild owned by `1` (Nick) plus the given `(id, name, handle, dms)` members.
    pub fn guild(&self, members: &[(&str, &str, &str, &str)]) {
        self.run_json(&["guild", "init", "--owner", "1", "--name", "Nick", "--handle", "nick"]);
        for (id, name, handle, dms) in members {
            self.run_json(&[
                "guild",
                "add-member",
                id,
                "--name",
                name,
                "--handle",
                handle,
                "--dms",
                dms,
            ]);
        }
    }

    pub fn join(&self, id: &str) -> Value {
        self.run_json(&["--as", id, "join"])
    }

    pub fn inbox(&self, id: &str) -> Vec<String> {
        texts(&self.run_json(&["guild", "inbox", id]))
    }

    pub fn feed(&self) -> Vec<String> {
        texts(&self.run_json(&["guild", "feed"]))
    }

    pub fn write_config(&self, raw: &str) {
        let path = self.home.join(".config/gifter/config.toml");
        fs::create_dir_all(path.parent().expect("config parent")).expect("create config dir");
        fs::write(path, raw).expect("write config");
    }
}

fn texts(out: &Value) -> Vec<String> {
    out["data"]
        .as_array()
        .expect("message array")
        .iter()
        .map(|m| m["text"].as_str().expect("message text").to_string())
        .collect()
}
