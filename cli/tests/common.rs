//! # Chatterify CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! Shared helpers for the integration tests. Every command built here runs
//! against an explicit `--config` file in a temporary directory with the
//! credential environment variables removed, so the developer's own setup
//! never leaks into a test.
//!

#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Environment variables that override configuration.
const OVERRIDE_VARS: [&str; 7] = [
    "OPENAI_API_KEY",
    "CHATTERIFY_COMPLETION_URL",
    "EMAILJS_SERVICE_ID",
    "EMAILJS_TEMPLATE_ID",
    "EMAILJS_PUBLIC_KEY",
    "CHATTERIFY_EMAIL_URL",
    "RUST_LOG",
];

/// Nothing listens on the discard port, so connections are refused at once.
pub const UNREACHABLE_COMPLETION_URL: &str = "http://127.0.0.1:9/v1/chat/completions";
pub const UNREACHABLE_EMAIL_URL: &str = "http://127.0.0.1:9/api/v1.0/email/send";

pub fn chatterify_cmd() -> Command {
    Command::cargo_bin("chatterify").expect("Failed to find chatterify binary for testing")
}

/// A config file holding `toml` in a fresh temporary directory.
pub fn config_file(toml: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("chatterify.toml");
    std::fs::write(&path, toml).expect("Failed to write config file");
    (dir, path)
}

/// `chatterify --config <path>` with the override variables cleared.
pub fn hermetic_cmd(config: &PathBuf) -> Command {
    let mut cmd = chatterify_cmd();
    for var in OVERRIDE_VARS {
        cmd.env_remove(var);
    }
    cmd.arg("--config").arg(config);
    cmd
}

/// Config whose completion and email endpoints both refuse connections.
pub fn unreachable_config() -> String {
    format!(
        "[completion]\napi_url = \"{}\"\ntimeout_secs = 5\n\n[email]\napi_url = \"{}\"\n",
        UNREACHABLE_COMPLETION_URL, UNREACHABLE_EMAIL_URL
    )
}
