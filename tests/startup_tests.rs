//! Tests for main.rs startup validation (JWT_SECRET, token settings, cookie flags)

use std::fs;
use std::process::{Child, Command, Output, Stdio};
use std::time::Duration;

const SECRET: &str = "test-secret-that-is-long-enough-32chars";

/// Binary with every token setting supplied and no ambient configuration.
fn command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tokengate"));
    command
        .env_remove("JWT_SECRET")
        .env("ACCESS_TOKEN_NAME", "jwtAccessToken")
        .env("ACCESS_TOKEN_VALIDITY", "300")
        .env("REFRESH_TOKEN_NAME", "jwtRefreshToken")
        .env("REFRESH_TOKEN_VALIDITY", "3600")
        .env_remove("COOKIE_DOMAIN")
        .stderr(Stdio::piped())
        .stdout(Stdio::piped());
    command
}

fn combined_output(output: &Output) -> String {
    // tracing logs to stdout by default
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{}{}", stdout, stderr)
}

fn assert_fails_mentioning(command: &mut Command, needles: &[&str]) {
    let output = command.output().expect("Failed to run binary");
    assert!(!output.status.success(), "Should exit with error");

    let combined = combined_output(&output);
    for needle in needles {
        assert!(
            combined.contains(needle),
            "Should mention {:?}, got: {}",
            needle,
            combined
        );
    }
}

/// Give the server a moment, then require it to still be running.
fn assert_keeps_running(mut child: Child) {
    std::thread::sleep(Duration::from_millis(500));

    match child.try_wait() {
        Ok(Some(status)) => {
            let output = child.wait_with_output().unwrap();
            panic!(
                "Server exited unexpectedly with status {:?}, output: {}",
                status,
                combined_output(&output)
            );
        }
        Ok(None) => {
            child.kill().ok();
            child.wait().ok();
        }
        Err(e) => {
            panic!("Error checking process status: {}", e);
        }
    }
}

#[test]
fn test_missing_jwt_secret_exits_with_error() {
    assert_fails_mentioning(&mut command(), &["JWT_SECRET", "required"]);
}

#[test]
fn test_missing_access_validity_exits_with_error() {
    assert_fails_mentioning(
        command()
            .env("JWT_SECRET", SECRET)
            .env_remove("ACCESS_TOKEN_VALIDITY"),
        &["ACCESS_TOKEN_VALIDITY", "required"],
    );
}

#[test]
fn test_missing_refresh_name_exits_with_error() {
    assert_fails_mentioning(
        command()
            .env("JWT_SECRET", SECRET)
            .env_remove("REFRESH_TOKEN_NAME"),
        &["REFRESH_TOKEN_NAME", "required"],
    );
}

#[test]
fn test_short_jwt_secret_exits_with_error() {
    assert_fails_mentioning(command().env("JWT_SECRET", "short"), &["32"]);
}

#[test]
fn test_same_cookie_names_exit_with_error() {
    assert_fails_mentioning(
        command()
            .env("JWT_SECRET", SECRET)
            .env("REFRESH_TOKEN_NAME", "jwtAccessToken"),
        &["jwtAccessToken"],
    );
}

#[test]
fn test_same_site_none_requires_secure() {
    assert_fails_mentioning(
        command()
            .env("JWT_SECRET", SECRET)
            .args(["--same-site", "none"]),
        &["SameSite=None"],
    );
}

#[test]
fn test_jwt_secret_file_not_found() {
    assert_fails_mentioning(
        command().args(["--jwt-secret-file", "/nonexistent/path/to/secret"]),
        &["Failed to read JWT secret file"],
    );
}

#[test]
fn test_valid_configuration_starts() {
    let child = command()
        .env("JWT_SECRET", SECRET)
        .args(["--port", "0"])
        .spawn()
        .expect("Failed to run binary");

    assert_keeps_running(child);
}

#[test]
fn test_jwt_secret_file() {
    let secret_file =
        std::env::temp_dir().join(format!("tokengate_secret_test_{}", std::process::id()));
    fs::write(&secret_file, "this-is-a-long-secret-from-file-for-testing\n").unwrap();

    let child = command()
        .args([
            "--jwt-secret-file",
            secret_file.to_str().unwrap(),
            "--port",
            "0",
        ])
        .spawn()
        .expect("Failed to run binary");

    std::thread::sleep(Duration::from_millis(100));
    let _ = fs::remove_file(&secret_file);

    assert_keeps_running(child);
}
