use std::process::Command;
use std::{env, fs};

#[test]
fn failure_is_printed_when_console_logging_is_off() {
    let path = env::temp_dir().join(format!("wx_brief_cli_{}.toml", std::process::id()));
    fs::write(&path, "[general]\nlog_to_stdout = false\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_wx_brief"))
        .arg(&path)
        .env_remove("WX_BRIEF_CONFIG")
        .env_remove("REPORT_FORMAT")
        .env("SENDGRID_API_KEY", "SG.key")
        .env("EMAIL_FROM", "not an address")
        .env("EMAIL_TO", "crew@example.com")
        .output()
        .unwrap();

    fs::remove_file(&path).unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Initialization error"), "stderr: {}", stderr);
}
