//! Integration tests for the `animate` command.
//!
//! The clock is paused so the fill, drain, and repair timers auto-advance and a full
//! leak cycle finishes instantly. Only auto-restarting variants are driven from here,
//! since the gated variant reads its controls from stdin.

use pipeleak::Host;
use std::io::Write;

/// Test host that captures output to in-memory buffers.
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, _code: i32) {}
}

#[tokio::test(start_paused = true)]
async fn test_animate_single_cycle() {
    let mut host = TestHost::new();
    let result = pipeleak::run(
        &mut host,
        ["pipeleak", "animate", "--cycles", "1", "--seed", "3", "--color", "never"],
    )
    .await;

    assert!(result.is_ok(), "animate should succeed: {result:?}");
    assert_eq!(host.output_str(), "Completed 1 leak cycle(s)\n");
}

#[tokio::test(start_paused = true)]
async fn test_animate_shake_variant_several_cycles() {
    let mut host = TestHost::new();
    let result = pipeleak::run(
        &mut host,
        ["pipeleak", "animate", "--variant", "shake", "--cycles", "3", "--color", "never"],
    )
    .await;

    assert!(result.is_ok(), "animate should succeed: {result:?}");
    assert!(host.output_str().contains("Completed 3 leak cycle(s)"));
}

#[tokio::test(start_paused = true)]
async fn test_animate_with_config_file() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("fast.toml");
    std::fs::write(
        &config_path,
        r#"
[leak]
initial_threshold = 20.0
threshold_min = 20.0
threshold_max = 30.0
repair_delay = "100ms"

[drain]
floor = 2.0
"#,
    )
    .expect("Failed to write test config");

    let mut host = TestHost::new();
    let result = pipeleak::run(
        &mut host,
        [
            "pipeleak",
            "animate",
            "--cycles",
            "2",
            "--color",
            "never",
            "--config",
            config_path.to_str().expect("temp path should be UTF-8"),
        ],
    )
    .await;

    assert!(result.is_ok(), "animate should succeed: {result:?}");
    assert!(host.output_str().contains("Completed 2 leak cycle(s)"));
}

#[tokio::test(start_paused = true)]
async fn test_animate_rejects_invalid_config() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("bad.toml");
    std::fs::write(&config_path, "[fill]\nstutter_chance = 4.0\n").expect("Failed to write test config");

    let mut host = TestHost::new();
    let result = pipeleak::run(
        &mut host,
        [
            "pipeleak",
            "animate",
            "--cycles",
            "1",
            "--config",
            config_path.to_str().expect("temp path should be UTF-8"),
        ],
    )
    .await;

    assert!(result.is_err(), "an out of range probability should be rejected");
    assert!(host.output_str().is_empty());
}
