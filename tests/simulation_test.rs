use std::process::Command;

fn run_headless(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_traffic_signal_env"))
        .arg("--headless")
        .args(args)
        .env("RUST_LOG", "warn,traffic_signal_env=info")
        .output()
        .expect("Failed to execute environment")
}

/// Test that an episode runs in headless mode without crashing
#[test]
fn test_headless_episode_runs() {
    let output = run_headless(&["--seed", "7"]);

    assert!(
        output.status.success(),
        "Environment failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("EPISODE COMPLETE"),
        "Episode did not complete properly. stderr: {}",
        stderr
    );
}

/// Test that episode statistics are logged
#[test]
fn test_episode_statistics_logged() {
    let output = run_headless(&["--seed", "7", "--action", "2,2,2,2"]);
    assert!(output.status.success(), "Environment failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    for label in [
        "Reward:",
        "Total vehicles spawned:",
        "Total vehicles crossed:",
        "Queued vehicles:",
        "Simulated seconds:",
    ] {
        assert!(stderr.contains(label), "Missing '{}' statistic", label);
    }
}

/// Test that several episodes run back to back
#[test]
fn test_multiple_episodes() {
    let output = run_headless(&["--seed", "1", "--episodes", "2"]);
    assert!(output.status.success(), "Environment failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("EPISODE COMPLETE").count(), 2);
    assert!(
        stderr.contains("Mean reward over 2 episodes"),
        "Missing mean reward. stderr: {}",
        stderr
    );
}

/// Test that negative adjustments are accepted on the command line
#[test]
fn test_negative_action() {
    let output = run_headless(&["--arrivals", "0", "--action=-5,0,0,0"]);
    assert!(output.status.success(), "Negative adjustment was rejected");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Reward: 0"), "No arrivals should give zero reward");
}

/// Test that a malformed action is rejected
#[test]
fn test_malformed_action_fails() {
    let output = run_headless(&["--action", "1,2"]);
    assert!(
        !output.status.success(),
        "An action with two values should be rejected"
    );
}
