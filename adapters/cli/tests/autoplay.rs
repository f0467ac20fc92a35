use std::process::Command;

fn play(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_loop-quest"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch the loop-quest binary")
}

#[test]
fn one_turn_prints_banner_census_and_summary() {
    let output = play(&["--turns", "1", "--seed", "1"]);
    assert!(output.status.success(), "exit status {}", output.status);

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("Welcome to Loop Quest."));
    let census = lines.next().expect("census line");
    assert!(census.starts_with("seed 1: "), "{census}");
    for part in ["regions", "bridges", "shops", "tiles"] {
        assert!(census.contains(part), "{census} lacks {part}");
    }
    let summary = stdout.lines().last().expect("summary line");
    assert!(summary.starts_with("after "), "{summary}");
}

#[test]
fn same_seed_replays_identically() {
    let first = play(&["--turns", "2", "--seed", "42"]);
    let second = play(&["--turns", "2", "--seed", "42"]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn unreadable_config_fails_with_its_path() {
    let output = play(&["--config", "/no/such/loop-quest.toml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/no/such/loop-quest.toml"), "{stderr}");
}
