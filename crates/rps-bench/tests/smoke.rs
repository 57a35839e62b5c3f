use std::fs;
use std::path::Path;

use rps_bench::arena::ArenaRunner;
use rps_bench::config::BenchmarkConfig;
use rps_core::game::Side;
use tempfile::tempdir;

fn load_config(output_dir: &Path, extra_matches: &str) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
matches:
  seed: 4242
  rounds: 40
{extra_matches}
opponents:
  - name: "rocky"
    kind: "constant"
    params:
      move: "rock"
  - name: "wheel"
    kind: "cycle"
    params:
      sequence: ["rock", "paper", "scissors"]
  - name: "dice"
    kind: "random"
  - name: "mirror"
    kind: "mirror_switch"
  - name: "self"
    kind: "selector"
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("rounds.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run_in(dir: &Path, extra_matches: &str) -> rps_bench::arena::RunSummary {
    let config = load_config(dir, extra_matches);
    let outputs = config.resolved_outputs();
    let runner = ArenaRunner::new(config, outputs).expect("runner created");
    runner.run().expect("matches complete")
}

#[test]
fn arena_smoke_test_writes_rows_and_summary() {
    let dir = tempdir().expect("temp dir");
    let summary = run_in(dir.path(), "");

    assert_eq!(summary.matches_played, 5);
    assert_eq!(summary.rounds_played, 200);
    assert_eq!(summary.rows_written, 200);

    let rocky = &summary.results[0];
    assert_eq!(rocky.opponent, "rocky");
    assert_eq!(rocky.wins, 40);
    assert_eq!(rocky.leader, Some(Side::Own));
    assert_eq!(rocky.winner, None);

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes to JSON"))
        .collect();
    assert_eq!(rows.len(), 200);
    assert_eq!(rows[0]["opponent"], "rocky");
    assert_eq!(rows[0]["round"], 0);
    assert_eq!(rows[0]["own_move"], "paper");
    assert_eq!(rows[0]["outcome"], "win");
    assert_eq!(rows[0]["standings"].as_array().map(Vec::len), Some(3));

    let markdown = fs::read_to_string(&summary.summary_path).expect("summary readable");
    assert!(markdown.contains("| rocky | 40 | 40 | 0 | 0 | 1.000 | Own | - |"));
}

#[test]
fn identical_seeds_reproduce_identical_rows() {
    let first = tempdir().expect("temp dir");
    let second = tempdir().expect("temp dir");
    let a = run_in(first.path(), "");
    let b = run_in(second.path(), "");

    let left = fs::read_to_string(&a.jsonl_path).expect("first jsonl");
    let right = fs::read_to_string(&b.jsonl_path).expect("second jsonl");
    assert_eq!(left, right);
    assert_eq!(a.results, b.results);
}

#[test]
fn first_to_target_ends_matches_early() {
    let dir = tempdir().expect("temp dir");
    let summary = run_in(dir.path(), "  first_to: 3\n");

    let rocky = &summary.results[0];
    assert_eq!(rocky.rounds, 3);
    assert_eq!(rocky.winner, Some(Side::Own));
    for result in &summary.results {
        assert!(result.rounds <= 40);
        if result.rounds < 40 {
            assert!(result.winner.is_some(), "{} stopped early", result.opponent);
        }
    }
}

#[test]
fn runner_lists_opponents_in_config_order() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), "");
    let outputs = config.resolved_outputs();
    let runner = ArenaRunner::new(config, outputs).expect("runner created");

    let names: Vec<&str> = runner
        .opponents()
        .iter()
        .map(|blueprint| blueprint.name.as_str())
        .collect();
    assert_eq!(names, ["rocky", "wheel", "dice", "mirror", "self"]);
}

#[test]
fn invalid_opponent_params_fail_runner_construction() {
    let dir = tempdir().expect("temp dir");
    let mut config = load_config(dir.path(), "");
    config.opponents[0].params = serde_yaml::from_str("move: lizard").expect("yaml");
    let outputs = config.resolved_outputs();
    assert!(ArenaRunner::new(config, outputs).is_err());
    assert!(!dir.path().join("rounds.jsonl").exists());
}
