use aoisched::app::{run, run_phase};
use aoisched::cli::Args;
use clap::Parser;
use gym::{SyntheticConfig, SyntheticEnv};
use rl::{AgentConfig, QAgent, QTable};
use tempfile::TempDir;

fn args(extra: &[&str]) -> Args {
    Args::parse_from(std::iter::once("aoisched").chain(extra.iter().copied()))
}

#[test]
fn q_learning_trains_saves_and_evaluates() {
    let tmp = TempDir::new().unwrap();
    let table = tmp.path().join("q_table.npy");
    let table_arg = table.to_str().unwrap();
    let summary = run(&args(&["--sim-time", "2", "--seed", "11", "--q-table", table_arg])).unwrap();

    assert_eq!(summary.training.steps, 20);
    let inference = summary.inference.unwrap();
    assert_eq!(inference.steps, 20);
    assert!(summary.training.total_reward.is_finite());
    assert!(inference.mean_reward() < 0.0);

    let saved = QTable::load(&table, AgentConfig::default().table_shape()).unwrap();
    assert!(saved.values().iter().any(|&q| q != 0.0));
}

#[test]
fn random_policy_writes_no_table() {
    let tmp = TempDir::new().unwrap();
    let table = tmp.path().join("q_table.npy");
    let summary = run(&args(&[
        "--policy",
        "random",
        "--max-steps",
        "15",
        "--q-table",
        table.to_str().unwrap(),
    ]))
    .unwrap();
    assert_eq!(summary.training.steps, 15);
    assert!(summary.inference.is_none());
    assert!(!table.exists());
}

#[test]
fn agent_config_file_is_honoured() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("agent.json");
    std::fs::write(&config, r#"{ "aoi_bins": 4, "num_weight_bins": 3 }"#).unwrap();
    let table = tmp.path().join("q_table.npy");
    run(&args(&[
        "--max-steps",
        "5",
        "--config",
        config.to_str().unwrap(),
        "--q-table",
        table.to_str().unwrap(),
    ]))
    .unwrap();
    assert_eq!(QTable::load(&table, [4, 5, 3]).unwrap().shape(), [4, 5, 3]);
}

#[test]
fn invalid_inputs_fail_before_running() {
    assert!(run(&args(&["--step-time", "0"])).is_err());
    assert!(run(&args(&["--flows", "0", "--max-steps", "3"])).is_err());
    assert!(run(&args(&["--config", "/definitely/not/here.json"])).is_err());
}

#[test]
fn phase_stops_at_budget_before_env_is_done() {
    let mut env = SyntheticEnv::new(SyntheticConfig {
        max_steps: 1000,
        ..SyntheticConfig::default()
    })
    .unwrap();
    let mut agent = QAgent::with_seed(AgentConfig::default(), 5).unwrap();
    let stats = run_phase(&mut env, &mut agent, 12, "test").unwrap();
    assert_eq!(stats.steps, 12);
    assert_eq!(env.steps(), 12);
}

#[test]
fn phase_stops_when_env_is_done() {
    let mut env = SyntheticEnv::new(SyntheticConfig {
        max_steps: 4,
        ..SyntheticConfig::default()
    })
    .unwrap();
    let mut agent = QAgent::with_seed(AgentConfig::default(), 5).unwrap();
    let stats = run_phase(&mut env, &mut agent, 100, "test").unwrap();
    assert_eq!(stats.steps, 4);
}
