//! # Training and evaluation loop
//!
//! [`run`] drives one environment with one policy. For Q-learning it runs
//! two phases over the same environment:
//!
//! 1. **Training**: epsilon-greedy actions, a table update after every step.
//! 2. **Inference**: the table is saved, read back into a fresh agent that is
//!    switched to greedy-only mode, and the environment is replayed from
//!    `reset` to completion.
//!
//! Each phase ends when the environment reports `done` or when the step
//! budget derived from the command line is exhausted.

use anyhow::{anyhow, Context, Result};
use gym::{Env, FlowRecord, SyntheticConfig, SyntheticEnv};
use rl::{AgentConfig, Policy, QAgent, RandomPolicy};
use tracing::{debug, info, warn};

use crate::cli::{Args, PolicyKind};

/// How often a phase reports progress.
const LOG_EVERY: usize = 50;

/// Reward bookkeeping for one phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseStats {
    pub steps: usize,
    pub total_reward: f64,
}

impl PhaseStats {
    fn record(&mut self, reward: f64) {
        self.steps += 1;
        self.total_reward += reward;
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_reward(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.total_reward / self.steps as f64
        }
    }
}

/// Outcome of a whole [`run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub training: PhaseStats,
    /// Only present for Q-learning.
    pub inference: Option<PhaseStats>,
}

/// Runs the configured policy against the synthetic environment.
///
/// # Errors
///
/// Returns configuration errors, environment errors and Q-table I/O errors
/// unmodified apart from added context.
pub fn run(args: &Args) -> Result<RunSummary> {
    let config = match &args.config {
        Some(path) => AgentConfig::from_path(path)
            .with_context(|| format!("loading agent config {}", path.display()))?,
        None => AgentConfig::default(),
    };
    let max_steps = args.step_budget().ok_or_else(|| {
        anyhow!(
            "no step budget from sim-time {} and step-time {}",
            args.sim_time,
            args.step_time
        )
    })?;

    warn!(
        port = args.port,
        "external scheduler transport is not available, using the synthetic environment"
    );
    let mut env = SyntheticEnv::new(SyntheticConfig {
        num_flows: args.flows,
        step_time: args.step_time,
        max_steps,
        seed: args.seed,
    })
    .context("building synthetic environment")?;
    info!(
        flows = args.flows,
        max_steps,
        seed = args.seed,
        policy = ?args.policy,
        "environment ready"
    );

    match args.policy {
        PolicyKind::Random => {
            let mut policy = RandomPolicy::new(args.seed);
            let training = run_phase(&mut env, &mut policy, max_steps, "random")?;
            Ok(RunSummary {
                training,
                inference: None,
            })
        }
        PolicyKind::QLearning => {
            let mut agent = QAgent::with_seed(config.clone(), args.seed)?;
            let training = run_phase(&mut env, &mut agent, max_steps, "training")?;
            agent
                .save_table(&args.q_table)
                .context("saving q-table after training")?;

            let mut agent = QAgent::with_seed(config, args.seed)?;
            agent
                .load_table(&args.q_table)
                .context("reloading q-table for inference")?;
            agent.enter_inference();
            let inference = run_phase(&mut env, &mut agent, max_steps, "inference")?;
            Ok(RunSummary {
                training,
                inference: Some(inference),
            })
        }
    }
}

/// Runs one phase from `reset` until `done` or `max_steps`.
///
/// # Errors
///
/// Propagates environment and observation errors.
pub fn run_phase<E: Env, P: Policy>(
    env: &mut E,
    policy: &mut P,
    max_steps: usize,
    phase: &str,
) -> Result<PhaseStats> {
    let mut obs = env
        .reset()
        .with_context(|| format!("resetting environment for {phase}"))?;
    policy.clear_memory();
    let mut stats = PhaseStats::default();

    info!(phase, max_steps, "phase started");
    while stats.steps < max_steps {
        log_flows(&obs);
        let action = policy
            .act(&obs)
            .with_context(|| format!("{phase} step {}: choosing action", stats.steps + 1))?;
        let step = env
            .step(&action)
            .with_context(|| format!("{phase} step {}: stepping environment", stats.steps + 1))?;
        policy.learn(step.reward);
        stats.record(step.reward);
        debug!(
            phase,
            step = stats.steps,
            reward = step.reward,
            done = step.done,
            info = %step.info,
            "step complete"
        );
        if stats.steps % LOG_EVERY == 0 {
            info!(
                phase,
                step = stats.steps,
                mean_reward = stats.mean_reward(),
                "progress"
            );
        }
        obs = step.obs;
        if step.done {
            break;
        }
    }
    info!(
        phase,
        steps = stats.steps,
        total_reward = stats.total_reward,
        mean_reward = stats.mean_reward(),
        "phase finished"
    );
    Ok(stats)
}

fn log_flows(obs: &[f64]) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    // malformed observations are reported by the policy
    let Ok(flows) = FlowRecord::parse_all(obs) else {
        return;
    };
    for (i, flow) in flows.iter().enumerate() {
        debug!(
            flow = i,
            rnti = flow.rnti,
            lc_id = flow.lc_id,
            priority = flow.priority,
            hol_delay = flow.hol_delay,
            aoi = flow.aoi,
            cqi = flow.cqi,
            "observed flow"
        );
    }
}
