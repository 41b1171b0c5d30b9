use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which policy drives the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Tabular Q-learning: train, save, reload, then run greedily.
    QLearning,
    /// Uniform samples from the action box, single pass, nothing saved.
    Random,
}

/// Command line of the `aoisched` binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "aoisched", version, about)]
pub struct Args {
    /// Port of the external scheduler adapter
    #[arg(long, default_value_t = 5555)]
    pub port: u16,

    /// Seed for the environment and the agent's exploration
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Simulated seconds per phase
    #[arg(long, default_value_t = 10.0)]
    pub sim_time: f64,

    /// Simulated seconds between two agent decisions
    #[arg(long, default_value_t = 0.1)]
    pub step_time: f64,

    /// Hard cap on steps per phase, overriding sim-time / step-time
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Number of flows reported by the synthetic environment
    #[arg(long, default_value_t = 4)]
    pub flows: usize,

    /// JSON file with agent hyper-parameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where the Q-table is written after training and read back from
    #[arg(long, default_value = "q_table.npy")]
    pub q_table: PathBuf,

    #[arg(long, value_enum, default_value_t = PolicyKind::QLearning)]
    pub policy: PolicyKind,

    /// Log per-step flows, actions and updates
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Steps per phase: `--max-steps` if given, else `ceil(sim_time / step_time)`.
    ///
    /// Returns `None` when the timing arguments cannot produce a budget.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn step_budget(&self) -> Option<usize> {
        if let Some(steps) = self.max_steps {
            return (steps > 0).then_some(steps);
        }
        let valid = |t: f64| t.is_finite() && t > 0.0;
        if !(valid(self.sim_time) && valid(self.step_time)) {
            return None;
        }
        // tolerate 10.0 / 0.1 = 100.00000000000001
        let steps = (self.sim_time / self.step_time - 1e-9).ceil();
        Some((steps as usize).max(1))
    }
}
