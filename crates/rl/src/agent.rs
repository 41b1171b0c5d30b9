use gym::{EnvError, FlowRecord};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{AgentConfig, ConfigError};
use crate::discretize::{Discretizer, State};
use crate::table::{QTable, QTableError};

#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Observation(#[from] EnvError),
}

/// Lifecycle of a [`QAgent`]. Only ever moves from training to inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Epsilon-greedy actions, table updates enabled.
    Training,
    /// Greedy actions only, the table is frozen.
    Inference,
}

/// States and weights chosen by the last [`QAgent::act`].
#[derive(Debug, Clone, Default)]
struct Memory {
    states: Vec<State>,
    actions: Vec<f32>,
}

/// Tabular Q-learning agent emitting one scheduling weight per flow.
pub struct QAgent {
    config: AgentConfig,
    discretizer: Discretizer,
    table: QTable,
    mode: Mode,
    memory: Option<Memory>,
    rng: fastrand::Rng,
}

impl QAgent {
    /// Agent with an unseeded generator.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint of [`AgentConfig::validate`].
    pub fn new(config: AgentConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, fastrand::Rng::new())
    }

    /// Agent whose exploration draws are reproducible.
    ///
    /// # Errors
    ///
    /// See [`QAgent::new`].
    pub fn with_seed(config: AgentConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(config: AgentConfig, rng: fastrand::Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        let mode = if config.inference_mode {
            Mode::Inference
        } else {
            Mode::Training
        };
        Ok(Self {
            discretizer: Discretizer::new(&config),
            table: QTable::zeros(config.table_shape()),
            config,
            mode,
            memory: None,
            rng,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[must_use]
    pub fn table(&self) -> &QTable {
        &self.table
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn discretize(&self, aoi: f64, cqi: f64) -> State {
        self.discretizer.discretize(aoi, cqi)
    }

    /// Weight emitted for a discrete action bin.
    #[must_use]
    pub fn weight_of_bin(&self, bin: usize) -> f32 {
        weight_of_bin(bin, self.config.num_weight_bins)
    }

    /// Nearest action bin of a weight; explored weights snap to a bin here.
    #[must_use]
    pub fn bin_of_weight(&self, weight: f32) -> usize {
        bin_of_weight(weight, self.config.num_weight_bins)
    }

    /// Picks one weight per flow of `observation` and remembers the choice
    /// for the next [`QAgent::learn`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Observation`] when the observation is not a
    /// whole number of flow records. The memory is left untouched then.
    pub fn act(&mut self, observation: &[f64]) -> Result<Vec<f32>, AgentError> {
        let flows = FlowRecord::parse_all(observation)?;
        let mut memory = Memory {
            states: Vec::with_capacity(flows.len()),
            actions: Vec::with_capacity(flows.len()),
        };
        for flow in &flows {
            let state = self.discretizer.discretize(flow.aoi, flow.cqi);
            let explore =
                self.mode == Mode::Training && self.rng.f64() < self.config.epsilon;
            let action = if explore {
                self.rng.f32()
            } else {
                weight_of_bin(self.table.best_action(state), self.config.num_weight_bins)
            };
            memory.states.push(state);
            memory.actions.push(action);
        }
        debug!(flows = flows.len(), actions = ?memory.actions, "agent action weights");
        let actions = memory.actions.clone();
        self.memory = Some(memory);
        Ok(actions)
    }

    /// Single-step Q-learning update of every flow chosen by the last
    /// [`QAgent::act`], all sharing the same aggregate `reward`.
    ///
    /// Does nothing in inference mode or when nothing has been acted on yet.
    pub fn learn(&mut self, reward: f64) {
        if self.mode == Mode::Inference {
            return;
        }
        let Some(memory) = self.memory.as_ref() else {
            return;
        };
        let AgentConfig {
            alpha,
            gamma,
            num_weight_bins,
            ..
        } = self.config;
        for (&state, &weight) in memory.states.iter().zip(&memory.actions) {
            let action = bin_of_weight(weight, num_weight_bins);
            let current = self.table.get(state, action);
            let max_next = self.table.max_value(state);
            let updated = current + alpha * (reward + gamma * max_next - current);
            self.table.set(state, action, updated);
            debug!(
                aoi_bin = state.aoi_bin,
                cqi_bin = state.cqi_bin,
                action_bin = action,
                reward,
                before = current,
                after = updated,
                "q-learning update"
            );
        }
    }

    /// Forgets the last states and actions, e.g. after an environment reset.
    pub fn clear_memory(&mut self) {
        self.memory = None;
    }

    /// Freezes the table and disables exploration for good.
    pub fn enter_inference(&mut self) {
        if self.mode != Mode::Inference {
            info!("agent switched to inference mode");
        }
        self.mode = Mode::Inference;
        self.memory = None;
    }

    /// # Errors
    ///
    /// See [`QTable::save`].
    pub fn save_table(&self, path: impl AsRef<Path>) -> Result<(), QTableError> {
        self.table.save(path)
    }

    /// Replaces the table with the one stored at `path`.
    ///
    /// # Errors
    ///
    /// Fails with [`QTableError::ShapeMismatch`] when the stored table was
    /// built with different bin counts; the current table is kept then.
    pub fn load_table(&mut self, path: impl AsRef<Path>) -> Result<(), QTableError> {
        self.table = QTable::load(path, self.config.table_shape())?;
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn weight_of_bin(bin: usize, num_weight_bins: usize) -> f32 {
    bin as f32 / (num_weight_bins - 1) as f32
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn bin_of_weight(weight: f32, num_weight_bins: usize) -> usize {
    let last = num_weight_bins - 1;
    // half-bin ties go to the even bin, as numpy rounds
    let scaled = (f64::from(weight) * last as f64).round_ties_even();
    (scaled.max(0.0) as usize).min(last)
}
