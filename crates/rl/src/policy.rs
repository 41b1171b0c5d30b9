use gym::{BoxSpace, FlowRecord};

use crate::agent::{AgentError, QAgent};

/// Anything that maps an observation to per-flow weights and can be told
/// the reward that followed.
pub trait Policy {
    /// # Errors
    ///
    /// Fails when the observation is not a whole number of flow records.
    fn act(&mut self, observation: &[f64]) -> Result<Vec<f32>, AgentError>;

    fn learn(&mut self, reward: f64);

    /// Called when the environment is reset.
    fn clear_memory(&mut self) {}
}

impl Policy for QAgent {
    fn act(&mut self, observation: &[f64]) -> Result<Vec<f32>, AgentError> {
        QAgent::act(self, observation)
    }

    fn learn(&mut self, reward: f64) {
        QAgent::learn(self, reward);
    }

    fn clear_memory(&mut self) {
        QAgent::clear_memory(self);
    }
}

/// Baseline that samples the action box uniformly and never learns.
pub struct RandomPolicy {
    rng: fastrand::Rng,
}

impl RandomPolicy {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, observation: &[f64]) -> Result<Vec<f32>, AgentError> {
        let flows = FlowRecord::count(observation)?;
        Ok(BoxSpace::unit(flows).sample(&mut self.rng))
    }

    fn learn(&mut self, _reward: f64) {
        // Random policy does not learn
    }
}
