use tracing::debug;

use crate::env::{Env, EnvError, Step};
use crate::flow::FlowRecord;
use crate::space::BoxSpace;

/// Highest wideband CQI reported by the scheduler.
const MAX_CQI: i32 = 15;

/// Parameters of the [`SyntheticEnv`] stand-in.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub num_flows: usize,
    /// Seconds of simulated time per step.
    pub step_time: f64,
    pub max_steps: usize,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            num_flows: 4,
            step_time: 0.1,
            max_steps: 100,
            seed: 0,
        }
    }
}

/// Seeded stand-in for the external scheduler.
///
/// Two logical channels per UE. Each step the flows holding the highest
/// weights (half of them, at least one) are served: their AoI and
/// head-of-line delay drop back to one step. Everyone else ages by one step.
/// CQI performs a bounded random walk. The reward is the negative mean AoI
/// in seconds, so it only approaches zero when the agent keeps every flow
/// fresh.
pub struct SyntheticEnv {
    config: SyntheticConfig,
    rng: fastrand::Rng,
    flows: Vec<FlowRecord>,
    steps: usize,
}

impl SyntheticEnv {
    /// # Errors
    ///
    /// Returns [`EnvError::Invalid`] for an empty flow set, a non-positive
    /// step time or a zero step budget.
    pub fn new(config: SyntheticConfig) -> Result<Self, EnvError> {
        if config.num_flows == 0 {
            return Err(EnvError::Invalid("at least one flow is required".into()));
        }
        if !(config.step_time.is_finite() && config.step_time > 0.0) {
            return Err(EnvError::Invalid(format!(
                "step time must be positive, got {}",
                config.step_time
            )));
        }
        if config.max_steps == 0 {
            return Err(EnvError::Invalid("step budget must be positive".into()));
        }
        let rng = fastrand::Rng::with_seed(config.seed);
        Ok(Self {
            config,
            rng,
            flows: Vec::new(),
            steps: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    fn step_ms(&self) -> f64 {
        self.config.step_time * 1000.0
    }

    fn observation(&self) -> Vec<f64> {
        FlowRecord::flatten(&self.flows)
    }

    /// Indices of the flows served this step, highest weight first.
    fn served(&self, action: &[f32]) -> Vec<usize> {
        let capacity = (self.flows.len() / 2).max(1);
        let mut order: Vec<usize> = (0..action.len()).collect();
        // stable sort keeps lower indices first on equal weights
        order.sort_by(|&a, &b| action[b].total_cmp(&action[a]));
        order
            .into_iter()
            .filter(|&i| action[i] > 0.0)
            .take(capacity)
            .collect()
    }
}

impl Env for SyntheticEnv {
    #[allow(clippy::cast_precision_loss)]
    fn reset(&mut self) -> Result<Vec<f64>, EnvError> {
        let step_ms = self.step_ms();
        self.steps = 0;
        self.flows = (0..self.config.num_flows)
            .map(|i| {
                let lc_id = (i % 2 + 1) as f64;
                FlowRecord {
                    rnti: (i / 2 + 1) as f64,
                    lc_id,
                    priority: lc_id,
                    hol_delay: 0.0,
                    aoi: step_ms,
                    cqi: f64::from(self.rng.i32(1..=MAX_CQI)),
                }
            })
            .collect();
        Ok(self.observation())
    }

    fn step(&mut self, action: &[f32]) -> Result<Step, EnvError> {
        if self.flows.is_empty() {
            return Err(EnvError::Invalid("step called before reset".into()));
        }
        let space = self.action_space();
        if action.len() != space.len() {
            return Err(EnvError::ActionShape {
                expected: space.len(),
                found: action.len(),
            });
        }
        if let Some((flow, &value)) = action
            .iter()
            .enumerate()
            .find(|(_, v)| !(space.low..=space.high).contains(*v))
        {
            return Err(EnvError::ActionOutOfRange {
                flow,
                value,
                low: space.low,
                high: space.high,
            });
        }

        let step_ms = self.step_ms();
        let served = self.served(action);
        for (i, flow) in self.flows.iter_mut().enumerate() {
            if served.contains(&i) {
                flow.aoi = step_ms;
                flow.hol_delay = 0.0;
            } else {
                flow.aoi += step_ms;
                flow.hol_delay += step_ms;
            }
            let drift = self.rng.i32(-1..=1);
            // CQI fields only ever hold whole numbers in [1, 15]
            #[allow(clippy::cast_possible_truncation)]
            let cqi = (flow.cqi as i32 + drift).clamp(1, MAX_CQI);
            flow.cqi = f64::from(cqi);
        }
        self.steps += 1;

        #[allow(clippy::cast_precision_loss)]
        let mean_aoi_s =
            self.flows.iter().map(|f| f.aoi).sum::<f64>() / self.flows.len() as f64 / 1000.0;
        let reward = -mean_aoi_s;
        let done = self.steps >= self.config.max_steps;
        debug!(
            step = self.steps,
            served = ?served,
            reward,
            "synthetic scheduler step"
        );
        Ok(Step {
            obs: self.observation(),
            reward,
            done,
            info: format!("step={} served={}", self.steps, served.len()),
        })
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace::unit(self.config.num_flows)
    }
}
