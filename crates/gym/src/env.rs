use thiserror::Error;

use crate::space::BoxSpace;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("observation length {len} is not a multiple of the flow stride {stride}")]
    MalformedObservation { len: usize, stride: usize },
    #[error("action has {found} weights but the environment tracks {expected} flows")]
    ActionShape { expected: usize, found: usize },
    #[error("action weight {value} for flow {flow} is outside [{low}, {high}]")]
    ActionOutOfRange {
        flow: usize,
        value: f32,
        low: f32,
        high: f32,
    },
    #[error("environment is not usable: {0}")]
    Invalid(String),
}

/// Result of advancing the environment by one action.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub obs: Vec<f64>,
    pub reward: f64,
    pub done: bool,
    pub info: String,
}

/// Scheduling environment in the gym style.
///
/// Each call to [`step`] applies one weight per flow and returns the next
/// observation vector, the aggregate reward and whether the run is over.
///
/// [`step`]: Env::step
pub trait Env {
    /// Reset the environment and return the initial observation vector.
    ///
    /// # Errors
    ///
    /// Adapter failures are returned unmodified to the caller.
    fn reset(&mut self) -> Result<Vec<f64>, EnvError>;

    /// Apply one scheduling weight per flow.
    ///
    /// # Errors
    ///
    /// Fails when the action does not fit [`Env::action_space`] or when the
    /// underlying adapter fails.
    fn step(&mut self, action: &[f32]) -> Result<Step, EnvError>;

    /// Bounds of the action vector currently accepted by [`Env::step`].
    fn action_space(&self) -> BoxSpace;
}
