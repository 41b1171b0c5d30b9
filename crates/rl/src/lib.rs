#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]
//! # Tabular Q-learning for scheduling weights
//!
//! [`QAgent`] turns per-flow `(AoI, CQI)` pairs into discrete states, picks a
//! scheduling weight for every flow epsilon-greedily from a dense [`QTable`]
//! and nudges that table toward the reward returned by the environment.
//!
//! The table is stored in NumPy `.npy` format (see [`npy`]) so it can be
//! inspected next to the simulator's own tooling.

mod agent;
mod config;
mod discretize;
pub mod npy;
mod policy;
mod table;

pub use agent::{AgentError, Mode, QAgent};
pub use config::{AgentConfig, ConfigError};
pub use discretize::{bin_index, Discretizer, State};
pub use policy::{Policy, RandomPolicy};
pub use table::{QTable, QTableError};
