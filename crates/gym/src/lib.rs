#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]
//! # Scheduling environment contract
//!
//! The radio scheduler that produces observations lives in an external
//! simulator. This crate only describes the data it exchanges with an agent:
//! a flat observation vector made of six-field [`FlowRecord`]s, one action
//! weight per flow bounded by a [`BoxSpace`], and a scalar reward per step.
//!
//! [`SyntheticEnv`] is a small seeded stand-in implementing [`Env`] so the
//! driver and the tests can run without the simulator attached.

mod env;
mod flow;
mod space;
mod synthetic;

pub use env::{Env, EnvError, Step};
pub use flow::{FlowRecord, AOI_OFFSET, CQI_OFFSET, FLOW_STRIDE};
pub use space::BoxSpace;
pub use synthetic::{SyntheticConfig, SyntheticEnv};
