//! # aoisched
//!
//! Drives an age-of-information aware scheduling agent against a gym-style
//! environment.
//!
//! The scheduler itself runs in an external network simulator that reports,
//! every decision interval, one six-field record per active flow and accepts
//! one scheduling weight in `[0, 1]` per flow. This workspace covers the
//! agent side of that exchange:
//!
//! -   **[`gym`]:** the environment contract (observations, action box,
//!     reward) and a seeded synthetic stand-in for offline runs.
//! -   **[`rl`]:** the tabular Q-learning agent, its configuration and the
//!     `.npy` persistence of its table.
//! -   **`aoisched`:** this crate. Command line parsing ([`cli`]) and the
//!     train, save, reload, evaluate loop ([`app`]).

pub mod app;
pub mod cli;

pub use gym;
pub use rl;
