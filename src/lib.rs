//! Adaptive scaled scoring with what-if projections.
//!
//! The `scoring` and `report` modules are pure: they take owned or borrowed
//! input and return new values, with no I/O and no logging. `config`,
//! `data`, `pipeline` and `output` are the collaborators that load files,
//! orchestrate runs and render results.

pub mod config;
pub mod data;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod scoring;
