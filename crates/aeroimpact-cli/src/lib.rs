//! aeroimpact CLI - terminal front end for the snapshot pipeline.
//!
//! The `aeroimpact` binary offers:
//! - refresh: fetch, sample and print the aggregate estimates
//! - inspect: estimate a single flight from the live snapshot
//! - estimate: run the estimation engine on given numbers

pub mod commands;
pub mod render;

pub use commands::{estimate_lines, inspect_snapshot};
pub use render::{render_detail, render_outcome, render_report};
