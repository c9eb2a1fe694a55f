//! OpenSky Network client
//!
//! Fetches live state snapshots (authenticated) and per-aircraft metadata
//! (anonymous). Both calls fail fast and degrade to empty or default values.

pub mod client;
pub mod config;

pub use client::{OpenSkyClient, StatesResponse};
pub use config::OpenSkyConfig;
