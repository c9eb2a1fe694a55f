//! Shared library surface for the aeroimpact server and its tests.

pub mod api;
pub mod config;
pub mod state;
