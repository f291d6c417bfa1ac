pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;

// Use cases and the ports they depend on
pub mod app;
// Adapters: SQLite, subprocess, CSV index, quarantine
pub mod infra;
