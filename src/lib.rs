//! Core library of the automation operator console.
//!
//! `backend` speaks HTTP to the automation service, `dashboard` owns the
//! synchronization engine and view model, `config` resolves CLI + TOML
//! settings. The binary in `main.rs` wires these into a headless console.

pub mod backend;
pub mod config;
pub mod dashboard;
