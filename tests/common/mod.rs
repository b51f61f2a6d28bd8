//! Common test infrastructure
//!
//! Spawns an in-process mock of the automation service and hands out engines
//! wired to it through the real HTTP client. Tests should only import from
//! this module, not from internal submodules.
#![allow(dead_code)]

mod backend;
mod fixtures;

pub use backend::{MockBackend, MockState};
pub use fixtures::*;
