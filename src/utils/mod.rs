// src/utils/mod.rs
//! Shared utilities
//!
//! - **config**: Roster and simulation settings loading
//! - **errors**: Crate-wide error type

pub mod config;
pub mod errors;

pub use self::config::{FarmConfig, GopherRecord, SimulationSettings};
pub use self::errors::{FarmError, Result};
