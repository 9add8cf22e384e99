// src/lib.rs
//! Gopher Farm
//!
//! A concurrent simulation of gophers sharing one finite food supply. Each
//! gopher runs as its own task, eats on a fixed rhythm and dies the first
//! time the farm cannot feed it. The coordinator waits for every death
//! report and then shuts down.
//!
//! # Architecture
//!
//! - **runtime**: Food pool, gophers, termination reports, coordinator
//! - **observability**: Tracing subscriber setup
//! - **utils**: Configuration loading and error types

pub mod observability;
pub mod runtime;
pub mod utils;

// Re-export commonly used types
pub use runtime::coordinator::{run_simulation, Coordinator, SimulationOutcome};
pub use runtime::food_pool::{FoodPool, Insufficient, PoolStats};
pub use runtime::gopher::Gopher;
pub use runtime::report::TerminationReport;
pub use utils::config::FarmConfig;
pub use utils::errors::{FarmError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
