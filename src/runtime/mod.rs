// src/runtime/mod.rs
//! Simulation runtime
//!
//! - **Food Pool**: The shared food counter and its lock
//! - **Gopher**: One independently scheduled eater
//! - **Report**: Termination messages sent to the coordinator
//! - **Coordinator**: Spawns gophers and collects one report from each
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │                Coordinator                 │
//! │   spawn ▼          ▲ TerminationReport     │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────┐  │
//! │  │ Gopher A │  │ Gopher B │  │ Gopher C │  │
//! │  └──────────┘  └──────────┘  └──────────┘  │
//! │        └─────────────┼─────────────┘       │
//! │               try_withdraw()               │
//! │                  FoodPool                  │
//! └────────────────────────────────────────────┘
//! ```

pub mod coordinator;
pub mod food_pool;
pub mod gopher;
pub mod report;

// Re-export commonly used types
pub use coordinator::{
    collect_reports, run_simulation, run_until_cancelled, Coordinator, SimulationOutcome,
};
pub use food_pool::{FoodPool, Insufficient, PoolStats};
pub use gopher::{Gopher, GopherState};
pub use report::TerminationReport;
