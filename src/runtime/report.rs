// src/runtime/report.rs
//! Termination reports sent from gophers to the coordinator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record that a gopher has died
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationReport {
    /// Name of the gopher that died
    pub gopher: String,

    /// Human-readable message
    pub message: String,

    /// Meals eaten before dying
    pub meals: u64,

    /// When the fatal withdrawal was refused
    pub terminated_at: DateTime<Utc>,
}

impl TerminationReport {
    pub fn new(gopher: &str, meals: u64) -> Self {
        Self {
            gopher: gopher.to_string(),
            message: format!("gopher {} dies. So said!", gopher),
            meals,
            terminated_at: Utc::now(),
        }
    }
}

impl fmt::Display for TerminationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
