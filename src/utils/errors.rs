// src/utils/errors.rs
//! Error types for the farm
//!
//! Running out of food is not represented here: it is the normal way a
//! gopher ends its life and is reported through
//! [`Insufficient`](crate::runtime::food_pool::Insufficient) instead.

use std::time::Duration;
use thiserror::Error;

/// Fatal errors that abort a simulation
#[derive(Error, Debug)]
pub enum FarmError {
    /// Roster could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The report channel closed before every gopher reported
    ///
    /// A gopher task that panics drops its sender without reporting, so it
    /// surfaces here rather than as [`FarmError::TaskFailed`].
    #[error("Report channel closed after {received} of {expected} termination reports")]
    ReportChannelClosed { expected: usize, received: usize },

    /// The optional overall deadline elapsed
    #[error("Simulation exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),

    /// The simulation was cancelled before every gopher reported
    #[error("Simulation cancelled")]
    Cancelled,

    /// The completion waiter task panicked or was cancelled
    #[error("Task failed: {0}")]
    TaskFailed(String),
}

impl From<config::ConfigError> for FarmError {
    fn from(err: config::ConfigError) -> Self {
        FarmError::ConfigError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for FarmError {
    fn from(err: tokio::task::JoinError) -> Self {
        FarmError::TaskFailed(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FarmError>;
