// src/utils/config.rs
//! Farm configuration
//!
//! The roster is read once before the simulation starts, from one of:
//!
//! 1. A file passed on the command line or via `FARM_CONFIG`
//!    (JSON, YAML or TOML, picked by extension)
//! 2. The built-in sample roster when no file is given
//!
//! Simulation settings can then be overridden from the environment with
//! `FARM__SIMULATION__SLEEP_UNIT_MS` and `FARM__SIMULATION__DEADLINE_SECS`.

use crate::runtime::gopher::Gopher;
use crate::utils::errors::{FarmError, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Sample roster used when no configuration file is supplied
pub const SAMPLE_ROSTER: &str = r#"{
   "gophers": [
      { "name": "A", "sleep": 1, "eat": 1 },
      { "name": "B", "sleep": 4, "eat": 3 },
      { "name": "C", "sleep": 1, "eat": 4 },
      { "name": "D", "sleep": 5, "eat": 2 },
      { "name": "E", "sleep": 2, "eat": 3 }
   ],
   "totalFood": 30
}"#;

/// One gopher as it appears in the roster payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GopherRecord {
    pub name: String,

    /// Pause between meals, in units of `sleep_unit_ms`
    pub sleep: u64,

    /// Food units taken per meal
    pub eat: u64,
}

/// Knobs that are not part of the roster itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    /// Length of one sleep unit in milliseconds (default: 1000)
    #[serde(default = "default_sleep_unit_ms")]
    pub sleep_unit_ms: u64,

    /// Overall deadline in seconds; unbounded when absent
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

fn default_sleep_unit_ms() -> u64 {
    1000
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            sleep_unit_ms: default_sleep_unit_ms(),
            deadline_secs: None,
        }
    }
}

impl SimulationSettings {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

/// Roster plus the initial food supply
///
/// `gophers` is required: an empty roster has to be spelled out as `[]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FarmConfig {
    pub gophers: Vec<GopherRecord>,

    #[serde(rename = "totalFood", alias = "totalfood")]
    pub total_food: u64,

    #[serde(default)]
    pub simulation: SimulationSettings,
}

impl FarmConfig {
    /// Load from `path` (or the sample roster) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Self::base(path).add_source(
            Environment::with_prefix("FARM")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Load from a file without consulting the environment
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::finish(Self::base(Some(path)))
    }

    /// Parse an in-memory JSON payload
    pub fn from_json(payload: &str) -> Result<Self> {
        Self::finish(Config::builder().add_source(File::from_str(payload, FileFormat::Json)))
    }

    /// The built-in five-gopher roster
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_ROSTER)
    }

    fn base(path: Option<&Path>) -> ConfigBuilder<config::builder::DefaultState> {
        match path {
            Some(path) => Config::builder().add_source(File::from(path).required(true)),
            None => Config::builder().add_source(File::from_str(SAMPLE_ROSTER, FileFormat::Json)),
        }
    }

    fn finish(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let config: FarmConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject rosters the simulation cannot run
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for record in &self.gophers {
            if record.name.trim().is_empty() {
                return Err(FarmError::ConfigError("gopher name cannot be empty".into()));
            }
            if record.eat == 0 {
                return Err(FarmError::ConfigError(format!(
                    "gopher {} must eat at least 1 food unit",
                    record.name
                )));
            }
            if !seen.insert(record.name.as_str()) {
                warn!(gopher = %record.name, "duplicate gopher name in roster");
            }
        }

        if self.simulation.sleep_unit_ms == 0 && self.gophers.iter().any(|g| g.sleep > 0) {
            warn!("sleep_unit_ms is 0, every gopher will eat without pausing");
        }

        Ok(())
    }

    /// Build the gophers described by this configuration
    pub fn roster(&self) -> Vec<Gopher> {
        let unit = self.simulation.sleep_unit_ms;

        self.gophers
            .iter()
            .map(|record| {
                Gopher::new(
                    record.name.clone(),
                    Duration::from_millis(record.sleep.saturating_mul(unit)),
                    record.eat,
                )
            })
            .collect()
    }
}
