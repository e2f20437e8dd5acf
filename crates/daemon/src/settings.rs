//! Layered daemon configuration
//!
//! Sources, later ones win:
//! 1. Built-in defaults
//! 2. TOML file at `QUEUEDESK_CONFIG` (default `~/.queuedesk/config.toml`, optional)
//! 3. `QUEUEDESK__*` environment variables, `__` separating sections
//!
//! ```text
//! QUEUEDESK__QUEUE__PER_TICKET_ESTIMATE_MINUTES=10 \
//! QUEUEDESK__SIMULATION__TICK_INTERVAL_SECS=5 \
//!     ./queuedesk
//! ```

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use queuedesk_core::config::QueueConfig;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "~/.queuedesk/config.toml";
const ENV_PREFIX: &str = "QUEUEDESK";

/// Simulation harness settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds between simulation ticks
    pub tick_interval_secs: u64,
    /// Chance that a citizen takes a ticket on a tick
    pub arrival_probability: f64,
    /// Chance that a called citizen never shows up
    pub no_show_probability: f64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 30,
            arrival_probability: 0.2,
            no_show_probability: 0.1,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.tick_interval_secs > 0,
            "simulation.tick_interval_secs must be greater than zero"
        );
        for (name, p) in [
            ("arrival_probability", self.arrival_probability),
            ("no_show_probability", self.no_show_probability),
        ] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&p),
                "simulation.{} must be within 0.0..=1.0 (got {})",
                name,
                p
            );
        }
        Ok(())
    }
}

/// Full daemon settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub queue: QueueConfig,
    pub simulation: SimulationConfig,
}

impl Settings {
    /// Load from the config file and environment
    pub fn load() -> Result<Self> {
        let path = std::env::var("QUEUEDESK_CONFIG")
            .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_CONFIG_PATH).into_owned());

        let builder = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder).with_context(|| format!("Failed to load settings ({})", path))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.queue.validate()?;
        settings.simulation.validate()?;
        Ok(settings)
    }

    #[cfg(test)]
    fn from_toml(toml: &str) -> Result<Self> {
        Self::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }
}
