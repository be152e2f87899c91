//! Command implementations

pub mod admin;
pub mod config;

pub use admin::*;
pub use config::*;

use anyhow::Result;

use crate::config::{process_env, Config, Overrides};

/// Load the stored config and apply environment and flag overrides.
pub fn effective_config(overrides: &Overrides) -> Result<Config> {
    Config::load()?.resolve(process_env, overrides)
}
