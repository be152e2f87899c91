//! Configuration commands

use crate::cli::ConfigAction;
use crate::config::{Config, Overrides};
use anyhow::Result;

pub fn cmd_config(overrides: &Overrides, action: Option<ConfigAction>) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let config = super::effective_config(overrides)?;
            println!("Client Configuration:");
            println!("  File:    {}", Config::path()?.display());
            println!("  Server:  {}", config.server);
            println!("  Timeout: {} s", config.timeout_secs);
        }
        ConfigAction::SetServer { url } => {
            let mut config = Config::load()?;
            config.server = url;
            let config = config.resolve(|_| None, &Overrides::default())?;
            config.save()?;
            println!("Server set to: {}", config.server);
        }
        ConfigAction::SetTimeout { secs } => {
            let mut config = Config::load()?;
            config.timeout_secs = secs;
            config.save()?;
            println!("Timeout set to: {secs} s");
        }
        ConfigAction::Reset => {
            Config::reset()?;
            println!("Configuration reset to defaults");
        }
    }

    Ok(())
}
