pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::ServiceConfig;
#[cfg(feature = "cli")]
use crate::utils::error::{Result, ServiceError};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "launchd-svc")]
#[command(about = "Install, start, stop and query launchd services")]
pub struct CliConfig {
    /// TOML service description
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Service label; overrides the config file
    #[arg(short, long, global = true)]
    pub name: Option<String>,

    /// Domain target (system, gui, user, gui/<uid>, user/<uid>)
    #[arg(short, long, global = true)]
    pub domain: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Operation,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Operation {
    /// Write the definition from [program] and bootstrap it
    Install,
    /// Bootstrap an existing definition
    Bootstrap,
    /// Boot the service out and delete its definition
    Uninstall {
        /// Leave the plist on disk
        #[arg(long)]
        keep_definition: bool,
    },
    Start,
    Stop,
    /// Kickstart the service
    Restart {
        /// Kill a running instance first
        #[arg(short, long)]
        kill: bool,
    },
    /// Raw `launchctl print` output
    Print,
    /// Parsed service state
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Render the plist to stdout without touching launchd
    Definition,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file (if any) and applies command-line overrides.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let mut config = match (&self.config, &self.name) {
            (Some(path), _) => ServiceConfig::from_file(path)?,
            (None, Some(name)) => ServiceConfig::for_name(name.clone()),
            (None, None) => {
                return Err(ServiceError::MissingConfigError {
                    field: "--config or --name".to_string(),
                })
            }
        };

        if let Some(name) = &self.name {
            config.service.name = name.clone();
        }
        if let Some(domain) = &self.domain {
            config.service.domain = domain.clone();
        }

        Ok(config)
    }
}
