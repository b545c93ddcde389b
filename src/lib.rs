pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Operation};

pub use config::{cli::LocalDefinitionStore, toml_config::ServiceConfig};
pub use core::{runner::TokioCommandRunner, service::Service};
pub use domain::model::{Domain, ServiceDefinition, ServiceStatus};
pub use utils::error::{Result, ServiceError};
