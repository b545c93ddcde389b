pub mod plist;
pub mod runner;
pub mod service;
pub mod status;

pub use crate::domain::model::{CommandOutput, Domain, ServiceDefinition, ServiceStatus};
pub use crate::domain::ports::{CommandRunner, DefinitionStore};
pub use crate::utils::error::Result;
