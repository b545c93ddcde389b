use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("could not execute `{binary}`: {source}")]
    ExecError {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("({status}) running `{binary} {}` for {service}:\n{stderr}", .args.join(" "))]
    CommandFailed {
        binary: String,
        args: Vec<String>,
        service: String,
        status: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("service definition not found at {}", .path.display())]
    DefinitionMissing { path: PathBuf },

    #[error("could not remove definition {}: {source}", .path.display())]
    DefinitionRemoveError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Execution,
    Definition,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ServiceError {
    pub fn config(message: impl Into<String>) -> Self {
        ServiceError::ConfigError {
            message: message.into(),
        }
    }

    /// Exit code reported by launchctl, when the failure came from it.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ServiceError::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ServiceError::ExecError { .. } | ServiceError::CommandFailed { .. } => {
                ErrorCategory::Execution
            }
            ServiceError::DefinitionMissing { .. } | ServiceError::DefinitionRemoveError { .. } => {
                ErrorCategory::Definition
            }
            ServiceError::ConfigError { .. }
            | ServiceError::MissingConfigError { .. }
            | ServiceError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ServiceError::IoError(_) | ServiceError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ServiceError::CommandFailed { .. } => ErrorSeverity::Medium,
            ServiceError::DefinitionMissing { .. }
            | ServiceError::DefinitionRemoveError { .. }
            | ServiceError::ConfigError { .. }
            | ServiceError::MissingConfigError { .. }
            | ServiceError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            ServiceError::ExecError { .. }
            | ServiceError::IoError(_)
            | ServiceError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ServiceError::ExecError { binary, .. } => {
                format!("Check that `{}` exists and is executable", binary)
            }
            ServiceError::CommandFailed { .. } => {
                "Inspect the launchctl output above; `print` shows the current service state"
                    .to_string()
            }
            ServiceError::DefinitionMissing { .. } => {
                "Run `install` to write the definition, or check definition_dir".to_string()
            }
            ServiceError::DefinitionRemoveError { .. } => {
                "Check permissions on the definition directory".to_string()
            }
            ServiceError::ConfigError { .. }
            | ServiceError::MissingConfigError { .. }
            | ServiceError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags".to_string()
            }
            ServiceError::IoError(_) | ServiceError::SerializationError(_) => {
                "Re-run with --verbose for details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ServiceError::CommandFailed {
                args, service, stderr, ..
            } => {
                let subcommand = args.first().map(String::as_str).unwrap_or("launchctl");
                let detail = stderr.trim();
                if detail.is_empty() {
                    format!("`{}` failed for {}", subcommand, service)
                } else {
                    format!("`{}` failed for {}: {}", subcommand, service, detail)
                }
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
