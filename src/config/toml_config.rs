use crate::config::cli::LocalDefinitionStore;
use crate::core::runner::current_uid;
use crate::core::service::Service;
use crate::domain::model::{Domain, ServiceDefinition};
use crate::domain::ports::CommandRunner;
use crate::utils::error::{Result, ServiceError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service: ServiceSection,
    pub program: Option<ProgramSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSection {
    pub name: String,
    /// `system`, `gui`, `user`, or a full target such as `gui/501`.
    #[serde(default = "default_domain")]
    pub domain: String,
    pub uid: Option<u32>,
    pub definition_dir: Option<String>,
    pub launchctl_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramSection {
    pub arguments: Vec<String>,
    pub working_directory: Option<String>,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    #[serde(default)]
    pub run_at_load: bool,
    #[serde(default)]
    pub keep_alive: bool,
    pub stdout_path: Option<String>,
    pub stderr_path: Option<String>,
}

fn default_domain() -> String {
    "gui".to_string()
}

impl ServiceConfig {
    /// Minimal config for driving an already-installed service by label.
    pub fn for_name(name: impl Into<String>) -> Self {
        Self {
            service: ServiceSection {
                name: name.into(),
                domain: default_domain(),
                uid: None,
                definition_dir: None,
                launchctl_path: None,
            },
            program: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ServiceError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| ServiceError::config(format!("TOML parsing error: {}", e)))
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ServiceError::config(format!("bad substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_service_name("service.name", &self.service.name)?;
        validation::validate_non_empty_string("service.domain", &self.service.domain)?;

        if let Some(dir) = &self.service.definition_dir {
            validation::validate_path("service.definition_dir", dir)?;
        }
        if let Some(path) = &self.service.launchctl_path {
            validation::validate_path("service.launchctl_path", path)?;
        }

        if let Some(program) = &self.program {
            match program.arguments.first() {
                Some(binary) => validation::validate_path("program.arguments", binary)?,
                None => {
                    return Err(ServiceError::InvalidConfigValueError {
                        field: "program.arguments".to_string(),
                        value: "[]".to_string(),
                        reason: "At least the program path is required".to_string(),
                    })
                }
            }
        }

        let domain = match self.service.domain.as_str() {
            "gui" | "user" | "system" => return Ok(()),
            other => other.parse::<Domain>().map_err(|reason| {
                ServiceError::InvalidConfigValueError {
                    field: "service.domain".to_string(),
                    value: other.to_string(),
                    reason,
                }
            })?,
        };

        let domain_uid = match domain {
            Domain::Gui(uid) | Domain::User(uid) => Some(uid),
            Domain::System => None,
        };
        match (domain_uid, self.service.uid) {
            (Some(in_domain), Some(uid)) if in_domain != uid => {
                Err(ServiceError::InvalidConfigValueError {
                    field: "service.uid".to_string(),
                    value: uid.to_string(),
                    reason: format!("Conflicts with the uid in domain {}", self.service.domain),
                })
            }
            _ => Ok(()),
        }
    }

    /// Turns the configured domain into a concrete target, asking `id -u`
    /// when a per-user domain was given without a uid.
    pub async fn resolve_domain<R: CommandRunner>(&self, runner: &R) -> Result<Domain> {
        let kind = self.service.domain.as_str();
        if kind != "gui" && kind != "user" {
            return kind
                .parse::<Domain>()
                .map_err(|reason| ServiceError::InvalidConfigValueError {
                    field: "service.domain".to_string(),
                    value: kind.to_string(),
                    reason,
                });
        }

        let uid = match self.service.uid {
            Some(uid) => uid,
            None => current_uid(runner).await?,
        };

        Ok(if kind == "gui" {
            Domain::Gui(uid)
        } else {
            Domain::User(uid)
        })
    }

    pub fn definition_dir(&self, domain: Domain) -> Result<PathBuf> {
        if let Some(dir) = &self.service.definition_dir {
            return Ok(PathBuf::from(dir));
        }
        let home = match domain {
            Domain::System => String::new(),
            _ => std::env::var("HOME").map_err(|_| ServiceError::MissingConfigError {
                field: "HOME".to_string(),
            })?,
        };
        Ok(domain.default_definition_dir(&home))
    }

    /// Definition contents described by the `[program]` table.
    pub fn definition(&self) -> Result<ServiceDefinition> {
        let program = validation::validate_required_field("program", &self.program)?;

        Ok(ServiceDefinition {
            label: self.service.name.clone(),
            program_arguments: program.arguments.clone(),
            run_at_load: program.run_at_load,
            keep_alive: program.keep_alive,
            working_directory: program.working_directory.clone(),
            environment: program.environment.clone(),
            stdout_path: program.stdout_path.clone(),
            stderr_path: program.stderr_path.clone(),
        })
    }

    pub async fn build_service<R: CommandRunner>(
        &self,
        runner: R,
    ) -> Result<Service<R, LocalDefinitionStore>> {
        self.validate_config()?;
        let domain = self.resolve_domain(&runner).await?;
        let store = LocalDefinitionStore::new(self.definition_dir(domain)?);
        tracing::debug!(
            "Service {} in {} (definitions in {})",
            self.service.name,
            domain,
            store.base_path().display()
        );

        let service = Service::new(self.service.name.clone(), domain, runner, store)?;
        Ok(match &self.service.launchctl_path {
            Some(path) => service.with_launchctl_path(path.clone()),
            None => service,
        })
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
