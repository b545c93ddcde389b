use crate::core::{plist, status};
use crate::domain::model::{Domain, ServiceDefinition, ServiceStatus};
use crate::domain::ports::{CommandRunner, DefinitionStore};
use crate::utils::error::{Result, ServiceError};
use crate::utils::validation::validate_service_name;
use std::path::PathBuf;

pub const DEFAULT_LAUNCHCTL: &str = "launchctl";

/// launchctl exit code for "Could not find service".
pub const SERVICE_NOT_FOUND: i32 = 113;

/// One launchd job, addressed by label within a domain.
pub struct Service<R: CommandRunner, S: DefinitionStore> {
    name: String,
    domain: Domain,
    launchctl: String,
    runner: R,
    store: S,
}

impl<R: CommandRunner, S: DefinitionStore> Service<R, S> {
    /// Fails when `name` could not be a launchd label (empty, whitespace, `/`, NUL, `..`).
    pub fn new(name: impl Into<String>, domain: Domain, runner: R, store: S) -> Result<Self> {
        let name = name.into();
        validate_service_name("service.name", &name)?;

        Ok(Self {
            name,
            domain,
            launchctl: DEFAULT_LAUNCHCTL.to_string(),
            runner,
            store,
        })
    }

    pub fn with_launchctl_path(mut self, path: impl Into<String>) -> Self {
        self.launchctl = path.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// `<domain>/<name>`, the form launchctl expects for a single service.
    pub fn user_specifier(&self) -> String {
        format!("{}/{}", self.domain, self.name)
    }

    pub fn definition_path(&self) -> PathBuf {
        self.store.definition_path(&self.name)
    }

    /// Loads the on-disk definition into the domain (`launchctl bootstrap`).
    pub async fn bootstrap(&self) -> Result<Vec<u8>> {
        let path = self.definition_path();
        if !self.store.exists(&path).await? {
            return Err(ServiceError::DefinitionMissing { path });
        }

        let path = path
            .to_str()
            .ok_or_else(|| ServiceError::InvalidConfigValueError {
                field: "definition_path".to_string(),
                value: path.display().to_string(),
                reason: "launchctl arguments must be valid UTF-8".to_string(),
            })?;
        self.launchctl(&["bootstrap", &self.domain.to_string(), path])
            .await
    }

    /// Writes the definition, then bootstraps it. The definition's label must
    /// be this service's name.
    pub async fn install(&self, definition: &ServiceDefinition) -> Result<Vec<u8>> {
        if definition.label != self.name {
            return Err(ServiceError::InvalidConfigValueError {
                field: "label".to_string(),
                value: definition.label.clone(),
                reason: format!("Definition label must match service name {}", self.name),
            });
        }

        let path = self.definition_path();
        let xml = plist::render(definition);
        self.store.write_definition(&path, xml.as_bytes()).await?;
        tracing::info!("Wrote definition for {} to {}", self.name, path.display());

        self.bootstrap().await
    }

    /// Unloads the service (`launchctl bootout`), optionally deleting its plist.
    ///
    /// The plist is left alone when launchctl fails.
    pub async fn bootout(&self, remove_definition: bool) -> Result<()> {
        self.unary("bootout").await?;

        if remove_definition {
            let path = self.definition_path();
            self.store.remove_definition(&path).await?;
            tracing::info!("Removed definition {}", path.display());
        }
        Ok(())
    }

    pub async fn start(&self) -> Result<()> {
        self.unary("start").await
    }

    pub async fn stop(&self) -> Result<()> {
        self.unary("stop").await
    }

    /// `launchctl kickstart`; with `kill` an already running instance is restarted.
    pub async fn kickstart(&self, kill: bool) -> Result<()> {
        let specifier = self.user_specifier();
        let mut args = vec!["kickstart"];
        if kill {
            args.push("-k");
        }
        args.push(&specifier);
        self.launchctl(&args).await.map(|_| ())
    }

    pub async fn print(&self) -> Result<Vec<u8>> {
        self.launchctl(&["print", &self.user_specifier()]).await
    }

    pub async fn status(&self) -> Result<ServiceStatus> {
        let output = self.print().await?;
        Ok(status::parse_print_output(
            &self.user_specifier(),
            &String::from_utf8_lossy(&output),
        ))
    }

    pub async fn is_loaded(&self) -> Result<bool> {
        match self.print().await {
            Ok(_) => Ok(true),
            Err(e) if e.exit_code() == Some(SERVICE_NOT_FOUND) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn unary(&self, command: &str) -> Result<()> {
        self.launchctl(&[command, &self.user_specifier()])
            .await
            .map(|_| ())
    }

    async fn launchctl(&self, args: &[&str]) -> Result<Vec<u8>> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        tracing::debug!("Running `{} {}`", self.launchctl, args.join(" "));

        let output = self
            .runner
            .run(&self.launchctl, &args)
            .await
            .map_err(|source| ServiceError::ExecError {
                binary: self.launchctl.clone(),
                source,
            })?;

        if !output.success {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::warn!(
                "`{} {}` for {} exited with {}",
                self.launchctl,
                args.join(" "),
                self.name,
                output.status
            );
            return Err(ServiceError::CommandFailed {
                binary: self.launchctl.clone(),
                args,
                service: self.name.clone(),
                status: output.status,
                code: output.code,
                stderr,
            });
        }

        Ok(output.stdout)
    }
}
