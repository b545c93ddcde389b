use crate::domain::model::CommandOutput;
use crate::domain::ports::CommandRunner;
use crate::utils::error::{Result, ServiceError};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Spawns real processes through tokio.
#[derive(Debug, Clone, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            status: output.status.to_string(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Uid of the invoking user, as reported by `id -u`.
pub async fn current_uid<R: CommandRunner + ?Sized>(runner: &R) -> Result<u32> {
    let args = vec!["-u".to_string()];
    let output = runner
        .run("id", &args)
        .await
        .map_err(|source| ServiceError::ExecError {
            binary: "id".to_string(),
            source,
        })?;

    if !output.success {
        return Err(ServiceError::CommandFailed {
            binary: "id".to_string(),
            args,
            service: "current user".to_string(),
            status: output.status,
            code: output.code,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout);
    text.trim()
        .parse::<u32>()
        .map_err(|_| ServiceError::InvalidConfigValueError {
            field: "uid".to_string(),
            value: text.trim().to_string(),
            reason: "`id -u` did not print a numeric uid".to_string(),
        })
}
