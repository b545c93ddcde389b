use crate::domain::model::CommandOutput;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Runs an external program to completion with an empty stdin.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

pub trait DefinitionStore: Send + Sync {
    fn definition_path(&self, name: &str) -> PathBuf;
    fn exists(&self, path: &Path) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn write_definition(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_definition(&self, path: &Path)
        -> impl std::future::Future<Output = Result<()>> + Send;
}
