use crate::domain::ports::DefinitionStore;
use crate::utils::error::{Result, ServiceError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Definitions kept as `<base_path>/<label>.plist`.
#[derive(Debug, Clone)]
pub struct LocalDefinitionStore {
    base_path: PathBuf,
}

impl LocalDefinitionStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl DefinitionStore for LocalDefinitionStore {
    fn definition_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.plist", name))
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(fs::try_exists(path).await?)
    }

    async fn write_definition(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(path, data).await?;
        Ok(())
    }

    async fn remove_definition(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
            .await
            .map_err(|source| ServiceError::DefinitionRemoveError {
                path: path.to_path_buf(),
                source,
            })
    }
}
