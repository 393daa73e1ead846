use crate::domain::ports::TemplateSource;
use crate::utils::error::{ContractError, Result};
use std::path::PathBuf;

/// Reads the contract template from disk on every render.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    path: PathBuf,
}

impl FileTemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TemplateSource for FileTemplateSource {
    async fn load(&self) -> Result<String> {
        tracing::debug!("Loading contract template from: {}", self.path.display());
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ContractError::TemplateUnavailable {
                message: format!("cannot read template '{}': {}", self.path.display(), e),
            })
    }
}
