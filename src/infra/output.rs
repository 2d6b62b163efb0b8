//! Filesystem sink for generated pages.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::site::PageSink;

use super::error::InfraError;

/// Writes generated files beneath a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, InfraError> {
        let path = Path::new(relative);
        if relative.is_empty()
            || path.is_absolute()
            || path.components().any(|component| {
                matches!(
                    component,
                    Component::ParentDir | Component::Prefix(_) | Component::RootDir
                )
            })
        {
            return Err(InfraError::InvalidOutputPath(relative.to_string()));
        }

        Ok(self.root.join(path))
    }
}

#[async_trait]
impl PageSink for DirectorySink {
    async fn write_page(&self, path: &str, contents: String) -> Result<(), InfraError> {
        let absolute = self.resolve(path)?;
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&absolute, contents).await?;

        debug!(
            target = "spacetraveling::output",
            path = %absolute.display(),
            "Wrote page"
        );
        Ok(())
    }
}
