use std::{io, path::Path};

use thiserror::Error;

use crate::{
    application::{repos::RepoError, site::PageRenderError},
    domain::error::DomainError,
    infra::error::InfraError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Content(#[from] RepoError),
    #[error(transparent)]
    Template(#[from] PageRenderError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Failure reading `path`; a missing path is reported as not-found, naming it.
    pub fn from_input(err: InfraError, path: &Path) -> Self {
        match err {
            InfraError::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                Self::not_found(format!("input `{}` does not exist", path.display()))
            }
            other => Self::from(other),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Process exit status reported by the binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_) | AppError::Domain(DomainError::Validation { .. }) => 2,
            AppError::NotFound(_) | AppError::Content(RepoError::NotFound) => 3,
            _ => 1,
        }
    }
}
