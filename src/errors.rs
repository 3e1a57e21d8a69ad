use thiserror::Error;

use crate::domain::HierarchyError;

/// Top-level error: hierarchy contract violations and settings problems.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("config error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn config_err(e: impl std::fmt::Display) -> Error {
    Error::Config {
        message: e.to_string(),
    }
}
