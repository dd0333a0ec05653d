//! Error types for the rebalancer CLI.

use std::path::PathBuf;

use folio::{ImportError, InputError};

/// All errors that can occur during rebalancer operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read portfolio file {path}: {source}")]
    PortfolioRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse portfolio JSON: {0}")]
    PortfolioParse(#[from] serde_json::Error),

    #[error("invalid portfolio: {0}")]
    Input(#[from] InputError),

    #[error("import failed:\n{0}")]
    Import(#[from] ImportError),

    #[error("unknown model portfolio: {0}")]
    UnknownModel(String),

    #[error("no saved portfolio named \"{0}\"")]
    NotFound(String),

    #[error("maximum of {max} saved portfolios reached; delete one first")]
    StoreFull { max: usize },

    #[error("portfolio store error: {0}")]
    Store(String),

    #[error("failed to render JSON output: {0}")]
    Render(serde_json::Error),

    #[error("aborted: {0}")]
    Aborted(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by the user's portfolio data rather than the
    /// environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Input(_) | Error::Import(_) | Error::UnknownModel(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
