use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not find cloud {0}")]
    CloudNotFound(String),

    #[error("missing required auth field: {0}")]
    MissingRequiredField(&'static str),

    #[error("failed to merge cloud layers: {0}")]
    Merge(#[source] serde_yaml::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
