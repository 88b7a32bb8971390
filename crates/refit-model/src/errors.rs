use crate::coords::ProjectKey;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating or writing the descriptor graph.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid coordinate '{0}': expected group:artifact")]
    InvalidCoordinate(String),

    #[error("failed reading descriptor '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed parsing descriptor '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed serializing descriptor of {key}: {source}")]
    Serialize {
        key: ProjectKey,
        #[source]
        source: toml::ser::Error,
    },

    #[error("failed writing descriptor '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate project {key} declared by '{path}'")]
    DuplicateProject { key: ProjectKey, path: PathBuf },

    #[error("module cycle: descriptor '{path}' is reached more than once")]
    ModuleCycle { path: PathBuf },
}

pub type ModelResult<T> = Result<T, ModelError>;
