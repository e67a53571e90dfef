use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("bench not found: {0} has no sites/apps.txt")]
    BenchNotFound(PathBuf),

    #[error("App {0} does not exist")]
    AppNotFound(String),

    #[error("Site {0} does not exist")]
    SiteNotFound(String),

    #[error("Module {0} is not registered by any installed app")]
    ModuleNotFound(String),

    #[error("Patch {0} already exists")]
    PatchExists(String),

    #[error("invalid name '{0}': must not be empty or contain path separators")]
    InvalidName(String),

    #[error("{doctype} {name} already exists")]
    DuplicateEntry { doctype: String, name: String },

    #[error("{doctype} {name} not found")]
    RecordNotFound { doctype: String, name: String },

    #[error("document store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
