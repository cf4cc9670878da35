use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("No game executable found in {}", .0.display())]
    NoExecutable(PathBuf),

    #[error("{} does not look like a Unity game", .0.display())]
    NotUnity(PathBuf),

    #[error("Incomplete game information: could not determine {0}")]
    IncompleteFingerprint(String),

    #[error("Archive not found: {0}")]
    ArchiveNotFound(String),

    #[error("Failed to extract {archive}: {source}")]
    Extraction {
        archive: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Plugin config was not generated within {0} seconds")]
    InitTimeout(u64),

    #[error("Plugin config not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("Target language is not set in the plugin config")]
    LanguageNotSet,

    #[error("Translation file not found: {}", .0.display())]
    TranslationNotFound(PathBuf),

    #[error("Plugin log not found: {}", .0.display())]
    LogNotFound(PathBuf),

    #[error("Failed to remove {}: {source}", .path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("System command failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InstallerError>;
