use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TracescopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("malformed manifest in {}: {source}", .bundle.display())]
    Manifest {
        bundle: PathBuf,
        source: serde_json::Error,
    },
    #[error("unsupported resource location: {0}")]
    UnsupportedLocation(String),
    #[error("fingerprint error: {0}")]
    Fingerprint(#[from] tracescope_fingerprint::FingerprintError),
}

pub type Result<T> = std::result::Result<T, TracescopeError>;
