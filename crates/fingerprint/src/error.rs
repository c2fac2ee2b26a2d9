use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("classfile error: {0}")]
    Classfile(String),
    #[error("class {name} not found in {}", .archive.display())]
    ClassNotFound { name: String, archive: PathBuf },
    #[error("fingerprint encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("fingerprint decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

pub type Result<T> = std::result::Result<T, FingerprintError>;
