use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JarDiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported path kind (expected a directory or a .jar file): {}", .0.display())]
    UnsupportedPathKind(PathBuf),

    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("archive corrupt: {}: {reason}", path.display())]
    ArchiveCorrupt { path: PathBuf, reason: String },

    #[error("not a class file: {0}")]
    NotAClassFile(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, JarDiffError>;
