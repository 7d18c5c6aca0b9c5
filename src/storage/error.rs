use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to determine a data directory for the weather store")]
    StoreDirResolution,

    #[error("Failed to create store directory '{0}'")]
    StoreDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read store file '{0}'")]
    StoreRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write store file '{0}'")]
    StoreWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode store data from '{0}'")]
    StoreDecode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode store data")]
    StoreEncode(#[source] Box<bincode::error::EncodeError>),

    #[error("Failed to move finished store file into place at '{0}'")]
    StorePersist(PathBuf, #[source] tempfile::PersistError),

    #[error("Store used before initialize() was called")]
    NotInitialized,

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
