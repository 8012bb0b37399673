use std::path::PathBuf;

pub type SdResult<T> = Result<T, SdError>;

#[derive(Debug, thiserror::Error)]
pub enum SdError {
    #[error("[Concurrent Error] {0}")]
    ConcurrentError(#[from] ::tokio::task::JoinError),

    #[error("[CSV Error] {0}")]
    CsvError(#[from] ::csv::Error),

    #[error("[Invalid] {message}")]
    Invalid { code: &'static str, message: String },

    #[error("[IO Error] {0}")]
    IoError(#[from] std::io::Error),

    #[error("[Lock Error] {0}")]
    LockError(String),

    #[error("[No Data] {message}")]
    NoData { code: &'static str, message: String },

    #[error("[Parse Config Error] {0}")]
    ParseConfigError(#[from] ::confy::ConfyError),

    #[error("[Serde JSON Error] {0}")]
    SerdeJsonError(#[from] ::serde_json::Error),
}

impl SdError {
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Invalid { code, .. } | Self::NoData { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<std::sync::PoisonError<std::sync::RwLockReadGuard<'_, Option<PathBuf>>>> for SdError {
    fn from(err: std::sync::PoisonError<std::sync::RwLockReadGuard<'_, Option<PathBuf>>>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<std::sync::PoisonError<std::sync::RwLockWriteGuard<'_, Option<PathBuf>>>> for SdError {
    fn from(err: std::sync::PoisonError<std::sync::RwLockWriteGuard<'_, Option<PathBuf>>>) -> Self {
        Self::LockError(err.to_string())
    }
}
