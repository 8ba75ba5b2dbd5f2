use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Store is not available")]
    StoreUnavailable,

    #[error("Item not found: {0}")]
    ItemNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
