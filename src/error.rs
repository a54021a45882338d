use std::num::ParseFloatError;

use duckdb::Error as DuckDbError;
use serde_json::Error as JsonError;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as TungsteniteError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Stream(#[from] TungsteniteError),
    #[error(transparent)]
    ParseJson(#[from] JsonError),
    #[error("Unexpected stream item {0}")]
    UnexpectedItem(String),
    #[error(transparent)]
    ParseFloat(#[from] ParseFloatError),
    #[error(transparent)]
    Database(#[from] DuckDbError),
    #[error("Database connection already closed")]
    ConnectionClosed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
