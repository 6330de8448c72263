//! Error types for RandoBot Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Invalid race data: {0}")]
    RaceData(#[from] serde_json::Error),

    #[error("Room already open: {0}")]
    RoomExists(String),

    #[error("Room closed: {0}")]
    RoomClosed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
