//! Error types for the slot logic engine

use thiserror::Error;

use crate::registry::LogicKey;

/// Engine error type
///
/// Configuration and registry failures surface at construction time; an
/// `Invariant` error aborts the spin that hit it.
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logic already registered: {0}")]
    AlreadyRegistered(LogicKey),

    #[error("Unknown logic: {0}")]
    UnknownLogic(LogicKey),

    #[error("Unknown game id: {0}")]
    UnknownGame(u32),

    #[error("Duplicate game id: {0}")]
    DuplicateGame(u32),

    #[error("Invalid spin request: {0}")]
    InvalidRequest(String),

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SlotError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SlotError::Config(msg.into())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        SlotError::Invariant(msg.into())
    }
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
