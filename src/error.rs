// src/error.rs
use thiserror::Error;

/// Failures surfaced by the market-data collaborator. During evaluation all
/// of these degrade the affected pair to a NO_DATA signal instead of
/// aborting the run.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("insufficient history: {got} bars, need {need}")]
    Insufficient { got: usize, need: usize },
}

/// Failures of the persistent state store. A load failure degrades to a
/// seeded in-memory document; a save failure is logged and the in-memory
/// update is kept.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("store transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store document decode failure: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Notification delivery failure. Never affects control flow.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}
