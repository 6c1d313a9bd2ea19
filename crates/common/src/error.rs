use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    /// Model artifact missing, unreadable or structurally invalid.
    #[error("load error: {0}")]
    Load(String),

    /// Artifact declares something the process cannot serve (e.g. an unknown schema version).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed request payload.
    #[error("invalid input: {0}")]
    Input(String),

    /// Feature row and regressor disagree on dimensionality.
    #[error("prediction error: {0}")]
    Prediction(String),

    /// The service never reached the ready state; carries the startup failure.
    #[error("model unavailable: {0}")]
    NotReady(String),

    #[error("training error: {0}")]
    Training(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
