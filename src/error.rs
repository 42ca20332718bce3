use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Reasons an inbound payload cannot be turned into a status change.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterpretError {
    #[error("empty payload")]
    EmptyPayload,
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(String),
    #[error("malformed payload: missing `{0}`")]
    MalformedPayload(&'static str),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}
