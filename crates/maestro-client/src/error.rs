//! Client error types

use thiserror::Error;

/// Errors surfaced by the Maestro client
///
/// The transport and crypto layers never retry on their own; every failure
/// is classified and returned to the caller immediately. Retrying is the
/// responsibility of the wait primitive in `maestro-provision`, opt-in per
/// call site.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid secret key length: {0} bytes (AES requires 16, 24 or 32)")]
    InvalidKeyLength(usize),

    #[error("failed to encrypt request body")]
    Encryption,

    #[error("failed to decrypt response body: {0}")]
    Decryption(String),

    #[error("failed to serialize request: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("failed to deserialize response: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("failed to build request: {0}")]
    RequestBuild(String),

    #[error("failed to process request: {0}")]
    Network(#[source] reqwest::Error),

    #[error("failed to read response body: {0}")]
    ResponseRead(#[source] reqwest::Error),

    #[error("got status code {status} instead of 200, body: {body}")]
    Protocol { status: u16, body: String },

    #[error("neither 'error' nor 'data' in response")]
    EmptyResponse,

    #[error("remote error: {0}")]
    Remote(String),

    #[error("resource not found")]
    NotFound,

    #[error("environment variable '{0}' is not set")]
    MissingEnv(&'static str),
}

pub type Result<T> = std::result::Result<T, ClientError>;
