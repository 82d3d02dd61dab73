//! Error types for the votes API client.
//!
//! # Design
//! Non-2xx responses land in `Status` with the endpoint, the status code and
//! the response body when one was captured. Transport failures are wrapped
//! transparently so their message reaches the caller unchanged. A created
//! user without a recognised identifier is its own variant even though the
//! HTTP call itself succeeded.

use thiserror::Error;

use crate::endpoint::Endpoint;

/// Errors returned by `VotesClient` parse methods and `ApiClient` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered outside the 2xx range.
    ///
    /// `body` is `None` for `getUsers`, which reports the status only.
    #[error("{endpoint} {status}{}", body_suffix(.body))]
    Status {
        endpoint: Endpoint,
        status: u16,
        body: Option<String>,
    },

    /// postUser succeeded but none of `id`, `user_id`, `userId` was usable.
    #[error("Réponse inattendue (id manquant)")]
    MissingIdentifier,

    /// The response body could not be decoded as JSON.
    #[error("{endpoint}: deserialization failed: {message}")]
    Deserialization { endpoint: Endpoint, message: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The network round trip itself failed.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(text) => format!(": {text}"),
        None => String::new(),
    }
}

/// Errors raised while loading `ClientConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingBase(&'static str),
}
