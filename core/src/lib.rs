//! API client core for the votes functions host.
//!
//! # Overview
//! Four remote calls: create a user, create a vote, list votes, list users.
//! `VotesClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). `ApiClient` pairs it
//! with a `Transport` to offer the four calls as async functions.
//!
//! # Design
//! - `ClientConfig` is built once and passed in; there is no global state.
//! - URLs are `base + path`, plus `?code=<access code>` on postUser and
//!   postVote when a code is configured.
//! - Response payloads are returned verbatim, except postUser where only
//!   the created user's id is kept.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use client::VotesClient;
pub use config::ClientConfig;
pub use endpoint::Endpoint;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{extract_user_id, NewUser, NewVote, UserId};
