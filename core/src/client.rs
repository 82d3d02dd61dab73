//! Stateless HTTP request builder and response parser for the votes API.
//!
//! # Design
//! `VotesClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round trip.
//!
//! `getUsers` is the odd one out: its URL is the raw, untrimmed base joined
//! with the path, it never carries the access code, and its status errors
//! omit the response body.

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{extract_user_id, NewUser, NewVote, UserId};

#[derive(Debug, Clone)]
pub struct VotesClient {
    config: ClientConfig,
}

impl VotesClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Join the trimmed base with `path`, appending `?code=<access code>`
    /// when `with_code` is set and a code is configured. The code is used
    /// verbatim.
    pub fn url(&self, path: &str, with_code: bool) -> String {
        match self.config.access_code() {
            Some(code) if with_code => format!("{}{path}?code={code}", self.config.base_url()),
            _ => format!("{}{path}", self.config.base_url()),
        }
    }

    pub fn build_create_user(&self, input: &NewUser) -> Result<HttpRequest, ApiError> {
        self.build_json(Endpoint::PostUser, input)
    }

    pub fn build_create_vote(&self, input: &NewVote) -> Result<HttpRequest, ApiError> {
        self.build_json(Endpoint::PostVote, input)
    }

    pub fn build_fetch_votes(&self) -> HttpRequest {
        let endpoint = Endpoint::GetVotes;
        HttpRequest {
            method: endpoint.method(),
            url: self.url(endpoint.path(), endpoint.appends_access_code()),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_fetch_users(&self) -> HttpRequest {
        let endpoint = Endpoint::GetUsers;
        HttpRequest {
            method: endpoint.method(),
            url: format!("{}{}", self.config.raw_base_url(), endpoint.path()),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<UserId, ApiError> {
        let data = parse_json(Endpoint::PostUser, response)?;
        extract_user_id(&data)
    }

    pub fn parse_create_vote(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_json(Endpoint::PostVote, response)
    }

    /// Returns the vote list exactly as sent, nominally
    /// `[{id, user_id, result, createdAt}, ...]`.
    pub fn parse_fetch_votes(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_json(Endpoint::GetVotes, response)
    }

    /// Returns the user list exactly as sent, nominally
    /// `[{id, pseudo, email, createdAt}, ...]`.
    pub fn parse_fetch_users(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_json(Endpoint::GetUsers, response)
    }

    fn build_json<T: Serialize>(
        &self,
        endpoint: Endpoint,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: endpoint.method(),
            url: self.url(endpoint.path(), endpoint.appends_access_code()),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map a non-2xx status to `ApiError::Status`. Only `getUsers` drops the body.
fn check_status(endpoint: Endpoint, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let body = match endpoint {
        Endpoint::GetUsers => None,
        _ => Some(response.body.clone()),
    };
    Err(ApiError::Status {
        endpoint,
        status: response.status,
        body,
    })
}

fn parse_json(endpoint: Endpoint, response: HttpResponse) -> Result<Value, ApiError> {
    check_status(endpoint, &response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization {
        endpoint,
        message: e.to_string(),
    })
}
