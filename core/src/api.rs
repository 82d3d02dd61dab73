//! Async client for the four functions endpoints.
//!
//! Each call is build, execute, parse: one round trip, no retries and no
//! state shared between calls. Failures are returned to the caller as-is.

use serde_json::Value;
use tracing::debug;

use crate::client::VotesClient;
use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{NewUser, NewVote, UserId};

#[derive(Debug, Clone)]
pub struct ApiClient<T = ReqwestTransport> {
    client: VotesClient,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    pub fn from_config(config: ClientConfig) -> Self {
        Self::new(VotesClient::new(config), ReqwestTransport::default())
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(client: VotesClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &VotesClient {
        &self.client
    }

    /// Register a user and return the id the server assigned.
    pub async fn create_user(&self, input: &NewUser) -> Result<UserId, ApiError> {
        let request = self.client.build_create_user(input)?;
        let response = self.send(Endpoint::PostUser, request).await?;
        self.client.parse_create_user(response)
    }

    /// Record a vote and return the server's response body.
    pub async fn create_vote(&self, input: &NewVote) -> Result<Value, ApiError> {
        let request = self.client.build_create_vote(input)?;
        let response = self.send(Endpoint::PostVote, request).await?;
        self.client.parse_create_vote(response)
    }

    pub async fn fetch_votes(&self) -> Result<Value, ApiError> {
        let request = self.client.build_fetch_votes();
        let response = self.send(Endpoint::GetVotes, request).await?;
        self.client.parse_fetch_votes(response)
    }

    pub async fn fetch_users(&self) -> Result<Value, ApiError> {
        let request = self.client.build_fetch_users();
        let response = self.send(Endpoint::GetUsers, request).await?;
        self.client.parse_fetch_users(response)
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        request: HttpRequest,
    ) -> Result<HttpResponse, ApiError> {
        debug!(endpoint = %endpoint, method = request.method.as_str(), "sending request");
        let response = self.transport.execute(request).await?;
        debug!(endpoint = %endpoint, status = response.status, "received response");
        Ok(response)
    }
}
