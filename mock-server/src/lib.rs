//! In-memory stand-in for the votes functions host.
//!
//! Serves the four `/api/*` routes the client calls. postUser and postVote
//! check `?code=` when an access code is configured; the list routes never
//! do. `MockConfig` also controls which field carries a created user's id
//! and can force every route to fail, and every request URI is recorded in
//! a `RequestLog`.

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub pseudo: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vote {
    pub id: u64,
    pub user_id: Value,
    pub result: Value,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub pseudo: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct NewVote {
    pub user_id: Value,
    pub result: Value,
}

/// Field under which postUser reports the new user's id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdField {
    #[default]
    Id,
    SnakeUserId,
    CamelUserId,
    /// Leave the id out of the response entirely.
    Omitted,
}

impl IdField {
    fn name(self) -> Option<&'static str> {
        match self {
            IdField::Id => Some("id"),
            IdField::SnakeUserId => Some("user_id"),
            IdField::CamelUserId => Some("userId"),
            IdField::Omitted => None,
        }
    }
}

/// A response every route returns instead of doing its work.
#[derive(Clone, Debug)]
pub struct Failure {
    pub status: u16,
    pub body: String,
}

#[derive(Clone, Debug, Default)]
pub struct MockConfig {
    pub access_code: Option<String>,
    pub id_field: IdField,
    pub failure: Option<Failure>,
}

/// URIs (path and query) of every request the server received, in order.
#[derive(Clone, Debug, Default)]
pub struct RequestLog(Arc<RwLock<Vec<String>>>);

impl RequestLog {
    pub async fn entries(&self) -> Vec<String> {
        self.0.read().await.clone()
    }

    async fn push(&self, uri: String) {
        self.0.write().await.push(uri);
    }
}

#[derive(Default)]
struct Store {
    users: Vec<User>,
    votes: Vec<Vote>,
}

#[derive(Clone)]
struct AppState {
    store: Arc<RwLock<Store>>,
    config: Arc<MockConfig>,
    log: RequestLog,
}

#[derive(Deserialize)]
struct CodeQuery {
    code: Option<String>,
}

type HandlerError = (StatusCode, String);

pub fn app() -> Router {
    app_with(MockConfig::default()).0
}

pub fn app_with(config: MockConfig) -> (Router, RequestLog) {
    let log = RequestLog::default();
    let state = AppState {
        store: Arc::new(RwLock::new(Store::default())),
        config: Arc::new(config),
        log: log.clone(),
    };
    let router = Router::new()
        .route("/api/postUser", post(post_user))
        .route("/api/postVote", post(post_vote))
        .route("/api/getVotes", get(get_votes))
        .route("/api/getUsers", get(get_users))
        .layer(middleware::from_fn_with_state(state.clone(), record_and_fail))
        .with_state(state);
    (router, log)
}

pub async fn run(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn record_and_fail(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let uri = request.uri().to_string();
    debug!(method = %request.method(), %uri, "request");
    state.log.push(uri).await;
    match &state.config.failure {
        Some(failure) => {
            let status =
                StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, failure.body.clone()).into_response()
        }
        None => next.run(request).await,
    }
}

fn check_code(config: &MockConfig, query: &CodeQuery) -> Result<(), HandlerError> {
    match &config.access_code {
        Some(expected) if query.code.as_ref() != Some(expected) => {
            warn!("rejected request with a missing or wrong access code");
            Err((StatusCode::UNAUTHORIZED, "invalid access code".to_string()))
        }
        _ => Ok(()),
    }
}

async fn post_user(
    State(state): State<AppState>,
    Query(query): Query<CodeQuery>,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<Value>), HandlerError> {
    check_code(&state.config, &query)?;
    let user = User {
        id: Uuid::new_v4().to_string(),
        pseudo: input.pseudo,
        email: input.email,
        created_at: Utc::now(),
    };
    state.store.write().await.users.push(user.clone());

    let mut body = json!({
        "pseudo": user.pseudo,
        "email": user.email,
        "createdAt": user.created_at,
    });
    if let (Some(field), Some(object)) = (state.config.id_field.name(), body.as_object_mut()) {
        object.insert(field.to_string(), Value::String(user.id));
    }
    Ok((StatusCode::CREATED, Json(body)))
}

async fn post_vote(
    State(state): State<AppState>,
    Query(query): Query<CodeQuery>,
    Json(input): Json<NewVote>,
) -> Result<(StatusCode, Json<Vote>), HandlerError> {
    check_code(&state.config, &query)?;
    let mut store = state.store.write().await;
    let known = input
        .user_id
        .as_str()
        .is_some_and(|id| store.users.iter().any(|user| user.id == id));
    if !known {
        return Err((StatusCode::BAD_REQUEST, "unknown user".to_string()));
    }
    let vote = Vote {
        id: store.votes.len() as u64 + 1,
        user_id: input.user_id,
        result: input.result,
        created_at: Utc::now(),
    };
    store.votes.push(vote.clone());
    Ok((StatusCode::CREATED, Json(vote)))
}

async fn get_votes(State(state): State<AppState>) -> Json<Vec<Vote>> {
    Json(state.store.read().await.votes.clone())
}

async fn get_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.store.read().await.users.clone())
}
