//! Request payloads and the user identifier returned by postUser.
//!
//! Vote and user records coming back from the list endpoints are not typed
//! here: the client hands them to the caller exactly as the server sent them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::ApiError;

/// Field names tried, in order, when reading the id of a created user.
pub const USER_ID_FIELDS: [&str; 3] = ["id", "user_id", "userId"];

/// Request payload for postUser.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewUser {
    pub pseudo: String,
    pub email: String,
}

/// Request payload for postVote. `result` is passed through uninterpreted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewVote {
    pub user_id: UserId,
    pub result: Value,
}

/// Server-assigned user identifier, either a string or a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum UserId {
    Text(String),
    Number(Number),
}

impl UserId {
    fn is_truthy(&self) -> bool {
        match self {
            UserId::Text(text) => !text.is_empty(),
            UserId::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Text(text) => f.write_str(text),
            UserId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId::Text(value.to_string())
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        UserId::Number(value.into())
    }
}

/// Pick the created user's id out of a postUser response.
///
/// The first non-null field of `id`, `user_id`, `userId` wins. The winner
/// must be a non-empty string or a non-zero number; anything else, or no
/// field at all, is `ApiError::MissingIdentifier`.
pub fn extract_user_id(data: &Value) -> Result<UserId, ApiError> {
    let selected = USER_ID_FIELDS
        .iter()
        .filter_map(|field| data.get(field))
        .find(|value| !value.is_null());

    let id = match selected {
        Some(Value::String(text)) => UserId::Text(text.clone()),
        Some(Value::Number(n)) => UserId::Number(n.clone()),
        _ => return Err(ApiError::MissingIdentifier),
    };

    if id.is_truthy() {
        Ok(id)
    } else {
        Err(ApiError::MissingIdentifier)
    }
}
