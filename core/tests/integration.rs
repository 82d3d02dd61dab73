//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port. The first test drives
//! the host-does-IO `build_*`/`parse_*` pair over ureq, the rest go through
//! `ApiClient` and its reqwest transport. The truncated-body tests use a bare
//! TCP listener instead, since axum always delivers the full body.

use mock_server::{Failure, IdField, MockConfig, RequestLog};
use serde_json::json;
use votes_core::{
    ApiClient, ApiError, ClientConfig, HttpMethod, HttpRequest, HttpResponse, NewUser, NewVote,
    UserId, VotesClient,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.url).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.url)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.url).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Start the mock server on its own runtime thread and return its base URL.
fn spawn_blocking_server(config: MockConfig) -> (String, RequestLog) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();
    let (router, log) = mock_server::app_with(config);

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, router).await
        })
        .unwrap();
    });

    (format!("http://{addr}"), log)
}

/// Serve a single connection with a response whose body is shorter than its
/// `Content-Length`, then hang up.
fn spawn_truncating_server(status_line: &'static str) -> String {
    use std::io::{BufRead, BufReader, Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        // Consume the whole request so closing does not reset the connection.
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).unwrap();

        let mut stream = reader.into_inner();
        write!(
            stream,
            "{status_line}\r\ncontent-type: text/plain\r\ncontent-length: 100\r\n\r\npartial"
        )
        .unwrap();
        stream.flush().unwrap();
        stream.shutdown(std::net::Shutdown::Both).unwrap();
    });

    format!("http://{addr}")
}

async fn spawn_server(config: MockConfig) -> (String, RequestLog) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (router, log) = mock_server::app_with(config);
    tokio::spawn(mock_server::run(listener, router));
    (format!("http://{addr}"), log)
}

fn ana() -> NewUser {
    NewUser {
        pseudo: "ana".to_string(),
        email: "ana@example.com".to_string(),
    }
}

fn locked() -> MockConfig {
    MockConfig {
        access_code: Some("abc".to_string()),
        ..MockConfig::default()
    }
}

#[test]
fn host_driven_lifecycle() {
    let (base, _log) = spawn_blocking_server(locked());
    let client = VotesClient::new(ClientConfig::new(&format!("{base}/"), Some("abc")));

    // Step 1: both lists start empty.
    let votes = client.parse_fetch_votes(execute(client.build_fetch_votes())).unwrap();
    assert_eq!(votes, json!([]));

    // Step 2: register a user.
    let req = client.build_create_user(&ana()).unwrap();
    let id = client.parse_create_user(execute(req)).unwrap();

    // Step 3: vote as that user.
    let vote = NewVote {
        user_id: id.clone(),
        result: json!("yes"),
    };
    let req = client.build_create_vote(&vote).unwrap();
    let created = client.parse_create_vote(execute(req)).unwrap();
    assert_eq!(created["result"], "yes");

    // Step 4: the vote is listed with the user's id.
    let votes = client.parse_fetch_votes(execute(client.build_fetch_votes())).unwrap();
    assert_eq!(votes.as_array().unwrap().len(), 1);
    assert_eq!(votes[0]["user_id"], id.to_string());
}

#[tokio::test]
async fn async_lifecycle_sends_code_to_writes_only() {
    let (base, log) = spawn_server(locked()).await;
    let api = ApiClient::from_config(ClientConfig::new(&base, Some("abc")));

    let id = api.create_user(&ana()).await.unwrap();
    let vote = NewVote {
        user_id: id.clone(),
        result: json!({"choice": 2}),
    };
    let echoed = api.create_vote(&vote).await.unwrap();
    assert_eq!(echoed["user_id"], id.to_string());

    let votes = api.fetch_votes().await.unwrap();
    assert_eq!(votes[0]["result"], json!({"choice": 2}));

    let users = api.fetch_users().await.unwrap();
    assert_eq!(users[0]["pseudo"], "ana");
    assert_eq!(users[0]["id"], id.to_string());

    assert_eq!(
        log.entries().await,
        vec![
            "/api/postUser?code=abc",
            "/api/postVote?code=abc",
            "/api/getVotes",
            "/api/getUsers",
        ]
    );
}

#[tokio::test]
async fn create_user_accepts_snake_case_id() {
    let (base, _log) = spawn_server(MockConfig {
        id_field: IdField::SnakeUserId,
        ..MockConfig::default()
    })
    .await;
    let api = ApiClient::from_config(ClientConfig::new(&base, None));

    let id = api.create_user(&ana()).await.unwrap();
    let users = api.fetch_users().await.unwrap();
    assert_eq!(UserId::Text(users[0]["id"].as_str().unwrap().to_string()), id);
}

#[tokio::test]
async fn create_user_without_id_is_a_contract_error() {
    let (base, _log) = spawn_server(MockConfig {
        id_field: IdField::Omitted,
        ..MockConfig::default()
    })
    .await;
    let api = ApiClient::from_config(ClientConfig::new(&base, None));

    let err = api.create_user(&ana()).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingIdentifier));
}

#[tokio::test]
async fn server_errors_surface_status_and_body() {
    let (base, _log) = spawn_server(MockConfig {
        failure: Some(Failure {
            status: 500,
            body: "server error".to_string(),
        }),
        ..MockConfig::default()
    })
    .await;
    let api = ApiClient::from_config(ClientConfig::new(&base, None));
    let vote = NewVote {
        user_id: UserId::from(1),
        result: json!("x"),
    };

    let messages = [
        api.create_user(&ana()).await.unwrap_err().to_string(),
        api.create_vote(&vote).await.unwrap_err().to_string(),
        api.fetch_votes().await.unwrap_err().to_string(),
    ];
    assert_eq!(messages[0], "postUser 500: server error");
    assert_eq!(messages[1], "postVote 500: server error");
    assert_eq!(messages[2], "getVotes 500: server error");

    let err = api.fetch_users().await.unwrap_err();
    assert_eq!(err.to_string(), "getUsers 500");
}

#[tokio::test]
async fn wrong_code_is_rejected_by_the_server() {
    let (base, _log) = spawn_server(locked()).await;
    let api = ApiClient::from_config(ClientConfig::new(&base, Some("wrong")));

    let err = api.create_user(&ana()).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 401, .. }));
    assert_eq!(err.to_string(), "postUser 401: invalid access code");
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::from_config(ClientConfig::new(&format!("http://{addr}"), None));
    let err = api.fetch_votes().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn unreadable_error_body_becomes_empty() {
    let base = spawn_truncating_server("HTTP/1.1 500 Internal Server Error");
    let api = ApiClient::from_config(ClientConfig::new(&base, None));
    let vote = NewVote {
        user_id: UserId::from("u-1"),
        result: json!("yes"),
    };

    let err = api.create_vote(&vote).await.unwrap_err();
    assert!(matches!(
        &err,
        ApiError::Status { status: 500, body: Some(body), .. } if body.is_empty()
    ));
    assert_eq!(err.to_string(), "postVote 500: ");
}

#[tokio::test]
async fn unreadable_success_body_is_a_transport_error() {
    let base = spawn_truncating_server("HTTP/1.1 200 OK");
    let api = ApiClient::from_config(ClientConfig::new(&base, None));

    let err = api.fetch_votes().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
