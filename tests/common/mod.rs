//! In-process stand-in for the SammySwipe backend

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use sammyswipe::app::AppContext;
use sammyswipe::config::{Config, FixtureSourceKind};
use sammyswipe::session::MemoryStorage;

pub const EMAIL: &str = "ana@example.com";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "tok-123";
pub const USER_ID: &str = "me-1";

#[derive(Default)]
pub struct FakeBackend {
    /// `Authorization` header of every authenticated call, in order
    pub auth_headers: Mutex<Vec<Option<String>>>,
    pub sockets: Mutex<HashMap<String, mpsc::UnboundedSender<String>>>,
    pub uploads: Mutex<Vec<Bytes>>,
}

pub struct TestServer {
    pub base_url: String,
    pub ws_url: String,
    pub backend: Arc<FakeBackend>,
}

pub async fn spawn_backend() -> TestServer {
    let backend = Arc::new(FakeBackend::default());

    let api = Router::new()
        .route("/auth/token", post(token))
        .route("/users/me", get(me).put(update_me))
        .route("/users/me/photo", post(upload_photo))
        .route("/matches/recommendations", get(recommendations))
        .route("/matches/my-matches", get(my_matches))
        .route("/matches/:id", post(acknowledge))
        .route("/matches/:id/reject", put(acknowledge))
        .route("/matches/:id/accept", put(acknowledge))
        .route("/chat/:id/history", get(history))
        .route("/chat/:id", post(send_message))
        .route("/chat/:id/mark-read", put(mark_read))
        .route("/health", get(health));

    let router = Router::new()
        .nest("/api/v1", api)
        .route("/ws/chat/:user_id", get(chat_socket))
        .with_state(Arc::clone(&backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}/api/v1", addr),
        ws_url: format!("ws://{}/ws", addr),
        backend,
    }
}

impl TestServer {
    pub fn config(&self, allow_superuser: bool) -> Config {
        let mut config = Config::default();
        config.api.base_url = self.base_url.clone();
        config.api.ws_url = self.ws_url.clone();
        config.api.request_timeout_secs = 5;
        config.fixtures.allow_superuser = allow_superuser;
        config.fixtures.source = FixtureSourceKind::Local;
        config
    }

    pub fn context(&self, allow_superuser: bool) -> (AppContext, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let ctx = AppContext::new(self.config(allow_superuser), storage.clone()).unwrap();
        (ctx, storage)
    }

    pub fn seen_auth_headers(&self) -> Vec<Option<String>> {
        self.backend.auth_headers.lock().unwrap().clone()
    }
}

/// Context already signed in as the test user
pub async fn signed_in(server: &TestServer) -> (AppContext, Arc<MemoryStorage>) {
    let (ctx, storage) = server.context(false);
    ctx.session.login(EMAIL, PASSWORD).await.unwrap();
    (ctx, storage)
}

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn check_auth(backend: &FakeBackend, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let expected = format!("Bearer {}", TOKEN);
    let valid = header.as_deref() == Some(expected.as_str());
    backend.auth_headers.lock().unwrap().push(header);

    if valid {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Could not validate credentials" })),
        ))
    }
}

fn profile() -> Value {
    json!({
        "id": USER_ID,
        "email": EMAIL,
        "username": "ana",
        "full_name": "Ana Lima",
        "gender": "female",
        "birth_date": "1995-04-02T00:00:00",
        "bio": "Coffee first",
        "interests": ["Coffee", "Hiking"],
        "location": "Lisbon, Portugal"
    })
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Reply {
    let ok = form.get("username").map(String::as_str) == Some(EMAIL)
        && form.get("password").map(String::as_str) == Some(PASSWORD);
    if ok {
        Ok(Json(json!({ "access_token": TOKEN, "token_type": "bearer" })))
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect username or password" })),
        ))
    }
}

async fn me(State(backend): State<Arc<FakeBackend>>, headers: HeaderMap) -> Reply {
    check_auth(&backend, &headers)?;
    Ok(Json(profile()))
}

async fn update_me(
    State(backend): State<Arc<FakeBackend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    check_auth(&backend, &headers)?;
    let mut user = profile();
    user["full_name"] = body["full_name"].clone();
    user["bio"] = body["bio"].clone();
    Ok(Json(user))
}

async fn upload_photo(
    State(backend): State<Arc<FakeBackend>>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply {
    check_auth(&backend, &headers)?;
    backend.uploads.lock().unwrap().push(body);
    Ok(Json(json!({ "message": "Profile photo updated successfully" })))
}

async fn recommendations(State(backend): State<Arc<FakeBackend>>, headers: HeaderMap) -> Reply {
    check_auth(&backend, &headers)?;
    let candidates: Vec<Value> = ["a", "b", "c"]
        .iter()
        .enumerate()
        .map(|(i, id)| {
            json!({
                "id": id,
                "full_name": format!("Candidate {}", id.to_uppercase()),
                "interests": ["Music"],
                "birth_date": "1994-01-01",
                "match_score": 0.9 - i as f64 * 0.1,
                "common_topics": ["Music"]
            })
        })
        .collect();
    Ok(Json(Value::Array(candidates)))
}

async fn my_matches(State(backend): State<Arc<FakeBackend>>, headers: HeaderMap) -> Reply {
    check_auth(&backend, &headers)?;
    Ok(Json(json!([
        { "id": "u1", "full_name": "Bea Costa", "interests": [], "match_score": 0.8 },
        { "id": "u2", "full_name": "Caio Reis", "interests": [] }
    ])))
}

async fn acknowledge(
    State(backend): State<Arc<FakeBackend>>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Reply {
    check_auth(&backend, &headers)?;
    Ok(Json(json!({ "message": "ok" })))
}

async fn history(
    State(backend): State<Arc<FakeBackend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    check_auth(&backend, &headers)?;
    Ok(Json(json!([
        { "sender_id": id, "content": "Hi Ana!", "sent_at": "2024-03-01T09:00:00", "read": true }
    ])))
}

async fn send_message(
    State(backend): State<Arc<FakeBackend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    check_auth(&backend, &headers)?;
    Ok(Json(json!({
        "id": "m-new",
        "sender_id": USER_ID,
        "receiver_id": id,
        "content": body["content"],
        "timestamp": "2024-03-01T09:01:00",
        "is_read": false
    })))
}

async fn mark_read(
    State(backend): State<Arc<FakeBackend>>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Reply {
    check_auth(&backend, &headers)?;
    Ok(Json(json!({ "messages_marked_read": 1 })))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn chat_socket(
    ws: WebSocketUpgrade,
    Path(user_id): Path<String>,
    State(backend): State<Arc<FakeBackend>>,
) -> Response {
    ws.on_upgrade(move |socket| relay(socket, user_id, backend))
        .into_response()
}

/// Forward each raw frame to the connection named by its `receiver_id`
async fn relay(socket: WebSocket, user_id: String, backend: Arc<FakeBackend>) {
    let (mut sink, mut source) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    backend.sockets.lock().unwrap().insert(user_id.clone(), tx);

    let forward = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = source.next().await {
        if let Message::Text(text) = message {
            let Ok(frame) = serde_json::from_str::<Value>(&text) else {
                continue;
            };
            let receiver = frame["receiver_id"].as_str().unwrap_or_default().to_string();
            let target = backend.sockets.lock().unwrap().get(&receiver).cloned();
            if let Some(target) = target {
                let _ = target.send(text);
            }
        }
    }

    backend.sockets.lock().unwrap().remove(&user_id);
    forward.abort();
}

/// Wait until `user_id` has a registered socket on the fake backend
pub async fn wait_for_socket(server: &TestServer, user_id: &str) {
    for _ in 0..100 {
        if server.backend.sockets.lock().unwrap().contains_key(user_id) {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("socket for {} never registered", user_id);
}
