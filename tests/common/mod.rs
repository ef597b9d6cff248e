//! In-process signup service used by the integration tests
//!
//! Implements the same REST contract the real service exposes, with a
//! request counter for gating assertions and a switch to make the logout
//! endpoint fail.

// Each test binary uses a different subset of this fixture
#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "fixture-token";
pub const TEACHER_NAME: &str = "Ms. Rodriguez";
pub const USERNAME: &str = "mrodriguez";
pub const PASSWORD: &str = "art123";

#[derive(Debug, Clone, Serialize)]
pub struct ActivityRecord {
    pub description: String,
    pub schedule: String,
    pub max_participants: usize,
    pub participants: Vec<String>,
}

#[derive(Default)]
pub struct Service {
    pub activities: Mutex<Vec<(String, ActivityRecord)>>,
    pub requests: AtomicUsize,
    pub fail_logout: AtomicBool,
    pub last_auth_header: Mutex<Option<String>>,
}

impl Service {
    pub fn with_default_roster() -> Arc<Self> {
        let service = Service::default();
        *service.activities.lock().unwrap() = vec![
            (
                "Chess Club".to_string(),
                ActivityRecord {
                    description: "Learn strategies and compete in tournaments".to_string(),
                    schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
                    max_participants: 12,
                    participants: vec![
                        "michael@mergington.edu".to_string(),
                        "daniel@mergington.edu".to_string(),
                    ],
                },
            ),
            (
                "Art Studio".to_string(),
                ActivityRecord {
                    description: "Painting and drawing for all levels".to_string(),
                    schedule: "Tuesdays, 3:30 PM - 5:00 PM".to_string(),
                    max_participants: 8,
                    participants: vec![],
                },
            ),
            (
                "Basketball".to_string(),
                ActivityRecord {
                    description: "Practice and play against other schools".to_string(),
                    schedule: "Wednesdays, 4:00 PM - 5:30 PM".to_string(),
                    max_participants: 15,
                    participants: vec!["ava@mergington.edu".to_string()],
                },
            ),
        ];
        Arc::new(service)
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn last_auth(&self) -> Option<String> {
        self.last_auth_header.lock().unwrap().clone()
    }

    pub fn participants_of(&self, name: &str) -> Vec<String> {
        self.activities
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, record)| record.participants.clone())
            .unwrap_or_default()
    }
}

/// Start the fixture on an ephemeral port, returning its base URL
pub async fn start(service: Arc<Service>) -> String {
    let app = Router::new()
        .route("/activities", get(activities))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/check-auth", get(check_auth))
        .route("/activities/{name}/signup", post(signup))
        .route("/activities/{name}/unregister", delete(unregister))
        .with_state(service);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn authorized(service: &Service, headers: &HeaderMap) -> bool {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    *service.last_auth_header.lock().unwrap() = header.clone();
    header.as_deref() == Some(format!("Bearer {}", TOKEN).as_str())
}

/// The listing is a JSON object whose entry order must match insertion
/// order, so it is assembled by hand rather than through a map type.
async fn activities(State(service): State<Arc<Service>>) -> Response {
    service.requests.fetch_add(1, Ordering::SeqCst);
    let list = service.activities.lock().unwrap();
    let mut body = String::from("{");
    for (i, (name, record)) in list.iter().enumerate() {
        if i > 0 {
            body.push(',');
        }
        body.push_str(&serde_json::to_string(name).unwrap());
        body.push(':');
        body.push_str(&serde_json::to_string(record).unwrap());
    }
    body.push('}');
    (
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

async fn login(State(service): State<Arc<Service>>, Json(body): Json<LoginBody>) -> Response {
    service.requests.fetch_add(1, Ordering::SeqCst);
    if body.username == USERNAME && body.password == PASSWORD {
        Json(json!({ "token": TOKEN, "name": TEACHER_NAME })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid username or password" })),
        )
            .into_response()
    }
}

async fn logout(State(service): State<Arc<Service>>, headers: HeaderMap) -> Response {
    service.requests.fetch_add(1, Ordering::SeqCst);
    let _ = authorized(&service, &headers);
    if service.fail_logout.load(Ordering::SeqCst) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "logout backend unavailable" })),
        )
            .into_response()
    } else {
        Json(json!({ "message": "Logged out" })).into_response()
    }
}

async fn check_auth(State(service): State<Arc<Service>>, headers: HeaderMap) -> Response {
    service.requests.fetch_add(1, Ordering::SeqCst);
    if authorized(&service, &headers) {
        Json(json!({ "authenticated": true, "name": TEACHER_NAME })).into_response()
    } else {
        Json(json!({ "authenticated": false })).into_response()
    }
}

#[derive(Deserialize)]
struct EmailParam {
    email: String,
}

async fn signup(
    State(service): State<Arc<Service>>,
    Path(name): Path<String>,
    Query(query): Query<EmailParam>,
    headers: HeaderMap,
) -> Response {
    service.requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&service, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid or expired token" })),
        )
            .into_response();
    }
    let mut list = service.activities.lock().unwrap();
    let Some((_, record)) = list.iter_mut().find(|(n, _)| *n == name) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Activity not found" })),
        )
            .into_response();
    };
    if record.participants.contains(&query.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Already signed up" })),
        )
            .into_response();
    }
    if record.participants.len() >= record.max_participants {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Activity is full" })),
        )
            .into_response();
    }
    record.participants.push(query.email.clone());
    Json(json!({ "message": format!("Signed up {} for {}", query.email, name) })).into_response()
}

async fn unregister(
    State(service): State<Arc<Service>>,
    Path(name): Path<String>,
    Query(query): Query<EmailParam>,
    headers: HeaderMap,
) -> Response {
    service.requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&service, &headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid or expired token" })),
        )
            .into_response();
    }
    let mut list = service.activities.lock().unwrap();
    let Some((_, record)) = list.iter_mut().find(|(n, _)| *n == name) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Activity not found" })),
        )
            .into_response();
    };
    let Some(position) = record.participants.iter().position(|p| *p == query.email) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Participant not found" })),
        )
            .into_response();
    };
    record.participants.remove(position);
    Json(json!({ "message": format!("Removed {} from {}", query.email, name) })).into_response()
}
