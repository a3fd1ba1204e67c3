//! Mock EVENTZ API for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Form, Multipart, Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::Mutex;
use serde_json::{json, Value};
use time::{Duration, OffsetDateTime};
use url::Url;

#[derive(Debug, Default)]
pub struct MockState {
    /// `METHOD /path` of every request received, in order.
    pub calls: Mutex<Vec<String>>,
    /// Authorization header of every request that reached a handler, in order.
    pub seen_auth: Mutex<Vec<Option<String>>>,
    /// Body served by `GET /api/notifications/my`; `Null` serves a non-list.
    pub notifications: Mutex<Value>,
    pub push_tokens: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<(String, usize)>>,
    pub activated: Mutex<Vec<i64>>,
}

type Shared = Arc<MockState>;

pub fn unsigned_token(payload: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.c2lnbmF0dXJl")
}

pub fn token_expiring_in(offset: Duration, claims: Value) -> String {
    let mut payload = claims;
    payload["exp"] = json!((OffsetDateTime::now_utc() + offset).unix_timestamp());
    unsigned_token(payload)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Polls `check` until it holds, failing the test after two seconds.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 2s");
}

/// Starts the mock API on an ephemeral port.
pub async fn spawn_api() -> (Url, Shared) {
    init_tracing();
    let state = Shared::default();

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(no_content),
        )
        .route("/api/events/{id}/upload", post(upload))
        .route("/api/events/{id}/media/{media_id}", delete(no_content))
        .route("/api/events/{id}/insights", get(event_insights))
        .route("/api/events/insights/global", get(global_insights))
        .route(
            "/api/registrations/events/{id}/register",
            post(register).delete(no_content),
        )
        .route(
            "/api/registrations/events/{id}/registrations",
            get(event_registrations),
        )
        .route("/api/registrations/my-registrations", get(my_registrations))
        .route("/api/notifications", delete(no_content))
        .route("/api/notifications/my", get(my_notifications))
        .route("/api/notifications/{id}", delete(no_content))
        .route("/api/notifications/token", post(push_token))
        .route("/api/users", get(list_users))
        .route("/api/users/{id}/activate", patch(activate))
        .route("/api/users/{id}/deactivate", patch(deactivate))
        .route("/analytics/event/{id}", get(event_analytics))
        .route(
            "/analytics/event/{id}/registrations-over-time",
            get(registrations_over_time),
        )
        .route(
            "/analytics/event/{id}/registrations-by-year",
            get(registrations_by_year),
        )
        .layer(middleware::from_fn_with_state(state.clone(), record_call))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}")).unwrap(), state)
}

async fn record_call(State(state): State<Shared>, request: Request, next: Next) -> Response {
    state
        .calls
        .lock()
        .push(format!("{} {}", request.method(), request.uri().path()));
    next.run(request).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// Records the Authorization header and returns the bearer token, if any.
fn bearer(state: &MockState, headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.seen_auth.lock().push(raw.clone());
    raw?.strip_prefix("Bearer ").map(str::to_string)
}

fn event_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Event {id}"),
        "description": "A campus event",
        "venue": "Main Hall",
        "start_time": "2030-03-01T10:00:00",
        "end_time": null,
        "capacity": 50,
        "registered_count": 12,
        "category": "Tech"
    })
}

async fn login(Form(form): Form<HashMap<String, String>>) -> Response {
    let user = form.get("username").map(String::as_str);
    let pass = form.get("password").map(String::as_str);
    let claims = match (user, pass) {
        (Some("alice"), Some("pw1")) => json!({ "sub": "1", "is_admin": false }),
        (Some("root"), Some("pw2")) => {
            json!({ "sub": "2", "email": "root@campus.edu", "is_admin": true, "is_super_admin": true })
        }
        _ => return detail(StatusCode::UNAUTHORIZED, "Incorrect username or password"),
    };
    let token = token_expiring_in(Duration::seconds(3600), claims);
    Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
}

async fn signup(Json(body): Json<Value>) -> Response {
    if body["email"] == json!("taken@campus.edu") {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    Json(json!({
        "id": 10,
        "email": body["email"],
        "full_name": body["full_name"],
        "is_active": false
    }))
    .into_response()
}

async fn list_events(State(state): State<Shared>, headers: HeaderMap) -> Response {
    bearer(&state, &headers);
    Json(json!([event_json(1), event_json(2)])).into_response()
}

async fn get_event(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    bearer(&state, &headers);
    if id > 100 {
        return detail(StatusCode::NOT_FOUND, "Event not found");
    }
    Json(event_json(id)).into_response()
}

async fn update_event(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if bearer(&state, &headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    let mut updated = body;
    updated["id"] = json!(id);
    Json(updated).into_response()
}

async fn no_content(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if bearer(&state, &headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn event_insights(State(state): State<Shared>, headers: HeaderMap, Path(_id): Path<i64>) -> Response {
    bearer(&state, &headers);
    Json(json!({
        "demand_level": "High",
        "top_demographics": ["CSE", "2nd year"],
        "similar_events": [{ "id": 2, "title": "Event 2" }]
    }))
    .into_response()
}

async fn global_insights(State(state): State<Shared>, headers: HeaderMap) -> Response {
    bearer(&state, &headers);
    Json(json!({
        "total_events_active": 4,
        "total_registrations_all_time": 120,
        "most_popular_event_title": "Event 1",
        "trending_events": null
    }))
    .into_response()
}

async fn event_registrations(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    bearer(&state, &headers);
    Json(json!([
        { "id": 1, "user_id": 1, "event_id": id, "registered_at": "2030-01-01T09:00:00" },
        { "id": 2, "user_id": 3, "event_id": id, "registered_at": "2030-01-02T09:00:00" }
    ]))
    .into_response()
}

async fn create_event(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if bearer(&state, &headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    let mut created = body;
    created["id"] = json!(99);
    Json(created).into_response()
}

async fn upload(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
    mut multipart: Multipart,
) -> Response {
    if bearer(&state, &headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.unwrap_or_default();
            state.uploads.lock().push((name, data.len()));
        }
    }
    Json(json!({ "status": "ok" })).into_response()
}

async fn register(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if bearer(&state, &headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    if id == 13 {
        return detail(StatusCode::FORBIDDEN, "Event full");
    }
    Json(json!({
        "id": 500,
        "user_id": 1,
        "event_id": id,
        "registered_at": "2030-01-01T09:00:00"
    }))
    .into_response()
}

async fn my_registrations(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if bearer(&state, &headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    Json(json!([{
        "id": 500,
        "user_id": 1,
        "event_id": 4,
        "registered_at": "2030-01-01T09:00:00",
        "event": event_json(4)
    }]))
    .into_response()
}

async fn my_notifications(State(state): State<Shared>, headers: HeaderMap) -> Response {
    bearer(&state, &headers);
    let body = state.notifications.lock().clone();
    if body.is_null() {
        return Json(json!({ "message": "no notifications" })).into_response();
    }
    Json(body).into_response()
}

async fn push_token(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if bearer(&state, &headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    let token = body["token"].as_str().unwrap_or_default().to_string();
    state.push_tokens.lock().push(token);
    Json(json!({ "status": "ok" })).into_response()
}

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    bearer(&state, &headers);
    Json(json!([
        { "id": 1, "email": "alice@campus.edu", "is_active": true, "year_of_study": 2, "branch": "CSE" },
        { "id": 3, "email": "carol@campus.edu", "is_active": false, "year_of_study": 1, "branch": "ECE" }
    ]))
    .into_response()
}

async fn activate(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if bearer(&state, &headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    state.activated.lock().push(id);
    Json(json!({ "id": id, "is_active": true })).into_response()
}

async fn deactivate(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if bearer(&state, &headers).is_none() {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    Json(json!({ "id": id, "is_active": false })).into_response()
}

async fn registrations_over_time(State(state): State<Shared>, headers: HeaderMap, Path(_id): Path<i64>) -> Response {
    bearer(&state, &headers);
    Json(json!([
        { "date": "2030-01-01", "count": 4 },
        { "date": "2030-01-02", "count": 7 }
    ]))
    .into_response()
}

async fn registrations_by_year(State(state): State<Shared>, headers: HeaderMap, Path(_id): Path<i64>) -> Response {
    bearer(&state, &headers);
    Json(json!([{ "year": 1, "count": 5 }, { "year": "2", "count": 6 }])).into_response()
}

async fn event_analytics(State(state): State<Shared>, headers: HeaderMap, Path(_id): Path<i64>) -> Response {
    bearer(&state, &headers);
    Json(json!({ "labels": ["1st year", "2nd year"], "values": [3, 9] })).into_response()
}
