//! Axum-based HTTP gateway for the account operations.
//!
//! The router is the request dispatcher: it maps path + method onto one
//! store operation. Handlers are stateless — all credential state lives in
//! the SQLite-backed [`AccountStore`] shared through [`AppState`].
//!
//! Hardening carried by the layer stack:
//! - Request body size limit (64KB)
//! - Request timeout (30s) to prevent slow-loris abuse
//! - Permissive CORS (the portal frontend is served from another origin)

use crate::auth::{AccountChanges, AccountStore, AuthError, RegisterRequest};
use crate::config::Config;
use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB) — prevents memory exhaustion
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout — account operations are single-statement SQLite calls
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AccountStore>,
}

/// Concrete return type for handlers (avoids `impl IntoResponse` inference issues).
type ApiResponse = (StatusCode, Json<serde_json::Value>);

/// Run the HTTP gateway.
pub async fn run_gateway(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.gateway.host, config.gateway.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let display_addr = listener.local_addr()?;

    let store = Arc::new(AccountStore::open(&config.auth.db_path)?);
    tracing::info!(db = %config.auth.db_path.display(), "Account store initialized");

    let state = AppState { store };

    println!("🔐 clientgate listening on http://{display_addr}");
    println!("  POST   /auth/login       — authenticate, receive bearer token");
    println!("  POST   /auth/register    — create a new account");
    println!("  PUT    /auth/update      — change profile and/or password");
    println!("  GET    /auth/users       — list accounts (public projection)");
    println!("  DELETE /auth/users/{{id}}  — delete an account");
    println!("  POST   /auth/seed-admin  — provision the administrator account");
    println!("  GET    /health           — health check");
    println!("  Press Ctrl+C to stop.\n");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

/// Build the router with middleware. Split out from [`run_gateway`] so
/// tests can drive it in-process.
pub fn router(state: AppState) -> Router {
    // ── CORS — the portal frontend connects from any origin ──
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(handle_health))
        .route("/auth/login", post(handle_login))
        .route("/auth/register", post(handle_register))
        .route("/auth/update", put(handle_update))
        .route("/auth/users", get(handle_list_users))
        .route("/auth/users/{id}", delete(handle_delete_user))
        .route("/auth/seed-admin", post(handle_seed_admin))
        .with_state(state)
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Map a store error onto its HTTP status. Store failures are logged here
/// because this is the last point that sees them before the response.
fn error_response(err: AuthError) -> ApiResponse {
    let status = match &err {
        AuthError::Validation(_) | AuthError::Conflict(_) => StatusCode::BAD_REQUEST,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::NotFound => StatusCode::NOT_FOUND,
        AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Account store failure: {err}");
    }
    (status, Json(serde_json::json!({"error": err.to_string()})))
}

fn bad_request(message: &str) -> ApiResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message})),
    )
}

// ══════════════════════════════════════════════════════════════════════════════
// AXUM HANDLERS
// ══════════════════════════════════════════════════════════════════════════════

/// GET /health — always public (no secrets leaked)
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Request body for login.
#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

/// POST /auth/login — authenticate and receive a bearer token.
async fn handle_login(
    State(state): State<AppState>,
    body: Result<Json<LoginBody>, axum::extract::rejection::JsonRejection>,
) -> ApiResponse {
    let Ok(Json(body)) = body else {
        return bad_request("Invalid JSON body");
    };

    match state.store.login(&body.username, &body.password) {
        Ok((user, token)) => {
            tracing::info!(username = %user.username, "Login succeeded");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "success": true,
                    "user": user,
                    "token": token,
                })),
            )
        }
        Err(e) => {
            tracing::warn!("Login failed");
            error_response(e)
        }
    }
}

/// Request body for registration. Username and password are validated in
/// the store so that missing and empty fields fail the same way.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RegisterBody {
    username: Option<String>,
    password: Option<String>,
    role: Option<String>,
    display_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    client_data: Option<serde_json::Value>,
}

/// POST /auth/register — create a new account.
async fn handle_register(
    State(state): State<AppState>,
    body: Result<Json<RegisterBody>, axum::extract::rejection::JsonRejection>,
) -> ApiResponse {
    let Ok(Json(body)) = body else {
        return bad_request("Invalid JSON body");
    };

    let request = RegisterRequest {
        role: body.role,
        display_name: body.display_name,
        email: body.email,
        phone: body.phone,
        client_data: body.client_data,
    };

    match state.store.register(
        body.username.as_deref().unwrap_or(""),
        body.password.as_deref().unwrap_or(""),
        request,
    ) {
        Ok(user_id) => {
            tracing::info!(user_id, "Account registered");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "success": true,
                    "userId": user_id,
                })),
            )
        }
        Err(e) => error_response(e),
    }
}

/// Request body for account update.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct UpdateBody {
    user_id: Option<i64>,
    current_password: Option<String>,
    new_password: Option<String>,
    display_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    client_data: Option<serde_json::Value>,
}

/// PUT /auth/update — change profile fields and/or rotate the password.
async fn handle_update(
    State(state): State<AppState>,
    body: Result<Json<UpdateBody>, axum::extract::rejection::JsonRejection>,
) -> ApiResponse {
    let Ok(Json(body)) = body else {
        return bad_request("Invalid JSON body");
    };

    let Some(user_id) = body.user_id else {
        return bad_request("userId is required");
    };

    let changes = AccountChanges {
        current_password: body.current_password,
        new_password: body.new_password,
        display_name: body.display_name,
        email: body.email,
        phone: body.phone,
        client_data: body.client_data,
    };

    match state.store.update(user_id, changes) {
        Ok(()) => {
            tracing::info!(user_id, "Account updated");
            (StatusCode::OK, Json(serde_json::json!({"success": true})))
        }
        Err(e) => error_response(e),
    }
}

/// GET /auth/users — list every account's public projection.
async fn handle_list_users(State(state): State<AppState>) -> ApiResponse {
    match state.store.list() {
        Ok(users) => (
            StatusCode::OK,
            Json(serde_json::json!({"users": users})),
        ),
        Err(e) => error_response(e),
    }
}

/// DELETE /auth/users/{id} — remove an account. Idempotent: deleting a
/// nonexistent id is success.
async fn handle_delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResponse {
    match state.store.delete(id) {
        Ok(()) => {
            tracing::info!(id, "Account deleted");
            (StatusCode::OK, Json(serde_json::json!({"success": true})))
        }
        Err(e) => error_response(e),
    }
}

/// POST /auth/seed-admin — idempotently provision the administrator account.
async fn handle_seed_admin(State(state): State<AppState>) -> ApiResponse {
    match state.store.seed_admin() {
        Ok(message) => (
            StatusCode::OK,
            Json(serde_json::json!({"success": true, "message": message})),
        ),
        Err(e) => error_response(e),
    }
}

// ── Tests ───────────────────────────────────────────────────────────
