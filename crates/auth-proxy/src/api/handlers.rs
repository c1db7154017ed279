//! HTTP request handlers.

use super::types::Envelope;
use super::AppState;
use crate::error::ProxyError;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};
use user_registration::is_valid_email;

const REQUIRED_FIELDS: [&str; 3] = ["username", "email", "password"];

/// Check that the upstream API answers with the stored key.
pub async fn test_connection(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Envelope>), ProxyError> {
    let baas = state.baas()?;
    info!("Connection test requested");

    let reply = baas.probe().await?;

    if !reply.is_success() {
        return Err(ProxyError::Upstream {
            status: reply.status,
            message: format!("connection failed: status {}", reply.status),
            details: reply.details(),
        });
    }

    Ok((
        StatusCode::OK,
        Json(Envelope::success("connection succeeded").with_timestamp(Utc::now())),
    ))
}

/// Validate a registration body and forward it upstream.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Envelope>), ProxyError> {
    let body = body.map_err(|rejection| ProxyError::BodyRejected {
        status: rejection.status().as_u16(),
        reason: rejection.body_text(),
    })?;
    let user: Value = serde_json::from_slice(&body)?;
    check_registration(&user)?;

    let baas = state.baas()?;
    info!(username = ?user["username"], "Registration request received");

    let reply = baas.create_user(&user).await?;

    if !reply.is_success() {
        let details = reply.details();
        let message = if reply.status == 409 {
            classify_conflict(&details, &reply.body)
        } else {
            "registration failed"
        };
        warn!(status = reply.status, reason = message, "Upstream rejected registration");

        return Err(ProxyError::Upstream {
            status: reply.status,
            message: message.to_string(),
            details,
        });
    }

    info!(username = ?user["username"], "Registration forwarded successfully");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success("registration succeeded").with_user(reply.details())),
    ))
}

/// Fallback for paths with no route.
pub async fn not_found() -> ProxyError {
    ProxyError::NotFound
}

/// Fallback for known paths hit with the wrong method.
pub async fn method_not_allowed() -> ProxyError {
    ProxyError::MethodNotAllowed
}

/// Presence and email checks made before anything goes upstream.
fn check_registration(user: &Value) -> Result<(), ProxyError> {
    let object = user
        .as_object()
        .ok_or_else(|| ProxyError::MalformedBody("expected a JSON object".into()))?;

    let field = |name: &str| {
        object
            .get(name)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    };

    if REQUIRED_FIELDS.iter().any(|name| field(name).is_none()) {
        return Err(ProxyError::MissingUserInfo);
    }

    match field("email") {
        Some(email) if is_valid_email(email) => Ok(()),
        _ => Err(ProxyError::InvalidEmail),
    }
}

/// Pick the client message for an upstream 409 from its error text.
pub fn classify_conflict(details: &Value, raw_body: &str) -> &'static str {
    let text = details
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or(raw_body);

    if text.contains("username") {
        "username already exists"
    } else if text.contains("email") {
        "email already registered"
    } else {
        "username or email already exists"
    }
}
