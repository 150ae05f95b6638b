//! Dev-mode only endpoints. Not mounted unless `POSTWISE_ENV=dev`.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::SessionToken;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevSessionRequest {
    pub subject: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct DevSessionResponse {
    pub token: String,
}

/// Mint a session token, standing in for the identity provider.
pub async fn create_dev_session(
    State(state): State<AppState>,
    Json(req): Json<DevSessionRequest>,
) -> Result<Json<DevSessionResponse>> {
    if !state.dev_mode {
        return Err(AppError::NotFound("Not found".into()));
    }
    if req.subject.trim().is_empty() {
        return Err(AppError::BadRequest("subject cannot be empty".into()));
    }

    let session = SessionToken {
        subject: req.subject.trim().to_string(),
        email: req.email,
        is_admin: req.is_admin,
    };
    let token = state.sessions.issue(&session)?;
    tracing::info!("Issued dev session for {} (admin: {})", session.subject, session.is_admin);

    Ok(Json(DevSessionResponse { token }))
}
