use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::db::AppState;
use crate::error::{AppError, msg};
use crate::guard::{Decision, authorize};
use crate::models::SessionToken;

/// The verified session of an allowed, authenticated request.
///
/// Inserted into request extensions by [`route_guard`]; handlers behind a
/// namespace that requires a session can extract it unconditionally.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session: SessionToken,
}

/// Runs the route guard before every handler.
///
/// Deny and redirect short-circuit: the inner service is never called.
pub async fn route_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = state.sessions.from_headers(request.headers());
    let path = request.uri().path().to_string();

    match authorize(&path, session.as_ref(), &state.guard) {
        Decision::Allow => {
            if let Some(session) = session {
                request.extensions_mut().insert(SessionContext { session });
            }
            Ok(next.run(request).await)
        }
        Decision::AllowWithRedirect(target) => {
            tracing::debug!("Redirecting {} to {}", path, target);
            Ok(Redirect::temporary(&target).into_response())
        }
        Decision::Deny => match session {
            None => {
                tracing::debug!("Denied anonymous request to {}", path);
                Err(AppError::Unauthorized)
            }
            Some(session) => {
                tracing::debug!("Denied {} to non-admin {}", path, session.subject);
                Err(AppError::Forbidden(msg::ADMIN_REQUIRED.into()))
            }
        },
    }
}
