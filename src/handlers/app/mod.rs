mod redeem;

pub use redeem::*;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::db::AppState;
use crate::extractors::Json;
use crate::middleware::SessionContext;
use crate::models::SessionToken;

/// The caller's own session.
pub async fn get_session(Extension(ctx): Extension<SessionContext>) -> Json<SessionToken> {
    Json(ctx.session)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/app/session", get(get_session))
        .route("/app/coupons/redeem", post(redeem_coupon))
}
