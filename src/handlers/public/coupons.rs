use axum::extract::State;

use crate::db::{AppState, queries};
use crate::discount::{CouponDecision, evaluate};
use crate::error::Result;
use crate::extractors::Json;
use crate::handlers::coupon_response::{CouponOutcome, CouponRequest};
use crate::models::Coupon;
use crate::util::now;

/// Check a coupon against an amount without redeeming it.
pub async fn validate_coupon(
    State(state): State<AppState>,
    Json(req): Json<CouponRequest>,
) -> Result<CouponOutcome> {
    let amount = req.checked_amount()?;
    let code = req.normalized_code();

    // The store is only touched once there is a code to look up.
    let decision = evaluate(&code, amount, now(), &state.coupon_policy, |code| -> Result<Option<Coupon>> {
        let conn = state.db.get()?;
        queries::get_coupon_by_code(&conn, code)
    })?;

    match &decision {
        CouponDecision::Accepted {
            discounted_amount, ..
        } => tracing::debug!("Coupon {} valid: {} -> {}", code, amount, discounted_amount),
        CouponDecision::Rejected(reason) => {
            tracing::debug!("Coupon '{}' rejected: {}", code, reason.as_ref())
        }
    }

    Ok(CouponOutcome(decision))
}
