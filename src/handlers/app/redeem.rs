use axum::extract::{Extension, State};

use crate::db::{AppState, queries};
use crate::discount::{CouponDecision, Rejection, check_usable, evaluate};
use crate::error::Result;
use crate::extractors::Json;
use crate::handlers::coupon_response::{CouponOutcome, CouponRequest};
use crate::middleware::SessionContext;
use crate::util::now;

/// Apply a coupon at checkout and count the redemption.
///
/// Evaluation is identical to `/api/coupons/validate`. If the coupon stops
/// being usable between evaluation and the counting update (another buyer
/// took the last redemption, an admin disabled it), the current reason is
/// reported instead.
pub async fn redeem_coupon(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(req): Json<CouponRequest>,
) -> Result<CouponOutcome> {
    let amount = req.checked_amount()?;
    let code = req.normalized_code();
    let conn = state.db.get()?;
    let now = now();

    let decision = evaluate(&code, amount, now, &state.coupon_policy, |code| {
        queries::get_coupon_by_code(&conn, code)
    })?;

    let CouponDecision::Accepted {
        discounted_amount,
        coupon,
    } = decision
    else {
        return Ok(CouponOutcome(decision));
    };

    match queries::record_coupon_redemption(&conn, &coupon.id, now)? {
        Some(updated) => {
            tracing::info!(
                "Coupon {} redeemed by {} ({} -> {}, uses {})",
                updated.code,
                ctx.session.subject,
                amount,
                discounted_amount,
                updated.uses
            );
            Ok(CouponOutcome(CouponDecision::Accepted {
                discounted_amount,
                coupon: updated,
            }))
        }
        None => {
            let reason = match queries::get_coupon_by_id(&conn, &coupon.id)? {
                // Usable again on reload (e.g. the cap was raised meanwhile):
                // still report the cap the UPDATE ran into.
                Some(current) => check_usable(&current, now).err().unwrap_or(Rejection::Maxed),
                None => Rejection::Invalid,
            };
            tracing::debug!("Coupon {} redemption lost a race: {}", coupon.code, reason.as_ref());
            Ok(CouponOutcome(CouponDecision::Rejected(reason)))
        }
    }
}
