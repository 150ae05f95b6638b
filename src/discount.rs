//! Coupon evaluation.
//!
//! Decides whether a coupon code can be applied to an amount and what the
//! discounted amount is. Evaluation is a pure decision: the coupon record is
//! fetched through the caller-supplied lookup and `uses` is never touched.
//! Recording a redemption is a separate step (see
//! `db::queries::record_coupon_redemption`).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::models::{Coupon, CouponType};

/// Why a coupon was not accepted. Variants are listed in the order the
/// checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    MissingCode,
    /// Unknown code or inactive coupon
    Invalid,
    Expired,
    /// Redemption cap reached
    Maxed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CouponDecision {
    Rejected(Rejection),
    Accepted {
        discounted_amount: Decimal,
        coupon: Coupon,
    },
}

impl CouponDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CouponDecision::Accepted { .. })
    }
}

/// Rounding applied to percent discounts, to whole currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum DiscountRounding {
    /// Ties go away from zero: 498.5 -> 499
    #[default]
    HalfUp,
    /// Ties go to the even neighbour: 498.5 -> 498
    HalfEven,
}

impl DiscountRounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            DiscountRounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            DiscountRounding::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CouponPolicy {
    pub rounding: DiscountRounding,
}

/// Check the lifecycle fields of a coupon at time `now` (unix seconds).
///
/// Inactive before expired before maxed. Expiry is strict: a coupon whose
/// `expires_at` equals `now` is still usable.
pub fn check_usable(coupon: &Coupon, now: i64) -> Result<(), Rejection> {
    if !coupon.active {
        return Err(Rejection::Invalid);
    }
    if coupon.expires_at.is_some_and(|exp| exp < now) {
        return Err(Rejection::Expired);
    }
    if coupon
        .max_redemptions
        .is_some_and(|max| coupon.uses >= max)
    {
        return Err(Rejection::Maxed);
    }
    Ok(())
}

/// Amount left to pay after applying `coupon` to `amount`.
///
/// Always within `0..=amount`. Rounding a fractional amount to whole units
/// may not push the result above what was asked.
pub fn apply_discount(coupon: &Coupon, amount: Decimal, rounding: DiscountRounding) -> Decimal {
    let discounted = match coupon.kind {
        CouponType::Percent => {
            if coupon.value >= Decimal::ONE_HUNDRED {
                Decimal::ZERO
            } else {
                let remaining = Decimal::ONE_HUNDRED - coupon.value;
                (amount * remaining / Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(0, rounding.strategy())
                    .min(amount)
            }
        }
        CouponType::Fixed => amount - coupon.value,
    };
    discounted.max(Decimal::ZERO)
}

/// Evaluate `code` against `amount`.
///
/// `code` must already be normalized (see `models::normalize_code`). An empty
/// code is rejected without calling `lookup`. Errors from `lookup` are
/// returned as-is so a store failure is never mistaken for an unknown code.
pub fn evaluate<F, E>(
    code: &str,
    amount: Decimal,
    now: i64,
    policy: &CouponPolicy,
    lookup: F,
) -> Result<CouponDecision, E>
where
    F: FnOnce(&str) -> Result<Option<Coupon>, E>,
{
    if code.is_empty() {
        return Ok(CouponDecision::Rejected(Rejection::MissingCode));
    }

    let Some(coupon) = lookup(code)? else {
        return Ok(CouponDecision::Rejected(Rejection::Invalid));
    };

    if let Err(reason) = check_usable(&coupon, now) {
        return Ok(CouponDecision::Rejected(reason));
    }

    let discounted_amount = apply_discount(&coupon, amount, policy.rounding);
    Ok(CouponDecision::Accepted {
        discounted_amount,
        coupon,
    })
}
