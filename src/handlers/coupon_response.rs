//! HTTP rendering of coupon decisions.
//!
//! Evaluation itself knows nothing about status codes; this is the one place
//! where a `CouponDecision` becomes a response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::discount::{CouponDecision, Rejection};
use crate::error::{AppError, Result, msg};
use crate::extractors::Json;
use crate::models::{Coupon, normalize_code};

/// Amounts above this are refused before evaluation.
const MAX_AMOUNT: i64 = 1_000_000_000_000;

#[derive(Debug, Deserialize)]
pub struct CouponRequest {
    /// Missing and blank codes are both treated as "no code"
    #[serde(default)]
    pub code: Option<String>,
    pub amount: Decimal,
}

impl CouponRequest {
    pub fn normalized_code(&self) -> String {
        self.code.as_deref().map(normalize_code).unwrap_or_default()
    }

    /// The base amount, checked to be within `0..=MAX_AMOUNT`.
    pub fn checked_amount(&self) -> Result<Decimal> {
        if self.amount < Decimal::ZERO {
            return Err(AppError::BadRequest(msg::AMOUNT_NEGATIVE.into()));
        }
        if self.amount > Decimal::from(MAX_AMOUNT) {
            return Err(AppError::BadRequest(msg::AMOUNT_TOO_LARGE.into()));
        }
        Ok(self.amount)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<Rejection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<Coupon>,
}

fn rejection_status(reason: Rejection) -> StatusCode {
    match reason {
        Rejection::Invalid => StatusCode::NOT_FOUND,
        Rejection::MissingCode | Rejection::Expired | Rejection::Maxed => StatusCode::BAD_REQUEST,
    }
}

/// Response wrapper for a coupon decision.
pub struct CouponOutcome(pub CouponDecision);

impl IntoResponse for CouponOutcome {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            CouponDecision::Rejected(reason) => (
                rejection_status(reason),
                CouponResponse {
                    valid: false,
                    reason: Some(reason),
                    discounted_amount: None,
                    coupon: None,
                },
            ),
            CouponDecision::Accepted {
                discounted_amount,
                coupon,
            } => (
                StatusCode::OK,
                CouponResponse {
                    valid: true,
                    reason: None,
                    discounted_amount: Some(discounted_amount),
                    coupon: Some(coupon),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}
