use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::error::{AppError, Result, msg};

const MAX_CODE_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CouponType {
    /// `value` is a percentage taken off the amount
    Percent,
    /// `value` is an absolute amount in currency units
    Fixed,
}

/// Promotional code record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    /// Always stored uppercase
    pub code: String,
    pub active: bool,
    #[serde(rename = "type")]
    pub kind: CouponType,
    pub value: Decimal,
    /// Unix seconds; the coupon stops working once this is in the past
    pub expires_at: Option<i64>,
    pub max_redemptions: Option<i64>,
    pub uses: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Normalize a user-supplied coupon code for storage and lookup.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn validate_code(code: &str) -> Result<()> {
    if code.is_empty() {
        return Err(AppError::BadRequest(msg::COUPON_CODE_EMPTY.into()));
    }
    if code.chars().count() > MAX_CODE_LEN {
        return Err(AppError::BadRequest(msg::COUPON_CODE_TOO_LONG.into()));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::BadRequest(msg::COUPON_CODE_CHARSET.into()));
    }
    Ok(())
}

fn validate_value(value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(AppError::BadRequest(msg::COUPON_VALUE_NEGATIVE.into()));
    }
    Ok(())
}

fn validate_max_redemptions(max: Option<i64>) -> Result<()> {
    if max.is_some_and(|m| m < 0) {
        return Err(AppError::BadRequest(
            msg::COUPON_MAX_REDEMPTIONS_NEGATIVE.into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoupon {
    pub code: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(rename = "type")]
    pub kind: CouponType,
    pub value: Decimal,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub max_redemptions: Option<i64>,
}

fn default_active() -> bool {
    true
}

impl CreateCoupon {
    /// Validates the input. The code is checked in its normalized form.
    pub fn validate(&self) -> Result<()> {
        validate_code(&normalize_code(&self.code))?;
        validate_value(self.value)?;
        validate_max_redemptions(self.max_redemptions)
    }
}

/// Partial update. `expiresAt` and `maxRedemptions` distinguish
/// "absent" (leave unchanged) from `null` (clear the limit).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoupon {
    pub code: Option<String>,
    pub active: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<CouponType>,
    pub value: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub expires_at: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub max_redemptions: Option<Option<i64>>,
}

impl UpdateCoupon {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref code) = self.code {
            validate_code(&normalize_code(code))?;
        }
        if let Some(value) = self.value {
            validate_value(value)?;
        }
        if let Some(max) = self.max_redemptions {
            validate_max_redemptions(max)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.active.is_none()
            && self.kind.is_none()
            && self.value.is_none()
            && self.expires_at.is_none()
            && self.max_redemptions.is_none()
    }
}

/// Present-but-null deserializes to `Some(None)`; a missing field stays `None`
/// through `#[serde(default)]`.
fn deserialize_nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
