use axum::{
    extract::{Extension, State},
    http::StatusCode,
};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result, msg};
use crate::extractors::{Json, Path, Query};
use crate::middleware::SessionContext;
use crate::models::{Coupon, CreateCoupon, UpdateCoupon};
use crate::pagination::{Paginated, PaginationQuery};

pub async fn create_coupon(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(input): Json<CreateCoupon>,
) -> Result<(StatusCode, Json<Coupon>)> {
    input.validate()?;

    let conn = state.db.get()?;
    let coupon = queries::create_coupon(&conn, &input)?;

    tracing::info!("Coupon {} created by {}", coupon.code, ctx.session.subject);
    Ok((StatusCode::CREATED, Json(coupon)))
}

pub async fn list_coupons(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Coupon>>> {
    let conn = state.db.get()?;
    let (coupons, total) =
        queries::list_coupons_paginated(&conn, pagination.limit(), pagination.offset())?;
    Ok(Json(Paginated::new(coupons, total, &pagination)))
}

pub async fn get_coupon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Coupon>> {
    let conn = state.db.get()?;
    let coupon = queries::get_coupon_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound(msg::COUPON_NOT_FOUND.into()))?;
    Ok(Json(coupon))
}

pub async fn update_coupon(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCoupon>,
) -> Result<Json<Coupon>> {
    if input.is_empty() {
        return Err(AppError::BadRequest(msg::NO_FIELDS_TO_UPDATE.into()));
    }
    input.validate()?;

    let conn = state.db.get()?;
    let coupon = queries::update_coupon(&conn, &id, &input)?
        .ok_or_else(|| AppError::NotFound(msg::COUPON_NOT_FOUND.into()))?;

    tracing::info!("Coupon {} updated by {}", coupon.code, ctx.session.subject);
    Ok(Json(coupon))
}

pub async fn delete_coupon(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let conn = state.db.get()?;
    if !queries::delete_coupon(&conn, &id)? {
        return Err(AppError::NotFound(msg::COUPON_NOT_FOUND.into()));
    }

    tracing::info!("Coupon {} deleted by {}", id, ctx.session.subject);
    Ok(StatusCode::NO_CONTENT)
}
