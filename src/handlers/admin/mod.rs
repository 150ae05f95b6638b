mod coupons;

pub use coupons::*;

use axum::{
    extract::State,
    routing::get,
    Router,
};
use serde::Serialize;

use crate::db::{AppState, queries};
use crate::error::Result;
use crate::extractors::Json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub total_coupons: i64,
    pub active_coupons: i64,
}

pub async fn admin_overview(State(state): State<AppState>) -> Result<Json<AdminOverview>> {
    let conn = state.db.get()?;
    let (total_coupons, active_coupons) = queries::count_coupons(&conn)?;
    Ok(Json(AdminOverview {
        total_coupons,
        active_coupons,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_overview))
        .route("/admin/coupons", get(list_coupons).post(create_coupon))
        .route(
            "/admin/coupons/{id}",
            get(get_coupon).put(update_coupon).delete(delete_coupon),
        )
}
