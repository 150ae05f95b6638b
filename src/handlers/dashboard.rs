use axum::{extract::Extension, routing::get, Router};
use serde::Serialize;

use crate::db::AppState;
use crate::extractors::{Json, Path};
use crate::middleware::SessionContext;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub subject: String,
    pub email: Option<String>,
    pub section: String,
}

fn render(ctx: SessionContext, section: String) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        subject: ctx.session.subject,
        email: ctx.session.email,
        section,
    })
}

pub async fn dashboard_home(Extension(ctx): Extension<SessionContext>) -> Json<DashboardResponse> {
    render(ctx, "home".to_string())
}

pub async fn dashboard_section(
    Extension(ctx): Extension<SessionContext>,
    Path(section): Path<String>,
) -> Json<DashboardResponse> {
    render(ctx, section)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_home))
        .route("/dashboard/{*section}", get(dashboard_section))
}
