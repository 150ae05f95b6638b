pub mod admin;
pub mod app;
mod coupon_response;
pub mod dashboard;
pub mod dev;
pub mod public;

pub use coupon_response::{CouponOutcome, CouponRequest, CouponResponse};

use axum::{middleware, routing::post, Router};

use crate::db::AppState;
use crate::middleware::route_guard;

/// The full application: every route sits behind the route guard.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .merge(public::router())
        .merge(app::router())
        .merge(dashboard::router())
        .merge(admin::router());

    if state.dev_mode {
        app = app.route("/dev/session", post(dev::create_dev_session));
    }

    app.layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .with_state(state)
}
