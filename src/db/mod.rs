mod from_row;
mod schema;
pub mod queries;

pub use schema::init_db;

use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::discount::CouponPolicy;
use crate::guard::RouteGuardConfig;
use crate::session::SessionKeys;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state shared by every handler. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    /// Verifies (and in dev mode issues) session tokens
    pub sessions: SessionKeys,
    pub guard: Arc<RouteGuardConfig>,
    pub coupon_policy: CouponPolicy,
    pub dev_mode: bool,
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path);
    Pool::builder().max_size(10).build(manager)
}
