//! Postwise - coupon evaluation, route authorization and the admin coupon API
//! behind the Postwise content platform.

pub mod config;
pub mod db;
pub mod discount;
pub mod error;
pub mod extractors;
pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod session;
pub mod util;
