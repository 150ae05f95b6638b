mod coupon;
mod session;

pub use coupon::*;
pub use session::*;
