//! Row mapping for query results.

use std::str::FromStr;

use rusqlite::{Connection, OptionalExtension, Row, ToSql, types::Type};
use rust_decimal::Decimal;

use crate::models::*;

/// Parse a TEXT column with `FromStr`, reporting bad data as a column type
/// error instead of panicking.
fn parse_text<T: FromStr>(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<T> {
    row.get::<_, String>(col)?
        .parse::<T>()
        .map_err(|_| rusqlite::Error::InvalidColumnType(col, col_name.to_string(), Type::Text))
}

pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub const COUPON_COLS: &str =
    "id, code, active, kind, value, expires_at, max_redemptions, uses, created_at, updated_at";

impl FromRow for Coupon {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Coupon {
            id: row.get(0)?,
            code: row.get(1)?,
            active: row.get(2)?,
            kind: parse_text::<CouponType>(row, 3, "kind")?,
            value: parse_text::<Decimal>(row, 4, "value")?,
            expires_at: row.get(5)?,
            max_redemptions: row.get(6)?,
            uses: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}
