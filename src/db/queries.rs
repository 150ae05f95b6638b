use rusqlite::{Connection, ErrorCode, OptionalExtension, params, types::Value};
use uuid::Uuid;

use crate::error::{AppError, Result, msg};
use crate::models::*;
use crate::util::now;

use super::from_row::{COUPON_COLS, FromRow, query_all, query_one};

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

/// Turn a UNIQUE violation on `coupons.code` into a 409.
fn map_code_conflict(err: rusqlite::Error) -> AppError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _) if e.code == ErrorCode::ConstraintViolation => {
            AppError::Conflict(msg::COUPON_CODE_TAKEN.into())
        }
        other => other.into(),
    }
}

/// Builder for dynamic UPDATE statements with optional fields.
struct UpdateBuilder {
    table: &'static str,
    id: String,
    fields: Vec<(&'static str, Value)>,
}

impl UpdateBuilder {
    fn new(table: &'static str, id: &str) -> Self {
        Self {
            table,
            id: id.to_string(),
            fields: Vec::new(),
        }
    }

    fn set_opt<V: Into<Value>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.fields.push((column, v.into()));
        }
        self
    }

    /// `Some(None)` writes NULL, `None` leaves the column alone.
    fn set_nullable<V: Into<Value>>(mut self, column: &'static str, value: Option<Option<V>>) -> Self {
        match value {
            Some(Some(v)) => self.fields.push((column, v.into())),
            Some(None) => self.fields.push((column, Value::Null)),
            None => {}
        }
        self
    }

    /// Run the update (stamping `updated_at`) and return the row.
    /// Returns None if no row has this id.
    fn execute_returning<T: FromRow>(mut self, conn: &Connection, returning_cols: &str) -> Result<Option<T>> {
        self.fields.push(("updated_at", now().into()));
        let sets: Vec<String> = self
            .fields
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect();
        let mut values: Vec<Value> = self.fields.into_iter().map(|(_, v)| v).collect();
        values.push(self.id.into());
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ? RETURNING {}",
            self.table,
            sets.join(", "),
            returning_cols
        );
        conn.query_row(&sql, rusqlite::params_from_iter(values), T::from_row)
            .optional()
            .map_err(map_code_conflict)
    }
}

// ============ Coupons ============

pub fn create_coupon(conn: &Connection, input: &CreateCoupon) -> Result<Coupon> {
    let id = gen_id();
    let now = now();
    let code = normalize_code(&input.code);
    let value = input.value.normalize();

    conn.execute(
        "INSERT INTO coupons (id, code, active, kind, value, expires_at, max_redemptions, uses, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)",
        params![
            &id,
            &code,
            input.active,
            input.kind.as_ref(),
            value.to_string(),
            input.expires_at,
            input.max_redemptions,
            now
        ],
    )
    .map_err(map_code_conflict)?;

    Ok(Coupon {
        id,
        code,
        active: input.active,
        kind: input.kind,
        value,
        expires_at: input.expires_at,
        max_redemptions: input.max_redemptions,
        uses: 0,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_coupon_by_id(conn: &Connection, id: &str) -> Result<Option<Coupon>> {
    query_one(
        conn,
        &format!("SELECT {} FROM coupons WHERE id = ?1", COUPON_COLS),
        &[&id],
    )
}

/// Exact match on an already normalized code.
pub fn get_coupon_by_code(conn: &Connection, code: &str) -> Result<Option<Coupon>> {
    query_one(
        conn,
        &format!("SELECT {} FROM coupons WHERE code = ?1", COUPON_COLS),
        &[&code],
    )
}

/// Newest first.
pub fn list_coupons_paginated(conn: &Connection, limit: i64, offset: i64) -> Result<(Vec<Coupon>, i64)> {
    let total: i64 = conn.query_row("SELECT COUNT(*) FROM coupons", [], |row| row.get(0))?;
    let coupons = query_all(
        conn,
        &format!(
            "SELECT {} FROM coupons ORDER BY created_at DESC, code ASC LIMIT ?1 OFFSET ?2",
            COUPON_COLS
        ),
        params![limit, offset],
    )?;
    Ok((coupons, total))
}

/// Returns (total, active).
pub fn count_coupons(conn: &Connection) -> Result<(i64, i64)> {
    conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(active), 0) FROM coupons",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .map_err(Into::into)
}

pub fn update_coupon(conn: &Connection, id: &str, input: &UpdateCoupon) -> Result<Option<Coupon>> {
    UpdateBuilder::new("coupons", id)
        .set_opt("code", input.code.as_deref().map(normalize_code))
        .set_opt("active", input.active)
        .set_opt("kind", input.kind.map(|k| k.as_ref().to_string()))
        .set_opt("value", input.value.map(|v| v.normalize().to_string()))
        .set_nullable("expires_at", input.expires_at)
        .set_nullable("max_redemptions", input.max_redemptions)
        .execute_returning(conn, COUPON_COLS)
}

pub fn delete_coupon(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM coupons WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Count one redemption of a coupon.
///
/// The usability checks are repeated inside the UPDATE so concurrent
/// redemptions can never push `uses` past `max_redemptions`. Returns None
/// when the coupon is gone or stopped being usable after it was evaluated.
pub fn record_coupon_redemption(conn: &Connection, id: &str, now: i64) -> Result<Option<Coupon>> {
    query_one(
        conn,
        &format!(
            "UPDATE coupons SET uses = uses + 1, updated_at = ?2
             WHERE id = ?1
               AND active = 1
               AND (expires_at IS NULL OR expires_at >= ?2)
               AND (max_redemptions IS NULL OR uses < max_redemptions)
             RETURNING {}",
            COUPON_COLS
        ),
        params![id, now],
    )
}
