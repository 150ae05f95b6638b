use rusqlite::Connection;

/// Initialize the database schema.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Coupons (promotional codes applied at checkout)
        -- code is stored uppercase; value is TEXT so decimals round-trip exactly
        -- uses is only ever incremented by the redemption query
        CREATE TABLE IF NOT EXISTS coupons (
            id TEXT PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            active INTEGER NOT NULL DEFAULT 1,
            kind TEXT NOT NULL CHECK (kind IN ('percent', 'fixed')),
            value TEXT NOT NULL,
            expires_at INTEGER,
            max_redemptions INTEGER CHECK (max_redemptions IS NULL OR max_redemptions >= 0),
            uses INTEGER NOT NULL DEFAULT 0 CHECK (uses >= 0),
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        "#,
    )?;
    Ok(())
}
