// SPDX-License-Identifier: Apache-2.0

use rusqlite::Connection;

use crate::{StoreError, StoreErrorCode};

pub const SCHEMA_VERSION: i64 = 1;

const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS orders (
    id                    TEXT PRIMARY KEY,
    marketplace_order_id  TEXT NOT NULL UNIQUE,
    customer_handle       TEXT NOT NULL,
    customer_name         TEXT NOT NULL,
    product_name          TEXT NOT NULL,
    variation             TEXT,
    quantity              INTEGER NOT NULL,
    total_value           TEXT NOT NULL,
    customer_note         TEXT,
    shipping_date         TEXT NOT NULL,
    order_date            TEXT NOT NULL,
    art_status            TEXT NOT NULL DEFAULT 'PENDING',
    art_name              TEXT,
    art_group_id          INTEGER NOT NULL DEFAULT 0,
    cup_quantity          INTEGER,
    real_description      TEXT,
    internal_note         TEXT,
    is_urgent             INTEGER NOT NULL DEFAULT 0,
    urgent_from           TEXT,
    in_daily_queue        INTEGER NOT NULL DEFAULT 0,
    art_png_url           TEXT,
    art_cdr_url           TEXT,
    sent_to_production_at TEXT,
    shipped_at            TEXT,
    created_at            TEXT NOT NULL,
    updated_at            TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_orders_status ON orders (art_status);
CREATE INDEX IF NOT EXISTS idx_orders_customer ON orders (customer_handle);
CREATE INDEX IF NOT EXISTS idx_orders_shipping ON orders (shipping_date);
";

pub fn init(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(PRAGMAS)
        .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
    conn.execute_batch(SCHEMA)?;
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version == 0 {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    } else if version != SCHEMA_VERSION {
        return Err(StoreError::new(
            StoreErrorCode::Io,
            format!("unsupported schema version {version}, expected {SCHEMA_VERSION}"),
        ));
    }
    Ok(())
}
