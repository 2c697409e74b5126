// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{named_params, OptionalExtension, Row, ToSql};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use cupflow_model::{
    real_description_for, total_cups_for, ArtStatus, AssetKind, Order, OrderDraft, OrderPatch,
};

use crate::{OrderStore, StoreError, StoreErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Filters for `OrderStore::list`. All fields are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<ArtStatus>,
    pub search: Option<String>,
    pub in_daily_queue: Option<bool>,
}

const COLUMNS: &str = "id, marketplace_order_id, customer_handle, customer_name, product_name, \
     variation, quantity, total_value, customer_note, shipping_date, order_date, art_status, \
     art_name, art_group_id, cup_quantity, real_description, internal_note, is_urgent, \
     urgent_from, in_daily_queue, art_png_url, art_cdr_url, sent_to_production_at, shipped_at, \
     created_at, updated_at";

/// Column values as SQLite hands them back, before the fields that live as
/// TEXT (uuid, decimal, status) are parsed.
struct RawOrder {
    id: String,
    marketplace_order_id: String,
    customer_handle: String,
    customer_name: String,
    product_name: String,
    variation: Option<String>,
    quantity: u32,
    total_value: String,
    customer_note: Option<String>,
    shipping_date: NaiveDate,
    order_date: NaiveDate,
    art_status: String,
    art_name: Option<String>,
    art_group_id: i64,
    cup_quantity: Option<u32>,
    real_description: Option<String>,
    internal_note: Option<String>,
    is_urgent: bool,
    urgent_from: Option<NaiveDate>,
    in_daily_queue: bool,
    art_png_url: Option<String>,
    art_cdr_url: Option<String>,
    sent_to_production_at: Option<DateTime<Utc>>,
    shipped_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawOrder> {
    Ok(RawOrder {
        id: row.get(0)?,
        marketplace_order_id: row.get(1)?,
        customer_handle: row.get(2)?,
        customer_name: row.get(3)?,
        product_name: row.get(4)?,
        variation: row.get(5)?,
        quantity: row.get(6)?,
        total_value: row.get(7)?,
        customer_note: row.get(8)?,
        shipping_date: row.get(9)?,
        order_date: row.get(10)?,
        art_status: row.get(11)?,
        art_name: row.get(12)?,
        art_group_id: row.get(13)?,
        cup_quantity: row.get(14)?,
        real_description: row.get(15)?,
        internal_note: row.get(16)?,
        is_urgent: row.get(17)?,
        urgent_from: row.get(18)?,
        in_daily_queue: row.get(19)?,
        art_png_url: row.get(20)?,
        art_cdr_url: row.get(21)?,
        sent_to_production_at: row.get(22)?,
        shipped_at: row.get(23)?,
        created_at: row.get(24)?,
        updated_at: row.get(25)?,
    })
}

impl TryFrom<RawOrder> for Order {
    type Error = StoreError;

    fn try_from(raw: RawOrder) -> Result<Self, StoreError> {
        let corrupt = |field: &str, detail: String| {
            StoreError::new(
                StoreErrorCode::Internal,
                format!("corrupt {field} in stored order: {detail}"),
            )
        };
        Ok(Order {
            id: Uuid::parse_str(&raw.id).map_err(|e| corrupt("id", e.to_string()))?,
            marketplace_order_id: raw.marketplace_order_id,
            customer_handle: raw.customer_handle,
            customer_name: raw.customer_name,
            product_name: raw.product_name,
            variation: raw.variation,
            quantity: raw.quantity,
            total_value: Decimal::from_str(&raw.total_value)
                .map_err(|e| corrupt("total_value", e.to_string()))?,
            customer_note: raw.customer_note,
            shipping_date: raw.shipping_date,
            order_date: raw.order_date,
            art_status: ArtStatus::parse(&raw.art_status)
                .map_err(|e| corrupt("art_status", e.0))?,
            art_name: raw.art_name,
            art_group_id: raw.art_group_id,
            cup_quantity: raw.cup_quantity,
            real_description: raw.real_description,
            internal_note: raw.internal_note,
            is_urgent: raw.is_urgent,
            urgent_from: raw.urgent_from,
            in_daily_queue: raw.in_daily_queue,
            art_png_url: raw.art_png_url,
            art_cdr_url: raw.art_cdr_url,
            sent_to_production_at: raw.sent_to_production_at,
            shipped_at: raw.shipped_at,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

impl OrderStore {
    pub fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
        let mut sql = format!("SELECT {COLUMNS} FROM orders");
        let mut clauses: Vec<&str> = Vec::new();
        let mut owned: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(status) = filter.status {
            clauses.push("art_status = ?");
            owned.push(Box::new(status.as_str()));
        }
        if let Some(queued) = filter.in_daily_queue {
            clauses.push("in_daily_queue = ?");
            owned.push(Box::new(queued));
        }
        if let Some(search) = filter.search.as_deref() {
            clauses.push(
                "(customer_handle LIKE ?1 OR customer_name LIKE ?1 \
                 OR marketplace_order_id LIKE ?1 OR product_name LIKE ?1 \
                 OR art_name LIKE ?1)",
            );
            owned.push(Box::new(format!("%{search}%")));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY shipping_date ASC, created_at ASC");

        // ?1-style placeholders only work when search is the sole parameter,
        // so renumber the clause when others precede it.
        let sql = renumber_placeholders(&sql);
        let params: Vec<&dyn ToSql> = owned.iter().map(AsRef::as_ref).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let raws = stmt
            .query_map(&params[..], read_raw)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(Order::try_from).collect()
    }

    pub fn get(&self, id: Uuid) -> Result<Order, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM orders WHERE id = ?");
        let raw = self
            .conn
            .query_row(&sql, [id.to_string()], read_raw)
            .optional()?
            .ok_or_else(|| StoreError::not_found(id))?;
        Order::try_from(raw)
    }

    /// Fetches the given orders, preserving the caller's ordering. Unknown
    /// ids are silently dropped.
    pub fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Order>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT {COLUMNS} FROM orders WHERE id IN ({placeholders})");
        let id_strings: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let raws = stmt
            .query_map(rusqlite::params_from_iter(id_strings.iter()), read_raw)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let mut by_id: HashMap<Uuid, Order> = HashMap::with_capacity(raws.len());
        for raw in raws {
            let order = Order::try_from(raw)?;
            by_id.insert(order.id, order);
        }
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Inserts a freshly imported order, or refreshes the marketplace fields
    /// of one already on file. Workflow state (status, group, urgency, queue
    /// membership, assets) is never touched on update; the mapping-derived
    /// cup count and description are only filled in where still missing.
    pub fn upsert_imported(
        &mut self,
        draft: &OrderDraft,
    ) -> Result<(UpsertOutcome, Order), StoreError> {
        let (outcome, id) = upsert_one(&self.conn, draft, Utc::now())?;
        Ok((outcome, self.get(id)?))
    }

    /// Upserts a batch of imported drafts inside one transaction, so a chunk
    /// either lands whole or not at all.
    pub fn upsert_chunk(&mut self, drafts: &[OrderDraft]) -> Result<(usize, usize), StoreError> {
        let now = Utc::now();
        let tx = self.conn.transaction()?;
        let (mut created, mut updated) = (0usize, 0usize);
        for draft in drafts {
            match upsert_one(&tx, draft, now)?.0 {
                UpsertOutcome::Created => created += 1,
                UpsertOutcome::Updated => updated += 1,
            }
        }
        tx.commit()?;
        Ok((created, updated))
    }

    /// Applies a partial update. Status changes go through the workflow
    /// transition table; an illegal move is a validation error and nothing is
    /// written. Entering PRODUCTION stamps `sent_to_production_at`.
    pub fn apply_patch(&mut self, id: Uuid, patch: &OrderPatch) -> Result<Order, StoreError> {
        let mut order = self.get(id)?;
        if patch.is_empty() {
            return Ok(order);
        }
        let now = Utc::now();
        if let Some(to) = patch.art_status {
            order
                .art_status
                .transition(to)
                .map_err(|e| StoreError::validation(e.to_string()))?;
            if to == ArtStatus::Production && order.art_status != ArtStatus::Production {
                order.sent_to_production_at = Some(now);
            }
            order.art_status = to;
        }
        if let Some(art_name) = &patch.art_name {
            order.art_name = art_name.clone();
        }
        if let Some(note) = &patch.internal_note {
            order.internal_note = note.clone();
        }
        if let Some(urgent) = patch.is_urgent {
            order.is_urgent = urgent;
        }
        if let Some(from) = patch.urgent_from {
            order.urgent_from = from;
        }
        if let Some(queued) = patch.in_daily_queue {
            order.in_daily_queue = queued;
        }
        if let Some(group) = patch.art_group_id {
            order.art_group_id = group;
        }
        order.updated_at = now;
        write_back(&self.conn, &order)?;
        Ok(order)
    }

    /// Moves every listed order to `status` in one transaction. Any invalid
    /// transition aborts the whole batch.
    pub fn set_status_bulk(
        &mut self,
        ids: &[Uuid],
        status: ArtStatus,
    ) -> Result<Vec<Order>, StoreError> {
        let now = Utc::now();
        let tx = self.conn.transaction()?;
        let mut updated = Vec::with_capacity(ids.len());
        {
            let sql = format!("SELECT {COLUMNS} FROM orders WHERE id = ?");
            let mut select = tx.prepare(&sql)?;
            for &id in ids {
                let raw = select
                    .query_row([id.to_string()], read_raw)
                    .optional()?
                    .ok_or_else(|| StoreError::not_found(id))?;
                let mut order = Order::try_from(raw)?;
                order
                    .art_status
                    .transition(status)
                    .map_err(|e| StoreError::validation(format!("order {id}: {e}")))?;
                if status == ArtStatus::Production && order.art_status != ArtStatus::Production {
                    order.sent_to_production_at = Some(now);
                }
                order.art_status = status;
                order.updated_at = now;
                write_back(&tx, &order)?;
                updated.push(order);
            }
        }
        tx.commit()?;
        Ok(updated)
    }

    pub fn delete(&mut self, id: Uuid) -> Result<(), StoreError> {
        let n = self
            .conn
            .execute("DELETE FROM orders WHERE id = ?", [id.to_string()])?;
        if n == 0 {
            return Err(StoreError::not_found(id));
        }
        Ok(())
    }

    /// Import sweep: any order still in PRODUCTION whose marketplace id did
    /// not appear in the latest sheet has left the seller panel, so it is
    /// shipped. Stamps `shipped_at` and drops it from the daily queue.
    pub fn mark_shipped_missing(&mut self, imported_ids: &[String]) -> Result<usize, StoreError> {
        let now = Utc::now();
        let mut sql = String::from(
            "UPDATE orders SET art_status = ?, shipped_at = ?, in_daily_queue = 0, \
             updated_at = ? WHERE art_status = ?",
        );
        let mut owned: Vec<Box<dyn ToSql>> = vec![
            Box::new(ArtStatus::Shipped.as_str()),
            Box::new(now),
            Box::new(now),
            Box::new(ArtStatus::Production.as_str()),
        ];
        if !imported_ids.is_empty() {
            let placeholders = vec!["?"; imported_ids.len()].join(", ");
            sql.push_str(&format!(" AND marketplace_order_id NOT IN ({placeholders})"));
            for id in imported_ids {
                owned.push(Box::new(id.clone()));
            }
        }
        let params: Vec<&dyn ToSql> = owned.iter().map(AsRef::as_ref).collect();
        let shipped = self.conn.execute(&sql, &params[..])?;
        if shipped > 0 {
            tracing::info!(shipped, "marked missing production orders as shipped");
        }
        Ok(shipped)
    }

    pub fn clear_daily_queue(&mut self) -> Result<usize, StoreError> {
        Ok(self.conn.execute(
            "UPDATE orders SET in_daily_queue = 0, updated_at = ? WHERE in_daily_queue = 1",
            [Utc::now()],
        )?)
    }

    pub fn set_daily_queue(&mut self, ids: &[Uuid]) -> Result<usize, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "UPDATE orders SET in_daily_queue = 1, updated_at = ? WHERE id IN ({placeholders})"
        );
        let now = Utc::now();
        let mut owned: Vec<Box<dyn ToSql>> = vec![Box::new(now)];
        for id in ids {
            owned.push(Box::new(id.to_string()));
        }
        let params: Vec<&dyn ToSql> = owned.iter().map(AsRef::as_ref).collect();
        Ok(self.conn.execute(&sql, &params[..])?)
    }

    pub fn set_asset_url(
        &mut self,
        id: Uuid,
        kind: AssetKind,
        url: Option<&str>,
    ) -> Result<Order, StoreError> {
        let column = match kind {
            AssetKind::Png => "art_png_url",
            AssetKind::Cdr => "art_cdr_url",
        };
        let sql = format!("UPDATE orders SET {column} = ?, updated_at = ? WHERE id = ?");
        let n = self
            .conn
            .execute(&sql, rusqlite::params![url, Utc::now(), id.to_string()])?;
        if n == 0 {
            return Err(StoreError::not_found(id));
        }
        self.get(id)
    }
}

fn upsert_one(
    conn: &rusqlite::Connection,
    draft: &OrderDraft,
    now: DateTime<Utc>,
) -> Result<(UpsertOutcome, Uuid), StoreError> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM orders WHERE marketplace_order_id = ?",
            [&draft.marketplace_order_id],
            |row| row.get(0),
        )
        .optional()?;
    let cup_quantity = total_cups_for(&draft.product_name, draft.quantity);
    let real_description = real_description_for(&draft.product_name);

    match existing {
        None => {
            let id = Uuid::new_v4();
            conn.execute(
                "INSERT INTO orders (id, marketplace_order_id, customer_handle, \
                 customer_name, product_name, variation, quantity, total_value, \
                 customer_note, shipping_date, order_date, art_status, art_group_id, \
                 cup_quantity, real_description, is_urgent, in_daily_queue, \
                 created_at, updated_at) \
                 VALUES (:id, :moid, :handle, :name, :product, :variation, :qty, :total, \
                 :note, :ship, :ordered, :status, 0, :cups, :desc, 0, 0, :now, :now)",
                named_params! {
                    ":id": id.to_string(),
                    ":moid": draft.marketplace_order_id,
                    ":handle": draft.customer_handle,
                    ":name": draft.customer_name,
                    ":product": draft.product_name,
                    ":variation": draft.variation,
                    ":qty": draft.quantity,
                    ":total": draft.total_value.to_string(),
                    ":note": draft.customer_note,
                    ":ship": draft.shipping_date,
                    ":ordered": draft.order_date,
                    ":status": ArtStatus::Pending.as_str(),
                    ":cups": cup_quantity,
                    ":desc": real_description,
                    ":now": now,
                },
            )?;
            Ok((UpsertOutcome::Created, id))
        }
        Some(id_text) => {
            let id = Uuid::parse_str(&id_text).map_err(|e| {
                StoreError::new(StoreErrorCode::Internal, format!("corrupt id: {e}"))
            })?;
            conn.execute(
                "UPDATE orders SET customer_handle = :handle, customer_name = :name, \
                 product_name = :product, variation = :variation, quantity = :qty, \
                 total_value = :total, customer_note = :note, shipping_date = :ship, \
                 order_date = :ordered, \
                 cup_quantity = COALESCE(cup_quantity, :cups), \
                 real_description = COALESCE(real_description, :desc), \
                 updated_at = :now \
                 WHERE id = :id",
                named_params! {
                    ":handle": draft.customer_handle,
                    ":name": draft.customer_name,
                    ":product": draft.product_name,
                    ":variation": draft.variation,
                    ":qty": draft.quantity,
                    ":total": draft.total_value.to_string(),
                    ":note": draft.customer_note,
                    ":ship": draft.shipping_date,
                    ":ordered": draft.order_date,
                    ":cups": cup_quantity,
                    ":desc": real_description,
                    ":now": now,
                    ":id": id.to_string(),
                },
            )?;
            Ok((UpsertOutcome::Updated, id))
        }
    }
}

fn write_back(conn: &rusqlite::Connection, order: &Order) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE orders SET art_status = :status, art_name = :art_name, \
         art_group_id = :group_id, cup_quantity = :cups, real_description = :desc, \
         internal_note = :note, is_urgent = :urgent, urgent_from = :urgent_from, \
         in_daily_queue = :queued, art_png_url = :png, art_cdr_url = :cdr, \
         sent_to_production_at = :production_at, shipped_at = :shipped_at, \
         updated_at = :updated WHERE id = :id",
        named_params! {
            ":status": order.art_status.as_str(),
            ":art_name": order.art_name,
            ":group_id": order.art_group_id,
            ":cups": order.cup_quantity,
            ":desc": order.real_description,
            ":note": order.internal_note,
            ":urgent": order.is_urgent,
            ":urgent_from": order.urgent_from,
            ":queued": order.in_daily_queue,
            ":png": order.art_png_url,
            ":cdr": order.art_cdr_url,
            ":production_at": order.sent_to_production_at,
            ":shipped_at": order.shipped_at,
            ":updated": order.updated_at,
            ":id": order.id.to_string(),
        },
    )?;
    Ok(())
}

fn renumber_placeholders(sql: &str) -> String {
    // The search clause binds one value in four places. SQLite numbers
    // positional `?` left to right, so give the repeated one its real index.
    if let Some(pos) = sql.find("?1") {
        let preceding = sql[..pos].matches('?').count();
        let index = preceding + 1;
        return sql.replace("?1", &format!("?{index}"));
    }
    sql.to_string()
}
