// SPDX-License-Identifier: Apache-2.0

//! Decoding of the Shopee seller-panel XLSX export. Column positions vary
//! between exports, so everything is resolved through the header row.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Cursor;
use std::str::FromStr;

use cupflow_model::OrderDraft;

use crate::IngestError;

const H_ORDER_ID: &str = "ID do pedido";
const H_USERNAME: &str = "Nome de usuário (comprador)";
const H_RECIPIENT: &str = "Nome do destinatário";
const H_PRODUCT: &str = "Nome do Produto";
const H_VARIATION: &str = "Nome da variação";
const H_QUANTITY: &str = "Quantidade";
const H_TOTAL: &str = "Preço total do produto";
const H_NOTE: &str = "Observação do comprador";
const H_SHIP_DATE: &str = "Data prevista de envio";
const H_ORDER_DATE: &str = "Data de criação do pedido";

#[derive(Debug)]
struct Columns {
    order_id: usize,
    username: usize,
    recipient: usize,
    product: usize,
    variation: Option<usize>,
    quantity: usize,
    total: usize,
    note: Option<usize>,
    ship_date: usize,
    order_date: usize,
}

impl Columns {
    fn resolve(header: &[Data]) -> Result<Self, IngestError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|cell| cell_text(cell).trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| IngestError(format!("missing sheet column: {name}")))
        };
        Ok(Self {
            order_id: require(H_ORDER_ID)?,
            username: require(H_USERNAME)?,
            recipient: require(H_RECIPIENT)?,
            product: require(H_PRODUCT)?,
            variation: find(H_VARIATION),
            quantity: require(H_QUANTITY)?,
            total: require(H_TOTAL)?,
            note: find(H_NOTE),
            ship_date: require(H_SHIP_DATE)?,
            order_date: require(H_ORDER_DATE)?,
        })
    }
}

/// Reads every order row from the first worksheet. Rows without an order id
/// are subtotal or footer noise and are skipped.
pub fn read_order_drafts(bytes: &[u8]) -> Result<Vec<OrderDraft>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestError(format!("unreadable workbook: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError("workbook has no sheets".to_string()))?
        .map_err(|e| IngestError(format!("unreadable sheet: {e}")))?;
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| IngestError("sheet is empty".to_string()))?;
    let columns = Columns::resolve(header)?;

    let mut drafts = Vec::new();
    for row in rows {
        if let Some(draft) = draft_from_row(&columns, row)? {
            drafts.push(draft);
        }
    }
    Ok(drafts)
}

fn draft_from_row(cols: &Columns, row: &[Data]) -> Result<Option<OrderDraft>, IngestError> {
    let order_id = cell_at(row, cols.order_id)
        .map(cell_text)
        .unwrap_or_default();
    let order_id = order_id.trim();
    if order_id.is_empty() {
        return Ok(None);
    }
    let text_at = |idx: usize| cell_at(row, idx).map(cell_text).unwrap_or_default();
    let optional_at = |idx: Option<usize>| {
        idx.map(|i| text_at(i))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let context = |field: &str, e: IngestError| {
        IngestError(format!("order {order_id}: bad {field}: {e}"))
    };

    Ok(Some(OrderDraft {
        marketplace_order_id: order_id.to_string(),
        customer_handle: text_at(cols.username).trim().to_string(),
        customer_name: text_at(cols.recipient).trim().to_string(),
        product_name: text_at(cols.product).trim().to_string(),
        variation: optional_at(cols.variation),
        quantity: cell_at(row, cols.quantity)
            .ok_or_else(|| IngestError("missing cell".to_string()))
            .and_then(cell_u32)
            .map_err(|e| context(H_QUANTITY, e))?,
        total_value: cell_at(row, cols.total)
            .ok_or_else(|| IngestError("missing cell".to_string()))
            .and_then(cell_money)
            .map_err(|e| context(H_TOTAL, e))?,
        customer_note: optional_at(cols.note),
        shipping_date: cell_at(row, cols.ship_date)
            .ok_or_else(|| IngestError("missing cell".to_string()))
            .and_then(cell_date)
            .map_err(|e| context(H_SHIP_DATE, e))?,
        order_date: cell_at(row, cols.order_date)
            .ok_or_else(|| IngestError("missing cell".to_string()))
            .and_then(cell_date)
            .map_err(|e| context(H_ORDER_DATE, e))?,
    }))
}

fn cell_at(row: &[Data], idx: usize) -> Option<&Data> {
    row.get(idx)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::DateTime(_) | Data::Error(_) | Data::Empty => String::new(),
    }
}

fn cell_u32(cell: &Data) -> Result<u32, IngestError> {
    match cell {
        Data::Int(i) => u32::try_from(*i).map_err(|_| IngestError(format!("negative count {i}"))),
        Data::Float(f) if *f >= 0.0 && f.fract() == 0.0 => Ok(*f as u32),
        Data::String(s) => s
            .trim()
            .parse()
            .map_err(|_| IngestError(format!("not a count: {s:?}"))),
        other => Err(IngestError(format!("not a count: {other:?}"))),
    }
}

fn cell_money(cell: &Data) -> Result<Decimal, IngestError> {
    match cell {
        Data::Float(f) => {
            Decimal::try_from(*f).map_err(|e| IngestError(format!("bad amount {f}: {e}")))
        }
        Data::Int(i) => Ok(Decimal::from(*i)),
        Data::String(s) => parse_money(s),
        other => Err(IngestError(format!("not an amount: {other:?}"))),
    }
}

/// Parses a Brazilian-formatted money string: optional `R$` prefix, `.` as
/// a thousands separator and `,` as the decimal mark. Plain dotted decimals
/// ("59.8") pass through unchanged.
pub fn parse_money(input: &str) -> Result<Decimal, IngestError> {
    let mut cleaned: String = input
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.contains(',') {
        cleaned.retain(|c| c != '.');
        cleaned = cleaned.replace(',', ".");
    }
    Decimal::from_str(&cleaned).map_err(|e| IngestError(format!("bad amount {input:?}: {e}")))
}

fn cell_date(cell: &Data) -> Result<NaiveDate, IngestError> {
    match cell {
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date())
            .ok_or_else(|| IngestError("unrepresentable date cell".to_string())),
        Data::DateTimeIso(s) => NaiveDate::parse_from_str(&s[..s.len().min(10)], "%Y-%m-%d")
            .map_err(|e| IngestError(format!("bad ISO date {s:?}: {e}"))),
        Data::String(s) => parse_sheet_date(s),
        other => Err(IngestError(format!("not a date: {other:?}"))),
    }
}

/// Parses Shopee's `DD/MM/YYYY` dates, tolerating a trailing time component.
pub fn parse_sheet_date(input: &str) -> Result<NaiveDate, IngestError> {
    let day_part = input.trim().split_whitespace().next().unwrap_or("");
    NaiveDate::parse_from_str(day_part, "%d/%m/%Y")
        .map_err(|e| IngestError(format!("bad date {input:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_handles_brazilian_formats() {
        assert_eq!(parse_money("R$ 59,80").unwrap(), Decimal::from_str("59.80").unwrap());
        assert_eq!(
            parse_money("R$ 1.234,56").unwrap(),
            Decimal::from_str("1234.56").unwrap()
        );
        assert_eq!(parse_money("59.8").unwrap(), Decimal::from_str("59.8").unwrap());
        assert_eq!(parse_money("120").unwrap(), Decimal::from(120));
        assert!(parse_money("R$ abc").is_err());
    }

    #[test]
    fn dates_tolerate_time_suffix() {
        let d = parse_sheet_date("05/09/2026 14:32").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 9, 5).unwrap());
        assert!(parse_sheet_date("2026-09-05").is_err());
    }

    fn header() -> Vec<Data> {
        [
            H_ORDER_ID, H_USERNAME, H_RECIPIENT, H_PRODUCT, H_VARIATION, H_QUANTITY, H_TOTAL,
            H_NOTE, H_SHIP_DATE, H_ORDER_DATE,
        ]
        .iter()
        .map(|h| Data::String((*h).to_string()))
        .collect()
    }

    fn row(id: &str) -> Vec<Data> {
        vec![
            Data::String(id.to_string()),
            Data::String("ana".to_string()),
            Data::String("Ana Souza".to_string()),
            Data::String("Caneca Lisa 300ml".to_string()),
            Data::String("Azul".to_string()),
            Data::Float(2.0),
            Data::String("R$ 59,80".to_string()),
            Data::Empty,
            Data::String("10/09/2026".to_string()),
            Data::String("01/09/2026 08:15".to_string()),
        ]
    }

    #[test]
    fn row_maps_to_draft() {
        let cols = Columns::resolve(&header()).unwrap();
        let draft = draft_from_row(&cols, &row("2509ABCD1234")).unwrap().unwrap();
        assert_eq!(draft.marketplace_order_id, "2509ABCD1234");
        assert_eq!(draft.customer_handle, "ana");
        assert_eq!(draft.quantity, 2);
        assert_eq!(draft.total_value, Decimal::from_str("59.80").unwrap());
        assert_eq!(draft.variation.as_deref(), Some("Azul"));
        assert_eq!(draft.customer_note, None);
        assert_eq!(
            draft.shipping_date,
            NaiveDate::from_ymd_opt(2026, 9, 10).unwrap()
        );
    }

    #[test]
    fn rows_without_an_id_are_skipped() {
        let cols = Columns::resolve(&header()).unwrap();
        let mut blank = row("");
        blank[0] = Data::Empty;
        assert_eq!(draft_from_row(&cols, &blank).unwrap(), None);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let mut h = header();
        h.remove(0);
        let err = Columns::resolve(&h).unwrap_err();
        assert!(err.0.contains(H_ORDER_ID));
    }
}
