// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// The two digital assets an order carries: the raster preview shown in
/// the dashboard and chat, and the vector source the printer works from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Png,
    Cdr,
}

impl AssetKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Cdr => "cdr",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "png" => Ok(Self::Png),
            "cdr" => Ok(Self::Cdr),
            other => Err(ValidationError(format!("unknown asset kind: {other}"))),
        }
    }
}

impl Display for AssetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Artwork workflow status. The happy path runs left to right; the two
/// backward edges exist for manual correction. SHIPPED is only ever set by
/// the import sweep, never by a manual transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtStatus {
    Pending,
    Approved,
    Production,
    Shipped,
}

impl ArtStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Production => "PRODUCTION",
            Self::Shipped => "SHIPPED",
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "PRODUCTION" => Ok(Self::Production),
            "SHIPPED" => Ok(Self::Shipped),
            other => Err(ValidationError(format!("unknown art status: {other}"))),
        }
    }

    /// Manual transition table. Automatic shipping (import sweep) does not
    /// go through here.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Approved)
                | (Self::Approved, Self::Production)
                | (Self::Production, Self::Approved)
                | (Self::Approved, Self::Pending)
        )
    }

    pub fn transition(self, to: Self) -> Result<Self, TransitionError> {
        if self == to {
            return Ok(self);
        }
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(TransitionError { from: self, to })
        }
    }
}

impl Display for ArtStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub from: ArtStatus,
    pub to: ArtStatus,
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "art status transition {} -> {} is not allowed",
            self.from, self.to
        )
    }
}

impl std::error::Error for TransitionError {}

/// One marketplace order line, the unit everything else derives from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Order {
    pub id: Uuid,
    pub marketplace_order_id: String,
    pub customer_handle: String,
    pub customer_name: String,
    pub product_name: String,
    pub variation: Option<String>,
    pub quantity: u32,
    pub total_value: Decimal,
    pub customer_note: Option<String>,
    pub shipping_date: NaiveDate,
    pub order_date: NaiveDate,
    pub art_status: ArtStatus,
    pub art_name: Option<String>,
    pub art_group_id: i64,
    pub cup_quantity: Option<u32>,
    pub real_description: Option<String>,
    pub internal_note: Option<String>,
    pub is_urgent: bool,
    pub urgent_from: Option<NaiveDate>,
    pub in_daily_queue: bool,
    pub art_png_url: Option<String>,
    pub art_cdr_url: Option<String>,
    pub sent_to_production_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Urgency gated by the optional activation date.
    #[must_use]
    pub fn effective_urgency(&self, today: NaiveDate) -> bool {
        self.is_urgent && self.urgent_from.map_or(true, |from| from <= today)
    }

    /// Cup count used in production paperwork and chat messages.
    #[must_use]
    pub fn effective_cup_count(&self) -> u32 {
        self.cup_quantity.unwrap_or(self.quantity)
    }

    /// Description used for painting detection and chat messages.
    #[must_use]
    pub fn effective_description(&self) -> &str {
        self.real_description.as_deref().unwrap_or(&self.product_name)
    }
}

/// Fields sourced from the marketplace spreadsheet. Upserts write exactly
/// these; workflow fields on an existing order are untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderDraft {
    pub marketplace_order_id: String,
    pub customer_handle: String,
    pub customer_name: String,
    pub product_name: String,
    pub variation: Option<String>,
    pub quantity: u32,
    pub total_value: Decimal,
    pub customer_note: Option<String>,
    pub shipping_date: NaiveDate,
    pub order_date: NaiveDate,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Partial update for one order. `None` means "leave alone"; for the
/// nullable fields, `Some(None)` means "clear".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderPatch {
    #[serde(default)]
    pub art_status: Option<ArtStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub art_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub internal_note: Option<Option<String>>,
    #[serde(default)]
    pub is_urgent: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub urgent_from: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub in_daily_queue: Option<bool>,
    #[serde(default)]
    pub art_group_id: Option<i64>,
}

impl OrderPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.art_status.is_none()
            && self.art_name.is_none()
            && self.internal_note.is_none()
            && self.is_urgent.is_none()
            && self.urgent_from.is_none()
            && self.in_daily_queue.is_none()
            && self.art_group_id.is_none()
    }
}
