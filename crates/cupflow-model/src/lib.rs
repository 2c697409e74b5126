// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod grouping;
mod mapping;
mod message;
mod order;
mod painting;
mod sanitize;

pub const CRATE_NAME: &str = "cupflow-model";

pub use grouping::{group_for_priority, priority_cmp, sort_groups, GroupKey, OrderGroup};
pub use mapping::{product_mapping, real_description_for, total_cups_for, ProductMapping};
pub use message::{daily_batch_message, painting_message};
pub use order::{
    ArtStatus, AssetKind, Order, OrderDraft, OrderPatch, TransitionError, ValidationError,
};
pub use painting::needs_painting;
pub use sanitize::sanitize_file_name;
