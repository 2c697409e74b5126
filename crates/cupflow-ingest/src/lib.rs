// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod import;
mod sheet;

use std::fmt::{Display, Formatter};

pub const CRATE_NAME: &str = "cupflow-ingest";

pub use import::{run_import, run_import_drafts, ImportEvent, ImportSummary, CHUNK_SIZE};
pub use sheet::{parse_money, parse_sheet_date, read_order_drafts};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestError(pub String);

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IngestError {}

impl From<cupflow_store::StoreError> for IngestError {
    fn from(e: cupflow_store::StoreError) -> Self {
        Self(e.to_string())
    }
}
