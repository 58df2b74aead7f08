//! Core library for pharmacy POS report ingestion.
//!
//! This crate provides:
//! - Report-type classification from rendered page text
//! - Branch and report-date resolution from noisy text and filenames
//! - Per-category field extraction via prioritized pattern matching
//! - Same-day duplicate collapsing and cross-source reconciliation
//! - The daily metrics record persisted per (branch, date)

pub mod classify;
pub mod departments;
pub mod error;
pub mod extract;
pub mod identity;
pub mod models;
pub mod patterns;
pub mod pipeline;
pub mod store;

pub use classify::classify;
pub use departments::DepartmentCatalog;
pub use error::{DaybookError, Result};
pub use extract::extract;
pub use models::document::{Document, RawReport, ReportKind, SourceHint};
pub use models::fields::{
    DispensaryFields, ExtractedFields, GrossProfitFields, SalesLine, TradingFields,
    TransactionFields, TurnoverFields,
};
pub use models::metrics::DailyMetrics;
pub use pipeline::{run_batch, BatchOutcome};
pub use store::{MemoryStore, StoreError, StoreGateway};
