//! CSV import/export of contacts.
//!
//! # Responsibility
//! - Render contacts as an 8-column CSV with group names resolved.
//! - Turn uploaded CSV into an [`ImportPlan`] of new groups and contacts
//!   without touching the store.
//!
//! # Invariants
//! - Import planning is pure: the same input, groups, timestamp and color
//!   sequence always yield the same plan apart from fresh ids.
//! - A failed or empty import produces no plan.

pub mod export;
pub mod headers;
pub mod import;

pub use export::{export_csv, export_filename, export_to_dir, ExportError, EXPORT_HEADER};
pub use headers::{CsvField, HeaderMap};
pub use import::{plan_import, ImportError, ImportPlan, ImportSummary};
