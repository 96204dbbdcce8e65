//! Talao POS - receipt document rendering engine.
//!
//! Converts a completed [`Sale`] plus an optional tenant [`ReceiptConfig`]
//! into two synchronized representations: a paginated PDF document
//! (print/download target) and a fixed-width 32-column text stream for
//! thermal receipt printers. Pages call one [`ReceiptFacade`] operation;
//! everything is re-derived per call and platform I/O goes through an
//! [`OutputSink`] adapter.
//!
//! Generation is best-effort: historical sales carry their items and
//! customer in several incompatible payload shapes, and a malformed record
//! must still print a usable receipt.

mod config;
mod error;
mod estimate;
mod extract;
mod model;
mod pdf;
mod receipt;
mod sink;
mod text;
mod thermal;

pub use config::{resolve, FontSizes, ReceiptConfig, ResolvedConfig, DEFAULT_COMPANY_NAME};
pub use error::ReceiptError;
pub use estimate::{estimate, LINE_SPACING_MM, PAGE_WIDTH_MM, STANDARD_PAGE_HEIGHT_MM};
pub use extract::extract;
pub use model::{LineItem, Sale, FALLBACK_CUSTOMER_NAME, FINAL_CONSUMER};
pub use pdf::{invoice_reference, render_pdf, VectorRender, DOCUMENT_KIND_LABEL};
pub use receipt::{ReceiptFacade, ShareOutcome};
pub use sink::{sanitize_filename, DirectorySink, OutputSink};
pub use text::wrap;
pub use thermal::{render_thermal, THERMAL_WIDTH};
