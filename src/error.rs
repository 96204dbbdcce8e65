//! Error types for receipt generation.

use thiserror::Error;

/// Failures that can escape the rendering pipeline.
///
/// Document generation itself is best-effort: malformed sale data degrades
/// to safe defaults instead of erroring. The remaining failure modes are the
/// PDF backend refusing to construct a document and I/O errors from the
/// output sink.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The underlying document object could not be constructed at all.
    #[error("document construction failed: {0}")]
    DocumentConstruction(String),

    /// The output sink failed while persisting or presenting a document.
    #[error("output sink error: {0}")]
    Sink(#[from] std::io::Error),
}
