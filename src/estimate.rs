//! Pre-rendering height estimation for the paginated document.
//!
//! Receipts have no fixed length, but the PDF page must be allocated before
//! anything is drawn. This pass predicts the vertical extent a sale will
//! occupy. Over-estimation wastes a little paper; under-estimation clips
//! content, so every term rounds up.

use crate::config::ResolvedConfig;
use crate::extract;
use crate::model::Sale;
use crate::text::wrapped_line_count;

/// Page width of the paginated document (mm), thermal-receipt format.
pub const PAGE_WIDTH_MM: f32 = 80.0;

/// Minimum page height; shorter receipts keep a standard-length page.
pub const STANDARD_PAGE_HEIGHT_MM: f32 = 297.0;

/// Bottom margin added on top of the estimate when sizing the page.
pub const PAGE_MARGIN_MM: f32 = 10.0;

/// Vertical advance per text line (mm).
pub const LINE_SPACING_MM: f32 = 5.0;

/// Character budget for wrapped prose in the paginated document.
pub const NAME_WRAP_CHARS: usize = 38;

/// Covers header, company block, metadata and customer sections.
const BASE_ALLOWANCE_MM: f32 = 150.0;

/// Covers totals, payment, exemption clause and footer lines.
const TOTALS_ALLOWANCE_MM: f32 = 100.0;

/// Breathing room after each item block.
const ITEM_MARGIN_MM: f32 = 2.0;

/// Predict the vertical extent (mm) the paginated renderer will consume for
/// this sale. Monotonically non-decreasing in item count and name length.
pub fn estimate(sale: &Sale, config: &ResolvedConfig, line_spacing: f32) -> f32 {
    let items = extract::extract(sale);

    let mut height = BASE_ALLOWANCE_MM + TOTALS_ALLOWANCE_MM;

    for item in &items {
        let name_chars = item.name.chars().count();
        // Word-wrap can need more lines than the character count alone
        // suggests; budget for whichever is larger.
        let name_lines = name_chars
            .div_ceil(NAME_WRAP_CHARS)
            .max(wrapped_line_count(&item.name, NAME_WRAP_CHARS));
        let extra_lines = name_lines.saturating_sub(1);
        height += (2 + extra_lines) as f32 * line_spacing + ITEM_MARGIN_MM;
    }

    height += config.optional_field_count() as f32 * line_spacing;

    if let Some(notes) = sale.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        height += wrapped_line_count(notes, NAME_WRAP_CHARS) as f32 * line_spacing;
    }

    height
}
