//! Normalization of stored sale payloads.
//!
//! Sales accumulated over several app generations carry their line items in
//! incompatible shapes: cart entries with a nested `product`, flat
//! `productName`/`price` entries, a `{products: [...]}` wrapper, and a
//! legacy bare item count with no retrievable detail. Extraction maps each
//! shape through one ordered precedence list and never fails; whatever
//! cannot be recognized degrades to an empty list.

use serde_json::Value;
use tracing::warn;

use crate::model::{LineItem, Sale};

/// Name used for entries whose product name cannot be resolved.
pub const FALLBACK_PRODUCT_NAME: &str = "Produto";

/// Parse a JSON value as a number, accepting numeric strings.
pub(crate) fn parse_number(value: &Value) -> Option<f64> {
    if let Some(number) = value.as_f64() {
        return Some(number);
    }
    if let Some(text) = value.as_str() {
        return text.trim().parse::<f64>().ok();
    }
    None
}

pub(crate) fn value_from_keys<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    for key in keys {
        if let Some(found) = value.get(*key) {
            return Some(found);
        }
    }
    None
}

pub(crate) fn text_from_keys(value: &Value, keys: &[&str]) -> Option<String> {
    value_from_keys(value, keys)
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

pub(crate) fn number_from_keys(value: &Value, keys: &[&str]) -> Option<f64> {
    value_from_keys(value, keys).and_then(parse_number)
}

/// Clamp a parsed price to the non-negative range; unparsable prices
/// become 0 so formatted output never carries NaN.
fn normalize_price(price: Option<f64>) -> f64 {
    match price {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Quantities are positive integers; anything unparsable or below 1
/// becomes 1.
fn normalize_quantity(quantity: Option<f64>) -> u32 {
    match quantity {
        Some(value) if value.is_finite() && value >= 1.0 => value.floor() as u32,
        _ => 1,
    }
}

fn line_item_from_entry(entry: &Value) -> LineItem {
    let product = entry.get("product").filter(|value| value.is_object());

    let name = product
        .and_then(|product| text_from_keys(product, &["name", "productName"]))
        .or_else(|| text_from_keys(entry, &["productName", "name"]))
        .unwrap_or_else(|| FALLBACK_PRODUCT_NAME.to_string());

    let unit_price = normalize_price(
        product
            .and_then(|product| number_from_keys(product, &["price", "unitPrice"]))
            .or_else(|| number_from_keys(entry, &["price", "unitPrice"])),
    );

    let quantity = normalize_quantity(number_from_keys(entry, &["quantity", "qty"]));

    LineItem {
        name,
        unit_price,
        quantity,
        line_total: unit_price * f64::from(quantity),
    }
}

/// Normalize a sale's `items` payload into ordered line items.
///
/// Precedence, first match wins: a plain array of entries, then a
/// `{products: [...]}` wrapper, then anything else (including the legacy
/// bare count) as an empty list.
pub fn extract(sale: &Sale) -> Vec<LineItem> {
    if let Some(entries) = sale.items.as_array() {
        return entries.iter().map(line_item_from_entry).collect();
    }
    if let Some(products) = sale.items.get("products").and_then(Value::as_array) {
        return products.iter().map(line_item_from_entry).collect();
    }
    if !sale.items.is_null() {
        warn!(sale_id = %sale.id, "unsupported items payload shape; rendering without item rows");
    }
    Vec::new()
}
