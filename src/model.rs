//! Input contract for completed sales.
//!
//! A `Sale` is produced elsewhere (checkout, sale history) and consumed
//! read-only here. The `customer` and `items` fields are kept as raw JSON
//! because several historical payload shapes coexist in stored sales; the
//! `extract` module normalizes them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::text_from_keys;

/// Display name used when a sale carries no resolvable customer.
pub const FALLBACK_CUSTOMER_NAME: &str = "Cliente não identificado";

/// Tax-id line used for walk-in customers without a registered NIF.
pub const FINAL_CONSUMER: &str = "Consumidor Final";

/// A completed sale, as fetched from the backing store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(default)]
    pub id: String,
    /// Issue date/time, ISO-8601.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub amount_paid: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Either a plain name string or `{name, email?, phone?, address?, nif?}`.
    #[serde(default)]
    pub customer: Value,
    /// Array of cart entries, `{products: [...]}` wrapper, or a legacy count.
    #[serde(default)]
    pub items: Value,
}

impl Sale {
    /// Resolved customer display name: structured record's `name` field,
    /// else the bare string value, else `None`.
    pub fn customer_name(&self) -> Option<String> {
        if self.customer.is_object() {
            return text_from_keys(&self.customer, &["name"]);
        }
        self.customer
            .as_str()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
    }

    /// Customer tax id, only available on structured customer records.
    pub fn customer_nif(&self) -> Option<String> {
        if self.customer.is_object() {
            return text_from_keys(&self.customer, &["nif", "taxId"]);
        }
        None
    }
}

/// One normalized product row of a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    /// Unit price, never negative.
    pub unit_price: f64,
    /// Never below 1.
    pub quantity: u32,
    /// `unit_price * quantity`, precomputed at extraction time.
    pub line_total: f64,
}
