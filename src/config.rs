//! Tenant business profile and layout configuration.
//!
//! Callers hand over an all-optional `ReceiptConfig` (or nothing at all);
//! `resolve` merges it over fixed defaults exactly once, at the facade
//! boundary. The renderers only ever see the fully-resolved struct.

use serde::{Deserialize, Serialize};

/// Company name printed when the tenant never configured one.
pub const DEFAULT_COMPANY_NAME: &str = "Minha Loja";

/// Font sizes (pt) for the paginated document, one per section kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FontSizes {
    pub title: f32,
    pub heading: f32,
    pub body: f32,
    pub small: f32,
    pub footnote: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 12.0,
            heading: 9.0,
            body: 8.0,
            small: 7.0,
            footnote: 6.5,
        }
    }
}

/// Raw tenant profile as stored by the settings pages. Every field is
/// optional; blanks count as absent.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptConfig {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "nif")]
    pub tax_id: Option<String>,
    #[serde(default, alias = "bairro")]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, alias = "instagram")]
    pub social_handle: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Percentage, e.g. `14.0` for 14%.
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub thank_you_message: Option<String>,
    #[serde(default)]
    pub footer_message: Option<String>,
    /// Repurposed historically as the tax-exemption clause.
    #[serde(default)]
    pub additional_info: Option<String>,
    #[serde(default)]
    pub certification_text: Option<String>,
    #[serde(default)]
    pub certificate_number: Option<String>,
    #[serde(default)]
    pub show_logo: Option<bool>,
    #[serde(default)]
    pub show_signature: Option<bool>,
    #[serde(default)]
    pub show_barcode: Option<bool>,
    #[serde(default)]
    pub font_sizes: Option<FontSizes>,
}

/// Fully-resolved layout configuration: defaults merged with whatever the
/// tenant actually filled in.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub company_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub social_handle: Option<String>,
    pub currency: String,
    pub tax_rate: f64,
    pub thank_you_message: String,
    pub footer_message: String,
    pub exemption_clause: String,
    pub certification_text: String,
    pub certificate_number: String,
    pub show_logo: bool,
    pub show_signature: bool,
    pub show_barcode: bool,
    pub fonts: FontSizes,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            address: None,
            phone: None,
            email: None,
            tax_id: None,
            neighborhood: None,
            city: None,
            social_handle: None,
            currency: "AOA".to_string(),
            tax_rate: 0.0,
            thank_you_message: "Obrigado pela sua preferência!".to_string(),
            footer_message: "Documento gerado em".to_string(),
            exemption_clause: "IVA - Regime de não sujeição".to_string(),
            certification_text: "Processado por programa validado pela AGT".to_string(),
            certificate_number: "Certificado n.º 0000/AGT".to_string(),
            show_logo: false,
            show_signature: false,
            show_barcode: false,
            fonts: FontSizes::default(),
        }
    }
}

impl ResolvedConfig {
    /// Optional profile fields that each occupy one extra line when present:
    /// address, email, phone, neighborhood, city, social handle.
    pub fn optional_field_count(&self) -> usize {
        [
            &self.address,
            &self.email,
            &self.phone,
            &self.neighborhood,
            &self.city,
            &self.social_handle,
        ]
        .iter()
        .filter(|field| field.is_some())
        .count()
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Merge a tenant profile over the defaults. Pure; applied once per
/// rendering call at the facade boundary.
pub fn resolve(config: Option<&ReceiptConfig>) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();
    let Some(cfg) = config else {
        return resolved;
    };

    if let Some(name) = non_empty(cfg.company_name.as_ref()) {
        resolved.company_name = name;
    }
    resolved.address = non_empty(cfg.address.as_ref());
    resolved.phone = non_empty(cfg.phone.as_ref());
    resolved.email = non_empty(cfg.email.as_ref());
    resolved.tax_id = non_empty(cfg.tax_id.as_ref());
    resolved.neighborhood = non_empty(cfg.neighborhood.as_ref());
    resolved.city = non_empty(cfg.city.as_ref());
    resolved.social_handle = non_empty(cfg.social_handle.as_ref());
    if let Some(currency) = non_empty(cfg.currency.as_ref()) {
        resolved.currency = currency;
    }
    if let Some(rate) = cfg.tax_rate.filter(|rate| rate.is_finite() && *rate >= 0.0) {
        resolved.tax_rate = rate;
    }
    if let Some(message) = non_empty(cfg.thank_you_message.as_ref()) {
        resolved.thank_you_message = message;
    }
    if let Some(message) = non_empty(cfg.footer_message.as_ref()) {
        resolved.footer_message = message;
    }
    if let Some(clause) = non_empty(cfg.additional_info.as_ref()) {
        resolved.exemption_clause = clause;
    }
    if let Some(text) = non_empty(cfg.certification_text.as_ref()) {
        resolved.certification_text = text;
    }
    if let Some(number) = non_empty(cfg.certificate_number.as_ref()) {
        resolved.certificate_number = number;
    }
    resolved.show_logo = cfg.show_logo.unwrap_or(false);
    resolved.show_signature = cfg.show_signature.unwrap_or(false);
    resolved.show_barcode = cfg.show_barcode.unwrap_or(false);
    if let Some(fonts) = cfg.font_sizes {
        resolved.fonts = fonts;
    }

    resolved
}
