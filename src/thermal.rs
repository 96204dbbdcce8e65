//! Fixed-width thermal receipt renderer.
//!
//! Produces the same logical sections as the paginated renderer as a
//! newline-joined 32-column text stream, the format narrow thermal printers
//! accept verbatim. Layout is done with padding only; there is no page, so
//! no height estimation either.

use crate::config::ResolvedConfig;
use crate::extract;
use crate::model::{LineItem, Sale, FALLBACK_CUSTOMER_NAME, FINAL_CONSUMER};
use crate::pdf::{invoice_reference, DOCUMENT_KIND_LABEL};
use crate::text::{align_right, amount, center, format_date, format_datetime, rule, wrap};

/// Column budget of a 58 mm thermal printer.
pub const THERMAL_WIDTH: usize = 32;

fn push_wrapped(lines: &mut Vec<String>, text: &str) {
    for line in wrap(text, THERMAL_WIDTH) {
        lines.push(line);
    }
}

fn push_centered(lines: &mut Vec<String>, text: &str) {
    for line in wrap(text, THERMAL_WIDTH) {
        lines.push(center(&line, THERMAL_WIDTH));
    }
}

/// Label on the left, value on the right; when the pair cannot share a
/// line the value drops to its own right-aligned line.
fn push_pair(lines: &mut Vec<String>, label: &str, value: &str) {
    let label_len = label.chars().count();
    let value_len = value.chars().count();
    if label_len + value_len < THERMAL_WIDTH {
        let gap = THERMAL_WIDTH - label_len - value_len;
        lines.push(format!("{label}{}{value}", " ".repeat(gap)));
        return;
    }
    push_wrapped(lines, label);
    lines.push(align_right(value, THERMAL_WIDTH));
}

fn push_items(lines: &mut Vec<String>, items: &[LineItem], config: &ResolvedConfig) {
    for item in items {
        push_wrapped(lines, &item.name);
        let detail = format!(
            "{} x {} = {}",
            item.quantity,
            amount(item.unit_price, &config.currency),
            amount(item.line_total, &config.currency),
        );
        if detail.chars().count() <= THERMAL_WIDTH {
            lines.push(align_right(&detail, THERMAL_WIDTH));
        } else {
            push_wrapped(lines, &detail);
        }
    }
}

/// Render a sale as 32-column thermal text. Section ordering and logical
/// content match the paginated renderer.
pub fn render_thermal(sale: &Sale, config: &ResolvedConfig) -> String {
    let items = extract::extract(sale);
    let issued = format_datetime(&sale.date);
    let mut lines: Vec<String> = Vec::new();

    push_centered(&mut lines, &config.company_name);
    if let Some(tax_id) = config.tax_id.as_deref() {
        push_centered(&mut lines, &format!("NIF: {tax_id}"));
    }
    if let Some(address) = config.address.as_deref() {
        push_centered(&mut lines, address);
    }
    if let Some(neighborhood) = config.neighborhood.as_deref() {
        push_centered(&mut lines, neighborhood);
    }
    if let Some(city) = config.city.as_deref() {
        push_centered(&mut lines, city);
    }
    if let Some(phone) = config.phone.as_deref() {
        push_centered(&mut lines, &format!("Tel: {phone}"));
    }
    if let Some(email) = config.email.as_deref() {
        push_centered(&mut lines, email);
    }
    if let Some(handle) = config.social_handle.as_deref() {
        push_centered(&mut lines, handle);
    }
    lines.push(rule(THERMAL_WIDTH));

    push_centered(&mut lines, DOCUMENT_KIND_LABEL);
    push_wrapped(&mut lines, &format!("Emissão: {issued}"));
    push_wrapped(&mut lines, &format!("Entrega: {issued}"));
    push_wrapped(&mut lines, &format!("Factura: {}", invoice_reference(&sale.id)));
    lines.push(rule(THERMAL_WIDTH));

    let name = sale
        .customer_name()
        .unwrap_or_else(|| FALLBACK_CUSTOMER_NAME.to_string());
    let nif = sale
        .customer_nif()
        .unwrap_or_else(|| FINAL_CONSUMER.to_string());
    push_wrapped(&mut lines, &format!("Cliente: {name}"));
    push_wrapped(&mut lines, &format!("NIF: {nif}"));
    lines.push(rule(THERMAL_WIDTH));

    push_items(&mut lines, &items, config);
    lines.push(rule(THERMAL_WIDTH));

    push_pair(&mut lines, "TOTAL", &amount(sale.total, &config.currency));
    if let Some(method) = sale
        .payment_method
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        push_pair(&mut lines, "Pagamento", method);
    }
    if let Some(paid) = sale.amount_paid {
        push_pair(&mut lines, "Valor entregue", &amount(paid, &config.currency));
    }
    if let Some(change) = sale.change {
        push_pair(&mut lines, "Troco", &amount(change, &config.currency));
    }
    if let Some(notes) = sale
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        push_wrapped(&mut lines, notes);
    }
    push_wrapped(&mut lines, &config.exemption_clause);
    lines.push(rule(THERMAL_WIDTH));

    push_centered(&mut lines, &config.thank_you_message);
    push_centered(
        &mut lines,
        &format!("{} {}", config.footer_message, format_date(&sale.date)),
    );
    push_centered(&mut lines, &config.certification_text);
    push_centered(&mut lines, &config.certificate_number);

    lines.join("\n")
}
