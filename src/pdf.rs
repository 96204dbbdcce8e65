//! Paginated receipt renderer.
//!
//! Draws the receipt onto a `printpdf` page in thermal-receipt format
//! (80 mm wide, variable height). The page is allocated up front from the
//! height estimate, then a vertical cursor walks the sections top to
//! bottom: company header, document metadata, customer block, item table,
//! totals and footer.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};
use tracing::info;

use crate::config::ResolvedConfig;
use crate::error::ReceiptError;
use crate::estimate::{
    estimate, LINE_SPACING_MM, NAME_WRAP_CHARS, PAGE_MARGIN_MM, PAGE_WIDTH_MM,
    STANDARD_PAGE_HEIGHT_MM,
};
use crate::extract;
use crate::model::{LineItem, Sale, FALLBACK_CUSTOMER_NAME, FINAL_CONSUMER};
use crate::text::{amount, format_date, format_datetime, tax_label, wrap};

/// Document kind label shown in the metadata block and as the PDF title.
pub const DOCUMENT_KIND_LABEL: &str = "FACTURA RECIBO";

/// Prefix of the invoice-style identifier derived from the sale id.
pub const INVOICE_PREFIX: &str = "FR-";

const MARGIN_LEFT_MM: f32 = 5.0;
const TOP_MARGIN_MM: f32 = 12.0;
const RULE_ADVANCE_MM: f32 = 3.0;
const ITEM_GAP_MM: f32 = 1.0;

// Fixed horizontal offsets (mm) shared by the table header and every
// numeric item row. Downstream receipt tooling reads columns by position,
// so these are a compatibility contract.
const COL_PRICE_MM: f32 = 5.0;
const COL_QTY_MM: f32 = 32.0;
const COL_TAX_MM: f32 = 44.0;
const COL_TOTAL_MM: f32 = 57.0;

const PT_TO_MM: f32 = 0.3528;

/// A rendered paginated document plus the render metadata callers and tests
/// rely on: the vertical extent actually consumed and the logical content
/// both renderers must agree on.
#[derive(Debug, Clone)]
pub struct VectorRender {
    bytes: Vec<u8>,
    pub page_height_mm: f32,
    pub content_height_mm: f32,
    pub items: Vec<LineItem>,
    pub grand_total: String,
}

impl VectorRender {
    /// Serialized PDF bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Persist the document to a file.
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}

/// Render-time vertical cursor. `y` grows downwards from the page top;
/// `printpdf` measures from the bottom, so baselines are converted on use.
struct LayoutCursor {
    y: f32,
    page_height: f32,
    line_spacing: f32,
}

impl LayoutCursor {
    fn new(page_height: f32) -> Self {
        Self {
            y: TOP_MARGIN_MM,
            page_height,
            line_spacing: LINE_SPACING_MM,
        }
    }

    fn baseline(&self) -> Mm {
        Mm(self.page_height - self.y)
    }

    fn advance(&mut self, dy: f32) {
        self.y += dy;
    }
}

struct Surface {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    cursor: LayoutCursor,
}

/// Average Helvetica glyph width; close enough for centring on an 80 mm
/// page.
fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5 * PT_TO_MM
}

impl Surface {
    /// Draw one line at a fixed x offset and advance the cursor.
    fn line(&mut self, text: &str, size: f32, x: f32, font: Font) {
        self.text_at(text, size, x, font);
        self.advance_line();
    }

    fn advance_line(&mut self) {
        let dy = self.cursor.line_spacing;
        self.cursor.advance(dy);
    }

    /// Draw text at a fixed offset without advancing; used for the
    /// multi-column rows.
    fn text_at(&mut self, text: &str, size: f32, x: f32, font: Font) {
        let font = self.font(font);
        self.layer
            .use_text(text, size, Mm(x), self.cursor.baseline(), font);
    }

    fn centered(&mut self, text: &str, size: f32, font: Font) {
        let x = ((PAGE_WIDTH_MM - text_width_mm(text, size)) / 2.0).max(MARGIN_LEFT_MM);
        self.line(text, size, x, font);
    }

    fn rule(&mut self) {
        let y = self.cursor.baseline();
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_LEFT_MM), y), false),
                (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_LEFT_MM), y), false),
            ],
            is_closed: false,
        });
        self.cursor.advance(RULE_ADVANCE_MM);
    }

    fn font(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
            Font::Italic => &self.italic,
        }
    }
}

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
    Italic,
}

fn construction<E: std::fmt::Display>(err: E) -> ReceiptError {
    ReceiptError::DocumentConstruction(err.to_string())
}

/// Invoice-style identifier: fixed prefix plus the first 8 characters of
/// the sale id.
pub fn invoice_reference(sale_id: &str) -> String {
    let trimmed = sale_id.trim();
    let short: String = trimmed.chars().take(8).collect();
    if short.is_empty() {
        format!("{INVOICE_PREFIX}00000000")
    } else {
        format!("{INVOICE_PREFIX}{short}")
    }
}

fn draw_header(surface: &mut Surface, config: &ResolvedConfig) {
    let fonts = config.fonts;
    surface.centered(&config.company_name, fonts.title, Font::Bold);
    surface.cursor.advance(2.0);

    if let Some(tax_id) = config.tax_id.as_deref() {
        surface.centered(&format!("NIF: {tax_id}"), fonts.small, Font::Regular);
    }
    if let Some(address) = config.address.as_deref() {
        for line in wrap(address, NAME_WRAP_CHARS) {
            surface.centered(&line, fonts.small, Font::Regular);
        }
    }
    if let Some(neighborhood) = config.neighborhood.as_deref() {
        surface.centered(neighborhood, fonts.small, Font::Regular);
    }
    if let Some(city) = config.city.as_deref() {
        surface.centered(city, fonts.small, Font::Regular);
    }
    if let Some(phone) = config.phone.as_deref() {
        surface.centered(&format!("Tel: {phone}"), fonts.small, Font::Regular);
    }
    if let Some(email) = config.email.as_deref() {
        surface.centered(email, fonts.small, Font::Regular);
    }
    if let Some(handle) = config.social_handle.as_deref() {
        surface.centered(handle, fonts.small, Font::Regular);
    }
    surface.rule();
}

fn draw_metadata(surface: &mut Surface, sale: &Sale, config: &ResolvedConfig) {
    let fonts = config.fonts;
    let issued = format_datetime(&sale.date);
    surface.line(DOCUMENT_KIND_LABEL, fonts.heading, MARGIN_LEFT_MM, Font::Bold);
    surface.line(
        &format!("Data de emissão: {issued}"),
        fonts.body,
        MARGIN_LEFT_MM,
        Font::Regular,
    );
    // Delivery date mirrors the issue date; sales are handed over on the
    // spot.
    surface.line(
        &format!("Data de entrega: {issued}"),
        fonts.body,
        MARGIN_LEFT_MM,
        Font::Regular,
    );
    surface.line(
        &format!("Factura n.º: {}", invoice_reference(&sale.id)),
        fonts.body,
        MARGIN_LEFT_MM,
        Font::Regular,
    );
}

fn draw_customer(surface: &mut Surface, sale: &Sale, config: &ResolvedConfig) {
    let fonts = config.fonts;
    let name = sale
        .customer_name()
        .unwrap_or_else(|| FALLBACK_CUSTOMER_NAME.to_string());
    let nif = sale
        .customer_nif()
        .unwrap_or_else(|| FINAL_CONSUMER.to_string());
    surface.line(
        &format!("Cliente: {name}"),
        fonts.body,
        MARGIN_LEFT_MM,
        Font::Regular,
    );
    surface.line(&format!("NIF: {nif}"), fonts.body, MARGIN_LEFT_MM, Font::Regular);
    surface.rule();
}

fn draw_items(surface: &mut Surface, items: &[LineItem], config: &ResolvedConfig) {
    let fonts = config.fonts;
    let tax = tax_label(config.tax_rate);

    surface.line("Itens", fonts.heading, MARGIN_LEFT_MM, Font::Bold);
    surface.text_at("Preço", fonts.small, COL_PRICE_MM, Font::Bold);
    surface.text_at("Qtd", fonts.small, COL_QTY_MM, Font::Bold);
    surface.text_at("Taxa", fonts.small, COL_TAX_MM, Font::Bold);
    surface.text_at("Total", fonts.small, COL_TOTAL_MM, Font::Bold);
    surface.advance_line();
    surface.rule();

    for item in items {
        for line in wrap(&item.name, NAME_WRAP_CHARS) {
            surface.line(&line, fonts.body, MARGIN_LEFT_MM, Font::Regular);
        }
        surface.text_at(
            &amount(item.unit_price, &config.currency),
            fonts.small,
            COL_PRICE_MM,
            Font::Regular,
        );
        surface.text_at(&item.quantity.to_string(), fonts.small, COL_QTY_MM, Font::Regular);
        surface.text_at(&tax, fonts.small, COL_TAX_MM, Font::Regular);
        surface.text_at(
            &amount(item.line_total, &config.currency),
            fonts.small,
            COL_TOTAL_MM,
            Font::Regular,
        );
        surface.advance_line();
        surface.cursor.advance(ITEM_GAP_MM);
    }
}

fn draw_totals(surface: &mut Surface, sale: &Sale, config: &ResolvedConfig) {
    let fonts = config.fonts;
    surface.rule();

    surface.text_at("TOTAL", fonts.heading, MARGIN_LEFT_MM, Font::Bold);
    surface.text_at(
        &amount(sale.total, &config.currency),
        fonts.heading,
        COL_TOTAL_MM,
        Font::Bold,
    );
    surface.advance_line();
    surface.cursor.advance(1.0);

    if let Some(method) = sale
        .payment_method
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        surface.line(
            &format!("Pagamento: {method}"),
            fonts.body,
            MARGIN_LEFT_MM,
            Font::Regular,
        );
    }
    if let Some(paid) = sale.amount_paid {
        surface.line(
            &format!("Valor entregue: {}", amount(paid, &config.currency)),
            fonts.body,
            MARGIN_LEFT_MM,
            Font::Regular,
        );
    }
    if let Some(change) = sale.change {
        surface.line(
            &format!("Troco: {}", amount(change, &config.currency)),
            fonts.body,
            MARGIN_LEFT_MM,
            Font::Regular,
        );
    }
    if let Some(notes) = sale
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        for line in wrap(notes, NAME_WRAP_CHARS) {
            surface.line(&line, fonts.small, MARGIN_LEFT_MM, Font::Italic);
        }
    }
    surface.line(
        &config.exemption_clause,
        fonts.small,
        MARGIN_LEFT_MM,
        Font::Regular,
    );

    surface.centered(&config.thank_you_message, fonts.body, Font::Regular);
    surface.centered(
        &format!("{} {}", config.footer_message, format_date(&sale.date)),
        fonts.small,
        Font::Regular,
    );
    if config.show_signature {
        surface.advance_line();
        surface.centered("_______________________________", fonts.small, Font::Regular);
        surface.centered("Assinatura", fonts.footnote, Font::Regular);
    }
    surface.centered(&config.certification_text, fonts.footnote, Font::Italic);
    surface.centered(&config.certificate_number, fonts.footnote, Font::Italic);
}

/// Render a sale as a paginated PDF document.
///
/// The page is sized to `max(standard height, estimate + margin)`; content
/// then renders top to bottom. The only failure mode is the PDF backend
/// refusing to construct the document.
pub fn render_pdf(sale: &Sale, config: &ResolvedConfig) -> Result<VectorRender, ReceiptError> {
    let items = extract::extract(sale);
    let estimated = estimate(sale, config, LINE_SPACING_MM);
    let page_height = STANDARD_PAGE_HEIGHT_MM.max(estimated + PAGE_MARGIN_MM);

    let (doc, page, layer) = PdfDocument::new(
        DOCUMENT_KIND_LABEL,
        Mm(PAGE_WIDTH_MM),
        Mm(page_height),
        "Camada 1",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(construction)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(construction)?;
    let italic = doc
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(construction)?;

    let mut surface = Surface {
        layer,
        regular,
        bold,
        italic,
        cursor: LayoutCursor::new(page_height),
    };

    draw_header(&mut surface, config);
    draw_metadata(&mut surface, sale, config);
    draw_customer(&mut surface, sale, config);
    draw_items(&mut surface, &items, config);
    draw_totals(&mut surface, sale, config);

    let content_height_mm = surface.cursor.y;
    drop(surface);

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer).map_err(construction)?;
    let bytes = writer.into_inner().map_err(construction)?;

    info!(
        sale_id = %sale.id,
        items = items.len(),
        page_height_mm = page_height,
        content_height_mm,
        "paginated receipt rendered"
    );

    Ok(VectorRender {
        bytes,
        page_height_mm: page_height,
        content_height_mm,
        items,
        grand_total: amount(sale.total, &config.currency),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, ReceiptConfig};
    use serde_json::json;

    fn minimal_sale() -> Sale {
        Sale {
            id: "s1".to_string(),
            date: "2025-01-10T10:00:00Z".to_string(),
            total: 1000.0,
            payment_method: Some("Dinheiro".to_string()),
            items: json!([
                { "product": { "name": "Pão", "price": 500 }, "quantity": 2 }
            ]),
            ..Sale::default()
        }
    }

    fn sale_with_item_count(count: usize) -> Sale {
        let entries: Vec<_> = (0..count)
            .map(|n| json!({ "name": format!("Artigo {n}"), "price": 150, "quantity": 1 }))
            .collect();
        Sale {
            id: "corpus".to_string(),
            date: "2025-02-01T09:30:00Z".to_string(),
            total: 150.0 * count as f64,
            items: json!(entries),
            ..Sale::default()
        }
    }

    fn full_profile() -> ReceiptConfig {
        ReceiptConfig {
            company_name: Some("Mercearia Kifica".to_string()),
            address: Some("Rua Amílcar Cabral 42, Ingombota".to_string()),
            phone: Some("+244 923 000 111".to_string()),
            email: Some("geral@kifica.ao".to_string()),
            tax_id: Some("5417000123".to_string()),
            neighborhood: Some("Maianga".to_string()),
            city: Some("Luanda".to_string()),
            social_handle: Some("@kifica".to_string()),
            tax_rate: Some(14.0),
            ..ReceiptConfig::default()
        }
    }

    #[test]
    fn renders_minimal_sale_to_pdf_bytes() {
        let config = resolve(None);
        let render = render_pdf(&minimal_sale(), &config).expect("render should succeed");
        assert!(render.bytes().starts_with(b"%PDF"));
        assert_eq!(render.items.len(), 1);
        assert_eq!(render.items[0].name, "Pão");
        assert_eq!(render.items[0].quantity, 2);
        assert_eq!(render.items[0].line_total, 1000.0);
        assert_eq!(render.grand_total, "AOA 1000,00");
        assert_eq!(render.page_height_mm, STANDARD_PAGE_HEIGHT_MM);
    }

    #[test]
    fn estimate_is_conservative_across_corpus() {
        let configs = [resolve(None), resolve(Some(&full_profile()))];
        for config in &configs {
            for count in [0usize, 1, 20, 50] {
                let mut sale = sale_with_item_count(count);
                sale.amount_paid = Some(sale.total);
                sale.change = Some(0.0);
                sale.notes = Some("entrega na caixa dois".to_string());
                let estimated = estimate(&sale, config, LINE_SPACING_MM);
                let render = render_pdf(&sale, config).expect("render should succeed");
                assert!(
                    estimated >= render.content_height_mm,
                    "estimate {estimated} under-allocates {} for {count} items",
                    render.content_height_mm
                );
            }
        }
    }

    #[test]
    fn long_sales_grow_the_page_beyond_standard_height() {
        let config = resolve(None);
        let render = render_pdf(&sale_with_item_count(50), &config).expect("render");
        assert!(render.page_height_mm > STANDARD_PAGE_HEIGHT_MM);
        assert!(render.page_height_mm >= render.content_height_mm);
    }

    #[test]
    fn oversized_product_name_wraps_and_raises_estimate() {
        let config = resolve(None);
        let long_name = "a".repeat(80);
        let long_sale = Sale {
            items: json!([{ "name": long_name, "price": 100, "quantity": 1 }]),
            ..minimal_sale()
        };
        let short_sale = Sale {
            items: json!([{ "name": "Pão fofo", "price": 100, "quantity": 1 }]),
            ..minimal_sale()
        };

        assert!(wrap(&"a".repeat(80), NAME_WRAP_CHARS).len() >= 3);
        let long_estimate = estimate(&long_sale, &config, LINE_SPACING_MM);
        let short_estimate = estimate(&short_sale, &config, LINE_SPACING_MM);
        assert!(long_estimate > short_estimate);

        let long_render = render_pdf(&long_sale, &config).expect("render");
        let short_render = render_pdf(&short_sale, &config).expect("render");
        assert!(long_render.content_height_mm > short_render.content_height_mm);
    }

    #[test]
    fn legacy_numeric_items_render_without_rows() {
        let config = resolve(None);
        let sale = Sale {
            items: json!(5),
            ..minimal_sale()
        };
        let render = render_pdf(&sale, &config).expect("render");
        assert!(render.items.is_empty());
        assert!(render.bytes().starts_with(b"%PDF"));
    }

    #[test]
    fn invoice_reference_truncates_the_sale_id() {
        assert_eq!(invoice_reference("abcdef1234567890"), "FR-abcdef12");
        assert_eq!(invoice_reference("  s1  "), "FR-s1");
        assert_eq!(invoice_reference(""), "FR-00000000");
    }

    #[test]
    fn save_to_file_persists_the_document() {
        let config = resolve(None);
        let render = render_pdf(&minimal_sale(), &config).expect("render");
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("recibo.pdf");
        render.save_to_file(&path).expect("save");
        let written = std::fs::read(&path).expect("read back");
        assert_eq!(written, render.bytes());
    }
}
