//! Receipt facade: the operations pages call.
//!
//! Each operation takes a completed sale plus the optional tenant profile,
//! re-derives everything from scratch (no caching between calls) and pushes
//! the result through the configured output sink. Inputs are never mutated.

use chrono::Utc;
use tracing::{info, warn};

use crate::config::{resolve, ReceiptConfig};
use crate::error::ReceiptError;
use crate::model::Sale;
use crate::pdf::render_pdf;
use crate::sink::OutputSink;
use crate::thermal::render_thermal;

/// How a share request was actually fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The platform share mechanism took the document.
    Shared,
    /// Sharing was unavailable or declined; the document was persisted as a
    /// regular download instead.
    DownloadFallback,
}

/// File-name stem for a sale: its id, or the current unix timestamp when
/// the id is blank.
fn file_stem(sale: &Sale) -> String {
    let trimmed = sale.id.trim();
    if trimmed.is_empty() {
        Utc::now().timestamp().to_string()
    } else {
        trimmed.to_string()
    }
}

pub struct ReceiptFacade<S: OutputSink> {
    sink: S,
}

impl<S: OutputSink> ReceiptFacade<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Build the paginated document and save it as
    /// `receipt-sale-<id>.pdf`. Returns the file name used.
    pub fn to_download(
        &self,
        sale: &Sale,
        config: Option<&ReceiptConfig>,
    ) -> Result<String, ReceiptError> {
        let resolved = resolve(config);
        let render = render_pdf(sale, &resolved)?;
        let filename = format!("receipt-sale-{}.pdf", file_stem(sale));
        self.sink.persist(render.bytes(), &filename)?;
        info!(sale_id = %sale.id, filename = %filename, "receipt download triggered");
        Ok(filename)
    }

    /// Build the thermal text and hand it to the platform print mechanism.
    /// A dismissed print dialog is a success.
    pub fn to_print(&self, sale: &Sale, config: Option<&ReceiptConfig>) -> Result<(), ReceiptError> {
        let resolved = resolve(config);
        let text = render_thermal(sale, &resolved);
        self.sink.present(&text)?;
        info!(sale_id = %sale.id, "receipt sent to print path");
        Ok(())
    }

    /// Build the thermal text and save it as
    /// `receipt-thermal-<id>.txt`. Returns the file name used.
    pub fn to_thermal_download(
        &self,
        sale: &Sale,
        config: Option<&ReceiptConfig>,
    ) -> Result<String, ReceiptError> {
        let resolved = resolve(config);
        let text = render_thermal(sale, &resolved);
        let filename = format!("receipt-thermal-{}.txt", file_stem(sale));
        self.sink.persist(text.as_bytes(), &filename)?;
        info!(sale_id = %sale.id, filename = %filename, "thermal receipt download triggered");
        Ok(filename)
    }

    /// Offer the paginated document to the platform share mechanism,
    /// falling back to a regular download when sharing is unavailable or
    /// declined. The fallback is an outcome, not an error.
    pub fn to_share(
        &self,
        sale: &Sale,
        config: Option<&ReceiptConfig>,
    ) -> Result<ShareOutcome, ReceiptError> {
        let resolved = resolve(config);
        let render = render_pdf(sale, &resolved)?;
        let filename = format!("receipt-sale-{}.pdf", file_stem(sale));
        let caption = format!("Recibo da venda {}", file_stem(sale));

        match self.sink.share(render.bytes(), &filename, &caption) {
            Ok(true) => {
                info!(sale_id = %sale.id, "receipt shared");
                return Ok(ShareOutcome::Shared);
            }
            Ok(false) => {}
            Err(err) => {
                warn!(sale_id = %sale.id, error = %err, "share mechanism failed; falling back to download");
            }
        }

        self.sink.persist(render.bytes(), &filename)?;
        info!(sale_id = %sale.id, filename = %filename, "share fell back to download");
        Ok(ShareOutcome::DownloadFallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::text::amount;
    use serde_json::json;
    use std::cell::RefCell;
    use std::io;

    #[derive(Default)]
    struct Recording {
        persisted: Vec<(String, Vec<u8>)>,
        presented: Vec<String>,
        share_calls: usize,
    }

    /// Test sink capturing every call; `share_supported` drives the
    /// fallback paths.
    #[derive(Default)]
    struct RecordingSink {
        share_supported: bool,
        calls: RefCell<Recording>,
    }

    impl OutputSink for RecordingSink {
        fn persist(&self, bytes: &[u8], filename: &str) -> io::Result<()> {
            self.calls
                .borrow_mut()
                .persisted
                .push((filename.to_string(), bytes.to_vec()));
            Ok(())
        }

        fn present(&self, text: &str) -> io::Result<()> {
            self.calls.borrow_mut().presented.push(text.to_string());
            Ok(())
        }

        fn share(&self, _bytes: &[u8], _filename: &str, _caption: &str) -> io::Result<bool> {
            self.calls.borrow_mut().share_calls += 1;
            Ok(self.share_supported)
        }
    }

    fn sample_sale() -> Sale {
        Sale {
            id: "venda-0042-abcdef".to_string(),
            date: "2025-01-10T10:00:00Z".to_string(),
            total: 1000.0,
            payment_method: Some("Dinheiro".to_string()),
            items: json!([
                { "product": { "name": "Pão", "price": 500 }, "quantity": 2 }
            ]),
            ..Sale::default()
        }
    }

    #[test]
    fn to_download_persists_a_pdf_named_after_the_sale() {
        let facade = ReceiptFacade::new(RecordingSink::default());
        let filename = facade.to_download(&sample_sale(), None).expect("download");
        assert_eq!(filename, "receipt-sale-venda-0042-abcdef.pdf");
        let calls = facade.sink().calls.borrow();
        assert_eq!(calls.persisted.len(), 1);
        assert!(calls.persisted[0].1.starts_with(b"%PDF"));
    }

    #[test]
    fn to_print_presents_thermal_text() {
        let facade = ReceiptFacade::new(RecordingSink::default());
        facade.to_print(&sample_sale(), None).expect("print");
        let calls = facade.sink().calls.borrow();
        assert_eq!(calls.presented.len(), 1);
        assert!(calls.presented[0].contains("TOTAL"));
        assert!(calls.presented[0].contains("Pão"));
    }

    #[test]
    fn to_thermal_download_persists_text() {
        let facade = ReceiptFacade::new(RecordingSink::default());
        let filename = facade
            .to_thermal_download(&sample_sale(), None)
            .expect("thermal download");
        assert_eq!(filename, "receipt-thermal-venda-0042-abcdef.txt");
        let calls = facade.sink().calls.borrow();
        let text = String::from_utf8(calls.persisted[0].1.clone()).expect("utf-8");
        assert!(text.contains("AOA 1000,00"));
    }

    #[test]
    fn to_share_reports_fallback_when_sharing_is_unavailable() {
        let facade = ReceiptFacade::new(RecordingSink::default());
        let outcome = facade.to_share(&sample_sale(), None).expect("share");
        assert_eq!(outcome, ShareOutcome::DownloadFallback);
        let calls = facade.sink().calls.borrow();
        assert_eq!(calls.share_calls, 1);
        assert_eq!(calls.persisted.len(), 1);
    }

    #[test]
    fn to_share_succeeds_without_fallback_when_supported() {
        let facade = ReceiptFacade::new(RecordingSink {
            share_supported: true,
            ..RecordingSink::default()
        });
        let outcome = facade.to_share(&sample_sale(), None).expect("share");
        assert_eq!(outcome, ShareOutcome::Shared);
        assert!(facade.sink().calls.borrow().persisted.is_empty());
    }

    #[test]
    fn blank_sale_id_falls_back_to_a_timestamp_stem() {
        let facade = ReceiptFacade::new(RecordingSink::default());
        let sale = Sale {
            id: "   ".to_string(),
            ..sample_sale()
        };
        let filename = facade.to_download(&sale, None).expect("download");
        assert!(filename.starts_with("receipt-sale-"));
        assert!(filename.ends_with(".pdf"));
        let stem = filename
            .trim_start_matches("receipt-sale-")
            .trim_end_matches(".pdf");
        assert!(stem.parse::<i64>().is_ok(), "stem {stem:?} is not a timestamp");
    }

    #[test]
    fn renderers_agree_on_items_and_grand_total() {
        let sale = Sale {
            items: json!({
                "products": [
                    { "productName": "Óleo Fula", "price": 1200, "quantity": 2 },
                    { "name": "Arroz agulha 5kg", "price": 4300, "quantity": 1 }
                ]
            }),
            total: 6700.0,
            ..sample_sale()
        };
        let resolved = resolve(None);
        let render = render_pdf(&sale, &resolved).expect("pdf render");
        let text = render_thermal(&sale, &resolved);

        let expected = extract(&sale);
        assert_eq!(render.items, expected);
        for item in &expected {
            assert!(text.contains(&item.name));
            let detail = format!(
                "{} x {} = {}",
                item.quantity,
                amount(item.unit_price, &resolved.currency),
                amount(item.line_total, &resolved.currency),
            );
            assert!(text.contains(&detail), "thermal output missing {detail:?}");
        }
        // Same order in the thermal stream as in the extracted list.
        let first = text.find(&expected[0].name).expect("first item present");
        let second = text.find(&expected[1].name).expect("second item present");
        assert!(first < second);
        assert!(text.contains(&render.grand_total));
    }
}
