//! Pipeline – ties extraction, operator edits, composition, and PDF
//! rendering into a single call.

use std::fs;
use std::path::{Path, PathBuf};

use crate::canvas::{Canvas, PdfCanvas};
use crate::cfdi::Invoice;
use crate::compose::compose_order;
use crate::edit::{apply_edits, EditProvider};
use crate::error::{OrderError, RenderReport};
use crate::fonts::Metrics;

/// Configuration for one purchase order. Defaults reproduce the fixed paper
/// template of the issuing organization.
#[derive(Debug, Clone)]
pub struct OrderConfig {
    /// Page width in points (default: US Letter = 612).
    pub page_width: f32,
    /// Page height in points (default: US Letter = 792).
    pub page_height: f32,
    /// Page margin in points (default: 50).
    pub margin: f32,

    pub title: String,
    pub organization: String,
    pub address: String,
    pub contact: String,
    pub order_number: String,
    pub formulated_by: String,
    pub authorized_by: String,

    /// Logo image; `None` draws a labeled placeholder box.
    pub logo: Option<PathBuf>,
    /// Signature image; `None` draws a labeled placeholder box.
    pub signature: Option<PathBuf>,
    /// Optional TTF used only to tighten text-width estimates; glyphs are
    /// always drawn with the builtin Helvetica faces.
    pub measurement_font: Option<PathBuf>,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin: 50.0,
            title: "ORDEN DE COMPRA".to_string(),
            organization: "ORGANISMO OPERADOR MUNICIPAL DE AGUA POTABLE \
                           ALCANTARILLADO Y SANEAMIENTO"
                .to_string(),
            address: "MAGDALENA DE KINO, SONORA.".to_string(),
            contact: "Matamoros s/n Col. Centro Teléfono (632) 32 23155".to_string(),
            order_number: "2427516".to_string(),
            formulated_by: "Rodolfo Ochoa Ibarra".to_string(),
            authorized_by: "Maximino Leyva Soto".to_string(),
            logo: None,
            signature: None,
            measurement_font: None,
        }
    }
}

/// Full pipeline: CFDI XML string → PDF bytes plus a render report.
///
/// Only structural failures return `Err`; per-field and per-asset problems
/// surface as placeholders in the document and entries in
/// [`RenderReport::warnings`].
pub fn generate_order(
    xml: &str,
    config: &OrderConfig,
    edits: &mut dyn EditProvider,
) -> Result<(Vec<u8>, RenderReport), OrderError> {
    let invoice = Invoice::parse(xml)?;

    let fields = edits.order_fields();
    let items = apply_edits(invoice.items.clone(), edits);

    let metrics = match &config.measurement_font {
        Some(path) => match fs::read(path) {
            Ok(bytes) => match Metrics::from_ttf(bytes) {
                Ok(m) => m,
                Err(e) => {
                    log::warn!("measurement font '{}' unusable ({e}); using heuristics", path.display());
                    Metrics::heuristic()
                }
            },
            Err(e) => {
                log::warn!("measurement font '{}' unreadable ({e}); using heuristics", path.display());
                Metrics::heuristic()
            }
        },
        None => Metrics::heuristic(),
    };

    let mut canvas = PdfCanvas::with_metrics(
        &format!("{} {}", config.title, config.order_number),
        config.page_width,
        config.page_height,
        metrics,
    );
    let warnings = compose_order(&mut canvas, &invoice, &items, &fields, config);
    let pages = canvas.page_number();
    let bytes = canvas.finish();

    log::info!("rendered {pages} page(s), {} warning(s)", warnings.len());
    Ok((bytes, RenderReport { pages, warnings }))
}

/// Convenience wrapper reading the CFDI from `xml_path` and writing the PDF
/// to `pdf_path`.
pub fn generate_order_to_file(
    xml_path: &Path,
    pdf_path: &Path,
    config: &OrderConfig,
    edits: &mut dyn EditProvider,
) -> Result<RenderReport, OrderError> {
    let xml = fs::read_to_string(xml_path).map_err(|source| OrderError::Io {
        path: xml_path.to_path_buf(),
        source,
    })?;
    let (bytes, report) = generate_order(&xml, config, edits)?;
    fs::write(pdf_path, &bytes).map_err(|source| OrderError::Io {
        path: pdf_path.to_path_buf(),
        source,
    })?;
    Ok(report)
}
