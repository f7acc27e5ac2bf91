//! Document composer: static header/footer fields around the item table.
//!
//! Everything here is fixed-offset placement copied from the paper template;
//! the only computed layout lives in [`crate::table`]. Asset failures (logo,
//! signature) degrade to a captioned placeholder box and a warning; they
//! never abort the render.

use std::path::Path;

use crate::canvas::{Canvas, Font};
use crate::cfdi::{Invoice, LineItem};
use crate::edit::OrderFields;
use crate::error::RenderWarning;
use crate::pipeline::OrderConfig;
use crate::table::{draw_page_footer, TableLayout};

const LOGO_WIDTH: f32 = 100.0;
const LOGO_HEIGHT: f32 = 50.0;
const SIGNATURE_WIDTH: f32 = 200.0;
const SIGNATURE_HEIGHT: f32 = 50.0;

/// Draw the complete order onto `canvas`. Returns the warnings accumulated
/// for assets that had to be replaced with placeholders.
pub fn compose_order<C: Canvas>(
    canvas: &mut C,
    invoice: &Invoice,
    items: &[LineItem],
    fields: &OrderFields,
    config: &OrderConfig,
) -> Vec<RenderWarning> {
    let mut warnings = Vec::new();
    let width = config.page_width;
    let height = config.page_height;
    let margin = config.margin;

    // -- Logo region --------------------------------------------------------
    let logo_x = margin;
    let logo_y = height - LOGO_HEIGHT;
    match config.logo.as_deref() {
        Some(path) => {
            if let Err(detail) = draw_asset(canvas, path, logo_x, logo_y, LOGO_WIDTH, LOGO_HEIGHT)
            {
                log::warn!("logo '{}' unavailable: {detail}", path.display());
                placeholder(
                    canvas,
                    logo_x,
                    logo_y,
                    LOGO_WIDTH,
                    LOGO_HEIGHT,
                    8.0,
                    &format!("Error al cargar logo: {detail}"),
                );
                warnings.push(RenderWarning::Logo(detail));
            }
        }
        None => placeholder(canvas, logo_x, logo_y, LOGO_WIDTH, LOGO_HEIGHT, 10.0, "LOGO"),
    }

    // -- Centered organization header ---------------------------------------
    let mut y = height - LOGO_HEIGHT - 30.0;
    canvas.set_font(Font::HelveticaBold, 14.0);
    canvas.draw_centered_text(width / 2.0, y, &config.title);
    y -= 20.0;
    canvas.set_font(Font::Helvetica, 12.0);
    canvas.draw_centered_text(width / 2.0, y, &config.organization);
    y -= 20.0;
    canvas.draw_centered_text(width / 2.0, y, &config.address);
    y -= 20.0;
    canvas.draw_centered_text(width / 2.0, y, &config.contact);
    y -= 30.0;

    // -- Order data ---------------------------------------------------------
    labeled(canvas, margin, y, 150.0, "ORDEN DE COMPRA No:", &config.order_number);
    y -= 20.0;
    labeled(canvas, margin, y, 150.0, "FECHA:", invoice.date_display());
    y -= 20.0;
    labeled(
        canvas,
        margin,
        y,
        250.0,
        "DEPARTAMENTO QUE LO SOLICITA:",
        &fields.department,
    );
    y -= 20.0;
    labeled(
        canvas,
        margin,
        y,
        250.0,
        "PERSONA QUE LO SOLICITA:",
        &fields.requester,
    );
    y -= 30.0;

    // -- Line-item table ----------------------------------------------------
    let table = TableLayout::new(width, height, margin);
    y = table.render(canvas, items, y);

    y -= 20.0;
    canvas.draw_line(margin, y, width - margin, y);
    y -= 20.0;

    // -- Observations -------------------------------------------------------
    canvas.set_font(Font::HelveticaBold, 12.0);
    canvas.draw_text(margin, y, "OBSERVACIONES:");
    y -= 20.0;
    labeled(canvas, margin, y, 120.0, "PROVEEDOR:", &fields.supplier);
    y -= 20.0;
    labeled(canvas, margin, y, 120.0, "Folio Fiscal:", invoice.fiscal_folio_display());
    y -= 20.0;
    labeled(canvas, margin, y, 120.0, "CFDI:", &invoice.cfdi_number_display());
    y -= 30.0;

    // -- Signers ------------------------------------------------------------
    canvas.set_font(Font::HelveticaBold, 12.0);
    canvas.draw_text(margin, y, "FORMULÓ");
    canvas.draw_text(margin + 200.0, y, "AUTORIZÓ");
    y -= 20.0;
    canvas.set_font(Font::Helvetica, 12.0);
    canvas.draw_text(margin, y, &config.formulated_by);
    canvas.draw_text(margin + 200.0, y, &config.authorized_by);
    y -= 40.0;

    // -- Signature region ---------------------------------------------------
    canvas.set_font(Font::HelveticaBold, 12.0);
    canvas.draw_text(margin, y, "FIRMA:");
    let sig_x = margin + 70.0;
    let sig_y = y - 40.0;
    match config.signature.as_deref() {
        Some(path) => {
            if let Err(detail) =
                draw_asset(canvas, path, sig_x, sig_y, SIGNATURE_WIDTH, SIGNATURE_HEIGHT)
            {
                log::warn!("signature '{}' unavailable: {detail}", path.display());
                placeholder(
                    canvas,
                    sig_x,
                    sig_y,
                    SIGNATURE_WIDTH,
                    SIGNATURE_HEIGHT,
                    10.0,
                    &format!("Error al cargar firma: {detail}"),
                );
                warnings.push(RenderWarning::Signature(detail));
            }
        }
        None => placeholder(
            canvas,
            sig_x,
            sig_y,
            SIGNATURE_WIDTH,
            SIGNATURE_HEIGHT,
            10.0,
            "Firma digital o física",
        ),
    }

    draw_page_footer(canvas, width, margin);
    warnings
}

/// Read and draw an image asset; `Err` carries a human-readable reason.
fn draw_asset<C: Canvas>(
    canvas: &mut C,
    path: &Path,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> Result<(), String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    canvas.draw_image(&bytes, x, y, width, height)
}

/// Labeled placeholder rectangle for a missing or broken asset.
fn placeholder<C: Canvas>(
    canvas: &mut C,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    caption_size: f32,
    caption: &str,
) {
    canvas.draw_rect(x, y, width, height);
    canvas.set_font(Font::HelveticaOblique, caption_size);
    canvas.draw_text(x + 5.0, y + height / 2.0, caption);
}

/// Bold label at `x`, regular value `value_offset` to the right.
fn labeled<C: Canvas>(
    canvas: &mut C,
    x: f32,
    y: f32,
    value_offset: f32,
    label: &str,
    value: &str,
) {
    canvas.set_font(Font::HelveticaBold, 12.0);
    canvas.draw_text(x, y, label);
    canvas.set_font(Font::Helvetica, 12.0);
    canvas.draw_text(x + value_offset, y, value);
}
