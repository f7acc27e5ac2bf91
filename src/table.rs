//! Table layout engine: the line-item region of the order.
//!
//! Owns the vertical cursor while the table renders. Rows are measured via
//! the wrapped description line count; the page-break check runs *before*
//! each row so a multi-line description is never split across pages. The
//! column-title header is drawn identically on the first page and every
//! continuation page.

use crate::canvas::{Canvas, Font};
use crate::cfdi::LineItem;
use crate::fonts::wrap;

/// Vertical advance per wrapped description line.
pub const ROW_LINE_HEIGHT: f32 = 12.0;
/// Extra gap below each row.
pub const ROW_GAP: f32 = 4.0;
/// Cursor advance after drawing the column titles.
pub const HEADER_ADVANCE: f32 = 20.0;
/// Remaining-space threshold that triggers a page break.
pub const BOTTOM_THRESHOLD: f32 = 100.0;

const TABLE_FONT_SIZE: f32 = 10.0;
const FOOTER_FONT_SIZE: f32 = 8.0;

/// X positions of the three columns, plus the wrap width for descriptions.
#[derive(Debug, Clone, Copy)]
pub struct Columns {
    pub quantity_x: f32,
    pub unit_x: f32,
    pub description_x: f32,
    pub description_width: f32,
}

impl Columns {
    /// Fixed offsets from the left margin, matching the paper template.
    pub fn for_page(page_width: f32, margin: f32) -> Self {
        let description_x = margin + 220.0;
        Self {
            quantity_x: margin,
            unit_x: margin + 100.0,
            description_x,
            description_width: page_width - margin - description_x,
        }
    }
}

/// Layout state for the table region of one document.
#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    pub columns: Columns,
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub bottom_threshold: f32,
}

impl TableLayout {
    pub fn new(page_width: f32, page_height: f32, margin: f32) -> Self {
        Self {
            columns: Columns::for_page(page_width, margin),
            page_width,
            page_height,
            margin,
            bottom_threshold: BOTTOM_THRESHOLD,
        }
    }

    /// Draw the bold column titles at `y` and return the advanced cursor.
    fn draw_header<C: Canvas>(&self, canvas: &mut C, y: f32) -> f32 {
        canvas.set_font(Font::HelveticaBold, TABLE_FONT_SIZE);
        canvas.draw_text(self.columns.quantity_x, y, "CANT.");
        canvas.draw_text(self.columns.unit_x, y, "UNIDAD");
        canvas.draw_text(self.columns.description_x, y, "DESCRIPCIÓN");
        y - HEADER_ADVANCE
    }

    /// Render the header and all items starting at cursor `start_y`; returns
    /// the cursor below the last row.
    ///
    /// Breaks pages when fewer than [`BOTTOM_THRESHOLD`] points remain,
    /// drawing the page footer first and repeating the header on the new
    /// page. Items with missing fields render as empty cells; no row is
    /// skipped.
    pub fn render<C: Canvas>(&self, canvas: &mut C, items: &[LineItem], start_y: f32) -> f32 {
        let mut y = self.draw_header(canvas, start_y);
        canvas.set_font(Font::Helvetica, TABLE_FONT_SIZE);

        for item in items {
            if y < self.bottom_threshold {
                draw_page_footer(canvas, self.page_width, self.margin);
                canvas.new_page();
                y = self.page_height - self.margin;
                y = self.draw_header(canvas, y);
                canvas.set_font(Font::Helvetica, TABLE_FONT_SIZE);
            }

            let row_y = y;
            canvas.draw_text(self.columns.quantity_x, row_y, &item.quantity);
            canvas.draw_text(self.columns.unit_x, row_y, &item.unit);

            let lines = wrap(&item.description, self.columns.description_width, |s| {
                canvas.text_width(s, Font::Helvetica, TABLE_FONT_SIZE)
            });
            for (i, line) in lines.iter().enumerate() {
                canvas.draw_text(
                    self.columns.description_x,
                    row_y - i as f32 * ROW_LINE_HEIGHT,
                    line,
                );
            }

            y = row_y - (lines.len() as f32 * ROW_LINE_HEIGHT + ROW_GAP);
        }
        y
    }
}

/// Centered "Página N" footer; drawn before every page break and once more
/// by the composer before the document is finalized.
pub fn draw_page_footer<C: Canvas>(canvas: &mut C, page_width: f32, margin: f32) {
    canvas.set_font(Font::Helvetica, FOOTER_FONT_SIZE);
    let page = canvas.page_number();
    canvas.draw_centered_text(page_width / 2.0, margin / 2.0, &format!("Página {page}"));
}
