//! Page canvas abstraction and its two backends.
//!
//! The table engine and composer draw through the [`Canvas`] trait so layout
//! logic can be tested against [`RecordingCanvas`] without producing a PDF.
//! [`PdfCanvas`] is the real backend on printpdf's v0.8 ops API.
//!
//! Coordinates are PDF points with the origin at the bottom-left of the
//! page; the cursor moves down by decreasing `y`.

use serde::Serialize;

use crate::fonts::Metrics;

/// The three builtin faces the order template uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl Font {
    pub fn is_bold(self) -> bool {
        matches!(self, Font::HelveticaBold)
    }

    fn builtin(self) -> printpdf::BuiltinFont {
        match self {
            Font::Helvetica => printpdf::BuiltinFont::Helvetica,
            Font::HelveticaBold => printpdf::BuiltinFont::HelveticaBold,
            Font::HelveticaOblique => printpdf::BuiltinFont::HelveticaOblique,
        }
    }
}

/// Drawing surface for one document.
///
/// Implementations own the current font state (set once, used by every
/// subsequent text draw) and the page counter.
pub trait Canvas {
    /// Set the font used by subsequent text draws.
    fn set_font(&mut self, font: Font, size: f32);

    /// Estimated rendered width of `text` in points.
    fn text_width(&self, text: &str, font: Font, size: f32) -> f32;

    /// Draw `text` with its left edge at `x` and baseline at `y`.
    fn draw_text(&mut self, x: f32, y: f32, text: &str);

    /// Draw `text` centered horizontally on `x`.
    fn draw_centered_text(&mut self, x: f32, y: f32, text: &str);

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);

    /// Stroke an axis-aligned rectangle with bottom-left corner at `(x, y)`.
    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Draw an image scaled to fit the given box, preserving aspect ratio.
    ///
    /// `Err` means the bytes could not be decoded; the caller decides how to
    /// degrade (this backend draws nothing on failure).
    fn draw_image(&mut self, bytes: &[u8], x: f32, y: f32, width: f32, height: f32)
        -> Result<(), String>;

    /// Finish the current page and start a new one.
    fn new_page(&mut self);

    /// 1-based number of the page currently being drawn.
    fn page_number(&self) -> usize;
}

// ---------------------------------------------------------------------------
// printpdf backend
// ---------------------------------------------------------------------------

/// Real canvas writing printpdf ops, one `Vec<Op>` per page.
pub struct PdfCanvas {
    doc: printpdf::PdfDocument,
    finished_pages: Vec<printpdf::PdfPage>,
    ops: Vec<printpdf::Op>,
    page_width: f32,
    page_height: f32,
    font: Font,
    font_size: f32,
    metrics: Metrics,
}

impl PdfCanvas {
    pub fn new(title: &str, page_width: f32, page_height: f32) -> Self {
        Self::with_metrics(title, page_width, page_height, Metrics::heuristic())
    }

    /// Use TTF-backed metrics for width estimation. Glyphs are still drawn
    /// with the builtin faces; the metrics only tighten wrap estimates.
    pub fn with_metrics(title: &str, page_width: f32, page_height: f32, metrics: Metrics) -> Self {
        Self {
            doc: printpdf::PdfDocument::new(title),
            finished_pages: Vec::new(),
            ops: Vec::new(),
            page_width,
            page_height,
            font: Font::Helvetica,
            font_size: 12.0,
            metrics,
        }
    }

    fn page_size_mm(&self) -> (printpdf::Mm, printpdf::Mm) {
        // pt → mm
        (
            printpdf::Mm(self.page_width * 0.352778),
            printpdf::Mm(self.page_height * 0.352778),
        )
    }

    /// Finalize the document, flushing the in-progress page, and return the
    /// PDF bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let (w, h) = self.page_size_mm();
        let ops = std::mem::take(&mut self.ops);
        self.finished_pages.push(printpdf::PdfPage::new(w, h, ops));
        self.doc.with_pages(std::mem::take(&mut self.finished_pages));
        self.doc
            .save(&printpdf::PdfSaveOptions::default(), &mut Vec::new())
    }
}

impl Canvas for PdfCanvas {
    fn set_font(&mut self, font: Font, size: f32) {
        self.font = font;
        self.font_size = size;
    }

    fn text_width(&self, text: &str, font: Font, size: f32) -> f32 {
        self.metrics.text_width(text, size, font.is_bold())
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        use printpdf::*;

        if text.is_empty() {
            return;
        }
        let font = self.font.builtin();
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(x),
                y: Pt(y),
            },
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(self.font_size),
            font,
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(to_winlatin(text))],
            font,
        });
        self.ops.push(Op::EndTextSection);
    }

    fn draw_centered_text(&mut self, x: f32, y: f32, text: &str) {
        let width = self.text_width(text, self.font, self.font_size);
        self.draw_text(x - width / 2.0, y, text);
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        use printpdf::*;

        self.ops.push(Op::SetOutlineThickness { pt: Pt(1.0) });
        self.ops.push(Op::DrawLine {
            line: Line {
                points: vec![
                    LinePoint {
                        p: Point {
                            x: Pt(x1),
                            y: Pt(y1),
                        },
                        bezier: false,
                    },
                    LinePoint {
                        p: Point {
                            x: Pt(x2),
                            y: Pt(y2),
                        },
                        bezier: false,
                    },
                ],
                is_closed: false,
            },
        });
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        use printpdf::*;

        let corners = [
            (x, y),
            (x + width, y),
            (x + width, y + height),
            (x, y + height),
        ];
        self.ops.push(Op::SetOutlineThickness { pt: Pt(1.0) });
        self.ops.push(Op::DrawLine {
            line: Line {
                points: corners
                    .iter()
                    .map(|&(px, py)| LinePoint {
                        p: Point {
                            x: Pt(px),
                            y: Pt(py),
                        },
                        bezier: false,
                    })
                    .collect(),
                is_closed: true,
            },
        });
    }

    fn draw_image(
        &mut self,
        bytes: &[u8],
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), String> {
        use printpdf::*;

        // Decode with the `image` crate to obtain pixel dimensions.
        let dyn_img = ::image::load_from_memory(bytes)
            .map_err(|e| format!("image decode error: {e}"))?;
        let (px_w, px_h) = (dyn_img.width(), dyn_img.height());
        if px_w == 0 || px_h == 0 {
            return Err("image has zero pixel dimensions".to_string());
        }

        let mut img_warnings: Vec<PdfWarnMsg> = Vec::new();
        let raw = RawImage::decode_from_bytes(bytes, &mut img_warnings)
            .map_err(|e| format!("PDF image encode error: {e}"))?;
        let xobj_id = self.doc.add_image(&raw);

        // Fit inside the box, preserving aspect ratio. At dpi=72 printpdf
        // renders 1 px = 1 pt, so scale = desired_pt / px_dim.
        let scale = (width / px_w as f32).min(height / px_h as f32);
        self.ops.push(Op::UseXobject {
            id: xobj_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x)),
                translate_y: Some(Pt(y)),
                dpi: Some(72.0),
                scale_x: Some(scale),
                scale_y: Some(scale),
                rotate: None,
            },
        });
        Ok(())
    }

    fn new_page(&mut self) {
        let (w, h) = self.page_size_mm();
        let ops = std::mem::take(&mut self.ops);
        self.finished_pages.push(printpdf::PdfPage::new(w, h, ops));
    }

    fn page_number(&self) -> usize {
        self.finished_pages.len() + 1
    }
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
///
/// Superscript digits outside Latin-1 (only ¹²³ exist there) degrade to the
/// plain digit so exponent text stays legible.
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{2070}' => b'0',
            '\u{2074}' => b'4',
            '\u{2075}' => b'5',
            '\u{2076}' => b'6',
            '\u{2077}' => b'7',
            '\u{2078}' => b'8',
            '\u{2079}' => b'9',
            '\u{20AC}' => 0x80, // euro
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for the 0x80-0x9F range; printpdf
    // passes these bytes straight to the PDF stream, decoded by
    // WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

// ---------------------------------------------------------------------------
// Recording backend
// ---------------------------------------------------------------------------

/// One recorded drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    SetFont {
        font: Font,
        size: f32,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
    },
    CenteredText {
        x: f32,
        y: f32,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    NewPage,
}

/// Fake backend recording every instruction; measurement uses the same
/// heuristic metrics as the builtin-font PDF canvas, so wrap decisions match.
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
    pages_finished: usize,
    font: Font,
    font_size: f32,
    metrics: Metrics,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            pages_finished: 0,
            font: Font::Helvetica,
            font_size: 12.0,
            metrics: Metrics::heuristic(),
        }
    }

    /// All recorded text payloads, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } | DrawOp::CenteredText { text, .. } => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Number of page breaks recorded.
    pub fn page_breaks(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::NewPage)).count()
    }

    /// Dump the instruction stream as JSON (handy for debugging failures).
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.ops).unwrap_or_default()
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for RecordingCanvas {
    fn set_font(&mut self, font: Font, size: f32) {
        self.font = font;
        self.font_size = size;
        self.ops.push(DrawOp::SetFont { font, size });
    }

    fn text_width(&self, text: &str, font: Font, size: f32) -> f32 {
        self.metrics.text_width(text, size, font.is_bold())
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn draw_centered_text(&mut self, x: f32, y: f32, text: &str) {
        self.ops.push(DrawOp::CenteredText {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn draw_image(
        &mut self,
        _bytes: &[u8],
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), String> {
        self.ops.push(DrawOp::Image {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn new_page(&mut self) {
        self.pages_finished += 1;
        self.ops.push(DrawOp::NewPage);
    }

    fn page_number(&self) -> usize {
        self.pages_finished + 1
    }
}
