//! Text measurement and word wrapping.
//!
//! The builtin Helvetica fonts ship no metrics, so widths default to an
//! average-character heuristic. When a TTF is supplied we parse glyph
//! advances with `ttf-parser` for tighter estimates; either way the wrapper
//! works off a single measurement callback so the table engine stays
//! backend-agnostic.

/// Width measurement for one font family at arbitrary sizes.
pub struct Metrics {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API). Empty when
    /// running on heuristics only.
    bytes: Vec<u8>,
    units_per_em: f32,
}

impl Metrics {
    /// Heuristic-only metrics: average char width ≈ 0.5 × size (0.55 bold).
    pub fn heuristic() -> Self {
        Self {
            bytes: Vec::new(),
            units_per_em: 1000.0,
        }
    }

    /// Parse a TTF/OTF face for real horizontal advances.
    pub fn from_ttf(bytes: Vec<u8>) -> Result<Self, String> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| format!("failed to parse font: {e}"))?;
        let units_per_em = face.units_per_em() as f32;
        Ok(Self { bytes, units_per_em })
    }

    /// Measure the rendered width of `text` at `size` points.
    pub fn text_width(&self, text: &str, size: f32, bold: bool) -> f32 {
        if self.bytes.is_empty() {
            let avg = if bold { 0.55 } else { 0.5 };
            return text.chars().count() as f32 * size * avg;
        }

        if let Ok(face) = ttf_parser::Face::parse(&self.bytes, 0) {
            let scale = size / self.units_per_em;
            let mut width = 0.0f32;
            for ch in text.chars() {
                match face.glyph_index(ch) {
                    Some(gid) => {
                        width += face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale;
                    }
                    // Missing glyph: fall back to the heuristic advance.
                    None => width += size * 0.5,
                }
            }
            width
        } else {
            text.chars().count() as f32 * size * 0.5
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::heuristic()
    }
}

/// Fallback average-glyph width when the backend reports a zero-width
/// reference glyph (degenerate or missing font metrics).
const FALLBACK_CHAR_WIDTH: f32 = 7.0;

/// Word-wrap `text` into lines that fit `max_width` points.
///
/// The character budget per line is estimated from the measured width of a
/// single reference glyph (`"M"`), not per-character measurement; this is a
/// deliberate approximation carried over from the paper template this crate
/// reproduces. Words are packed greedily and never split: a word longer than
/// the budget occupies its own line unsplit. Empty or whitespace-only input
/// yields no lines.
pub fn wrap<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut avg_char_width = measure("M");
    if avg_char_width == 0.0 {
        avg_char_width = FALLBACK_CHAR_WIDTH;
    }
    let max_chars = ((max_width / avg_char_width) as usize).max(1);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure(s: &str) -> f32 {
        // 5 pt per char, like Helvetica 10 under the heuristic.
        s.chars().count() as f32 * 5.0
    }

    #[test]
    fn heuristic_text_width() {
        let m = Metrics::heuristic();
        let w = m.text_width("Hello", 16.0, false);
        // 5 chars × 16 × 0.5 = 40
        assert!((w - 40.0).abs() < 0.1);
        assert!(m.text_width("Hello", 16.0, true) > w);
    }

    #[test]
    fn short_text_is_one_line() {
        let lines = wrap("Tuberia PVC", 292.0, measure);
        assert_eq!(lines, vec!["Tuberia PVC"]);
    }

    #[test]
    fn long_text_wraps() {
        let text = "Suministro e instalacion de tuberia hidraulica de PVC de alta \
                    presion para la red principal del sector norte";
        let lines = wrap(text, 150.0, measure);
        assert!(lines.len() > 1, "expected wrapping, got {lines:?}");
        // max_chars = 150 / 5 = 30
        for line in &lines {
            assert!(line.chars().count() <= 30, "line too long: {line:?}");
        }
    }

    #[test]
    fn word_sequence_preserved() {
        let text = "uno dos tres cuatro cinco seis siete ocho nueve diez";
        let lines = wrap(text, 80.0, measure);
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn overlong_word_kept_unsplit() {
        let lines = wrap("x antidisestablishmentarianism y", 50.0, measure);
        assert!(lines.iter().any(|l| l == "antidisestablishmentarianism"));
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(wrap("", 100.0, measure).is_empty());
        assert!(wrap("   \t  ", 100.0, measure).is_empty());
    }

    #[test]
    fn zero_width_glyph_uses_fallback() {
        // Degenerate metrics: every string measures 0. The 7 pt fallback
        // gives 70 / 7 = 10 chars per line.
        let lines = wrap("aaaa bbbb cccc", 70.0, |_| 0.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn sliver_width_still_terminates() {
        let lines = wrap("a b c", 1.0, measure);
        assert_eq!(lines.len(), 3);
    }
}
