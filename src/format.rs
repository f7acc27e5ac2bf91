//! Exponent normalization for unit and description text.
//!
//! CFDI documents carry units like `m^3`; the printed order wants `m³`. The
//! substitution applies anywhere in the text, so descriptions mentioning
//! units are normalized too.

/// Replace every `^<digit>` with the matching Unicode superscript.
///
/// All other characters (including a `^` not followed by a digit) pass
/// through unchanged. Idempotent: the output contains no `^<digit>` left to
/// rewrite.
pub fn format_exponents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '^' {
            if let Some(sup) = chars.peek().and_then(|d| superscript(*d)) {
                out.push(sup);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn superscript(digit: char) -> Option<char> {
    Some(match digit {
        '0' => '\u{2070}',
        '1' => '\u{00B9}',
        '2' => '\u{00B2}',
        '3' => '\u{00B3}',
        '4' => '\u{2074}',
        '5' => '\u{2075}',
        '6' => '\u{2076}',
        '7' => '\u{2077}',
        '8' => '\u{2078}',
        '9' => '\u{2079}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_meters() {
        assert_eq!(format_exponents("m^3"), "m³");
        assert_eq!(format_exponents("m^2"), "m²");
    }

    #[test]
    fn applies_anywhere_in_text() {
        assert_eq!(
            format_exponents("Tuberia PVC m^3 y placa de 2 m^2"),
            "Tuberia PVC m³ y placa de 2 m²"
        );
    }

    #[test]
    fn all_digits_map() {
        assert_eq!(
            format_exponents("x^0 x^1 x^4 x^5 x^6 x^7 x^8 x^9"),
            "x⁰ x¹ x⁴ x⁵ x⁶ x⁷ x⁸ x⁹"
        );
    }

    #[test]
    fn caret_without_digit_is_kept() {
        assert_eq!(format_exponents("a^b"), "a^b");
        assert_eq!(format_exponents("trailing^"), "trailing^");
        assert_eq!(format_exponents("^^3"), "^³");
    }

    #[test]
    fn other_text_unchanged() {
        assert_eq!(format_exponents("PIEZA"), "PIEZA");
        assert_eq!(format_exponents(""), "");
    }

    #[test]
    fn idempotent() {
        let once = format_exponents("m^3 y m^2");
        assert_eq!(format_exponents(&once), once);
    }
}
