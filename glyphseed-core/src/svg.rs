//! Markup helpers shared by the style renderers and the composer.

use std::fmt;

use quick_xml::escape::escape;

/// Coordinate formatter: two decimals, trailing zeros dropped, no `-0`.
#[derive(Debug, Clone, Copy)]
pub struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 100.0).round() / 100.0;
        if rounded == 0.0 || !rounded.is_finite() {
            f.write_str("0")
        } else {
            write!(f, "{}", rounded)
        }
    }
}

/// `rotate(deg cx cy)` transform attribute value.
pub fn rotate(degrees: f64, cx: f64, cy: f64) -> String {
    format!("rotate({} {} {})", Num(degrees), Num(cx), Num(cy))
}

/// A gradient stop: offset in percent, color, optional stop-opacity.
pub struct Stop<'a> {
    pub offset: u32,
    pub color: &'a str,
    pub opacity: Option<f64>,
}

impl<'a> Stop<'a> {
    pub fn new(offset: u32, color: &'a str) -> Self {
        Self { offset, color, opacity: None }
    }

    pub fn with_opacity(offset: u32, color: &'a str, opacity: f64) -> Self {
        Self { offset, color, opacity: Some(opacity) }
    }
}

fn write_stops(out: &mut String, stops: &[Stop<'_>]) {
    for stop in stops {
        out.push_str(&format!(
            r#"<stop offset="{}%" stop-color="{}""#,
            stop.offset, stop.color
        ));
        if let Some(opacity) = stop.opacity {
            out.push_str(&format!(r#" stop-opacity="{}""#, Num(opacity)));
        }
        out.push_str("/>");
    }
}

/// `<linearGradient>` from `(x1, y1)` to `(x2, y2)`, all in percent.
pub fn linear_gradient(id: &str, from: (u32, u32), to: (u32, u32), stops: &[Stop<'_>]) -> String {
    let mut out = format!(
        r#"<linearGradient id="{}" x1="{}%" y1="{}%" x2="{}%" y2="{}%">"#,
        id, from.0, from.1, to.0, to.1
    );
    write_stops(&mut out, stops);
    out.push_str("</linearGradient>");
    out
}

/// `<radialGradient>` centered on the bounding box.
pub fn radial_gradient(id: &str, stops: &[Stop<'_>]) -> String {
    let mut out = format!(r#"<radialGradient id="{}" cx="50%" cy="50%">"#, id);
    write_stops(&mut out, stops);
    out.push_str("</radialGradient>");
    out
}

/// Whether `c` may appear in an XML 1.0 document (the `Char` production).
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
}

/// Escape text content and attribute values. Characters XML cannot carry
/// at all are dropped.
pub fn escape_text(text: &str) -> String {
    if text.chars().all(is_xml_char) {
        return escape(text).into_owned();
    }
    let kept: String = text.chars().filter(|c| is_xml_char(*c)).collect();
    escape(kept.as_str()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_rounds_and_trims() {
        assert_eq!(Num(12.0).to_string(), "12");
        assert_eq!(Num(12.345_6).to_string(), "12.35");
        assert_eq!(Num(-0.001).to_string(), "0");
        assert_eq!(Num(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_linear_gradient_markup() {
        let grad = linear_gradient(
            "g",
            (0, 0),
            (100, 100),
            &[Stop::new(0, "red"), Stop::with_opacity(100, "blue", 0.3)],
        );
        assert_eq!(
            grad,
            r#"<linearGradient id="g" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" stop-color="red"/><stop offset="100%" stop-color="blue" stop-opacity="0.3"/></linearGradient>"#
        );
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("A&B <C>"), "A&amp;B &lt;C&gt;");
    }

    #[test]
    fn test_escape_text_drops_non_xml_chars() {
        assert_eq!(escape_text("a\u{0}b"), "ab");
        assert_eq!(escape_text("x\u{1}y\u{8}"), "xy");
        assert_eq!(escape_text("\u{FFFE}<\u{FFFF}"), "&lt;");
        assert_eq!(escape_text("tab\there"), "tab\there");
        assert!(!is_xml_char('\u{1F}'));
        assert!(is_xml_char('\u{1F600}'));
    }
}
