//! Icon Composition - Dispatch and Full Documents
//!
//! Every composed icon stacks the same layers: gradient background, glass
//! overlay, blurred top highlight, then the foreground (a dispatched style
//! for `logo`, the name or its initials for `name`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use crate::color::{gradient_stops, hsl_color, Mode};
use crate::spec::DesignSpec;
use crate::styles::{builtin_styles, RenderContext, StyleRenderer, FONT_STACK};
use crate::svg::{escape_text, linear_gradient, radial_gradient, Num, Stop};

/// iOS-style continuous corner, as a fraction of the icon size.
pub const SQUIRCLE_RATIO: f64 = 0.2237;
/// Names longer than this render as initials.
pub const MAX_FULL_NAME_CHARS: usize = 6;
pub const NAME_FONT_RATIO: f64 = 0.22;
pub const GLOW_BLUR_RATIO: f64 = 0.04;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Logo,
    Name,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Logo, Variant::Name];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Logo => "logo",
            Variant::Name => "name",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid corner radius '{0}': expected squircle, circle, square or a percentage like 18%")]
pub struct CornerParseError(pub String);

/// Mask shape of the background, mapped to a corner radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CornerRadius {
    Squircle,
    Circle,
    Square,
    /// Percentage of the icon size, clamped to `[0, 50]`.
    Percent(f64),
}

impl CornerRadius {
    pub fn fraction(&self) -> f64 {
        match self {
            CornerRadius::Squircle => SQUIRCLE_RATIO,
            CornerRadius::Circle => 0.5,
            CornerRadius::Square => 0.0,
            CornerRadius::Percent(p) if p.is_finite() => p.clamp(0.0, 50.0) / 100.0,
            CornerRadius::Percent(_) => SQUIRCLE_RATIO,
        }
    }

    pub fn radius(&self, size: f64) -> f64 {
        size * self.fraction()
    }
}

impl Default for CornerRadius {
    fn default() -> Self {
        Self::Squircle
    }
}

impl FromStr for CornerRadius {
    type Err = CornerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "squircle" => Ok(Self::Squircle),
            "circle" => Ok(Self::Circle),
            "square" => Ok(Self::Square),
            other => other
                .strip_suffix('%')
                .and_then(|p| p.trim().parse::<f64>().ok())
                .filter(|p| p.is_finite())
                .map(Self::Percent)
                .ok_or_else(|| CornerParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for CornerRadius {
    type Error = CornerParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CornerRadius> for String {
    fn from(value: CornerRadius) -> Self {
        value.to_string()
    }
}

impl fmt::Display for CornerRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CornerRadius::Squircle => f.write_str("squircle"),
            CornerRadius::Circle => f.write_str("circle"),
            CornerRadius::Square => f.write_str("square"),
            CornerRadius::Percent(p) => write!(f, "{}%", p),
        }
    }
}

/// Text shown by the `name` variant.
///
/// Short names (up to six chars after trimming) are shown verbatim. Longer
/// ones collapse to the upper-cased first chars of the first two
/// whitespace-separated words.
pub fn display_text(app_name: &str) -> String {
    let name = app_name.trim();
    if name.chars().count() <= MAX_FULL_NAME_CHARS {
        return name.to_string();
    }
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Selects a style by `styleIndex mod n` and composes full icon documents.
pub struct RenderDispatcher {
    styles: Vec<Box<dyn StyleRenderer>>,
}

impl RenderDispatcher {
    pub fn new(styles: Vec<Box<dyn StyleRenderer>>) -> Self {
        if styles.is_empty() {
            warn!("empty style list supplied, using built-in styles");
            return Self::default();
        }
        Self { styles }
    }

    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    pub fn select(&self, spec: &DesignSpec) -> &dyn StyleRenderer {
        self.styles[spec.style_index % self.styles.len()].as_ref()
    }

    /// Foreground fragment of the dispatched style.
    pub fn render_style(&self, spec: &DesignSpec, size: u32, mode: Mode, display_name: &str) -> String {
        let style = self.select(spec);
        debug!(style = style.name(), seed = spec.seed, size, %mode, "rendering style");
        style.render(&RenderContext::new(spec, size, mode, display_name))
    }

    /// Full `size x size` SVG document for one variant and mode.
    pub fn compose_icon(
        &self,
        app_name: &str,
        variant: Variant,
        mode: Mode,
        size: u32,
        spec: &DesignSpec,
        corner: CornerRadius,
    ) -> String {
        let size = size.max(1);
        let s = f64::from(size);
        let ns = format!("{}-{}", spec.seed, mode);
        let radius = corner.radius(s);

        let foreground = match variant {
            Variant::Logo => self.render_style(spec, size, mode, app_name),
            Variant::Name => name_text(app_name, s, &ns),
        };

        let mut defs = chrome_defs(spec, mode, s, radius, &ns);
        if variant == Variant::Name {
            defs.push_str(&text_gradient(spec, mode, &ns));
        }

        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
                "<defs>{defs}</defs>",
                r#"<rect width="{size}" height="{size}" rx="{r}" ry="{r}" fill="url(#bg-{ns})"/>"#,
                r#"<g clip-path="url(#clip-{ns})">"#,
                r#"<rect width="{size}" height="{size}" fill="url(#glass-{ns})"/>"#,
                r#"<ellipse cx="{gx}" cy="{gy}" rx="{grx}" ry="{gry}" fill="url(#glow-{ns})" filter="url(#blur-{ns})"/>"#,
                r#"<g class="foreground">{foreground}</g>"#,
                "</g></svg>"
            ),
            size = size,
            defs = defs,
            r = Num(radius),
            ns = ns,
            gx = Num(s * 0.5),
            gy = Num(s * (0.08 + 0.175)),
            grx = Num(s * 0.35),
            gry = Num(s * 0.175),
            foreground = foreground,
        )
    }
}

impl Default for RenderDispatcher {
    fn default() -> Self {
        Self { styles: builtin_styles() }
    }
}

fn chrome_defs(spec: &DesignSpec, mode: Mode, s: f64, radius: f64, ns: &str) -> String {
    let stops = gradient_stops(spec, mode);
    // Reversed diagonal so foreground shapes read against the background.
    let background = linear_gradient(
        &format!("bg-{}", ns),
        (100, 100),
        (0, 0),
        &[Stop::new(0, &stops[0]), Stop::new(100, &stops[1])],
    );

    let (top, bottom) = match mode {
        Mode::Light => (0.25, 0.05),
        Mode::Dark => (0.06, 0.15),
    };
    let white = hsl_color(0.0, 0.0, 100.0);
    let black = hsl_color(0.0, 0.0, 0.0);
    let glass = linear_gradient(
        &format!("glass-{}", ns),
        (0, 0),
        (0, 100),
        &[
            Stop::with_opacity(0, &white, top),
            Stop::with_opacity(50, &white, 0.0),
            Stop::with_opacity(100, &black, bottom),
        ],
    );

    let (glow_color, glow_alpha) = match mode {
        Mode::Light => (white.clone(), 0.2),
        Mode::Dark => (hsl_color(220.0, 70.0, 70.0), 0.08),
    };
    let glow = radial_gradient(
        &format!("glow-{}", ns),
        &[
            Stop::with_opacity(0, &glow_color, glow_alpha),
            Stop::with_opacity(100, &glow_color, 0.0),
        ],
    );

    format!(
        concat!(
            "{}{}{}",
            r#"<filter id="blur-{ns}" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="{blur}"/></filter>"#,
            r#"<clipPath id="clip-{ns}"><rect width="{s}" height="{s}" rx="{r}" ry="{r}"/></clipPath>"#
        ),
        background,
        glass,
        glow,
        ns = ns,
        blur = Num(s * GLOW_BLUR_RATIO),
        s = Num(s),
        r = Num(radius),
    )
}

/// Text fill distinct from the background gradient.
fn text_gradient(spec: &DesignSpec, mode: Mode, ns: &str) -> String {
    let (from, to) = match mode {
        Mode::Light => (hsl_color(0.0, 0.0, 100.0), hsl_color(0.0, 0.0, 90.0)),
        Mode::Dark => (
            hsl_color(spec.primary_hue, 80.0, 75.0),
            hsl_color(spec.secondary_hue, 60.0, 70.0),
        ),
    };
    linear_gradient(
        &format!("text-{}", ns),
        (0, 0),
        (100, 100),
        &[Stop::new(0, &from), Stop::new(100, &to)],
    )
}

fn name_text(app_name: &str, s: f64, ns: &str) -> String {
    format!(
        r#"<text x="{c}" y="{c}" font-family="{font}" font-size="{fs}" font-weight="bold" fill="url(#text-{ns})" text-anchor="middle" dominant-baseline="central">{text}</text>"#,
        c = Num(s / 2.0),
        font = FONT_STACK,
        fs = Num(s * NAME_FONT_RATIO),
        ns = ns,
        text = escape_text(&display_text(app_name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Overrides;

    #[test]
    fn test_display_text_short_name() {
        assert_eq!(display_text("Aura"), "Aura");
        assert_eq!(display_text("  Notes  "), "Notes");
        assert_eq!(display_text("Sixsix"), "Sixsix");
    }

    #[test]
    fn test_display_text_initials() {
        assert_eq!(display_text("Super Duper App"), "SD");
        assert_eq!(display_text("calendar"), "C");
        assert_eq!(display_text("my   spaced  app"), "MS");
    }

    #[test]
    fn test_corner_parse() {
        assert_eq!("squircle".parse(), Ok(CornerRadius::Squircle));
        assert_eq!("Circle".parse(), Ok(CornerRadius::Circle));
        assert_eq!("18%".parse(), Ok(CornerRadius::Percent(18.0)));
        assert!("round".parse::<CornerRadius>().is_err());
        assert!("NaN%".parse::<CornerRadius>().is_err());
    }

    #[test]
    fn test_corner_radius_values() {
        assert!((CornerRadius::Squircle.radius(1000.0) - 223.7).abs() < 1e-9);
        assert_eq!(CornerRadius::Circle.radius(64.0), 32.0);
        assert_eq!(CornerRadius::Percent(80.0).radius(100.0), 50.0);
    }

    #[test]
    fn test_corner_serde_as_string() {
        let json = serde_json::to_string(&CornerRadius::Percent(12.5)).unwrap();
        assert_eq!(json, r#""12.5%""#);
        let back: CornerRadius = serde_json::from_str(r#""circle""#).unwrap();
        assert_eq!(back, CornerRadius::Circle);
    }

    #[test]
    fn test_dispatch_wraps_style_index() {
        let dispatcher = RenderDispatcher::default();
        let mut spec = DesignSpec::build("Aura", &Overrides::default());
        spec.style_index = 9;
        assert_eq!(dispatcher.select(&spec).name(), "gradient-waves");
    }

    #[test]
    fn test_empty_dispatcher_falls_back() {
        let dispatcher = RenderDispatcher::new(Vec::new());
        assert_eq!(dispatcher.style_count(), 6);
    }

    #[test]
    fn test_compose_name_variant() {
        let spec = DesignSpec::build("Aura", &Overrides::default());
        let svg = RenderDispatcher::default().compose_icon(
            "Aura",
            Variant::Name,
            Mode::Light,
            180,
            &spec,
            CornerRadius::Squircle,
        );
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="180" height="180""#));
        assert!(svg.contains(">Aura</text>"));
        assert!(svg.contains(r#"id="text-2090090766-light""#));
        assert!(!svg.contains("grad-2090090766"));
    }

    #[test]
    fn test_compose_escapes_name() {
        let spec = DesignSpec::build("A&B", &Overrides::default());
        let svg = RenderDispatcher::default().compose_icon(
            "A&B",
            Variant::Name,
            Mode::Dark,
            64,
            &spec,
            CornerRadius::Circle,
        );
        assert!(svg.contains(">A&amp;B</text>"));
    }

    #[test]
    fn test_compose_drops_control_characters_from_name() {
        let validator = crate::validation::MarkupValidator::new();
        for (name, shown) in [("a\u{0}b", ">ab</text>"), ("x\u{1}y", ">xy</text>"), ("Ab\u{8}", ">Ab</text>")] {
            let spec = DesignSpec::build(name, &Overrides::default());
            let svg = RenderDispatcher::default().compose_icon(
                name,
                Variant::Name,
                Mode::Light,
                128,
                &spec,
                CornerRadius::Squircle,
            );
            assert!(svg.contains(shown), "{:?}", name);
            assert!(svg.chars().all(crate::svg::is_xml_char), "{:?}", name);
            let result = validator.validate(&svg, 128);
            assert!(result.valid, "{:?}: {:?}", name, result.violations);
        }
    }

    #[test]
    fn test_display_text_threshold_counts_trimmed_chars() {
        // Padding does not count toward the six-character limit, and
        // lengths are measured in chars, not UTF-16 units.
        assert_eq!(display_text(" Aura  "), "Aura");
        assert_eq!(display_text("\u{1F600}\u{1F600}\u{1F600}\u{1F600}"), "\u{1F600}\u{1F600}\u{1F600}\u{1F600}");
        assert_eq!(display_text("Seven C"), "SC");
    }
}
