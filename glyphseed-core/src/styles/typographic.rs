//! Typographic: a seed-derived letter over a background shape.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::{RenderContext, StyleRenderer};
use crate::color::Mode;
use crate::svg::{rotate, Num};

/// Normalized complexity above which the polygon backdrop becomes possible.
pub const POLYGON_THRESHOLD: f64 = 0.6;

pub const FONT_STACK: &str = "system-ui, -apple-system, sans-serif";

/// `A`..`Z` picked by `seed mod 26`.
pub fn seed_letter(seed: u32) -> char {
    char::from(b'A' + (seed % 26) as u8)
}

pub struct TypographicStyle;

impl StyleRenderer for TypographicStyle {
    fn name(&self) -> &'static str {
        "typographic"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut rng = ctx.rng();
        let dials = ctx.dials;
        let center = ctx.center();
        let fill = ctx.fill();
        let transform = rotate(dials.rotation, center, center);

        let letter_size = ctx.size * ctx.spec.scale_factor * 0.5 * (0.85 + dials.size_variation * 0.3);
        let backdrop = letter_size * (0.65 + dials.size_variation * 0.1);

        let shape = if dials.complexity > POLYGON_THRESHOLD {
            rng.int(0, 2)
        } else {
            rng.int(0, 1)
        };

        let background = match shape {
            0 => format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}" opacity="0.9" transform="{}"/>"#,
                Num(center), Num(center), Num(backdrop), fill, transform
            ),
            1 => format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" opacity="0.9" transform="{}"/>"#,
                Num(center - backdrop), Num(center - backdrop),
                Num(backdrop * 2.0), Num(backdrop * 2.0), Num(letter_size * 0.2), fill, transform
            ),
            _ => {
                let sides = 6 + (dials.complexity * 2.0).floor() as usize;
                let points: Vec<String> = (0..sides)
                    .map(|i| {
                        let angle = i as f64 / sides as f64 * TAU - FRAC_PI_2 + dials.rotation_radians();
                        format!(
                            "{},{}",
                            Num(center + angle.cos() * backdrop),
                            Num(center + angle.sin() * backdrop)
                        )
                    })
                    .collect();
                format!(
                    r#"<polygon points="{}" fill="{}" opacity="0.9"/>"#,
                    points.join(" "),
                    fill
                )
            }
        };

        let text_color = match ctx.mode {
            Mode::Light => "hsl(0, 0%, 100%)",
            Mode::Dark => "hsl(0, 0%, 95%)",
        };
        let font_size = letter_size * 0.8;
        let baseline = center + font_size * 0.35;

        format!(
            r#"{}{}<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="bold" fill="{}" text-anchor="middle" dominant-baseline="middle" transform="{}">{}</text>"#,
            ctx.linear_defs(),
            background,
            Num(center),
            Num(baseline),
            FONT_STACK,
            Num(font_size),
            text_color,
            rotate(dials.rotation, center, baseline),
            seed_letter(ctx.spec.seed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Overrides, Symmetry};
    use crate::styles::test_support::{count, spec_with};

    #[test]
    fn test_seed_letter() {
        assert_eq!(seed_letter(0), 'A');
        assert_eq!(seed_letter(25), 'Z');
        assert_eq!(seed_letter(26), 'A');
        // 424242 = 26 * 16317
        assert_eq!(seed_letter(424_242), 'A');
        assert_eq!(seed_letter(16), 'Q');
    }

    #[test]
    fn test_letter_rendered() {
        let spec = spec_with(4, Symmetry::None, Overrides::default());
        let out = TypographicStyle.render(&RenderContext::new(&spec, 128, Mode::Light, "Ignored"));
        assert!(out.contains(">A</text>"));
        assert!(out.contains(r#"fill="hsl(0, 0%, 100%)""#));
    }

    #[test]
    fn test_low_complexity_never_draws_polygon() {
        for seed in 0..200 {
            let mut spec = spec_with(4, Symmetry::None, Overrides {
                complexity: Some(60.0),
                ..Default::default()
            });
            spec.seed = seed;
            let out = TypographicStyle.render(&RenderContext::new(&spec, 64, Mode::Dark, ""));
            assert_eq!(count(&out, "<polygon"), 0);
        }
    }

    #[test]
    fn test_polygon_sides_at_full_complexity() {
        let seeds = (0..200u32).map(|k| k.wrapping_mul(2_654_435_761));
        let polygon = seeds.into_iter().find_map(|seed| {
            let mut spec = spec_with(4, Symmetry::None, Overrides {
                complexity: Some(100.0),
                ..Default::default()
            });
            spec.seed = seed;
            let out = TypographicStyle.render(&RenderContext::new(&spec, 64, Mode::Dark, ""));
            out.contains("<polygon").then_some(out)
        });
        let out = polygon.expect("some seed picks the polygon backdrop");
        let start = out.find(r#"points=""#).unwrap() + 8;
        let end = start + out[start..].find('"').unwrap();
        // 6 + floor(1.0 * 2) = 8 sides
        assert_eq!(out[start..end].split(' ').count(), 8);
    }
}
