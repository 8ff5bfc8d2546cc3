//! Gradient waves: concentric stroked rings around a filled disc.

use super::{RenderContext, StyleRenderer};
use crate::svg::{rotate, Num};

pub struct GradientWavesStyle;

impl StyleRenderer for GradientWavesStyle {
    fn name(&self) -> &'static str {
        "gradient-waves"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let dials = ctx.dials;
        let center = ctx.center();
        let fill = ctx.fill();
        let transform = rotate(dials.rotation, center, center);

        let rings = 2 + (dials.complexity * 4.0).floor() as usize;
        let spacing = ctx.size * (0.15 + dials.pattern_density * 0.15);
        let stroke_width = ctx.size * (0.04 + dials.pattern_density * 0.02);

        let mut shapes = Vec::with_capacity(rings + 1);
        for i in 0..rings {
            let progress = i as f64 / rings as f64;
            let radius = ctx.size * 0.25 * (1.0 + dials.size_variation * 0.3 * progress)
                + i as f64 * spacing;
            let opacity = 0.9 - i as f64 * 0.1;
            shapes.push(format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="{}" opacity="{}" transform="{}"/>"#,
                Num(center), Num(center), Num(radius), fill, Num(stroke_width), Num(opacity), transform
            ));
        }

        let disc = ctx.size * (0.2 + dials.size_variation * 0.1);
        shapes.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" opacity="0.95" transform="{}"/>"#,
            Num(center), Num(center), Num(disc), fill, transform
        ));

        format!("{}{}", ctx.radial_defs(true), shapes.concat())
    }
}
