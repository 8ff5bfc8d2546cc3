//! Abstract: layered pie wedges under translucent offset circles.

use std::f64::consts::{PI, TAU};

use super::{RenderContext, StyleRenderer};
use crate::svg::Num;

pub struct AbstractStyle;

impl StyleRenderer for AbstractStyle {
    fn name(&self) -> &'static str {
        "abstract"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let dials = ctx.dials;
        let center = ctx.center();
        let fill = ctx.fill();
        let rotation = dials.rotation_radians();

        let base_radius = ctx.size * ctx.spec.scale_factor * (0.35 + dials.size_variation * 0.1);
        let wedges = 2 + (dials.complexity * 4.0).floor() as usize;
        let spacing = 0.15 + dials.pattern_density * 0.15;
        let span = PI * (1.3 + dials.pattern_density * 0.4);

        let mut shapes = Vec::new();
        for i in 0..wedges {
            let step = i as f64;
            let radius = base_radius
                * (0.6 + step * spacing + dials.size_variation * 0.1 * (step / wedges as f64));
            let start = step * TAU / wedges as f64 + rotation;
            let end = start + span;
            shapes.push(format!(
                r#"<path d="M {c} {c} L {} {} A {r} {r} 0 1 1 {} {} Z" fill="{}" opacity="{}"/>"#,
                Num(center + start.cos() * radius),
                Num(center + start.sin() * radius),
                Num(center + end.cos() * radius),
                Num(center + end.sin() * radius),
                fill,
                Num(0.8 - step * 0.1),
                c = Num(center),
                r = Num(radius),
            ));
        }

        let circles = if dials.complexity > 0.5 { 3 } else { 2 };
        let offset = base_radius * (0.25 + dials.size_variation * 0.15);
        let circle_radius = base_radius * (0.4 + dials.size_variation * 0.2);
        for i in 0..circles {
            let angle = i as f64 * TAU / circles as f64 + rotation;
            shapes.push(format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}" opacity="{}"/>"#,
                Num(center + angle.cos() * offset),
                Num(center + angle.sin() * offset),
                Num(circle_radius),
                fill,
                Num(0.6 - i as f64 * 0.1)
            ));
        }

        format!("{}{}", ctx.linear_defs(), shapes.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Mode;
    use crate::spec::{Overrides, Symmetry};
    use crate::styles::test_support::{count, spec_with};

    fn render(complexity: f64) -> String {
        let spec = spec_with(5, Symmetry::None, Overrides {
            complexity: Some(complexity),
            ..Default::default()
        });
        AbstractStyle.render(&RenderContext::new(&spec, 256, Mode::Light, ""))
    }

    #[test]
    fn test_wedge_and_circle_counts() {
        let low = render(0.0);
        assert_eq!(count(&low, "<path"), 2);
        assert_eq!(count(&low, "<circle"), 2);

        let high = render(100.0);
        assert_eq!(count(&high, "<path"), 6);
        assert_eq!(count(&high, "<circle"), 3);
    }

    #[test]
    fn test_wedges_fade_out() {
        let out = render(100.0);
        assert!(out.contains(r#"opacity="0.8""#));
        assert!(out.contains(r#"opacity="0.3""#));
    }
}
