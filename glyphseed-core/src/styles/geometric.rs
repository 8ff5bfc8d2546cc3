//! Geometric: one primitive, centered or repeated around a ring.

use std::f64::consts::TAU;

use super::{RenderContext, StyleRenderer};
use crate::spec::Symmetry;
use crate::svg::{rotate, Num};

const SIN_60: f64 = 0.866;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Circle,
    Square,
    Triangle,
}

pub struct GeometricStyle;

impl StyleRenderer for GeometricStyle {
    fn name(&self) -> &'static str {
        "geometric"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut rng = ctx.rng();
        let dials = ctx.dials;
        let center = ctx.center();
        let fill = ctx.fill();
        let base_size = ctx.size * ctx.spec.scale_factor * 0.4;

        let shape = match rng.int(0, 2) {
            0 => Shape::Circle,
            1 => Shape::Square,
            _ => Shape::Triangle,
        };
        let adjusted_count = ((f64::from(ctx.spec.element_count) * (0.7 + dials.complexity * 0.6))
            .floor() as usize)
            .clamp(2, 8);

        let mut shapes = Vec::new();
        if ctx.spec.symmetry == Symmetry::Radial {
            let count = adjusted_count.min(6);
            let step = TAU / count as f64;
            let ring = base_size * 0.6;
            let spread = 0.5 + dials.size_variation * 0.5;
            for i in 0..count {
                let angle = step * i as f64 + dials.rotation_radians();
                let x = center + angle.cos() * ring;
                let y = center + angle.sin() * ring;
                let jitter = 0.7 + (i % 3) as f64 * 0.1 * spread;
                let transform = (dials.rotation != 0.0).then(|| rotate(dials.rotation, x, y));
                shapes.push(primitive(shape, x, y, base_size * 0.3 * jitter, 0.3, &fill, 0.9, transform));
            }
            let hub = base_size * 0.4 * (1.0 + dials.size_variation * 0.3);
            shapes.push(format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}" opacity="0.95" transform="{}"/>"#,
                Num(center),
                Num(center),
                Num(hub),
                fill,
                rotate(dials.rotation, center, center)
            ));
        } else {
            let main = base_size * (1.0 + dials.size_variation * 0.2);
            let transform = (dials.rotation != 0.0).then(|| rotate(dials.rotation, center, center));
            shapes.push(primitive(shape, center, center, main, 0.2, &fill, 0.95, transform));
        }

        format!("{}{}", ctx.linear_defs(), shapes.concat())
    }
}

#[allow(clippy::too_many_arguments)]
fn primitive(
    shape: Shape,
    x: f64,
    y: f64,
    r: f64,
    corner: f64,
    fill: &str,
    opacity: f64,
    transform: Option<String>,
) -> String {
    let transform = transform
        .map(|t| format!(r#" transform="{}""#, t))
        .unwrap_or_default();
    match shape {
        Shape::Circle => format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" opacity="{}"{}/>"#,
            Num(x), Num(y), Num(r), fill, Num(opacity), transform
        ),
        Shape::Square => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" opacity="{}"{}/>"#,
            Num(x - r), Num(y - r), Num(r * 2.0), Num(r * 2.0), Num(r * corner), fill, Num(opacity), transform
        ),
        Shape::Triangle => format!(
            r#"<polygon points="{},{} {},{} {},{}" fill="{}" opacity="{}"{}/>"#,
            Num(x), Num(y - r),
            Num(x - r * SIN_60), Num(y + r * 0.5),
            Num(x + r * SIN_60), Num(y + r * 0.5),
            fill, Num(opacity), transform
        ),
    }
}
