//! Organic: soft blobs built from jittered polar vertices.

use std::f64::consts::TAU;

use super::{RenderContext, StyleRenderer};
use crate::rng::SeededGenerator;
use crate::svg::{rotate, Num};

/// Normalized complexity above which the secondary blob is drawn.
pub const SECONDARY_BLOB_THRESHOLD: f64 = 0.3;

pub struct OrganicStyle;

impl StyleRenderer for OrganicStyle {
    fn name(&self) -> &'static str {
        "organic"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut rng = ctx.rng();
        let dials = ctx.dials;
        let center = ctx.center();
        let fill = ctx.fill();

        let base_radius = ctx.size * ctx.spec.scale_factor * (0.3 + dials.complexity * 0.1);
        let vertices = 6 + (dials.complexity * 6.0).floor() as usize;

        let primary = blob_path(&mut rng, ctx, (center, center), vertices, |rng| {
            base_radius * (0.7 + dials.size_variation * 0.6 + rng.next() * 0.2)
        });

        let mut paths = format!(
            r#"<path d="{}" fill="{}" opacity="0.95"/>"#,
            primary, fill
        );

        if dials.complexity > SECONDARY_BLOB_THRESHOLD {
            let radius = base_radius * (0.5 + dials.size_variation * 0.2);
            let spread = base_radius * 0.3;
            let dx = rng.range(-spread, spread);
            let dy = rng.range(-spread, spread);
            let secondary = blob_path(&mut rng, ctx, (center + dx, center + dy), vertices, |rng| {
                radius * (0.8 + dials.size_variation * 0.4 + rng.next() * 0.1)
            });
            paths.push_str(&format!(
                r#"<path d="{}" fill="{}" opacity="0.7"/>"#,
                secondary, fill
            ));
        }

        format!(
            r#"{}<g transform="{}">{}</g>"#,
            ctx.radial_defs(false),
            rotate(dials.rotation, center, center),
            paths
        )
    }
}

/// Closed polygon path: `vertices + 1` points so the outline meets itself.
fn blob_path(
    rng: &mut SeededGenerator,
    ctx: &RenderContext<'_>,
    origin: (f64, f64),
    vertices: usize,
    mut radius: impl FnMut(&mut SeededGenerator) -> f64,
) -> String {
    let mut parts = Vec::with_capacity(vertices + 2);
    for i in 0..=vertices {
        let angle = i as f64 / vertices as f64 * TAU + ctx.dials.rotation_radians();
        let r = radius(&mut *rng);
        let x = origin.0 + angle.cos() * r;
        let y = origin.1 + angle.sin() * r;
        let command = if i == 0 { "M" } else { "L" };
        parts.push(format!("{} {} {}", command, Num(x), Num(y)));
    }
    parts.push("Z".to_string());
    parts.join(" ")
}
