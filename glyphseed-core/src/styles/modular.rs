//! Modular: a square grid of dots and diamonds.

use super::{RenderContext, StyleRenderer};
use crate::svg::{rotate, Num};

/// Cell inclusion pattern, drawn once per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pattern {
    /// Stripes running parallel to the main diagonal, every third cell.
    Diagonal,
    Checkerboard,
    /// Cells within a density-scaled distance of the grid center.
    CenterOut,
}

impl Pattern {
    fn from_index(index: i64) -> Self {
        match index {
            0 => Pattern::Diagonal,
            1 => Pattern::Checkerboard,
            _ => Pattern::CenterOut,
        }
    }

    /// Structural part of the inclusion rule, before the density draw.
    fn admits(self, i: usize, j: usize, grid: usize, density: f64) -> bool {
        match self {
            Pattern::Diagonal => (i as i64 - j as i64).rem_euclid(3) == 0,
            Pattern::Checkerboard => (i + j) % 2 == 0,
            Pattern::CenterOut => {
                let half = grid as f64 / 2.0;
                let dist = (i as f64 - half).hypot(j as f64 - half);
                dist < grid as f64 * (0.4 + density * 0.4)
            }
        }
    }

    /// Whether admitted cells are further thinned by a random draw.
    fn is_thinned(self) -> bool {
        !matches!(self, Pattern::CenterOut)
    }
}

pub struct ModularStyle;

impl StyleRenderer for ModularStyle {
    fn name(&self) -> &'static str {
        "modular"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut rng = ctx.rng();
        let dials = ctx.dials;
        let fill = ctx.fill();

        let grid = 3 + (dials.complexity * 4.0).floor() as usize;
        let cell = ctx.size / grid as f64;
        let base_dot = cell * (0.2 + dials.pattern_density * 0.3);
        let threshold = 0.3 + dials.pattern_density * 0.5;
        let pattern = Pattern::from_index(rng.int(0, 2));

        let mut shapes = Vec::new();
        for i in 0..grid {
            for j in 0..grid {
                let admitted = pattern.admits(i, j, grid, dials.pattern_density);
                // The draw only happens for admitted cells.
                let included = if pattern.is_thinned() {
                    admitted && rng.next() < threshold
                } else {
                    admitted
                };
                if !included {
                    continue;
                }

                let x = i as f64 * cell + cell / 2.0;
                let y = j as f64 * cell + cell / 2.0;
                let multiplier = 0.7 + dials.size_variation * 0.6 + rng.next() * 0.2;
                let dot = base_dot * multiplier;
                let is_circle = rng.int(0, 1) == 0;
                let jitter = dials.rotation_radians() + (rng.next() * 0.3 - 0.15);
                let degrees = jitter.to_degrees();

                if is_circle {
                    shapes.push(format!(
                        r#"<circle cx="{}" cy="{}" r="{}" fill="{}" opacity="0.9" transform="{}"/>"#,
                        Num(x), Num(y), Num(dot / 2.0), fill, rotate(degrees, x, y)
                    ));
                } else {
                    let half = dot / 2.0;
                    shapes.push(format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" transform="{}" fill="{}" opacity="0.9"/>"#,
                        Num(x - half), Num(y - half), Num(dot), Num(dot), Num(dot * 0.2),
                        rotate(45.0 + degrees, x, y), fill
                    ));
                }
            }
        }

        format!("{}{}", ctx.linear_defs(), shapes.concat())
    }
}
