//! Style Renderers - Procedural Foreground Compositions
//!
//! Each style turns a `DesignSpec` into an SVG fragment: its own `<defs>`
//! followed by shapes. Renderers are pure; each one seeds a private
//! generator from `spec.seed` so adding a style never shifts another
//! style's output or the spec draws.

mod abstract_style;
mod geometric;
mod modular;
mod organic;
mod typographic;
mod waves;

pub use abstract_style::AbstractStyle;
pub use geometric::GeometricStyle;
pub use modular::ModularStyle;
pub use organic::OrganicStyle;
pub use typographic::{seed_letter, TypographicStyle, FONT_STACK};
pub use waves::GradientWavesStyle;

use crate::color::{gradient_stops, Mode};
use crate::rng::SeededGenerator;
use crate::spec::{DesignSpec, Dials};
use crate::svg::{linear_gradient, radial_gradient, Stop};

/// Everything a style needs for one render call.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub spec: &'a DesignSpec,
    pub size: f64,
    pub mode: Mode,
    pub display_name: &'a str,
    pub dials: Dials,
}

impl<'a> RenderContext<'a> {
    pub fn new(spec: &'a DesignSpec, size: u32, mode: Mode, display_name: &'a str) -> Self {
        Self {
            spec,
            size: f64::from(size.max(1)),
            mode,
            display_name,
            dials: spec.dials(),
        }
    }

    pub fn center(&self) -> f64 {
        self.size / 2.0
    }

    /// Fresh generator for this render; never shared across calls.
    pub fn rng(&self) -> SeededGenerator {
        SeededGenerator::new(self.spec.seed)
    }

    /// Style gradient id, namespaced by seed and mode.
    pub fn gradient_id(&self) -> String {
        format!("grad-{}-{}", self.spec.seed, self.mode)
    }

    pub fn fill(&self) -> String {
        format!("url(#{})", self.gradient_id())
    }

    /// Diagonal two-stop gradient used by most styles.
    pub fn linear_defs(&self) -> String {
        let stops = gradient_stops(self.spec, self.mode);
        let gradient = linear_gradient(
            &self.gradient_id(),
            (0, 0),
            (100, 100),
            &[Stop::new(0, &stops[0]), Stop::new(100, &stops[1])],
        );
        format!("<defs>{}</defs>", gradient)
    }

    /// Centered radial gradient; `fade` appends a translucent outer stop.
    pub fn radial_defs(&self, fade: bool) -> String {
        let stops = gradient_stops(self.spec, self.mode);
        let gradient = if fade {
            radial_gradient(
                &self.gradient_id(),
                &[
                    Stop::new(0, &stops[0]),
                    Stop::new(70, &stops[1]),
                    Stop::with_opacity(100, &stops[1], 0.3),
                ],
            )
        } else {
            radial_gradient(
                &self.gradient_id(),
                &[Stop::new(0, &stops[0]), Stop::new(100, &stops[1])],
            )
        };
        format!("<defs>{}</defs>", gradient)
    }
}

/// A foreground style. Implementations must be pure.
pub trait StyleRenderer: Send + Sync {
    fn name(&self) -> &'static str;
    fn render(&self, ctx: &RenderContext<'_>) -> String;
}

/// The six built-in styles in `styleIndex` order.
pub fn builtin_styles() -> Vec<Box<dyn StyleRenderer>> {
    vec![
        Box::new(GeometricStyle),
        Box::new(ModularStyle),
        Box::new(OrganicStyle),
        Box::new(GradientWavesStyle),
        Box::new(TypographicStyle),
        Box::new(AbstractStyle),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::spec::{DesignSpec, Overrides, Symmetry};

    pub fn spec_with(style_index: usize, symmetry: Symmetry, overrides: Overrides) -> DesignSpec {
        DesignSpec {
            primary_hue: 210.0,
            secondary_hue: 300.0,
            saturation: 65.0,
            lightness: 55.0,
            dark_lightness: 28.0,
            style_index,
            symmetry,
            element_count: 5,
            scale_factor: 0.75,
            seed: 424_242,
            overrides,
        }
    }

    pub fn count(markup: &str, needle: &str) -> usize {
        markup.matches(needle).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Overrides, Symmetry};

    #[test]
    fn test_registry_order() {
        let names: Vec<_> = builtin_styles().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            ["geometric", "modular", "organic", "gradient-waves", "typographic", "abstract"]
        );
    }

    #[test]
    fn test_gradient_id_is_namespaced() {
        let spec = test_support::spec_with(0, Symmetry::None, Overrides::default());
        let light = RenderContext::new(&spec, 64, Mode::Light, "x");
        let dark = RenderContext::new(&spec, 64, Mode::Dark, "x");
        assert_eq!(light.gradient_id(), "grad-424242-light");
        assert_ne!(light.gradient_id(), dark.gradient_id());
    }

    #[test]
    fn test_every_style_defines_its_gradient_once() {
        let spec = test_support::spec_with(0, Symmetry::Radial, Overrides::default());
        let ctx = RenderContext::new(&spec, 256, Mode::Light, "Aura");
        for style in builtin_styles() {
            let out = style.render(&ctx);
            assert_eq!(
                test_support::count(&out, r#"id="grad-424242-light""#),
                1,
                "style {}",
                style.name()
            );
        }
    }
}
