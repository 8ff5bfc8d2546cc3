//! Design Specs - Deterministic Icon Parameters
//!
//! A `DesignSpec` is a pure function of `(app name, overrides)`. The base
//! parameters come from a seeded draw sequence; overrides are dials layered on
//! top that never perturb those draws.

use serde::{Deserialize, Serialize};

use crate::hashing::hash_name;
use crate::rng::SeededGenerator;

pub const HUE_SPREAD: (f64, f64) = (60.0, 120.0);
pub const SATURATION_RANGE: (f64, f64) = (50.0, 85.0);
pub const LIGHTNESS_RANGE: (f64, f64) = (45.0, 65.0);
pub const DARK_LIGHTNESS_RANGE: (f64, f64) = (20.0, 35.0);
pub const ELEMENT_COUNT_RANGE: (i64, i64) = (2, 8);
pub const SCALE_FACTOR_RANGE: (f64, f64) = (0.6, 0.9);
pub const STYLE_COUNT: usize = 6;

/// Neutral value of the percentage dials.
pub const DIAL_DEFAULT: f64 = 50.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Symmetry {
    Radial,
    Diagonal,
    Horizontal,
    Vertical,
    None,
}

impl Symmetry {
    pub const ALL: [Symmetry; 5] = [
        Symmetry::Radial,
        Symmetry::Diagonal,
        Symmetry::Horizontal,
        Symmetry::Vertical,
        Symmetry::None,
    ];
}

/// Caller-supplied dials. Every field is independently optional.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Overrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibrancy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_variation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_density: Option<f64>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Clamp every dial into its documented interval.
    ///
    /// Non-finite values become unset. Percentage dials clamp to `[0, 100]`;
    /// rotation wraps into `[0, 360)`.
    pub fn sanitized(&self) -> Self {
        Self {
            vibrancy: clamp_percent(self.vibrancy),
            complexity: clamp_percent(self.complexity),
            size_variation: clamp_percent(self.size_variation),
            rotation: wrap_degrees(self.rotation),
            pattern_density: clamp_percent(self.pattern_density),
        }
    }
}

fn clamp_percent(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 100.0))
}

fn wrap_degrees(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(|v| {
        let wrapped = v.rem_euclid(360.0);
        // rem_euclid can round up to the modulus for tiny negatives
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    })
}

/// Overrides with defaults applied, normalized for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dials {
    /// `[0, 1]`
    pub vibrancy: f64,
    /// `[0, 1]`
    pub complexity: f64,
    /// `[0, 1]`
    pub size_variation: f64,
    /// `[0, 1]`
    pub pattern_density: f64,
    /// Degrees in `[0, 360)`.
    pub rotation: f64,
}

impl Dials {
    /// `resolve(x) = x ?? 50` (rotation: `x ?? 0`), applied to sanitized overrides.
    pub fn resolve(overrides: &Overrides) -> Self {
        let o = overrides.sanitized();
        Self {
            vibrancy: o.vibrancy.unwrap_or(DIAL_DEFAULT) / 100.0,
            complexity: o.complexity.unwrap_or(DIAL_DEFAULT) / 100.0,
            size_variation: o.size_variation.unwrap_or(DIAL_DEFAULT) / 100.0,
            pattern_density: o.pattern_density.unwrap_or(DIAL_DEFAULT) / 100.0,
            rotation: o.rotation.unwrap_or(0.0),
        }
    }

    pub fn rotation_radians(&self) -> f64 {
        self.rotation.to_radians()
    }
}

impl Default for Dials {
    fn default() -> Self {
        Self::resolve(&Overrides::default())
    }
}

/// The single source of truth for one icon's appearance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DesignSpec {
    pub primary_hue: f64,
    pub secondary_hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub dark_lightness: f64,
    pub style_index: usize,
    pub symmetry: Symmetry,
    pub element_count: u32,
    pub scale_factor: f64,
    pub seed: u32,
    #[serde(default)]
    pub overrides: Overrides,
}

impl DesignSpec {
    /// Build the spec for an app name.
    ///
    /// The name is lower-cased and trimmed before hashing, so `" Aura "` and
    /// `"AURA"` produce the same design. Passing `Overrides::default()` leaves
    /// every dial unset.
    pub fn build(app_name: &str, overrides: &Overrides) -> Self {
        let normalized = app_name.trim().to_lowercase();
        let seed = hash_name(&normalized);
        let mut rng = SeededGenerator::new(seed);

        let primary_hue = rng.range(0.0, 360.0);
        let secondary_hue = (primary_hue + rng.range(HUE_SPREAD.0, HUE_SPREAD.1)) % 360.0;
        let saturation = rng.range(SATURATION_RANGE.0, SATURATION_RANGE.1);
        let lightness = rng.range(LIGHTNESS_RANGE.0, LIGHTNESS_RANGE.1);
        let dark_lightness = rng.range(DARK_LIGHTNESS_RANGE.0, DARK_LIGHTNESS_RANGE.1);

        let style_index = rng.int(0, STYLE_COUNT as i64 - 1) as usize;
        let symmetry = *rng.pick(&Symmetry::ALL);
        let element_count = rng.int(ELEMENT_COUNT_RANGE.0, ELEMENT_COUNT_RANGE.1) as u32;
        let scale_factor = rng.range(SCALE_FACTOR_RANGE.0, SCALE_FACTOR_RANGE.1);

        Self {
            primary_hue,
            secondary_hue,
            saturation,
            lightness,
            dark_lightness,
            style_index,
            symmetry,
            element_count,
            scale_factor,
            seed,
            overrides: overrides.sanitized(),
        }
    }

    /// Resolved dials for renderers.
    pub fn dials(&self) -> Dials {
        Dials::resolve(&self.overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_is_deterministic() {
        let a = DesignSpec::build("Notes", &Overrides::default());
        let b = DesignSpec::build("Notes", &Overrides::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_name_uses_base_seed() {
        let spec = DesignSpec::build("   ", &Overrides::default());
        assert_eq!(spec.seed, 5381);
        assert_eq!(spec.style_index, 0);
    }

    #[test]
    fn test_overrides_do_not_move_base_draws() {
        let plain = DesignSpec::build("Aura", &Overrides::default());
        let tuned = DesignSpec::build("Aura", &Overrides {
            complexity: Some(90.0),
            rotation: Some(45.0),
            ..Default::default()
        });
        assert_eq!(plain.primary_hue, tuned.primary_hue);
        assert_eq!(plain.style_index, tuned.style_index);
        assert_eq!(plain.scale_factor, tuned.scale_factor);
        assert_eq!(tuned.overrides.complexity, Some(90.0));
    }

    #[test]
    fn test_sanitize_clamps_and_wraps() {
        let o = Overrides {
            vibrancy: Some(150.0),
            complexity: Some(-3.0),
            size_variation: Some(f64::NAN),
            rotation: Some(-90.0),
            pattern_density: Some(f64::INFINITY),
        }
        .sanitized();
        assert_eq!(o.vibrancy, Some(100.0));
        assert_eq!(o.complexity, Some(0.0));
        assert_eq!(o.size_variation, None);
        assert_eq!(o.rotation, Some(270.0));
        assert_eq!(o.pattern_density, None);
    }

    #[test]
    fn test_rotation_full_turn_wraps_to_zero() {
        let o = Overrides { rotation: Some(720.0), ..Default::default() }.sanitized();
        assert_eq!(o.rotation, Some(0.0));
    }

    #[test]
    fn test_dials_defaults() {
        let d = Dials::default();
        assert_eq!(d.complexity, 0.5);
        assert_eq!(d.size_variation, 0.5);
        assert_eq!(d.pattern_density, 0.5);
        assert_eq!(d.vibrancy, 0.5);
        assert_eq!(d.rotation, 0.0);
    }

    #[test]
    fn test_spec_json_is_camel_case() {
        let spec = DesignSpec::build("Aura", &Overrides::default());
        let json = serde_json::to_value(&spec).unwrap();
        assert!(json.get("primaryHue").is_some());
        assert!(json.get("darkLightness").is_some());
        assert_eq!(json["symmetry"], "diagonal");
        assert_eq!(json["overrides"], serde_json::json!({}));
    }
}
