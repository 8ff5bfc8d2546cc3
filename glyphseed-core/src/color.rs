//! Color Model - HSL strings and gradient stops

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::spec::DesignSpec;

/// Second-stop lightness relative to the first.
pub const SECOND_STOP_DARKEN: f64 = 0.7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Light, Mode::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format an HSL triple with every component rounded to an integer.
pub fn hsl_color(hue: f64, saturation: f64, lightness: f64) -> String {
    format!(
        "hsl({}, {}%, {}%)",
        hue.round() as i64,
        saturation.round() as i64,
        lightness.round() as i64
    )
}

/// Saturation after the vibrancy dial. Neutral vibrancy returns it unchanged.
pub fn effective_saturation(spec: &DesignSpec) -> f64 {
    let vibrancy = spec.dials().vibrancy;
    (spec.saturation * (0.5 + vibrancy)).clamp(0.0, 100.0)
}

/// Two-stop gradient: primary hue at the mode's lightness, then the
/// secondary hue at 70% of that lightness.
pub fn gradient_stops(spec: &DesignSpec, mode: Mode) -> [String; 2] {
    let lightness = match mode {
        Mode::Light => spec.lightness,
        Mode::Dark => spec.dark_lightness,
    };
    let saturation = effective_saturation(spec);
    [
        hsl_color(spec.primary_hue, saturation, lightness),
        hsl_color(spec.secondary_hue, saturation, lightness * SECOND_STOP_DARKEN),
    ]
}
