//! GlyphSeed Core - Deterministic App Icon Engine
//!
//! # Guarantees
//! 1. Same name and dials, same icon, on every host
//! 2. Dials never move the base design
//! 3. The engine never fails on any input; out-of-range dials are clamped
//! 4. Every exported document is validated markup
//! 5. Manifests enable reproduction

pub mod hashing;
pub mod rng;
pub mod spec;
pub mod color;
pub mod svg;
pub mod styles;
pub mod compose;
pub mod validation;
pub mod profiles;
pub mod pipeline;

pub use hashing::{hash_name, compute_manifest_hash, compute_job_hash, canonical_json};
pub use rng::SeededGenerator;
pub use spec::{DesignSpec, Dials, Overrides, Symmetry};
pub use color::{gradient_stops, hsl_color, Mode};
pub use styles::{builtin_styles, RenderContext, StyleRenderer};
pub use compose::{display_text, CornerRadius, RenderDispatcher, Variant};
pub use validation::{MarkupValidator, MarkupViolation, ValidationResult, ViolationSeverity};
pub use profiles::{ExportProfile, ExportSize, ProfileRegistry};
pub use pipeline::{ExportManifest, ExportRequest, IconPipeline, IconTarget, PipelineError, VerifyReport};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the spec for a name and compose one icon document.
///
/// Convenience for callers that do not need profiles or validation.
pub fn render_icon(
    app_name: &str,
    overrides: &Overrides,
    variant: Variant,
    mode: Mode,
    size: u32,
    corner: CornerRadius,
) -> String {
    let spec = DesignSpec::build(app_name, overrides);
    RenderDispatcher::default().compose_icon(app_name, variant, mode, size, &spec, corner)
}
