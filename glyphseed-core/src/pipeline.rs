//! Export Pipeline - Single Entry Point
//!
//! Every rendered document goes through the markup validator before it is
//! returned or written. There is no bypass.

use base64::Engine as _;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::color::Mode;
use crate::compose::{CornerRadius, RenderDispatcher, Variant};
use crate::hashing::{compute_job_hash, compute_manifest_hash, sha256_hex};
use crate::profiles::{ExportProfile, ProfileRegistry};
use crate::spec::{DesignSpec, Overrides};
use crate::validation::{MarkupValidator, ValidationResult};
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Profile version {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("Manifest was produced by engine {0}, which is not compatible with {1}")]
    IncompatibleManifest(String, String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Decode error: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One document in an export plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconTarget {
    pub variant: Variant,
    pub mode: Mode,
    pub size: u32,
}

fn all_variants() -> Vec<Variant> {
    Variant::ALL.to_vec()
}

fn all_modes() -> Vec<Mode> {
    Mode::ALL.to_vec()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub app_name: String,
    pub profile_id: String,
    #[serde(default)]
    pub overrides: Overrides,
    #[serde(default = "all_variants")]
    pub variants: Vec<Variant>,
    #[serde(default = "all_modes")]
    pub modes: Vec<Mode>,
    /// Replaces the profile's mask shape when set.
    #[serde(default)]
    pub corner: Option<CornerRadius>,
}

impl ExportRequest {
    pub fn new(app_name: &str, profile_id: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            profile_id: profile_id.to_string(),
            overrides: Overrides::default(),
            variants: all_variants(),
            modes: all_modes(),
            corner: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub id: String,
    pub filename: String,
    pub label: String,
    #[serde(flatten)]
    pub target: IconTarget,
    pub data_base64: String,
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportManifest {
    pub id: String,
    pub app_name: String,
    pub profile_id: String,
    pub profile_version: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub style: String,
    pub corner: CornerRadius,
    pub overrides: Overrides,
    pub spec: DesignSpec,
    pub manifest_hash: String,
    pub job_hash: String,
    pub files: Vec<ExportedFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileMismatch {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
    pub manifest_id: String,
    pub spec_matches: bool,
    pub manifest_hash_matches: bool,
    pub checked: usize,
    pub mismatches: Vec<FileMismatch>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.spec_matches && self.manifest_hash_matches && self.mismatches.is_empty()
    }
}

/// `{name}-{variant}-{mode}-{size}px.svg`, with every char of the trimmed
/// name that is not ASCII alphanumeric replaced by `-`.
pub fn export_filename(app_name: &str, target: &IconTarget) -> String {
    let sanitized: String = app_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!("{}-{}-{}-{}px.svg", sanitized, target.variant, target.mode, target.size)
}

/// The export pipeline - single entry point for icon generation
pub struct IconPipeline {
    registry: ProfileRegistry,
    dispatcher: RenderDispatcher,
    validator: MarkupValidator,
}

impl IconPipeline {
    pub fn new(registry: ProfileRegistry) -> Self {
        Self::with_dispatcher(registry, RenderDispatcher::default())
    }

    pub fn with_dispatcher(registry: ProfileRegistry, dispatcher: RenderDispatcher) -> Self {
        Self {
            registry,
            dispatcher,
            validator: MarkupValidator::new(),
        }
    }

    /// List all available profiles
    pub fn list_profiles(&self) -> Vec<&ExportProfile> {
        self.registry.list()
    }

    /// Get a specific profile
    pub fn get_profile(&self, id: &str) -> Option<&ExportProfile> {
        self.registry.get(id)
    }

    pub fn dispatcher(&self) -> &RenderDispatcher {
        &self.dispatcher
    }

    /// Validate a rendered document
    ///
    /// This is the ONLY validation entry point.
    pub fn validate_markup(&self, markup: &str, size: u32) -> ValidationResult {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.validator.validate(markup, size)
    }

    /// Compose and validate one icon document.
    pub fn render_icon(
        &self,
        app_name: &str,
        spec: &DesignSpec,
        target: IconTarget,
        corner: CornerRadius,
    ) -> Result<String, PipelineError> {
        let markup = self.dispatcher.compose_icon(
            app_name,
            target.variant,
            target.mode,
            target.size,
            spec,
            corner,
        );

        let validation = self.validate_markup(&markup, target.size.max(1));
        if !validation.valid {
            return Err(PipelineError::ValidationFailed(
                validation.error_messages().join("; "),
            ));
        }

        Ok(markup)
    }

    /// Sizes x (variant, mode) in table order, without repeated file names.
    pub fn export_plan(&self, profile: &ExportProfile, request: &ExportRequest) -> Vec<(String, IconTarget)> {
        let mut seen = BTreeSet::new();
        let mut plan = vec![];

        for &variant in &request.variants {
            for &mode in &request.modes {
                for entry in &profile.sizes {
                    let target = IconTarget { variant, mode, size: entry.size.max(1) };
                    if seen.insert(export_filename(&request.app_name, &target)) {
                        plan.push((entry.label.clone(), target));
                    } else {
                        debug!(label = %entry.label, size = entry.size, "skipping duplicate export size");
                    }
                }
            }
        }

        plan
    }

    /// Render every entry of the request's profile and build a manifest
    pub fn export(&self, request: &ExportRequest) -> Result<ExportManifest, PipelineError> {
        let profile = self.registry.get(&request.profile_id)
            .ok_or_else(|| PipelineError::ProfileNotFound(request.profile_id.clone()))?;

        self.check_engine_version(profile)?;

        let spec = DesignSpec::build(&request.app_name, &request.overrides);
        let corner = request.corner.unwrap_or(profile.corner);
        let plan = self.export_plan(profile, request);
        info!(
            app = %request.app_name,
            profile = %profile.id,
            seed = spec.seed,
            entries = plan.len(),
            "exporting icon set"
        );

        let files = plan
            .par_iter()
            .map(|(label, target)| -> Result<ExportedFile, PipelineError> {
                let markup = self.render_icon(&request.app_name, &spec, *target, corner)?;
                let filename = export_filename(&request.app_name, target);
                Ok(ExportedFile {
                    id: filename.trim_end_matches(".svg").to_string(),
                    filename,
                    label: label.clone(),
                    target: *target,
                    data_base64: base64::engine::general_purpose::STANDARD.encode(markup.as_bytes()),
                    hash: sha256_hex(markup.as_bytes()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let job_hash = compute_job_hash(
            &profile.id,
            &profile.profile_version,
            request,
            ENGINE_VERSION,
        )?;

        let mut manifest = ExportManifest {
            id: Uuid::new_v4().to_string(),
            app_name: request.app_name.clone(),
            profile_id: profile.id.clone(),
            profile_version: profile.profile_version.clone(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            style: self.dispatcher.select(&spec).name().to_string(),
            corner,
            overrides: spec.overrides,
            spec,
            manifest_hash: String::new(),  // Computed after
            job_hash,
            files,
        };

        manifest.manifest_hash = compute_manifest_hash(&manifest)?;

        Ok(manifest)
    }

    /// Re-render a manifest and compare it against what it recorded.
    pub fn verify(&self, manifest: &ExportManifest) -> Result<VerifyReport, PipelineError> {
        self.check_manifest_engine(manifest)?;

        let spec = DesignSpec::build(&manifest.app_name, &manifest.overrides);
        let spec_matches = spec == manifest.spec;

        let mut unhashed = manifest.clone();
        unhashed.manifest_hash = String::new();
        let manifest_hash_matches = compute_manifest_hash(&unhashed)? == manifest.manifest_hash;

        let mut mismatches = vec![];
        for file in &manifest.files {
            let stored = base64::engine::general_purpose::STANDARD.decode(&file.data_base64)?;
            if sha256_hex(&stored) != file.hash {
                mismatches.push(FileMismatch {
                    filename: file.filename.clone(),
                    reason: "embedded data does not match recorded hash".to_string(),
                });
                continue;
            }

            let markup = self.render_icon(&manifest.app_name, &spec, file.target, manifest.corner)?;
            if sha256_hex(markup.as_bytes()) != file.hash {
                mismatches.push(FileMismatch {
                    filename: file.filename.clone(),
                    reason: "re-rendered markup differs".to_string(),
                });
            }
        }

        debug!(manifest = %manifest.id, mismatches = mismatches.len(), "verified manifest");

        Ok(VerifyReport {
            manifest_id: manifest.id.clone(),
            spec_matches,
            manifest_hash_matches,
            checked: manifest.files.len(),
            mismatches,
        })
    }

    /// Write every file plus `manifest.json` into `dir`.
    pub fn write_export(&self, manifest: &ExportManifest, dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        fs::create_dir_all(dir)?;
        let mut written = vec![];

        for file in &manifest.files {
            let path = dir.join(&file.filename);
            let data = base64::engine::general_purpose::STANDARD.decode(&file.data_base64)?;
            fs::write(&path, data)?;
            written.push(path);
        }

        let manifest_path = dir.join(MANIFEST_FILENAME);
        fs::write(&manifest_path, serde_json::to_string_pretty(manifest)?)?;
        written.push(manifest_path);

        info!(dir = %dir.display(), files = written.len(), "wrote export");
        Ok(written)
    }

    pub fn read_manifest(path: &Path) -> Result<ExportManifest, PipelineError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn check_engine_version(&self, profile: &ExportProfile) -> Result<(), PipelineError> {
        let engine_ver = semver::Version::parse(ENGINE_VERSION)
            .map_err(|_| PipelineError::InvalidVersion(ENGINE_VERSION.to_string()))?;
        let min_ver = semver::Version::parse(&profile.engine_min_version)
            .map_err(|_| PipelineError::InvalidVersion(profile.engine_min_version.clone()))?;

        if engine_ver < min_ver {
            return Err(PipelineError::EngineVersionMismatch(
                profile.profile_version.clone(),
                profile.engine_min_version.clone(),
                ENGINE_VERSION.to_string(),
            ));
        }

        Ok(())
    }

    fn check_manifest_engine(&self, manifest: &ExportManifest) -> Result<(), PipelineError> {
        let engine_ver = semver::Version::parse(ENGINE_VERSION)
            .map_err(|_| PipelineError::InvalidVersion(ENGINE_VERSION.to_string()))?;
        let req = semver::VersionReq::parse(&format!("^{}", manifest.engine_version))
            .map_err(|_| PipelineError::InvalidVersion(manifest.engine_version.clone()))?;

        if !req.matches(&engine_ver) {
            return Err(PipelineError::IncompatibleManifest(
                manifest.engine_version.clone(),
                ENGINE_VERSION.to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for IconPipeline {
    fn default() -> Self {
        Self::new(ProfileRegistry::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename() {
        let target = IconTarget { variant: Variant::Logo, mode: Mode::Dark, size: 180 };
        assert_eq!(export_filename("My App!", &target), "my-app--logo-dark-180px.svg");
        assert_eq!(export_filename(" Aura ", &target), "aura-logo-dark-180px.svg");
    }

    #[test]
    fn test_android_plan_drops_duplicate_size() {
        let pipeline = IconPipeline::default();
        let profile = pipeline.get_profile("android").unwrap();
        let plan = pipeline.export_plan(profile, &ExportRequest::new("Aura", "android"));
        // 5 distinct sizes x 2 variants x 2 modes
        assert_eq!(plan.len(), 20);
        assert!(plan.iter().any(|(label, _)| label == "AdaptiveFG"));
        assert!(!plan.iter().any(|(label, _)| label == "AdaptiveBG"));
    }

    #[test]
    fn test_plan_respects_requested_variants() {
        let pipeline = IconPipeline::default();
        let profile = pipeline.get_profile("ios").unwrap();
        let mut request = ExportRequest::new("Aura", "ios");
        request.variants = vec![Variant::Name];
        request.modes = vec![Mode::Light];
        let plan = pipeline.export_plan(profile, &request);
        assert_eq!(plan.len(), 7);
        assert!(plan.iter().all(|(_, t)| t.variant == Variant::Name && t.mode == Mode::Light));
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: ExportRequest =
            serde_json::from_str(r#"{"appName": "Aura", "profileId": "ios"}"#).unwrap();
        assert_eq!(request.variants.len(), 2);
        assert_eq!(request.modes.len(), 2);
        assert!(request.overrides.is_empty());
        assert!(request.corner.is_none());
    }

    #[test]
    fn test_manifest_engine_compatibility() {
        let pipeline = IconPipeline::default();
        let mut manifest = pipeline.export(&ExportRequest::new("Aura", "ios")).unwrap();
        manifest.engine_version = "0.3.0".to_string();
        let err = pipeline.verify(&manifest).unwrap_err();
        assert!(matches!(err, PipelineError::IncompatibleManifest(_, _)));
    }
}
