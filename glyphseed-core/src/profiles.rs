//! Export Profiles - Platform Size Tables
//!
//! A profile names the sizes an icon set is exported at and the mask shape
//! used for them. `ios` and `android` are built in; extra profiles are JSON
//! files loaded from a directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::compose::CornerRadius;

pub type ProfileId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportProfile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub profile_version: String,
    pub engine_min_version: String,
    pub platform: Platform,
    #[serde(default)]
    pub corner: CornerRadius,
    pub sizes: Vec<ExportSize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportSize {
    pub label: String,
    pub size: u32,
}

impl ExportSize {
    pub fn new(label: &str, size: u32) -> Self {
        Self { label: label.to_string(), size }
    }
}

pub fn ios_profile() -> ExportProfile {
    ExportProfile {
        id: "ios".to_string(),
        name: "iOS".to_string(),
        description: "App Store and home screen icon sizes".to_string(),
        profile_version: "1.0.0".to_string(),
        engine_min_version: "1.0.0".to_string(),
        platform: Platform::Ios,
        corner: CornerRadius::Squircle,
        sizes: vec![
            ExportSize::new("AppStore", 1024),
            ExportSize::new("180px", 180),
            ExportSize::new("120px", 120),
            ExportSize::new("87px", 87),
            ExportSize::new("60px", 60),
            ExportSize::new("40px", 40),
            ExportSize::new("29px", 29),
        ],
    }
}

pub fn android_profile() -> ExportProfile {
    ExportProfile {
        id: "android".to_string(),
        name: "Android".to_string(),
        description: "Play Store, adaptive and launcher icon sizes".to_string(),
        profile_version: "1.0.0".to_string(),
        engine_min_version: "1.0.0".to_string(),
        platform: Platform::Android,
        corner: CornerRadius::Circle,
        sizes: vec![
            ExportSize::new("PlayStore", 512),
            ExportSize::new("AdaptiveFG", 432),
            ExportSize::new("AdaptiveBG", 432),
            ExportSize::new("48dp", 48),
            ExportSize::new("36dp", 36),
            ExportSize::new("24dp", 24),
        ],
    }
}

/// Profile registry - built-ins plus profiles loaded from disk
pub struct ProfileRegistry {
    profiles: BTreeMap<ProfileId, ExportProfile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self { profiles: BTreeMap::new() }
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ios_profile());
        registry.register(android_profile());
        registry
    }

    /// Built-ins plus every `*.json` profile in `dir`.
    ///
    /// A missing directory is not an error. Files that cannot be read or
    /// parsed are skipped with a warning; a file may replace a built-in.
    pub fn load_from_dir(dir: &Path) -> Result<Self, std::io::Error> {
        let mut registry = Self::with_builtin();
        if dir.exists() {
            for entry in fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().map_or(false, |e| e == "json") {
                    let parsed = fs::read_to_string(&path)
                        .map_err(|e| e.to_string())
                        .and_then(|content| {
                            serde_json::from_str::<ExportProfile>(&content).map_err(|e| e.to_string())
                        });
                    match parsed {
                        Ok(profile) => {
                            debug!(id = %profile.id, path = %path.display(), "loaded profile");
                            registry.register(profile);
                        }
                        Err(e) => warn!(path = %path.display(), error = %e, "skipping profile"),
                    }
                }
            }
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&ExportProfile> {
        self.profiles.get(id)
    }

    pub fn list(&self) -> Vec<&ExportProfile> {
        self.profiles.values().collect()
    }

    pub fn register(&mut self, profile: ExportProfile) {
        self.profiles.insert(profile.id.clone(), profile);
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
