//! Runtime configuration loaded from the environment or a JSON file.

use crate::data::{CacheLayout, DEFAULT_CACHE_DIR};
use crate::error::{AccessError, Result};
use crate::store::{is_remote, Credentials};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_ROOT: &str = "gs://sjcabs_2025_data";

/// Snapshot of the settings a [`crate::DataAccess`] works with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub data_root: String,
    pub cache_dir: PathBuf,
    pub use_cache: bool,
    pub cache_layout: CacheLayout,
    #[serde(
        serialize_with = "serialize_credentials",
        deserialize_with = "deserialize_credentials"
    )]
    pub credentials: Credentials,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            data_root: DEFAULT_DATA_ROOT.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            use_cache: true,
            cache_layout: CacheLayout::Flat,
            credentials: Credentials::GoogleDefault,
        }
    }
}

impl AccessConfig {
    /// Create a configuration snapshot from the process environment.
    ///
    /// Unset variables fall back to the defaults.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(root) = lookup("CONNECTOME_DATA_ROOT") {
            cfg.data_root = root.trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup("CONNECTOME_CACHE_DIR") {
            cfg.cache_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("CONNECTOME_USE_CACHE") {
            cfg.use_cache = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off" | ""
            );
        }
        if let Some(layout) = lookup("CONNECTOME_CACHE_LAYOUT") {
            cfg.cache_layout = layout.parse()?;
        }
        if let Some(token) = lookup("CONNECTOME_GCS_TOKEN") {
            cfg.credentials = token.parse()?;
        }
        Ok(cfg)
    }

    /// Read a JSON configuration file; missing fields take the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| AccessError::io(&display, e))?;
        serde_json::from_str(&text).map_err(|e| AccessError::parse(display, e))
    }

    pub fn uses_remote(&self) -> bool {
        is_remote(&self.data_root)
    }
}

fn serialize_credentials<S: Serializer>(creds: &Credentials, s: S) -> std::result::Result<S::Ok, S::Error> {
    match creds {
        Credentials::GoogleDefault => s.serialize_str("google_default"),
        Credentials::Anonymous => s.serialize_str("anon"),
        Credentials::Token(token) => s.serialize_str(token),
    }
}

fn deserialize_credentials<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Credentials, D::Error> {
    let raw = String::deserialize(d)?;
    raw.parse::<Credentials>().map_err(serde::de::Error::custom)
}
