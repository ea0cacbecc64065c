//! Local Mirror Cache Module
//! Maps remote locations to files under a cache directory.
//!
//! Validity is existence only: a cached file is never compared against the
//! remote object, never updated in place and never deleted here.

use super::loader::{TableFormat, TableReader};
use crate::error::{AccessError, Result};
use crate::store::RemotePath;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// How a remote location is laid out under the cache directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheLayout {
    /// `bucket/dir/file` becomes `bucket_dir_file`.
    #[default]
    Flat,
    /// `bucket/dir/file` is kept as nested directories.
    Nested,
}

impl FromStr for CacheLayout {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(CacheLayout::Flat),
            "nested" => Ok(CacheLayout::Nested),
            other => Err(AccessError::InvalidArgument(format!(
                "Unknown cache layout: {other}. Choose: flat, nested"
            ))),
        }
    }
}

/// Cache key for a remote location: the scheme is stripped and, for the flat
/// layout, every `/` becomes `_`.
///
/// The flat form is not injective (`a/b_c` and `a_b/c` share a key); use
/// [`CacheLayout::Nested`] where that matters.
pub fn cache_key(remote: &RemotePath<'_>, layout: CacheLayout) -> String {
    let stripped = remote.without_scheme();
    match layout {
        CacheLayout::Flat => stripped.replace('/', "_"),
        CacheLayout::Nested => stripped
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
            .collect::<Vec<_>>()
            .join("/"),
    }
}

/// A cache directory on local disk. Created lazily on first write.
#[derive(Debug, Clone)]
pub struct CacheDir {
    root: PathBuf,
    layout: CacheLayout,
}

impl CacheDir {
    pub fn new(root: impl Into<PathBuf>, layout: CacheLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, remote: &RemotePath<'_>) -> PathBuf {
        self.root.join(cache_key(remote, self.layout))
    }

    /// Path of a cached copy of `remote`, if one exists.
    pub fn lookup(&self, remote: &RemotePath<'_>) -> Option<PathBuf> {
        let path = self.entry_path(remote);
        path.is_file().then_some(path)
    }

    /// Persist `df` as the cached copy of `remote`.
    ///
    /// Written to a temporary file in the target directory and renamed into
    /// place, so readers never see a partial file. Concurrent writers of the
    /// same key race and the last rename wins.
    pub fn store_table(
        &self,
        remote: &RemotePath<'_>,
        df: &mut DataFrame,
        format: TableFormat,
    ) -> Result<PathBuf> {
        let path = self.entry_path(remote);
        let parent = path.parent().unwrap_or(&self.root).to_path_buf();
        let parent_shown = parent.display().to_string();
        fs::create_dir_all(&parent).map_err(|e| AccessError::io(&parent_shown, e))?;

        let mut temp =
            tempfile::NamedTempFile::new_in(&parent).map_err(|e| AccessError::io(&parent_shown, e))?;
        let shown = path.display().to_string();
        TableReader::write(temp.as_file_mut(), df, format)
            .map_err(|e| AccessError::from_polars(&shown, e))?;
        temp.persist(&path)
            .map_err(|e| AccessError::io(&shown, e.error))?;

        tracing::info!(path = %shown, "cached table");
        Ok(path)
    }
}
