//! Data Access Facade
//! Fetches dataset tables from local disk or an object store, mirroring
//! remote tables into a local cache directory.

use super::cache::{CacheDir, CacheLayout, DEFAULT_CACHE_DIR};
use super::loader::{TableFormat, TableReader};
use super::paths::{DatasetRef, FileKind};
use crate::config::AccessConfig;
use crate::error::{AccessError, Result};
use crate::report::format_count;
use crate::store::{local_path, read_chunked, GcsClient, ObjectStore, RemotePath};
use polars::prelude::DataFrame;
use std::path::PathBuf;

/// Per-call options for [`fetch_table`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub cache_dir: PathBuf,
    pub cache_layout: CacheLayout,
    pub use_cache: bool,
    /// Columns returned to the caller. The cached copy always keeps every column.
    pub columns: Option<Vec<String>>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            cache_layout: CacheLayout::default(),
            use_cache: true,
            columns: None,
        }
    }
}

impl FetchOptions {
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }
}

/// Fetch a table from `path`, which is either a local file or a remote location.
///
/// Remote fetches require `client`. With `use_cache`, an existing cached copy
/// is read instead of the remote object; otherwise the object is downloaded in
/// 1 MiB chunks, parsed, and written to the cache in full before returning.
pub fn fetch_table(
    path: &str,
    client: Option<&dyn ObjectStore>,
    options: &FetchOptions,
) -> Result<DataFrame> {
    fetch_table_with_progress(path, client, options, &mut log_progress(path))
}

/// [`fetch_table`] with a caller-supplied progress callback, invoked with
/// `(bytes_so_far, total)` during downloads whose size is known.
pub fn fetch_table_with_progress(
    path: &str,
    client: Option<&dyn ObjectStore>,
    options: &FetchOptions,
    on_progress: &mut dyn FnMut(u64, u64),
) -> Result<DataFrame> {
    let format = TableFormat::from_path(path)?;
    let columns = options.columns.as_deref();

    let Some(remote) = RemotePath::parse(path) else {
        tracing::debug!(path, "reading local table");
        let df = TableReader::read_file(&local_path(path)?, format, columns)?;
        log_loaded(&df);
        return Ok(df);
    };

    let client = client.ok_or_else(|| {
        AccessError::PreconditionFailed(format!(
            "an object store client is required for remote path {path}"
        ))
    })?;

    let cache = CacheDir::new(&options.cache_dir, options.cache_layout);
    if options.use_cache {
        if let Some(cached) = cache.lookup(&remote) {
            tracing::info!(path, cache = %cached.display(), "loading from cache");
            let df = TableReader::read_file(&cached, format, columns)?;
            log_loaded(&df);
            return Ok(df);
        }
    }

    let object = remote.without_scheme();
    let total = match client.info(object) {
        Ok(info) => info.size,
        Err(err) => {
            tracing::warn!(path, error = %err, "size lookup failed; downloading without progress");
            None
        }
    };
    tracing::info!(path, size = ?total, "downloading");
    let mut reader = client.open(object)?;
    let bytes = read_chunked(reader.as_mut(), total, path, on_progress)?;

    let df = if options.use_cache {
        let mut full = TableReader::parse_bytes(bytes, format, None, path)?;
        cache.store_table(&remote, &mut full, format)?;
        match columns {
            Some(columns) => TableReader::project(&full, columns, path)?,
            None => full,
        }
    } else {
        TableReader::parse_bytes(bytes, format, columns, path)?
    };
    log_loaded(&df);
    Ok(df)
}

fn log_loaded(df: &DataFrame) {
    tracing::info!("Loaded {} rows", format_count(df.height()));
}

/// Progress callback that logs at every tenth of the download.
fn log_progress(path: &str) -> impl FnMut(u64, u64) + '_ {
    let mut last_decile = 0;
    move |done, total| {
        let decile = if total == 0 { 10 } else { done * 10 / total };
        if decile > last_decile {
            last_decile = decile;
            tracing::debug!(path, done, total, "{}%", decile * 10);
        }
    }
}

/// Dataset-level access bound to one configuration and, for remote roots, one client.
pub struct DataAccess {
    config: AccessConfig,
    client: Option<Box<dyn ObjectStore>>,
}

impl DataAccess {
    pub fn new(config: AccessConfig, client: Option<Box<dyn ObjectStore>>) -> Self {
        Self { config, client }
    }

    /// Build a GCS client when the data root is remote; local roots need none.
    pub fn connect(config: AccessConfig) -> Result<Self> {
        let client: Option<Box<dyn ObjectStore>> = if config.uses_remote() {
            Some(Box::new(GcsClient::connect(config.credentials.clone())?))
        } else {
            None
        };
        Ok(Self::new(config, client))
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    pub fn client(&self) -> Option<&dyn ObjectStore> {
        self.client.as_deref()
    }

    pub fn path_for(&self, dataset: &str, kind: FileKind) -> String {
        DatasetRef::new(&self.config.data_root, dataset, kind).path(None)
    }

    /// Directory holding a dataset's SWC skeletons.
    pub fn skeleton_dir(&self, dataset: &str, space_suffix: Option<&str>) -> String {
        DatasetRef::new(&self.config.data_root, dataset, FileKind::Skeletons).path(space_suffix)
    }

    fn options(&self, columns: Option<&[String]>) -> FetchOptions {
        FetchOptions {
            cache_dir: self.config.cache_dir.clone(),
            cache_layout: self.config.cache_layout,
            use_cache: self.config.use_cache,
            columns: columns.map(|c| c.to_vec()),
        }
    }

    /// Load a tabular artifact of `dataset`.
    pub fn load(&self, dataset: &str, kind: FileKind, columns: Option<&[String]>) -> Result<DataFrame> {
        if kind == FileKind::Skeletons {
            return Err(AccessError::InvalidArgument(
                "skeletons are a directory of SWC files, not a table; use neuron::read_swc_batch".into(),
            ));
        }
        let path = self.path_for(dataset, kind);
        fetch_table(&path, self.client(), &self.options(columns))
    }

    pub fn load_meta(&self, dataset: &str) -> Result<DataFrame> {
        self.load(dataset, FileKind::Meta, None)
    }

    pub fn load_edgelist(&self, dataset: &str) -> Result<DataFrame> {
        self.load(dataset, FileKind::Edgelist, None)
    }

    pub fn load_simple_edgelist(&self, dataset: &str) -> Result<DataFrame> {
        self.load(dataset, FileKind::EdgelistSimple, None)
    }

    pub fn load_synapses(&self, dataset: &str, columns: Option<&[String]>) -> Result<DataFrame> {
        self.load(dataset, FileKind::Synapses, columns)
    }
}
