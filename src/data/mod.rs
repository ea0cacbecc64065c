//! Data module - dataset paths, table loading and the local mirror cache

mod cache;
mod facade;
mod loader;
mod paths;

pub use cache::{cache_key, CacheDir, CacheLayout, DEFAULT_CACHE_DIR};
pub use facade::{fetch_table, fetch_table_with_progress, DataAccess, FetchOptions};
pub use loader::{TableFormat, TableReader};
pub use paths::{dataset_family, resolve, DatasetRef, FileKind};
