//! Connectome Access - dataset loading for connectome tutorials
//!
//! Resolves dataset artifacts (neuron metadata, edge lists, synapse tables,
//! skeletons) under a local or `gs://` data root, reads them into Polars
//! DataFrames, and keeps a local mirror of remote tables in a cache directory.

pub mod config;
pub mod data;
pub mod error;
pub mod neuron;
pub mod report;
pub mod store;

pub use config::AccessConfig;
pub use data::{fetch_table, resolve, DataAccess, DatasetRef, FetchOptions, FileKind};
pub use error::{AccessError, ErrorKind, Result};
pub use store::{Credentials, GcsClient, ObjectInfo, ObjectStore};
