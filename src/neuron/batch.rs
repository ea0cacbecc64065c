//! Remote skeleton and mesh readers, single and batched.

use super::mesh::{parse_obj, Mesh};
use super::swc::{parse_swc, TreeNeuron};
use crate::error::{ErrorKind, Result};
use crate::store::{fetch_binary, ObjectStore};
use std::path::Path;

/// Read one SWC file; `path` is `bucket/key` without a scheme.
pub fn read_swc(client: &dyn ObjectStore, path: &str) -> Result<TreeNeuron> {
    let bytes = fetch_binary(client, path)?;
    let neuron = parse_swc(&bytes)?;
    Ok(match file_stem(path) {
        Some(stem) => neuron.with_name(stem),
        None => neuron,
    })
}

/// Read one OBJ mesh; `path` is `bucket/key` without a scheme.
pub fn read_obj(client: &dyn ObjectStore, path: &str) -> Result<Mesh> {
    let bytes = fetch_binary(client, path)?;
    parse_obj(&bytes)
}

/// Fetch and parse `directory/name` for each name, in order.
///
/// Items failing with an I/O or parse error are logged and skipped; any other
/// error aborts the batch.
pub fn fetch_many<T>(
    client: &dyn ObjectStore,
    directory: &str,
    names: &[String],
    show_progress: bool,
    parse: impl Fn(&str, &[u8]) -> Result<T>,
) -> Result<Vec<T>> {
    let directory = directory.trim_end_matches('/');
    let mut items = Vec::with_capacity(names.len());

    for (i, name) in names.iter().enumerate() {
        if show_progress {
            tracing::info!("Reading {}/{}: {name}", i + 1, names.len());
        }
        let path = format!("{directory}/{name}");
        let parsed = fetch_binary(client, &path).and_then(|bytes| parse(name, &bytes));
        match parsed {
            Ok(item) => items.push(item),
            Err(err) if matches!(err.kind(), ErrorKind::IoFailure | ErrorKind::ParseFailure) => {
                if show_progress {
                    tracing::warn!("Error reading {name}: {err}");
                } else {
                    tracing::debug!("Error reading {name}: {err}");
                }
            }
            Err(err) => return Err(err),
        }
    }

    if items.len() < names.len() {
        tracing::info!("Read {} of {} files from {directory}", items.len(), names.len());
    }
    Ok(items)
}

/// Batch-read SWC skeletons under `directory`, skipping unreadable files.
pub fn read_swc_batch(
    client: &dyn ObjectStore,
    directory: &str,
    names: &[String],
    show_progress: bool,
) -> Result<Vec<TreeNeuron>> {
    fetch_many(client, directory, names, show_progress, |name, bytes| {
        let neuron = parse_swc(bytes)?;
        Ok(match file_stem(name) {
            Some(stem) => neuron.with_name(stem),
            None => neuron,
        })
    })
}

fn file_stem(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}
