//! Store module - remote object access
//!
//! Remote locations look like `scheme://bucket/key`. The scheme is stripped
//! before a path is handed to an [`ObjectStore`], which only sees `bucket/key`.

mod gcs;

pub use gcs::{Credentials, GcsClient};

use crate::error::{AccessError, Result};
use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use url::Url;

/// Size of one read from a remote stream.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Metadata reported by a store for one object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectInfo {
    pub size: Option<u64>,
    pub content_type: Option<String>,
}

/// Byte-level access to an object store.
pub trait ObjectStore {
    /// Open `path` (`bucket/key`) for streaming reads.
    fn open(&self, path: &str) -> Result<Box<dyn Read>>;

    /// Metadata for `path`.
    fn info(&self, path: &str) -> Result<ObjectInfo>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for &S {
    fn open(&self, path: &str) -> Result<Box<dyn Read>> {
        (**self).open(path)
    }

    fn info(&self, path: &str) -> Result<ObjectInfo> {
        (**self).info(path)
    }
}

impl<S: ObjectStore + ?Sized> ObjectStore for Box<S> {
    fn open(&self, path: &str) -> Result<Box<dyn Read>> {
        (**self).open(path)
    }

    fn info(&self, path: &str) -> Result<ObjectInfo> {
        (**self).info(path)
    }
}

/// A parsed `scheme://bucket/key` location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath<'a> {
    scheme: &'a str,
    rest: &'a str,
}

impl<'a> RemotePath<'a> {
    /// Returns `None` for local paths, including `file://` URLs.
    pub fn parse(location: &'a str) -> Option<Self> {
        let (scheme, rest) = location.split_once("://")?;
        let valid_scheme = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid_scheme || scheme.eq_ignore_ascii_case("file") {
            return None;
        }
        Some(Self { scheme, rest })
    }

    pub fn scheme(&self) -> &'a str {
        self.scheme
    }

    /// `bucket/key`, as passed to an [`ObjectStore`].
    pub fn without_scheme(&self) -> &'a str {
        self.rest
    }

    pub fn bucket(&self) -> &'a str {
        self.rest.split('/').next().unwrap_or(self.rest)
    }

    pub fn key(&self) -> &'a str {
        self.rest.split_once('/').map(|(_, key)| key).unwrap_or("")
    }
}

pub fn is_remote(location: &str) -> bool {
    RemotePath::parse(location).is_some()
}

/// Filesystem path of a local location; `file://` URLs are converted.
pub fn local_path(location: &str) -> Result<PathBuf> {
    let is_file_url = location
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("file://"));
    if !is_file_url {
        return Ok(PathBuf::from(location));
    }
    Url::parse(location)
        .map_err(|e| AccessError::InvalidArgument(format!("invalid file URL {location}: {e}")))?
        .to_file_path()
        .map_err(|_| AccessError::InvalidArgument(format!("{location} is not a local file path")))
}

/// Read `reader` to the end in [`CHUNK_SIZE`] pieces.
///
/// `on_progress` receives `(bytes_so_far, total)` after every chunk, but only
/// when `total` is known.
pub fn read_chunked(
    reader: &mut dyn Read,
    total: Option<u64>,
    location: &str,
    on_progress: &mut dyn FnMut(u64, u64),
) -> Result<Vec<u8>> {
    let mut chunks: Vec<Vec<u8>> = Vec::new();
    let mut done = 0u64;
    loop {
        let mut chunk = vec![0u8; CHUNK_SIZE];
        let mut filled = 0;
        while filled < CHUNK_SIZE {
            match reader.read(&mut chunk[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(AccessError::io(location, e)),
            }
        }
        if filled == 0 {
            break;
        }
        chunk.truncate(filled);
        done += filled as u64;
        chunks.push(chunk);
        if let Some(total) = total {
            on_progress(done, total);
        }
        if filled < CHUNK_SIZE {
            break;
        }
    }
    Ok(chunks.concat())
}

/// Fetch a whole object into memory.
pub fn fetch_binary(client: &dyn ObjectStore, path: &str) -> Result<Vec<u8>> {
    let mut reader = client.open(path)?;
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| AccessError::io(path, e))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_gs_location() {
        let remote = RemotePath::parse("gs://sjcabs_2025_data/banc/banc_746_meta.feather").unwrap();
        assert_eq!(remote.scheme(), "gs");
        assert_eq!(remote.bucket(), "sjcabs_2025_data");
        assert_eq!(remote.key(), "banc/banc_746_meta.feather");
        assert_eq!(
            remote.without_scheme(),
            "sjcabs_2025_data/banc/banc_746_meta.feather"
        );
    }

    #[test]
    fn local_paths_are_not_remote() {
        assert!(!is_remote("/data/banc/banc_746_meta.feather"));
        assert!(!is_remote("data/banc_746_meta.feather"));
        assert!(!is_remote("file:///data/x.feather"));
        assert!(is_remote("s3://bucket/x.parquet"));
    }

    #[test]
    #[cfg(unix)]
    fn file_urls_become_paths() {
        assert_eq!(
            local_path("file:///data/banc/banc_746_meta.feather").unwrap(),
            PathBuf::from("/data/banc/banc_746_meta.feather")
        );
        assert_eq!(
            local_path("FILE:///data/a%20b.parquet").unwrap(),
            PathBuf::from("/data/a b.parquet")
        );
        assert_eq!(local_path("data/x.feather").unwrap(), PathBuf::from("data/x.feather"));
        assert!(local_path("file://remotehost/x.feather").is_err());
    }

    #[test]
    fn chunked_read_reports_cumulative_progress() {
        let data = vec![7u8; CHUNK_SIZE * 2 + 10];
        let mut reader = Cursor::new(data.clone());
        let mut seen = Vec::new();
        let out = read_chunked(&mut reader, Some(data.len() as u64), "mem", &mut |done, total| {
            seen.push((done, total))
        })
        .unwrap();
        assert_eq!(out, data);
        let total = data.len() as u64;
        assert_eq!(
            seen,
            vec![
                (CHUNK_SIZE as u64, total),
                (2 * CHUNK_SIZE as u64, total),
                (total, total)
            ]
        );
    }

    #[test]
    fn chunked_read_without_size_is_silent() {
        let mut reader = Cursor::new(b"abc".to_vec());
        let mut calls = 0;
        let out = read_chunked(&mut reader, None, "mem", &mut |_, _| calls += 1).unwrap();
        assert_eq!(out, b"abc");
        assert_eq!(calls, 0);
    }
}
