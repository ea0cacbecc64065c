#![allow(dead_code)]

use connectome_access::{AccessError, ObjectInfo, ObjectStore, Result};
use polars::prelude::*;
use std::cell::Cell;
use std::collections::HashMap;
use std::io::{Cursor, Read};

/// In-memory object store that counts every call.
#[derive(Default)]
pub struct CountingStore {
    objects: HashMap<String, Vec<u8>>,
    pub opens: Cell<usize>,
    pub infos: Cell<usize>,
    pub fail_info: bool,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.objects.insert(path.to_string(), bytes);
        self
    }

    pub fn calls(&self) -> usize {
        self.opens.get() + self.infos.get()
    }
}

impl ObjectStore for CountingStore {
    fn open(&self, path: &str) -> Result<Box<dyn Read>> {
        self.opens.set(self.opens.get() + 1);
        match self.objects.get(path) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            None => Err(AccessError::Remote {
                location: path.to_string(),
                message: "404 Not Found".to_string(),
            }),
        }
    }

    fn info(&self, path: &str) -> Result<ObjectInfo> {
        self.infos.set(self.infos.get() + 1);
        if self.fail_info {
            return Err(AccessError::Remote {
                location: path.to_string(),
                message: "403 Forbidden".to_string(),
            });
        }
        match self.objects.get(path) {
            Some(bytes) => Ok(ObjectInfo {
                size: Some(bytes.len() as u64),
                content_type: None,
            }),
            None => Err(AccessError::Remote {
                location: path.to_string(),
                message: "404 Not Found".to_string(),
            }),
        }
    }
}

pub fn edges() -> DataFrame {
    df!(
        "pre" => [720575940i64, 720575941, 720575942, 720575943],
        "post" => [720575941i64, 720575942, 720575943, 720575940],
        "count" => [12i32, 5, 3, 41],
        "neuropil" => ["AL_L", "AL_R", "LH_L", "MB_CA_R"]
    )
    .unwrap()
}

pub fn feather_bytes(df: &DataFrame) -> Vec<u8> {
    let mut buf = Vec::new();
    IpcWriter::new(&mut buf).finish(&mut df.clone()).unwrap();
    buf
}

pub fn parquet_bytes(df: &DataFrame) -> Vec<u8> {
    let mut buf = Vec::new();
    ParquetWriter::new(&mut buf).finish(&mut df.clone()).unwrap();
    buf
}

pub fn files_under(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return files;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            files.extend(files_under(&path));
        } else {
            files.push(path);
        }
    }
    files
}
