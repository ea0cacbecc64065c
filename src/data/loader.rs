//! Table Loader Module
//! Reads and writes Feather (Arrow IPC) and Parquet tables using Polars.

use crate::error::{AccessError, Result};
use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

/// On-disk table format, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Feather v2 / Arrow IPC file
    Ipc,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("feather") | Some("arrow") | Some("ipc") => Ok(TableFormat::Ipc),
            Some("parquet") => Ok(TableFormat::Parquet),
            _ => Err(AccessError::InvalidArgument(format!(
                "cannot infer table format of {path}; expected .feather, .arrow, .ipc or .parquet"
            ))),
        }
    }
}

/// Stateless table reader/writer.
pub struct TableReader;

impl TableReader {
    /// Parse an in-memory buffer, optionally keeping only `columns`.
    pub fn parse_bytes(
        bytes: Vec<u8>,
        format: TableFormat,
        columns: Option<&[String]>,
        what: &str,
    ) -> Result<DataFrame> {
        let cursor = Cursor::new(bytes);
        Self::read_from(cursor, format, columns).map_err(|e| AccessError::from_polars(what, e))
    }

    /// Read a table from local storage.
    pub fn read_file(path: &Path, format: TableFormat, columns: Option<&[String]>) -> Result<DataFrame> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|e| AccessError::io(&display, e))?;
        Self::read_from(file, format, columns).map_err(|e| AccessError::from_polars(display, e))
    }

    fn read_from<R: MmapBytesReader>(
        reader: R,
        format: TableFormat,
        columns: Option<&[String]>,
    ) -> PolarsResult<DataFrame> {
        let projection = columns.map(|c| c.to_vec());
        let df = match format {
            TableFormat::Ipc => IpcReader::new(reader).with_columns(projection).finish()?,
            TableFormat::Parquet => ParquetReader::new(reader).with_columns(projection).finish()?,
        };
        // Projection may come back in file order
        match columns {
            Some(columns) => df.select(columns.iter().map(|c| c.as_str())),
            None => Ok(df),
        }
    }

    /// Write `df` to `file` in the given format.
    pub fn write(file: &mut File, df: &mut DataFrame, format: TableFormat) -> PolarsResult<()> {
        match format {
            TableFormat::Ipc => IpcWriter::new(file).finish(df),
            TableFormat::Parquet => ParquetWriter::new(file).finish(df).map(|_| ()),
        }
    }

    /// Narrow a full table to `columns`, in the requested order.
    pub fn project(df: &DataFrame, columns: &[String], what: &str) -> Result<DataFrame> {
        df.select(columns.iter().map(|c| c.as_str()))
            .map_err(|e| AccessError::from_polars(what, e))
    }

    /// Column names of a DataFrame.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
