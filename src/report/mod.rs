//! Report module - table previews and figure output
//!
//! Display settings live in a [`ReportConfig`] that callers pass in; nothing
//! here touches process-wide state.

mod figure;

pub use figure::{save_figure, save_plot, Figure, FigureFormat};

use crate::error::{AccessError, Result};
use polars::prelude::DataFrame;
use std::path::PathBuf;

/// Display and output settings for previews and saved figures.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Rows shown by [`preview`].
    pub preview_rows: usize,
    /// Leading columns shown by [`preview`]; `None` shows all.
    pub preview_columns: Option<usize>,
    /// Directory [`save_plot`] writes into.
    pub image_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            preview_rows: 20,
            preview_columns: None,
            image_dir: PathBuf::from("."),
        }
    }
}

impl ReportConfig {
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }
}

/// Render the head of `df` within the configured row and column limits.
pub fn preview(df: &DataFrame, config: &ReportConfig) -> Result<String> {
    let mut head = df.head(Some(config.preview_rows));
    if let Some(n) = config.preview_columns {
        if n < head.width() {
            let names: Vec<_> = head.get_column_names_owned().into_iter().take(n).collect();
            head = head
                .select(names)
                .map_err(|e| AccessError::from_polars("preview", e))?;
        }
    }
    Ok(format!("{head}"))
}

/// `1234567` -> `"1,234,567"`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
