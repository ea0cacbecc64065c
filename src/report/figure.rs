//! Figure Output Module
//! Saves raster and vector figures. The caller states which kind of figure it
//! holds; supported formats follow from that.

use super::ReportConfig;
use crate::error::{AccessError, Result};
use image::{ImageFormat, RgbaImage};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A rendered figure.
#[derive(Debug, Clone)]
pub enum Figure {
    /// Pixel image, e.g. from an `image`/`plotters` bitmap backend.
    Raster(RgbaImage),
    /// SVG markup.
    Vector(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureFormat {
    Png,
    Jpeg,
    Bmp,
    Svg,
    Html,
}

impl FigureFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FigureFormat::Png => "png",
            FigureFormat::Jpeg => "jpg",
            FigureFormat::Bmp => "bmp",
            FigureFormat::Svg => "svg",
            FigureFormat::Html => "html",
        }
    }
}

impl fmt::Display for FigureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl Figure {
    fn kind(&self) -> &'static str {
        match self {
            Figure::Raster(_) => "raster",
            Figure::Vector(_) => "vector",
        }
    }

    pub fn supported_formats(&self) -> &'static [FigureFormat] {
        match self {
            Figure::Raster(_) => &[FigureFormat::Png, FigureFormat::Jpeg, FigureFormat::Bmp],
            Figure::Vector(_) => &[FigureFormat::Svg, FigureFormat::Html],
        }
    }
}

/// Save `figure` to `path` in `format`.
pub fn save_figure(figure: &Figure, path: &Path, format: FigureFormat) -> Result<PathBuf> {
    if !figure.supported_formats().contains(&format) {
        let supported: Vec<String> = figure
            .supported_formats()
            .iter()
            .map(|f| f.to_string())
            .collect();
        return Err(AccessError::InvalidArgument(format!(
            "Unsupported format for {} figure: {format}. Choose: {}",
            figure.kind(),
            supported.join(", ")
        )));
    }

    let shown = path.display().to_string();
    match figure {
        Figure::Raster(img) => {
            let image_format = match format {
                FigureFormat::Jpeg => ImageFormat::Jpeg,
                FigureFormat::Bmp => ImageFormat::Bmp,
                _ => ImageFormat::Png,
            };
            let saved = if image_format == ImageFormat::Jpeg {
                // JPEG has no alpha channel
                image::DynamicImage::ImageRgba8(img.clone())
                    .to_rgb8()
                    .save_with_format(path, image_format)
            } else {
                img.save_with_format(path, image_format)
            };
            saved.map_err(|e| AccessError::Io {
                path: shown.clone(),
                source: std::io::Error::other(e),
            })?;
        }
        Figure::Vector(svg) => {
            let contents = match format {
                FigureFormat::Html => format!(
                    "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n{svg}\n</body>\n</html>\n"
                ),
                _ => svg.clone(),
            };
            fs::write(path, contents).map_err(|e| AccessError::io(&shown, e))?;
        }
    }

    tracing::info!("Saved figure: {shown}");
    Ok(path.to_path_buf())
}

/// Save `figure` as `{image_dir}/{name}.{ext}`, creating the directory if needed.
pub fn save_plot(
    figure: &Figure,
    name: &str,
    config: &ReportConfig,
    format: FigureFormat,
) -> Result<PathBuf> {
    let dir = &config.image_dir;
    fs::create_dir_all(dir).map_err(|e| AccessError::io(dir.display().to_string(), e))?;
    let path = dir.join(format!("{name}.{}", format.extension()));
    save_figure(figure, &path, format)
}
