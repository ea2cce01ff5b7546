//! Downloadable forms of the filtered comparison: delimited text and PNG.

use csv::WriterBuilder;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::model::{Cell, ReferenceMode};
use crate::pairing::delta;

/// Raster size used when an SVG declares no usable size
pub const FALLBACK_RASTER_SIZE: (u32, u32) = (1200, 800);
/// File name of the heatmap raster export
pub const RASTER_FILE_NAME: &str = "heatmap.png";

/// Header row of delimited exports
pub const DELIMITED_HEADER: [&str; 6] = [
    "group",
    "step",
    "tariff_a",
    "tariff_b",
    "delta_abs",
    "delta_rel",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelimitedFormat {
    /// Comma separated, for portable use
    #[default]
    Csv,
    /// Tab separated, opened directly by spreadsheet software
    Tsv,
}

impl DelimitedFormat {
    pub fn delimiter(self) -> u8 {
        match self {
            DelimitedFormat::Csv => b',',
            DelimitedFormat::Tsv => b'\t',
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            DelimitedFormat::Csv => "tarifvergleich.csv",
            DelimitedFormat::Tsv => "tarifvergleich.xls",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DelimitedFormat::Csv => "text/csv;charset=utf-8",
            DelimitedFormat::Tsv => "application/vnd.ms-excel",
        }
    }
}

/// Serialize `cells` with their deltas under `mode`.
///
/// Salaries and absolute deltas carry two decimals, relative deltas four.
/// Rows end in `\n`.
pub fn export_delimited(
    cells: &[Cell],
    mode: ReferenceMode,
    format: DelimitedFormat,
) -> Result<Vec<u8>, ExportError> {
    if cells.is_empty() {
        return Err(ExportError::Empty);
    }
    let mut writer = WriterBuilder::new()
        .delimiter(format.delimiter())
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(DELIMITED_HEADER)?;
    for cell in cells {
        let d = delta(cell, mode);
        writer.write_record([
            cell.group.clone(),
            cell.step.clone(),
            format!("{:.2}", cell.a),
            format!("{:.2}", cell.b),
            format!("{:.2}", d.abs),
            format!("{:.4}", d.rel),
        ])?;
    }
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// Rasterize SVG markup at its intrinsic size over an opaque white background.
#[cfg(feature = "raster")]
pub fn export_raster(svg: &str) -> Result<Vec<u8>, ExportError> {
    use resvg::{tiny_skia, usvg};

    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| ExportError::Svg(e.to_string()))?;

    let size = tree.size().to_int_size();
    let (width, height) = if size.width() == 0 || size.height() == 0 {
        FALLBACK_RASTER_SIZE
    } else {
        (size.width(), size.height())
    };
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ExportError::Raster(format!("cannot allocate {width}x{height} pixmap")))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    tracing::debug!(width, height, "rasterized svg");
    pixmap
        .encode_png()
        .map_err(|e| ExportError::Raster(e.to_string()))
}

#[cfg(not(feature = "raster"))]
pub fn export_raster(_svg: &str) -> Result<Vec<u8>, ExportError> {
    Err(ExportError::RasterUnavailable)
}
