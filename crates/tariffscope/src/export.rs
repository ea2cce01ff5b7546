//! File exports of the current comparison

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use color_eyre::eyre::WrapErr;
use tariffscope_core::export::{DelimitedFormat, RASTER_FILE_NAME, export_delimited, export_raster};
use tariffscope_core::{Dashboard, ExportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Comma separated cells with deltas
    Csv,
    /// Tab separated cells, named `.xls` for spreadsheet software
    Tsv,
    /// Heatmap as PNG
    Png,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => DelimitedFormat::Csv.file_name(),
            ExportFormat::Tsv => DelimitedFormat::Tsv.file_name(),
            ExportFormat::Png => RASTER_FILE_NAME,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Tsv => "Excel",
            ExportFormat::Png => "PNG",
        }
    }
}

/// Encoded export of `dashboard`
pub fn export_bytes(dashboard: &Dashboard, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Csv => {
            export_delimited(&dashboard.cells, dashboard.reference, DelimitedFormat::Csv)
        }
        ExportFormat::Tsv => {
            export_delimited(&dashboard.cells, dashboard.reference, DelimitedFormat::Tsv)
        }
        ExportFormat::Png => export_raster(&dashboard.charts.heatmap),
    }
}

/// Write the export to `out`, or to its default file name inside `dir`.
pub fn write_export(
    dashboard: &Dashboard,
    format: ExportFormat,
    out: Option<&Path>,
    dir: &Path,
) -> color_eyre::Result<PathBuf> {
    let path = out.map_or_else(|| dir.join(format.file_name()), Path::to_path_buf);
    let bytes = export_bytes(dashboard, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&path, bytes).wrap_err_with(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), format = format.label(), "export written");
    Ok(path)
}
