// src/export/mod.rs

mod excel_date;
mod fs_utils;
mod json_csv;
mod pdf;
mod pdf_export;
pub mod tables;
mod xlsx;

pub use fs_utils::ensure_writable;
pub use pdf_export::export_badge_sheet;
pub use tables::{RawScanLog, Tabular};

use crate::errors::AppResult;
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Helper comune per messaggi di completamento export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Write any report table to `path` in the requested format.
///
/// `title` is only used by formats that carry one (PDF).
pub fn export_table(
    table: &dyn Tabular,
    format: ExportFormat,
    path: &Path,
    title: &str,
) -> AppResult<()> {
    let headers = table.headers();
    let rows = table.rows();

    match format {
        ExportFormat::Csv => json_csv::export_csv(&headers, &rows, path),
        ExportFormat::Json => json_csv::export_json(&headers, &rows, path),
        ExportFormat::Xlsx => xlsx::export_xlsx(&headers, &rows, path),
        ExportFormat::Pdf => pdf_export::export_pdf(&headers, &rows, path, title),
    }
}
