// src/export/pdf_export.rs

use crate::core::layout::{BadgeGeometry, BadgeLayout};
use crate::errors::{AppError, AppResult};
use crate::export::notify_export_success;
use crate::export::pdf::PdfManager;
use crate::export::tables::CHECK_MARK;
use crate::ui::messages::info;
use std::io;
use std::path::Path;

/// Tables wider than this are printed landscape.
const PORTRAIT_MAX_COLUMNS: usize = 8;

/// Mark printed in PDF cells; the built-in fonts have no check glyph.
const PDF_CHECK_MARK: &str = "X";

fn save(pdf: PdfManager, path: &Path) -> AppResult<()> {
    pdf.save(path)
        .map_err(|e| AppError::from(io::Error::other(format!("PDF export error: {e}"))))
}

/// Export PDF usando PdfManager e la tabella generata.
pub(crate) fn export_pdf(
    headers: &[String],
    rows: &[Vec<String>],
    path: &Path,
    title: &str,
) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let printable: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            r.iter()
                .map(|c| {
                    if c == CHECK_MARK {
                        PDF_CHECK_MARK.to_string()
                    } else {
                        c.clone()
                    }
                })
                .collect()
        })
        .collect();

    let mut pdf = if headers.len() > PORTRAIT_MAX_COLUMNS {
        PdfManager::landscape()
    } else {
        PdfManager::new()
    };
    pdf.write_table(title, headers, &printable);

    save(pdf, path)?;
    notify_export_success("PDF", path);
    Ok(())
}

/// Render a laid-out badge sheet, one PDF page per layout page.
pub fn export_badge_sheet(
    layout: &BadgeLayout<'_>,
    geometry: &BadgeGeometry,
    path: &Path,
) -> AppResult<()> {
    info(format!("Writing badge sheet: {}", path.display()));

    let mut pdf = PdfManager::with_page_size(geometry.page_width, geometry.page_height);
    let mut content = pdf.new_page();

    for placement in &layout.placements {
        if placement.starts_new_page(layout.cards_per_page) {
            pdf.finalize_page(content);
            content = pdf.new_page();
        }
        pdf.draw_badge(&mut content, placement);
    }
    pdf.finalize_page(content);
    info(format!("{} page(s)", pdf.page_count()));

    save(pdf, path)?;
    notify_export_success("Badge sheet", path);
    Ok(())
}
