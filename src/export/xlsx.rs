// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::excel_date::parse_to_excel_date;
use crate::export::notify_export_success;
use crate::export::tables::CHECK_MARK;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const MAX_COL_WIDTH: usize = 60;
const BAND_EVEN: u32 = 0xEAF3FB;
const BAND_ODD: u32 = 0xFFFFFF;

/// Cell formats for one row band.
struct BandFormats {
    text: Format,
    number: Format,
    mark: Format,
}

impl BandFormats {
    fn new(bg: u32) -> Self {
        let base = Format::new()
            .set_background_color(Color::RGB(bg))
            .set_pattern(FormatPattern::Solid)
            .set_border(FormatBorder::Thin);

        Self {
            number: base.clone().set_align(FormatAlign::Right),
            mark: base
                .clone()
                .set_align(FormatAlign::Center)
                .set_font_color(Color::RGB(0x1E7B34)),
            text: base,
        }
    }

    fn date(&self, num_format: &str) -> Format {
        self.text.clone().set_num_format(num_format)
    }
}

/// Export XLSX: header bloccato, righe a bande, larghezze automatiche.
/// Timestamp come date Excel, badge id come numeri.
pub(crate) fn export_xlsx(headers: &[String], rows: &[Vec<String>], path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, header.as_str(), &header_format)
            .map_err(xlsx_error)?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(xlsx_error)?;

    let bands = [BandFormats::new(BAND_EVEN), BandFormats::new(BAND_ODD)];
    let mut col_widths: Vec<usize> = headers
        .iter()
        .map(|h| UnicodeWidthStr::width(h.as_str()))
        .collect();

    for (row_index, values) in rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band = &bands[row_index % 2];

        for (col, value) in values.iter().enumerate().take(col_widths.len()) {
            write_cell(worksheet, row, col as u16, value, band)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, (*w).min(MAX_COL_WIDTH) as f64 + 2.0)
            .map_err(xlsx_error)?;
    }

    let path_str = path
        .to_str()
        .ok_or_else(|| AppError::Export(format!("invalid path: {}", path.display())))?;
    workbook.save(path_str).map_err(xlsx_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, s: &str, band: &BandFormats) -> AppResult<()> {
    if s == CHECK_MARK {
        ws.write_with_format(row, col, s, &band.mark)
            .map_err(xlsx_error)?;
    } else if let Some((num_format, serial)) = parse_to_excel_date(s) {
        ws.write_with_format(row, col, serial, &band.date(num_format))
            .map_err(xlsx_error)?;
    } else if let Ok(num) = s.parse::<i64>() {
        ws.write_with_format(row, col, num as f64, &band.number)
            .map_err(xlsx_error)?;
    } else {
        ws.write_with_format(row, col, s, &band.text)
            .map_err(xlsx_error)?;
    }
    Ok(())
}

fn xlsx_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(format!("XLSX error: {e}"))
}
