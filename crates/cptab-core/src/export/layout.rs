//! Page geometry for the PDF table: column widths, pagination and text fitting.

use crate::error::ExportError;
use crate::models::config::ExportConfig;

/// Horizontal padding inside a cell in points.
pub const CELL_PADDING_X: f32 = 6.0;

const ELLIPSIS: &str = "...";

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Width of `text` set in Helvetica at `font_size`, in points.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize] as u32,
            _ => 556,
        })
        .sum();
    units as f32 * font_size / 1000.0
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
pub fn fit_text(text: &str, max_width: f32, font_size: f32) -> String {
    if text_width(text, font_size) <= max_width {
        return text.to_string();
    }

    let budget = max_width - text_width(ELLIPSIS, font_size);
    let mut fitted = String::new();
    let mut width = 0.0;
    for c in text.chars() {
        let mut buf = [0u8; 4];
        let advance = text_width(c.encode_utf8(&mut buf), font_size);
        if width + advance > budget {
            break;
        }
        width += advance;
        fitted.push(c);
    }

    format!("{}{}", fitted.trim_end(), ELLIPSIS)
}

/// Horizontal alignment of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Alignment for the cell at (`row`, `column`); row 0 is the header.
///
/// Data cells are centered except in the leftmost column; header cells
/// stay left aligned.
pub fn cell_alignment(row: usize, column: usize) -> Align {
    if row == 0 || column == 0 {
        Align::Left
    } else {
        Align::Center
    }
}

/// Resolved page geometry for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub page_width: f32,
    pub page_height: f32,
    /// Left edge of every column, in column order.
    pub column_x: Vec<f32>,
    pub column_widths: Vec<f32>,
    pub row_height: f32,
    /// Top edge of the table on the first page.
    pub first_page_top: f32,
    /// Top edge of the table on following pages.
    pub page_top: f32,
    /// Data rows that fit on the first page.
    pub first_page_rows: usize,
    /// Data rows that fit on each following page.
    pub rows_per_page: usize,
}

impl TableLayout {
    /// Compute the layout for `rows` (header first).
    pub fn compute(
        rows: &[Vec<String>],
        config: &ExportConfig,
        title_height: f32,
    ) -> Result<Self, ExportError> {
        let (page_width, page_height) = config.page_size.dimensions();
        let available_width = page_width - 2.0 * config.margin;
        let columns = rows.first().map(Vec::len).unwrap_or(0);

        if columns == 0 {
            return Err(ExportError::EmptyTable);
        }
        if available_width <= 0.0 {
            return Err(ExportError::Layout(format!(
                "margin {} leaves no room on a {} pt wide page",
                config.margin, page_width
            )));
        }

        let mut natural = vec![0.0f32; columns];
        for row in rows {
            for (i, cell) in row.iter().enumerate().take(columns) {
                let width = text_width(cell, config.font_size) + 2.0 * CELL_PADDING_X;
                natural[i] = natural[i].max(width);
            }
        }

        let total: f32 = natural.iter().sum();
        let column_widths: Vec<f32> = if total > available_width {
            natural.iter().map(|w| w * available_width / total).collect()
        } else {
            natural
        };

        let table_width: f32 = column_widths.iter().sum();
        let mut x = (page_width - table_width) / 2.0;
        let column_x = column_widths
            .iter()
            .map(|w| {
                let left = x;
                x += w;
                left
            })
            .collect();

        let row_height = config.font_size + 2.0 * config.cell_padding;
        let page_top = page_height - config.margin;
        let first_page_top = page_top - title_height;

        let rows_fitting = |top: f32| -> usize {
            let usable = top - config.margin;
            if usable <= 0.0 {
                return 0;
            }
            ((usable / row_height).floor() as usize).saturating_sub(1)
        };

        let first_page_rows = rows_fitting(first_page_top);
        let rows_per_page = rows_fitting(page_top);

        if rows_per_page == 0 {
            return Err(ExportError::Layout(format!(
                "rows of {} pt do not fit between {} pt margins",
                row_height, config.margin
            )));
        }

        Ok(Self {
            page_width,
            page_height,
            column_x,
            column_widths,
            row_height,
            first_page_top,
            page_top,
            first_page_rows,
            rows_per_page,
        })
    }

    /// Split `data_rows` data rows into per-page ranges.
    pub fn paginate(&self, data_rows: usize) -> Vec<std::ops::Range<usize>> {
        let mut pages = Vec::new();
        let mut start = 0;
        let mut capacity = self.first_page_rows;

        // A title can leave no room for rows on the first page.
        if capacity == 0 {
            pages.push(0..0);
            capacity = self.rows_per_page;
        }

        while start < data_rows {
            let end = (start + capacity).min(data_rows);
            pages.push(start..end);
            start = end;
            capacity = self.rows_per_page;
        }

        if pages.is_empty() {
            pages.push(0..0);
        }

        pages
    }

    pub fn table_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }
}
