//! PDF table rendering using lopdf.

use chrono::Local;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info};

use super::layout::{cell_alignment, fit_text, text_width, Align, TableLayout, CELL_PADDING_X};
use super::{Result, TableExporter};
use crate::error::ExportError;
use crate::models::config::ExportConfig;
use crate::models::table::RecordTable;

const BODY_FONT: &str = "F1";
const TITLE_FONT: &str = "F2";

/// Helvetica descender depth as a fraction of the font size.
const DESCENT: f32 = 0.207;

/// Writes a record table as a gridded PDF table.
///
/// The header row is shaded and repeated on every page.
#[derive(Debug, Clone)]
pub struct PdfTableWriter {
    config: ExportConfig,
    compress: bool,
}

impl PdfTableWriter {
    /// Create a writer with default export settings.
    pub fn new() -> Self {
        Self::from_config(ExportConfig::default())
    }

    /// Create a writer from export configuration.
    pub fn from_config(config: ExportConfig) -> Self {
        Self {
            config,
            compress: true,
        }
    }

    /// Set the title drawn above the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    fn title_size(&self) -> f32 {
        self.config.font_size + 4.0
    }

    /// Build the PDF document for `table`.
    pub fn render(&self, table: &RecordTable) -> Result<Document> {
        if table.is_empty() {
            return Err(ExportError::EmptyTable);
        }

        let title_height = match self.config.title {
            Some(_) => self.title_size() * 2.0,
            None => 0.0,
        };

        let rows = table.rows();
        let layout = TableLayout::compute(&rows, &self.config, title_height)?;

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&layout.column_widths)
                    .map(|(cell, width)| {
                        fit_text(cell, width - 2.0 * CELL_PADDING_X, self.config.font_size)
                    })
                    .collect()
            })
            .collect();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let body_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let title_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                BODY_FONT => body_font_id,
                TITLE_FONT => title_font_id,
            },
        });

        let pages = layout.paginate(cells.len() - 1);
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

        for (page_index, range) in pages.into_iter().enumerate() {
            let mut operations = Vec::new();

            let top = if page_index == 0 {
                if let Some(title) = &self.config.title {
                    self.draw_title(&mut operations, title, &layout);
                }
                layout.first_page_top
            } else {
                layout.page_top
            };

            let mut page_rows: Vec<(usize, &[String])> = vec![(0, cells[0].as_slice())];
            page_rows.extend(range.clone().map(|i| (i + 1, cells[i + 1].as_slice())));

            self.draw_table(&mut operations, &layout, top, &page_rows);

            debug!(
                "PDF page {}: rows {}..{}",
                page_index + 1,
                range.start + 1,
                range.end
            );

            let content = Content { operations };
            let encoded = content
                .encode()
                .map_err(|e| ExportError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                layout.page_width.into(),
                layout.page_height.into(),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let info_id = self.add_info(&mut doc);
        doc.trailer.set("Info", info_id);

        if self.compress {
            doc.compress();
        }

        Ok(doc)
    }

    fn add_info(&self, doc: &mut Document) -> ObjectId {
        let created = format!("D:{}", Local::now().format("%Y%m%d%H%M%S"));
        let mut info = dictionary! {
            "Producer" => Object::string_literal(concat!("cptab ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(created),
        };
        if let Some(title) = &self.config.title {
            info.set("Title", pdf_string(title));
        }
        doc.add_object(info)
    }

    fn draw_title(&self, ops: &mut Vec<Operation>, title: &str, layout: &TableLayout) {
        let size = self.title_size();
        let x = layout.column_x.first().copied().unwrap_or(self.config.margin);
        let y = layout.page_top - size;

        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![TITLE_FONT.into(), size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new("Tj", vec![pdf_string(title)]));
        ops.push(Operation::new("ET", vec![]));
    }

    /// Draw header shading, cell text and grid for the rows of one page.
    fn draw_table(
        &self,
        ops: &mut Vec<Operation>,
        layout: &TableLayout,
        top: f32,
        rows: &[(usize, &[String])],
    ) {
        let font_size = self.config.font_size;
        let row_height = layout.row_height;
        let left = layout.column_x.first().copied().unwrap_or(0.0);
        let width = layout.table_width();
        let bottom = top - rows.len() as f32 * row_height;

        // header background
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new("g", vec![self.config.header_shade.into()]));
        ops.push(Operation::new(
            "re",
            vec![
                left.into(),
                (top - row_height).into(),
                width.into(),
                row_height.into(),
            ],
        ));
        ops.push(Operation::new("f", vec![]));
        ops.push(Operation::new("Q", vec![]));

        ops.push(Operation::new("g", vec![0.into()]));
        for (position, (row_index, cells)) in rows.iter().enumerate() {
            let row_bottom = top - (position + 1) as f32 * row_height;
            let baseline = row_bottom + self.config.cell_padding + DESCENT * font_size;

            for (column, cell) in cells.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                let cell_x = layout.column_x[column];
                let cell_width = layout.column_widths[column];
                let x = match cell_alignment(*row_index, column) {
                    Align::Left => cell_x + CELL_PADDING_X,
                    Align::Center => cell_x + (cell_width - text_width(cell, font_size)) / 2.0,
                };

                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("Tf", vec![BODY_FONT.into(), font_size.into()]));
                ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
                ops.push(Operation::new("Tj", vec![pdf_string(cell)]));
                ops.push(Operation::new("ET", vec![]));
            }
        }

        // grid
        ops.push(Operation::new("w", vec![self.config.grid_width.into()]));
        ops.push(Operation::new("G", vec![0.into()]));
        for line in 0..=rows.len() {
            let y = top - line as f32 * row_height;
            ops.push(Operation::new("m", vec![left.into(), y.into()]));
            ops.push(Operation::new("l", vec![(left + width).into(), y.into()]));
        }
        let mut edges: Vec<f32> = layout.column_x.clone();
        edges.push(left + width);
        for x in edges {
            ops.push(Operation::new("m", vec![x.into(), top.into()]));
            ops.push(Operation::new("l", vec![x.into(), bottom.into()]));
        }
        ops.push(Operation::new("S", vec![]));
    }
}

impl Default for PdfTableWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExporter for PdfTableWriter {
    fn export(&self, table: &RecordTable) -> Result<Vec<u8>> {
        let mut doc = self.render(table)?;
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;

        info!(
            "Rendered {} records into a {} byte PDF",
            table.len(),
            bytes.len()
        );

        Ok(bytes)
    }
}

/// Encode text for a WinAnsi Type1 font; characters outside Latin-1 become `?`.
fn pdf_string(text: &str) -> Object {
    let bytes: Vec<u8> = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    Object::string_literal(bytes)
}
