use crate::core::layout::BadgePlacement;
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A4 portrait, used for report tables.
const A4: (f32, f32) = (595.0, 842.0);

/// Inner padding of a badge card.
const CARD_PADDING: f32 = 10.0;
/// Side of the framed area reserved for the scannable code.
const CODE_SIZE: f32 = 80.0;

pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,

    next_id: i32,
    font_id: Ref,
    bold_font_id: Ref,

    font_size: f32,
    header_font_size: f32,
    title_font_size: f32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    pub fn new() -> Self {
        Self::with_page_size(A4.0, A4.1)
    }

    /// A4 landscape, for wide tables.
    pub fn landscape() -> Self {
        Self::with_page_size(A4.1, A4.0)
    }

    pub fn with_page_size(page_w: f32, page_h: f32) -> Self {
        let mut pdf = Pdf::new();

        // ID gestiti a mano
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let bold_font_id = Ref::new(4);
        let next_id = 5;

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));
        pdf.type1_font(bold_font_id)
            .base_font(Name(b"Helvetica-Bold"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,

            page_w,
            page_h,
            margin: 50.0,
            row_h: 20.0,

            next_id,
            font_id,
            bold_font_id,

            font_size: 9.0,
            header_font_size: 10.0,
            title_font_size: 14.0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    /// Genera un nuovo Ref univoco
    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    /// Crea una nuova pagina e relativo oggetto di contenuto
    pub fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
            .contents(content_id);

        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(Name(b"F1"), self.font_id);
        fonts.pair(Name(b"F2"), self.bold_font_id);

        self.current_content_id = Some(content_id);

        Content::new()
    }

    /// Scrive lo stream della pagina corrente
    pub fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    /// Imposta il nodo `Pages` con count e kids
    fn build_pages_tree(&mut self) {
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.clone());
    }

    fn draw_text_with(
        &self,
        content: &mut Content,
        font: &[u8],
        x: f32,
        y: f32,
        size: f32,
        text: &str,
    ) {
        let latin = to_latin1(text);
        content.begin_text();
        content.set_font(Name(font), size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&latin));
        content.end_text();
    }

    fn draw_text(&self, content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        self.draw_text_with(content, b"F1", x, y, size, text);
    }

    fn draw_cell_borders(&self, content: &mut Content, x: f32, y: f32, w: f32, h: f32) {
        content.save_state();
        content.set_stroke_rgb(0.65, 0.65, 0.65);
        content.rect(x, y, w, h);
        content.stroke();
        content.restore_state();
    }

    fn draw_row(
        &self,
        content: &mut Content,
        y: f32,
        col_widths: &[f32],
        x_start: f32,
        row: &[String],
        font_size: f32,
    ) {
        let mut x = x_start;

        for (i, w) in col_widths.iter().enumerate() {
            let text = row.get(i).map(String::as_str).unwrap_or("");
            let max_chars = ((w - 8.0) / (font_size * 0.5)).max(1.0) as usize;
            self.draw_text(content, x + 4.0, y + 6.0, font_size, &clip(text, max_chars));
            self.draw_cell_borders(content, x, y, *w, self.row_h);
            x += w;
        }
    }

    /// Calcola larghezza colonne in base a header + contenuto e le adatta alla pagina
    fn compute_col_widths(&self, headers: &[String], rows: &[Vec<String>]) -> Vec<f32> {
        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| (h.chars().count() as f32 * 6.0).min(160.0))
            .collect();

        for row in rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                let w = (cell.chars().count() as f32 * 5.5).max(widths[i]);
                widths[i] = w.min(220.0);
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.page_w - 2.0 * self.margin;

        if total > max {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }

        widths
    }

    fn draw_page_header_footer(&self, content: &mut Content, title: &str, page: usize) {
        self.draw_text_with(
            content,
            b"F2",
            self.margin,
            self.page_h - self.margin + 15.0,
            self.title_font_size,
            title,
        );

        let pg = format!("Page {}", page);
        self.draw_text(
            content,
            self.page_w - self.margin - 60.0,
            self.margin - 35.0,
            self.font_size,
            &pg,
        );
    }

    fn draw_header_row(&self, content: &mut Content, y: f32, col_widths: &[f32], headers: &[String]) {
        content.save_state();
        content.set_fill_rgb(0.85, 0.87, 0.90);
        content.rect(self.margin, y, col_widths.iter().sum(), self.row_h);
        content.fill_nonzero();
        content.restore_state();

        self.draw_row(
            content,
            y,
            col_widths,
            self.margin,
            headers,
            self.header_font_size,
        );
    }

    /// Tabella multipagina con titolo. Con zero righe produce comunque
    /// una pagina con la sola intestazione.
    pub fn write_table(&mut self, title: &str, headers: &[String], rows: &[Vec<String>]) {
        let col_widths = self.compute_col_widths(headers, rows);

        let mut remaining: &[Vec<String>] = rows;
        let mut page_idx = 1;

        loop {
            let mut content = self.new_page();
            self.draw_page_header_footer(&mut content, title, page_idx);

            let mut y = self.page_h - self.margin - 30.0;
            self.draw_header_row(&mut content, y, &col_widths, headers);
            y -= self.row_h;

            let mut consumed = 0;

            for (i, row) in remaining.iter().enumerate() {
                if y - self.row_h < self.margin {
                    break;
                }

                // zebra stripe
                if i % 2 == 0 {
                    content.save_state();
                    content.set_fill_rgb(0.96, 0.96, 0.96);
                    content.rect(self.margin, y, col_widths.iter().sum(), self.row_h);
                    content.fill_nonzero();
                    content.restore_state();
                }

                self.draw_row(&mut content, y, &col_widths, self.margin, row, self.font_size);

                y -= self.row_h;
                consumed += 1;
            }

            self.finalize_page(content);
            remaining = &remaining[consumed..];
            page_idx += 1;

            if remaining.is_empty() || consumed == 0 {
                break;
            }
        }
    }

    /// Draw one badge card. Placement coordinates are top-left based;
    /// PDF user space starts bottom-left.
    pub fn draw_badge(&self, content: &mut Content, placement: &BadgePlacement<'_>) {
        let attendee = placement.attendee;
        let x = placement.x;
        let bottom = self.page_h - placement.y - placement.height;
        let top = self.page_h - placement.y;
        let inner_w = placement.width - 2.0 * CARD_PADDING;

        // card border
        content.save_state();
        content.set_stroke_rgb(0.0, 0.0, 0.0);
        content.set_line_width(1.0);
        content.rect(x, bottom, placement.width, placement.height);
        content.stroke();
        content.restore_state();

        // name, wrapped to the card width
        let name_size = 16.0;
        let chars_per_line = (inner_w / (name_size * 0.55)).max(1.0) as usize;
        let mut y = top - CARD_PADDING - name_size;
        for line in textwrap::wrap(&attendee.name, chars_per_line).iter().take(3) {
            self.draw_text_with(content, b"F2", x + CARD_PADDING, y, name_size, line);
            y -= name_size + 2.0;
        }

        let small = 9.0;
        let email_chars = (inner_w / (small * 0.5)).max(1.0) as usize;
        y -= 2.0;
        self.draw_text(
            content,
            x + CARD_PADDING,
            y,
            small,
            &clip(&attendee.email, email_chars),
        );
        y -= small + 4.0;
        self.draw_text(
            content,
            x + CARD_PADDING,
            y,
            small,
            &format!("Badge #: {}", attendee.badge_id),
        );

        // code area, centered at the bottom; the image itself comes from
        // the code encoder
        let code_x = x + (placement.width - CODE_SIZE) / 2.0;
        let code_y = bottom + CARD_PADDING;
        content.save_state();
        content.set_stroke_rgb(0.4, 0.4, 0.4);
        content.set_dash_pattern([3.0, 2.0], 0.0);
        content.rect(code_x, code_y, CODE_SIZE, CODE_SIZE);
        content.stroke();
        content.restore_state();

        let payload = attendee.badge_payload();
        let payload_w = payload.chars().count() as f32 * small * 0.55;
        self.draw_text(
            content,
            code_x + (CODE_SIZE - payload_w) / 2.0,
            code_y + CODE_SIZE / 2.0 - small / 2.0,
            small,
            &payload,
        );
    }

    pub fn save(self, path: &Path) -> std::io::Result<()> {
        let bytes = self.finish();
        let mut f = File::create(path)?;
        f.write_all(&bytes)?;
        Ok(())
    }

    /// Costruisci Catalog + Pages una sola volta e restituisci i byte.
    pub fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.build_pages_tree();
        self.pdf.finish()
    }
}

/// Built-in Type1 fonts use a single-byte encoding: map what fits, replace
/// the rest.
fn to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('~');
    out
}
