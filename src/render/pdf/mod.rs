//! Print backend: lays an [`InvoiceDocument`] out on A4 pages with lopdf.
//!
//! The layout mirrors the screen stylesheet. Item rows flow across pages
//! with the column header repeated; the totals block is never split; the
//! support footer is drawn at a fixed position on every page.

mod metrics;
mod page;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};

use crate::core::RenderError;

use super::PrintBackend;
use super::logo::{Branding, LogoImage};
use super::model::{InvoiceDocument, ItemsTable, TotalsBlock};

use metrics::{Font, encode_win_ansi};
use page::{Canvas, Geometry, MM, PageWriter, Rgb};

const DARK: Rgb = Rgb::hex(0x111111);
const TEXT: Rgb = Rgb::hex(0x333333);
const MUTED: Rgb = Rgb::hex(0x555555);
const LIGHT: Rgb = Rgb::hex(0x777777);
const BORDER: Rgb = Rgb::hex(0xCCCCCC);
const RULE: Rgb = Rgb::hex(0xEEEEEE);
const WHITE: Rgb = Rgb::hex(0xFFFFFF);

const LOGO_RESOURCE: &str = "Im1";

const BODY_SIZE: f32 = 9.0;
const INFO_SIZE: f32 = 8.5;
const FOOTER_SIZE: f32 = 7.5;
const CELL_PAD: f32 = 7.0;
const ITEM_COLUMNS: [f32; 4] = [0.52, 0.12, 0.18, 0.18];

/// Renders invoices to PDF using the built-in Helvetica fonts.
#[derive(Debug, Clone, Copy)]
pub struct PdfBackend {
    geometry: Geometry,
}

impl Default for PdfBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend {
    pub fn new() -> Self {
        Self {
            geometry: Geometry::a4(),
        }
    }
}

impl PrintBackend for PdfBackend {
    fn render(&self, doc: &InvoiceDocument) -> Result<Vec<u8>, RenderError> {
        let logo = match &doc.header.branding {
            Branding::Image(image) => embeddable_logo(image),
            Branding::FallbackText(_) => None,
        };
        let pages = layout(doc, self.geometry, logo.as_ref().map(|l| (l.width, l.height)))?;
        tracing::debug!(pages = pages.len(), title = %doc.document_title, "laid out print document");
        assemble(&doc.document_title, pages, logo, self.geometry)
    }

    fn extension(&self) -> &str {
        "pdf"
    }
}

/// Logo as 8-bit RGB samples plus an optional soft mask for transparency.
struct EmbeddedLogo {
    pixels: Stream,
    mask: Option<Stream>,
    width: f32,
    height: f32,
}

/// Decode the logo into image XObjects. Images that cannot be decoded are
/// dropped and the header shows the company name instead.
fn embeddable_logo(logo: &LogoImage) -> Option<EmbeddedLogo> {
    let decoded = match image::load_from_memory(&logo.bytes) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!(error = %e, kind = ?logo.kind, "logo cannot be embedded, using company name");
            return None;
        }
    };
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return None;
    }

    let mask = decoded.color().has_alpha().then(|| {
        let alpha = decoded.to_rgba8().pixels().map(|p| p.0[3]).collect();
        image_xobject(width, height, "DeviceGray", alpha)
    });
    let pixels = image_xobject(width, height, "DeviceRGB", decoded.into_rgb8().into_raw());
    Some(EmbeddedLogo {
        pixels,
        mask,
        width: width as f32,
        height: height as f32,
    })
}

fn image_xobject(width: u32, height: u32, color_space: &str, samples: Vec<u8>) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8,
        },
        samples,
    )
}

fn layout(
    doc: &InvoiceDocument,
    geometry: Geometry,
    logo: Option<(f32, f32)>,
) -> Result<Vec<Canvas>, RenderError> {
    let footer = doc.footer.text.clone();
    let mut writer = PageWriter::new(geometry).on_page(move |canvas| {
        draw_footer(canvas, &geometry, &footer);
    });

    draw_header(&mut writer, doc, logo);
    draw_items(&mut writer, &doc.items)?;
    writer.advance(5.0 * MM);
    draw_totals(&mut writer, &doc.totals);
    if let Some(notes) = &doc.notes {
        writer.advance(4.0 * MM);
        draw_notes(&mut writer, notes);
    }
    Ok(writer.finish())
}

fn draw_header(writer: &mut PageWriter<'_>, doc: &InvoiceDocument, logo: Option<(f32, f32)>) {
    let g = *writer.geometry();
    let half = g.content_width() * 0.5;
    let right = g.content_right();
    let top = writer.cursor();
    let leading = INFO_SIZE * 1.45;
    let canvas = writer.canvas();

    // Left: logo or company name, then contact lines.
    let mut left_y = top;
    match logo {
        Some((w, h)) => {
            let scale = (44.0 * MM / w).min(18.0 * MM / h);
            let (w, h) = (w * scale, h * scale);
            canvas.image(LOGO_RESOURCE, g.left, top - h, w, h);
            left_y -= h;
        }
        None => {
            let name = match &doc.header.branding {
                Branding::FallbackText(name) => name.as_str(),
                Branding::Image(_) => doc.header.company_name.as_str(),
            };
            for line in Font::Bold.wrap(name, 16.0, half - 4.0) {
                canvas.text(g.left, left_y - 16.0 * 0.8, Font::Bold, 16.0, DARK, &line);
                left_y -= 16.0 * 1.2;
            }
        }
    }
    left_y -= 3.0 * MM;
    for line in doc.info.company_lines.iter().flat_map(|l| Font::Regular.wrap(l, INFO_SIZE, half - 4.0)) {
        canvas.text(g.left, left_y - INFO_SIZE, Font::Regular, INFO_SIZE, TEXT, &line);
        left_y -= leading;
    }

    // Right: title, metadata table, customer block.
    let mut right_y = top;
    canvas.text_right(right, right_y - 26.0 * 0.75, Font::Bold, 26.0, DARK, &doc.header.title);
    right_y -= 26.0 + 3.0 * MM;

    let value_width = g.content_width() * 0.26;
    let row_height = INFO_SIZE * 1.45 + 3.0;
    for row in &doc.info.meta {
        let baseline = right_y - INFO_SIZE - 1.5;
        canvas.text_right(right - value_width, baseline, Font::Regular, INFO_SIZE, MUTED, &row.label);
        canvas.text_right(right, baseline, Font::Regular, INFO_SIZE, DARK, &row.value);
        right_y -= row_height;
    }

    right_y -= row_height / 2.0;
    canvas.text_right(right, right_y - INFO_SIZE, Font::Bold, INFO_SIZE, TEXT, &doc.info.customer_label);
    right_y -= leading + 1.0;
    for line in doc.info.customer_lines.iter().flat_map(|l| Font::Regular.wrap(l, INFO_SIZE, half)) {
        canvas.text_right(right, right_y - INFO_SIZE, Font::Regular, INFO_SIZE, TEXT, &line);
        right_y -= leading;
    }

    let below = left_y.min(right_y) - 6.0 * MM;
    canvas.line((g.left, below), (right, below), 0.8, BORDER);
    writer.advance(top - below + 4.0 * MM);
}

/// Wrapped cell text for one table row.
struct Row {
    cells: [Vec<String>; 4],
    font: Font,
}

impl Row {
    fn new(cells: [&str; 4], widths: &[f32; 4], font: Font) -> Self {
        Self {
            cells: std::array::from_fn(|i| font.wrap(cells[i], BODY_SIZE, widths[i] - 2.0 * CELL_PAD)),
            font,
        }
    }

    fn height(&self) -> f32 {
        let lines = self.cells.iter().map(Vec::len).max().unwrap_or(1);
        2.0 * CELL_PAD + lines as f32 * BODY_SIZE * 1.3
    }

    fn draw(&self, writer: &mut PageWriter<'_>, widths: &[f32; 4]) {
        let g = *writer.geometry();
        let top = writer.cursor();
        let height = self.height();
        let canvas = writer.canvas();
        let mut x = g.left;
        for (i, (lines, width)) in self.cells.iter().zip(widths).enumerate() {
            let mut baseline = top - CELL_PAD - BODY_SIZE * 0.8;
            for line in lines {
                if i == 0 {
                    canvas.text(x + CELL_PAD, baseline, self.font, BODY_SIZE, TEXT, line);
                } else {
                    canvas.text_right(x + width - CELL_PAD, baseline, self.font, BODY_SIZE, TEXT, line);
                }
                baseline -= BODY_SIZE * 1.3;
            }
            x += width;
            if i < 3 {
                canvas.line((x, top), (x, top - height), 0.5, BORDER);
            }
        }
        writer.advance(height);
    }
}

/// Fails when a row (with the repeated header above it) is taller than a
/// whole page, since no page break can make it fit.
fn draw_items(writer: &mut PageWriter<'_>, items: &ItemsTable) -> Result<(), RenderError> {
    let g = *writer.geometry();
    let widths = ITEM_COLUMNS.map(|f| f * g.content_width());
    let right = g.content_right();
    let [a, b, c, d] = &items.columns;
    let header = Row::new([a.as_str(), b.as_str(), c.as_str(), d.as_str()], &widths, Font::Bold);

    let rows: Vec<Row> = items
        .rows
        .iter()
        .map(|r| {
            Row::new(
                [
                    r.description.as_str(),
                    r.quantity.as_str(),
                    r.unit_price.as_str(),
                    r.line_total.as_str(),
                ],
                &widths,
                Font::Regular,
            )
        })
        .collect();

    let first = rows.first().map_or(0.0, Row::height);
    writer.ensure(header.height() + first);
    draw_column_header(writer, &header, &widths);

    for (i, row) in rows.iter().enumerate() {
        if header.height() + row.height() > g.content_height() {
            return Err(RenderError::Layout(format!(
                "item row {} on page {} is taller than a page",
                i + 1,
                writer.page_number()
            )));
        }
        if writer.ensure(row.height()) {
            draw_column_header(writer, &header, &widths);
        }
        row.draw(writer, &widths);
        if i + 1 < rows.len() {
            let y = writer.cursor();
            writer.canvas().line((g.left, y), (right, y), 0.3, RULE);
        }
    }
    Ok(())
}

/// Header row framed by heavier rules; repeated after every page break.
fn draw_column_header(writer: &mut PageWriter<'_>, header: &Row, widths: &[f32; 4]) {
    let g = *writer.geometry();
    let right = g.content_right();
    let top = writer.cursor();
    writer.canvas().line((g.left, top), (right, top), 0.8, BORDER);
    header.draw(writer, widths);
    let bottom = writer.cursor();
    writer.canvas().line((g.left, bottom), (right, bottom), 0.8, BORDER);
}

fn draw_totals(writer: &mut PageWriter<'_>, totals: &TotalsBlock) {
    let g = *writer.geometry();
    let table_width = g.content_width() * 0.42;
    let x0 = g.content_right() - table_width;
    let label_width = table_width * 0.58 - 16.0;
    let (pad_v, pad_h) = (5.0, 8.0);
    let leading = BODY_SIZE * 1.3;

    let rows: Vec<(Vec<String>, f32)> = totals
        .rows
        .iter()
        .map(|row| {
            let font = if row.emphasized { Font::Bold } else { Font::Regular };
            let lines = font.wrap(&row.label, BODY_SIZE, label_width);
            let height = 2.0 * pad_v + lines.len() as f32 * leading;
            (lines, height)
        })
        .collect();
    let block: f32 = rows.iter().map(|(_, h)| h).sum();
    writer.ensure(block);

    for (i, (row, (lines, height))) in totals.rows.iter().zip(&rows).enumerate() {
        let top = writer.cursor();
        let canvas = writer.canvas();
        let (font, color) = if row.emphasized {
            canvas.fill_rect(x0, top - height, table_width, *height, DARK);
            (Font::Bold, WHITE)
        } else {
            (Font::Regular, TEXT)
        };
        let mut baseline = top - pad_v - BODY_SIZE * 0.8;
        canvas.text_right(
            x0 + table_width - pad_h,
            baseline,
            font,
            BODY_SIZE,
            color,
            &row.value,
        );
        for line in lines {
            canvas.text(x0 + pad_h, baseline, font, BODY_SIZE, color, line);
            baseline -= leading;
        }
        let bottom = top - height;
        let next_emphasized = totals.rows.get(i + 1).is_some_and(|r| r.emphasized);
        if !row.emphasized && !next_emphasized && i + 1 < totals.rows.len() {
            canvas.line((x0, bottom), (x0 + table_width, bottom), 0.3, RULE);
        }
        writer.advance(*height);
    }
}

fn draw_notes(writer: &mut PageWriter<'_>, notes: &str) {
    let g = *writer.geometry();
    let leading = INFO_SIZE * 1.45;
    for line in Font::Regular.wrap(notes, INFO_SIZE, g.content_width()) {
        writer.ensure(leading);
        let baseline = writer.cursor() - INFO_SIZE;
        writer.canvas().text(g.left, baseline, Font::Regular, INFO_SIZE, LIGHT, &line);
        writer.advance(leading);
    }
}

fn draw_footer(canvas: &mut Canvas, g: &Geometry, text: &str) {
    let leading = FOOTER_SIZE * 1.4;
    let lines = Font::Regular.wrap(text, FOOTER_SIZE, g.content_width());
    let base = 10.0 * MM;
    let center = g.left + g.content_width() / 2.0;
    for (i, line) in lines.iter().enumerate() {
        let baseline = base + (lines.len() - 1 - i) as f32 * leading;
        canvas.text_centered(center, baseline, Font::Regular, FOOTER_SIZE, LIGHT, line);
    }
    let rule = base + (lines.len() - 1) as f32 * leading + FOOTER_SIZE + 4.0;
    canvas.line((g.left, rule), (g.content_right(), rule), 0.5, BORDER);
}

fn font_dictionary(font: Font) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn assemble(
    title: &str,
    pages: Vec<Canvas>,
    logo: Option<EmbeddedLogo>,
    g: Geometry,
) -> Result<Vec<u8>, RenderError> {
    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let regular_id = pdf.add_object(font_dictionary(Font::Regular));
    let bold_id = pdf.add_object(font_dictionary(Font::Bold));
    let mut resources = dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource() => regular_id,
            Font::Bold.resource() => bold_id,
        },
    };
    if let Some(logo) = logo {
        let mut pixels = logo.pixels;
        if let Some(mask) = logo.mask {
            let mask_id = pdf.add_object(mask);
            pixels.dict.set("SMask", mask_id);
        }
        let image_id = pdf.add_object(pixels);
        resources.set("XObject", dictionary! { LOGO_RESOURCE => image_id });
    }
    let resources_id = pdf.add_object(resources);

    let mut kids = Vec::with_capacity(pages.len());
    for canvas in pages {
        let content = Content {
            operations: canvas.into_operations(),
        };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Serialize(format!("failed to encode page content: {e}")))?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(g.width),
                Object::Real(g.height),
            ],
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);
    let info_id = pdf.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
        "Producer" => Object::string_literal(concat!("factuur ", env!("CARGO_PKG_VERSION"))),
    });
    pdf.trailer.set("Info", info_id);

    pdf.compress();
    let mut output = Vec::new();
    pdf.save_to(&mut output)
        .map_err(|e| RenderError::Serialize(format!("failed to save PDF: {e}")))?;
    Ok(output)
}
