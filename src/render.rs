//! PDF renderer – serializes an assembled [`Document`] model to PDF bytes
//! using `printpdf` (v0.8 ops-based API).
//!
//! Layout is deliberately minimal: one page sequence per section, blocks
//! flow top to bottom with page breaks between blocks and between table row
//! groups, and text wraps greedily with built-in Helvetica width
//! approximations. Images are loaded from the document's image search path;
//! a missing or undecodable file is logged and skipped so the document still
//! renders with a blank reference in its place.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use printpdf::*;

use crate::model::{
    self, Alignment, Block, BlockContainer, BorderStyle, Document, ImageRef, PageSetup,
    ParagraphFormat, RowHeightRule, Section, Table, Unit, VerticalAlignment,
};

/// Inset between a cell's edge and its content, in points.
const CELL_PADDING: f32 = 2.0;

/// A printpdf XObject together with the pixel dimensions of the source image.
struct ImageResource {
    xobj_id: XObjectId,
    px_width: u32,
    px_height: u32,
}

/// Render a document model into PDF bytes.
pub fn render_pdf(document: &Document) -> Vec<u8> {
    let mut doc = PdfDocument::new(&document.title);
    let images = register_images(document, &mut doc);

    let mut pages: Vec<PdfPage> = Vec::new();
    for section in document.sections() {
        render_section(document, section, &images, &mut pages);
    }

    // Ensure at least one page.
    if pages.is_empty() {
        let setup = PageSetup::default();
        pages.push(PdfPage::new(
            to_mm(setup.page_width),
            to_mm(setup.page_height),
            Vec::new(),
        ));
    }

    doc.with_pages(pages);
    doc.save(&PdfSaveOptions::default(), &mut Vec::new())
}

fn to_mm(unit: Unit) -> Mm {
    Mm(unit.to_pt() * 0.352778)
}

fn lp(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn rgb(color: model::Color) -> Color {
    Color::Rgb(Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
        icc_profile: None,
    })
}

// ---------------------------------------------------------------------------
// Image registration
// ---------------------------------------------------------------------------

fn register_images(document: &Document, doc: &mut PdfDocument) -> HashMap<String, ImageResource> {
    let mut names: HashSet<&str> = HashSet::new();
    for section in document.sections() {
        collect_image_names(section.blocks(), &mut names);
        collect_image_names(section.header.blocks(), &mut names);
        collect_image_names(section.footer.blocks(), &mut names);
    }

    let mut resources = HashMap::new();
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();

    for name in names {
        let path = resolve_image_path(document, name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("skipping image {name}: {err}");
                continue;
            }
        };

        // Decode with the `image` crate to obtain pixel dimensions.
        let decoded = match ::image::load_from_memory(&bytes) {
            Ok(img) => img,
            Err(err) => {
                log::warn!("skipping image {name}: decode error: {err}");
                continue;
            }
        };

        let raw = match RawImage::decode_from_bytes(&bytes, &mut warnings) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("skipping image {name}: PDF encode error: {err}");
                continue;
            }
        };
        let xobj_id = doc.add_image(&raw);

        resources.insert(
            name.to_string(),
            ImageResource {
                xobj_id,
                px_width: decoded.width(),
                px_height: decoded.height(),
            },
        );
    }

    resources
}

fn collect_image_names<'a>(blocks: &'a [Block], names: &mut HashSet<&'a str>) {
    for block in blocks {
        match block {
            Block::Image(image) => {
                names.insert(image.name.as_str());
            }
            Block::Table(table) => {
                for row in table.rows() {
                    for cell in row.cells() {
                        collect_image_names(cell.blocks(), names);
                    }
                }
            }
            Block::Paragraph(_) => {}
        }
    }
}

fn resolve_image_path(document: &Document, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match &document.image_search_path {
        Some(root) => root.join(name),
        None => path.to_path_buf(),
    }
}

// ---------------------------------------------------------------------------
// Text measurement
// ---------------------------------------------------------------------------

/// Approximate advance width of one Helvetica glyph as a fraction of the
/// font size.
fn char_width_factor(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '!' | '.' | ',' | '\'' | ':' | ';' | '|' => 0.28,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' => 0.35,
        'm' | 'w' | 'M' | 'W' | '@' => 0.85,
        ' ' => 0.28,
        c if c.is_ascii_uppercase() => 0.67,
        c if c.is_ascii_digit() => 0.56,
        _ => 0.5,
    }
}

fn text_width(text: &str, format: &ParagraphFormat) -> f32 {
    let scale = if format.bold { 1.05 } else { 1.0 };
    text.chars().map(char_width_factor).sum::<f32>() * format.font_size * scale
}

/// Greedy word wrap into lines no wider than `width`. An overlong single
/// word gets its own line rather than being split.
fn wrap_text(text: &str, width: f32, format: &ParagraphFormat) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, format) <= width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn paragraph_height(text: &str, width: f32, format: &ParagraphFormat) -> f32 {
    let lines = wrap_text(text, width, format);
    lines.len() as f32 * format.font_size * format.line_height
        + format.space_before.to_pt()
        + format.space_after.to_pt()
}

// ---------------------------------------------------------------------------
// Format resolution
// ---------------------------------------------------------------------------

fn named_style(document: &Document, name: &Option<String>) -> Option<ParagraphFormat> {
    name.as_deref()
        .and_then(|n| document.styles.get(n))
        .cloned()
}

/// Direct format, else named style, else `None`.
fn own_format(
    document: &Document,
    format: &Option<ParagraphFormat>,
    style_name: &Option<String>,
) -> Option<ParagraphFormat> {
    format.clone().or_else(|| named_style(document, style_name))
}

fn resolve_block_format(document: &Document, paragraph: &model::Paragraph) -> ParagraphFormat {
    own_format(document, &paragraph.format, &paragraph.style_name).unwrap_or_default()
}

/// Effective format for a paragraph inside a cell: paragraph, then row,
/// then column, then table, then engine default.
fn resolve_cell_format(
    document: &Document,
    table: &Table,
    column_index: usize,
    row: &model::Row,
    paragraph: &model::Paragraph,
) -> ParagraphFormat {
    own_format(document, &paragraph.format, &paragraph.style_name)
        .or_else(|| own_format(document, &row.format, &row.style_name))
        .or_else(|| {
            table.columns().get(column_index).and_then(|column| {
                own_format(document, &column.format, &column.style_name)
            })
        })
        .or_else(|| own_format(document, &table.format, &table.style_name))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Drawing primitives
// ---------------------------------------------------------------------------

/// Fill the rectangle with top-left corner (`x`, `y_top`) in top-based
/// coordinates. PDF origin is bottom-left, so y converts at emit time.
fn fill_rect(
    ops: &mut Vec<Op>,
    x: f32,
    y_top: f32,
    width: f32,
    height: f32,
    color: model::Color,
    page_height: f32,
) {
    let y1 = page_height - y_top - height;
    let y2 = page_height - y_top;
    ops.push(Op::SetFillColor { col: rgb(color) });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    lp(x, y1),
                    lp(x + width, y1),
                    lp(x + width, y2),
                    lp(x, y2),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
}

/// Stroke one border rule between two top-based points.
fn stroke_border(
    ops: &mut Vec<Op>,
    border: &model::Border,
    from: (f32, f32),
    to: (f32, f32),
    page_height: f32,
) {
    ops.push(Op::SetOutlineColor {
        col: rgb(border.color),
    });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(border.width.to_pt()),
    });
    let dashed = border.style == BorderStyle::Dashed;
    if dashed {
        ops.push(Op::SetLineDashPattern {
            dash: LineDashPattern {
                dash_1: Some(3),
                ..LineDashPattern::default()
            },
        });
    }
    ops.push(Op::DrawLine {
        line: Line {
            points: vec![
                lp(from.0, page_height - from.1),
                lp(to.0, page_height - to.1),
            ],
            is_closed: false,
        },
    });
    if dashed {
        ops.push(Op::SetLineDashPattern {
            dash: LineDashPattern::default(),
        });
    }
}

/// Convert a UTF-8 string to raw Windows-1252 bytes wrapped in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts
/// use WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for the 0x80-0x9F range; printpdf
    // passes these bytes straight to the PDF stream, decoded by
    // WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

fn builtin_font(format: &ParagraphFormat) -> BuiltinFont {
    match (format.bold, format.italic) {
        (true, true) => BuiltinFont::HelveticaBoldOblique,
        (true, false) => BuiltinFont::HelveticaBold,
        (false, true) => BuiltinFont::HelveticaOblique,
        (false, false) => BuiltinFont::Helvetica,
    }
}

/// Emit one paragraph at (`x`, `y_top`), wrapping into `width`. Returns the
/// height consumed, including space before/after.
fn render_paragraph(
    ops: &mut Vec<Op>,
    text: &str,
    format: &ParagraphFormat,
    x: f32,
    y_top: f32,
    width: f32,
    page_height: f32,
) -> f32 {
    let lines = wrap_text(text, width, format);
    let line_pitch = format.font_size * format.line_height;
    let font = builtin_font(format);
    // Baseline ≈ top of line + ascender (approx 0.75 × font size).
    let ascender_offset = format.font_size * 0.75;

    let mut line_top = y_top + format.space_before.to_pt();
    for line in &lines {
        if !line.is_empty() {
            let line_width = text_width(line, format);
            let line_x = match format.alignment {
                Alignment::Left => x,
                Alignment::Center => x + ((width - line_width) / 2.0).max(0.0),
                Alignment::Right => x + (width - line_width).max(0.0),
            };
            let baseline_y = page_height - line_top - ascender_offset;

            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(line_x),
                    y: Pt(baseline_y),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(format.font_size),
                font,
            });
            ops.push(Op::SetLineHeight {
                lh: Pt(line_pitch),
            });
            ops.push(Op::SetFillColor {
                col: rgb(format.color),
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(to_winlatin(line))],
                font,
            });
            ops.push(Op::EndTextSection);
        }
        line_top += line_pitch;
    }

    lines.len() as f32 * line_pitch + format.space_before.to_pt() + format.space_after.to_pt()
}

/// Emit one image at (`x`, `y_top`). The space is reserved even when the
/// resource could not be registered, leaving a blank broken reference.
fn render_image(
    ops: &mut Vec<Op>,
    image: &ImageRef,
    resource: Option<&ImageResource>,
    x: f32,
    y_top: f32,
    page_height: f32,
) -> f32 {
    let (px_width, px_height) = match resource {
        Some(res) => (res.px_width, res.px_height),
        None => (0, 0),
    };
    // At dpi=72 printpdf renders 1 px = 1 pt.
    let width = image
        .width
        .map(Unit::to_pt)
        .unwrap_or(px_width as f32);
    let height = image
        .height
        .map(Unit::to_pt)
        .unwrap_or(px_height as f32);

    if let Some(res) = resource {
        let scale_x = if res.px_width > 0 {
            width / res.px_width as f32
        } else {
            1.0
        };
        let scale_y = if res.px_height > 0 {
            height / res.px_height as f32
        } else {
            1.0
        };
        ops.push(Op::UseXobject {
            id: res.xobj_id.clone(),
            transform: XObjectTransform {
                translate_x: Some(Pt(x)),
                translate_y: Some(Pt(page_height - y_top - height)),
                dpi: Some(72.0),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                rotate: None,
            },
        });
    }

    height
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Height of a cell's content stack when wrapped into `width`.
fn cell_content_height(
    document: &Document,
    table: &Table,
    column_index: usize,
    row: &model::Row,
    cell: &model::Cell,
    width: f32,
    images: &HashMap<String, ImageResource>,
) -> f32 {
    let mut height = 0.0;
    for block in cell.blocks() {
        match block {
            Block::Paragraph(paragraph) => {
                let format = resolve_cell_format(document, table, column_index, row, paragraph);
                height += paragraph_height(&paragraph.text, width, &format);
            }
            Block::Image(image) => {
                let resource = images.get(&image.name);
                let px_height = resource.map(|r| r.px_height).unwrap_or(0);
                height += image.height.map(Unit::to_pt).unwrap_or(px_height as f32);
            }
            Block::Table(_) => {
                log::warn!("nested tables inside cells are not rendered");
            }
        }
    }
    height
}

/// Effective row height under the row's height rule.
fn row_height(
    document: &Document,
    table: &Table,
    row: &model::Row,
    images: &HashMap<String, ImageResource>,
) -> f32 {
    let content = row
        .cells()
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let column_width = table
                .columns()
                .get(i)
                .map(|c| c.width.to_pt())
                .unwrap_or(0.0);
            let inner = (column_width - 2.0 * CELL_PADDING).max(0.0);
            cell_content_height(document, table, i, row, cell, inner, images)
                + 2.0 * CELL_PADDING
        })
        .fold(0.0_f32, f32::max);
    // An empty auto row still occupies one default text line.
    let content = content.max(ParagraphFormat::default().font_size * 1.2);

    let explicit = row.height.map(Unit::to_pt).unwrap_or(0.0);
    match row.height_rule {
        RowHeightRule::Exactly if row.height.is_some() => explicit,
        RowHeightRule::AtLeast => content.max(explicit),
        _ => content,
    }
}

/// Emit one table row at vertical offset `y_top`.
#[allow(clippy::too_many_arguments)]
fn render_row(
    ops: &mut Vec<Op>,
    document: &Document,
    table: &Table,
    row: &model::Row,
    x_left: f32,
    y_top: f32,
    height: f32,
    page_height: f32,
    images: &HashMap<String, ImageResource>,
) {
    let mut x = x_left;
    for (column_index, column) in table.columns().iter().enumerate() {
        let width = column.width.to_pt();
        let cell = row.cells().get(column_index);

        // Shading precedence: cell, row, column, table.
        let shading = cell
            .and_then(|c| c.shading)
            .or(row.shading)
            .or(column.shading)
            .or(table.shading);
        if let Some(shading) = shading {
            fill_rect(ops, x, y_top, width, height, shading.color, page_height);
        }

        // Border precedence per side: cell, row, column, table.
        let side = |pick: fn(&model::Borders) -> Option<model::Border>| {
            cell.and_then(|c| c.borders.as_ref()).and_then(pick)
                .or_else(|| row.borders.as_ref().and_then(pick))
                .or_else(|| column.borders.as_ref().and_then(pick))
                .or_else(|| table.borders.as_ref().and_then(pick))
        };
        if let Some(border) = side(|b| b.top) {
            stroke_border(ops, &border, (x, y_top), (x + width, y_top), page_height);
        }
        if let Some(border) = side(|b| b.bottom) {
            stroke_border(
                ops,
                &border,
                (x, y_top + height),
                (x + width, y_top + height),
                page_height,
            );
        }
        if let Some(border) = side(|b| b.left) {
            stroke_border(ops, &border, (x, y_top), (x, y_top + height), page_height);
        }
        if let Some(border) = side(|b| b.right) {
            stroke_border(
                ops,
                &border,
                (x + width, y_top),
                (x + width, y_top + height),
                page_height,
            );
        }

        if let Some(cell) = cell {
            let inner_width = (width - 2.0 * CELL_PADDING).max(0.0);
            let content_height =
                cell_content_height(document, table, column_index, row, cell, inner_width, images);
            let slack = (height - 2.0 * CELL_PADDING - content_height).max(0.0);
            let offset = match row.vertical_alignment {
                VerticalAlignment::Top => 0.0,
                VerticalAlignment::Center => slack / 2.0,
                VerticalAlignment::Bottom => slack,
            };

            let mut content_y = y_top + CELL_PADDING + offset;
            for block in cell.blocks() {
                match block {
                    Block::Paragraph(paragraph) => {
                        let format =
                            resolve_cell_format(document, table, column_index, row, paragraph);
                        content_y += render_paragraph(
                            ops,
                            &paragraph.text,
                            &format,
                            x + CELL_PADDING,
                            content_y,
                            inner_width,
                            page_height,
                        );
                    }
                    Block::Image(image) => {
                        content_y += render_image(
                            ops,
                            image,
                            images.get(&image.name),
                            x + CELL_PADDING,
                            content_y,
                            page_height,
                        );
                    }
                    Block::Table(_) => {}
                }
            }
        }

        x += width;
    }
}

// ---------------------------------------------------------------------------
// Page flow
// ---------------------------------------------------------------------------

struct PageBuilder {
    ops: Vec<Op>,
    /// Top-based flow cursor.
    y: f32,
    body_bottom: f32,
    has_content: bool,
}

/// Total height of a block list wrapped into `width` (used to measure the
/// footer so it can sit flush to the bottom margin).
fn blocks_height(
    document: &Document,
    blocks: &[Block],
    width: f32,
    images: &HashMap<String, ImageResource>,
) -> f32 {
    let mut height = 0.0;
    for block in blocks {
        match block {
            Block::Paragraph(paragraph) => {
                let format = resolve_block_format(document, paragraph);
                height += paragraph_height(&paragraph.text, width, &format);
            }
            Block::Image(image) => {
                let px_height = images.get(&image.name).map(|r| r.px_height).unwrap_or(0);
                height += image.height.map(Unit::to_pt).unwrap_or(px_height as f32);
            }
            Block::Table(table) => {
                for row in table.rows() {
                    height += row_height(document, table, row, images);
                }
            }
        }
    }
    height
}

/// Render a block list without page breaking (headers and footers).
/// Returns the height consumed.
#[allow(clippy::too_many_arguments)]
fn render_static_blocks(
    ops: &mut Vec<Op>,
    document: &Document,
    blocks: &[Block],
    x: f32,
    start_y: f32,
    width: f32,
    page_height: f32,
    images: &HashMap<String, ImageResource>,
) -> f32 {
    let mut y = start_y;
    for block in blocks {
        match block {
            Block::Paragraph(paragraph) => {
                let format = resolve_block_format(document, paragraph);
                y += render_paragraph(ops, &paragraph.text, &format, x, y, width, page_height);
            }
            Block::Image(image) => {
                y += render_image(ops, image, images.get(&image.name), x, y, page_height);
            }
            Block::Table(table) => {
                for row in table.rows() {
                    let height = row_height(document, table, row, images);
                    render_row(ops, document, table, row, x, y, height, page_height, images);
                    y += height;
                }
            }
        }
    }
    y - start_y
}

/// Begin a fresh page for `section`: header at the top, footer flush to the
/// bottom margin, cursor at the body top.
fn start_page(
    document: &Document,
    section: &Section,
    images: &HashMap<String, ImageResource>,
) -> PageBuilder {
    let setup = &section.page_setup;
    let page_height = setup.page_height.to_pt();
    let body_width = setup.body_width().to_pt();
    let x = setup.margin_left.to_pt();
    let mut ops = Vec::new();

    render_static_blocks(
        &mut ops,
        document,
        section.header.blocks(),
        x,
        setup.header_distance.to_pt(),
        body_width,
        page_height,
        images,
    );

    let footer_height = blocks_height(document, section.footer.blocks(), body_width, images);
    render_static_blocks(
        &mut ops,
        document,
        section.footer.blocks(),
        x,
        page_height - setup.footer_distance.to_pt() - footer_height,
        body_width,
        page_height,
        images,
    );

    PageBuilder {
        ops,
        y: setup.margin_top.to_pt(),
        body_bottom: page_height - setup.margin_bottom.to_pt(),
        has_content: false,
    }
}

fn flush_page(section: &Section, builder: PageBuilder, pages: &mut Vec<PdfPage>) {
    let setup = &section.page_setup;
    pages.push(PdfPage::new(
        to_mm(setup.page_width),
        to_mm(setup.page_height),
        builder.ops,
    ));
}

fn render_section(
    document: &Document,
    section: &Section,
    images: &HashMap<String, ImageResource>,
    pages: &mut Vec<PdfPage>,
) {
    let setup = &section.page_setup;
    let page_height = setup.page_height.to_pt();
    let body_width = setup.body_width().to_pt();
    let x = setup.margin_left.to_pt();

    let mut builder = start_page(document, section, images);

    for block in section.blocks() {
        match block {
            Block::Paragraph(paragraph) => {
                let format = resolve_block_format(document, paragraph);
                let height = paragraph_height(&paragraph.text, body_width, &format);
                if builder.has_content && builder.y + height > builder.body_bottom {
                    flush_page(section, builder, pages);
                    builder = start_page(document, section, images);
                }
                render_paragraph(
                    &mut builder.ops,
                    &paragraph.text,
                    &format,
                    x,
                    builder.y,
                    body_width,
                    page_height,
                );
                builder.y += height;
                builder.has_content = true;
            }
            Block::Image(image) => {
                let px_height = images.get(&image.name).map(|r| r.px_height).unwrap_or(0);
                let height = image.height.map(Unit::to_pt).unwrap_or(px_height as f32);
                if builder.has_content && builder.y + height > builder.body_bottom {
                    flush_page(section, builder, pages);
                    builder = start_page(document, section, images);
                }
                render_image(
                    &mut builder.ops,
                    image,
                    images.get(&image.name),
                    x,
                    builder.y,
                    page_height,
                );
                builder.y += height;
                builder.has_content = true;
            }
            Block::Table(table) => {
                let heights: Vec<f32> = table
                    .rows()
                    .iter()
                    .map(|row| row_height(document, table, row, images))
                    .collect();

                let mut index = 0;
                while index < table.row_count() {
                    // A row and its keep-with successors break as one group.
                    let group_end =
                        (index + 1 + table.rows()[index].keep_with).min(table.row_count());
                    let group_height: f32 = heights[index..group_end].iter().sum();

                    if builder.has_content && builder.y + group_height > builder.body_bottom {
                        flush_page(section, builder, pages);
                        builder = start_page(document, section, images);
                    }

                    for row_index in index..group_end {
                        render_row(
                            &mut builder.ops,
                            document,
                            table,
                            &table.rows()[row_index],
                            x,
                            builder.y,
                            heights[row_index],
                            page_height,
                            images,
                        );
                        builder.y += heights[row_index];
                    }
                    builder.has_content = true;
                    index = group_end;
                }
            }
        }
    }

    flush_page(section, builder, pages);
}
