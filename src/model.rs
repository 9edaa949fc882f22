//! Document model – the narrow document-object-model surface the generation
//! core builds against and the renderer consumes.
//!
//! The model is plain data: a [`Document`] owns sections, a [`Section`] owns
//! header/footer/body block lists, and tables are column/row/cell grids with
//! optional style attributes. Nothing here performs layout; that is the
//! renderer's job ([`crate::render`]).

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Units and colours
// ---------------------------------------------------------------------------

/// Length stored in PDF points (1 pt = 1/72 inch).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Unit(f32);

impl Unit {
    pub const ZERO: Unit = Unit(0.0);

    pub fn pt(value: f32) -> Self {
        Unit(value)
    }

    pub fn mm(value: f32) -> Self {
        Unit(value * 72.0 / 25.4)
    }

    pub fn cm(value: f32) -> Self {
        Unit(value * 72.0 / 2.54)
    }

    pub fn to_pt(self) -> f32 {
        self.0
    }
}

/// RGB colour (0.0 – 1.0 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    /// Grey level, 0.0 = black, 1.0 = white.
    pub fn gray(level: f32) -> Self {
        Color {
            r: level,
            g: level,
            b: level,
        }
    }
}

// ---------------------------------------------------------------------------
// Style value types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BorderStyle {
    #[default]
    Single,
    Dashed,
}

/// One rule along one side of a layout object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub style: BorderStyle,
    pub width: Unit,
    pub color: Color,
}

impl Border {
    pub fn new(style: BorderStyle, width: Unit, color: Color) -> Self {
        Border {
            style,
            width,
            color,
        }
    }

    /// Thin single rule (0.5 pt), the engine's hairline default.
    pub fn hairline(color: Color) -> Self {
        Border::new(BorderStyle::Single, Unit::pt(0.5), color)
    }
}

/// Per-side border set. `None` sides are not drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Borders {
    pub top: Option<Border>,
    pub bottom: Option<Border>,
    pub left: Option<Border>,
    pub right: Option<Border>,
}

impl Borders {
    pub fn all(border: Border) -> Self {
        Borders {
            top: Some(border),
            bottom: Some(border),
            left: Some(border),
            right: Some(border),
        }
    }

    pub fn bottom_only(border: Border) -> Self {
        Borders {
            bottom: Some(border),
            ..Borders::default()
        }
    }
}

/// Background fill for a table, column, row, or cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shading {
    pub color: Color,
}

impl Shading {
    pub fn new(color: Color) -> Self {
        Shading { color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Paragraph-level text formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphFormat {
    pub alignment: Alignment,
    /// Font size in points.
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    pub space_before: Unit,
    pub space_after: Unit,
}

impl Default for ParagraphFormat {
    fn default() -> Self {
        ParagraphFormat {
            alignment: Alignment::Left,
            font_size: 10.0,
            bold: false,
            italic: false,
            color: Color::BLACK,
            line_height: 1.2,
            space_before: Unit::ZERO,
            space_after: Unit::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RowHeightRule {
    /// Height follows the row's content.
    #[default]
    Auto,
    /// Height is at least the row's `height`, growing with content.
    AtLeast,
    /// Height is exactly the row's `height`; content may clip.
    Exactly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}

// ---------------------------------------------------------------------------
// Page setup and named styles
// ---------------------------------------------------------------------------

/// Physical page geometry for one section. Defaults to A4 portrait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub page_width: Unit,
    pub page_height: Unit,
    pub margin_top: Unit,
    pub margin_right: Unit,
    pub margin_bottom: Unit,
    pub margin_left: Unit,
    /// Distance from the top page edge to the first header line.
    pub header_distance: Unit,
    /// Distance from the bottom page edge to the last footer line.
    pub footer_distance: Unit,
}

impl Default for PageSetup {
    fn default() -> Self {
        PageSetup {
            page_width: Unit::pt(595.28),
            page_height: Unit::pt(841.89),
            margin_top: Unit::pt(60.0),
            margin_right: Unit::pt(40.0),
            margin_bottom: Unit::pt(60.0),
            margin_left: Unit::pt(40.0),
            header_distance: Unit::pt(20.0),
            footer_distance: Unit::pt(20.0),
        }
    }
}

impl PageSetup {
    /// Usable body width between the left and right margins.
    pub fn body_width(&self) -> Unit {
        Unit::pt(self.page_width.to_pt() - self.margin_left.to_pt() - self.margin_right.to_pt())
    }
}

/// Named paragraph styles, looked up by descriptors carrying a style name.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: HashMap<String, ParagraphFormat>,
}

impl StyleSheet {
    pub fn define(&mut self, name: impl Into<String>, format: ParagraphFormat) {
        self.styles.insert(name.into(), format);
    }

    pub fn get(&self, name: &str) -> Option<&ParagraphFormat> {
        self.styles.get(name)
    }
}

// ---------------------------------------------------------------------------
// Content blocks
// ---------------------------------------------------------------------------

/// A single run of text with optional direct or named formatting.
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub text: String,
    pub format: Option<ParagraphFormat>,
    pub style_name: Option<String>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Paragraph {
            text: text.into(),
            format: None,
            style_name: None,
        }
    }

    pub fn with_format(mut self, format: ParagraphFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_style(mut self, style_name: impl Into<String>) -> Self {
        self.style_name = Some(style_name.into());
        self
    }
}

/// Reference to an image file. Relative names are resolved against the
/// document's image search path at render time.
#[derive(Debug, Clone)]
pub struct ImageRef {
    pub name: String,
    pub width: Option<Unit>,
    pub height: Option<Unit>,
}

impl ImageRef {
    pub fn new(name: impl Into<String>) -> Self {
        ImageRef {
            name: name.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_size(mut self, width: Unit, height: Unit) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

#[derive(Debug, Clone)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Image(ImageRef),
}

/// Anything that can hold content blocks: sections, headers/footers, cells.
pub trait BlockContainer {
    fn blocks(&self) -> &[Block];

    fn blocks_mut(&mut self) -> &mut Vec<Block>;

    fn add_paragraph(&mut self, text: impl Into<String>) -> &mut Paragraph {
        let blocks = self.blocks_mut();
        blocks.push(Block::Paragraph(Paragraph::new(text)));
        match blocks.last_mut() {
            Some(Block::Paragraph(paragraph)) => paragraph,
            _ => unreachable!(),
        }
    }

    fn add_table(&mut self) -> &mut Table {
        let blocks = self.blocks_mut();
        blocks.push(Block::Table(Table::new()));
        match blocks.last_mut() {
            Some(Block::Table(table)) => table,
            _ => unreachable!(),
        }
    }

    fn add_image(&mut self, image: ImageRef) -> &mut ImageRef {
        let blocks = self.blocks_mut();
        blocks.push(Block::Image(image));
        match blocks.last_mut() {
            Some(Block::Image(image)) => image,
            _ => unreachable!(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Which edge of a rectangular cell range `set_edge` affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
    /// All four outer edges of the range.
    Box,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub width: Unit,
    pub borders: Option<Borders>,
    pub shading: Option<Shading>,
    pub format: Option<ParagraphFormat>,
    pub style_name: Option<String>,
}

impl Column {
    fn new(width: Unit) -> Self {
        Column {
            width,
            borders: None,
            shading: None,
            format: None,
            style_name: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub borders: Option<Borders>,
    pub shading: Option<Shading>,
    blocks: Vec<Block>,
}

impl BlockContainer for Cell {
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

#[derive(Debug, Clone, Default)]
pub struct Row {
    pub borders: Option<Borders>,
    pub shading: Option<Shading>,
    pub format: Option<ParagraphFormat>,
    pub style_name: Option<String>,
    pub height: Option<Unit>,
    pub height_rule: RowHeightRule,
    pub vertical_alignment: VerticalAlignment,
    /// Number of following rows to keep on the same page as this row.
    pub keep_with: usize,
    cells: Vec<Cell>,
}

impl Row {
    fn with_cells(count: usize) -> Self {
        Row {
            cells: (0..count).map(|_| Cell::default()).collect(),
            ..Row::default()
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }
}

/// The tabular layout primitive. Columns are fixed once rows exist; each
/// added row carries one cell per column.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub borders: Option<Borders>,
    pub shading: Option<Shading>,
    pub format: Option<ParagraphFormat>,
    pub style_name: Option<String>,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    pub fn add_column(&mut self, width: Unit) -> &mut Column {
        self.columns.push(Column::new(width));
        let last = self.columns.len() - 1;
        &mut self.columns[last]
    }

    pub fn add_row(&mut self) -> &mut Row {
        self.rows.push(Row::with_cells(self.columns.len()));
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    /// Total width of all columns.
    pub fn width(&self) -> Unit {
        Unit::pt(self.columns.iter().map(|c| c.width.to_pt()).sum())
    }

    /// Apply a border along one edge of the rectangular cell range starting
    /// at (`col`, `row`) and spanning `col_count` × `row_count` cells. Only
    /// the boundary cells of the range are touched. Out-of-range spans are
    /// clamped to the table's extent.
    #[allow(clippy::too_many_arguments)]
    pub fn set_edge(
        &mut self,
        col: usize,
        row: usize,
        col_count: usize,
        row_count: usize,
        edge: Edge,
        style: BorderStyle,
        width: Unit,
        color: Color,
    ) {
        let border = Border::new(style, width, color);
        let col_end = (col + col_count).min(self.columns.len());
        let row_end = (row + row_count).min(self.rows.len());
        if col_end <= col || row_end <= row {
            return;
        }

        for r in row..row_end {
            for c in col..col_end {
                let on_top = r == row;
                let on_bottom = r == row_end - 1;
                let on_left = c == col;
                let on_right = c == col_end - 1;

                // Interior cells keep their borders untouched, `None` included.
                let affected = match edge {
                    Edge::Top => on_top,
                    Edge::Bottom => on_bottom,
                    Edge::Left => on_left,
                    Edge::Right => on_right,
                    Edge::Box => on_top || on_bottom || on_left || on_right,
                };
                if !affected {
                    continue;
                }

                let Some(cell) = self.rows[r].cells.get_mut(c) else {
                    continue;
                };
                let borders = cell.borders.get_or_insert_with(Borders::default);
                match edge {
                    Edge::Top if on_top => borders.top = Some(border),
                    Edge::Bottom if on_bottom => borders.bottom = Some(border),
                    Edge::Left if on_left => borders.left = Some(border),
                    Edge::Right if on_right => borders.right = Some(border),
                    Edge::Box => {
                        if on_top {
                            borders.top = Some(border);
                        }
                        if on_bottom {
                            borders.bottom = Some(border);
                        }
                        if on_left {
                            borders.left = Some(border);
                        }
                        if on_right {
                            borders.right = Some(border);
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sections and the document
// ---------------------------------------------------------------------------

/// Repeated content at the top or bottom of every page of a section.
#[derive(Debug, Clone, Default)]
pub struct HeaderFooter {
    blocks: Vec<Block>,
}

impl BlockContainer for HeaderFooter {
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

/// One page sequence with its own geometry, header, and footer.
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub page_setup: PageSetup,
    pub header: HeaderFooter,
    pub footer: HeaderFooter,
    blocks: Vec<Block>,
}

impl BlockContainer for Section {
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

/// The assembled document model, created fresh for every generation pass.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub styles: StyleSheet,
    /// Directory against which relative image names are resolved. Set by the
    /// staging subsystem when the temp directory is created, cleared again on
    /// cleanup.
    pub image_search_path: Option<PathBuf>,
    sections: Vec<Section>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Document {
            title: title.into(),
            styles: StyleSheet::default(),
            image_search_path: None,
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self) -> &mut Section {
        self.sections.push(Section::default());
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// The current (last) section, creating one if the document is empty.
    pub fn last_section_mut(&mut self) -> &mut Section {
        if self.sections.is_empty() {
            self.sections.push(Section::default());
        }
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }
}
