//! FormattedTable – a reusable tabular abstraction that initializes a
//! table's column structure and styling once, then supports incremental row
//! append with consistent row styling.
//!
//! Initialization happens at construction, so "initialize twice" and "append
//! a row before initializing" are unrepresentable rather than runtime
//! preconditions.

use crate::error::{Error, Result};
use crate::format::{ColumnFormat, RowFormat, TableFormat};
use crate::model::{
    BlockContainer, Border, BorderStyle, Borders, Color, Edge, Row, RowHeightRule, Table, Unit,
};

/// Wraps exactly one [`Table`] for its lifetime. Columns are created from
/// the descriptor sequence in order (left to right); the optional row
/// descriptor is retained and reapplied to every appended row.
pub struct FormattedTable<'a> {
    table: &'a mut Table,
    row_format: Option<RowFormat>,
}

impl<'a> FormattedTable<'a> {
    /// Initialize `table` with one column per descriptor, applying the
    /// table-level descriptor first (when present) and each column
    /// descriptor to its newly added column.
    ///
    /// Fails with [`Error::InvalidArgument`] when `columns` is empty and
    /// with [`Error::InvalidState`] when `table` already has columns or
    /// rows (a table is initialized exactly once).
    pub fn new(
        table: &'a mut Table,
        columns: &[ColumnFormat],
        table_format: Option<&TableFormat>,
        row_format: Option<RowFormat>,
    ) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::InvalidArgument(
                "a table needs at least one column format".to_string(),
            ));
        }
        if table.column_count() > 0 || table.row_count() > 0 {
            return Err(Error::InvalidState(
                "table is already initialized".to_string(),
            ));
        }

        if let Some(table_format) = table_format {
            table_format.apply(table);
        }
        for column_format in columns {
            let column = table.add_column(column_format.width);
            column_format.apply(column);
        }

        Ok(FormattedTable { table, row_format })
    }

    /// Append a row, apply the shared row descriptor to it when one was
    /// supplied, and return it for content population.
    pub fn append_row(&mut self) -> &mut Row {
        let row = self.table.add_row();
        if let Some(row_format) = &self.row_format {
            row_format.apply(row);
        }
        row
    }

    /// Apply a border along `edge` of the table's current full extent,
    /// without touching per-cell interior borders.
    pub fn apply_outer_border_only(
        &mut self,
        edge: Edge,
        style: BorderStyle,
        width: Unit,
        color: Color,
    ) {
        let cols = self.table.column_count();
        let rows = self.table.row_count();
        self.table.set_edge(0, 0, cols, rows, edge, style, width, color);
    }

    /// Keep all current rows on one page by linking the first row to the
    /// rows that follow it. No-op on an empty table.
    pub fn keep_all_rows_together(&mut self) {
        let count = self.table.row_count();
        if count == 0 {
            return;
        }
        if let Some(first) = self.table.row_mut(0) {
            first.keep_with = count - 1;
        }
    }

    /// The wrapped table.
    pub fn table(&mut self) -> &mut Table {
        self.table
    }
}

/// Add a separator to any block container (section, header/footer, cell): a
/// one-column table of two fixed-height rows, the first optionally carrying
/// a bottom rule in the given colour.
pub fn add_separator<C: BlockContainer>(
    target: &mut C,
    width: Unit,
    height: Unit,
    rule: Option<Color>,
) {
    build_separator(target.add_table(), width, height, rule);
}

fn build_separator(table: &mut Table, width: Unit, height: Unit, rule: Option<Color>) {
    table.add_column(width);

    let first = table.add_row();
    first.height = Some(height);
    first.height_rule = RowHeightRule::Exactly;
    if let Some(color) = rule {
        first.borders = Some(Borders::bottom_only(Border::hairline(color)));
    }

    let second = table.add_row();
    second.height = Some(height);
    second.height_rule = RowHeightRule::Exactly;
}
