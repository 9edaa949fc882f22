//! Style descriptors – declarative, reusable format descriptions applied to
//! columns, rows, and tables at the moment those objects are created.
//!
//! Every field is optional: an unset field means "leave the target's existing
//! value alone". Applying a descriptor clones compound values (borders,
//! shading, paragraph format) so a target never aliases descriptor state and
//! one descriptor can safely style many targets.
//!
//! All descriptors derive serde traits so style sets can be kept in JSON
//! configuration next to the code that uses them.

use serde::{Deserialize, Serialize};

use crate::model::{
    Borders, Column, ParagraphFormat, Row, RowHeightRule, Shading, Table, Unit, VerticalAlignment,
};

/// Format descriptor for one table column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnFormat {
    /// Column width. Unlike the style fields this is structural: the column
    /// is created with this width by [`crate::table::FormattedTable`].
    pub width: Unit,
    pub format: Option<ParagraphFormat>,
    pub borders: Option<Borders>,
    pub shading: Option<Shading>,
    pub style_name: Option<String>,
}

impl ColumnFormat {
    pub fn new(width: Unit) -> Self {
        ColumnFormat {
            width,
            ..ColumnFormat::default()
        }
    }

    pub fn with_format(mut self, format: ParagraphFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_borders(mut self, borders: Borders) -> Self {
        self.borders = Some(borders);
        self
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }

    pub fn with_style(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }

    /// Copy every set field onto `column`. Unset fields leave the column's
    /// current values untouched.
    pub fn apply(&self, column: &mut Column) {
        if let Some(format) = &self.format {
            column.format = Some(format.clone());
        }
        if let Some(borders) = &self.borders {
            column.borders = Some(borders.clone());
        }
        if let Some(shading) = &self.shading {
            column.shading = Some(*shading);
        }
        if let Some(style_name) = &self.style_name {
            column.style_name = Some(style_name.clone());
        }
    }
}

/// Format descriptor for table rows, typically shared by every row of a
/// [`crate::table::FormattedTable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowFormat {
    pub borders: Option<Borders>,
    pub format: Option<ParagraphFormat>,
    pub height: Option<Unit>,
    pub height_rule: Option<RowHeightRule>,
    pub shading: Option<Shading>,
    pub vertical_alignment: Option<VerticalAlignment>,
    pub style_name: Option<String>,
}

impl RowFormat {
    pub fn new() -> Self {
        RowFormat::default()
    }

    pub fn with_borders(mut self, borders: Borders) -> Self {
        self.borders = Some(borders);
        self
    }

    pub fn with_format(mut self, format: ParagraphFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_height(mut self, height: Unit, rule: RowHeightRule) -> Self {
        self.height = Some(height);
        self.height_rule = Some(rule);
        self
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }

    pub fn with_vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = Some(alignment);
        self
    }

    pub fn with_style(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }

    /// Copy every set field onto `row`.
    pub fn apply(&self, row: &mut Row) {
        if let Some(borders) = &self.borders {
            row.borders = Some(borders.clone());
        }
        if let Some(format) = &self.format {
            row.format = Some(format.clone());
        }
        if let Some(height) = self.height {
            row.height = Some(height);
        }
        if let Some(rule) = self.height_rule {
            row.height_rule = rule;
        }
        if let Some(shading) = &self.shading {
            row.shading = Some(*shading);
        }
        if let Some(alignment) = self.vertical_alignment {
            row.vertical_alignment = alignment;
        }
        if let Some(style_name) = &self.style_name {
            row.style_name = Some(style_name.clone());
        }
    }
}

/// Format descriptor applied once to the table itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFormat {
    pub borders: Option<Borders>,
    pub format: Option<ParagraphFormat>,
    pub shading: Option<Shading>,
    pub style_name: Option<String>,
}

impl TableFormat {
    pub fn new() -> Self {
        TableFormat::default()
    }

    pub fn with_borders(mut self, borders: Borders) -> Self {
        self.borders = Some(borders);
        self
    }

    pub fn with_format(mut self, format: ParagraphFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }

    pub fn with_style(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }

    /// Copy every set field onto `table`.
    pub fn apply(&self, table: &mut Table) {
        if let Some(borders) = &self.borders {
            table.borders = Some(borders.clone());
        }
        if let Some(format) = &self.format {
            table.format = Some(format.clone());
        }
        if let Some(shading) = &self.shading {
            table.shading = Some(*shading);
        }
        if let Some(style_name) = &self.style_name {
            table.style_name = Some(style_name.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Border, BorderStyle, Color};

    #[test]
    fn column_apply_changes_only_set_fields() {
        let mut table = Table::new();
        let column = table.add_column(Unit::pt(80.0));
        column.style_name = Some("Existing".to_string());

        let descriptor =
            ColumnFormat::new(Unit::pt(80.0)).with_shading(Shading::new(Color::gray(0.9)));
        descriptor.apply(column);

        assert_eq!(column.shading, Some(Shading::new(Color::gray(0.9))));
        // Unset descriptor fields must not clear existing values.
        assert_eq!(column.style_name.as_deref(), Some("Existing"));
        assert!(column.borders.is_none());
        assert!(column.format.is_none());
    }

    #[test]
    fn row_apply_sets_height_and_rule() {
        let mut table = Table::new();
        table.add_column(Unit::pt(100.0));
        let descriptor = RowFormat::new().with_height(Unit::mm(5.0), RowHeightRule::Exactly);

        let row = table.add_row();
        descriptor.apply(row);

        assert_eq!(row.height, Some(Unit::mm(5.0)));
        assert_eq!(row.height_rule, RowHeightRule::Exactly);
        assert_eq!(row.vertical_alignment, VerticalAlignment::Top);
    }

    #[test]
    fn applied_targets_do_not_alias() {
        let descriptor = RowFormat::new()
            .with_borders(Borders::all(Border::hairline(Color::BLACK)));

        let mut table = Table::new();
        table.add_column(Unit::pt(100.0));
        descriptor.apply(table.add_row());
        descriptor.apply(table.add_row());

        // Mutating the first row's borders must not affect the second row.
        if let Some(first) = table.row_mut(0) {
            if let Some(borders) = &mut first.borders {
                borders.top = Some(Border::new(
                    BorderStyle::Dashed,
                    Unit::pt(2.0),
                    Color::WHITE,
                ));
            }
        }
        let second = &table.rows()[1];
        let top = second.borders.as_ref().unwrap().top.unwrap();
        assert_eq!(top.style, BorderStyle::Single);
        assert_eq!(top.color, Color::BLACK);
    }

    #[test]
    fn table_apply_overwrites_carried_fields() {
        let mut table = Table::new();
        table.style_name = Some("Old".to_string());

        let descriptor = TableFormat::new().with_style("New");
        descriptor.apply(&mut table);

        assert_eq!(table.style_name.as_deref(), Some("New"));
    }

    #[test]
    fn descriptor_from_json_picks_up_only_set_fields() {
        let json = r#"{
            "height": 14.0,
            "height_rule": "Exactly",
            "shading": { "color": { "r": 0.9, "g": 0.9, "b": 0.9 } }
        }"#;
        let descriptor: RowFormat = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.height, Some(Unit::pt(14.0)));
        assert_eq!(descriptor.height_rule, Some(RowHeightRule::Exactly));
        assert!(descriptor.shading.is_some());
        assert!(descriptor.borders.is_none());
        assert!(descriptor.format.is_none());
        assert!(descriptor.style_name.is_none());
    }
}
