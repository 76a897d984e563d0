use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pol_model::ColumnMapping;
use pol_transform::TableSummary;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// Table of written tables with a total row.
pub fn summary_table(written: &[TableSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut total_rows = 0usize;
    for summary in written {
        total_rows += summary.rows;
        table.add_row(vec![
            Cell::new(&summary.table),
            Cell::new(summary.rows),
            Cell::new(summary.columns),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        Cell::new("-").add_attribute(Attribute::Dim),
    ]);
    table
}

pub fn print_summary(written: &[TableSummary]) {
    println!("{}", summary_table(written));
}

/// Table of raw column names and their normalized targets.
pub fn mapping_table(mapping: &ColumnMapping) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column Name"), header_cell("Normalized")]);
    apply_table_style(&mut table);
    for (raw, target) in mapping.iter() {
        table.add_row(vec![raw, target]);
    }
    table
}
