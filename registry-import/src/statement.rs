//! Insert statement rendering.

use crate::mapper::MappedRecord;

/// Render one `INSERT INTO <table> (<cols>) VALUES (<literals>);` statement.
///
/// Columns and values appear in the mapped record's order, comma separated
/// without spaces. Values are positional, so the order must match the
/// schema's output columns.
pub fn render_insert(table: &str, record: &MappedRecord) -> String {
    let columns: Vec<&str> = record.columns().collect();
    let values: Vec<&str> = record.literals().map(|l| l.as_str()).collect();
    format!(
        "INSERT INTO {table} ({}) VALUES ({});",
        columns.join(","),
        values.join(",")
    )
}
