//! Adapter for uploaded MQT workbooks (xlsx, xls, ods).
//!
//! The format is sniffed from the bytes. Only the first sheet is read; its
//! first non-empty row is the header, and columns are located by header name
//! rather than by position.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use mqt_core::canonical::CanonicalRow;

use crate::cells::parse_number;
use crate::error::SourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Code,
    Description,
    Planned,
    Executed,
    Unit,
    UnitPrice,
    Category,
}

/// Accepted header spellings, compared after trimming and lowercasing.
const HEADER_ALIASES: &[(Column, &[&str])] = &[
    (Column::Code, &["itemcode", "item_code", "item code", "code"]),
    (
        Column::Description,
        &["itemdescription", "item_description", "item description", "description"],
    ),
    (
        Column::Planned,
        &["plannedquantity", "planned_quantity", "planned qty", "planned quantity"],
    ),
    (
        Column::Executed,
        &["executedquantity", "executed_quantity", "executed qty", "executed quantity"],
    ),
    (Column::Unit, &["unit"]),
    (Column::UnitPrice, &["unitprice", "unit_price", "unit price"]),
    (Column::Category, &["category"]),
];

fn column_for(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase();
    HEADER_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&normalized.as_str()))
        .map(|(column, _)| *column)
}

/// Parses uploaded workbooks into canonical rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookAdapter;

impl WorkbookAdapter {
    pub fn parse(&self, bytes: &[u8]) -> Result<Vec<CanonicalRow>, SourceError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| SourceError::Workbook(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SourceError::Workbook("workbook has no sheets".to_string()))?
            .map_err(|e| SourceError::Workbook(e.to_string()))?;

        let mut rows = range.rows().skip_while(|row| row.iter().all(is_empty));

        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };

        let mut columns: HashMap<Column, usize> = HashMap::new();
        for (index, cell) in header.iter().enumerate() {
            if let Some(column) = column_for(&cell_text(cell)) {
                columns.entry(column).or_insert(index);
            }
        }
        tracing::debug!(mapped_columns = columns.len(), "Resolved workbook header");

        Ok(rows
            .filter(|row| !row.iter().all(is_empty))
            .map(|row| {
                let cell = |column: Column| columns.get(&column).and_then(|&i| row.get(i));
                let text = |column: Column| cell(column).map(cell_text).unwrap_or_default();
                let number = |column: Column| cell(column).and_then(cell_number);
                let category = text(Column::Category);

                CanonicalRow {
                    item_code: text(Column::Code),
                    item_description: text(Column::Description),
                    planned_quantity: number(Column::Planned).unwrap_or(0.0),
                    executed_quantity: number(Column::Executed).unwrap_or(0.0),
                    unit: text(Column::Unit),
                    unit_price: number(Column::UnitPrice),
                    category: (!category.is_empty()).then_some(category),
                }
            })
            .collect())
    }
}

fn is_empty(cell: &Data) -> bool {
    cell_text(cell).is_empty()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        _ => String::new(),
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => f.is_finite().then_some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_number(s),
        _ => None,
    }
}
