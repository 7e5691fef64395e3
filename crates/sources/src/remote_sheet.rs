//! Adapter for MQT documents hosted on the spreadsheet service.
//!
//! Columns are fixed: A=code, B=description, C=planned, D=executed, E=unit,
//! F=unit price (optional). The first row is the header.

use std::sync::Arc;

use mqt_core::canonical::CanonicalRow;

use crate::cells::{is_blank_row, parse_number};
use crate::error::SourceError;
use crate::google::SheetValuesFetcher;
use crate::locator::SheetId;

pub const DEFAULT_SHEET_RANGE: &str = "A1:F1000";

const COL_CODE: usize = 0;
const COL_DESCRIPTION: usize = 1;
const COL_PLANNED: usize = 2;
const COL_EXECUTED: usize = 3;
const COL_UNIT: usize = 4;
const COL_UNIT_PRICE: usize = 5;

pub struct RemoteSheetAdapter {
    fetcher: Arc<dyn SheetValuesFetcher>,
    range: String,
}

impl RemoteSheetAdapter {
    pub fn new(fetcher: Arc<dyn SheetValuesFetcher>, range: impl Into<String>) -> Self {
        Self {
            fetcher,
            range: range.into(),
        }
    }

    /// Fetch the configured range of `sheet` and map it to canonical rows.
    pub async fn parse(&self, sheet: &SheetId) -> Result<Vec<CanonicalRow>, SourceError> {
        let values = self.fetcher.fetch_values(sheet, &self.range).await?;
        rows_from_values(&values)
    }
}

/// Map fetched sheet values (header first) to canonical rows.
pub fn rows_from_values(values: &[Vec<String>]) -> Result<Vec<CanonicalRow>, SourceError> {
    if values.len() < 2 {
        return Err(SourceError::EmptyDocument);
    }

    Ok(values[1..]
        .iter()
        .filter(|row| !is_blank_row(row.as_slice()))
        .map(|row| {
            let text = |col: usize| row.get(col).map(|s| s.trim().to_string()).unwrap_or_default();
            let number = |col: usize| row.get(col).and_then(|s| parse_number(s));
            CanonicalRow {
                item_code: text(COL_CODE),
                item_description: text(COL_DESCRIPTION),
                planned_quantity: number(COL_PLANNED).unwrap_or(0.0),
                executed_quantity: number(COL_EXECUTED).unwrap_or(0.0),
                unit: text(COL_UNIT),
                unit_price: number(COL_UNIT_PRICE),
                category: None,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    struct FakeFetcher {
        values: Vec<Vec<String>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SheetValuesFetcher for FakeFetcher {
        async fn fetch_values(
            &self,
            sheet: &SheetId,
            range: &str,
        ) -> Result<Vec<Vec<String>>, SourceError> {
            self.calls
                .lock()
                .unwrap()
                .push((sheet.to_string(), range.to_string()));
            Ok(self.values.clone())
        }
    }

    #[test]
    fn maps_fixed_columns() {
        let values = vec![
            row(&["Code", "Description", "Planned", "Executed", "Unit", "Price"]),
            row(&["1.01", "Concrete", "100", "120", "m3", "85.5"]),
            row(&["1.02", "Rebar", "50", "abc", "kg"]),
        ];
        let rows = rows_from_values(&values).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item_code, "1.01");
        assert_eq!(rows[0].planned_quantity, 100.0);
        assert_eq!(rows[0].executed_quantity, 120.0);
        assert_eq!(rows[0].unit, "m3");
        assert_eq!(rows[0].unit_price, Some(85.5));
        assert_eq!(rows[1].executed_quantity, 0.0);
        assert_eq!(rows[1].unit_price, None);
    }

    #[test]
    fn short_and_blank_rows() {
        let values = vec![
            row(&["Code"]),
            row(&["", "  ", ""]),
            row(&["A"]),
            row(&[]),
        ];
        let rows = rows_from_values(&values).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_code, "A");
        assert_eq!(rows[0].item_description, "");
        assert_eq!(rows[0].planned_quantity, 0.0);
    }

    #[test]
    fn header_only_is_empty_document() {
        assert_matches!(
            rows_from_values(&[row(&["Code", "Description"])]),
            Err(SourceError::EmptyDocument)
        );
        assert_matches!(rows_from_values(&[]), Err(SourceError::EmptyDocument));
    }

    #[tokio::test]
    async fn parse_fetches_configured_range() {
        let fetcher = Arc::new(FakeFetcher {
            values: vec![row(&["h"]), row(&["X", "d", "1", "1", "u"])],
            calls: Mutex::new(Vec::new()),
        });
        let adapter = RemoteSheetAdapter::new(fetcher.clone(), "Sheet1!A1:F50");
        let sheet = SheetId::parse("https://docs.google.com/spreadsheets/d/abc123/edit").unwrap();

        let rows = adapter.parse(&sheet).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            fetcher.calls.lock().unwrap().as_slice(),
            &[("abc123".to_string(), "Sheet1!A1:F50".to_string())]
        );
    }
}
