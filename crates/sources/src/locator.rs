//! Spreadsheet document identifiers.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SourceError;

/// Matches the `/d/<id>` path segment of a spreadsheet URL.
static SHEET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([A-Za-z0-9_-]+)").expect("valid regex"));

/// Identifier of a document on the spreadsheet service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetId(String);

impl SheetId {
    /// Extract the document id from a sheet URL.
    pub fn parse(locator: &str) -> Result<Self, SourceError> {
        SHEET_ID_RE
            .captures(locator.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
            .ok_or_else(|| SourceError::InvalidLocator(locator.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SheetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn extracts_id_from_edit_url() {
        let id = SheetId::parse(
            "https://docs.google.com/spreadsheets/d/1AbC-d_EF23/edit#gid=0",
        )
        .unwrap();
        assert_eq!(id.as_str(), "1AbC-d_EF23");
    }

    #[test]
    fn extracts_id_without_trailing_path() {
        let id = SheetId::parse("https://docs.google.com/spreadsheets/d/xyz").unwrap();
        assert_eq!(id.to_string(), "xyz");
    }

    #[test]
    fn rejects_url_without_document_segment() {
        assert_matches!(
            SheetId::parse("https://docs.google.com/spreadsheets/"),
            Err(SourceError::InvalidLocator(_))
        );
        assert_matches!(SheetId::parse(""), Err(SourceError::InvalidLocator(_)));
    }
}
