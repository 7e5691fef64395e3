//! Import lifecycle status and source kinds.
//!
//! The string forms match the values stored in `mqt_imports.status` and
//! `mqt_imports.source_kind` (enforced by CHECK constraints).

use serde::{Deserialize, Serialize};

/// Lifecycle of one ingestion attempt.
///
/// ```text
/// pending -> processing -> completed
///                       \-> failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: ImportStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the rows of an import came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A document on the spreadsheet service, referenced by URL.
    RemoteSheet,
    /// A workbook uploaded by the caller.
    UploadedFile,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RemoteSheet => "remote_sheet",
            Self::UploadedFile => "uploaded_file",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "remote_sheet" => Some(Self::RemoteSheet),
            "uploaded_file" => Some(Self::UploadedFile),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_forward_transitions_are_legal() {
        assert!(ImportStatus::Pending.can_transition_to(ImportStatus::Processing));
        assert!(ImportStatus::Processing.can_transition_to(ImportStatus::Completed));
        assert!(ImportStatus::Processing.can_transition_to(ImportStatus::Failed));
        assert!(!ImportStatus::Completed.can_transition_to(ImportStatus::Failed));
        assert!(!ImportStatus::Failed.can_transition_to(ImportStatus::Processing));
        assert!(!ImportStatus::Pending.can_transition_to(ImportStatus::Completed));
    }

    #[test]
    fn source_kind_round_trips() {
        for kind in [SourceKind::RemoteSheet, SourceKind::UploadedFile] {
            assert_eq!(SourceKind::parse(kind.as_str()), Some(kind));
        }
    }
}
