/// Errors raised while reading an MQT source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The locator does not identify a spreadsheet document.
    #[error("Invalid sheet URL: {0}")]
    InvalidLocator(String),

    /// The document has no data rows below the header.
    #[error("Sheet is empty or has no data rows")]
    EmptyDocument,

    /// Service-account credentials are missing or unusable.
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The token endpoint rejected the service-account assertion.
    #[error("Authentication failed ({status}): {body}")]
    Auth { status: u16, body: String },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The spreadsheet service returned a non-2xx status.
    #[error("Spreadsheet service error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The configured spreadsheet service base URL is unusable.
    #[error("Invalid spreadsheet service URL: {0}")]
    Endpoint(String),

    /// The uploaded bytes are not a readable workbook.
    #[error("Invalid workbook: {0}")]
    Workbook(String),
}

impl SourceError {
    /// Whether the error was caused by the caller's input rather than by a
    /// collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidLocator(_) | Self::EmptyDocument | Self::Workbook(_)
        )
    }
}
