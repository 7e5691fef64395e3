//! Source adapters that turn an MQT spreadsheet into canonical rows.
//!
//! Two sources are supported:
//!
//! - [`RemoteSheetAdapter`]: a document on the spreadsheet service, fetched
//!   through a [`SheetValuesFetcher`] (normally [`GoogleSheetsClient`]).
//! - [`WorkbookAdapter`]: an uploaded xlsx/xls/ods workbook held in memory.
//!
//! Both return [`mqt_core::canonical::CanonicalRow`]s in source order and
//! perform no I/O beyond the fetch or parse itself.

pub mod cells;
pub mod credentials;
pub mod error;
pub mod google;
pub mod locator;
pub mod remote_sheet;
pub mod workbook;

pub use credentials::{
    CredentialProvider, EnvCredentialProvider, ServiceAccountCredentials,
    StaticCredentialProvider,
};
pub use error::SourceError;
pub use google::{GoogleSheetsClient, SheetValuesFetcher, SheetsClientConfig};
pub use locator::SheetId;
pub use remote_sheet::RemoteSheetAdapter;
pub use workbook::WorkbookAdapter;
