//! Query parameter types shared by the MQT handlers.

use mqt_core::types::DbId;
use serde::Deserialize;

/// `?import_id=` filter for line listing and on-demand validation.
#[derive(Debug, Deserialize)]
pub struct ImportFilterParams {
    pub import_id: Option<DbId>,
}

/// `?is_resolved=` filter for alert listing.
#[derive(Debug, Deserialize)]
pub struct AlertFilterParams {
    pub is_resolved: Option<bool>,
}
