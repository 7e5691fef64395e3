//! Domain types and pure logic for MQT (bill-of-quantities) tracking.
//!
//! Nothing in this crate touches the network or the database. The variance
//! calculator, alert generator and validation rule engine are plain
//! functions over the types defined here, shared by the adapters, the
//! persistence layer and the import pipeline.

pub mod alert;
pub mod canonical;
pub mod error;
pub mod import_status;
pub mod statistics;
pub mod types;
pub mod validation;
pub mod variance;
