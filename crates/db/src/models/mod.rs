//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) where rows are mutable

pub mod alert;
pub mod import;
pub mod line;
pub mod statistics;
pub mod validation_rule;
