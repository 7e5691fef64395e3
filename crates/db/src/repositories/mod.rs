//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod alert_repo;
pub mod import_repo;
pub mod line_repo;
pub mod statistics_repo;
pub mod validation_rule_repo;

pub use alert_repo::MqtAlertRepo;
pub use import_repo::MqtImportRepo;
pub use line_repo::MqtLineRepo;
pub use statistics_repo::MqtStatisticsRepo;
pub use validation_rule_repo::MqtValidationRuleRepo;
