pub mod imports;
pub mod reports;
pub mod validation_rules;
