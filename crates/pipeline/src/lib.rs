//! MQT import pipeline.
//!
//! Wires the source adapters and the pure domain logic of `mqt-core` to a
//! persistence backend. The [`orchestrator`] runs imports; [`queries`] and
//! [`rules`] expose the read and rule-management operations. All of them
//! depend only on the repository traits in [`store`], implemented for
//! PostgreSQL by [`pg::PgStore`] and in memory by [`memory::InMemoryStore`].

pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod pg;
pub mod queries;
pub mod rules;
pub mod store;

pub use error::{PipelineError, StoreError};
pub use memory::InMemoryStore;
pub use orchestrator::{ImportAlert, ImportConfig, ImportOrchestrator, ImportResult, RowError};
pub use pg::PgStore;
pub use queries::MqtQueries;
pub use rules::{RulePatch, RuleService};
pub use store::MqtStore;
