//! # Intake
//!
//! Turns free-text chat messages about tasks and projects into structured
//! records: intent classification, entity extraction over a dependency
//! parse, validation against known users and projects, and a similarity
//! based fallback for messages that ask a question instead.

pub mod analyzer;
pub mod config;
pub mod document;
pub mod extract;
pub mod fallback;
pub mod orchestrator;
pub mod record;
pub mod registry;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

#[cfg(test)]
mod service_tests;

pub use analyzer::{AnalyzerError, LinguisticAnalyzer};
pub use config::IntakeConfig;
pub use document::{Document, DocumentBuilder, SentenceSpan, TokenId};
pub use extract::{DeadlinePolicy, SynonymTable};
pub use fallback::{FALLBACK_APOLOGY, FallbackResponder};
pub use orchestrator::Orchestrator;
pub use record::{Intent, StructuredRecord};
pub use registry::{ReferenceRegistry, RegistrySnapshot};
pub use service::{Decision, INSERT_SUCCESS_MESSAGE, IntakeResponse, IntakeService};
pub use store::{PersistenceStore, StoreError};
