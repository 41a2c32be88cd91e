//! Contextual prompt adaptation for medical study requests.
//!
//! Free-form input is parsed into entities (`parser`), matched against a
//! template catalog (`engine`), and the best template is filled with inferred
//! and manual values (`adapter`). `session` ties the steps together for an
//! interactive editor with debounced input.

pub mod adapter;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod errors;
pub mod ontology;
pub mod parser;
pub mod session;

pub use adapter::{AdaptedPrompt, TemplateAdapter};
pub use catalog::{Template, TemplateCatalog};
pub use config::{Config, EngineSettings};
pub use engine::{ContextEngine, ContextualIntent};
pub use errors::EngineError;
pub use ontology::Ontology;
pub use parser::{ExtractedEntities, SemanticParser};
pub use session::{PromptSession, SessionAnalysis, SessionPhase, TokioScheduler};
