// Semantic parsing: raw text → ExtractedEntities.
// Dictionary and pattern based; no model calls, no I/O.

pub mod cache;
pub mod entities;
pub mod semantic;

pub use entities::ExtractedEntities;
pub use semantic::{ParseCache, SemanticParser};
