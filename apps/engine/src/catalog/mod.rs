//! Template catalog: the read-only, ordered collection the context engine
//! scores against. Loaded from JSON or taken from the built-in defaults.

mod defaults;
pub mod slots;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::EngineError;

/// A parameterized prompt template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub title: String,
    /// Category tag, compared against specialty and output-format keys.
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub recommended_ai: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
    /// Only used as a ranking tiebreak.
    #[serde(default)]
    pub usage_count: u32,
}

impl Template {
    /// Declared slots in first-appearance order.
    pub fn slots(&self) -> Result<Vec<String>, EngineError> {
        slots::extract_slots(&self.id, &self.body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The medical study templates shipped with the engine.
    pub fn builtin() -> Self {
        Self::new(defaults::builtin_templates())
    }

    /// Parse a JSON array of templates. Slot syntax is not validated here;
    /// malformed bodies surface when a template is analyzed or adapted.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let templates: Vec<Template> = serde_json::from_str(json)?;
        Ok(Self::new(templates))
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&raw)?;
        info!(path = %path.display(), templates = catalog.len(), "Template catalog loaded");
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_templates_are_well_formed() {
        let catalog = TemplateCatalog::builtin();
        assert!(catalog.len() >= 8);
        for template in catalog.iter() {
            let slots = template.slots().unwrap_or_else(|e| panic!("{}: {e}", template.id));
            assert!(!slots.is_empty(), "{} declares no slots", template.id);
        }
    }

    #[test]
    fn test_builtin_slots_partition_into_filled_and_pending() {
        use std::collections::{BTreeMap, BTreeSet};

        use crate::adapter::{SlotValue, TemplateAdapter};

        let adapter = TemplateAdapter::new(1_000);
        for template in TemplateCatalog::builtin().iter() {
            let slots = template.slots().unwrap();
            let expected: BTreeSet<&String> = slots.iter().collect();
            let partial: BTreeMap<String, SlotValue> = slots
                .iter()
                .step_by(2)
                .map(|slot| (slot.clone(), SlotValue::manual("valor")))
                .collect();

            for values in [BTreeMap::new(), partial] {
                let adapted = adapter.adapt(template, &values, "", None).unwrap();
                let filled: BTreeSet<&String> = adapted.filled_variables.iter().collect();
                let pending: BTreeSet<&String> = adapted.pending_variables.iter().collect();
                assert!(filled.is_disjoint(&pending), "{}: filled and pending overlap", template.id);
                let union: BTreeSet<&String> = filled.union(&pending).copied().collect();
                assert_eq!(union, expected, "{}: partition does not cover the slots", template.id);
                assert_eq!(filled.len(), values.len(), "{}", template.id);
                assert_eq!(adapted.ready, pending.is_empty());
            }
        }
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let catalog = TemplateCatalog::builtin();
        let mut ids: Vec<&str> = catalog.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let json = r#"[{"id":"a","title":"A","category":"resumo","body":"Tema: [TEMA]"}]"#;
        let catalog = TemplateCatalog::from_json_str(json).unwrap();
        let template = catalog.get("a").unwrap();
        assert!(template.tags.is_empty());
        assert_eq!(template.usage_count, 0);
        assert_eq!(template.recommended_ai, None);
        assert_eq!(template.slots().unwrap(), vec!["TEMA"]);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = TemplateCatalog::from_json_str("{not json").unwrap_err();
        assert_eq!(err.code(), "CATALOG_ERROR");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"x","title":"X","category":"flashcards","body":"[TEMA]","tags":["anki"]}}]"#
        )
        .unwrap();
        let catalog = TemplateCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("x").unwrap().tags, vec!["anki"]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = TemplateCatalog::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
    }
}
