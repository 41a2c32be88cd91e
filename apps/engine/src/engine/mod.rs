// Context engine: scores the catalog against extracted entities, picks a
// primary template plus ranked alternatives, and infers slot values.

pub mod inference;
pub mod scoring;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Template, TemplateCatalog};
use crate::config::EngineSettings;
use crate::errors::EngineError;
use crate::ontology::Ontology;
use crate::parser::ExtractedEntities;

use self::inference::infer_slots;
pub use self::scoring::{KeywordTemplateScorer, ScoringWeights, TemplateScore, TemplateScorer};

/// Engine decision for one set of entities. Recomputed, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualIntent {
    pub primary_prompt: Option<Template>,
    /// Highest score first, primary excluded.
    pub alternative_prompts: Vec<Template>,
    pub inferred_values: BTreeMap<String, String>,
    pub critical_missing: Vec<String>,
    pub optional_missing: Vec<String>,
    pub match_score: f64, // 0 – 100
    pub adaptation_notes: Vec<String>,
}

impl ContextualIntent {
    fn unmatched(note: impl Into<String>) -> Self {
        Self {
            primary_prompt: None,
            alternative_prompts: Vec::new(),
            inferred_values: BTreeMap::new(),
            critical_missing: Vec::new(),
            optional_missing: Vec::new(),
            match_score: 0.0,
            adaptation_notes: vec![note.into()],
        }
    }
}

/// One catalog entry with its score, as listed in ranked suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTemplate {
    pub template: Template,
    pub score: f64,
    pub reasons: Vec<String>,
}

#[derive(Clone)]
pub struct ContextEngine {
    catalog: Arc<TemplateCatalog>,
    scorer: Arc<dyn TemplateScorer>,
    min_relevance: f64,
    no_match_threshold: f64,
    max_alternatives: usize,
}

impl ContextEngine {
    pub fn new(catalog: Arc<TemplateCatalog>, ontology: Arc<Ontology>, settings: &EngineSettings) -> Self {
        Self {
            catalog,
            scorer: Arc::new(KeywordTemplateScorer::new(ontology)),
            min_relevance: settings.min_relevance,
            no_match_threshold: settings.no_match_threshold,
            max_alternatives: settings.max_alternatives,
        }
    }

    /// Same catalog and thresholds, ranked by `scorer`.
    pub fn with_scorer(mut self, scorer: Arc<dyn TemplateScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Same scorer and thresholds, bound to another catalog.
    pub fn with_catalog(&self, catalog: Arc<TemplateCatalog>) -> Self {
        Self {
            catalog,
            ..self.clone()
        }
    }

    pub fn catalog(&self) -> &Arc<TemplateCatalog> {
        &self.catalog
    }

    pub fn scorer_backend(&self) -> &'static str {
        self.scorer.backend()
    }

    /// Every catalog template, best first. Ties: usage count, then catalog order.
    pub fn rank(&self, entities: &ExtractedEntities) -> Vec<ScoredTemplate> {
        let mut ranked: Vec<ScoredTemplate> = self
            .catalog
            .iter()
            .map(|template| {
                let TemplateScore { score, reasons } = self.scorer.score(template, entities);
                ScoredTemplate {
                    template: template.clone(),
                    score,
                    reasons,
                }
            })
            .collect();
        // sort_by is stable, so equal keys keep catalog order
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.template.usage_count.cmp(&a.template.usage_count))
        });
        ranked
    }

    pub fn analyze(&self, entities: &ExtractedEntities) -> Result<ContextualIntent, EngineError> {
        let ranked = self.rank(entities);
        let primary = ranked
            .first()
            .filter(|top| top.score >= self.min_relevance)
            .cloned();

        let Some(primary) = primary else {
            let alternatives = self.alternatives(&ranked, None);
            debug!(
                templates = ranked.len(),
                alternatives = alternatives.len(),
                "no template reached the relevance threshold"
            );
            let note = if self.catalog.is_empty() {
                "catalog is empty".to_string()
            } else {
                format!("no template scored at least {}", self.min_relevance)
            };
            return Ok(ContextualIntent {
                alternative_prompts: alternatives,
                ..ContextualIntent::unmatched(note)
            });
        };

        debug!(
            scorer = self.scorer.backend(),
            template = %primary.template.id,
            score = primary.score,
            "primary template selected"
        );
        let alternatives = self.alternatives(&ranked, Some(&primary.template.id));
        let mut notes = vec![format!(
            "primary '{}' scored {} ({})",
            primary.template.id,
            primary.score,
            primary.reasons.join("; ")
        )];
        self.build_intent(primary.template, primary.score, alternatives, entities, &mut notes)
    }

    /// Intent for a user-chosen template: it becomes primary regardless of
    /// score, and alternatives are re-ranked without it.
    pub fn analyze_with_selection(
        &self,
        entities: &ExtractedEntities,
        selected: &Template,
    ) -> Result<ContextualIntent, EngineError> {
        let ranked = self.rank(entities);
        let score = self.scorer.score(selected, entities).score;
        let alternatives = self.alternatives(&ranked, Some(&selected.id));
        let mut notes = vec![format!("template '{}' selected by the user", selected.id)];
        self.build_intent(selected.clone(), score, alternatives, entities, &mut notes)
    }

    fn alternatives(&self, ranked: &[ScoredTemplate], exclude: Option<&str>) -> Vec<Template> {
        ranked
            .iter()
            .filter(|s| Some(s.template.id.as_str()) != exclude)
            .filter(|s| s.score > self.no_match_threshold)
            .take(self.max_alternatives)
            .map(|s| s.template.clone())
            .collect()
    }

    fn build_intent(
        &self,
        primary: Template,
        score: f64,
        alternatives: Vec<Template>,
        entities: &ExtractedEntities,
        notes: &mut Vec<String>,
    ) -> Result<ContextualIntent, EngineError> {
        let slots = primary.slots()?;
        let inference = infer_slots(&slots, entities);
        notes.extend(inference.notes);

        Ok(ContextualIntent {
            primary_prompt: Some(primary),
            alternative_prompts: alternatives,
            inferred_values: inference.inferred_values,
            critical_missing: inference.critical_missing,
            optional_missing: inference.optional_missing,
            match_score: score,
            adaptation_notes: std::mem::take(notes),
        })
    }
}
