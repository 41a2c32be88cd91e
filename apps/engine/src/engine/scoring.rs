//! Template scoring: pluggable, trait-based scorer measuring how well a
//! catalog template fits the extracted entities.
//!
//! Default: `KeywordTemplateScorer` (ontology-aware, deterministic).
//! `ContextEngine` holds an `Arc<dyn TemplateScorer>`.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Template;
use crate::ontology::normalize::normalize;
use crate::ontology::{Domain, Ontology};
use crate::parser::semantic::STOPWORDS;
use crate::parser::ExtractedEntities;

const MIN_TOKEN_CHARS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

/// Points awarded per matching rule. Scores are clamped to 0 – 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub category_specialty: f64,
    pub category_format: f64,
    pub tag_specialty: f64,
    pub tag_format: f64,
    /// Tag naming the detected academic level, clinical context or exam.
    pub tag_secondary: f64,
    /// Per distinct shared keyword.
    pub keyword: f64,
    pub keyword_cap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            category_specialty: 40.0,
            category_format: 35.0,
            tag_specialty: 20.0,
            tag_format: 15.0,
            tag_secondary: 8.0,
            keyword: 6.0,
            keyword_cap: 30.0,
        }
    }
}

/// Score of one template plus the rules that contributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateScore {
    pub score: f64, // 0 – 100
    pub reasons: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap the matching strategy without touching the engine.
pub trait TemplateScorer: Send + Sync {
    fn score(&self, template: &Template, entities: &ExtractedEntities) -> TemplateScore;

    /// Backend label, surfaced for transparency.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordTemplateScorer
// ────────────────────────────────────────────────────────────────────────────

/// Algorithm:
/// 1. Category equal to the specialty or output format → largest weights.
/// 2. Tags naming the specialty or format (by ontology synonym) → medium
///    weights, skipped when the category already matched the same field.
/// 3. Tags naming level / clinical context / exam → small weight each.
/// 4. Keyword overlap between topic, additional context and the topic's
///    ontology synonyms vs. title, description and tags → per token, capped.
pub struct KeywordTemplateScorer {
    ontology: Arc<Ontology>,
    weights: ScoringWeights,
}

impl KeywordTemplateScorer {
    pub fn new(ontology: Arc<Ontology>) -> Self {
        Self::with_weights(ontology, ScoringWeights::default())
    }

    pub fn with_weights(ontology: Arc<Ontology>, weights: ScoringWeights) -> Self {
        Self { ontology, weights }
    }

    fn canonical(&self, text: &str, domain: Domain) -> Option<&'static str> {
        self.ontology.lookup_canonical(&text.replace('_', " "), domain)
    }

    fn tag_names(&self, template: &Template, domain: Domain, key: &str) -> bool {
        template
            .tags
            .iter()
            .any(|tag| self.canonical(tag, domain) == Some(key))
    }

    /// Distinct keywords describing what the user asked for.
    fn entity_keywords(&self, entities: &ExtractedEntities) -> BTreeSet<String> {
        let mut tokens = BTreeSet::new();
        if let Some(topic) = &entities.medical_topic {
            tokens.extend(keyword_tokens(topic));
            if let Some(canonical) = self.canonical(topic, Domain::Topic) {
                for term in self.ontology.terms_for(Domain::Topic, canonical) {
                    tokens.extend(keyword_tokens(term));
                }
            }
        }
        for fragment in &entities.additional_context {
            tokens.extend(keyword_tokens(fragment));
        }
        tokens
    }
}

impl TemplateScorer for KeywordTemplateScorer {
    fn score(&self, template: &Template, entities: &ExtractedEntities) -> TemplateScore {
        let w = &self.weights;
        let mut total = 0.0;
        let mut reasons = Vec::new();

        if let Some(specialty) = entities.specialty {
            if self.canonical(&template.category, Domain::Specialty) == Some(specialty.key()) {
                total += w.category_specialty;
                reasons.push(format!("category matches specialty '{}'", specialty.key()));
            } else if self.tag_names(template, Domain::Specialty, specialty.key()) {
                total += w.tag_specialty;
                reasons.push(format!("tag matches specialty '{}'", specialty.key()));
            }
        }

        if let Some(format) = entities.output_format {
            if self.canonical(&template.category, Domain::OutputFormat) == Some(format.key()) {
                total += w.category_format;
                reasons.push(format!("category matches format '{}'", format.key()));
            } else if self.tag_names(template, Domain::OutputFormat, format.key()) {
                total += w.tag_format;
                reasons.push(format!("tag matches format '{}'", format.key()));
            }
        }

        let secondary = [
            (Domain::AcademicLevel, entities.academic_level.map(|l| l.key())),
            (Domain::ClinicalContext, entities.clinical_context.map(|c| c.key())),
            (Domain::ExamType, entities.exam_type.map(|e| e.key())),
        ];
        for (domain, key) in secondary {
            if let Some(key) = key {
                if self.tag_names(template, domain, key) {
                    total += w.tag_secondary;
                    reasons.push(format!("tag matches '{key}'"));
                }
            }
        }

        let wanted = self.entity_keywords(entities);
        if !wanted.is_empty() {
            let mut offered = BTreeSet::new();
            offered.extend(keyword_tokens(&template.title));
            offered.extend(keyword_tokens(&template.description));
            for tag in &template.tags {
                offered.extend(keyword_tokens(tag));
            }
            let shared: Vec<&String> = wanted.intersection(&offered).collect();
            if !shared.is_empty() {
                let points = (shared.len() as f64 * w.keyword).min(w.keyword_cap);
                total += points;
                reasons.push(format!(
                    "keywords: {}",
                    shared.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
                ));
            }
        }

        TemplateScore {
            score: total.clamp(0.0, 100.0),
            reasons,
        }
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

/// Normalized, stopword-free tokens of at least three characters.
fn keyword_tokens(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
