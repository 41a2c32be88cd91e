//! Medical Ontology: canonical terms and synonyms per domain.
//!
//! Built once with `Ontology::medical()` and shared read-only (`Arc<Ontology>`).
//! Comparison is case- and accent-insensitive: every registered term is
//! normalized at construction and lookups normalize their input the same way.

pub mod normalize;
mod terms;
pub mod vocabulary;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use self::normalize::{find_term, normalize};
use self::terms::{CONTEXT_TERMS, EXAM_TERMS, FORMAT_TERMS, LEVEL_TERMS, SPECIALTY_TERMS, TOPIC_TERMS};
pub use self::vocabulary::{AcademicLevel, ClinicalContext, ExamType, OutputFormat, Specialty};

/// Domain category a term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Specialty,
    Topic,
    OutputFormat,
    AcademicLevel,
    ClinicalContext,
    ExamType,
}

/// A registered term found in normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    pub canonical: &'static str,
    /// The normalized term that matched (canonical name or synonym).
    pub term: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug)]
struct OntologyEntry {
    canonical: &'static str,
    /// Normalized canonical name followed by normalized synonyms.
    terms: Vec<String>,
}

#[derive(Debug)]
pub struct Ontology {
    domains: HashMap<Domain, Vec<OntologyEntry>>,
    topic_specialties: HashMap<&'static str, Specialty>,
}

impl Ontology {
    /// The curated medical-education ontology.
    pub fn medical() -> Self {
        let mut domains = HashMap::new();
        domains.insert(
            Domain::Specialty,
            keyed_entries(SPECIALTY_TERMS.iter().map(|(s, t)| (s.key(), *t))),
        );
        domains.insert(
            Domain::AcademicLevel,
            keyed_entries(LEVEL_TERMS.iter().map(|(l, t)| (l.key(), *t))),
        );
        domains.insert(
            Domain::OutputFormat,
            keyed_entries(FORMAT_TERMS.iter().map(|(f, t)| (f.key(), *t))),
        );
        domains.insert(
            Domain::ClinicalContext,
            keyed_entries(CONTEXT_TERMS.iter().map(|(c, t)| (c.key(), *t))),
        );
        domains.insert(
            Domain::ExamType,
            keyed_entries(EXAM_TERMS.iter().map(|(e, t)| (e.key(), *t))),
        );
        domains.insert(
            Domain::Topic,
            keyed_entries(TOPIC_TERMS.iter().map(|t| (t.canonical, t.synonyms))),
        );

        let topic_specialties = TOPIC_TERMS
            .iter()
            .map(|t| (t.canonical, t.specialty))
            .collect();

        Self {
            domains,
            topic_specialties,
        }
    }

    /// Canonical form of `term` in `domain`, if it is the canonical name or a
    /// registered synonym. Absence is a valid "not detected" outcome.
    pub fn lookup_canonical(&self, term: &str, domain: Domain) -> Option<&'static str> {
        let needle = normalize(term);
        if needle.is_empty() {
            return None;
        }
        self.entries(domain)
            .iter()
            .find(|entry| entry.terms.iter().any(|t| *t == needle))
            .map(|entry| entry.canonical)
    }

    /// Best whole-word match of any registered term inside already-normalized
    /// text. Longest term wins; earliest position breaks ties.
    pub fn find_in(&self, domain: Domain, normalized: &str) -> Option<TermMatch> {
        let mut best: Option<TermMatch> = None;
        for entry in self.entries(domain) {
            for term in &entry.terms {
                let Some(start) = find_term(normalized, term) else {
                    continue;
                };
                let better = match &best {
                    None => true,
                    Some(b) => term.len() > b.term.len() || (term.len() == b.term.len() && start < b.start),
                };
                if better {
                    best = Some(TermMatch {
                        canonical: entry.canonical,
                        term: term.clone(),
                        start,
                        end: start + term.len(),
                    });
                }
            }
        }
        best
    }

    /// Specialty a canonical topic belongs to.
    pub fn specialty_for_topic(&self, canonical_topic: &str) -> Option<Specialty> {
        self.topic_specialties.get(canonical_topic).copied()
    }

    /// All normalized terms registered for a canonical value, canonical name first.
    pub fn terms_for(&self, domain: Domain, canonical: &str) -> &[String] {
        self.entries(domain)
            .iter()
            .find(|entry| entry.canonical == canonical)
            .map(|entry| entry.terms.as_slice())
            .unwrap_or(&[])
    }

    fn entries(&self, domain: Domain) -> &[OntologyEntry] {
        self.domains.get(&domain).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn keyed_entries<'a>(
    rows: impl Iterator<Item = (&'static str, &'a [&'static str])>,
) -> Vec<OntologyEntry> {
    rows.map(|(canonical, synonyms)| {
        let mut terms = vec![normalize(&canonical.replace('_', " "))];
        for synonym in synonyms {
            let term = normalize(synonym);
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        OntologyEntry { canonical, terms }
    })
    .collect()
}
