//! Semantic Parser: deterministic entity extraction from free-form input.
//!
//! Detection runs on the normalized text and produces byte spans in that
//! coordinate space (`Detection`). Spans are projected back onto the raw input
//! at the end, so free-text fields keep the user's spelling and accents.
//! Detections depend only on the normalized text, which makes them safe to
//! memoize under that key.

use std::ops::Range;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::ontology::normalize::{find_term, NormalizedText, Word};
use crate::ontology::{
    AcademicLevel, ClinicalContext, Domain, ExamType, Ontology, OutputFormat, Specialty,
};
use crate::parser::cache::LruCache;
use crate::parser::entities::ExtractedEntities;

/// Phrases announcing the subject of the request. Normalized form.
const TOPIC_MARKERS: &[&str] = &[
    "a respeito de",
    "acerca de",
    "referente a",
    "resumo sobre",
    "resumo de",
    "revisao sobre",
    "revisao de",
    "sobre",
    "explique",
    "explica",
    "explicar",
    "resuma",
    "estudar",
    "revisar",
    "assunto",
    "topico",
    "tema",
];

/// Words that end a topic phrase.
const PHRASE_STOPS: &[&str] = &[
    "para", "pra", "formato", "nivel", "focado", "focada", "usando", "visando", "voltado",
    "voltada",
];

pub(crate) const STOPWORDS: &[&str] = &[
    "quero", "queria", "gostaria", "preciso", "precisamos", "me", "de", "do", "da", "dos", "das",
    "o", "a", "os", "as", "um", "uma", "uns", "umas", "e", "ou", "para", "pra", "por", "com",
    "sem", "em", "no", "na", "nos", "nas", "ao", "aos", "sobre", "que", "se", "faca", "faz",
    "fazer", "crie", "criar", "gere", "gerar", "monte", "montar", "elabore", "elaborar",
    "prepare", "preparar", "ajude", "ajuda", "favor", "voce", "eu", "meu", "minha", "meus",
    "minhas", "estudar", "revisar", "explique", "tema", "assunto", "topico", "acerca",
    "respeito", "referente", "nivel", "formato", "focado", "focada", "foco", "usando", "mais",
    "muito", "bem", "algum", "alguns", "alguma", "algumas", "isso", "esse", "essa", "este",
    "esta", "estou", "sou", "vou", "tenho", "ter", "ate", "durante", "proximos", "proximas",
];

const MAX_TOPIC_WORDS: usize = 8;

static TIMEFRAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d+\s*(?:dias?|semanas?|meses|mes|horas?|minutos?|min)\b|\b(?:hoje|amanha|esta semana|essa semana|proxima semana|este mes|fim de semana)\b",
    )
    .expect("timeframe pattern is valid")
});

/// Memo of detections keyed by normalized input.
pub type ParseCache = LruCache<String, Detection>;

/// Parse result in normalized-text coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    specialty: Option<Specialty>,
    specialty_inferred: bool,
    academic_level: Option<AcademicLevel>,
    output_format: Option<OutputFormat>,
    clinical_context: Option<ClinicalContext>,
    exam_type: Option<ExamType>,
    topic: Option<Range<usize>>,
    timeframe: Option<Range<usize>>,
    additional: Vec<Range<usize>>,
}

pub struct SemanticParser {
    ontology: Arc<Ontology>,
}

impl SemanticParser {
    pub fn new(ontology: Arc<Ontology>) -> Self {
        Self { ontology }
    }

    /// Extracts entities from `raw_input`. Total and deterministic.
    pub fn parse(&self, raw_input: &str) -> ExtractedEntities {
        let normalized = NormalizedText::new(raw_input);
        if normalized.is_empty() {
            return ExtractedEntities::empty(raw_input);
        }
        let detection = self.detect(&normalized);
        project(raw_input, &normalized, &detection)
    }

    /// Same as `parse`, reusing a detection memoized under the normalized input.
    pub fn parse_cached(&self, raw_input: &str, cache: &mut ParseCache) -> ExtractedEntities {
        let normalized = NormalizedText::new(raw_input);
        if normalized.is_empty() {
            return ExtractedEntities::empty(raw_input);
        }
        let detection = match cache.get(&normalized.text) {
            Some(hit) => {
                debug!(input_len = raw_input.len(), "parse cache hit");
                hit
            }
            None => {
                let fresh = self.detect(&normalized);
                cache.insert(normalized.text.clone(), fresh.clone());
                fresh
            }
        };
        project(raw_input, &normalized, &detection)
    }

    fn detect(&self, normalized: &NormalizedText) -> Detection {
        let text = normalized.text.as_str();
        let words = normalized.words();
        let mut category_spans: Vec<Range<usize>> = Vec::new();

        let mut category = |domain: Domain| -> Option<&'static str> {
            let found = self.ontology.find_in(domain, text)?;
            category_spans.push(found.start..found.end);
            Some(found.canonical)
        };

        let mut specialty = category(Domain::Specialty).and_then(Specialty::from_key);
        let academic_level = category(Domain::AcademicLevel).and_then(AcademicLevel::from_key);
        let output_format = category(Domain::OutputFormat).and_then(OutputFormat::from_key);
        let clinical_context = category(Domain::ClinicalContext).and_then(ClinicalContext::from_key);
        let exam_type = category(Domain::ExamType).and_then(ExamType::from_key);

        let mut consumed = category_spans.clone();

        let timeframe = TIMEFRAME_RE.find(text).map(|m| m.range());
        if let Some(range) = &timeframe {
            consumed.push(range.clone());
        }

        // Topic phrases also stop where a timeframe starts.
        let mut stop_spans = category_spans.clone();
        stop_spans.extend(timeframe.clone());
        let last_category_end = category_spans.iter().map(|r| r.end).max();
        let topic = self.detect_topic(text, &words, &stop_spans, last_category_end, &mut consumed);

        let mut specialty_inferred = false;
        if specialty.is_none() {
            let implied = topic
                .as_ref()
                .and_then(|range| self.ontology.find_in(Domain::Topic, &text[range.clone()]))
                .or_else(|| self.ontology.find_in(Domain::Topic, text))
                .and_then(|m| self.ontology.specialty_for_topic(m.canonical));
            if implied.is_some() {
                specialty = implied;
                specialty_inferred = true;
            }
        }

        let additional = leftover_runs(text, &words, &consumed);

        Detection {
            specialty,
            specialty_inferred,
            academic_level,
            output_format,
            clinical_context,
            exam_type,
            topic,
            timeframe,
            additional,
        }
    }

    /// Topic strategy, in order: phrase after the last topic marker, registered
    /// topic term, phrase following the last category keyword.
    fn detect_topic(
        &self,
        text: &str,
        words: &[Word],
        stop_spans: &[Range<usize>],
        last_category_end: Option<usize>,
        consumed: &mut Vec<Range<usize>>,
    ) -> Option<Range<usize>> {
        let marker = TOPIC_MARKERS
            .iter()
            .filter_map(|m| find_term(text, m).map(|start| start..start + m.len()))
            .max_by_key(|r| (r.start, r.end));

        if let Some(marker) = marker {
            if let Some(phrase) = phrase_from(text, words, marker.end, stop_spans) {
                consumed.push(marker);
                consumed.push(phrase.clone());
                return Some(phrase);
            }
        }

        if let Some(found) = self.ontology.find_in(Domain::Topic, text) {
            let range = found.start..found.end;
            consumed.push(range.clone());
            return Some(range);
        }

        let phrase = phrase_from(text, words, last_category_end?, stop_spans)?;
        consumed.push(phrase.clone());
        Some(phrase)
    }
}

/// Noun-phrase-like run of words starting at `from`, ending at punctuation, a
/// stop word such as "para", or the next keyword span.
fn phrase_from(
    text: &str,
    words: &[Word],
    from: usize,
    stop_spans: &[Range<usize>],
) -> Option<Range<usize>> {
    let start = from
        + text[from..]
            .find(|c: char| !(c.is_whitespace() || c == ':' || c == '-'))
            .unwrap_or(text.len() - from);

    let mut taken: Vec<Word> = Vec::new();
    let mut prev_end = start;
    for word in words.iter().filter(|w| w.start >= start) {
        if has_punctuation(&text[prev_end..word.start]) {
            break;
        }
        let token = &text[word.start..word.end];
        if PHRASE_STOPS.contains(&token) {
            break;
        }
        if stop_spans.iter().any(|s| s.start == word.start) {
            break;
        }
        taken.push(*word);
        prev_end = word.end;
        if taken.len() == MAX_TOPIC_WORDS {
            break;
        }
    }

    let trimmed = trim_stopwords(text, &taken);
    let has_content = trimmed
        .iter()
        .any(|w| !text[w.start..w.end].chars().all(|c| c.is_ascii_digit()));
    if !has_content {
        return None;
    }
    Some(trimmed.first()?.start..trimmed.last()?.end)
}

/// Unconsumed word runs, split at punctuation and consumed spans, stop words trimmed.
fn leftover_runs(text: &str, words: &[Word], consumed: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut prev_end: Option<usize> = None;

    let flush = |current: &mut Vec<Word>, runs: &mut Vec<Range<usize>>| {
        let trimmed = trim_stopwords(text, current);
        if let (Some(first), Some(last)) = (trimmed.first(), trimmed.last()) {
            runs.push(first.start..last.end);
        }
        current.clear();
    };

    for word in words {
        let is_consumed = consumed
            .iter()
            .any(|r| word.start < r.end && r.start < word.end);
        let broken = prev_end.map_or(false, |end| has_punctuation(&text[end..word.start]));
        if is_consumed || broken {
            flush(&mut current, &mut runs);
        }
        if !is_consumed {
            current.push(*word);
        }
        prev_end = Some(word.end);
    }
    flush(&mut current, &mut runs);
    runs
}

fn trim_stopwords<'w>(text: &str, words: &'w [Word]) -> &'w [Word] {
    let is_stop = |w: &Word| STOPWORDS.contains(&&text[w.start..w.end]);
    let Some(first) = words.iter().position(|w| !is_stop(w)) else {
        return &[];
    };
    let last = words.iter().rposition(|w| !is_stop(w)).unwrap_or(first);
    &words[first..=last]
}

fn has_punctuation(gap: &str) -> bool {
    gap.chars()
        .any(|c| matches!(c, ',' | '.' | ';' | ':' | '!' | '?' | '(' | ')' | '"'))
}

/// Blank input scores 0 elsewhere; any non-blank input starts at 0.2 because
/// the raw text itself remains usable.
fn score_confidence(categories: usize, inferred_specialty: bool, topic: bool, timeframe: bool) -> f64 {
    let mut score = 0.2 + 0.12 * categories as f64;
    if inferred_specialty {
        score += 0.06;
    }
    if topic {
        score += 0.2;
    }
    if timeframe {
        score += 0.04;
    }
    (score.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

fn project(raw: &str, normalized: &NormalizedText, detection: &Detection) -> ExtractedEntities {
    let echo = |range: &Range<usize>| normalized.original(raw, range.clone()).to_string();

    let mut entities = ExtractedEntities {
        medical_topic: detection.topic.as_ref().map(echo).filter(|s| !s.is_empty()),
        specialty: detection.specialty,
        specialty_inferred: detection.specialty_inferred,
        academic_level: detection.academic_level,
        output_format: detection.output_format,
        clinical_context: detection.clinical_context,
        exam_type: detection.exam_type,
        timeframe: detection.timeframe.as_ref().map(echo).filter(|s| !s.is_empty()),
        additional_context: detection
            .additional
            .iter()
            .map(echo)
            .filter(|s| !s.is_empty())
            .collect(),
        raw_input: raw.to_string(),
        confidence: 0.0,
    };
    entities.confidence = score_confidence(
        entities.category_count(),
        entities.specialty_inferred,
        detection.topic.is_some(),
        detection.timeframe.is_some(),
    );

    debug!(
        confidence = entities.confidence,
        topic = ?entities.medical_topic,
        "parsed input"
    );
    entities
}
