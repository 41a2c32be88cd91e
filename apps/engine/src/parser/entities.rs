use serde::{Deserialize, Serialize};

use crate::ontology::{AcademicLevel, ClinicalContext, ExamType, OutputFormat, Specialty};

/// Structured fields extracted from one raw input.
///
/// Created fresh per parse and never merged in place: a new parse replaces
/// the previous record wholesale. `None` means "not detected".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub medical_topic: Option<String>,
    pub specialty: Option<Specialty>,
    /// True when `specialty` was implied by the topic rather than stated.
    #[serde(default)]
    pub specialty_inferred: bool,
    pub academic_level: Option<AcademicLevel>,
    pub output_format: Option<OutputFormat>,
    pub clinical_context: Option<ClinicalContext>,
    pub exam_type: Option<ExamType>,
    pub timeframe: Option<String>,
    pub additional_context: Vec<String>,
    pub raw_input: String,
    /// 0.0 – 1.0
    pub confidence: f64,
}

impl ExtractedEntities {
    /// Entities for input with nothing detected.
    pub fn empty(raw_input: impl Into<String>) -> Self {
        Self {
            medical_topic: None,
            specialty: None,
            specialty_inferred: false,
            academic_level: None,
            output_format: None,
            clinical_context: None,
            exam_type: None,
            timeframe: None,
            additional_context: Vec::new(),
            raw_input: raw_input.into(),
            confidence: 0.0,
        }
    }

    /// Number of enumerated categories detected (specialty counted only when explicit).
    pub fn category_count(&self) -> usize {
        [
            self.specialty.is_some() && !self.specialty_inferred,
            self.academic_level.is_some(),
            self.output_format.is_some(),
            self.clinical_context.is_some(),
            self.exam_type.is_some(),
        ]
        .iter()
        .filter(|&&hit| hit)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.medical_topic.is_none()
            && self.specialty.is_none()
            && self.academic_level.is_none()
            && self.output_format.is_none()
            && self.clinical_context.is_none()
            && self.exam_type.is_none()
            && self.timeframe.is_none()
            && self.additional_context.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_entities_have_zero_confidence() {
        let entities = ExtractedEntities::empty("  ");
        assert!(entities.is_empty());
        assert_eq!(entities.confidence, 0.0);
        assert_eq!(entities.raw_input, "  ");
        assert_eq!(entities.category_count(), 0);
    }

    #[test]
    fn test_category_count_ignores_inferred_specialty() {
        let mut entities = ExtractedEntities::empty("x");
        entities.specialty = Some(Specialty::Cardiologia);
        entities.specialty_inferred = true;
        entities.output_format = Some(OutputFormat::Flashcards);
        assert_eq!(entities.category_count(), 1);
    }

    #[test]
    fn test_serializes_enums_as_keys() {
        let mut entities = ExtractedEntities::empty("x");
        entities.academic_level = Some(AcademicLevel::Residencia);
        let json = serde_json::to_value(&entities).unwrap();
        assert_eq!(json["academic_level"], "residencia");
        assert!(json["specialty"].is_null());
    }
}
