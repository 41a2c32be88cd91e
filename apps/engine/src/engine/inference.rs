//! Slot inference: maps extracted entity fields onto a template's slots.
//!
//! Rules are matched by slot key (accent-folded, `_`-joined). A rule naming
//! the key exactly fires at its own priority. Only when no rule names the key
//! exactly are rules naming one of its `_` components considered, at
//! priority − 10. A rule fires only when its entity field was detected; the
//! highest priority wins and losing candidates are recorded as notes.

use std::collections::BTreeMap;

use crate::catalog::slots::slot_key;
use crate::parser::ExtractedEntities;

const COMPONENT_PENALTY: u32 = 10;

/// Slots that receive attached content rather than an inferred value.
pub(crate) const CONTENT_SLOTS: &[&str] = &[
    "CONTEUDO",
    "TEXTO",
    "MATERIAL",
    "DOCUMENTO",
    "CONTEUDO_ANEXO",
    "INSERIR_CONTEUDO_AQUI",
    "COLE_O_TEXTO_AQUI",
];

/// Slots that echo the user's original request.
pub(crate) const REQUEST_SLOTS: &[&str] = &["PEDIDO", "SOLICITACAO", "PERGUNTA", "DUVIDA"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotFamily {
    Specialty,
    Topic,
    Level,
    Exam,
    Format,
    ClinicalContext,
    Timeframe,
    Objective,
    Depth,
    AdditionalContext,
}

impl SlotFamily {
    /// Families whose absence leaves the prompt without a subject.
    fn is_critical(self) -> bool {
        matches!(self, SlotFamily::Specialty | SlotFamily::Topic)
    }
}

struct InferenceRule {
    family: SlotFamily,
    names: &'static [&'static str],
    priority: u32,
    field: &'static str,
    value: fn(&ExtractedEntities) -> Option<String>,
}

static RULES: &[InferenceRule] = &[
    InferenceRule {
        family: SlotFamily::Specialty,
        names: &["ESPECIALIDADE", "AREA", "AREA_MEDICA"],
        priority: 100,
        field: "specialty",
        value: |e| e.specialty.map(|s| s.label().to_string()),
    },
    InferenceRule {
        family: SlotFamily::Topic,
        names: &["TEMA", "ASSUNTO", "TOPICO", "DOENCA", "CONDICAO", "PATOLOGIA"],
        priority: 90,
        field: "medical_topic",
        value: |e| e.medical_topic.clone(),
    },
    InferenceRule {
        family: SlotFamily::Level,
        names: &["NIVEL", "NIVEL_ACADEMICO", "PUBLICO", "PUBLICO_ALVO"],
        priority: 80,
        field: "academic_level",
        value: |e| e.academic_level.map(|l| l.label().to_string()),
    },
    InferenceRule {
        family: SlotFamily::Exam,
        names: &["PROVA", "EXAME", "TIPO_DE_PROVA", "CONCURSO"],
        priority: 80,
        field: "exam_type",
        value: |e| e.exam_type.map(|x| x.label().to_string()),
    },
    InferenceRule {
        family: SlotFamily::Format,
        names: &["FORMATO", "FORMATO_SAIDA", "TIPO_DE_SAIDA"],
        priority: 70,
        field: "output_format",
        value: |e| e.output_format.map(|f| f.label().to_string()),
    },
    InferenceRule {
        family: SlotFamily::ClinicalContext,
        names: &["CONTEXTO", "CENARIO", "CONTEXTO_CLINICO", "AMBIENTE"],
        priority: 70,
        field: "clinical_context",
        value: |e| e.clinical_context.map(|c| c.label().to_string()),
    },
    InferenceRule {
        family: SlotFamily::Timeframe,
        names: &["PRAZO", "TEMPO", "PERIODO", "DURACAO"],
        priority: 60,
        field: "timeframe",
        value: |e| e.timeframe.clone(),
    },
    InferenceRule {
        family: SlotFamily::Objective,
        names: &["OBJETIVO", "CONTEXTO_ADICIONAL", "OBSERVACOES"],
        priority: 40,
        field: "additional_context",
        value: joined_context,
    },
    InferenceRule {
        family: SlotFamily::Depth,
        names: &["PROFUNDIDADE", "NIVEL_DE_DETALHE"],
        priority: 35,
        field: "academic_level",
        value: |e| e.academic_level.map(|l| l.depth().to_string()),
    },
    InferenceRule {
        family: SlotFamily::AdditionalContext,
        names: &["CONTEXTO"],
        priority: 30,
        field: "additional_context",
        value: joined_context,
    },
];

fn joined_context(e: &ExtractedEntities) -> Option<String> {
    if e.additional_context.is_empty() {
        None
    } else {
        Some(e.additional_context.join("; "))
    }
}

/// Outcome of running the rules over one template's slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotInference {
    pub inferred_values: BTreeMap<String, String>,
    pub critical_missing: Vec<String>,
    pub optional_missing: Vec<String>,
    pub notes: Vec<String>,
}

/// Rules recognising `key`, with their effective priority.
fn matching_rules(key: &str) -> Vec<(&'static InferenceRule, u32)> {
    let exact: Vec<_> = RULES
        .iter()
        .filter(|rule| rule.names.contains(&key))
        .map(|rule| (rule, rule.priority))
        .collect();
    if !exact.is_empty() {
        return exact;
    }
    let components: Vec<&str> = key.split('_').collect();
    RULES
        .iter()
        .filter(|rule| rule.names.iter().any(|name| components.contains(name)))
        .map(|rule| (rule, rule.priority.saturating_sub(COMPONENT_PENALTY)))
        .collect()
}

pub fn infer_slots(slots: &[String], entities: &ExtractedEntities) -> SlotInference {
    let mut out = SlotInference::default();

    for slot in slots {
        let key = slot_key(slot);
        if CONTENT_SLOTS.contains(&key.as_str()) {
            out.optional_missing.push(slot.clone());
            continue;
        }
        if REQUEST_SLOTS.contains(&key.as_str()) {
            let request = entities.raw_input.trim();
            if request.is_empty() {
                out.optional_missing.push(slot.clone());
            } else {
                out.notes.push(format!("{slot} ← raw_input"));
                out.inferred_values.insert(slot.clone(), request.to_string());
            }
            continue;
        }

        let rules = matching_rules(&key);
        if rules.is_empty() {
            out.critical_missing.push(slot.clone());
            continue;
        }

        let mut candidates: Vec<(&InferenceRule, u32, String)> = rules
            .iter()
            .filter_map(|(rule, priority)| (rule.value)(entities).map(|v| (*rule, *priority, v)))
            .collect();
        // Stable: equal priorities keep table order.
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        let Some((winner, _, value)) = candidates.first() else {
            if rules.iter().any(|(rule, _)| rule.family.is_critical()) {
                out.critical_missing.push(slot.clone());
            } else {
                out.optional_missing.push(slot.clone());
            }
            continue;
        };

        let mut note = format!("{slot} ← {} ({value})", winner.field);
        if winner.family == SlotFamily::Specialty && entities.specialty_inferred {
            note.push_str(", implied by the topic");
        }
        out.notes.push(note);
        for (loser, _, other) in candidates.iter().skip(1) {
            if other != value {
                out.notes.push(format!(
                    "{slot}: {} preferred over {} ('{other}')",
                    winner.field, loser.field
                ));
            }
        }
        out.inferred_values.insert(slot.clone(), value.clone());
    }

    out
}
