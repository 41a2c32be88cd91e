//! Template Adapter: best-effort, partial substitution of slot values.
//!
//! Slots without a value stay as their literal `[MARKER]` so the user can
//! still see and fill them. Substitution is a single pass over the original
//! body; inserted values are never re-scanned for markers.

pub mod attachment;

use std::collections::{BTreeMap, HashMap};

use regex::Captures;
use serde::{Deserialize, Serialize};

use crate::catalog::slots::{normalize_slot_name, slot_key, SLOT_RE};
use crate::catalog::Template;
use crate::engine::inference::{CONTENT_SLOTS, REQUEST_SLOTS};
use crate::errors::EngineError;

const TRUNCATION_NOTICE: &str = "\n…(conteúdo truncado)";
const APPENDIX_HEADER: &str = "\n\n---\nConteúdo anexado:\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    Inferred,
    Manual,
    RawInput,
}

impl ValueSource {
    fn reason(self) -> &'static str {
        match self {
            ValueSource::Inferred => "inferred from the input",
            ValueSource::Manual => "entered manually",
            ValueSource::RawInput => "copied from the original request",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotValue {
    pub value: String,
    pub source: ValueSource,
}

impl SlotValue {
    pub fn inferred(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: ValueSource::Inferred,
        }
    }

    pub fn manual(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: ValueSource::Manual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationKind {
    SlotFill,
    ContentInsertion,
    ContentAppend,
}

/// One recorded change applied to the template body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adaptation {
    pub kind: AdaptationKind,
    pub slot: Option<String>,
    pub before: String,
    pub after: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptedPrompt {
    pub template: Template,
    pub text: String,
    pub filled_variables: Vec<String>,
    pub pending_variables: Vec<String>,
    pub adaptations: Vec<Adaptation>,
    /// True iff no slot is pending.
    pub ready: bool,
}

pub struct TemplateAdapter {
    max_attachment_chars: usize,
}

impl TemplateAdapter {
    pub fn new(max_attachment_chars: usize) -> Self {
        Self {
            max_attachment_chars,
        }
    }

    /// Substitute `values` into `template`. Keys are matched by case-normalized
    /// slot name; blank values count as absent. Request-style slots fall back
    /// to `raw_input`; attached content goes into the first content slot, or
    /// is appended when the template has none.
    pub fn adapt(
        &self,
        template: &Template,
        values: &BTreeMap<String, SlotValue>,
        raw_input: &str,
        attached_content: Option<&str>,
    ) -> Result<AdaptedPrompt, EngineError> {
        let slots = template.slots()?;
        let lookup: HashMap<String, &SlotValue> = values
            .iter()
            .filter(|(_, v)| !v.value.trim().is_empty())
            .map(|(k, v)| (normalize_slot_name(k), v))
            .collect();
        let attachment = attached_content
            .filter(|c| !c.trim().is_empty())
            .map(|c| self.truncate(c));
        let raw_request = raw_input.trim();

        let mut resolved: HashMap<&str, String> = HashMap::new();
        let mut filled = Vec::new();
        let mut pending = Vec::new();
        let mut adaptations = Vec::new();
        let mut attachment_used = false;

        for slot in &slots {
            let key = slot_key(slot);
            let marker = format!("[{slot}]");

            if let Some(value) = lookup.get(slot.as_str()) {
                adaptations.push(Adaptation {
                    kind: AdaptationKind::SlotFill,
                    slot: Some(slot.clone()),
                    before: marker,
                    after: value.value.clone(),
                    reason: value.source.reason().to_string(),
                });
                resolved.insert(slot, value.value.clone());
                filled.push(slot.clone());
            } else if REQUEST_SLOTS.contains(&key.as_str()) && !raw_request.is_empty() {
                adaptations.push(Adaptation {
                    kind: AdaptationKind::SlotFill,
                    slot: Some(slot.clone()),
                    before: marker,
                    after: raw_request.to_string(),
                    reason: ValueSource::RawInput.reason().to_string(),
                });
                resolved.insert(slot, raw_request.to_string());
                filled.push(slot.clone());
            } else if let Some(content) = attachment
                .as_ref()
                .filter(|_| !attachment_used && CONTENT_SLOTS.contains(&key.as_str()))
            {
                attachment_used = true;
                adaptations.push(Adaptation {
                    kind: AdaptationKind::ContentInsertion,
                    slot: Some(slot.clone()),
                    before: marker,
                    after: content.clone(),
                    reason: "attached content".to_string(),
                });
                resolved.insert(slot, content.clone());
                filled.push(slot.clone());
            } else {
                pending.push(slot.clone());
            }
        }

        let mut text = SLOT_RE
            .replace_all(&template.body, |caps: &Captures| {
                let name = normalize_slot_name(&caps[1]);
                resolved
                    .get(name.as_str())
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();

        if let Some(content) = attachment.filter(|_| !attachment_used) {
            let appendix = format!("{APPENDIX_HEADER}{content}");
            text.push_str(&appendix);
            adaptations.push(Adaptation {
                kind: AdaptationKind::ContentAppend,
                slot: None,
                before: String::new(),
                after: appendix,
                reason: "attached content, template has no content slot".to_string(),
            });
        }

        Ok(AdaptedPrompt {
            template: template.clone(),
            text,
            ready: pending.is_empty(),
            filled_variables: filled,
            pending_variables: pending,
            adaptations,
        })
    }

    fn truncate(&self, content: &str) -> String {
        let content = content.trim();
        match content.char_indices().nth(self.max_attachment_chars) {
            Some((cut, _)) => format!("{}{TRUNCATION_NOTICE}", &content[..cut]),
            None => content.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_template(body: &str) -> Template {
        Template {
            id: "t".to_string(),
            title: "T".to_string(),
            category: "resumo".to_string(),
            description: String::new(),
            body: body.to_string(),
            tags: vec![],
            recommended_ai: None,
            estimated_time: None,
            usage_count: 0,
        }
    }

    fn values(pairs: &[(&str, SlotValue)]) -> BTreeMap<String, SlotValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn adapter() -> TemplateAdapter {
        TemplateAdapter::new(20_000)
    }

    #[test]
    fn test_partial_fill_leaves_marker_pending() {
        let t = make_template("Especialidade: [ESPECIALIDADE]\nTema: [TEMA]");
        let v = values(&[("ESPECIALIDADE", SlotValue::inferred("Cardiologia"))]);
        let out = adapter().adapt(&t, &v, "", None).unwrap();

        assert_eq!(out.filled_variables, vec!["ESPECIALIDADE"]);
        assert_eq!(out.pending_variables, vec!["TEMA"]);
        assert!(!out.ready);
        assert_eq!(out.text, "Especialidade: Cardiologia\nTema: [TEMA]");
        assert_eq!(out.adaptations.len(), 1);
        assert_eq!(out.adaptations[0].before, "[ESPECIALIDADE]");
        assert_eq!(out.adaptations[0].reason, "inferred from the input");
    }

    #[test]
    fn test_manual_value_completes_template() {
        let t = make_template("Especialidade: [ESPECIALIDADE]\nTema: [TEMA]");
        let v = values(&[
            ("ESPECIALIDADE", SlotValue::inferred("Cardiologia")),
            ("TEMA", SlotValue::manual("Arritmias")),
        ]);
        let out = adapter().adapt(&t, &v, "", None).unwrap();

        assert!(out.ready);
        assert!(out.text.contains("Arritmias") && out.text.contains("Cardiologia"));
        assert!(!SLOT_RE.is_match(&out.text), "markers left in: {}", out.text);
        assert_eq!(out.adaptations[1].reason, "entered manually");
    }

    #[test]
    fn test_filled_and_pending_partition_slot_set() {
        let t = make_template("[A] [B] [C] [A] [D]");
        let v = values(&[("a", SlotValue::manual("1")), ("C", SlotValue::inferred("3"))]);
        let out = adapter().adapt(&t, &v, "", None).unwrap();
        let slots = t.slots().unwrap();

        let mut union: Vec<String> = out
            .filled_variables
            .iter()
            .chain(&out.pending_variables)
            .cloned()
            .collect();
        union.sort();
        let mut expected = slots.clone();
        expected.sort();
        assert_eq!(union, expected);
        assert!(out.filled_variables.iter().all(|f| !out.pending_variables.contains(f)));
        assert_eq!(out.text, "1 [B] 3 1 [D]");
    }

    #[test]
    fn test_blank_value_counts_as_pending() {
        let t = make_template("Tema: [TEMA]");
        let v = values(&[("TEMA", SlotValue::manual("   "))]);
        let out = adapter().adapt(&t, &v, "", None).unwrap();
        assert_eq!(out.pending_variables, vec!["TEMA"]);
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let t = make_template("[TEMA] e [NIVEL]");
        let v = values(&[("TEMA", SlotValue::manual("veja [NIVEL]"))]);
        let out = adapter().adapt(&t, &v, "", None).unwrap();
        assert_eq!(out.text, "veja [NIVEL] e [NIVEL]");
        assert_eq!(out.pending_variables, vec!["NIVEL"]);
    }

    #[test]
    fn test_request_slot_takes_raw_input() {
        let t = make_template("Dúvida: [PEDIDO]");
        let out = adapter()
            .adapt(&t, &BTreeMap::new(), "  por que a IC descompensa?  ", None)
            .unwrap();
        assert!(out.ready);
        assert_eq!(out.text, "Dúvida: por que a IC descompensa?");
        assert_eq!(out.adaptations[0].reason, "copied from the original request");
    }

    #[test]
    fn test_attachment_fills_content_slot_even_with_pending() {
        let t = make_template("Tema: [TEMA]\nMaterial:\n[CONTEÚDO]");
        let out = adapter()
            .adapt(&t, &BTreeMap::new(), "", Some("Texto do artigo"))
            .unwrap();
        assert!(out.text.ends_with("Material:\nTexto do artigo"));
        assert_eq!(out.filled_variables, vec!["CONTEÚDO"]);
        assert_eq!(out.pending_variables, vec!["TEMA"]);
        assert_eq!(out.adaptations[0].kind, AdaptationKind::ContentInsertion);
    }

    #[test]
    fn test_attachment_appended_without_content_slot() {
        let t = make_template("Tema: [TEMA]");
        let out = adapter().adapt(&t, &BTreeMap::new(), "", Some("notas")).unwrap();
        assert!(out.text.starts_with("Tema: [TEMA]"));
        assert!(out.text.ends_with("Conteúdo anexado:\nnotas"));
        assert_eq!(out.adaptations[0].kind, AdaptationKind::ContentAppend);
        assert_eq!(out.adaptations[0].slot, None);
    }

    #[test]
    fn test_attachment_truncated_on_char_boundary() {
        let t = make_template("[CONTEUDO]");
        let out = TemplateAdapter::new(3)
            .adapt(&t, &BTreeMap::new(), "", Some("ação rápida"))
            .unwrap();
        assert_eq!(out.text, format!("açã{TRUNCATION_NOTICE}"));
    }

    #[test]
    fn test_template_without_slots_is_ready() {
        let t = make_template("Sem variáveis aqui.");
        let out = adapter().adapt(&t, &BTreeMap::new(), "", None).unwrap();
        assert!(out.ready);
        assert!(out.filled_variables.is_empty() && out.pending_variables.is_empty());
    }

    #[test]
    fn test_malformed_template_is_error() {
        let t = make_template("Tema: [TEMA");
        assert!(adapter().adapt(&t, &BTreeMap::new(), "", None).is_err());
    }
}
