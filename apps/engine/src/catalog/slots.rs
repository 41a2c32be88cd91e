//! Slot grammar: `[UPPERCASE NAME]` markers inside a template body.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::EngineError;
use crate::ontology::normalize::normalize;

/// A complete slot marker. Group 1 is the raw slot name.
pub static SLOT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(\p{Lu}[\p{Lu}\p{N}_ /\-]*)\]").expect("slot pattern is valid")
});

/// A marker that runs into end of line or end of body without its closing bracket.
static UNTERMINATED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\p{Lu}[\p{Lu}\p{N}_ /\-]*(?:\r?\n|\z)").expect("unterminated pattern is valid")
});

/// Slot names in first-appearance order, case-normalized and deduplicated.
pub fn extract_slots(template_id: &str, body: &str) -> Result<Vec<String>, EngineError> {
    if let Some(bad) = UNTERMINATED_RE.find(body) {
        return Err(EngineError::malformed(
            template_id,
            format!("unterminated slot marker '{}'", bad.as_str().trim_end()),
        ));
    }

    let mut slots: Vec<String> = Vec::new();
    for caps in SLOT_RE.captures_iter(body) {
        let name = normalize_slot_name(&caps[1]);
        if !name.is_empty() && !slots.contains(&name) {
            slots.push(name);
        }
    }
    Ok(slots)
}

/// Display form of a slot name: trimmed, inner whitespace collapsed, uppercase.
pub fn normalize_slot_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Matching key for a slot name: accents folded, separators unified to `_`.
/// `"NÍVEL ACADÊMICO"` → `"NIVEL_ACADEMICO"`.
pub fn slot_key(name: &str) -> String {
    normalize(name)
        .split(|c: char| c.is_whitespace() || c == '-' || c == '/' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_slots_in_order_deduplicated() {
        let body = "Especialidade: [ESPECIALIDADE]\nTema: [TEMA]\nDe novo: [TEMA]";
        let slots = extract_slots("t", body).unwrap();
        assert_eq!(slots, vec!["ESPECIALIDADE", "TEMA"]);
    }

    #[test]
    fn test_extract_slots_accented_and_spaced_names() {
        let body = "Nível: [NÍVEL ACADÊMICO] e [CONTEXTO  CLÍNICO]";
        let slots = extract_slots("t", body).unwrap();
        assert_eq!(slots, vec!["NÍVEL ACADÊMICO", "CONTEXTO CLÍNICO"]);
    }

    #[test]
    fn test_lowercase_brackets_are_not_slots() {
        let body = "Veja [1] e [link](http://x) e [Tema livre]";
        assert!(extract_slots("t", body).unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_marker_is_malformed() {
        let err = extract_slots("broken", "Tema: [TEMA\nResto").unwrap_err();
        match err {
            EngineError::MalformedTemplate { template_id, reason } => {
                assert_eq!(template_id, "broken");
                assert!(reason.contains("[TEMA"), "reason was {reason}");
            }
            other => panic!("expected MalformedTemplate, got {other:?}"),
        }
        assert!(extract_slots("broken", "Fim: [ESPECIALIDADE").is_err());
    }

    #[test]
    fn test_slot_key_folds_accents_and_separators() {
        assert_eq!(slot_key("NÍVEL ACADÊMICO"), "NIVEL_ACADEMICO");
        assert_eq!(slot_key("TIPO-DE/PROVA"), "TIPO_DE_PROVA");
        assert_eq!(slot_key("tema"), "TEMA");
    }

    #[test]
    fn test_normalize_slot_name() {
        assert_eq!(normalize_slot_name("  tema  principal "), "TEMA PRINCIPAL");
    }
}
