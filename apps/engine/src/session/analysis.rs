//! Diagnostics snapshot of a session, plus short hints for the user.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapter::AdaptedPrompt;
use crate::engine::{ContextualIntent, ScoredTemplate};
use crate::parser::ExtractedEntities;

const LOW_CONFIDENCE: f64 = 0.4;
const MAX_LISTED_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Pending,
    Processed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAnalysis {
    pub session_id: Uuid,
    pub phase: SessionPhase,
    pub entities: Option<ExtractedEntities>,
    pub intent: Option<ContextualIntent>,
    pub adapted_prompt: Option<AdaptedPrompt>,
    pub suggestions: Vec<ScoredTemplate>,
    pub manual_values: BTreeMap<String, String>,
    pub hints: Vec<String>,
    pub run_count: u64,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Recommendations for making the request more specific.
pub fn build_hints(
    entities: Option<&ExtractedEntities>,
    intent: Option<&ContextualIntent>,
    adapted: Option<&AdaptedPrompt>,
) -> Vec<String> {
    let Some(entities) = entities else {
        return Vec::new();
    };
    let mut hints = Vec::new();

    if entities.medical_topic.is_none() {
        hints.push("Informe o tema que deseja estudar (ex.: \"sobre insuficiência cardíaca\").".to_string());
    }
    if entities.specialty.is_none() {
        hints.push("Mencione a especialidade para melhorar a escolha do template.".to_string());
    }
    if entities.confidence < LOW_CONFIDENCE {
        hints.push(format!(
            "Pedido pouco específico (confiança {:.0}%): inclua formato, nível ou prova.",
            entities.confidence * 100.0
        ));
    }
    if intent.is_some_and(|i| i.primary_prompt.is_none()) {
        hints.push("Nenhum template atingiu a relevância mínima; escolha um manualmente.".to_string());
    }
    if let Some(adapted) = adapted.filter(|a| !a.ready) {
        let listed: Vec<&str> = adapted
            .pending_variables
            .iter()
            .take(MAX_LISTED_SLOTS)
            .map(String::as_str)
            .collect();
        let more = adapted.pending_variables.len().saturating_sub(MAX_LISTED_SLOTS);
        let suffix = if more > 0 { format!(" e mais {more}") } else { String::new() };
        hints.push(format!("Preencha: {}{suffix}.", listed.join(", ")));
    }

    hints
}
