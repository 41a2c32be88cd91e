//! Session Controller: orchestrates parse → analyze → adapt over an editing
//! session.
//!
//! State machine: `Idle` → `Pending` (input changed, debounced run scheduled)
//! → `Processed` → back to `Pending` on new input, or `Idle` on reset or
//! blank input. Debounced runs carry the input revision they were scheduled
//! for and do nothing once a newer input has arrived. Manual values, attached
//! content, template selection and catalog changes reprocess immediately.
//!
//! Pipeline errors never reach the caller: they are logged and the session
//! keeps its last known-good result.

pub mod analysis;
pub mod scheduler;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::adapter::{AdaptedPrompt, SlotValue, TemplateAdapter};
use crate::catalog::slots::normalize_slot_name;
use crate::catalog::{Template, TemplateCatalog};
use crate::config::EngineSettings;
use crate::engine::{ContextEngine, ContextualIntent, ScoredTemplate};
use crate::errors::EngineError;
use crate::ontology::Ontology;
use crate::parser::{ExtractedEntities, ParseCache, SemanticParser};

pub use self::analysis::{SessionAnalysis, SessionPhase};
use self::analysis::build_hints;
pub use self::scheduler::{ScheduledTask, Scheduler, TokioScheduler};

/// Results of one successful pipeline pass, committed together.
#[derive(Debug, Clone)]
struct Processed {
    entities: ExtractedEntities,
    intent: ContextualIntent,
    adapted: Option<AdaptedPrompt>,
    suggestions: Vec<ScoredTemplate>,
}

struct SessionState {
    input: String,
    attached_content: Option<String>,
    manual_values: BTreeMap<String, String>,
    selected_template: Option<Template>,
    current: Option<Processed>,
    /// Slot values seen in earlier adaptations, for `execution_text`.
    last_known_values: BTreeMap<String, String>,
    phase: SessionPhase,
    revision: u64,
    pending: Option<ScheduledTask>,
    engine: ContextEngine,
    cache: ParseCache,
    run_count: u64,
    processed_at: Option<DateTime<Utc>>,
}

struct SessionInner {
    id: Uuid,
    parser: SemanticParser,
    adapter: TemplateAdapter,
    scheduler: Arc<dyn Scheduler>,
    debounce: Duration,
    state: Mutex<SessionState>,
}

/// One interactive editing session. Cloning yields another handle to the
/// same session.
#[derive(Clone)]
pub struct PromptSession {
    inner: Arc<SessionInner>,
}

impl PromptSession {
    pub fn new(
        ontology: Arc<Ontology>,
        catalog: Arc<TemplateCatalog>,
        settings: &EngineSettings,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let engine = ContextEngine::new(catalog, ontology.clone(), settings);
        Self::with_engine(engine, ontology, settings, scheduler)
    }

    /// Session over a preconfigured engine (custom scorer or thresholds).
    pub fn with_engine(
        engine: ContextEngine,
        ontology: Arc<Ontology>,
        settings: &EngineSettings,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let id = Uuid::new_v4();
        info!(
            session_id = %id,
            templates = engine.catalog().len(),
            scorer = engine.scorer_backend(),
            "Prompt session created"
        );
        let state = SessionState {
            input: String::new(),
            attached_content: None,
            manual_values: BTreeMap::new(),
            selected_template: None,
            current: None,
            last_known_values: BTreeMap::new(),
            phase: SessionPhase::Idle,
            revision: 0,
            pending: None,
            engine,
            cache: ParseCache::new(settings.parse_cache_capacity),
            run_count: 0,
            processed_at: None,
        };
        Self {
            inner: Arc::new(SessionInner {
                id,
                parser: SemanticParser::new(ontology),
                adapter: TemplateAdapter::new(settings.max_attachment_chars),
                scheduler,
                debounce: settings.debounce,
                state: Mutex::new(state),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    // ── Input interface ─────────────────────────────────────────────────────

    /// Debounced: processing runs once the input has been stable for the
    /// configured quiet period.
    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        let mut state = self.inner.lock();
        state.revision += 1;
        cancel_pending(&mut state);
        state.selected_template = None;
        state.input = text;

        if state.input.trim().is_empty() {
            state.current = None;
            state.phase = SessionPhase::Idle;
            debug!(session_id = %self.inner.id, "blank input, session idle");
            return;
        }

        let revision = state.revision;
        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);
        let task = self.inner.scheduler.schedule(
            self.inner.debounce,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.run_debounced(revision);
                }
            }),
        );
        state.pending = Some(task);
        state.phase = SessionPhase::Pending;
    }

    pub fn set_attached_content(&self, content: Option<String>) {
        let mut state = self.inner.lock();
        state.attached_content = content.filter(|c| !c.trim().is_empty());
        self.inner.reprocess_now(&mut state, "attached content changed");
    }

    /// Manual override for one slot. A blank value removes the override.
    pub fn fill_variable(&self, slot: &str, value: impl Into<String>) {
        let slot = normalize_slot_name(slot);
        let value = value.into();
        let mut state = self.inner.lock();
        if value.trim().is_empty() {
            state.manual_values.remove(&slot);
        } else {
            state.manual_values.insert(slot, value);
        }
        self.inner.reprocess_now(&mut state, "manual value changed");
    }

    pub fn clear_manual_values(&self) {
        let mut state = self.inner.lock();
        state.manual_values.clear();
        self.inner.reprocess_now(&mut state, "manual values cleared");
    }

    /// Use `template` instead of the engine's primary choice until the input
    /// changes. Entities of the committed input are reused when current.
    pub fn select_alternative_template(&self, template: Template) {
        let mut state = self.inner.lock();
        info!(session_id = %self.inner.id, template = %template.id, "template selected");
        state.selected_template = Some(template);
        self.inner.reprocess_now(&mut state, "template selected");
    }

    pub fn replace_catalog(&self, catalog: Arc<TemplateCatalog>) {
        let mut state = self.inner.lock();
        state.engine = state.engine.with_catalog(catalog);
        self.inner.reprocess_now(&mut state, "catalog replaced");
    }

    /// Back to a freshly constructed session. Catalog and ontology untouched.
    pub fn reset(&self) {
        let mut state = self.inner.lock();
        state.revision += 1;
        cancel_pending(&mut state);
        state.input.clear();
        state.attached_content = None;
        state.manual_values.clear();
        state.selected_template = None;
        state.current = None;
        state.last_known_values.clear();
        state.run_count = 0;
        state.processed_at = None;
        state.phase = SessionPhase::Idle;
        info!(session_id = %self.inner.id, "session reset");
    }

    // ── Output interface ────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.inner.lock().phase
    }

    pub fn input(&self) -> String {
        self.inner.lock().input.clone()
    }

    pub fn entities(&self) -> Option<ExtractedEntities> {
        self.inner.lock().current.as_ref().map(|c| c.entities.clone())
    }

    pub fn intent(&self) -> Option<ContextualIntent> {
        self.inner.lock().current.as_ref().map(|c| c.intent.clone())
    }

    pub fn adapted_prompt(&self) -> Option<AdaptedPrompt> {
        self.inner.lock().current.as_ref().and_then(|c| c.adapted.clone())
    }

    pub fn manual_values(&self) -> BTreeMap<String, String> {
        self.inner.lock().manual_values.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.inner
            .lock()
            .current
            .as_ref()
            .and_then(|c| c.adapted.as_ref())
            .is_some_and(|a| a.ready)
    }

    pub fn is_processing(&self) -> bool {
        self.inner.lock().phase == SessionPhase::Pending
    }

    /// Number of completed pipeline passes.
    pub fn run_count(&self) -> u64 {
        self.inner.lock().run_count
    }

    /// Adapted text with pending slots resolved from values the session has
    /// seen before; slots with no known value keep their marker. The template
    /// body is substituted again, so inserted values are never scanned.
    pub fn execution_text(&self) -> Option<String> {
        let state = self.inner.lock();
        let current = state.current.as_ref()?;
        let adapted = current.adapted.as_ref()?;
        if adapted.pending_variables.is_empty() {
            return Some(adapted.text.clone());
        }

        let mut values = slot_values(&current.intent, &state.manual_values);
        for slot in &adapted.pending_variables {
            if let Some(known) = state.last_known_values.get(slot) {
                values.insert(slot.clone(), SlotValue::inferred(known.clone()));
            }
        }
        match self.inner.adapter.adapt(
            &adapted.template,
            &values,
            &current.entities.raw_input,
            state.attached_content.as_deref(),
        ) {
            Ok(resolved) => Some(resolved.text),
            Err(e) => {
                error!(session_id = %self.inner.id, code = e.code(), error = %e, "execution text fell back to adapted text");
                Some(adapted.text.clone())
            }
        }
    }

    pub fn analysis(&self) -> SessionAnalysis {
        let state = self.inner.lock();
        let current = state.current.as_ref();
        SessionAnalysis {
            session_id: self.inner.id,
            phase: state.phase,
            entities: current.map(|c| c.entities.clone()),
            intent: current.map(|c| c.intent.clone()),
            adapted_prompt: current.and_then(|c| c.adapted.clone()),
            suggestions: current.map(|c| c.suggestions.clone()).unwrap_or_default(),
            manual_values: state.manual_values.clone(),
            hints: build_hints(
                current.map(|c| &c.entities),
                current.map(|c| &c.intent),
                current.and_then(|c| c.adapted.as_ref()),
            ),
            run_count: state.run_count,
            processed_at: state.processed_at,
        }
    }
}

impl SessionInner {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn run_debounced(&self, revision: u64) {
        let mut state = self.lock();
        if state.revision != revision {
            debug!(session_id = %self.id, revision, current = state.revision, "stale debounced run skipped");
            return;
        }
        if let Some(mut task) = state.pending.take() {
            task.disarm();
        }
        self.process_full(&mut state);
    }

    /// Immediate trigger. Flushes a pending debounced run; otherwise re-runs
    /// inference and adaptation on the current entities. Entities parsed from
    /// an earlier input are never reused: after a failed run the committed
    /// input is parsed again.
    fn reprocess_now(&self, state: &mut SessionState, trigger: &str) {
        debug!(session_id = %self.id, trigger, "immediate reprocess");
        match state.phase {
            SessionPhase::Pending => {
                // A debounced run already past its sleep must see itself as stale.
                state.revision += 1;
                cancel_pending(state);
                self.process_full(state);
            }
            SessionPhase::Idle | SessionPhase::Processed => {
                let current = state
                    .current
                    .as_ref()
                    .filter(|c| c.entities.raw_input == state.input)
                    .map(|c| c.entities.clone());
                match current {
                    Some(entities) => {
                        let result = self.derive(state, entities);
                        self.commit(state, result);
                    }
                    None if !state.input.trim().is_empty() => self.process_full(state),
                    None => {}
                }
            }
        }
    }

    fn process_full(&self, state: &mut SessionState) {
        let entities = self.parser.parse_cached(&state.input, &mut state.cache);
        let result = self.derive(state, entities);
        self.commit(state, result);
    }

    fn derive(&self, state: &SessionState, entities: ExtractedEntities) -> Result<Processed, EngineError> {
        let intent = match &state.selected_template {
            Some(template) => state.engine.analyze_with_selection(&entities, template)?,
            None => state.engine.analyze(&entities)?,
        };
        let suggestions = state.engine.rank(&entities);

        let adapted = match &intent.primary_prompt {
            Some(template) => {
                let values = slot_values(&intent, &state.manual_values);
                Some(self.adapter.adapt(
                    template,
                    &values,
                    &state.input,
                    state.attached_content.as_deref(),
                )?)
            }
            None => None,
        };

        Ok(Processed {
            entities,
            intent,
            adapted,
            suggestions,
        })
    }

    fn commit(&self, state: &mut SessionState, result: Result<Processed, EngineError>) {
        match result {
            Ok(processed) => {
                if let Some(adapted) = &processed.adapted {
                    for adaptation in &adapted.adaptations {
                        if let Some(slot) = &adaptation.slot {
                            state
                                .last_known_values
                                .insert(slot.clone(), adaptation.after.clone());
                        }
                    }
                }
                state.run_count += 1;
                state.processed_at = Some(Utc::now());
                info!(
                    session_id = %self.id,
                    run = state.run_count,
                    template = processed.intent.primary_prompt.as_ref().map(|t| t.id.as_str()).unwrap_or("none"),
                    score = processed.intent.match_score,
                    ready = processed.adapted.as_ref().is_some_and(|a| a.ready),
                    "input processed"
                );
                state.current = Some(processed);
                state.phase = SessionPhase::Processed;
            }
            Err(e) => {
                error!(session_id = %self.id, code = e.code(), error = %e, "processing failed, keeping last result");
                state.phase = if state.current.is_some() {
                    SessionPhase::Processed
                } else {
                    SessionPhase::Idle
                };
            }
        }
    }
}

/// Inferred values overlaid with manual ones.
fn slot_values(intent: &ContextualIntent, manual: &BTreeMap<String, String>) -> BTreeMap<String, SlotValue> {
    let mut values: BTreeMap<String, SlotValue> = intent
        .inferred_values
        .iter()
        .map(|(slot, value)| (slot.clone(), SlotValue::inferred(value.clone())))
        .collect();
    for (slot, value) in manual {
        values.insert(slot.clone(), SlotValue::manual(value.clone()));
    }
    values
}

fn cancel_pending(state: &mut SessionState) {
    if let Some(mut task) = state.pending.take() {
        task.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::slots::SLOT_RE;

    const SCENARIO: &str = "quero flashcards sobre insuficiência cardíaca para residência";

    fn make_template(id: &str, category: &str, body: &str) -> Template {
        Template {
            id: id.to_string(),
            title: id.to_string(),
            category: category.to_string(),
            description: String::new(),
            body: body.to_string(),
            tags: vec![],
            recommended_ai: None,
            estimated_time: None,
            usage_count: 0,
        }
    }

    fn session_with(catalog: TemplateCatalog) -> PromptSession {
        PromptSession::new(
            Arc::new(Ontology::medical()),
            Arc::new(catalog),
            &EngineSettings::default(),
            Arc::new(TokioScheduler),
        )
    }

    fn cardio_catalog() -> TemplateCatalog {
        TemplateCatalog::new(vec![make_template(
            "cardio",
            "cardiologia",
            "Especialidade: [ESPECIALIDADE]\nTema: [TEMA]",
        )])
    }

    async fn settle() {
        tokio::time::sleep(EngineSettings::default().debounce + Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_session_is_idle() {
        let session = session_with(TemplateCatalog::builtin());
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.entities().is_none());
        assert!(!session.is_ready());
        assert!(!session.is_processing());
        assert_eq!(session.execution_text(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_last_write_wins() {
        let session = session_with(TemplateCatalog::builtin());
        for partial in ["quero", "quero flash", "quero flashcards sobre", SCENARIO] {
            session.set_input(partial);
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        assert!(session.is_processing());
        assert_eq!(session.run_count(), 0);

        settle().await;
        assert_eq!(session.phase(), SessionPhase::Processed);
        assert_eq!(session.run_count(), 1, "exactly one pass for the burst");
        assert_eq!(session.entities().unwrap().raw_input, SCENARIO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_run_before_quiet_period() {
        let session = session_with(TemplateCatalog::builtin());
        session.set_input(SCENARIO);
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(session.run_count(), 0);
        assert!(session.entities().is_none());
        settle().await;
        assert_eq!(session.run_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_value_completes_prompt() {
        let session = session_with(cardio_catalog());
        session.set_input("revisão de cardiologia");
        settle().await;

        let adapted = session.adapted_prompt().unwrap();
        assert_eq!(adapted.filled_variables, vec!["ESPECIALIDADE"]);
        assert_eq!(adapted.pending_variables, vec!["TEMA"]);
        assert!(!session.is_ready());

        session.fill_variable("TEMA", "Arritmias");
        let adapted = session.adapted_prompt().unwrap();
        assert!(session.is_ready());
        assert!(adapted.text.contains("Arritmias") && adapted.text.contains("Cardiologia"));
        assert!(!SLOT_RE.is_match(&adapted.text));
        assert_eq!(session.run_count(), 2, "manual value reprocesses immediately");
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_value_overrides_inferred() {
        let session = session_with(cardio_catalog());
        session.set_input(SCENARIO);
        settle().await;
        assert!(session.adapted_prompt().unwrap().text.contains("Cardiologia"));

        session.fill_variable("especialidade", "Pediatria");
        let text = session.adapted_prompt().unwrap().text;
        assert!(text.contains("Especialidade: Pediatria"), "text was {text}");
        assert!(!text.contains("Cardiologia"));

        session.fill_variable("ESPECIALIDADE", "");
        assert!(session.adapted_prompt().unwrap().text.contains("Cardiologia"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_equals_fresh_session() {
        let session = session_with(TemplateCatalog::builtin());
        session.set_input(SCENARIO);
        settle().await;
        session.fill_variable("TEMA", "Arritmias");
        session.set_attached_content(Some("notas".to_string()));

        session.reset();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.entities().is_none());
        assert!(session.intent().is_none());
        assert!(session.adapted_prompt().is_none());
        assert!(session.manual_values().is_empty());
        assert_eq!(session.input(), "");
        assert_eq!(session.run_count(), 0);
        let analysis = session.analysis();
        assert!(analysis.hints.is_empty());
        assert!(analysis.processed_at.is_none());
        assert_eq!(analysis.run_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_run() {
        let session = session_with(TemplateCatalog::builtin());
        session.set_input(SCENARIO);
        session.reset();
        settle().await;
        assert_eq!(session.run_count(), 0);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_returns_to_idle_keeping_manual_values() {
        let session = session_with(TemplateCatalog::builtin());
        session.set_input(SCENARIO);
        settle().await;
        session.fill_variable("TEMA", "Arritmias");

        session.set_input("   ");
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.entities().is_none());
        assert_eq!(session.manual_values().get("TEMA").map(String::as_str), Some("Arritmias"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_selecting_alternative_skips_parsing() {
        let session = session_with(TemplateCatalog::builtin());
        session.set_input(SCENARIO);
        settle().await;
        let entities = session.entities().unwrap();

        let checklist = TemplateCatalog::builtin().get("checklist-cirurgico").cloned().unwrap();
        session.select_alternative_template(checklist);
        assert_eq!(session.adapted_prompt().unwrap().template.id, "checklist-cirurgico");
        assert_eq!(session.entities().unwrap(), entities);

        // New input drops the selection
        session.set_input("resumo de asma");
        settle().await;
        assert_ne!(session.adapted_prompt().unwrap().template.id, "checklist-cirurgico");
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_trigger_flushes_pending_input() {
        let session = session_with(cardio_catalog());
        session.set_input("revisão de cardiologia");
        session.fill_variable("TEMA", "Arritmias");
        assert_eq!(session.phase(), SessionPhase::Processed);
        assert!(session.is_ready());

        settle().await;
        assert_eq!(session.run_count(), 1, "flushed run replaces the debounced one");
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_error_keeps_last_good_result() {
        let session = session_with(cardio_catalog());
        session.set_input("revisão de cardiologia");
        settle().await;
        let good = session.adapted_prompt().unwrap();

        let broken = make_template("broken", "cardiologia", "Tema: [TEMA");
        session.select_alternative_template(broken);
        assert_eq!(session.phase(), SessionPhase::Processed);
        assert_eq!(session.adapted_prompt().unwrap(), good);
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_error_without_prior_result_is_idle() {
        let session = session_with(TemplateCatalog::new(vec![make_template(
            "broken",
            "cardiologia",
            "Tema: [TEMA",
        )]));
        session.set_input("revisão de cardiologia");
        settle().await;
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.adapted_prompt().is_none());
        assert_eq!(session.run_count(), 0);
    }

    /// Pediatrics request whose best match is malformed, next to a valid
    /// fallback the user can pick.
    fn catalog_with_broken_pediatrics() -> TemplateCatalog {
        TemplateCatalog::new(vec![
            make_template("cardio", "cardiologia", "Especialidade: [ESPECIALIDADE]\nTema: [TEMA]"),
            make_template("ped-broken", "pediatria", "Tema: [TEMA"),
            make_template("ped-ok", "geral", "Especialidade: [ESPECIALIDADE]\nPedido: [PEDIDO]"),
        ])
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_after_failed_run_uses_committed_input() {
        let catalog = catalog_with_broken_pediatrics();
        let session = session_with(catalog.clone());
        session.set_input("revisão de cardiologia");
        settle().await;
        session.set_input("resumo de pediatria");
        settle().await;
        // Failed run keeps the cardiology result on display
        assert_eq!(session.entities().unwrap().raw_input, "revisão de cardiologia");

        session.select_alternative_template(catalog.get("ped-ok").cloned().unwrap());
        assert_eq!(session.phase(), SessionPhase::Processed);
        assert_eq!(session.entities().unwrap().raw_input, "resumo de pediatria");
        let text = session.adapted_prompt().unwrap().text;
        assert_eq!(text, "Especialidade: Pediatria\nPedido: resumo de pediatria");
        assert!(!text.contains("Cardiologia"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_after_failed_first_run_processes_input() {
        let catalog = catalog_with_broken_pediatrics();
        let session = session_with(catalog.clone());
        session.set_input("resumo de pediatria");
        settle().await;
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.run_count(), 0);

        session.select_alternative_template(catalog.get("ped-ok").cloned().unwrap());
        assert_eq!(session.phase(), SessionPhase::Processed);
        assert_eq!(session.run_count(), 1);
        let adapted = session.adapted_prompt().unwrap();
        assert_eq!(adapted.template.id, "ped-ok");
        assert!(adapted.ready);
        assert_eq!(session.entities().unwrap().raw_input, "resumo de pediatria");
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_trigger_without_input_does_nothing() {
        let session = session_with(cardio_catalog());
        session.fill_variable("TEMA", "Arritmias");
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.run_count(), 0);
        assert!(session.adapted_prompt().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_attached_content_reprocesses_immediately() {
        let session = session_with(TemplateCatalog::builtin());
        session.set_input("resumo de asma");
        settle().await;

        session.set_attached_content(Some("GINA 2024: corticoide inalatório".to_string()));
        let adapted = session.adapted_prompt().unwrap();
        assert!(adapted.text.contains("GINA 2024"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_catalog_reprocesses() {
        let session = session_with(TemplateCatalog::empty());
        session.set_input("revisão de cardiologia");
        settle().await;
        assert!(session.adapted_prompt().is_none());

        session.replace_catalog(Arc::new(cardio_catalog()));
        assert_eq!(session.adapted_prompt().unwrap().template.id, "cardio");
    }

    #[tokio::test(start_paused = true)]
    async fn test_execution_text_uses_last_known_values() {
        let session = session_with(cardio_catalog());
        session.set_input("revisão de cardiologia sobre arritmias");
        settle().await;
        assert!(session.is_ready());

        // Topic disappears from the input; the last known TEMA still resolves
        session.set_input("revisão de cardiologia");
        settle().await;
        assert!(!session.is_ready());
        let text = session.execution_text().unwrap();
        assert!(text.contains("Tema: arritmias"), "text was {text}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_execution_text_does_not_rescan_inserted_values() {
        let session = session_with(cardio_catalog());
        session.set_input("revisão de cardiologia sobre arritmias");
        settle().await;
        session.set_input("revisão de cardiologia");
        settle().await;

        session.fill_variable("ESPECIALIDADE", "ver [TEMA] depois");
        let text = session.execution_text().unwrap();
        assert_eq!(text, "Especialidade: ver [TEMA] depois\nTema: arritmias");
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_snapshot_serializes() {
        let session = session_with(TemplateCatalog::builtin());
        session.set_input(SCENARIO);
        settle().await;

        let analysis = session.analysis();
        assert_eq!(analysis.session_id, session.id());
        assert_eq!(analysis.phase, SessionPhase::Processed);
        assert_eq!(analysis.run_count, 1);
        assert!(analysis.processed_at.is_some());
        assert!(!analysis.suggestions.is_empty());
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["phase"], "processed");
        assert_eq!(json["entities"]["output_format"], "flashcards");
    }
}
