//! Generation orchestrator: the per-request pipeline.
//!
//! A request runs through a fixed sequence of stages:
//!
//! ```text
//! INIT -> FIRST_REQUESTED -> VALIDATING -> (PASS | REPAIR_REQUESTED)
//!      -> (REPAIR_VALIDATING) -> DONE
//! ```
//!
//! The structure enforces the terminal invariant: at most one repair
//! round per request, and a failed repair falls back to the original
//! text instead of looping. External-call failures propagate to the
//! caller and are never retried here.

use std::sync::Arc;

use crate::constraint;
use crate::error::LlmError;
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::prompts::{build_generation_prompt, build_repair_prompt};

/// Sampling temperature for the first generation request.
pub const GENERATION_TEMPERATURE: f64 = 0.7;

/// Sampling temperature for the repair request.
pub const REPAIR_TEMPERATURE: f64 = 0.5;

/// Smallest accepted poem count.
const MIN_POEM_COUNT: i64 = 1;

/// Largest accepted poem count.
const MAX_POEM_COUNT: i64 = 10;

/// Raw inputs for one generation request, before normalization.
#[derive(Debug, Clone, Default)]
pub struct PoemRequest {
    /// Free-form letters input; normalized into the acrostic key.
    pub letters: String,
    /// Requested poem count, if the caller supplied a usable integer.
    pub count: Option<i64>,
    /// Whether to append line-by-line Japanese translations.
    pub translate: bool,
}

/// How the repair round concluded for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairDecision {
    /// No repair was issued: key absent or first generation passed.
    NotNeeded,
    /// The repair was issued and its output validated.
    Accepted,
    /// The repair was issued, still violated the rule, and was discarded.
    Discarded,
}

/// Final result of one generation request.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// The poem text returned to the caller.
    pub text: String,
    /// The normalized letter key derived from the request.
    pub key: String,
    /// Which path the repair round took.
    pub repair: RepairDecision,
}

/// Orchestrates generation, validation and the single repair round.
pub struct Orchestrator {
    /// Provider used for all model calls.
    provider: Arc<dyn LlmProvider>,
    /// Model identifier sent with every request.
    model: String,
}

impl Orchestrator {
    /// Create a new orchestrator over the given provider and model.
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Get the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Clamp a requested poem count into [1, 10].
    ///
    /// Absent or invalid input defaults to 1; out-of-range values are
    /// clamped, never rejected.
    pub fn clamp_count(raw: Option<i64>) -> u32 {
        raw.unwrap_or(MIN_POEM_COUNT)
            .clamp(MIN_POEM_COUNT, MAX_POEM_COUNT) as u32
    }

    /// Run one generation request through the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns `LlmError` if either model call fails. A constraint
    /// violation that survives the repair round is not an error: the
    /// original text is returned with `RepairDecision::Discarded`.
    pub async fn generate(&self, request: PoemRequest) -> Result<GenerationOutcome, LlmError> {
        // INIT
        let key = constraint::normalize_letters(&request.letters);
        let count = Self::clamp_count(request.count);
        tracing::debug!(
            key = %key,
            count,
            translate = request.translate,
            "starting generation request"
        );

        // FIRST_REQUESTED
        let prompt = build_generation_prompt(&key, count, request.translate);
        let first = self
            .call(prompt.system, prompt.user, GENERATION_TEMPERATURE)
            .await?;

        // VALIDATING: a key shorter or longer than five letters disables
        // checking entirely.
        if key.len() != 5 || constraint::all_poems_satisfy_key(&first, &key) {
            return Ok(GenerationOutcome {
                text: first,
                key,
                repair: RepairDecision::NotNeeded,
            });
        }

        // REPAIR_REQUESTED: exactly one repair round, never more.
        tracing::info!(key = %key, "end-word rule violated, requesting repair");
        let repair = build_repair_prompt(&first, &key);
        let repaired = self
            .call(repair.system, repair.user, REPAIR_TEMPERATURE)
            .await?;

        // REPAIR_VALIDATING
        if constraint::all_poems_satisfy_key(&repaired, &key) {
            Ok(GenerationOutcome {
                text: repaired,
                key,
                repair: RepairDecision::Accepted,
            })
        } else {
            tracing::warn!(key = %key, "repair still violates the rule, keeping original text");
            Ok(GenerationOutcome {
                text: first,
                key,
                repair: RepairDecision::Discarded,
            })
        }
    }

    /// Issue one model call and return the trimmed completion text.
    async fn call(
        &self,
        system: String,
        user: String,
        temperature: f64,
    ) -> Result<String, LlmError> {
        let request = GenerationRequest::new(
            self.model.clone(),
            vec![Message::system(system), Message::user(user)],
        )
        .with_temperature(temperature);

        let response = self.provider.generate(request).await?;
        Ok(response.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Choice, GenerationResponse, Usage};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A poem that satisfies the key "ABCDE".
    const PASSING: &str = "1) the Arch\nthe Beam\nthe Corbel\nthe Dome\nthe Eave";

    /// A poem that violates the key "ABCDE" on line 3.
    const FAILING: &str = "1) the Arch\nthe Beam\nthe Pier\nthe Dome\nthe Eave";

    /// Provider test double that replays scripted responses in order.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        calls: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<GenerationRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            self.calls.lock().unwrap().push(request.clone());
            let scripted = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra model call");
            scripted.map(|content| GenerationResponse {
                id: "test".to_string(),
                model: request.model,
                choices: vec![Choice {
                    index: 0,
                    message: Message::assistant(content),
                    finish_reason: "stop".to_string(),
                }],
                usage: Usage {
                    prompt_tokens: 0,
                    completion_tokens: 0,
                    total_tokens: 0,
                },
            })
        }
    }

    fn orchestrator(provider: Arc<ScriptedProvider>) -> Orchestrator {
        Orchestrator::new(provider, "test-model")
    }

    #[test]
    fn test_clamp_count_defaults_and_limits() {
        assert_eq!(Orchestrator::clamp_count(None), 1);
        assert_eq!(Orchestrator::clamp_count(Some(3)), 3);
        assert_eq!(Orchestrator::clamp_count(Some(0)), 1);
        assert_eq!(Orchestrator::clamp_count(Some(-4)), 1);
        assert_eq!(Orchestrator::clamp_count(Some(99)), 10);
    }

    #[tokio::test]
    async fn test_short_key_skips_validation() {
        // "arch!" normalizes to a 4-letter key, so anything is accepted.
        let provider = ScriptedProvider::new(vec![Ok("not a poem at all".to_string())]);
        let outcome = orchestrator(provider.clone())
            .generate(PoemRequest {
                letters: "arch!".to_string(),
                count: Some(2),
                translate: false,
            })
            .await
            .expect("generation should succeed");

        assert_eq!(outcome.text, "not a poem at all");
        assert_eq!(outcome.key, "ARCH");
        assert_eq!(outcome.repair, RepairDecision::NotNeeded);
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_passing_first_generation_needs_no_repair() {
        let provider = ScriptedProvider::new(vec![Ok(PASSING.to_string())]);
        let outcome = orchestrator(provider.clone())
            .generate(PoemRequest {
                letters: "abcde".to_string(),
                count: None,
                translate: false,
            })
            .await
            .expect("generation should succeed");

        assert_eq!(outcome.text, PASSING);
        assert_eq!(outcome.repair, RepairDecision::NotNeeded);

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].temperature, Some(GENERATION_TEMPERATURE));
        assert_eq!(calls[0].messages[0].role, "system");
        assert_eq!(calls[0].messages[1].content, "Generate now.");
    }

    #[tokio::test]
    async fn test_failing_first_with_passing_repair_returns_repair() {
        let provider =
            ScriptedProvider::new(vec![Ok(FAILING.to_string()), Ok(PASSING.to_string())]);
        let outcome = orchestrator(provider.clone())
            .generate(PoemRequest {
                letters: "ABCDE".to_string(),
                count: Some(1),
                translate: false,
            })
            .await
            .expect("generation should succeed");

        assert_eq!(outcome.text, PASSING);
        assert_eq!(outcome.repair, RepairDecision::Accepted);

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].temperature, Some(REPAIR_TEMPERATURE));
        assert!(calls[1].messages[0].content.contains("strict editor"));
        assert!(calls[1].messages[1].content.contains(FAILING));
    }

    #[tokio::test]
    async fn test_failing_repair_falls_back_to_original() {
        let provider =
            ScriptedProvider::new(vec![Ok(FAILING.to_string()), Ok(FAILING.to_string())]);
        let outcome = orchestrator(provider.clone())
            .generate(PoemRequest {
                letters: "ABCDE".to_string(),
                count: Some(1),
                translate: false,
            })
            .await
            .expect("generation should succeed");

        // Original text is returned; exactly one repair was attempted.
        assert_eq!(outcome.text, FAILING);
        assert_eq!(outcome.repair, RepairDecision::Discarded);
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_first_call_failure_propagates() {
        let provider = ScriptedProvider::new(vec![Err(LlmError::ApiError {
            code: 500,
            message: "backend down".to_string(),
        })]);
        let result = orchestrator(provider.clone())
            .generate(PoemRequest {
                letters: "ABCDE".to_string(),
                count: None,
                translate: false,
            })
            .await;

        assert!(matches!(result, Err(LlmError::ApiError { code: 500, .. })));
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_repair_call_failure_propagates() {
        let provider = ScriptedProvider::new(vec![
            Ok(FAILING.to_string()),
            Err(LlmError::RequestFailed("timeout".to_string())),
        ]);
        let result = orchestrator(provider)
            .generate(PoemRequest {
                letters: "ABCDE".to_string(),
                count: None,
                translate: false,
            })
            .await;

        assert!(matches!(result, Err(LlmError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_prompt_reflects_key_and_translation() {
        // PASSING violates "GABLE", so a (discarded) repair round follows.
        let provider =
            ScriptedProvider::new(vec![Ok(PASSING.to_string()), Ok(PASSING.to_string())]);
        orchestrator(provider.clone())
            .generate(PoemRequest {
                letters: "gable".to_string(),
                count: Some(2),
                translate: true,
            })
            .await
            .expect("generation should succeed");

        let system = provider.calls()[0].messages[0].content.clone();
        assert!(system.contains("Generate 2 five-line"));
        assert!(system.contains("Line1 end-word must start with \"G\""));
        assert!(system.contains("Japanese translation"));
    }
}
