//! The resilient invoker — retry/backoff with provider-error-aware context
//! truncation.
//!
//! One call to [`invoke`] makes at most `max_retries + 1` attempts against
//! the endpoint. An oversized rejection shrinks the payload's context to 75%
//! of its current length (floor 100 chars) before the next attempt; any
//! other failure retries the payload unchanged. Delays double from
//! `base_delay` up to `max_delay`.

use std::time::Duration;

use barrister_core::error::{Error, Result};
use barrister_core::model::{ModelEndpoint, ModelResponse};
use barrister_core::prompt::PromptPayload;
use tracing::{debug, warn};

/// Context never shrinks below this many characters.
pub const MIN_CONTEXT_CHARS: usize = 100;

/// Retry/backoff policy for [`invoke`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retries after the first attempt.
    pub max_retries: u32,
    /// Initial backoff delay.
    pub base_delay: Duration,
    /// Backoff delay cap.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Build a policy from delay values in seconds.
    pub fn from_secs(max_retries: u32, base_delay_secs: f64, max_delay_secs: f64) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs_f64(base_delay_secs),
            max_delay: Duration::from_secs_f64(max_delay_secs),
        }
    }
}

/// The shrink target for a context currently `len` characters long:
/// `floor(len * 0.75)`, floored at [`MIN_CONTEXT_CHARS`], never growing.
fn shrink_target(len: usize) -> usize {
    (len * 3 / 4).max(MIN_CONTEXT_CHARS).min(len)
}

/// Submit `payload` to `endpoint`, retrying per `policy`.
///
/// Returns exactly one successful response, or exactly one final
/// [`Error::RetriesExhausted`] carrying the last underlying error. The
/// caller's payload is consumed; each retry round constructs a fresh payload
/// rather than mutating shared state.
pub async fn invoke(
    endpoint: &dyn ModelEndpoint,
    payload: PromptPayload,
    policy: &RetryPolicy,
) -> Result<ModelResponse> {
    let mut payload = payload;
    let mut attempt: u32 = 0;
    let mut delay = policy.base_delay;

    loop {
        match endpoint.generate(&payload).await {
            Ok(response) => {
                debug!(
                    endpoint = endpoint.name(),
                    attempts = attempt + 1,
                    "Model call succeeded"
                );
                return Ok(response);
            }
            Err(err) => {
                attempt += 1;
                if attempt > policy.max_retries {
                    warn!(
                        endpoint = endpoint.name(),
                        attempts = attempt,
                        error = %err,
                        "Giving up: retry budget exhausted"
                    );
                    return Err(Error::RetriesExhausted {
                        attempts: attempt,
                        source: err,
                    });
                }

                if err.is_oversized() {
                    let current = payload.context_chars();
                    let target = shrink_target(current);
                    warn!(
                        endpoint = endpoint.name(),
                        attempt,
                        from_chars = current,
                        to_chars = target,
                        "Oversized request rejected, shrinking context"
                    );
                    payload = payload.truncated_to(target);
                } else {
                    warn!(
                        endpoint = endpoint.name(),
                        attempt,
                        error = %err,
                        "Transient model error, will retry"
                    );
                }

                let wait = delay.min(policy.max_delay);
                tokio::time::sleep(wait).await;
                delay = (delay * 2).min(policy.max_delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use barrister_core::error::ModelError;
    use std::sync::Mutex;

    /// An endpoint that replays a scripted sequence of outcomes and records
    /// what it saw on each call.
    struct ScriptedEndpoint {
        script: Mutex<Vec<std::result::Result<ModelResponse, ModelError>>>,
        seen_context_chars: Mutex<Vec<usize>>,
        call_times: Mutex<Vec<tokio::time::Instant>>,
    }

    impl ScriptedEndpoint {
        fn new(script: Vec<std::result::Result<ModelResponse, ModelError>>) -> Self {
            Self {
                script: Mutex::new(script),
                seen_context_chars: Mutex::new(Vec::new()),
                call_times: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen_context_chars.lock().unwrap().len()
        }

        fn contexts(&self) -> Vec<usize> {
            self.seen_context_chars.lock().unwrap().clone()
        }

        fn delays_secs(&self) -> Vec<u64> {
            let times = self.call_times.lock().unwrap();
            times
                .windows(2)
                .map(|w| (w[1] - w[0]).as_secs())
                .collect()
        }
    }

    #[async_trait]
    impl ModelEndpoint for ScriptedEndpoint {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            payload: &PromptPayload,
        ) -> std::result::Result<ModelResponse, ModelError> {
            self.seen_context_chars
                .lock()
                .unwrap()
                .push(payload.context_chars());
            self.call_times
                .lock()
                .unwrap()
                .push(tokio::time::Instant::now());
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                return Ok(ModelResponse::Text("fallthrough".into()));
            }
            script.remove(0)
        }
    }

    fn oversized() -> ModelError {
        ModelError::Oversized("payload too large".into())
    }

    fn transient() -> ModelError {
        ModelError::Network("connection reset".into())
    }

    fn ok(text: &str) -> std::result::Result<ModelResponse, ModelError> {
        Ok(ModelResponse::Text(text.into()))
    }

    fn payload_with_context(chars: usize) -> PromptPayload {
        PromptPayload::question("q", "x".repeat(chars), "")
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_makes_one_call_without_delay() {
        let endpoint = ScriptedEndpoint::new(vec![ok("answer")]);
        let start = tokio::time::Instant::now();

        let response = invoke(&endpoint, payload_with_context(50), &RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(response.text(), "answer");
        assert_eq!(endpoint.calls(), 1);
        assert_eq!(tokio::time::Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_shrinks_context_by_quarter_each_retry() {
        let endpoint =
            ScriptedEndpoint::new(vec![Err(oversized()), Err(oversized()), ok("fits now")]);

        let response = invoke(
            &endpoint,
            payload_with_context(1000),
            &RetryPolicy::default(),
        )
        .await
        .unwrap();

        assert_eq!(response.text(), "fits now");
        // 1000 → floor(750) → floor(562): 0.75^2 of the original
        assert_eq!(endpoint.contexts(), vec![1000, 750, 562]);
    }

    #[tokio::test(start_paused = true)]
    async fn shrink_floors_at_one_hundred_chars() {
        let endpoint = ScriptedEndpoint::new(vec![Err(oversized()), Err(oversized()), ok("ok")]);

        invoke(&endpoint, payload_with_context(120), &RetryPolicy::default())
            .await
            .unwrap();

        // floor(120 * 0.75) = 90 → floored to 100; never shrinks further
        assert_eq!(endpoint.contexts(), vec![120, 100, 100]);
    }

    #[tokio::test(start_paused = true)]
    async fn context_already_below_floor_is_left_alone() {
        let endpoint = ScriptedEndpoint::new(vec![Err(oversized()), ok("ok")]);

        invoke(&endpoint, payload_with_context(80), &RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(endpoint.contexts(), vec![80, 80]);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_retry_without_shrinking() {
        let endpoint = ScriptedEndpoint::new(vec![Err(transient()), Err(transient()), ok("ok")]);

        invoke(&endpoint, payload_with_context(500), &RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(endpoint.contexts(), vec![500, 500, 500]);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_makes_exactly_max_retries_plus_one_calls() {
        let endpoint = ScriptedEndpoint::new(vec![
            Err(transient()),
            Err(transient()),
            Err(transient()),
            Err(transient()),
        ]);

        let err = invoke(&endpoint, payload_with_context(50), &RetryPolicy::default())
            .await
            .unwrap_err();

        assert_eq!(endpoint.calls(), 4);
        match err {
            Error::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 4);
                assert!(!source.is_oversized());
            }
            other => panic!("Expected RetriesExhausted, got: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_doubles_from_base_delay() {
        let endpoint = ScriptedEndpoint::new(vec![
            Err(transient()),
            Err(transient()),
            Err(transient()),
            ok("late success"),
        ]);

        invoke(&endpoint, payload_with_context(50), &RetryPolicy::default())
            .await
            .unwrap();

        assert_eq!(endpoint.delays_secs(), vec![1, 2, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_caps_at_max_delay() {
        let endpoint = ScriptedEndpoint::new(vec![
            Err(transient()),
            Err(transient()),
            Err(transient()),
            Err(transient()),
            Err(transient()),
            ok("finally"),
        ]);
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(10),
        };

        invoke(&endpoint, payload_with_context(50), &policy)
            .await
            .unwrap();

        // 3, 6, then capped at 10
        assert_eq!(endpoint.delays_secs(), vec![3, 6, 10, 10, 10]);
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_exhaustion_propagates_the_size_error() {
        let endpoint = ScriptedEndpoint::new(vec![
            Err(oversized()),
            Err(oversized()),
            Err(oversized()),
            Err(oversized()),
        ]);

        let err = invoke(&endpoint, payload_with_context(400), &RetryPolicy::default())
            .await
            .unwrap_err();

        assert!(err.is_oversized_exhaustion());
    }

    #[test]
    fn shrink_target_contract() {
        assert_eq!(shrink_target(1000), 750);
        assert_eq!(shrink_target(750), 562);
        assert_eq!(shrink_target(120), 100);
        assert_eq!(shrink_target(100), 100);
        assert_eq!(shrink_target(80), 80);
        assert_eq!(shrink_target(0), 0);
    }

    #[test]
    fn policy_from_secs() {
        let policy = RetryPolicy::from_secs(3, 1.0, 10.0);
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
    }
}
