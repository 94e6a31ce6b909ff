//! End-to-end: retrieve fragments from a file, answer through the resilient
//! invoker with a scripted endpoint, and export the PDF transcript.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use barrister_core::error::ModelError;
use barrister_core::fragment::FragmentSource;
use barrister_core::model::{ModelEndpoint, ModelResponse, ResponseMessage};
use barrister_core::prompt::PromptPayload;
use barrister_pipeline::{QaService, RetryPolicy};
use barrister_report::{ReportWriter, REPORT_FILE_NAME};
use barrister_retrieval::FileFragmentSource;

/// Succeeds after a configurable number of failures, echoing whether the
/// retrieved context reached the prompt.
struct FlakyEndpoint {
    failures_before_success: usize,
    calls: AtomicUsize,
    error: ModelError,
}

impl FlakyEndpoint {
    fn new(failures_before_success: usize, error: ModelError) -> Self {
        Self {
            failures_before_success,
            calls: AtomicUsize::new(0),
            error,
        }
    }
}

#[async_trait]
impl ModelEndpoint for FlakyEndpoint {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn generate(
        &self,
        payload: &PromptPayload,
    ) -> std::result::Result<ModelResponse, ModelError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures_before_success {
            return Err(self.error.clone());
        }
        let grounded = payload.context.contains("sixty days");
        Ok(ModelResponse::Message(ResponseMessage {
            content: if grounded {
                "Termination requires sixty days written notice.".into()
            } else {
                "I don't know.".into()
            },
            model: Some("test-model".into()),
            usage: None,
        }))
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(4),
    }
}

const CONTRACT: &str = "\
The parties agree to the terms set out below.\n\n\
Termination requires sixty days written notice from either party.\n\n\
Governing law is the law of Delaware.";

#[tokio::test]
async fn question_is_answered_from_retrieved_context() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("contract.txt"), CONTRACT).unwrap();

    let source = FileFragmentSource::new(dir.path(), 8);
    let fragments = source
        .retrieve("termination notice period", "contract.txt")
        .await
        .unwrap();

    let endpoint = Arc::new(FlakyEndpoint::new(0, ModelError::Network("unused".into())));
    let service = QaService::new(endpoint).with_policy(fast_policy());

    let answer = service
        .answer(&fragments, "What is the notice period?", "")
        .await;
    assert_eq!(answer, "Termination requires sixty days written notice.");
}

#[tokio::test]
async fn transient_failures_are_retried_through_to_an_answer() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("contract.txt"), CONTRACT).unwrap();

    let source = FileFragmentSource::new(dir.path(), 8);
    let fragments = source.retrieve("termination", "contract.txt").await.unwrap();

    let endpoint = Arc::new(FlakyEndpoint::new(
        2,
        ModelError::RateLimited {
            retry_after_secs: 1,
        },
    ));
    let service = QaService::new(endpoint.clone()).with_policy(fast_policy());

    let answer = service
        .answer(&fragments, "What is the notice period?", "")
        .await;
    assert_eq!(answer, "Termination requires sixty days written notice.");
    assert_eq!(endpoint.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn session_transcript_exports_to_pdf() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("contract.txt"), CONTRACT).unwrap();

    let source = FileFragmentSource::new(dir.path(), 8);
    let fragments = source.retrieve("termination", "contract.txt").await.unwrap();

    let endpoint = Arc::new(FlakyEndpoint::new(0, ModelError::Network("unused".into())));
    let service = QaService::new(endpoint).with_policy(fast_policy());

    let question = "What is the notice period?".to_string();
    let answer = service.answer(&fragments, &question, "").await;

    let writer = ReportWriter::new(dir.path());
    let path = writer
        .generate(&[question], &[ModelResponse::Text(answer)])
        .unwrap();

    assert_eq!(path, dir.path().join(REPORT_FILE_NAME));
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
}

#[tokio::test]
async fn summarize_skips_the_model_without_content() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("empty.txt"), "\n\n  \n\n").unwrap();

    let source = FileFragmentSource::new(dir.path(), 8);
    let fragments = source.load_all("empty.txt").await.unwrap();

    let endpoint = Arc::new(FlakyEndpoint::new(0, ModelError::Network("unused".into())));
    let service = QaService::new(endpoint.clone()).with_policy(fast_policy());

    let summary = service.summarize(&fragments).await;
    assert_eq!(summary, "No document text could be extracted to summarize.");
    assert_eq!(endpoint.calls.load(Ordering::SeqCst), 0);
}
