//! Submission lifecycle for one statement form.
//!
//! `submit()` is split into three steps so a UI loop never blocks on the
//! network:
//!   1. `begin_submit` validates and moves to `Submitting` (synchronous),
//!   2. `Submission::run` performs the request (async, owns its inputs),
//!   3. `settle` folds the outcome into a terminal state.
//!
//! Every `begin_submit` takes a new generation. A settlement from an older
//! generation is dropped, so the state always belongs to the most recently
//! invoked submission.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use cardparse_core::{BankId, FormState, ParsedResult, RequestState, SelectedFile, SubmitError};
use futures_util::FutureExt;
use tracing::{debug, info};

use crate::request::ParseRequest;
use crate::service::ParseService;

pub struct SubmissionController {
    form: FormState,
    state: RequestState,
    generation: u64,
    service: Arc<dyn ParseService>,
}

impl SubmissionController {
    pub fn new(service: Arc<dyn ParseService>) -> Self {
        Self::with_bank(service, BankId::default())
    }

    pub fn with_bank(service: Arc<dyn ParseService>, bank: BankId) -> Self {
        Self {
            form: FormState::new(bank),
            state: RequestState::Idle,
            generation: 0,
            service,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn bank(&self) -> BankId {
        self.form.bank
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.form.file.as_ref()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state.is_submitting()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn select_bank(&mut self, bank: BankId) {
        self.form.bank = bank;
    }

    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        self.form.file = file;
    }

    /// Validate and enter `Submitting`. Returns `None` when validation fails;
    /// the state is then `Failed` and nothing is sent.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        self.generation += 1;

        let (bank, file) = match self.form.validate() {
            Ok((bank, file)) => (bank, file.clone()),
            Err(err) => {
                debug!(generation = self.generation, "validation failed");
                self.state = RequestState::Failed(err.to_string());
                return None;
            }
        };

        // previous result/error is gone before the request leaves
        self.state = RequestState::Submitting;
        info!(
            generation = self.generation,
            %bank,
            file = %file.file_name,
            "submission started"
        );

        Some(Submission {
            generation: self.generation,
            request: ParseRequest::new(bank, file),
            service: Arc::clone(&self.service),
        })
    }

    /// Apply a settled outcome. Returns `false` if it was stale and ignored.
    pub fn settle(&mut self, settlement: Settlement) -> bool {
        if settlement.generation != self.generation || !self.state.is_submitting() {
            debug!(
                stale = settlement.generation,
                current = self.generation,
                "discarding superseded settlement"
            );
            return false;
        }

        match &settlement.outcome {
            Ok(_) => info!(generation = settlement.generation, "submission succeeded"),
            Err(err) => info!(
                generation = settlement.generation,
                kind = err.kind(),
                error = %err,
                "submission failed"
            ),
        }

        self.state = RequestState::settled(settlement.outcome);
        true
    }

    /// Validate, send, and settle in one call.
    pub async fn submit(&mut self) -> &RequestState {
        if let Some(submission) = self.begin_submit() {
            let settlement = submission.run().await;
            self.settle(settlement);
        }
        &self.state
    }
}

/// An in-flight request, detached from the controller so it can run on
/// another task.
pub struct Submission {
    generation: u64,
    request: ParseRequest,
    service: Arc<dyn ParseService>,
}

impl Submission {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &ParseRequest {
        &self.request
    }

    /// Always resolves to a settlement; a panicking service becomes a
    /// transport failure so the in-flight state is still released.
    pub async fn run(self) -> Settlement {
        let Submission {
            generation,
            request,
            service,
        } = self;

        let outcome = match AssertUnwindSafe(service.parse(request)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(payload) => Err(SubmitError::Transport(panic_message(payload.as_ref()))),
        };

        Settlement {
            generation,
            outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    generation: u64,
    outcome: Result<ParsedResult, SubmitError>,
}

impl Settlement {
    pub fn new(generation: u64, outcome: Result<ParsedResult, SubmitError>) -> Self {
        Self {
            generation,
            outcome,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn outcome(&self) -> &Result<ParsedResult, SubmitError> {
        &self.outcome
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("parser task panicked: {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cardparse_core::VALIDATION_MESSAGE;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedService {
        calls: AtomicUsize,
        outcome: Result<ParsedResult, SubmitError>,
    }

    impl FixedService {
        fn new(outcome: Result<ParsedResult, SubmitError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                outcome,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ParseService for FixedService {
        async fn parse(&self, _request: ParseRequest) -> Result<ParsedResult, SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    struct PanickingService;

    #[async_trait]
    impl ParseService for PanickingService {
        async fn parse(&self, _request: ParseRequest) -> Result<ParsedResult, SubmitError> {
            panic!("boom");
        }
    }

    fn pdf() -> SelectedFile {
        SelectedFile::pdf("statement.pdf", b"%PDF-1.4".to_vec())
    }

    #[test]
    fn test_initial_state() {
        let svc = FixedService::new(Err(SubmitError::ServiceUnspecified));
        let c = SubmissionController::new(svc);
        assert_eq!(c.state(), &RequestState::Idle);
        assert_eq!(c.bank(), BankId::Hdfc);
        assert!(c.file().is_none());
    }

    #[test]
    fn test_selection_leaves_state_alone() {
        let svc = FixedService::new(Err(SubmitError::ServiceUnspecified));
        let mut c = SubmissionController::new(svc);
        c.select_bank(BankId::Axis);
        c.select_file(Some(pdf()));
        assert_eq!(c.state(), &RequestState::Idle);
        assert_eq!(c.bank(), BankId::Axis);

        c.select_file(None);
        assert!(c.file().is_none());
        assert_eq!(c.state(), &RequestState::Idle);
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing_and_is_repeatable() {
        let svc = FixedService::new(Ok(ParsedResult::new(json!({}))));
        let mut c = SubmissionController::with_bank(svc.clone(), BankId::Icici);

        for _ in 0..3 {
            let state = c.submit().await;
            assert_eq!(state, &RequestState::Failed(VALIDATION_MESSAGE.to_string()));
        }
        assert_eq!(svc.calls(), 0);
    }

    #[tokio::test]
    async fn test_validation_failure_clears_prior_result() {
        let svc = FixedService::new(Ok(ParsedResult::new(json!({"ok": true}))));
        let mut c = SubmissionController::new(svc);
        c.select_file(Some(pdf()));
        assert!(c.submit().await.result().is_some());

        c.select_file(None);
        c.submit().await;
        assert!(c.state().result().is_none());
        assert_eq!(c.state().error_message(), Some(VALIDATION_MESSAGE));
    }

    #[tokio::test]
    async fn test_in_flight_between_begin_and_settle() {
        let svc = FixedService::new(Err(SubmitError::Service("bad pdf".into())));
        let mut c = SubmissionController::new(svc);
        c.select_file(Some(pdf()));

        let submission = c.begin_submit().unwrap();
        assert!(c.is_submitting());
        assert_eq!(submission.request().bank, BankId::Hdfc);

        let settlement = submission.run().await;
        // still in flight until the settlement is applied
        assert!(c.is_submitting());
        assert!(c.settle(settlement));
        assert!(!c.is_submitting());
        assert_eq!(c.state().error_message(), Some("bad pdf"));
    }

    #[tokio::test]
    async fn test_resubmit_clears_previous_error_first() {
        let svc = FixedService::new(Ok(ParsedResult::new(json!({"n": 1}))));
        let mut c = SubmissionController::new(svc);
        c.submit().await;
        assert!(c.state().error_message().is_some());

        c.select_file(Some(pdf()));
        let submission = c.begin_submit().unwrap();
        assert_eq!(c.state(), &RequestState::Submitting);
        c.settle(submission.run().await);
        assert_eq!(c.state().result().unwrap().value(), &json!({"n": 1}));
    }

    #[tokio::test]
    async fn test_stale_settlement_is_discarded() {
        let svc = FixedService::new(Ok(ParsedResult::new(json!({"n": 1}))));
        let mut c = SubmissionController::new(svc);
        c.select_file(Some(pdf()));

        let first = c.begin_submit().unwrap();
        let second = c.begin_submit().unwrap();
        assert_eq!(second.generation(), first.generation() + 1);

        let s2 = Settlement::new(second.generation(), Err(SubmitError::Service("second".into())));
        let s1 = first.run().await;

        assert!(c.settle(s2));
        assert!(!c.settle(s1));
        assert_eq!(c.state().error_message(), Some("second"));
    }

    #[tokio::test]
    async fn test_validation_failure_supersedes_in_flight() {
        let svc = FixedService::new(Ok(ParsedResult::new(json!({}))));
        let mut c = SubmissionController::new(svc);
        c.select_file(Some(pdf()));
        let in_flight = c.begin_submit().unwrap();

        c.select_file(None);
        assert!(c.begin_submit().is_none());

        assert!(!c.settle(in_flight.run().await));
        assert_eq!(c.state().error_message(), Some(VALIDATION_MESSAGE));
    }

    #[tokio::test]
    async fn test_panicking_service_still_releases() {
        let mut c = SubmissionController::new(Arc::new(PanickingService));
        c.select_file(Some(pdf()));

        let state = c.submit().await;
        assert!(!state.is_submitting());
        let msg = state.error_message().unwrap();
        assert!(msg.contains("boom"), "{msg}");
    }
}
