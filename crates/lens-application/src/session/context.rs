//! Session-scoped shared state.
//!
//! One `SessionContext` exists per page session. It is created at page load,
//! shared by the access gate, the token lifecycle manager and the controller,
//! and never torn down explicitly.

use lens_core::{AnalysisReport, StartupIdea, TokenStore};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// The two screens the controller navigates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Input,
    Results,
}

#[derive(Debug)]
struct SubmissionState {
    view: View,
    submission: Option<StartupIdea>,
    outcome: Option<AnalysisReport>,
}

/// Explicitly owned session state.
///
/// Holds the durable token slot, the access grant, the in-flight flag, and the
/// current submission/outcome pair. Every submission is tagged with a
/// generation number; returning to the input view bumps it so a response that
/// arrives afterwards can be recognised as stale.
pub struct SessionContext {
    token_store: Arc<dyn TokenStore>,
    access_granted: AtomicBool,
    in_flight: AtomicBool,
    generation: AtomicU64,
    state: RwLock<SubmissionState>,
}

impl SessionContext {
    /// Creates the context for a fresh page session.
    ///
    /// With `access_required = false` the grant starts out true.
    pub fn new(token_store: Arc<dyn TokenStore>, access_required: bool) -> Self {
        Self {
            token_store,
            access_granted: AtomicBool::new(!access_required),
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            state: RwLock::new(SubmissionState {
                view: View::Input,
                submission: None,
                outcome: None,
            }),
        }
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        self.token_store.clone()
    }

    // ============================================================================
    // Access grant
    // ============================================================================

    pub fn is_access_granted(&self) -> bool {
        self.access_granted.load(Ordering::Acquire)
    }

    /// Sets the grant. It is never revoked within a session.
    pub(crate) fn grant_access(&self) {
        self.access_granted.store(true, Ordering::Release);
    }

    // ============================================================================
    // In-flight flag
    // ============================================================================

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claims the in-flight flag, or returns `None` if a request already holds it.
    pub(crate) fn try_begin_request(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                flag: &self.in_flight,
                released: false,
            })
    }

    // ============================================================================
    // Submission and outcome
    // ============================================================================

    pub async fn view(&self) -> View {
        self.state.read().await.view
    }

    pub async fn current_submission(&self) -> Option<StartupIdea> {
        self.state.read().await.submission.clone()
    }

    pub async fn outcome(&self) -> Option<AnalysisReport> {
        self.state.read().await.outcome.clone()
    }

    /// Records `idea` as the current submission and returns its generation.
    pub(crate) async fn begin_submission(&self, idea: StartupIdea) -> u64 {
        let mut state = self.state.write().await;
        state.submission = Some(idea);
        state.outcome = None;
        self.generation.load(Ordering::Acquire)
    }

    /// Commits `report` and navigates to the results view.
    ///
    /// Returns `false` without touching state if `generation` is stale.
    pub(crate) async fn commit_outcome(&self, generation: u64, report: AnalysisReport) -> bool {
        let mut state = self.state.write().await;
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        state.outcome = Some(report);
        state.view = View::Results;
        true
    }

    /// Drops the submission of a failed request.
    ///
    /// Returns `false` without touching state if `generation` is stale.
    pub(crate) async fn discard_submission(&self, generation: u64) -> bool {
        let mut state = self.state.write().await;
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        state.submission = None;
        state.outcome = None;
        true
    }

    /// Clears submission and outcome and shows the input view.
    pub(crate) async fn reset_to_input(&self) {
        let mut state = self.state.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        state.submission = None;
        state.outcome = None;
        state.view = View::Input;
    }

    /// Committed submission and report, if both are present.
    pub(crate) async fn committed(&self) -> Option<(StartupIdea, AnalysisReport)> {
        let state = self.state.read().await;
        match (&state.submission, &state.outcome) {
            (Some(idea), Some(report)) => Some((idea.clone(), report.clone())),
            _ => None,
        }
    }

    pub(crate) async fn set_view(&self, view: View) {
        self.state.write().await.view = view;
    }
}

/// Holds the in-flight flag for the lifetime of one accepted request.
///
/// The flag is cleared on `release` or on drop, whichever comes first, so
/// every exit path (including cancellation of the owning future) unblocks the
/// form.
pub(crate) struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    released: bool,
}

impl InFlightGuard<'_> {
    pub(crate) fn release(&mut self) {
        if !self.released {
            self.flag.store(false, Ordering::Release);
            self.released = true;
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_core::IdeaDraft;
    use lens_infrastructure::InMemoryTokenStore;
    use serde_json::json;

    fn context(access_required: bool) -> SessionContext {
        SessionContext::new(Arc::new(InMemoryTokenStore::new()), access_required)
    }

    fn idea() -> StartupIdea {
        StartupIdea::parse(&IdeaDraft::new("Idea", "Desc")).unwrap()
    }

    fn report() -> AnalysisReport {
        AnalysisReport::from_value(json!({"verdict": {}})).unwrap()
    }

    #[test]
    fn grant_starts_false_when_gate_enabled() {
        assert!(!context(true).is_access_granted());
        assert!(context(false).is_access_granted());
    }

    #[test]
    fn in_flight_flag_is_exclusive_and_released_on_drop() {
        let ctx = context(false);

        let guard = ctx.try_begin_request().expect("first claim succeeds");
        assert!(ctx.is_in_flight());
        assert!(ctx.try_begin_request().is_none());

        drop(guard);
        assert!(!ctx.is_in_flight());
        assert!(ctx.try_begin_request().is_some());
    }

    #[test]
    fn explicit_release_is_idempotent() {
        let ctx = context(false);
        let mut guard = ctx.try_begin_request().unwrap();
        guard.release();
        assert!(!ctx.is_in_flight());

        let _second = ctx.try_begin_request().unwrap();
        drop(guard);
        // Dropping the already-released guard must not clear the new claim.
        assert!(ctx.is_in_flight());
    }

    #[tokio::test]
    async fn commit_navigates_to_results() {
        let ctx = context(false);
        let generation = ctx.begin_submission(idea()).await;

        assert!(ctx.commit_outcome(generation, report()).await);
        assert_eq!(ctx.view().await, View::Results);
        assert!(ctx.committed().await.is_some());
    }

    #[tokio::test]
    async fn stale_generation_is_not_committed() {
        let ctx = context(false);
        let generation = ctx.begin_submission(idea()).await;
        ctx.reset_to_input().await;

        assert!(!ctx.commit_outcome(generation, report()).await);
        assert_eq!(ctx.view().await, View::Input);
        assert!(ctx.outcome().await.is_none());
    }

    #[tokio::test]
    async fn discard_only_affects_matching_generation() {
        let ctx = context(false);
        let stale = ctx.begin_submission(idea()).await;
        ctx.reset_to_input().await;
        let current = ctx.begin_submission(idea()).await;

        assert!(!ctx.discard_submission(stale).await);
        assert!(ctx.current_submission().await.is_some());

        assert!(ctx.discard_submission(current).await);
        assert!(ctx.current_submission().await.is_none());
    }
}
