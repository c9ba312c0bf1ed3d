//! Analysis session controller.
//!
//! Orchestrates one analysis request at a time:
//! validate → ensure token → analyze → commit or fail → navigate.
//!
//! ```text
//! Idle → Validating → AwaitingToken → Requesting → {Succeeded | Failed} → Idle
//! ```

use super::context::{InFlightGuard, SessionContext, View};
use crate::token_lifecycle::TokenLifecycleManager;
use lens_core::{
    AnalysisReport, AnalysisService, IdeaDraft, Result, StartupIdea, ValidationError,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

/// Where the controller currently is in the request state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerPhase {
    Idle,
    /// The draft passed validation and the request claimed the in-flight
    /// flag. Rejected drafts never leave `Idle`.
    Validating,
    AwaitingToken,
    Requesting,
    Succeeded,
    Failed,
}

/// A user-facing message (toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    /// The single message shown for every failure past validation.
    pub fn analysis_failed() -> Self {
        Self::new(
            "Analysis Failed",
            "Something went wrong during the analysis. Please try again.",
        )
    }
}

impl From<&ValidationError> for Notice {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::EmptyTitle | ValidationError::EmptyDescription => Self::new(
                "Missing Information",
                "Please fill in both the title and description fields.",
            ),
            ValidationError::AccessNotGranted => Self::new(
                "Access Required",
                "Enter the access password to continue.",
            ),
            ValidationError::RequestInFlight => Self::new(
                "Analysis In Progress",
                "Please wait for the current analysis to finish.",
            ),
        }
    }
}

/// What the UI should do after an accepted submission resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The report was committed; show the given view.
    Navigate(View),
    /// The request failed; stay on the input view and show the notice.
    Failed(Notice),
    /// The user left the flow before the response arrived; it was discarded.
    Abandoned,
}

/// The committed idea and report backing the results view.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub idea: StartupIdea,
    pub report: AnalysisReport,
}

impl ResultsView {
    /// Builds the downloadable JSON file for this report.
    pub fn export(&self) -> Result<ReportExport> {
        Ok(ReportExport {
            file_name: format!("{}_feasibility_analysis.json", file_stem(self.idea.title())),
            contents: self.report.to_pretty_json()?,
        })
    }
}

/// A report rendered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportExport {
    pub file_name: String,
    pub contents: String,
}

fn file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

pub struct AnalysisSessionController {
    context: Arc<SessionContext>,
    tokens: Arc<TokenLifecycleManager>,
    analysis: Arc<dyn AnalysisService>,
    phase: watch::Sender<ControllerPhase>,
}

impl AnalysisSessionController {
    pub fn new(
        context: Arc<SessionContext>,
        tokens: Arc<TokenLifecycleManager>,
        analysis: Arc<dyn AnalysisService>,
    ) -> Self {
        let (phase, _) = watch::channel(ControllerPhase::Idle);
        Self {
            context,
            tokens,
            analysis,
            phase,
        }
    }

    pub fn phase(&self) -> ControllerPhase {
        *self.phase.borrow()
    }

    /// Receives every phase transition, for driving the loading indicator.
    pub fn subscribe(&self) -> watch::Receiver<ControllerPhase> {
        self.phase.subscribe()
    }

    /// True while a request (including its token step) is outstanding.
    pub fn is_loading(&self) -> bool {
        self.context.is_in_flight()
    }

    /// Whether the submit button should be enabled for `draft`.
    pub fn can_submit(&self, draft: &IdeaDraft) -> bool {
        self.context.is_access_granted() && !self.context.is_in_flight() && draft.is_complete()
    }

    pub async fn view(&self) -> View {
        self.context.view().await
    }

    /// Page-load hook: pre-warms the bearer token.
    pub async fn on_view_load(&self) {
        self.tokens.prewarm().await;
    }

    /// Submits an idea for analysis.
    ///
    /// Returns `Err` without any side effect if the input is incomplete, the
    /// access gate has not been passed, or another request is in flight.
    /// Otherwise runs the request to completion and reports whether to
    /// navigate. The in-flight flag is cleared on every exit path.
    pub async fn submit(
        &self,
        draft: &IdeaDraft,
    ) -> std::result::Result<SubmitOutcome, ValidationError> {
        let idea = StartupIdea::parse(draft)?;
        if !self.context.is_access_granted() {
            return Err(ValidationError::AccessNotGranted);
        }
        let in_flight = self
            .context
            .try_begin_request()
            .ok_or(ValidationError::RequestInFlight)?;

        let mut request = ActiveRequest {
            in_flight,
            phase: &self.phase,
        };
        request.enter(ControllerPhase::Validating);

        let span = tracing::info_span!("analysis_request", request_id = %Uuid::new_v4());
        Ok(self.run(idea, &mut request).instrument(span).await)
    }

    async fn run(&self, idea: StartupIdea, request: &mut ActiveRequest<'_>) -> SubmitOutcome {
        let generation = self.context.begin_submission(idea.clone()).await;
        tracing::info!(title = idea.title(), "[Controller] Analysis request accepted");

        match self.fetch_report(&idea, request).await {
            Ok(report) => {
                if self.context.commit_outcome(generation, report).await {
                    request.enter(ControllerPhase::Succeeded);
                    tracing::info!("[Controller] Report committed, navigating to results");
                    SubmitOutcome::Navigate(View::Results)
                } else {
                    tracing::info!("[Controller] Discarding response for an abandoned submission");
                    SubmitOutcome::Abandoned
                }
            }
            Err(e) => {
                if !self.context.discard_submission(generation).await {
                    tracing::info!(
                        error.kind = e.kind(),
                        "[Controller] Ignoring failure of an abandoned submission: {}",
                        e
                    );
                    return SubmitOutcome::Abandoned;
                }
                request.enter(ControllerPhase::Failed);
                tracing::warn!(error.kind = e.kind(), "[Controller] Analysis failed: {}", e);
                SubmitOutcome::Failed(Notice::analysis_failed())
            }
        }
    }

    async fn fetch_report(
        &self,
        idea: &StartupIdea,
        request: &mut ActiveRequest<'_>,
    ) -> Result<AnalysisReport> {
        request.enter(ControllerPhase::AwaitingToken);
        let token = self.tokens.ensure_valid_token().await?;

        request.enter(ControllerPhase::Requesting);
        self.analysis.analyze(idea, &token).await
    }

    /// The committed results, or `None` after redirecting to the input view
    /// when nothing has been committed.
    pub async fn results(&self) -> Option<ResultsView> {
        match self.context.committed().await {
            Some((idea, report)) => Some(ResultsView { idea, report }),
            None => {
                self.context.set_view(View::Input).await;
                None
            }
        }
    }

    /// The download action for the committed report, if there is one.
    pub async fn export_report(&self) -> Result<Option<ReportExport>> {
        match self.context.committed().await {
            Some((idea, report)) => ResultsView { idea, report }.export().map(Some),
            None => Ok(None),
        }
    }

    /// The "back" action: clears the outcome and shows the input view.
    pub async fn return_to_input(&self) {
        self.context.reset_to_input().await;
        tracing::debug!("[Controller] Returned to input view");
    }
}

/// One accepted request. Dropping it clears the in-flight flag and returns
/// the phase to `Idle`.
struct ActiveRequest<'a> {
    in_flight: InFlightGuard<'a>,
    phase: &'a watch::Sender<ControllerPhase>,
}

impl ActiveRequest<'_> {
    fn enter(&mut self, phase: ControllerPhase) {
        self.phase.send_replace(phase);
    }
}

impl Drop for ActiveRequest<'_> {
    fn drop(&mut self) {
        self.in_flight.release();
        self.phase.send_replace(ControllerPhase::Idle);
    }
}
