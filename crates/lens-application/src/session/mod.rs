//! Session state and the analysis request controller.

mod context;
mod controller;

pub use context::{SessionContext, View};
pub use controller::{
    AnalysisSessionController, ControllerPhase, Notice, ReportExport, ResultsView, SubmitOutcome,
};
