//! Application layer for the VentureLens client.
//!
//! Coordinates the access gate, the bearer token lifecycle and the analysis
//! request on top of the ports defined in `lens-core`.

pub mod access_gate;
pub mod bootstrap;
pub mod session;
pub mod token_lifecycle;

#[cfg(test)]
mod test_support;

pub use access_gate::AccessGate;
pub use bootstrap::{LensApp, Services};
pub use session::{
    AnalysisSessionController, ControllerPhase, Notice, ReportExport, ResultsView,
    SessionContext, SubmitOutcome, View,
};
pub use token_lifecycle::TokenLifecycleManager;
