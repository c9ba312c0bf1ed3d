//! Process-level bootstrap for the VentureLens client: tracing setup and
//! session launch.

pub mod launch;
pub mod tracing_layer;

pub use launch::{init_tracing, launch};
pub use tracing_layer::{DiagnosticEvent, DiagnosticsLayer};
