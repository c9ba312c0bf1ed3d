//! Domain model and ports for the VentureLens client.
//!
//! This crate has no I/O of its own. Storage lives in `lens-infrastructure`,
//! the HTTP backend in `lens-interaction`, and the orchestration in
//! `lens-application`.

pub mod access;
pub mod analysis;
pub mod clock;
pub mod config;
pub mod error;
pub mod idea;
pub mod token;

pub use access::PasswordVerifier;
pub use analysis::{AnalysisReport, AnalysisService, FeasibilityReport};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::LensConfig;
pub use error::{LensError, Result, ValidationError};
pub use idea::{IdeaDraft, StartupIdea};
pub use token::{SessionToken, TokenProvider, TokenStore, decode_expiry};
