//! Remote collaborators of the VentureLens session core.

pub mod backend_client;

pub use backend_client::BackendClient;
