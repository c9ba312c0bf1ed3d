pub mod config_service;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::LensPaths;
pub use crate::storage::{FileTokenStore, InMemoryTokenStore};
