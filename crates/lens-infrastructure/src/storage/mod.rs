//! Token slot implementations.

mod memory;
mod token_file;

pub use memory::InMemoryTokenStore;
pub use token_file::{FileTokenStore, TokenFileError};
