pub mod clean;
pub mod scan;

pub use clean::*;
pub use scan::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Vault path not found: {0}")]
    NotFound(String),

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
