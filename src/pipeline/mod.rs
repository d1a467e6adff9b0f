pub mod types;
pub mod chunker;
pub mod prompt;
pub mod parser;
pub mod ollama;
pub mod lmstudio;
pub mod orchestrator;

pub use types::*;
pub use chunker::*;
pub use prompt::*;
pub use parser::*;
pub use ollama::*;
pub use lmstudio::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Backend is not running at {0}")]
    Connection(String),

    #[error("Backend returned error (status {status}): {body}")]
    BackendStatus { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response envelope parsing error: {0}")]
    ResponseEnvelope(String),
}
