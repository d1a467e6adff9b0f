use clap::ValueEnum;

use crate::pipeline::{LlmBackend, LmStudioBackend, OllamaBackend};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_LMSTUDIO_URL: &str = "http://localhost:1234";
pub const DEFAULT_OLLAMA_MODEL: &str = "gemma3";
pub const DEFAULT_LMSTUDIO_MODEL: &str = "local-model";

/// Supported generation backends. Selection outside this set is rejected at
/// the CLI boundary before any pipeline work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// Ollama generate-style endpoint.
    Ollama,
    /// LM Studio OpenAI-compatible chat endpoint.
    #[value(name = "lmstudio")]
    LmStudio,
}

/// Resolved backend configuration: which server to call, with which model.
/// The generation pipeline treats this as read-only.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub base_url: String,
    pub model: String,
    pub verbose: bool,
}

impl Config {
    /// Resolve a config from CLI arguments, filling in per-provider
    /// defaults for anything not given.
    pub fn new(
        provider: Provider,
        base_url: Option<String>,
        model: Option<String>,
        verbose: bool,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| {
            match provider {
                Provider::Ollama => DEFAULT_OLLAMA_URL,
                Provider::LmStudio => DEFAULT_LMSTUDIO_URL,
            }
            .to_string()
        });
        let model = model.unwrap_or_else(|| {
            match provider {
                Provider::Ollama => DEFAULT_OLLAMA_MODEL,
                Provider::LmStudio => DEFAULT_LMSTUDIO_MODEL,
            }
            .to_string()
        });

        Self {
            provider,
            base_url,
            model,
            verbose,
        }
    }

    /// Full endpoint URL the selected backend will be called on.
    pub fn endpoint(&self) -> String {
        match self.provider {
            Provider::Ollama => format!("{}/api/generate", self.base_url),
            Provider::LmStudio => format!("{}/v1/chat/completions", self.base_url),
        }
    }

    /// Construct the HTTP backend for the selected provider.
    pub fn backend(&self) -> Box<dyn LlmBackend> {
        match self.provider {
            Provider::Ollama => Box::new(OllamaBackend::new(&self.base_url)),
            Provider::LmStudio => Box::new(LmStudioBackend::new(&self.base_url)),
        }
    }
}
