pub mod cli;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod vault;
