pub mod client;
pub mod generator;

// Public API exports
pub use client::{ModelConfig, OpenRouterClient, DEFAULT_MODEL};
pub use generator::{build_prompt, generate_question, DOCUMENT_EXCERPT_LIMIT};
