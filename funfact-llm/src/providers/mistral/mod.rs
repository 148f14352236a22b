//! Mistral provider implementation

pub mod client;
pub mod config;
pub mod generator;
pub mod types;

pub use client::MistralClient;
pub use config::MistralConfig;
pub use generator::MistralGenerator;

pub(crate) const PROVIDER: &str = "mistral";
