//! Generative AI client for the try-on workflow.
//!
//! This crate provides:
//! - Clothing item analysis (image → list of item labels)
//! - Try-on synthesis (person + clothing + labels → image)
//! - The `GenerativeService` seam the workflow depends on
//! - A Gemini REST implementation

pub mod client;
pub mod config;
pub mod error;
pub mod prompts;
pub mod service;
mod wire;


pub use client::GeminiClient;
pub use config::GenAiConfig;
pub use error::{GenAiError, GenAiResult};
pub use service::GenerativeService;
