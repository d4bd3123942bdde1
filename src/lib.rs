//! Glimt - Few-Shot Learning Retrieval for Video Analysis
//!
//! Glimt collects human-corrected interpretations of short-form video content
//! and uses them to steer future LLM analyses: given a new video's text
//! signals, it retrieves semantically similar corrected examples from a vector
//! store and assembles them into a structured few-shot prompt injected ahead
//! of the analysis instructions.
//!
//! The name "Glimt" comes from the Norwegian/Scandinavian word for "glimpse."
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `embedding` - Embedding generation
//! - `store` - Example storage and vector similarity search
//! - `retrieval` - Query construction and example retrieval
//! - `prompt` - Reasoning-chain template and few-shot prompt assembly
//! - `repository` - Saving corrected examples
//! - `analysis` - Generation provider invocation and response parsing
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use glimt::embedding::OpenAIEmbedder;
//! use glimt::retrieval::{RetrievalEngine, RetrievalOptions, VideoSignals};
//! use glimt::store::MemoryExampleStore;
//! use glimt::prompt::fewshot::build_prompt;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(MemoryExampleStore::new());
//!     let embedder = Arc::new(OpenAIEmbedder::new());
//!     let engine = RetrievalEngine::new(store, embedder);
//!
//!     let signals = VideoSignals {
//!         title: Some("POV: your barista remembers your order".into()),
//!         ..Default::default()
//!     };
//!     let query = signals.build_query(&Default::default());
//!     let scored = engine
//!         .find_relevant_examples(&query, &RetrievalOptions::default())
//!         .await;
//!     let examples: Vec<_> = scored.into_iter().map(|s| s.example).collect();
//!     let prompt = build_prompt(&examples);
//!     println!("{prompt}");
//! }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod prompt;
pub mod repository;
pub mod retrieval;
pub mod store;

pub use error::{GlimtError, Result};
