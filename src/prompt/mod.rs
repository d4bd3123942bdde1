//! Prompt construction for video analysis.
//!
//! The reasoning-chain template is mandatory scaffolding for every analysis;
//! the few-shot assembler prepends retrieved human-verified examples to it.

pub mod fewshot;
pub mod reasoning;

pub use fewshot::build_prompt;
pub use reasoning::build_prompt_section;
