//! Configuration module for Glimt.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    AnalysisSettings, EmbeddingSettings, GeneralSettings, RetrievalSettings, Settings,
    StoreSettings,
};
