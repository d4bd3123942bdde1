//! Command implementations for the Glimt CLI.

mod analyze;
mod config;
mod correct;
mod init;
mod list;
mod search;

pub use analyze::{run_analyze, AnalyzeArgs};
pub use config::{run_config, ConfigAction};
pub use correct::run_correct;
pub use init::run_init;
pub use list::run_list;
pub use search::run_search;

use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::store::SqliteExampleStore;
use std::sync::Arc;

/// Open the configured example store.
pub(crate) fn open_store(settings: &Settings) -> crate::error::Result<Arc<SqliteExampleStore>> {
    Ok(Arc::new(SqliteExampleStore::new(&settings.sqlite_path())?))
}

/// Build the configured embedder.
pub(crate) fn build_embedder(settings: &Settings) -> Arc<OpenAIEmbedder> {
    Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ))
}
