//! Seam to the external indexing engine.
//!
//! The engine stores and searches project embeddings; this crate only decides when to call it
//! and with which arguments. Hosts plug in a real engine through [`EngineLauncher`]; tests plug
//! in a fake.

use async_trait::async_trait;
use context_protocol::{BuildScope, Chunk, InlineProjectContext, UpdateMode};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A started engine. Calls may arrive concurrently; the engine is responsible for its own
/// internal consistency.
#[async_trait]
pub trait ProjectContextEngine: Send + Sync {
    /// Rebuild the index from scratch for `files` under `root`.
    async fn build_index(&self, files: &[PathBuf], root: &Path, scope: BuildScope)
        -> anyhow::Result<()>;

    /// Apply an incremental change batch.
    async fn update_index(&self, files: &[PathBuf], mode: UpdateMode) -> anyhow::Result<()>;

    async fn query_vector_index(&self, query: &str) -> anyhow::Result<Vec<Chunk>>;

    async fn query_inline_project_context(
        &self,
        query: &str,
        file_path: &str,
        target: &str,
    ) -> anyhow::Result<Vec<InlineProjectContext>>;

    /// Drop all indexed state. Engines without persistent state can keep the default.
    async fn clear(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Loads and starts an engine for one workspace.
#[async_trait]
pub trait EngineLauncher: Send + Sync {
    async fn start(
        &self,
        library_dir: &Path,
        client_name: &str,
        root: &Path,
    ) -> anyhow::Result<Arc<dyn ProjectContextEngine>>;
}
