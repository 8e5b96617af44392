use crate::config::ProjectContextConfig;
use crate::dispatcher::IndexUpdateDispatcher;
use crate::engine::EngineLauncher;
use crate::lifecycle::{EngineLifecycle, EngineStatus};
use crate::query::ContextQueryFacade;
use crate::scanner::{FileScanner, SourceExtensions};
use context_protocol::{
    QueryInlineProjectContextParams, QueryInlineProjectContextResult, QueryVectorIndexParams,
    QueryVectorIndexResult, UpdateMode, WorkspaceFolder,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Project context for one client workspace: engine lifecycle, index updates and queries.
pub struct ProjectContextController {
    lifecycle: Arc<EngineLifecycle>,
    updates: IndexUpdateDispatcher,
    queries: ContextQueryFacade,
}

impl ProjectContextController {
    /// Build the controller. The engine is not started until [`Self::init`].
    pub fn new(
        client_name: impl Into<String>,
        workspace_folders: Vec<WorkspaceFolder>,
        config: &ProjectContextConfig,
        launcher: Arc<dyn EngineLauncher>,
    ) -> Self {
        let extensions = SourceExtensions::new(&config.source_extensions);
        if extensions.is_empty() {
            log::warn!("No source extensions configured; nothing will be indexed");
        }
        let scanner = FileScanner::new(extensions).respect_gitignore(config.respect_gitignore);

        let lifecycle = Arc::new(EngineLifecycle::new(
            launcher,
            config.library_dir.clone(),
            client_name.into(),
            workspace_folders,
            scanner,
        ));

        Self {
            updates: IndexUpdateDispatcher::new(lifecycle.clone(), config.sequential_updates),
            queries: ContextQueryFacade::new(lifecycle.clone()),
            lifecycle,
        }
    }

    pub fn status(&self) -> EngineStatus {
        self.lifecycle.status()
    }

    pub fn workspace_folders(&self) -> &[WorkspaceFolder] {
        self.lifecycle.workspace_folders()
    }

    pub async fn init(&self) {
        self.lifecycle.init().await;
    }

    pub async fn update_configuration(&self) {
        self.lifecycle.update_configuration().await;
    }

    pub async fn dispose(&self) {
        self.lifecycle.dispose().await;
    }

    pub async fn update_index(&self, files: &[PathBuf], mode: UpdateMode) {
        self.updates.update_index(files, mode).await;
    }

    pub async fn rename(&self, old_paths: &[PathBuf], new_paths: &[PathBuf]) {
        self.updates.rename(old_paths, new_paths).await;
    }

    pub async fn query_vector_index(
        &self,
        params: &QueryVectorIndexParams,
    ) -> QueryVectorIndexResult {
        self.queries.query_vector_index(params).await
    }

    pub async fn query_inline_project_context(
        &self,
        params: &QueryInlineProjectContextParams,
    ) -> QueryInlineProjectContextResult {
        self.queries.query_inline_project_context(params).await
    }
}
