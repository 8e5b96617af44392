use crate::config::ProjectContextConfig;
use crate::controller::ProjectContextController;
use crate::engine::EngineLauncher;
use crate::lifecycle::EngineStatus;
use crate::uri::{path_from_file_uri, paths_from_uris};
use context_protocol::{
    CreateFilesParams, DeleteFilesParams, DidSaveTextDocumentParams, InitializeParams,
    InitializeResult, QueryInlineProjectContextParams, QueryInlineProjectContextResult,
    QueryVectorIndexParams, QueryVectorIndexResult, RenameFilesParams, UpdateMode,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::{Arc, OnceLock};

const UNKNOWN_CLIENT: &str = "unknown";

/// Handlers the transport layer calls for lifecycle events, file events and queries.
///
/// The controller is created by `initialize`; anything that arrives earlier is ignored (events)
/// or answered with an empty result (queries).
pub struct ProjectContextSession {
    config: ProjectContextConfig,
    launcher: Arc<dyn EngineLauncher>,
    controller: OnceLock<Arc<ProjectContextController>>,
}

impl ProjectContextSession {
    pub fn new(config: ProjectContextConfig, launcher: Arc<dyn EngineLauncher>) -> Self {
        Self {
            config,
            launcher,
            controller: OnceLock::new(),
        }
    }

    pub fn controller(&self) -> Option<&Arc<ProjectContextController>> {
        self.controller.get()
    }

    pub fn status(&self) -> EngineStatus {
        self.controller
            .get()
            .map_or(EngineStatus::NotStarted, |controller| controller.status())
    }

    pub fn on_initialize(&self, params: InitializeParams) -> InitializeResult {
        let client_name = params
            .client_info
            .map(|info| info.name)
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());
        let folders = params.workspace_folders.unwrap_or_default();

        if self.controller.get().is_some() {
            warn!("Ignoring repeated initialize from {client_name}");
            return InitializeResult::default();
        }

        info!(
            "Initializing project context for {client_name} with {} workspace folders",
            folders.len()
        );
        let controller = ProjectContextController::new(
            client_name,
            folders,
            &self.config,
            self.launcher.clone(),
        );
        if self.controller.set(Arc::new(controller)).is_err() {
            warn!("Project context was initialized concurrently; keeping the first controller");
        }
        InitializeResult::default()
    }

    pub async fn on_initialized(&self) {
        let Some(controller) = self.initialized_controller("initialized") else {
            return;
        };
        controller.init().await;
        info!("Local context service has been initialized");
    }

    pub async fn on_configuration_changed(&self) {
        let Some(controller) = self.initialized_controller("configuration change") else {
            return;
        };
        controller.update_configuration().await;
    }

    pub async fn on_did_save_text_document(&self, params: &DidSaveTextDocumentParams) {
        let Some(controller) = self.initialized_controller("save") else {
            return;
        };
        let Some(path) = path_from_file_uri(&params.text_document.uri) else {
            warn!("Ignoring save of non-file URI {}", params.text_document.uri);
            return;
        };
        controller
            .update_index(std::slice::from_ref(&path), UpdateMode::Update)
            .await;
        debug!("Files saved: {}", payload(params));
    }

    pub async fn on_did_create_files(&self, params: &CreateFilesParams) {
        let Some(controller) = self.initialized_controller("create") else {
            return;
        };
        let paths = paths_from_uris(params.files.iter().map(|file| file.uri.as_str()));
        controller.update_index(&paths, UpdateMode::Add).await;
        debug!("Files added: {}", payload(params));
    }

    pub async fn on_did_delete_files(&self, params: &DeleteFilesParams) {
        let Some(controller) = self.initialized_controller("delete") else {
            return;
        };
        let paths = paths_from_uris(params.files.iter().map(|file| file.uri.as_str()));
        controller.update_index(&paths, UpdateMode::Remove).await;
        debug!("Files deleted: {}", payload(params));
    }

    pub async fn on_did_rename_files(&self, params: &RenameFilesParams) {
        let Some(controller) = self.initialized_controller("rename") else {
            return;
        };
        let old_paths = paths_from_uris(params.files.iter().map(|file| file.old_uri.as_str()));
        let new_paths = paths_from_uris(params.files.iter().map(|file| file.new_uri.as_str()));
        controller.rename(&old_paths, &new_paths).await;
        debug!("Files renamed: {}", payload(params));
    }

    pub async fn query_vector_index(
        &self,
        params: &QueryVectorIndexParams,
    ) -> QueryVectorIndexResult {
        match self.controller.get() {
            Some(controller) => controller.query_vector_index(params).await,
            None => QueryVectorIndexResult::default(),
        }
    }

    pub async fn query_inline_project_context(
        &self,
        params: &QueryInlineProjectContextParams,
    ) -> QueryInlineProjectContextResult {
        match self.controller.get() {
            Some(controller) => controller.query_inline_project_context(params).await,
            None => QueryInlineProjectContextResult::default(),
        }
    }

    /// Release the engine, if one was started.
    pub async fn shutdown(&self) {
        if let Some(controller) = self.controller.get() {
            controller.dispose().await;
        }
    }

    fn initialized_controller(&self, event: &str) -> Option<&Arc<ProjectContextController>> {
        let controller = self.controller.get();
        if controller.is_none() {
            warn!("Ignoring {event} event received before initialize");
        }
        controller
    }
}

fn payload<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}
