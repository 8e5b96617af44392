use crate::engine::{EngineLauncher, ProjectContextEngine};
use crate::error::{ProjectContextError, Result};
use crate::root::{resolve_workspace_root, workspace_folder_path};
use crate::scanner::FileScanner;
use context_protocol::{BuildScope, WorkspaceFolder};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Observable phase of the engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    NotStarted,
    Starting,
    Ready,
    Unavailable,
    Disposed,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "not started",
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Unavailable => "unavailable",
            Self::Disposed => "disposed",
        };
        f.write_str(label)
    }
}

/// A started engine together with the root it was started for.
#[derive(Clone)]
pub(crate) struct ReadyEngine {
    pub(crate) engine: Arc<dyn ProjectContextEngine>,
    pub(crate) root: PathBuf,
}

enum EngineState {
    NotStarted,
    Starting,
    Ready(ReadyEngine),
    Unavailable,
    Disposed,
}

impl EngineState {
    fn status(&self) -> EngineStatus {
        match self {
            Self::NotStarted => EngineStatus::NotStarted,
            Self::Starting => EngineStatus::Starting,
            Self::Ready(_) => EngineStatus::Ready,
            Self::Unavailable => EngineStatus::Unavailable,
            Self::Disposed => EngineStatus::Disposed,
        }
    }
}

/// Owns the engine handle for one workspace session.
///
/// The handle exists only in the `Ready` state. Every engine call goes through
/// [`EngineLifecycle::ready_engine`] immediately before it is made, so a dispose that lands
/// between two awaits is observed by the next call.
pub struct EngineLifecycle {
    state: RwLock<EngineState>,
    launcher: Arc<dyn EngineLauncher>,
    library_dir: PathBuf,
    client_name: String,
    workspace_folders: Vec<WorkspaceFolder>,
    scanner: FileScanner,
}

impl EngineLifecycle {
    pub fn new(
        launcher: Arc<dyn EngineLauncher>,
        library_dir: PathBuf,
        client_name: String,
        workspace_folders: Vec<WorkspaceFolder>,
        scanner: FileScanner,
    ) -> Self {
        Self {
            state: RwLock::new(EngineState::NotStarted),
            launcher,
            library_dir,
            client_name,
            workspace_folders,
            scanner,
        }
    }

    pub fn status(&self) -> EngineStatus {
        self.read_state().status()
    }

    pub fn workspace_folders(&self) -> &[WorkspaceFolder] {
        &self.workspace_folders
    }

    pub(crate) fn ready_engine(&self) -> Option<ReadyEngine> {
        match &*self.read_state() {
            EngineState::Ready(ready) => Some(ready.clone()),
            _ => None,
        }
    }

    /// Start the engine (first call only), then attempt the initial full build.
    ///
    /// A start failure leaves the lifecycle `Unavailable`; it is logged, never returned.
    pub async fn init(&self) {
        {
            let mut state = self.write_state();
            if !matches!(*state, EngineState::NotStarted) {
                warn!("Ignoring engine init while {}", state.status());
                return;
            }
            *state = EngineState::Starting;
        }

        match self.try_start().await {
            Ok(ready) => self.finish_start(ready).await,
            Err(err) => {
                error!("Vector library failed to initialize: {err}");
                let mut state = self.write_state();
                if matches!(*state, EngineState::Starting) {
                    *state = EngineState::Unavailable;
                }
            }
        }

        self.update_configuration().await;
    }

    async fn try_start(&self) -> Result<ReadyEngine> {
        let root = resolve_workspace_root(&self.workspace_folders)?;
        info!(
            "Starting vector library for {} at {}",
            self.client_name,
            root.display()
        );
        let engine = self
            .launcher
            .start(&self.library_dir, &self.client_name, &root)
            .await
            .map_err(|e| ProjectContextError::EngineStart(format!("{e:#}")))?;
        Ok(ReadyEngine { engine, root })
    }

    async fn finish_start(&self, ready: ReadyEngine) {
        let orphan = {
            let mut state = self.write_state();
            if matches!(*state, EngineState::Starting) {
                info!("Vector library ready (root {})", ready.root.display());
                *state = EngineState::Ready(ready);
                None
            } else {
                Some(ready.engine)
            }
        };

        // Disposed while starting: the new handle must not outlive the session.
        if let Some(engine) = orphan {
            warn!("Engine finished starting after dispose; clearing it");
            if let Err(err) = engine.clear().await {
                error!("{}", ProjectContextError::engine_call("clear", err));
            }
        }
    }

    /// Re-discover every source file in the workspace and request a full rebuild.
    ///
    /// No-op unless the engine is ready; failures are logged.
    pub async fn update_configuration(&self) {
        if self.ready_engine().is_none() {
            debug!("Skipping index rebuild: engine {}", self.status());
            return;
        }
        if let Err(err) = self.try_rebuild().await {
            error!("Error in update configuration: {err}");
        }
    }

    async fn try_rebuild(&self) -> Result<()> {
        let files = self.discover_sources().await;

        let Some(ready) = self.ready_engine() else {
            debug!("Engine went away during discovery; dropping rebuild");
            return Ok(());
        };
        ready
            .engine
            .build_index(&files, &ready.root, BuildScope::All)
            .await
            .map_err(|e| ProjectContextError::engine_call("build_index", e))?;
        info!("Requested full index build of {} files", files.len());
        Ok(())
    }

    async fn discover_sources(&self) -> Vec<PathBuf> {
        let mut sources = Vec::new();
        for folder in &self.workspace_folders {
            let Some(path) = workspace_folder_path(folder) else {
                warn!("Skipping workspace {}: not a local folder", folder.name);
                continue;
            };
            info!("Processing workspace: {}", folder.name);
            sources.extend(self.scanner.scan_async(&path).await);
        }
        info!("Found {} source files", sources.len());
        sources
    }

    /// Clear and release the engine. Safe to call any number of times.
    ///
    /// Without a handle (`NotStarted`, `Unavailable`) this is a no-op and a later `init` still
    /// starts the engine. A dispose while `Starting` marks the lifecycle `Disposed`, and the
    /// engine is cleared as soon as its start completes.
    pub async fn dispose(&self) {
        let previous = {
            let mut state = self.write_state();
            match *state {
                EngineState::Ready(_) | EngineState::Starting => {
                    std::mem::replace(&mut *state, EngineState::Disposed)
                }
                EngineState::Disposed => {
                    debug!("Vector library already disposed");
                    return;
                }
                EngineState::NotStarted | EngineState::Unavailable => {
                    debug!("No vector library to dispose ({})", state.status());
                    return;
                }
            }
        };
        match previous {
            EngineState::Ready(ready) => {
                if let Err(err) = ready.engine.clear().await {
                    error!("{}", ProjectContextError::engine_call("clear", err));
                }
                info!("Vector library disposed");
            }
            _ => info!("Vector library disposed while starting"),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
