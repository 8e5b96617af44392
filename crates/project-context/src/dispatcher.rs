use crate::error::ProjectContextError;
use crate::lifecycle::EngineLifecycle;
use context_protocol::UpdateMode;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex as TokioMutex;

/// Forwards filesystem change batches to the engine's incremental update.
pub struct IndexUpdateDispatcher {
    lifecycle: Arc<EngineLifecycle>,
    // FIFO gate: tokio's mutex hands out the lock in request order.
    sequential: Option<TokioMutex<()>>,
}

impl IndexUpdateDispatcher {
    pub fn new(lifecycle: Arc<EngineLifecycle>, sequential: bool) -> Self {
        Self {
            lifecycle,
            sequential: sequential.then(|| TokioMutex::new(())),
        }
    }

    /// Apply one change batch. No-op without a ready engine; engine failures are logged.
    ///
    /// Empty batches never reach the engine, even though it would accept them.
    pub async fn update_index(&self, files: &[PathBuf], mode: UpdateMode) {
        let _turn = match &self.sequential {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        let Some(ready) = self.lifecycle.ready_engine() else {
            log::debug!(
                "Skipping {mode} of {} files: engine {}",
                files.len(),
                self.lifecycle.status()
            );
            return;
        };
        if files.is_empty() {
            return;
        }

        if let Err(err) = ready.engine.update_index(files, mode).await {
            log::error!(
                "Error updating index: {}",
                ProjectContextError::engine_call("update_index", err)
            );
        }
    }

    /// A rename is a removal of the old paths followed by an addition of the new ones.
    pub async fn rename(&self, old_paths: &[PathBuf], new_paths: &[PathBuf]) {
        self.update_index(old_paths, UpdateMode::Remove).await;
        self.update_index(new_paths, UpdateMode::Add).await;
    }
}
