#![allow(dead_code)]

use anyhow::bail;
use async_trait::async_trait;
use context_project::{EngineLauncher, ProjectContextConfig, ProjectContextEngine};
use context_protocol::{BuildScope, Chunk, InlineProjectContext, UpdateMode, WorkspaceFolder};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const LIBRARY_DIR: &str = "/opt/context/indexing";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn config() -> ProjectContextConfig {
    ProjectContextConfig {
        library_dir: PathBuf::from(LIBRARY_DIR),
        ..ProjectContextConfig::default()
    }
}

pub fn folder(path: &Path) -> WorkspaceFolder {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    WorkspaceFolder::new(format!("file://{}", path.display()), name)
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    BuildIndex {
        files: Vec<PathBuf>,
        root: PathBuf,
        scope: BuildScope,
    },
    UpdateIndex {
        files: Vec<PathBuf>,
        mode: UpdateMode,
    },
    QueryVectorIndex {
        query: String,
    },
    QueryInlineProjectContext {
        query: String,
        file_path: String,
        target: String,
    },
    Clear,
}

/// Engine double that records every call (updates are recorded when they complete).
#[derive(Default)]
pub struct FakeEngine {
    calls: Mutex<Vec<EngineCall>>,
    failing: Mutex<HashSet<&'static str>>,
    update_delays: Mutex<HashMap<UpdateMode, Duration>>,
    chunks: Mutex<Vec<Chunk>>,
    contexts: Mutex<Vec<InlineProjectContext>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(UpdateMode, Vec<PathBuf>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::UpdateIndex { files, mode } => Some((mode, files)),
                _ => None,
            })
            .collect()
    }

    pub fn builds(&self) -> Vec<(Vec<PathBuf>, PathBuf)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::BuildIndex { files, root, .. } => Some((files, root)),
                _ => None,
            })
            .collect()
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn delay_updates(&self, mode: UpdateMode, delay: Duration) {
        self.update_delays.lock().unwrap().insert(mode, delay);
    }

    pub fn answer_chunks(&self, chunks: Vec<Chunk>) {
        *self.chunks.lock().unwrap() = chunks;
    }

    pub fn answer_contexts(&self, contexts: Vec<InlineProjectContext>) {
        *self.contexts.lock().unwrap() = contexts;
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, operation: &'static str) -> anyhow::Result<()> {
        if self.failing.lock().unwrap().contains(operation) {
            bail!("{operation} exploded");
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectContextEngine for FakeEngine {
    async fn build_index(
        &self,
        files: &[PathBuf],
        root: &Path,
        scope: BuildScope,
    ) -> anyhow::Result<()> {
        self.record(EngineCall::BuildIndex {
            files: files.to_vec(),
            root: root.to_path_buf(),
            scope,
        });
        self.check("build_index")
    }

    async fn update_index(&self, files: &[PathBuf], mode: UpdateMode) -> anyhow::Result<()> {
        let delay = self.update_delays.lock().unwrap().get(&mode).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(EngineCall::UpdateIndex {
            files: files.to_vec(),
            mode,
        });
        self.check("update_index")
    }

    async fn query_vector_index(&self, query: &str) -> anyhow::Result<Vec<Chunk>> {
        self.record(EngineCall::QueryVectorIndex {
            query: query.to_string(),
        });
        self.check("query_vector_index")?;
        Ok(self.chunks.lock().unwrap().clone())
    }

    async fn query_inline_project_context(
        &self,
        query: &str,
        file_path: &str,
        target: &str,
    ) -> anyhow::Result<Vec<InlineProjectContext>> {
        self.record(EngineCall::QueryInlineProjectContext {
            query: query.to_string(),
            file_path: file_path.to_string(),
            target: target.to_string(),
        });
        self.check("query_inline_project_context")?;
        Ok(self.contexts.lock().unwrap().clone())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.record(EngineCall::Clear);
        self.check("clear")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub library_dir: PathBuf,
    pub client_name: String,
    pub root: PathBuf,
}

/// Launcher double handing out one shared [`FakeEngine`].
pub struct FakeLauncher {
    engine: Arc<FakeEngine>,
    fail_start: bool,
    starts: AtomicUsize,
    requests: Mutex<Vec<StartRequest>>,
    hold: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl FakeLauncher {
    pub fn new(engine: Arc<FakeEngine>) -> Arc<Self> {
        Arc::new(Self::build(engine, false, None))
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::build(FakeEngine::new(), true, None))
    }

    /// Launcher that signals `entered` once `start` begins and waits for `release` to finish.
    pub fn held(engine: Arc<FakeEngine>, entered: Arc<Notify>, release: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self::build(engine, false, Some((entered, release))))
    }

    fn build(
        engine: Arc<FakeEngine>,
        fail_start: bool,
        hold: Option<(Arc<Notify>, Arc<Notify>)>,
    ) -> Self {
        Self {
            engine,
            fail_start,
            starts: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            hold,
        }
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<StartRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl EngineLauncher for FakeLauncher {
    async fn start(
        &self,
        library_dir: &Path,
        client_name: &str,
        root: &Path,
    ) -> anyhow::Result<Arc<dyn ProjectContextEngine>> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(StartRequest {
            library_dir: library_dir.to_path_buf(),
            client_name: client_name.to_string(),
            root: root.to_path_buf(),
        });

        if let Some((entered, release)) = &self.hold {
            entered.notify_one();
            release.notified().await;
        }

        if self.fail_start {
            bail!("extension.js not found in {}", library_dir.display());
        }
        let engine: Arc<dyn ProjectContextEngine> = self.engine.clone();
        Ok(engine)
    }
}
