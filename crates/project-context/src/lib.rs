//! # Context Project
//!
//! Keeps a project context index in sync with a client workspace and answers context queries
//! against it.
//!
//! ## Flow
//!
//! ```text
//! initialize ──> ProjectContextController (engine not started)
//!     │
//! initialized ──> EngineLifecycle::init
//!     │             ├─> workspace root (common ancestor of folders)
//!     │             ├─> EngineLauncher::start
//!     │             └─> full build (FileScanner over every folder)
//!     │
//! save/create/delete/rename ──> IndexUpdateDispatcher ──> engine.update_index
//!     │
//! queries ──> ContextQueryFacade ──> engine.query_* (empty when unavailable)
//! ```
//!
//! Nothing here fails the caller: engine start errors, engine call errors and unreadable
//! directories are logged and degrade to no-ops or empty results.
//!
//! ## Example
//!
//! ```no_run
//! use context_project::{EngineLauncher, ProjectContextConfig, ProjectContextSession};
//! use context_protocol::{InitializeParams, QueryVectorIndexParams};
//! use std::sync::Arc;
//!
//! async fn serve(launcher: Arc<dyn EngineLauncher>, params: InitializeParams) {
//!     let session = ProjectContextSession::new(ProjectContextConfig::from_env(), launcher);
//!     session.on_initialize(params);
//!     session.on_initialized().await;
//!
//!     let result = session
//!         .query_vector_index(&QueryVectorIndexParams { query: "retry policy".into() })
//!         .await;
//!     println!("{} chunks", result.chunks.len());
//!
//!     session.shutdown().await;
//! }
//! ```

mod config;
mod controller;
mod dispatcher;
mod engine;
mod error;
mod lifecycle;
mod query;
mod root;
mod scanner;
mod session;
mod uri;

pub use config::ProjectContextConfig;
pub use controller::ProjectContextController;
pub use dispatcher::IndexUpdateDispatcher;
pub use engine::{EngineLauncher, ProjectContextEngine};
pub use error::{ProjectContextError, Result};
pub use lifecycle::{EngineLifecycle, EngineStatus};
pub use query::ContextQueryFacade;
pub use root::{resolve_workspace_root, workspace_folder_path};
pub use scanner::{FileScanner, SourceExtensions};
pub use session::ProjectContextSession;
pub use uri::path_from_file_uri;
