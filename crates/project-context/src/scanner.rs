use crate::error::ProjectContextError;
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Lowercase extensions (without the leading dot) that qualify a file as source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceExtensions {
    extensions: HashSet<String>,
}

impl SourceExtensions {
    /// Accepts `.java`, `java` or `JAVA` alike.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// Scanner for finding source files under a directory
#[derive(Debug, Clone)]
pub struct FileScanner {
    extensions: SourceExtensions,
    respect_gitignore: bool,
}

impl FileScanner {
    pub fn new(extensions: SourceExtensions) -> Self {
        Self {
            extensions,
            respect_gitignore: false,
        }
    }

    #[must_use]
    pub fn respect_gitignore(mut self, enabled: bool) -> Self {
        self.respect_gitignore = enabled;
        self
    }

    /// Walk `dir` recursively and collect files with an accepted extension, in traversal order.
    ///
    /// Directories that cannot be read are logged and skipped; the rest of the walk continues.
    pub fn scan(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let mut builder = WalkBuilder::new(dir);
        builder
            .standard_filters(self.respect_gitignore)
            .require_git(false)
            .follow_links(false);

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if file_type.is_dir() {
                        continue;
                    }

                    let path = entry.path();
                    if self.extensions.matches(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(err) => {
                    let path = err_path(&err).unwrap_or(dir).to_path_buf();
                    let err = ProjectContextError::FilesystemRead {
                        path,
                        message: err.to_string(),
                    };
                    log::error!("{err}");
                }
            }
        }

        log::debug!("Found {} source files under {}", files.len(), dir.display());
        files
    }

    /// [`FileScanner::scan`] on the blocking pool.
    pub async fn scan_async(&self, dir: &Path) -> Vec<PathBuf> {
        let scanner = self.clone();
        let owned = dir.to_path_buf();
        match tokio::task::spawn_blocking(move || scanner.scan(&owned)).await {
            Ok(files) => files,
            Err(err) => {
                log::error!("Source scan of {} aborted: {err}", dir.display());
                Vec::new()
            }
        }
    }
}

fn err_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            err_path(err)
        }
        ignore::Error::Partial(errs) => errs.iter().find_map(err_path),
        _ => None,
    }
}
