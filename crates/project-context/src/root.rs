use crate::error::{ProjectContextError, Result};
use crate::uri::path_from_file_uri;
use context_protocol::WorkspaceFolder;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Local path of a workspace folder, if its URI names one.
pub fn workspace_folder_path(folder: &WorkspaceFolder) -> Option<PathBuf> {
    path_from_file_uri(&folder.uri)
}

/// Resolve the single directory that scopes indexing for a set of workspace folders.
///
/// One folder is its own root. Several folders resolve to their deepest shared ancestor; when
/// they share nothing below the filesystem root the first folder wins.
pub fn resolve_workspace_root(folders: &[WorkspaceFolder]) -> Result<PathBuf> {
    if folders.is_empty() {
        return Err(ProjectContextError::Configuration(
            "no workspace folders provided".to_string(),
        ));
    }

    let paths: Vec<PathBuf> = folders
        .iter()
        .filter_map(|folder| {
            let path = workspace_folder_path(folder);
            if path.is_none() {
                log::warn!(
                    "Workspace folder {} is not a local file URI: {}",
                    folder.name,
                    folder.uri
                );
            }
            path
        })
        .collect();

    match paths.as_slice() {
        [] => Err(ProjectContextError::Configuration(
            "no workspace folder has a local file URI".to_string(),
        )),
        [only] => Ok(only.clone()),
        [first, rest @ ..] => Ok(common_ancestor(first, rest)),
    }
}

fn common_ancestor(first: &Path, rest: &[PathBuf]) -> PathBuf {
    let first_segments = segments(first);
    let rest_segments: Vec<Vec<&OsStr>> = rest.iter().map(|p| segments(p)).collect();

    let shared = first_segments
        .iter()
        .enumerate()
        .take_while(|(i, segment)| {
            rest_segments
                .iter()
                .all(|other| other.get(*i) == Some(*segment))
        })
        .count();

    if shared == 0 {
        return first.to_path_buf();
    }

    let mut root: PathBuf = first
        .components()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect();
    root.extend(&first_segments[..shared]);
    root
}

fn segments(path: &Path) -> Vec<&OsStr> {
    path.components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
        .map(|c| c.as_os_str())
        .collect()
}
