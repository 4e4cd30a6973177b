#![allow(missing_docs)]

//! Discovering the list files of a route package and loading them together.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    header::ListKind,
    parser::RouteLoader,
    route::RouteData,
    source::read_lines,
};

/// A list file found inside a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListFile {
    pub kind: ListKind,
    pub path: PathBuf,
}

/// The list files found below a package directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutePackage {
    pub root: PathBuf,
    pub lists: Vec<ListFile>,
}

impl RoutePackage {
    /// Walk `root` and classify every `.txt` file by its header line.
    ///
    /// Files that are not lists (map files, sound lists, readmes) are skipped.
    pub fn discover(root: impl Into<PathBuf>, encoding: &'static Encoding) -> Result<Self> {
        let root = absolute_root(root.into())?;
        if !root.is_dir() {
            anyhow::bail!("route package {} is not a directory", root.display());
        }

        let mut lists = Vec::new();
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("failed to walk {}", root.display()))?;
            if !entry.file_type().is_file() || !has_txt_extension(entry.path()) {
                continue;
            }

            let lines = match read_lines(entry.path(), encoding) {
                Ok(lines) => lines,
                Err(err) => {
                    warn!("Skipping {}: {}", entry.path().display(), err);
                    continue;
                }
            };
            match lines.first().and_then(|line| ListKind::sniff(line)) {
                Some(kind) => {
                    debug!("found {} at {}", kind, entry.path().display());
                    lists.push(ListFile {
                        kind,
                        path: entry.into_path(),
                    });
                }
                None => continue,
            }
        }

        Ok(Self { root, lists })
    }

    /// Lists of one kind, in discovery order.
    pub fn lists_of(&self, kind: ListKind) -> impl Iterator<Item = &Path> {
        self.lists
            .iter()
            .filter(move |list| list.kind == kind)
            .map(|list| list.path.as_path())
    }
}

/// Outcome of loading one list of a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListOutcome {
    pub kind: ListKind,
    pub path: PathBuf,
    /// Records added, or the reason the file was abandoned.
    pub result: std::result::Result<usize, String>,
}

impl RouteLoader<'_> {
    /// Load every list of `package` into `route`.
    ///
    /// Structure lists go first so signal aspects can refer to their keys. A
    /// list that fails is recorded and the rest of the package still loads.
    pub fn load_package(&mut self, package: &RoutePackage, route: &mut RouteData) -> Vec<ListOutcome> {
        let mut outcomes = Vec::with_capacity(package.lists.len());
        for kind in ListKind::ALL {
            for path in package.lists_of(kind) {
                let result = match kind {
                    ListKind::Structure => self.load_object_list(path, route),
                    ListKind::Station => self.load_station_list(path, route),
                    ListKind::SignalAspects => self.load_signal_aspect_list(path, route),
                };
                outcomes.push(ListOutcome {
                    kind,
                    path: path.to_path_buf(),
                    result: result.map_err(|err| err.to_string()),
                });
            }
        }
        outcomes
    }
}

/// Anchor a relative package root at the working directory so every
/// resolved object path is absolute.
fn absolute_root(root: PathBuf) -> Result<PathBuf> {
    if root.is_absolute() {
        return Ok(root);
    }
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    Ok(cwd.join(root))
}

fn has_txt_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}
