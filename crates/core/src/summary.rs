#![allow(missing_docs)]

//! Serialisable report of a loaded route.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    diagnostics::{Diagnostic, Severity},
    package::ListOutcome,
    route::{RouteData, Station},
};

/// One signal and the aspects it declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub key: String,
    /// Aspect numbers with an object key.
    pub aspects: Vec<usize>,
    /// Aspect numbers whose object could not be loaded.
    pub unresolved: Vec<usize>,
}

/// What a route load produced, suitable for writing next to the package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSummary {
    pub root: PathBuf,
    pub loaded_at: DateTime<Utc>,
    pub lists: Vec<ListOutcome>,
    pub objects: usize,
    /// Structure keys whose file is absent.
    pub invisible_objects: Vec<String>,
    pub stations: Vec<Station>,
    pub signals: Vec<SignalSummary>,
    pub substitutes_used: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl RouteSummary {
    pub fn new(
        root: impl Into<PathBuf>,
        route: &RouteData,
        lists: Vec<ListOutcome>,
        substitutes_used: usize,
        diagnostics: &[Diagnostic],
    ) -> Self {
        Self {
            root: root.into(),
            loaded_at: Utc::now(),
            lists,
            objects: route.used_objects(),
            invisible_objects: route
                .objects
                .iter()
                .filter(|pointer| pointer.path.is_none())
                .map(|pointer| pointer.name.clone())
                .collect(),
            stations: route.stations.clone(),
            signals: route
                .signals
                .iter()
                .map(|signal| SignalSummary {
                    key: signal.key.clone(),
                    aspects: signal.aspects.keys().copied().collect(),
                    unresolved: signal
                        .aspects
                        .iter()
                        .filter(|(_, entry)| entry.object.is_none())
                        .map(|(aspect, _)| *aspect)
                        .collect(),
                })
                .collect(),
            substitutes_used,
            diagnostics: diagnostics.to_vec(),
        }
    }

    /// Number of diagnostics at `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|entry| entry.severity == severity)
            .count()
    }

    /// Load a summary from the given path, returning `None` if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read summary {}", path.display()))?;
        let summary = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse summary {}", path.display()))?;
        Ok(Some(summary))
    }

    /// Persist the summary, creating parent directories if needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create summary directory {}", parent.display())
            })?;
        }

        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize route summary")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write summary {}", path.display()))
    }
}

/// Default summary location inside a package directory.
pub fn summary_path(package_root: impl AsRef<Path>) -> PathBuf {
    package_root.as_ref().join(".bvets-summary.json")
}
