#![allow(missing_docs)]

//! Substitutes for objects that a route references but does not ship.
//!
//! Older routes often point at objects from content packs that are no longer
//! distributed. A [`CompatibilityRegistry`] is filled from XML descriptor files
//! and consulted whenever a direct lookup fails.

mod descriptor;

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    diagnostics::{DiagnosticSink, Severity},
    path::combine,
};

/// A registered substitute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacementObject {
    /// File names this entry stands in for, compared case-insensitively.
    pub object_names: Vec<String>,
    /// Absolute path of the substitute; existed when the entry was registered.
    pub replacement_path: PathBuf,
    /// Advisory shown when the substitute is used.
    pub message: Option<String>,
    /// Train folder the entry is restricted to.
    pub scope: Option<String>,
}

impl ReplacementObject {
    fn matches(&self, name: &str, scope: Option<&str>) -> bool {
        let name = name.to_lowercase();
        if !self
            .object_names
            .iter()
            .any(|alias| alias.to_lowercase() == name)
        {
            return false;
        }
        match (self.scope.as_deref(), scope) {
            (None, _) => true,
            (Some(restriction), Some(requested)) => {
                restriction.to_lowercase() == requested.to_lowercase()
            }
            (Some(_), None) => false,
        }
    }
}

/// Registry of substitutes, owned by whoever drives the route loads.
#[derive(Debug, Default, Clone)]
pub struct CompatibilityRegistry {
    replacements: Vec<ReplacementObject>,
    loaded_descriptors: HashSet<PathBuf>,
    used: usize,
}

impl CompatibilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered substitutes in registration order.
    pub fn replacements(&self) -> &[ReplacementObject] {
        &self.replacements
    }

    /// How many lookups were answered with a substitute.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Add a substitute. Entries without names or whose file is missing are dropped.
    pub fn register(&mut self, replacement: ReplacementObject) -> bool {
        if replacement.object_names.is_empty() || !replacement.replacement_path.is_file() {
            debug!(
                "discarding compatibility entry for {:?}",
                replacement.object_names
            );
            return false;
        }
        self.replacements.push(replacement);
        true
    }

    /// Locate `name` below `base`, falling back to a registered substitute.
    ///
    /// A file that exists on disk wins without touching the registry.
    pub fn resolve(
        &mut self,
        name: &str,
        base: &Path,
        scope: Option<&str>,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Option<PathBuf> {
        if let Some(direct) = combine(base, name) {
            if direct.is_file() {
                return Some(direct);
            }
        }
        self.substitute(name, scope, diagnostics)
    }

    /// Registry lookup only, for callers that already tried the direct path.
    pub fn substitute(
        &mut self,
        name: &str,
        scope: Option<&str>,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Option<PathBuf> {
        let name = name.trim();
        let replacement = self
            .replacements
            .iter()
            .find(|replacement| replacement.matches(name, scope))?;
        if let Some(message) = replacement.message.as_ref().filter(|m| !m.is_empty()) {
            diagnostics.report(Severity::Warning, false, message.clone());
        }
        let path = replacement.replacement_path.clone();
        self.used += 1;
        debug!("substituted {} with {}", name, path.display());
        Some(path)
    }
}
