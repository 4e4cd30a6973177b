//! Loading substitutes from `<openBVE><Compatibility>` XML descriptors.

use std::{
    fs,
    path::{Path, PathBuf},
};

use roxmltree::{Document, Node};
use tracing::{debug, info};

use super::{CompatibilityRegistry, ReplacementObject};
use crate::{
    diagnostics::{DiagnosticSink, Severity},
    error::CompatibilityError,
    path::combine,
};

impl CompatibilityRegistry {
    /// Load a descriptor and every descriptor it includes.
    ///
    /// Returns how many substitutes were registered. Includes are loaded where
    /// they appear in the document; a descriptor already seen by this registry
    /// is skipped, so include cycles terminate. Problems with included files
    /// are reported to `diagnostics`; only the top-level file can fail the call.
    pub fn load_descriptor(
        &mut self,
        path: &Path,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Result<usize, CompatibilityError> {
        let registered = self.load_descriptor_file(path, diagnostics)?;
        info!(
            "{} compatibility objects registered from {}",
            registered,
            path.display()
        );
        Ok(registered)
    }

    fn load_descriptor_file(
        &mut self,
        path: &Path,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Result<usize, CompatibilityError> {
        let canonical = fs::canonicalize(path).map_err(|source| CompatibilityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !self.loaded_descriptors.insert(canonical.clone()) {
            debug!("compatibility descriptor {} already loaded", path.display());
            return Ok(0);
        }

        let content = fs::read_to_string(&canonical).map_err(|source| CompatibilityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = content.trim_start_matches('\u{feff}');
        let document = Document::parse(content).map_err(|source| CompatibilityError::Xml {
            path: path.to_path_buf(),
            source,
        })?;

        let root = document.root_element();
        if !has_name(&root, "openbve") {
            debug!("{} has no openBVE root element", path.display());
            return Ok(0);
        }

        let directory = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut registered = 0;
        for section in root.children().filter(|node| has_name(node, "compatibility")) {
            for entry in section.children().filter(|node| node.is_element()) {
                if has_name(&entry, "object") {
                    if let Some(replacement) =
                        parse_replacement(&entry, &directory, path, diagnostics)
                    {
                        if self.register(replacement) {
                            registered += 1;
                        }
                    }
                } else if has_name(&entry, "objectlist") {
                    registered += self.load_includes(&entry, &directory, path, diagnostics);
                } else {
                    debug!(
                        "ignoring {} in compatibility descriptor {}",
                        entry.tag_name().name(),
                        path.display()
                    );
                }
            }
        }
        Ok(registered)
    }

    fn load_includes(
        &mut self,
        list: &Node,
        directory: &Path,
        descriptor: &Path,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> usize {
        let mut registered = 0;
        for child in list.children().filter(|node| node.is_element()) {
            if !has_name(&child, "filename") {
                diagnostics.report(
                    Severity::Warning,
                    false,
                    format!(
                        "Unexpected entry {} found in compatibility XML list {}",
                        child.tag_name().name(),
                        descriptor.display()
                    ),
                );
                continue;
            }
            let reference = inner_text(&child);
            let Some(included) = include_path(&reference, directory) else {
                diagnostics.report(
                    Severity::Warning,
                    false,
                    format!(
                        "Invalid file name {} in compatibility XML list {}",
                        reference,
                        descriptor.display()
                    ),
                );
                continue;
            };
            match self.load_descriptor_file(&included, diagnostics) {
                Ok(count) => registered += count,
                Err(err) => diagnostics.report(Severity::Warning, false, err.to_string()),
            }
        }
        registered
    }
}

fn parse_replacement(
    entry: &Node,
    directory: &Path,
    descriptor: &Path,
    diagnostics: &mut dyn DiagnosticSink,
) -> Option<ReplacementObject> {
    let mut names: Option<Vec<String>> = None;
    let mut replacement_path: Option<PathBuf> = None;
    let mut message = None;
    let mut scope = None;

    for child in entry.children().filter(|node| node.is_element()) {
        let text = inner_text(&child);
        match child.tag_name().name().to_lowercase().as_str() {
            "name" => {
                names = Some(
                    text.split(';')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            }
            "path" => {
                replacement_path = combine(directory, &text).filter(|path| path.is_file());
            }
            "message" => message = Some(text).filter(|m| !m.is_empty()),
            "train" => scope = Some(text).filter(|s| !s.is_empty()),
            other => diagnostics.report(
                Severity::Warning,
                false,
                format!(
                    "Unexpected entry {} found in compatibility object XML {}",
                    other,
                    descriptor.display()
                ),
            ),
        }
    }

    let object_names = names.filter(|names| !names.is_empty())?;
    let replacement_path = replacement_path?;
    Some(ReplacementObject {
        object_names,
        replacement_path,
        message,
        scope,
    })
}

fn include_path(reference: &str, directory: &Path) -> Option<PathBuf> {
    let direct = PathBuf::from(reference);
    if direct.is_absolute() && direct.is_file() {
        return Some(direct);
    }
    combine(directory, reference)
}

fn has_name(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name().eq_ignore_ascii_case(name)
}

fn inner_text(node: &Node) -> String {
    node.descendants()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect::<String>()
        .trim()
        .to_string()
}
