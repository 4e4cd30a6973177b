#![allow(missing_docs)]

//! Loaders for the structure, station and signal-aspect lists.

mod object_list;
mod signal_list;
mod station_list;
pub mod values;

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tracing::debug;

use crate::{
    compatibility::CompatibilityRegistry,
    diagnostics::{DiagnosticSink, Severity},
    error::ParseError,
    header::{validate_header, ListKind},
    route::{ObjectHandle, ObjectLoadMode, ObjectLoader},
    source::{preprocess, read_lines, SourceLine},
};

/// Settings that apply to every list of one route load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Encoding the list files are declared in.
    pub encoding: &'static Encoding,
    /// Skip geometry and passenger data, e.g. for a route browser preview.
    pub preview_only: bool,
    /// Train folder used to pick scoped compatibility substitutes.
    pub train_scope: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
            preview_only: false,
            train_scope: None,
        }
    }
}

/// One parsing session: options plus the collaborators every list loader needs.
pub struct RouteLoader<'a> {
    options: LoadOptions,
    registry: &'a mut CompatibilityRegistry,
    objects: &'a mut dyn ObjectLoader,
    diagnostics: &'a mut dyn DiagnosticSink,
}

impl<'a> RouteLoader<'a> {
    pub fn new(
        options: LoadOptions,
        registry: &'a mut CompatibilityRegistry,
        objects: &'a mut dyn ObjectLoader,
        diagnostics: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            options,
            registry,
            objects,
            diagnostics,
        }
    }

    /// Read `path`, check its header and return the records after it.
    fn read_list(&mut self, path: &Path, kind: ListKind) -> Result<Vec<SourceLine>, ParseError> {
        let lines = read_lines(path, self.options.encoding).map_err(|err| self.fail(err))?;
        let version = validate_header(path, lines.first().map(String::as_str), kind)
            .map_err(|err| self.fail(err))?;
        debug!("reading {} version {} from {}", kind, version, path.display());
        Ok(preprocess(&lines, 1))
    }

    /// Report a fatal error and hand it back for propagation.
    fn fail(&mut self, err: ParseError) -> ParseError {
        self.diagnostics
            .report(Severity::Error, true, err.to_string());
        err
    }

    fn field_error(&mut self, field: &str, line: usize, path: &Path) {
        self.diagnostics.report(
            Severity::Error,
            false,
            format!("{field} is invalid at line {line} in file {}", path.display()),
        );
    }

    /// Find `reference` below `directory`, consulting the compatibility registry.
    fn locate(&mut self, reference: &str, directory: &Path) -> Option<PathBuf> {
        let scope = self.options.train_scope.as_deref();
        self.registry
            .resolve(reference, directory, scope, &mut *self.diagnostics)
    }

    /// Ask the geometry collaborator for `path`; failures leave the slot empty.
    fn load_object(&mut self, path: &Path) -> Option<ObjectHandle> {
        match self
            .objects
            .load_static_object(path, self.options.encoding, ObjectLoadMode::Normal)
        {
            Ok(handle) => Some(handle),
            Err(err) => {
                self.diagnostics
                    .report(Severity::Warning, false, err.to_string());
                None
            }
        }
    }
}

fn list_directory(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Trimmed field at `index`, `None` when absent or blank.
fn field<'f>(fields: &[&'f str], index: usize) -> Option<&'f str> {
    fields
        .get(index)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
