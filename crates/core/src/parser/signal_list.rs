use std::path::Path;

use tracing::debug;

use super::{list_directory, RouteLoader};
use crate::{
    diagnostics::Severity,
    error::ParseError,
    header::ListKind,
    route::{AspectObject, CompatibilitySignalData, ObjectHandle, RouteData},
};

impl RouteLoader<'_> {
    /// Load a signal-aspect list, appending one entry per keyed row to `route`.
    ///
    /// Column `n` of a row holds the object key shown for aspect `n`. Object
    /// keys are looked up in the structure lists already loaded into `route`,
    /// then as file names next to the list. A row with a blank key declares
    /// glows for the row before it; those are read but not used yet.
    pub fn load_signal_aspect_list(
        &mut self,
        list: &Path,
        route: &mut RouteData,
    ) -> Result<usize, ParseError> {
        let lines = self.read_list(list, ListKind::SignalAspects)?;
        let directory = list_directory(list);

        let mut signals: Vec<CompatibilitySignalData> = Vec::new();
        for line in &lines {
            let columns: Vec<&str> = line.text.split(',').collect();
            let key = columns[0].trim();

            if key.is_empty() {
                let glows: Vec<&str> = columns[1..]
                    .iter()
                    .map(|column| column.trim())
                    .filter(|column| !column.is_empty())
                    .collect();
                match signals.last() {
                    Some(signal) => debug!(
                        "ignoring glow objects {:?} for signal {} at line {}",
                        glows, signal.key, line.number
                    ),
                    None => debug!(
                        "glow row without a signal at line {} in {}",
                        line.number,
                        list.display()
                    ),
                }
                continue;
            }

            let mut signal = CompatibilitySignalData::new(key);
            for (aspect, column) in columns.iter().enumerate().skip(1) {
                let object_key = column.trim();
                if object_key.is_empty() {
                    continue;
                }
                let object = self.aspect_object(object_key, &directory, route, line.number, list);
                signal.aspects.insert(
                    aspect,
                    AspectObject {
                        object_key: object_key.to_string(),
                        object,
                    },
                );
            }
            signals.push(signal);
        }

        debug!("{} signals listed in {}", signals.len(), list.display());
        let count = signals.len();
        route.signals.extend(signals);
        Ok(count)
    }

    fn aspect_object(
        &mut self,
        object_key: &str,
        directory: &Path,
        route: &RouteData,
        line: usize,
        list: &Path,
    ) -> Option<ObjectHandle> {
        let path = match route.find_object(object_key) {
            Some(index) => {
                if let Some(handle) = route.structure(index) {
                    return Some(handle.clone());
                }
                route.objects[index].path.clone()
            }
            None => self.locate(object_key, directory),
        };

        let Some(path) = path else {
            self.diagnostics.report(
                Severity::Warning,
                false,
                format!(
                    "Object {} could not be found at line {} in file {}",
                    object_key,
                    line,
                    list.display()
                ),
            );
            return None;
        };
        if self.options.preview_only {
            return None;
        }
        self.load_object(&path)
    }
}
