use std::path::Path;

use tracing::debug;

use super::{list_directory, RouteLoader};
use crate::{
    diagnostics::Severity,
    error::ParseError,
    header::ListKind,
    route::{ObjectPointer, RouteData},
};

impl RouteLoader<'_> {
    /// Load a structure list into `route`, returning the number of entries added.
    ///
    /// Each `key,path` record gets the next free index, in file order. A path
    /// that resolves to nothing is stored as `None` (an invisible object).
    pub fn load_object_list(
        &mut self,
        list: &Path,
        route: &mut RouteData,
    ) -> Result<usize, ParseError> {
        let lines = self.read_list(list, ListKind::Structure)?;
        let directory = list_directory(list);

        let mut added = 0;
        for line in &lines {
            let Some((name, file)) = line.text.split_once(',') else {
                self.diagnostics.report(
                    Severity::Warning,
                    false,
                    format!(
                        "Structure path expected at line {} in file {}",
                        line.number,
                        list.display()
                    ),
                );
                continue;
            };

            let path = self.locate(file.trim(), &directory);
            let structure = match &path {
                Some(path) if !self.options.preview_only => self.load_object(path),
                _ => None,
            };
            route.push_object(
                ObjectPointer {
                    name: name.trim().to_string(),
                    path,
                },
                structure,
            );
            added += 1;
        }

        debug!("{} structures listed in {}", added, list.display());
        Ok(added)
    }
}
