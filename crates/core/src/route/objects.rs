#![allow(missing_docs)]

//! The geometry-loading seam.
//!
//! Loading meshes is not this crate's job. Loaders hand resolved paths to an
//! [`ObjectLoader`] and store whatever handle it returns.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::error::ObjectLoadError;

/// How the geometry backend should treat textures for an object.
///
/// Route lists only ever request the backend's normal handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectLoadMode {
    #[default]
    Normal,
}

/// Handle for a loaded static object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticObject {
    /// File the object was loaded from.
    pub path: PathBuf,
    /// Size of the source file in bytes.
    pub size: u64,
}

/// Shared handle stored in the route tables.
pub type ObjectHandle = Arc<StaticObject>;

/// External collaborator that turns an object file into geometry.
pub trait ObjectLoader {
    /// Load the object at `path`. A failure leaves the caller's slot empty.
    fn load_static_object(
        &mut self,
        path: &Path,
        encoding: &'static Encoding,
        mode: ObjectLoadMode,
    ) -> Result<ObjectHandle, ObjectLoadError>;
}

/// Loader that only checks the file can be opened and records its size.
///
/// Used by the command line tool and by tests, where no renderer is around.
#[derive(Debug, Default)]
pub struct FileObjectLoader {
    loaded: usize,
}

impl FileObjectLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful loads so far.
    pub fn loaded(&self) -> usize {
        self.loaded
    }
}

impl ObjectLoader for FileObjectLoader {
    fn load_static_object(
        &mut self,
        path: &Path,
        _encoding: &'static Encoding,
        _mode: ObjectLoadMode,
    ) -> Result<ObjectHandle, ObjectLoadError> {
        let metadata = fs::metadata(path).map_err(|source| ObjectLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(ObjectLoadError::Invalid {
                path: path.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }
        self.loaded += 1;
        Ok(Arc::new(StaticObject {
            path: path.to_path_buf(),
            size: metadata.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn probes_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("pole.x");
        fs::write(&path, "xof 0302txt 0032")?;

        let mut loader = FileObjectLoader::new();
        let handle = loader.load_static_object(&path, encoding_rs::UTF_8, ObjectLoadMode::Normal)?;
        assert_eq!(handle.size, 16);
        assert_eq!(loader.loaded(), 1);

        let err = loader
            .load_static_object(dir.path(), encoding_rs::UTF_8, ObjectLoadMode::Normal)
            .unwrap_err();
        assert!(matches!(err, ObjectLoadError::Invalid { .. }));
        let err = loader
            .load_static_object(&dir.path().join("gone.x"), encoding_rs::UTF_8, ObjectLoadMode::Normal)
            .unwrap_err();
        assert!(matches!(err, ObjectLoadError::Io { .. }));
        assert_eq!(loader.loaded(), 1);
        Ok(())
    }
}
