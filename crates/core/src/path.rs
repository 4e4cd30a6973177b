//! Combining route-relative file references with a base directory.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

const INVALID_CHARS: [char; 6] = ['<', '>', '|', '"', '*', '?'];

/// Join `relative` onto `base`.
///
/// Route files are usually authored on Windows: backslashes are accepted as
/// separators and each component is matched case-insensitively against what
/// exists on disk. Returns `None` for references that cannot name a file.
pub fn combine(base: &Path, relative: &str) -> Option<PathBuf> {
    let relative = relative.trim();
    if relative.is_empty()
        || relative.contains('\0')
        || relative.chars().any(|ch| INVALID_CHARS.contains(&ch))
    {
        return None;
    }

    let normalized = relative.replace('\\', "/");
    let candidate = Path::new(&normalized);
    let mut combined = if candidate.is_absolute() {
        PathBuf::new()
    } else {
        base.to_path_buf()
    };

    for component in candidate.components() {
        match component {
            Component::Prefix(prefix) => combined.push(prefix.as_os_str()),
            Component::RootDir => combined.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !combined.pop() {
                    return None;
                }
            }
            Component::Normal(name) => {
                let name = name.to_str()?;
                let exact = combined.join(name);
                if exact.exists() {
                    combined = exact;
                } else {
                    combined = find_case_insensitive(&combined, name).unwrap_or(exact);
                }
            }
        }
    }

    Some(combined)
}

fn find_case_insensitive(dir: &Path, name: &str) -> Option<PathBuf> {
    let needle = name.to_lowercase();
    fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_name().to_string_lossy().to_lowercase() == needle)
        .map(|entry| entry.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn normalizes_backslashes_and_case() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("Structures/Rail"))?;
        fs::write(dir.path().join("Structures/Rail/Ballast.x"), "")?;

        let found = combine(dir.path(), r"structures\rail\BALLAST.x").expect("combined path");
        assert_eq!(found, dir.path().join("Structures/Rail/Ballast.x"));
        assert!(found.exists());
        Ok(())
    }

    #[test]
    fn missing_files_still_combine() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let combined = combine(dir.path(), "objects/missing.csv").expect("combined path");
        assert_eq!(combined, dir.path().join("objects/missing.csv"));
        assert!(!combined.exists());
        Ok(())
    }

    #[test]
    fn parent_components_walk_up() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("lists"))?;
        fs::write(dir.path().join("shared.x"), "")?;

        let combined = combine(&dir.path().join("lists"), "../shared.x").expect("combined path");
        assert!(combined.exists());
        Ok(())
    }

    #[test]
    fn rejects_malformed_references() {
        let base = Path::new("/routes");
        assert_eq!(combine(base, ""), None);
        assert_eq!(combine(base, "   "), None);
        assert_eq!(combine(base, "obj<1>.x"), None);
        assert_eq!(combine(base, "what?.csv"), None);
    }
}
