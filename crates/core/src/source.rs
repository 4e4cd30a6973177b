//! Reading list files and stripping comments.

use std::{fs, path::Path};

use encoding_rs::Encoding;

use crate::error::ParseError;

/// A non-blank line with its comments removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the original file.
    pub number: usize,
    /// Line content before the first comment marker.
    pub text: String,
}

/// Read `path` and decode it with `encoding`.
///
/// A byte order mark takes precedence over the declared encoding.
pub fn read_lines(path: &Path, encoding: &'static Encoding) -> Result<Vec<String>, ParseError> {
    let bytes = fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, _, _) = encoding.decode(&bytes);
    Ok(text.lines().map(str::to_string).collect())
}

/// Cut `line` at the earliest `#` or `//`.
pub fn strip_comment(line: &str) -> &str {
    let hash = line.find('#');
    let slashes = line.find("//");
    let cut = match (hash, slashes) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    match cut {
        Some(index) => &line[..index],
        None => line,
    }
}

/// Strip comments from every line after `skip` and drop what ends up blank.
pub fn preprocess(lines: &[String], skip: usize) -> Vec<SourceLine> {
    lines
        .iter()
        .enumerate()
        .skip(skip)
        .filter_map(|(index, raw)| {
            let text = strip_comment(raw);
            if text.trim().is_empty() {
                return None;
            }
            Some(SourceLine {
                number: index + 1,
                text: text.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn earliest_marker_wins() {
        assert_eq!(strip_comment("a,b # c // d"), "a,b ");
        assert_eq!(strip_comment("a,b // c # d"), "a,b ");
        assert_eq!(strip_comment("#all comment"), "");
        assert_eq!(strip_comment("no comment"), "no comment");
    }

    #[test]
    fn keeps_original_line_numbers() {
        let lines = owned(&[
            "BveTs Structure List 1.00",
            "",
            "# comment only",
            "a,a.x",
            "   ",
            "b,b.x // trailing",
        ]);
        let kept = preprocess(&lines, 1);
        assert_eq!(
            kept,
            vec![
                SourceLine {
                    number: 4,
                    text: "a,a.x".to_string()
                },
                SourceLine {
                    number: 6,
                    text: "b,b.x ".to_string()
                },
            ]
        );
    }

    #[test]
    fn decodes_declared_encoding() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("list.txt");
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("駅,えき\r\nsecond");
        fs::write(&path, &bytes)?;

        let lines = read_lines(&path, encoding_rs::SHIFT_JIS)?;
        assert_eq!(lines, owned(&["駅,えき", "second"]));
        Ok(())
    }

    #[test]
    fn byte_order_mark_overrides_declared_encoding() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("list.txt");
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("BveTs Station List 2.00\nsta1,駅".as_bytes());
        fs::write(&path, &bytes)?;

        let lines = read_lines(&path, encoding_rs::SHIFT_JIS)?;
        assert_eq!(lines[0], "BveTs Station List 2.00");
        assert_eq!(lines[1], "sta1,駅");
        Ok(())
    }
}
