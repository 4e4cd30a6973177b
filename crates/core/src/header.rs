//! Version header checks for the three list kinds.

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The list formats a route package is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// `key,path` structure list.
    Structure,
    /// Station timetable list.
    Station,
    /// Signal aspect to object mapping.
    SignalAspects,
}

impl ListKind {
    /// Every kind, in the order a package is loaded.
    pub const ALL: [ListKind; 3] = [ListKind::Structure, ListKind::Station, ListKind::SignalAspects];

    /// Lower-case tag line 0 must start with.
    pub fn tag(self) -> &'static str {
        match self {
            ListKind::Structure => "bvets structure list",
            ListKind::Station => "bvets station list",
            ListKind::SignalAspects => "bvets signal aspects list",
        }
    }

    /// Character offset the version token is read from.
    pub fn version_offset(self) -> usize {
        match self {
            ListKind::Structure => 21,
            ListKind::Station => 19,
            ListKind::SignalAspects => 26,
        }
    }

    /// Newest version the loaders understand.
    pub fn max_version(self) -> f64 {
        match self {
            ListKind::Structure => 1.0,
            ListKind::Station | ListKind::SignalAspects => 2.0,
        }
    }

    /// Kind whose tag `line` starts with, if any.
    pub fn sniff(line: &str) -> Option<ListKind> {
        let lowered = line.trim_start_matches('\u{feff}').to_lowercase();
        ListKind::ALL
            .into_iter()
            .find(|kind| lowered.starts_with(kind.tag()))
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ListKind::Structure => "BVE5 structure list",
            ListKind::Station => "BVE5 station list",
            ListKind::SignalAspects => "BVE5 signal aspect list",
        };
        f.write_str(label)
    }
}

/// Check line 0 of `path` and return the declared version.
pub fn validate_header(
    path: &Path,
    first_line: Option<&str>,
    kind: ListKind,
) -> Result<f64, ParseError> {
    let line = first_line.ok_or_else(|| ParseError::NotAList {
        path: path.to_path_buf(),
        kind,
    })?;
    if !line.to_lowercase().starts_with(kind.tag()) {
        return Err(ParseError::NotAList {
            path: path.to_path_buf(),
            kind,
        });
    }

    let token = version_token(line, kind.version_offset());
    if !token.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(ParseError::MissingVersion {
            path: path.to_path_buf(),
            kind,
        });
    }

    // A lone trailing or leading dot still parses ("2." / ".5").
    let version: f64 = token.parse().map_err(|_| ParseError::MissingVersion {
        path: path.to_path_buf(),
        kind,
    })?;
    if version > kind.max_version() {
        return Err(ParseError::UnsupportedVersion {
            path: path.to_path_buf(),
            kind,
            version,
        });
    }
    Ok(version)
}

fn version_token(line: &str, offset: usize) -> String {
    let mut token = String::new();
    let mut seen_dot = false;
    for ch in line.chars().skip(offset) {
        match ch {
            '0'..='9' => token.push(ch),
            '.' if !seen_dot => {
                seen_dot = true;
                token.push(ch);
            }
            _ => break,
        }
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(line: &str, kind: ListKind) -> Result<f64, ParseError> {
        validate_header(Path::new("list.txt"), Some(line), kind)
    }

    #[test]
    fn accepts_supported_versions() {
        assert_eq!(check("BveTs Structure List 1.00", ListKind::Structure).ok(), Some(1.0));
        assert_eq!(check("BveTS Station List 1.5", ListKind::Station).ok(), Some(1.5));
        assert_eq!(
            check("bvets signal aspects list 2.00:utf-8", ListKind::SignalAspects).ok(),
            Some(2.0)
        );
    }

    #[test]
    fn rejects_newer_versions() {
        let err = check("BveTS Station List 3.0", ListKind::Station).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedVersion { version, .. } if version == 3.0));
        assert!(check("BveTs Structure List 2.00", ListKind::Structure).is_err());
    }

    #[test]
    fn rejects_wrong_tag() {
        let err = check("BveTs Station List 2.00", ListKind::Structure).unwrap_err();
        assert!(matches!(err, ParseError::NotAList { kind: ListKind::Structure, .. }));
        let err = validate_header(Path::new("empty.txt"), None, ListKind::Station).unwrap_err();
        assert!(matches!(err, ParseError::NotAList { .. }));
    }

    #[test]
    fn missing_digits_is_fatal() {
        for line in ["BveTs Station List", "BveTs Station List v2", "BveTs Station List ."] {
            let err = check(line, ListKind::Station).unwrap_err();
            assert!(matches!(err, ParseError::MissingVersion { .. }), "{line}");
        }
    }

    #[test]
    fn token_stops_at_second_dot() {
        assert_eq!(version_token("BveTs Station List 1.0.3", 19), "1.0");
        assert_eq!(version_token("BveTs Station List 2.00:shift_jis", 19), "2.00");
    }

    #[test]
    fn sniffs_kind_from_header() {
        assert_eq!(ListKind::sniff("BveTs Signal Aspects List 2.00"), Some(ListKind::SignalAspects));
        assert_eq!(ListKind::sniff("\u{feff}BveTs Structure List 1.00"), Some(ListKind::Structure));
        assert_eq!(ListKind::sniff("BveTs Map 2.00"), None);
    }
}
