//! Error types shared by the list loaders and the compatibility registry.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::header::ListKind;

/// Fatal failure while loading a single list file.
///
/// Any of these aborts the whole file; nothing it parsed is committed to the route.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be read from disk.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being loaded.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Line 0 does not carry the expected list tag.
    #[error("file {} is not a {kind} file", path.display())]
    NotAList {
        /// File being loaded.
        path: PathBuf,
        /// Kind the caller asked for.
        kind: ListKind,
    },
    /// The header tag was present but no version digits followed it.
    #[error("file {} does not contain a {kind} version", path.display())]
    MissingVersion {
        /// File being loaded.
        path: PathBuf,
        /// Kind the caller asked for.
        kind: ListKind,
    },
    /// The header declares a version newer than this loader understands.
    #[error("{version} is not a supported {kind} version (file {})", path.display())]
    UnsupportedVersion {
        /// File being loaded.
        path: PathBuf,
        /// Kind the caller asked for.
        kind: ListKind,
        /// Version parsed from the header.
        version: f64,
    },
    /// A station record has no key, so nothing else in the route could address it.
    #[error("station key empty at line {line} in file {}", path.display())]
    EmptyStationKey {
        /// File being loaded.
        path: PathBuf,
        /// 1-based line number of the offending record.
        line: usize,
    },
}

/// Failure while loading a compatibility descriptor.
#[derive(Debug, Error)]
pub enum CompatibilityError {
    /// The descriptor could not be read.
    #[error("failed to read compatibility descriptor {}: {source}", path.display())]
    Io {
        /// Descriptor file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The descriptor is not well-formed XML.
    #[error("failed to parse compatibility descriptor {}: {source}", path.display())]
    Xml {
        /// Descriptor file.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: roxmltree::Error,
    },
}

/// Failure reported by an [`ObjectLoader`](crate::route::ObjectLoader).
#[derive(Debug, Error)]
pub enum ObjectLoadError {
    /// The object file could not be opened.
    #[error("failed to open object {}: {source}", path.display())]
    Io {
        /// Object file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The object file exists but is not usable.
    #[error("object {} is invalid: {reason}", path.display())]
    Invalid {
        /// Object file.
        path: PathBuf,
        /// Why the loader rejected it.
        reason: String,
    },
}
