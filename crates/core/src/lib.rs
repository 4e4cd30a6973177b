#![warn(clippy::all, missing_docs)]

//! Core loaders for BveTS route packages.
//!
//! This crate reads the structure, station and signal-aspect lists of a
//! route package into a [`RouteData`], substituting compatibility objects
//! for files a route references but does not ship.

pub mod compatibility;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod header;
pub mod package;
pub mod parser;
pub mod path;
pub mod route;
pub mod source;
pub mod summary;

pub use compatibility::{CompatibilityRegistry, ReplacementObject};
pub use config::AppConfig;
pub use diagnostics::{Diagnostic, DiagnosticLog, DiagnosticSink, Severity};
pub use error::{CompatibilityError, ObjectLoadError, ParseError};
pub use header::ListKind;
pub use package::{ListOutcome, RoutePackage};
pub use parser::{LoadOptions, RouteLoader};
pub use route::{
    CompatibilitySignalData, ObjectLoader, ObjectPointer, RouteData, Station, StationType,
    StopMode,
};
pub use summary::RouteSummary;
