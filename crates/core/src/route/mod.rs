#![allow(missing_docs)]

//! In-memory route tables filled by the list loaders.

mod objects;

use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

pub use objects::{FileObjectLoader, ObjectHandle, ObjectLoadMode, ObjectLoader, StaticObject};

/// Key from a structure list and the file it points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPointer {
    /// Key used by the map file.
    pub name: String,
    /// Absolute path, or `None` when the file is absent and nothing should be shown.
    pub path: Option<PathBuf>,
}

/// Which trains stop at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StopMode {
    #[default]
    AllStop,
    AllPass,
    PlayerStop,
    PlayerPass,
}

impl StopMode {
    /// Whether the station shows up as a stop in the timetable.
    pub fn requires_stop(self) -> bool {
        matches!(self, StopMode::AllStop | StopMode::PlayerStop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StationType {
    #[default]
    Normal,
    Terminal,
}

/// One record of a station list.
///
/// Times are seconds since midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub key: String,
    pub name: String,
    pub stop_mode: StopMode,
    pub station_type: StationType,
    pub arrival_time: Option<f64>,
    pub departure_time: Option<f64>,
    pub jump_time: Option<f64>,
    /// Minimum stop, never below [`Station::MIN_STOP_DURATION`].
    pub stop_duration: f64,
    /// Hold the departure signal at red until the departure time.
    pub force_stop_signal: bool,
    pub alight_time: f64,
    /// Load factor, 1.0 is a full train.
    pub passenger_ratio: f64,
    /// Track position current when the record was parsed.
    pub default_track_position: f64,
}

impl Station {
    pub const MIN_STOP_DURATION: f64 = 5.0;
    pub const DEFAULT_STOP_DURATION: f64 = 15.0;

    /// A station with every optional field at its default.
    pub fn new(key: impl Into<String>, default_track_position: f64) -> Self {
        Self {
            key: key.into(),
            name: String::new(),
            stop_mode: StopMode::AllStop,
            station_type: StationType::Normal,
            arrival_time: None,
            departure_time: None,
            jump_time: None,
            stop_duration: Self::DEFAULT_STOP_DURATION,
            force_stop_signal: false,
            alight_time: 0.0,
            passenger_ratio: 1.0,
            default_track_position,
        }
    }
}

/// Object shown for one signal aspect.
#[derive(Debug, Clone)]
pub struct AspectObject {
    /// Key as written in the signal list.
    pub object_key: String,
    /// Loaded geometry, `None` when the key could not be resolved or loaded.
    pub object: Option<ObjectHandle>,
}

/// Aspect to object mapping for one signal-aspect row.
#[derive(Debug, Clone, Default)]
pub struct CompatibilitySignalData {
    /// Signal key from column 0.
    pub key: String,
    /// Aspect number (the column position) to object.
    pub aspects: BTreeMap<usize, AspectObject>,
}

impl CompatibilitySignalData {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            aspects: BTreeMap::new(),
        }
    }

    /// Object for `aspect`, if one was declared and loaded.
    pub fn object_for(&self, aspect: usize) -> Option<&ObjectHandle> {
        self.aspects.get(&aspect).and_then(|entry| entry.object.as_ref())
    }
}

/// Everything the list loaders produce for one route.
#[derive(Debug, Clone, Default)]
pub struct RouteData {
    /// Structure list entries in file order.
    pub objects: Vec<ObjectPointer>,
    /// Loaded geometry, same index space as `objects`.
    pub structures: Vec<Option<ObjectHandle>>,
    pub signals: Vec<CompatibilitySignalData>,
    pub stations: Vec<Station>,
    /// Current track position of the surrounding map parse.
    pub track_position: f64,
}

impl RouteData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered structure entries.
    pub fn used_objects(&self) -> usize {
        self.objects.len()
    }

    /// Register a structure entry and return its index.
    pub fn push_object(&mut self, pointer: ObjectPointer, structure: Option<ObjectHandle>) -> usize {
        let index = self.objects.len();
        self.objects.push(pointer);
        self.structures.push(structure);
        index
    }

    /// Index of the last entry whose key matches `key` case-insensitively.
    pub fn find_object(&self, key: &str) -> Option<usize> {
        let needle = key.trim().to_lowercase();
        self.objects
            .iter()
            .rposition(|pointer| pointer.name.to_lowercase() == needle)
    }

    /// Loaded geometry for the entry at `index`.
    pub fn structure(&self, index: usize) -> Option<&ObjectHandle> {
        self.structures.get(index).and_then(Option::as_ref)
    }

    /// Station by key, case-insensitive.
    pub fn station(&self, key: &str) -> Option<&Station> {
        self.stations
            .iter()
            .find(|station| station.key.eq_ignore_ascii_case(key))
    }
}
