use std::path::Path;

use tracing::debug;

use super::{
    field,
    values::{parse_clock_time, parse_integer, parse_number},
    RouteLoader,
};
use crate::{
    diagnostics::Severity,
    error::ParseError,
    header::ListKind,
    route::{RouteData, Station, StationType, StopMode},
};

const DEFAULT_PASSENGER_PERCENT: f64 = 100.0;

impl RouteLoader<'_> {
    /// Load a station list, replacing the stations of `route`.
    ///
    /// Bad fields are reported and defaulted; only a record without a key
    /// aborts the file, in which case `route` keeps its previous stations.
    pub fn load_station_list(
        &mut self,
        list: &Path,
        route: &mut RouteData,
    ) -> Result<usize, ParseError> {
        let lines = self.read_list(list, ListKind::Station)?;

        let mut stations = Vec::with_capacity(lines.len());
        for line in &lines {
            let fields: Vec<&str> = line.text.split(',').collect();
            let key = fields[0].trim();
            if key.is_empty() {
                return Err(self.fail(ParseError::EmptyStationKey {
                    path: list.to_path_buf(),
                    line: line.number,
                }));
            }

            let mut station = self.parse_station(key, &fields, line.number, list);
            if station.name.is_empty() && station.stop_mode.requires_stop() {
                // The unbalanced parenthesis is what existing timetables expect.
                station.name = format!("Station {})", stations.len() + 1);
            }
            station.default_track_position = route.track_position;
            stations.push(station);
        }

        debug!("{} stations listed in {}", stations.len(), list.display());
        let count = stations.len();
        route.stations = stations;
        Ok(count)
    }

    fn parse_station(&mut self, key: &str, fields: &[&str], line: usize, list: &Path) -> Station {
        let mut station = Station::new(key, 0.0);

        if let Some(name) = field(fields, 1) {
            station.name = name.to_string();
        }

        if let Some(arrival) = field(fields, 2) {
            if is_marker(arrival, &["P", "L"]) {
                station.stop_mode = StopMode::AllPass;
            } else {
                station.arrival_time = self.clock_field(arrival, "ArrivalTime", line, list);
            }
        }

        if let Some(departure) = field(fields, 3) {
            if is_marker(departure, &["T", "="]) {
                station.station_type = StationType::Terminal;
            } else {
                station.departure_time = self.clock_field(departure, "DepartureTime", line, list);
            }
        }

        if let Some(duration) = field(fields, 4) {
            station.stop_duration = match parse_number(duration) {
                Some(value) => value.max(Station::MIN_STOP_DURATION),
                None => {
                    self.field_error("StopDuration", line, list);
                    Station::DEFAULT_STOP_DURATION
                }
            };
        }

        if let Some(jump) = field(fields, 5) {
            station.jump_time = self.clock_field(jump, "JumpTime", line, list);
        }

        if let Some(forced) = field(fields, 6) {
            station.force_stop_signal = match parse_integer(forced) {
                Some(value) => value == 1,
                None => {
                    self.field_error("ForcedRedSignal", line, list);
                    false
                }
            };
        }

        if let Some(alight) = field(fields, 7) {
            station.alight_time = parse_number(alight).unwrap_or_else(|| {
                self.field_error("AlightTime", line, list);
                0.0
            });
        }

        if !self.options.preview_only {
            let percent = match field(fields, 8).map(parse_number) {
                None => DEFAULT_PASSENGER_PERCENT,
                Some(None) => {
                    self.field_error("PassengerRatio", line, list);
                    DEFAULT_PASSENGER_PERCENT
                }
                Some(Some(value)) if value < 0.0 => {
                    self.diagnostics.report(
                        Severity::Error,
                        false,
                        format!(
                            "PassengerRatio is expected to be non-negative at line {line} in file {}",
                            list.display()
                        ),
                    );
                    DEFAULT_PASSENGER_PERCENT
                }
                Some(Some(value)) => value,
            };
            station.passenger_ratio = percent / 100.0;
        }

        station
    }

    fn clock_field(&mut self, value: &str, name: &str, line: usize, list: &Path) -> Option<f64> {
        let parsed = parse_clock_time(value);
        if parsed.is_none() {
            self.field_error(name, line, list);
        }
        parsed
    }
}

fn is_marker(value: &str, markers: &[&str]) -> bool {
    markers
        .iter()
        .any(|marker| value.eq_ignore_ascii_case(marker))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::{tempdir, TempDir};

    use crate::{
        compatibility::CompatibilityRegistry,
        diagnostics::{DiagnosticLog, Severity},
        error::ParseError,
        parser::{
            testing::{write_list, RecordingLoader},
            LoadOptions, RouteLoader,
        },
        route::{RouteData, Station, StationType, StopMode},
    };

    fn station_list(rows: &[&str]) -> std::io::Result<(TempDir, PathBuf)> {
        let dir = tempdir()?;
        let mut lines = vec!["BveTs Station List 2.00"];
        lines.extend_from_slice(rows);
        let path = write_list(dir.path(), "stations.txt", &lines)?;
        Ok((dir, path))
    }

    fn load(
        rows: &[&str],
        options: LoadOptions,
        route: &mut RouteData,
    ) -> Result<(Result<usize, ParseError>, DiagnosticLog), std::io::Error> {
        let (_dir, path) = station_list(rows)?;
        let mut registry = CompatibilityRegistry::new();
        let mut objects = RecordingLoader::default();
        let mut log = DiagnosticLog::new();
        let result = RouteLoader::new(options, &mut registry, &mut objects, &mut log)
            .load_station_list(&path, route);
        Ok((result, log))
    }

    #[test]
    fn parses_full_record() -> Result<(), Box<dyn std::error::Error>> {
        let mut route = RouteData::new();
        route.track_position = 1250.0;
        let (result, log) = load(
            &["sta1, Central ,10:00:00,10:00:30,20,,1,3,180"],
            LoadOptions::default(),
            &mut route,
        )?;

        assert_eq!(result?, 1);
        assert!(log.is_empty());
        let station = &route.stations[0];
        assert_eq!(station.key, "sta1");
        assert_eq!(station.name, "Central");
        assert_eq!(station.stop_mode, StopMode::AllStop);
        assert_eq!(station.station_type, StationType::Normal);
        assert_eq!(station.arrival_time, Some(36000.0));
        assert_eq!(station.departure_time, Some(36030.0));
        assert_eq!(station.stop_duration, 20.0);
        assert_eq!(station.jump_time, None);
        assert!(station.force_stop_signal);
        assert_eq!(station.alight_time, 3.0);
        assert!((station.passenger_ratio - 1.8).abs() < 1e-9);
        assert_eq!(station.default_track_position, 1250.0);
        assert!(route.station("STA1").is_some());
        Ok(())
    }

    #[test]
    fn pass_marker_wins_over_departure() -> Result<(), Box<dyn std::error::Error>> {
        let mut route = RouteData::new();
        let (result, log) = load(
            &["a,Alpha,P,10:00:00", "b,Beta,l,T"],
            LoadOptions::default(),
            &mut route,
        )?;
        result?;

        assert_eq!(route.stations[0].stop_mode, StopMode::AllPass);
        assert_eq!(route.stations[0].arrival_time, None);
        assert_eq!(route.stations[0].departure_time, Some(36000.0));
        assert_eq!(route.stations[1].stop_mode, StopMode::AllPass);
        assert_eq!(route.stations[1].station_type, StationType::Terminal);
        assert!(log.is_empty());
        Ok(())
    }

    #[test]
    fn terminal_marker_and_jump_time() -> Result<(), Box<dyn std::error::Error>> {
        let mut route = RouteData::new();
        let (result, log) = load(&["a,A,10:00:00,=,,09:59:00,0"], LoadOptions::default(), &mut route)?;
        result?;

        let station = &route.stations[0];
        assert_eq!(station.station_type, StationType::Terminal);
        assert_eq!(station.arrival_time, Some(36000.0));
        assert_eq!(station.jump_time, Some(35940.0));
        assert_eq!(station.departure_time, None);
        assert!(!station.force_stop_signal);
        assert!(log.is_empty());
        Ok(())
    }

    #[test]
    fn stop_duration_has_a_floor() -> Result<(), Box<dyn std::error::Error>> {
        let mut route = RouteData::new();
        let (result, log) = load(
            &["a,A,,,3.0", "b,B,,,20.0", "c,C", "d,D,,,soon"],
            LoadOptions::default(),
            &mut route,
        )?;
        result?;

        let durations: Vec<f64> = route.stations.iter().map(|s| s.stop_duration).collect();
        assert_eq!(durations, vec![5.0, 20.0, Station::DEFAULT_STOP_DURATION, 15.0]);
        assert_eq!(log.count(Severity::Error), 1);
        Ok(())
    }

    #[test]
    fn bad_fields_are_defaulted_not_dropped() -> Result<(), Box<dyn std::error::Error>> {
        let mut route = RouteData::new();
        let (result, log) = load(
            &["a,A,late,never,,whenever,yes,slow"],
            LoadOptions::default(),
            &mut route,
        )?;
        assert_eq!(result?, 1);

        let station = &route.stations[0];
        assert_eq!(station.arrival_time, None);
        assert_eq!(station.departure_time, None);
        assert_eq!(station.jump_time, None);
        assert!(!station.force_stop_signal);
        assert_eq!(station.alight_time, 0.0);
        assert_eq!(log.count(Severity::Error), 5);
        assert!(log
            .entries()
            .iter()
            .all(|entry| !entry.fatal && entry.message.contains("line 2")));
        assert!(log.entries()[0].message.starts_with("ArrivalTime"));
        Ok(())
    }

    #[test]
    fn unparsable_passenger_ratio_reports_once() -> Result<(), Box<dyn std::error::Error>> {
        let mut route = RouteData::new();
        let (result, log) = load(&["a,A,,,,,,,crowded"], LoadOptions::default(), &mut route)?;
        result?;

        assert_eq!(log.entries().len(), 1);
        assert!(log.entries()[0].message.starts_with("PassengerRatio"));
        assert_eq!(route.stations[0].passenger_ratio, 1.0);

        let mut route = RouteData::new();
        let (result, log) = load(&["a,A,,,,,,,-20"], LoadOptions::default(), &mut route)?;
        result?;
        assert_eq!(log.entries().len(), 1);
        assert_eq!(route.stations[0].passenger_ratio, 1.0);
        Ok(())
    }

    #[test]
    fn preview_ignores_passenger_ratio() -> Result<(), Box<dyn std::error::Error>> {
        let mut route = RouteData::new();
        let options = LoadOptions {
            preview_only: true,
            ..LoadOptions::default()
        };
        let (result, log) = load(&["a,A,,,,,,,crowded", "b,B,,,,,,,50"], options, &mut route)?;
        result?;

        assert!(log.is_empty());
        assert_eq!(route.stations[0].passenger_ratio, 1.0);
        assert_eq!(route.stations[1].passenger_ratio, 1.0);
        Ok(())
    }

    #[test]
    fn synthesizes_names_with_known_parenthesis_artifact() -> Result<(), Box<dyn std::error::Error>> {
        let mut route = RouteData::new();
        let (result, _) = load(&["a", "b,,P", "c,"], LoadOptions::default(), &mut route)?;
        result?;

        // The trailing ")" without an opening one is long-standing behaviour.
        assert_eq!(route.stations[0].name, "Station 1)");
        assert_eq!(route.stations[1].name, "");
        assert_eq!(route.stations[2].name, "Station 3)");
        Ok(())
    }

    #[test]
    fn empty_key_aborts_whole_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut route = RouteData::new();
        route.stations.push(Station::new("previous", 0.0));
        let (result, log) = load(
            &["a,Alpha", " ,Nameless", "c,Gamma"],
            LoadOptions::default(),
            &mut route,
        )?;

        let err = result.unwrap_err();
        assert!(matches!(err, ParseError::EmptyStationKey { line: 3, .. }));
        assert_eq!(route.stations.len(), 1);
        assert_eq!(route.stations[0].key, "previous");
        assert!(log.entries()[0].fatal);
        Ok(())
    }
}
