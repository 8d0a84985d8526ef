// Simulation dataset module
//
// Reads pre-generated simulation output (one JSON document per simulation)
// and lists the simulations available in a data directory.
// Read-only: nothing here ever writes to disk.

pub mod timed;

pub use timed::TimedData;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Map center used when a document carries no metadata
pub const DEFAULT_CENTER: [f64; 2] = [16.370_035_9, -2.290_023_9];

/// Name of the optional listing file inside a data directory
pub const LISTING_FILE: &str = "index.json";

/// Errors raised while loading a dataset or listing simulations
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed simulation data in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("simulation contains no time steps")]
    EmptyDataset,

    #[error("step {step} has {found} locations, expected {expected}")]
    LocationCountMismatch {
        step: usize,
        expected: usize,
        found: usize,
    },

    #[error("no simulations found in {}", .dir.display())]
    NoSimulations { dir: PathBuf },
}

/// Reference to a location as embedded in a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRef {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// A camp or city at one time step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub refugees: u64,
    #[serde(default)]
    pub camp: bool,
    /// Camp capacity; cities usually carry a negative placeholder
    #[serde(default)]
    pub capacity: i64,
    /// Resident population
    #[serde(default)]
    pub pop: i64,
    /// Signed change in refugees since the previous step, filled in at load time
    #[serde(default)]
    pub difference: i64,
}

impl Location {
    /// Text shown when the location is inspected
    ///
    /// Camps report their capacity, cities their resident population.
    pub fn popup_text(&self) -> String {
        if self.camp {
            format!(
                "{}\nCapacity: {}\nRefugees: {}",
                self.name, self.capacity, self.refugees
            )
        } else {
            format!(
                "{}\nPopulation: {}\nRefugees: {}",
                self.name, self.pop, self.refugees
            )
        }
    }
}

/// A directed route carrying a refugee flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub from: LocationRef,
    pub to: LocationRef,
    #[serde(default)]
    pub refugees: u64,
    /// Forced redirections bypass magnitude-based coloring
    #[serde(default)]
    pub forced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Link {
    pub fn popup_text(&self) -> String {
        format!(
            "Route from {} to {}\nRefugees: {}",
            self.from.name, self.to.name, self.refugees
        )
    }
}

/// All locations and links at one simulation time step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Document-level metadata written alongside the time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(rename = "maxForLocation", default)]
    pub max_for_location: Option<u64>,
    #[serde(rename = "maxForLink", default)]
    pub max_for_link: Option<u64>,
    /// Map center as [lat, lng]
    #[serde(default = "default_center")]
    pub center: [f64; 2],
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_center() -> [f64; 2] {
    DEFAULT_CENTER
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            max_for_location: None,
            max_for_link: None,
            center: DEFAULT_CENTER,
            start_date: None,
            name: None,
            description: None,
        }
    }
}

/// Current on-disk layout: the series wrapped with metadata.
/// Older output is the bare array of steps.
#[derive(Debug, Deserialize)]
struct WrappedDocument {
    #[serde(default)]
    meta: Meta,
    data: Vec<Snapshot>,
}

/// One loaded simulation
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Listing name the dataset was loaded under
    pub name: String,
    pub meta: Meta,
    pub timeline: TimedData,
}

impl Dataset {
    /// Largest location magnitude: the documented maximum when present,
    /// otherwise the largest value observed in the series.
    pub fn max_location_value(&self) -> u64 {
        self.meta
            .max_for_location
            .unwrap_or_else(|| self.timeline.max_location_value())
    }

    pub fn max_link_value(&self) -> u64 {
        self.meta
            .max_for_link
            .unwrap_or_else(|| self.timeline.max_link_value())
    }

    /// Calendar date of the current step, if the document has a start date
    pub fn current_date(&self) -> Option<NaiveDate> {
        let start = self.meta.start_date?;
        start.checked_add_days(chrono::Days::new(self.timeline.current_step() as u64))
    }
}

/// Entry of the simulation listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationEntry {
    pub name: String,
}

/// Parse a dataset document already read into memory
pub fn parse_dataset(name: &str, path: &Path, content: &str) -> Result<Dataset, DataError> {
    // Each layout is parsed on its own so errors name the real cause
    let parsed = if content.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<Snapshot>>(content).map(|data| (Meta::default(), data))
    } else {
        serde_json::from_str::<WrappedDocument>(content).map(|doc| (doc.meta, doc.data))
    };
    let (meta, snapshots) = parsed.map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let timeline = TimedData::new(snapshots)?;
    debug!(
        name,
        steps = timeline.len(),
        max_diff = timeline.max_diff(),
        "Parsed simulation dataset"
    );

    Ok(Dataset {
        name: name.to_string(),
        meta,
        timeline,
    })
}

/// Load one simulation from disk
///
/// Either the whole document loads and validates, or an error is returned;
/// there is no partially loaded state.
pub fn load_dataset(path: &Path) -> Result<Dataset, DataError> {
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("simulation");

    let dataset = parse_dataset(name, path, &content)?;
    info!(
        path = %path.display(),
        steps = dataset.timeline.len(),
        "Loaded simulation"
    );
    Ok(dataset)
}

/// List the simulations available in `dir`
///
/// An `index.json` holding `[{"name": ...}, ...]` takes precedence;
/// otherwise every `*.json` file in the directory is listed, sorted by name.
pub fn list_simulations(dir: &Path) -> Result<Vec<SimulationEntry>, DataError> {
    let listing = dir.join(LISTING_FILE);
    if listing.is_file() {
        let content = fs::read_to_string(&listing).map_err(|source| DataError::Io {
            path: listing.clone(),
            source,
        })?;
        let entries: Vec<SimulationEntry> =
            serde_json::from_str(&content).map_err(|source| DataError::Parse {
                path: listing.clone(),
                source,
            })?;
        if entries.is_empty() {
            return Err(DataError::NoSimulations {
                dir: dir.to_path_buf(),
            });
        }
        return Ok(entries);
    }

    let read_dir = fs::read_dir(dir).map_err(|source| DataError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries: Vec<SimulationEntry> = read_dir
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|name| SimulationEntry {
                    name: name.to_string(),
                })
        })
        .collect();

    if entries.is_empty() {
        return Err(DataError::NoSimulations {
            dir: dir.to_path_buf(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn location(name: &str, refugees: u64) -> Location {
        Location {
            name: name.to_string(),
            lat: 10.0,
            lng: 20.0,
            refugees,
            camp: false,
            capacity: -1,
            pop: 1000,
            difference: 0,
        }
    }

    pub fn link(from: &str, to: &str, refugees: u64, forced: bool) -> Link {
        Link {
            from: LocationRef {
                name: from.to_string(),
                lat: 10.0,
                lng: 20.0,
            },
            to: LocationRef {
                name: to.to_string(),
                lat: 12.0,
                lng: 23.0,
            },
            refugees,
            forced,
            distance: None,
        }
    }

    /// One location per column; each row is a step
    pub fn snapshots(rows: &[&[u64]]) -> Vec<Snapshot> {
        rows.iter()
            .map(|row| Snapshot {
                locations: row
                    .iter()
                    .enumerate()
                    .map(|(i, &r)| location(&format!("L{}", i), r))
                    .collect(),
                links: Vec::new(),
            })
            .collect()
    }

    pub fn dataset(rows: &[&[u64]]) -> Dataset {
        Dataset {
            name: "fixture.json".to_string(),
            meta: Meta::default(),
            timeline: TimedData::new(snapshots(rows)).expect("fixture dataset"),
        }
    }
}
