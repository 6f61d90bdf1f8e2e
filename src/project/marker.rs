use serde::{Deserialize, Serialize};

/// Editor ticks per second of media time.
pub const EDIT_RATE: u64 = 705_600_000;
/// Label carried by every marker record.
pub const MARKER_LABEL: &str = "Marker";

/// A zero-length timeline marker in the editor's table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub endtime: u64,
    pub time: u64,
    pub value: String,
    pub duration: u64,
}

impl Marker {
    pub fn at_ticks(ticks: u64, label: &str) -> Self {
        Self {
            endtime: ticks,
            time: ticks,
            value: label.to_string(),
            duration: 0,
        }
    }
}

/// Convert seconds to edit-rate ticks, truncating.
pub fn seconds_to_ticks(seconds: f64, edit_rate: u64) -> u64 {
    // `as` saturates: negative and NaN inputs map to 0
    (seconds * edit_rate as f64).floor() as u64
}

/// One marker per highlight, in the order given
pub fn markers_from_highlights(seconds: &[f64], edit_rate: u64, label: &str) -> Vec<Marker> {
    seconds
        .iter()
        .map(|&s| Marker::at_ticks(seconds_to_ticks(s, edit_rate), label))
        .collect()
}
