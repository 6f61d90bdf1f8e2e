use crate::mp4::ftyp::ContainerFormat;
use crate::mp4::gpmf::HighlightRecord;
use serde::Serialize;

/// Highlights recovered from one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileHighlights {
    pub format: ContainerFormat,
    /// Records in discovery order
    pub records: Vec<HighlightRecord>,
}

impl FileHighlights {
    /// Timestamps in seconds, in discovery order.
    pub fn seconds(&self) -> Vec<f64> {
        self.records.iter().map(HighlightRecord::seconds).collect()
    }

    /// Timestamps in seconds, ascending.
    pub fn sorted_seconds(&self) -> Vec<f64> {
        let mut seconds = self.seconds();
        seconds.sort_by(f64::total_cmp);
        seconds
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
