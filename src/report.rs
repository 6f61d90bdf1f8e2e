use std::fmt;

/// Format seconds as `H:MM:SS.mmm`, truncating sub-millisecond fractions.
///
/// Hours keep counting past a day instead of wrapping, so a marker 25 hours
/// into a recording prints as `25:00:00.000`, not `1:00:00.000`.
pub fn format_timestamp(seconds: f64) -> String {
    if seconds.is_nan() || seconds.is_infinite() || seconds < 0.0 {
        return "0:00:00.000".to_string();
    }

    let whole = seconds.floor();
    let millis = (((seconds - whole) * 1000.0).floor() as u64).min(999);
    let total_seconds = whole as u64;
    let secs = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;

    format!("{}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

/// Name of the report file written next to a video.
pub fn report_file_name(stem: &str, count: usize) -> String {
    format!("{}_GP-Highlights_{}.txt", stem, count)
}

/// One line of a highlight report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// 1-based position in the sorted highlight list
    pub index: usize,
    pub timestamp: String,
}

/// Human-readable list of the highlights of one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightReport {
    pub file_name: String,
    pub entries: Vec<ReportEntry>,
}

impl HighlightReport {
    /// Build a report from highlight times in seconds, numbered in the order given.
    pub fn new(file_name: impl Into<String>, seconds: &[f64]) -> Self {
        let entries = seconds
            .iter()
            .enumerate()
            .map(|(i, &s)| ReportEntry {
                index: i + 1,
                timestamp: format_timestamp(s),
            })
            .collect();
        Self {
            file_name: file_name.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for HighlightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.file_name)?;
        for entry in &self.entries {
            writeln!(f, "({}): {}", entry.index, entry.timestamp)?;
        }
        writeln!(f)
    }
}
