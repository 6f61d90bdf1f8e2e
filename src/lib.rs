pub mod bits;
pub use bits::reader::{read_u32_be, read_u64_be, read_up_to};

pub mod mp4;
pub use mp4::{find_boxes, scan_highlights, BoxIndex, ContainerFormat, HighlightRecord, Mp4Box};

pub mod streams;
pub use streams::{seekable_stream, LocalSeekableStream, SeekableStream};

pub mod highlights;
pub use highlights::{extract_highlights, extract_local_highlights, FileHighlights};

pub mod project;
pub use project::{markers_from_highlights, Marker, ProjectTemplate, EDIT_RATE};

pub mod report;
pub use report::{format_timestamp, HighlightReport};

pub mod config;
pub use config::{load_config_or_default, HighlightConfig};

pub mod organizer;
pub use organizer::{organize_video, OrganizedOutput};

pub mod batch;
pub use batch::{collect_input_files, process_files, BatchSummary, FileOutcome};

pub mod errors;
pub use errors::{
    ConfigError, FileFailure, HighlightParserError, HighlightResult, Mp4Error, ProjectError,
};

/// Highlight times in seconds from a local file, ascending
pub fn read_local_highlights<P: AsRef<std::path::Path>>(path: P) -> HighlightResult<Vec<f64>> {
    Ok(extract_local_highlights(path)?.sorted_seconds())
}
