use super::types::FileHighlights;
use crate::errors::HighlightResult;
use crate::mp4::ftyp::{read_container_format, require_root_ftyp};
use crate::mp4::gpmf::scan_highlight_records;
use crate::mp4::r#box::find_boxes;
use crate::streams::seekable_stream::{LocalSeekableStream, SeekableStream};
use log::{debug, info};
use std::path::Path;

/// Walk `ftyp`/`moov > udta > GPMF` and scan the GPMF payload for highlights
pub fn extract_highlights<S: SeekableStream + ?Sized>(
    stream: &mut S,
) -> HighlightResult<FileHighlights> {
    info!("Highlight extraction...");

    // Step 1: Root level, the file must open with ftyp
    let root = find_boxes(stream, 0, None)?;
    let ftyp = *require_root_ftyp(&root)?;
    let format = read_container_format(stream, &ftyp)?;
    info!("{} container detected", format.name());

    // Step 2: moov > udta > GPMF
    let moov = *root.require(b"moov", "file")?;
    let moov_children = find_boxes(stream, moov.payload_start(), Some(moov.end))?;
    let udta = *moov_children.require(b"udta", "moov")?;
    let udta_children = find_boxes(stream, udta.payload_start(), Some(udta.end))?;
    let gpmf = *udta_children.require(b"GPMF", "udta")?;
    debug!(
        "GPMF payload [{}..{}), {} bytes",
        gpmf.payload_start(),
        gpmf.end,
        gpmf.payload_size()
    );

    // Step 3: Highlight records
    let records = scan_highlight_records(stream, gpmf.payload_start(), Some(gpmf.end))?;
    Ok(FileHighlights { format, records })
}

/// Extract highlights from a local file
pub fn extract_local_highlights<P: AsRef<Path>>(path: P) -> HighlightResult<FileHighlights> {
    let mut stream = LocalSeekableStream::open(path)?;
    extract_highlights(&mut stream)
}
