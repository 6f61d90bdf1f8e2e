/*
# GPMF Highlight Scanner

 GoPro cameras store HiLight tags in the `GPMF` box under `moov/udta`. The payload is a
 KLV telemetry stream, but only one section of it matters here, so instead of parsing the
 stream generically the scanner walks it four bytes at a time and tracks three tags:

 - `High` followed by `ligh`: start of the highlights section
 - `HLMT`: header of the highlight list, only honoured inside that section
 - `MANL`: closes one fixed-size highlight record, only honoured after `HLMT`

 Each record ends with `MANL`; its timestamp is the big-endian u32 that starts
 `RECORD_STRIDE_BYTES` before the end of that tag, in milliseconds.
*/

use crate::bits::reader::{read_u32_be, read_up_to};
use crate::errors::HighlightResult;
use crate::streams::seekable_stream::SeekableStream;
use log::{debug, info};
use serde::Serialize;
use std::io::SeekFrom;

/// Distance from a record's timestamp field to the end of its `MANL` tag.
pub const RECORD_STRIDE_BYTES: u64 = 20;
/// Width of one scan step, matching the FourCC framing of the stream.
pub const TAG_SIZE: u64 = 4;

pub const HIGH_TAG: [u8; 4] = *b"High";
pub const LIGH_TAG: [u8; 4] = *b"ligh";
pub const HLMT_TAG: [u8; 4] = *b"HLMT";
pub const MANL_TAG: [u8; 4] = *b"MANL";

/// Which tags the scan has passed so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HighlightScanState {
    pub seen_highlights_tag: bool,
    pub seen_hlmt_tag: bool,
}

impl HighlightScanState {
    /// Records are only accepted once both tags have been seen.
    pub fn accepts_records(&self) -> bool {
        self.seen_highlights_tag && self.seen_hlmt_tag
    }
}

/// A recovered highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightRecord {
    pub timestamp_ms: u32,
    /// Absolute offset of the `MANL` tag closing the record
    pub tag_offset: u64,
}

impl HighlightRecord {
    pub fn seconds(&self) -> f64 {
        f64::from(self.timestamp_ms) / 1000.0
    }
}

/// Read the next scan word, or `None` when fewer than four bytes remain
/// before `bound` or before EOF.
fn next_word<S: SeekableStream + ?Sized>(
    stream: &mut S,
    pos: &mut u64,
    bound: u64,
) -> HighlightResult<Option<[u8; 4]>> {
    if bound.saturating_sub(*pos) < TAG_SIZE {
        return Ok(None);
    }
    let mut word = [0u8; 4];
    if read_up_to(stream, &mut word)? < word.len() {
        return Ok(None);
    }
    *pos += TAG_SIZE;
    Ok(Some(word))
}

/// Read the timestamp belonging to a `MANL` tag that ends at `resume_at`,
/// then put the cursor back at `resume_at`.
fn read_record_timestamp<S: SeekableStream + ?Sized>(
    stream: &mut S,
    resume_at: u64,
    start_offset: u64,
) -> HighlightResult<Option<u32>> {
    let timestamp_at = match resume_at.checked_sub(RECORD_STRIDE_BYTES) {
        Some(at) if at >= start_offset => at,
        _ => {
            debug!(
                "MANL tag at {} leaves no room for a timestamp, skipping",
                resume_at - TAG_SIZE
            );
            return Ok(None);
        }
    };

    stream.seek(SeekFrom::Start(timestamp_at))?;
    let timestamp = read_u32_be(stream);
    stream.seek(SeekFrom::Start(resume_at))?;
    Ok(Some(timestamp?))
}

/// Scan a GPMF payload between `start_offset` and `end_offset` (`None` reads to
/// EOF) and return the non-zero highlight records in discovery order.
///
/// Discovery order is stream order, which is not guaranteed to be chronological.
pub fn scan_highlight_records<S: SeekableStream + ?Sized>(
    stream: &mut S,
    start_offset: u64,
    end_offset: Option<u64>,
) -> HighlightResult<Vec<HighlightRecord>> {
    let bound = end_offset.unwrap_or(u64::MAX);
    let mut state = HighlightScanState::default();
    let mut records = Vec::new();
    let mut pos = start_offset;
    stream.seek(SeekFrom::Start(pos))?;

    while let Some(mut word) = next_word(stream, &mut pos, bound)? {
        if word == HIGH_TAG && !state.seen_highlights_tag {
            // "Highlights" may straddle two scan words; whatever follows
            // "High" is checked against the other tags below.
            match next_word(stream, &mut pos, bound)? {
                Some(next) => {
                    if next == LIGH_TAG {
                        debug!("Highlights section starts at {}", pos - 2 * TAG_SIZE);
                        state.seen_highlights_tag = true;
                    }
                    word = next;
                }
                None => break,
            }
        }

        if word == HLMT_TAG && state.seen_highlights_tag && !state.seen_hlmt_tag {
            debug!("HLMT list starts at {}", pos - TAG_SIZE);
            state.seen_hlmt_tag = true;
        }

        if word == MANL_TAG && state.accepts_records() {
            if let Some(timestamp_ms) = read_record_timestamp(stream, pos, start_offset)? {
                if timestamp_ms != 0 {
                    records.push(HighlightRecord {
                        timestamp_ms,
                        tag_offset: pos - TAG_SIZE,
                    });
                }
            }
        }
    }

    info!("Found {} highlight(s)", records.len());
    Ok(records)
}

/// Scan a GPMF payload and return highlight timestamps in seconds, in
/// discovery order. Callers sort if chronological order matters.
pub fn scan_highlights<S: SeekableStream + ?Sized>(
    stream: &mut S,
    start_offset: u64,
    end_offset: Option<u64>,
) -> HighlightResult<Vec<f64>> {
    let records = scan_highlight_records(stream, start_offset, end_offset)?;
    Ok(records.iter().map(HighlightRecord::seconds).collect())
}
