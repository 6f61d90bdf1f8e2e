use crate::bits::reader::{fourcc_to_string, read_u64_be, read_up_to};
use crate::errors::{HighlightResult, Mp4Error};
use crate::streams::seekable_stream::SeekableStream;
use log::{debug, warn};
use std::io::{Read, SeekFrom};

/// Size of a compact box header: 32-bit length followed by the type.
pub const BOX_HEADER_SIZE: u64 = 8;
/// Size of a header carrying a 64-bit `largesize` after the type.
pub const LARGE_BOX_HEADER_SIZE: u64 = 16;

/// Box header information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxHeader {
    pub name: String,
    pub name_bytes: [u8; 4],
    /// Declared total size including the header. Zero means the box runs to
    /// the end of its enclosing range.
    pub size: u64,
    pub header_size: u64,
}

/// A box found at one nesting level, with absolute offsets into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mp4Box {
    pub name_bytes: [u8; 4],
    pub start: u64,
    pub end: u64,
    pub header_size: u64,
}

impl Mp4Box {
    pub fn name(&self) -> String {
        fourcc_to_string(&self.name_bytes)
    }

    /// First byte after the header; children of a container start here.
    pub fn payload_start(&self) -> u64 {
        self.start + self.header_size
    }

    pub fn size(&self) -> u64 {
        self.end - self.start
    }

    pub fn payload_size(&self) -> u64 {
        self.end.saturating_sub(self.payload_start())
    }
}

/// All boxes found at one nesting level, in stream order.
///
/// When a type repeats at the same level every occurrence is kept, but
/// lookups by type return the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxIndex {
    boxes: Vec<Mp4Box>,
}

impl BoxIndex {
    /// First box of the given type.
    pub fn get(&self, name: &[u8; 4]) -> Option<&Mp4Box> {
        self.boxes.iter().find(|b| &b.name_bytes == name)
    }

    /// First box of the given type, or `RequiredBoxMissing` naming `parent`.
    pub fn require(&self, name: &[u8; 4], parent: &str) -> HighlightResult<&Mp4Box> {
        self.get(name)
            .ok_or_else(|| Mp4Error::missing(fourcc_to_string(name), parent).into())
    }

    pub fn contains(&self, name: &[u8; 4]) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mp4Box> {
        self.boxes.iter()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    fn push(&mut self, found: Mp4Box) {
        if self.contains(&found.name_bytes) {
            debug!(
                "Duplicate '{}' box at {}, lookups keep the first one",
                found.name(),
                found.start
            );
        }
        self.boxes.push(found);
    }
}

/// Read a box header from an io source.
///
/// `offset` is the absolute position of the header and is only used in error
/// messages. `available` is the number of bytes the caller allows to be read
/// from this position. Returns `None` on a clean EOF before the first byte.
pub fn read_box_header<R: Read + ?Sized>(
    r: &mut R,
    offset: u64,
    available: u64,
) -> HighlightResult<Option<BoxHeader>> {
    let mut buf = [0u8; BOX_HEADER_SIZE as usize];
    let read = read_up_to(r, &mut buf)?;
    if read == 0 {
        return Ok(None);
    }
    if read < buf.len() {
        return Err(Mp4Error::malformed(
            offset,
            format!("truncated box header: {} of {} bytes", read, BOX_HEADER_SIZE),
        )
        .into());
    }

    let size32 = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let name_bytes = [buf[4], buf[5], buf[6], buf[7]];
    let name = fourcc_to_string(&name_bytes);

    let (size, header_size) = match size32 {
        0 => (0, BOX_HEADER_SIZE),
        1 => {
            if available < LARGE_BOX_HEADER_SIZE {
                return Err(Mp4Error::malformed(
                    offset,
                    format!("largesize header of '{}' crosses the enclosing box", name),
                )
                .into());
            }
            let large = read_u64_be(r).map_err(|e| {
                Mp4Error::malformed(
                    offset,
                    format!("failed to read largesize of '{}': {}", name, e),
                )
            })?;
            if large < LARGE_BOX_HEADER_SIZE {
                return Err(Mp4Error::malformed(
                    offset,
                    format!(
                        "box '{}' declares largesize {} below the {}-byte header",
                        name, large, LARGE_BOX_HEADER_SIZE
                    ),
                )
                .into());
            }
            (large, LARGE_BOX_HEADER_SIZE)
        }
        n if u64::from(n) < BOX_HEADER_SIZE => {
            return Err(Mp4Error::malformed(
                offset,
                format!(
                    "box '{}' declares length {} below the {}-byte header",
                    name, n, BOX_HEADER_SIZE
                ),
            )
            .into());
        }
        n => (u64::from(n), BOX_HEADER_SIZE),
    };

    Ok(Some(BoxHeader {
        name,
        name_bytes,
        size,
        header_size,
    }))
}

/// Collect every box at one nesting level between `start_offset` (inclusive)
/// and `end_offset` (exclusive, `None` reads to EOF).
///
/// Payloads are skipped, not read. A box whose declared length runs past
/// `end_offset` is clipped to it and ends the scan. Fewer than 8 bytes left
/// before `end_offset` also ends the scan; a header cut short by EOF is
/// `MalformedContainer`.
pub fn find_boxes<S: SeekableStream + ?Sized>(
    stream: &mut S,
    start_offset: u64,
    end_offset: Option<u64>,
) -> HighlightResult<BoxIndex> {
    let bound = end_offset.unwrap_or(u64::MAX);
    let mut index = BoxIndex::default();
    let mut offset = start_offset;
    stream.seek(SeekFrom::Start(offset))?;

    while offset < bound {
        let available = bound - offset;
        if available < BOX_HEADER_SIZE {
            debug!(
                "{} trailing bytes at {} are too short for a box header",
                available, offset
            );
            break;
        }

        let header = match read_box_header(stream, offset, available)? {
            Some(header) => header,
            None => break,
        };

        let declared_end = if header.size == 0 {
            match end_offset {
                Some(end) => end,
                None => stream.byte_len()?,
            }
        } else {
            offset.checked_add(header.size).ok_or_else(|| {
                Mp4Error::malformed(
                    offset,
                    format!("box '{}' length {} overflows", header.name, header.size),
                )
            })?
        };

        let end = if declared_end > bound {
            warn!(
                "Box '{}' at {} declares end {} beyond its enclosing range {}, clipping",
                header.name, offset, declared_end, bound
            );
            bound
        } else {
            declared_end
        };

        debug!("Found box '{}' [{}..{})", header.name, offset, end);
        index.push(Mp4Box {
            name_bytes: header.name_bytes,
            start: offset,
            end,
            header_size: header.header_size,
        });

        offset = end;
        if offset < bound {
            stream.seek(SeekFrom::Start(offset))?;
        }
    }

    Ok(index)
}

/// Write a box header to a vector
pub fn write_box_header(output: &mut Vec<u8>, name: &[u8; 4], size: u32) {
    output.extend_from_slice(&size.to_be_bytes());
    output.extend_from_slice(name);
}

/// Write a `largesize` box header: length `1`, the type, then the 64-bit size.
pub fn write_large_box_header(output: &mut Vec<u8>, name: &[u8; 4], size: u64) {
    write_box_header(output, name, 1);
    output.extend_from_slice(&size.to_be_bytes());
}

/// Write the header for a box carrying `payload_len` bytes, switching to the
/// `largesize` form when the total does not fit in 32 bits.
pub fn write_payload_header(output: &mut Vec<u8>, name: &[u8; 4], payload_len: u64) {
    match u32::try_from(payload_len + BOX_HEADER_SIZE) {
        Ok(size) => write_box_header(output, name, size),
        Err(_) => write_large_box_header(output, name, payload_len + LARGE_BOX_HEADER_SIZE),
    }
}

/// Append a complete box holding `payload`.
pub fn write_box(output: &mut Vec<u8>, name: &[u8; 4], payload: &[u8]) {
    write_payload_header(output, name, payload.len() as u64);
    output.extend_from_slice(payload);
}
