use crate::bits::reader::{fourcc_to_string, read_fourcc};
use crate::errors::{HighlightResult, Mp4Error};
use crate::mp4::r#box::{BoxIndex, Mp4Box};
use crate::streams::seekable_stream::SeekableStream;
use log::debug;
use serde::Serialize;
use std::io::SeekFrom;

/// Container format detected from the `ftyp` major brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ContainerFormat {
    MP4,
    M4V,
    ThreeGP,
    ThreeG2,
    MOV,
    Unknown(String),
}

impl ContainerFormat {
    pub fn name(&self) -> &str {
        match self {
            ContainerFormat::MP4 => "MP4",
            ContainerFormat::M4V => "M4V",
            ContainerFormat::ThreeGP => "3GP",
            ContainerFormat::ThreeG2 => "3G2",
            ContainerFormat::MOV => "MOV",
            ContainerFormat::Unknown(s) => s,
        }
    }
}

/// Return the root `ftyp` box, which must open the file at offset 0.
pub fn require_root_ftyp(root: &BoxIndex) -> HighlightResult<&Mp4Box> {
    match root.get(b"ftyp") {
        Some(ftyp) if ftyp.start == 0 => Ok(ftyp),
        Some(ftyp) => Err(Mp4Error::NotAContainer {
            message: format!("ftyp box found at offset {} instead of 0", ftyp.start),
        }
        .into()),
        None => Err(Mp4Error::NotAContainer {
            message: "no ftyp box at offset 0".to_string(),
        }
        .into()),
    }
}

/// Read the major brand of an `ftyp` box and map it to a container format
pub fn read_container_format<S: SeekableStream + ?Sized>(
    stream: &mut S,
    ftyp: &Mp4Box,
) -> HighlightResult<ContainerFormat> {
    if ftyp.payload_size() < 4 {
        debug!("ftyp box carries no major brand");
        return Ok(ContainerFormat::Unknown(String::new()));
    }
    stream.seek(SeekFrom::Start(ftyp.payload_start()))?;
    let brand = read_fourcc(stream)
        .map_err(|e| Mp4Error::malformed(ftyp.start, format!("failed to read major brand: {}", e)))?;
    Ok(parse_ftyp_brand(&brand))
}

/// Parse ftyp major brand and return corresponding container format
pub fn parse_ftyp_brand(major_brand: &[u8; 4]) -> ContainerFormat {
    match major_brand {
        b"isom" | b"mp41" | b"mp42" | b"iso2" | b"iso4" | b"iso5" | b"iso6" | b"avc1" => {
            ContainerFormat::MP4
        }
        b"M4V " | b"M4VH" | b"M4VP" => ContainerFormat::M4V,
        b"3gp4" | b"3gp5" | b"3gp6" | b"3gp7" | b"3ge6" | b"3ge7" | b"3gg6" => {
            ContainerFormat::ThreeGP
        }
        b"3g2a" | b"3g2b" | b"3g2c" => ContainerFormat::ThreeG2,
        b"qt  " => ContainerFormat::MOV,
        other => ContainerFormat::Unknown(fourcc_to_string(other)),
    }
}
