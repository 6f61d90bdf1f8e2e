/*
# Bits Reader Module

 Byte-aligned readers for the big-endian integers and four-character codes used by
 ISO base media boxes and the GPMF stream embedded in them.

 Key components:
 - `read_up_to()`: fills a buffer until it is full or the source is exhausted, so callers
   can tell a clean EOF (0 bytes) apart from a truncated read
 - `read_u32_be()`, `read_u64_be()`, `read_fourcc()`: exact reads that fail on EOF
*/

use std::io::{self, ErrorKind, Read};

/// Read into `buf` until it is full or the source reports EOF.
/// Returns the number of bytes read.
pub fn read_up_to<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read a 32-bit big endian value from `r`.
pub fn read_u32_be<R: Read + ?Sized>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Read a 64-bit big endian value from `r`.
pub fn read_u64_be<R: Read + ?Sized>(r: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_be_bytes(buf))
}

/// Read a four-character code.
pub fn read_fourcc<R: Read + ?Sized>(r: &mut R) -> io::Result<[u8; 4]> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

/// Render a four-character code for messages, replacing non-printable bytes.
pub fn fourcc_to_string(code: &[u8; 4]) -> String {
    code.iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}
