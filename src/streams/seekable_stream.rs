use std::fs::{File, Metadata};
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// A random-access byte source the box reader and highlight scanner operate on.
///
/// Implemented for every `Read + Seek` type, so in-memory `Cursor`s and local
/// files are interchangeable.
pub trait SeekableStream: Read + Seek {
    /// Total length of the stream. The current position is preserved.
    fn byte_len(&mut self) -> io::Result<u64> {
        let pos = self.stream_position()?;
        let len = self.seek(SeekFrom::End(0))?;
        if pos != len {
            self.seek(SeekFrom::Start(pos))?;
        }
        Ok(len)
    }
}

impl<T: Read + Seek + ?Sized> SeekableStream for T {}

/// Buffered local file wrapper
pub struct LocalSeekableStream {
    inner: BufReader<File>,
    metadata: Metadata,
}

impl LocalSeekableStream {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        Ok(LocalSeekableStream {
            inner: BufReader::new(file),
            metadata,
        })
    }

    /// Filesystem metadata captured when the file was opened.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Read for LocalSeekableStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for LocalSeekableStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
