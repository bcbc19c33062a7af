//! Readers that deliver their data in awkward pieces.

#![allow(dead_code)]

use std::io::{self, Read};

use charset_stream::{Charsets, resource};

/// A context over the bundled data only.
pub fn bundled() -> Charsets {
    Charsets::builder().loader(resource::builtin()).build()
}

/// Reads one byte per call.
pub struct OneByteReader<R>(pub R);

impl<R: Read> Read for OneByteReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.0.read(&mut buf[..1])
    }
}

/// Reads half of what was asked for, rounding up.
pub struct HalfReader<R>(pub R);

impl<R: Read> Read for HalfReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let half = buf.len().div_ceil(2);
        self.0.read(&mut buf[..half])
    }
}

/// Fails with `Interrupted` before every successful read.
pub struct InterruptingReader<R> {
    inner: R,
    interrupt: bool,
}

impl<R> InterruptingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            interrupt: true,
        }
    }
}

impl<R: Read> Read for InterruptingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if !self.interrupt {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "try again"));
        }
        self.inner.read(buf)
    }
}

/// Serves the given chunks one per call, regardless of buffer size as long
/// as it fits.
pub struct ChunkedReader {
    chunks: Vec<Vec<u8>>,
    next: usize,
    offset: usize,
}

impl ChunkedReader {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks,
            next: 0,
            offset: 0,
        }
    }

    /// Splits `data` into pieces of `size` bytes.
    pub fn with_chunk_size(data: &[u8], size: usize) -> Self {
        Self::new(data.chunks(size.max(1)).map(<[u8]>::to_vec).collect())
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while let Some(chunk) = self.chunks.get(self.next) {
            let rest = &chunk[self.offset..];
            if rest.is_empty() {
                self.next += 1;
                self.offset = 0;
                continue;
            }
            let n = rest.len().min(buf.len());
            buf[..n].copy_from_slice(&rest[..n]);
            self.offset += n;
            return Ok(n);
        }
        Ok(0)
    }
}

pub type Wrap = fn(Box<dyn Read>) -> Box<dyn Read>;

fn plain(r: Box<dyn Read>) -> Box<dyn Read> {
    r
}

fn one_byte(r: Box<dyn Read>) -> Box<dyn Read> {
    Box::new(OneByteReader(r))
}

fn half(r: Box<dyn Read>) -> Box<dyn Read> {
    Box::new(HalfReader(r))
}

fn interrupting(r: Box<dyn Read>) -> Box<dyn Read> {
    Box::new(InterruptingReader::new(r))
}

/// Every reader shape the streaming tests run through.
pub fn reader_shapes() -> Vec<(&'static str, Wrap)> {
    vec![
        ("plain", plain as Wrap),
        ("one-byte", one_byte as Wrap),
        ("half", half as Wrap),
        ("interrupting", interrupting as Wrap),
    ]
}
