//! `Read` and `Write` adapters that drive a [`Translator`] over a byte
//! stream.

use std::io::{self, Read, Write};

use crate::Error;
use crate::translator::Translator;

/// Smallest upstream read the reader issues.
const MIN_READ: usize = 512;

/// Grows `buf` to at least `n` bytes, doubling while small and growing by a
/// quarter once past 1 KiB.
fn ensure_len(buf: &mut Vec<u8>, n: usize) {
    if n <= buf.len() {
        return;
    }
    let mut m = buf.len();
    if m == 0 {
        m = n;
    } else {
        while m < n {
            if m < 1024 {
                m += m;
            } else {
                m += m / 4;
            }
        }
    }
    buf.resize(m, 0);
}

/// Translates everything read from the wrapped reader.
///
/// Upstream errors other than `Interrupted` end the input like EOF does; the
/// error is returned once all output produced before it has been read.
pub struct TranslatingReader<R, T> {
    inner: R,
    translator: T,
    // input[..filled] is untranslated data
    input: Vec<u8>,
    filled: usize,
    // output[out_pos..] is translated data not yet handed out
    output: Vec<u8>,
    out_pos: usize,
    eof: bool,
    flushed: bool,
    error: Option<io::Error>,
}

impl<R: Read, T: Translator> TranslatingReader<R, T> {
    /// Wraps `inner`, translating through `translator`.
    pub fn new(inner: R, translator: T) -> Self {
        Self {
            inner,
            translator,
            input: Vec::new(),
            filled: 0,
            output: Vec::new(),
            out_pos: 0,
            eof: false,
            flushed: false,
            error: None,
        }
    }

    /// The wrapped reader
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutable access to the wrapped reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps the reader, discarding anything buffered.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self, hint: usize) {
        ensure_len(&mut self.input, self.filled + hint.max(MIN_READ));
        loop {
            match self.inner.read(&mut self.input[self.filled..]) {
                Ok(0) => self.eof = true,
                Ok(n) => self.filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.eof = true;
                    self.error = Some(err);
                }
            }
            break;
        }
    }

    fn convert(&mut self) -> io::Result<()> {
        let (consumed, out) = self
            .translator
            .translate(&self.input[..self.filled], self.eof)?;
        self.output.clear();
        self.output.extend_from_slice(out);
        self.out_pos = 0;

        let mut consumed = consumed.min(self.filled);
        if consumed == 0 && self.eof {
            // the translator refuses the tail; drop it so the stream can end
            consumed = self.filled;
        }
        self.input.copy_within(consumed..self.filled, 0);
        self.filled -= consumed;
        if self.eof && self.filled == 0 {
            self.flushed = true;
        }
        Ok(())
    }
}

impl<R: Read, T: Translator> Read for TranslatingReader<R, T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let pending = &self.output[self.out_pos..];
            if !pending.is_empty() {
                let n = pending.len().min(buf.len());
                buf[..n].copy_from_slice(&pending[..n]);
                self.out_pos += n;
                return Ok(n);
            }
            if self.flushed {
                return match self.error.take() {
                    Some(err) => Err(err),
                    None => Ok(0),
                };
            }
            if !self.eof {
                self.fill(buf.len());
            }
            self.convert()?;
        }
    }
}

/// Translates everything written before passing it to the wrapped writer.
///
/// [`close`](Self::close) must be called once writing is done, so that a
/// partial trailing sequence or other translator state reaches the sink.
/// Dropping the writer without closing discards that state.
pub struct TranslatingWriter<W: Write, T> {
    inner: W,
    translator: T,
    // bytes the translator has not consumed yet
    carry: Vec<u8>,
    closed: bool,
}

impl<W: Write, T: Translator> TranslatingWriter<W, T> {
    /// Wraps `inner`, translating through `translator`.
    pub fn new(inner: W, translator: T) -> Self {
        Self {
            inner,
            translator,
            carry: Vec::new(),
            closed: false,
        }
    }

    /// The wrapped writer
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutable access to the wrapped writer
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Flushes translator state to the sink. Later writes fail; calling
    /// `close` again does nothing.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        loop {
            let (consumed, out) = self.translator.translate(&self.carry, true)?;
            let consumed = consumed.min(self.carry.len());
            if out.is_empty() {
                self.carry.drain(..consumed);
                break;
            }
            let written = write_once(&mut self.inner, out)?;
            if written < out.len() {
                return Err(Error::ShortWrite {
                    written,
                    expected: out.len(),
                }
                .into());
            }
            self.carry.drain(..consumed);
            if self.carry.is_empty() {
                break;
            }
        }
        self.carry.clear();
        self.inner.flush()
    }

    /// Closes the writer and returns the sink.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.close()?;
        Ok(self.inner)
    }
}

fn write_once<W: Write>(w: &mut W, data: &[u8]) -> io::Result<usize> {
    loop {
        match w.write(data) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

impl<W: Write, T: Translator> Write for TranslatingWriter<W, T> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "write to closed translating writer",
            ));
        }
        if self.carry.is_empty() {
            let (consumed, out) = self.translator.translate(data, false)?;
            self.inner.write_all(out)?;
            self.carry
                .extend_from_slice(&data[consumed.min(data.len())..]);
        } else {
            // on failure none of `data` may stay buffered
            let held = self.carry.len();
            self.carry.extend_from_slice(data);
            let written = match self.translator.translate(&self.carry, false) {
                Ok((consumed, out)) => self.inner.write_all(out).map(|()| consumed),
                Err(err) => Err(err.into()),
            };
            match written {
                Ok(consumed) => {
                    let consumed = consumed.min(self.carry.len());
                    self.carry.drain(..consumed);
                }
                Err(err) => {
                    self.carry.truncate(held);
                    return Err(err);
                }
            }
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
