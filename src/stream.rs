//! Chunked byte streams.
//!
//! The codec never sees a contiguous buffer. It pulls input a chunk at a time
//! through [`InputStream`] and hands unconsumed bytes back with
//! [`InputStream::back_up`]; output goes through [`OutputStream`], which lends
//! writable buffers and takes back the unused tail. Chunk boundaries are
//! invisible in the encoded text.
//!
//! Implementations provided here:
//!
//! - [`SliceInput`]: an in-memory slice, delivered in chunks of a chosen size
//! - [`ReaderInput`]: any [`io::Read`], buffered
//! - `Vec<u8>`: growable in-memory output
//! - [`SliceOutput`]: fixed-capacity output that fails once full
//! - [`WriterOutput`]: any [`io::Write`], buffered
//!
//! ## Examples
//!
//! ```rust
//! use protojs::stream::{InputStream, SliceInput};
//!
//! let mut input = SliceInput::with_chunk_size(b"abcdef", 4);
//! assert_eq!(input.next_chunk().unwrap(), b"abcd");
//! input.back_up(2);
//! assert_eq!(input.next_chunk().unwrap(), b"cd");
//! assert_eq!(input.next_chunk().unwrap(), b"ef");
//! assert!(input.next_chunk().unwrap().is_empty());
//! ```

use std::io::{self, Read, Write};

const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;
const VEC_GROWTH: usize = 256;

/// A forward-only chunked byte source.
pub trait InputStream {
    /// Returns the next chunk. An empty slice signals end of stream.
    fn next_chunk(&mut self) -> io::Result<&[u8]>;

    /// Returns the last `count` bytes of the most recent chunk to the stream.
    ///
    /// `count` must not exceed the length of that chunk; the returned bytes
    /// are delivered again by the next call to [`next_chunk`](Self::next_chunk).
    fn back_up(&mut self, count: usize);
}

/// A forward-only chunked byte sink.
pub trait OutputStream {
    /// Returns the next writable buffer. It is never empty on success.
    fn next_buffer(&mut self) -> io::Result<&mut [u8]>;

    /// Marks the last `count` bytes of the most recent buffer as unused.
    fn back_up(&mut self, count: usize);

    /// Writes all of `data`, spanning as many buffers as needed.
    fn write_all(&mut self, mut data: &[u8]) -> io::Result<()> {
        while !data.is_empty() {
            let buffer = self.next_buffer()?;
            let n = buffer.len().min(data.len());
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "output stream returned an empty buffer",
                ));
            }
            buffer[..n].copy_from_slice(&data[..n]);
            let unused = buffer.len() - n;
            if unused > 0 {
                self.back_up(unused);
            }
            data = &data[n..];
        }
        Ok(())
    }
}

impl<T: InputStream + ?Sized> InputStream for &mut T {
    fn next_chunk(&mut self) -> io::Result<&[u8]> {
        (**self).next_chunk()
    }

    fn back_up(&mut self, count: usize) {
        (**self).back_up(count);
    }
}

impl<T: OutputStream + ?Sized> OutputStream for &mut T {
    fn next_buffer(&mut self) -> io::Result<&mut [u8]> {
        (**self).next_buffer()
    }

    fn back_up(&mut self, count: usize) {
        (**self).back_up(count);
    }
}

/// In-memory input delivered in chunks of at most `chunk_size` bytes.
#[derive(Debug, Clone)]
pub struct SliceInput<'a> {
    data: &'a [u8],
    position: usize,
    chunk_size: usize,
    last_chunk: usize,
}

impl<'a> SliceInput<'a> {
    /// Delivers the whole slice as one chunk.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_chunk_size(data, data.len().max(1))
    }

    /// Delivers the slice in chunks of `chunk_size` bytes (at least one).
    pub fn with_chunk_size(data: &'a [u8], chunk_size: usize) -> Self {
        SliceInput {
            data,
            position: 0,
            chunk_size: chunk_size.max(1),
            last_chunk: 0,
        }
    }

    /// Bytes handed out so far and not backed up.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The part of the slice not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.position..]
    }
}

impl InputStream for SliceInput<'_> {
    fn next_chunk(&mut self) -> io::Result<&[u8]> {
        let start = self.position;
        let end = (start + self.chunk_size).min(self.data.len());
        self.position = end;
        self.last_chunk = end - start;
        Ok(&self.data[start..end])
    }

    fn back_up(&mut self, count: usize) {
        debug_assert!(count <= self.last_chunk, "back_up beyond last chunk");
        let count = count.min(self.last_chunk);
        self.position -= count;
        self.last_chunk -= count;
    }
}

/// Buffered input over any [`io::Read`].
#[derive(Debug)]
pub struct ReaderInput<R> {
    reader: R,
    buffer: Box<[u8]>,
    start: usize,
    end: usize,
    last_chunk: usize,
}

impl<R: Read> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        ReaderInput {
            reader,
            buffer: vec![0; capacity.max(1)].into_boxed_slice(),
            start: 0,
            end: 0,
            last_chunk: 0,
        }
    }

    /// Returns the reader. Bytes still buffered are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> InputStream for ReaderInput<R> {
    fn next_chunk(&mut self) -> io::Result<&[u8]> {
        if self.start == self.end {
            self.start = 0;
            self.end = loop {
                match self.reader.read(&mut self.buffer) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
        }
        let chunk = self.start..self.end;
        self.last_chunk = self.end - self.start;
        self.start = self.end;
        Ok(&self.buffer[chunk])
    }

    fn back_up(&mut self, count: usize) {
        debug_assert!(count <= self.last_chunk, "back_up beyond last chunk");
        let count = count.min(self.last_chunk);
        self.start -= count;
        self.last_chunk -= count;
    }
}

impl OutputStream for Vec<u8> {
    fn next_buffer(&mut self) -> io::Result<&mut [u8]> {
        let start = self.len();
        let grow = self.capacity().saturating_sub(start).max(VEC_GROWTH);
        self.resize(start + grow, 0);
        Ok(&mut self[start..])
    }

    fn back_up(&mut self, count: usize) {
        let len = self.len().saturating_sub(count);
        self.truncate(len);
    }
}

/// Fixed-capacity output over a caller-provided buffer.
///
/// Once the buffer is full every further write fails with
/// [`io::ErrorKind::WriteZero`].
#[derive(Debug)]
pub struct SliceOutput<'a> {
    buffer: &'a mut [u8],
    position: usize,
}

impl<'a> SliceOutput<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        SliceOutput {
            buffer,
            position: 0,
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buffer[..self.position]
    }
}

impl OutputStream for SliceOutput<'_> {
    fn next_buffer(&mut self) -> io::Result<&mut [u8]> {
        if self.position == self.buffer.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "output buffer is full",
            ));
        }
        let start = self.position;
        self.position = self.buffer.len();
        Ok(&mut self.buffer[start..])
    }

    fn back_up(&mut self, count: usize) {
        self.position = self.position.saturating_sub(count);
    }
}

/// Buffered output over any [`io::Write`].
///
/// Call [`finish`](Self::finish) to flush the buffered tail.
#[derive(Debug)]
pub struct WriterOutput<W: Write> {
    writer: W,
    buffer: Box<[u8]>,
    len: usize,
}

impl<W: Write> WriterOutput<W> {
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        WriterOutput {
            writer,
            buffer: vec![0; capacity.max(1)].into_boxed_slice(),
            len: 0,
        }
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        self.writer.write_all(&self.buffer[..self.len])?;
        self.len = 0;
        Ok(())
    }

    /// Flushes buffered bytes and returns the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.flush_buffer()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> OutputStream for WriterOutput<W> {
    fn next_buffer(&mut self) -> io::Result<&mut [u8]> {
        if self.len == self.buffer.len() {
            self.flush_buffer()?;
        }
        let start = self.len;
        self.len = self.buffer.len();
        Ok(&mut self.buffer[start..])
    }

    fn back_up(&mut self, count: usize) {
        self.len = self.len.saturating_sub(count);
    }
}
