use memchr::{memchr, memchr2, memchr3};
use std::io::{self, ErrorKind, Read};

const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Buffered byte source used by the tokenizer.
///
/// Offers the four primitives the grammars are written against: read one
/// byte, peek a few bytes, push one byte back, and end-of-stream detection.
pub struct ByteStream<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    pos: usize,
    cap: usize,
    eof: bool,
}

impl<R: Read> ByteStream<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, reader)
    }

    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        ByteStream {
            reader,
            buffer: vec![0; capacity.max(1)],
            pos: 0,
            cap: 0,
            eof: false,
        }
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.cap - self.pos
    }

    fn fill_buffer(&mut self) -> io::Result<usize> {
        if self.eof {
            return Ok(0);
        }

        if self.pos > 0 {
            self.buffer.copy_within(self.pos..self.cap, 0);
            self.cap -= self.pos;
            self.pos = 0;
        }

        loop {
            match self.reader.read(&mut self.buffer[self.cap..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(0);
                }
                Ok(n) => {
                    self.cap += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn ensure_buffer(&mut self, min_size: usize) -> io::Result<bool> {
        if self.buffer.len() < min_size {
            self.buffer.resize(min_size, 0);
        }
        while self.available() < min_size && !self.eof {
            self.fill_buffer()?;
        }
        Ok(self.available() >= min_size)
    }

    /// Reads one byte, `None` at end of stream.
    #[inline]
    pub fn getc(&mut self) -> io::Result<Option<u8>> {
        if self.pos == self.cap && self.fill_buffer()? == 0 {
            return Ok(None);
        }
        let b = self.buffer[self.pos];
        self.pos += 1;
        Ok(Some(b))
    }

    /// Pushes one byte back so the next `getc` returns it.
    pub fn ungetc(&mut self, b: u8) {
        if self.pos > 0 {
            self.pos -= 1;
            self.buffer[self.pos] = b;
            return;
        }
        if self.cap == self.buffer.len() {
            self.buffer.push(0);
        }
        self.buffer.copy_within(0..self.cap, 1);
        self.buffer[0] = b;
        self.cap += 1;
    }

    /// Returns up to `n` upcoming bytes without consuming them. Shorter only
    /// when the stream ends first.
    pub fn peek(&mut self, n: usize) -> io::Result<&[u8]> {
        self.ensure_buffer(n)?;
        let end = self.pos + n.min(self.available());
        Ok(&self.buffer[self.pos..end])
    }

    pub fn is_eof(&mut self) -> io::Result<bool> {
        Ok(self.pos == self.cap && self.fill_buffer()? == 0)
    }

    /// Discards bytes through the first occurrence of any of `delims` and
    /// returns the delimiter found, `None` if the stream ended first.
    pub fn skip_to_any(&mut self, delims: &[u8]) -> io::Result<Option<u8>> {
        loop {
            if self.pos == self.cap && self.fill_buffer()? == 0 {
                return Ok(None);
            }
            let window = &self.buffer[self.pos..self.cap];
            let hit = match *delims {
                [a] => memchr(a, window),
                [a, b] => memchr2(a, b, window),
                [a, b, c] => memchr3(a, b, c, window),
                _ => window.iter().position(|x| delims.contains(x)),
            };
            match hit {
                Some(i) => {
                    let b = window[i];
                    self.pos += i + 1;
                    return Ok(Some(b));
                }
                None => self.pos = self.cap,
            }
        }
    }
}
