//! Streaming record reader
//!
//! Splits any [`BufRead`] on an exact, literal delimiter string. Each chunk is
//! the bytes up to (not including) the next delimiter occurrence. Bytes left
//! after the final delimiter are produced as a last chunk only when non-empty,
//! so `"a\n\nb\n\n"` and `"a\n\nb"` both split into `a`, `b`.
//!
//! Chunks are raw bytes and are never decoded, so corpora in Latin-1 or any
//! other encoding split the same way as UTF-8 ones.
//!
//! [`DelimitedReader`] yields every chunk, including an empty final one such
//! as the one produced by a file ending in an extra blank record.
//! [`Entries`] layers the entry rule on top: a final empty chunk is not an
//! entry. [`count_entries`] applies the same rule while counting.

use std::io::{self, BufRead};

use crate::core::error::{ensure_delimiter, Result};
use crate::core::Entry;

/// Iterator over the raw delimiter-separated chunks of a reader
pub struct DelimitedReader<R> {
    reader: R,
    delimiter: Vec<u8>,
    terminator: u8,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> DelimitedReader<R> {
    /// Wrap `reader`, splitting on `delimiter`
    ///
    /// Fails with `InvalidArgument` when the delimiter is empty.
    pub fn new(reader: R, delimiter: &str) -> Result<Self> {
        ensure_delimiter(delimiter)?;
        let delimiter = delimiter.as_bytes().to_vec();
        let terminator = delimiter[delimiter.len() - 1];
        Ok(Self {
            reader,
            delimiter,
            terminator,
            buf: Vec::new(),
            done: false,
        })
    }

    /// Read the next chunk's bytes, or `None` at end of input.
    fn read_chunk(&mut self) -> io::Result<Option<Entry>> {
        // Every delimiter occurrence ends with `terminator`, so checking the
        // buffer suffix after each `read_until` finds the leftmost match.
        loop {
            let read = self.reader.read_until(self.terminator, &mut self.buf)?;
            if read == 0 {
                self.done = true;
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(std::mem::take(&mut self.buf)));
            }
            if self.buf.ends_with(&self.delimiter) {
                let len = self.buf.len() - self.delimiter.len();
                self.buf.truncate(len);
                return Ok(Some(std::mem::take(&mut self.buf)));
            }
        }
    }
}

impl<R: BufRead> Iterator for DelimitedReader<R> {
    type Item = io::Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Iterator over the entries of a reader: the raw chunks minus a final empty one
pub struct Entries<R> {
    chunks: DelimitedReader<R>,
    lookahead: Option<io::Result<Entry>>,
}

impl<R: BufRead> Entries<R> {
    pub fn new(reader: R, delimiter: &str) -> Result<Self> {
        Ok(Self {
            chunks: DelimitedReader::new(reader, delimiter)?,
            lookahead: None,
        })
    }
}

impl<R: BufRead> Iterator for Entries<R> {
    type Item = io::Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = match self.lookahead.take().or_else(|| self.chunks.next())? {
            Ok(chunk) => chunk,
            Err(e) => return Some(Err(e)),
        };
        if !current.is_empty() {
            return Some(Ok(current));
        }

        // An empty chunk only counts when something follows it.
        match self.chunks.next() {
            None => None,
            Some(following) => {
                self.lookahead = Some(following);
                Some(Ok(current))
            }
        }
    }
}

/// Count the entries of a reader
///
/// Every chunk counts once; if the last chunk read is empty it is discounted.
/// An empty input has no chunks and counts 0.
pub fn count_entries<R: BufRead>(reader: R, delimiter: &str) -> Result<u64> {
    let mut count: u64 = 0;
    let mut last_empty = false;
    for chunk in DelimitedReader::new(reader, delimiter)? {
        let chunk = chunk?;
        last_empty = chunk.is_empty();
        count += 1;
    }
    if last_empty {
        count = count.saturating_sub(1);
    }
    Ok(count)
}
