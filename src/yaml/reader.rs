//! The reader side of the libyaml-shaped callback contract (spec §6): "A
//! reader callback fills a buffer up to a requested size, returns the
//! bytes-read count ... 1-with-0-bytes-read on EOF." We express that as an
//! ordinary [`std::io::Read`] blanket implementation so callers can hand in
//! a `File`, an in-memory cursor, or a socket without this crate depending
//! on any of those concrete types.

use std::io::{self, Read};

pub trait YamlReader {
    /// Reads the full input into a buffer. A read callback that signals
    /// end-of-input with a zero-length, error-free read is treated as
    /// end-of-stream (spec §5, "Cancellation").
    fn read_all(&mut self) -> io::Result<Vec<u8>>;
}

impl<T: Read> YamlReader for T {
    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }
}
