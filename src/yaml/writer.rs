//! The writer side of the libyaml-shaped callback contract (spec §6): "A
//! writer callback accepts a byte-buffer and returns 1 on success (0 on
//! failure)." Expressed as a blanket [`std::io::Write`] implementation.

use std::io::{self, Write};

pub trait YamlWriter {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()>;
}

impl<T: Write> YamlWriter for T {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        self.write_all(buf)
    }
}
