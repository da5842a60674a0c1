use std::io;

use super::{ByteReader, MAX_SOURCE_LEN};
use crate::error::ParseError;

/// An in-memory input. Supports every optional capability.
pub struct BytesReader {
    data: Vec<u8>,
    pos: usize,
}

impl BytesReader {
    /// Wrap a byte buffer, applying the same 1 GiB cap as the file
    /// sources.
    pub fn new(data: Vec<u8>) -> Result<Self, ParseError> {
        if data.len() as u64 > MAX_SOURCE_LEN {
            return Err(ParseError::HugeFile);
        }
        Ok(Self { data, pos: 0 })
    }
}

impl ByteReader for BytesReader {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.data.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }

    fn skip(&mut self, n: u32) -> Option<io::Result<()>> {
        self.pos = self.pos.saturating_add(n as usize).min(self.data.len());
        Some(Ok(()))
    }

    fn can_rewind(&self) -> bool {
        true
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.pos = 0;
        Ok(())
    }
}
