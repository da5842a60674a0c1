use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};

use super::{ByteReader, MAX_SOURCE_LEN};
use crate::error::ParseError;

/// A seekable file input.
///
/// The file length is measured once at construction, which both rejects
/// inputs past the 1 GiB cap early and lets skips clamp at the end of
/// the file instead of seeking past it.
pub struct FileReader {
    inner: BufReader<File>,
    len: u64,
    pos: u64,
}

impl FileReader {
    /// Measure and rewind `file`, failing with [`ParseError::HugeFile`]
    /// past the 1 GiB cap.
    pub fn new(mut file: File) -> Result<Self, ParseError> {
        let len = file.seek(SeekFrom::End(0)).map_err(ParseError::io)?;
        if len > MAX_SOURCE_LEN {
            return Err(ParseError::HugeFile);
        }
        file.seek(SeekFrom::Start(0)).map_err(ParseError::io)?;
        Ok(Self {
            inner: BufReader::new(file),
            len,
            pos: 0,
        })
    }
}

impl ByteReader for FileReader {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pos >= self.len {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.pos += 1;
                    return Ok(Some(byte[0]));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    fn skip(&mut self, n: u32) -> Option<io::Result<()>> {
        // Clamp so a skip never positions past the end of the file.
        let n = u64::from(n).min(self.len - self.pos);
        if n == 0 {
            return Some(Ok(()));
        }
        Some(match self.inner.seek_relative(n as i64) {
            Ok(()) => {
                self.pos += n;
                Ok(())
            }
            Err(err) => Err(err),
        })
    }

    fn can_rewind(&self) -> bool {
        true
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.pos = 0;
        Ok(())
    }
}

/// A sequential-only input over any [`Read`] stream (a pipe, standard
/// input, a non-seekable file).
///
/// With no way to measure the input, the 1 GiB cap is enforced with a
/// running byte counter; exceeding it is an I/O error rather than end
/// of input.
pub struct StreamReader<R> {
    inner: BufReader<R>,
    count: u64,
}

impl<R: Read> StreamReader<R> {
    /// Wrap a sequential stream.
    pub fn new(stream: R) -> Self {
        Self {
            inner: BufReader::new(stream),
            count: 0,
        }
    }
}

impl<R: Read> ByteReader for StreamReader<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.count >= MAX_SOURCE_LEN {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "input exceeds 1 GiB in size",
            ));
        }
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.count += 1;
                    return Ok(Some(byte[0]));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(bytes: &[u8]) -> File {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "smfstream-handle-test-{}-{}",
            std::process::id(),
            bytes.len()
        ));
        {
            let mut f = File::create(&path).unwrap();
            f.write_all(bytes).unwrap();
        }
        File::open(&path).unwrap()
    }

    #[test]
    fn file_reader_reads_and_clamps_skips() {
        use pretty_assertions::assert_eq;
        let file = temp_file(&[0x4D, 0x54, 0x68, 0x64]);
        let mut reader = FileReader::new(file).unwrap();
        assert_eq!(reader.read_byte().unwrap(), Some(0x4D));
        reader.skip(2).unwrap().unwrap();
        assert_eq!(reader.read_byte().unwrap(), Some(0x64));
        // Past the end: clamped, next read reports end of input.
        reader.skip(100).unwrap().unwrap();
        assert_eq!(reader.read_byte().unwrap(), None);
    }

    #[test]
    fn file_reader_rewinds() {
        use pretty_assertions::assert_eq;
        let file = temp_file(&[1, 2, 3]);
        let mut reader = FileReader::new(file).unwrap();
        assert_eq!(reader.read_byte().unwrap(), Some(1));
        reader.rewind().unwrap();
        assert_eq!(reader.read_byte().unwrap(), Some(1));
    }

    #[test]
    fn stream_reader_has_no_optional_capabilities() {
        let mut reader = StreamReader::new(&[1u8, 2, 3][..]);
        assert!(!reader.can_rewind());
        assert!(reader.skip(1).is_none());
        assert!(reader.rewind().is_err());
    }
}
