#![doc = r#"
Byte-level input sources for the parser.

A [`Source`] wraps any [`ByteReader`] and layers the lifecycle state
machine on top of it: a source is *normal*, *at end of input*, in an
*error* state, or in a terminal *double-error* state reached when a
rewind attempt itself fails. Once a source is in an error state, no
operation touches the underlying reader again until a successful rewind
clears the state.

Readers declare their capabilities through the optional trait methods:
everything can read a byte, but only some inputs can skip ahead without
reading, rewind to the start, or need an explicit close. Skips on
readers without the capability are simulated with repeated reads.
"#]

mod handle;
mod memory;

pub use handle::{FileReader, StreamReader};
pub use memory::BytesReader;

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::error::ParseError;

/// The hard cap on addressable input, 1 GiB.
pub(crate) const MAX_SOURCE_LEN: u64 = 1 << 30;

/// A capability-based byte input.
///
/// Only [`read_byte`](ByteReader::read_byte) is required. The other
/// methods have defaults that declare the capability absent; a reader
/// overrides exactly the ones it can support.
pub trait ByteReader {
    /// Read the next byte, or `Ok(None)` at end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Skip `n` bytes without delivering them. Readers with random
    /// access override this; the default `None` makes [`Source`]
    /// simulate the skip with repeated reads.
    ///
    /// A skip that would pass the end of input must stop there so that
    /// the next read reports end of input.
    fn skip(&mut self, n: u32) -> Option<io::Result<()>> {
        let _ = n;
        None
    }

    /// Whether this reader can rewind to the start of input.
    fn can_rewind(&self) -> bool {
        false
    }

    /// Rewind to the start of input. Only called when
    /// [`can_rewind`](ByteReader::can_rewind) reports `true`.
    fn rewind(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "rewind is not supported by this input source",
        ))
    }

    /// Release the underlying input. An `Err` means the shutdown was
    /// not clean; the reader must still be considered closed.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Lifecycle state of a [`Source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceState {
    /// Reads pass through to the reader.
    Normal,
    /// A read or skip failed. Cleared only by a successful rewind.
    Error,
    /// A rewind attempt failed. Terminal.
    DoubleError,
    /// End of input was observed. Cleared by a successful rewind.
    Eof,
}

#[doc = r#"
An input source handed to [`Parser::read_event`](crate::parser::Parser::read_event).

The source owns its reader and tracks the lifecycle state described in
the module docs. It is constructed from an in-memory buffer, an open
file, a filesystem path, standard input, or any custom [`ByteReader`].
"#]
pub struct Source {
    state: SourceState,
    closed: bool,
    last_error: Option<Arc<io::Error>>,
    reader: Box<dyn ByteReader>,
}

impl Source {
    /// Wrap a custom reader.
    pub fn new<R: ByteReader + 'static>(reader: R) -> Self {
        Self {
            state: SourceState::Normal,
            closed: false,
            last_error: None,
            reader: Box::new(reader),
        }
    }

    /// Read from an in-memory buffer. Rewindable and skippable.
    ///
    /// Buffers beyond the 1 GiB cap are rejected up front with
    /// [`ParseError::HugeFile`].
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, ParseError> {
        Ok(Self::new(BytesReader::new(bytes.into())?))
    }

    /// Read from an open file with random access: the length is cached,
    /// the 1 GiB cap checked, and the handle rewound before parsing.
    pub fn from_file(file: File) -> Result<Self, ParseError> {
        Self::from_handle(file, true)
    }

    /// Read from an open file, stating whether it supports seeking.
    ///
    /// Pipes and other pseudo-files must pass `can_seek = false`; such
    /// sources cannot rewind and enforce the 1 GiB cap with a running
    /// byte counter instead of an up-front length check.
    pub fn from_handle(file: File, can_seek: bool) -> Result<Self, ParseError> {
        if can_seek {
            Ok(Self::new(FileReader::new(file)?))
        } else {
            Ok(Self::new(StreamReader::new(file)))
        }
    }

    /// Open the file at `path` for reading. Failure to open is reported
    /// as [`ParseError::OpenFile`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let file = File::open(path).map_err(|e| ParseError::OpenFile(Arc::new(e)))?;
        Self::from_file(file)
    }

    /// Read from standard input. Not rewindable.
    pub fn from_stdin() -> Self {
        Self::new(StreamReader::new(io::stdin()))
    }

    /// Read one byte, or `Ok(None)` at end of input.
    ///
    /// In an error state this fails without touching the reader; at end
    /// of input it keeps returning `Ok(None)` without touching the
    /// reader.
    pub fn read(&mut self) -> Result<Option<u8>, ParseError> {
        if self.closed {
            return Err(self.closed_error());
        }
        match self.state {
            SourceState::Error | SourceState::DoubleError => Err(self.sticky_error()),
            SourceState::Eof => Ok(None),
            SourceState::Normal => match self.reader.read_byte() {
                Ok(Some(byte)) => Ok(Some(byte)),
                Ok(None) => {
                    self.state = SourceState::Eof;
                    Ok(None)
                }
                Err(err) => Err(self.enter_error(err)),
            },
        }
    }

    /// Skip `n` bytes ahead.
    ///
    /// Succeeds as a no-op for `n = 0` or at end of input. A skip that
    /// would pass the end of input stops there; the next read reports
    /// end of input and the skip still succeeds.
    pub fn skip(&mut self, n: u32) -> Result<(), ParseError> {
        if self.closed {
            return Err(self.closed_error());
        }
        match self.state {
            SourceState::Error | SourceState::DoubleError => Err(self.sticky_error()),
            SourceState::Eof => Ok(()),
            SourceState::Normal if n == 0 => Ok(()),
            SourceState::Normal => {
                if let Some(result) = self.reader.skip(n) {
                    result.map_err(|e| self.enter_error(e))
                } else {
                    // No fast path: consume and discard.
                    for _ in 0..n {
                        match self.reader.read_byte() {
                            Ok(Some(_)) => {}
                            Ok(None) => {
                                self.state = SourceState::Eof;
                                break;
                            }
                            Err(err) => return Err(self.enter_error(err)),
                        }
                    }
                    Ok(())
                }
            }
        }
    }

    /// Whether this source can rewind to the start of input.
    pub fn can_rewind(&self) -> bool {
        !self.closed && self.reader.can_rewind()
    }

    /// Rewind to the start of input, clearing any error or end-of-input
    /// state.
    ///
    /// Fails without a state change when the reader cannot rewind; a
    /// failed rewind *attempt* moves the source into the terminal
    /// double-error state, after which only `close` is useful.
    pub fn rewind(&mut self) -> Result<(), ParseError> {
        if self.closed {
            return Err(self.closed_error());
        }
        if self.state == SourceState::DoubleError {
            return Err(self.sticky_error());
        }
        if !self.reader.can_rewind() {
            return Err(ParseError::io(io::Error::new(
                io::ErrorKind::Unsupported,
                "input source does not support rewinding",
            )));
        }
        match self.reader.rewind() {
            Ok(()) => {
                self.state = SourceState::Normal;
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                let err = Arc::new(err);
                self.last_error = Some(err.clone());
                self.state = SourceState::DoubleError;
                Err(ParseError::Io(err))
            }
        }
    }

    /// Close the source. Idempotent; an `Err` means the shutdown was
    /// not clean, but the source is closed either way.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.reader.close()
    }

    fn enter_error(&mut self, err: io::Error) -> ParseError {
        let err = Arc::new(err);
        self.last_error = Some(err.clone());
        self.state = SourceState::Error;
        ParseError::Io(err)
    }

    fn sticky_error(&self) -> ParseError {
        match &self.last_error {
            Some(err) => ParseError::Io(err.clone()),
            None => ParseError::io(io::Error::new(
                io::ErrorKind::Other,
                "input source is in an error state",
            )),
        }
    }

    fn closed_error(&self) -> ParseError {
        ParseError::io(io::Error::new(
            io::ErrorKind::Other,
            "input source is closed",
        ))
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("state", &self.state)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Drop for Source {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reads a fixed script of outcomes, then fails every read.
    struct Scripted {
        bytes: Vec<u8>,
        pos: usize,
        fail_after: usize,
        rewind_ok: bool,
    }

    impl Scripted {
        fn new(bytes: &[u8], fail_after: usize, rewind_ok: bool) -> Self {
            Self {
                bytes: bytes.to_vec(),
                pos: 0,
                fail_after,
                rewind_ok,
            }
        }
    }

    impl ByteReader for Scripted {
        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            if self.pos >= self.fail_after {
                return Err(io::Error::new(io::ErrorKind::Other, "scripted failure"));
            }
            if self.pos >= self.bytes.len() {
                return Ok(None);
            }
            let byte = self.bytes[self.pos];
            self.pos += 1;
            Ok(Some(byte))
        }

        fn can_rewind(&self) -> bool {
            true
        }

        fn rewind(&mut self) -> io::Result<()> {
            if self.rewind_ok {
                self.pos = 0;
                Ok(())
            } else {
                Err(io::Error::new(io::ErrorKind::Other, "rewind refused"))
            }
        }
    }

    #[test]
    fn eof_is_sticky_until_rewind() {
        use pretty_assertions::assert_eq;
        let mut src = Source::new(Scripted::new(&[1, 2], usize::MAX, true));
        assert_eq!(src.read().unwrap(), Some(1));
        assert_eq!(src.read().unwrap(), Some(2));
        assert_eq!(src.read().unwrap(), None);
        assert_eq!(src.read().unwrap(), None);
        src.rewind().unwrap();
        assert_eq!(src.read().unwrap(), Some(1));
    }

    #[test]
    fn error_is_sticky_and_recoverable_by_rewind() {
        let mut src = Source::new(Scripted::new(&[9, 9, 9], 1, true));
        assert_eq!(src.read().unwrap(), Some(9));
        assert!(src.read().is_err());
        // No further reads reach the reader; the error repeats.
        assert!(src.read().is_err());
        assert!(src.skip(3).is_err());
        src.rewind().unwrap();
        assert_eq!(src.read().unwrap(), Some(9));
    }

    #[test]
    fn failed_rewind_is_terminal() {
        let mut src = Source::new(Scripted::new(&[5], 0, false));
        assert!(src.read().is_err());
        assert!(src.rewind().is_err());
        // Double error: even a would-be-successful rewind is refused.
        assert!(src.rewind().is_err());
        assert!(src.read().is_err());
    }

    #[test]
    fn simulated_skip_stops_at_eof() {
        use pretty_assertions::assert_eq;
        let mut src = Source::new(Scripted::new(&[1, 2, 3], usize::MAX, true));
        src.skip(2).unwrap();
        assert_eq!(src.read().unwrap(), Some(3));
        src.skip(10).unwrap();
        assert_eq!(src.read().unwrap(), None);
    }

    #[test]
    fn zero_skip_succeeds_without_touching_the_reader() {
        let mut src = Source::new(Scripted::new(&[], 0, true));
        src.skip(0).unwrap();
    }

    #[test]
    fn close_is_idempotent() {
        let mut src = Source::new(Scripted::new(&[1], usize::MAX, true));
        src.close().unwrap();
        src.close().unwrap();
        assert!(src.read().is_err());
        assert!(!src.can_rewind());
    }

    #[test]
    fn rewind_unsupported_does_not_change_state() {
        struct NoRewind;
        impl ByteReader for NoRewind {
            fn read_byte(&mut self) -> io::Result<Option<u8>> {
                Ok(Some(0x42))
            }
        }
        let mut src = Source::new(NoRewind);
        assert!(!src.can_rewind());
        assert!(src.rewind().is_err());
        // Still readable: the failed capability probe is not an error state.
        assert_eq!(src.read().unwrap(), Some(0x42));
    }
}
