use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Stable error codes for embedders that need a language-neutral error
/// surface. Every [`ParseError`] maps onto exactly one of these via
/// [`ParseError::code`], and [`error_message`] translates a code back
/// into a short human-readable string.
pub mod code {
    /// I/O failure in the underlying input source.
    pub const IO: i32 = -1;
    /// Input exceeds the 1 GiB addressable limit.
    pub const HUGE_FILE: i32 = -2;
    /// A file could not be opened at the given path.
    pub const OPEN_FILE: i32 = -3;
    /// End of input in the middle of a structure.
    pub const EOF: i32 = -4;
    /// Chunk length beyond the signed 32-bit range.
    pub const HUGE_CHUNK: i32 = -5;
    /// The file does not begin with an MThd chunk.
    pub const SIGNATURE: i32 = -6;
    /// Malformed header chunk.
    pub const HEADER: i32 = -7;
    /// Header declares an unknown format number.
    pub const MIDI_FMT: i32 = -8;
    /// Header declares zero tracks.
    pub const NO_TRACKS: i32 = -9;
    /// Format 0 header declares more than one track.
    pub const MULTI_TRACK: i32 = -10;
    /// A second MThd chunk was found.
    pub const MULTI_HEAD: i32 = -11;
    /// Event data runs past the end of its track chunk.
    pub const OPEN_TRACK: i32 = -12;
    /// Variable-length integer longer than four bytes.
    pub const LONG_VARINT: i32 = -13;
    /// Data byte in status position with no running status cached.
    pub const RUN_STATUS: i32 = -14;
    /// Sysex or meta payload longer than the 32 KiB buffer cap.
    pub const BIG_PAYLOAD: i32 = -15;
    /// Status byte that is not a valid SMF event introducer.
    pub const BAD_EVENT: i32 = -16;
    /// Malformed Sequence Number meta-event.
    pub const SEQ_NUM: i32 = -17;
    /// Malformed Channel Prefix meta-event.
    pub const CH_PREFIX: i32 = -18;
    /// End of Track meta-event with a payload.
    pub const BAD_EOT: i32 = -19;
    /// Malformed Set Tempo meta-event.
    pub const SET_TEMPO: i32 = -20;
    /// Malformed SMPTE Offset meta-event.
    pub const SMPTE_OFF: i32 = -21;
    /// Malformed Time Signature meta-event.
    pub const TIME_SIG: i32 = -22;
    /// Malformed Key Signature meta-event.
    pub const KEY_SIG: i32 = -23;
    /// MIDI data byte with its high bit set.
    pub const MIDI_DATA: i32 = -24;
}

/// Translate a stable error code into a human-readable message.
///
/// Unknown codes yield a generic message rather than panicking, so this
/// is safe to call on any integer an embedder may have stored.
pub const fn error_message(code: i32) -> &'static str {
    match code {
        code::IO => "I/O error reading MIDI data",
        code::HUGE_FILE => "MIDI file exceeds 1 GiB in size",
        code::OPEN_FILE => "failed to open MIDI file",
        code::EOF => "unexpected end of MIDI file",
        code::HUGE_CHUNK => "MIDI file chunk is too large",
        code::SIGNATURE => "MIDI file lacks the MThd header signature",
        code::HEADER => "MIDI file has an invalid header chunk",
        code::MIDI_FMT => "MIDI file has an unrecognized format type",
        code::NO_TRACKS => "MIDI file declares no tracks",
        code::MULTI_TRACK => "MIDI format 0 file cannot have multiple tracks",
        code::MULTI_HEAD => "MIDI file has more than one header chunk",
        code::OPEN_TRACK => "MIDI event data runs past the end of its track chunk",
        code::LONG_VARINT => "variable-length integer is longer than four bytes",
        code::RUN_STATUS => "data byte encountered with no running status in effect",
        code::BIG_PAYLOAD => "event payload exceeds the 32 KiB buffer limit",
        code::BAD_EVENT => "unrecognized MIDI event status byte",
        code::SEQ_NUM => "malformed Sequence Number meta-event",
        code::CH_PREFIX => "malformed Channel Prefix meta-event",
        code::BAD_EOT => "End of Track meta-event carries a payload",
        code::SET_TEMPO => "malformed Set Tempo meta-event",
        code::SMPTE_OFF => "malformed SMPTE Offset meta-event",
        code::TIME_SIG => "malformed Time Signature meta-event",
        code::KEY_SIG => "malformed Key Signature meta-event",
        code::MIDI_DATA => "MIDI data byte has its high bit set",
        _ => "unknown error",
    }
}

#[doc = r#"
The set of errors that can occur while streaming events out of a MIDI
file.

Errors are sticky at the parser level: once a read fails, every later
read returns the same error again without consuming input. `ParseError`
is therefore `Clone`; I/O causes are shared behind an [`Arc`] so the
original error text survives the re-returns.
"#]
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// The input source failed or is in an error state.
    #[error("I/O error reading MIDI data: {0}")]
    Io(#[source] Arc<io::Error>),
    /// The input is larger than the 1 GiB addressable limit.
    #[error("MIDI file exceeds 1 GiB in size")]
    HugeFile,
    /// A file could not be opened at the given path.
    #[error("failed to open MIDI file: {0}")]
    OpenFile(#[source] Arc<io::Error>),
    /// End of input in the middle of a chunk or event.
    #[error("unexpected end of MIDI file")]
    UnexpectedEof,
    /// A chunk declares a length beyond the signed 32-bit range.
    #[error("chunk length {0} exceeds the supported maximum")]
    HugeChunk(u32),
    /// The first chunk is not `MThd`.
    #[error("expected MThd signature, found chunk type {0:#010x}")]
    Signature(u32),
    /// The header chunk itself is malformed.
    #[error("invalid header chunk: {0}")]
    Header(#[from] HeaderError),
    /// The header declares a format other than 0, 1 or 2.
    #[error("unrecognized MIDI format {0}")]
    UnknownFormat(u16),
    /// The header declares zero tracks.
    #[error("MIDI file declares no tracks")]
    NoTracks,
    /// A format 0 header declares more than one track.
    #[error("format 0 file declares {0} tracks")]
    ExtraTracks(u16),
    /// A second `MThd` chunk appeared after the header.
    #[error("more than one MThd chunk in file")]
    DuplicateHeader,
    /// Event data ran past the declared end of its track chunk.
    #[error("event data runs past the end of its track chunk")]
    UnterminatedTrack,
    /// A variable-length integer carried a continuation bit into a
    /// fifth byte.
    #[error("variable-length integer is longer than four bytes")]
    LongVarint,
    /// A data byte stood in status position with no running status
    /// cached (carries the offending byte).
    #[error("data byte {0:#04x} with no running status in effect")]
    OrphanRunningStatus(u8),
    /// A sysex, text or custom-meta payload exceeded the 32 KiB cap.
    #[error("event payload of {0} bytes exceeds the 32 KiB limit")]
    PayloadOverflow(u32),
    /// A status byte that introduces no known event kind.
    #[error("unrecognized event status byte {0:#04x}")]
    UnknownEvent(u8),
    /// A meta-event failed validation.
    #[error("invalid meta-event: {0}")]
    Meta(#[from] MetaError),
    /// A MIDI data byte had its high bit set.
    #[error("MIDI data byte {0:#04x} has its high bit set")]
    DataByte(u8),
}

impl ParseError {
    /// The stable negative code for this error (see [`code`]).
    pub const fn code(&self) -> i32 {
        match self {
            Self::Io(_) => code::IO,
            Self::HugeFile => code::HUGE_FILE,
            Self::OpenFile(_) => code::OPEN_FILE,
            Self::UnexpectedEof => code::EOF,
            Self::HugeChunk(_) => code::HUGE_CHUNK,
            Self::Signature(_) => code::SIGNATURE,
            Self::Header(_) => code::HEADER,
            Self::UnknownFormat(_) => code::MIDI_FMT,
            Self::NoTracks => code::NO_TRACKS,
            Self::ExtraTracks(_) => code::MULTI_TRACK,
            Self::DuplicateHeader => code::MULTI_HEAD,
            Self::UnterminatedTrack => code::OPEN_TRACK,
            Self::LongVarint => code::LONG_VARINT,
            Self::OrphanRunningStatus(_) => code::RUN_STATUS,
            Self::PayloadOverflow(_) => code::BIG_PAYLOAD,
            Self::UnknownEvent(_) => code::BAD_EVENT,
            Self::Meta(m) => m.code(),
            Self::DataByte(_) => code::MIDI_DATA,
        }
    }

    pub(crate) fn io(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

/// Ways the six-byte header payload can be malformed. All of these map
/// to the [`code::HEADER`] code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The MThd chunk declares fewer than six payload bytes.
    #[error("header chunk is {0} bytes, at least 6 required")]
    TooShort(u32),
    /// The division word decodes to no valid time system.
    #[error("invalid division word {0:#06x}")]
    Division(u16),
}

/// A kind of meta-event validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MetaError {
    /// Sequence Number payload is not exactly two bytes.
    #[error("Sequence Number payload is {0} bytes, expected 2")]
    SequenceNumber(u32),
    /// Channel Prefix payload or value out of range.
    #[error("Channel Prefix: {0}")]
    ChannelPrefix(#[from] ChannelPrefixError),
    /// End of Track carried a payload.
    #[error("End of Track payload is {0} bytes, expected 0")]
    EndOfTrack(u32),
    /// Set Tempo payload or value out of range.
    #[error("Set Tempo: {0}")]
    Tempo(#[from] TempoError),
    /// SMPTE Offset payload or field out of range.
    #[error("SMPTE Offset: {0}")]
    Smpte(#[from] SmpteError),
    /// Time Signature payload or field out of range.
    #[error("Time Signature: {0}")]
    TimeSignature(#[from] TimeSigError),
    /// Key Signature payload or field out of range.
    #[error("Key Signature: {0}")]
    KeySignature(#[from] KeySigError),
}

impl MetaError {
    /// The stable negative code for this meta-event error.
    pub const fn code(&self) -> i32 {
        match self {
            Self::SequenceNumber(_) => code::SEQ_NUM,
            Self::ChannelPrefix(_) => code::CH_PREFIX,
            Self::EndOfTrack(_) => code::BAD_EOT,
            Self::Tempo(_) => code::SET_TEMPO,
            Self::Smpte(_) => code::SMPTE_OFF,
            Self::TimeSignature(_) => code::TIME_SIG,
            Self::KeySignature(_) => code::KEY_SIG,
        }
    }
}

/// Channel Prefix meta-event failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelPrefixError {
    /// Payload is not exactly one byte.
    #[error("payload is {0} bytes, expected 1")]
    Length(u32),
    /// The channel byte is above 15.
    #[error("channel {0} is out of range")]
    Channel(u8),
}

/// Set Tempo meta-event failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TempoError {
    /// Payload is not exactly three bytes.
    #[error("payload is {0} bytes, expected 3")]
    Length(u32),
    /// A beat duration of zero microseconds.
    #[error("beat duration of zero microseconds")]
    Zero,
}

/// SMPTE Offset meta-event failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SmpteError {
    /// Payload is not exactly five bytes.
    #[error("payload is {0} bytes, expected 5")]
    Length(u32),
    /// Hour above 23.
    #[error("hour {0} is out of range")]
    Hour(u8),
    /// Minute above 59.
    #[error("minute {0} is out of range")]
    Minute(u8),
    /// Second above 59.
    #[error("second {0} is out of range")]
    Second(u8),
    /// Frame above 29.
    #[error("frame {0} is out of range")]
    Frame(u8),
    /// Fractional frame above 99.
    #[error("fractional frame {0} is out of range")]
    Subframe(u8),
    /// Frame number at or above the header's SMPTE frame rate.
    #[error("frame {frame} is out of range at {fps} fps")]
    FrameRate {
        /// The offending frame number.
        frame: u8,
        /// The nominal frame rate from the file header.
        fps: u8,
    },
    /// A timecode that drop-frame numbering skips.
    #[error("frame {frame} of minute {minute} does not exist in drop-frame timecode")]
    DropFrame {
        /// The minute field of the timecode.
        minute: u8,
        /// The skipped frame number (0 or 1).
        frame: u8,
    },
}

/// Time Signature meta-event failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeSigError {
    /// Payload is not exactly four bytes.
    #[error("payload is {0} bytes, expected 4")]
    Length(u32),
    /// Denominator exponent above 15.
    #[error("denominator exponent {0} is out of range")]
    Exponent(u8),
    /// Denominator above 1024.
    #[error("denominator {0} exceeds 1024")]
    Denominator(u16),
    /// A numerator of zero.
    #[error("numerator of zero")]
    ZeroNumerator,
    /// Zero MIDI clocks per metronome click.
    #[error("zero clocks per metronome click")]
    ZeroClick,
    /// Zero 32nd-notes per beat.
    #[error("zero 32nd-notes per beat")]
    ZeroBeatUnit,
}

/// Key Signature meta-event failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeySigError {
    /// Payload is not exactly two bytes.
    #[error("payload is {0} bytes, expected 2")]
    Length(u32),
    /// Accidental count outside -7..=7.
    #[error("accidental count {0} is out of range")]
    Key(i8),
    /// Mode byte other than 0 or 1.
    #[error("mode byte {0} is neither major nor minor")]
    Mode(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_and_distinct() {
        use pretty_assertions::assert_eq;
        let samples: Vec<ParseError> = vec![
            ParseError::io(io::Error::new(io::ErrorKind::Other, "boom")),
            ParseError::HugeFile,
            ParseError::OpenFile(Arc::new(io::Error::new(io::ErrorKind::NotFound, "gone"))),
            ParseError::UnexpectedEof,
            ParseError::HugeChunk(0x8000_0000),
            ParseError::Signature(0x5249_4646),
            ParseError::Header(HeaderError::TooShort(2)),
            ParseError::UnknownFormat(3),
            ParseError::NoTracks,
            ParseError::ExtraTracks(2),
            ParseError::DuplicateHeader,
            ParseError::UnterminatedTrack,
            ParseError::LongVarint,
            ParseError::OrphanRunningStatus(0x40),
            ParseError::PayloadOverflow(40_000),
            ParseError::UnknownEvent(0xF4),
            ParseError::Meta(MetaError::SequenceNumber(3)),
            ParseError::Meta(ChannelPrefixError::Channel(16).into()),
            ParseError::Meta(MetaError::EndOfTrack(1)),
            ParseError::Meta(TempoError::Zero.into()),
            ParseError::Meta(SmpteError::Hour(24).into()),
            ParseError::Meta(TimeSigError::ZeroNumerator.into()),
            ParseError::Meta(KeySigError::Key(8).into()),
            ParseError::DataByte(0x80),
        ];
        let codes: Vec<i32> = samples.iter().map(ParseError::code).collect();
        assert_eq!(codes, (1..=24).map(|n| -n).collect::<Vec<_>>());
    }

    #[test]
    fn every_code_has_a_message() {
        for code in (-24..=-1).chain([0, 17]) {
            assert!(!error_message(code).is_empty());
        }
        assert_eq!(error_message(0), "unknown error");
    }
}
