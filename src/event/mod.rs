#![doc = r#"
The events a MIDI file streams out of the parser.

Each call to [`Parser::read_event`](crate::parser::Parser::read_event)
yields one [`Event`]. Events that carry bulk data (sysex payloads, text,
custom meta-events) borrow the parser's internal buffer, so an event is
valid until the next read; copy out what needs to outlive that.
"#]

mod channel;
pub use channel::*;

pub mod meta;
pub use meta::{KeySignature, MetaMessage, Tempo, TextKind, TimeSignature, Timecode};

use crate::header::Header;

/// One parsed entity from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// The MThd header. Always the first event, exactly once.
    Header(Header),
    /// An unrecognized top-level chunk, identified by its 32-bit ASCII
    /// type code. Its payload has been skipped.
    ForeignChunk(u32),
    /// An MTrk chunk opened. In-track events follow until the End of
    /// Track meta-event.
    TrackStart,
    /// An event inside the currently open track.
    Track(TrackEvent<'a>),
    /// All declared tracks have been read. Repeats forever.
    Eof,
}

impl Event<'_> {
    /// Whether this is the end-of-file event.
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

/// An in-track event: a delta time and the message it delays.
///
/// The delta is the tick count since the previous event of the same
/// track (End of Track included); accumulating deltas into absolute
/// time is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEvent<'a> {
    delta: u32,
    message: TrackMessage<'a>,
}

impl<'a> TrackEvent<'a> {
    pub(crate) const fn new(delta: u32, message: TrackMessage<'a>) -> Self {
        Self { delta, message }
    }

    /// Ticks since the previous event in this track, 0..=2^28-1.
    pub const fn delta(&self) -> u32 {
        self.delta
    }

    /// The message carried by this event.
    pub const fn message(&self) -> &TrackMessage<'a> {
        &self.message
    }
}

/// The kinds of message a track event can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMessage<'a> {
    /// A channel voice message.
    Channel(ChannelVoiceMessage),
    /// A complete System-Exclusive message (0xF0). The payload should
    /// be transmitted with a leading 0xF0 byte.
    SysEx(&'a [u8]),
    /// A System-Exclusive escape (0xF7): a continuation packet or raw
    /// bytes to transmit without a leading 0xF0.
    SysExEscape(&'a [u8]),
    /// A meta-event.
    Meta(MetaMessage<'a>),
}
