mod key_signature;
pub use key_signature::*;

mod time_signature;
pub use time_signature::*;

mod timecode;
pub use timecode::*;

use crate::error::TempoError;
use crate::event::channel::Channel;

/// The purpose of a text meta-event (types 0x01 through 0x07).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextKind {
    /// Any text whatsoever.
    General,
    /// A copyright notice, recommended at time zero of the first track.
    Copyright,
    /// The title of the file (first track) or of a specific track.
    Title,
    /// A description of a synthesized instrument.
    Instrument,
    /// A timed lyric syllable.
    Lyric,
    /// A rehearsal letter or synchronization marker.
    Marker,
    /// A timed description of an extra-musical cue.
    Cue,
}

impl TextKind {
    pub(crate) const fn from_meta_type(meta_type: u8) -> Option<Self> {
        match meta_type {
            0x01 => Some(Self::General),
            0x02 => Some(Self::Copyright),
            0x03 => Some(Self::Title),
            0x04 => Some(Self::Instrument),
            0x05 => Some(Self::Lyric),
            0x06 => Some(Self::Marker),
            0x07 => Some(Self::Cue),
            _ => None,
        }
    }

    /// The meta-event type byte this kind is written as.
    pub const fn meta_type(&self) -> u8 {
        match self {
            Self::General => 0x01,
            Self::Copyright => 0x02,
            Self::Title => 0x03,
            Self::Instrument => 0x04,
            Self::Lyric => 0x05,
            Self::Marker => 0x06,
            Self::Cue => 0x07,
        }
    }
}

/// The duration of a beat ("MIDI quarter note") set by the Set Tempo
/// meta-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Tempo {
    /// Parse and validate the three-byte payload: a big-endian 24-bit
    /// count of microseconds per beat, which must be non-zero.
    pub fn parse(data: &[u8]) -> Result<Self, TempoError> {
        if data.len() != 3 {
            return Err(TempoError::Length(data.len() as u32));
        }
        let micros =
            (u32::from(data[0]) << 16) | (u32::from(data[1]) << 8) | u32::from(data[2]);
        if micros == 0 {
            return Err(TempoError::Zero);
        }
        Ok(Self(micros))
    }

    /// Microseconds per beat, 1..=16777215.
    pub const fn micros_per_beat(&self) -> u32 {
        self.0
    }

    /// The tempo in beats per minute.
    pub fn beats_per_minute(&self) -> f64 {
        60_000_000.0 / f64::from(self.0)
    }
}

/// A meta-event inside a track.
///
/// The buffer-carrying variants borrow the parser's scratch buffer and
/// are valid until the next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaMessage<'a> {
    /// Identifies a sequence (meta type 0x00).
    SequenceNumber(u16),
    /// A text event (meta types 0x01..=0x07). The payload is opaque
    /// bytes in no guaranteed encoding and may contain NULs.
    Text {
        /// The purpose of the text.
        kind: TextKind,
        /// The raw text bytes.
        data: &'a [u8],
    },
    /// Binds subsequent non-channel events to a channel (meta type
    /// 0x20). Surfaced as-is; the parser does not apply the binding.
    ChannelPrefix(Channel),
    /// Closes the current track (meta type 0x2F).
    EndOfTrack,
    /// Sets the beat duration (meta type 0x51).
    Tempo(Tempo),
    /// Anchors the track at an absolute SMPTE time (meta type 0x54).
    SmpteOffset(Timecode),
    /// A notated time signature (meta type 0x58).
    TimeSignature(TimeSignature),
    /// A key signature (meta type 0x59).
    KeySignature(KeySignature),
    /// Any other meta type, carried opaquely.
    Custom {
        /// The meta-event type byte.
        kind: u8,
        /// The raw payload.
        data: &'a [u8],
    },
}
