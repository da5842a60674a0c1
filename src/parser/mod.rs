#![doc = r#"
The pull-driven event engine.

A [`Parser`] turns the bytes of a [`Source`](crate::source::Source) into
a stream of [`Event`]s, one per call to [`Parser::read_event`]. The
parser holds all cross-event state: the top-level position in the file,
the byte budget of the open track chunk, the declared-versus-seen track
count, and the cached running status.

Errors are sticky. The first failed read poisons the parser, and every
later read returns the same error again without consuming any input.
After the last declared track, reads return [`Event::Eof`] forever.
"#]

mod chunk;
mod scratch;

use crate::error::{ChannelPrefixError, MetaError, ParseError};
use crate::event::{
    Channel, ChannelVoiceMessage, DataByte, Event, KeySignature, MetaMessage, PitchBend, Tempo,
    TextKind, TimeSignature, Timecode, TrackEvent, TrackMessage, VoiceEvent,
};
use crate::header::{Format, Header};
use crate::source::Source;
use crate::timing::Timing;
use scratch::Scratch;

/// Top-level position in the file.
#[derive(Debug, Clone)]
enum Status {
    /// Nothing read yet; the next read takes the header chunk.
    Fresh,
    /// Header read; chunks are being consumed.
    InFile,
    /// All declared tracks are done.
    Eof,
    /// A read failed; the error repeats forever.
    Failed(ParseError),
}

/// An event computed by the state machine before payload slices are
/// attached. Buffer-carrying kinds reference the scratch buffer
/// implicitly, which keeps the borrow of `self` out of the state
/// transition itself.
enum Pending {
    Header(Header),
    ForeignChunk(u32),
    TrackStart,
    Track { delta: u32, body: PendingBody },
    Eof,
}

enum PendingBody {
    Channel(ChannelVoiceMessage),
    SysEx,
    SysExEscape,
    Text(TextKind),
    Custom(u8),
    Meta(MetaMessage<'static>),
}

#[doc = r#"
A streaming Standard MIDI File parser.

The parser does not own its input; a [`Source`] is passed to every
read, and one parser must stay with one source for a whole session.

```no_run
use smfstream::{event::Event, parser::Parser, source::Source};

# fn main() -> Result<(), smfstream::ParseError> {
let mut source = Source::open("song.mid")?;
let mut parser = Parser::new();
loop {
    match parser.read_event(&mut source)? {
        Event::Eof => break,
        event => println!("{event:?}"),
    }
}
# Ok(())
# }
```
"#]
pub struct Parser {
    status: Status,
    /// Bytes left in the open track chunk; `None` between chunks.
    chunk_remaining: Option<u32>,
    tracks_seen: u16,
    running_status: Option<u8>,
    header: Option<Header>,
    scratch: Scratch,
}

impl Parser {
    /// A parser ready to read the header chunk.
    pub const fn new() -> Self {
        Self {
            status: Status::Fresh,
            chunk_remaining: None,
            tracks_seen: 0,
            running_status: None,
            header: None,
            scratch: Scratch::new(),
        }
    }

    /// The parsed header, once the first read has succeeded.
    pub const fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Read the next event from `src`.
    ///
    /// The returned event borrows this parser and is valid until the
    /// next read. On failure the parser is poisoned: the same error
    /// comes back from every subsequent call, and `src` is not touched
    /// again.
    pub fn read_event<'a>(&'a mut self, src: &mut Source) -> Result<Event<'a>, ParseError> {
        let pending = self.advance(src)?;
        Ok(self.attach_payload(pending))
    }

    /// One step of the state machine, recording any error as sticky.
    fn advance(&mut self, src: &mut Source) -> Result<Pending, ParseError> {
        match self.dispatch(src) {
            Ok(pending) => Ok(pending),
            Err(err) => {
                self.status = Status::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn dispatch(&mut self, src: &mut Source) -> Result<Pending, ParseError> {
        match &self.status {
            Status::Failed(err) => Err(err.clone()),
            Status::Eof => Ok(Pending::Eof),
            Status::Fresh => {
                let header = self.read_header(src)?;
                self.header = Some(header);
                self.status = Status::InFile;
                Ok(Pending::Header(header))
            }
            Status::InFile => match self.chunk_remaining {
                None => self.next_chunk(src),
                Some(_) => self.next_track_event(src),
            },
        }
    }

    /// Resolve a finished step into a caller-visible event, attaching
    /// scratch-buffer slices where the step produced a payload.
    fn attach_payload(&self, pending: Pending) -> Event<'_> {
        match pending {
            Pending::Header(header) => Event::Header(header),
            Pending::ForeignChunk(kind) => Event::ForeignChunk(kind),
            Pending::TrackStart => Event::TrackStart,
            Pending::Eof => Event::Eof,
            Pending::Track { delta, body } => {
                let message = match body {
                    PendingBody::Channel(msg) => TrackMessage::Channel(msg),
                    PendingBody::SysEx => TrackMessage::SysEx(self.scratch.bytes()),
                    PendingBody::SysExEscape => TrackMessage::SysExEscape(self.scratch.bytes()),
                    PendingBody::Text(kind) => TrackMessage::Meta(MetaMessage::Text {
                        kind,
                        data: self.scratch.bytes(),
                    }),
                    PendingBody::Custom(kind) => TrackMessage::Meta(MetaMessage::Custom {
                        kind,
                        data: self.scratch.bytes(),
                    }),
                    PendingBody::Meta(meta) => TrackMessage::Meta(meta),
                };
                Event::Track(TrackEvent::new(delta, message))
            }
        }
    }

    /// Read and validate the MThd chunk.
    fn read_header(&mut self, src: &mut Source) -> Result<Header, ParseError> {
        let head = chunk::read_chunk_head(src)?;
        if head.kind != chunk::HEADER_CHUNK {
            return Err(ParseError::Signature(head.kind));
        }
        if head.len < 6 {
            return Err(crate::error::HeaderError::TooShort(head.len).into());
        }
        let format_raw = chunk::read_u16_be(src)?;
        let num_tracks = chunk::read_u16_be(src)?;
        let division = chunk::read_u16_be(src)?;
        // Headers are allowed to be longer than six bytes; the tail is
        // ignored.
        if head.len > 6 {
            #[cfg(feature = "tracing")]
            tracing::warn!(len = head.len, "skipping trailing header chunk bytes");
            src.skip(head.len - 6)?;
        }

        let format =
            Format::from_raw(format_raw).ok_or(ParseError::UnknownFormat(format_raw))?;
        if num_tracks == 0 {
            return Err(ParseError::NoTracks);
        }
        if format == Format::SingleMultiChannel && num_tracks > 1 {
            return Err(ParseError::ExtraTracks(num_tracks));
        }
        let timing = Timing::from_division(division).map_err(ParseError::Header)?;
        Ok(Header::new(format, num_tracks, timing))
    }

    /// Between chunks: finish the file, open the next track, or skip a
    /// foreign chunk.
    fn next_chunk(&mut self, src: &mut Source) -> Result<Pending, ParseError> {
        let Some(header) = self.header else {
            unreachable!("in-file state without a parsed header");
        };
        if self.tracks_seen >= header.num_tracks() {
            self.status = Status::Eof;
            return Ok(Pending::Eof);
        }
        let head = chunk::read_chunk_head(src)?;
        match head.kind {
            chunk::HEADER_CHUNK => Err(ParseError::DuplicateHeader),
            chunk::TRACK_CHUNK => {
                self.tracks_seen += 1;
                self.chunk_remaining = Some(head.len);
                self.running_status = None;
                Ok(Pending::TrackStart)
            }
            kind => {
                #[cfg(feature = "tracing")]
                tracing::warn!(kind, "skipping foreign chunk");
                src.skip(head.len)?;
                Ok(Pending::ForeignChunk(kind))
            }
        }
    }

    /// Inside a track: one delta-prefixed event.
    fn next_track_event(&mut self, src: &mut Source) -> Result<Pending, ParseError> {
        let Some(mut remaining) = self.chunk_remaining else {
            unreachable!("track event read with no open chunk");
        };

        let delta = chunk::chunk_varint(&mut remaining, src)?;
        let first = chunk::chunk_byte(&mut remaining, src)?;

        let body = match first {
            0x00..=0x7F => {
                // Running status: `first` is already the first data
                // parameter of a repeat of the cached status.
                let Some(status) = self.running_status else {
                    return Err(ParseError::OrphanRunningStatus(first));
                };
                let msg = read_voice_message(&mut remaining, src, status, Some(first))?;
                PendingBody::Channel(msg)
            }
            0x80..=0xEF => {
                let msg = read_voice_message(&mut remaining, src, first, None)?;
                self.running_status = Some(first);
                PendingBody::Channel(msg)
            }
            0xF0 | 0xF7 => {
                self.running_status = None;
                let len = chunk::chunk_varint(&mut remaining, src)?;
                self.read_payload(&mut remaining, src, len)?;
                if first == 0xF0 {
                    PendingBody::SysEx
                } else {
                    PendingBody::SysExEscape
                }
            }
            0xFF => {
                self.running_status = None;
                let meta_type = chunk::chunk_byte(&mut remaining, src)?;
                let len = chunk::chunk_varint(&mut remaining, src)?;
                self.read_meta(&mut remaining, src, meta_type, len)?
            }
            _ => return Err(ParseError::UnknownEvent(first)),
        };

        if matches!(body, PendingBody::Meta(MetaMessage::EndOfTrack)) {
            // Anything left in the chunk after End of Track is dead
            // space; consume it so the next read sees the chunk gap.
            if remaining > 0 {
                src.skip(remaining)?;
            }
            self.chunk_remaining = None;
        } else {
            self.chunk_remaining = Some(remaining);
        }
        Ok(Pending::Track { delta, body })
    }

    /// Read `len` payload bytes from the chunk into the scratch buffer.
    fn read_payload(
        &mut self,
        remaining: &mut u32,
        src: &mut Source,
        len: u32,
    ) -> Result<(), ParseError> {
        self.scratch.begin(len)?;
        for _ in 0..len {
            let byte = chunk::chunk_byte(remaining, src)?;
            self.scratch.push(byte);
        }
        Ok(())
    }

    /// Decode and validate a meta-event with the given type byte and
    /// declared payload length.
    fn read_meta(
        &mut self,
        remaining: &mut u32,
        src: &mut Source,
        meta_type: u8,
        len: u32,
    ) -> Result<PendingBody, ParseError> {
        match meta_type {
            0x00 => {
                if len != 2 {
                    return Err(MetaError::SequenceNumber(len).into());
                }
                let hi = chunk::chunk_byte(remaining, src)?;
                let lo = chunk::chunk_byte(remaining, src)?;
                Ok(PendingBody::Meta(MetaMessage::SequenceNumber(
                    u16::from_be_bytes([hi, lo]),
                )))
            }
            0x01..=0x07 => {
                let Some(kind) = TextKind::from_meta_type(meta_type) else {
                    unreachable!("text kinds cover 0x01..=0x07");
                };
                self.read_payload(remaining, src, len)?;
                Ok(PendingBody::Text(kind))
            }
            0x20 => {
                if len != 1 {
                    return Err(MetaError::from(ChannelPrefixError::Length(len)).into());
                }
                let byte = chunk::chunk_byte(remaining, src)?;
                let channel = Channel::new(byte)
                    .ok_or(ParseError::Meta(ChannelPrefixError::Channel(byte).into()))?;
                Ok(PendingBody::Meta(MetaMessage::ChannelPrefix(channel)))
            }
            0x2F => {
                if len != 0 {
                    return Err(MetaError::EndOfTrack(len).into());
                }
                Ok(PendingBody::Meta(MetaMessage::EndOfTrack))
            }
            0x51 => {
                let data = self.read_fixed::<3>(remaining, src, len, |l| {
                    MetaError::from(crate::error::TempoError::Length(l))
                })?;
                let tempo = Tempo::parse(&data)
                    .map_err(|e| ParseError::Meta(e.into()))?;
                Ok(PendingBody::Meta(MetaMessage::Tempo(tempo)))
            }
            0x54 => {
                let data = self.read_fixed::<5>(remaining, src, len, |l| {
                    MetaError::from(crate::error::SmpteError::Length(l))
                })?;
                let Some(header) = self.header else {
                    unreachable!("meta event read before the header");
                };
                let timecode = Timecode::parse(&data, header.timing())
                    .map_err(|e| ParseError::Meta(e.into()))?;
                Ok(PendingBody::Meta(MetaMessage::SmpteOffset(timecode)))
            }
            0x58 => {
                let data = self.read_fixed::<4>(remaining, src, len, |l| {
                    MetaError::from(crate::error::TimeSigError::Length(l))
                })?;
                let sig = TimeSignature::parse(&data)
                    .map_err(|e| ParseError::Meta(e.into()))?;
                Ok(PendingBody::Meta(MetaMessage::TimeSignature(sig)))
            }
            0x59 => {
                let data = self.read_fixed::<2>(remaining, src, len, |l| {
                    MetaError::from(crate::error::KeySigError::Length(l))
                })?;
                let sig = KeySignature::parse(&data)
                    .map_err(|e| ParseError::Meta(e.into()))?;
                Ok(PendingBody::Meta(MetaMessage::KeySignature(sig)))
            }
            kind => {
                self.read_payload(remaining, src, len)?;
                Ok(PendingBody::Custom(kind))
            }
        }
    }

    /// Read an exactly-`N`-byte meta payload, reporting the declared
    /// length through `len_err` when it does not match.
    fn read_fixed<const N: usize>(
        &mut self,
        remaining: &mut u32,
        src: &mut Source,
        len: u32,
        len_err: impl FnOnce(u32) -> MetaError,
    ) -> Result<[u8; N], ParseError> {
        if len as usize != N {
            return Err(len_err(len).into());
        }
        let mut data = [0u8; N];
        for slot in &mut data {
            *slot = chunk::chunk_byte(remaining, src)?;
        }
        Ok(data)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a channel voice message. `first_data` is the already-read
/// first parameter when the message resumes a running status.
///
/// Data bytes are range-checked only after the full message has been
/// read from the chunk.
fn read_voice_message(
    remaining: &mut u32,
    src: &mut Source,
    status: u8,
    first_data: Option<u8>,
) -> Result<ChannelVoiceMessage, ParseError> {
    debug_assert!((0x80..=0xEF).contains(&status));
    let first = match first_data {
        Some(byte) => byte,
        None => chunk::chunk_byte(remaining, src)?,
    };
    let channel = Channel::from_status(status);
    let event = match status & 0xF0 {
        0xC0 => VoiceEvent::ProgramChange {
            program: DataByte::new(first)?,
        },
        0xD0 => VoiceEvent::ChannelAftertouch {
            pressure: DataByte::new(first)?,
        },
        kind => {
            let second = chunk::chunk_byte(remaining, src)?;
            let a = DataByte::new(first)?;
            let b = DataByte::new(second)?;
            match kind {
                0x80 => VoiceEvent::NoteOff {
                    key: a,
                    velocity: b,
                },
                0x90 => VoiceEvent::NoteOn {
                    key: a,
                    velocity: b,
                },
                0xA0 => VoiceEvent::KeyAftertouch {
                    key: a,
                    pressure: b,
                },
                0xB0 => VoiceEvent::ControlChange {
                    controller: a,
                    value: b,
                },
                0xE0 => VoiceEvent::PitchBend(PitchBend::from_data(a, b)),
                _ => unreachable!("status nibble checked by the caller"),
            }
        }
    };
    Ok(ChannelVoiceMessage::new(channel, event))
}
