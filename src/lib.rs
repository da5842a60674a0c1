#![doc = r#"
A streaming, pull-driven parser for Standard MIDI Files (SMF, the
`.mid` format).

The parser turns a byte stream into a sequence of typed events: the
file header, track boundaries, channel voice messages, system-exclusive
payloads and validated meta-events. It reads one event per call, keeps
no more than one event's payload in memory, and never looks at the
input ahead of what the caller has asked for.

# Reading a file

```no_run
use smfstream::prelude::*;

# fn main() -> Result<(), ParseError> {
let mut source = Source::open("song.mid")?;
let mut parser = Parser::new();
loop {
    match parser.read_event(&mut source)? {
        Event::Header(header) => println!("{} tracks", header.num_tracks()),
        Event::TrackStart => println!("track begins"),
        Event::Track(event) => println!("+{} {:?}", event.delta(), event.message()),
        Event::ForeignChunk(kind) => println!("skipped chunk {kind:08X}"),
        Event::Eof => break,
    }
}
# Ok(())
# }
```

# Error model

Malformed input and I/O failures surface as [`ParseError`] from
[`Parser::read_event`](parser::Parser::read_event). Errors are sticky:
after the first failure every further read returns the same error
without consuming input. Each error maps onto a stable negative code
([`ParseError::code`], [`error_message`]) for embedders that persist
error states.

Events that carry bulk data borrow the parser's internal buffer and
stay valid until the next read; everything else is plain owned data.
"#]

mod error;
pub use error::*;

mod header;
pub use header::*;

pub mod event;
pub mod parser;
pub mod source;
pub mod timing;

pub mod prelude {
    //! Everything needed to read a MIDI file, in one import.
    pub use crate::error::{error_message, MetaError, ParseError};
    pub use crate::event::{
        Channel, ChannelVoiceMessage, DataByte, Event, KeySignature, MetaMessage, PitchBend,
        Tempo, TextKind, TimeSignature, Timecode, TrackEvent, TrackMessage, VoiceEvent,
    };
    pub use crate::header::{Format, Header};
    pub use crate::parser::Parser;
    pub use crate::source::{ByteReader, Source};
    pub use crate::timing::{SmpteFps, SmpteTiming, Timing};
}
