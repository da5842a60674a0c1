//! Dump every parsed entity of a MIDI file as readable text.
//!
//! Reads standard input, or a file given as the single positional
//! argument, and writes one line per event to standard output. Doubles
//! as an analysis tool and as an end-to-end exerciser of the parser.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ArgParser;

use smfstream::prelude::*;

#[derive(ArgParser, Debug)]
#[command(version, about = "Dump a Standard MIDI File as readable text")]
struct Args {
    /// MIDI file to dump; reads standard input when omitted.
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("smfdump: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let mut source = match &args.input {
        Some(path) => {
            Source::open(path).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => Source::from_stdin(),
    };

    let mut parser = Parser::new();
    let mut offset: u32 = 0;
    let mut track_num: u32 = 0;

    loop {
        match parser.read_event(&mut source) {
            Ok(Event::Eof) => {
                println!("EOF");
                break;
            }
            Ok(event) => print_event(&event, &mut offset, &mut track_num)?,
            Err(err) => return Err(format!("MIDI parsing error: {err}")),
        }
    }

    source
        .close()
        .map_err(|e| format!("failed to close input: {e}"))
}

fn print_event(event: &Event<'_>, offset: &mut u32, track_num: &mut u32) -> Result<(), String> {
    match event {
        Event::Header(header) => {
            println!(
                "MIDI Format {} with {} track(s)",
                header.format().as_number(),
                header.num_tracks()
            );
            match header.timing() {
                Timing::TicksPerBeat(ticks) => {
                    println!("Delta units per MIDI beat: {ticks}");
                }
                Timing::Smpte(smpte) if smpte.fps().is_drop_frame() => {
                    println!("SMPTE frame rate     :  29.97 (30 drop-frame)");
                    println!("Delta units per frame:  {}", smpte.ticks_per_frame());
                }
                Timing::Smpte(smpte) => {
                    println!("SMPTE frame rate:  {}", smpte.fps().declared());
                    println!("Delta units per frame:  {}", smpte.ticks_per_frame());
                }
            }
            println!();
        }
        Event::ForeignChunk(kind) => {
            println!("FOREIGN CHUNK with ID {kind:08X}");
            println!();
        }
        Event::TrackStart => {
            *track_num += 1;
            *offset = 0;
            println!("BEGIN TRACK {track_num}");
            println!();
        }
        Event::Track(track_event) => {
            *offset = offset
                .checked_add(track_event.delta())
                .ok_or("time offset overflow")?;
            print!("{offset:08x}: ");
            print_message(track_event.message());
        }
        Event::Eof => unreachable!("EOF handled by the caller"),
    }
    Ok(())
}

fn print_message(message: &TrackMessage<'_>) {
    if let TrackMessage::Channel(msg) = message {
        print!("[{:2}] ", msg.channel().number() + 1);
    }
    match message {
        TrackMessage::Channel(msg) => match msg.event() {
            VoiceEvent::NoteOff { key, velocity } => {
                println!("Note-Off K:{:3} V:{:3}", key.value(), velocity.value());
            }
            VoiceEvent::NoteOn { key, velocity } => {
                println!("Note-On  K:{:3} V:{:3}", key.value(), velocity.value());
            }
            VoiceEvent::KeyAftertouch { key, pressure } => {
                println!("Pressure K:{:3} V:{:3}", key.value(), pressure.value());
            }
            VoiceEvent::ControlChange { controller, value } => {
                println!("Control  C:{:3} V:{:3}", controller.value(), value.value());
            }
            VoiceEvent::ProgramChange { program } => {
                println!("Program  P:{:3}", program.value());
            }
            VoiceEvent::ChannelAftertouch { pressure } => {
                println!("Pressure V:{:3}", pressure.value());
            }
            VoiceEvent::PitchBend(bend) => {
                println!("Pitch {:+}", bend.value());
            }
        },
        TrackMessage::SysEx(data) => {
            print!("SYSEX (F0)");
            print_binary(data);
            println!();
        }
        TrackMessage::SysExEscape(data) => {
            print!("SYSEX-ESC");
            print_binary(data);
            println!();
        }
        TrackMessage::Meta(meta) => print_meta(meta),
    }
}

fn print_meta(meta: &MetaMessage<'_>) {
    match meta {
        MetaMessage::SequenceNumber(id) => println!("Sequence ID {id}"),
        MetaMessage::Text { kind, data } => {
            let label = match kind {
                TextKind::General => "Text",
                TextKind::Copyright => "Copyright",
                TextKind::Title => "Title",
                TextKind::Instrument => "Instrument",
                TextKind::Lyric => "Lyric",
                TextKind::Marker => "Marker",
                TextKind::Cue => "Cue",
            };
            print!("[{label}] ");
            print_text(data);
            println!();
        }
        MetaMessage::ChannelPrefix(channel) => {
            println!("[{:2}] Meta Channel Prefix", channel.number() + 1);
        }
        MetaMessage::EndOfTrack => {
            println!("END TRACK");
            println!();
        }
        MetaMessage::Tempo(tempo) => {
            println!(
                "Tempo {} ({:.1} bpm)",
                tempo.micros_per_beat(),
                tempo.beats_per_minute()
            );
        }
        MetaMessage::SmpteOffset(tc) => {
            println!(
                "SMPTE Offset {:02}:{:02}:{:02}:{:02}.{:02}",
                tc.hour, tc.minute, tc.second, tc.frame, tc.ff
            );
        }
        MetaMessage::TimeSignature(sig) => {
            println!(
                "Time Signature {} / {} (click {}) (beat {})",
                sig.numerator(),
                sig.denominator(),
                sig.click(),
                sig.beat_unit()
            );
        }
        MetaMessage::KeySignature(sig) => {
            print!("Key Signature ");
            match sig.key() {
                key if key < 0 => print!("{} flats, ", -key),
                key if key > 0 => print!("{key} sharps, "),
                _ => print!("0 sharps/flats, "),
            }
            println!("{}", if sig.is_minor() { "minor" } else { "major" });
        }
        MetaMessage::Custom { kind, data } => {
            print!("Custom Meta [{kind:02x}]");
            print_binary(data);
            println!();
        }
    }
}

/// Space-separated base-16 pairs with a leading space and nothing after
/// the last digit.
fn print_binary(data: &[u8]) {
    for byte in data {
        print!(" {byte:02x}");
    }
}

/// Printable ASCII as-is, backslash doubled, everything else as a
/// backslash followed by two base-16 digits.
fn print_text(data: &[u8]) {
    for &byte in data {
        match byte {
            b'\\' => print!("\\\\"),
            0x20..=0x7E => print!("{}", byte as char),
            _ => print!("\\{byte:02x}"),
        }
    }
}
