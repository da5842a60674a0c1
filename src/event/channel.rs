use crate::error::ParseError;

/// A seven-bit MIDI data value, guaranteed to have a clear high bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// Validate a raw byte, rejecting values with the high bit set.
    pub const fn new(byte: u8) -> Result<Self, ParseError> {
        if byte > 0x7F {
            Err(ParseError::DataByte(byte))
        } else {
            Ok(Self(byte))
        }
    }

    /// Wrap a byte known to be in range.
    pub(crate) const fn new_unchecked(byte: u8) -> Self {
        Self(byte)
    }

    /// The value, 0..=127.
    pub const fn value(&self) -> u8 {
        self.0
    }
}

/// A MIDI channel, 0..=15.
///
/// Many MIDI systems display channels 1-based; this type keeps the
/// zero-based wire numbering and leaves presentation to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel(u8);

impl Channel {
    /// Validate a channel number.
    pub const fn new(number: u8) -> Option<Self> {
        if number > 15 {
            None
        } else {
            Some(Self(number))
        }
    }

    pub(crate) const fn from_status(status: u8) -> Self {
        Self(status & 0x0F)
    }

    /// The zero-based channel number.
    pub const fn number(&self) -> u8 {
        self.0
    }
}

/// A pitch bend amount, -8192..=8191, with 0 meaning no bend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchBend(i16);

impl PitchBend {
    /// The lowest bend value.
    pub const MIN: i16 = -8192;
    /// The highest bend value.
    pub const MAX: i16 = 8191;

    /// Combine the two seven-bit data bytes (LSB first on the wire)
    /// and re-center around zero.
    pub(crate) const fn from_data(lsb: DataByte, msb: DataByte) -> Self {
        Self((((msb.0 as i16) << 7) | lsb.0 as i16) - 8192)
    }

    /// The signed bend amount.
    pub const fn value(&self) -> i16 {
        self.0
    }
}

/// The channel voice messages a track can carry.
///
/// A Note-On with velocity zero means releasing the key, but it is
/// surfaced exactly as written; the parser never rewrites it into a
/// [`VoiceEvent::NoteOff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceEvent {
    /// Release a key with a release velocity.
    NoteOff {
        /// The key number; 60 is middle C.
        key: DataByte,
        /// The release velocity.
        velocity: DataByte,
    },
    /// Press a key. Velocity zero means release.
    NoteOn {
        /// The key number; 60 is middle C.
        key: DataByte,
        /// The key-down velocity, or zero for a release.
        velocity: DataByte,
    },
    /// Per-key pressure while a key is held.
    KeyAftertouch {
        /// The key number.
        key: DataByte,
        /// The pressure intensity.
        pressure: DataByte,
    },
    /// Set a controller (sustain pedal, modulation wheel, ...).
    ControlChange {
        /// The controller index.
        controller: DataByte,
        /// The value sent to the controller.
        value: DataByte,
    },
    /// Select a program (instrument patch).
    ProgramChange {
        /// The program number.
        program: DataByte,
    },
    /// Channel-wide pressure.
    ChannelAftertouch {
        /// The pressure intensity.
        pressure: DataByte,
    },
    /// Move the pitch bend wheel.
    PitchBend(PitchBend),
}

/// A channel voice message together with its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelVoiceMessage {
    channel: Channel,
    event: VoiceEvent,
}

impl ChannelVoiceMessage {
    /// Pair a voice event with a channel.
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// The channel the message addresses.
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The voice event carried.
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_byte_rejects_high_bit() {
        assert!(DataByte::new(0x7F).is_ok());
        assert!(matches!(
            DataByte::new(0x80),
            Err(ParseError::DataByte(0x80))
        ));
    }

    #[test]
    fn pitch_bend_is_recentered() {
        use pretty_assertions::assert_eq;
        let center = PitchBend::from_data(DataByte(0x00), DataByte(0x40));
        assert_eq!(center.value(), 0);
        let min = PitchBend::from_data(DataByte(0x00), DataByte(0x00));
        assert_eq!(min.value(), PitchBend::MIN);
        let max = PitchBend::from_data(DataByte(0x7F), DataByte(0x7F));
        assert_eq!(max.value(), PitchBend::MAX);
    }

    #[test]
    fn channel_bounds() {
        assert_eq!(Channel::new(15).map(|c| c.number()), Some(15));
        assert!(Channel::new(16).is_none());
    }
}
