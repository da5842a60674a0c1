mod smpte;
pub use smpte::*;

use crate::error::HeaderError;

/// The time system declared in the file header.
///
/// Delta times either subdivide the beat ("MIDI quarter note"), whose
/// length the Set Tempo meta-event controls, or subdivide an SMPTE
/// frame at a fixed rate, independent of tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Delta time units per beat, 1..=32767.
    TicksPerBeat(u16),
    /// Delta time units per SMPTE frame at a fixed frame rate.
    Smpte(SmpteTiming),
}

impl Timing {
    /// Decode the header's 16-bit division word.
    ///
    /// A clear high bit means ticks per beat (the remaining 15 bits,
    /// which must be non-zero). A set high bit means SMPTE timing: the
    /// high byte is the negated frame rate (-24, -25, -29 or -30) and
    /// the low byte the ticks-per-frame count, 1..=127.
    pub(crate) fn from_division(word: u16) -> Result<Self, HeaderError> {
        if word & 0x8000 == 0 {
            if word == 0 {
                return Err(HeaderError::Division(word));
            }
            Ok(Self::TicksPerBeat(word))
        } else {
            let fps = match (word >> 8) as u8 as i8 {
                -24 => SmpteFps::TwentyFour,
                -25 => SmpteFps::TwentyFive,
                -29 => SmpteFps::TwentyNine,
                -30 => SmpteFps::Thirty,
                _ => return Err(HeaderError::Division(word)),
            };
            let ticks_per_frame = (word & 0x00FF) as u8;
            if ticks_per_frame == 0 || ticks_per_frame > 127 {
                return Err(HeaderError::Division(word));
            }
            Ok(Self::Smpte(SmpteTiming {
                fps,
                ticks_per_frame,
            }))
        }
    }

    /// Some if the timing is defined as ticks per beat.
    pub const fn ticks_per_beat(&self) -> Option<u16> {
        match self {
            Self::TicksPerBeat(t) => Some(*t),
            Self::Smpte(_) => None,
        }
    }

    /// Some if the timing is SMPTE-based.
    pub const fn smpte(&self) -> Option<&SmpteTiming> {
        match self {
            Self::Smpte(s) => Some(s),
            Self::TicksPerBeat(_) => None,
        }
    }
}

/// SMPTE timing parameters from the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteTiming {
    pub(crate) fps: SmpteFps,
    pub(crate) ticks_per_frame: u8,
}

impl SmpteTiming {
    /// The frames per second.
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Delta time units per frame, 1..=127.
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ticks_per_beat() {
        use pretty_assertions::assert_eq;
        assert_eq!(
            Timing::from_division(0x0060).unwrap(),
            Timing::TicksPerBeat(96)
        );
        assert_eq!(
            Timing::from_division(0x7FFF).unwrap(),
            Timing::TicksPerBeat(32767)
        );
    }

    #[test]
    fn rejects_zero_division() {
        assert_eq!(
            Timing::from_division(0).unwrap_err(),
            HeaderError::Division(0)
        );
    }

    #[test]
    fn decodes_smpte_division() {
        use pretty_assertions::assert_eq;
        // 0xE8 is -24; 40 ticks per frame.
        let timing = Timing::from_division(0xE828).unwrap();
        let Timing::Smpte(smpte) = timing else {
            panic!("expected SMPTE timing");
        };
        assert_eq!(smpte.fps(), SmpteFps::TwentyFour);
        assert_eq!(smpte.ticks_per_frame(), 0x28);

        // 0xE3 is -29, the drop-frame rate.
        let timing = Timing::from_division(0xE304).unwrap();
        assert_eq!(timing.smpte().unwrap().fps(), SmpteFps::TwentyNine);
    }

    #[test]
    fn rejects_bad_smpte_division() {
        // -28 is not a defined frame rate.
        assert!(Timing::from_division(0xE428).is_err());
        // Zero ticks per frame.
        assert!(Timing::from_division(0xE800).is_err());
        // Ticks per frame above 127.
        assert!(Timing::from_division(0xE3FF).is_err());
        assert!(Timing::from_division(0xE880).is_err());
        assert!(Timing::from_division(0xE87F).is_ok());
    }
}
