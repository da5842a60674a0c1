use crate::error::TimeSigError;

/// A notated time signature from the Time Signature meta-event.
///
/// The metronome click is counted in MIDI clock pulses; the beat is
/// always subdivided into 24 of them, so a click of 24 means one click
/// per beat. `beat_unit` states which notated rhythmic value the beat
/// corresponds to, in 32nd-notes: 8 for a quarter note, 12 for a
/// dotted quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    numerator: u8,
    denominator: u16,
    click: u8,
    beat_unit: u8,
}

impl TimeSignature {
    /// Parse and validate the four-byte payload
    /// (numerator, denominator exponent, click, beat unit).
    pub fn parse(data: &[u8]) -> Result<Self, TimeSigError> {
        if data.len() != 4 {
            return Err(TimeSigError::Length(data.len() as u32));
        }
        let numerator = data[0];
        if numerator == 0 {
            return Err(TimeSigError::ZeroNumerator);
        }
        let exponent = data[1];
        if exponent > 15 {
            return Err(TimeSigError::Exponent(exponent));
        }
        let denominator = 1u16 << exponent;
        if denominator > 1024 {
            return Err(TimeSigError::Denominator(denominator));
        }
        let click = data[2];
        if click == 0 {
            return Err(TimeSigError::ZeroClick);
        }
        let beat_unit = data[3];
        if beat_unit == 0 {
            return Err(TimeSigError::ZeroBeatUnit);
        }
        Ok(Self {
            numerator,
            denominator,
            click,
            beat_unit,
        })
    }

    /// The numerator of the notated signature, 1..=255.
    pub const fn numerator(&self) -> u8 {
        self.numerator
    }

    /// The denominator of the notated signature, a power of two up to
    /// 1024.
    pub const fn denominator(&self) -> u16 {
        self.denominator
    }

    /// MIDI clock pulses per metronome click, 1..=255.
    pub const fn click(&self) -> u8 {
        self.click
    }

    /// 32nd-notes per beat, 1..=255.
    pub const fn beat_unit(&self) -> u8 {
        self.beat_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_eight() {
        use pretty_assertions::assert_eq;
        let ts = TimeSignature::parse(&[6, 3, 24, 8]).unwrap();
        assert_eq!(ts.numerator(), 6);
        assert_eq!(ts.denominator(), 8);
        assert_eq!(ts.click(), 24);
        assert_eq!(ts.beat_unit(), 8);
    }

    #[test]
    fn denominator_caps_at_1024() {
        use pretty_assertions::assert_eq;
        assert_eq!(TimeSignature::parse(&[4, 10, 24, 8]).unwrap().denominator(), 1024);
        assert_eq!(
            TimeSignature::parse(&[4, 11, 24, 8]).unwrap_err(),
            TimeSigError::Denominator(2048)
        );
        assert_eq!(
            TimeSignature::parse(&[4, 16, 24, 8]).unwrap_err(),
            TimeSigError::Exponent(16)
        );
    }

    #[test]
    fn rejects_zero_fields() {
        use pretty_assertions::assert_eq;
        assert_eq!(
            TimeSignature::parse(&[0, 2, 24, 8]).unwrap_err(),
            TimeSigError::ZeroNumerator
        );
        assert_eq!(
            TimeSignature::parse(&[4, 2, 0, 8]).unwrap_err(),
            TimeSigError::ZeroClick
        );
        assert_eq!(
            TimeSignature::parse(&[4, 2, 24, 0]).unwrap_err(),
            TimeSigError::ZeroBeatUnit
        );
        assert_eq!(
            TimeSignature::parse(&[4, 2]).unwrap_err(),
            TimeSigError::Length(2)
        );
    }
}
