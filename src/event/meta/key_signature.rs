use crate::error::KeySigError;

/// A key signature from the Key Signature meta-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    key: i8,
    is_minor: bool,
}

impl KeySignature {
    /// Parse and validate the two-byte payload (signed accidental
    /// count, mode byte).
    pub fn parse(data: &[u8]) -> Result<Self, KeySigError> {
        if data.len() != 2 {
            return Err(KeySigError::Length(data.len() as u32));
        }
        let key = data[0] as i8;
        if !(-7..=7).contains(&key) {
            return Err(KeySigError::Key(key));
        }
        let is_minor = match data[1] {
            0 => false,
            1 => true,
            mode => return Err(KeySigError::Mode(mode)),
        };
        Ok(Self { key, is_minor })
    }

    /// The accidental count: positive counts sharps, negative counts
    /// flats, zero is C major / A minor.
    pub const fn key(&self) -> i8 {
        self.key
    }

    /// Whether the key is minor rather than major.
    pub const fn is_minor(&self) -> bool {
        self.is_minor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flats_and_sharps() {
        use pretty_assertions::assert_eq;
        // One flat, major: F major.
        let ks = KeySignature::parse(&[0xFF, 0]).unwrap();
        assert_eq!(ks.key(), -1);
        assert!(!ks.is_minor());
        // Two sharps, minor: B minor.
        let ks = KeySignature::parse(&[2, 1]).unwrap();
        assert_eq!(ks.key(), 2);
        assert!(ks.is_minor());
    }

    #[test]
    fn rejects_out_of_range() {
        use pretty_assertions::assert_eq;
        assert_eq!(
            KeySignature::parse(&[8, 0]).unwrap_err(),
            KeySigError::Key(8)
        );
        // -8 as an unsigned byte.
        assert_eq!(
            KeySignature::parse(&[0xF8, 0]).unwrap_err(),
            KeySigError::Key(-8)
        );
        assert_eq!(
            KeySignature::parse(&[0, 2]).unwrap_err(),
            KeySigError::Mode(2)
        );
        assert_eq!(
            KeySignature::parse(&[0]).unwrap_err(),
            KeySigError::Length(1)
        );
    }
}
