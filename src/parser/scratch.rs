use crate::error::ParseError;

/// The bounded payload buffer for sysex, text and custom meta data.
///
/// Capacity starts at 256 bytes and grows by doubling up to the 32 KiB
/// cap; the cap is part of the parsing contract, not an implementation
/// detail. Payloads longer than the cap are rejected before any of
/// their bytes are read.
pub(crate) struct Scratch {
    buf: Vec<u8>,
}

impl Scratch {
    /// The maximum accepted payload length in bytes.
    pub(crate) const MAX: u32 = 32_768;

    const INITIAL: usize = 256;

    pub(crate) const fn new() -> Self {
        // Allocation is deferred until the first payload.
        Self { buf: Vec::new() }
    }

    /// Start a new payload of `len` bytes: check the cap, clear the
    /// buffer, and grow capacity by doubling if needed.
    pub(crate) fn begin(&mut self, len: u32) -> Result<(), ParseError> {
        if len > Self::MAX {
            return Err(ParseError::PayloadOverflow(len));
        }
        self.buf.clear();
        let needed = len as usize;
        if needed > self.buf.capacity() {
            let mut cap = self.buf.capacity().max(Self::INITIAL);
            while cap < needed {
                cap *= 2;
            }
            self.buf.reserve_exact(cap);
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_up_to_the_cap() {
        let mut scratch = Scratch::new();
        scratch.begin(Scratch::MAX).unwrap();
        assert!(matches!(
            scratch.begin(Scratch::MAX + 1),
            Err(ParseError::PayloadOverflow(32_769))
        ));
    }

    #[test]
    fn begin_resets_previous_contents() {
        use pretty_assertions::assert_eq;
        let mut scratch = Scratch::new();
        scratch.begin(3).unwrap();
        scratch.push(1);
        scratch.push(2);
        scratch.begin(1).unwrap();
        scratch.push(9);
        assert_eq!(scratch.bytes(), &[9]);
    }

    #[test]
    fn capacity_grows_in_powers_of_two() {
        let mut scratch = Scratch::new();
        scratch.begin(300).unwrap();
        assert!(scratch.buf.capacity() >= 512);
        scratch.begin(5000).unwrap();
        assert!(scratch.buf.capacity() >= 8192);
    }
}
