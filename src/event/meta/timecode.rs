#![doc = r#"
SMPTE Offset - the absolute start time of a track.

The SMPTE Offset meta-event anchors a track to an absolute
hour:minute:second:frame position, so that MIDI sequences can be
synchronized with film or video material. When a file uses SMPTE-based
timing, the offset tells sequencers exactly where in absolute time the
track begins.

The timecode also carries a fractional-frame field, always in units of
1/100 of a frame regardless of how the file subdivides frames for its
delta times.
"#]

use crate::error::SmpteError;
use crate::timing::Timing;

/// An SMPTE timecode as carried by the SMPTE Offset meta-event.
///
/// Validity of the frame field depends on the file's time system: with
/// tempo-based timing any frame 0..=29 is accepted, while SMPTE-based
/// timing additionally caps the frame below the header's frame rate
/// and, for drop-frame, rejects the timecode labels that drop-frame
/// numbering skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timecode {
    /// Hour, 0..=23.
    pub hour: u8,
    /// Minute, 0..=59.
    pub minute: u8,
    /// Second, 0..=59 (no leap seconds).
    pub second: u8,
    /// Frame within the second, 0..=29; further capped by the file's
    /// SMPTE rate when SMPTE timing is in use.
    pub frame: u8,
    /// Fractional frame in hundredths, 0..=99.
    pub ff: u8,
}

impl Timecode {
    /// Parse and validate the five-byte SMPTE Offset payload against
    /// the file's time system.
    ///
    /// # Errors
    ///
    /// - [`SmpteError::Length`] if the payload is not five bytes
    /// - [`SmpteError::Hour`] / [`Minute`](SmpteError::Minute) /
    ///   [`Second`](SmpteError::Second) / [`Frame`](SmpteError::Frame) /
    ///   [`Subframe`](SmpteError::Subframe) for field range violations
    /// - [`SmpteError::FrameRate`] if the frame is at or above the
    ///   header's SMPTE frame rate
    /// - [`SmpteError::DropFrame`] for a frame 0 or 1 of a minute not
    ///   divisible by ten under drop-frame timing
    pub fn parse(data: &[u8], timing: &Timing) -> Result<Self, SmpteError> {
        if data.len() != 5 {
            return Err(SmpteError::Length(data.len() as u32));
        }
        let hour = data[0];
        if hour > 23 {
            return Err(SmpteError::Hour(hour));
        }
        let minute = data[1];
        if minute > 59 {
            return Err(SmpteError::Minute(minute));
        }
        let second = data[2];
        if second > 59 {
            return Err(SmpteError::Second(second));
        }
        let frame = data[3];
        if frame > 29 {
            return Err(SmpteError::Frame(frame));
        }
        let ff = data[4];
        if ff > 99 {
            return Err(SmpteError::Subframe(ff));
        }

        if let Timing::Smpte(smpte) = timing {
            let fps = smpte.fps();
            if frame >= fps.as_division() {
                return Err(SmpteError::FrameRate {
                    frame,
                    fps: fps.as_division(),
                });
            }
            // Drop-frame skips timecodes 0 and 1 of every minute that
            // is not divisible by ten.
            if fps.is_drop_frame() && minute % 10 != 0 && frame < 2 {
                return Err(SmpteError::DropFrame { minute, frame });
            }
        }

        Ok(Self {
            hour,
            minute,
            second,
            frame,
            ff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{SmpteFps, SmpteTiming};

    const TEMPO_TIMING: Timing = Timing::TicksPerBeat(96);

    const fn smpte_timing(fps: SmpteFps) -> Timing {
        Timing::Smpte(SmpteTiming {
            fps,
            ticks_per_frame: 4,
        })
    }

    #[test]
    fn parses_a_plain_timecode() {
        use pretty_assertions::assert_eq;
        let tc = Timecode::parse(&[1, 23, 45, 12, 34], &TEMPO_TIMING).unwrap();
        assert_eq!(tc.hour, 1);
        assert_eq!(tc.minute, 23);
        assert_eq!(tc.second, 45);
        assert_eq!(tc.frame, 12);
        assert_eq!(tc.ff, 34);
    }

    #[test]
    fn rejects_field_ranges() {
        use pretty_assertions::assert_eq;
        let cases: [(&[u8], SmpteError); 6] = [
            (&[0, 0, 0], SmpteError::Length(3)),
            (&[24, 0, 0, 0, 0], SmpteError::Hour(24)),
            (&[0, 60, 0, 0, 0], SmpteError::Minute(60)),
            (&[0, 0, 60, 0, 0], SmpteError::Second(60)),
            (&[0, 0, 0, 30, 0], SmpteError::Frame(30)),
            (&[0, 0, 0, 0, 100], SmpteError::Subframe(100)),
        ];
        for (data, expected) in cases {
            assert_eq!(Timecode::parse(data, &TEMPO_TIMING).unwrap_err(), expected);
        }
    }

    #[test]
    fn frame_capped_by_header_rate() {
        use pretty_assertions::assert_eq;
        let t24 = smpte_timing(SmpteFps::TwentyFour);
        assert!(Timecode::parse(&[0, 0, 0, 23, 0], &t24).is_ok());
        assert_eq!(
            Timecode::parse(&[0, 0, 0, 24, 0], &t24).unwrap_err(),
            SmpteError::FrameRate { frame: 24, fps: 24 }
        );

        let t25 = smpte_timing(SmpteFps::TwentyFive);
        assert!(Timecode::parse(&[0, 0, 0, 24, 0], &t25).is_ok());
        assert!(Timecode::parse(&[0, 0, 0, 25, 0], &t25).is_err());

        // 30-frame rates allow the full 0..=29 range.
        let t30 = smpte_timing(SmpteFps::Thirty);
        assert!(Timecode::parse(&[0, 0, 0, 29, 0], &t30).is_ok());
    }

    #[test]
    fn drop_frame_skips_frames_0_and_1() {
        use pretty_assertions::assert_eq;
        let t29 = smpte_timing(SmpteFps::TwentyNine);
        for minute in [1, 9, 11, 59] {
            for frame in [0, 1] {
                assert_eq!(
                    Timecode::parse(&[0, minute, 0, frame, 0], &t29).unwrap_err(),
                    SmpteError::DropFrame { minute, frame }
                );
            }
            assert!(Timecode::parse(&[0, minute, 0, 2, 0], &t29).is_ok());
        }
        // Minutes divisible by ten keep all their timecodes.
        for minute in [0, 10, 50] {
            assert!(Timecode::parse(&[0, minute, 0, 0, 0], &t29).is_ok());
            assert!(Timecode::parse(&[0, minute, 0, 1, 0], &t29).is_ok());
        }
        // Tempo-based timing never applies the drop-frame rule.
        assert!(Timecode::parse(&[0, 1, 0, 0, 0], &TEMPO_TIMING).is_ok());
    }
}
