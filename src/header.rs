use crate::timing::Timing;

/// The track layout declared by the MThd chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// Format 0: a single track carrying all channels.
    SingleMultiChannel,
    /// Format 1: multiple tracks that proceed simultaneously.
    Simultaneous,
    /// Format 2: multiple tracks independent of each other in time.
    SequentiallyIndependent,
}

impl Format {
    pub(crate) const fn from_raw(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::SingleMultiChannel),
            1 => Some(Self::Simultaneous),
            2 => Some(Self::SequentiallyIndependent),
            _ => None,
        }
    }

    /// The format number as written in the file.
    pub const fn as_number(&self) -> u16 {
        match self {
            Self::SingleMultiChannel => 0,
            Self::Simultaneous => 1,
            Self::SequentiallyIndependent => 2,
        }
    }
}

/// Everything the MThd chunk declares about the file.
///
/// `num_tracks` is the *declared* track count; the parser enforces that
/// exactly this many MTrk chunks are read before end of file. A format
/// 0 header always declares one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: Format,
    num_tracks: u16,
    timing: Timing,
}

impl Header {
    pub(crate) const fn new(format: Format, num_tracks: u16, timing: Timing) -> Self {
        Self {
            format,
            num_tracks,
            timing,
        }
    }

    /// The declared file format.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// The declared number of tracks, always at least one.
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }

    /// The declared time system.
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }
}
