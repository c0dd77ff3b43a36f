//! Channel and bus layout types.
//!
//! A processing unit exposes a number of input and output buses, each
//! carrying a channel layout. The graph model uses these to bound connection
//! channel indices and to persist a unit's bus configuration in the document
//! format. Layouts round-trip through a short abbreviated string
//! (`"Mono"`, `"Stereo"`, `"3ch"`, or the `"disabled"` sentinel).

use core::fmt;

/// Channel index denoting a MIDI connection endpoint.
///
/// A connection whose source and destination channels both equal this value
/// carries MIDI events rather than an audio channel.
pub const MIDI_CHANNEL_INDEX: u32 = 0x1000;

/// The channel layout of a single bus.
///
/// A layout is just a channel count; a count of zero marks the bus as
/// disabled. Disabled buses still occupy their index so that layouts
/// round-trip positionally through the document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelLayout {
    channels: u32,
}

impl ChannelLayout {
    /// A disabled bus (zero channels).
    pub const fn disabled() -> Self {
        Self { channels: 0 }
    }

    /// A single-channel bus.
    pub const fn mono() -> Self {
        Self { channels: 1 }
    }

    /// A two-channel bus.
    pub const fn stereo() -> Self {
        Self { channels: 2 }
    }

    /// A bus with an arbitrary channel count.
    pub const fn with_channels(channels: u32) -> Self {
        Self { channels }
    }

    /// Number of channels on this bus.
    pub const fn channels(self) -> u32 {
        self.channels
    }

    /// Whether this bus is disabled.
    pub const fn is_disabled(self) -> bool {
        self.channels == 0
    }

    /// The abbreviated string form used by the document format.
    pub fn abbreviation(self) -> String {
        match self.channels {
            0 => "disabled".to_string(),
            1 => "Mono".to_string(),
            2 => "Stereo".to_string(),
            n => format!("{n}ch"),
        }
    }

    /// Parses an abbreviated string form back into a layout.
    ///
    /// Accepts everything [`abbreviation`](Self::abbreviation) produces.
    /// Returns `None` for anything else.
    pub fn from_abbreviation(s: &str) -> Option<Self> {
        match s {
            "disabled" => Some(Self::disabled()),
            "Mono" => Some(Self::mono()),
            "Stereo" => Some(Self::stereo()),
            other => other
                .strip_suffix("ch")
                .and_then(|n| n.parse::<u32>().ok())
                .map(Self::with_channels),
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.abbreviation())
    }
}

/// The full bus configuration of a processing unit.
///
/// Bus order is significant: connection channel indices count through the
/// enabled buses in order, input and output sides independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusesLayout {
    /// Input buses, in index order.
    pub input_buses: Vec<ChannelLayout>,
    /// Output buses, in index order.
    pub output_buses: Vec<ChannelLayout>,
}

impl BusesLayout {
    /// Creates a layout from explicit bus lists.
    pub fn new(input_buses: Vec<ChannelLayout>, output_buses: Vec<ChannelLayout>) -> Self {
        Self {
            input_buses,
            output_buses,
        }
    }

    /// One stereo bus in, one stereo bus out — the common default.
    pub fn stereo_io() -> Self {
        Self::new(vec![ChannelLayout::stereo()], vec![ChannelLayout::stereo()])
    }

    /// Total channel count across all input buses.
    pub fn total_input_channels(&self) -> u32 {
        self.input_buses.iter().map(|b| b.channels()).sum()
    }

    /// Total channel count across all output buses.
    pub fn total_output_channels(&self) -> u32 {
        self.output_buses.iter().map(|b| b.channels()).sum()
    }
}
