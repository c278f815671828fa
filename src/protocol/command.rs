//! Command encoding for the MDC wire protocol
//!
//! Each command maps deterministically to one fixed-prefix ASCII payload
//! terminated by a carriage return. Encoding is a pure function of the
//! command value and performs no I/O.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A selectable display input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// HDMI port 1
    Hdmi1,
    /// HDMI port 2
    Hdmi2,
    /// DisplayPort
    DisplayPort,
    /// Analog VGA
    Vga,
    /// Built-in MagicInfo player
    MagicInfo,
}

impl InputSource {
    /// The protocol code for this source
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Hdmi1 => 0x21,
            Self::Hdmi2 => 0x22,
            Self::DisplayPort => 0x23,
            Self::Vga => 0x15,
            Self::MagicInfo => 0x31,
        }
    }
}

impl FromStr for InputSource {
    type Err = Error;

    /// Resolve a caller-facing source name.
    ///
    /// Unrecognized names are rejected outright; there is no fallback
    /// source.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hdmi1" => Ok(Self::Hdmi1),
            "hdmi2" => Ok(Self::Hdmi2),
            "dp" | "displayport" => Ok(Self::DisplayPort),
            "vga" => Ok(Self::Vga),
            "magicinfo" => Ok(Self::MagicInfo),
            _ => Err(Error::InvalidInputSource(s.to_string())),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hdmi1 => "hdmi1",
            Self::Hdmi2 => "hdmi2",
            Self::DisplayPort => "displayport",
            Self::Vga => "vga",
            Self::MagicInfo => "magicinfo",
        };
        f.write_str(name)
    }
}

/// A logical control command for one display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Turn the panel on or off
    Power(bool),
    /// Set the volume level; values outside [0, 100] are clamped
    Volume(i64),
    /// Mute or unmute audio
    Mute(bool),
    /// Switch the active input source
    Input(InputSource),
}

impl Command {
    /// Build the wire payload for this command.
    ///
    /// Volume is clamped to [0, 100] before hex-encoding, so out-of-range
    /// levels encode identically to the nearest bound.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Power(true) => b"ka 00 01\r".to_vec(),
            Self::Power(false) => b"ka 00 00\r".to_vec(),
            Self::Volume(level) => {
                format!("kf 00 {:02x}\r", (*level).clamp(0, 100)).into_bytes()
            }
            Self::Mute(true) => b"ke 00 01\r".to_vec(),
            Self::Mute(false) => b"ke 00 00\r".to_vec(),
            // The 0x prefix is part of the payload the devices expect
            Self::Input(source) => format!("xb 00 0x{:02x}\r", source.code()).into_bytes(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Power(on) => write!(f, "power {}", if *on { "on" } else { "off" }),
            Self::Volume(level) => write!(f, "volume {level}"),
            Self::Mute(muted) => write!(f, "mute {}", if *muted { "on" } else { "off" }),
            Self::Input(source) => write!(f, "input {source}"),
        }
    }
}
