//! Display target selection
//!
//! Replaces the loose string-or-int selector of the wire API with a typed
//! variant. Caller-facing strings are parsed into a [`Target`] at the
//! boundary; invalid selectors fail fast, before any device I/O.

use std::fmt;
use std::str::FromStr;

use crate::fleet::registry::DeviceIndex;
use crate::Error;

/// Which displays a command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Every device in the registry, in order
    All,
    /// Exactly one device, by 1-based index
    Device(DeviceIndex),
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match trimmed.parse::<u16>() {
            Ok(ordinal) => DeviceIndex::new(ordinal).map_or_else(
                || Err(Error::InvalidTarget("device indices start at 1".to_string())),
                |index| Ok(Self::Device(index)),
            ),
            Err(_) => Err(Error::InvalidTarget(format!(
                "expected \"all\" or a positive device number, got {trimmed:?}"
            ))),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Device(index) => write!(f, "{}", index.get()),
        }
    }
}
