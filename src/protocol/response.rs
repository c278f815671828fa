//! Response decoding and validation
//!
//! Devices answer every command with a short ASCII frame terminated by a
//! carriage return. A frame is accepted only when it is structurally
//! plausible for the protocol: printable ASCII carrying the `OK` ack
//! marker. Anything else is a protocol error that preserves the offending
//! bytes for diagnostics.

use crate::{Error, Result};

/// A validated device acknowledgment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// The acknowledgment frame with terminators stripped
    pub response: String,
}

/// Validate a raw device response and extract the acknowledgment.
///
/// Trailing `\r`, `\n` and whitespace are stripped before validation.
///
/// # Errors
///
/// Returns [`Error::Protocol`] when the response is empty, contains
/// non-printable bytes, carries the protocol's `NG` rejection marker, or
/// lacks the `OK` ack marker.
pub fn decode(raw: &[u8]) -> Result<Ack> {
    let trimmed = trim_frame(raw);

    if trimmed.is_empty() {
        return Err(Error::Protocol {
            reason: "empty response".to_string(),
            raw: raw.to_vec(),
        });
    }

    if !trimmed.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        return Err(Error::Protocol {
            reason: "response contains non-printable bytes".to_string(),
            raw: raw.to_vec(),
        });
    }

    let text = String::from_utf8_lossy(trimmed).into_owned();

    if text.contains("NG") {
        return Err(Error::Protocol {
            reason: format!("device rejected command: {text}"),
            raw: raw.to_vec(),
        });
    }

    if !text.contains("OK") {
        return Err(Error::Protocol {
            reason: format!("missing ack marker: {text}"),
            raw: raw.to_vec(),
        });
    }

    Ok(Ack { response: text })
}

/// Strip trailing frame terminators and whitespace
fn trim_frame(raw: &[u8]) -> &[u8] {
    let mut end = raw.len();
    while end > 0 && matches!(raw[end - 1], b'\r' | b'\n' | b' ' | b'\t') {
        end -= 1;
    }
    &raw[..end]
}
