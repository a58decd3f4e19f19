//! Error types for the `aprs-codec` crate.
//!
//! Every fallible parse, constructor and setter in this crate returns a
//! variant of [`CodecError`]. Rendering a payload as text never fails, so
//! there is no error for unrepresentable payloads.

/// Errors produced while decoding, encoding or building APRS values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// An address could not be decoded from text or from its AX.25 octet,
    /// or does not satisfy the callsign constraints.
    #[error("malformed callsign \"{value}\": {reason}")]
    MalformedCallsign {
        /// The offending input, with non-printable bytes escaped.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A frame is missing a delimiter, has a truncated address field or
    /// carries more digipeaters than AX.25 allows.
    #[error("malformed frame: {reason}")]
    MalformedFrame {
        /// Human-readable explanation.
        reason: String,
    },

    /// A position report was built from out-of-range values.
    #[error("invalid position: {reason}")]
    InvalidPosition {
        /// Human-readable explanation.
        reason: String,
    },
}

impl CodecError {
    pub(crate) fn callsign(value: &[u8], reason: impl Into<String>) -> Self {
        Self::MalformedCallsign {
            value: value.escape_ascii().to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn frame(reason: impl Into<String>) -> Self {
        Self::MalformedFrame {
            reason: reason.into(),
        }
    }

    pub(crate) fn position(reason: impl Into<String>) -> Self {
        Self::InvalidPosition {
            reason: reason.into(),
        }
    }
}
