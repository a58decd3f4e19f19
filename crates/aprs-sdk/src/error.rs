//! SDK error types.
//!
//! [`SdkError`] is the single error type returned by every fallible
//! operation in the SDK. It wraps codec, transport and HTTP errors into a
//! unified enum.

use aprs_codec::CodecError;

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Invalid or missing configuration (e.g. no server configured).
    #[error("configuration error: {0}")]
    Config(String),

    /// The APRS-IS server refused the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The server answered but did not accept the packet.
    #[error("packet rejected: {0}")]
    Rejected(String),

    /// A frame could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// HTTP request failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Socket I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_errors_convert() {
        let err: SdkError = "W2GMD-99".parse::<aprs_codec::Callsign>().unwrap_err().into();
        assert!(matches!(err, SdkError::Codec(CodecError::MalformedCallsign { .. })));
        assert!(err.to_string().starts_with("codec error: malformed callsign"));
    }

    #[test]
    fn io_errors_convert() {
        let err: SdkError = std::io::Error::from(std::io::ErrorKind::ConnectionRefused).into();
        assert!(matches!(err, SdkError::Io(_)));
    }
}
