//! KISS and HDLC flag framing around AX.25 frames.
//!
//! Two layers live here:
//!
//! * [`strip`] / [`wrap`] peel the AX.25 flag bytes and the KISS data-frame
//!   command byte off a buffer handed to [`Frame::parse`](crate::Frame::parse).
//! * [`encode`], [`escape`], [`unescape`] and [`KissDecoder`] implement the
//!   FEND/FESC byte stuffing spoken on a serial or TCP link to a TNC.
//!
//! ```text
//! FEND | port << 4 | command | escaped AX.25 frame | FEND
//! ```

use crate::frame::AX25_FLAG;

/// Frame end.
pub const FEND: u8 = 0xC0;
/// Frame escape.
pub const FESC: u8 = 0xDB;
/// Transposed frame end.
pub const TFEND: u8 = 0xDC;
/// Transposed frame escape.
pub const TFESC: u8 = 0xDD;

/// Command nibble of a data frame.
pub const DATA_FRAME: u8 = 0x00;

/// Highest TNC port addressable in the command byte.
pub const MAX_PORT: u8 = 0x0F;

/// Longest escaped frame [`KissDecoder`] buffers. Longer frames are dropped.
pub const MAX_FRAME_LEN: usize = 1024;

// ---------------------------------------------------------------------------
// Flag / command byte stripping
// ---------------------------------------------------------------------------

/// Remove the runs of AX.25 flags at each end, then the KISS data-frame
/// byte.
///
/// Returns the remaining bytes and whether a KISS data-frame byte was
/// present. The trailing data-frame byte is only removed when the buffer
/// also started with one.
///
/// An FCS byte equal to `0x7E` is indistinguishable from the closing flag
/// here; [`Frame::parse`](crate::Frame::parse) reclaims it by checking the
/// FCS.
///
/// ```
/// use aprs_codec::kiss;
///
/// assert_eq!(kiss::strip(b"\x7e\x00abc\x00\x7e"), (&b"abc"[..], true));
/// assert_eq!(kiss::strip(b"\x7e\x7eabc\x7e\x7e"), (&b"abc"[..], false));
/// ```
pub fn strip(raw: &[u8]) -> (&[u8], bool) {
    let leading = raw.iter().take_while(|&&b| b == AX25_FLAG).count();
    let frame = &raw[leading..];
    let trailing = frame.iter().rev().take_while(|&&b| b == AX25_FLAG).count();
    let frame = &frame[..frame.len() - trailing];

    match frame.strip_prefix(&[DATA_FRAME]) {
        Some(rest) => (rest.strip_suffix(&[DATA_FRAME]).unwrap_or(rest), true),
        None => (frame, false),
    }
}

/// Counterpart of [`strip`] applied to encoded frames.
///
/// Flags are already in place; the KISS command byte is added by the link
/// layer ([`encode`]), so the frame passes through unchanged.
pub fn wrap(frame: Vec<u8>) -> Vec<u8> {
    frame
}

// ---------------------------------------------------------------------------
// Byte stuffing
// ---------------------------------------------------------------------------

/// Escape FEND and FESC bytes.
pub fn escape(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for &byte in data {
        match byte {
            FEND => out.extend_from_slice(&[FESC, TFEND]),
            FESC => out.extend_from_slice(&[FESC, TFESC]),
            _ => out.push(byte),
        }
    }
    out
}

/// Reverse [`escape`]. Unknown escape sequences pass the second byte
/// through.
pub fn unescape(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut escaped = false;
    for &byte in data {
        if escaped {
            out.push(match byte {
                TFEND => FEND,
                TFESC => FESC,
                other => other,
            });
            escaped = false;
        } else if byte == FESC {
            escaped = true;
        } else {
            out.push(byte);
        }
    }
    out
}

/// Wrap an AX.25 frame in a KISS data frame for TNC `port`.
///
/// Ports above [`MAX_PORT`] are truncated to their low nibble.
pub fn encode(port: u8, ax25: &[u8]) -> Vec<u8> {
    let escaped = escape(ax25);
    let mut out = Vec::with_capacity(escaped.len() + 3);
    out.push(FEND);
    out.push(((port & MAX_PORT) << 4) | DATA_FRAME);
    out.extend_from_slice(&escaped);
    out.push(FEND);
    out
}

// ---------------------------------------------------------------------------
// KissDecoder
// ---------------------------------------------------------------------------

/// One data frame received from a TNC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KissFrame {
    /// TNC port the frame was heard on.
    pub port: u8,
    /// Unescaped AX.25 frame, without flags or FCS.
    pub payload: Vec<u8>,
}

/// Streaming decoder: feed link bytes, collect data frames.
///
/// Non-data commands (TX delay, persistence, ...) are discarded, as are
/// frames longer than [`MAX_FRAME_LEN`].
#[derive(Debug, Default)]
pub struct KissDecoder {
    in_frame: bool,
    command: Option<u8>,
    buffer: Vec<u8>,
    oversized: bool,
}

impl KissDecoder {
    /// A decoder waiting for the first FEND.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume `bytes` and return every data frame completed by them.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<KissFrame> {
        let mut frames = Vec::new();

        for &byte in bytes {
            if byte == FEND {
                if let Some(frame) = self.finish() {
                    frames.push(frame);
                }
                self.in_frame = true;
                continue;
            }
            if !self.in_frame {
                continue;
            }
            match self.command {
                None => self.command = Some(byte),
                Some(_) if self.buffer.len() < MAX_FRAME_LEN => self.buffer.push(byte),
                Some(_) => self.oversized = true,
            }
        }

        frames
    }

    fn finish(&mut self) -> Option<KissFrame> {
        let command = self.command.take()?;
        let raw = std::mem::take(&mut self.buffer);
        if std::mem::take(&mut self.oversized) {
            tracing::warn!(command, limit = MAX_FRAME_LEN, "dropping oversized KISS frame");
            return None;
        }
        if command & MAX_PORT != DATA_FRAME || raw.is_empty() {
            tracing::trace!(command, "discarding non-data KISS frame");
            return None;
        }
        Some(KissFrame {
            port: command >> 4,
            payload: unescape(&raw),
        })
    }
}
