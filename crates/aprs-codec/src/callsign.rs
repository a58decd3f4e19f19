//! AX.25 station addresses.
//!
//! A [`Callsign`] is the unit of AX.25 addressing: one to six upper-case
//! ASCII letters or digits, a 4-bit SSID and the "has been repeated" flag
//! set by digipeaters. It converts to and from both the text notation used on
//! APRS-IS (`W2GMD-1`, `WIDE1*`) and the 7-byte octet carried in the AX.25
//! address field.
//!
//! ```text
//!  byte 0..6   ASCII << 1, space padded     (low bit always clear)
//!  byte 6      H  R  R  S  S  S  S  E
//!              |  \__/  \________/  \_ address extension (never set here)
//!              |  0x60     SSID
//!              \_ has-been-repeated
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Maximum number of characters in the call part of an address.
pub const CALLSIGN_MAX_LEN: usize = 6;

/// Largest SSID representable in the 4 SSID bits.
pub const SSID_MAX: u8 = 15;

/// Size of one packed AX.25 address.
pub const ADDRESS_LEN: usize = 7;

const RESERVED_BITS: u8 = 0x60;
const REPEATED_BIT: u8 = 0x80;

// ---------------------------------------------------------------------------
// Callsign
// ---------------------------------------------------------------------------

/// A station or digipeater address.
///
/// # Examples
///
/// ```
/// use aprs_codec::Callsign;
///
/// let call: Callsign = "W2GMD-1".parse().unwrap();
/// assert_eq!(call.call(), "W2GMD");
/// assert_eq!(call.ssid(), 1);
/// assert_eq!(call.to_ax25(), *b"\xaed\x8e\x9a\x88@b");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub struct Callsign {
    call: String,
    ssid: u8,
    digipeated: bool,
}

impl Callsign {
    /// Build a callsign from its parts.
    ///
    /// `call` must be 1–6 ASCII alphanumerics and is upper-cased; `ssid`
    /// must be at most 15.
    pub fn new(call: &str, ssid: u8, digipeated: bool) -> Result<Self, CodecError> {
        let call = call.to_ascii_uppercase();
        check_call(call.as_bytes(), &call)?;
        check_ssid(call.as_bytes(), ssid)?;
        Ok(Self {
            call,
            ssid,
            digipeated,
        })
    }

    /// Decode an address of unknown encoding.
    ///
    /// Exactly seven bytes are first tried as an AX.25 octet; when that
    /// fails, or yields no usable call, the input is read as text.
    pub fn parse(raw: &[u8]) -> Result<Self, CodecError> {
        if raw.len() == ADDRESS_LEN {
            match Self::from_ax25(raw, false) {
                Ok(callsign) if valid_call(&callsign.call) => return Ok(callsign),
                Ok(callsign) => {
                    tracing::debug!(call = %callsign.call, "AX.25 octet has no usable call, reading as text");
                }
                Err(err) => tracing::debug!(%err, "not an AX.25 octet, reading as text"),
            }
        }
        Self::from_text(raw)
    }

    /// Parse the text notation `CALL[-SSID][*]`.
    ///
    /// A `*` marks the address as digipeated; a missing SSID means `0`.
    /// The call is upper-cased.
    pub fn from_text(raw: &[u8]) -> Result<Self, CodecError> {
        let stripped = raw.trim_ascii();
        let unstarred = trim_stars(stripped);
        let digipeated = unstarred.len() != stripped.len();

        let (call, ssid) = match unstarred.iter().position(|&b| b == b'-') {
            Some(dash) => (&unstarred[..dash], parse_ssid(raw, &unstarred[dash + 1..])?),
            None => (unstarred, 0),
        };

        let call = std::str::from_utf8(call)
            .map_err(|_| CodecError::callsign(raw, "callsign is not ASCII text"))?
            .to_ascii_uppercase();
        check_call(raw, &call)?;

        Ok(Self {
            call,
            ssid,
            digipeated,
        })
    }

    /// Decode a packed AX.25 address octet.
    ///
    /// Only the first seven bytes of `raw` are read. Shifted characters other
    /// than upper-case letters and digits (the space padding) are dropped.
    /// When `kiss_mode` is set the repeated flag is read from the shifted SSID
    /// byte, which is how KISS-delivered source and destination octets are
    /// interpreted.
    pub fn from_ax25(raw: &[u8], kiss_mode: bool) -> Result<Self, CodecError> {
        if raw.len() < ADDRESS_LEN {
            return Err(CodecError::callsign(
                raw,
                format!("expected {ADDRESS_LEN} address bytes, got {}", raw.len()),
            ));
        }

        let mut call = String::with_capacity(CALLSIGN_MAX_LEN);
        for &byte in &raw[..CALLSIGN_MAX_LEN] {
            if byte & 0x01 != 0 {
                return Err(CodecError::callsign(
                    &raw[..ADDRESS_LEN],
                    "bad address-end flag",
                ));
            }
            let ch = byte >> 1;
            if is_call_char(ch) {
                call.push(char::from(ch));
            }
        }

        let ssid_byte = raw[CALLSIGN_MAX_LEN];
        let digipeated = if kiss_mode {
            (ssid_byte >> 1) & REPEATED_BIT != 0
        } else {
            ssid_byte & REPEATED_BIT != 0
        };

        Ok(Self {
            call,
            ssid: (ssid_byte >> 1) & 0x0F,
            digipeated,
        })
    }

    /// Encode as a packed AX.25 address octet.
    ///
    /// The address extension bit is left clear; frame boundaries are found
    /// through the control/PID delimiter instead.
    pub fn to_ax25(&self) -> [u8; ADDRESS_LEN] {
        let mut octet = [b' ' << 1; ADDRESS_LEN];
        for (slot, byte) in octet.iter_mut().zip(self.call.bytes()) {
            *slot = byte << 1;
        }

        let mut ssid = (self.ssid << 1) | RESERVED_BITS;
        if self.digipeated {
            ssid |= REPEATED_BIT;
        }
        octet[CALLSIGN_MAX_LEN] = ssid;
        octet
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The call part, without SSID or padding.
    pub fn call(&self) -> &str {
        &self.call
    }

    /// The secondary station identifier (0–15).
    pub fn ssid(&self) -> u8 {
        self.ssid
    }

    /// Whether this address has already relayed the frame.
    pub fn is_digipeated(&self) -> bool {
        self.digipeated
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Replace the call part, upper-cased.
    pub fn set_call(&mut self, call: &str) -> Result<(), CodecError> {
        let call = call.to_ascii_uppercase();
        check_call(call.as_bytes(), &call)?;
        self.call = call;
        Ok(())
    }

    /// Replace the SSID.
    pub fn set_ssid(&mut self, ssid: u8) -> Result<(), CodecError> {
        check_ssid(self.call.as_bytes(), ssid)?;
        self.ssid = ssid;
        Ok(())
    }

    /// Mark or clear the has-been-repeated flag.
    pub fn set_digipeated(&mut self, digipeated: bool) {
        self.digipeated = digipeated;
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.call)?;
        if self.ssid > 0 {
            write!(f, "-{}", self.ssid)?;
        }
        if self.digipeated {
            f.write_str("*")?;
        }
        Ok(())
    }
}

impl FromStr for Callsign {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s.as_bytes())
    }
}

impl TryFrom<&str> for Callsign {
    type Error = CodecError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_text(s.as_bytes())
    }
}

impl TryFrom<String> for Callsign {
    type Error = CodecError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_text(s.as_bytes())
    }
}

impl From<Callsign> for String {
    fn from(callsign: Callsign) -> Self {
        callsign.to_string()
    }
}

/// Returns `true` when `text` parses as a `CALL[-SSID][*]` address.
///
/// ```
/// assert!(aprs_codec::valid_callsign("W2GMD-9"));
/// assert!(!aprs_codec::valid_callsign("W2GMD-16"));
/// ```
pub fn valid_callsign(text: &str) -> bool {
    Callsign::from_text(text.as_bytes()).is_ok()
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn is_call_char(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte.is_ascii_digit()
}

fn valid_call(call: &str) -> bool {
    (1..=CALLSIGN_MAX_LEN).contains(&call.len()) && call.bytes().all(is_call_char)
}

fn check_call(raw: &[u8], call: &str) -> Result<(), CodecError> {
    if valid_call(call) {
        Ok(())
    } else {
        Err(CodecError::callsign(
            raw,
            format!("call must be 1 to {CALLSIGN_MAX_LEN} ASCII alphanumerics"),
        ))
    }
}

fn check_ssid(raw: &[u8], ssid: u8) -> Result<(), CodecError> {
    if ssid <= SSID_MAX {
        Ok(())
    } else {
        Err(CodecError::callsign(
            raw,
            format!("SSID must be between 0 and {SSID_MAX}"),
        ))
    }
}

fn parse_ssid(raw: &[u8], digits: &[u8]) -> Result<u8, CodecError> {
    if digits.is_empty() || digits.len() > 2 || !digits.iter().all(u8::is_ascii_digit) {
        return Err(CodecError::callsign(raw, "SSID must be a decimal number"));
    }
    let ssid = digits.iter().fold(0u8, |acc, d| acc * 10 + (d - b'0'));
    check_ssid(raw, ssid)?;
    Ok(ssid)
}

fn trim_stars(mut bytes: &[u8]) -> &[u8] {
    while let [b'*', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b'*'] = bytes {
        bytes = rest;
    }
    bytes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
