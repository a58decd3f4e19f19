//! APRS frames in text and AX.25 form.
//!
//! A [`Frame`] is decoded from a [`RawFrame`], either an APRS-IS text line
//! or an AX.25 buffer, and can be rendered back to either form.
//!
//! ```text
//! text    SOURCE>DEST[,PATH1,PATH2,...]:INFO
//! AX.25   0x7E | DEST(7) SOURCE(7) PATH(7 each) | 0x03 0xF0 | INFO | FCS(2) | 0x7E
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::callsign::{Callsign, ADDRESS_LEN};
use crate::error::CodecError;
use crate::fcs::{Fcs, FCS_LEN};
use crate::information::{HandlerRegistry, InformationField};
use crate::kiss;

/// HDLC flag opening and closing an AX.25 frame.
pub const AX25_FLAG: u8 = 0x7E;

/// UI control field followed by the "no layer 3" protocol id.
pub const ADDR_INFO_DELIM: [u8; 2] = [0x03, 0xF0];

/// Most digipeaters an AX.25 address field can carry.
pub const MAX_PATH_LEN: usize = 8;

// ---------------------------------------------------------------------------
// RawFrame
// ---------------------------------------------------------------------------

/// Undecoded frame input.
///
/// Text is always parsed as an APRS-IS line. Binary input is parsed as
/// AX.25 when it contains the `0x03 0xF0` delimiter, and as a text line
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFrame<'a> {
    /// An APRS-IS style text line.
    Text(&'a str),
    /// Bytes from a radio link, possibly AX.25 or KISS framed.
    Binary(&'a [u8]),
}

impl<'a> From<&'a str> for RawFrame<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for RawFrame<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a [u8]> for RawFrame<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Binary(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for RawFrame<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Binary(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for RawFrame<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::Binary(bytes)
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One APRS packet.
///
/// # Examples
///
/// ```
/// use aprs_codec::{DataType, Frame};
///
/// let frame = Frame::parse("W2GMD-1>APRS,WIDE1-1:>hello").unwrap();
/// assert_eq!(frame.source().to_string(), "W2GMD-1");
/// assert_eq!(frame.info().data_type(), DataType::Status);
///
/// let decoded = Frame::parse(&frame.encode()).unwrap();
/// assert_eq!(decoded, frame);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    source: Callsign,
    destination: Callsign,
    path: Vec<Callsign>,
    info: InformationField,
}

impl Frame {
    /// Assemble a frame from its parts.
    pub fn new(
        source: Callsign,
        destination: Callsign,
        path: Vec<Callsign>,
        info: InformationField,
    ) -> Result<Self, CodecError> {
        check_path_len(path.len())?;
        Ok(Self {
            source,
            destination,
            path,
            info,
        })
    }

    // ------------------------------------------------------------------
    // Decoding
    // ------------------------------------------------------------------

    /// Decode a text line or an AX.25 buffer.
    pub fn parse<'a>(raw: impl Into<RawFrame<'a>>) -> Result<Self, CodecError> {
        Self::parse_with(raw, &HandlerRegistry::default())
    }

    /// Decode like [`Frame::parse`], classifying the information field
    /// through `handlers`.
    ///
    /// Binary input that fails AX.25 decoding is retried once as text; if
    /// that fails too, the AX.25 error is returned.
    pub fn parse_with<'a>(
        raw: impl Into<RawFrame<'a>>,
        handlers: &HandlerRegistry,
    ) -> Result<Self, CodecError> {
        match raw.into() {
            RawFrame::Text(text) => Self::decode_text(text.as_bytes(), handlers),
            RawFrame::Binary(bytes) if find_delimiter(bytes).is_some() => {
                Self::decode_ax25(bytes, handlers).or_else(|err| {
                    debug!(%err, "AX.25 decoding failed, retrying as text");
                    Self::decode_text(bytes, handlers).map_err(|_| err)
                })
            }
            RawFrame::Binary(bytes) => Self::decode_text(bytes, handlers),
        }
    }

    /// Decode the payload of a KISS data frame: an AX.25 frame without
    /// flags or FCS, as delivered by a TNC.
    pub fn from_kiss_payload(payload: &[u8]) -> Result<Self, CodecError> {
        let (addressing, information) = split_at_delimiter(payload)?;
        Self::decode_addresses(addressing, true, information, &HandlerRegistry::default())
    }

    fn decode_text(raw: &[u8], handlers: &HandlerRegistry) -> Result<Self, CodecError> {
        let source_end = raw
            .iter()
            .position(|&b| b == b'>')
            .ok_or_else(|| CodecError::frame("missing '>' after source"))?;
        let rest = &raw[source_end + 1..];
        let path_end = rest
            .iter()
            .position(|&b| b == b':')
            .ok_or_else(|| CodecError::frame("missing ':' before information field"))?;

        let source = Callsign::from_text(&raw[..source_end])?;
        let mut addresses = rest[..path_end].split(|&b| b == b',');
        let destination = Callsign::from_text(addresses.next().unwrap_or_default())?;
        let path = addresses
            .map(Callsign::from_text)
            .collect::<Result<Vec<_>, _>>()?;
        let info = InformationField::classify_with(&rest[path_end + 1..], handlers);

        Self::new(source, destination, path, info)
    }

    fn decode_ax25(raw: &[u8], handlers: &HandlerRegistry) -> Result<Self, CodecError> {
        let (body, kiss_mode) = kiss::strip(raw);
        let body = if kiss_mode { body } else { reclaim_flag_fcs(raw, body) };
        let (addressing, information) = split_at_delimiter(body)?;

        let info_len = information
            .len()
            .checked_sub(FCS_LEN)
            .ok_or_else(|| CodecError::frame("missing frame check sequence"))?;
        if !Fcs::verify(body) {
            debug!(kiss_mode, "frame check sequence mismatch");
        }

        Self::decode_addresses(addressing, kiss_mode, &information[..info_len], handlers)
    }

    fn decode_addresses(
        addressing: &[u8],
        kiss_mode: bool,
        information: &[u8],
        handlers: &HandlerRegistry,
    ) -> Result<Self, CodecError> {
        if addressing.len() < 2 * ADDRESS_LEN || addressing.len() % ADDRESS_LEN != 0 {
            return Err(CodecError::frame(format!(
                "address field is {} bytes, expected two or more {ADDRESS_LEN}-byte addresses",
                addressing.len()
            )));
        }

        let (endpoints, digipeaters) = addressing.split_at(2 * ADDRESS_LEN);
        check_path_len(digipeaters.len() / ADDRESS_LEN)?;

        let destination = Callsign::from_ax25(&endpoints[..ADDRESS_LEN], kiss_mode)?;
        let source = Callsign::from_ax25(&endpoints[ADDRESS_LEN..], kiss_mode)?;
        // Digipeater octets always carry the H bit in place.
        let path = digipeaters
            .chunks_exact(ADDRESS_LEN)
            .map(|octet| Callsign::from_ax25(octet, false))
            .collect::<Result<Vec<_>, _>>()?;
        let info = InformationField::classify_with(information, handlers);

        Ok(Self {
            source,
            destination,
            path,
            info,
        })
    }

    // ------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------

    /// Encode as a flagged AX.25 UI frame with its FCS.
    pub fn encode(&self) -> Vec<u8> {
        let body = self.encode_body();
        let mut frame = Vec::with_capacity(body.len() + FCS_LEN + 2);
        frame.push(AX25_FLAG);
        frame.extend_from_slice(&body);
        frame.extend_from_slice(&Fcs::checksum(&body));
        frame.push(AX25_FLAG);
        kiss::wrap(frame)
    }

    /// Encode as a KISS data frame for TNC `port`.
    ///
    /// The TNC adds flags and FCS itself, so neither is included.
    pub fn to_kiss(&self, port: u8) -> Vec<u8> {
        kiss::encode(port, &self.encode_body())
    }

    fn encode_body(&self) -> Vec<u8> {
        let addresses = 2 + self.path.len();
        let mut body =
            Vec::with_capacity(addresses * ADDRESS_LEN + ADDR_INFO_DELIM.len() + self.info.payload().len());
        body.extend_from_slice(&self.destination.to_ax25());
        body.extend_from_slice(&self.source.to_ax25());
        for hop in &self.path {
            body.extend_from_slice(&hop.to_ax25());
        }
        body.extend_from_slice(&ADDR_INFO_DELIM);
        body.extend_from_slice(self.info.payload());
        body
    }

    /// The text line as raw bytes, without decoding the payload.
    pub fn to_text_bytes(&self) -> Vec<u8> {
        let mut line = format!("{}>{}", self.source, self.destination);
        for hop in &self.path {
            line.push(',');
            line.push_str(&hop.to_string());
        }
        line.push(':');

        let mut bytes = line.into_bytes();
        bytes.extend_from_slice(self.info.payload());
        bytes
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The originating station.
    pub fn source(&self) -> &Callsign {
        &self.source
    }

    /// The destination, usually a TOCALL naming the sending software.
    pub fn destination(&self) -> &Callsign {
        &self.destination
    }

    /// Digipeaters in transmission order.
    pub fn path(&self) -> &[Callsign] {
        &self.path
    }

    /// The information field.
    pub fn info(&self) -> &InformationField {
        &self.info
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Replace the source.
    pub fn set_source(&mut self, source: Callsign) {
        self.source = source;
    }

    /// Replace the destination.
    pub fn set_destination(&mut self, destination: Callsign) {
        self.destination = destination;
    }

    /// Replace the whole digipeater path.
    pub fn set_path(&mut self, path: Vec<Callsign>) -> Result<(), CodecError> {
        check_path_len(path.len())?;
        self.path = path;
        Ok(())
    }

    /// Append a digipeater to the path.
    pub fn push_path(&mut self, hop: Callsign) -> Result<(), CodecError> {
        check_path_len(self.path.len() + 1)?;
        self.path.push(hop);
        Ok(())
    }

    /// Replace the information field.
    pub fn set_info(&mut self, info: InformationField) {
        self.info = info;
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.source, self.destination)?;
        for hop in &self.path {
            write!(f, ",{hop}")?;
        }
        write!(f, ":{}", self.info)
    }
}

impl std::str::FromStr for Frame {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_path_len(len: usize) -> Result<(), CodecError> {
    if len > MAX_PATH_LEN {
        return Err(CodecError::frame(format!(
            "path has {len} digipeaters, at most {MAX_PATH_LEN} allowed"
        )));
    }
    Ok(())
}

/// Extend `body` over FCS bytes equal to [`AX25_FLAG`] that flag stripping
/// removed, when doing so makes the FCS verify. At least one closing flag
/// is always left out.
fn reclaim_flag_fcs<'a>(raw: &'a [u8], body: &'a [u8]) -> &'a [u8] {
    if Fcs::verify(body) {
        return body;
    }
    let start = raw.iter().take_while(|&&b| b == AX25_FLAG).count();
    let end = start + body.len();
    (end + 1..=end + FCS_LEN)
        .take_while(|&stop| stop < raw.len())
        .map(|stop| &raw[start..stop])
        .find(|candidate| Fcs::verify(candidate))
        .unwrap_or(body)
}

fn find_delimiter(bytes: &[u8]) -> Option<usize> {
    bytes.windows(ADDR_INFO_DELIM.len()).position(|w| w == ADDR_INFO_DELIM)
}

fn split_at_delimiter(body: &[u8]) -> Result<(&[u8], &[u8]), CodecError> {
    let at = find_delimiter(body)
        .ok_or_else(|| CodecError::frame("address/information delimiter not found"))?;
    Ok((&body[..at], &body[at + ADDR_INFO_DELIM.len()..]))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;

    fn call(text: &str) -> Callsign {
        text.parse().unwrap()
    }

    /// `W2GMD-6>APRX24,WIDE1-1*:>test` as heard over the air, FCS included.
    fn sample_ax25() -> Vec<u8> {
        flagged(b">test")
    }

    /// `W2GMD-6>APRX24,WIDE1-1*:<info>` between single flags.
    fn flagged(info: &[u8]) -> Vec<u8> {
        let mut body = vec![
            0x82, 0xA0, 0xA4, 0xB0, 0x64, 0x68, 0x60, // APRX24
            0xAE, 0x64, 0x8E, 0x9A, 0x88, 0x40, 0x6C, // W2GMD-6
            0xAE, 0x92, 0x88, 0x8A, 0x62, 0x40, 0xE2, // WIDE1-1*
            0x03, 0xF0,
        ];
        body.extend_from_slice(info);
        let fcs = Fcs::checksum(&body);

        let mut frame = vec![AX25_FLAG];
        frame.extend_from_slice(&body);
        frame.extend_from_slice(&fcs);
        frame.push(AX25_FLAG);
        frame
    }

    #[test]
    fn text_dispatch() {
        let frame = Frame::parse("W2GMD-1>APRS,WIDE1-1:>hello").unwrap();
        assert_eq!(frame.source(), &call("W2GMD-1"));
        assert_eq!(frame.destination(), &call("APRS"));
        assert_eq!(frame.path(), &[call("WIDE1-1")]);
        assert_eq!(frame.info().data_type(), DataType::Status);
        assert_eq!(frame.info().payload(), b">hello");
    }

    #[test]
    fn text_without_path() {
        let frame = Frame::parse("W2GMD>APRS:>hi").unwrap();
        assert!(frame.path().is_empty());
        assert_eq!(frame.to_string(), "W2GMD>APRS:>hi");
    }

    #[test]
    fn text_info_may_contain_colons() {
        let frame = Frame::parse("W2GMD>APRS::N0CALL   :ack1").unwrap();
        assert_eq!(frame.info().data_type(), DataType::Message);
        assert_eq!(frame.info().payload(), b":N0CALL   :ack1");
    }

    #[test]
    fn text_rendering_preserves_path_order() {
        let line = "W2GMD-1>APRS,N0CALL-3*,WIDE1*,WIDE2-1:!4903.50N/07201.75W-test";
        let frame = Frame::parse(line).unwrap();
        assert_eq!(frame.to_string(), line);
        assert_eq!(frame.to_text_bytes(), line.as_bytes());
    }

    #[test]
    fn text_missing_delimiters() {
        assert!(matches!(
            Frame::parse("W2GMD APRS:>x"),
            Err(CodecError::MalformedFrame { .. })
        ));
        assert!(matches!(
            Frame::parse("W2GMD>APRS >x"),
            Err(CodecError::MalformedFrame { .. })
        ));
    }

    #[test]
    fn text_bad_callsign_is_reported() {
        assert!(matches!(
            Frame::parse("W2GMD-99>APRS:>x"),
            Err(CodecError::MalformedCallsign { .. })
        ));
    }

    #[test]
    fn binary_without_delimiter_is_read_as_text() {
        let frame = Frame::parse(b"W2GMD>APRS:>from bytes").unwrap();
        assert_eq!(frame.info().payload(), b">from bytes");
    }

    #[test]
    fn ax25_decode() {
        let frame = Frame::parse(&sample_ax25()).unwrap();
        assert_eq!(frame.destination().call(), "APRX24");
        assert_eq!(frame.source().to_string(), "W2GMD-6");
        assert_eq!(frame.path(), &[call("WIDE1-1*")]);
        assert_eq!(frame.info().payload(), b">test");
        assert_eq!(frame.to_string(), "W2GMD-6>APRX24,WIDE1-1*:>test");
    }

    #[test]
    fn ax25_encode_matches_captured_frame() {
        let frame = Frame::parse("W2GMD-6>APRX24,WIDE1-1*:>test").unwrap();
        assert_eq!(frame.encode(), sample_ax25());
    }

    #[test]
    fn ax25_roundtrip() {
        let frame = Frame::parse("KF6ZZZ-9>APZ001,N0CALL-3*,WIDE2-1:=3744.51N/12223.30W>hi").unwrap();
        let decoded = Frame::parse(&frame.encode()).unwrap();
        assert_eq!(decoded.source(), frame.source());
        assert_eq!(decoded.destination(), frame.destination());
        assert_eq!(decoded.path(), frame.path());
        assert_eq!(decoded.info().payload(), frame.info().payload());
    }

    #[test]
    fn ax25_roundtrip_with_empty_info() {
        let frame = Frame::new(call("W2GMD"), call("APRS"), vec![], InformationField::default()).unwrap();
        let decoded = Frame::parse(&frame.encode()).unwrap();
        assert!(decoded.info().is_empty());
        assert_eq!(decoded.source(), frame.source());
    }

    #[test]
    fn ax25_repeated_flags() {
        let mut raw = vec![AX25_FLAG, AX25_FLAG];
        raw.extend(sample_ax25());
        raw.push(AX25_FLAG);

        let frame = Frame::parse(&raw).unwrap();
        assert_eq!(frame.to_string(), "W2GMD-6>APRX24,WIDE1-1*:>test");
    }

    #[test]
    fn ax25_fcs_byte_equal_to_flag() {
        let raw = flagged(b">test 3");
        assert_eq!(raw[raw.len() - 3..], [0x20, AX25_FLAG, AX25_FLAG]);

        let frame = Frame::parse(&raw).unwrap();
        assert_eq!(frame.info().payload(), b">test 3");

        let mut padded = raw.clone();
        padded.extend_from_slice(&[AX25_FLAG, AX25_FLAG]);
        assert_eq!(Frame::parse(&padded).unwrap(), frame);
    }

    #[test]
    fn ax25_fcs_mismatch_still_decodes() {
        let mut raw = sample_ax25();
        let fcs_at = raw.len() - 3;
        raw[fcs_at] ^= 0xFF;
        assert_eq!(Frame::parse(&raw).unwrap().info().payload(), b">test");
    }

    #[test]
    fn ax25_kiss_bracketed() {
        let encoded = Frame::parse("W2GMD-6>APRX24,WIDE1-1*:>test").unwrap().encode();
        let mut wrapped = vec![kiss::DATA_FRAME];
        wrapped.extend_from_slice(&encoded[1..encoded.len() - 1]);
        wrapped.push(kiss::DATA_FRAME);

        let frame = Frame::parse(&wrapped).unwrap();
        assert_eq!(frame.source().to_string(), "W2GMD-6");
        assert_eq!(frame.path(), &[call("WIDE1-1*")]);
        assert_eq!(frame.info().payload(), b">test");
    }

    #[test]
    fn ax25_malformed_address_falls_back_then_reports() {
        let mut raw = sample_ax25();
        raw[1] |= 0x01;
        assert!(matches!(
            Frame::parse(&raw),
            Err(CodecError::MalformedCallsign { .. })
        ));
    }

    #[test]
    fn ax25_truncated_address_field() {
        let raw = [AX25_FLAG, 0x82, 0xA0, 0xA4, 0x03, 0xF0, b'>', 0x00, 0x00, AX25_FLAG];
        assert!(matches!(
            Frame::parse(&raw),
            Err(CodecError::MalformedFrame { .. })
        ));
    }

    #[test]
    fn text_containing_delimiter_bytes_falls_back_to_text() {
        let raw = b"W2GMD>APRS:>odd \x03\xf0 bytes";
        let frame = Frame::parse(raw).unwrap();
        assert_eq!(frame.info().payload(), b">odd \x03\xf0 bytes");
    }

    #[test]
    fn kiss_payload_roundtrip() {
        let frame = Frame::parse("W2GMD-6>APRX24,WIDE1-1*:>test").unwrap();
        let mut decoder = kiss::KissDecoder::new();
        let received = decoder.feed(&frame.to_kiss(0));
        assert_eq!(received.len(), 1);

        let decoded = Frame::from_kiss_payload(&received[0].payload).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn path_limit() {
        let hops = vec![call("WIDE1-1"); MAX_PATH_LEN + 1];
        assert!(Frame::new(call("W2GMD"), call("APRS"), hops, InformationField::default()).is_err());

        let mut frame = Frame::parse("W2GMD>APRS,A,B,C,D,E,F,G,H:>x").unwrap();
        assert_eq!(frame.path().len(), MAX_PATH_LEN);
        assert!(frame.push_path(call("I")).is_err());
        assert!(Frame::parse("W2GMD>APRS,A,B,C,D,E,F,G,H,I:>x").is_err());
    }

    #[test]
    fn setters() {
        let mut frame = Frame::parse("W2GMD>APRS:>x").unwrap();
        frame.set_source(call("N0CALL-7"));
        frame.set_destination(call("APZ001"));
        frame.set_path(vec![call("WIDE2-2")]).unwrap();
        frame.push_path(call("N0DIGI*")).unwrap();
        frame.set_info(InformationField::classify(b"Tlm"));
        assert_eq!(frame.to_string(), "N0CALL-7>APZ001,WIDE2-2,N0DIGI*:Tlm");
        assert_eq!(frame.info().data_type(), DataType::Telemetry);
    }

    #[test]
    fn handlers_apply_to_both_forms() {
        let handlers = HandlerRegistry::new().on(DataType::Status, |p: &[u8], t| {
            InformationField::new(p[1..].to_vec(), t, true)
        });
        let text = Frame::parse_with("W2GMD>APRS:>hi", &handlers).unwrap();
        assert_eq!(text.info().payload(), b"hi");

        let binary = Frame::parse_with(&Frame::parse("W2GMD>APRS:>hi").unwrap().encode(), &handlers).unwrap();
        assert_eq!(binary.info().payload(), b"hi");
    }

    #[test]
    fn serde_roundtrip() {
        let frame = Frame::parse("W2GMD-1>APRS,WIDE1-1:>hello").unwrap();
        let json = serde_json::to_string(&frame).unwrap();
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, frame);
    }
}
