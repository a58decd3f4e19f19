//! # Position report builder
//!
//! Fluent builder producing an uncompressed APRS position report (the
//! `=` dialect: no timestamp, messaging capable) as a ready-to-send
//! [`Frame`].
//!
//! ```rust
//! use aprs_codec::PositionReport;
//!
//! let frame = PositionReport::new("W2GMD-9".parse().unwrap(), 37.7418096, -122.38833)
//!     .symbol('/', '>')
//!     .comment("mobile")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(frame.to_string(), "W2GMD-9>APRS:=3744.51N/12223.30W>mobile");
//! ```

use crate::callsign::Callsign;
use crate::error::CodecError;
use crate::frame::Frame;
use crate::geo::{ambiguate, dec2dm_lat, dec2dm_lng};
use crate::information::InformationField;

/// Destination used when none is given.
pub const DEFAULT_TOCALL: &str = "APRS";

/// Highest position ambiguity level.
pub const MAX_AMBIGUITY: u8 = 4;

/// Builder for a position report frame.
///
/// Created via [`PositionReport::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    source: Callsign,
    destination: Option<Callsign>,
    path: Vec<Callsign>,
    latitude: f64,
    longitude: f64,
    symbol_table: char,
    symbol_code: char,
    comment: String,
    ambiguity: u8,
}

impl PositionReport {
    /// Start a report for `source` at the given decimal-degree position.
    pub fn new(source: Callsign, latitude: f64, longitude: f64) -> Self {
        Self {
            source,
            destination: None,
            path: Vec::new(),
            latitude,
            longitude,
            symbol_table: '/',
            symbol_code: '>',
            comment: String::new(),
            ambiguity: 0,
        }
    }

    /// Set the destination (TOCALL). Defaults to [`DEFAULT_TOCALL`].
    pub fn destination(mut self, destination: Callsign) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Set the digipeater path.
    pub fn path(mut self, path: Vec<Callsign>) -> Self {
        self.path = path;
        self
    }

    /// Set the symbol table identifier and symbol code.
    pub fn symbol(mut self, table: char, code: char) -> Self {
        self.symbol_table = table;
        self.symbol_code = code;
        self
    }

    /// Set the free-text comment following the symbol.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the position ambiguity level (0–4 blanked digits).
    pub fn ambiguity(mut self, level: u8) -> Self {
        self.ambiguity = level;
        self
    }

    /// Render the information field: `=LAT<table>LNG<code><comment>`.
    pub fn info_field(&self) -> Result<InformationField, CodecError> {
        self.validate()?;

        let payload = format!(
            "={}{}{}{}{}",
            ambiguate(&dec2dm_lat(self.latitude), self.ambiguity),
            self.symbol_table,
            ambiguate(&dec2dm_lng(self.longitude), self.ambiguity),
            self.symbol_code,
            self.comment,
        );
        Ok(InformationField::classify(payload.as_bytes()))
    }

    /// Build the complete frame.
    pub fn build(self) -> Result<Frame, CodecError> {
        let info = self.info_field()?;
        let destination = match self.destination {
            Some(destination) => destination,
            None => DEFAULT_TOCALL.parse()?,
        };
        Frame::new(self.source, destination, self.path, info)
    }

    fn validate(&self) -> Result<(), CodecError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CodecError::position(format!(
                "latitude {} is outside -90..=90",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CodecError::position(format!(
                "longitude {} is outside -180..=180",
                self.longitude
            )));
        }
        if self.ambiguity > MAX_AMBIGUITY {
            return Err(CodecError::position(format!(
                "ambiguity {} is above {MAX_AMBIGUITY}",
                self.ambiguity
            )));
        }
        Ok(())
    }
}
