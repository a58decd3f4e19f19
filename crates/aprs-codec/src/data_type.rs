//! APRS data type identifiers.
//!
//! The first byte of every information field selects one of the APRS
//! payload dialects. The mapping below follows the identifier table of the
//! APRS 1.0.1 protocol reference; bytes that are not listed map to
//! [`DataType::Unrecognized`].

use serde::{Deserialize, Serialize};

/// The payload dialect announced by an information field's first byte.
///
/// Variants render (and parse) as the snake_case tags used by dialect
/// handlers, e.g. `position_nots_nomsg` or `status`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum DataType {
    /// `0x1C`: current Mic-E data (Rev 0 beta).
    #[strum(serialize = "current_mice_rev0")]
    #[serde(rename = "current_mice_rev0")]
    CurrentMicERev0,
    /// `0x1D`: old Mic-E data (Rev 0 beta).
    #[strum(serialize = "old_mice_rev0")]
    #[serde(rename = "old_mice_rev0")]
    OldMicERev0,
    /// `!`: position without timestamp, no APRS messaging.
    #[strum(serialize = "position_nots_nomsg")]
    #[serde(rename = "position_nots_nomsg")]
    PositionNoTimestampNoMessaging,
    /// `=`: position without timestamp, with APRS messaging.
    #[strum(serialize = "position_nots_msg")]
    #[serde(rename = "position_nots_msg")]
    PositionNoTimestampWithMessaging,
    /// `/`: position with timestamp, no APRS messaging.
    #[strum(serialize = "position_ts_nomsg")]
    #[serde(rename = "position_ts_nomsg")]
    PositionWithTimestampNoMessaging,
    /// `@`: position with timestamp, with APRS messaging.
    #[strum(serialize = "position_ts_msg")]
    #[serde(rename = "position_ts_msg")]
    PositionWithTimestampWithMessaging,
    /// `#` or `*`: Peet Bros U-II weather station.
    #[strum(serialize = "peet_bros_wx")]
    #[serde(rename = "peet_bros_wx")]
    PeetBrosWeather,
    /// `$`: raw GPS data or Ultimeter 2000.
    #[strum(serialize = "raw_gps")]
    #[serde(rename = "raw_gps")]
    RawGps,
    /// `%`: Agrelo DFJr / MicroFinder.
    #[strum(serialize = "agrelo_df")]
    #[serde(rename = "agrelo_df")]
    AgreloDf,
    /// `&`: reserved, map feature.
    #[strum(serialize = "map_feature")]
    #[serde(rename = "map_feature")]
    MapFeature,
    /// `'`: old Mic-E data (current for TM-D700).
    #[strum(serialize = "old_mice")]
    #[serde(rename = "old_mice")]
    OldMicE,
    /// `` ` ``: current Mic-E data.
    #[strum(serialize = "current_mice")]
    #[serde(rename = "current_mice")]
    CurrentMicE,
    /// `)`: item.
    #[strum(serialize = "item")]
    #[serde(rename = "item")]
    Item,
    /// `;`: object.
    #[strum(serialize = "object")]
    #[serde(rename = "object")]
    Object,
    /// `+`: reserved, shelter data with time.
    #[strum(serialize = "shelter_data")]
    #[serde(rename = "shelter_data")]
    ShelterData,
    /// `,`: invalid data or test data.
    #[strum(serialize = "invalid_or_test")]
    #[serde(rename = "invalid_or_test")]
    InvalidOrTest,
    /// `.`: reserved, space weather.
    #[strum(serialize = "space_weather")]
    #[serde(rename = "space_weather")]
    SpaceWeather,
    /// `:`: message, bulletin or announcement.
    #[strum(serialize = "message")]
    #[serde(rename = "message")]
    Message,
    /// `<`: station capabilities.
    #[strum(serialize = "station_capabilities")]
    #[serde(rename = "station_capabilities")]
    StationCapabilities,
    /// `>`: status.
    #[strum(serialize = "status")]
    #[serde(rename = "status")]
    Status,
    /// `?`: query.
    #[strum(serialize = "query")]
    #[serde(rename = "query")]
    Query,
    /// `T`: telemetry data.
    #[strum(serialize = "telemetry")]
    #[serde(rename = "telemetry")]
    Telemetry,
    /// `[`: Maidenhead grid locator beacon (obsolete).
    #[strum(serialize = "maidenhead_locator")]
    #[serde(rename = "maidenhead_locator")]
    MaidenheadLocator,
    /// `_`: weather report without position.
    #[strum(serialize = "weather")]
    #[serde(rename = "weather")]
    Weather,
    /// `{`: user-defined APRS packet format.
    #[strum(serialize = "user_defined")]
    #[serde(rename = "user_defined")]
    UserDefined,
    /// `}`: third-party traffic.
    #[strum(serialize = "third_party")]
    #[serde(rename = "third_party")]
    ThirdParty,
    /// Any byte not listed above, or an empty payload.
    #[default]
    #[strum(serialize = "unrecognized")]
    #[serde(rename = "unrecognized")]
    Unrecognized,
}

impl DataType {
    /// Look up the dialect announced by a payload's first byte.
    ///
    /// ```
    /// use aprs_codec::DataType;
    ///
    /// assert_eq!(DataType::from_identifier(b'>'), DataType::Status);
    /// assert_eq!(DataType::from_identifier(b'x'), DataType::Unrecognized);
    /// ```
    pub fn from_identifier(byte: u8) -> Self {
        match byte {
            0x1C => Self::CurrentMicERev0,
            0x1D => Self::OldMicERev0,
            b'!' => Self::PositionNoTimestampNoMessaging,
            b'=' => Self::PositionNoTimestampWithMessaging,
            b'/' => Self::PositionWithTimestampNoMessaging,
            b'@' => Self::PositionWithTimestampWithMessaging,
            b'#' | b'*' => Self::PeetBrosWeather,
            b'$' => Self::RawGps,
            b'%' => Self::AgreloDf,
            b'&' => Self::MapFeature,
            b'\'' => Self::OldMicE,
            b'`' => Self::CurrentMicE,
            b')' => Self::Item,
            b';' => Self::Object,
            b'+' => Self::ShelterData,
            b',' => Self::InvalidOrTest,
            b'.' => Self::SpaceWeather,
            b':' => Self::Message,
            b'<' => Self::StationCapabilities,
            b'>' => Self::Status,
            b'?' => Self::Query,
            b'T' => Self::Telemetry,
            b'[' => Self::MaidenheadLocator,
            b'_' => Self::Weather,
            b'{' => Self::UserDefined,
            b'}' => Self::ThirdParty,
            _ => Self::Unrecognized,
        }
    }

    /// Whether this dialect carries a station position.
    pub fn is_position(self) -> bool {
        matches!(
            self,
            Self::PositionNoTimestampNoMessaging
                | Self::PositionNoTimestampWithMessaging
                | Self::PositionWithTimestampNoMessaging
                | Self::PositionWithTimestampWithMessaging
        )
    }

    /// Whether this is one of the compressed Mic-E encodings.
    pub fn is_mic_e(self) -> bool {
        matches!(
            self,
            Self::CurrentMicE | Self::OldMicE | Self::CurrentMicERev0 | Self::OldMicERev0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn common_identifiers() {
        assert_eq!(
            DataType::from_identifier(b'!'),
            DataType::PositionNoTimestampNoMessaging
        );
        assert_eq!(
            DataType::from_identifier(b'='),
            DataType::PositionNoTimestampWithMessaging
        );
        assert_eq!(
            DataType::from_identifier(b'@'),
            DataType::PositionWithTimestampWithMessaging
        );
        assert_eq!(DataType::from_identifier(b';'), DataType::Object);
        assert_eq!(DataType::from_identifier(b')'), DataType::Item);
        assert_eq!(DataType::from_identifier(b'T'), DataType::Telemetry);
        assert_eq!(DataType::from_identifier(b'_'), DataType::Weather);
        assert_eq!(DataType::from_identifier(b'`'), DataType::CurrentMicE);
        assert_eq!(DataType::from_identifier(b'\''), DataType::OldMicE);
        assert_eq!(DataType::from_identifier(b'{'), DataType::UserDefined);
        assert_eq!(DataType::from_identifier(b'}'), DataType::ThirdParty);
        assert_eq!(DataType::from_identifier(b':'), DataType::Message);
        assert_eq!(DataType::from_identifier(b'<'), DataType::StationCapabilities);
        assert_eq!(DataType::from_identifier(b'?'), DataType::Query);
    }

    #[test]
    fn unlisted_bytes_are_unrecognized() {
        for byte in [b'A', b'0', b'~', 0x00, 0xFF] {
            assert_eq!(DataType::from_identifier(byte), DataType::Unrecognized);
        }
    }

    #[test]
    fn tags_parse_back() {
        for data_type in DataType::iter() {
            let tag = data_type.to_string();
            assert_eq!(tag.parse::<DataType>().unwrap(), data_type, "{tag}");
        }
        assert_eq!(DataType::Status.to_string(), "status");
        assert_eq!(
            DataType::PositionNoTimestampNoMessaging.as_ref(),
            "position_nots_nomsg"
        );
    }

    #[test]
    fn every_listed_identifier_is_distinct_from_unrecognized() {
        let listed = b"!=/@#*$%&'`);+,.:<>?T[_{}";
        for &byte in listed.iter().chain(&[0x1C, 0x1D]) {
            assert_ne!(DataType::from_identifier(byte), DataType::Unrecognized);
        }
    }

    #[test]
    fn predicates() {
        assert!(DataType::PositionWithTimestampNoMessaging.is_position());
        assert!(!DataType::Status.is_position());
        assert!(DataType::OldMicE.is_mic_e());
        assert!(!DataType::Object.is_mic_e());
    }

    #[test]
    fn serde_tag_roundtrip() {
        let json = serde_json::to_string(&DataType::ThirdParty).unwrap();
        assert_eq!(json, "\"third_party\"");
        let back: DataType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DataType::ThirdParty);
        assert!(serde_json::from_str::<DataType>("\"ThirdParty\"").is_err());
    }

    #[test]
    fn serde_and_display_tags_agree() {
        for data_type in DataType::iter() {
            let json = serde_json::to_string(&data_type).unwrap();
            assert_eq!(json, format!("\"{data_type}\""));
            assert_eq!(serde_json::from_str::<DataType>(&json).unwrap(), data_type);
        }
    }
}
