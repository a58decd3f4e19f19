//! Degrees/minutes coordinate helpers for uncompressed APRS positions.

/// Format a latitude as `DDMM.mmN` / `DDMM.mmS`.
///
/// ```
/// assert_eq!(aprs_codec::dec2dm_lat(37.7418096), "3744.51N");
/// ```
pub fn dec2dm_lat(latitude: f64) -> String {
    let (degrees, minutes) = degrees_minutes(latitude);
    let hemisphere = if latitude < 0.0 { 'S' } else { 'N' };
    format!("{degrees:02}{minutes:05.2}{hemisphere}")
}

/// Format a longitude as `DDDMM.mmE` / `DDDMM.mmW`.
///
/// ```
/// assert_eq!(aprs_codec::dec2dm_lng(-122.38833), "12223.30W");
/// ```
pub fn dec2dm_lng(longitude: f64) -> String {
    let (degrees, minutes) = degrees_minutes(longitude);
    let hemisphere = if longitude < 0.0 { 'W' } else { 'E' };
    format!("{degrees:03}{minutes:05.2}{hemisphere}")
}

/// Blank the last `level` digits of a formatted coordinate, right to left,
/// skipping the decimal point.
///
/// ```
/// assert_eq!(aprs_codec::ambiguate("12345.67N", 3), "1234 .  N");
/// ```
pub fn ambiguate(position: &str, level: u8) -> String {
    let mut chars: Vec<char> = position.chars().collect();
    for digit in 0..usize::from(level) {
        // Skip the hemisphere letter, then the decimal point past two digits.
        let from_end = if digit > 1 { digit + 3 } else { digit + 2 };
        if let Some(index) = chars.len().checked_sub(from_end) {
            chars[index] = ' ';
        }
    }
    chars.into_iter().collect()
}

/// Split into whole degrees and minutes, rounded to hundredths of a minute.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn degrees_minutes(value: f64) -> (u64, f64) {
    let hundredths = (value.abs() * 6000.0).round() as u64;
    (hundredths / 6000, (hundredths % 6000) as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latitude_north_and_south() {
        assert_eq!(dec2dm_lat(37.7418096), "3744.51N");
        assert_eq!(dec2dm_lat(-33.8688), "3352.13S");
        assert_eq!(dec2dm_lat(0.0), "0000.00N");
    }

    #[test]
    fn longitude_east_and_west() {
        assert_eq!(dec2dm_lng(-122.38833), "12223.30W");
        assert_eq!(dec2dm_lng(2.3522), "00221.13E");
        assert_eq!(dec2dm_lng(-72.029167), "07201.75W");
    }

    #[test]
    fn minutes_are_zero_padded() {
        assert_eq!(dec2dm_lat(49.0583333), "4903.50N");
    }

    #[test]
    fn rounding_carries_into_degrees() {
        assert_eq!(dec2dm_lat(10.999999), "1100.00N");
    }

    #[test]
    fn ambiguity_levels() {
        let pos = "12345.67N";
        assert_eq!(ambiguate(pos, 0), "12345.67N");
        assert_eq!(ambiguate(pos, 1), "12345.6 N");
        assert_eq!(ambiguate(pos, 2), "12345.  N");
        assert_eq!(ambiguate(pos, 3), "1234 .  N");
        assert_eq!(ambiguate(pos, 4), "123  .  N");
    }
}
