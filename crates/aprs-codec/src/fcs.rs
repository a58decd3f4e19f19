//! AX.25 frame check sequence.
//!
//! CRC-16 with the reflected CCITT polynomial (`0x8408`), preset to
//! `0xFFFF` and complemented on output, fed least-significant bit first as
//! the bits go out on the air. The digest is transmitted low byte first.

/// Number of FCS bytes at the end of an AX.25 frame.
pub const FCS_LEN: usize = 2;

const PRESET: u16 = 0xFFFF;
const POLYNOMIAL: u16 = 0x8408;

/// Running frame check sequence.
///
/// ```
/// use aprs_codec::Fcs;
///
/// let mut fcs = Fcs::new();
/// fcs.update(b"123456789");
/// assert_eq!(fcs.value(), 0x906E);
/// assert_eq!(fcs.digest(), [0x6E, 0x90]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fcs {
    register: u16,
}

impl Fcs {
    /// A fresh register.
    pub const fn new() -> Self {
        Self { register: PRESET }
    }

    /// Shift one bit through the register.
    pub fn update_bit(&mut self, bit: bool) {
        let low = self.register & 0x0001 != 0;
        self.register >>= 1;
        if low != bit {
            self.register ^= POLYNOMIAL;
        }
    }

    /// Feed `bytes`, each least-significant bit first.
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            for shift in 0..8 {
                self.update_bit((byte >> shift) & 0x01 != 0);
            }
        }
    }

    /// The FCS of everything fed so far.
    pub fn value(&self) -> u16 {
        !self.register
    }

    /// The FCS in transmission order (low byte first).
    pub fn digest(&self) -> [u8; FCS_LEN] {
        self.value().to_le_bytes()
    }

    /// FCS of `bytes` in transmission order.
    pub fn checksum(bytes: &[u8]) -> [u8; FCS_LEN] {
        let mut fcs = Self::new();
        fcs.update(bytes);
        fcs.digest()
    }

    /// Check a frame body whose last two bytes are its FCS.
    pub fn verify(body_with_fcs: &[u8]) -> bool {
        match body_with_fcs.len().checked_sub(FCS_LEN) {
            Some(split) => {
                let (body, fcs) = body_with_fcs.split_at(split);
                Self::checksum(body) == fcs
            }
            None => false,
        }
    }
}

impl Default for Fcs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(Fcs::new().value(), 0x0000);
    }

    #[test]
    fn check_value() {
        assert_eq!(Fcs::checksum(b"123456789"), [0x6E, 0x90]);
    }

    #[test]
    fn register_before_complement() {
        let vectors: [(&[u8], u16); 4] = [
            (&[0x00; 4], 0x0321),
            (&[0xFF; 4], 0xF0B8),
            (&[0xAA; 4], 0x59C0),
            (b"123456789", 0x6F91),
        ];
        for (input, register) in vectors {
            let mut fcs = Fcs::new();
            fcs.update(input);
            assert_eq!(fcs.register, register, "{input:02x?}");
            assert_eq!(fcs.value(), !register);
        }
    }

    #[test]
    fn digest_byte_can_equal_the_flag() {
        let mut body = b"\x82\xa0\xa4\xb0dh`\xaed\x8e\x9a\x88@l\xae\x92\x88\x8ab@\xe2\x03\xf0".to_vec();
        body.extend_from_slice(b">test 3");
        assert_eq!(Fcs::checksum(&body), [0x20, 0x7E]);
    }

    #[test]
    fn bitwise_matches_bytewise() {
        let mut bits = Fcs::new();
        for &byte in b"W2GMD" {
            for shift in 0..8 {
                bits.update_bit((byte >> shift) & 1 == 1);
            }
        }
        let mut bytes = Fcs::new();
        bytes.update(b"W2GMD");
        assert_eq!(bits, bytes);
    }

    #[test]
    fn verify_accepts_own_digest() {
        let mut framed = b"\x82\xa0\xa4\xa6@@`\xaed\x8e\x9a\x88@b\x03\xf0>hi".to_vec();
        framed.extend_from_slice(&Fcs::checksum(&framed));
        assert!(Fcs::verify(&framed));

        let last = framed.len() - 1;
        framed[last] ^= 0x01;
        assert!(!Fcs::verify(&framed));
    }

    #[test]
    fn verify_rejects_short_input() {
        assert!(!Fcs::verify(b"\x00"));
    }
}
