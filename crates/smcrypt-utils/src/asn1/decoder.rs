//! ASN.1 DER decoder.

use super::{tags, Tlv};
use smcrypt_types::CryptoError;

/// A streaming ASN.1 DER decoder over a borrowed buffer.
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Create a new decoder over the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the remaining undecoded bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Succeeds only if every byte has been consumed.
    pub fn finish(&self) -> Result<(), CryptoError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CryptoError::Asn1TrailingData)
        }
    }

    /// Parse the next TLV element. Only single-byte (low-number) tags are
    /// accepted.
    pub fn read_tlv(&mut self) -> Result<Tlv<'a>, CryptoError> {
        let tag = *self.data.get(self.pos).ok_or(CryptoError::DecodeAsn1Fail)?;
        if tag & 0x1f == 0x1f {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        self.pos += 1;

        let length = self.read_length()?;
        let end = self
            .pos
            .checked_add(length)
            .filter(|&end| end <= self.data.len())
            .ok_or(CryptoError::DecodeAsn1Fail)?;

        let value = &self.data[self.pos..end];
        self.pos = end;
        Ok(Tlv { tag, value })
    }

    /// Parse a DER length: short form below 0x80, otherwise long form with
    /// at most 4 big-endian length bytes. Long form must be minimal: no
    /// leading zero byte and never used for a length below 0x80.
    fn read_length(&mut self) -> Result<usize, CryptoError> {
        let first = *self.data.get(self.pos).ok_or(CryptoError::DecodeAsn1Fail)?;
        self.pos += 1;

        if first < 0x80 {
            return Ok(first as usize);
        }
        if first == 0x80 {
            // Indefinite length is BER only.
            return Err(CryptoError::DecodeAsn1Fail);
        }
        let num_bytes = (first & 0x7f) as usize;
        if num_bytes > 4 {
            return Err(CryptoError::Asn1LengthUnsupported);
        }
        let bytes = self
            .data
            .get(self.pos..self.pos + num_bytes)
            .ok_or(CryptoError::DecodeAsn1Fail)?;
        self.pos += num_bytes;
        if bytes[0] == 0 {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        let length = bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);
        if length < 0x80 {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(length)
    }

    /// Read a non-negative INTEGER and return its magnitude.
    ///
    /// One leading `0x00` sign pad is stripped when the content is longer
    /// than one byte. Empty content, negative values and non-minimal
    /// encodings (a `0x00` not followed by a byte with the top bit set) are
    /// rejected.
    pub fn read_integer(&mut self) -> Result<&'a [u8], CryptoError> {
        let tlv = self.read_tlv()?;
        if tlv.tag != tags::INTEGER || tlv.value.is_empty() {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        if tlv.value[0] & 0x80 != 0 {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        if tlv.value.len() > 1 && tlv.value[0] == 0x00 {
            if tlv.value[1] & 0x80 == 0 {
                return Err(CryptoError::DecodeAsn1Fail);
            }
            Ok(&tlv.value[1..])
        } else {
            Ok(tlv.value)
        }
    }

    /// Read a SEQUENCE, returning a sub-decoder over its contents.
    pub fn read_sequence(&mut self) -> Result<Decoder<'a>, CryptoError> {
        let tlv = self.read_tlv()?;
        if tlv.tag != tags::SEQUENCE {
            return Err(CryptoError::DecodeAsn1Fail);
        }
        Ok(Decoder::new(tlv.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_and_long_length() {
        let data = [0x02, 0x01, 0x2a];
        let tlv = Decoder::new(&data).read_tlv().unwrap();
        assert_eq!(tlv.value, &[0x2a]);

        let mut long = vec![0x30, 0x81, 0x80];
        long.extend(std::iter::repeat(0u8).take(0x80));
        let mut dec = Decoder::new(&long);
        assert_eq!(dec.read_tlv().unwrap().value.len(), 0x80);
        assert!(dec.is_empty());
    }

    #[test]
    fn test_rejects_five_length_bytes() {
        let data = [0x30, 0x85, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00];
        assert!(matches!(
            Decoder::new(&data).read_tlv(),
            Err(CryptoError::Asn1LengthUnsupported)
        ));
    }

    #[test]
    fn test_rejects_indefinite_length() {
        let data = [0x30, 0x80, 0x00, 0x00];
        assert!(Decoder::new(&data).read_tlv().is_err());
    }

    #[test]
    fn test_rejects_truncated() {
        assert!(Decoder::new(&[0x02, 0x05, 0x01]).read_tlv().is_err());
        assert!(Decoder::new(&[0x02]).read_tlv().is_err());
        assert!(Decoder::new(&[0x30, 0x82, 0x01]).read_tlv().is_err());
        assert!(Decoder::new(&[]).read_tlv().is_err());
    }

    #[test]
    fn test_huge_length_does_not_overflow() {
        let data = [0x30, 0x84, 0xff, 0xff, 0xff, 0xff];
        assert!(Decoder::new(&data).read_tlv().is_err());
    }

    #[test]
    fn test_read_integer_rules() {
        // negative
        assert!(Decoder::new(&[0x02, 0x01, 0x80]).read_integer().is_err());
        // empty
        assert!(Decoder::new(&[0x02, 0x00]).read_integer().is_err());
        // wrong tag
        assert!(Decoder::new(&[0x04, 0x01, 0x01]).read_integer().is_err());
        // zero-copy view into the source
        let data = [0x02, 0x03, 0x00, 0x80, 0x01];
        let v = Decoder::new(&data).read_integer().unwrap();
        assert_eq!(v.as_ptr(), data[3..].as_ptr());
    }

    #[test]
    fn test_rejects_non_minimal_integer() {
        assert!(Decoder::new(&[0x02, 0x02, 0x00, 0x05]).read_integer().is_err());
        assert!(Decoder::new(&[0x02, 0x03, 0x00, 0x00, 0x80]).read_integer().is_err());
        // a lone zero and a required sign pad are fine
        assert_eq!(Decoder::new(&[0x02, 0x01, 0x00]).read_integer().unwrap(), &[0x00]);
        assert_eq!(
            Decoder::new(&[0x02, 0x02, 0x00, 0xff]).read_integer().unwrap(),
            &[0xff]
        );
    }

    #[test]
    fn test_rejects_non_minimal_length() {
        // long form for a length that fits the short form
        assert!(Decoder::new(&[0x02, 0x81, 0x01, 0x05]).read_tlv().is_err());
        // leading zero length byte
        let mut padded = vec![0x04, 0x82, 0x00, 0x80];
        padded.extend(std::iter::repeat(0u8).take(0x80));
        assert!(Decoder::new(&padded).read_tlv().is_err());
    }

    #[test]
    fn test_nested_sequence() {
        // SEQUENCE { INTEGER 1, INTEGER 2 }
        let data = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02];
        let mut dec = Decoder::new(&data);
        let mut seq = dec.read_sequence().unwrap();
        assert_eq!(seq.read_integer().unwrap(), &[1]);
        assert_eq!(seq.read_integer().unwrap(), &[2]);
        assert!(seq.finish().is_ok());
        assert!(dec.finish().is_ok());
    }

    #[test]
    fn test_high_tag_number_rejected() {
        assert!(Decoder::new(&[0x1f, 0x81, 0x01, 0x00]).read_tlv().is_err());
    }
}
