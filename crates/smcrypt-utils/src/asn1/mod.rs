//! ASN.1 DER encoding and decoding for INTEGER and SEQUENCE.
//!
//! Decoded values are borrowed views into the input buffer; nothing is
//! copied until a caller asks for owned bytes.

mod decoder;
mod encoder;
pub mod signature;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use signature::{decode_signature, der_to_raw, encode_signature, raw_to_der};

use smcrypt_types::CryptoError;

/// ASN.1 tag constants.
pub mod tags {
    pub const INTEGER: u8 = 0x02;
    pub const SEQUENCE: u8 = 0x30;
}

/// A borrowed DER TLV element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tag: u8,
    pub value: &'a [u8],
}

/// Encode an unsigned big-endian magnitude as a minimal DER INTEGER.
pub fn encode_integer(magnitude: &[u8]) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.write_integer(magnitude);
    enc.finish()
}

/// Decode a buffer holding exactly one non-negative INTEGER and return its
/// magnitude (the `0x00` sign pad, if any, removed).
pub fn decode_integer(der: &[u8]) -> Result<&[u8], CryptoError> {
    let mut dec = Decoder::new(der);
    let value = dec.read_integer()?;
    dec.finish()?;
    Ok(value)
}

/// Wrap already-encoded elements in a SEQUENCE.
pub fn encode_sequence(elements: &[&[u8]]) -> Vec<u8> {
    let contents = elements.concat();
    let mut enc = Encoder::new();
    enc.write_sequence(&contents);
    enc.finish()
}

/// Decode a buffer holding exactly one SEQUENCE and return its elements.
pub fn decode_sequence(der: &[u8]) -> Result<Vec<Tlv<'_>>, CryptoError> {
    let mut outer = Decoder::new(der);
    let mut inner = outer.read_sequence()?;
    outer.finish()?;
    let mut elements = Vec::new();
    while !inner.is_empty() {
        elements.push(inner.read_tlv()?);
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_integer_zero() {
        assert_eq!(encode_integer(&[0x00]), vec![0x02, 0x01, 0x00]);
        assert_eq!(encode_integer(&[]), vec![0x02, 0x01, 0x00]);
        assert_eq!(encode_integer(&[0x00, 0x00, 0x00]), vec![0x02, 0x01, 0x00]);
    }

    #[test]
    fn test_encode_integer_pads_high_bit() {
        assert_eq!(encode_integer(&[0x80]), vec![0x02, 0x02, 0x00, 0x80]);
        assert_eq!(encode_integer(&[0xff, 0x01]), vec![0x02, 0x03, 0x00, 0xff, 0x01]);
        assert_eq!(encode_integer(&[0x7f]), vec![0x02, 0x01, 0x7f]);
    }

    #[test]
    fn test_encode_integer_strips_redundant_zeros() {
        assert_eq!(encode_integer(&[0x00, 0x00, 0x7f]), vec![0x02, 0x01, 0x7f]);
        assert_eq!(encode_integer(&[0x00, 0x00, 0x80]), vec![0x02, 0x02, 0x00, 0x80]);
    }

    #[test]
    fn test_decode_integer_strips_pad() {
        assert_eq!(decode_integer(&[0x02, 0x02, 0x00, 0x80]).unwrap(), &[0x80]);
        assert_eq!(decode_integer(&[0x02, 0x01, 0x00]).unwrap(), &[0x00]);
        assert_eq!(decode_integer(&[0x02, 0x01, 0x05]).unwrap(), &[0x05]);
        assert!(matches!(
            decode_integer(&[0x02, 0x02, 0x00, 0x05]),
            Err(CryptoError::DecodeAsn1Fail)
        ));
    }

    #[test]
    fn test_decode_integer_trailing_data() {
        assert!(matches!(
            decode_integer(&[0x02, 0x01, 0x05, 0x00]),
            Err(CryptoError::Asn1TrailingData)
        ));
    }

    #[test]
    fn test_sequence_roundtrip() {
        let a = encode_integer(&[0x01]);
        let b = encode_integer(&[0x80]);
        let seq = encode_sequence(&[&a, &b]);
        assert_eq!(seq, vec![0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x02, 0x00, 0x80]);

        let elements = decode_sequence(&seq).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].tag, tags::INTEGER);
        assert_eq!(elements[1].value, &[0x00, 0x80]);
    }

    #[test]
    fn test_decode_sequence_wrong_tag() {
        assert!(decode_sequence(&[0x31, 0x00]).is_err());
    }
}
