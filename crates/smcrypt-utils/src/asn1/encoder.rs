//! ASN.1 DER encoder.

use super::tags;

/// A builder for DER-encoded INTEGER / SEQUENCE data.
#[derive(Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Consume the encoder and return the encoded bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Write a TLV with the given tag byte and value.
    pub fn write_tlv(&mut self, tag: u8, value: &[u8]) -> &mut Self {
        self.buf.push(tag);
        self.write_length(value.len());
        self.buf.extend_from_slice(value);
        self
    }

    /// Write a DER length: short form below 0x80, else the minimal long form.
    fn write_length(&mut self, length: usize) {
        if length < 0x80 {
            self.buf.push(length as u8);
            return;
        }
        let be = (length as u64).to_be_bytes();
        let skip = be.iter().take_while(|&&b| b == 0).count();
        self.buf.push(0x80 | (be.len() - skip) as u8);
        self.buf.extend_from_slice(&be[skip..]);
    }

    /// Write a non-negative INTEGER from its big-endian magnitude.
    ///
    /// Redundant leading zeros are dropped and a single `0x00` is inserted
    /// when the top bit of the first remaining byte is set.
    pub fn write_integer(&mut self, magnitude: &[u8]) -> &mut Self {
        let start = magnitude.iter().take_while(|&&b| b == 0).count();
        let trimmed = &magnitude[start..];
        match trimmed.first() {
            None => self.write_tlv(tags::INTEGER, &[0x00]),
            Some(&b) if b & 0x80 != 0 => {
                let mut padded = Vec::with_capacity(trimmed.len() + 1);
                padded.push(0x00);
                padded.extend_from_slice(trimmed);
                self.write_tlv(tags::INTEGER, &padded)
            }
            Some(_) => self.write_tlv(tags::INTEGER, trimmed),
        }
    }

    /// Write a SEQUENCE wrapping the given (already encoded) contents.
    pub fn write_sequence(&mut self, contents: &[u8]) -> &mut Self {
        self.write_tlv(tags::SEQUENCE, contents)
    }
}
