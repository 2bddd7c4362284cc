//! Hexadecimal encoding and decoding.
//!
//! Output is always lowercase. Input may use either case but must have an
//! even number of digits.

use smcrypt_types::CryptoError;

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Encode bytes as a lowercase hex string.
pub fn encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    for &b in input {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Decode a hex string. Rejects odd length and non-hex characters.
pub fn decode(input: &str) -> Result<Vec<u8>, CryptoError> {
    let bytes = input.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(CryptoError::InvalidHex);
    }
    bytes
        .chunks_exact(2)
        .map(|pair| Ok((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

fn nibble(c: u8) -> Result<u8, CryptoError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(CryptoError::InvalidHex),
    }
}
