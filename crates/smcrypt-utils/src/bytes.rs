//! Byte and word helpers shared by the cipher engines.

use smcrypt_types::CryptoError;

/// XOR two equal-length byte strings.
pub fn xor(a: &[u8], b: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if a.len() != b.len() {
        return Err(CryptoError::InvalidInputLength(b.len()));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x ^ y).collect())
}

/// XOR `src` into `dst`, up to the shorter of the two.
pub fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Rotate a 32-bit word left by `n` bits (taken mod 32).
#[inline]
pub fn rotl32(x: u32, n: u32) -> u32 {
    x.rotate_left(n % 32)
}

/// Encode text as UTF-8 bytes.
pub fn utf8_encode(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Decode UTF-8 bytes into a `String`, rejecting invalid sequences.
pub fn utf8_decode(bytes: &[u8]) -> Result<String, CryptoError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| CryptoError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor() {
        assert_eq!(xor(&[0xf0, 0x0f], &[0xff, 0xff]).unwrap(), vec![0x0f, 0xf0]);
        assert!(xor(&[1, 2], &[1]).is_err());
    }

    #[test]
    fn test_xor_in_place_truncates() {
        let mut d = [1u8, 2, 3];
        xor_in_place(&mut d, &[1, 1]);
        assert_eq!(d, [0, 3, 3]);
    }

    #[test]
    fn test_rotl32() {
        assert_eq!(rotl32(0x8000_0001, 1), 0x0000_0003);
        assert_eq!(rotl32(0x1234_5678, 0), 0x1234_5678);
        assert_eq!(rotl32(0x1234_5678, 32), 0x1234_5678);
        assert_eq!(rotl32(0x1234_5678, 36), 0x2345_6781);
    }

    #[test]
    fn test_utf8() {
        let bytes = utf8_encode("国密 SM4");
        assert_eq!(utf8_decode(&bytes).unwrap(), "国密 SM4");
        assert!(matches!(utf8_decode(&[0xff, 0xfe]), Err(CryptoError::InvalidUtf8)));
    }
}
