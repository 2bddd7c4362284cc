//! PKCS#7 block padding.

use smcrypt_types::{CryptoError, Padding};
use subtle::{ConstantTimeEq, ConstantTimeGreater};

/// Apply `padding` to `data` for a cipher with `block_size`-byte blocks.
///
/// With [`Padding::NoPadding`] the input must already be block aligned.
pub fn pad(data: &[u8], block_size: usize, padding: Padding) -> Result<Vec<u8>, CryptoError> {
    match padding {
        Padding::Pkcs7 => {
            let pad_len = block_size - data.len() % block_size;
            let mut out = Vec::with_capacity(data.len() + pad_len);
            out.extend_from_slice(data);
            out.resize(data.len() + pad_len, pad_len as u8);
            Ok(out)
        }
        Padding::NoPadding => {
            if data.len() % block_size != 0 {
                return Err(CryptoError::InvalidInputLength(data.len()));
            }
            Ok(data.to_vec())
        }
    }
}

/// Strip `padding` from decrypted `data` in place.
///
/// PKCS#7 rejects an out-of-range final byte up front, then compares the
/// last block against it with `ct_eq` and a fixed-length scan.
pub fn unpad(data: &mut Vec<u8>, block_size: usize, padding: Padding) -> Result<(), CryptoError> {
    if padding == Padding::NoPadding {
        return Ok(());
    }
    let last = *data.last().ok_or(CryptoError::InvalidPadding)?;
    let pad_len = last as usize;
    if pad_len == 0 || pad_len > block_size || pad_len > data.len() {
        return Err(CryptoError::InvalidPadding);
    }

    // Scan a full block so the loop length does not depend on pad_len.
    let window = block_size.min(data.len());
    let mut valid = subtle::Choice::from(1u8);
    for (i, &b) in data[data.len() - window..].iter().rev().enumerate() {
        let in_pad = (pad_len as u8).ct_gt(&(i as u8));
        valid &= !in_pad | b.ct_eq(&last);
    }
    if !bool::from(valid) {
        return Err(CryptoError::InvalidPadding);
    }
    data.truncate(data.len() - pad_len);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pkcs7_pad_lengths() {
        assert_eq!(pad(b"", 16, Padding::Pkcs7).unwrap(), vec![16u8; 16]);
        let p = pad(b"Hello SM4", 16, Padding::Pkcs7).unwrap();
        assert_eq!(p.len(), 16);
        assert_eq!(&p[9..], &[7u8; 7]);
        assert_eq!(pad(&[0u8; 16], 16, Padding::Pkcs7).unwrap().len(), 32);
    }

    #[test]
    fn test_no_padding_alignment() {
        assert!(pad(&[0u8; 15], 16, Padding::NoPadding).is_err());
        assert_eq!(pad(&[1u8; 32], 16, Padding::NoPadding).unwrap().len(), 32);
    }

    #[test]
    fn test_unpad_valid() {
        let mut data = pad(b"abc", 16, Padding::Pkcs7).unwrap();
        unpad(&mut data, 16, Padding::Pkcs7).unwrap();
        assert_eq!(data, b"abc");
    }

    #[test]
    fn test_unpad_rejects_malformed() {
        let mut zero = vec![0u8; 16];
        assert!(unpad(&mut zero, 16, Padding::Pkcs7).is_err());

        let mut too_big = vec![17u8; 16];
        assert!(unpad(&mut too_big, 16, Padding::Pkcs7).is_err());

        let mut inconsistent = vec![0u8; 16];
        inconsistent[13] = 2;
        inconsistent[14] = 3;
        inconsistent[15] = 3;
        assert!(matches!(
            unpad(&mut inconsistent, 16, Padding::Pkcs7),
            Err(CryptoError::InvalidPadding)
        ));

        let mut empty = Vec::new();
        assert!(unpad(&mut empty, 16, Padding::Pkcs7).is_err());
    }
}
