//! ECB (Electronic Codebook) mode of operation.
//!
//! **Security warning**: identical plaintext blocks produce identical
//! ciphertext blocks. ECB is provided for interoperability and test use.

use super::padding::{pad, unpad};
use crate::provider::BlockCipher;
use crate::sm4::{Sm4Key, SM4_BLOCK_SIZE};
use smcrypt_types::{CryptoError, Padding};

pub(crate) fn encrypt_with(
    cipher: &dyn BlockCipher,
    plaintext: &[u8],
    padding: Padding,
) -> Result<Vec<u8>, CryptoError> {
    let mut output = pad(plaintext, SM4_BLOCK_SIZE, padding)?;
    for chunk in output.chunks_mut(SM4_BLOCK_SIZE) {
        cipher.encrypt_block(chunk)?;
    }
    Ok(output)
}

pub(crate) fn decrypt_with(
    cipher: &dyn BlockCipher,
    ciphertext: &[u8],
    padding: Padding,
) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() % SM4_BLOCK_SIZE != 0
        || (padding == Padding::Pkcs7 && ciphertext.is_empty())
    {
        return Err(CryptoError::InvalidInputLength(ciphertext.len()));
    }
    let mut output = ciphertext.to_vec();
    for chunk in output.chunks_mut(SM4_BLOCK_SIZE) {
        cipher.decrypt_block(chunk)?;
    }
    unpad(&mut output, SM4_BLOCK_SIZE, padding)?;
    Ok(output)
}

/// Encrypt data using ECB mode with SM4.
pub fn ecb_encrypt(key: &[u8], plaintext: &[u8], padding: Padding) -> Result<Vec<u8>, CryptoError> {
    encrypt_with(&Sm4Key::new(key)?, plaintext, padding)
}

/// Decrypt data using ECB mode with SM4.
pub fn ecb_decrypt(key: &[u8], ciphertext: &[u8], padding: Padding) -> Result<Vec<u8>, CryptoError> {
    decrypt_with(&Sm4Key::new(key)?, ciphertext, padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_to_bytes(s: &str) -> Vec<u8> {
        smcrypt_utils::hex::decode(s).unwrap()
    }

    use smcrypt_utils::hex::encode as hex;

    const KEY: &str = "0123456789abcdeffedcba9876543210";

    #[test]
    fn test_ecb_hello_sm4_pkcs7() {
        let key = hex_to_bytes(KEY);
        let ct = ecb_encrypt(&key, b"Hello SM4", Padding::Pkcs7).unwrap();
        assert_eq!(hex(&ct), "e7181e1ee988f3f357bdf495525aa822");
        let pt = ecb_decrypt(&key, &ct, Padding::Pkcs7).unwrap();
        assert_eq!(pt, b"Hello SM4");
    }

    #[test]
    fn test_ecb_no_padding_standard_block() {
        let key = hex_to_bytes(KEY);
        let ct = ecb_encrypt(&key, &key, Padding::NoPadding).unwrap();
        assert_eq!(hex(&ct), "681edf34d206965e86b3e94f536e4246");
    }

    #[test]
    fn test_ecb_identical_blocks() {
        let key = hex_to_bytes(KEY);
        let pt = [0x5au8; 48];
        let ct = ecb_encrypt(&key, &pt, Padding::NoPadding).unwrap();
        assert_eq!(ct[..16], ct[16..32]);
        assert_eq!(ct[16..32], ct[32..48]);
        assert_eq!(ct, ecb_encrypt(&key, &pt, Padding::NoPadding).unwrap());
    }

    #[test]
    fn test_ecb_invalid_length() {
        let key = hex_to_bytes(KEY);
        assert!(ecb_encrypt(&key, &[0u8; 15], Padding::NoPadding).is_err());
        assert!(ecb_decrypt(&key, &[0u8; 15], Padding::Pkcs7).is_err());
        assert!(ecb_decrypt(&key, &[], Padding::Pkcs7).is_err());
    }

    #[test]
    fn test_ecb_bad_padding() {
        let key = hex_to_bytes(KEY);
        // Encrypt a block whose last byte is not a valid pad value.
        let ct = ecb_encrypt(&key, &[0u8; 16], Padding::NoPadding).unwrap();
        assert!(matches!(
            ecb_decrypt(&key, &ct, Padding::Pkcs7),
            Err(CryptoError::InvalidPadding)
        ));
    }
}
