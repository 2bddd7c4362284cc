//! CBC (Cipher Block Chaining) mode of operation.

use super::padding::{pad, unpad};
use super::{check_block_iv, xor_into};
use crate::provider::BlockCipher;
use crate::sm4::{Sm4Key, SM4_BLOCK_SIZE};
use smcrypt_types::{CryptoError, Padding};

pub(crate) fn encrypt_with(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    plaintext: &[u8],
    padding: Padding,
) -> Result<Vec<u8>, CryptoError> {
    let mut prev = check_block_iv(iv)?;
    let mut data = pad(plaintext, SM4_BLOCK_SIZE, padding)?;

    for chunk in data.chunks_mut(SM4_BLOCK_SIZE) {
        xor_into(chunk, &prev);
        cipher.encrypt_block(chunk)?;
        prev.copy_from_slice(chunk);
    }
    Ok(data)
}

pub(crate) fn decrypt_with(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    ciphertext: &[u8],
    padding: Padding,
) -> Result<Vec<u8>, CryptoError> {
    let mut prev = check_block_iv(iv)?;
    if ciphertext.len() % SM4_BLOCK_SIZE != 0
        || (padding == Padding::Pkcs7 && ciphertext.is_empty())
    {
        return Err(CryptoError::InvalidInputLength(ciphertext.len()));
    }

    let mut output = ciphertext.to_vec();
    for chunk in output.chunks_mut(SM4_BLOCK_SIZE) {
        let mut ct_copy = [0u8; SM4_BLOCK_SIZE];
        ct_copy.copy_from_slice(chunk);
        cipher.decrypt_block(chunk)?;
        xor_into(chunk, &prev);
        prev = ct_copy;
    }

    unpad(&mut output, SM4_BLOCK_SIZE, padding)?;
    Ok(output)
}

/// Encrypt data using CBC mode with SM4.
pub fn cbc_encrypt(
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
    padding: Padding,
) -> Result<Vec<u8>, CryptoError> {
    encrypt_with(&Sm4Key::new(key)?, iv, plaintext, padding)
}

/// Decrypt data using CBC mode with SM4 and strip the padding.
pub fn cbc_decrypt(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
    padding: Padding,
) -> Result<Vec<u8>, CryptoError> {
    decrypt_with(&Sm4Key::new(key)?, iv, ciphertext, padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_to_bytes(s: &str) -> Vec<u8> {
        smcrypt_utils::hex::decode(s).unwrap()
    }

    use smcrypt_utils::hex::encode as hex;

    const KEY: &str = "0123456789abcdeffedcba9876543210";
    const IV: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn test_cbc_two_blocks_no_padding() {
        let key = hex_to_bytes(KEY);
        let iv = hex_to_bytes(IV);
        let pt = [key.clone(), key.clone()].concat();
        let ct = cbc_encrypt(&key, &iv, &pt, Padding::NoPadding).unwrap();
        assert_eq!(
            hex(&ct),
            "a9a268883a336315bac0c9c9ff350ab1b236a4a85616d4aabf0a83555c7d4115"
        );
        assert_eq!(cbc_decrypt(&key, &iv, &ct, Padding::NoPadding).unwrap(), pt);
    }

    #[test]
    fn test_cbc_pkcs7_short() {
        let key = hex_to_bytes(KEY);
        let iv = hex_to_bytes(IV);
        let ct = cbc_encrypt(&key, &iv, b"Hello SM4", Padding::Pkcs7).unwrap();
        assert_eq!(hex(&ct), "f603c44f74f011483dba428fbb04bc50");
        assert_eq!(
            cbc_decrypt(&key, &iv, &ct, Padding::Pkcs7).unwrap(),
            b"Hello SM4"
        );
    }

    #[test]
    fn test_cbc_padding_aligned() {
        let key = hex_to_bytes(KEY);
        let iv = hex_to_bytes(IV);
        let pt = [0xaau8; 16];
        let ct = cbc_encrypt(&key, &iv, &pt, Padding::Pkcs7).unwrap();
        assert_eq!(ct.len(), 32);
        assert_eq!(cbc_decrypt(&key, &iv, &ct, Padding::Pkcs7).unwrap(), pt);
    }

    #[test]
    fn test_cbc_hides_repeated_blocks() {
        let key = hex_to_bytes(KEY);
        let iv = hex_to_bytes(IV);
        let ct = cbc_encrypt(&key, &iv, &[0x11u8; 32], Padding::NoPadding).unwrap();
        assert_ne!(ct[..16], ct[16..]);
    }

    #[test]
    fn test_cbc_invalid_iv() {
        let key = hex_to_bytes(KEY);
        assert!(matches!(
            cbc_encrypt(&key, &[0u8; 15], b"test", Padding::Pkcs7),
            Err(CryptoError::InvalidIvLength { expected: 16, got: 15 })
        ));
    }
}
