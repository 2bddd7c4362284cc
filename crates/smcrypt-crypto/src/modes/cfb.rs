//! CFB (Cipher Feedback) mode of operation.
//!
//! CFB-128 as in NIST SP 800-38A §6.3. The final partial block uses a
//! truncated keystream block; no padding is applied.

use super::check_block_iv;
use crate::provider::BlockCipher;
use crate::sm4::{Sm4Key, SM4_BLOCK_SIZE};
use smcrypt_types::CryptoError;

pub(crate) fn encrypt_with(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let mut feedback = check_block_iv(iv)?;
    let mut ciphertext = Vec::with_capacity(plaintext.len());

    for chunk in plaintext.chunks(SM4_BLOCK_SIZE) {
        let mut keystream = feedback;
        cipher.encrypt_block(&mut keystream)?;
        let start = ciphertext.len();
        ciphertext.extend(chunk.iter().zip(keystream.iter()).map(|(p, k)| p ^ k));
        if chunk.len() == SM4_BLOCK_SIZE {
            feedback.copy_from_slice(&ciphertext[start..]);
        }
    }
    Ok(ciphertext)
}

pub(crate) fn decrypt_with(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let mut feedback = check_block_iv(iv)?;
    let mut plaintext = Vec::with_capacity(ciphertext.len());

    for chunk in ciphertext.chunks(SM4_BLOCK_SIZE) {
        let mut keystream = feedback;
        cipher.encrypt_block(&mut keystream)?;
        plaintext.extend(chunk.iter().zip(keystream.iter()).map(|(c, k)| c ^ k));
        if chunk.len() == SM4_BLOCK_SIZE {
            feedback.copy_from_slice(chunk);
        }
    }
    Ok(plaintext)
}

/// Encrypt data using CFB-128 mode with SM4.
pub fn cfb_encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    encrypt_with(&Sm4Key::new(key)?, iv, plaintext)
}

/// Decrypt data using CFB-128 mode with SM4.
pub fn cfb_decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    decrypt_with(&Sm4Key::new(key)?, iv, ciphertext)
}
