//! OFB (Output Feedback) mode of operation.

use super::{check_block_iv, xor_into};
use crate::provider::BlockCipher;
use crate::sm4::{Sm4Key, SM4_BLOCK_SIZE};
use smcrypt_types::CryptoError;

pub(crate) fn crypt_with(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    data: &mut [u8],
) -> Result<(), CryptoError> {
    let mut register = check_block_iv(iv)?;
    for chunk in data.chunks_mut(SM4_BLOCK_SIZE) {
        cipher.encrypt_block(&mut register)?;
        xor_into(chunk, &register);
    }
    Ok(())
}

/// Encrypt or decrypt `data` in place using OFB mode with SM4.
pub fn ofb_crypt(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), CryptoError> {
    crypt_with(&Sm4Key::new(key)?, iv, data)
}
