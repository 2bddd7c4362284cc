//! CTR (Counter) mode of operation.

use super::{check_block_iv, xor_into};
use crate::provider::BlockCipher;
use crate::sm4::{Sm4Key, SM4_BLOCK_SIZE};
use smcrypt_types::CryptoError;

/// Increment a 128-bit big-endian counter by 1.
fn increment_counter(counter: &mut [u8]) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

pub(crate) fn crypt_with(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    data: &mut [u8],
) -> Result<(), CryptoError> {
    let mut counter = check_block_iv(iv)?;
    for chunk in data.chunks_mut(SM4_BLOCK_SIZE) {
        let mut keystream = counter;
        cipher.encrypt_block(&mut keystream)?;
        xor_into(chunk, &keystream);
        increment_counter(&mut counter);
    }
    Ok(())
}

/// Encrypt or decrypt `data` in place using CTR mode with SM4.
/// `iv` is the 16-byte initial counter block.
pub fn ctr_crypt(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), CryptoError> {
    crypt_with(&Sm4Key::new(key)?, iv, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::ecb_encrypt;
    use smcrypt_types::Padding;

    fn hex_to_bytes(s: &str) -> Vec<u8> {
        smcrypt_utils::hex::decode(s).unwrap()
    }

    use smcrypt_utils::hex::encode as hex;

    const KEY: &str = "0123456789abcdeffedcba9876543210";
    const IV: &str = "000102030405060708090a0b0c0d0e0f";
    const FOX: &[u8] = b"The quick brown fox jumps over the lazy dog";

    #[test]
    fn test_ctr_vector() {
        let key = hex_to_bytes(KEY);
        let iv = hex_to_bytes(IV);
        let mut data = FOX.to_vec();
        ctr_crypt(&key, &iv, &mut data).unwrap();
        assert_eq!(
            hex(&data),
            "52f0f9414cd301ce41ad95f08edf974a0968756b2ad69171a9b17c93e4728d6e74bf728cab558e4e66821e"
        );
        ctr_crypt(&key, &iv, &mut data).unwrap();
        assert_eq!(data, FOX);
    }

    #[test]
    fn test_ctr_equals_ecb_of_counter() {
        let key = hex_to_bytes(KEY);
        let iv = hex_to_bytes(IV);
        let mut counters = iv.clone();
        let mut next = iv.clone();
        next[15] += 1;
        counters.extend_from_slice(&next);
        let keystream = ecb_encrypt(&key, &counters, Padding::NoPadding).unwrap();

        let mut data = [0u8; 32];
        ctr_crypt(&key, &iv, &mut data).unwrap();
        assert_eq!(data.to_vec(), keystream);
    }

    #[test]
    fn test_counter_carry() {
        let mut c = [0xffu8; 16];
        c[0] = 0x00;
        increment_counter(&mut c);
        assert_eq!(c[0], 0x01);
        assert!(c[1..].iter().all(|&b| b == 0));

        let mut wrap = [0xffu8; 16];
        increment_counter(&mut wrap);
        assert_eq!(wrap, [0u8; 16]);
    }

    #[test]
    fn test_ctr_empty_and_bad_iv() {
        let key = hex_to_bytes(KEY);
        let mut empty: [u8; 0] = [];
        ctr_crypt(&key, &[0u8; 16], &mut empty).unwrap();
        assert!(ctr_crypt(&key, &[0u8; 12], &mut [0u8; 4]).is_err());
    }
}
