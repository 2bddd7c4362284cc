//! SM4 block cipher (GB/T 32907-2016).
//!
//! 128-bit block and key, 32 rounds of an unbalanced Feistel structure.
//! Decryption is the same round function with the round keys reversed.

use crate::provider::BlockCipher;
use smcrypt_types::CryptoError;
use zeroize::Zeroize;

/// SM4 block size in bytes (128 bits).
pub const SM4_BLOCK_SIZE: usize = 16;

/// SM4 key size in bytes (128 bits).
pub const SM4_KEY_SIZE: usize = 16;

const ROUNDS: usize = 32;

const SBOX: [u8; 256] = [
    0xd6, 0x90, 0xe9, 0xfe, 0xcc, 0xe1, 0x3d, 0xb7, 0x16, 0xb6, 0x14, 0xc2, 0x28, 0xfb, 0x2c, 0x05,
    0x2b, 0x67, 0x9a, 0x76, 0x2a, 0xbe, 0x04, 0xc3, 0xaa, 0x44, 0x13, 0x26, 0x49, 0x86, 0x06, 0x99,
    0x9c, 0x42, 0x50, 0xf4, 0x91, 0xef, 0x98, 0x7a, 0x33, 0x54, 0x0b, 0x43, 0xed, 0xcf, 0xac, 0x62,
    0xe4, 0xb3, 0x1c, 0xa9, 0xc9, 0x08, 0xe8, 0x95, 0x80, 0xdf, 0x94, 0xfa, 0x75, 0x8f, 0x3f, 0xa6,
    0x47, 0x07, 0xa7, 0xfc, 0xf3, 0x73, 0x17, 0xba, 0x83, 0x59, 0x3c, 0x19, 0xe6, 0x85, 0x4f, 0xa8,
    0x68, 0x6b, 0x81, 0xb2, 0x71, 0x64, 0xda, 0x8b, 0xf8, 0xeb, 0x0f, 0x4b, 0x70, 0x56, 0x9d, 0x35,
    0x1e, 0x24, 0x0e, 0x5e, 0x63, 0x58, 0xd1, 0xa2, 0x25, 0x22, 0x7c, 0x3b, 0x01, 0x21, 0x78, 0x87,
    0xd4, 0x00, 0x46, 0x57, 0x9f, 0xd3, 0x27, 0x52, 0x4c, 0x36, 0x02, 0xe7, 0xa0, 0xc4, 0xc8, 0x9e,
    0xea, 0xbf, 0x8a, 0xd2, 0x40, 0xc7, 0x38, 0xb5, 0xa3, 0xf7, 0xf2, 0xce, 0xf9, 0x61, 0x15, 0xa1,
    0xe0, 0xae, 0x5d, 0xa4, 0x9b, 0x34, 0x1a, 0x55, 0xad, 0x93, 0x32, 0x30, 0xf5, 0x8c, 0xb1, 0xe3,
    0x1d, 0xf6, 0xe2, 0x2e, 0x82, 0x66, 0xca, 0x60, 0xc0, 0x29, 0x23, 0xab, 0x0d, 0x53, 0x4e, 0x6f,
    0xd5, 0xdb, 0x37, 0x45, 0xde, 0xfd, 0x8e, 0x2f, 0x03, 0xff, 0x6a, 0x72, 0x6d, 0x6c, 0x5b, 0x51,
    0x8d, 0x1b, 0xaf, 0x92, 0xbb, 0xdd, 0xbc, 0x7f, 0x11, 0xd9, 0x5c, 0x41, 0x1f, 0x10, 0x5a, 0xd8,
    0x0a, 0xc1, 0x31, 0x88, 0xa5, 0xcd, 0x7b, 0xbd, 0x2d, 0x74, 0xd0, 0x12, 0xb8, 0xe5, 0xb4, 0xb0,
    0x89, 0x69, 0x97, 0x4a, 0x0c, 0x96, 0x77, 0x7e, 0x65, 0xb9, 0xf1, 0x09, 0xc5, 0x6e, 0xc6, 0x84,
    0x18, 0xf0, 0x7d, 0xec, 0x3a, 0xdc, 0x4d, 0x20, 0x79, 0xee, 0x5f, 0x3e, 0xd7, 0xcb, 0x39, 0x48,
];

const FK: [u32; 4] = [0xa3b1bac6, 0x56aa3350, 0x677d9197, 0xb27022dc];

/// CK[i] byte j = (4i + j) * 7 mod 256.
const CK: [u32; ROUNDS] = {
    let mut ck = [0u32; ROUNDS];
    let mut i = 0;
    while i < ROUNDS {
        let mut word = 0u32;
        let mut j = 0;
        while j < 4 {
            word = (word << 8) | (((4 * i + j) * 7) % 256) as u32;
            j += 1;
        }
        ck[i] = word;
        i += 1;
    }
    ck
};

/// Non-linear byte substitution applied to each byte of a word.
#[inline]
fn tau(a: u32) -> u32 {
    let b = a.to_be_bytes();
    u32::from_be_bytes([
        SBOX[b[0] as usize],
        SBOX[b[1] as usize],
        SBOX[b[2] as usize],
        SBOX[b[3] as usize],
    ])
}

/// Round transform T = L(tau(x)).
#[inline]
fn t_round(x: u32) -> u32 {
    let b = tau(x);
    b ^ b.rotate_left(2) ^ b.rotate_left(10) ^ b.rotate_left(18) ^ b.rotate_left(24)
}

/// Key schedule transform T' = L'(tau(x)).
#[inline]
fn t_key(x: u32) -> u32 {
    let b = tau(x);
    b ^ b.rotate_left(13) ^ b.rotate_left(23)
}

/// An SM4 key with precomputed round keys.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Sm4Key {
    /// Round keys in encryption order.
    round_keys: [u32; ROUNDS],
}

impl Sm4Key {
    /// Expand a 16-byte key into the 32 round keys.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != SM4_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: SM4_KEY_SIZE,
                got: key.len(),
            });
        }
        let mut k = [0u32; 4];
        for (i, word) in key.chunks_exact(4).enumerate() {
            k[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]) ^ FK[i];
        }

        let mut round_keys = [0u32; ROUNDS];
        for i in 0..ROUNDS {
            let rk = k[0] ^ t_key(k[1] ^ k[2] ^ k[3] ^ CK[i]);
            round_keys[i] = rk;
            k = [k[1], k[2], k[3], rk];
        }
        k.zeroize();
        Ok(Self { round_keys })
    }

    fn crypt(&self, block: &mut [u8], decrypt: bool) -> Result<(), CryptoError> {
        if block.len() != SM4_BLOCK_SIZE {
            return Err(CryptoError::InvalidInputLength(block.len()));
        }
        let mut x = [0u32; 4];
        for (i, word) in block.chunks_exact(4).enumerate() {
            x[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
        }
        for i in 0..ROUNDS {
            let rk = if decrypt {
                self.round_keys[ROUNDS - 1 - i]
            } else {
                self.round_keys[i]
            };
            let next = x[0] ^ t_round(x[1] ^ x[2] ^ x[3] ^ rk);
            x = [x[1], x[2], x[3], next];
        }
        // Output is the reverse word order R = (X35, X34, X33, X32).
        for (chunk, word) in block.chunks_exact_mut(4).zip(x.iter().rev()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        x.zeroize();
        Ok(())
    }

    /// Encrypt a single 16-byte block in place.
    pub fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        self.crypt(block, false)
    }

    /// Decrypt a single 16-byte block in place.
    pub fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        self.crypt(block, true)
    }
}

impl BlockCipher for Sm4Key {
    fn block_size(&self) -> usize {
        SM4_BLOCK_SIZE
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        Sm4Key::encrypt_block(self, block)
    }

    fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        Sm4Key::decrypt_block(self, block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_to_bytes(s: &str) -> Vec<u8> {
        smcrypt_utils::hex::decode(s).unwrap()
    }

    use smcrypt_utils::hex::encode as hex;

    // GB/T 32907-2016 Appendix A.1
    #[test]
    fn test_sm4_standard_vector() {
        let key = hex_to_bytes("0123456789abcdeffedcba9876543210");
        let sm4 = Sm4Key::new(&key).unwrap();
        let mut block = key.clone();
        sm4.encrypt_block(&mut block).unwrap();
        assert_eq!(hex(&block), "681edf34d206965e86b3e94f536e4246");

        sm4.decrypt_block(&mut block).unwrap();
        assert_eq!(block, key);
    }

    #[test]
    fn test_sm4_round_keys() {
        // First and last round keys from the standard's worked example.
        let key = hex_to_bytes("0123456789abcdeffedcba9876543210");
        let sm4 = Sm4Key::new(&key).unwrap();
        assert_eq!(sm4.round_keys[0], 0xf12186f9);
        assert_eq!(sm4.round_keys[31], 0x9124a012);
    }

    #[test]
    fn test_ck_constants() {
        assert_eq!(CK[0], 0x00070e15);
        assert_eq!(CK[1], 0x1c232a31);
        assert_eq!(CK[31], 0x646b7279);
    }

    #[test]
    fn test_decrypt_is_reverse_schedule() {
        let sm4 = Sm4Key::new(&[0x42; 16]).unwrap();
        for seed in 0..8u8 {
            let pt = [seed.wrapping_mul(31); 16];
            let mut block = pt;
            sm4.encrypt_block(&mut block).unwrap();
            assert_ne!(block, pt);
            sm4.decrypt_block(&mut block).unwrap();
            assert_eq!(block, pt);
        }
    }

    #[test]
    fn test_sm4_invalid_lengths() {
        assert!(matches!(
            Sm4Key::new(&[0u8; 15]),
            Err(CryptoError::InvalidKeyLength { expected: 16, got: 15 })
        ));
        let sm4 = Sm4Key::new(&[0u8; 16]).unwrap();
        assert!(sm4.encrypt_block(&mut [0u8; 17]).is_err());
    }
}
