//! Block cipher modes of operation over SM4.
//!
//! Each mode exposes functional entry points taking the raw 16-byte key;
//! [`Sm4Cipher`] binds one key schedule and a [`CipherOptions`] for
//! session-style use. Internally every mode runs on the
//! [`BlockCipher`](crate::provider::BlockCipher) trait.
//!
//! Conventions: CTR increments the full 128-bit counter big-endian; CFB and
//! OFB use full-block feedback and accept any input length; GCM follows
//! NIST SP 800-38D with a 16-byte tag.

pub mod cbc;
pub mod cfb;
pub mod ctr;
pub mod ecb;
pub mod gcm;
pub mod ofb;
pub mod padding;

mod cipher;

pub use cbc::{cbc_decrypt, cbc_encrypt};
pub use cfb::{cfb_decrypt, cfb_encrypt};
pub use cipher::{CipherOptions, Sm4Cipher};
pub use ctr::ctr_crypt;
pub use ecb::{ecb_decrypt, ecb_encrypt};
pub use gcm::{gcm_decrypt, gcm_encrypt, gcm_open, gcm_seal, GCM_TAG_SIZE};
pub use ofb::ofb_crypt;

use crate::sm4::SM4_BLOCK_SIZE;
use smcrypt_types::CryptoError;

/// Check that an IV is exactly one block long.
pub(crate) fn check_block_iv(iv: &[u8]) -> Result<[u8; SM4_BLOCK_SIZE], CryptoError> {
    iv.try_into().map_err(|_| CryptoError::InvalidIvLength {
        expected: SM4_BLOCK_SIZE,
        got: iv.len(),
    })
}

#[inline]
pub(crate) fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}
