//! GCM (Galois/Counter Mode) authenticated encryption with SM4.
//!
//! Implements NIST SP 800-38D as profiled for SM4 by RFC 8998. A 12-byte IV
//! yields `J0 = IV || 0^31 || 1`; any other non-empty IV length is folded
//! through GHASH. The payload counter advances with `inc32`. Tags are 16
//! bytes and are compared in constant time.

use super::xor_into;
use crate::provider::BlockCipher;
use crate::sm4::{Sm4Key, SM4_BLOCK_SIZE};
use smcrypt_types::CryptoError;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// GCM authentication tag size in bytes.
pub const GCM_TAG_SIZE: usize = 16;

/// Reduction constant for GF(2^128) with the GCM bit ordering.
const R: u128 = 0xe1 << 120;

/// Multiply two field elements. Branch-free in the operand bits.
fn gf_mul(x: u128, y: u128) -> u128 {
    let mut z = 0u128;
    let mut v = y;
    for i in 0..128 {
        let bit = (x >> (127 - i)) & 1;
        z ^= v & 0u128.wrapping_sub(bit);
        let lsb = v & 1;
        v = (v >> 1) ^ (R & 0u128.wrapping_sub(lsb));
    }
    z
}

/// Running GHASH accumulator keyed with H.
struct Ghash {
    h: u128,
    acc: u128,
}

impl Ghash {
    fn new(h: [u8; 16]) -> Self {
        Self {
            h: u128::from_be_bytes(h),
            acc: 0,
        }
    }

    /// Absorb `data`, zero-padding the final partial block.
    fn update_padded(&mut self, data: &[u8]) {
        for chunk in data.chunks(16) {
            let mut block = [0u8; 16];
            block[..chunk.len()].copy_from_slice(chunk);
            self.acc = gf_mul(self.acc ^ u128::from_be_bytes(block), self.h);
        }
    }

    /// Absorb the `len(A) || len(C)` block (bit lengths) and return the hash.
    fn finish(mut self, aad_len: usize, ct_len: usize) -> [u8; 16] {
        let lengths = ((aad_len as u128 * 8) << 64) | (ct_len as u128 * 8);
        self.acc = gf_mul(self.acc ^ lengths, self.h);
        self.acc.to_be_bytes()
    }
}

impl Drop for Ghash {
    fn drop(&mut self) {
        self.h.zeroize();
        self.acc.zeroize();
    }
}

/// Increment the last 4 bytes of a 16-byte counter (big-endian INC32).
fn inc32(counter: &mut [u8; 16]) {
    let ctr =
        u32::from_be_bytes([counter[12], counter[13], counter[14], counter[15]]).wrapping_add(1);
    counter[12..16].copy_from_slice(&ctr.to_be_bytes());
}

/// Derive H and the pre-counter block J0.
fn setup(cipher: &dyn BlockCipher, iv: &[u8]) -> Result<(Ghash, [u8; 16]), CryptoError> {
    if iv.is_empty() {
        return Err(CryptoError::InvalidIvLength {
            expected: 12,
            got: 0,
        });
    }
    let mut h = [0u8; 16];
    cipher.encrypt_block(&mut h)?;

    let j0 = if iv.len() == 12 {
        let mut j0 = [0u8; 16];
        j0[..12].copy_from_slice(iv);
        j0[15] = 1;
        j0
    } else {
        let mut g = Ghash::new(h);
        g.update_padded(iv);
        g.finish(0, iv.len())
    };
    Ok((Ghash::new(h), j0))
}

/// CTR keystream starting at inc32(J0).
fn gctr(cipher: &dyn BlockCipher, j0: &[u8; 16], data: &mut [u8]) -> Result<(), CryptoError> {
    let mut counter = *j0;
    for chunk in data.chunks_mut(SM4_BLOCK_SIZE) {
        inc32(&mut counter);
        let mut keystream = counter;
        cipher.encrypt_block(&mut keystream)?;
        xor_into(chunk, &keystream);
    }
    Ok(())
}

fn compute_tag(
    cipher: &dyn BlockCipher,
    mut ghash: Ghash,
    j0: &[u8; 16],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<[u8; GCM_TAG_SIZE], CryptoError> {
    ghash.update_padded(aad);
    ghash.update_padded(ciphertext);
    let mut tag = ghash.finish(aad.len(), ciphertext.len());
    let mut ek0 = *j0;
    cipher.encrypt_block(&mut ek0)?;
    xor_into(&mut tag, &ek0);
    Ok(tag)
}

pub(crate) fn seal_with(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; GCM_TAG_SIZE]), CryptoError> {
    let (ghash, j0) = setup(cipher, iv)?;
    let mut ciphertext = plaintext.to_vec();
    gctr(cipher, &j0, &mut ciphertext)?;
    let tag = compute_tag(cipher, ghash, &j0, aad, &ciphertext)?;
    Ok((ciphertext, tag))
}

pub(crate) fn open_with(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if tag.len() != GCM_TAG_SIZE {
        return Err(CryptoError::InvalidTagLength);
    }
    let (ghash, j0) = setup(cipher, iv)?;
    let expected = compute_tag(cipher, ghash, &j0, aad, ciphertext)?;
    if !bool::from(expected[..].ct_eq(tag)) {
        log::debug!("gcm: tag mismatch, rejecting ciphertext");
        return Err(CryptoError::AeadTagVerifyFail);
    }
    let mut plaintext = ciphertext.to_vec();
    gctr(cipher, &j0, &mut plaintext)?;
    Ok(plaintext)
}

pub(crate) fn encrypt_with(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let (mut out, tag) = seal_with(cipher, iv, aad, plaintext)?;
    out.extend_from_slice(&tag);
    Ok(out)
}

pub(crate) fn decrypt_with(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    aad: &[u8],
    input: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if input.len() < GCM_TAG_SIZE {
        return Err(CryptoError::InvalidInputLength(input.len()));
    }
    let (ciphertext, tag) = input.split_at(input.len() - GCM_TAG_SIZE);
    open_with(cipher, iv, aad, ciphertext, tag)
}

/// GCM encryption with a detached tag.
pub fn gcm_seal(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; GCM_TAG_SIZE]), CryptoError> {
    seal_with(&Sm4Key::new(key)?, iv, aad, plaintext)
}

/// GCM decryption with a detached tag. Fails with
/// [`CryptoError::AeadTagVerifyFail`] before any plaintext is produced if
/// the tag does not match.
pub fn gcm_open(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    open_with(&Sm4Key::new(key)?, iv, aad, ciphertext, tag)
}

/// GCM encryption returning `ciphertext || tag`.
pub fn gcm_encrypt(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    encrypt_with(&Sm4Key::new(key)?, iv, aad, plaintext)
}

/// GCM decryption of `ciphertext || tag`.
pub fn gcm_decrypt(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    input: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    decrypt_with(&Sm4Key::new(key)?, iv, aad, input)
}
