//! HMAC (Hash-based Message Authentication Code), RFC 2104.
//!
//! HMAC(K, m) = H((K' XOR opad) || H((K' XOR ipad) || m))
//!
//! where K' is the key hashed (if longer than a block) and zero-padded to the
//! block size, ipad = 0x36 and opad = 0x5c. Any [`HashAlgId`] can be used.

use crate::hash::new_digest;
use crate::provider::{Digest, Mac};
use smcrypt_types::{CryptoError, HashAlgId};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Streaming HMAC context bound to one key.
pub struct Hmac {
    alg: HashAlgId,
    /// Inner hash context (primed with the ipad-xored key).
    inner: Box<dyn Digest>,
    /// Outer hash context (primed with the opad-xored key).
    outer: Box<dyn Digest>,
    /// Freshly keyed snapshots of `inner` and `outer`, restored on reset.
    inner_keyed: Box<dyn Digest>,
    outer_keyed: Box<dyn Digest>,
}

impl Hmac {
    /// Create a new HMAC instance for `alg` keyed with `key`.
    pub fn new(alg: HashAlgId, key: &[u8]) -> Result<Self, CryptoError> {
        let block_size = alg.block_size();
        let mut key_block = vec![0u8; block_size];
        if key.len() > block_size {
            let mut hasher = new_digest(alg)?;
            hasher.update(key)?;
            hasher.finish(&mut key_block[..alg.output_size()])?;
        } else {
            key_block[..key.len()].copy_from_slice(key);
        }

        let mut inner_keyed = new_digest(alg)?;
        let mut outer_keyed = new_digest(alg)?;
        let mut pad: Vec<u8> = key_block.iter().map(|b| b ^ IPAD).collect();
        inner_keyed.update(&pad)?;
        pad.iter_mut().zip(&key_block).for_each(|(p, k)| *p = k ^ OPAD);
        outer_keyed.update(&pad)?;
        pad.zeroize();
        key_block.zeroize();

        Ok(Self {
            alg,
            inner: inner_keyed.boxed_clone(),
            outer: outer_keyed.boxed_clone(),
            inner_keyed,
            outer_keyed,
        })
    }

    /// The hash algorithm this context runs on.
    pub fn algorithm(&self) -> HashAlgId {
        self.alg
    }

    /// Feed data into the HMAC computation.
    pub fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        self.inner.update(data)
    }

    /// Finalize and return the MAC. The context is reset to its keyed
    /// initial state afterwards.
    pub fn finish(&mut self) -> Result<Vec<u8>, CryptoError> {
        let size = self.alg.output_size();
        let mut inner_hash = vec![0u8; size];
        self.inner.finish(&mut inner_hash)?;
        self.outer.update(&inner_hash)?;
        inner_hash.zeroize();

        let mut out = vec![0u8; size];
        self.outer.finish(&mut out)?;
        self.reset();
        Ok(out)
    }

    /// Drop any buffered message and return to the keyed initial state.
    pub fn reset(&mut self) {
        self.inner = self.inner_keyed.boxed_clone();
        self.outer = self.outer_keyed.boxed_clone();
    }
}

impl Mac for Hmac {
    fn output_size(&self) -> usize {
        self.alg.output_size()
    }

    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        Hmac::update(self, data)
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        let size = self.alg.output_size();
        if out.len() < size {
            return Err(CryptoError::InvalidInputLength(out.len()));
        }
        let mac = Hmac::finish(self)?;
        out[..size].copy_from_slice(&mac);
        Ok(())
    }

    fn reset(&mut self) {
        Hmac::reset(self)
    }
}

/// One-shot HMAC computation.
pub fn hmac(alg: HashAlgId, key: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut ctx = Hmac::new(alg, key)?;
    ctx.update(data)?;
    ctx.finish()
}

/// Recompute the MAC over `data` and compare it with `tag` in constant time.
///
/// A tag of the wrong length is simply a mismatch.
pub fn verify(alg: HashAlgId, key: &[u8], data: &[u8], tag: &[u8]) -> Result<bool, CryptoError> {
    let expected = hmac(alg, key, data)?;
    if expected.len() != tag.len() {
        return Ok(false);
    }
    Ok(bool::from(expected.ct_eq(tag)))
}
