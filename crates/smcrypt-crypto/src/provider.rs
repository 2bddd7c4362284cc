//! Capability traits shared by the primitives.
//!
//! `Sm3`, `Sha256`, `Sha384` and `Sha512` are [`Digest`]s, which lets
//! [`hash::new_digest`](crate::hash::new_digest) and HMAC dispatch on a
//! [`HashAlgId`](smcrypt_types::HashAlgId). The SM4 key schedule is a
//! [`BlockCipher`] so each mode of operation is written once over
//! `&dyn BlockCipher`.

use smcrypt_types::CryptoError;

/// Streaming hash.
pub trait Digest: Send + Sync {
    /// Digest length in bytes.
    fn output_size(&self) -> usize;

    /// Compression-function block length in bytes.
    fn block_size(&self) -> usize;

    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;

    /// Write the digest into the first `output_size()` bytes of `out` and
    /// return to the initial state. A shorter `out` is `InvalidInputLength`.
    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;

    /// Discard buffered input.
    fn reset(&mut self);

    /// Copy the current state, including buffered input.
    fn boxed_clone(&self) -> Box<dyn Digest>;
}

/// Keyed 16-byte block permutation.
pub trait BlockCipher: Send + Sync {
    fn block_size(&self) -> usize;

    /// Encrypt `block` in place. `block` must be exactly `block_size()` bytes.
    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError>;

    /// Inverse of [`encrypt_block`](Self::encrypt_block).
    fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError>;
}

/// Keyed streaming MAC. `finish` and `reset` keep the key.
pub trait Mac: Send + Sync {
    fn output_size(&self) -> usize;

    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;

    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;

    fn reset(&mut self);
}
