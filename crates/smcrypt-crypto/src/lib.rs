#![doc = "SM2, SM3, SM4, ZUC and SHA-2 primitives for smcrypt."]
#![forbid(unsafe_code)]

// Core traits
pub mod provider;

// Hash algorithms
#[cfg(feature = "sha2")]
pub mod sha2;
#[cfg(feature = "sm3")]
pub mod sm3;

pub mod hash;

// MAC algorithms
#[cfg(feature = "hmac")]
pub mod hmac;

// Symmetric ciphers
#[cfg(feature = "sm4")]
pub mod sm4;
#[cfg(feature = "zuc")]
pub mod zuc;

// Modes of operation
#[cfg(feature = "modes")]
pub mod modes;

pub mod cipher {
    //! Unified symmetric cipher interface.
    pub use super::provider::BlockCipher;

    #[cfg(feature = "modes")]
    pub use super::modes::{CipherOptions, Sm4Cipher};
}

// Asymmetric algorithms
#[cfg(feature = "ecc")]
pub mod ecc;
#[cfg(feature = "sm2")]
pub mod sm2;

// Randomness
#[cfg(feature = "sm3")]
pub mod rand;

pub use smcrypt_types::{CryptoError, ErrorKind};
