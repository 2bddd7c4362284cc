//! Unified hash module.
//!
//! Re-exports the concrete digests and dispatches on [`HashAlgId`] for
//! callers that pick the algorithm at runtime (HMAC, interop fixtures).

pub use crate::provider::Digest;
pub use smcrypt_types::HashAlgId;

use smcrypt_types::CryptoError;

#[cfg(feature = "sha2")]
pub use crate::sha2::{Sha256, Sha384, Sha512};

#[cfg(feature = "sm3")]
pub use crate::sm3::Sm3;

/// Create a fresh streaming context for `alg`.
///
/// Fails with [`CryptoError::NotSupported`] when the algorithm's feature is
/// disabled in this build.
pub fn new_digest(alg: HashAlgId) -> Result<Box<dyn Digest>, CryptoError> {
    match alg {
        #[cfg(feature = "sm3")]
        HashAlgId::Sm3 => Ok(Box::new(Sm3::new())),
        #[cfg(feature = "sha2")]
        HashAlgId::Sha256 => Ok(Box::new(Sha256::new())),
        #[cfg(feature = "sha2")]
        HashAlgId::Sha384 => Ok(Box::new(Sha384::new())),
        #[cfg(feature = "sha2")]
        HashAlgId::Sha512 => Ok(Box::new(Sha512::new())),
        #[allow(unreachable_patterns)]
        _ => Err(CryptoError::NotSupported),
    }
}

/// One-shot digest of `data` under `alg`.
pub fn digest(alg: HashAlgId, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut ctx = new_digest(alg)?;
    ctx.update(data)?;
    let mut out = vec![0u8; ctx.output_size()];
    ctx.finish(&mut out)?;
    Ok(out)
}

#[cfg(all(test, feature = "sm3", feature = "sha2"))]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_output_sizes() {
        for alg in [
            HashAlgId::Sm3,
            HashAlgId::Sha256,
            HashAlgId::Sha384,
            HashAlgId::Sha512,
        ] {
            let out = digest(alg, b"abc").unwrap();
            assert_eq!(out.len(), alg.output_size());
            assert_eq!(new_digest(alg).unwrap().block_size(), alg.block_size());
        }
    }

    #[test]
    fn test_dispatch_matches_concrete() {
        assert_eq!(
            digest(HashAlgId::Sm3, b"abc").unwrap(),
            Sm3::digest(b"abc").unwrap().to_vec()
        );
        assert_eq!(
            digest(HashAlgId::Sha384, b"abc").unwrap(),
            Sha384::digest(b"abc").unwrap().to_vec()
        );
    }

    #[test]
    fn test_deterministic() {
        let data = b"repeatable input";
        for alg in [HashAlgId::Sm3, HashAlgId::Sha512] {
            assert_eq!(digest(alg, data).unwrap(), digest(alg, data).unwrap());
        }
    }
}
