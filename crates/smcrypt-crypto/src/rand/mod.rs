//! Randomness sources for key generation, signing and encryption.
//!
//! [`OsRandom`] reads the platform CSPRNG through `getrandom`.
//! [`FallbackRandom`] wraps a primary source with an explicit policy for
//! platforms where that source is unavailable: either fail
//! ([`FallbackPolicy::Deny`], the default) or switch to a process-seeded SM3
//! Hash-DRBG ([`FallbackPolicy::Degraded`]) and log a warning.

mod hash_drbg;

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

pub use smcrypt_types::RandomSource;

use hash_drbg::HashDrbg;
use smcrypt_types::CryptoError;

/// The operating system's cryptographically secure generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::getrandom(buf).map_err(|_| CryptoError::RandGenFail)
    }
}

/// What [`FallbackRandom`] does when its primary source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Propagate the failure as `RandGenFail`.
    #[default]
    Deny,
    /// Continue from an SM3 Hash-DRBG seeded with process-local material.
    /// The output is not backed by OS entropy and is only suitable where
    /// no better source exists.
    Degraded,
}

/// A primary source plus a fallback policy.
pub struct FallbackRandom<R = OsRandom> {
    primary: R,
    policy: FallbackPolicy,
    degraded: Mutex<Option<HashDrbg>>,
}

impl FallbackRandom<OsRandom> {
    /// Wrap [`OsRandom`] with `policy`.
    pub fn new(policy: FallbackPolicy) -> Self {
        Self::with_primary(OsRandom, policy)
    }
}

impl Default for FallbackRandom<OsRandom> {
    fn default() -> Self {
        Self::new(FallbackPolicy::default())
    }
}

impl<R: RandomSource> FallbackRandom<R> {
    pub fn with_primary(primary: R, policy: FallbackPolicy) -> Self {
        Self {
            primary,
            policy,
            degraded: Mutex::new(None),
        }
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Whether the degraded generator has been engaged.
    pub fn is_degraded(&self) -> bool {
        self.degraded
            .lock()
            .map(|state| state.is_some())
            .unwrap_or(false)
    }

    fn fill_degraded(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let mut state = self.degraded.lock().map_err(|_| CryptoError::RandGenFail)?;
        if state.is_none() {
            log::warn!("primary random source unavailable; using degraded process-seeded generator");
            *state = Some(HashDrbg::new(&process_seed())?);
        }
        let drbg = state.as_mut().ok_or(CryptoError::RandGenFail)?;
        if drbg.needs_reseed() {
            drbg.reseed(&process_seed())?;
        }
        drbg.generate(buf)
    }
}

impl<R: RandomSource> RandomSource for FallbackRandom<R> {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        match self.primary.fill(buf) {
            Ok(()) => Ok(()),
            Err(e) => match self.policy {
                FallbackPolicy::Deny => Err(e),
                FallbackPolicy::Degraded => self.fill_degraded(buf),
            },
        }
    }
}

/// Seed material for degraded mode: wall clock, process and thread
/// identity, a per-process counter, a stack address and std's randomized
/// hasher keys.
fn process_seed() -> Vec<u8> {
    static CALLS: AtomicU64 = AtomicU64::new(0);

    let mut seed = Vec::with_capacity(64);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    seed.extend_from_slice(&nanos.to_be_bytes());
    seed.extend_from_slice(&std::process::id().to_be_bytes());
    seed.extend_from_slice(&CALLS.fetch_add(1, Ordering::Relaxed).to_be_bytes());
    seed.extend_from_slice(format!("{:?}", std::thread::current().id()).as_bytes());

    let marker = 0u8;
    seed.extend_from_slice(&(&marker as *const u8 as usize).to_be_bytes());

    let mut hasher = RandomState::new().build_hasher();
    hasher.write(&seed);
    seed.extend_from_slice(&hasher.finish().to_be_bytes());
    seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct FailingRandom(AtomicUsize);

    impl RandomSource for FailingRandom {
        fn fill(&self, _buf: &mut [u8]) -> Result<(), CryptoError> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Err(CryptoError::RandGenFail)
        }
    }

    #[test]
    fn test_os_random_fills() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        OsRandom.fill(&mut a).unwrap();
        OsRandom.fill(&mut b).unwrap();
        assert_ne!(a, b);
        OsRandom.fill(&mut []).unwrap();
    }

    #[test]
    fn test_default_policy_denies() {
        let rng = FallbackRandom::with_primary(
            FailingRandom(AtomicUsize::new(0)),
            FallbackPolicy::default(),
        );
        assert_eq!(rng.policy(), FallbackPolicy::Deny);
        let mut buf = [0u8; 16];
        assert!(matches!(rng.fill(&mut buf), Err(CryptoError::RandGenFail)));
        assert!(!rng.is_degraded());
    }

    #[test]
    fn test_degraded_policy_produces_output() {
        let rng = FallbackRandom::with_primary(
            FailingRandom(AtomicUsize::new(0)),
            FallbackPolicy::Degraded,
        );
        let mut a = [0u8; 48];
        let mut b = [0u8; 48];
        rng.fill(&mut a).unwrap();
        assert!(rng.is_degraded());
        rng.fill(&mut b).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, [0u8; 48]);
        // The primary is still tried on every call.
        assert_eq!(rng.primary.0.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_healthy_primary_never_degrades() {
        let rng = FallbackRandom::new(FallbackPolicy::Degraded);
        let mut buf = [0u8; 32];
        rng.fill(&mut buf).unwrap();
        assert!(!rng.is_degraded());
    }

    #[test]
    fn test_process_seed_varies() {
        assert_ne!(process_seed(), process_seed());
    }

    #[test]
    fn test_usable_as_dyn_source() {
        let boxed: Box<dyn RandomSource> = Box::new(FallbackRandom::default());
        let mut buf = [0u8; 8];
        boxed.fill(&mut buf).unwrap();
    }
}
