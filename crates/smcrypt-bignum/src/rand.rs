//! Uniform sampling of big numbers from a pluggable random source.

use crate::bignum::BigNum;
use smcrypt_types::{CryptoError, RandomSource};
use zeroize::Zeroize;

/// Upper bound on rejection-sampling rounds. For the SM2 order the
/// acceptance probability per round is above 1/2, so reaching this means
/// the source is broken (e.g. stuck at all-ones).
const MAX_SAMPLE_ROUNDS: usize = 256;

impl BigNum {
    /// Generate a random BigNum uniformly in [1, upper).
    ///
    /// Draws `ceil(bits(upper) / 8)` bytes per attempt, masks the excess high
    /// bits and rejects out-of-range candidates.
    pub fn random_range(upper: &BigNum, rng: &dyn RandomSource) -> Result<BigNum, CryptoError> {
        if upper.is_zero() || upper.is_one() {
            return Err(CryptoError::InvalidArg);
        }

        let bits = upper.bit_len();
        let num_bytes = bits.div_ceil(8);
        let excess = num_bytes * 8 - bits;
        let mut buf = vec![0u8; num_bytes];

        for _ in 0..MAX_SAMPLE_ROUNDS {
            rng.fill(&mut buf)?;
            if excess > 0 {
                buf[0] &= 0xFF >> excess;
            }
            let candidate = BigNum::from_bytes_be(&buf);
            if !candidate.is_zero() && candidate < *upper {
                buf.zeroize();
                return Ok(candidate);
            }
        }
        buf.zeroize();
        Err(CryptoError::RandGenFail)
    }
}
