//! Modular inversion for odd moduli.

use crate::bignum::BigNum;
use smcrypt_types::CryptoError;

impl BigNum {
    /// Compute self^(-1) mod modulus with the binary extended Euclidean
    /// algorithm.
    ///
    /// `modulus` must be odd (both SM2 moduli are prime). Returns
    /// `Err(BnNoInverse)` when gcd(self, modulus) != 1.
    pub fn mod_inv(&self, modulus: &BigNum) -> Result<BigNum, CryptoError> {
        if modulus.is_zero() || modulus.is_one() || modulus.is_even() {
            return Err(CryptoError::InvalidArg);
        }

        let mut u = self.mod_reduce(modulus)?;
        let mut v = modulus.clone();
        // Invariants: x1 * self = u, x2 * self = v (mod modulus).
        let mut x1 = BigNum::from_u64(1);
        let mut x2 = BigNum::zero();

        while !u.is_one() && !v.is_one() {
            if u.is_zero() || v.is_zero() {
                return Err(CryptoError::BnNoInverse);
            }
            while u.is_even() {
                u.shr1_in_place();
                halve_mod(&mut x1, modulus);
            }
            while v.is_even() {
                v.shr1_in_place();
                halve_mod(&mut x2, modulus);
            }
            if u >= v {
                u = u.checked_sub(&v).ok_or(CryptoError::BnNoInverse)?;
                x1 = x1.mod_sub(&x2, modulus)?;
            } else {
                v = v.checked_sub(&u).ok_or(CryptoError::BnNoInverse)?;
                x2 = x2.mod_sub(&x1, modulus)?;
            }
        }

        if u.is_one() {
            Ok(x1)
        } else {
            Ok(x2)
        }
    }
}

/// x = x / 2 mod m for odd m.
fn halve_mod(x: &mut BigNum, m: &BigNum) {
    if x.is_odd() {
        *x = x.add(m);
    }
    x.shr1_in_place();
}
