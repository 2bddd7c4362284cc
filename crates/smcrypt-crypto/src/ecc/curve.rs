//! SM2 recommended curve parameters (GB/T 32918.5-2017).
//!
//! y² = x³ + ax + b over GF(p), with a = p - 3 and cofactor 1.

use std::sync::OnceLock;

use smcrypt_bignum::BigNum;
use smcrypt_types::CryptoError;

/// Field element and scalar byte length.
pub const FIELD_SIZE: usize = 32;

/// Bit length of the group order; scalar ladders always walk this many bits.
pub(crate) const SCALAR_BITS: usize = 256;

pub(crate) const P: [u8; FIELD_SIZE] = [
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

pub(crate) const A: [u8; FIELD_SIZE] = [
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFC,
];

pub(crate) const B: [u8; FIELD_SIZE] = [
    0x28, 0xE9, 0xFA, 0x9E, 0x9D, 0x9F, 0x5E, 0x34, 0x4D, 0x5A, 0x9E, 0x4B, 0xCF, 0x65, 0x09, 0xA7,
    0xF3, 0x97, 0x89, 0xF5, 0x15, 0xAB, 0x8F, 0x92, 0xDD, 0xBC, 0xBD, 0x41, 0x4D, 0x94, 0x0E, 0x93,
];

pub(crate) const N: [u8; FIELD_SIZE] = [
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x72, 0x03, 0xDF, 0x6B, 0x21, 0xC6, 0x05, 0x2B, 0x53, 0xBB, 0xF4, 0x09, 0x39, 0xD5, 0x41, 0x23,
];

pub(crate) const GX: [u8; FIELD_SIZE] = [
    0x32, 0xC4, 0xAE, 0x2C, 0x1F, 0x19, 0x81, 0x19, 0x5F, 0x99, 0x04, 0x46, 0x6A, 0x39, 0xC9, 0x94,
    0x8F, 0xE3, 0x0B, 0xBF, 0xF2, 0x66, 0x0B, 0xE1, 0x71, 0x5A, 0x45, 0x89, 0x33, 0x4C, 0x74, 0xC7,
];

pub(crate) const GY: [u8; FIELD_SIZE] = [
    0xBC, 0x37, 0x36, 0xA2, 0xF4, 0xF6, 0x77, 0x9C, 0x59, 0xBD, 0xCE, 0xE3, 0x6B, 0x69, 0x21, 0x53,
    0xD0, 0xA9, 0x87, 0x7C, 0xC6, 0x2A, 0x47, 0x40, 0x02, 0xDF, 0x32, 0xE5, 0x21, 0x39, 0xF0, 0xA0,
];

/// (p + 1) / 4. p ≡ 3 (mod 4), so v^((p+1)/4) is a square root of any
/// quadratic residue v.
const SQRT_EXP: [u8; FIELD_SIZE] = [
    0x3F, 0xFF, 0xFF, 0xFF, 0xBF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xC0, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// The SM2 curve with its parameters decoded into big numbers.
///
/// Point arithmetic lives on this type (see `point.rs`); obtain the shared
/// instance with [`Sm2Curve::get`].
pub struct Sm2Curve {
    pub(crate) p: BigNum,
    pub(crate) a: BigNum,
    pub(crate) b: BigNum,
    pub(crate) n: BigNum,
    pub(crate) gx: BigNum,
    pub(crate) gy: BigNum,
    sqrt_exp: BigNum,
}

static SM2_CURVE: OnceLock<Sm2Curve> = OnceLock::new();

impl Sm2Curve {
    fn new() -> Self {
        Sm2Curve {
            p: BigNum::from_bytes_be(&P),
            a: BigNum::from_bytes_be(&A),
            b: BigNum::from_bytes_be(&B),
            n: BigNum::from_bytes_be(&N),
            gx: BigNum::from_bytes_be(&GX),
            gy: BigNum::from_bytes_be(&GY),
            sqrt_exp: BigNum::from_bytes_be(&SQRT_EXP),
        }
    }

    /// The process-wide curve instance.
    pub fn get() -> &'static Sm2Curve {
        SM2_CURVE.get_or_init(Sm2Curve::new)
    }

    /// Prime field modulus p.
    pub fn prime(&self) -> &BigNum {
        &self.p
    }

    /// Order n of the base point.
    pub fn order(&self) -> &BigNum {
        &self.n
    }

    /// Evaluate the right-hand side x³ + ax + b (mod p).
    pub(crate) fn rhs(&self, x: &BigNum) -> Result<BigNum, CryptoError> {
        let p = &self.p;
        let x3 = x.mod_mul(x, p)?.mod_mul(x, p)?;
        let ax = self.a.mod_mul(x, p)?;
        x3.mod_add(&ax, p)?.mod_add(&self.b, p)
    }

    /// Whether the affine point (x, y) satisfies the curve equation with
    /// both coordinates reduced.
    pub fn contains(&self, x: &BigNum, y: &BigNum) -> Result<bool, CryptoError> {
        if *x >= self.p || *y >= self.p {
            return Ok(false);
        }
        let lhs = y.mod_mul(y, &self.p)?;
        Ok(lhs == self.rhs(x)?)
    }

    /// Square root in GF(p), or `None` for a non-residue.
    pub(crate) fn sqrt(&self, v: &BigNum) -> Result<Option<BigNum>, CryptoError> {
        let r = v.mod_exp(&self.sqrt_exp, &self.p)?;
        if r.mod_mul(&r, &self.p)? == *v {
            Ok(Some(r))
        } else {
            Ok(None)
        }
    }

    /// Whether `k` lies in [1, n-1].
    pub fn is_valid_scalar(&self, k: &BigNum) -> bool {
        !k.is_zero() && *k < self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a_is_p_minus_3() {
        let c = Sm2Curve::get();
        let three = BigNum::from_u64(3);
        assert_eq!(c.a.add(&three), c.p);
    }

    #[test]
    fn test_generator_on_curve() {
        let c = Sm2Curve::get();
        assert!(c.contains(&c.gx, &c.gy).unwrap());
        let y1 = c.gy.add(&BigNum::from_u64(1));
        assert!(!c.contains(&c.gx, &y1).unwrap());
        // Unreduced coordinates are rejected even if congruent.
        let gx_plus_p = c.gx.add(&c.p);
        assert!(!c.contains(&gx_plus_p, &c.gy).unwrap());
    }

    #[test]
    fn test_sqrt_recovers_generator_y() {
        let c = Sm2Curve::get();
        let rhs = c.rhs(&c.gx).unwrap();
        let r = c.sqrt(&rhs).unwrap().unwrap();
        let neg = c.p.checked_sub(&r).unwrap();
        assert!(r == c.gy || neg == c.gy);
    }

    #[test]
    fn test_sqrt_non_residue() {
        let c = Sm2Curve::get();
        // -1 is a non-residue when p ≡ 3 (mod 4).
        let minus_one = c.p.checked_sub(&BigNum::from_u64(1)).unwrap();
        assert!(c.sqrt(&minus_one).unwrap().is_none());
    }

    #[test]
    fn test_scalar_range() {
        let c = Sm2Curve::get();
        assert!(!c.is_valid_scalar(&BigNum::zero()));
        assert!(c.is_valid_scalar(&BigNum::from_u64(1)));
        assert!(!c.is_valid_scalar(&c.n));
        assert_eq!(c.n.bit_len(), SCALAR_BITS);
    }
}
