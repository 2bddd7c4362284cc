//! Jacobian coordinate point arithmetic on the SM2 curve.
//!
//! A Jacobian point (X, Y, Z) represents the affine point (X/Z², Y/Z³).
//! The point at infinity is represented by Z = 0.

use smcrypt_bignum::BigNum;
use smcrypt_types::CryptoError;
use subtle::Choice;

use super::curve::{Sm2Curve, SCALAR_BITS};
use super::EcPoint;

/// A point in Jacobian projective coordinates.
#[derive(Clone, Debug)]
pub(crate) struct JacobianPoint {
    pub x: BigNum,
    pub y: BigNum,
    pub z: BigNum,
}

impl JacobianPoint {
    /// The point at infinity (identity element).
    pub fn infinity() -> Self {
        JacobianPoint {
            x: BigNum::from_u64(1),
            y: BigNum::from_u64(1),
            z: BigNum::zero(),
        }
    }

    pub fn from_affine(point: &EcPoint) -> Self {
        JacobianPoint {
            x: point.x.clone(),
            y: point.y.clone(),
            z: BigNum::from_u64(1),
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    /// Coordinate-wise select: `a` when `choice == 0`, `b` when `choice == 1`.
    fn ct_select(a: &Self, b: &Self, choice: Choice) -> Self {
        JacobianPoint {
            x: BigNum::ct_select(&a.x, &b.x, choice),
            y: BigNum::ct_select(&a.y, &b.y, choice),
            z: BigNum::ct_select(&a.z, &b.z, choice),
        }
    }
}

impl Sm2Curve {
    /// The base point G in Jacobian form.
    pub(crate) fn generator_jacobian(&self) -> JacobianPoint {
        JacobianPoint {
            x: self.gx.clone(),
            y: self.gy.clone(),
            z: BigNum::from_u64(1),
        }
    }

    /// Convert back to affine coordinates: (X/Z², Y/Z³).
    pub(crate) fn to_affine(&self, point: &JacobianPoint) -> Result<EcPoint, CryptoError> {
        if point.is_infinity() {
            return Err(CryptoError::EccPointAtInfinity);
        }
        let p = &self.p;
        let z_inv = point.z.mod_inv(p)?;
        let z_inv2 = z_inv.mod_mul(&z_inv, p)?;
        let z_inv3 = z_inv2.mod_mul(&z_inv, p)?;
        Ok(EcPoint {
            x: point.x.mod_mul(&z_inv2, p)?,
            y: point.y.mod_mul(&z_inv3, p)?,
        })
    }

    /// Jacobian point addition: R = A + B.
    pub(crate) fn add(
        &self,
        a: &JacobianPoint,
        b: &JacobianPoint,
    ) -> Result<JacobianPoint, CryptoError> {
        let p = &self.p;

        if a.is_infinity() {
            return Ok(b.clone());
        }
        if b.is_infinity() {
            return Ok(a.clone());
        }

        let z2_sq = b.z.mod_mul(&b.z, p)?;
        let u1 = a.x.mod_mul(&z2_sq, p)?;
        let z1_sq = a.z.mod_mul(&a.z, p)?;
        let u2 = b.x.mod_mul(&z1_sq, p)?;
        let s1 = a.y.mod_mul(&z2_sq.mod_mul(&b.z, p)?, p)?;
        let s2 = b.y.mod_mul(&z1_sq.mod_mul(&a.z, p)?, p)?;

        let h = u2.mod_sub(&u1, p)?;
        let r = s2.mod_sub(&s1, p)?;

        if h.is_zero() {
            if r.is_zero() {
                return self.double(a);
            }
            return Ok(JacobianPoint::infinity());
        }

        let h_sq = h.mod_mul(&h, p)?;
        let h_cu = h_sq.mod_mul(&h, p)?;
        let u1_h_sq = u1.mod_mul(&h_sq, p)?;

        // X3 = R² - H³ - 2·U1·H²
        let x3 = r
            .mod_mul(&r, p)?
            .mod_sub(&h_cu, p)?
            .mod_sub(&u1_h_sq, p)?
            .mod_sub(&u1_h_sq, p)?;

        // Y3 = R·(U1·H² - X3) - S1·H³
        let y3 = r
            .mod_mul(&u1_h_sq.mod_sub(&x3, p)?, p)?
            .mod_sub(&s1.mod_mul(&h_cu, p)?, p)?;

        // Z3 = H·Z1·Z2
        let z3 = h.mod_mul(&a.z, p)?.mod_mul(&b.z, p)?;

        Ok(JacobianPoint {
            x: x3,
            y: y3,
            z: z3,
        })
    }

    /// Jacobian point doubling: R = 2A, using `M = 3·(X+Z²)·(X-Z²)` since
    /// a = p - 3.
    pub(crate) fn double(&self, a: &JacobianPoint) -> Result<JacobianPoint, CryptoError> {
        let p = &self.p;

        if a.is_infinity() || a.y.is_zero() {
            return Ok(JacobianPoint::infinity());
        }

        let two = BigNum::from_u64(2);
        let three = BigNum::from_u64(3);
        let four = BigNum::from_u64(4);
        let eight = BigNum::from_u64(8);

        // S = 4·X·Y²
        let y_sq = a.y.mod_mul(&a.y, p)?;
        let s = a.x.mod_mul(&y_sq, p)?.mod_mul(&four, p)?;

        let z_sq = a.z.mod_mul(&a.z, p)?;
        let m = a
            .x
            .mod_add(&z_sq, p)?
            .mod_mul(&a.x.mod_sub(&z_sq, p)?, p)?
            .mod_mul(&three, p)?;

        // X3 = M² - 2·S
        let x3 = m.mod_mul(&m, p)?.mod_sub(&s.mod_mul(&two, p)?, p)?;

        // Y3 = M·(S - X3) - 8·Y⁴
        let eight_y4 = y_sq.mod_mul(&y_sq, p)?.mod_mul(&eight, p)?;
        let y3 = m.mod_mul(&s.mod_sub(&x3, p)?, p)?.mod_sub(&eight_y4, p)?;

        // Z3 = 2·Y·Z
        let z3 = a.y.mod_mul(&a.z, p)?.mod_mul(&two, p)?;

        Ok(JacobianPoint {
            x: x3,
            y: y3,
            z: z3,
        })
    }

    /// R = k·P by uniform double-and-add-always over [`SCALAR_BITS`] bits,
    /// picking each step's result with `ct_select`. Only the add/select
    /// pattern is independent of `k`: `add` still special-cases the point at
    /// infinity and the `BigNum` field arithmetic is not constant-time.
    pub(crate) fn scalar_mul(
        &self,
        k: &BigNum,
        point: &JacobianPoint,
    ) -> Result<JacobianPoint, CryptoError> {
        let mut acc = JacobianPoint::infinity();
        for i in (0..SCALAR_BITS).rev() {
            acc = self.double(&acc)?;
            let sum = self.add(&acc, point)?;
            let bit = Choice::from(k.get_bit(i) as u8);
            acc = JacobianPoint::ct_select(&acc, &sum, bit);
        }
        Ok(acc)
    }

    /// R = k·G.
    pub(crate) fn scalar_mul_base(&self, k: &BigNum) -> Result<JacobianPoint, CryptoError> {
        self.scalar_mul(k, &self.generator_jacobian())
    }

    /// R = k1·G + k2·Q using Shamir's trick.
    ///
    /// Variable time: only for public scalars (signature verification).
    pub(crate) fn mul_add_vartime(
        &self,
        k1: &BigNum,
        k2: &BigNum,
        q: &JacobianPoint,
    ) -> Result<JacobianPoint, CryptoError> {
        let g = self.generator_jacobian();
        let g_plus_q = self.add(&g, q)?;
        let bits = k1.bit_len().max(k2.bit_len());

        let mut result = JacobianPoint::infinity();
        for i in (0..bits).rev() {
            result = self.double(&result)?;
            match (k1.get_bit(i), k2.get_bit(i)) {
                (1, 1) => result = self.add(&result, &g_plus_q)?,
                (1, 0) => result = self.add(&result, &g)?,
                (0, 1) => result = self.add(&result, q)?,
                _ => {}
            }
        }
        Ok(result)
    }
}
