//! Arithmetic and modular arithmetic for BigNum.

use std::cmp::Ordering;

use crate::bignum::{cmp_limbs, BigNum, DoubleLimb, Limb, LIMB_BITS};
use smcrypt_types::CryptoError;

impl BigNum {
    /// Add: self + other.
    pub fn add(&self, other: &BigNum) -> BigNum {
        BigNum::from_limbs(add_limbs(self.limbs(), other.limbs()))
    }

    /// Subtract: self - other, or `None` if the result would be negative.
    pub fn checked_sub(&self, other: &BigNum) -> Option<BigNum> {
        if *self < *other {
            return None;
        }
        Some(BigNum::from_limbs(sub_limbs(self.limbs(), other.limbs())))
    }

    /// Multiply: self * other.
    pub fn mul(&self, other: &BigNum) -> BigNum {
        BigNum::from_limbs(mul_limbs(self.limbs(), other.limbs()))
    }

    /// Division with remainder: returns (quotient, remainder).
    pub fn div_rem(&self, divisor: &BigNum) -> Result<(BigNum, BigNum), CryptoError> {
        if divisor.is_zero() {
            return Err(CryptoError::BnDivisionByZero);
        }
        if *self < *divisor {
            return Ok((BigNum::zero(), self.clone()));
        }
        let (q, r) = div_rem_limbs(self.limbs(), divisor.limbs());
        Ok((BigNum::from_limbs(q), BigNum::from_limbs(r)))
    }

    /// Modular reduction: self mod modulus.
    pub fn mod_reduce(&self, modulus: &BigNum) -> Result<BigNum, CryptoError> {
        let (_, r) = self.div_rem(modulus)?;
        Ok(r)
    }

    /// (self + other) mod modulus. Both operands must already be reduced.
    pub fn mod_add(&self, other: &BigNum, modulus: &BigNum) -> Result<BigNum, CryptoError> {
        if modulus.is_zero() {
            return Err(CryptoError::BnDivisionByZero);
        }
        let sum = self.add(other);
        Ok(sum.ct_sub_if_gte(modulus))
    }

    /// (self - other) mod modulus. Both operands must already be reduced.
    pub fn mod_sub(&self, other: &BigNum, modulus: &BigNum) -> Result<BigNum, CryptoError> {
        if modulus.is_zero() {
            return Err(CryptoError::BnDivisionByZero);
        }
        match self.checked_sub(other) {
            Some(d) => Ok(d),
            // self < other: modulus - (other - self)
            None => {
                let gap = BigNum::from_limbs(sub_limbs(other.limbs(), self.limbs()));
                modulus.checked_sub(&gap).ok_or(CryptoError::InvalidArg)
            }
        }
    }

    /// (self * other) mod modulus.
    pub fn mod_mul(&self, other: &BigNum, modulus: &BigNum) -> Result<BigNum, CryptoError> {
        self.mul(other).mod_reduce(modulus)
    }

    /// Modular exponentiation: self^exp mod modulus (left-to-right binary).
    pub fn mod_exp(&self, exp: &BigNum, modulus: &BigNum) -> Result<BigNum, CryptoError> {
        if modulus.is_zero() {
            return Err(CryptoError::BnDivisionByZero);
        }
        let base = self.mod_reduce(modulus)?;
        let mut result = BigNum::from_u64(1).mod_reduce(modulus)?;
        for i in (0..exp.bit_len()).rev() {
            result = result.mod_mul(&result, modulus)?;
            if exp.get_bit(i) == 1 {
                result = result.mod_mul(&base, modulus)?;
            }
        }
        Ok(result)
    }
}

fn add_limbs(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let len = a.len().max(b.len());
    let mut out = Vec::with_capacity(len + 1);
    let mut carry: Limb = 0;
    for i in 0..len {
        let s = a.get(i).copied().unwrap_or(0) as DoubleLimb
            + b.get(i).copied().unwrap_or(0) as DoubleLimb
            + carry as DoubleLimb;
        out.push(s as Limb);
        carry = (s >> LIMB_BITS) as Limb;
    }
    out.push(carry);
    out
}

/// a - b, requires a >= b.
pub(crate) fn sub_limbs(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = false;
    for (i, &av) in a.iter().enumerate() {
        let (d1, b1) = av.overflowing_sub(b.get(i).copied().unwrap_or(0));
        let (d2, b2) = d1.overflowing_sub(borrow as Limb);
        out.push(d2);
        borrow = b1 || b2;
    }
    out
}

fn mul_limbs(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let mut out = vec![0 as Limb; a.len() + b.len()];
    for (i, &av) in a.iter().enumerate() {
        if av == 0 {
            continue;
        }
        let mut carry: Limb = 0;
        for (j, &bv) in b.iter().enumerate() {
            let t = av as DoubleLimb * bv as DoubleLimb
                + out[i + j] as DoubleLimb
                + carry as DoubleLimb;
            out[i + j] = t as Limb;
            carry = (t >> LIMB_BITS) as Limb;
        }
        out[i + b.len()] = carry;
    }
    out
}

/// Shift limbs left by `s` bits (0 <= s < 64), producing `len + 1` limbs.
fn shl_bits(a: &[Limb], s: u32) -> Vec<Limb> {
    let mut out = Vec::with_capacity(a.len() + 1);
    if s == 0 {
        out.extend_from_slice(a);
        out.push(0);
        return out;
    }
    let mut carry: Limb = 0;
    for &l in a {
        out.push((l << s) | carry);
        carry = l >> (LIMB_BITS as u32 - s);
    }
    out.push(carry);
    out
}

/// Long division by a single limb.
fn div_rem_small(a: &[Limb], d: Limb) -> (Vec<Limb>, Vec<Limb>) {
    let mut q = vec![0 as Limb; a.len()];
    let mut rem: DoubleLimb = 0;
    for i in (0..a.len()).rev() {
        let cur = (rem << LIMB_BITS) | a[i] as DoubleLimb;
        q[i] = (cur / d as DoubleLimb) as Limb;
        rem = cur % d as DoubleLimb;
    }
    (q, vec![rem as Limb])
}

/// Knuth's Algorithm D (TAOCP vol. 2, 4.3.1). Requires `a >= b`, `b != 0`.
fn div_rem_limbs(a: &[Limb], b: &[Limb]) -> (Vec<Limb>, Vec<Limb>) {
    let n = b.iter().rposition(|&l| l != 0).map_or(0, |i| i + 1);
    let b = &b[..n];
    if n == 1 {
        return div_rem_small(a, b[0]);
    }
    let a_len = a.iter().rposition(|&l| l != 0).map_or(1, |i| i + 1);
    let a = &a[..a_len];
    let m = a.len() - n;

    // Normalize so the top limb of the divisor has its high bit set.
    let s = b[n - 1].leading_zeros();
    let vn = {
        let mut v = shl_bits(b, s);
        v.pop();
        v
    };
    let mut un = shl_bits(a, s);
    let mut q = vec![0 as Limb; m + 1];

    let base: DoubleLimb = 1 << LIMB_BITS;
    let v_top = vn[n - 1] as DoubleLimb;
    let v_next = vn[n - 2] as DoubleLimb;

    for j in (0..=m).rev() {
        let num = ((un[j + n] as DoubleLimb) << LIMB_BITS) | un[j + n - 1] as DoubleLimb;
        let mut qhat = num / v_top;
        let mut rhat = num % v_top;
        while qhat >= base || qhat * v_next > ((rhat << LIMB_BITS) | un[j + n - 2] as DoubleLimb)
        {
            qhat -= 1;
            rhat += v_top;
            if rhat >= base {
                break;
            }
        }

        // un[j..=j+n] -= qhat * vn
        let mut carry: Limb = 0;
        let mut borrow = false;
        for i in 0..n {
            let p = qhat * vn[i] as DoubleLimb + carry as DoubleLimb;
            carry = (p >> LIMB_BITS) as Limb;
            let (d1, b1) = un[i + j].overflowing_sub(p as Limb);
            let (d2, b2) = d1.overflowing_sub(borrow as Limb);
            un[i + j] = d2;
            borrow = b1 || b2;
        }
        let (d1, b1) = un[j + n].overflowing_sub(carry);
        let (d2, b2) = d1.overflowing_sub(borrow as Limb);
        un[j + n] = d2;

        q[j] = qhat as Limb;
        if b1 || b2 {
            // qhat was one too large: add the divisor back.
            q[j] = q[j].wrapping_sub(1);
            let mut c: Limb = 0;
            for i in 0..n {
                let t = un[i + j] as DoubleLimb + vn[i] as DoubleLimb + c as DoubleLimb;
                un[i + j] = t as Limb;
                c = (t >> LIMB_BITS) as Limb;
            }
            un[j + n] = un[j + n].wrapping_add(c);
        }
    }

    // Denormalize the remainder.
    let mut r = vec![0 as Limb; n];
    if s == 0 {
        r.copy_from_slice(&un[..n]);
    } else {
        for i in 0..n {
            r[i] = (un[i] >> s) | (un[i + 1] << (LIMB_BITS as u32 - s));
        }
    }
    debug_assert_eq!(cmp_limbs(&r, b), Ordering::Less);
    (q, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hex_to_bytes(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    fn bn(hex: &str) -> BigNum {
        BigNum::from_bytes_be(&hex_to_bytes(hex))
    }

    #[test]
    fn test_add_carry() {
        let a = BigNum::from_u64(u64::MAX);
        let c = a.add(&BigNum::from_u64(1));
        assert_eq!(c, bn("010000000000000000"));
    }

    #[test]
    fn test_checked_sub() {
        let a = BigNum::from_u64(300);
        let b = BigNum::from_u64(100);
        assert_eq!(a.checked_sub(&b).unwrap(), BigNum::from_u64(200));
        assert!(b.checked_sub(&a).is_none());
        assert!(a.checked_sub(&a).unwrap().is_zero());
    }

    #[test]
    fn test_mul() {
        let a = BigNum::from_u64(12345);
        let b = BigNum::from_u64(67890);
        assert_eq!(a.mul(&b), BigNum::from_u64(12345u64 * 67890));
        assert!(a.mul(&BigNum::zero()).is_zero());
    }

    #[test]
    fn test_div_rem_small() {
        let (q, r) = BigNum::from_u64(100).div_rem(&BigNum::from_u64(7)).unwrap();
        assert_eq!(q, BigNum::from_u64(14));
        assert_eq!(r, BigNum::from_u64(2));
    }

    #[test]
    fn test_div_by_zero() {
        assert!(BigNum::from_u64(100).div_rem(&BigNum::zero()).is_err());
    }

    #[test]
    fn test_div_rem_multi_limb() {
        // (2^256 - 1) / p_sm2
        let a = bn("ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff");
        let p = bn("fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff");
        let (q, r) = a.div_rem(&p).unwrap();
        assert_eq!(q, BigNum::from_u64(1));
        assert_eq!(r, bn("0100000000000000000000000000000000ffffffff0000000000000000"));
    }

    #[test]
    fn test_mod_sub_wraps() {
        let m = BigNum::from_u64(97);
        let r = BigNum::from_u64(5)
            .mod_sub(&BigNum::from_u64(10), &m)
            .unwrap();
        assert_eq!(r, BigNum::from_u64(92));
    }

    #[test]
    fn test_mod_add() {
        let m = BigNum::from_u64(97);
        let r = BigNum::from_u64(90).mod_add(&BigNum::from_u64(10), &m).unwrap();
        assert_eq!(r, BigNum::from_u64(3));
    }

    #[test]
    fn test_mod_exp_fermat() {
        // a^(p-1) = 1 mod p for the SM2 prime
        let p = bn("fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff");
        let a = bn("32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7");
        let e = p.checked_sub(&BigNum::from_u64(1)).unwrap();
        assert!(a.mod_exp(&e, &p).unwrap().is_one());
    }

    fn arb_bignum(max_bytes: usize) -> impl Strategy<Value = BigNum> {
        prop::collection::vec(any::<u8>(), 1..max_bytes).prop_map(|b| BigNum::from_bytes_be(&b))
    }

    proptest! {
        #[test]
        fn prop_div_rem_identity(a in arb_bignum(72), b in arb_bignum(40)) {
            prop_assume!(!b.is_zero());
            let (q, r) = a.div_rem(&b).unwrap();
            prop_assert!(r < b);
            prop_assert_eq!(q.mul(&b).add(&r), a);
        }
    }
}
