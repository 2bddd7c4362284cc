//! Constant-time operations for big numbers.
//!
//! These avoid data-dependent branching on limb values. Limb counts are
//! treated as public.

use crate::bignum::BigNum;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

impl BigNum {
    /// Constant-time equality comparison.
    pub fn ct_eq(&self, other: &BigNum) -> Choice {
        let len = self.limbs().len().max(other.limbs().len());
        let mut acc = Choice::from(1);
        for i in 0..len {
            let a = self.limbs().get(i).copied().unwrap_or(0);
            let b = other.limbs().get(i).copied().unwrap_or(0);
            acc &= a.ct_eq(&b);
        }
        acc
    }

    /// Constant-time select: returns `a` if `choice == 0`, `b` if `choice == 1`.
    pub fn ct_select(a: &BigNum, b: &BigNum, choice: Choice) -> BigNum {
        let len = a.limbs().len().max(b.limbs().len());
        let limbs = (0..len)
            .map(|i| {
                let av = a.limbs().get(i).copied().unwrap_or(0);
                let bv = b.limbs().get(i).copied().unwrap_or(0);
                u64::conditional_select(&av, &bv, choice)
            })
            .collect();
        BigNum::from_limbs(limbs)
    }

    /// If `self >= modulus` return `self - modulus`, else `self`, without
    /// branching on the comparison.
    pub fn ct_sub_if_gte(&self, modulus: &BigNum) -> BigNum {
        let len = self.limbs().len().max(modulus.limbs().len());
        let mut diff = Vec::with_capacity(len);
        let mut borrow = 0u64;
        for i in 0..len {
            let a = self.limbs().get(i).copied().unwrap_or(0);
            let b = modulus.limbs().get(i).copied().unwrap_or(0);
            let (d1, b1) = a.overflowing_sub(b);
            let (d2, b2) = d1.overflowing_sub(borrow);
            diff.push(d2);
            borrow = (b1 | b2) as u64;
        }
        let keep_diff = borrow.ct_eq(&0);
        BigNum::ct_select(self, &BigNum::from_limbs(diff), keep_diff)
    }
}

impl ConstantTimeEq for BigNum {
    fn ct_eq(&self, other: &Self) -> Choice {
        BigNum::ct_eq(self, other)
    }
}
