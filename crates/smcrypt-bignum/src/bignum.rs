//! Big number type, byte conversions and ordering.

use smcrypt_types::CryptoError;
use zeroize::Zeroize;

/// Limb type for big number representation.
pub type Limb = u64;
/// Double-width type for multiplication intermediates.
pub(crate) type DoubleLimb = u128;

/// Bits per limb.
pub const LIMB_BITS: usize = 64;

/// A non-negative, heap-allocated big number that is zeroized on drop.
///
/// Internally represented as little-endian `u64` limbs with no leading
/// zero limbs (zero is a single zero limb).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct BigNum {
    limbs: Vec<Limb>,
}

impl BigNum {
    /// Create a zero-valued BigNum.
    pub fn zero() -> Self {
        Self { limbs: vec![0] }
    }

    /// Create a BigNum from a `u64` value.
    pub fn from_u64(value: u64) -> Self {
        Self { limbs: vec![value] }
    }

    /// Create a BigNum from big-endian bytes. Leading zero bytes are ignored.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        let mut limbs = vec![0u64; bytes.len().div_ceil(8).max(1)];
        for (i, &byte) in bytes.iter().rev().enumerate() {
            limbs[i / 8] |= (byte as u64) << ((i % 8) * 8);
        }
        Self::from_limbs(limbs)
    }

    /// Minimal big-endian encoding. Zero encodes as a single `0x00`.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let len = self.bit_len().div_ceil(8).max(1);
        let mut out = vec![0u8; len];
        self.write_be(&mut out);
        out
    }

    /// Big-endian encoding left-padded with zeros to exactly `len` bytes.
    ///
    /// Fails if the value does not fit.
    pub fn to_bytes_be_padded(&self, len: usize) -> Result<Vec<u8>, CryptoError> {
        if self.bit_len().div_ceil(8) > len {
            return Err(CryptoError::InvalidInputLength(len));
        }
        let mut out = vec![0u8; len];
        self.write_be(&mut out);
        Ok(out)
    }

    /// Write the low `out.len()` bytes of the value, big-endian.
    fn write_be(&self, out: &mut [u8]) {
        for (i, byte) in out.iter_mut().rev().enumerate() {
            let limb = i / 8;
            if limb < self.limbs.len() {
                *byte = (self.limbs[limb] >> ((i % 8) * 8)) as u8;
            }
        }
    }

    /// Return the number of significant bits.
    pub fn bit_len(&self) -> usize {
        match self.limbs.iter().rposition(|&l| l != 0) {
            Some(i) => i * LIMB_BITS + (LIMB_BITS - self.limbs[i].leading_zeros() as usize),
            None => 0,
        }
    }

    /// Return true if this number is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    /// Return true if this number equals 1.
    pub fn is_one(&self) -> bool {
        self.limbs.len() == 1 && self.limbs[0] == 1
    }

    /// Return true if this number is even.
    pub fn is_even(&self) -> bool {
        self.limbs[0] & 1 == 0
    }

    /// Return true if this number is odd.
    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }

    /// Get bit at position `idx` (0-indexed from LSB).
    pub fn get_bit(&self, idx: usize) -> u64 {
        match self.limbs.get(idx / LIMB_BITS) {
            Some(l) => (l >> (idx % LIMB_BITS)) & 1,
            None => 0,
        }
    }

    /// Return the limbs as a slice.
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    /// Create a BigNum from little-endian limbs.
    pub fn from_limbs(limbs: Vec<Limb>) -> Self {
        let mut bn = Self {
            limbs: if limbs.is_empty() { vec![0] } else { limbs },
        };
        bn.normalize();
        bn
    }

    /// Remove leading zero limbs.
    pub(crate) fn normalize(&mut self) {
        while self.limbs.len() > 1 && self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
    }

    /// Shift right by one bit in place.
    pub(crate) fn shr1_in_place(&mut self) {
        let mut carry = 0u64;
        for limb in self.limbs.iter_mut().rev() {
            let next = *limb & 1;
            *limb = (*limb >> 1) | (carry << 63);
            carry = next;
        }
        self.normalize();
    }
}

impl std::fmt::Debug for BigNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BigNum(0x")?;
        for b in self.to_bytes_be() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

impl PartialEq for BigNum {
    fn eq(&self, other: &Self) -> bool {
        self.limbs == other.limbs
    }
}

impl Eq for BigNum {}

impl PartialOrd for BigNum {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigNum {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        cmp_limbs(&self.limbs, &other.limbs)
    }
}

/// Compare two little-endian limb slices of possibly different length.
pub(crate) fn cmp_limbs(a: &[Limb], b: &[Limb]) -> std::cmp::Ordering {
    let len = a.len().max(b.len());
    for i in (0..len).rev() {
        let av = a.get(i).copied().unwrap_or(0);
        let bv = b.get(i).copied().unwrap_or(0);
        if av != bv {
            return av.cmp(&bv);
        }
    }
    std::cmp::Ordering::Equal
}
