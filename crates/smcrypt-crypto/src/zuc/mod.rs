//! ZUC stream cipher.
//!
//! The keystream generator shared by ZUC-128 (3GPP 128-EEA3 / 128-EIA3) and
//! ZUC-256. State is sixteen 31-bit LFSR cells plus the two 32-bit memory
//! cells of the nonlinear function F; every step yields one 32-bit word.
//!
//! A key/IV pair must never be used for two different messages.

mod confidentiality;
mod integrity;

pub use confidentiality::eea3;
pub use integrity::{eia3, zuc256_mac};

use smcrypt_types::CryptoError;
use zeroize::Zeroize;

/// ZUC-128 key size in bytes.
pub const ZUC_KEY_SIZE: usize = 16;
/// ZUC-128 IV size in bytes.
pub const ZUC_IV_SIZE: usize = 16;
/// ZUC-256 key size in bytes.
pub const ZUC256_KEY_SIZE: usize = 32;
/// ZUC-256 IV size in bytes (the last 8 bytes carry 6 bits each).
pub const ZUC256_IV_SIZE: usize = 25;

const M31: u32 = 0x7fff_ffff;

const S0: [u8; 256] = [
    0x3e, 0x72, 0x5b, 0x47, 0xca, 0xe0, 0x00, 0x33, 0x04, 0xd1, 0x54, 0x98, 0x09, 0xb9, 0x6d, 0xcb,
    0x7b, 0x1b, 0xf9, 0x32, 0xaf, 0x9d, 0x6a, 0xa5, 0xb8, 0x2d, 0xfc, 0x1d, 0x08, 0x53, 0x03, 0x90,
    0x4d, 0x4e, 0x84, 0x99, 0xe4, 0xce, 0xd9, 0x91, 0xdd, 0xb6, 0x85, 0x48, 0x8b, 0x29, 0x6e, 0xac,
    0xcd, 0xc1, 0xf8, 0x1e, 0x73, 0x43, 0x69, 0xc6, 0xb5, 0xbd, 0xfd, 0x39, 0x63, 0x20, 0xd4, 0x38,
    0x76, 0x7d, 0xb2, 0xa7, 0xcf, 0xed, 0x57, 0xc5, 0xf3, 0x2c, 0xbb, 0x14, 0x21, 0x06, 0x55, 0x9b,
    0xe3, 0xef, 0x5e, 0x31, 0x4f, 0x7f, 0x5a, 0xa4, 0x0d, 0x82, 0x51, 0x49, 0x5f, 0xba, 0x58, 0x1c,
    0x4a, 0x16, 0xd5, 0x17, 0xa8, 0x92, 0x24, 0x1f, 0x8c, 0xff, 0xd8, 0xae, 0x2e, 0x01, 0xd3, 0xad,
    0x3b, 0x4b, 0xda, 0x46, 0xeb, 0xc9, 0xde, 0x9a, 0x8f, 0x87, 0xd7, 0x3a, 0x80, 0x6f, 0x2f, 0xc8,
    0xb1, 0xb4, 0x37, 0xf7, 0x0a, 0x22, 0x13, 0x28, 0x7c, 0xcc, 0x3c, 0x89, 0xc7, 0xc3, 0x96, 0x56,
    0x07, 0xbf, 0x7e, 0xf0, 0x0b, 0x2b, 0x97, 0x52, 0x35, 0x41, 0x79, 0x61, 0xa6, 0x4c, 0x10, 0xfe,
    0xbc, 0x26, 0x95, 0x88, 0x8a, 0xb0, 0xa3, 0xfb, 0xc0, 0x18, 0x94, 0xf2, 0xe1, 0xe5, 0xe9, 0x5d,
    0xd0, 0xdc, 0x11, 0x66, 0x64, 0x5c, 0xec, 0x59, 0x42, 0x75, 0x12, 0xf5, 0x74, 0x9c, 0xaa, 0x23,
    0x0e, 0x86, 0xab, 0xbe, 0x2a, 0x02, 0xe7, 0x67, 0xe6, 0x44, 0xa2, 0x6c, 0xc2, 0x93, 0x9f, 0xf1,
    0xf6, 0xfa, 0x36, 0xd2, 0x50, 0x68, 0x9e, 0x62, 0x71, 0x15, 0x3d, 0xd6, 0x40, 0xc4, 0xe2, 0x0f,
    0x8e, 0x83, 0x77, 0x6b, 0x25, 0x05, 0x3f, 0x0c, 0x30, 0xea, 0x70, 0xb7, 0xa1, 0xe8, 0xa9, 0x65,
    0x8d, 0x27, 0x1a, 0xdb, 0x81, 0xb3, 0xa0, 0xf4, 0x45, 0x7a, 0x19, 0xdf, 0xee, 0x78, 0x34, 0x60,
];

const S1: [u8; 256] = [
    0x55, 0xc2, 0x63, 0x71, 0x3b, 0xc8, 0x47, 0x86, 0x9f, 0x3c, 0xda, 0x5b, 0x29, 0xaa, 0xfd, 0x77,
    0x8c, 0xc5, 0x94, 0x0c, 0xa6, 0x1a, 0x13, 0x00, 0xe3, 0xa8, 0x16, 0x72, 0x40, 0xf9, 0xf8, 0x42,
    0x44, 0x26, 0x68, 0x96, 0x81, 0xd9, 0x45, 0x3e, 0x10, 0x76, 0xc6, 0xa7, 0x8b, 0x39, 0x43, 0xe1,
    0x3a, 0xb5, 0x56, 0x2a, 0xc0, 0x6d, 0xb3, 0x05, 0x22, 0x66, 0xbf, 0xdc, 0x0b, 0xfa, 0x62, 0x48,
    0xdd, 0x20, 0x11, 0x06, 0x36, 0xc9, 0xc1, 0xcf, 0xf6, 0x27, 0x52, 0xbb, 0x69, 0xf5, 0xd4, 0x87,
    0x7f, 0x84, 0x4c, 0xd2, 0x9c, 0x57, 0xa4, 0xbc, 0x4f, 0x9a, 0xdf, 0xfe, 0xd6, 0x8d, 0x7a, 0xeb,
    0x2b, 0x53, 0xd8, 0x5c, 0xa1, 0x14, 0x17, 0xfb, 0x23, 0xd5, 0x7d, 0x30, 0x67, 0x73, 0x08, 0x09,
    0xee, 0xb7, 0x70, 0x3f, 0x61, 0xb2, 0x19, 0x8e, 0x4e, 0xe5, 0x4b, 0x93, 0x8f, 0x5d, 0xdb, 0xa9,
    0xad, 0xf1, 0xae, 0x2e, 0xcb, 0x0d, 0xfc, 0xf4, 0x2d, 0x46, 0x6e, 0x1d, 0x97, 0xe8, 0xd1, 0xe9,
    0x4d, 0x37, 0xa5, 0x75, 0x5e, 0x83, 0x9e, 0xab, 0x82, 0x9d, 0xb9, 0x1c, 0xe0, 0xcd, 0x49, 0x89,
    0x01, 0xb6, 0xbd, 0x58, 0x24, 0xa2, 0x5f, 0x38, 0x78, 0x99, 0x15, 0x90, 0x50, 0xb8, 0x95, 0xe4,
    0xd0, 0x91, 0xc7, 0xce, 0xed, 0x0f, 0xb4, 0x6f, 0xa0, 0xcc, 0xf0, 0x02, 0x4a, 0x79, 0xc3, 0xde,
    0xa3, 0xef, 0xea, 0x51, 0xe6, 0x6b, 0x18, 0xec, 0x1b, 0x2c, 0x80, 0xf7, 0x74, 0xe7, 0xff, 0x21,
    0x5a, 0x6a, 0x54, 0x1e, 0x41, 0x31, 0x92, 0x35, 0xc4, 0x33, 0x07, 0x0a, 0xba, 0x7e, 0x0e, 0x34,
    0x88, 0xb1, 0x98, 0x7c, 0xf3, 0x3d, 0x60, 0x6c, 0x7b, 0xca, 0xd3, 0x1f, 0x32, 0x65, 0x04, 0x28,
    0x64, 0xbe, 0x85, 0x9b, 0x2f, 0x59, 0x8a, 0xd7, 0xb0, 0x25, 0xac, 0xaf, 0x12, 0x03, 0xe2, 0xf2,
];

/// ZUC-128 key loading constants (15 bits each).
const D128: [u32; 16] = [
    0x44d7, 0x26bc, 0x626b, 0x135e, 0x5789, 0x35e2, 0x7135, 0x09af, 0x4d78, 0x2f13, 0x6bc4, 0x1af1,
    0x5e26, 0x3c4d, 0x789a, 0x47ac,
];

/// ZUC-256 loading constants (7 bits each) for keystream generation.
pub(crate) const D256_KEYSTREAM: [u8; 16] = [
    0x22, 0x2f, 0x24, 0x2a, 0x6d, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x52, 0x10, 0x30,
];

#[inline]
fn add31(a: u32, b: u32) -> u32 {
    let c = a + b;
    (c & M31) + (c >> 31)
}

#[inline]
fn rot31(a: u32, k: u32) -> u32 {
    ((a << k) | (a >> (31 - k))) & M31
}

#[inline]
fn l1(x: u32) -> u32 {
    x ^ x.rotate_left(2) ^ x.rotate_left(10) ^ x.rotate_left(18) ^ x.rotate_left(24)
}

#[inline]
fn l2(x: u32) -> u32 {
    x ^ x.rotate_left(8) ^ x.rotate_left(14) ^ x.rotate_left(22) ^ x.rotate_left(30)
}

#[inline]
fn sbox(x: u32) -> u32 {
    let b = x.to_be_bytes();
    u32::from_be_bytes([
        S0[b[0] as usize],
        S1[b[1] as usize],
        S0[b[2] as usize],
        S1[b[3] as usize],
    ])
}

/// ZUC keystream generator.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Zuc {
    lfsr: [u32; 16],
    r1: u32,
    r2: u32,
}

impl Zuc {
    /// Initialise ZUC-128 from a 16-byte key and 16-byte IV.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != ZUC_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: ZUC_KEY_SIZE,
                got: key.len(),
            });
        }
        if iv.len() != ZUC_IV_SIZE {
            return Err(CryptoError::InvalidIvLength {
                expected: ZUC_IV_SIZE,
                got: iv.len(),
            });
        }
        let mut lfsr = [0u32; 16];
        for (i, cell) in lfsr.iter_mut().enumerate() {
            *cell = (u32::from(key[i]) << 23) | (D128[i] << 8) | u32::from(iv[i]);
        }
        Ok(Self::from_cells(lfsr))
    }

    /// Initialise ZUC-256 from a 32-byte key and 25-byte IV.
    pub fn new_256(key: &[u8], iv: &[u8]) -> Result<Self, CryptoError> {
        Self::new_256_with(key, iv, &D256_KEYSTREAM)
    }

    /// ZUC-256 loading with an explicit constant set (the MAC variants use
    /// their own).
    pub(crate) fn new_256_with(
        key: &[u8],
        iv: &[u8],
        consts: &[u8; 16],
    ) -> Result<Self, CryptoError> {
        if key.len() != ZUC256_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: ZUC256_KEY_SIZE,
                got: key.len(),
            });
        }
        if iv.len() != ZUC256_IV_SIZE {
            return Err(CryptoError::InvalidIvLength {
                expected: ZUC256_IV_SIZE,
                got: iv.len(),
            });
        }
        let k = |i: usize| u32::from(key[i]);
        let v = |i: usize| {
            if i >= 17 {
                u32::from(iv[i] & 0x3f)
            } else {
                u32::from(iv[i])
            }
        };
        let d = |i: usize| u32::from(consts[i]);
        let mk = |a: u32, b: u32, c: u32, e: u32| (a << 23) | (b << 16) | (c << 8) | e;

        let lfsr = [
            mk(k(0), d(0), k(21), k(16)),
            mk(k(1), d(1), k(22), k(17)),
            mk(k(2), d(2), k(23), k(18)),
            mk(k(3), d(3), k(24), k(19)),
            mk(k(4), d(4), k(25), k(20)),
            mk(v(0), d(5) | v(17), k(5), k(26)),
            mk(v(1), d(6) | v(18), k(6), k(27)),
            mk(v(10), d(7) | v(19), k(7), v(2)),
            mk(k(8), d(8) | v(20), v(3), v(11)),
            mk(k(9), d(9) | v(21), v(12), v(4)),
            mk(v(5), d(10) | v(22), k(10), k(28)),
            mk(k(11), d(11) | v(23), v(6), v(13)),
            mk(k(12), d(12) | v(24), v(7), v(14)),
            mk(k(13), d(13), v(15), v(8)),
            mk(k(14), d(14) | (k(31) >> 4), v(16), v(9)),
            mk(k(15), d(15) | (k(31) & 0x0f), k(30), k(29)),
        ];
        Ok(Self::from_cells(lfsr))
    }

    /// Run the 32 initialisation rounds and the discarded first work step.
    fn from_cells(lfsr: [u32; 16]) -> Self {
        let mut zuc = Self { lfsr, r1: 0, r2: 0 };
        for _ in 0..32 {
            let x = zuc.bit_reorganization();
            let w = zuc.f(x);
            zuc.lfsr_step(Some(w >> 1));
        }
        let x = zuc.bit_reorganization();
        zuc.f(x);
        zuc.lfsr_step(None);
        zuc
    }

    fn bit_reorganization(&self) -> [u32; 4] {
        let s = &self.lfsr;
        [
            ((s[15] & 0x7fff_8000) << 1) | (s[14] & 0xffff),
            ((s[11] & 0xffff) << 16) | (s[9] >> 15),
            ((s[7] & 0xffff) << 16) | (s[5] >> 15),
            ((s[2] & 0xffff) << 16) | (s[0] >> 15),
        ]
    }

    /// The nonlinear function F; updates R1/R2 and returns W.
    fn f(&mut self, x: [u32; 4]) -> u32 {
        let w = (x[0] ^ self.r1).wrapping_add(self.r2);
        let w1 = self.r1.wrapping_add(x[1]);
        let w2 = self.r2 ^ x[2];
        self.r1 = sbox(l1((w1 << 16) | (w2 >> 16)));
        self.r2 = sbox(l2((w2 << 16) | (w1 >> 16)));
        w
    }

    /// Advance the LFSR; `init` carries `W >> 1` during initialisation.
    fn lfsr_step(&mut self, init: Option<u32>) {
        let s = &self.lfsr;
        let mut v = s[0];
        for (cell, k) in [(s[0], 8), (s[4], 20), (s[10], 21), (s[13], 17), (s[15], 15)] {
            v = add31(v, rot31(cell, k));
        }
        if let Some(u) = init {
            v = add31(v, u);
        }
        if v == 0 {
            v = M31;
        }
        self.lfsr.copy_within(1.., 0);
        self.lfsr[15] = v;
    }

    /// Produce the next 32-bit keystream word.
    pub fn next_word(&mut self) -> u32 {
        let x = self.bit_reorganization();
        let z = self.f(x) ^ x[3];
        self.lfsr_step(None);
        z
    }

    /// Produce `n` keystream words.
    pub fn keystream(&mut self, n: usize) -> Vec<u32> {
        (0..n).map(|_| self.next_word()).collect()
    }

    /// XOR the keystream (big-endian word order) into `data`.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for chunk in data.chunks_mut(4) {
            let z = self.next_word().to_be_bytes();
            for (d, k) in chunk.iter_mut().zip(z) {
                *d ^= k;
            }
        }
    }
}

/// The 32-bit window of the keystream bit string starting at bit `i`.
pub(crate) fn window32(ks: &[u32], i: usize) -> u32 {
    let j = i / 32;
    let b = (i % 32) as u32;
    if b == 0 {
        ks[j]
    } else {
        (ks[j] << b) | (ks[j + 1] >> (32 - b))
    }
}
