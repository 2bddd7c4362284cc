#![forbid(unsafe_code)]
#![doc = "Unsigned big number arithmetic for the smcrypt elliptic-curve engine."]

mod bignum;
mod ct;
mod inv;
mod ops;
mod rand;

pub use bignum::{BigNum, Limb, LIMB_BITS};
