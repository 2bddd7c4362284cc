#![forbid(unsafe_code)]
#![doc = "Common error codes, algorithm selectors and the randomness capability for smcrypt."]

pub mod algorithm;
pub mod error;
pub mod rand;

pub use algorithm::*;
pub use error::*;
pub use rand::RandomSource;
