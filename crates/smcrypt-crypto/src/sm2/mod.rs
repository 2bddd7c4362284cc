//! SM2 elliptic curve public-key cryptography.
//!
//! SM2 is a Chinese national standard (GB/T 32918) for elliptic curve
//! cryptography over the SM2 recommended 256-bit prime curve. This module
//! provides key pairs, digital signatures bound to a user identity (`ZA`)
//! and public-key encryption with either ciphertext component order.

mod encrypt;
mod sign;

pub use encrypt::{convert_order, kdf};

use crate::ecc::{EcPoint, Sm2Curve, A, B, FIELD_SIZE, GX, GY};
use crate::sm3::{Sm3, SM3_OUTPUT_SIZE};
use smcrypt_bignum::BigNum;
use smcrypt_types::{CipherOrder, CryptoError, PointFormat, RandomSource, SignatureFormat};

/// Identity used for `ZA` when the caller does not supply one.
pub const DEFAULT_USER_ID: &[u8] = b"1234567812345678";

/// Private key length in bytes.
pub const PRIVATE_KEY_SIZE: usize = FIELD_SIZE;

/// Per-call SM2 settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sm2Options {
    /// Signer identity mixed into `ZA`.
    pub user_id: Vec<u8>,
    /// Ciphertext component order for encrypt/decrypt.
    pub order: CipherOrder,
    /// Signature encoding for sign/verify.
    pub format: SignatureFormat,
}

impl Default for Sm2Options {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_vec(),
            order: CipherOrder::default(),
            format: SignatureFormat::default(),
        }
    }
}

impl Sm2Options {
    pub fn with_user_id(mut self, user_id: &[u8]) -> Self {
        self.user_id = user_id.to_vec();
        self
    }

    pub fn with_order(mut self, order: CipherOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_format(mut self, format: SignatureFormat) -> Self {
        self.format = format;
        self
    }
}

/// An SM2 public key: a validated point on the curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sm2PublicKey {
    point: EcPoint,
}

impl Sm2PublicKey {
    /// Decode an uncompressed (`04 || x || y`) or compressed (`02/03 || x`)
    /// public key. The point must lie on the curve.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            point: EcPoint::from_bytes(data)?,
        })
    }

    pub fn from_point(point: EcPoint) -> Self {
        Self { point }
    }

    pub fn point(&self) -> &EcPoint {
        &self.point
    }

    /// 65-byte `04 || x || y` encoding.
    pub fn to_uncompressed(&self) -> Result<Vec<u8>, CryptoError> {
        self.point.to_uncompressed()
    }

    /// 33-byte `02/03 || x` encoding.
    pub fn to_compressed(&self) -> Result<Vec<u8>, CryptoError> {
        self.point.to_compressed()
    }

    pub fn encode(&self, format: PointFormat) -> Result<Vec<u8>, CryptoError> {
        self.point.encode(format)
    }

    /// `ZA = SM3(ENTL || ID || a || b || xG || yG || xA || yA)`, where ENTL
    /// is the bit length of `user_id` as a 16-bit big-endian integer.
    pub fn compute_za(&self, user_id: &[u8]) -> Result<[u8; SM3_OUTPUT_SIZE], CryptoError> {
        let entl = user_id
            .len()
            .checked_mul(8)
            .and_then(|bits| u16::try_from(bits).ok())
            .ok_or(CryptoError::InvalidArg)?;

        let mut h = Sm3::new();
        h.update(&entl.to_be_bytes())?;
        h.update(user_id)?;
        h.update(&A)?;
        h.update(&B)?;
        h.update(&GX)?;
        h.update(&GY)?;
        h.update(&self.point.x_bytes()?)?;
        h.update(&self.point.y_bytes()?)?;
        h.finish()
    }

    /// Verify `signature` over `message`. See [`Sm2KeyPair::verify`].
    pub fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        options: &Sm2Options,
    ) -> Result<bool, CryptoError> {
        sign::verify(self, message, signature, options)
    }

    /// Encrypt `plaintext` to this key. See [`Sm2KeyPair::encrypt`].
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        options: &Sm2Options,
        rng: &dyn RandomSource,
    ) -> Result<Vec<u8>, CryptoError> {
        encrypt::encrypt(self, plaintext, options.order, rng)
    }
}

/// An SM2 key pair. The private scalar is wiped on drop.
#[derive(Clone)]
pub struct Sm2KeyPair {
    /// The private scalar d, in [1, n-2].
    private_key: BigNum,
    public_key: Sm2PublicKey,
}

impl std::fmt::Debug for Sm2KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sm2KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl Sm2KeyPair {
    /// Generate a new key pair, drawing d uniformly from [1, n-2].
    pub fn generate(rng: &dyn RandomSource) -> Result<Self, CryptoError> {
        let curve = Sm2Curve::get();
        // d = n-1 is excluded: signing needs (1 + d) invertible mod n.
        let upper = curve
            .order()
            .checked_sub(&BigNum::from_u64(1))
            .ok_or(CryptoError::InvalidArg)?;
        let d = BigNum::random_range(&upper, rng)?;
        Self::from_scalar(d)
    }

    /// Create a key pair from a 32-byte big-endian private key.
    pub fn from_private_key(private_key: &[u8]) -> Result<Self, CryptoError> {
        if private_key.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: PRIVATE_KEY_SIZE,
                got: private_key.len(),
            });
        }
        Self::from_scalar(BigNum::from_bytes_be(private_key))
    }

    fn from_scalar(d: BigNum) -> Result<Self, CryptoError> {
        let curve = Sm2Curve::get();
        let n_minus_1 = curve
            .order()
            .checked_sub(&BigNum::from_u64(1))
            .ok_or(CryptoError::InvalidArg)?;
        if d.is_zero() || d >= n_minus_1 {
            return Err(CryptoError::EccInvalidPrivateKey);
        }
        let point = EcPoint::mul_base(&d)?;
        Ok(Self {
            private_key: d,
            public_key: Sm2PublicKey { point },
        })
    }

    /// The private key as 32 big-endian bytes.
    pub fn private_key_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        self.private_key.to_bytes_be_padded(PRIVATE_KEY_SIZE)
    }

    pub fn public_key(&self) -> &Sm2PublicKey {
        &self.public_key
    }

    /// Sign `message` under `options.user_id`, encoding per `options.format`
    /// (64-byte `r || s` or DER).
    ///
    /// A degenerate nonce is redrawn internally; running out of attempts is
    /// `Sm2RetryExhausted`.
    pub fn sign(
        &self,
        message: &[u8],
        options: &Sm2Options,
        rng: &dyn RandomSource,
    ) -> Result<Vec<u8>, CryptoError> {
        sign::sign(self, message, options, rng)
    }

    /// Verify a signature. A well-formed signature that does not match is
    /// `Ok(false)`; a structurally malformed one is an error.
    pub fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        options: &Sm2Options,
    ) -> Result<bool, CryptoError> {
        self.public_key.verify(message, signature, options)
    }

    /// Encrypt to this key pair's public key.
    ///
    /// Output is `C1 || C3 || C2` or `C1 || C2 || C3` per `options.order`,
    /// with C1 uncompressed (65 bytes) and C3 the 32-byte SM3 check value.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        options: &Sm2Options,
        rng: &dyn RandomSource,
    ) -> Result<Vec<u8>, CryptoError> {
        self.public_key.encrypt(plaintext, options, rng)
    }

    /// Decrypt and authenticate. A C3 mismatch is `Sm2C3Mismatch` and no
    /// plaintext is returned.
    pub fn decrypt(&self, ciphertext: &[u8], options: &Sm2Options) -> Result<Vec<u8>, CryptoError> {
        encrypt::decrypt(self, ciphertext, options.order)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use smcrypt_types::{CryptoError, RandomSource};
    use std::sync::Mutex;

    /// Replays fixed byte chunks in order, then repeats the last one.
    pub struct FixedRandom(Mutex<Vec<Vec<u8>>>);

    impl FixedRandom {
        pub fn new(chunks: &[&[u8]]) -> Self {
            let mut v: Vec<Vec<u8>> = chunks.iter().map(|c| c.to_vec()).collect();
            v.reverse();
            FixedRandom(Mutex::new(v))
        }
    }

    impl RandomSource for FixedRandom {
        fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
            let mut chunks = self.0.lock().unwrap();
            let chunk = if chunks.len() > 1 {
                chunks.pop().unwrap()
            } else {
                chunks[0].clone()
            };
            buf.copy_from_slice(&chunk[..buf.len()]);
            Ok(())
        }
    }

    pub fn hex_to_bytes(s: &str) -> Vec<u8> {
        smcrypt_utils::hex::decode(s).unwrap()
    }

    pub const PRIV: &str = "3945208f7b2144b13f36e38ac6d39f95889393692860b51a42fb81ef4df7c5b8";
    pub const PUB_X: &str = "09f9df311e5421a150dd7d161e4bc5c672179fad1833fc076bb08ff356f35020";
    pub const PUB_Y: &str = "ccea490ce26775a52dc6ea718cc1aa600aed05fbf35e084a6632f6072da9ad13";
    pub const K: &str = "59276e27d506861a16680f3ad9c02dccef3cc1fa3cdbe4ce6d54b80deac1bc21";
}
