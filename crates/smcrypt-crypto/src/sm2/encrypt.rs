//! SM2 public-key encryption (GB/T 32918.4) and the SM3 key derivation
//! function.

use super::sign::MAX_NONCE_ATTEMPTS;
use super::{Sm2KeyPair, Sm2PublicKey};
use crate::ecc::{EcPoint, Sm2Curve, COMPRESSED_POINT_SIZE, UNCOMPRESSED_POINT_SIZE};
use crate::sm3::{Sm3, SM3_OUTPUT_SIZE};
use smcrypt_bignum::BigNum;
use smcrypt_types::{CipherOrder, CryptoError, RandomSource};
use smcrypt_utils::bytes::xor_in_place;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// SM3-based KDF: `SM3(Z || ct)` for ct = 1, 2, ... (32-bit big-endian),
/// concatenated and truncated to `len` bytes.
pub fn kdf(z: &[u8], len: usize) -> Result<Vec<u8>, CryptoError> {
    let blocks = len.div_ceil(SM3_OUTPUT_SIZE);
    if u32::try_from(blocks).is_err() {
        return Err(CryptoError::InvalidArg);
    }

    let mut out = Vec::with_capacity(blocks * SM3_OUTPUT_SIZE);
    let mut h = Sm3::new();
    for ct in 1..=blocks as u32 {
        h.update(z)?;
        h.update(&ct.to_be_bytes())?;
        out.extend_from_slice(&h.finish()?);
    }
    out.truncate(len);
    Ok(out)
}

fn is_all_zero(data: &[u8]) -> bool {
    data.iter().fold(0u8, |acc, &b| acc | b) == 0
}

/// C3 = SM3(x2 || M || y2)
fn check_value(x2: &[u8], msg: &[u8], y2: &[u8]) -> Result<[u8; SM3_OUTPUT_SIZE], CryptoError> {
    let mut h = Sm3::new();
    h.update(x2)?;
    h.update(msg)?;
    h.update(y2)?;
    h.finish()
}

/// Mask `data` in place with KDF(x2 || y2). An all-zero mask is
/// `KdfZeroOutput`.
fn apply_mask(shared: &EcPoint, data: &mut [u8]) -> Result<(), CryptoError> {
    let mut z = shared.x_bytes()?;
    z.extend_from_slice(&shared.y_bytes()?);
    let mut t = kdf(&z, data.len())?;
    z.zeroize();
    if is_all_zero(&t) {
        return Err(CryptoError::KdfZeroOutput);
    }
    xor_in_place(data, &t);
    t.zeroize();
    Ok(())
}

pub(super) fn encrypt(
    public_key: &Sm2PublicKey,
    plaintext: &[u8],
    order: CipherOrder,
    rng: &dyn RandomSource,
) -> Result<Vec<u8>, CryptoError> {
    if plaintext.is_empty() {
        return Err(CryptoError::InvalidInputLength(0));
    }
    let n = Sm2Curve::get().order();

    for _ in 0..MAX_NONCE_ATTEMPTS {
        let k = BigNum::random_range(n, rng)?;
        let c1 = EcPoint::mul_base(&k)?;
        let shared = public_key.point().mul(&k)?;

        let mut c2 = plaintext.to_vec();
        match apply_mask(&shared, &mut c2) {
            Ok(()) => {}
            Err(CryptoError::KdfZeroOutput) => {
                log::debug!("sm2 encrypt: zero kdf output, redrawing nonce");
                continue;
            }
            Err(e) => return Err(e),
        }
        let c3 = check_value(&shared.x_bytes()?, plaintext, &shared.y_bytes()?)?;

        let c1 = c1.to_uncompressed()?;
        return Ok(match order {
            CipherOrder::C1C3C2 => [&c1[..], &c3[..], &c2[..]].concat(),
            CipherOrder::C1C2C3 => [&c1[..], &c2[..], &c3[..]].concat(),
        });
    }

    Err(CryptoError::Sm2RetryExhausted)
}

/// The three ciphertext components, borrowed from the input.
struct Parts<'a> {
    c1: &'a [u8],
    c2: &'a [u8],
    c3: &'a [u8],
}

/// Split a ciphertext by order. C1 may be uncompressed (`04`, 65 bytes) or
/// compressed (`02`/`03`, 33 bytes); C2 must be non-empty.
fn split(ciphertext: &[u8], order: CipherOrder) -> Result<Parts<'_>, CryptoError> {
    let c1_len = match ciphertext.first() {
        Some(0x04) => UNCOMPRESSED_POINT_SIZE,
        Some(0x02 | 0x03) => COMPRESSED_POINT_SIZE,
        Some(_) => return Err(CryptoError::EccInvalidPublicKey),
        None => return Err(CryptoError::InvalidInputLength(0)),
    };
    if ciphertext.len() <= c1_len + SM3_OUTPUT_SIZE {
        return Err(CryptoError::InvalidInputLength(ciphertext.len()));
    }

    let (c1, rest) = ciphertext.split_at(c1_len);
    let (c2, c3) = match order {
        CipherOrder::C1C3C2 => {
            let (c3, c2) = rest.split_at(SM3_OUTPUT_SIZE);
            (c2, c3)
        }
        CipherOrder::C1C2C3 => rest.split_at(rest.len() - SM3_OUTPUT_SIZE),
    };
    Ok(Parts { c1, c2, c3 })
}

pub(super) fn decrypt(
    key: &Sm2KeyPair,
    ciphertext: &[u8],
    order: CipherOrder,
) -> Result<Vec<u8>, CryptoError> {
    let parts = split(ciphertext, order)?;
    let c1 = EcPoint::from_bytes(parts.c1)?;
    let shared = c1.mul(&key.private_key)?;

    let mut msg = parts.c2.to_vec();
    apply_mask(&shared, &mut msg)?;

    let u = check_value(&shared.x_bytes()?, &msg, &shared.y_bytes()?)?;
    if !bool::from(u[..].ct_eq(parts.c3)) {
        log::debug!("sm2 decrypt: c3 mismatch");
        msg.zeroize();
        return Err(CryptoError::Sm2C3Mismatch);
    }
    Ok(msg)
}

/// Re-serialize a ciphertext from one component order to the other without
/// decrypting it.
pub fn convert_order(
    ciphertext: &[u8],
    from: CipherOrder,
    to: CipherOrder,
) -> Result<Vec<u8>, CryptoError> {
    let parts = split(ciphertext, from)?;
    Ok(match to {
        CipherOrder::C1C3C2 => [parts.c1, parts.c3, parts.c2].concat(),
        CipherOrder::C1C2C3 => [parts.c1, parts.c2, parts.c3].concat(),
    })
}
