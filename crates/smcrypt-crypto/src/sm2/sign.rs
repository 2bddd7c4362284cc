//! SM2 digital signature (GB/T 32918.2).

use super::{Sm2KeyPair, Sm2Options, Sm2PublicKey};
use crate::ecc::point::JacobianPoint;
use crate::ecc::{Sm2Curve, FIELD_SIZE};
use crate::sm3::Sm3;
use smcrypt_bignum::BigNum;
use smcrypt_types::{CryptoError, RandomSource, SignatureFormat};
use smcrypt_utils::asn1::signature::{der_to_raw, encode_signature};

/// Nonce draws allowed before signing gives up.
pub(crate) const MAX_NONCE_ATTEMPTS: usize = 64;

/// e = SM3(ZA || M) as an integer.
fn message_digest(
    public_key: &Sm2PublicKey,
    user_id: &[u8],
    message: &[u8],
) -> Result<BigNum, CryptoError> {
    let za = public_key.compute_za(user_id)?;
    let mut h = Sm3::new();
    h.update(&za)?;
    h.update(message)?;
    Ok(BigNum::from_bytes_be(&h.finish()?))
}

pub(super) fn sign(
    key: &Sm2KeyPair,
    message: &[u8],
    options: &Sm2Options,
    rng: &dyn RandomSource,
) -> Result<Vec<u8>, CryptoError> {
    let curve = Sm2Curve::get();
    let n = curve.order();
    let d = &key.private_key;

    let e = message_digest(&key.public_key, &options.user_id, message)?.mod_reduce(n)?;
    let one_plus_d_inv = BigNum::from_u64(1).mod_add(d, n)?.mod_inv(n)?;

    for _ in 0..MAX_NONCE_ATTEMPTS {
        let k = BigNum::random_range(n, rng)?;
        let kg = curve.to_affine(&curve.scalar_mul_base(&k)?)?;

        // r = (e + x1) mod n
        let r = e.mod_add(&kg.x.mod_reduce(n)?, n)?;
        if r.is_zero() || r.add(&k) == *n {
            log::debug!("sm2 sign: degenerate r, redrawing nonce");
            continue;
        }

        // s = (1 + d)^-1 · (k - r·d) mod n
        let rd = r.mod_mul(d, n)?;
        let s = one_plus_d_inv.mod_mul(&k.mod_sub(&rd, n)?, n)?;
        if s.is_zero() {
            log::debug!("sm2 sign: degenerate s, redrawing nonce");
            continue;
        }

        let r = r.to_bytes_be_padded(FIELD_SIZE)?;
        let s = s.to_bytes_be_padded(FIELD_SIZE)?;
        return Ok(match options.format {
            SignatureFormat::Raw => [r, s].concat(),
            SignatureFormat::Der => encode_signature(&r, &s),
        });
    }

    Err(CryptoError::Sm2RetryExhausted)
}

pub(super) fn verify(
    public_key: &Sm2PublicKey,
    message: &[u8],
    signature: &[u8],
    options: &Sm2Options,
) -> Result<bool, CryptoError> {
    let raw = match options.format {
        SignatureFormat::Raw => {
            if signature.len() != 2 * FIELD_SIZE {
                return Err(CryptoError::InvalidInputLength(signature.len()));
            }
            let mut raw = [0u8; 2 * FIELD_SIZE];
            raw.copy_from_slice(signature);
            raw
        }
        SignatureFormat::Der => der_to_raw(signature)?,
    };

    let curve = Sm2Curve::get();
    let n = curve.order();
    let r = BigNum::from_bytes_be(&raw[..FIELD_SIZE]);
    let s = BigNum::from_bytes_be(&raw[FIELD_SIZE..]);
    if !curve.is_valid_scalar(&r) || !curve.is_valid_scalar(&s) {
        log::debug!("sm2 verify: r or s out of range");
        return Ok(false);
    }

    let t = r.mod_add(&s, n)?;
    if t.is_zero() {
        log::debug!("sm2 verify: r + s = n");
        return Ok(false);
    }

    // (x1, y1) = s·G + t·PA
    let pa = JacobianPoint::from_affine(public_key.point());
    let sum = curve.mul_add_vartime(&s, &t, &pa)?;
    if sum.is_infinity() {
        return Ok(false);
    }
    let x1 = curve.to_affine(&sum)?.x;

    let e = message_digest(public_key, &options.user_id, message)?.mod_reduce(n)?;
    let expected = e.mod_add(&x1.mod_reduce(n)?, n)?;
    Ok(expected == r)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::rand::OsRandom;

    const R: &str = "f5a03b0648d2c4630eeac513e1bb81a15944da3827d5b74143ac7eaceee720b3";
    const S: &str = "b1b6aa29df212fd8763182bc0d421ca1bb9038fd1f7f42d4840b69c485bbc1aa";

    fn test_keypair() -> Sm2KeyPair {
        Sm2KeyPair::from_private_key(&hex_to_bytes(PRIV)).unwrap()
    }

    fn raw_options() -> Sm2Options {
        Sm2Options::default().with_format(SignatureFormat::Raw)
    }

    #[test]
    fn test_sign_known_vector_raw() {
        let kp = test_keypair();
        let rng = FixedRandom::new(&[&hex_to_bytes(K)]);
        let sig = kp.sign(b"message digest", &raw_options(), &rng).unwrap();
        assert_eq!(sig, hex_to_bytes(&format!("{R}{S}")));
        assert!(kp.verify(b"message digest", &sig, &raw_options()).unwrap());
    }

    #[test]
    fn test_sign_known_vector_der() {
        let kp = test_keypair();
        let rng = FixedRandom::new(&[&hex_to_bytes(K)]);
        let opts = Sm2Options::default();
        let sig = kp.sign(b"message digest", &opts, &rng).unwrap();
        assert_eq!(
            sig,
            hex_to_bytes(&format!("3046022100{R}022100{S}"))
        );
        assert!(kp.public_key().verify(b"message digest", &sig, &opts).unwrap());
    }

    #[test]
    fn test_sign_verify_random() {
        let kp = Sm2KeyPair::generate(&OsRandom).unwrap();
        let opts = Sm2Options::default();
        let msg = b"hello sm2";
        let sig = kp.sign(msg, &opts, &OsRandom).unwrap();
        assert!(kp.verify(msg, &sig, &opts).unwrap());

        // Any other key rejects it.
        let other = Sm2KeyPair::generate(&OsRandom).unwrap();
        assert!(!other.verify(msg, &sig, &opts).unwrap());

        // One altered message byte rejects it.
        assert!(!kp.verify(b"hello sm3", &sig, &opts).unwrap());

        // A different identity changes ZA.
        let alice = opts.clone().with_user_id(b"ALICE123@YAHOO.COM");
        assert!(!kp.verify(msg, &sig, &alice).unwrap());
    }

    #[test]
    fn test_signatures_are_randomized() {
        let kp = test_keypair();
        let opts = raw_options();
        let a = kp.sign(b"m", &opts, &OsRandom).unwrap();
        let b = kp.sign(b"m", &opts, &OsRandom).unwrap();
        assert_ne!(a, b);
        assert!(kp.verify(b"m", &a, &opts).unwrap());
        assert!(kp.verify(b"m", &b, &opts).unwrap());
    }

    #[test]
    fn test_verify_tampered_signature() {
        let kp = test_keypair();
        let mut sig = hex_to_bytes(&format!("{R}{S}"));
        sig[63] ^= 0x01;
        assert!(!kp.verify(b"message digest", &sig, &raw_options()).unwrap());
    }

    #[test]
    fn test_verify_out_of_range_is_false() {
        let kp = test_keypair();
        let opts = raw_options();
        let zero = [0u8; 64];
        assert!(!kp.verify(b"m", &zero, &opts).unwrap());

        let n = Sm2Curve::get().order().to_bytes_be_padded(32).unwrap();
        let mut sig = n.clone();
        sig.extend_from_slice(&hex_to_bytes(S));
        assert!(!kp.verify(b"message digest", &sig, &opts).unwrap());

        let sig = [0xFFu8; 64];
        assert!(!kp.verify(b"message digest", &sig, &opts).unwrap());
    }

    #[test]
    fn test_verify_malformed_is_error() {
        let kp = test_keypair();
        assert!(matches!(
            kp.verify(b"m", &[0u8; 63], &raw_options()),
            Err(CryptoError::InvalidInputLength(63))
        ));
        assert!(kp
            .verify(b"m", &[0x30, 0x03, 0x02, 0x01], &Sm2Options::default())
            .is_err());
        // Raw bytes handed to the DER decoder are structural garbage.
        let raw = hex_to_bytes(&format!("{R}{S}"));
        assert!(kp
            .verify(b"message digest", &raw, &Sm2Options::default())
            .is_err());
    }

    #[test]
    fn test_verify_rejects_redundant_integer_padding() {
        let kp = test_keypair();
        // The known signature with r carrying an extra 0x00 ahead of its
        // sign pad.
        let mut der = vec![0x30, 0x47, 0x02, 0x22, 0x00, 0x00];
        der.extend(hex_to_bytes(R));
        der.extend([0x02, 0x21, 0x00]);
        der.extend(hex_to_bytes(S));
        assert!(matches!(
            kp.verify(b"message digest", &der, &Sm2Options::default()),
            Err(CryptoError::DecodeAsn1Fail)
        ));
    }

    #[test]
    fn test_out_of_range_nonce_redrawn() {
        let kp = test_keypair();
        // The first draw equals n and is rejected by the sampler; the second
        // is the vector nonce.
        let n = Sm2Curve::get().order().to_bytes_be_padded(32).unwrap();
        let rng = FixedRandom::new(&[&n, &hex_to_bytes(K)]);
        let sig = kp.sign(b"message digest", &raw_options(), &rng).unwrap();
        assert_eq!(sig, hex_to_bytes(&format!("{R}{S}")));
    }

    struct StuckRandom;

    impl RandomSource for StuckRandom {
        fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
            buf.fill(0xFF);
            Ok(())
        }
    }

    #[test]
    fn test_broken_rng_surfaces_error() {
        let kp = test_keypair();
        // All-ones is always >= n, so the sampler never accepts a nonce.
        assert!(matches!(
            kp.sign(b"m", &raw_options(), &StuckRandom),
            Err(CryptoError::RandGenFail)
        ));
    }
}
