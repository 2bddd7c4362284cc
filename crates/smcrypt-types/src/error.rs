/// Broad category of a [`CryptoError`].
///
/// Callers that only need to distinguish "bad input" from "well-formed but
/// unauthentic" can match on this instead of individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or wrong-length input, unknown selector, bad padding.
    Validation,
    /// Invalid cryptographic material or a failed algorithmic precondition.
    Crypto,
    /// A tag, MAC or checksum did not match.
    Authentication,
    /// Malformed ASN.1 structure.
    Encoding,
}

/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    // Validation errors
    #[error("invalid argument")]
    InvalidArg,
    #[error("invalid hex string")]
    InvalidHex,
    #[error("invalid base64 string")]
    InvalidBase64,
    #[error("invalid utf-8 data")]
    InvalidUtf8,
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
    #[error("invalid iv length: expected {expected}, got {got}")]
    InvalidIvLength { expected: usize, got: usize },
    #[error("invalid tag length")]
    InvalidTagLength,
    #[error("input length {0} is not valid for this operation")]
    InvalidInputLength(usize),
    #[error("invalid padding")]
    InvalidPadding,
    #[error("unknown {kind} selector: {value}")]
    UnknownSelector { kind: &'static str, value: String },
    #[error("algorithm not enabled in this build")]
    NotSupported,

    // BigNum errors
    #[error("big number: division by zero")]
    BnDivisionByZero,
    #[error("big number: no modular inverse")]
    BnNoInverse,
    #[error("random generation failed")]
    RandGenFail,

    // ECC errors
    #[error("ecc: point at infinity")]
    EccPointAtInfinity,
    #[error("ecc: point not on curve")]
    EccPointNotOnCurve,
    #[error("ecc: invalid private key")]
    EccInvalidPrivateKey,
    #[error("ecc: invalid public key encoding")]
    EccInvalidPublicKey,

    // SM2 errors
    #[error("sm2: nonce retry budget exhausted")]
    Sm2RetryExhausted,
    #[error("sm2: kdf produced an all-zero mask")]
    KdfZeroOutput,

    // Authentication failures
    #[error("aead: tag verification failed")]
    AeadTagVerifyFail,
    #[error("sm2: c3 verification failed")]
    Sm2C3Mismatch,

    // Encoding errors
    #[error("decode: asn1 buffer failed")]
    DecodeAsn1Fail,
    #[error("decode: trailing data after asn1 element")]
    Asn1TrailingData,
    #[error("decode: asn1 length uses more than 4 bytes")]
    Asn1LengthUnsupported,
}

impl CryptoError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArg
            | Self::InvalidHex
            | Self::InvalidBase64
            | Self::InvalidUtf8
            | Self::InvalidKeyLength { .. }
            | Self::InvalidIvLength { .. }
            | Self::InvalidTagLength
            | Self::InvalidInputLength(_)
            | Self::InvalidPadding
            | Self::UnknownSelector { .. }
            | Self::NotSupported => ErrorKind::Validation,
            Self::BnDivisionByZero
            | Self::BnNoInverse
            | Self::RandGenFail
            | Self::EccPointAtInfinity
            | Self::EccPointNotOnCurve
            | Self::EccInvalidPrivateKey
            | Self::EccInvalidPublicKey
            | Self::Sm2RetryExhausted
            | Self::KdfZeroOutput => ErrorKind::Crypto,
            Self::AeadTagVerifyFail | Self::Sm2C3Mismatch => ErrorKind::Authentication,
            Self::DecodeAsn1Fail | Self::Asn1TrailingData | Self::Asn1LengthUnsupported => {
                ErrorKind::Encoding
            }
        }
    }

    /// True for "well-formed but unauthentic" outcomes.
    pub fn is_authentication_failure(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }
}
