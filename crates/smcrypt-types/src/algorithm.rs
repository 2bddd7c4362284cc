use std::fmt;
use std::str::FromStr;

use crate::CryptoError;

/// Uppercase and drop separators so `"C1-C3-C2"`, `"c1c3c2"` and
/// `"C1_C3_C2"` all compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn unknown(kind: &'static str, value: &str) -> CryptoError {
    CryptoError::UnknownSelector {
        kind,
        value: value.to_string(),
    }
}

/// Hash algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgId {
    Sm3,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgId {
    /// Digest length in bytes.
    pub fn output_size(self) -> usize {
        match self {
            Self::Sm3 | Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Compression-function block length in bytes.
    pub fn block_size(self) -> usize {
        match self {
            Self::Sm3 | Self::Sha256 => 64,
            Self::Sha384 | Self::Sha512 => 128,
        }
    }
}

impl FromStr for HashAlgId {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "SM3" => Ok(Self::Sm3),
            "SHA256" => Ok(Self::Sha256),
            "SHA384" => Ok(Self::Sha384),
            "SHA512" => Ok(Self::Sha512),
            _ => Err(unknown("hash", s)),
        }
    }
}

impl fmt::Display for HashAlgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sm3 => "SM3",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
        };
        f.write_str(name)
    }
}

/// Block cipher modes of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherMode {
    Ecb,
    Cbc,
    Ctr,
    Cfb,
    Ofb,
    Gcm,
}

impl CipherMode {
    /// Whether the mode consumes an IV / nonce.
    pub fn needs_iv(self) -> bool {
        !matches!(self, Self::Ecb)
    }
}

impl FromStr for CipherMode {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "ECB" => Ok(Self::Ecb),
            "CBC" => Ok(Self::Cbc),
            "CTR" => Ok(Self::Ctr),
            "CFB" => Ok(Self::Cfb),
            "OFB" => Ok(Self::Ofb),
            "GCM" => Ok(Self::Gcm),
            _ => Err(unknown("cipher mode", s)),
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ecb => "ECB",
            Self::Cbc => "CBC",
            Self::Ctr => "CTR",
            Self::Cfb => "CFB",
            Self::Ofb => "OFB",
            Self::Gcm => "GCM",
        };
        f.write_str(name)
    }
}

/// Block padding schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Padding {
    #[default]
    Pkcs7,
    NoPadding,
}

impl FromStr for Padding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "PKCS7" | "PKCS5" | "PKCS7PADDING" | "PKCS5PADDING" => Ok(Self::Pkcs7),
            "NONE" | "NOPADDING" => Ok(Self::NoPadding),
            _ => Err(unknown("padding", s)),
        }
    }
}

/// Component order of a serialized SM2 ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CipherOrder {
    C1C2C3,
    #[default]
    C1C3C2,
}

impl FromStr for CipherOrder {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "C1C2C3" => Ok(Self::C1C2C3),
            "C1C3C2" => Ok(Self::C1C3C2),
            _ => Err(unknown("ciphertext order", s)),
        }
    }
}

/// Signature interchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignatureFormat {
    /// Fixed 64-byte `r || s`.
    Raw,
    /// ASN.1 `SEQUENCE { INTEGER r, INTEGER s }`.
    #[default]
    Der,
}

impl FromStr for SignatureFormat {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "RAW" | "PLAIN" | "RS" => Ok(Self::Raw),
            "DER" | "ASN1" => Ok(Self::Der),
            _ => Err(unknown("signature format", s)),
        }
    }
}

/// Elliptic curve point encoding formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointFormat {
    Compressed,
    #[default]
    Uncompressed,
}

/// ZUC-256 MAC tag lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZucMacSize {
    #[default]
    Bits32,
    Bits64,
    Bits128,
}

impl ZucMacSize {
    /// Tag length in bits.
    pub fn bits(self) -> usize {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
            Self::Bits128 => 128,
        }
    }
}

impl FromStr for ZucMacSize {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "32" => Ok(Self::Bits32),
            "64" => Ok(Self::Bits64),
            "128" => Ok(Self::Bits128),
            _ => Err(unknown("zuc mac size", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_mode_parse() {
        assert_eq!("ecb".parse::<CipherMode>().unwrap(), CipherMode::Ecb);
        assert_eq!("GCM".parse::<CipherMode>().unwrap(), CipherMode::Gcm);
        let err = "XTS".parse::<CipherMode>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_mode_display_roundtrip() {
        for m in [
            CipherMode::Ecb,
            CipherMode::Cbc,
            CipherMode::Ctr,
            CipherMode::Cfb,
            CipherMode::Ofb,
            CipherMode::Gcm,
        ] {
            assert_eq!(m.to_string().parse::<CipherMode>().unwrap(), m);
            assert_eq!(m.needs_iv(), m != CipherMode::Ecb);
        }
    }

    #[test]
    fn test_hash_display_roundtrip() {
        for h in [
            HashAlgId::Sm3,
            HashAlgId::Sha256,
            HashAlgId::Sha384,
            HashAlgId::Sha512,
        ] {
            assert_eq!(h.to_string().parse::<HashAlgId>().unwrap(), h);
        }
        assert_eq!("sha-256".parse::<HashAlgId>().unwrap(), HashAlgId::Sha256);
    }

    #[test]
    fn test_padding_parse() {
        assert_eq!("PKCS7".parse::<Padding>().unwrap(), Padding::Pkcs7);
        assert_eq!("PKCS5Padding".parse::<Padding>().unwrap(), Padding::Pkcs7);
        assert_eq!("NONE".parse::<Padding>().unwrap(), Padding::NoPadding);
        assert!("ZERO".parse::<Padding>().is_err());
    }

    #[test]
    fn test_order_and_format_parse() {
        assert_eq!("C1C2C3".parse::<CipherOrder>().unwrap(), CipherOrder::C1C2C3);
        assert_eq!("c1-c3-c2".parse::<CipherOrder>().unwrap(), CipherOrder::C1C3C2);
        assert!("C2C1C3".parse::<CipherOrder>().is_err());
        assert_eq!("der".parse::<SignatureFormat>().unwrap(), SignatureFormat::Der);
        assert_eq!("raw".parse::<SignatureFormat>().unwrap(), SignatureFormat::Raw);
    }

    #[test]
    fn test_hash_sizes() {
        assert_eq!(HashAlgId::Sm3.output_size(), 32);
        assert_eq!(HashAlgId::Sha384.output_size(), 48);
        assert_eq!(HashAlgId::Sha512.block_size(), 128);
        assert_eq!("sha-256".parse::<HashAlgId>().unwrap(), HashAlgId::Sha256);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Padding::default(), Padding::Pkcs7);
        assert_eq!(CipherOrder::default(), CipherOrder::C1C3C2);
        assert_eq!(SignatureFormat::default(), SignatureFormat::Der);
        assert_eq!(ZucMacSize::default().bits(), 32);
    }
}
