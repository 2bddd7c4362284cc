#![forbid(unsafe_code)]
#![doc = "Encoding utilities for smcrypt: hex, Base64, byte helpers and ASN.1 DER."]

#[cfg(feature = "asn1")]
pub mod asn1;

#[cfg(feature = "base64")]
pub mod base64;

#[cfg(feature = "hex")]
pub mod hex;

pub mod bytes;
