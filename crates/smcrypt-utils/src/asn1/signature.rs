//! Conversion between raw `r || s` signatures and DER
//! `SEQUENCE { INTEGER r, INTEGER s }`.

use super::{Decoder, Encoder};
use smcrypt_types::CryptoError;

/// Width of each signature component in the raw form.
pub const COMPONENT_LEN: usize = 32;

/// DER-encode a signature from its two big-endian components.
pub fn encode_signature(r: &[u8], s: &[u8]) -> Vec<u8> {
    let mut inner = Encoder::new();
    inner.write_integer(r).write_integer(s);
    let mut outer = Encoder::new();
    outer.write_sequence(&inner.finish());
    outer.finish()
}

/// Decode a DER signature into borrowed `(r, s)` magnitudes.
pub fn decode_signature(der: &[u8]) -> Result<(&[u8], &[u8]), CryptoError> {
    let mut outer = Decoder::new(der);
    let mut seq = outer.read_sequence()?;
    outer.finish()?;
    let r = seq.read_integer()?;
    let s = seq.read_integer()?;
    seq.finish()?;
    Ok((r, s))
}

/// Convert a 64-byte `r || s` signature to DER.
pub fn raw_to_der(raw: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if raw.len() != 2 * COMPONENT_LEN {
        return Err(CryptoError::InvalidInputLength(raw.len()));
    }
    let (r, s) = raw.split_at(COMPONENT_LEN);
    Ok(encode_signature(r, s))
}

/// Convert a DER signature to the 64-byte `r || s` form, left-padding each
/// component to 32 bytes.
pub fn der_to_raw(der: &[u8]) -> Result<[u8; 2 * COMPONENT_LEN], CryptoError> {
    let (r, s) = decode_signature(der)?;
    let mut raw = [0u8; 2 * COMPONENT_LEN];
    pad_into(r, &mut raw[..COMPONENT_LEN])?;
    pad_into(s, &mut raw[COMPONENT_LEN..])?;
    Ok(raw)
}

fn pad_into(component: &[u8], out: &mut [u8]) -> Result<(), CryptoError> {
    let start = component.iter().take_while(|&&b| b == 0).count();
    let trimmed = &component[start..];
    if trimmed.len() > out.len() {
        return Err(CryptoError::DecodeAsn1Fail);
    }
    let offset = out.len() - trimmed.len();
    out[offset..].copy_from_slice(trimmed);
    Ok(())
}
