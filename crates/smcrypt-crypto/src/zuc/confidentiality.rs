//! 128-EEA3: the 3GPP confidentiality algorithm built on ZUC-128.

use super::Zuc;
use smcrypt_types::CryptoError;

/// Build the 16-byte EEA3 IV from COUNT, BEARER and DIRECTION.
fn eea3_iv(count: u32, bearer: u8, direction: u8) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[..4].copy_from_slice(&count.to_be_bytes());
    iv[4] = (bearer << 3) | (direction << 2);
    let (head, tail) = iv.split_at_mut(8);
    tail.copy_from_slice(head);
    iv
}

pub(crate) fn check_params(
    bearer: u8,
    direction: u8,
    msg: &[u8],
    bit_len: usize,
) -> Result<(), CryptoError> {
    if bearer > 0x1f || direction > 1 {
        return Err(CryptoError::InvalidArg);
    }
    if msg.len() < bit_len.div_ceil(8) {
        return Err(CryptoError::InvalidInputLength(msg.len()));
    }
    Ok(())
}

/// Encrypt or decrypt the first `bit_len` bits of `msg`.
///
/// Returns `ceil(bit_len / 8)` bytes; bits past `bit_len` in the last byte
/// are cleared.
pub fn eea3(
    key: &[u8],
    count: u32,
    bearer: u8,
    direction: u8,
    msg: &[u8],
    bit_len: usize,
) -> Result<Vec<u8>, CryptoError> {
    check_params(bearer, direction, msg, bit_len)?;
    let mut zuc = Zuc::new(key, &eea3_iv(count, bearer, direction))?;

    let mut out = msg[..bit_len.div_ceil(8)].to_vec();
    zuc.apply_keystream(&mut out);
    let rem = bit_len % 8;
    if rem != 0 {
        if let Some(last) = out.last_mut() {
            *last &= 0xffu8 << (8 - rem);
        }
    }
    Ok(out)
}
