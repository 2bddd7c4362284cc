//! ZUC integrity algorithms: 128-EIA3 and the ZUC-256 MAC.
//!
//! Both accumulate, for every set message bit `i`, the tag-sized keystream
//! window starting at bit `i` (offset by the tag length for ZUC-256), then
//! mask with a final window.

use super::confidentiality::check_params;
use super::{window32, Zuc, D256_KEYSTREAM};
use smcrypt_types::{CryptoError, ZucMacSize};

#[inline]
fn msg_bit(msg: &[u8], i: usize) -> bool {
    (msg[i / 8] >> (7 - i % 8)) & 1 == 1
}

/// Build the 16-byte EIA3 IV from COUNT, BEARER and DIRECTION.
fn eia3_iv(count: u32, bearer: u8, direction: u8) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[..4].copy_from_slice(&count.to_be_bytes());
    iv[4] = bearer << 3;
    iv[8] = iv[0] ^ (direction << 7);
    iv.copy_within(1..6, 9);
    iv[14] = iv[6] ^ (direction << 7);
    iv[15] = iv[7];
    iv
}

/// Compute the 32-bit 128-EIA3 MAC over the first `bit_len` bits of `msg`.
pub fn eia3(
    key: &[u8],
    count: u32,
    bearer: u8,
    direction: u8,
    msg: &[u8],
    bit_len: usize,
) -> Result<u32, CryptoError> {
    check_params(bearer, direction, msg, bit_len)?;
    let mut zuc = Zuc::new(key, &eia3_iv(count, bearer, direction))?;

    let n = bit_len.div_ceil(32) + 2;
    let ks = zuc.keystream(n);

    let mut t = 0u32;
    for i in (0..bit_len).filter(|&i| msg_bit(msg, i)) {
        t ^= window32(&ks, i);
    }
    t ^= window32(&ks, bit_len);
    Ok(t ^ ks[n - 1])
}

/// ZUC-256 loading constants for each MAC length.
fn mac_constants(size: ZucMacSize) -> [u8; 16] {
    let mut d = D256_KEYSTREAM;
    match size {
        ZucMacSize::Bits32 => d[2] = 0x25,
        ZucMacSize::Bits64 => d[0] = 0x23,
        ZucMacSize::Bits128 => {
            d[0] = 0x23;
            d[2] = 0x25;
        }
    }
    d
}

/// Compute the ZUC-256 MAC over the first `bit_len` bits of `msg`.
///
/// `key` is 32 bytes, `iv` is 25 bytes. The tag is returned big-endian and is
/// 4, 8 or 16 bytes long depending on `size`.
pub fn zuc256_mac(
    key: &[u8],
    iv: &[u8],
    msg: &[u8],
    bit_len: usize,
    size: ZucMacSize,
) -> Result<Vec<u8>, CryptoError> {
    if msg.len() < bit_len.div_ceil(8) {
        return Err(CryptoError::InvalidInputLength(msg.len()));
    }
    let t_bits = size.bits();
    let words = t_bits / 32;
    let mut zuc = Zuc::new_256_with(key, iv, &mac_constants(size))?;
    let ks = zuc.keystream((bit_len + 2 * t_bits).div_ceil(32) + 1);

    let mut tag: Vec<u32> = ks[..words].to_vec();
    for i in (0..bit_len).filter(|&i| msg_bit(msg, i)) {
        for (j, w) in tag.iter_mut().enumerate() {
            *w ^= window32(&ks, t_bits + i + 32 * j);
        }
    }
    for (j, w) in tag.iter_mut().enumerate() {
        *w ^= window32(&ks, bit_len + t_bits + 32 * j);
    }
    Ok(tag.iter().flat_map(|w| w.to_be_bytes()).collect())
}
