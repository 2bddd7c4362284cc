//! SM3 Hash-DRBG (NIST SP 800-90A Section 10.1.1 with SM3 as the hash).
//!
//! Only used as the degraded-mode generator behind
//! [`FallbackRandom`](super::FallbackRandom).

use crate::sm3::Sm3;
use smcrypt_types::CryptoError;
use zeroize::Zeroize;

/// seedlen for a 256-bit hash (SP 800-90A Table 2), in bytes.
const SEED_LEN: usize = 55;

/// Maximum number of generate requests before reseed is required.
const RESEED_INTERVAL: u64 = 1 << 48;

/// Hash-DRBG working state.
pub(crate) struct HashDrbg {
    v: [u8; SEED_LEN],
    c: [u8; SEED_LEN],
    reseed_counter: u64,
}

impl Drop for HashDrbg {
    fn drop(&mut self) {
        self.v.zeroize();
        self.c.zeroize();
    }
}

/// Hash_df (SP 800-90A §10.3.1): counter-mode SM3 over
/// `counter || no_of_bits || input`.
fn hash_df(input: &[&[u8]]) -> Result<[u8; SEED_LEN], CryptoError> {
    let bits = (SEED_LEN as u32) * 8;
    let mut out = [0u8; SEED_LEN];
    let mut h = Sm3::new();
    for (counter, chunk) in (1u8..).zip(out.chunks_mut(32)) {
        h.update(&[counter])?;
        h.update(&bits.to_be_bytes())?;
        for part in input {
            h.update(part)?;
        }
        let digest = h.finish()?;
        chunk.copy_from_slice(&digest[..chunk.len()]);
    }
    Ok(out)
}

/// v = (v + addend) mod 2^(8·SEED_LEN), big-endian, `addend` right-aligned.
fn v_add(v: &mut [u8; SEED_LEN], addend: &[u8]) {
    let offset = SEED_LEN - addend.len();
    let mut carry = 0u16;
    for i in (0..SEED_LEN).rev() {
        let a = if i >= offset { addend[i - offset] as u16 } else { 0 };
        let sum = v[i] as u16 + a + carry;
        v[i] = sum as u8;
        carry = sum >> 8;
    }
}

impl HashDrbg {
    /// Instantiate from `seed_material` (entropy || nonce || personalization).
    pub fn new(seed_material: &[u8]) -> Result<Self, CryptoError> {
        let v = hash_df(&[seed_material])?;
        let c = hash_df(&[&[0x00], &v])?;
        Ok(HashDrbg {
            v,
            c,
            reseed_counter: 1,
        })
    }

    /// Mix fresh entropy into the state (SP 800-90A §10.1.1.3).
    pub fn reseed(&mut self, entropy: &[u8]) -> Result<(), CryptoError> {
        self.v = hash_df(&[&[0x01], &self.v, entropy])?;
        self.c = hash_df(&[&[0x00], &self.v])?;
        self.reseed_counter = 1;
        Ok(())
    }

    pub fn needs_reseed(&self) -> bool {
        self.reseed_counter > RESEED_INTERVAL
    }

    /// Fill `output` (SP 800-90A §10.1.1.4, no additional input).
    pub fn generate(&mut self, output: &mut [u8]) -> Result<(), CryptoError> {
        if self.needs_reseed() {
            return Err(CryptoError::RandGenFail);
        }

        // Hashgen
        let mut data = self.v;
        let mut h = Sm3::new();
        for chunk in output.chunks_mut(32) {
            h.update(&data)?;
            let digest = h.finish()?;
            chunk.copy_from_slice(&digest[..chunk.len()]);
            v_add(&mut data, &[1]);
        }
        data.zeroize();

        // V = V + Hash(0x03 || V) + C + reseed_counter
        h.update(&[0x03])?;
        h.update(&self.v)?;
        let hv = h.finish()?;
        let c = self.c;
        v_add(&mut self.v, &hv);
        v_add(&mut self.v, &c);
        v_add(&mut self.v, &self.reseed_counter.to_be_bytes());
        self.reseed_counter += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use smcrypt_utils::hex::encode as hex;

    #[test]
    fn test_known_answer() {
        let mut drbg = HashDrbg::new(b"smcrypt hash-drbg test seed").unwrap();
        let mut out = [0u8; 32];
        drbg.generate(&mut out).unwrap();
        assert_eq!(
            hex(&out),
            "c4d39f5062a175038904ca255965a917037ab4f1eaf75d8bef88486f677c4141"
        );
        let mut out = [0u8; 40];
        drbg.generate(&mut out).unwrap();
        assert_eq!(
            hex(&out),
            "02c25fc0181960e1c601f4562f1db90edf38a379b831a89cc36d2f3ff935e3d4af84e275f3d112d8"
        );
        drbg.reseed(b"fresh entropy").unwrap();
        let mut out = [0u8; 16];
        drbg.generate(&mut out).unwrap();
        assert_eq!(hex(&out), "4a28c99137c9395aa5532f71a9625b23");
    }

    #[test]
    fn test_deterministic_and_distinct() {
        let mut a = HashDrbg::new(b"seed").unwrap();
        let mut b = HashDrbg::new(b"seed").unwrap();
        let mut c = HashDrbg::new(b"other seed").unwrap();
        let (mut x, mut y, mut z) = ([0u8; 64], [0u8; 64], [0u8; 64]);
        a.generate(&mut x).unwrap();
        b.generate(&mut y).unwrap();
        c.generate(&mut z).unwrap();
        assert_eq!(x, y);
        assert_ne!(x, z);
        a.generate(&mut y).unwrap();
        assert_ne!(x, y);
    }

    #[test]
    fn test_v_add_carry() {
        let mut v = [0xFFu8; SEED_LEN];
        v_add(&mut v, &[1]);
        assert_eq!(v, [0u8; SEED_LEN]);
    }
}
