//! Session-style SM4 cipher bound to one key schedule.

use super::{cbc, cfb, ctr, ecb, gcm, ofb};
use crate::sm4::{Sm4Key, SM4_BLOCK_SIZE};
use smcrypt_types::{CipherMode, CryptoError, Padding};

/// Mode configuration for [`Sm4Cipher`].
///
/// `padding` applies to ECB and CBC only; the stream-like modes never pad.
/// `aad` is used by GCM only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherOptions {
    pub mode: CipherMode,
    pub padding: Padding,
    pub iv: Vec<u8>,
    pub aad: Vec<u8>,
}

impl Default for CipherOptions {
    fn default() -> Self {
        Self::new(CipherMode::Ecb)
    }
}

impl CipherOptions {
    pub fn new(mode: CipherMode) -> Self {
        Self {
            mode,
            padding: Padding::Pkcs7,
            iv: Vec::new(),
            aad: Vec::new(),
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_iv(mut self, iv: &[u8]) -> Self {
        self.iv = iv.to_vec();
        self
    }

    pub fn with_aad(mut self, aad: &[u8]) -> Self {
        self.aad = aad.to_vec();
        self
    }

    fn validate(&self) -> Result<(), CryptoError> {
        if !self.mode.needs_iv() {
            return Ok(());
        }
        match self.mode {
            CipherMode::Gcm if self.iv.is_empty() => Err(CryptoError::InvalidIvLength {
                expected: 12,
                got: 0,
            }),
            CipherMode::Gcm => Ok(()),
            _ if self.iv.len() != SM4_BLOCK_SIZE => Err(CryptoError::InvalidIvLength {
                expected: SM4_BLOCK_SIZE,
                got: self.iv.len(),
            }),
            _ => Ok(()),
        }
    }
}

/// SM4 bound to a key and a mode configuration.
///
/// The key schedule is derived once in [`Sm4Cipher::new`] and reused for
/// every call. GCM output is `ciphertext || tag`.
pub struct Sm4Cipher {
    key: Sm4Key,
    options: CipherOptions,
}

impl Sm4Cipher {
    /// Expand `key` and validate `options` (IV length per mode).
    pub fn new(key: &[u8], options: CipherOptions) -> Result<Self, CryptoError> {
        options.validate()?;
        Ok(Self {
            key: Sm4Key::new(key)?,
            options,
        })
    }

    pub fn options(&self) -> &CipherOptions {
        &self.options
    }

    /// Encrypt `plaintext` under the configured mode.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let o = &self.options;
        match o.mode {
            CipherMode::Ecb => ecb::encrypt_with(&self.key, plaintext, o.padding),
            CipherMode::Cbc => cbc::encrypt_with(&self.key, &o.iv, plaintext, o.padding),
            CipherMode::Ctr => {
                let mut data = plaintext.to_vec();
                ctr::crypt_with(&self.key, &o.iv, &mut data)?;
                Ok(data)
            }
            CipherMode::Cfb => cfb::encrypt_with(&self.key, &o.iv, plaintext),
            CipherMode::Ofb => {
                let mut data = plaintext.to_vec();
                ofb::crypt_with(&self.key, &o.iv, &mut data)?;
                Ok(data)
            }
            CipherMode::Gcm => gcm::encrypt_with(&self.key, &o.iv, &o.aad, plaintext),
        }
    }

    /// Decrypt `ciphertext` under the configured mode.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let o = &self.options;
        match o.mode {
            CipherMode::Ecb => ecb::decrypt_with(&self.key, ciphertext, o.padding),
            CipherMode::Cbc => cbc::decrypt_with(&self.key, &o.iv, ciphertext, o.padding),
            CipherMode::Ctr => {
                let mut data = ciphertext.to_vec();
                ctr::crypt_with(&self.key, &o.iv, &mut data)?;
                Ok(data)
            }
            CipherMode::Cfb => cfb::decrypt_with(&self.key, &o.iv, ciphertext),
            CipherMode::Ofb => {
                let mut data = ciphertext.to_vec();
                ofb::crypt_with(&self.key, &o.iv, &mut data)?;
                Ok(data)
            }
            CipherMode::Gcm => gcm::decrypt_with(&self.key, &o.iv, &o.aad, ciphertext),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEY: [u8; 16] = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54, 0x32,
        0x10,
    ];
    const IV: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

    fn options_for(mode: CipherMode) -> CipherOptions {
        let iv: &[u8] = if mode == CipherMode::Gcm { &IV[..12] } else { &IV };
        CipherOptions::new(mode).with_iv(iv).with_aad(b"header")
    }

    #[test]
    fn test_session_matches_functional() {
        let pt = b"The quick brown fox jumps over the lazy dog";

        let session = Sm4Cipher::new(&KEY, CipherOptions::default()).unwrap();
        assert_eq!(
            session.encrypt(pt).unwrap(),
            ecb::ecb_encrypt(&KEY, pt, Padding::Pkcs7).unwrap()
        );

        let session = Sm4Cipher::new(&KEY, options_for(CipherMode::Cfb)).unwrap();
        assert_eq!(
            session.encrypt(pt).unwrap(),
            cfb::cfb_encrypt(&KEY, &IV, pt).unwrap()
        );

        let session = Sm4Cipher::new(&KEY, options_for(CipherMode::Gcm)).unwrap();
        assert_eq!(
            session.encrypt(pt).unwrap(),
            gcm::gcm_encrypt(&KEY, &IV[..12], b"header", pt).unwrap()
        );
    }

    #[test]
    fn test_stream_modes_ignore_padding() {
        let opts = options_for(CipherMode::Ctr).with_padding(Padding::NoPadding);
        let c = Sm4Cipher::new(&KEY, opts).unwrap();
        let ct = c.encrypt(b"odd length!").unwrap();
        assert_eq!(ct.len(), 11);
        assert_eq!(c.decrypt(&ct).unwrap(), b"odd length!");
    }

    #[test]
    fn test_iv_validation() {
        let bad = CipherOptions::new(CipherMode::Cbc).with_iv(&[0u8; 12]);
        assert!(matches!(
            Sm4Cipher::new(&KEY, bad),
            Err(CryptoError::InvalidIvLength { expected: 16, got: 12 })
        ));
        assert!(Sm4Cipher::new(&KEY, CipherOptions::new(CipherMode::Gcm)).is_err());
        assert!(Sm4Cipher::new(&KEY, CipherOptions::new(CipherMode::Ecb)).is_ok());
        // ECB takes no IV, so a stray one is not checked.
        let ecb = CipherOptions::new(CipherMode::Ecb).with_iv(&[0u8; 3]);
        assert!(Sm4Cipher::new(&KEY, ecb).is_ok());
        for mode in [CipherMode::Ctr, CipherMode::Cfb, CipherMode::Ofb] {
            let short = CipherOptions::new(mode).with_iv(&[0u8; 8]);
            assert!(matches!(
                Sm4Cipher::new(&KEY, short),
                Err(CryptoError::InvalidIvLength { expected: 16, got: 8 })
            ));
        }
        assert!(Sm4Cipher::new(&KEY[..8], CipherOptions::default()).is_err());
    }

    #[test]
    fn test_no_padding_requires_alignment() {
        let opts = options_for(CipherMode::Cbc).with_padding(Padding::NoPadding);
        let c = Sm4Cipher::new(&KEY, opts).unwrap();
        assert!(c.encrypt(&[0u8; 20]).is_err());
        assert!(c.encrypt(&[0u8; 32]).is_ok());
    }

    proptest! {
        #[test]
        fn prop_roundtrip_all_modes(
            pt in proptest::collection::vec(any::<u8>(), 0..80),
            mode_idx in 0usize..6,
        ) {
            let modes = [
                CipherMode::Ecb,
                CipherMode::Cbc,
                CipherMode::Ctr,
                CipherMode::Cfb,
                CipherMode::Ofb,
                CipherMode::Gcm,
            ];
            let c = Sm4Cipher::new(&KEY, options_for(modes[mode_idx])).unwrap();
            let ct = c.encrypt(&pt).unwrap();
            prop_assert_eq!(c.decrypt(&ct).unwrap(), pt);
        }
    }
}
