use crate::error::{EfileError, Result};
use crate::key::Key;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

/// GCM nonce length, stored in front of every sealed blob
pub const NONCE_SIZE: usize = 12;
/// GCM authentication tag length, appended by the cipher
pub const TAG_SIZE: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

enum Cipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

/// AES-GCM sealing of opaque byte blobs.
///
/// Blob layout: `nonce (12) || ciphertext || tag (16)`. No header, version
/// or associated data; the opener only needs to know the nonce length.
/// The AES variant follows the normalized key length: 16 → AES-128,
/// 24 → AES-192, 32 → AES-256.
pub struct AeadCodec {
    cipher: Cipher,
}

impl AeadCodec {
    pub fn new(key: &Key) -> Result<Self> {
        let bytes = key.as_bytes();
        let len = bytes.len();
        let init_err = |_| EfileError::CipherInit { len };
        let cipher = match len {
            16 => Cipher::Aes128(Aes128Gcm::new_from_slice(bytes).map_err(init_err)?),
            24 => Cipher::Aes192(Aes192Gcm::new_from_slice(bytes).map_err(init_err)?),
            32 => Cipher::Aes256(Aes256Gcm::new_from_slice(bytes).map_err(init_err)?),
            _ => return Err(EfileError::CipherInit { len }),
        };
        Ok(Self { cipher })
    }

    /// Key size in bits of the underlying AES instance
    pub fn key_bits(&self) -> usize {
        match self.cipher {
            Cipher::Aes128(_) => 128,
            Cipher::Aes192(_) => 192,
            Cipher::Aes256(_) => 256,
        }
    }

    /// Seal `plaintext` under a fresh random nonce
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| EfileError::RandomSource(e.to_string()))?;
        let nonce = Nonce::<U12>::from_slice(&nonce_bytes);

        let sealed = match &self.cipher {
            Cipher::Aes128(c) => c.encrypt(nonce, plaintext),
            Cipher::Aes192(c) => c.encrypt(nonce, plaintext),
            Cipher::Aes256(c) => c.encrypt(nonce, plaintext),
        }
        .map_err(|_| {
            EfileError::MalformedInput(format!(
                "{} bytes exceeds the cipher's plaintext limit",
                plaintext.len()
            ))
        })?;

        let mut blob = Vec::with_capacity(NONCE_SIZE + sealed.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&sealed);
        Ok(blob)
    }

    /// Split off the nonce and authenticate-then-decrypt the rest
    pub fn open(&self, blob: &[u8]) -> Result<Vec<u8>> {
        if blob.len() < NONCE_SIZE {
            return Err(EfileError::MalformedInput(format!(
                "sealed data is {} bytes, shorter than the {}-byte nonce",
                blob.len(),
                NONCE_SIZE
            )));
        }
        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_SIZE);
        let nonce = Nonce::<U12>::from_slice(nonce_bytes);

        match &self.cipher {
            Cipher::Aes128(c) => c.decrypt(nonce, ciphertext),
            Cipher::Aes192(c) => c.decrypt(nonce, ciphertext),
            Cipher::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
        .map_err(|_| EfileError::Authentication)
    }
}

impl fmt::Debug for AeadCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AeadCodec")
            .field("cipher", &format!("AES-{}-GCM", self.key_bits()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codec(raw: &str) -> AeadCodec {
        AeadCodec::new(&Key::from(raw)).unwrap()
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let c = codec("secret");
        let blob = c.seal(b"Hello, World!").unwrap();
        assert_eq!(blob.len(), NONCE_SIZE + 13 + TAG_SIZE);
        assert_eq!(c.open(&blob).unwrap(), b"Hello, World!");
    }

    #[test]
    fn test_empty_plaintext() {
        let c = codec("secret");
        let blob = c.seal(b"").unwrap();
        assert_eq!(blob.len(), NONCE_SIZE + TAG_SIZE);
        assert!(c.open(&blob).unwrap().is_empty());
    }

    #[test]
    fn test_fresh_nonce_per_seal() {
        let c = codec("secret");
        let a = c.seal(b"same input").unwrap();
        let b = c.seal(b"same input").unwrap();
        assert_ne!(a[..NONCE_SIZE], b[..NONCE_SIZE]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_variant_follows_key_length() {
        assert_eq!(codec("short").key_bits(), 128);
        assert_eq!(AeadCodec::new(&Key::new(&[1u8; 24])).unwrap().key_bits(), 192);
        assert_eq!(AeadCodec::new(&Key::new(&[1u8; 48])).unwrap().key_bits(), 256);
    }

    #[test]
    fn test_unsupported_key_length() {
        let err = AeadCodec::new(&Key::new(&[1u8; 20])).unwrap_err();
        assert!(matches!(err, EfileError::CipherInit { len: 20 }));
    }

    #[test]
    fn test_short_blob_is_malformed() {
        let c = codec("secret");
        let err = c.open(&[0u8; NONCE_SIZE - 1]).unwrap_err();
        assert!(matches!(err, EfileError::MalformedInput(_)));
    }

    #[test]
    fn test_nonce_only_blob_fails_authentication() {
        let c = codec("secret");
        let err = c.open(&[0u8; NONCE_SIZE]).unwrap_err();
        assert!(matches!(err, EfileError::Authentication));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let blob = codec("right key").seal(b"payload").unwrap();
        let err = codec("wrong key").open(&blob).unwrap_err();
        assert!(matches!(err, EfileError::Authentication));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_roundtrip_any_normalizable_key(
            raw in prop_oneof![
                proptest::collection::vec(any::<u8>(), 0..=16),
                proptest::collection::vec(any::<u8>(), 24..=24),
                proptest::collection::vec(any::<u8>(), 32..80),
            ],
            plaintext in proptest::collection::vec(any::<u8>(), 0..512),
        ) {
            let c = AeadCodec::new(&Key::new(&raw)).unwrap();
            let blob = c.seal(&plaintext).unwrap();
            prop_assert_eq!(c.open(&blob).unwrap(), plaintext);
        }

        #[test]
        fn prop_any_bit_flip_is_detected(
            plaintext in proptest::collection::vec(any::<u8>(), 1..256),
            index in any::<proptest::sample::Index>(),
            bit in 0u8..8,
        ) {
            let c = codec("tamper test");
            let mut blob = c.seal(&plaintext).unwrap();
            let i = index.index(blob.len());
            blob[i] ^= 1 << bit;
            prop_assert!(matches!(c.open(&blob), Err(EfileError::Authentication)));
        }
    }
}
