use std::fmt;
use zeroize::Zeroizing;

/// Keys shorter than this are zero-padded up to it
pub const MIN_KEY_LEN: usize = 16;
/// Keys longer than this are truncated down to it
pub const MAX_KEY_LEN: usize = 32;

/// Coerce raw key bytes into the size range the cipher works with.
///
/// - shorter than 16 bytes: zero-padded on the right to 16
/// - longer than 32 bytes: truncated to the first 32
/// - anything in between is returned unchanged
///
/// This is a length fix-up, not a KDF. Keys that only differ in trailing
/// zero bytes (below 16) or in bytes past 32 normalize to the same key, and
/// existing encrypted trees depend on exactly that behaviour.
pub fn normalize_key(raw: &[u8]) -> Vec<u8> {
    if raw.len() < MIN_KEY_LEN {
        let mut padded = vec![0u8; MIN_KEY_LEN];
        padded[..raw.len()].copy_from_slice(raw);
        padded
    } else if raw.len() > MAX_KEY_LEN {
        raw[..MAX_KEY_LEN].to_vec()
    } else {
        raw.to_vec()
    }
}

/// Normalized key material, wiped from memory on drop
#[derive(Clone)]
pub struct Key {
    bytes: Zeroizing<Vec<u8>>,
}

impl Key {
    pub fn new(raw: &[u8]) -> Self {
        Self {
            bytes: Zeroizing::new(normalize_key(raw)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<&str> for Key {
    fn from(raw: &str) -> Self {
        Self::new(raw.as_bytes())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
