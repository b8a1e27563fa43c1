use crate::codec::aead::AeadCodec;
use crate::entry::EntryKind;
use crate::error::{EfileError, Result};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;

/// Marker appended to encrypted file names
pub const LEAF_SUFFIX: &str = ".enc";
/// Marker appended to encrypted directory names
pub const CONTAINER_SUFFIX: &str = "-enc";
/// Longest base name, in bytes, that common filesystems accept
pub const MAX_NAME_LEN: usize = 255;

impl EntryKind {
    pub fn suffix(self) -> &'static str {
        match self {
            EntryKind::Leaf => LEAF_SUFFIX,
            EntryKind::Container => CONTAINER_SUFFIX,
        }
    }
}

/// Whether a base name carries the encrypted-name marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameState {
    Plain,
    /// Carries the marker of the given entry kind
    Transformed(EntryKind),
}

impl NameState {
    /// Classify a base name purely by its suffix.
    ///
    /// Nothing else is stored, so a plain name that happens to end in `.enc`
    /// or `-enc` is indistinguishable from an encrypted one and will be left
    /// alone by encryption (and fed to the decoder by decryption).
    pub fn of(name: &str) -> Self {
        if name.ends_with(LEAF_SUFFIX) {
            Self::Transformed(EntryKind::Leaf)
        } else if name.ends_with(CONTAINER_SUFFIX) {
            Self::Transformed(EntryKind::Container)
        } else {
            Self::Plain
        }
    }

    pub fn is_transformed(self) -> bool {
        matches!(self, Self::Transformed(_))
    }
}

/// Result of running a name through the codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameOutcome {
    /// The new base name
    Transformed(String),
    /// Name was already in the requested state; nothing to do
    Skipped,
}

/// Seal a name and render it as padded base64url (no suffix)
pub fn seal_name(codec: &AeadCodec, name: &str) -> Result<String> {
    let blob = codec.seal(name.as_bytes())?;
    Ok(URL_SAFE.encode(blob))
}

/// Reverse of [`seal_name`]; `text` must not carry the suffix
pub fn open_name(codec: &AeadCodec, text: &str) -> Result<String> {
    let blob = URL_SAFE
        .decode(text.as_bytes())
        .map_err(|e| EfileError::Decode(format!("base64: {}", e)))?;
    let plain = codec.open(&blob)?;
    let name = String::from_utf8(plain)
        .map_err(|e| EfileError::Decode(format!("utf-8: {}", e)))?;
    validate_component(&name)?;
    Ok(name)
}

/// Encrypt a base name, appending the marker for `kind`.
/// Names that already carry a marker are skipped.
pub fn encode_name(codec: &AeadCodec, name: &str, kind: EntryKind) -> Result<NameOutcome> {
    if NameState::of(name).is_transformed() {
        return Ok(NameOutcome::Skipped);
    }
    let sealed = seal_name(codec, name)?;
    Ok(NameOutcome::Transformed(sealed + kind.suffix()))
}

/// Decrypt a marked base name. Names without a marker are skipped.
pub fn decode_name(codec: &AeadCodec, name: &str) -> Result<NameOutcome> {
    let stem = match NameState::of(name) {
        NameState::Plain => return Ok(NameOutcome::Skipped),
        NameState::Transformed(kind) => &name[..name.len() - kind.suffix().len()],
    };
    open_name(codec, stem).map(NameOutcome::Transformed)
}

// A decrypted name becomes a rename target, so it must stay one component
fn validate_component(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(EfileError::Decode(format!("{:?} is not a file name", name)));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(EfileError::Decode(format!(
            "{:?} contains a path separator",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use proptest::prelude::*;

    fn codec() -> AeadCodec {
        AeadCodec::new(&Key::from("secret")).unwrap()
    }

    fn transformed(outcome: NameOutcome) -> String {
        match outcome {
            NameOutcome::Transformed(name) => name,
            NameOutcome::Skipped => panic!("expected a transformed name"),
        }
    }

    #[test]
    fn test_name_state() {
        assert_eq!(NameState::of("a.txt"), NameState::Plain);
        assert_eq!(NameState::of("abc.enc"), NameState::Transformed(EntryKind::Leaf));
        assert_eq!(NameState::of("abc-enc"), NameState::Transformed(EntryKind::Container));
        assert_eq!(NameState::of("encore"), NameState::Plain);
        assert_eq!(NameState::of(".enc"), NameState::Transformed(EntryKind::Leaf));
    }

    #[test]
    fn test_leaf_roundtrip() {
        let c = codec();
        let encoded = transformed(encode_name(&c, "a.txt", EntryKind::Leaf).unwrap());
        assert!(encoded.ends_with(".enc"));
        assert!(!encoded.contains('/'));
        assert_eq!(transformed(decode_name(&c, &encoded).unwrap()), "a.txt");
    }

    #[test]
    fn test_container_roundtrip() {
        let c = codec();
        let encoded = transformed(encode_name(&c, "docs", EntryKind::Container).unwrap());
        assert!(encoded.ends_with("-enc"));
        assert_eq!(transformed(decode_name(&c, &encoded).unwrap()), "docs");
    }

    #[test]
    fn test_encode_skips_marked_names() {
        let c = codec();
        assert_eq!(
            encode_name(&c, "report.enc", EntryKind::Leaf).unwrap(),
            NameOutcome::Skipped
        );
        assert_eq!(
            encode_name(&c, "photos-enc", EntryKind::Container).unwrap(),
            NameOutcome::Skipped
        );
    }

    #[test]
    fn test_decode_skips_plain_names() {
        let c = codec();
        assert_eq!(decode_name(&c, "docs").unwrap(), NameOutcome::Skipped);
        assert_eq!(decode_name(&c, "notes.txt").unwrap(), NameOutcome::Skipped);
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let err = decode_name(&codec(), "not*base64!.enc").unwrap_err();
        assert!(matches!(err, EfileError::Decode(_)));
    }

    #[test]
    fn test_decode_with_wrong_key() {
        let encoded = transformed(encode_name(&codec(), "a.txt", EntryKind::Leaf).unwrap());
        let other = AeadCodec::new(&Key::from("other")).unwrap();
        assert!(matches!(
            decode_name(&other, &encoded),
            Err(EfileError::Authentication)
        ));
    }

    #[test]
    fn test_decoded_separator_is_rejected() {
        let c = codec();
        let sneaky = seal_name(&c, "../escape").unwrap() + LEAF_SUFFIX;
        assert!(matches!(decode_name(&c, &sneaky), Err(EfileError::Decode(_))));
        let dot = seal_name(&c, "..").unwrap() + CONTAINER_SUFFIX;
        assert!(matches!(decode_name(&c, &dot), Err(EfileError::Decode(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_name_roundtrip(name in "[^/\\\\\\x00]{1,60}") {
            prop_assume!(name != "." && name != "..");
            prop_assume!(!NameState::of(&name).is_transformed());
            let c = codec();
            let encoded = transformed(encode_name(&c, &name, EntryKind::Leaf).unwrap());
            prop_assert!(!encoded.contains('/'));
            prop_assert_eq!(transformed(decode_name(&c, &encoded).unwrap()), name);
        }
    }
}
