use crate::error::Result;
use crate::key::Key;
use crate::report::TransformReport;
use crate::transform::{transform_paths, Direction, TransformOptions};
use std::path::PathBuf;

/// Options for the dec command
#[derive(Debug, Clone, Default)]
pub struct DecryptOptions {
    pub secret: String,
    pub transform: TransformOptions,
}

/// Decrypt names and/or contents of every given path.
///
/// A marked name is decoded before anything is written, so with a wrong key
/// the entry is reported and left exactly as it was. Unmarked names are
/// skipped.
pub fn decrypt_paths(paths: &[PathBuf], options: &DecryptOptions) -> Result<TransformReport> {
    let key = Key::new(options.secret.as_bytes());
    transform_paths(paths, &key, Direction::Decrypt, &options.transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::encrypt::{encrypt_paths, EncryptOptions};
    use crate::error::EfileError;
    use std::fs;
    use tempfile::tempdir;

    fn transform() -> TransformOptions {
        TransformOptions {
            quiet: true,
            ..Default::default()
        }
    }

    fn encrypt(path: &std::path::Path, secret: &str) {
        let options = EncryptOptions {
            secret: secret.into(),
            transform: transform(),
        };
        let report = encrypt_paths(&[path.to_path_buf()], &options).unwrap();
        assert!(report.is_success());
    }

    fn only_entry(dir: &std::path::Path) -> PathBuf {
        let mut entries: Vec<_> = fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect();
        assert_eq!(entries.len(), 1);
        entries.remove(0)
    }

    #[test]
    fn test_decrypt_roundtrip() {
        let dir = tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("a.txt"), b"alpha").unwrap();
        encrypt(&docs, "secret");

        let options = DecryptOptions {
            secret: "secret".into(),
            transform: transform(),
        };
        let report = decrypt_paths(&[only_entry(dir.path())], &options).unwrap();
        assert!(report.is_success());
        assert_eq!(report.transformed, 2);
        assert_eq!(fs::read(docs.join("a.txt")).unwrap(), b"alpha");
    }

    #[test]
    fn test_decrypt_wrong_secret() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, b"alpha").unwrap();
        encrypt(&file, "correct_secret");
        let encrypted = only_entry(dir.path());

        let options = DecryptOptions {
            secret: "wrong_secret".into(),
            transform: transform(),
        };
        let report = decrypt_paths(&[encrypted.clone()], &options).unwrap();
        assert_eq!(report.failed(), 1);
        assert!(matches!(report.errors[0].error, EfileError::Authentication));
        assert!(encrypted.exists());
        assert!(!file.exists());
    }

    #[test]
    fn test_decrypt_plain_directory() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("docs");
        fs::create_dir(&plain).unwrap();

        let options = DecryptOptions {
            secret: "secret".into(),
            transform: transform(),
        };
        let report = decrypt_paths(&[plain.clone()], &options).unwrap();
        assert!(report.is_success());
        assert_eq!((report.transformed, report.skipped), (0, 1));
        assert!(plain.is_dir());
    }
}
