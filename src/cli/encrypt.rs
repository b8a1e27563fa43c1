use crate::error::Result;
use crate::key::Key;
use crate::report::TransformReport;
use crate::transform::{transform_paths, Direction, TransformOptions};
use std::path::PathBuf;

/// Options for the enc command
#[derive(Debug, Clone, Default)]
pub struct EncryptOptions {
    pub secret: String,
    pub transform: TransformOptions,
}

/// Encrypt names and/or contents of every given path.
/// Entries already carrying the encrypted-name marker are skipped.
pub fn encrypt_paths(paths: &[PathBuf], options: &EncryptOptions) -> Result<TransformReport> {
    let key = Key::new(options.secret.as_bytes());
    transform_paths(paths, &key, Direction::Encrypt, &options.transform)
}
