//! efile - reversible encryption of file trees
//!
//! Encrypts both the names and the contents of a file or a whole directory
//! tree under one symmetric key, and reverses it with the same key.
//!
//! ## On-disk format
//!
//! ```text
//! content:  nonce (12) || AES-GCM ciphertext || tag (16)
//! name:     base64url(nonce || ciphertext || tag) + ".enc"   (files)
//!           base64url(nonce || ciphertext || tag) + "-enc"   (directories)
//! ```
//!
//! There is no header or version byte. The name suffix is the only record
//! of whether an entry is encrypted.
//!
//! ## Pipeline per entry
//!
//! - **Key**: zero-padded to 16 bytes or truncated to 32 (not a KDF)
//! - **File**: name computed → content sealed via temp file + rename → renamed
//! - **Directory**: renamed → children walked under the new path, in parallel
//!
//! ## Example
//!
//! ```no_run
//! use efile::cli::{decrypt_paths, encrypt_paths, DecryptOptions, EncryptOptions};
//! use std::path::PathBuf;
//!
//! let opts = EncryptOptions {
//!     secret: "my_secret".into(),
//!     ..Default::default()
//! };
//! let report = encrypt_paths(&[PathBuf::from("docs")], &opts).unwrap();
//! assert!(report.is_success());
//!
//! let opts = DecryptOptions {
//!     secret: "my_secret".into(),
//!     ..Default::default()
//! };
//! // the directory now carries an encrypted name ending in "-enc"
//! # let encrypted = PathBuf::from("docs-enc");
//! decrypt_paths(&[encrypted], &opts).unwrap();
//! ```

pub mod cli;
pub mod codec;
pub mod content;
pub mod entry;
pub mod error;
pub mod key;
pub mod progress;
pub mod report;
pub mod transform;
pub mod walker;

pub use error::{EfileError, Result};
pub use key::{normalize_key, Key};
pub use report::{EntryError, ErrorReport, TransformReport};
pub use transform::{transform_paths, Direction, TransformOptions};
