use crate::codec::AeadCodec;
use crate::error::{EfileError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Temp files live next to their target so the final rename stays on one filesystem
pub const TEMP_PREFIX: &str = ".efile-";
pub const TEMP_SUFFIX: &str = ".tmp";

/// Replace the file at `path` with `nonce || seal(contents)`.
/// Returns the bytes that were replaced.
pub fn encrypt_file(path: &Path, codec: &AeadCodec) -> Result<Vec<u8>> {
    let plaintext = fs::read(path).map_err(|e| EfileError::io(path, e))?;
    let sealed = codec.seal(&plaintext)?;
    write_atomic(path, &sealed)?;
    debug!(path = %path.display(), bytes = plaintext.len(), "content sealed");
    Ok(plaintext)
}

/// Replace the file at `path` with the opened contents and return the
/// sealed bytes it held. On a wrong key or corrupted data the file is left
/// untouched.
pub fn decrypt_file(path: &Path, codec: &AeadCodec) -> Result<Vec<u8>> {
    let blob = fs::read(path).map_err(|e| EfileError::io(path, e))?;
    let plaintext = codec.open(&blob)?;
    write_atomic(path, &plaintext)?;
    debug!(path = %path.display(), bytes = plaintext.len(), "content opened");
    Ok(blob)
}

/// Write `data` to a sibling temp file, then rename it over `target`.
///
/// The target is only ever replaced by a fully written, synced file. Any
/// failure before or during the rename drops the temp file (removing it)
/// and leaves the target as it was. Permission bits of an existing target
/// carry over.
pub fn write_atomic(target: &Path, data: &[u8]) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(target).ok().map(|m| m.permissions());

    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| EfileError::io(dir, e))?;
    tmp.write_all(data)
        .map_err(|e| EfileError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| EfileError::io(tmp.path(), e))?;
    if let Some(permissions) = permissions {
        fs::set_permissions(tmp.path(), permissions).map_err(|e| EfileError::io(tmp.path(), e))?;
    }

    tmp.persist(target).map_err(|e| EfileError::Rename {
        from: e.file.path().to_path_buf(),
        to: target.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
