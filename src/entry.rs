use crate::error::{EfileError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Regular file or directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Leaf,
    Container,
}

/// A stat'ed filesystem object, owned by one walk
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    pub parent: PathBuf,
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    /// Stat `path` without following symlinks.
    ///
    /// Anything but a regular file or a directory is `UnsupportedEntry`;
    /// a path without a UTF-8 final component is `InvalidName`.
    pub fn stat(path: &Path) -> Result<Self> {
        let path = trim_separators(path);
        let meta = fs::symlink_metadata(&path).map_err(|e| EfileError::stat(&path, e))?;

        let kind = if meta.is_dir() {
            EntryKind::Container
        } else if meta.file_type().is_file() {
            EntryKind::Leaf
        } else {
            return Err(EfileError::UnsupportedEntry { path });
        };

        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => return Err(EfileError::InvalidName(path)),
        };
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            path,
            parent,
            name,
            kind,
        })
    }

    /// Sibling path with a different base name
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.parent.join(name)
    }
}

/// Drop trailing separators and `.` components so the final component is
/// the entry's own name (`docs/` → `docs`).
pub fn trim_separators(path: &Path) -> PathBuf {
    let trimmed: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if trimmed.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_trim_separators() {
        assert_eq!(trim_separators(Path::new("docs/")), PathBuf::from("docs"));
        assert_eq!(trim_separators(Path::new("./a/b//")), PathBuf::from("a/b"));
        assert_eq!(trim_separators(Path::new(".")), PathBuf::from("."));
    }

    #[test]
    fn test_stat_file_and_dir() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"x").unwrap();

        let leaf = Entry::stat(&file).unwrap();
        assert_eq!(leaf.kind, EntryKind::Leaf);
        assert_eq!(leaf.name, "a.txt");
        assert_eq!(leaf.parent, dir.path());
        assert_eq!(leaf.sibling("b.txt"), dir.path().join("b.txt"));

        let with_slash = format!("{}/", dir.path().display());
        let container = Entry::stat(Path::new(&with_slash)).unwrap();
        assert_eq!(container.kind, EntryKind::Container);
        assert_eq!(container.path, dir.path());
    }

    #[test]
    fn test_stat_missing() {
        let dir = tempdir().unwrap();
        let err = Entry::stat(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, EfileError::Stat { .. }));
    }

    #[test]
    fn test_stat_without_name() {
        let err = Entry::stat(Path::new(".")).unwrap_err();
        assert!(matches!(err, EfileError::InvalidName(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_unsupported() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target.txt");
        let link = dir.path().join("link");
        std::fs::write(&target, b"x").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = Entry::stat(&link).unwrap_err();
        assert!(matches!(err, EfileError::UnsupportedEntry { .. }));
    }
}
