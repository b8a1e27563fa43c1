use crate::codec::{decode_name, encode_name, AeadCodec, NameOutcome, MAX_NAME_LEN};
use crate::content;
use crate::entry::{Entry, EntryKind};
use crate::error::{EfileError, Result};
use crate::progress::Progress;
use crate::report::ErrorReport;
use crate::transform::{Direction, TransformOptions};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{debug, warn};

/// What the name step decided for one entry
#[derive(Debug, PartialEq, Eq)]
enum NamePlan {
    /// Name transforms are off; leave the name alone
    Keep,
    /// Already in the target state; leave the whole entry alone
    Skip,
    Rename(String),
}

/// Walks one or more subtrees, transforming every entry it meets.
///
/// Per entry: stat, then for a file the content step followed by the rename,
/// for a directory the rename followed by descent into the *renamed* path.
/// Children of a directory are dispatched to the current rayon pool; their
/// failures land in the shared [`ErrorReport`] and never stop siblings.
pub struct TreeWalker<'a> {
    codec: &'a AeadCodec,
    direction: Direction,
    options: &'a TransformOptions,
    progress: Progress,
    report: &'a ErrorReport,
    transformed: AtomicUsize,
    skipped: AtomicUsize,
    halted: AtomicBool,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        codec: &'a AeadCodec,
        direction: Direction,
        options: &'a TransformOptions,
        report: &'a ErrorReport,
    ) -> Self {
        Self {
            codec,
            direction,
            options,
            progress: Progress::new(options.quiet),
            report,
            transformed: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            halted: AtomicBool::new(false),
        }
    }

    pub fn transformed(&self) -> usize {
        self.transformed.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Transform `path` and, for a directory, everything below it
    pub fn walk(&self, path: &Path) {
        if self.halted.load(Ordering::Relaxed) {
            return;
        }
        let entry = match Entry::stat(path) {
            Ok(entry) => entry,
            Err(err) => return self.fail(path, err),
        };
        debug!(path = %entry.path.display(), kind = ?entry.kind, "visiting");

        match entry.kind {
            EntryKind::Leaf => {
                if let Err(err) = self.transform_leaf(&entry) {
                    self.fail(&entry.path, err);
                }
            }
            EntryKind::Container => self.transform_container(&entry),
        }
    }

    fn transform_leaf(&self, entry: &Entry) -> Result<()> {
        // The new name is computed from the current one before anything on
        // disk changes, so a wrong key on decrypt touches nothing.
        let new_name = match self.plan_name(entry)? {
            NamePlan::Skip => {
                self.skip(entry);
                return Ok(());
            }
            NamePlan::Keep => None,
            NamePlan::Rename(name) => {
                ensure_vacant(&entry.path, &entry.sibling(&name))?;
                Some(name)
            }
        };

        let replaced = if self.options.content {
            Some(match self.direction {
                Direction::Encrypt => content::encrypt_file(&entry.path, self.codec)?,
                Direction::Decrypt => content::decrypt_file(&entry.path, self.codec)?,
            })
        } else {
            None
        };

        match new_name {
            Some(name) => {
                self.rename_or_restore(entry, &name, replaced.as_deref())?;
            }
            None => self.progress.rewritten(self.direction, &entry.path),
        }
        self.transformed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn transform_container(&self, entry: &Entry) {
        let target = match self.plan_name(entry) {
            Err(err) => return self.fail(&entry.path, err),
            Ok(NamePlan::Skip) => return self.skip(entry),
            Ok(NamePlan::Keep) => entry.path.clone(),
            Ok(NamePlan::Rename(name)) => match self.rename(entry, &name) {
                Ok(renamed) => {
                    self.transformed.fetch_add(1, Ordering::Relaxed);
                    renamed
                }
                Err(err) => return self.fail(&entry.path, err),
            },
        };

        // Listing is collected up front: children get renamed while we go
        let children = match list_children(&target) {
            Ok(children) => children,
            Err(err) => return self.fail(&target, err),
        };
        debug!(path = %target.display(), children = children.len(), "descending");
        children.par_iter().for_each(|child| self.walk(child));
    }

    fn plan_name(&self, entry: &Entry) -> Result<NamePlan> {
        if !self.options.names {
            return Ok(NamePlan::Keep);
        }
        let outcome = match self.direction {
            Direction::Encrypt => encode_name(self.codec, &entry.name, entry.kind)?,
            Direction::Decrypt => decode_name(self.codec, &entry.name)?,
        };
        match outcome {
            NameOutcome::Skipped => Ok(NamePlan::Skip),
            NameOutcome::Transformed(name) if name.len() > MAX_NAME_LEN => Err(EfileError::Rename {
                from: entry.path.clone(),
                to: entry.sibling(&name),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "file name too long ({} bytes, limit {})",
                        name.len(),
                        MAX_NAME_LEN
                    ),
                ),
            }),
            NameOutcome::Transformed(name) => Ok(NamePlan::Rename(name)),
        }
    }

    /// Rename a leaf whose content was already rewritten. If the rename
    /// fails, `replaced` is written back so the entry stays consistent.
    fn rename_or_restore(&self, entry: &Entry, new_name: &str, replaced: Option<&[u8]>) -> Result<PathBuf> {
        let err = match self.rename(entry, new_name) {
            Ok(to) => return Ok(to),
            Err(err) => err,
        };
        if let Some(bytes) = replaced {
            match content::write_atomic(&entry.path, bytes) {
                Ok(()) => debug!(path = %entry.path.display(), "content restored after failed rename"),
                Err(restore) => {
                    warn!(path = %entry.path.display(), error = %restore, "could not restore content")
                }
            }
        }
        Err(err)
    }

    fn rename(&self, entry: &Entry, new_name: &str) -> Result<PathBuf> {
        let to = entry.sibling(new_name);
        ensure_vacant(&entry.path, &to)?;
        fs::rename(&entry.path, &to).map_err(|source| EfileError::Rename {
            from: entry.path.clone(),
            to: to.clone(),
            source,
        })?;
        self.progress.renamed(self.direction, &entry.name, new_name);
        Ok(to)
    }

    fn skip(&self, entry: &Entry) {
        debug!(path = %entry.path.display(), "already in target state");
        self.skipped.fetch_add(1, Ordering::Relaxed);
        self.progress.skipped(self.direction, &entry.name);
    }

    fn fail(&self, path: &Path, err: EfileError) {
        warn!(path = %path.display(), error = %err, "entry failed");
        if self.options.fail_fast {
            self.halted.store(true, Ordering::Relaxed);
        }
        self.report.push(path, err);
    }
}

// Renames never replace an existing sibling
fn ensure_vacant(from: &Path, to: &Path) -> Result<()> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(EfileError::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
        });
    }
    Ok(())
}

fn list_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = fs::read_dir(dir).map_err(|e| EfileError::io(dir, e))?;
    read_dir
        .map(|entry| {
            entry
                .map(|e| e.path())
                .map_err(|e| EfileError::io(dir, e))
        })
        .collect()
}
