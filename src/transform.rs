use crate::codec::AeadCodec;
use crate::error::{EfileError, Result};
use crate::key::Key;
use crate::report::{ErrorReport, TransformReport};
use crate::walker::TreeWalker;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::info;

/// Which way a run goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Encrypt => "Encrypted",
            Self::Decrypt => "Decrypted",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            Self::Encrypt => "Encryption",
            Self::Decrypt => "Decryption",
        }
    }
}

/// Knobs shared by every entry of one run
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Encrypt/decrypt file and directory names
    pub names: bool,
    /// Encrypt/decrypt file contents
    pub content: bool,
    /// Suppress per-entry progress lines
    pub quiet: bool,
    /// Worker pool size; `None` lets rayon pick (one per CPU)
    pub jobs: Option<usize>,
    /// Stop dispatching new entries after the first failure
    pub fail_fast: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            names: true,
            content: true,
            quiet: false,
            jobs: None,
            fail_fast: false,
        }
    }
}

impl TransformOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.names && !self.content {
            return Err(EfileError::NothingToDo);
        }
        Ok(())
    }
}

/// Run `direction` over every top-level path and wait for all of them.
///
/// Each path is its own unit of work on a bounded rayon pool, and so is
/// every entry found under a directory. Top-level paths must not be nested
/// in one another; that is not checked.
///
/// Only setup problems (no paths, unusable key, pool startup) return `Err`.
/// Per-entry failures are collected in the returned report.
pub fn transform_paths(
    paths: &[PathBuf],
    key: &Key,
    direction: Direction,
    options: &TransformOptions,
) -> Result<TransformReport> {
    if paths.is_empty() {
        return Err(EfileError::NoInput);
    }
    options.validate()?;
    let codec = AeadCodec::new(key)?;
    let pool = build_pool(options.jobs)?;
    info!(
        paths = paths.len(),
        cipher = ?codec,
        direction = ?direction,
        threads = pool.current_num_threads(),
        "starting run"
    );

    let report = ErrorReport::new();
    let walker = TreeWalker::new(&codec, direction, options, &report);
    pool.install(|| {
        paths.par_iter().for_each(|path| {
            walker.walk(path);
            info!(path = %path.display(), "finished");
        })
    });

    let transformed = walker.transformed();
    let skipped = walker.skipped();
    Ok(TransformReport {
        transformed,
        skipped,
        errors: report.into_entries(),
    })
}

fn build_pool(jobs: Option<usize>) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .thread_name(|i| format!("efile-worker-{}", i))
        .build()
        .map_err(|e| EfileError::WorkerPool(e.to_string()))
}
