use crate::error::{EfileError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// A failure pinned to the path it happened on
#[derive(Debug)]
pub struct EntryError {
    pub path: PathBuf,
    pub error: EfileError,
}

/// Append-only, unordered collection of per-path failures shared by all
/// workers of one run. Recording a failure never stops anyone else.
#[derive(Debug, Default)]
pub struct ErrorReport {
    errors: Mutex<Vec<EntryError>>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, path: impl Into<PathBuf>, error: EfileError) {
        let entry = EntryError {
            path: path.into(),
            error,
        };
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    pub fn len(&self) -> usize {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_entries(self) -> Vec<EntryError> {
        self.errors
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Outcome of a whole run, available after every worker has finished
#[derive(Debug, Default)]
pub struct TransformReport {
    /// Entries whose name and/or content was rewritten
    pub transformed: usize,
    /// Entries left alone because they were already in the target state
    pub skipped: usize,
    pub errors: Vec<EntryError>,
}

impl TransformReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    pub fn first_error(&self) -> Option<&EntryError> {
        self.errors.first()
    }

    pub fn to_json(&self) -> Result<String> {
        let view = ReportView {
            transformed: self.transformed,
            skipped: self.skipped,
            failed: self.failed(),
            errors: self
                .errors
                .iter()
                .map(|e| ErrorView {
                    path: &e.path,
                    kind: e.error.kind(),
                    message: e.error.to_string(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&view)?)
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    transformed: usize,
    skipped: usize,
    failed: usize,
    errors: Vec<ErrorView<'a>>,
}

#[derive(Serialize)]
struct ErrorView<'a> {
    path: &'a Path,
    kind: &'static str,
    message: String,
}
