use crate::transform::Direction;
use std::path::Path;

/// Per-entry progress lines on stdout, silenced by the quiet option.
///
/// Diagnostics go through `tracing`; this is only the user-facing chatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Progress {
    quiet: bool,
}

impl Progress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn renamed(&self, direction: Direction, from: &str, to: &str) {
        if !self.quiet {
            println!("{}: {} -> {}", direction.past_tense(), from, to);
        }
    }

    /// Content rewritten in place, name kept
    pub fn rewritten(&self, direction: Direction, path: &Path) {
        if !self.quiet {
            println!("{}: {}", direction.past_tense(), path.display());
        }
    }

    pub fn skipped(&self, direction: Direction, name: &str) {
        if self.quiet {
            return;
        }
        match direction {
            Direction::Encrypt => println!("Skipping already encrypted name: {}", name),
            Direction::Decrypt => println!("Skipping non-encrypted name: {}", name),
        }
    }
}
