// src/core/ignore.rs

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Matches bare directory names against the configured ignore globs.
///
/// Supports `*`, `?`, `[...]` and `{a,b}`. Matching is against the name only,
/// so a pattern containing `/` can never match.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    set: GlobSet,
}

impl IgnoreMatcher {
    /// Compiles the patterns. Invalid patterns are logged and skipped.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            if pattern.contains('/') {
                log::debug!(
                    "Ignore pattern '{}' contains a path separator and will never match a folder name",
                    pattern
                );
            }
            match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => log::warn!("Skipping invalid ignore pattern '{}': {}", pattern, e),
            }
        }
        let set = builder.build().unwrap_or_else(|e| {
            log::warn!("Could not compile ignore patterns: {}", e);
            GlobSet::empty()
        });
        Self { set }
    }

    /// `true` when `name` matches any pattern.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    /// `true` when no pattern was compiled.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}
