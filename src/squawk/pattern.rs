//! Glob-style path matching for ignore and group patterns.
//!
//! Patterns are compiled with `globset` using a literal separator: `*` and `?`
//! never cross a `/`, while `**` spans whole segments (`src/**`, `**/*.rs`,
//! `a/**/b`). Character classes (`[ab]`) and alternations (`{a,b}`) are
//! supported. Matching is case-sensitive and anchored at both ends.

use globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use tracing::warn;

use crate::error::PatternError;

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Glob {
    glob: globset::Glob,
    matcher: GlobMatcher,
}

impl Glob {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::Empty);
        }

        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| PatternError::Invalid {
                pattern: pattern.to_string(),
                source,
            })?;
        let matcher = glob.compile_matcher();

        Ok(Self { glob, matcher })
    }

    pub fn pattern(&self) -> &str {
        self.glob.glob()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }
}

/// An ordered list of compiled globs, also compiled into one [`GlobSet`].
#[derive(Debug, Clone)]
pub struct PatternSet {
    globs: Vec<Glob>,
    set: GlobSet,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            globs: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl PatternSet {
    /// Compile every pattern, failing on the first invalid one.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let globs = patterns
            .iter()
            .map(|p| Glob::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = GlobSetBuilder::new();
        for glob in &globs {
            builder.add(glob.glob.clone());
        }
        let set = builder.build().map_err(|source| PatternError::Invalid {
            pattern: globs
                .iter()
                .map(Glob::pattern)
                .collect::<Vec<_>>()
                .join(", "),
            source,
        })?;

        Ok(Self { globs, set })
    }

    pub fn is_empty(&self) -> bool {
        self.globs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.globs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Glob> {
        self.globs.iter()
    }

    /// True when any glob matches; always false for an empty set.
    pub fn matches_any(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    /// Keep only the paths that match none of the globs, in order.
    pub fn filter_out<S: AsRef<str>>(&self, paths: &[S]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| !self.matches_any(p))
            .map(str::to_string)
            .collect()
    }
}

/// Whether `path` matches `pattern`. Invalid patterns match nothing.
pub fn matches(path: &str, pattern: &str) -> bool {
    match Glob::new(pattern) {
        Ok(glob) => glob.is_match(path),
        Err(e) => {
            warn!("{e}");
            false
        }
    }
}

/// Whether `path` matches at least one of `patterns`.
pub fn matches_any<S: AsRef<str>>(path: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|p| matches(path, p.as_ref()))
}

/// The paths matching none of `patterns`, in their original order.
pub fn filter_out<P: AsRef<str>, S: AsRef<str>>(paths: &[P], patterns: &[S]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !matches_any(p, patterns))
        .map(str::to_string)
        .collect()
}
