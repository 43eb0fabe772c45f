//! Translation of `git status --porcelain` and `git diff --numstat` output
//! into typed [`Change`] records.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

/// The kind of pending modification, derived from the two-character status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
    Updated,
    Untracked,
    Unknown,
}

impl ChangeKind {
    /// Map a raw status code (`"M "`, `" D"`, `"??"`, `"UU"`, ...) to a kind.
    ///
    /// The index column wins over the worktree column when both are set.
    /// Unmerged combinations (`U` on either side, `AA`, `DD`) are `Updated`.
    pub fn from_status_code(code: &str) -> Self {
        if code == "??" {
            return ChangeKind::Untracked;
        }
        if code.contains('U') || code == "AA" || code == "DD" {
            return ChangeKind::Updated;
        }

        match code.chars().find(|c| *c != ' ') {
            Some('M') | Some('T') => ChangeKind::Modified,
            Some('A') => ChangeKind::Added,
            Some('D') => ChangeKind::Deleted,
            Some('R') => ChangeKind::Renamed,
            Some('C') => ChangeKind::Copied,
            _ => ChangeKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Modified => "modified",
            ChangeKind::Added => "added",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Copied => "copied",
            ChangeKind::Updated => "updated",
            ChangeKind::Untracked => "untracked",
            ChangeKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pending modification to a path, as reported by a single status snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: String,
    /// Source path of a rename or copy.
    pub orig_path: Option<String>,
    pub status_code: String,
    pub kind: ChangeKind,
    pub additions: u32,
    pub deletions: u32,
}

impl Change {
    pub fn new(path: impl Into<String>, status_code: impl Into<String>) -> Self {
        let status_code = status_code.into();
        Self {
            path: path.into(),
            orig_path: None,
            kind: ChangeKind::from_status_code(&status_code),
            status_code,
            additions: 0,
            deletions: 0,
        }
    }

    pub fn with_line_counts(mut self, additions: u32, deletions: u32) -> Self {
        self.additions = additions;
        self.deletions = deletions;
        self
    }

    pub fn with_orig_path(mut self, orig_path: impl Into<String>) -> Self {
        self.orig_path = Some(orig_path.into());
        self
    }

    /// Paths to hand to `git add` so the whole change lands in one commit.
    ///
    /// A rename needs its source path too, or the deletion half stays behind
    /// once the index is reset.
    pub fn staging_paths(&self) -> Vec<String> {
        let mut paths = vec![self.path.clone()];
        if let Some(orig) = &self.orig_path {
            if *orig != self.path {
                paths.push(orig.clone());
            }
        }
        paths
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, +{} -{})",
            self.path, self.kind, self.additions, self.deletions
        )
    }
}

/// Build the ordered change list from raw status and numstat output.
///
/// Produces one [`Change`] per well-formed status line, in input order.
/// Malformed lines and repeated paths are skipped. Paths without a numstat
/// entry (untracked files, binary files, repositories without history) get
/// zero line counts.
pub fn translate(raw_status: &str, raw_numstat: &str) -> Vec<Change> {
    let counts = parse_numstat(raw_numstat);
    let mut seen = HashSet::new();
    let mut changes = Vec::new();

    for line in raw_status.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let Some((code, path, orig_path)) = parse_status_line(line) else {
            debug!("Skipping malformed status line: {:?}", line);
            continue;
        };

        if !seen.insert(path.clone()) {
            debug!("Skipping duplicate status entry for {}", path);
            continue;
        }

        let (additions, deletions) = counts.get(path.as_str()).copied().unwrap_or((0, 0));
        let mut change = Change::new(path, code).with_line_counts(additions, deletions);
        change.orig_path = orig_path;
        changes.push(change);
    }

    changes
}

/// Split a status line into its two-character code, path and, for renames
/// and copies, the source path.
///
/// Porcelain lines carry the path at offset 3 (`"XY path"`). When the
/// leading blank of a worktree-only code was trimmed away (`"M a.js"`), the
/// path starts at offset 2 instead; `??` always keeps offset 3.
fn parse_status_line(line: &str) -> Option<(String, String, Option<String>)> {
    let code = line.get(..2)?;
    if !code.is_ascii() || code.trim().is_empty() {
        return None;
    }

    let rest = if code == "??" || line.as_bytes().get(2) == Some(&b' ') {
        line.get(3..)?
    } else if code.as_bytes()[1] == b' ' {
        line.get(2..)?
    } else {
        return None;
    };

    let kind = ChangeKind::from_status_code(code);
    let (raw_orig, raw_path) = match kind {
        ChangeKind::Renamed | ChangeKind::Copied => match rest.rsplit_once(" -> ") {
            Some((old, new)) => (Some(old), new),
            None => (None, rest),
        },
        _ => (None, rest),
    };

    let path = unquote(raw_path);
    if path.is_empty() {
        return None;
    }
    let orig_path = raw_orig.map(unquote).filter(|p| !p.is_empty());

    Some((code.to_string(), path, orig_path))
}

/// Undo git's C-style quoting of paths containing special characters.
fn unquote(path: &str) -> String {
    let Some(inner) = path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    else {
        return path.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => bytes.push(b'\n'),
            Some('t') => bytes.push(b'\t'),
            Some('"') => bytes.push(b'"'),
            Some('\\') => bytes.push(b'\\'),
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(next) => {
                            value = value * 8 + next;
                            chars.next();
                        }
                        None => break,
                    }
                }
                bytes.push((value & 0xff) as u8);
            }
            Some(other) => {
                bytes.push(b'\\');
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push(b'\\'),
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

/// Parse `git diff --numstat` output into a path-keyed lookup.
///
/// Binary files report `-` for both counts, which maps to 0.
fn parse_numstat(raw_numstat: &str) -> HashMap<&str, (u32, u32)> {
    let mut counts = HashMap::new();

    for line in raw_numstat.lines() {
        let line = line.trim_end_matches('\r');
        let mut fields = line.splitn(3, '\t');
        let (Some(adds), Some(dels), Some(path)) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };

        let (Some(adds), Some(dels)) = (parse_count(adds), parse_count(dels)) else {
            debug!("Skipping malformed numstat line: {:?}", line);
            continue;
        };

        if !path.is_empty() {
            counts.entry(path).or_insert((adds, dels));
        }
    }

    counts
}

fn parse_count(field: &str) -> Option<u32> {
    match field.trim() {
        "-" => Some(0),
        value => value.parse().ok(),
    }
}
