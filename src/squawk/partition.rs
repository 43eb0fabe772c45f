//! Partitioning of changes into ignored, grouped and individual buckets.

use std::collections::HashSet;

use crate::git::Change;

use super::pattern::PatternSet;

/// How a change matching several group patterns is assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupMode {
    /// Every group is computed against the full filtered set, so a change may
    /// land in more than one group.
    #[default]
    Overlapping,
    /// A change belongs to the first group pattern (in caller order) that
    /// matches it.
    Exclusive,
}

/// Changes sharing a requested glob pattern, committed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub pattern: String,
    pub files: Vec<Change>,
}

impl Group {
    /// Every path to stage for this group, rename sources included.
    pub fn paths(&self) -> Vec<String> {
        self.files.iter().flat_map(Change::staging_paths).collect()
    }
}

/// Result of applying group patterns to a filtered change list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub groups: Vec<Group>,
    pub ungrouped: Vec<Change>,
}

impl Partition {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.ungrouped.is_empty()
    }

    /// Number of commit units: one per group plus one per ungrouped change.
    pub fn item_count(&self) -> usize {
        self.groups.len() + self.ungrouped.len()
    }
}

/// Drop every change whose path matches an ignore pattern.
///
/// An empty pattern set returns the input untouched.
pub fn apply_ignore(changes: Vec<Change>, ignore: &PatternSet) -> Vec<Change> {
    if ignore.is_empty() {
        return changes;
    }

    changes
        .into_iter()
        .filter(|c| !ignore.matches_any(&c.path))
        .collect()
}

/// Bucket changes by group pattern; whatever no pattern claims stays ungrouped.
///
/// Groups keep the caller's pattern order and the change order within each
/// group. Groups that end up empty are dropped.
pub fn apply_groups(changes: Vec<Change>, groups: &PatternSet, mode: GroupMode) -> Partition {
    if groups.is_empty() {
        return Partition {
            groups: Vec::new(),
            ungrouped: changes,
        };
    }

    let mut claimed: HashSet<&str> = HashSet::new();
    let mut built = Vec::with_capacity(groups.len());

    for glob in groups.iter() {
        let members: Vec<&Change> = changes
            .iter()
            .filter(|c| mode == GroupMode::Overlapping || !claimed.contains(c.path.as_str()))
            .filter(|c| glob.is_match(&c.path))
            .collect();

        if members.is_empty() {
            continue;
        }

        claimed.extend(members.iter().map(|c| c.path.as_str()));
        built.push(Group {
            pattern: glob.pattern().to_string(),
            files: members.into_iter().cloned().collect(),
        });
    }

    let ungrouped = changes
        .iter()
        .filter(|c| !claimed.contains(c.path.as_str()))
        .cloned()
        .collect();

    Partition {
        groups: built,
        ungrouped,
    }
}
