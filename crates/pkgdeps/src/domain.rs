//! Domain types for the dependency graph and the rebuild queue.
//!
//! - **Graph**: [`Package`] rows and directed, versioned edges. An edge
//!   `left -> right` means `left` needs `right` at runtime; it is reported as a
//!   [`Dependency`] from either end.
//! - **Queue**: [`TodoEntry`] rows moving one way from `Pending` to `Done`,
//!   summarised by [`TodoSummary`].

use std::fmt;

/// Database id of a package.
///
/// Ids are positional within one catalog load and are reassigned by every
/// full rebuild, so they must never be kept across rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub i64);

impl PackageId {
    /// Extract the raw i64 value.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for PackageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A package known to the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Positional id from the last rebuild
    pub id: PackageId,
    /// Unique package name
    pub name: String,
    /// Current release number
    pub release: u32,
}

/// One end of an edge, as seen from the other end.
///
/// For forward queries `name` is the dependency; for reverse queries it is
/// the dependent. `release` is the release of the depending package at which
/// the edge was introduced. Ordering is by name first, so sorted lists read
/// alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dependency {
    /// Name of the package at the other end of the edge
    pub name: String,
    /// Release since which the edge exists
    pub release: u32,
}

impl Dependency {
    /// Create a dependency record.
    pub fn new(name: impl Into<String>, release: u32) -> Self {
        Self {
            name: name.into(),
            release,
        }
    }
}

/// Lifecycle of a rebuild entry. The only transition is `Pending -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoStatus {
    /// Queued for a rebuild
    Pending,
    /// Rebuild completed
    Done,
}

impl TodoStatus {
    /// Convert the stored `done` flag.
    #[must_use]
    pub fn from_done(done: bool) -> Self {
        if done { Self::Done } else { Self::Pending }
    }

    /// The stored `done` flag.
    #[must_use]
    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// A package tracked by the rebuild queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoEntry {
    /// Package name
    pub name: String,
    /// Package id at the time the entry was created
    pub package_id: PackageId,
    /// Current state
    pub status: TodoStatus,
}

/// Snapshot of the rebuild queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoSummary {
    /// Pending packages with no pending forward dependency, sorted by name
    pub unblocked: Vec<String>,
    /// Number of pending entries
    pub pending: usize,
    /// Number of done entries
    pub done: usize,
}

/// Counts describing one full rebuild of the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildStats {
    /// Packages written to the graph
    pub packages: usize,
    /// Edges written to the graph
    pub edges: usize,
    /// Packages skipped by the name filter or as duplicates
    pub skipped_packages: usize,
    /// Edges dropped because an endpoint could not be resolved
    pub dropped_edges: usize,
}

/// Row counts of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of packages
    pub packages: usize,
    /// Number of edges
    pub edges: usize,
    /// Number of rebuild entries, pending and done
    pub todo: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_sort_by_name_then_release() {
        let mut deps = vec![
            Dependency::new("zlib", 1),
            Dependency::new("curl", 9),
            Dependency::new("curl", 3),
        ];
        deps.sort();
        assert_eq!(
            deps,
            vec![
                Dependency::new("curl", 3),
                Dependency::new("curl", 9),
                Dependency::new("zlib", 1),
            ]
        );
    }

    #[test]
    fn todo_status_round_trips_done_flag() {
        assert_eq!(TodoStatus::from_done(false), TodoStatus::Pending);
        assert!(TodoStatus::from_done(true).is_done());
        assert_eq!(TodoStatus::Done.to_string(), "done");
    }
}
