//! Package catalog: the authoritative input for a full graph rebuild.
//!
//! A [`Catalog`] is an ordered list of packages, each with its current
//! release and runtime dependencies. It is usually read from an eopkg XML
//! index with [`Catalog::load`], but can be built directly.
//!
//! [`Catalog::resolve`] turns the catalog into positional ids and resolved
//! edges. Both graph backends build from this one resolution, so they agree
//! on which packages and edges exist.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::PackageId;
use crate::error::{Error, Result};

/// Default location of the eopkg index.
pub const DEFAULT_INDEX_PATH: &str = "/var/lib/eopkg/index/Unstable/eopkg-index.xml";

/// Name suffixes of packages that never take part in the graph.
///
/// Debug-info and development sub-packages are split from their parent and
/// would only duplicate its edges.
pub const EXCLUDED_SUFFIXES: [&str; 2] = ["-dbginfo", "-devel"];

/// Whether `name` is filtered out of the graph by [`EXCLUDED_SUFFIXES`].
#[must_use]
pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// A runtime dependency as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDependency {
    /// Name of the required package
    pub name: String,
    /// Release of the depending package that introduced the requirement
    pub release_since: u32,
}

/// One package entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPackage {
    /// Package name
    pub name: String,
    /// Current release (the newest entry of the release history)
    pub release: u32,
    /// Runtime dependencies in catalog order
    pub dependencies: Vec<CatalogDependency>,
}

impl CatalogPackage {
    /// Create a package entry from `(dependency, release_since)` pairs.
    pub fn new<N: Into<String>>(
        name: impl Into<String>,
        release: u32,
        dependencies: impl IntoIterator<Item = (N, u32)>,
    ) -> Self {
        Self {
            name: name.into(),
            release,
            dependencies: dependencies
                .into_iter()
                .map(|(name, release_since)| CatalogDependency {
                    name: name.into(),
                    release_since,
                })
                .collect(),
        }
    }
}

/// Ordered package list. Ids are assigned by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Packages in catalog order
    pub packages: Vec<CatalogPackage>,
}

/// A resolved edge between two positional ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEdge {
    /// The depending package
    pub left: PackageId,
    /// The required package
    pub right: PackageId,
    /// Release of `left` that introduced the edge
    pub release_since: u32,
}

/// A catalog reduced to what the graph stores.
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    /// Kept packages with their positional ids, in catalog order
    pub packages: Vec<(PackageId, &'a CatalogPackage)>,
    /// Unique edges between kept packages
    pub edges: Vec<ResolvedEdge>,
    /// Packages dropped by the suffix filter or as duplicate names
    pub skipped_packages: usize,
    /// Edges dropped because an endpoint was skipped or unknown
    pub dropped_edges: usize,
}

// Raw eopkg index layout. Only the fields the graph needs are mapped; all
// other elements and attributes are ignored.

#[derive(Debug, Deserialize)]
struct RawIndex {
    #[serde(rename = "Package", default)]
    packages: Vec<RawPackage>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "History", default)]
    history: RawHistory,
    #[serde(rename = "RuntimeDependencies", default)]
    runtime_dependencies: RawDependencies,
}

#[derive(Debug, Default, Deserialize)]
struct RawHistory {
    #[serde(rename = "Update", default)]
    updates: Vec<RawUpdate>,
}

#[derive(Debug, Deserialize)]
struct RawUpdate {
    #[serde(rename = "@release")]
    release: u32,
}

#[derive(Debug, Default, Deserialize)]
struct RawDependencies {
    #[serde(rename = "Dependency", default)]
    dependencies: Vec<RawDependency>,
}

#[derive(Debug, Deserialize)]
struct RawDependency {
    #[serde(rename = "@releaseFrom", default)]
    release_from: u32,
    #[serde(rename = "$text")]
    name: String,
}

impl TryFrom<RawPackage> for CatalogPackage {
    type Error = Error;

    fn try_from(raw: RawPackage) -> Result<Self> {
        let release = raw
            .history
            .updates
            .first()
            .map(|update| update.release)
            .ok_or_else(|| {
                Error::Catalog(format!("package '{}' has no release history", raw.name))
            })?;

        let dependencies = raw
            .runtime_dependencies
            .dependencies
            .into_iter()
            .map(|dep| CatalogDependency {
                name: dep.name.trim().to_string(),
                release_since: dep.release_from,
            })
            .collect();

        Ok(Self {
            name: raw.name.trim().to_string(),
            release,
            dependencies,
        })
    }
}

impl Catalog {
    /// Create a catalog from packages in id order.
    #[must_use]
    pub fn new(packages: Vec<CatalogPackage>) -> Self {
        Self { packages }
    }

    /// Read an eopkg XML index from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Catalog`] if it is not a valid index.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading package index");
        let content = std::fs::read_to_string(path)?;
        Self::from_xml(&content)
    }

    /// Parse an eopkg XML index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalog`] on malformed XML or a package without
    /// release history.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let raw: RawIndex =
            quick_xml::de::from_str(xml).map_err(|e| Error::Catalog(e.to_string()))?;
        let packages = raw
            .packages
            .into_iter()
            .map(CatalogPackage::try_from)
            .collect::<Result<Vec<_>>>()?;
        debug!(packages = packages.len(), "Parsed package index");
        Ok(Self { packages })
    }

    /// Assign positional ids and resolve edges.
    ///
    /// Each package's id is its position in the catalog. Packages matching
    /// [`EXCLUDED_SUFFIXES`] and repeated names (after the first) get no id,
    /// and any edge touching them or an unknown name is dropped. Repeated
    /// `(left, right)` pairs keep the first `release_since`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalog`] if the catalog is too large for 64-bit ids.
    pub fn resolve(&self) -> Result<Resolved<'_>> {
        let mut ids: HashMap<&str, PackageId> = HashMap::new();
        let mut packages = Vec::new();
        let mut skipped_packages = 0;
        let mut dropped_edges = 0;

        for (position, pkg) in self.packages.iter().enumerate() {
            let duplicate = ids.contains_key(pkg.name.as_str());
            if duplicate {
                warn!(package = %pkg.name, position, "Skipping duplicate package name");
            }
            if duplicate || is_excluded(&pkg.name) {
                skipped_packages += 1;
                dropped_edges += pkg.dependencies.len();
                continue;
            }
            let id = i64::try_from(position)
                .map(PackageId)
                .map_err(|_| Error::Catalog(format!("package position {position} overflows")))?;
            ids.insert(pkg.name.as_str(), id);
            packages.push((id, pkg));
        }

        let mut edges = Vec::new();
        let mut seen: HashSet<(PackageId, PackageId)> = HashSet::new();

        for (left, pkg) in &packages {
            for dep in &pkg.dependencies {
                let Some(&right) = ids.get(dep.name.as_str()) else {
                    debug!(package = %pkg.name, dependency = %dep.name, "Dropping unresolved edge");
                    dropped_edges += 1;
                    continue;
                };
                if seen.insert((*left, right)) {
                    edges.push(ResolvedEdge {
                        left: *left,
                        right,
                        release_since: dep.release_since,
                    });
                }
            }
        }

        Ok(Resolved {
            packages,
            edges,
            skipped_packages,
            dropped_edges,
        })
    }

    /// Render the runtime-dependency graph in Graphviz DOT.
    ///
    /// Every catalog entry and every named dependency becomes a node; edge
    /// labels carry the release since which the dependency exists.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut graph: DiGraph<&str, u32> = DiGraph::new();
        let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

        for pkg in &self.packages {
            let name = pkg.name.as_str();
            nodes.entry(name).or_insert_with(|| graph.add_node(name));
        }
        for pkg in &self.packages {
            let left = nodes[pkg.name.as_str()];
            for dep in &pkg.dependencies {
                let name = dep.name.as_str();
                let right = *nodes.entry(name).or_insert_with(|| graph.add_node(name));
                graph.add_edge(left, right, dep.release_since);
            }
        }

        Dot::new(&graph)
            .to_string()
            .replacen("digraph {\n", "digraph {\n    rankdir=LR;\n    ranksep=2;\n", 1)
    }
}
