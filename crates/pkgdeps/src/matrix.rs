//! In-memory graph backend built on the bit matrix.
//!
//! [`MatrixGraph`] answers the same dependency queries as the `SQLite`
//! store, straight from a [`Catalog`] and without touching disk. Forward
//! queries read matrix rows and reverse queries read columns, both without
//! transposing.

use std::collections::{BTreeSet, HashMap, VecDeque};

use pkgdeps_bitmap::KeyedGraph;

use crate::catalog::Catalog;
use crate::domain::{Dependency, PackageId};
use crate::error::{Error, Result};

/// Dependency graph held in a dual-orientation bit matrix.
#[derive(Debug, Clone)]
pub struct MatrixGraph {
    graph: KeyedGraph<String>,
    /// `release_since` per `(left index, right index)` edge
    releases: HashMap<(usize, usize), u32>,
}

impl MatrixGraph {
    /// Build the matrix from a catalog, keeping the same packages and edges
    /// as a store rebuild would.
    ///
    /// # Errors
    ///
    /// Returns a catalog error if resolution fails.
    pub fn from_catalog(catalog: &Catalog) -> Result<Self> {
        let resolved = catalog.resolve()?;

        let mut graph = KeyedGraph::new();
        let mut index_of: HashMap<PackageId, usize> = HashMap::new();
        for (id, pkg) in &resolved.packages {
            let index = graph.add_key(pkg.name.clone())?;
            index_of.insert(*id, index);
        }
        graph.finalize()?;

        let mut releases = HashMap::new();
        for edge in &resolved.edges {
            let (left, right) = (index_of[&edge.left], index_of[&edge.right]);
            graph.link_indices(left, right)?;
            releases.insert((left, right), edge.release_since);
        }

        tracing::debug!(
            packages = graph.len(),
            edges = releases.len(),
            "Built matrix graph"
        );
        Ok(Self { graph, releases })
    }

    fn index(&self, name: &str) -> Result<usize> {
        self.graph
            .find_index(&name.to_string())
            .ok_or_else(|| Error::PackageNotFound(name.to_string()))
    }

    /// Attach edge releases to neighbour names; `edge` maps the neighbour's
    /// index to the `(left, right)` key of the edge.
    fn dependencies(
        &self,
        names: Vec<&String>,
        edge: impl Fn(usize) -> (usize, usize),
    ) -> Vec<Dependency> {
        let mut deps: Vec<Dependency> = names
            .into_iter()
            .filter_map(|other| {
                let other_index = self.graph.find_index(other)?;
                let release = self.releases.get(&edge(other_index)).copied()?;
                Some(Dependency::new(other.clone(), release))
            })
            .collect();
        deps.sort();
        deps
    }

    /// Packages that `name` directly depends on, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageNotFound`] if `name` is not in the graph.
    pub fn forward_deps(&self, name: &str) -> Result<Vec<Dependency>> {
        let left = self.index(name)?;
        let targets = self.graph.targets(&name.to_string())?;
        Ok(self.dependencies(targets, |right| (left, right)))
    }

    /// Packages that directly depend on `name`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageNotFound`] if `name` is not in the graph.
    pub fn reverse_deps(&self, name: &str) -> Result<Vec<Dependency>> {
        let right = self.index(name)?;
        let sources = self.graph.sources(&name.to_string())?;
        Ok(self.dependencies(sources, |left| (left, right)))
    }

    /// Every package that transitively depends on `name`, sorted by name and
    /// excluding `name` itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageNotFound`] if `name` is not in the graph.
    pub fn worst_case(&self, name: &str) -> Result<Vec<String>> {
        let root = name.to_string();
        self.index(name)?;

        let mut seen: BTreeSet<&String> = BTreeSet::new();
        let mut queue: VecDeque<&String> = VecDeque::from([&root]);

        while let Some(current) = queue.pop_front() {
            for dependent in self.graph.sources(current)? {
                if *dependent != root && seen.insert(dependent) {
                    queue.push_back(dependent);
                }
            }
        }

        Ok(seen.into_iter().cloned().collect())
    }

    /// Number of packages in the matrix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Whether the matrix holds no packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}
