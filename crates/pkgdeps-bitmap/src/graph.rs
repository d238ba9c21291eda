//! Key index layered over a square [`BitMap`].
//!
//! Building a [`KeyedGraph`] is two-phase: every key is registered with
//! [`KeyedGraph::add_key`] first, then [`KeyedGraph::finalize`] allocates a
//! `keys x keys` matrix. The matrix size is unknown until the full key set has
//! been seen, so edges can only be recorded after finalizing.
//!
//! Indices start at 1 and follow insertion order. Lookups are linear scans,
//! which is fine at package-catalog scale.

use crate::bitmap::{ones, BitMap};
use crate::error::{Error, Result};

/// Keys mapped to stable indices, plus the adjacency matrix between them.
#[derive(Debug, Clone)]
pub struct KeyedGraph<K> {
    keys: Vec<(K, usize)>,
    map: Option<BitMap>,
}

impl<K> Default for KeyedGraph<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            map: None,
        }
    }
}

impl<K: PartialEq> KeyedGraph<K> {
    /// Create an empty, unfinalized graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys have been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether the matrix has been allocated.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.map.is_some()
    }

    /// Register `key`, returning its index.
    ///
    /// Adding a key that is already present returns the existing index. New
    /// keys get the next sequential index, starting at 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Finalized`] if `key` is new and the matrix has already
    /// been allocated.
    pub fn add_key(&mut self, key: K) -> Result<usize> {
        if let Some(index) = self.find_index(&key) {
            return Ok(index);
        }
        if self.is_finalized() {
            return Err(Error::Finalized);
        }
        let index = self.keys.len() + 1;
        self.keys.push((key, index));
        Ok(index)
    }

    /// Index of `key`, if registered.
    pub fn find_index(&self, key: &K) -> Option<usize> {
        self.keys
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, index)| *index)
    }

    /// Key registered under `index`, if any.
    #[must_use]
    pub fn find_key(&self, index: usize) -> Option<&K> {
        self.keys
            .iter()
            .find(|(_, i)| *i == index)
            .map(|(key, _)| key)
    }

    /// Allocate the `len x len` adjacency matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Finalized`] if the matrix already exists.
    pub fn finalize(&mut self) -> Result<()> {
        if self.is_finalized() {
            return Err(Error::Finalized);
        }
        let n = self.keys.len();
        tracing::debug!(keys = n, "Allocating adjacency matrix");
        self.map = Some(BitMap::new(n, n));
        Ok(())
    }

    /// The underlying matrix. Row and column `i` belong to index `i + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFinalized`] before [`KeyedGraph::finalize`].
    pub fn matrix(&self) -> Result<&BitMap> {
        self.map.as_ref().ok_or(Error::NotFinalized)
    }

    fn cell(&self, left: &K, right: &K) -> Result<(usize, usize)> {
        let row = self.find_index(left).ok_or(Error::UnknownKey)?;
        let col = self.find_index(right).ok_or(Error::UnknownKey)?;
        Ok((row - 1, col - 1))
    }

    fn matrix_mut(&mut self) -> Result<&mut BitMap> {
        self.map.as_mut().ok_or(Error::NotFinalized)
    }

    /// Record the edge `left -> right`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] for unregistered keys and
    /// [`Error::NotFinalized`] before the matrix exists.
    pub fn link(&mut self, left: &K, right: &K) -> Result<()> {
        let (row, col) = self.cell(left, right)?;
        self.matrix_mut()?.set(row, col)
    }

    /// Record the edge between two indices returned by
    /// [`KeyedGraph::add_key`], skipping the key lookups.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] for index 0 and
    /// [`Error::NotFinalized`] before the matrix exists. Indices past the
    /// last key fail with [`Error::OutOfRange`].
    pub fn link_indices(&mut self, left: usize, right: usize) -> Result<()> {
        if left == 0 || right == 0 {
            return Err(Error::UnknownKey);
        }
        self.matrix_mut()?.set(left - 1, right - 1)
    }

    /// Remove the edge `left -> right`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`KeyedGraph::link`].
    pub fn unlink(&mut self, left: &K, right: &K) -> Result<()> {
        let (row, col) = self.cell(left, right)?;
        self.matrix_mut()?.clear(row, col)
    }

    /// Whether the edge `left -> right` exists.
    ///
    /// # Errors
    ///
    /// Same conditions as [`KeyedGraph::link`].
    pub fn is_linked(&self, left: &K, right: &K) -> Result<bool> {
        let (row, col) = self.cell(left, right)?;
        self.matrix()?.is_set(row, col)
    }

    /// Keys that `key` points to, in index order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] or [`Error::NotFinalized`].
    pub fn targets(&self, key: &K) -> Result<Vec<&K>> {
        let index = self.find_index(key).ok_or(Error::UnknownKey)?;
        let row = self.matrix()?.row(index - 1)?;
        Ok(self.resolve(&row))
    }

    /// Keys that point to `key`, in index order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] or [`Error::NotFinalized`].
    pub fn sources(&self, key: &K) -> Result<Vec<&K>> {
        let index = self.find_index(key).ok_or(Error::UnknownKey)?;
        let column = self.matrix()?.column(index - 1)?;
        Ok(self.resolve(&column))
    }

    fn resolve(&self, slice: &[u64]) -> Vec<&K> {
        ones(slice)
            .filter_map(|position| self.find_key(position + 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> KeyedGraph<&'static str> {
        let mut graph = KeyedGraph::new();
        for key in ["glibc", "zlib", "openssl", "curl"] {
            graph.add_key(key).unwrap();
        }
        graph
    }

    #[test]
    fn add_key_starts_at_one_and_is_idempotent() {
        let mut graph = KeyedGraph::new();
        assert_eq!(graph.add_key("a").unwrap(), 1);
        assert_eq!(graph.add_key("b").unwrap(), 2);
        assert_eq!(graph.add_key("a").unwrap(), 1);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn lookups_are_inverse() {
        let graph = names();
        assert_eq!(graph.find_index(&"openssl"), Some(3));
        assert_eq!(graph.find_key(3), Some(&"openssl"));
        assert_eq!(graph.find_index(&"missing"), None);
        assert_eq!(graph.find_key(0), None);
        assert_eq!(graph.find_key(5), None);
    }

    #[test]
    fn edges_require_finalize() {
        let mut graph = names();
        assert_eq!(graph.link(&"curl", &"zlib"), Err(Error::NotFinalized));
        assert!(graph.matrix().is_err());

        graph.finalize().unwrap();
        assert_eq!(graph.matrix().unwrap().rows(), 4);
        assert_eq!(graph.finalize(), Err(Error::Finalized));
    }

    #[test]
    fn new_keys_rejected_after_finalize() {
        let mut graph = names();
        graph.finalize().unwrap();

        assert_eq!(graph.add_key("zlib").unwrap(), 2);
        assert_eq!(graph.add_key("bzip2"), Err(Error::Finalized));
    }

    #[test]
    fn targets_and_sources_follow_edges() {
        let mut graph = names();
        graph.finalize().unwrap();
        graph.link(&"curl", &"openssl").unwrap();
        graph.link(&"curl", &"zlib").unwrap();
        graph.link(&"openssl", &"glibc").unwrap();
        graph.link(&"zlib", &"glibc").unwrap();

        assert_eq!(graph.targets(&"curl").unwrap(), vec![&"zlib", &"openssl"]);
        assert_eq!(graph.sources(&"glibc").unwrap(), vec![&"zlib", &"openssl"]);
        assert!(graph.sources(&"curl").unwrap().is_empty());

        graph.unlink(&"curl", &"zlib").unwrap();
        assert!(!graph.is_linked(&"curl", &"zlib").unwrap());
        assert_eq!(graph.targets(&"curl").unwrap(), vec![&"openssl"]);
    }

    #[test]
    fn link_indices_matches_link() {
        let mut graph = names();
        graph.finalize().unwrap();
        graph.link_indices(4, 3).unwrap();

        assert!(graph.is_linked(&"curl", &"openssl").unwrap());
        assert_eq!(graph.link_indices(0, 1), Err(Error::UnknownKey));
        assert!(matches!(
            graph.link_indices(5, 1),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn unknown_keys_are_reported() {
        let mut graph = names();
        graph.finalize().unwrap();
        assert_eq!(graph.link(&"curl", &"nope"), Err(Error::UnknownKey));
        assert_eq!(graph.targets(&"nope"), Err(Error::UnknownKey));
    }
}
