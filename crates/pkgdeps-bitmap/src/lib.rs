//! Dense adjacency storage for directed relations.
//!
//! This library provides [`BitMap`], a boolean `rows x cols` relation stored
//! twice (row-major and column-major) so that both a whole row and a whole
//! column can be sliced with word shifts, and [`KeyedGraph`], which maps
//! arbitrary keys onto matrix indices.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bitmap;
pub mod error;
pub mod graph;

pub use bitmap::{ones, BitMap, WORD_BITS};
pub use error::{Error, Result};
pub use graph::KeyedGraph;
