//! # pkgdeps: Rebuild Tracking for Binary Package Repositories
//!
//! pkgdeps ingests a repository index, keeps the runtime-dependency graph in
//! `SQLite`, and answers the questions a packager asks before a mass rebuild:
//! what does this package need, what needs it, and how far does a change
//! ripple. A rebuild queue tracks which packages are pending and which are
//! ready because none of their dependencies still wait for a rebuild.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pkgdeps::{Catalog, Store};
//! use std::path::Path;
//!
//! let catalog = Catalog::load(Path::new("/var/lib/eopkg/index/Unstable/eopkg-index.xml"))?;
//!
//! let mut store = Store::new();
//! store.open(Path::new("pkgdeps.db"))?;
//! store.rebuild_from_index(&catalog)?;
//!
//! store.start("openssl")?;
//! let queued = store.done("openssl", true)?;
//! println!("{} dependents queued", queued.len());
//!
//! for name in store.list_unblocked()?.unblocked {
//!     println!("ready: {name}");
//! }
//! # Ok::<(), pkgdeps::Error>(())
//! ```
//!
//! [`MatrixGraph`] answers the same graph queries without a database, from
//! the bit matrix in `pkgdeps-bitmap`.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
mod domain;
mod error;
pub mod matrix;
mod store;

pub use catalog::{Catalog, CatalogDependency, CatalogPackage};
pub use config::Config;
pub use domain::{
    Dependency, Package, PackageId, RebuildStats, StoreStats, TodoEntry, TodoStatus, TodoSummary,
};
pub use error::{Error, Result};
pub use matrix::MatrixGraph;
pub use store::Store;
