//! Full rebuild and dependency queries.

// SQLite uses i64 for all integer storage. Releases and row counts are
// non-negative and well within range.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, trace};

use super::schema::{DROP_ALL, SCHEMA};
use super::Store;
use crate::catalog::Catalog;
use crate::domain::{Dependency, Package, PackageId, RebuildStats, StoreStats};
use crate::error::{Error, Result};

/// Look up a package row by name.
pub(super) fn find_package(conn: &Connection, name: &str) -> Result<Package> {
    trace!(package = %name, "Looking up package");
    conn.query_row(
        "SELECT id, name, rel FROM packages WHERE name = ?1",
        [name],
        |row| {
            Ok(Package {
                id: PackageId(row.get(0)?),
                name: row.get(1)?,
                release: row.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| Error::PackageNotFound(name.to_string()))
}

/// Run a `(name, rel)` query keyed by one package id.
fn dependency_rows(conn: &Connection, sql: &str, id: PackageId) -> Result<Vec<Dependency>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([id.as_i64()], |row| {
            Ok(Dependency {
                name: row.get(0)?,
                release: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

impl Store {
    /// Replace the whole graph with the contents of `catalog`.
    ///
    /// Drops and recreates all three tables (clearing the rebuild queue) and
    /// reloads packages and edges inside one transaction. Ids are catalog
    /// positions; see [`Catalog::resolve`] for which packages and edges are
    /// kept. On any error the transaction is rolled back and the previous
    /// graph remains untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`], a catalog error, or a storage error.
    pub fn rebuild_from_index(&mut self, catalog: &Catalog) -> Result<RebuildStats> {
        let resolved = catalog.resolve()?;
        let conn = self.connection_mut()?;
        let tx = conn.transaction()?;

        tx.execute_batch(DROP_ALL)?;
        tx.execute_batch(SCHEMA)?;

        {
            let mut insert_package =
                tx.prepare("INSERT INTO packages (id, name, rel) VALUES (?1, ?2, ?3)")?;
            for (id, pkg) in &resolved.packages {
                insert_package.execute(params![id.as_i64(), pkg.name, pkg.release])?;
            }

            let mut insert_dep =
                tx.prepare("INSERT INTO deps (left_id, right_id, rel) VALUES (?1, ?2, ?3)")?;
            for edge in &resolved.edges {
                insert_dep.execute(params![
                    edge.left.as_i64(),
                    edge.right.as_i64(),
                    edge.release_since
                ])?;
            }
        }

        tx.commit()?;

        let stats = RebuildStats {
            packages: resolved.packages.len(),
            edges: resolved.edges.len(),
            skipped_packages: resolved.skipped_packages,
            dropped_edges: resolved.dropped_edges,
        };
        info!(
            packages = stats.packages,
            edges = stats.edges,
            skipped = stats.skipped_packages,
            dropped = stats.dropped_edges,
            "Rebuilt dependency graph"
        );
        Ok(stats)
    }

    /// Get a package by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageNotFound`] if `name` is not in the graph.
    pub fn package(&self, name: &str) -> Result<Package> {
        find_package(self.connection()?, name)
    }

    /// Packages that `name` directly depends on, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageNotFound`] if `name` is not in the graph.
    pub fn forward_deps(&self, name: &str) -> Result<Vec<Dependency>> {
        let conn = self.connection()?;
        let pkg = find_package(conn, name)?;
        dependency_rows(
            conn,
            "SELECT p.name, d.rel
             FROM deps d
             JOIN packages p ON p.id = d.right_id
             WHERE d.left_id = ?1
             ORDER BY p.name",
            pkg.id,
        )
    }

    /// Packages that directly depend on `name`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageNotFound`] if `name` is not in the graph.
    pub fn reverse_deps(&self, name: &str) -> Result<Vec<Dependency>> {
        let conn = self.connection()?;
        let pkg = find_package(conn, name)?;
        dependency_rows(
            conn,
            "SELECT p.name, d.rel
             FROM deps d
             JOIN packages p ON p.id = d.left_id
             WHERE d.right_id = ?1
             ORDER BY p.name",
            pkg.id,
        )
    }

    /// Every package that transitively depends on `name`, sorted by name.
    ///
    /// This is the worst-case rebuild set for a change to `name`. It is a
    /// property of the whole graph and ignores the rebuild queue. The result
    /// has no duplicates and never contains `name` itself, even when a cycle
    /// leads back to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageNotFound`] if `name` is not in the graph.
    pub fn worst_case(&self, name: &str) -> Result<Vec<String>> {
        let conn = self.connection()?;
        let pkg = find_package(conn, name)?;

        // UNION (not UNION ALL) discards revisited ids, so cycles terminate.
        let mut stmt = conn.prepare(
            "WITH RECURSIVE dependents(id) AS (
                SELECT left_id FROM deps WHERE right_id = ?1
                UNION
                SELECT d.left_id
                FROM deps d
                JOIN dependents r ON d.right_id = r.id
            )
            SELECT p.name
            FROM dependents r
            JOIN packages p ON p.id = r.id
            WHERE r.id != ?1
            ORDER BY p.name",
        )?;

        let names = stmt
            .query_map([pkg.id.as_i64()], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        trace!(package = %name, dependents = names.len(), "Computed worst-case set");
        Ok(names)
    }

    /// Row counts of the graph and queue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] or a storage error.
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.connection()?;
        let count = |table: &str| -> Result<usize> {
            let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
            Ok(n as usize)
        };

        Ok(StoreStats {
            packages: count("packages")?,
            edges: count("deps")?,
            todo: count("todo")?,
        })
    }
}
