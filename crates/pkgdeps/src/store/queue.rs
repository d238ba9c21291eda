//! Rebuild queue lifecycle and blocking.
//!
//! Each entry moves one way, `Pending -> Done`. A pending entry is
//! *unblocked* when none of its forward dependencies has a pending entry of
//! its own. Blocking only considers the queue: a prerequisite that is not
//! tracked never blocks anything.

// SQLite uses i64 for all integer storage. Row counts are non-negative.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::graph::find_package;
use super::Store;
use crate::domain::{PackageId, TodoEntry, TodoStatus, TodoSummary};
use crate::error::{Error, Result};

fn count(conn: &Connection, sql: &str) -> Result<usize> {
    let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(n as usize)
}

fn count_pending(conn: &Connection, name: &str) -> Result<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM todo WHERE name = ?1 AND done = 0",
        [name],
        |row| row.get(0),
    )?;
    Ok(n as usize)
}

impl Store {
    /// Queue `name` for a rebuild.
    ///
    /// A package whose earlier entry is already done gets a fresh pending
    /// entry; the done entry stays in the history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageNotFound`] if `name` is not in the graph and
    /// [`Error::DuplicatePending`] if it already has a pending entry.
    pub fn start(&self, name: &str) -> Result<()> {
        let conn = self.connection()?;
        let pkg = find_package(conn, name)?;

        let pending = count_pending(conn, name)?;
        if pending > 0 {
            return Err(Error::DuplicatePending(name.to_string()));
        }

        conn.execute(
            "INSERT INTO todo (name, package_id, done) VALUES (?1, ?2, 0)",
            params![pkg.name, pkg.id.as_i64()],
        )?;
        debug!(package = %name, "Queued for rebuild");
        Ok(())
    }

    /// Mark the pending entry for `name` as done.
    ///
    /// With `cascade`, every direct reverse dependency of `name` that has no
    /// entry at all (pending or done) is queued as pending. Packages already
    /// tracked are never queued again. Returns the newly queued names, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TodoNotFound`] if `name` was never started and
    /// [`Error::InvalidState`] if its only entries are already done.
    pub fn done(&mut self, name: &str, cascade: bool) -> Result<Vec<String>> {
        let conn = self.connection_mut()?;
        let tx = conn.transaction()?;

        let pending: Option<(i64, i64)> = tx
            .query_row(
                "SELECT id, package_id FROM todo WHERE name = ?1 AND done = 0",
                [name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((entry_id, package_id)) = pending else {
            let entries: i64 =
                tx.query_row("SELECT COUNT(*) FROM todo WHERE name = ?1", [name], |row| {
                    row.get(0)
                })?;
            if entries == 0 {
                return Err(Error::TodoNotFound(name.to_string()));
            }
            return Err(Error::InvalidState {
                name: name.to_string(),
                reason: "rebuild is already done",
            });
        };

        tx.execute("UPDATE todo SET done = 1 WHERE id = ?1", [entry_id])?;

        let mut queued = Vec::new();
        if cascade {
            let candidates: Vec<(String, i64)> = {
                let mut stmt = tx.prepare(
                    "SELECT p.name, p.id
                     FROM deps d
                     JOIN packages p ON p.id = d.left_id
                     WHERE d.right_id = ?1
                       AND NOT EXISTS (SELECT 1 FROM todo t WHERE t.name = p.name)
                     ORDER BY p.name",
                )?;
                let rows = stmt
                    .query_map([package_id], |row| Ok((row.get(0)?, row.get(1)?)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            };

            for (dependent, id) in candidates {
                tx.execute(
                    "INSERT INTO todo (name, package_id, done) VALUES (?1, ?2, 0)",
                    params![dependent, id],
                )?;
                queued.push(dependent);
            }
        }

        tx.commit()?;
        info!(package = %name, queued = queued.len(), "Marked rebuild done");
        Ok(queued)
    }

    /// Pending packages that are ready to rebuild, plus queue counters.
    ///
    /// A self-dependency never blocks its own package.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] or a storage error.
    pub fn list_unblocked(&self) -> Result<TodoSummary> {
        let conn = self.connection()?;

        let mut stmt = conn.prepare(
            "SELECT t.name
             FROM todo t
             WHERE t.done = 0
               AND NOT EXISTS (
                   SELECT 1
                   FROM deps d
                   JOIN todo b ON b.package_id = d.right_id AND b.done = 0
                   WHERE d.left_id = t.package_id
                     AND d.right_id != t.package_id
               )
             ORDER BY t.name",
        )?;
        let unblocked = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(TodoSummary {
            unblocked,
            pending: count(conn, "SELECT COUNT(*) FROM todo WHERE done = 0")?,
            done: count(conn, "SELECT COUNT(*) FROM todo WHERE done = 1")?,
        })
    }

    /// Every rebuild entry in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] or a storage error.
    pub fn todo_entries(&self) -> Result<Vec<TodoEntry>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare("SELECT name, package_id, done FROM todo ORDER BY id")?;
        let entries = stmt
            .query_map([], |row| {
                Ok(TodoEntry {
                    name: row.get(0)?,
                    package_id: PackageId(row.get(1)?),
                    status: TodoStatus::from_done(row.get(2)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Remove every rebuild entry, pending or done.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] or a storage error.
    pub fn reset(&self) -> Result<()> {
        let removed = self.connection()?.execute("DELETE FROM todo", [])?;
        info!(removed, "Cleared rebuild list");
        Ok(())
    }
}
