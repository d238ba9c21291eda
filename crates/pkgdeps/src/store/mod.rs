//! `SQLite` storage layer for pkgdeps.
//!
//! `SQLite` is the source of truth for the dependency graph and the rebuild
//! queue. A [`Store`] is an explicit session handle: it starts closed, is
//! opened once with [`Store::open`], and is closed with [`Store::close`].
//! Neither call is reentrant, and every query on a closed store fails with
//! [`Error::NotOpen`].
//!
//! ## Module Structure
//!
//! - `schema` - Database schema (DDL)
//! - `graph` - Full rebuild and dependency queries
//! - `queue` - Rebuild queue lifecycle and blocking

mod graph;
mod queue;
mod schema;

use std::path::Path;

use rusqlite::Connection;

use crate::error::{Error, Result};
use schema::SCHEMA;

/// Session handle over the pkgdeps database.
///
/// The store does no internal locking. Callers sharing a database between
/// processes must serialise access themselves.
#[derive(Debug, Default)]
pub struct Store {
    conn: Option<Connection>,
}

impl Store {
    /// Create a closed store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the store currently holds an open connection.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Open or create the database at `location`, creating the schema if absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyOpen`] if the store is open, or a storage
    /// error if the database cannot be opened.
    pub fn open(&mut self, location: &Path) -> Result<()> {
        if self.is_open() {
            return Err(Error::AlreadyOpen);
        }

        // Ensure parent directory exists
        if let Some(parent) = location.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(location)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        self.attach(conn)?;

        tracing::debug!(path = %location.display(), "Opened database");
        Ok(())
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Store::open`].
    pub fn open_in_memory(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(Error::AlreadyOpen);
        }
        self.attach(Connection::open_in_memory()?)
    }

    fn attach(&mut self, conn: Connection) -> Result<()> {
        conn.execute_batch(SCHEMA)?;
        self.conn = Some(conn);
        Ok(())
    }

    /// Close the connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyClosed`] if the store is not open. If `SQLite`
    /// refuses to close, the store stays open and the error is returned.
    pub fn close(&mut self) -> Result<()> {
        let conn = self.conn.take().ok_or(Error::AlreadyClosed)?;
        match conn.close() {
            Ok(()) => {
                tracing::debug!("Closed database");
                Ok(())
            }
            Err((conn, e)) => {
                self.conn = Some(conn);
                Err(e.into())
            }
        }
    }

    /// Borrow the open connection.
    pub(crate) fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::NotOpen)
    }

    /// Mutably borrow the open connection, for transactions.
    pub(crate) fn connection_mut(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(Error::NotOpen)
    }
}
