/// Connection Management Module
///
/// This module provides `Database`, the owner of one SQLite connection, with
/// an explicit Disconnected/Connected lifecycle, auto-commit execution and an
/// opt-in scoped transaction.

use crate::core::db::query::{run_statement, Cursor, Row};
use crate::core::{HotelDbError, Result};
use rusqlite::{Connection, Params};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Pragmas applied to every new connection.
///
/// Foreign keys are enforced so that Rooms cannot reference missing
/// Hotels, Types or Services.
const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Connection lifecycle
#[derive(Debug, Default)]
pub enum ConnectionState {
    /// No connection (initial state, and after `close`)
    #[default]
    Disconnected,
    /// Open connection owned by the `Database`
    Connected(Connection),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }
}

/// Access object for one file-backed SQLite database.
///
/// Every statement run through `execute`, `fetchall` or `fetchone` is
/// committed before the call returns. Use `transaction` to group
/// statements atomically.
///
/// `Database` is not `Sync`; share it across threads behind a `Mutex` or
/// open one per thread.
///
/// # Examples
///
/// ```no_run
/// use hoteldb::Database;
///
/// let mut db = Database::new("hotel.db");
/// db.connect()?;
/// db.execute(
///     "INSERT INTO Hotels (name, address, phone_number, email) VALUES (?, ?, ?, ?)",
///     ("Grand", "1 Main St", 5551234, "a@b.com"),
/// )?;
/// let row = db.fetchone("SELECT name FROM Hotels WHERE id_hotels = ?", (1,))?;
/// db.close()?;
/// # Ok::<(), hoteldb::HotelDbError>(())
/// ```
#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    state: ConnectionState,
}

impl Database {
    /// Creates a disconnected database handle for the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Database {
            path: path.as_ref().to_path_buf(),
            state: ConnectionState::Disconnected,
        }
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current lifecycle state
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Opens the database file. Does nothing if already connected.
    ///
    /// # Errors
    ///
    /// Returns `HotelDbError::Database` if SQLite cannot open the file or
    /// apply the connection pragmas; the state stays Disconnected.
    pub fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            debug!(path = %self.path.display(), "connect called while already connected");
            return Ok(());
        }

        let conn = Connection::open(&self.path)?;
        conn.execute_batch(CONNECTION_PRAGMAS)?;

        debug!(path = %self.path.display(), "database connected");
        self.state = ConnectionState::Connected(conn);
        Ok(())
    }

    /// Closes the connection. Does nothing if not connected.
    ///
    /// The handle is cleared even when SQLite reports an error on close.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::take(&mut self.state) {
            ConnectionState::Disconnected => Ok(()),
            ConnectionState::Connected(conn) => {
                debug!(path = %self.path.display(), "closing database");
                conn.close().map_err(|(_conn, e)| {
                    warn!(path = %self.path.display(), error = %e, "error while closing database");
                    HotelDbError::Database(e)
                })
            }
        }
    }

    /// Runs `query` with bound `params` and commits it.
    ///
    /// # Errors
    ///
    /// `HotelDbError::NotConnected` if called before `connect`; nothing is
    /// executed in that case. Any driver failure is returned unchanged as
    /// `HotelDbError::Database`.
    pub fn execute<P: Params>(&self, query: &str, params: P) -> Result<Cursor> {
        run_statement(self.connection()?, query, params)
    }

    /// Runs `query` and returns every result row, or an empty vec.
    pub fn fetchall<P: Params>(&self, query: &str, params: P) -> Result<Vec<Row>> {
        Ok(self.execute(query, params)?.fetchall())
    }

    /// Runs `query` and returns the first result row, if any.
    pub fn fetchone<P: Params>(&self, query: &str, params: P) -> Result<Option<Row>> {
        Ok(self.execute(query, params)?.fetchone())
    }

    /// Runs `f` inside a transaction.
    ///
    /// Commits if `f` returns `Ok`. Rolls back if `f` returns `Err` or
    /// panics, leaving the database as it was before the call.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let conn = match &mut self.state {
            ConnectionState::Connected(conn) => conn,
            ConnectionState::Disconnected => {
                return Err(HotelDbError::NotConnected {
                    path: self.path.display().to_string(),
                })
            }
        };

        let tx = Transaction { inner: conn.transaction()? };
        match f(&tx) {
            Ok(value) => {
                tx.inner.commit()?;
                Ok(value)
            }
            Err(e) => {
                debug!(error = %e, "rolling back transaction");
                tx.inner.rollback()?;
                Err(e)
            }
        }
    }

    fn connection(&self) -> Result<&Connection> {
        match &self.state {
            ConnectionState::Connected(conn) => Ok(conn),
            ConnectionState::Disconnected => Err(self.not_connected()),
        }
    }

    fn not_connected(&self) -> HotelDbError {
        HotelDbError::NotConnected {
            path: self.path.display().to_string(),
        }
    }
}

/// Statements run inside `Database::transaction`.
///
/// Same contracts as the `Database` methods, except nothing is committed
/// until the closure returns `Ok`.
pub struct Transaction<'conn> {
    inner: rusqlite::Transaction<'conn>,
}

impl Transaction<'_> {
    pub fn execute<P: Params>(&self, query: &str, params: P) -> Result<Cursor> {
        run_statement(&self.inner, query, params)
    }

    pub fn fetchall<P: Params>(&self, query: &str, params: P) -> Result<Vec<Row>> {
        Ok(self.execute(query, params)?.fetchall())
    }

    pub fn fetchone<P: Params>(&self, query: &str, params: P) -> Result<Option<Row>> {
        Ok(self.execute(query, params)?.fetchone())
    }
}
