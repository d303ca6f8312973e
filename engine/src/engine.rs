//! The SQLite connection manager.
//!
//! [`SqliteEngine`] owns one connection to one database file and serializes
//! every operation against that file through the shared per-path
//! [`ReentrantLock`](crate::ReentrantLock). Two engine instances opened
//! against the same resolved path each hold their own connection but share
//! the lock, so statement execution is totally ordered by lock acquisition.
//!
//! # Example
//!
//! ```
//! use sqlite_model_engine::SqliteEngine;
//!
//! let engine = SqliteEngine::open(":memory:").unwrap();
//! engine
//!     .execute("CREATE TABLE users (id INTEGER, name TEXT)", [])
//!     .unwrap();
//! engine
//!     .execute("INSERT INTO users VALUES (1, 'ada')", [])
//!     .unwrap();
//!
//! let mut cursor = engine.query("SELECT name FROM users", []).unwrap();
//! let rows = cursor.fetch_all().unwrap();
//! assert_eq!(rows[0]["name"], "ada");
//! ```

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, Params, types::Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::lock::{DatabasePath, ReentrantLock, lock_for};
use crate::row::{Cursor, Row};
use crate::uri::DatabaseUri;

/// Options controlling how the underlying connection is opened.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sqlite_model_engine::OpenOptions;
///
/// let options = OpenOptions::default()
///     .timeout(Duration::from_secs(10))
///     .create_dirs(true);
/// assert_eq!(options.cached_statements, 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOptions {
    /// Busy timeout applied to the connection.
    pub timeout: Duration,
    /// Prepared-statement cache capacity.
    pub cached_statements: usize,
    /// Create the containing directory tree before opening. No-op for
    /// `:memory:`.
    pub create_dirs: bool,
    /// Treat the database string as a `file:` URI.
    pub uri: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            cached_statements: 100,
            create_dirs: false,
            uri: false,
        }
    }
}

impl OpenOptions {
    /// Sets the busy timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the prepared-statement cache capacity.
    pub fn cached_statements(mut self, capacity: usize) -> Self {
        self.cached_statements = capacity;
        self
    }

    /// Enables creation of the containing directory tree.
    pub fn create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }

    /// Enables `file:` URI interpretation of the database string.
    pub fn uri(mut self, uri: bool) -> Self {
        self.uri = uri;
        self
    }
}

struct EngineInner {
    database: String,
    path: DatabasePath,
    options: OpenOptions,
    lock: Arc<ReentrantLock>,
    conn: Mutex<Option<Connection>>,
}

/// A cloneable handle to one managed SQLite connection.
///
/// Cloning the handle shares the same connection and lock; dropping the
/// last handle for a path lets the registry reclaim the lock.
#[derive(Clone)]
pub struct SqliteEngine {
    inner: Arc<EngineInner>,
}

impl SqliteEngine {
    /// Opens an engine with default [`OpenOptions`] and acquires the
    /// connection immediately.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`](crate::EngineError) if the path cannot be
    /// resolved or the connection cannot be opened; the failure is logged
    /// and the engine is not constructed.
    pub fn open(database: &str) -> Result<Self> {
        Self::open_with(database, OpenOptions::default())
    }

    /// Opens an engine with explicit options.
    pub fn open_with(database: &str, options: OpenOptions) -> Result<Self> {
        let path = resolve_path(database, options.uri)?;
        let lock = lock_for(&path);
        let engine = Self {
            inner: Arc::new(EngineInner {
                database: database.to_string(),
                path,
                options,
                lock,
                conn: Mutex::new(None),
            }),
        };
        engine.acquire()?;
        Ok(engine)
    }

    /// The database string the engine was opened with.
    pub fn database(&self) -> &str {
        &self.inner.database
    }

    /// The resolved database identity (absolutized path or `:memory:`).
    pub fn path(&self) -> &DatabasePath {
        &self.inner.path
    }

    /// The options the engine was opened with.
    pub fn options(&self) -> &OpenOptions {
        &self.inner.options
    }

    /// Whether this engine currently holds an open connection.
    pub fn is_attached(&self) -> bool {
        self.inner
            .conn
            .lock()
            .expect("connection slot poisoned")
            .is_some()
    }

    /// Whether `self` and `other` serialize through the same per-file lock,
    /// i.e. resolve to the same physical database.
    pub fn shares_lock_with(&self, other: &SqliteEngine) -> bool {
        Arc::ptr_eq(&self.inner.lock, &other.inner.lock)
    }

    /// Opens the underlying connection, replacing any existing one.
    ///
    /// Takes the per-file lock, creates the containing directory tree if
    /// configured, and opens the connection with the configured timeout and
    /// statement-cache options. On failure the error is logged and
    /// re-raised, and the engine is left unattached.
    pub fn acquire(&self) -> Result<()> {
        let _guard = self.inner.lock.lock();
        let mut slot = self.inner.conn.lock().expect("connection slot poisoned");
        *slot = Some(self.open_connection()?);
        Ok(())
    }

    /// Closes the underlying connection, if any.
    ///
    /// Close is best-effort: failures are logged as warnings and swallowed.
    pub fn release(&self) {
        let _guard = self.inner.lock.lock();
        debug!(database = %self.inner.path, "closing the SQLite connection");
        let taken = self
            .inner
            .conn
            .lock()
            .expect("connection slot poisoned")
            .take();
        match taken {
            None => {}
            Some(conn) => match conn.close() {
                Ok(()) => debug!(database = %self.inner.path, "SQLite connection closed"),
                Err((_conn, err)) => {
                    warn!(database = %self.inner.path, error = %err, "failed to close the SQLite connection");
                }
            },
        }
    }

    /// Alias for [`release`](Self::release).
    pub fn close(&self) {
        self.release();
    }

    /// Runs `f` as a scoped session.
    ///
    /// The per-file lock is held for the whole block; a connection is
    /// lazily acquired if none is attached; the connection is closed and
    /// the lock released on every exit path, including an unwinding
    /// panic.
    pub fn with_session<T>(&self, f: impl FnOnce(&SqliteEngine) -> Result<T>) -> Result<T> {
        struct ReleaseOnExit<'a>(&'a SqliteEngine);
        impl Drop for ReleaseOnExit<'_> {
            fn drop(&mut self) {
                self.0.release();
            }
        }

        let _guard = self.inner.lock.lock();
        if !self.is_attached() {
            self.acquire()?;
        }
        let _release = ReleaseOnExit(self);
        f(self)
    }

    /// Executes a single query statement and returns a buffered [`Cursor`]
    /// over its result set.
    ///
    /// Takes the per-file lock for the duration of the call, logs the
    /// statement, and lazily acquires a connection if none is attached.
    pub fn query<P: Params>(&self, sql: &str, params: P) -> Result<Cursor> {
        let _guard = self.inner.lock.lock();
        debug!(statement = sql, "executing query");
        let result = self.with_connection(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let columns: Arc<[String]> = stmt
                .column_names()
                .iter()
                .map(|name| name.to_string())
                .collect::<Vec<_>>()
                .into();
            let width = columns.len();
            let mut rows = stmt.query(params)?;
            let mut buffered = Vec::new();
            while let Some(row) = rows.next()? {
                let values = (0..width)
                    .map(|idx| row.get::<_, Value>(idx))
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                buffered.push(Row::new(Arc::clone(&columns), values));
            }
            Ok(buffered)
        });
        match result {
            Ok(rows) => Ok(Cursor::new(rows)),
            Err(err) => {
                error!(database = %self.inner.path, error = %err, "failed to execute the query");
                Err(err)
            }
        }
    }

    /// Executes a statement within an implicit transaction.
    ///
    /// The transaction commits on success and rolls back on error. Returns
    /// the number of rows changed.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        let _guard = self.inner.lock.lock();
        debug!(statement = sql, "executing statement");
        let result = self.with_connection(|conn| {
            let tx = conn.unchecked_transaction()?;
            let changed = tx.execute(sql, params)?;
            tx.commit()?;
            Ok(changed)
        });
        self.log_transaction_failure(&result);
        result
    }

    /// Executes a parameterized statement once per element of `rows`,
    /// within one implicit transaction.
    ///
    /// Returns the total number of rows changed.
    pub fn execute_many<P, I>(&self, sql: &str, rows: I) -> Result<usize>
    where
        P: Params,
        I: IntoIterator<Item = P>,
    {
        let _guard = self.inner.lock.lock();
        debug!(statement = sql, "executing batched statement");
        let result = self.with_connection(|conn| {
            let tx = conn.unchecked_transaction()?;
            let mut changed = 0;
            {
                let mut stmt = tx.prepare(sql)?;
                for params in rows {
                    changed += stmt.execute(params)?;
                }
            }
            tx.commit()?;
            Ok(changed)
        });
        self.log_transaction_failure(&result);
        result
    }

    /// Executes a multi-statement script within an implicit transaction.
    ///
    /// The script must not manage transactions itself; the whole script
    /// commits on success and rolls back on error.
    pub fn execute_script(&self, sql: &str) -> Result<()> {
        let _guard = self.inner.lock.lock();
        debug!(statement = sql, "executing script");
        let result = self.with_connection(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(sql)?;
            tx.commit()?;
            Ok(())
        });
        self.log_transaction_failure(&result);
        result
    }

    /// Runs `f` against the attached connection, lazily acquiring one
    /// when unattached. Callers must hold the per-file lock.
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let mut slot = self.inner.conn.lock().expect("connection slot poisoned");
        let conn: &Connection = match slot.as_mut() {
            Some(conn) => conn,
            None => slot.insert(self.open_connection()?),
        };
        f(conn).map_err(Into::into)
    }

    fn open_connection(&self) -> Result<Connection> {
        debug!(database = %self.inner.path, "connecting to the SQLite database");
        match self.try_open() {
            Ok(conn) => {
                debug!(database = %self.inner.path, "connected to the SQLite database");
                Ok(conn)
            }
            Err(err) => {
                error!(database = %self.inner.path, error = %err, "failed to connect to the SQLite database");
                Err(err)
            }
        }
    }

    fn try_open(&self) -> Result<Connection> {
        let conn = match &self.inner.path {
            DatabasePath::Memory => Connection::open_in_memory()?,
            DatabasePath::File(path) => {
                if self.inner.options.create_dirs {
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                }
                if self.inner.options.uri {
                    Connection::open_with_flags(
                        &self.inner.database,
                        OpenFlags::default() | OpenFlags::SQLITE_OPEN_URI,
                    )?
                } else {
                    Connection::open(path)?
                }
            }
        };
        conn.busy_timeout(self.inner.options.timeout)?;
        conn.set_prepared_statement_cache_capacity(self.inner.options.cached_statements);
        Ok(conn)
    }

    fn log_transaction_failure<T>(&self, result: &Result<T>) {
        if let Err(err) = result {
            error!(database = %self.inner.path, error = %err, "last SQLite transaction failed");
        }
    }
}

impl fmt::Debug for SqliteEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteEngine")
            .field("database", &self.inner.database)
            .field("path", &self.inner.path)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl PartialEq for SqliteEngine {
    /// Handle identity: two handles are equal when they share one inner
    /// engine, not merely the same path.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

fn resolve_path(database: &str, uri: bool) -> Result<DatabasePath> {
    let file = if uri && database.starts_with("file:") {
        DatabaseUri::parse(database)?.file
    } else {
        database.to_string()
    };
    if file == ":memory:" {
        return Ok(DatabasePath::Memory);
    }
    let absolute = std::path::absolute(PathBuf::from(file))?;
    Ok(DatabasePath::File(absolute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn memory_engine() -> SqliteEngine {
        SqliteEngine::open(":memory:").unwrap()
    }

    #[test]
    fn test_open_memory_attaches_immediately() {
        let engine = memory_engine();
        assert!(engine.is_attached());
        assert_eq!(engine.path(), &DatabasePath::Memory);
    }

    #[test]
    fn test_execute_and_query_round_trip() {
        let engine = memory_engine();
        engine
            .execute("CREATE TABLE t (id INTEGER, name TEXT)", [])
            .unwrap();
        let changed = engine
            .execute("INSERT INTO t VALUES (?1, ?2)", params![1, "one"])
            .unwrap();
        assert_eq!(changed, 1);

        let mut cursor = engine.query("SELECT id, name FROM t", []).unwrap();
        let row = cursor.fetch_one().unwrap().unwrap();
        assert_eq!(row["id"], serde_json::json!(1));
        assert_eq!(row["name"], serde_json::json!("one"));
    }

    #[test]
    fn test_execute_many_counts_changes() {
        let engine = memory_engine();
        engine.execute("CREATE TABLE t (id INTEGER)", []).unwrap();
        let changed = engine
            .execute_many("INSERT INTO t VALUES (?1)", vec![[1], [2], [3]])
            .unwrap();
        assert_eq!(changed, 3);

        let mut cursor = engine.query("SELECT COUNT(*) AS n FROM t", []).unwrap();
        let row = cursor.fetch_one().unwrap().unwrap();
        assert_eq!(row["n"], serde_json::json!(3));
    }

    #[test]
    fn test_execute_rolls_back_on_error() {
        let engine = memory_engine();
        engine
            .execute("CREATE TABLE t (id INTEGER PRIMARY KEY)", [])
            .unwrap();
        engine.execute("INSERT INTO t VALUES (1)", []).unwrap();
        // Second batch fails on the duplicate key; the first row of the
        // batch must be rolled back with it.
        let result = engine.execute_many("INSERT INTO t VALUES (?1)", vec![[2], [1]]);
        assert!(result.is_err());

        let mut cursor = engine.query("SELECT COUNT(*) AS n FROM t", []).unwrap();
        assert_eq!(
            cursor.fetch_one().unwrap().unwrap()["n"],
            serde_json::json!(1)
        );
    }

    #[test]
    fn test_execute_script_batch() {
        let engine = memory_engine();
        engine
            .execute_script(
                "CREATE TABLE a (x INTEGER);
                 CREATE TABLE b (y INTEGER);
                 INSERT INTO a VALUES (1);",
            )
            .unwrap();
        let mut cursor = engine.query("SELECT x FROM a", []).unwrap();
        assert_eq!(cursor.fetch_all().unwrap().len(), 1);
    }

    #[test]
    fn test_release_then_lazy_reacquire() {
        let engine = memory_engine();
        engine.release();
        assert!(!engine.is_attached());
        // Statements lazily re-acquire a connection. Memory databases are
        // fresh per connection, so DDL works again.
        engine.execute("CREATE TABLE t (id INTEGER)", []).unwrap();
        assert!(engine.is_attached());
    }

    #[test]
    fn test_with_session_closes_on_success_and_error() {
        let engine = memory_engine();
        engine
            .with_session(|engine| engine.execute("CREATE TABLE t (id INTEGER)", []))
            .unwrap();
        assert!(!engine.is_attached());

        let failed: Result<usize> =
            engine.with_session(|engine| engine.execute("NOT VALID SQL", []));
        assert!(failed.is_err());
        assert!(!engine.is_attached());
    }

    #[test]
    fn test_with_session_closes_on_panic() {
        let engine = memory_engine();
        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            engine.with_session(|_| -> Result<usize> { panic!("mid-session failure") })
        }));
        assert!(unwound.is_err());
        assert!(!engine.is_attached());
        // The lock and connection slot are both usable again.
        engine.execute("CREATE TABLE t (id INTEGER)", []).unwrap();
    }

    #[test]
    fn test_query_failure_surfaces_error() {
        let engine = memory_engine();
        assert!(engine.query("SELECT * FROM missing", []).is_err());
    }

    #[test]
    fn test_engine_equality_is_handle_identity() {
        let engine = memory_engine();
        let clone = engine.clone();
        let other = memory_engine();
        assert_eq!(engine, clone);
        assert_ne!(engine, other);
    }
}
