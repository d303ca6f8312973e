//! Serialized SQLite connection management.
//!
//! This crate mediates access to a single physical SQLite database file
//! across threads and engine instances:
//!
//! - **`lock`** — a reentrant per-file lock plus a process-wide registry
//!   mapping each resolved database path to exactly one lock.
//! - **`engine`** — [`SqliteEngine`], the connection manager: open/close
//!   lifecycle, scoped sessions, and the
//!   `query`/`execute`/`execute_many`/`execute_script` surface with
//!   implicit transactions.
//! - **`row`** — buffered result cursors with pluggable row adapters;
//!   rows default to string-keyed JSON maps.
//! - **`uri`** — `file:`-prefixed database URI parsing.
//! - **`decimal`** — lossless digit-string storage for exact decimals.
//!
//! # Quick start
//!
//! ```
//! use sqlite_model_engine::SqliteEngine;
//!
//! let engine = SqliteEngine::open(":memory:").unwrap();
//! engine
//!     .with_session(|engine| {
//!         engine.execute("CREATE TABLE t (id INTEGER)", [])?;
//!         engine.execute("INSERT INTO t VALUES (1)", [])
//!     })
//!     .unwrap();
//! ```
//!
//! # Concurrency model
//!
//! Operations against the same resolved file path, issued by any number of
//! engine instances on any threads, are totally ordered by acquisition of
//! the shared reentrant lock. The lock is the sole serialization primitive;
//! there is no fairness guarantee beyond what the platform mutex provides.

mod decimal;
mod engine;
mod error;
mod lock;
mod row;
mod uri;

pub use decimal::TextDecimal;
pub use engine::{OpenOptions, SqliteEngine};
pub use error::{EngineError, Result};
pub use lock::{DatabasePath, ReentrantGuard, ReentrantLock};
pub use row::{Cursor, Row, value_to_json};
pub use uri::DatabaseUri;
