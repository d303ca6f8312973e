//! Core schema metamodel for SQLite databases.
//!
//! This crate defines the object graph for describing a database schema in
//! code:
//!
//! - [`Schema`] — the root entity, holding keyed collections of tables,
//!   indexes, views, and triggers, plus an optional engine handle.
//! - [`Table`] — a keyed collection of columns with a rowid flag.
//! - [`Column`] — a column with a type affinity and an optional
//!   [`PrimaryKey`] constraint.
//! - [`Index`], [`View`], [`Trigger`] — named schema items.
//!
//! Entities are cheap cloneable handles sharing interior state; equality is
//! handle identity. Attributes live in managed [`Slot`]s that validate on
//! write and can enforce one-time assignment, and children register into
//! [`Collection`]s that reject duplicate keys and duplicate children.
//! Children resolve their engine through parent back-references, so
//! attaching a [`SqliteEngine`](sqlite_model_engine::SqliteEngine) to a
//! schema makes it reachable from every table and column below it.
//!
//! [`ToValue`] exports the whole graph as JSON, substituting parent names
//! for upward references so the cyclic graph renders as a tree.
//!
//! # Example
//!
//! ```
//! use sqlite_model_core::{Column, ModelArg, Schema, Table, ToValue, keyed};
//!
//! let schema = Schema::new("main").unwrap();
//! let users = Table::with_args(
//!     "users",
//!     &schema,
//!     vec![
//!         ModelArg::from(Column::with_type("id", "INTEGER").unwrap()),
//!         keyed("mail", Column::new("email_address").unwrap()),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(users.column_keys(), vec!["id", "mail"]);
//! assert_eq!(users.schema().unwrap(), schema);
//!
//! let exported = schema.to_value();
//! assert_eq!(exported["tables"]["users"]["columns"]["mail"]["type"], "TEXT");
//! ```

mod args;
mod collection;
mod constraint;
mod error;
mod export;
mod model;
mod slot;

pub use args::{ModelArg, keyed};
pub use collection::{Collection, CollectionItem, Uniqueness};
pub use constraint::{OnConflict, PrimaryKey, PrimaryKeyOptions, SortOrder};
pub use error::{ModelError, Result};
pub use export::ToValue;
pub use model::{Column, ColumnOptions, Index, Schema, Table, Trigger, View};
pub use slot::{Slot, Validator, validate};
