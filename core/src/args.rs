//! Heterogeneous constructor arguments.
//!
//! [`Schema::with_args`](crate::Schema::with_args) and
//! [`Table::with_args`](crate::Table::with_args) accept a mixed bag of
//! child entities, an engine handle, and flags in a single `Vec<ModelArg>`.
//! The constructor filters the bag by variant, consuming everything it
//! recognizes; anything left over is reported as an error naming each
//! unconsumed argument.
//!
//! An argument may be wrapped in [`keyed`] to register the value under an
//! explicit collection key instead of its own name.

use sqlite_model_engine::SqliteEngine;

use crate::error::{ModelError, Result};
use crate::model::{Column, Index, Table, Trigger, View};

/// One constructor argument for [`Schema`](crate::Schema) or
/// [`Table`](crate::Table).
#[derive(Debug, Clone)]
pub enum ModelArg {
    /// A table to register with a schema.
    Table(Table),
    /// An index to register with a schema.
    Index(Index),
    /// A view to register with a schema.
    View(View),
    /// A trigger to register with a schema.
    Trigger(Trigger),
    /// A column to register with a table.
    Column(Column),
    /// An engine handle to attach.
    Engine(SqliteEngine),
    /// Whether a table keeps its implicit rowid.
    RowId(bool),
    /// An argument registered under an explicit key.
    Keyed(String, Box<ModelArg>),
}

impl ModelArg {
    /// Short display form used in unresolved-argument errors.
    pub(crate) fn describe(&self) -> String {
        match self {
            ModelArg::Table(table) => format!("Table '{}'", table.name()),
            ModelArg::Index(index) => format!("Index '{}'", index.name()),
            ModelArg::View(view) => format!("View '{}'", view.name()),
            ModelArg::Trigger(trigger) => format!("Trigger '{}'", trigger.name()),
            ModelArg::Column(column) => format!("Column '{}'", column.name()),
            ModelArg::Engine(engine) => format!("engine '{}'", engine.path()),
            ModelArg::RowId(value) => format!("row_id={value}"),
            ModelArg::Keyed(key, inner) => format!("{key}={}", inner.describe()),
        }
    }
}

impl From<Table> for ModelArg {
    fn from(value: Table) -> Self {
        ModelArg::Table(value)
    }
}

impl From<Index> for ModelArg {
    fn from(value: Index) -> Self {
        ModelArg::Index(value)
    }
}

impl From<View> for ModelArg {
    fn from(value: View) -> Self {
        ModelArg::View(value)
    }
}

impl From<Trigger> for ModelArg {
    fn from(value: Trigger) -> Self {
        ModelArg::Trigger(value)
    }
}

impl From<Column> for ModelArg {
    fn from(value: Column) -> Self {
        ModelArg::Column(value)
    }
}

impl From<SqliteEngine> for ModelArg {
    fn from(value: SqliteEngine) -> Self {
        ModelArg::Engine(value)
    }
}

/// Wraps an argument so it registers under `key` instead of its own name.
///
/// # Examples
///
/// ```
/// use sqlite_model_core::{Column, keyed};
///
/// let arg = keyed("uid", Column::new("user_id").unwrap());
/// ```
pub fn keyed(key: &str, arg: impl Into<ModelArg>) -> ModelArg {
    ModelArg::Keyed(key.to_string(), Box::new(arg.into()))
}

macro_rules! drain_entities {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        /// Removes every matching argument, bare or keyed, preserving order.
        pub(crate) fn $fn_name(args: &mut Vec<ModelArg>) -> Vec<(Option<String>, $ty)> {
            let mut matched = Vec::new();
            let mut rest = Vec::new();
            for arg in args.drain(..) {
                match arg {
                    ModelArg::$variant(value) => matched.push((None, value)),
                    ModelArg::Keyed(key, inner) => match *inner {
                        ModelArg::$variant(value) => matched.push((Some(key), value)),
                        other => rest.push(ModelArg::Keyed(key, Box::new(other))),
                    },
                    other => rest.push(other),
                }
            }
            *args = rest;
            matched
        }
    };
}

drain_entities!(drain_tables, Table, Table);
drain_entities!(drain_indexes, Index, Index);
drain_entities!(drain_views, View, View);
drain_entities!(drain_triggers, Trigger, Trigger);
drain_entities!(drain_columns, Column, Column);
drain_entities!(drain_engines, Engine, SqliteEngine);
drain_entities!(drain_row_ids, RowId, bool);

/// Fails if any arguments survived the filtering pass.
pub(crate) fn ensure_resolved(
    args: Vec<ModelArg>,
    owner: &'static str,
    name: &str,
) -> Result<()> {
    if args.is_empty() {
        return Ok(());
    }
    let arguments = args
        .iter()
        .map(ModelArg::describe)
        .collect::<Vec<_>>()
        .join(", ");
    Err(ModelError::UnresolvedArguments {
        arguments,
        owner,
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_picks_only_matching_variants() {
        let mut args = vec![
            ModelArg::from(Column::new("id").unwrap()),
            ModelArg::RowId(false),
            ModelArg::from(Column::new("name").unwrap()),
        ];
        let columns = drain_columns(&mut args);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].0, None);
        assert_eq!(columns[0].1.name(), "id");
        assert_eq!(columns[1].1.name(), "name");
        assert_eq!(args.len(), 1);
        assert!(matches!(args[0], ModelArg::RowId(false)));
    }

    #[test]
    fn test_keyed_wrapper_carries_the_key() {
        let mut args = vec![keyed("uid", Column::new("user_id").unwrap())];
        let columns = drain_columns(&mut args);
        assert_eq!(columns[0].0.as_deref(), Some("uid"));
        assert_eq!(columns[0].1.name(), "user_id");
        assert!(args.is_empty());
    }

    #[test]
    fn test_keyed_wrapper_survives_mismatched_drain() {
        let mut args = vec![keyed("i", Index::new("idx_users").unwrap())];
        assert!(drain_columns(&mut args).is_empty());
        let indexes = drain_indexes(&mut args);
        assert_eq!(indexes[0].0.as_deref(), Some("i"));
    }

    #[test]
    fn test_ensure_resolved_names_leftovers() {
        let args = vec![
            ModelArg::from(Index::new("idx_a").unwrap()),
            ModelArg::RowId(true),
        ];
        let err = ensure_resolved(args, "Table", "users").unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to resolve arguments (Index 'idx_a', row_id=true) for Table 'users'"
        );
    }

    #[test]
    fn test_ensure_resolved_accepts_empty() {
        assert!(ensure_resolved(Vec::new(), "Schema", "main").is_ok());
    }
}
