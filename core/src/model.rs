//! The schema object graph.
//!
//! Entities are cheap cloneable handles over shared interior state:
//! cloning a [`Table`] yields another handle to the same table, and
//! equality is handle identity. Children hold weak back-references to
//! their parents, so a registered child can resolve its schema, and
//! through it the attached engine, without keeping the parent alive.
//!
//! Registration wires both directions at once: `add_table` binds the
//! table's schema back-reference (a one-time write) and then inserts the
//! handle into the schema's `tables` collection. A child therefore belongs
//! to exactly one parent for its whole life.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use sqlite_model_engine::SqliteEngine;

use crate::args::{self, ModelArg};
use crate::collection::{Collection, CollectionItem};
use crate::constraint::PrimaryKey;
use crate::error::Result;
use crate::slot::Slot;

pub(crate) struct SchemaInner {
    name: Slot<String>,
    engine: Slot<SqliteEngine>,
    tables: Collection<Table>,
    indexes: Collection<Index>,
    views: Collection<View>,
    triggers: Collection<Trigger>,
}

/// A database schema: the root of the object graph.
///
/// Holds keyed collections of tables, indexes, views, and triggers, plus
/// an optional engine handle that children resolve through their
/// back-references.
///
/// # Examples
///
/// ```
/// use sqlite_model_core::{Column, ModelArg, Schema, Table};
///
/// let schema = Schema::new("main").unwrap();
/// let users = Table::with_args(
///     "users",
///     &schema,
///     vec![ModelArg::from(Column::new("id").unwrap())],
/// )
/// .unwrap();
/// assert_eq!(users.schema().unwrap(), schema);
/// assert_eq!(schema.table("users").unwrap(), users);
/// ```
#[derive(Clone)]
pub struct Schema(pub(crate) Rc<RefCell<SchemaInner>>);

impl Schema {
    /// Creates an empty schema. The name case-folds and must be `main` or
    /// `temp`.
    pub fn new(name: &str) -> Result<Self> {
        Self::with_args(name, Vec::new())
    }

    /// Creates a schema and registers every recognized argument: an
    /// engine handle plus any tables, indexes, views, and triggers, each
    /// optionally wrapped in [`keyed`](crate::keyed).
    ///
    /// # Errors
    ///
    /// [`ModelError::UnresolvedArguments`](crate::ModelError::UnresolvedArguments)
    /// if any argument is left unconsumed, plus whatever registration of a
    /// recognized argument raises.
    pub fn with_args(name: &str, mut arguments: Vec<ModelArg>) -> Result<Self> {
        let mut name_slot = Slot::schema_name("Schema", "name");
        name_slot.set(name.to_string())?;
        let schema = Self(Rc::new(RefCell::new(SchemaInner {
            name: name_slot,
            engine: Slot::immutable("Schema", "engine"),
            tables: Collection::open("tables"),
            indexes: Collection::open("indexes"),
            views: Collection::open("views"),
            triggers: Collection::open("triggers"),
        })));
        for (_, engine) in args::drain_engines(&mut arguments) {
            schema.set_engine(engine)?;
        }
        for (key, table) in args::drain_tables(&mut arguments) {
            schema.add_table(key.as_deref(), &table)?;
        }
        for (key, index) in args::drain_indexes(&mut arguments) {
            schema.add_index(key.as_deref(), &index)?;
        }
        for (key, view) in args::drain_views(&mut arguments) {
            schema.add_view(key.as_deref(), &view)?;
        }
        for (key, trigger) in args::drain_triggers(&mut arguments) {
            schema.add_trigger(key.as_deref(), &trigger)?;
        }
        args::ensure_resolved(arguments, "Schema", &schema.name())?;
        Ok(schema)
    }

    /// The schema's name, always lowercase.
    pub fn name(&self) -> String {
        self.0.borrow().name.get().cloned().unwrap_or_default()
    }

    /// The attached engine handle, if any.
    pub fn engine(&self) -> Option<SqliteEngine> {
        self.0.borrow().engine.get().cloned()
    }

    /// Attaches the engine handle. One-time write.
    pub fn set_engine(&self, engine: SqliteEngine) -> Result<()> {
        self.0.borrow_mut().engine.set(engine)
    }

    /// Registers a table under `key`, defaulting to the table's name.
    ///
    /// # Errors
    ///
    /// Fails if the table already belongs to a schema, or on a key or
    /// value conflict in the `tables` collection.
    pub fn add_table(&self, key: Option<&str>, table: &Table) -> Result<()> {
        table.bind_schema(self)?;
        let key = key.map_or_else(|| table.name(), str::to_string);
        self.0.borrow_mut().tables.insert(key, table.clone())
    }

    /// Registers an index under `key`, defaulting to the index's name.
    pub fn add_index(&self, key: Option<&str>, index: &Index) -> Result<()> {
        index.bind_schema(self)?;
        let key = key.map_or_else(|| index.name(), str::to_string);
        self.0.borrow_mut().indexes.insert(key, index.clone())
    }

    /// Registers a view under `key`, defaulting to the view's name.
    pub fn add_view(&self, key: Option<&str>, view: &View) -> Result<()> {
        view.bind_schema(self)?;
        let key = key.map_or_else(|| view.name(), str::to_string);
        self.0.borrow_mut().views.insert(key, view.clone())
    }

    /// Registers a trigger under `key`, defaulting to the trigger's name.
    pub fn add_trigger(&self, key: Option<&str>, trigger: &Trigger) -> Result<()> {
        trigger.bind_schema(self)?;
        let key = key.map_or_else(|| trigger.name(), str::to_string);
        self.0.borrow_mut().triggers.insert(key, trigger.clone())
    }

    /// Looks up a table by key.
    pub fn table(&self, key: &str) -> Result<Table> {
        self.0.borrow().tables.get(key).map(Clone::clone)
    }

    /// Looks up an index by key.
    pub fn index(&self, key: &str) -> Result<Index> {
        self.0.borrow().indexes.get(key).map(Clone::clone)
    }

    /// Looks up a view by key.
    pub fn view(&self, key: &str) -> Result<View> {
        self.0.borrow().views.get(key).map(Clone::clone)
    }

    /// Looks up a trigger by key.
    pub fn trigger(&self, key: &str) -> Result<Trigger> {
        self.0.borrow().triggers.get(key).map(Clone::clone)
    }

    /// Registered tables in insertion order.
    pub fn tables(&self) -> Vec<Table> {
        self.0.borrow().tables.values().cloned().collect()
    }

    /// Table keys in insertion order.
    pub fn table_keys(&self) -> Vec<String> {
        self.0.borrow().tables.keys().map(str::to_string).collect()
    }

    pub(crate) fn table_entries(&self) -> Vec<(String, Table)> {
        self.0
            .borrow()
            .tables
            .iter()
            .map(|(key, table)| (key.to_string(), table.clone()))
            .collect()
    }

    pub(crate) fn index_entries(&self) -> Vec<(String, Index)> {
        self.0
            .borrow()
            .indexes
            .iter()
            .map(|(key, index)| (key.to_string(), index.clone()))
            .collect()
    }

    pub(crate) fn view_entries(&self) -> Vec<(String, View)> {
        self.0
            .borrow()
            .views
            .iter()
            .map(|(key, view)| (key.to_string(), view.clone()))
            .collect()
    }

    pub(crate) fn trigger_entries(&self) -> Vec<(String, Trigger)> {
        self.0
            .borrow()
            .triggers
            .iter()
            .map(|(key, trigger)| (key.to_string(), trigger.clone()))
            .collect()
    }
}

impl PartialEq for Schema {
    /// Handle identity: two handles are equal iff they share state.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema('{}')", self.name())
    }
}

pub(crate) struct TableInner {
    name: Slot<String>,
    schema: Slot<Weak<RefCell<SchemaInner>>>,
    engine: Slot<SqliteEngine>,
    row_id: Slot<bool>,
    columns: Collection<Column>,
}

/// A table: a keyed collection of columns plus a rowid flag.
///
/// Reads its engine from its own slot first and falls back to the owning
/// schema's engine when the local slot is unset.
#[derive(Clone)]
pub struct Table(pub(crate) Rc<RefCell<TableInner>>);

impl Table {
    /// Creates a table that is not yet registered with any schema.
    pub fn build(name: &str) -> Result<Self> {
        let mut name_slot = Slot::immutable_string("Table", "name");
        name_slot.set(name.to_string())?;
        Ok(Self(Rc::new(RefCell::new(TableInner {
            name: name_slot,
            schema: Slot::immutable("Table", "schema"),
            engine: Slot::immutable("Table", "engine"),
            row_id: Slot::immutable("Table", "row_id"),
            columns: Collection::open("columns"),
        }))))
    }

    /// Creates a table and registers it with `schema` under its own name.
    pub fn new(name: &str, schema: &Schema) -> Result<Self> {
        let table = Self::build(name)?;
        schema.add_table(None, &table)?;
        Ok(table)
    }

    /// Creates a table, registers it with `schema`, and then registers
    /// every recognized argument: an engine handle, a rowid flag, and any
    /// columns, each optionally wrapped in [`keyed`](crate::keyed).
    ///
    /// Registration with the schema happens before column resolution, so
    /// a column argument that fails to register reports against a table
    /// the schema already knows.
    pub fn with_args(name: &str, schema: &Schema, mut arguments: Vec<ModelArg>) -> Result<Self> {
        let table = Self::build(name)?;
        schema.add_table(None, &table)?;
        for (_, engine) in args::drain_engines(&mut arguments) {
            table.set_engine(engine)?;
        }
        for (_, row_id) in args::drain_row_ids(&mut arguments) {
            table.set_row_id(row_id)?;
        }
        for (key, column) in args::drain_columns(&mut arguments) {
            table.add_column(key.as_deref(), &column)?;
        }
        args::ensure_resolved(arguments, "Table", name)?;
        Ok(table)
    }

    /// The table's name.
    pub fn name(&self) -> String {
        self.0.borrow().name.get().cloned().unwrap_or_default()
    }

    /// The owning schema, if registered.
    pub fn schema(&self) -> Option<Schema> {
        self.0
            .borrow()
            .schema
            .get()
            .and_then(Weak::upgrade)
            .map(Schema)
    }

    /// The engine this table resolves to: its own slot, else the owning
    /// schema's engine.
    pub fn engine(&self) -> Option<SqliteEngine> {
        let local = self.0.borrow().engine.get().cloned();
        local.or_else(|| self.schema().and_then(|schema| schema.engine()))
    }

    /// Attaches a table-local engine handle, shadowing the schema's.
    /// One-time write.
    pub fn set_engine(&self, engine: SqliteEngine) -> Result<()> {
        self.0.borrow_mut().engine.set(engine)
    }

    /// Whether the table keeps its implicit rowid. Defaults to `true`.
    pub fn row_id(&self) -> bool {
        self.0.borrow().row_id.get().copied().unwrap_or(true)
    }

    /// Sets the rowid flag. One-time write.
    pub fn set_row_id(&self, row_id: bool) -> Result<()> {
        self.0.borrow_mut().row_id.set(row_id)
    }

    /// Registers a column under `key`, defaulting to the column's name.
    ///
    /// # Errors
    ///
    /// Fails if the column already belongs to a table, or on a key or
    /// value conflict in the `columns` collection.
    pub fn add_column(&self, key: Option<&str>, column: &Column) -> Result<()> {
        column.bind_table(self)?;
        let key = key.map_or_else(|| column.name(), str::to_string);
        self.0.borrow_mut().columns.insert(key, column.clone())
    }

    /// Looks up a column by key.
    pub fn column(&self, key: &str) -> Result<Column> {
        self.0.borrow().columns.get(key).map(Clone::clone)
    }

    /// Registered columns in insertion order.
    pub fn columns(&self) -> Vec<Column> {
        self.0.borrow().columns.values().cloned().collect()
    }

    /// Column keys in insertion order.
    pub fn column_keys(&self) -> Vec<String> {
        self.0.borrow().columns.keys().map(str::to_string).collect()
    }

    pub(crate) fn column_entries(&self) -> Vec<(String, Column)> {
        self.0
            .borrow()
            .columns
            .iter()
            .map(|(key, column)| (key.to_string(), column.clone()))
            .collect()
    }

    pub(crate) fn bind_schema(&self, schema: &Schema) -> Result<()> {
        self.0.borrow_mut().schema.set(Rc::downgrade(&schema.0))
    }
}

impl CollectionItem for Table {
    fn item_name(&self) -> String {
        self.name()
    }
    fn same_item(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table('{}')", self.name())
    }
}

pub(crate) struct ColumnInner {
    name: Slot<String>,
    column_type: Slot<String>,
    table: Slot<Weak<RefCell<TableInner>>>,
    primary_key: Slot<PrimaryKey>,
    null: Slot<bool>,
    unique: Slot<bool>,
    index: Slot<bool>,
}

/// Options accepted by [`Column::with_options`].
#[derive(Debug, Clone)]
pub struct ColumnOptions {
    /// SQL type affinity; `TEXT` when omitted.
    pub column_type: Option<String>,
    /// Primary-key constraint, if any.
    pub primary_key: Option<PrimaryKey>,
    /// Whether the column accepts NULL. Defaults to `true`.
    pub null: bool,
    /// Whether the column carries a UNIQUE constraint.
    pub unique: bool,
    /// Whether the column should be indexed.
    pub index: bool,
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            column_type: None,
            primary_key: None,
            null: true,
            unique: false,
            index: false,
        }
    }
}

/// A table column with a type affinity and an optional primary-key
/// constraint.
#[derive(Clone)]
pub struct Column(pub(crate) Rc<RefCell<ColumnInner>>);

impl Column {
    /// Creates a `TEXT` column that is not yet registered with any table.
    pub fn new(name: &str) -> Result<Self> {
        Self::with_options(name, ColumnOptions::default())
    }

    /// Creates a column with an explicit type affinity.
    pub fn with_type(name: &str, column_type: &str) -> Result<Self> {
        Self::with_options(
            name,
            ColumnOptions {
                column_type: Some(column_type.to_string()),
                ..ColumnOptions::default()
            },
        )
    }

    /// Creates a column with explicit options.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidValue`](crate::ModelError::InvalidValue) if the
    /// name or type is empty.
    pub fn with_options(name: &str, options: ColumnOptions) -> Result<Self> {
        let mut name_slot = Slot::immutable_string("Column", "name");
        name_slot.set(name.to_string())?;
        let mut type_slot = Slot::immutable_string("Column", "type");
        type_slot.set(options.column_type.unwrap_or_else(|| "TEXT".to_string()))?;
        let mut primary_key = Slot::immutable("Column", "primary_key");
        if let Some(constraint) = options.primary_key {
            primary_key.set(constraint)?;
        }
        let mut null = Slot::immutable("Column", "null");
        null.set(options.null)?;
        let mut unique = Slot::immutable("Column", "unique");
        unique.set(options.unique)?;
        let mut index = Slot::immutable("Column", "index");
        index.set(options.index)?;
        Ok(Self(Rc::new(RefCell::new(ColumnInner {
            name: name_slot,
            column_type: type_slot,
            table: Slot::immutable("Column", "table"),
            primary_key,
            null,
            unique,
            index,
        }))))
    }

    /// The column's name.
    pub fn name(&self) -> String {
        self.0.borrow().name.get().cloned().unwrap_or_default()
    }

    /// The column's type affinity. Fixed at construction.
    pub fn column_type(&self) -> String {
        self.0.borrow().column_type.get().cloned().unwrap_or_default()
    }

    /// The primary-key constraint, if any. Fixed at construction.
    pub fn primary_key(&self) -> Option<PrimaryKey> {
        self.0.borrow().primary_key.get().cloned()
    }

    /// Whether the column accepts NULL. Defaults to `true`. Fixed at
    /// construction.
    pub fn null(&self) -> bool {
        self.0.borrow().null.get().copied().unwrap_or(true)
    }

    /// Whether the column carries a UNIQUE constraint. Fixed at
    /// construction.
    pub fn unique(&self) -> bool {
        self.0.borrow().unique.get().copied().unwrap_or_default()
    }

    /// Whether the column should be indexed. Fixed at construction.
    pub fn index(&self) -> bool {
        self.0.borrow().index.get().copied().unwrap_or_default()
    }

    /// The owning table, if registered.
    pub fn table(&self) -> Option<Table> {
        self.0
            .borrow()
            .table
            .get()
            .and_then(Weak::upgrade)
            .map(Table)
    }

    /// The owning schema, reached through the owning table.
    pub fn schema(&self) -> Option<Schema> {
        self.table().and_then(|table| table.schema())
    }

    /// The engine reachable through the owning table.
    pub fn engine(&self) -> Option<SqliteEngine> {
        self.table().and_then(|table| table.engine())
    }

    pub(crate) fn bind_table(&self, table: &Table) -> Result<()> {
        self.0.borrow_mut().table.set(Rc::downgrade(&table.0))
    }
}

impl CollectionItem for Column {
    fn item_name(&self) -> String {
        self.name()
    }
    fn same_item(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column('{}')", self.name())
    }
}

macro_rules! schema_item {
    ($(#[$meta:meta])* $handle:ident, $inner:ident, $type_name:literal) => {
        pub(crate) struct $inner {
            name: Slot<String>,
            schema: Slot<Weak<RefCell<SchemaInner>>>,
        }

        $(#[$meta])*
        #[derive(Clone)]
        pub struct $handle(pub(crate) Rc<RefCell<$inner>>);

        impl $handle {
            /// Creates a detached item; register it through
            /// [`Schema::with_args`] or the schema's matching `add_`
            /// method.
            pub fn new(name: &str) -> Result<Self> {
                let mut name_slot = Slot::immutable_string($type_name, "name");
                name_slot.set(name.to_string())?;
                Ok(Self(Rc::new(RefCell::new($inner {
                    name: name_slot,
                    schema: Slot::immutable($type_name, "schema"),
                }))))
            }

            /// The item's name.
            pub fn name(&self) -> String {
                self.0.borrow().name.get().cloned().unwrap_or_default()
            }

            /// The owning schema, if registered.
            pub fn schema(&self) -> Option<Schema> {
                self.0
                    .borrow()
                    .schema
                    .get()
                    .and_then(Weak::upgrade)
                    .map(Schema)
            }

            /// The engine reachable through the owning schema.
            pub fn engine(&self) -> Option<SqliteEngine> {
                self.schema().and_then(|schema| schema.engine())
            }

            pub(crate) fn bind_schema(&self, schema: &Schema) -> Result<()> {
                self.0.borrow_mut().schema.set(Rc::downgrade(&schema.0))
            }
        }

        impl CollectionItem for $handle {
            fn item_name(&self) -> String {
                self.name()
            }
            fn same_item(&self, other: &Self) -> bool {
                Rc::ptr_eq(&self.0, &other.0)
            }
        }

        impl PartialEq for $handle {
            fn eq(&self, other: &Self) -> bool {
                Rc::ptr_eq(&self.0, &other.0)
            }
        }

        impl fmt::Debug for $handle {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($type_name, "('{}')"), self.name())
            }
        }
    };
}

schema_item! {
    /// A named index registered with a schema.
    Index, IndexInner, "Index"
}

schema_item! {
    /// A named view registered with a schema.
    View, ViewInner, "View"
}

schema_item! {
    /// A named trigger registered with a schema.
    Trigger, TriggerInner, "Trigger"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::keyed;
    use crate::constraint::{OnConflict, PrimaryKey};
    use crate::error::ModelError;

    #[test]
    fn test_schema_name_case_folds() {
        let schema = Schema::new("MAIN").unwrap();
        assert_eq!(schema.name(), "main");
        assert!(matches!(
            Schema::new("other"),
            Err(ModelError::SchemaName(name)) if name == "other"
        ));
    }

    #[test]
    fn test_table_registration_wires_both_directions() {
        let schema = Schema::new("main").unwrap();
        let table = Table::new("users", &schema).unwrap();
        assert_eq!(table.schema().unwrap(), schema);
        assert_eq!(schema.table("users").unwrap(), table);
        assert_eq!(schema.table_keys(), vec!["users"]);
    }

    #[test]
    fn test_table_belongs_to_one_schema_for_life() {
        let first = Schema::new("main").unwrap();
        let second = Schema::new("temp").unwrap();
        let table = Table::new("users", &first).unwrap();
        assert!(matches!(
            second.add_table(None, &table),
            Err(ModelError::ImmutableUpdate {
                owner: "Table",
                attribute: "schema"
            })
        ));
    }

    #[test]
    fn test_with_args_registers_bare_and_keyed_columns() {
        let schema = Schema::new("main").unwrap();
        let table = Table::with_args(
            "t",
            &schema,
            vec![
                ModelArg::from(Column::new("a").unwrap()),
                keyed("b", Column::with_type("other_name", "INTEGER").unwrap()),
            ],
        )
        .unwrap();
        assert_eq!(table.column_keys(), vec!["a", "b"]);
        assert_eq!(table.column("b").unwrap().name(), "other_name");
    }

    #[test]
    fn test_with_args_rejects_leftover_arguments() {
        let schema = Schema::new("main").unwrap();
        let err = Table::with_args(
            "t",
            &schema,
            vec![ModelArg::from(Index::new("idx").unwrap())],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::UnresolvedArguments { .. }));
        // Registration happened before argument resolution failed.
        assert!(schema.table("t").is_ok());
    }

    #[test]
    fn test_schema_with_args_registers_all_item_kinds() {
        let schema = Schema::with_args(
            "main",
            vec![
                ModelArg::from(Table::build("users").unwrap()),
                ModelArg::from(Index::new("idx_users").unwrap()),
                ModelArg::from(View::new("v_users").unwrap()),
                ModelArg::from(Trigger::new("trg_users").unwrap()),
            ],
        )
        .unwrap();
        assert!(schema.table("users").is_ok());
        assert!(schema.index("idx_users").is_ok());
        assert!(schema.view("v_users").is_ok());
        assert!(schema.trigger("trg_users").is_ok());
        assert_eq!(schema.index("idx_users").unwrap().schema().unwrap(), schema);
    }

    #[test]
    fn test_duplicate_table_key_rejected() {
        let schema = Schema::new("main").unwrap();
        Table::new("users", &schema).unwrap();
        let err = Table::new("users", &schema).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateKey { key, .. } if key == "users"));
    }

    #[test]
    fn test_engine_falls_back_from_table_to_schema() {
        let schema = Schema::new("main").unwrap();
        let table = Table::new("users", &schema).unwrap();
        let column = Column::new("id").unwrap();
        table.add_column(None, &column).unwrap();
        assert!(table.engine().is_none());

        let engine = SqliteEngine::open(":memory:").unwrap();
        schema.set_engine(engine.clone()).unwrap();
        assert_eq!(table.engine().unwrap(), engine);
        assert_eq!(column.engine().unwrap(), engine);

        // A table-local engine shadows the schema's.
        let local = SqliteEngine::open(":memory:").unwrap();
        table.set_engine(local.clone()).unwrap();
        assert_eq!(table.engine().unwrap(), local);
    }

    #[test]
    fn test_row_id_defaults_to_true() {
        let schema = Schema::new("main").unwrap();
        let table =
            Table::with_args("t", &schema, vec![ModelArg::RowId(false)]).unwrap();
        assert!(!table.row_id());
        assert!(Table::build("u").unwrap().row_id());
    }

    #[test]
    fn test_column_defaults() {
        let column = Column::new("id").unwrap();
        assert_eq!(column.column_type(), "TEXT");
        assert!(column.primary_key().is_none());
        assert!(column.null());
        assert!(!column.unique());
        assert!(!column.index());
    }

    #[test]
    fn test_column_attributes_are_fixed_at_construction() {
        let column = Column::with_options(
            "id",
            ColumnOptions {
                column_type: Some("INTEGER".to_string()),
                primary_key: Some(PrimaryKey::new("pk").unwrap()),
                null: false,
                unique: true,
                index: true,
            },
        )
        .unwrap();
        assert_eq!(column.column_type(), "INTEGER");
        assert!(!column.null());
        assert!(column.unique());
        assert!(column.index());
        let constraint = column.primary_key().unwrap();
        assert_eq!(constraint.name(), "pk");
        assert_eq!(constraint.on_conflict(), OnConflict::Abort);
    }

    #[test]
    fn test_row_id_is_a_one_time_write() {
        let table = Table::build("t").unwrap();
        table.set_row_id(false).unwrap();
        assert!(matches!(
            table.set_row_id(true),
            Err(ModelError::ImmutableUpdate {
                owner: "Table",
                attribute: "row_id"
            })
        ));
        assert!(!table.row_id());
    }

    #[test]
    fn test_detached_column_resolves_nothing() {
        let column = Column::new("id").unwrap();
        assert!(column.table().is_none());
        assert!(column.schema().is_none());
        assert!(column.engine().is_none());
    }

    #[test]
    fn test_handle_clone_is_identity() {
        let table = Table::build("t").unwrap();
        let alias = table.clone();
        assert_eq!(table, alias);
        assert_ne!(table, Table::build("t").unwrap());
    }
}
