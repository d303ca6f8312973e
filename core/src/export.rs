//! JSON export of the schema graph.
//!
//! [`ToValue`] renders an entity and everything below it as a
//! `serde_json::Value`, with maps in collection insertion order. The graph
//! is cyclic (children hold back-references to their parents), so a
//! parent reference is exported as the parent's name rather than by
//! recursing upward.

use serde_json::{Map, Value};

use crate::constraint::PrimaryKey;
use crate::model::{Column, Index, Schema, Table, Trigger, View};

/// Conversion of a schema entity into a JSON value.
pub trait ToValue {
    /// Renders the entity as a JSON value.
    fn to_value(&self) -> Value;

    /// Renders the entity as a compact JSON string.
    fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

fn engine_value(engine: Option<sqlite_model_engine::SqliteEngine>) -> Value {
    match engine {
        Some(engine) => Value::String(engine.path().to_string()),
        None => Value::Null,
    }
}

fn entries_value<T: ToValue>(entries: Vec<(String, T)>) -> Value {
    let mut map = Map::new();
    for (key, entity) in entries {
        map.insert(key, entity.to_value());
    }
    Value::Object(map)
}

impl ToValue for Schema {
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name()));
        map.insert("engine".to_string(), engine_value(self.engine()));
        map.insert("tables".to_string(), entries_value(self.table_entries()));
        map.insert("indexes".to_string(), entries_value(self.index_entries()));
        map.insert("views".to_string(), entries_value(self.view_entries()));
        map.insert(
            "triggers".to_string(),
            entries_value(self.trigger_entries()),
        );
        Value::Object(map)
    }
}

impl ToValue for Table {
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name()));
        // Upward reference by name only, never by recursion.
        map.insert(
            "schema".to_string(),
            self.schema()
                .map_or(Value::Null, |schema| Value::String(schema.name())),
        );
        map.insert("engine".to_string(), engine_value(self.engine()));
        map.insert("row_id".to_string(), Value::Bool(self.row_id()));
        map.insert("columns".to_string(), entries_value(self.column_entries()));
        Value::Object(map)
    }
}

impl ToValue for Column {
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name()));
        map.insert("type".to_string(), Value::String(self.column_type()));
        map.insert("null".to_string(), Value::Bool(self.null()));
        map.insert("unique".to_string(), Value::Bool(self.unique()));
        map.insert("index".to_string(), Value::Bool(self.index()));
        map.insert(
            "table".to_string(),
            self.table()
                .map_or(Value::Null, |table| Value::String(table.name())),
        );
        // An absent constraint renders as `false`, not `null`.
        map.insert(
            "primary_key".to_string(),
            self.primary_key()
                .map_or(Value::Bool(false), |constraint| constraint.to_value()),
        );
        Value::Object(map)
    }
}

impl ToValue for PrimaryKey {
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name()));
        map.insert(
            "order".to_string(),
            Value::String(self.order().as_str().to_string()),
        );
        map.insert(
            "on_conflict".to_string(),
            Value::String(self.on_conflict().as_str().to_string()),
        );
        map.insert(
            "autoincrement".to_string(),
            Value::Bool(self.autoincrement()),
        );
        Value::Object(map)
    }
}

macro_rules! named_item_value {
    ($ty:ty) => {
        impl ToValue for $ty {
            fn to_value(&self) -> Value {
                let mut map = Map::new();
                map.insert("name".to_string(), Value::String(self.name()));
                map.insert(
                    "schema".to_string(),
                    self.schema()
                        .map_or(Value::Null, |schema| Value::String(schema.name())),
                );
                Value::Object(map)
            }
        }
    };
}

named_item_value!(Index);
named_item_value!(View);
named_item_value!(Trigger);
