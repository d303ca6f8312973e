//! Query result rows and cursors.
//!
//! [`SqliteEngine::query`](crate::SqliteEngine::query) buffers its result set
//! into a [`Cursor`], which hands rows out through `fetch_one`,
//! `fetch_many`, and `fetch_all`. A cursor closes itself once exhausted by
//! any fetch operation; further fetches fail with
//! [`EngineError::CursorClosed`].
//!
//! Fetch operations default to converting each row into a string-keyed
//! [`serde_json::Map`] using the row's declared column names. The `_with`
//! variants accept a pluggable row adapter instead.

use std::collections::VecDeque;
use std::sync::Arc;

use rusqlite::types::Value;
use serde_json::{Map, Value as JsonValue};

use crate::error::{EngineError, Result};

/// A single fetched row: declared column names plus their values.
///
/// Column names are shared across all rows of one result set.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// The declared column names, in statement order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Looks up a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|idx| self.values.get(idx))
    }

    /// Looks up a value by position.
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// The default row adapter: converts the row into a string-keyed map
    /// using the declared column names.
    pub fn to_map(&self) -> Map<String, JsonValue> {
        self.columns
            .iter()
            .zip(&self.values)
            .map(|(name, value)| (name.clone(), value_to_json(value)))
            .collect()
    }
}

/// Converts a SQLite value into its generic JSON representation.
///
/// Blobs become arrays of byte values; a non-finite REAL (which SQLite
/// cannot represent) degrades to null.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Integer(i) => JsonValue::from(*i),
        Value::Real(r) => serde_json::Number::from_f64(*r)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Blob(bytes) => JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect()),
    }
}

/// A buffered result-set cursor.
///
/// Rows are handed out in statement order. The cursor closes itself once a
/// fetch exhausts it: [`fetch_one`](Self::fetch_one) and
/// [`fetch_all`](Self::fetch_all) close unconditionally, while
/// [`fetch_many`](Self::fetch_many) closes only when it returns an empty
/// batch. Fetching from a closed cursor is an error.
#[derive(Debug)]
pub struct Cursor {
    rows: VecDeque<Row>,
    closed: bool,
}

impl Cursor {
    pub(crate) fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into(),
            closed: false,
        }
    }

    /// Fetches the next row as a string-keyed map, or `None` when no rows
    /// remain. Closes the cursor either way.
    pub fn fetch_one(&mut self) -> Result<Option<Map<String, JsonValue>>> {
        self.fetch_one_with(Row::to_map)
    }

    /// Fetches the next row through `adapter`. Closes the cursor.
    pub fn fetch_one_with<T>(&mut self, mut adapter: impl FnMut(&Row) -> T) -> Result<Option<T>> {
        self.ensure_open()?;
        let row = self.rows.pop_front().map(|row| adapter(&row));
        self.close();
        Ok(row)
    }

    /// Fetches up to `size` rows as string-keyed maps.
    ///
    /// Returns an empty vector, and closes the cursor, once no rows remain.
    pub fn fetch_many(&mut self, size: usize) -> Result<Vec<Map<String, JsonValue>>> {
        self.fetch_many_with(size, Row::to_map)
    }

    /// Fetches up to `size` rows through `adapter`.
    pub fn fetch_many_with<T>(
        &mut self,
        size: usize,
        mut adapter: impl FnMut(&Row) -> T,
    ) -> Result<Vec<T>> {
        self.ensure_open()?;
        let count = size.min(self.rows.len());
        let rows: Vec<T> = self.rows.drain(..count).map(|row| adapter(&row)).collect();
        if rows.is_empty() {
            self.close();
        }
        Ok(rows)
    }

    /// Fetches all remaining rows as string-keyed maps and closes the cursor.
    pub fn fetch_all(&mut self) -> Result<Vec<Map<String, JsonValue>>> {
        self.fetch_all_with(Row::to_map)
    }

    /// Fetches all remaining rows through `adapter` and closes the cursor.
    pub fn fetch_all_with<T>(&mut self, mut adapter: impl FnMut(&Row) -> T) -> Result<Vec<T>> {
        self.ensure_open()?;
        let rows: Vec<T> = self.rows.drain(..).map(|row| adapter(&row)).collect();
        self.close();
        Ok(rows)
    }

    /// Number of rows not yet fetched.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Whether the cursor has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closes the cursor, discarding any unfetched rows.
    pub fn close(&mut self) {
        self.rows.clear();
        self.closed = true;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(EngineError::CursorClosed);
        }
        Ok(())
    }
}
