//! Exact decimal storage.
//!
//! SQLite has no exact-numeric column type, so decimals round-trip through
//! their textual representation. [`TextDecimal`] wraps
//! [`rust_decimal::Decimal`]: it binds as a BLOB of the canonical UTF-8
//! digit string, which no column affinity coerces, and reads back from
//! TEXT, BLOB, INTEGER, or REAL storage.

use rust_decimal::Decimal;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};

/// A [`Decimal`] stored as its canonical string form.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use sqlite_model_engine::{SqliteEngine, TextDecimal};
///
/// let engine = SqliteEngine::open(":memory:").unwrap();
/// engine.execute("CREATE TABLE prices (amount DECIMAL)", []).unwrap();
///
/// let amount: Decimal = "19.99".parse().unwrap();
/// engine
///     .execute("INSERT INTO prices VALUES (?1)", [TextDecimal(amount)])
///     .unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDecimal(pub Decimal);

impl From<Decimal> for TextDecimal {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<TextDecimal> for Decimal {
    fn from(value: TextDecimal) -> Self {
        value.0
    }
}

impl ToSql for TextDecimal {
    /// Binds the digit string as a BLOB. A `DECIMAL` column carries
    /// NUMERIC affinity, which would silently coerce a TEXT binding to
    /// REAL and lose exactness; BLOB storage is kept verbatim under every
    /// affinity.
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(Value::Blob(
            self.0.to_string().into_bytes(),
        )))
    }
}

impl FromSql for TextDecimal {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        fn parse(text: &str) -> FromSqlResult<TextDecimal> {
            text.parse::<Decimal>()
                .map(TextDecimal)
                .map_err(|err| FromSqlError::Other(Box::new(err)))
        }
        match value {
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|err| FromSqlError::Other(Box::new(err)))?;
                parse(text)
            }
            ValueRef::Integer(i) => Ok(TextDecimal(Decimal::from(i))),
            ValueRef::Real(r) => parse(&r.to_string()),
            ValueRef::Null => Err(FromSqlError::InvalidType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteEngine;

    #[test]
    fn test_decimal_round_trip_through_table() {
        let engine = SqliteEngine::open(":memory:").unwrap();
        engine
            .execute("CREATE TABLE prices (amount DECIMAL)", [])
            .unwrap();

        let amount: Decimal = "123.456".parse().unwrap();
        engine
            .execute("INSERT INTO prices VALUES (?1)", [TextDecimal(amount)])
            .unwrap();

        let mut cursor = engine.query("SELECT amount FROM prices", []).unwrap();
        let rows = cursor
            .fetch_all_with(|row| match row.get("amount") {
                Some(Value::Blob(bytes)) => std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|text| text.parse::<Decimal>().ok()),
                _ => None,
            })
            .unwrap();
        assert_eq!(rows, vec![Some(amount)]);
    }

    #[test]
    fn test_numeric_affinity_does_not_coerce_the_binding() {
        // BLOB storage is affinity-proof; the stored type stays "blob"
        // even in a DECIMAL (NUMERIC affinity) column.
        let engine = SqliteEngine::open(":memory:").unwrap();
        engine
            .execute("CREATE TABLE prices (amount DECIMAL)", [])
            .unwrap();
        let amount: Decimal = "123.456".parse().unwrap();
        engine
            .execute("INSERT INTO prices VALUES (?1)", [TextDecimal(amount)])
            .unwrap();

        let mut cursor = engine
            .query("SELECT typeof(amount) AS t FROM prices", [])
            .unwrap();
        assert_eq!(
            cursor.fetch_one().unwrap().unwrap()["t"],
            serde_json::json!("blob")
        );
    }

    #[test]
    fn test_column_result_accepts_every_storage_class() {
        let expected: Decimal = "1.5".parse().unwrap();
        assert_eq!(
            TextDecimal::column_result(ValueRef::Text(b"1.5")).unwrap(),
            TextDecimal(expected)
        );
        assert_eq!(
            TextDecimal::column_result(ValueRef::Blob(b"1.5")).unwrap(),
            TextDecimal(expected)
        );
        assert_eq!(
            TextDecimal::column_result(ValueRef::Real(1.5)).unwrap(),
            TextDecimal(expected)
        );
        assert_eq!(
            TextDecimal::column_result(ValueRef::Integer(7)).unwrap(),
            TextDecimal(Decimal::from(7))
        );
        assert!(TextDecimal::column_result(ValueRef::Null).is_err());
        assert!(TextDecimal::column_result(ValueRef::Text(b"not a number")).is_err());
    }

    #[test]
    fn test_decimal_conversions() {
        let amount: Decimal = "1.5".parse().unwrap();
        let wrapped = TextDecimal::from(amount);
        assert_eq!(Decimal::from(wrapped), amount);
    }
}
