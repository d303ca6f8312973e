//! Column constraints.
//!
//! A [`PrimaryKey`] is a small entity of its own: it carries a name, an
//! ordering direction, an on-conflict resolution algorithm, and an
//! autoincrement flag, all backed by immutable attribute slots.

use std::fmt;

use crate::error::{ModelError, Result};
use crate::slot::Slot;

/// Primary-key ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending (the default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// The SQL keyword for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Parses a direction case-insensitively.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidOrder`] for anything other than `ASC`/`DESC`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(ModelError::InvalidOrder(value.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conflict-resolution algorithm for a constraint violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnConflict {
    /// Roll back the enclosing transaction.
    Rollback,
    /// Abort the statement, keeping prior changes (the default).
    #[default]
    Abort,
    /// Fail the statement, keeping its prior row changes.
    Fail,
    /// Skip the conflicting row.
    Ignore,
    /// Replace the conflicting row.
    Replace,
}

impl OnConflict {
    /// The SQL keyword for this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            OnConflict::Rollback => "ROLLBACK",
            OnConflict::Abort => "ABORT",
            OnConflict::Fail => "FAIL",
            OnConflict::Ignore => "IGNORE",
            OnConflict::Replace => "REPLACE",
        }
    }

    /// Parses an algorithm case-insensitively, normalizing to the
    /// uppercase enumeration.
    ///
    /// # Errors
    ///
    /// [`ModelError::ConflictResolution`] naming the allowed set for any
    /// other input.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_uppercase().as_str() {
            "ROLLBACK" => Ok(OnConflict::Rollback),
            "ABORT" => Ok(OnConflict::Abort),
            "FAIL" => Ok(OnConflict::Fail),
            "IGNORE" => Ok(OnConflict::Ignore),
            "REPLACE" => Ok(OnConflict::Replace),
            _ => Err(ModelError::ConflictResolution(value.to_string())),
        }
    }
}

impl fmt::Display for OnConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options accepted by [`PrimaryKey::with_options`].
#[derive(Debug, Clone, Default)]
pub struct PrimaryKeyOptions {
    /// Ordering direction; ascending by default.
    pub order: SortOrder,
    /// Conflict-resolution algorithm; abort by default.
    pub on_conflict: OnConflict,
    /// Whether the key autoincrements; off by default.
    pub autoincrement: bool,
}

/// A primary-key constraint.
///
/// # Examples
///
/// ```
/// use sqlite_model_core::{OnConflict, PrimaryKey, PrimaryKeyOptions, SortOrder};
///
/// let pk = PrimaryKey::new("pk_users").unwrap();
/// assert_eq!(pk.order(), SortOrder::Asc);
/// assert_eq!(pk.on_conflict(), OnConflict::Abort);
/// assert!(!pk.autoincrement());
///
/// let custom = PrimaryKey::with_options(
///     "pk_events",
///     PrimaryKeyOptions {
///         order: SortOrder::Desc,
///         on_conflict: OnConflict::parse("replace").unwrap(),
///         autoincrement: true,
///     },
/// )
/// .unwrap();
/// assert_eq!(custom.on_conflict(), OnConflict::Replace);
/// ```
#[derive(Debug, Clone)]
pub struct PrimaryKey {
    pub(crate) name: Slot<String>,
    pub(crate) order: Slot<SortOrder>,
    pub(crate) on_conflict: Slot<OnConflict>,
    pub(crate) autoincrement: Slot<bool>,
}

impl PrimaryKey {
    /// Creates a primary key with default ordering, conflict resolution,
    /// and autoincrement.
    pub fn new(name: &str) -> Result<Self> {
        Self::with_options(name, PrimaryKeyOptions::default())
    }

    /// Creates a primary key with explicit options.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidValue`] if the name is empty.
    pub fn with_options(name: &str, options: PrimaryKeyOptions) -> Result<Self> {
        let mut name_slot = Slot::immutable_string("PrimaryKey", "name");
        name_slot.set(name.to_string())?;

        let mut order = Slot::immutable("PrimaryKey", "order");
        order.set(options.order)?;

        let mut on_conflict = Slot::immutable("PrimaryKey", "on_conflict");
        on_conflict.set(options.on_conflict)?;

        let mut autoincrement = Slot::immutable("PrimaryKey", "autoincrement");
        autoincrement.set(options.autoincrement)?;

        Ok(Self {
            name: name_slot,
            order,
            on_conflict,
            autoincrement,
        })
    }

    /// The constraint name.
    pub fn name(&self) -> String {
        self.name.get().cloned().unwrap_or_default()
    }

    /// The ordering direction.
    pub fn order(&self) -> SortOrder {
        self.order.get().copied().unwrap_or_default()
    }

    /// The conflict-resolution algorithm.
    pub fn on_conflict(&self) -> OnConflict {
        self.on_conflict.get().copied().unwrap_or_default()
    }

    /// Whether the key autoincrements.
    pub fn autoincrement(&self) -> bool {
        self.autoincrement.get().copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let pk = PrimaryKey::new("pk").unwrap();
        assert_eq!(pk.name(), "pk");
        assert_eq!(pk.order(), SortOrder::Asc);
        assert_eq!(pk.on_conflict(), OnConflict::Abort);
        assert!(!pk.autoincrement());
    }

    #[test]
    fn test_on_conflict_parse_normalizes_case() {
        assert_eq!(OnConflict::parse("rollback").unwrap(), OnConflict::Rollback);
        assert_eq!(OnConflict::parse("Ignore").unwrap(), OnConflict::Ignore);
        assert_eq!(OnConflict::parse("REPLACE").unwrap(), OnConflict::Replace);
    }

    #[test]
    fn test_on_conflict_parse_rejects_unknown() {
        let err = OnConflict::parse("explode").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ROLLBACK, ABORT, FAIL, IGNORE, REPLACE"));
        assert!(message.contains("explode"));
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("desc").unwrap(), SortOrder::Desc);
        assert_eq!(SortOrder::parse("ASC").unwrap(), SortOrder::Asc);
        assert!(SortOrder::parse("sideways").is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(PrimaryKey::new("").is_err());
    }
}
