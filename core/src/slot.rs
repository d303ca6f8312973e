//! Managed attribute slots.
//!
//! A [`Slot`] is the storage cell behind every attribute of a schema
//! entity: it records the owning type and attribute names (for error
//! messages), an optional validation rule that may normalize the value, and
//! an immutability flag enforcing one-time writes.
//!
//! Fallback delegation ("if unset locally, read the same attribute from a
//! related entity") is intentionally not part of the slot itself; the
//! owning entity's accessor method chains to the fallback explicitly, e.g.
//! [`Table::engine`](crate::Table::engine) consults its schema when the
//! local slot is unset.

use crate::error::{ModelError, Result};

/// A validation rule applied on every write.
///
/// Receives the owning type name and attribute name for error reporting and
/// may return a normalized value (e.g. case-folded).
pub type Validator<T> = fn(&'static str, &'static str, T) -> Result<T>;

/// A per-attribute storage cell with validation and optional one-time-write
/// enforcement.
///
/// # Examples
///
/// ```
/// use sqlite_model_core::Slot;
///
/// let mut slot = Slot::immutable_string("Table", "name");
/// slot.set("users".to_string()).unwrap();
/// assert_eq!(slot.get(), Some(&"users".to_string()));
///
/// // One-time write: the second set fails.
/// assert!(slot.set("accounts".to_string()).is_err());
/// // So does deletion.
/// assert!(slot.unset().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Slot<T> {
    owner: &'static str,
    attribute: &'static str,
    immutable: bool,
    validator: Option<Validator<T>>,
    value: Option<T>,
}

impl<T> Slot<T> {
    /// Creates a mutable slot with no validation rule.
    pub fn new(owner: &'static str, attribute: &'static str) -> Self {
        Self {
            owner,
            attribute,
            immutable: false,
            validator: None,
            value: None,
        }
    }

    /// Creates an immutable slot: once written, further writes and deletes
    /// fail.
    pub fn immutable(owner: &'static str, attribute: &'static str) -> Self {
        Self {
            immutable: true,
            ..Self::new(owner, attribute)
        }
    }

    /// Attaches a validation rule, keeping the mutability as-is.
    pub fn with_validator(mut self, validator: Validator<T>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// The stored value, or `None` if unset.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Whether a value has been written.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Type name of the owning entity.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Name of the attribute this slot backs.
    pub fn attribute(&self) -> &'static str {
        self.attribute
    }

    /// Validates and stores a value.
    ///
    /// # Errors
    ///
    /// [`ModelError::ImmutableUpdate`] if the slot is immutable and already
    /// holds a value; whatever the validator returns if the value is
    /// rejected.
    pub fn set(&mut self, value: T) -> Result<()> {
        if self.immutable && self.value.is_some() {
            return Err(ModelError::ImmutableUpdate {
                owner: self.owner,
                attribute: self.attribute,
            });
        }
        let value = match self.validator {
            Some(validator) => validator(self.owner, self.attribute, value)?,
            None => value,
        };
        self.value = Some(value);
        Ok(())
    }

    /// Clears the stored value.
    ///
    /// # Errors
    ///
    /// [`ModelError::ImmutableDelete`] if the slot is immutable, whether or
    /// not a value is set.
    pub fn unset(&mut self) -> Result<()> {
        if self.immutable {
            return Err(ModelError::ImmutableDelete {
                owner: self.owner,
                attribute: self.attribute,
            });
        }
        self.value = None;
        Ok(())
    }
}

impl Slot<String> {
    /// A mutable slot accepting only non-empty strings.
    pub fn string(owner: &'static str, attribute: &'static str) -> Self {
        Self::new(owner, attribute).with_validator(validate::non_empty)
    }

    /// An immutable slot accepting only non-empty strings.
    pub fn immutable_string(owner: &'static str, attribute: &'static str) -> Self {
        Self::immutable(owner, attribute).with_validator(validate::non_empty)
    }

    /// An immutable slot accepting only schema names, case-folded to
    /// `main` or `temp`.
    pub fn schema_name(owner: &'static str, attribute: &'static str) -> Self {
        Self::immutable(owner, attribute).with_validator(validate::schema_name)
    }
}

/// Built-in validation rules.
pub mod validate {
    use super::Result;
    use crate::error::ModelError;

    /// Allowed schema namespace names.
    pub const SCHEMA_NAMES: [&str; 2] = ["main", "temp"];

    /// Rejects empty strings.
    pub fn non_empty(owner: &'static str, attribute: &'static str, value: String) -> Result<String> {
        if value.is_empty() {
            return Err(ModelError::InvalidValue {
                owner,
                attribute,
                reason: "must be a non-empty string value".to_string(),
            });
        }
        Ok(value)
    }

    /// Case-folds the value and requires it to be `main` or `temp`.
    pub fn schema_name(
        owner: &'static str,
        attribute: &'static str,
        value: String,
    ) -> Result<String> {
        let value = non_empty(owner, attribute, value)?;
        let name = value.to_lowercase();
        if !SCHEMA_NAMES.contains(&name.as_str()) {
            return Err(ModelError::SchemaName(value));
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutable_slot_allows_overwrite_and_unset() {
        let mut slot = Slot::new("Column", "note");
        assert_eq!(slot.get(), None);
        slot.set(1).unwrap();
        slot.set(2).unwrap();
        assert_eq!(slot.get(), Some(&2));
        slot.unset().unwrap();
        assert!(!slot.is_set());
    }

    #[test]
    fn test_immutable_slot_rejects_second_write() {
        let mut slot = Slot::immutable("Table", "row_id");
        slot.set(true).unwrap();
        let err = slot.set(false).unwrap_err();
        assert!(matches!(
            err,
            ModelError::ImmutableUpdate {
                owner: "Table",
                attribute: "row_id"
            }
        ));
        assert_eq!(slot.get(), Some(&true));
    }

    #[test]
    fn test_immutable_slot_rejects_delete_even_when_unset() {
        let mut slot: Slot<bool> = Slot::immutable("Table", "row_id");
        assert!(matches!(
            slot.unset(),
            Err(ModelError::ImmutableDelete { .. })
        ));
    }

    #[test]
    fn test_string_slot_rejects_empty() {
        let mut slot = Slot::string("Column", "type");
        let err = slot.set(String::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'Column' attribute 'type' must be a non-empty string value"
        );
    }

    #[test]
    fn test_schema_name_slot_normalizes_case() {
        let mut slot = Slot::schema_name("Schema", "name");
        slot.set("MAIN".to_string()).unwrap();
        assert_eq!(slot.get(), Some(&"main".to_string()));
    }

    #[test]
    fn test_schema_name_slot_rejects_other_names() {
        let mut slot = Slot::schema_name("Schema", "name");
        assert!(matches!(
            slot.set("other".to_string()),
            Err(ModelError::SchemaName(name)) if name == "other"
        ));
    }
}
