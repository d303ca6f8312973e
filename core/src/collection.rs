//! Keyed collections of schema children.
//!
//! A [`Collection`] is an insertion-ordered mapping from string key to
//! child, enforcing key uniqueness and value uniqueness under a
//! configurable [`Uniqueness`] policy. Lookup works by key or by
//! non-negative position; equality compares values pairwise in insertion
//! order.
//!
//! Mutation is closed on a collection constructed with
//! [`Collection::closed`]: every mutating entry point fails with
//! [`ModelError::UnsupportedOperation`]. The schema graph constructs its
//! child collections with [`Collection::open`], which re-enables `insert`
//! only — `update`, `clear`, and `remove` stay closed on every collection,
//! since a registered child belongs to its parent for life.

use crate::error::{ModelError, Result};

/// How a collection's children expose identity and a display name.
pub trait CollectionItem: Clone {
    /// The name used in duplicate-item error messages: the child's `key`
    /// or `name` where available.
    fn item_name(&self) -> String;

    /// Whether two values are the same child (handle identity).
    fn same_item(&self, other: &Self) -> bool;
}

/// Value-uniqueness policy for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Uniqueness {
    /// Reject a value only when the very same child is already registered
    /// (handle identity). The default.
    #[default]
    Identity,
    /// Additionally reject values whose display name collides with an
    /// existing entry.
    DisplayName,
}

/// An insertion-ordered, uniqueness-enforcing mapping from key to child.
///
/// # Examples
///
/// ```
/// use sqlite_model_core::{Collection, CollectionItem};
/// use std::rc::Rc;
///
/// #[derive(Clone)]
/// struct Child(Rc<String>);
///
/// impl CollectionItem for Child {
///     fn item_name(&self) -> String {
///         self.0.as_ref().clone()
///     }
///     fn same_item(&self, other: &Self) -> bool {
///         Rc::ptr_eq(&self.0, &other.0)
///     }
/// }
///
/// let mut children = Collection::open("children");
/// children.insert("a", Child(Rc::new("a".into()))).unwrap();
/// assert_eq!(children.len(), 1);
/// assert!(children.get("a").is_ok());
/// assert!(children.get("b").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Collection<T> {
    name: &'static str,
    uniqueness: Uniqueness,
    insertable: bool,
    entries: Vec<(String, T)>,
}

impl<T: CollectionItem> Collection<T> {
    /// Creates an empty collection with every mutating operation closed.
    pub fn closed(name: &'static str) -> Self {
        Self {
            name,
            uniqueness: Uniqueness::default(),
            insertable: false,
            entries: Vec::new(),
        }
    }

    /// Creates an empty collection with `insert` enabled.
    pub fn open(name: &'static str) -> Self {
        Self {
            insertable: true,
            ..Self::closed(name)
        }
    }

    /// Sets the value-uniqueness policy.
    pub fn with_uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    /// Builds an open collection from `(key, value)` pairs, applying the
    /// same uniqueness checks as runtime insertion.
    ///
    /// # Errors
    ///
    /// [`ModelError::DuplicateKey`] or [`ModelError::DuplicateItem`] on the
    /// first conflicting pair.
    pub fn from_pairs(
        name: &'static str,
        pairs: impl IntoIterator<Item = (String, T)>,
    ) -> Result<Self> {
        let mut collection = Self::open(name);
        for (key, value) in pairs {
            collection.insert(key, value)?;
        }
        Ok(collection)
    }

    /// The collection's name as used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of registered children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection holds no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a child by key.
    ///
    /// # Errors
    ///
    /// [`ModelError::MissingKey`] if the key is absent.
    pub fn get(&self, key: &str) -> Result<&T> {
        self.get_opt(key).ok_or_else(|| ModelError::MissingKey {
            key: key.to_string(),
            collection: self.name,
        })
    }

    /// Looks up a child by key, returning `None` on a miss.
    pub fn get_opt(&self, key: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, value)| value)
    }

    /// Looks up a child by key, falling back to `default` on a miss.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a T) -> &'a T {
        self.get_opt(key).unwrap_or(default)
    }

    /// Looks up a child by insertion position.
    ///
    /// # Errors
    ///
    /// [`ModelError::IndexOutOfRange`] if `index >= len()`.
    pub fn get_by_index(&self, index: usize) -> Result<&T> {
        self.entries
            .get(index)
            .map(|(_, value)| value)
            .ok_or(ModelError::IndexOutOfRange {
                index,
                collection: self.name,
            })
    }

    /// Whether a key is registered.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get_opt(key).is_some()
    }

    /// Whether this exact child is registered (handle identity).
    pub fn contains_item(&self, item: &T) -> bool {
        self.entries.iter().any(|(_, value)| value.same_item(item))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Registers a child under `key`.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnsupportedOperation`] on a closed collection;
    /// [`ModelError::DuplicateKey`] if the key is already bound;
    /// [`ModelError::DuplicateItem`] if the value violates the uniqueness
    /// policy.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Result<()> {
        if !self.insertable {
            return Err(self.unsupported("insert"));
        }
        let key = key.into();
        if self.contains_key(&key) {
            return Err(ModelError::DuplicateKey {
                key,
                collection: self.name,
            });
        }
        let duplicate = match self.uniqueness {
            Uniqueness::Identity => self.contains_item(&value),
            Uniqueness::DisplayName => {
                let name = value.item_name();
                self.contains_item(&value)
                    || self.entries.iter().any(|(_, v)| v.item_name() == name)
            }
        };
        if duplicate {
            return Err(ModelError::DuplicateItem {
                item: value.item_name(),
                collection: self.name,
            });
        }
        self.entries.push((key, value));
        Ok(())
    }

    /// Bulk rebinding is not supported on any collection.
    pub fn update(&mut self, _pairs: impl IntoIterator<Item = (String, T)>) -> Result<()> {
        Err(self.unsupported("update"))
    }

    /// Removing all children is not supported on any collection.
    pub fn clear(&mut self) -> Result<()> {
        Err(self.unsupported("clear"))
    }

    /// Removing a single child is not supported on any collection.
    pub fn remove(&mut self, _key: &str) -> Result<()> {
        Err(self.unsupported("remove"))
    }

    fn unsupported(&self, operation: &'static str) -> ModelError {
        ModelError::UnsupportedOperation {
            operation,
            collection: self.name,
        }
    }
}

impl<T: CollectionItem> PartialEq for Collection<T> {
    /// Pairwise value comparison in insertion order; collections of
    /// different lengths are never equal.
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|((_, left), (_, right))| left.same_item(right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Clone, Debug)]
    struct Child(Rc<String>);

    impl Child {
        fn new(name: &str) -> Self {
            Self(Rc::new(name.to_string()))
        }
    }

    impl CollectionItem for Child {
        fn item_name(&self) -> String {
            self.0.as_ref().clone()
        }
        fn same_item(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }

    #[test]
    fn test_insert_then_lookup_by_key_and_index() {
        let mut collection = Collection::open("children");
        let child = Child::new("a");
        collection.insert("a", child.clone()).unwrap();
        assert!(collection.get("a").unwrap().same_item(&child));
        assert!(collection.get_by_index(0).unwrap().same_item(&child));
        assert_eq!(collection.len(), 1);
        assert!(!collection.is_empty());
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut collection = Collection::open("children");
        collection.insert("a", Child::new("a")).unwrap();
        let err = collection.insert("a", Child::new("b")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateKey { key, .. } if key == "a"));
    }

    #[test]
    fn test_duplicate_item_is_rejected() {
        let mut collection = Collection::open("children");
        let child = Child::new("a");
        collection.insert("a", child.clone()).unwrap();
        let err = collection.insert("b", child).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateItem { item, .. } if item == "a"));
    }

    #[test]
    fn test_identity_policy_allows_equal_names() {
        // Two distinct children may share a display name under the
        // default policy.
        let mut collection = Collection::open("children");
        collection.insert("a", Child::new("same")).unwrap();
        collection.insert("b", Child::new("same")).unwrap();
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_display_name_policy_rejects_equal_names() {
        let mut collection =
            Collection::open("children").with_uniqueness(Uniqueness::DisplayName);
        collection.insert("a", Child::new("same")).unwrap();
        let err = collection.insert("b", Child::new("same")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateItem { .. }));
    }

    #[test]
    fn test_missing_key_and_out_of_range() {
        let collection: Collection<Child> = Collection::open("children");
        assert!(matches!(
            collection.get("nope"),
            Err(ModelError::MissingKey { key, .. }) if key == "nope"
        ));
        assert!(matches!(
            collection.get_by_index(0),
            Err(ModelError::IndexOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_get_or_never_fails() {
        let mut collection = Collection::open("children");
        let registered = Child::new("a");
        let default = Child::new("fallback");
        collection.insert("a", registered.clone()).unwrap();
        assert!(collection.get_or("a", &default).same_item(&registered));
        assert!(collection.get_or("missing", &default).same_item(&default));
    }

    #[test]
    fn test_closed_collection_rejects_all_mutation() {
        let mut collection = Collection::closed("children");
        assert!(matches!(
            collection.insert("a", Child::new("a")),
            Err(ModelError::UnsupportedOperation {
                operation: "insert",
                ..
            })
        ));
        assert!(collection.update(vec![]).is_err());
        assert!(collection.clear().is_err());
        assert!(collection.remove("a").is_err());
    }

    #[test]
    fn test_open_collection_still_rejects_removal() {
        let mut collection = Collection::open("children");
        collection.insert("a", Child::new("a")).unwrap();
        assert!(matches!(
            collection.remove("a"),
            Err(ModelError::UnsupportedOperation {
                operation: "remove",
                ..
            })
        ));
        assert!(collection.clear().is_err());
    }

    #[test]
    fn test_equality_is_pairwise_in_order() {
        let a1 = Child::new("a");
        let b1 = Child::new("b");

        let mut left = Collection::open("children");
        left.insert("a", a1.clone()).unwrap();
        left.insert("b", b1.clone()).unwrap();

        // Same values, same order, different keys: equal.
        let mut right = Collection::open("children");
        right.insert("x", a1.clone()).unwrap();
        right.insert("y", b1.clone()).unwrap();
        assert_eq!(left, right);

        // Same values, different order: not equal.
        let mut swapped = Collection::open("children");
        swapped.insert("b", b1.clone()).unwrap();
        swapped.insert("a", a1.clone()).unwrap();
        assert_ne!(left, swapped);

        // Shorter collection is never equal to a longer one.
        let mut shorter = Collection::open("children");
        shorter.insert("a", a1).unwrap();
        assert_ne!(left, shorter);
    }

    #[test]
    fn test_from_pairs_applies_uniqueness_checks() {
        let child = Child::new("a");
        let pairs = vec![
            ("a".to_string(), child.clone()),
            ("b".to_string(), child),
        ];
        assert!(matches!(
            Collection::from_pairs("children", pairs),
            Err(ModelError::DuplicateItem { .. })
        ));
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let mut collection = Collection::open("children");
        for name in ["c", "a", "b"] {
            collection.insert(name, Child::new(name)).unwrap();
        }
        let keys: Vec<_> = collection.keys().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
        let names: Vec<_> = collection.values().map(Child::item_name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
