//! Error types for the schema metamodel.
//!
//! Every failure in model construction surfaces synchronously through
//! [`ModelError`] with a message naming the offending entity, attribute, or
//! key. There is no silent failure path and no retry: these errors indicate
//! programmer mistakes in how the model was built.

use thiserror::Error;

/// Errors raised by attribute slots, collections, and the schema graph.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Write to an immutable attribute slot that already holds a value.
    #[error("'{owner}' does not support updating attribute '{attribute}'")]
    ImmutableUpdate {
        /// Type name of the owning entity.
        owner: &'static str,
        /// Name of the attribute.
        attribute: &'static str,
    },

    /// Delete of an immutable attribute slot.
    #[error("'{owner}' does not support deleting attribute '{attribute}'")]
    ImmutableDelete {
        /// Type name of the owning entity.
        owner: &'static str,
        /// Name of the attribute.
        attribute: &'static str,
    },

    /// Value rejected by an attribute slot's validation rule.
    #[error("'{owner}' attribute '{attribute}' {reason}")]
    InvalidValue {
        /// Type name of the owning entity.
        owner: &'static str,
        /// Name of the attribute.
        attribute: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Schema name did not case-fold to `main` or `temp`.
    #[error("schema name must be either 'main' or 'temp', not '{0}'")]
    SchemaName(String),

    /// Key lookup in a collection found no entry.
    #[error("no such key '{key}' in '{collection}' collection")]
    MissingKey {
        /// The key that was looked up.
        key: String,
        /// Name of the collection.
        collection: &'static str,
    },

    /// Insert would rebind an existing key.
    #[error("cannot have duplicate keys ('{key}') in '{collection}' collection")]
    DuplicateKey {
        /// The conflicting key.
        key: String,
        /// Name of the collection.
        collection: &'static str,
    },

    /// Insert would register a value already present in the collection.
    #[error("cannot have duplicate items ('{item}') in '{collection}' collection")]
    DuplicateItem {
        /// Display name of the conflicting value.
        item: String,
        /// Name of the collection.
        collection: &'static str,
    },

    /// Positional lookup beyond the collection's current size.
    #[error("'{collection}' collection index {index} out of range")]
    IndexOutOfRange {
        /// The out-of-range position.
        index: usize,
        /// Name of the collection.
        collection: &'static str,
    },

    /// Mutating operation invoked on a collection that does not allow it.
    #[error("'{collection}' collection does not support `{operation}`")]
    UnsupportedOperation {
        /// The operation that was attempted.
        operation: &'static str,
        /// Name of the collection.
        collection: &'static str,
    },

    /// On-conflict resolution algorithm outside the allowed enumeration.
    #[error(
        "'ON CONFLICT' resolution algorithm must be one of \
         (ROLLBACK, ABORT, FAIL, IGNORE, REPLACE), not '{0}'"
    )]
    ConflictResolution(String),

    /// Sort order outside the allowed enumeration.
    #[error("sort order must be either 'ASC' or 'DESC', not '{0}'")]
    InvalidOrder(String),

    /// Constructor arguments left unconsumed by the filtering pass.
    #[error("failed to resolve arguments ({arguments}) for {owner} '{name}'")]
    UnresolvedArguments {
        /// Display names of the unconsumed arguments.
        arguments: String,
        /// Type name of the entity being constructed.
        owner: &'static str,
        /// Name of the entity being constructed.
        name: String,
    },
}

/// Convenience alias for results with [`ModelError`].
pub type Result<T> = std::result::Result<T, ModelError>;
