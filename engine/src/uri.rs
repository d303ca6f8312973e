//! SQLite URI addressing.
//!
//! A database may be addressed by a plain file system path or by a
//! `file:`-prefixed URI carrying `key=value` query parameters
//! (e.g. `file:data.db?mode=ro&cache=shared`). Parsing splits on the first
//! `?`, decodes the `&`-joined parameter pairs, and strips the `file:`
//! prefix from the path component.

use std::fmt;

use crate::error::{EngineError, Result};

/// A parsed SQLite database URI.
///
/// # Examples
///
/// ```
/// use sqlite_model_engine::DatabaseUri;
///
/// let uri = DatabaseUri::parse("file:data.db?mode=ro&cache=shared").unwrap();
/// assert_eq!(uri.file, "data.db");
/// assert_eq!(uri.param("mode"), Some("ro"));
/// assert_eq!(uri.to_string(), "file:data.db?mode=ro&cache=shared");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseUri {
    /// The path component, with any `file:` prefix removed.
    pub file: String,
    /// Query parameters in their original order.
    pub params: Vec<(String, String)>,
}

impl DatabaseUri {
    /// Parses a URI string.
    ///
    /// The query part is optional: `file:data.db` parses to an empty
    /// parameter list.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidUri`] if the path component is empty
    /// or a query parameter is not a `key=value` pair.
    pub fn parse(value: &str) -> Result<Self> {
        let (file, query) = match value.split_once('?') {
            Some((file, query)) => (file, Some(query)),
            None => (value, None),
        };

        let file = file.strip_prefix("file:").unwrap_or(file);
        if file.is_empty() {
            return Err(EngineError::InvalidUri {
                uri: value.to_string(),
                reason: "empty path component".to_string(),
            });
        }

        let mut params = Vec::new();
        if let Some(query) = query {
            for pair in query.split('&').filter(|pair| !pair.is_empty()) {
                let (key, val) = pair.split_once('=').ok_or_else(|| EngineError::InvalidUri {
                    uri: value.to_string(),
                    reason: format!("parameter '{pair}' is not a key=value pair"),
                })?;
                params.push((key.to_string(), val.to_string()));
            }
        }

        Ok(Self {
            file: file.to_string(),
            params,
        })
    }

    /// Looks up a query parameter by key.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for DatabaseUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file:{}", self.file)?;
        for (idx, (key, value)) in self.params.iter().enumerate() {
            let sep = if idx == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}
