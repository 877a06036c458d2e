//! Read-only access to parsed documents.
//!
//! A [`Document`] owns the root [`Value`] produced by the parser and offers two
//! families of path lookups:
//!
//! - `get_*` return `Option` and treat every problem (missing key, wrong type,
//!   malformed path) as absence.
//! - `require_*` return [`Result`] and say what went wrong.
//!
//! Paths use the same grammar as keys in the document, so quoted segments may
//! contain dots.
//!
//! ```rust
//! use serde_tomlet::parse;
//!
//! let doc = parse(r#"
//! [site]
//! "google.com" = true
//! "#).unwrap();
//!
//! assert_eq!(doc.get_boolean(r#"site."google.com""#), Some(true));
//! assert_eq!(doc.get_boolean("site.google.com"), None);
//! assert!(doc.require_boolean("site.google.com").is_err());
//! ```

use crate::keychain::parse_path;
use crate::ser::write_document;
use crate::{Error, FormatOptions, Kind, Result, Table, Value};

const ROOT: &str = "(root)";

/// A parsed document, or any value wrapped as a sub-document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    root: Value,
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Document { root }
    }
}

impl From<Table> for Document {
    fn from(table: Table) -> Self {
        Document {
            root: Value::Table(table),
        }
    }
}

impl Document {
    /// Returns the root value.
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Consumes the document and returns its root value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.root
    }

    fn lookup(&self, path: &str) -> Result<Option<&Value>> {
        let keychain = parse_path(path)?;
        let mut current = &self.root;
        for segment in &keychain {
            match current {
                Value::Table(table) => match table.get(segment) {
                    Some(next) => current = next,
                    None => return Ok(None),
                },
                _ => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Returns the value at `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.lookup(path).ok().flatten()
    }

    #[must_use]
    pub fn get_string(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    #[must_use]
    pub fn get_integer(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_integer)
    }

    #[must_use]
    pub fn get_float(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(Value::as_float)
    }

    #[must_use]
    pub fn get_boolean(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Returns the original text of a date/time literal at `path`.
    #[must_use]
    pub fn get_datetime(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_datetime)
    }

    #[must_use]
    pub fn get_array(&self, path: &str) -> Option<&Vec<Value>> {
        self.get(path).and_then(Value::as_array)
    }

    #[must_use]
    pub fn get_table(&self, path: &str) -> Option<&Table> {
        self.get(path).and_then(Value::as_table)
    }

    /// Returns the value at `path`, or [`Error::MissingKey`].
    ///
    /// A malformed path fails with the error the key grammar reports for it.
    pub fn require(&self, path: &str) -> Result<&Value> {
        self.lookup(path)?
            .ok_or_else(|| Error::MissingKey(path.to_string()))
    }

    fn require_as<'a, T>(
        &'a self,
        path: &str,
        expected: Kind,
        cast: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T> {
        let value = self.require(path)?;
        cast(value).ok_or_else(|| Error::WrongType {
            path: path.to_string(),
            expected,
            found: value.kind(),
        })
    }

    pub fn require_string(&self, path: &str) -> Result<&str> {
        self.require_as(path, Kind::String, Value::as_str)
    }

    pub fn require_integer(&self, path: &str) -> Result<i64> {
        self.require_as(path, Kind::Integer, Value::as_integer)
    }

    pub fn require_float(&self, path: &str) -> Result<f64> {
        self.require_as(path, Kind::Float, Value::as_float)
    }

    pub fn require_boolean(&self, path: &str) -> Result<bool> {
        self.require_as(path, Kind::Boolean, Value::as_bool)
    }

    pub fn require_datetime(&self, path: &str) -> Result<&str> {
        self.require_as(path, Kind::Datetime, Value::as_datetime)
    }

    pub fn require_array(&self, path: &str) -> Result<&Vec<Value>> {
        self.require_as(path, Kind::Array, Value::as_array)
    }

    pub fn require_table(&self, path: &str) -> Result<&Table> {
        self.require_as(path, Kind::Table, Value::as_table)
    }

    fn cast<'a, T>(&'a self, expected: Kind, cast: impl FnOnce(&'a Value) -> Option<T>) -> Result<T> {
        cast(&self.root).ok_or_else(|| Error::WrongType {
            path: ROOT.to_string(),
            expected,
            found: self.root.kind(),
        })
    }

    /// Casts the root to a table.
    ///
    /// ```rust
    /// use serde_tomlet::{parse, Document, Error, Value};
    ///
    /// let doc = parse("a = 1").unwrap();
    /// assert_eq!(doc.as_table().unwrap().len(), 1);
    ///
    /// let scalar = Document::from(Value::from(1));
    /// assert!(matches!(scalar.as_table(), Err(Error::WrongType { .. })));
    /// ```
    pub fn as_table(&self) -> Result<&Table> {
        self.cast(Kind::Table, Value::as_table)
    }

    pub fn as_array(&self) -> Result<&Vec<Value>> {
        self.cast(Kind::Array, Value::as_array)
    }

    pub fn as_string(&self) -> Result<&str> {
        self.cast(Kind::String, Value::as_str)
    }

    pub fn as_integer(&self) -> Result<i64> {
        self.cast(Kind::Integer, Value::as_integer)
    }

    pub fn as_float(&self) -> Result<f64> {
        self.cast(Kind::Float, Value::as_float)
    }

    pub fn as_boolean(&self) -> Result<bool> {
        self.cast(Kind::Boolean, Value::as_bool)
    }

    /// Returns element `index` of an array root, or `None` past the end.
    ///
    /// Fails with [`Error::NotAnArray`] when the root is not an array.
    pub fn index(&self, index: usize) -> Result<Option<&Value>> {
        match &self.root {
            Value::Array(items) => Ok(items.get(index)),
            other => Err(Error::NotAnArray {
                found: other.kind(),
            }),
        }
    }

    /// Renders a table root back to document text.
    pub fn to_string_with_options(&self, options: FormatOptions) -> Result<String> {
        write_document(&self.root, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn sample() -> Document {
        parse(
            r#"
title = "example"
[owner]
name = "Tom"
dob = 1979-05-27T07:32:00-08:00
[database]
ports = [8000, 8001, 8002]
enabled = true
temp_targets = { cpu = 79.5, case = 72.0 }
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_optional_getters() {
        let doc = sample();
        assert_eq!(doc.get_string("title"), Some("example"));
        assert_eq!(doc.get_string("owner.name"), Some("Tom"));
        assert_eq!(doc.get_datetime("owner.dob"), Some("1979-05-27T07:32:00-08:00"));
        assert_eq!(doc.get_boolean("database.enabled"), Some(true));
        assert_eq!(doc.get_float("database.temp_targets.cpu"), Some(79.5));
        assert_eq!(doc.get_array("database.ports").map(Vec::len), Some(3));
        assert_eq!(doc.get_table("owner").map(Table::len), Some(2));
    }

    #[test]
    fn test_optional_getters_absent() {
        let doc = sample();
        assert_eq!(doc.get("missing"), None);
        assert_eq!(doc.get("title.deeper"), None);
        assert_eq!(doc.get_integer("title"), None);
        assert_eq!(doc.get_float("database.ports"), None);
        assert_eq!(doc.get("owner..name"), None);
        assert_eq!(doc.get(""), None);
    }

    #[test]
    fn test_required_getters() {
        let doc = sample();
        assert_eq!(doc.require_string("owner.name").unwrap(), "Tom");
        assert_eq!(
            doc.require_string("owner.age").unwrap_err(),
            Error::MissingKey("owner.age".to_string())
        );
        assert_eq!(
            doc.require_integer("title").unwrap_err(),
            Error::WrongType {
                path: "title".to_string(),
                expected: Kind::Integer,
                found: Kind::String,
            }
        );
        assert!(matches!(
            doc.require("owner..name").unwrap_err(),
            Error::EmptyKey { .. }
        ));
    }

    #[test]
    fn test_root_casts() {
        let doc = sample();
        assert!(doc.as_table().is_ok());
        assert!(matches!(
            doc.as_array().unwrap_err(),
            Error::WrongType {
                expected: Kind::Array,
                found: Kind::Table,
                ..
            }
        ));

        let number = Document::from(Value::from(42));
        assert_eq!(number.as_integer().unwrap(), 42);
        assert!(number.as_float().is_err());
        assert!(number.as_string().is_err());
        assert!(Document::from(Value::from(true)).as_boolean().unwrap());
    }

    #[test]
    fn test_index() {
        let doc = sample();
        let ports = Document::from(doc.get("database.ports").cloned().unwrap());
        assert_eq!(ports.index(1).unwrap(), Some(&Value::Integer(8001)));
        assert_eq!(ports.index(3).unwrap(), None);
        assert_eq!(
            doc.index(0).unwrap_err(),
            Error::NotAnArray { found: Kind::Table }
        );
    }

    #[test]
    fn test_sub_document() {
        let doc = sample();
        let owner = Document::from(doc.get_table("owner").cloned().unwrap());
        assert_eq!(owner.get_string("name"), Some("Tom"));
    }

    #[test]
    fn test_document_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Document>();
    }
}
