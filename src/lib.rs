//! # serde_tomlet
//!
//! A hand-written parser for a small TOML-like configuration format, with an
//! ordered document model and Serde support.
//!
//! ## The Format
//!
//! ```text
//! # Comments run to the end of the line.
//! title = "example"
//!
//! [owner]
//! name = "Tom Preston-Werner"
//! dob = 1979-05-27T07:32:00-08:00
//!
//! [database]
//! ports = [ 8000, 8001, 8002 ]
//! temp_targets = { cpu = 79.5, case = 72.0 }
//!
//! [[fruit]]
//! name = "apple"
//!
//! [fruit.physical]
//! color = "red"
//! ```
//!
//! - **Scalars**: basic and literal strings (single and multi-line), integers in
//!   decimal, hex, octal and binary, floats including `inf` and `nan`, booleans,
//!   and date/time literals kept as their original text
//! - **Arrays**: every element has the same kind
//! - **Tables**: `[a.b]` headers, dotted keys, inline `{ ... }` tables
//! - **Arrays of tables**: `[[name]]`, with `[name.child]` scoped to the most
//!   recent entry
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_tomlet::parse;
//!
//! let doc = parse(r#"
//! [server]
//! host = "localhost"
//! ports = [8000, 8001]
//! "#).unwrap();
//!
//! assert_eq!(doc.get_string("server.host"), Some("localhost"));
//! assert_eq!(doc.get_array("server.ports").map(Vec::len), Some(2));
//! assert!(doc.require_integer("server.host").is_err());
//! ```
//!
//! ### With Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_tomlet::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Config {
//!     name: String,
//!     retries: u8,
//!     verbose: bool,
//! }
//!
//! let config = Config { name: "demo".to_string(), retries: 3, verbose: false };
//! let text = to_string(&config).unwrap();
//! assert_eq!(text, "name = \"demo\"\nretries = 3\nverbose = false\n");
//!
//! let back: Config = from_str(&text).unwrap();
//! assert_eq!(config, back);
//! ```
//!
//! ## Errors
//!
//! Parsing stops at the first problem; no partial document is returned. Parse
//! errors carry the line and column where they were detected, and every error
//! has an [`ErrorCategory`]. See the [`error`] module.
//!
//! ## Logging
//!
//! The parser and writer emit `tracing` events at `trace` and `debug` level.
//! Nothing is printed unless the application installs a subscriber.

pub mod de;
pub mod document;
pub mod error;
mod keychain;
mod lexer;
pub mod macros;
pub mod options;
mod parser;
mod reader;
pub mod ser;
mod strings;
pub mod table;
pub mod value;

pub use de::ValueDeserializer;
pub use document::Document;
pub use error::{Error, ErrorCategory, Result};
pub use options::{FormatOptions, ParseOptions};
pub use ser::ValueSerializer;
pub use table::Table;
pub use value::{Kind, Value};

use parser::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Parses document text with default [`ParseOptions`].
///
/// # Examples
///
/// ```rust
/// use serde_tomlet::parse;
///
/// let doc = parse("answer = 42").unwrap();
/// assert_eq!(doc.get_integer("answer"), Some(42));
/// ```
///
/// # Errors
///
/// Returns the first lexical, structural or semantic error in the input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(input: &str) -> Result<Document> {
    parse_with_options(input, ParseOptions::default())
}

/// Parses document text.
///
/// # Errors
///
/// Returns the first error in the input, or [`Error::DepthLimitExceeded`] when
/// arrays and inline tables nest deeper than `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<Document> {
    parse_chars(input.chars(), options)
}

/// Parses a document from any stream of characters.
///
/// # Examples
///
/// ```rust
/// use serde_tomlet::{parse_chars, ParseOptions};
///
/// let lines = ["a = 1\n", "b = 2\n"];
/// let doc = parse_chars(lines.iter().flat_map(|l| l.chars()), ParseOptions::new()).unwrap();
/// assert_eq!(doc.get_integer("b"), Some(2));
/// ```
///
/// # Errors
///
/// Same as [`parse_with_options`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_chars<I>(chars: I, options: ParseOptions) -> Result<Document>
where
    I: IntoIterator<Item = char>,
{
    Parser::new(chars.into_iter(), options).parse()
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_tomlet::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_table());
/// assert_eq!(to_value(&vec![1, 2]).unwrap(), Value::Array(vec![1.into(), 2.into()]));
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for values the format cannot hold: a
/// top-level `None` or unit, `None` inside a sequence, mixed-type sequences,
/// non-string map keys, and integers beyond `i64`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value
        .serialize(ValueSerializer)?
        .ok_or_else(|| Error::unsupported_type("a missing value (None or unit) at the top level"))
}

/// Serialize any `T: Serialize` to document text.
///
/// # Errors
///
/// Returns an error if the value does not serialize to a table, or holds
/// something the format cannot represent (see [`to_value`]).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, FormatOptions::default())
}

/// Serialize any `T: Serialize` to document text with custom layout options.
///
/// # Examples
///
/// ```rust
/// use serde_tomlet::{to_string_with_options, FormatOptions};
/// use std::collections::BTreeMap;
///
/// let mut map = BTreeMap::new();
/// map.insert("ports", vec![80, 443]);
///
/// let text = to_string_with_options(&map, FormatOptions::pretty()).unwrap();
/// assert_eq!(text, "ports = [\n  80,\n  443,\n]\n");
/// ```
///
/// # Errors
///
/// Same as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: FormatOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Document::from(to_value(value)?).to_string_with_options(options)
}

/// Serialize any `T: Serialize` as document text into a writer.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// Deserialize an instance of type `T` from a [`Value`].
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Deserialize an instance of type `T` from a parsed [`Document`].
///
/// # Errors
///
/// Returns an error if the document's shape does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_document<T>(document: &Document) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(document.root().clone())
}

/// Deserialize an instance of type `T` from document text.
///
/// # Examples
///
/// ```rust
/// use serde_tomlet::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x = 1\ny = 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns a parse error (with line and column) if the text is malformed, or a
/// deserialization error if it does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse(s)?.into_value())
}

/// Deserialize an instance of type `T` from an I/O stream of document text.
///
/// # Examples
///
/// ```rust
/// use serde_tomlet::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_reader(Cursor::new(b"x = 1\ny = 2")).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails or the bytes are not UTF-8, and
/// otherwise the same errors as [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of document text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not a valid document, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}
