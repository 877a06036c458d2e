//! Serialization: Rust values to [`Value`]s, and [`Value`]s to document text.
//!
//! [`to_value`](crate::to_value) runs any `T: Serialize` through [`ValueSerializer`]. The writer
//! then lays a table out as a document:
//!
//! - plain `key = value` pairs of a table come first,
//! - nested tables follow as `[a.b]` sections,
//! - non-empty arrays whose elements are all tables become `[[a]]` sections.
//!
//! ```rust
//! use serde::Serialize;
//! use serde_tomlet::to_string;
//!
//! #[derive(Serialize)]
//! struct Server { host: String, ports: Vec<u16> }
//!
//! #[derive(Serialize)]
//! struct Config { name: String, server: Server }
//!
//! let config = Config {
//!     name: "demo".to_string(),
//!     server: Server { host: "localhost".to_string(), ports: vec![80, 443] },
//! };
//! assert_eq!(
//!     to_string(&config).unwrap(),
//!     "name = \"demo\"\n[server]\nhost = \"localhost\"\nports = [80, 443]\n"
//! );
//! ```
//!
//! The format has no null, so `None` and `()` cannot be written on their own.
//! Struct fields and map entries holding them are left out instead.

use crate::keychain::is_bare_key_char;
use crate::{Error, FormatOptions, Result, Table, Value};
use serde::{ser, Serialize};
use tracing::debug;

/// Serde serializer producing [`Value`]s.
///
/// `Ok(None)` stands for an absent value (`Option::None` or `()`), which
/// tables drop and everything else rejects.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    // Set for tuple and struct variants: wraps the result as `{ variant = ... }`.
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: Table,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Option<Value>;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Option<Value>> {
        Ok(Some(Value::Boolean(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Option<Value>> {
        Ok(Some(Value::Integer(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Option<Value>> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Option<Value>> {
        i64::try_from(v)
            .map(|i| Some(Value::Integer(i)))
            .map_err(|_| Error::UnsupportedType(format!("integer {} does not fit in i64", v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Option<Value>> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Option<Value>> {
        Ok(Some(Value::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Option<Value>> {
        Ok(Some(Value::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Option<Value>> {
        Ok(Some(Value::String(v.to_string())))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Option<Value>> {
        let vec = v.iter().map(|&b| Value::Integer(i64::from(b))).collect();
        Ok(Some(Value::Array(vec)))
    }

    fn serialize_none(self) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Option<Value>> {
        Ok(Some(Value::String(variant.to_string())))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        let mut table = Table::new();
        if let Some(inner) = value.serialize(ValueSerializer)? {
            table.insert(variant.to_string(), inner);
        }
        Ok(Some(Value::Table(table)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

fn wrap_variant(variant: Option<&'static str>, value: Value) -> Value {
    match variant {
        Some(name) => {
            let mut table = Table::new();
            table.insert(name.to_string(), value);
            Value::Table(table)
        }
        None => value,
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let element = value
            .serialize(ValueSerializer)?
            .ok_or_else(|| Error::unsupported_type("None or unit inside an array"))?;
        if let Some(first) = self.vec.first() {
            if first.kind() != element.kind() {
                return Err(Error::UnsupportedType(format!(
                    "arrays of mixed types ({} and {})",
                    first.kind(),
                    element.kind()
                )));
            }
        }
        self.vec.push(element);
        Ok(())
    }

    fn finish(self) -> Result<Option<Value>> {
        Ok(Some(wrap_variant(self.variant, Value::Array(self.vec))))
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: Table::new(),
            current_key: None,
            variant,
        }
    }

    fn entry<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(value) = value.serialize(ValueSerializer)? {
            self.map.insert(key, value);
        }
        Ok(())
    }

    fn finish(self) -> Result<Option<Value>> {
        Ok(Some(wrap_variant(self.variant, Value::Table(self.map))))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(ValueSerializer)? {
            Some(Value::String(s)) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(Error::unsupported_type("map keys that are not strings")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.entry(key, value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.entry(key.to_string(), value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.entry(key.to_string(), value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

/// Renders a table as document text.
pub(crate) fn write_document(root: &Value, options: &FormatOptions) -> Result<String> {
    let Value::Table(table) = root else {
        return Err(Error::UnsupportedType(format!(
            "a {} as the document root; only tables can be written",
            root.kind()
        )));
    };
    let mut output = String::with_capacity(256);
    let mut path = Vec::new();
    write_table(&mut output, &mut path, table, options)?;
    debug!(bytes = output.len(), pretty = options.pretty, "wrote document");
    Ok(output)
}

fn is_array_of_tables(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_table)
}

fn is_section(value: &Value) -> bool {
    match value {
        Value::Table(_) => true,
        Value::Array(items) => is_array_of_tables(items),
        _ => false,
    }
}

fn write_table(
    output: &mut String,
    path: &mut Vec<String>,
    table: &Table,
    options: &FormatOptions,
) -> Result<()> {
    for (key, value) in table.iter().filter(|(_, v)| !is_section(v)) {
        write_key(output, key)?;
        output.push_str(" = ");
        if options.pretty {
            write_pretty(output, value, options)?;
        } else {
            write_inline(output, value)?;
        }
        output.push('\n');
    }

    for (key, value) in table.iter().filter(|(_, v)| is_section(v)) {
        path.push(key.clone());
        match value {
            Value::Table(inner) => {
                write_header(output, path, false, options)?;
                write_table(output, path, inner, options)?;
            }
            Value::Array(items) => {
                for item in items {
                    if let Value::Table(inner) = item {
                        write_header(output, path, true, options)?;
                        write_table(output, path, inner, options)?;
                    }
                }
            }
            _ => {}
        }
        path.pop();
    }
    Ok(())
}

fn write_header(
    output: &mut String,
    path: &[String],
    array: bool,
    options: &FormatOptions,
) -> Result<()> {
    if options.pretty && !output.is_empty() {
        output.push('\n');
    }
    output.push_str(if array { "[[" } else { "[" });
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            output.push('.');
        }
        write_key(output, segment)?;
    }
    output.push_str(if array { "]]\n" } else { "]\n" });
    Ok(())
}

// Bare when possible, otherwise whichever quote the key does not contain.
// Quoted keys are read back verbatim, so nothing inside them can be escaped.
fn write_key(output: &mut String, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::unsupported_type("empty keys"));
    }
    if key.chars().all(is_bare_key_char) {
        output.push_str(key);
        return Ok(());
    }
    if key.contains(['\n', '\r']) {
        return Err(Error::UnsupportedType(format!(
            "key {:?} contains a line break",
            key
        )));
    }
    let quote = if !key.contains('"') {
        '"'
    } else if !key.contains('\'') {
        '\''
    } else {
        return Err(Error::UnsupportedType(format!(
            "key {:?} contains both quote characters",
            key
        )));
    };
    output.push(quote);
    output.push_str(key);
    output.push(quote);
    Ok(())
}

fn write_string(output: &mut String, s: &str) {
    output.push('"');
    for ch in s.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '\u{0008}' => output.push_str("\\b"),
            '\u{000C}' => output.push_str("\\f"),
            c if c.is_control() => output.push_str(&format!("\\U{:08X}", c as u32)),
            c => output.push(c),
        }
    }
    output.push('"');
}

fn write_float(output: &mut String, f: f64) {
    if f.is_nan() {
        output.push_str("nan");
    } else if f.is_infinite() {
        output.push_str(if f > 0.0 { "inf" } else { "-inf" });
    } else {
        // Debug keeps the fraction (`1.0`) and round-trips exactly.
        output.push_str(&format!("{:?}", f));
    }
}

/// Writes `value` in the form it takes after `key = `, on a single line.
pub(crate) fn write_inline(output: &mut String, value: &Value) -> Result<()> {
    match value {
        Value::String(s) => write_string(output, s),
        Value::Integer(i) => output.push_str(&i.to_string()),
        Value::Float(f) => write_float(output, *f),
        Value::Boolean(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Datetime(text) => output.push_str(text),
        Value::Array(items) => {
            output.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    output.push_str(", ");
                }
                write_inline(output, item)?;
            }
            output.push(']');
        }
        Value::Table(table) => {
            if table.is_empty() {
                output.push_str("{}");
                return Ok(());
            }
            output.push_str("{ ");
            for (i, (key, item)) in table.iter().enumerate() {
                if i > 0 {
                    output.push_str(", ");
                }
                write_key(output, key)?;
                output.push_str(" = ");
                write_inline(output, item)?;
            }
            output.push_str(" }");
        }
    }
    Ok(())
}

// One element per line for top-level arrays; everything nested stays inline.
fn write_pretty(output: &mut String, value: &Value, options: &FormatOptions) -> Result<()> {
    match value {
        Value::Array(items) if !items.is_empty() => {
            let indent = " ".repeat(options.indent);
            output.push_str("[\n");
            for item in items {
                output.push_str(&indent);
                write_inline(output, item)?;
                output.push_str(",\n");
            }
            output.push(']');
            Ok(())
        }
        _ => write_inline(output, value),
    }
}
