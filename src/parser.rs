//! Document builder.
//!
//! [`Parser`] drives the top-level loop: blank lines and comments are skipped,
//! `[` starts a table header, anything else is a `key = value` statement that
//! must be followed by the end of the line. Values are dispatched to the string
//! engine, the literal lexer, or back into the parser for arrays and inline
//! tables.
//!
//! Table headers move a cursor. The cursor never holds references into the
//! document; it stores the path from the root as a list of [`Step`]s and is
//! resolved again whenever a statement needs its table. Arrays of tables add an
//! "active instance": the table most recently appended by `[[name]]`, which
//! scopes headers such as `[name.child]` that follow it.

use crate::keychain::{self, is_horizontal_space, KeyEnd, Keychain};
use crate::lexer;
use crate::reader::Reader;
use crate::strings;
use crate::{Document, Error, Kind, ParseOptions, Result, Table, Value};
use std::collections::HashSet;
use tracing::debug;

/// One hop from a table to a child table.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Step {
    /// `key` holds a table
    Table(String),
    /// `key` holds an array of tables; enter its last element
    Instance(String),
}

/// Absolute location of a table, with array-of-tables entries by index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Place {
    Key(String),
    Element(usize),
}

/// The table most recently appended by a `[[...]]` header.
#[derive(Clone, Debug)]
struct ArrayInstance {
    owner: Keychain,
    path: Vec<Step>,
}

#[derive(Clone, Debug, Default)]
struct Cursor {
    current: Vec<Step>,
    instance: Option<ArrayInstance>,
}

pub(crate) struct Parser<I: Iterator<Item = char>> {
    reader: Reader<I>,
    root: Table,
    cursor: Cursor,
    // Tables created only as header intermediates, e.g. `a` by `[a.b]`. A
    // later `[a]` may claim one of these once.
    implicit: HashSet<Vec<Place>>,
    options: ParseOptions,
}

impl<I: Iterator<Item = char>> Parser<I> {
    pub(crate) fn new(chars: I, options: ParseOptions) -> Self {
        Parser {
            reader: Reader::new(chars),
            root: Table::new(),
            cursor: Cursor::default(),
            implicit: HashSet::new(),
            options,
        }
    }

    /// Parses the whole input into a document whose root is a table.
    pub(crate) fn parse(mut self) -> Result<Document> {
        debug!(max_depth = self.options.max_depth, "parsing document");
        loop {
            self.skip_blank()?;
            match self.reader.next() {
                None => break,
                Some('[') => self.parse_table_header()?,
                Some(ch) => {
                    self.reader.pushback(ch)?;
                    self.parse_statement()?;
                }
            }
        }
        debug!(keys = self.root.len(), "parsed document");
        Ok(Document::from(Value::Table(self.root)))
    }

    // Whitespace, newlines and comments.
    fn skip_blank(&mut self) -> Result<()> {
        loop {
            self.reader.skip_while(is_blank)?;
            match self.reader.next() {
                Some('#') => self.reader.skip_while(|c| c != '\n')?,
                Some(ch) => return self.reader.pushback(ch),
                None => return Ok(()),
            }
        }
    }

    /// Accepts optional trailing whitespace and comment, then a newline or end of input.
    fn end_of_line(&mut self) -> Result<()> {
        self.reader.skip_while(is_horizontal_space)?;
        match self.reader.next() {
            None | Some('\n') => Ok(()),
            Some('#') => self.reader.skip_while(|c| c != '\n'),
            Some(found) => {
                let (line, col) = self.reader.last_position();
                Err(Error::ExpectedNewline { found, line, col })
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        let (line, col) = self.reader.position();
        match self.reader.next() {
            Some(ch) if ch == expected => Ok(()),
            None => Err(Error::unexpected_eof(
                line,
                col,
                &format!("'{}'", expected),
            )),
            other => Err(Error::expected(
                line,
                col,
                &format!("'{}'", expected),
                other,
            )),
        }
    }

    fn parse_statement(&mut self) -> Result<()> {
        let (line, col) = self.reader.position();
        let (keychain, value) = self.parse_key_value(0)?;
        self.end_of_line()?;
        let table = resolve(&mut self.root, &self.cursor.current)?;
        put_value(table, &keychain, value, line, col)
    }

    fn parse_key_value(&mut self, depth: usize) -> Result<(Keychain, Value)> {
        let keychain = keychain::parse_keychain(&mut self.reader, KeyEnd::Assignment)?;
        self.expect('=')?;
        self.reader.skip_while(is_horizontal_space)?;
        let value = self.parse_value(depth)?;
        Ok((keychain, value))
    }

    /// `depth` is the number of arrays and inline tables enclosing this value.
    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        let (line, col) = self.reader.position();
        match self.reader.next() {
            None => Err(Error::unexpected_eof(line, col, "value")),
            Some(quote @ ('"' | '\'')) => Ok(Value::String(strings::parse_string(
                &mut self.reader,
                quote,
            )?)),
            Some('[') => {
                let depth = self.nested(depth, line, col)?;
                self.parse_array(depth)
            }
            Some('{') => {
                let depth = self.nested(depth, line, col)?;
                self.parse_inline_table(depth)
            }
            Some(ch) => {
                self.reader.pushback(ch)?;
                self.parse_bare(line, col)
            }
        }
    }

    fn nested(&self, depth: usize, line: usize, col: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.options.max_depth,
                line,
                col,
            });
        }
        Ok(depth)
    }

    fn parse_bare(&mut self, line: usize, col: usize) -> Result<Value> {
        let Some(mut token) = self.reader.try_read_while(is_token_char)? else {
            let next = self.reader.peek()?;
            return Err(Error::expected(line, col, "value", next));
        };

        // `1979-05-27 07:32:00`: a single space may separate the date and time.
        // Every caller skips horizontal space after a value, so the gap is
        // consumed whole and only the character after it is peeked.
        if lexer::is_local_date(&token) && self.reader.peek()? == Some(' ') {
            let gap = self.reader.read_while(is_horizontal_space)?;
            let digit_follows = matches!(self.reader.peek()?, Some(ch) if ch.is_ascii_digit());
            if gap == " " && digit_follows {
                token.push(' ');
                token.push_str(&self.reader.read_while(is_token_char)?);
            }
        }

        match token.as_str() {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => lexer::classify(&token, line, col),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value> {
        let mut items: Vec<Value> = Vec::new();
        loop {
            self.skip_blank()?;
            let (line, col) = self.reader.position();
            match self.reader.next() {
                None => return Err(Error::unexpected_eof(line, col, "']'")),
                Some(']') => return Ok(Value::Array(items)),
                Some(ch) => self.reader.pushback(ch)?,
            }

            let value = self.parse_value(depth)?;
            if let Some(first) = items.first() {
                if first.kind() != value.kind() {
                    return Err(Error::HeterogeneousArray {
                        expected: first.kind(),
                        found: value.kind(),
                        line,
                        col,
                    });
                }
            }
            items.push(value);

            self.skip_blank()?;
            let (line, col) = self.reader.position();
            match self.reader.next() {
                Some(',') => {}
                Some(']') => return Ok(Value::Array(items)),
                None => return Err(Error::unexpected_eof(line, col, "',' or ']'")),
                other => return Err(Error::expected(line, col, "',' or ']'", other)),
            }
        }
    }

    fn parse_inline_table(&mut self, depth: usize) -> Result<Value> {
        let mut table = Table::new();
        loop {
            self.reader.skip_while(is_horizontal_space)?;
            let (line, col) = self.reader.position();
            match self.reader.next() {
                None => return Err(Error::unexpected_eof(line, col, "'}'")),
                Some('\n') => return Err(Error::UnexpectedNewline { line, col }),
                Some('}') => return Ok(Value::Table(table)),
                Some(ch) => self.reader.pushback(ch)?,
            }

            let (keychain, value) = self.parse_key_value(depth)?;
            put_value(&mut table, &keychain, value, line, col)?;

            self.reader.skip_while(is_horizontal_space)?;
            let (line, col) = self.reader.position();
            match self.reader.next() {
                Some(',') => {}
                Some('}') => return Ok(Value::Table(table)),
                Some('\n') => return Err(Error::UnexpectedNewline { line, col }),
                None => return Err(Error::unexpected_eof(line, col, "',' or '}'")),
                other => return Err(Error::expected(line, col, "',' or '}'", other)),
            }
        }
    }

    /// Called with the opening `[` already consumed.
    fn parse_table_header(&mut self) -> Result<()> {
        let (line, col) = self.reader.last_position();
        let is_array = match self.reader.next() {
            Some('[') => true,
            Some(ch) => {
                self.reader.pushback(ch)?;
                false
            }
            None => {
                let (line, col) = self.reader.position();
                return Err(Error::unexpected_eof(line, col, "table name"));
            }
        };
        let keychain = keychain::parse_keychain(&mut self.reader, KeyEnd::Header)?;
        self.expect(']')?;
        if is_array {
            self.expect(']')?;
        }
        self.end_of_line()?;

        if is_array {
            self.open_array_table(keychain, line, col)
        } else {
            self.open_table(keychain, line, col)
        }
    }

    /// Picks the table a header is resolved against, and the part of the
    /// keychain left to resolve from there.
    fn header_base<'k>(&self, keychain: &'k [String]) -> (Vec<Step>, &'k [String]) {
        match &self.cursor.instance {
            Some(instance)
                if keychain.len() > instance.owner.len()
                    && keychain.starts_with(&instance.owner) =>
            {
                (instance.path.clone(), &keychain[instance.owner.len()..])
            }
            _ => (Vec::new(), keychain),
        }
    }

    fn open_table(&mut self, keychain: Keychain, line: usize, col: usize) -> Result<()> {
        let (base, relative) = self.header_base(&keychain);
        let scoped = !base.is_empty();
        let (last, parents) = relative
            .split_last()
            .ok_or(Error::EmptyKey { line, col })?;

        let (mut path, mut place) =
            descend(&mut self.root, &mut self.implicit, base, parents, line, col)?;
        place.push(Place::Key(last.clone()));
        let parent = resolve(&mut self.root, &path)?;
        match parent.get(last) {
            None => {
                parent.insert(last.clone(), Value::Table(Table::new()));
            }
            Some(Value::Table(_)) if self.implicit.remove(&place) => {}
            Some(_) => {
                return Err(Error::DuplicateKey {
                    key: last.clone(),
                    line,
                    col,
                })
            }
        }
        path.push(Step::Table(last.clone()));

        debug!(table = %keychain.join("."), scoped, "table header");
        self.cursor.current = path;
        self.cursor.instance = None;
        Ok(())
    }

    fn open_array_table(&mut self, keychain: Keychain, line: usize, col: usize) -> Result<()> {
        let (base, relative) = self.header_base(&keychain);
        let scoped = !base.is_empty();
        let (last, parents) = relative
            .split_last()
            .ok_or(Error::EmptyKey { line, col })?;

        let (mut path, _) =
            descend(&mut self.root, &mut self.implicit, base, parents, line, col)?;
        let parent = resolve(&mut self.root, &path)?;
        // A non-array value under the same key is replaced, not rejected.
        if !matches!(parent.get(last), Some(Value::Array(_))) {
            parent.insert(last.clone(), Value::Array(Vec::new()));
        }
        let Some(Value::Array(items)) = parent.get_mut(last) else {
            return Err(Error::Internal(format!("array `{}` vanished", last)));
        };
        if let Some(first) = items.first() {
            if first.kind() != Kind::Table {
                return Err(Error::HeterogeneousArray {
                    expected: first.kind(),
                    found: Kind::Table,
                    line,
                    col,
                });
            }
        }
        items.push(Value::Table(Table::new()));
        path.push(Step::Instance(last.clone()));

        debug!(
            array = %keychain.join("."),
            scoped,
            entries = items.len(),
            "array of tables header"
        );
        self.cursor.current = path.clone();
        self.cursor.instance = Some(ArrayInstance {
            owner: keychain,
            path,
        });
        Ok(())
    }
}

// Keys and values share one notion of whitespace: ASCII space, tab and line
// breaks. Other Unicode spaces are ordinary characters and end up in tokens.
fn is_blank(ch: char) -> bool {
    is_horizontal_space(ch) || ch == '\n'
}

fn is_token_char(ch: char) -> bool {
    !is_blank(ch) && !matches!(ch, '#' | ',' | '[' | ']' | '{' | '}')
}

/// Follows a cursor path from `root`.
fn resolve<'t>(root: &'t mut Table, path: &[Step]) -> Result<&'t mut Table> {
    let mut table = root;
    for step in path {
        table = match step {
            Step::Table(key) => match table.get_mut(key) {
                Some(Value::Table(inner)) => inner,
                _ => return Err(stale_cursor(key)),
            },
            Step::Instance(key) => match table.get_mut(key) {
                Some(Value::Array(items)) => match items.last_mut() {
                    Some(Value::Table(inner)) => inner,
                    _ => return Err(stale_cursor(key)),
                },
                _ => return Err(stale_cursor(key)),
            },
        };
    }
    Ok(table)
}

fn stale_cursor(key: &str) -> Error {
    Error::Internal(format!("cursor path no longer resolves at `{}`", key))
}

/// Follows a cursor path from `root` without modifying anything, recording
/// which array entry each [`Step::Instance`] enters.
fn locate(root: &Table, path: &[Step]) -> Result<Vec<Place>> {
    let mut table = root;
    let mut place = Vec::with_capacity(path.len() * 2);
    for step in path {
        table = match step {
            Step::Table(key) => match table.get(key) {
                Some(Value::Table(inner)) => {
                    place.push(Place::Key(key.clone()));
                    inner
                }
                _ => return Err(stale_cursor(key)),
            },
            Step::Instance(key) => match table.get(key) {
                Some(Value::Array(items)) => match items.last() {
                    Some(Value::Table(inner)) => {
                        place.push(Place::Key(key.clone()));
                        place.push(Place::Element(items.len() - 1));
                        inner
                    }
                    _ => return Err(stale_cursor(key)),
                },
                _ => return Err(stale_cursor(key)),
            },
        };
    }
    Ok(place)
}

/// Walks the intermediate segments of a header from `base`, creating missing
/// tables and entering the last table of any array of tables on the way.
///
/// Tables created here are added to `implicit`. Returns the cursor path and
/// the absolute location of the last table entered.
fn descend(
    root: &mut Table,
    implicit: &mut HashSet<Vec<Place>>,
    mut path: Vec<Step>,
    parents: &[String],
    line: usize,
    col: usize,
) -> Result<(Vec<Step>, Vec<Place>)> {
    let mut place = locate(root, &path)?;
    let mut table = resolve(root, &path)?;
    for key in parents {
        place.push(Place::Key(key.clone()));
        if !table.contains_key(key) {
            table.insert(key.clone(), Value::Table(Table::new()));
            implicit.insert(place.clone());
        }
        let conflict = || Error::KeyPathConflict {
            key: key.clone(),
            line,
            col,
        };
        table = match table.get_mut(key) {
            Some(Value::Table(inner)) => {
                path.push(Step::Table(key.clone()));
                inner
            }
            Some(Value::Array(items)) => {
                let index = items.len().saturating_sub(1);
                match items.last_mut() {
                    Some(Value::Table(inner)) => {
                        path.push(Step::Instance(key.clone()));
                        place.push(Place::Element(index));
                        inner
                    }
                    _ => return Err(conflict()),
                }
            }
            _ => return Err(conflict()),
        };
    }
    Ok((path, place))
}

/// Binds `keychain` to `value` under `table`, creating intermediate tables.
///
/// Intermediates that exist but are not tables fail with
/// [`Error::KeyPathConflict`]; a final segment that is already bound fails with
/// [`Error::DuplicateKey`].
fn put_value(
    table: &mut Table,
    keychain: &[String],
    value: Value,
    line: usize,
    col: usize,
) -> Result<()> {
    let Some((last, parents)) = keychain.split_last() else {
        return Err(Error::EmptyKey { line, col });
    };
    let mut table = table;
    for key in parents {
        if !table.contains_key(key) {
            table.insert(key.clone(), Value::Table(Table::new()));
        }
        table = match table.get_mut(key) {
            Some(Value::Table(inner)) => inner,
            _ => {
                return Err(Error::KeyPathConflict {
                    key: key.clone(),
                    line,
                    col,
                })
            }
        };
    }
    if table.contains_key(last) {
        return Err(Error::DuplicateKey {
            key: last.clone(),
            line,
            col,
        });
    }
    table.insert(last.clone(), value);
    Ok(())
}
