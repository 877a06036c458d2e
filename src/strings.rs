//! Quoted string values.
//!
//! Four quoting styles exist: basic (`"`), literal (`'`), and their multi-line
//! forms (`"""`, `'''`). Only basic strings process escapes. Closing delimiters
//! are found by re-running the same delimiter classification used for the
//! opening quote: a run of quotes that does not match the opening kind is kept
//! as text, which is how `"` and `""` can sit unescaped inside `"""` strings.

use crate::reader::Reader;
use crate::{Error, Result};

/// The six shapes a run of one to three identical quotes can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Delimiter {
    Basic,
    EmptyBasic,
    MultiBasic,
    Literal,
    EmptyLiteral,
    MultiLiteral,
}

impl Delimiter {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Delimiter::Basic => "\"",
            Delimiter::EmptyBasic => "\"\"",
            Delimiter::MultiBasic => "\"\"\"",
            Delimiter::Literal => "'",
            Delimiter::EmptyLiteral => "''",
            Delimiter::MultiLiteral => "'''",
        }
    }

    const fn is_multiline(self) -> bool {
        matches!(self, Delimiter::MultiBasic | Delimiter::MultiLiteral)
    }

    const fn is_empty(self) -> bool {
        matches!(self, Delimiter::EmptyBasic | Delimiter::EmptyLiteral)
    }

    const fn escapes(self) -> bool {
        matches!(self, Delimiter::Basic | Delimiter::MultiBasic)
    }
}

/// Classifies the quote run that starts with the already-consumed `first`.
pub(crate) fn read_delimiter<I>(reader: &mut Reader<I>, first: char) -> Result<Delimiter>
where
    I: Iterator<Item = char>,
{
    let (single, empty, multi) = match first {
        '"' => (Delimiter::Basic, Delimiter::EmptyBasic, Delimiter::MultiBasic),
        '\'' => (
            Delimiter::Literal,
            Delimiter::EmptyLiteral,
            Delimiter::MultiLiteral,
        ),
        other => {
            let (line, col) = reader.last_position();
            return Err(Error::expected(line, col, "'\"' or '''", Some(other)));
        }
    };

    match reader.next() {
        Some(ch) if ch == first => {}
        Some(ch) => {
            reader.pushback(ch)?;
            return Ok(single);
        }
        None => return Ok(single),
    }
    match reader.next() {
        Some(ch) if ch == first => Ok(multi),
        Some(ch) => {
            reader.pushback(ch)?;
            Ok(empty)
        }
        None => Ok(empty),
    }
}

/// Parses a string value whose opening quote `first` has just been consumed.
pub(crate) fn parse_string<I>(reader: &mut Reader<I>, first: char) -> Result<String>
where
    I: Iterator<Item = char>,
{
    let kind = read_delimiter(reader, first)?;
    let mut contents = String::new();
    if kind.is_empty() {
        return Ok(contents);
    }

    if kind.is_multiline() {
        skip_leading_newline(reader, &mut contents)?;
    }

    loop {
        let Some(ch) = reader.next() else {
            let (line, col) = reader.position();
            return Err(Error::unexpected_eof(
                line,
                col,
                &format!("closing {}", kind.as_str()),
            ));
        };
        match ch {
            '\n' if !kind.is_multiline() => {
                let (line, col) = reader.last_position();
                return Err(Error::UnterminatedString { line, col });
            }
            '\\' if kind.escapes() => {
                if let Some(escaped) = parse_escape(reader, kind)? {
                    contents.push(escaped);
                }
            }
            '"' | '\'' => {
                let end = read_delimiter(reader, ch)?;
                if end == kind {
                    return Ok(contents);
                }
                contents.push_str(end.as_str());
            }
            _ => contents.push(ch),
        }
    }
}

// A newline right after an opening `"""`/`'''` is not part of the value.
fn skip_leading_newline<I>(reader: &mut Reader<I>, contents: &mut String) -> Result<()>
where
    I: Iterator<Item = char>,
{
    match reader.next() {
        Some('\n') | None => Ok(()),
        Some('\r') => match reader.next() {
            Some('\n') | None => Ok(()),
            Some(ch) => {
                contents.push('\r');
                reader.pushback(ch)
            }
        },
        Some(ch) => reader.pushback(ch),
    }
}

/// Handles the character(s) after a backslash.
///
/// Returns `None` for a line-ending backslash, which produces no text.
fn parse_escape<I>(reader: &mut Reader<I>, kind: Delimiter) -> Result<Option<char>>
where
    I: Iterator<Item = char>,
{
    let (line, col) = reader.last_position();
    let Some(next) = reader.next() else {
        let (line, col) = reader.position();
        return Err(Error::unexpected_eof(line, col, "escape sequence"));
    };
    let literal = match next {
        'b' => '\u{0008}',
        't' => '\t',
        'n' => '\n',
        'f' => '\u{000C}',
        'r' => '\r',
        '"' => '"',
        '\\' => '\\',
        '/' => '/',
        'u' | 'U' => parse_unicode(reader, line, col)?,
        ' ' | '\t' | '\r' | '\n' if kind.is_multiline() => {
            reader.skip_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))?;
            return Ok(None);
        }
        other => {
            return Err(Error::invalid_escape(
                line,
                col,
                &format!("unsupported escape sequence \\{}", other.escape_debug()),
            ))
        }
    };
    Ok(Some(literal))
}

// Up to eight hex digits. A non-hex character exactly after the fourth digit
// ends a short `\uXXXX` form and is left for the caller.
fn parse_unicode<I>(reader: &mut Reader<I>, line: usize, col: usize) -> Result<char>
where
    I: Iterator<Item = char>,
{
    let mut code: u32 = 0;
    for i in 0..8 {
        let Some(ch) = reader.next() else {
            let (line, col) = reader.position();
            return Err(Error::unexpected_eof(line, col, "unicode escape digits"));
        };
        match ch.to_digit(16) {
            Some(digit) => code = code << 4 | digit,
            None if i == 4 => {
                reader.pushback(ch)?;
                break;
            }
            None => {
                return Err(Error::invalid_escape(
                    line,
                    col,
                    &format!(
                        "invalid unicode escape sequence \\u{:0>width$x}{}",
                        code,
                        ch.escape_debug(),
                        width = i
                    ),
                ))
            }
        }
    }
    if (0xD800..=0xDFFF).contains(&code) || code > 0x10FFFF {
        return Err(Error::invalid_escape(
            line,
            col,
            &format!("invalid unicode escape sequence \\u{:x}: not a scalar value", code),
        ));
    }
    char::from_u32(code).ok_or_else(|| {
        Error::invalid_escape(line, col, &format!("invalid unicode escape \\u{:x}", code))
    })
}
