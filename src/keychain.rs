//! Dotted key paths.
//!
//! A keychain is one or more segments joined by `.`, each either bare
//! (`[A-Za-z0-9_-]+`) or quoted with `"` or `'`. Quoted segments are taken
//! verbatim up to the matching quote; no escapes are processed, so
//! `site."google.com"` is the two segments `site` and `google.com`.
//!
//! The same grammar is used for keys in the document and for lookup paths
//! passed to [`Document`](crate::Document) accessors.

use crate::reader::Reader;
use crate::{Error, Result};

/// Ordered, non-empty list of key segments.
pub(crate) type Keychain = Vec<String>;

/// What may legally follow the last segment of a keychain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyEnd {
    /// `key = value`
    Assignment,
    /// `[table]` and `[[array]]`
    Header,
    /// accessor paths, which run to the end of the string
    Path,
}

impl KeyEnd {
    fn accepts(self, ch: Option<char>) -> bool {
        match self {
            KeyEnd::Assignment => ch == Some('='),
            KeyEnd::Header => ch == Some(']'),
            KeyEnd::Path => ch.is_none(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            KeyEnd::Assignment => "'=' or '.'",
            KeyEnd::Header => "']' or '.'",
            KeyEnd::Path => "'.' or end of path",
        }
    }
}

pub(crate) fn is_bare_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

pub(crate) fn is_horizontal_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r')
}

/// Reads a keychain, leaving the terminating character unconsumed.
pub(crate) fn parse_keychain<I>(reader: &mut Reader<I>, end: KeyEnd) -> Result<Keychain>
where
    I: Iterator<Item = char>,
{
    let mut keychain = Keychain::new();
    loop {
        keychain.push(parse_segment(reader)?);
        reader.skip_while(is_horizontal_space)?;

        let (line, col) = reader.position();
        match reader.peek()? {
            Some('.') => {
                reader.next();
            }
            next if end.accepts(next) => return Ok(keychain),
            Some(ch) if !is_bare_key_char(ch) && !matches!(ch, '"' | '\'' | '\n') => {
                return Err(Error::InvalidKeyChar {
                    found: ch,
                    line,
                    col,
                })
            }
            next => return Err(Error::expected(line, col, end.describe(), next)),
        }
    }
}

fn parse_segment<I>(reader: &mut Reader<I>) -> Result<String>
where
    I: Iterator<Item = char>,
{
    reader.skip_while(is_horizontal_space)?;
    let (line, col) = reader.position();
    match reader.next() {
        Some(quote @ ('"' | '\'')) => {
            let mut segment = String::new();
            loop {
                match reader.next() {
                    Some(ch) if ch == quote => break,
                    Some('\n') => {
                        let (line, col) = reader.last_position();
                        return Err(Error::UnexpectedNewline { line, col });
                    }
                    Some(ch) => segment.push(ch),
                    None => {
                        let (line, col) = reader.position();
                        return Err(Error::unexpected_eof(line, col, "closing quote of key"));
                    }
                }
            }
            if segment.is_empty() {
                return Err(Error::EmptyKey { line, col });
            }
            Ok(segment)
        }
        Some(ch) if is_bare_key_char(ch) => {
            let mut segment = String::from(ch);
            segment.push_str(&reader.read_while(is_bare_key_char)?);
            Ok(segment)
        }
        Some(ch @ ('.' | '=' | ']')) => {
            reader.pushback(ch)?;
            Err(Error::EmptyKey { line, col })
        }
        Some('\n') => Err(Error::UnexpectedNewline { line, col }),
        Some(ch) => Err(Error::InvalidKeyChar {
            found: ch,
            line,
            col,
        }),
        None => Err(Error::unexpected_eof(line, col, "key")),
    }
}

/// Splits an accessor path such as `servers."alpha.example".ip` into segments.
pub(crate) fn parse_path(path: &str) -> Result<Keychain> {
    let mut reader = Reader::new(path.chars());
    if path.trim().is_empty() {
        return Err(Error::EmptyKey { line: 1, col: 1 });
    }
    parse_keychain(&mut reader, KeyEnd::Path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keychain(input: &str) -> Result<Keychain> {
        let mut reader = Reader::new(input.chars());
        parse_keychain(&mut reader, KeyEnd::Assignment)
    }

    #[test]
    fn test_bare_keys() {
        for key in ["key", "bare_key", "bare-key", "1234"] {
            assert_eq!(keychain(&format!("{}=", key)).unwrap(), vec![key]);
        }
    }

    #[test]
    fn test_quoted_keys() {
        for (input, expected) in [
            ("\"127.0.0.1\"", "127.0.0.1"),
            ("\"character encoding\"", "character encoding"),
            ("\"ʎǝʞ\"", "ʎǝʞ"),
            ("'key2'", "key2"),
            ("'quoted \"value\"'", "quoted \"value\""),
            ("\"# this is not a comment\"", "# this is not a comment"),
        ] {
            assert_eq!(keychain(&format!("{} =", input)).unwrap(), vec![expected]);
        }
    }

    #[test]
    fn test_quoted_keys_skip_escapes() {
        assert_eq!(keychain(r#""a\tb"="#).unwrap(), vec![r"a\tb"]);
    }

    #[test]
    fn test_dotted_keys() {
        assert_eq!(
            keychain("physical.color =").unwrap(),
            vec!["physical", "color"]
        );
        assert_eq!(
            keychain("site . \"google.com\" =").unwrap(),
            vec!["site", "google.com"]
        );
    }

    #[test]
    fn test_terminator_is_left_in_place() {
        let mut reader = Reader::new("a.b = 1".chars());
        parse_keychain(&mut reader, KeyEnd::Assignment).unwrap();
        assert_eq!(reader.next(), Some('='));

        let mut reader = Reader::new("fruit.physical]".chars());
        assert_eq!(
            parse_keychain(&mut reader, KeyEnd::Header).unwrap(),
            vec!["fruit", "physical"]
        );
        assert_eq!(reader.next(), Some(']'));
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(
            keychain("a$b = 1").unwrap_err(),
            Error::InvalidKeyChar { found: '$', .. }
        ));
        assert!(matches!(
            keychain("= 1").unwrap_err(),
            Error::EmptyKey { .. }
        ));
        assert!(matches!(
            keychain("a. = 1").unwrap_err(),
            Error::EmptyKey { .. }
        ));
        assert!(matches!(
            keychain("\"\" = 1").unwrap_err(),
            Error::EmptyKey { .. }
        ));
        assert!(matches!(
            keychain("a b = 1").unwrap_err(),
            Error::Expected { .. }
        ));
        assert!(matches!(
            keychain("key\n= 1").unwrap_err(),
            Error::Expected { .. }
        ));
        assert!(matches!(
            keychain("key").unwrap_err(),
            Error::Expected { .. }
        ));
    }

    #[test]
    fn test_paths() {
        assert_eq!(parse_path("table-1.key1").unwrap(), vec!["table-1", "key1"]);
        assert_eq!(
            parse_path("site.\"site.example.com\"").unwrap(),
            vec!["site", "site.example.com"]
        );
        assert!(parse_path("").is_err());
        assert!(parse_path("a..b").is_err());
        assert!(parse_path("a=b").is_err());
    }
}
