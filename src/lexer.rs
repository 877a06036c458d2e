//! Classification of bare value tokens.
//!
//! By the time a token reaches [`classify`] the parser has already handled
//! quoted strings, arrays, inline tables and the `true`/`false` keywords. What
//! remains is a run of non-structural characters that must be a number or a
//! date/time literal. Grammars are tried in a fixed order, so a token such as
//! `1e06` is an exponent float and never reaches the date patterns.

use crate::{Error, Result, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new(concat!("^(?:", $re, ")$")).unwrap());
    };
}

pattern!(INTEGER, r"[+\-]?[0-9_]+");
pattern!(FLOAT, r"[+\-]?[0-9_]*[.][0-9_]+(?:[Ee][+\-]?[0-9_]+)?");
pattern!(SPECIAL_FLOAT, r"[+\-]?(?:inf|nan)");
pattern!(HEX_INTEGER, r"0x[0-9a-fA-F_]+");
pattern!(EXPONENT_FLOAT, r"[+\-]?[0-9_]*[Ee][+\-]?[0-9]+");
pattern!(BINARY_INTEGER, r"0b[01_]+");
pattern!(OCTAL_INTEGER, r"0o[0-7_]+");
pattern!(LOCAL_TIME, r"[0-9]{2}:[0-9]{2}:[0-9]{2}(?:[.][0-9]+)?");
pattern!(LOCAL_DATE, r"[0-9]{4}-[0-9]{2}-[0-9]{2}");
pattern!(
    LOCAL_DATETIME,
    r"[0-9]{4}-[0-9]{2}-[0-9]{2}[T ][0-9]{2}:[0-9]{2}:[0-9]{2}(?:[.][0-9]+)?"
);
pattern!(
    OFFSET_DATETIME,
    r"[0-9]{4}-[0-9]{2}-[0-9]{2}[T ][0-9]{2}:[0-9]{2}:[0-9]{2}(?:[.][0-9]+)?(?:Z|[+\-][0-9]{2}:[0-9]{2})"
);

/// Returns `true` if `token` is a complete local date (`YYYY-MM-DD`).
///
/// The parser uses this to decide whether a following space may continue the
/// token as a date-time.
pub(crate) fn is_local_date(token: &str) -> bool {
    LOCAL_DATE.is_match(token)
}

/// Converts a bare token into a typed scalar.
///
/// `line` and `col` locate the start of the token for error reporting.
pub(crate) fn classify(token: &str, line: usize, col: usize) -> Result<Value> {
    let invalid = || Error::InvalidLiteral {
        token: token.to_string(),
        line,
        col,
    };

    let value = if INTEGER.is_match(token) {
        trace!(token, "decimal integer");
        Value::Integer(parse_int(token, 10).ok_or_else(invalid)?)
    } else if FLOAT.is_match(token) {
        trace!(token, "decimal float");
        Value::Float(parse_float(token).ok_or_else(invalid)?)
    } else if SPECIAL_FLOAT.is_match(token) {
        trace!(token, "special float");
        Value::Float(if token.ends_with("nan") {
            f64::NAN
        } else if token.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        })
    } else if HEX_INTEGER.is_match(token) {
        trace!(token, "hexadecimal integer");
        Value::Integer(parse_int(&token[2..], 16).ok_or_else(invalid)?)
    } else if EXPONENT_FLOAT.is_match(token) {
        trace!(token, "exponent float");
        Value::Float(parse_float(token).ok_or_else(invalid)?)
    } else if BINARY_INTEGER.is_match(token) {
        trace!(token, "binary integer");
        Value::Integer(parse_int(&token[2..], 2).ok_or_else(invalid)?)
    } else if OCTAL_INTEGER.is_match(token) {
        trace!(token, "octal integer");
        Value::Integer(parse_int(&token[2..], 8).ok_or_else(invalid)?)
    } else if LOCAL_TIME.is_match(token)
        || LOCAL_DATE.is_match(token)
        || LOCAL_DATETIME.is_match(token)
        || OFFSET_DATETIME.is_match(token)
    {
        trace!(token, "date/time");
        Value::Datetime(token.to_string())
    } else {
        return Err(invalid());
    };
    Ok(value)
}

// Underscores are dropped wherever they appear; placement is not validated.
fn parse_int(digits: &str, radix: u32) -> Option<i64> {
    let cleaned = digits.replace('_', "");
    if radix == 10 {
        return cleaned.parse::<i64>().ok();
    }
    // Prefixed forms are unsigned bit patterns that must still fit in an i64.
    u64::from_str_radix(&cleaned, radix)
        .ok()
        .and_then(|n| i64::try_from(n).ok())
}

fn parse_float(token: &str) -> Option<f64> {
    let cleaned = token.replace('_', "");
    let (sign, rest) = match cleaned.as_bytes().first() {
        Some(b'+') | Some(b'-') => cleaned.split_at(1),
        _ => ("", cleaned.as_str()),
    };
    // Underscores alone are not digits: `._` and `1._e3` are rejected.
    let mantissa = rest.split(['e', 'E']).next().unwrap_or_default();
    let has_digits = |s: &str| s.bytes().any(|b| b.is_ascii_digit());
    if !has_digits(mantissa) || !mantissa.split_once('.').map_or(true, |(_, f)| has_digits(f)) {
        return None;
    }
    // `.5` and `-.5` are accepted by the grammar; Rust's parser needs the zero.
    if rest.starts_with('.') {
        format!("{}0{}", sign, rest).parse::<f64>().ok()
    } else {
        cleaned.parse::<f64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(token: &str) -> Value {
        classify(token, 1, 1).unwrap()
    }

    #[test]
    fn test_integers() {
        assert_eq!(lex("+99"), Value::Integer(99));
        assert_eq!(lex("-17"), Value::Integer(-17));
        assert_eq!(lex("1_2_3_4_5"), Value::Integer(12345));
        assert_eq!(lex("0xdead_beef"), Value::Integer(0xdead_beef));
        assert_eq!(lex("0o01234567"), Value::Integer(0o1234567));
        assert_eq!(lex("0b11010110"), Value::Integer(0b1101_0110));
    }

    #[test]
    fn test_floats() {
        assert_eq!(lex("224_617.445_991_228"), Value::Float(224_617.445_991_228));
        assert_eq!(lex("-2E-2"), Value::Float(-2e-2));
        assert_eq!(lex("1e06"), Value::Float(1e6));
        assert_eq!(lex(".5"), Value::Float(0.5));
        assert_eq!(lex("-.5"), Value::Float(-0.5));
        assert!(lex("-nan").as_float().unwrap().is_nan());
        assert_eq!(lex("-inf"), Value::Float(f64::NEG_INFINITY));
    }

    #[test]
    fn test_datetimes_are_kept_as_text() {
        for token in [
            "07:32:00",
            "00:32:00.999999",
            "1979-05-27",
            "1979-05-27T07:32:00",
            "1979-05-27 07:32:00.5",
            "1979-05-27T00:32:00-07:00",
            "1979-05-27T07:32:00Z",
        ] {
            assert_eq!(lex(token), Value::Datetime(token.to_string()), "{}", token);
        }
    }

    #[test]
    fn test_invalid_literals() {
        let tokens = [
            "abc", "0xZZ", "1.2.3", "--1", "0b102", "Infinity", "", "._", "-._", "1._", "_e5",
            "._e5",
        ];
        for token in tokens {
            let err = classify(token, 3, 7).unwrap_err();
            assert_eq!(
                err,
                Error::InvalidLiteral {
                    token: token.to_string(),
                    line: 3,
                    col: 7,
                }
            );
        }
    }

    #[test]
    fn test_overflow_is_invalid() {
        assert!(classify("9223372036854775808", 1, 1).is_err());
        assert!(classify("0xFFFFFFFFFFFFFFFF", 1, 1).is_err());
        assert_eq!(lex("-9223372036854775808"), Value::Integer(i64::MIN));
    }

    #[test]
    fn test_is_local_date() {
        assert!(is_local_date("1979-05-27"));
        assert!(!is_local_date("1979-05-27T07:32:00"));
    }
}
