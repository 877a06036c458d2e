//! Parsing behavior of the document format, case by case.

use rstest::rstest;
use serde_tomlet::{parse, Error, ErrorCategory, Kind, Value};

fn scalar(literal: &str) -> Value {
    let doc = parse(&format!("v = {}", literal)).unwrap();
    doc.get("v").cloned().unwrap()
}

fn parse_err(input: &str) -> Error {
    parse(input).unwrap_err()
}

#[rstest]
#[case("+99", 99)]
#[case("42", 42)]
#[case("0", 0)]
#[case("-17", -17)]
#[case("1_000", 1000)]
#[case("5_349_221", 5_349_221)]
#[case("0xDEADBEEF", 3_735_928_559)]
#[case("0xdead_beef", 0xdead_beef)]
#[case("0o755", 493)]
#[case("0o01234567", 0o1234567)]
#[case("0b11010110", 214)]
#[case("9223372036854775807", i64::MAX)]
#[case("-9223372036854775808", i64::MIN)]
fn integer_literals(#[case] literal: &str, #[case] expected: i64) {
    assert_eq!(scalar(literal), Value::Integer(expected));
}

#[rstest]
#[case("+1.0", 1.0)]
#[case("3.1415", 3.1415)]
#[case("-0.01", -0.01)]
#[case("5e+22", 5e22)]
#[case("1e06", 1e6)]
#[case("-2E-2", -2e-2)]
#[case("6.626e-34", 6.626e-34)]
#[case("224_617.445_991_228", 224_617.445_991_228)]
#[case("+inf", f64::INFINITY)]
#[case("inf", f64::INFINITY)]
#[case("-inf", f64::NEG_INFINITY)]
fn float_literals(#[case] literal: &str, #[case] expected: f64) {
    assert_eq!(scalar(literal), Value::Float(expected));
}

#[rstest]
#[case("nan")]
#[case("+nan")]
#[case("-nan")]
fn nan_literals(#[case] literal: &str) {
    assert!(scalar(literal).as_float().unwrap().is_nan());
}

#[rstest]
#[case("1979-05-27T07:32:00Z")]
#[case("1979-05-27T00:32:00-07:00")]
#[case("1979-05-27T00:32:00.999999-07:00")]
#[case("1979-05-27 07:32:00Z")]
#[case("1979-05-27T07:32:00")]
#[case("1979-05-27")]
#[case("07:32:00")]
#[case("00:32:00.999999")]
fn datetime_literals_keep_text(#[case] literal: &str) {
    assert_eq!(scalar(literal), Value::Datetime(literal.to_string()));
}

#[rstest]
#[case("1.")]
#[case("._")]
#[case("1._")]
#[case("_e5")]
#[case("1e")]
#[case("0xG1")]
#[case("+0x10")]
#[case("0b2")]
#[case("9223372036854775808")]
#[case("0xFFFFFFFFFFFFFFFF")]
#[case("1979-05")]
#[case("TRUE")]
#[case("infinity")]
#[case("bare")]
fn invalid_literals(#[case] literal: &str) {
    let err = parse_err(&format!("v = {}", literal));
    assert_eq!(
        err,
        Error::InvalidLiteral {
            token: literal.to_string(),
            line: 1,
            col: 5,
        }
    );
    assert_eq!(err.category(), ErrorCategory::Lexical);
}

#[test]
fn duplicate_keys_fail() {
    let err = parse_err("name = \"Tom\"\nname = \"Pradyun\"\n");
    assert_eq!(
        err,
        Error::DuplicateKey {
            key: "name".to_string(),
            line: 2,
            col: 1,
        }
    );
    assert!(err.to_string().contains("multiple"));
}

#[test]
fn duplicate_keys_across_dotted_and_headers() {
    assert!(matches!(
        parse_err("[a]\nb = 1\n[a]\nb = 2\n"),
        Error::DuplicateKey { .. }
    ));
    assert!(matches!(
        parse_err("a = { b = 1 }\na.b = 2\n"),
        Error::DuplicateKey { .. }
    ));
}

#[test]
fn table_headers_do_not_reopen_tables() {
    assert_eq!(
        parse_err("[a]\nx = 1\n[a]\ny = 2\n"),
        Error::DuplicateKey {
            key: "a".to_string(),
            line: 3,
            col: 1,
        }
    );
    assert_eq!(
        parse_err("a = {x = 1}\n[a]\ny = 2\n"),
        Error::DuplicateKey {
            key: "a".to_string(),
            line: 2,
            col: 1,
        }
    );

    let doc = parse("[a.b]\nc = 1\n[a]\ny = 2\n").unwrap();
    assert_eq!(doc.get_integer("a.b.c"), Some(1));
    assert_eq!(doc.get_integer("a.y"), Some(2));
}

#[test]
fn dotted_key_conflicts() {
    let err = parse_err("a.b = 1\na.b.c = 2\n");
    assert!(matches!(err, Error::KeyPathConflict { ref key, .. } if key == "b"));
    assert_eq!(err.category(), ErrorCategory::Semantic);

    let doc = parse("a.b.c = 1\na.d = 2\n").unwrap();
    assert_eq!(doc.get_integer("a.b.c"), Some(1));
    assert_eq!(doc.get_integer("a.d"), Some(2));
    let keys: Vec<_> = doc.get_table("a").unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["b", "d"]);

    // Only headers step into the last entry of an array of tables.
    assert!(matches!(
        parse_err("a = [{ x = 1 }]\na.y = 2\n"),
        Error::KeyPathConflict { ref key, .. } if key == "a"
    ));
    let doc = parse("a = [{ x = 1 }]\n[a.b]\ny = 2\n").unwrap();
    assert_eq!(doc.get_array("a").unwrap()[0].as_table().unwrap().len(), 2);
}

#[test]
fn escapes() {
    let doc = parse(
        r#"str = "I'm a string. \"You can quote me\". Name\tJos\u00E9\nLocation\tSF.""#,
    )
    .unwrap();
    assert_eq!(
        doc.get_string("str"),
        Some("I'm a string. \"You can quote me\". Name\tJos\u{e9}\nLocation\tSF.")
    );

    let err = parse_err(r#"bad = "\q""#);
    assert!(matches!(err, Error::InvalidEscape { .. }));
    assert_eq!(err.category(), ErrorCategory::Lexical);
    assert!(err.to_string().contains("escape"));
}

#[test]
fn multi_line_folding() {
    let input = "str = \"\"\"\nThe quick brown \\\n\n    fox jumps over \\\n        the lazy dog.\"\"\"\n";
    let doc = parse(input).unwrap();
    assert_eq!(
        doc.get_string("str"),
        Some("The quick brown fox jumps over the lazy dog.")
    );
}

#[test]
fn multi_line_strings_span_lines() {
    let input = "a = '''\nfirst\n  second'''\nb = \"\"\"x\"\"\"\n";
    let doc = parse(input).unwrap();
    assert_eq!(doc.get_string("a"), Some("first\n  second"));
    assert_eq!(doc.get_string("b"), Some("x"));
}

#[test]
fn array_homogeneity() {
    let err = parse_err("a = [1, \"a\"]");
    assert!(matches!(
        err,
        Error::HeterogeneousArray {
            expected: Kind::Integer,
            found: Kind::String,
            ..
        }
    ));

    let doc = parse("a = [[1,2],[3,4,5]]").unwrap();
    let outer = doc.get_array("a").unwrap();
    assert_eq!(outer.len(), 2);
    assert_eq!(outer[1].as_array().map(Vec::len), Some(3));
}

// Nested arrays are compared by their tag only; element kinds inside them may differ.
#[test]
fn nested_arrays_of_different_element_kinds() {
    let doc = parse("a = [ [ 1, 2 ], [\"a\", \"b\", \"c\"] ]").unwrap();
    assert_eq!(doc.get_array("a").map(Vec::len), Some(2));
}

#[test]
fn array_of_tables_scoping() {
    let doc = parse(
        "[[fruit]]\nname = \"apple\"\n[fruit.physical]\ncolor = \"red\"\n[[fruit]]\nname = \"banana\"\n",
    )
    .unwrap();
    let fruit = doc.get_array("fruit").unwrap();
    assert_eq!(fruit.len(), 2);

    let first = serde_tomlet::Document::from(fruit[0].clone());
    assert_eq!(first.get_string("physical.color"), Some("red"));
    let second = serde_tomlet::Document::from(fruit[1].clone());
    assert_eq!(second.get_string("name"), Some("banana"));
    assert_eq!(second.get("physical"), None);
}

#[test]
fn accessor_contract() {
    let doc = parse("[table-1]\nkey1 = \"v\"\n").unwrap();
    assert_eq!(doc.get_string("table-1.key1"), Some("v"));
    assert_eq!(doc.get_integer("table-1.key1"), None);
    assert_eq!(doc.get_string("missing.path"), None);
    assert!(matches!(
        doc.require_string("missing.path"),
        Err(Error::MissingKey(_))
    ));
}

#[test]
fn quoted_keys() {
    let doc = parse(
        "\"127.0.0.1\" = \"value\"\n'key2' = 2\nsite.\"google.com\" = true\n\"ʎǝʞ\" = \"unicode\"\n",
    )
    .unwrap();
    assert_eq!(doc.get_string("\"127.0.0.1\""), Some("value"));
    assert_eq!(doc.get_integer("key2"), Some(2));
    assert_eq!(doc.get_boolean("site.\"google.com\""), Some(true));
    assert_eq!(doc.get_string("\"ʎǝʞ\""), Some("unicode"));
}

#[rstest]
#[case("= \"no key\"")]
#[case("\"\" = 1")]
#[case("'' = 1")]
#[case("a. = 1")]
#[case("[]")]
fn empty_keys(#[case] input: &str) {
    assert!(matches!(parse_err(input), Error::EmptyKey { .. }));
}

#[rstest]
#[case("a = 1 b = 2", ErrorCategory::Structural)]
#[case("a = \"unterminated\nb = 1", ErrorCategory::Lexical)]
#[case("a = [1, 2", ErrorCategory::Lexical)]
#[case("a = { b = 1,\n c = 2 }", ErrorCategory::Structural)]
#[case("[table\nkey = 1", ErrorCategory::Structural)]
#[case("a$b = 1", ErrorCategory::Lexical)]
fn error_categories(#[case] input: &str, #[case] category: ErrorCategory) {
    let err = parse_err(input);
    assert_eq!(err.category(), category, "{}", err);
    assert!(err.position().is_some());
}

#[test]
fn error_positions() {
    let err = parse_err("a = 1\nb = @\n");
    assert_eq!(err.position(), Some((2, 5)));
    assert!(err.to_string().contains("line 2, column 5"));
}

#[test]
fn whitespace_and_comments() {
    let doc = parse("\n\t# comment\n  key = \"value\"   # trailing\n\n[ t ] # header comment\n x = 1\n")
        .unwrap();
    assert_eq!(doc.get_string("key"), Some("value"));
    assert_eq!(doc.get_integer("t.x"), Some(1));
}

#[test]
fn crlf_line_endings() {
    let doc = parse("a = 1\r\n[t]\r\nb = \"x\"\r\n").unwrap();
    assert_eq!(doc.get_integer("a"), Some(1));
    assert_eq!(doc.get_string("t.b"), Some("x"));
}

#[test]
fn empty_document() {
    let doc = parse("").unwrap();
    assert!(doc.as_table().unwrap().is_empty());
    let doc = parse("# only a comment\n\n").unwrap();
    assert!(doc.as_table().unwrap().is_empty());
}
