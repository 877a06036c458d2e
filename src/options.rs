//! Configuration options for parsing and writing documents.
//!
//! - [`ParseOptions`]: limits applied while parsing
//! - [`FormatOptions`]: layout of text produced by the writer
//!
//! ## Examples
//!
//! ```rust
//! use serde_tomlet::{parse_with_options, ParseOptions};
//!
//! let options = ParseOptions::new().with_max_depth(2);
//! assert!(parse_with_options("a = [[1]]", options.clone()).is_ok());
//! assert!(parse_with_options("a = [[[1]]]", options).is_err());
//! ```

/// Options controlling the parser.
///
/// # Examples
///
/// ```rust
/// use serde_tomlet::ParseOptions;
///
/// let options = ParseOptions::new();
/// assert_eq!(options.max_depth, 128);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed nesting of arrays and inline tables inside one value.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { max_depth: 128 }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nesting limit for arrays and inline tables.
    ///
    /// Parsing is recursive, so the limit also bounds stack usage on hostile input.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Options controlling the writer.
///
/// Controls how arrays are laid out and how sections are separated.
///
/// # Examples
///
/// ```rust
/// use serde_tomlet::FormatOptions;
///
/// // Default compact options
/// let options = FormatOptions::new();
/// assert!(!options.pretty);
///
/// // One array element per line, 4-space indent
/// let options = FormatOptions::pretty().with_indent(4);
/// assert_eq!(options.indent, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    pub indent: usize,
    pub pretty: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            indent: 2,
            pretty: false,
        }
    }
}

impl FormatOptions {
    /// Creates default options (inline arrays, no blank lines between tables).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that put each array element on its own line and separate
    /// table sections with a blank line.
    #[must_use]
    pub fn pretty() -> Self {
        FormatOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation (in spaces) of multi-line array elements.
    ///
    /// Default is 2. Only affects pretty-printed output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}
