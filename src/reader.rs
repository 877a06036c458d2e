//! Character reader with a single slot of pushback.
//!
//! Every other part of the parser consumes input through [`Reader`]. It does no
//! interpretation of its own: it hands out characters, accepts at most one back,
//! and keeps track of where the next character sits for error messages.

use crate::{Error, Result};

/// One-character pushback over any `char` iterator.
pub(crate) struct Reader<I: Iterator<Item = char>> {
    chars: I,
    pushed: Option<char>,
    line: usize,
    col: usize,
    // Position of the most recently consumed character, restored on pushback.
    last: (usize, usize),
}

impl<I: Iterator<Item = char>> Reader<I> {
    pub(crate) fn new(chars: I) -> Self {
        Reader {
            chars,
            pushed: None,
            line: 1,
            col: 1,
            last: (1, 1),
        }
    }

    /// Line and column of the next character to be read.
    pub(crate) fn position(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    /// Line and column of the character most recently returned by [`next`](Self::next).
    pub(crate) fn last_position(&self) -> (usize, usize) {
        self.last
    }

    pub(crate) fn next(&mut self) -> Option<char> {
        let ch = match self.pushed.take() {
            Some(ch) => ch,
            None => self.chars.next()?,
        };
        self.last = (self.line, self.col);
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Returns `ch` to the stream so the next [`next`](Self::next) yields it again.
    ///
    /// Only one character may be pending at a time.
    pub(crate) fn pushback(&mut self, ch: char) -> Result<()> {
        if let Some(pending) = self.pushed {
            return Err(Error::Internal(format!(
                "pushback of {:?} while {:?} is still pending",
                ch, pending
            )));
        }
        self.pushed = Some(ch);
        (self.line, self.col) = self.last;
        Ok(())
    }

    pub(crate) fn peek(&mut self) -> Result<Option<char>> {
        match self.next() {
            Some(ch) => {
                self.pushback(ch)?;
                Ok(Some(ch))
            }
            None => Ok(None),
        }
    }

    pub(crate) fn skip_while<P>(&mut self, mut pred: P) -> Result<()>
    where
        P: FnMut(char) -> bool,
    {
        while let Some(ch) = self.next() {
            if !pred(ch) {
                return self.pushback(ch);
            }
        }
        Ok(())
    }

    pub(crate) fn read_while<P>(&mut self, mut pred: P) -> Result<String>
    where
        P: FnMut(char) -> bool,
    {
        let mut text = String::new();
        while let Some(ch) = self.next() {
            if !pred(ch) {
                self.pushback(ch)?;
                break;
            }
            text.push(ch);
        }
        Ok(text)
    }

    /// Like [`read_while`](Self::read_while), but yields `None` without consuming
    /// anything when the first character already fails `pred`.
    pub(crate) fn try_read_while<P>(&mut self, mut pred: P) -> Result<Option<String>>
    where
        P: FnMut(char) -> bool,
    {
        match self.next() {
            Some(ch) if pred(ch) => {
                let mut text = String::from(ch);
                text.push_str(&self.read_while(pred)?);
                Ok(Some(text))
            }
            Some(ch) => {
                self.pushback(ch)?;
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
