//! Line indexing for in-memory text.
//!
//! # Overview
//!
//! Splits a text into position-aware line slices. Both `"\r\n"` and `"\n"`
//! terminate a line, and the end of the text is an implicit boundary: the
//! segment after the last terminator always yields a line, even when it is
//! empty. Consequently:
//!
//! - `""` yields one empty line
//! - `"a\n"` yields `"a"` and `""`
//! - `"a\r\nb"` yields `"a"` and `"b"`
//!
//! A lone `'\r'` that is not followed by `'\n'` is kept as line content.
//!
//! # Example
//!
//! ```
//! use dupline::scanner::index_lines;
//!
//! let lines = index_lines("Rex\r\nMilou\nRex");
//! assert_eq!(lines.len(), 3);
//! assert_eq!(lines[1].raw, "Milou");
//! assert_eq!(lines[1].start_offset, 5);
//! assert_eq!(lines[2].line_number, 3);
//! ```

/// One line of the original text, before any window is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedLine<'a> {
    /// 1-based line number, assigned in encounter order
    pub line_number: usize,
    /// Line content without its terminator
    pub raw: &'a str,
    /// Byte offset of the first character of `raw` within the text
    pub start_offset: usize,
}

/// Iterator over the lines of a text.
///
/// Finite and non-restartable; the whole text stays borrowed for the
/// lifetime of the iterator.
#[derive(Debug, Clone)]
pub struct LineIndexer<'a> {
    text: &'a str,
    position: usize,
    next_number: usize,
    finished: bool,
}

impl<'a> LineIndexer<'a> {
    /// Create an indexer over `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            position: 0,
            next_number: 1,
            finished: false,
        }
    }
}

impl<'a> Iterator for LineIndexer<'a> {
    type Item = IndexedLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let start = self.position;
        let rest = &self.text[start..];
        let line_number = self.next_number;
        self.next_number += 1;

        match rest.find('\n') {
            Some(newline) => {
                let content_end = if newline > 0 && rest.as_bytes()[newline - 1] == b'\r' {
                    newline - 1
                } else {
                    newline
                };
                self.position = start + newline + 1;
                Some(IndexedLine {
                    line_number,
                    raw: &rest[..content_end],
                    start_offset: start,
                })
            }
            None => {
                // End of text closes the final segment.
                self.finished = true;
                Some(IndexedLine {
                    line_number,
                    raw: rest,
                    start_offset: start,
                })
            }
        }
    }
}

/// Split `text` into indexed lines.
///
/// Line numbers are exactly `1..=k` where `k` is the number of
/// terminator-delimited segments including the final one.
#[must_use]
pub fn index_lines(text: &str) -> Vec<IndexedLine<'_>> {
    let lines: Vec<IndexedLine<'_>> = LineIndexer::new(text).collect();
    log::trace!("Indexed {} line(s) from {} byte(s)", lines.len(), text.len());
    lines
}
