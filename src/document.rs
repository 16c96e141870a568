use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    /// Picks the ending used to write a document back out.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else if text.contains('\r') {
            LineEnding::Cr
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

/// Splits `text` on `\r\n`, `\r` and `\n`. A trailing terminator yields a
/// final empty line, so joining the result restores the input.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    lines.push(&text[start..]);
    lines
}

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// A Markdown note held as lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
    line_ending: LineEnding,
    byte_order_mark: bool,
}

impl Document {
    /// A leading byte order mark is kept aside so the first line reads like
    /// any other, and restored by `render`.
    pub fn parse(text: &str) -> Self {
        let (byte_order_mark, text) = match text.strip_prefix(BYTE_ORDER_MARK) {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        Self {
            lines: split_lines(text).into_iter().map(str::to_string).collect(),
            line_ending: LineEnding::detect(text),
            byte_order_mark,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn remove_indices(&mut self, indices: &BTreeSet<usize>) {
        let mut linum = 0;
        self.lines.retain(|_| {
            let keep = !indices.contains(&linum);
            linum += 1;
            keep
        });
    }

    /// Index of the first line equal to `text`, ignoring trailing whitespace.
    pub fn find_line(&self, text: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.trim_end() == text.trim_end())
    }

    pub fn insert_lines<I>(&mut self, at: usize, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        let at = at.min(self.lines.len());
        self.lines.splice(at..at, lines);
    }

    /// Appends after the last line, keeping a trailing line terminator in
    /// place.
    pub fn append_lines<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        match self.lines.last() {
            Some(last) if last.is_empty() => {
                let at = self.lines.len() - 1;
                self.insert_lines(at, lines);
            }
            _ => self.lines.extend(lines),
        }
    }

    pub fn render(&self) -> String {
        let body = self.lines.join(self.line_ending.as_str());
        if self.byte_order_mark {
            format!("{}{}", BYTE_ORDER_MARK, body)
        } else {
            body
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
