// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Elastic tabstops and trailing-whitespace trimming.
//!
//! The printer emits text in which `\t` and `\v` terminate aligned cells and
//! `\n`/`\f` terminate lines; `\f` additionally ends an alignment section.
//! [`TabWriter`] lays those cells out in columns. Leading empty cells are
//! indentation and are written as tabs; every other cell is padded with
//! blanks. Text bracketed by [`ESCAPE`] bytes (literals, comments) passes
//! through uninterpreted and still counts towards its cell's width.
//!
//! [`trim`] runs last: it removes trailing blanks and tabs from every line,
//! turns `\v`/`\f` into `\t`/`\n` and strips the escape bytes.

/// Brackets text that must pass through alignment unchanged. Never occurs in
/// valid UTF-8.
pub(crate) const ESCAPE: u8 = 0xff;

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    /// Size in bytes, escapes included.
    size: usize,
    /// Width in characters, escapes excluded.
    width: usize,
    /// Terminated by a hard `\t`; such columns are never discarded.
    htab: bool,
}

/// Column aligner with minimum width 0, blank padding, discarded empty
/// columns and tab indentation.
#[derive(Debug)]
pub(crate) struct TabWriter {
    tab_width: usize,
    padding: usize,
    buf: Vec<u8>,
    /// Position in `buf` up to which the current cell's width is known.
    pos: usize,
    cell: Cell,
    in_escape: bool,
    lines: Vec<Vec<Cell>>,
    widths: Vec<usize>,
    output: Vec<u8>,
}

impl TabWriter {
    pub(crate) fn new(tab_width: usize, padding: usize) -> Self {
        TabWriter {
            tab_width,
            padding,
            buf: Vec::new(),
            pos: 0,
            cell: Cell::default(),
            in_escape: false,
            lines: vec![Vec::new()],
            widths: Vec::new(),
            output: Vec::new(),
        }
    }

    /// Align all of `input` and return the result.
    pub(crate) fn align(mut self, input: &[u8]) -> Vec<u8> {
        self.write(input);
        self.flush();
        self.output
    }

    fn write(&mut self, input: &[u8]) {
        let mut n = 0;
        for (i, &ch) in input.iter().enumerate() {
            if self.in_escape {
                if ch == ESCAPE {
                    self.append(&input[n..=i]);
                    n = i + 1;
                    self.end_escape();
                }
                continue;
            }
            match ch {
                b'\t' | b'\x0b' | b'\n' | b'\x0c' => {
                    self.append(&input[n..i]);
                    self.update_width();
                    n = i + 1;
                    let ncells = self.terminate_cell(ch == b'\t');
                    if ch == b'\n' || ch == b'\x0c' {
                        self.lines.push(Vec::new());
                        // A single-cell line cannot affect the layout of
                        // the lines after it.
                        if ch == b'\x0c' || ncells == 1 {
                            self.flush();
                        }
                    }
                }
                ESCAPE => {
                    self.append(&input[n..i]);
                    self.update_width();
                    n = i;
                    self.in_escape = true;
                }
                _ => {}
            }
        }
        self.append(&input[n..]);
    }

    fn append(&mut self, text: &[u8]) {
        self.buf.extend_from_slice(text);
        self.cell.size += text.len();
    }

    fn update_width(&mut self) {
        self.cell.width += char_count(&self.buf[self.pos..]);
        self.pos = self.buf.len();
    }

    fn end_escape(&mut self) {
        self.update_width();
        self.cell.width = self.cell.width.saturating_sub(2);
        self.pos = self.buf.len();
        self.in_escape = false;
    }

    fn terminate_cell(&mut self, htab: bool) -> usize {
        self.cell.htab = htab;
        let cell = std::mem::take(&mut self.cell);
        match self.lines.last_mut() {
            Some(line) => {
                line.push(cell);
                line.len()
            }
            None => {
                self.lines.push(vec![cell]);
                1
            }
        }
    }

    fn flush(&mut self) {
        if self.cell.size > 0 {
            if self.in_escape {
                self.end_escape();
            }
            self.terminate_cell(false);
        }
        self.format(0, 0, self.lines.len());
        self.buf.clear();
        self.pos = 0;
        self.cell = Cell::default();
        self.in_escape = false;
        self.lines.clear();
        self.lines.push(Vec::new());
        self.widths.clear();
    }

    /// Lay out lines `line0..line1`, starting at byte `pos0` of the buffer.
    fn format(&mut self, pos0: usize, mut line0: usize, line1: usize) -> usize {
        let mut pos = pos0;
        let column = self.widths.len();
        let mut this = line0;
        while this < line1 {
            // The last cell of a line is text before the line break, not a column.
            if column + 1 >= self.lines[this].len() {
                this += 1;
                continue;
            }

            pos = self.write_lines(pos, line0, this);
            line0 = this;

            let mut width = 0;
            let mut discardable = true;
            while this < line1 {
                let line = &self.lines[this];
                if column + 1 >= line.len() {
                    break;
                }
                let cell = line[column];
                width = width.max(cell.width + self.padding);
                if cell.width > 0 || cell.htab {
                    discardable = false;
                }
                this += 1;
            }
            if discardable {
                width = 0;
            }

            self.widths.push(width);
            pos = self.format(pos, line0, this);
            self.widths.pop();
            line0 = this;
        }
        self.write_lines(pos, line0, line1)
    }

    fn write_lines(&mut self, pos0: usize, line0: usize, line1: usize) -> usize {
        let mut pos = pos0;
        for i in line0..line1 {
            let mut use_tabs = true;
            for j in 0..self.lines[i].len() {
                let cell = self.lines[i][j];
                if cell.size == 0 {
                    if let Some(&width) = self.widths.get(j) {
                        self.write_padding(cell.width, width, use_tabs);
                    }
                } else {
                    use_tabs = false;
                    self.output
                        .extend_from_slice(&self.buf[pos..pos + cell.size]);
                    pos += cell.size;
                    if let Some(&width) = self.widths.get(j) {
                        self.write_padding(cell.width, width, false);
                    }
                }
            }
            if i + 1 == self.lines.len() {
                // The last buffered line has no line break yet.
                let end = pos + self.cell.size;
                self.output.extend_from_slice(&self.buf[pos..end]);
                pos = end;
            } else {
                self.output.push(b'\n');
            }
        }
        pos
    }

    fn write_padding(&mut self, text_width: usize, cell_width: usize, use_tabs: bool) {
        if use_tabs {
            if self.tab_width == 0 {
                return;
            }
            let cell_width = cell_width.div_ceil(self.tab_width) * self.tab_width;
            let n = cell_width.saturating_sub(text_width);
            let tabs = n.div_ceil(self.tab_width);
            self.output.resize(self.output.len() + tabs, b'\t');
            return;
        }
        let n = cell_width.saturating_sub(text_width);
        self.output.resize(self.output.len() + n, b' ');
    }
}

/// Number of UTF-8 characters in `bytes`; stray bytes count as one each.
fn char_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b & 0xc0 != 0x80).count()
}

/// Strip trailing blanks and tabs from every line, normalize `\v` and `\f`
/// and drop escape bytes. Escaped text is copied verbatim.
pub(crate) fn trim(input: &[u8]) -> Vec<u8> {
    #[derive(PartialEq)]
    enum State {
        Space,
        Escape,
        Text,
    }

    let mut output = Vec::with_capacity(input.len());
    let mut space: Vec<u8> = Vec::new();
    let mut state = State::Space;
    let mut m = 0;
    for (n, &raw) in input.iter().enumerate() {
        let b = if raw == b'\x0b' { b'\t' } else { raw };
        match state {
            State::Space => match b {
                b'\t' | b' ' => space.push(b),
                b'\n' | b'\x0c' => {
                    space.clear();
                    output.push(b'\n');
                }
                ESCAPE => {
                    output.append(&mut space);
                    state = State::Escape;
                    m = n + 1;
                }
                _ => {
                    output.append(&mut space);
                    state = State::Text;
                    m = n;
                }
            },
            State::Escape => {
                if b == ESCAPE {
                    output.extend_from_slice(&input[m..n]);
                    state = State::Space;
                }
            }
            State::Text => match b {
                b'\t' | b' ' => {
                    output.extend_from_slice(&input[m..n]);
                    space.push(b);
                    state = State::Space;
                }
                b'\n' | b'\x0c' => {
                    output.extend_from_slice(&input[m..n]);
                    output.push(b'\n');
                    state = State::Space;
                }
                ESCAPE => {
                    output.extend_from_slice(&input[m..n]);
                    state = State::Escape;
                    m = n + 1;
                }
                _ => {}
            },
        }
    }
    if state != State::Space {
        output.extend_from_slice(&input[m..]);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(input: &str) -> String {
        let aligned = TabWriter::new(8, 1).align(input.as_bytes());
        String::from_utf8(trim(&aligned)).unwrap()
    }

    #[test]
    fn test_aligns_soft_cells() {
        assert_eq!(
            layout("a\x0b= 1\nbbb\x0b= 2\n"),
            "a   = 1\nbbb = 2\n"
        );
    }

    #[test]
    fn test_indentation_uses_tabs() {
        assert_eq!(layout("\tx\x0b// a\n\tyy\x0b// b\n"), "\tx  // a\n\tyy // b\n");
    }

    #[test]
    fn test_formfeed_breaks_alignment() {
        assert_eq!(
            layout("a\x0b= 1\x0cbbbb\x0b= 2\n"),
            "a = 1\nbbbb = 2\n"
        );
    }

    #[test]
    fn test_single_cell_line_breaks_alignment() {
        assert_eq!(
            layout("a\x0b= 1\nfunc\nbbbb\x0b= 2\n"),
            "a = 1\nfunc\nbbbb = 2\n"
        );
    }

    #[test]
    fn test_escaped_text_is_not_interpreted() {
        let input = [b"x := ".as_slice(), &[ESCAPE], b"`a\tb  `", &[ESCAPE], b"\n"].concat();
        let aligned = TabWriter::new(8, 1).align(&input);
        assert_eq!(trim(&aligned), b"x := `a\tb  `\n");
    }

    #[test]
    fn test_trim_strips_trailing_whitespace() {
        assert_eq!(trim(b"a  \n\t\nb\x0bc \x0c"), b"a\n\nb\tc\n");
    }
}
