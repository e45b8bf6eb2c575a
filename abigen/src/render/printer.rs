/// Lines longer than this get their argument and parameter lists broken up.
pub(crate) const MAX_WIDTH: usize = 80;
const INDENT: &str = "  ";

/// An indentation-aware text buffer.
#[derive(Debug, Default)]
pub(crate) struct Printer {
    out: String,
    indent: usize,
    column: usize,
}

impl Printer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Writes text that contains no line break.
    pub(crate) fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.column == 0 {
            for _ in 0..self.indent {
                self.out.push_str(INDENT);
            }
            self.column = self.indent * INDENT.len();
        }
        self.out.push_str(text);
        self.column += text.chars().count();
    }

    pub(crate) fn newline(&mut self) {
        self.out.push('\n');
        self.column = 0;
    }

    pub(crate) fn line(&mut self, text: &str) {
        self.write(text);
        self.newline();
    }

    pub(crate) fn blank_line(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.newline();
        }
    }

    pub(crate) fn indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    /// The column the next write starts at.
    pub(crate) fn column(&self) -> usize {
        if self.column == 0 {
            self.indent * INDENT.len()
        } else {
            self.column
        }
    }

    /// Whether `extra` more characters still fit on the current line.
    pub(crate) fn fits(&self, extra: usize) -> bool {
        self.column() + extra <= MAX_WIDTH
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_only_at_line_start() {
        let mut printer = Printer::new();
        printer.line("a {");
        printer.indented(|p| {
            p.write("b");
            p.write("c");
            p.newline();
        });
        printer.line("}");
        assert_eq!(printer.finish(), "a {\n  bc\n}\n");
    }

    #[test]
    fn blank_lines_do_not_stack() {
        let mut printer = Printer::new();
        printer.blank_line();
        printer.line("a");
        printer.blank_line();
        printer.blank_line();
        printer.line("b");
        assert_eq!(printer.finish(), "a\n\nb\n");
    }
}
