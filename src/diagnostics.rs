//! Diagnostic reporting (component D).
//!
//! A `Sink` owns the source text (split once into lines, tabs expanded so
//! caret columns line up with what a terminal actually renders) and the two
//! output streams diagnostics are split across: errors to stderr, warnings
//! and notes to stdout. Warning emission is gated by a single flag the
//! driver sets from `--warn`.

use std::io::Write;

const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }
}

pub struct Sink {
    lines: Vec<String>,
    warnings_enabled: bool,
    error_count: usize,
    warning_count: usize,
    errors_out: Box<dyn Write>,
    warnings_out: Box<dyn Write>,
}

impl Sink {
    pub fn new(source: &str, warnings_enabled: bool, errors_out: Box<dyn Write>, warnings_out: Box<dyn Write>) -> Self {
        Sink {
            lines: source.lines().map(expand_tabs).collect(),
            warnings_enabled,
            error_count: 0,
            warning_count: 0,
            errors_out,
            warnings_out,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn error(&mut self, location: crate::location::Location, message: impl Into<String>) {
        self.error_count += 1;
        self.report(Severity::Error, location, message.into());
    }

    pub fn warning(&mut self, location: crate::location::Location, message: impl Into<String>) {
        if !self.warnings_enabled {
            return;
        }
        self.warning_count += 1;
        self.report(Severity::Warning, location, message.into());
    }

    /// An unconditional follow-up line to the diagnostic just reported, e.g.
    /// `"previously used here"` pointing at an earlier case label. Always
    /// printed regardless of the warning flag, matching the diagnostic it
    /// attaches to.
    pub fn note(&mut self, location: crate::location::Location, message: impl Into<String>) {
        self.report(Severity::Note, location, message.into());
    }

    fn report(&mut self, severity: Severity, location: crate::location::Location, message: String) {
        let stream: &mut dyn Write = match severity {
            Severity::Error => &mut self.errors_out,
            Severity::Warning | Severity::Note => &mut self.warnings_out,
        };
        let _ = writeln!(stream, "{}: {}: {}", location, severity.label(), message);

        if location.line == 0 {
            return;
        }
        if let Some(line) = self.lines.get(location.line - 1) {
            let _ = writeln!(stream, "{line}");
            let _ = writeln!(stream, "{}", underline(line, location.column, location.length));
        }
    }
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - (out.chars().count() % TAB_WIDTH);
            out.extend(std::iter::repeat(' ').take(pad));
        } else {
            out.push(ch);
        }
    }
    out
}

/// `column` is the 1-based index of the token's last character; `length`
/// characters are underlined, ending at `column`.
fn underline(line: &str, column: usize, length: usize) -> String {
    let width = line.chars().count();
    let end = column.min(width);
    let start = end.saturating_sub(length);
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat(' ').take(start));
    if length > 0 {
        out.push('^');
        out.extend(std::iter::repeat('~').take(length.saturating_sub(1)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    fn sink(source: &str, warnings_enabled: bool) -> (Sink, std::rc::Rc<std::cell::RefCell<Vec<u8>>>, std::rc::Rc<std::cell::RefCell<Vec<u8>>>) {
        struct Shared(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);
        impl Write for Shared {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.borrow_mut().write(buf)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let errs = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let warns = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = Sink::new(
            source,
            warnings_enabled,
            Box::new(Shared(errs.clone())),
            Box::new(Shared(warns.clone())),
        );
        (sink, errs, warns)
    }

    #[test]
    fn error_goes_to_the_error_stream_with_caret_underline() {
        let (mut s, errs, _warns) = sink("int x = 1;", true);
        s.error(Location::new(1, 5, 1), "'x' undeclared");
        let text = String::from_utf8(errs.borrow().clone()).unwrap();
        assert!(text.contains("1:5: error: 'x' undeclared"));
        assert!(text.contains("int x = 1;"));
        assert!(text.contains("^"));
    }

    #[test]
    fn warnings_are_suppressed_when_disabled() {
        let (mut s, _errs, warns) = sink("int x;", false);
        s.warning(Location::new(1, 4, 1), "'x' declared but not used");
        assert!(warns.borrow().is_empty());
        assert_eq!(s.warning_count(), 0);
    }

    #[test]
    fn tabs_expand_before_underlining_so_columns_still_align() {
        let (mut s, errs, _warns) = sink("\tx = 1;", true);
        s.error(Location::new(1, 2, 1), "'x' undeclared");
        let text = String::from_utf8(errs.borrow().clone()).unwrap();
        let underline_line = text.lines().nth(2).unwrap();
        assert_eq!(underline_line, "   ^");
    }

    #[test]
    fn has_errors_tracks_error_reports_only() {
        let (mut s, _errs, _warns) = sink("x;", true);
        assert!(!s.has_errors());
        s.warning(Location::new(1, 1, 1), "unused");
        assert!(!s.has_errors());
        s.error(Location::new(1, 1, 1), "bad");
        assert!(s.has_errors());
        assert_eq!(s.error_count(), 1);
    }
}
