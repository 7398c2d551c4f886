//! Styled console output.
//!
//! [`Console`] is a plain value carrying the color choice; it holds no
//! global state and is passed to whatever needs to print. Formatting and
//! printing are split so the formatting can be tested.
//!
//! Printing never panics: a closed stdout or stderr (e.g. piping into
//! `head`) drops the line instead of aborting a running training job.

use std::io::{self, Write};

use colored::{Color, Colorize};

use crate::ports::process::{LineSink, Stream};

const RULE: &str = "============================================================";

/// Prints banner, section, status and relayed child lines.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
}

impl Console {
    /// Creates a console; `color = false` never emits ANSI escapes.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Tool banner.
    #[must_use]
    pub fn format_header(self) -> String {
        let title = "||       GLOBAL CLIMATE MODEL ERROR CORRECTION TOOLKIT     ||";
        [RULE, title, RULE].map(|line| self.paint(line, Color::Cyan)).join("\n")
    }

    /// `=== title ===` section heading.
    #[must_use]
    pub fn format_section(self, title: &str) -> String {
        self.paint(&format!("=== {title} ==="), Color::Yellow)
    }

    /// Green check line.
    #[must_use]
    pub fn format_success(self, message: &str) -> String {
        self.paint(&format!("✓ {message}"), Color::Green)
    }

    /// Blue information line.
    #[must_use]
    pub fn format_info(self, message: &str) -> String {
        self.paint(&format!("ℹ {message}"), Color::Blue)
    }

    /// Red cross line.
    #[must_use]
    pub fn format_error(self, message: &str) -> String {
        self.paint(&format!("✗ {message}"), Color::Red)
    }

    /// Highlighted identifier (variable ids in listings).
    #[must_use]
    pub fn format_key(self, key: &str) -> String {
        self.paint(key, Color::Cyan)
    }

    /// Prints the banner followed by a blank line.
    pub fn header(self) {
        write_stdout(&format!("{}\n", self.format_header()));
    }

    /// Prints a section heading surrounded by blank lines.
    pub fn section(self, title: &str) {
        write_stdout(&format!("\n{}\n", self.format_section(title)));
    }

    /// Prints a success line.
    pub fn success(self, message: &str) {
        write_stdout(&self.format_success(message));
    }

    /// Prints an information line.
    pub fn info(self, message: &str) {
        write_stdout(&self.format_info(message));
    }

    /// Prints an error line to stderr.
    pub fn error(self, message: &str) {
        write_stderr(&self.format_error(message));
    }

    /// Prints an unstyled line.
    pub fn plain(self, message: &str) {
        write_stdout(message);
    }
}

impl LineSink for Console {
    fn line(&self, stream: Stream, line: &str) {
        match stream {
            Stream::Stdout => write_stdout(line),
            Stream::Stderr => self.error(line),
        }
    }
}

/// Writes `text` and a newline to stdout, ignoring write errors.
pub fn write_stdout(text: &str) {
    let _ = writeln!(io::stdout().lock(), "{text}");
}

/// Writes `text` and a newline to stderr, ignoring write errors.
pub fn write_stderr(text: &str) {
    let _ = writeln!(io::stderr().lock(), "{text}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_console_has_markers_and_no_escapes() {
        let console = Console::new(false);

        assert_eq!(console.format_success("done"), "✓ done");
        assert_eq!(console.format_info("note"), "ℹ note");
        assert_eq!(console.format_error("bad"), "✗ bad");
        assert_eq!(console.format_section("Check"), "=== Check ===");
        assert!(!console.format_header().contains('\u{1b}'));
        assert_eq!(console.format_header().lines().count(), 3);
    }

    #[test]
    fn colored_console_keeps_the_text() {
        let console = Console::new(true);
        assert!(console.format_error("bad").contains("✗ bad"));
    }
}
