//! Output formatting for CLI commands
//!
//! Every byte task-cli prints goes through [`Output`], so the dispatcher can
//! run against in-memory writers in tests.
//!
//! Result lines report write failures to the caller. Diagnostics on stderr
//! are best effort, since stderr is where a failure would be reported.

use std::io::{self, Write};

/// Output helper for consistent formatting
pub struct Output<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    verbose: bool,
}

impl<'a> Output<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write, verbose: bool) -> Self {
        Self { out, err, verbose }
    }

    /// Prints a result line on stdout
    pub fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()
    }

    /// Prints an error message on stderr
    pub fn error(&mut self, message: &str) {
        let _ = writeln!(self.err, "Error: {}", message);
    }

    /// Prints a follow-up hint on stderr
    pub fn hint(&mut self, message: &str) {
        let _ = writeln!(self.err, "{}", message);
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&mut self, message: &str) {
        if self.verbose {
            let _ = writeln!(self.err, "[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&mut self, context: &str, message: &str) {
        if self.verbose {
            let _ = writeln!(self.err, "[verbose:{}] {}", context, message);
        }
    }
}
