//! Output sinks handed to the dispatcher and to command handlers.

use crate::context::Context;
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};
use tracing::warn;

/// Normal and error output for one application run.
///
/// Both writers are injected, so a run can be captured in memory.
pub struct Console<'a> {
    name: &'a str,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl<'a> Console<'a> {
    pub fn new(name: &'a str, out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { name, out, err }
    }

    /// The program name used to prefix diagnostic lines.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Write a line to the normal output.
    pub fn println(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    /// Write a line prefixed with the program name to the error output.
    pub fn error(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.err, "{}: {}", self.name, message)
    }

    /// Diagnostic line for handlers; a failing error sink is only traced.
    pub fn log(&mut self, line: impl Display) {
        if let Err(e) = self.error(line) {
            warn!(error = %e, "failed to write log line");
        }
    }

    pub fn out(&mut self) -> &mut (dyn Write + 'a) {
        &mut *self.out
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }
}

#[derive(Serialize)]
struct Invocation<'a> {
    command: &'a str,
    #[serde(flatten)]
    context: &'a Context,
}

/// Render a parsed invocation as a single-line JSON document.
pub fn render_context_json(command: &str, context: &Context) -> serde_json::Result<String> {
    serde_json::to_string(&Invocation { command, context })
}
