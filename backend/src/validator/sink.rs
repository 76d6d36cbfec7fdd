//! Report sinks
//!
//! The validator only needs somewhere to send failed-assertion diagnostics.
//! Anything implementing [`ReportSink`] will do.

use super::failure::Diagnostic;
use std::io::{self, Write};

/// Receiver for failed-assertion diagnostics
pub trait ReportSink {
    fn emit(&mut self, diagnostic: &Diagnostic) -> io::Result<()>;
}

impl<T: ReportSink + ?Sized> ReportSink for &mut T {
    fn emit(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        (**self).emit(diagnostic)
    }
}

/// Writes one line per diagnostic to any `Write`
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    out: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        writeln!(self.out, "{}", diagnostic)
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics emitted by one named check
    pub fn for_check<'a>(&'a self, check: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.check == check)
    }
}

impl ReportSink for CollectingSink {
    fn emit(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        self.diagnostics.push(diagnostic.clone());
        Ok(())
    }
}

/// Forwards diagnostics to `tracing` at WARN level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        tracing::warn!(check = %diagnostic.check, "{}", diagnostic.failure);
        Ok(())
    }
}
