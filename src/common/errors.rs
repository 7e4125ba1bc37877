// Copyright (c) 2016-2021 Fabian Schuiki

//! Utilities to implement diagnostics and error reporting facilities.

use crate::source::Span;
use std::fmt;

/// Emits diagnostic messages.
pub trait DiagEmitter {
    /// Emit a diagnostic message.
    fn emit(&self, diag: DiagBuilder2);
}

impl<'a, T> DiagEmitter for &'a T
where
    T: DiagEmitter + ?Sized,
{
    fn emit(&self, diag: DiagBuilder2) {
        (*self).emit(diag)
    }
}

/// A diagnostic message under construction.
#[must_use]
#[derive(Clone, Debug)]
pub struct DiagBuilder2 {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The error message.
    pub message: String,
    /// The source locations and notes attached to the message.
    pub segments: Vec<DiagSegment>,
}

/// A segment of a diagnostic message.
#[derive(Clone, Debug)]
pub enum DiagSegment {
    /// A source location the message refers to.
    Span(Span),
    /// An additional note.
    Note(String),
}

impl DiagBuilder2 {
    /// Create a new diagnostic with the given severity.
    pub fn new<S: Into<String>>(severity: Severity, message: S) -> DiagBuilder2 {
        DiagBuilder2 {
            severity: severity,
            message: message.into(),
            segments: Vec::new(),
        }
    }

    /// Create a new bug diagnostic.
    pub fn bug<S: Into<String>>(message: S) -> DiagBuilder2 {
        DiagBuilder2::new(Severity::Bug, message)
    }

    /// Create a new fatal diagnostic.
    pub fn fatal<S: Into<String>>(message: S) -> DiagBuilder2 {
        DiagBuilder2::new(Severity::Fatal, message)
    }

    /// Create a new error diagnostic.
    pub fn error<S: Into<String>>(message: S) -> DiagBuilder2 {
        DiagBuilder2::new(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning<S: Into<String>>(message: S) -> DiagBuilder2 {
        DiagBuilder2::new(Severity::Warning, message)
    }

    /// Create a new note diagnostic.
    pub fn note<S: Into<String>>(message: S) -> DiagBuilder2 {
        DiagBuilder2::new(Severity::Note, message)
    }

    /// Append a segment to the diagnostic.
    pub fn segment(self, segment: DiagSegment) -> DiagBuilder2 {
        let mut segments = self.segments;
        segments.push(segment);
        DiagBuilder2 {
            segments: segments,
            ..self
        }
    }

    /// Attach a source location to the diagnostic.
    pub fn span<S: Into<Span>>(self, span: S) -> DiagBuilder2 {
        self.segment(DiagSegment::Span(span.into()))
    }

    /// Attach an additional note to the diagnostic.
    pub fn add_note<S: Into<String>>(self, message: S) -> DiagBuilder2 {
        self.segment(DiagSegment::Note(message.into()))
    }

    /// The severity of the diagnostic.
    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    /// The message of the diagnostic.
    pub fn get_message(&self) -> &String {
        &self.message
    }

    /// The segments attached to the diagnostic.
    pub fn get_segments(&self) -> &[DiagSegment] {
        &self.segments
    }
}

/// The severity of a diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Severity {
    /// An informational note.
    Note,
    /// A warning. Compilation continues.
    Warning,
    /// An error. The current unit is rejected.
    Error,
    /// An unrecoverable error. Compilation aborts.
    Fatal,
    /// An internal inconsistency of the compiler.
    Bug,
}

impl Severity {
    /// A human-readable name for the severity.
    pub fn to_str(self) -> &'static str {
        match self {
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Bug => "compiler bug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl fmt::Display for DiagBuilder2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.get_severity(), self.get_message())?;
        for segment in &self.segments {
            match *segment {
                DiagSegment::Span(span) => write!(f, "\n  --> {}", span)?,
                DiagSegment::Note(ref message) => write!(f, "\n   = note: {}", message)?,
            }
        }
        Ok(())
    }
}
