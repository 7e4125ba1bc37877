// Copyright (c) 2016-2021 Fabian Schuiki

//! This crate contains the fundamental utilities used by the rest of the
//! vesta compiler.

#[macro_use]
extern crate bitflags;

pub mod errors;
pub mod name;
pub mod source;
pub mod util;

use crate::errors::{DiagBuilder2, DiagEmitter, Severity};
use std::cell::{Cell, RefCell};

/// A compilation session.
///
/// All passes of the compiler share one session. It carries the options the
/// driver has configured, counts the diagnostics that were emitted, and hands
/// each diagnostic to the installed reporter.
pub struct Session {
    /// The options of this session.
    pub opts: SessionOptions,
    /// Whether any error diagnostics were produced.
    pub failed: Cell<bool>,
    /// The number of diagnostics of at least error severity.
    errors: Cell<usize>,
    /// The callback that consumes emitted diagnostics.
    reporter: RefCell<Box<dyn FnMut(&DiagBuilder2)>>,
}

impl Session {
    /// Create a new session with default options.
    pub fn new() -> Session {
        Session {
            opts: Default::default(),
            failed: Cell::new(false),
            errors: Cell::new(0),
            reporter: RefCell::new(Box::new(|d| eprintln!("{}", d))),
        }
    }

    /// Create a new session with options picked up from the environment.
    pub fn from_env() -> Session {
        Session {
            opts: SessionOptions::from_env(),
            ..Session::new()
        }
    }

    /// The number of diagnostics with severity error or worse that were
    /// emitted since the session was created.
    pub fn error_count(&self) -> usize {
        self.errors.get()
    }

    /// Install a reporter that receives every emitted diagnostic.
    ///
    /// Replaces the default reporter, which prints to stderr.
    pub fn set_reporter<F>(&self, f: F)
    where
        F: FnMut(&DiagBuilder2) + 'static,
    {
        *self.reporter.borrow_mut() = Box::new(f);
    }
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}

impl DiagEmitter for Session {
    fn emit(&self, diag: DiagBuilder2) {
        if diag.get_severity() >= Severity::Error {
            self.failed.set(true);
            self.errors.set(self.errors.get() + 1);
        }
        (self.reporter.borrow_mut())(&diag);
    }
}

/// A set of options for a session.
///
/// The arguments passed on the command line are intended to modify these
/// values in order to configure the execution of the program.
#[derive(Debug, Default)]
pub struct SessionOptions {
    /// Emit a warning whenever the constant folder gives up on an expression.
    pub eval_debug: bool,
    /// The verbosity options.
    pub verbosity: Verbosity,
}

impl SessionOptions {
    /// Pick up options from the environment.
    pub fn from_env() -> SessionOptions {
        SessionOptions {
            eval_debug: std::env::var_os("VESTA_EVAL_DEBUG").is_some(),
            verbosity: Default::default(),
        }
    }
}

bitflags! {
    /// A set of verbosity options for a session.
    ///
    /// These flags control how much information the compiler emits.
    #[derive(Default)]
    pub struct Verbosity: u8 {
        const TYPES  = 0b001;
        const EVAL   = 0b010;
        const BOUNDS = 0b100;
    }
}
