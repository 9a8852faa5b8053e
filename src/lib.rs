#![allow(clippy::new_without_default)]

mod ast;
mod block_parser;
mod error;
mod interpreter;
mod object;
mod parser;
mod printer;
mod scanner;
mod token;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::block_parser::*;
    pub use crate::error::*;
    pub use crate::interpreter::*;
    pub use crate::object::*;
    pub use crate::parser::*;
    pub use crate::printer::*;
    pub use crate::scanner::*;
    pub use crate::token::*;
    pub use crate::Shared;
}

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context as _;
use prelude::{
    BlockParser, Diagnostic, Function, Interpreter, Object, ScriptError, Severity,
};

pub type Shared<T> = Rc<RefCell<T>>;

/// Parses and runs scripts, reporting problems on stderr.
pub struct BrushScript {
    interpreter: Interpreter,
    error_reporter: ErrorReporter,
}

impl BrushScript {
    pub fn new() -> Self {
        Self::with_interpreter(Interpreter::new())
    }

    pub fn with_interpreter(interpreter: Interpreter) -> Self {
        Self { interpreter, error_reporter: ErrorReporter::default() }
    }

    pub fn register_native(&mut self, function: Function) {
        self.interpreter.register_native(function);
    }

    pub fn error_reporter(&self) -> &ErrorReporter {
        &self.error_reporter
    }
}

impl BrushScript {
    pub fn run_file(&mut self, filename: impl AsRef<Path>) -> Result<Object, anyhow::Error> {
        let filename = filename.as_ref();
        let content = std::fs::read_to_string(filename)
            .with_context(|| format!("failed to read {}", filename.display()))?;

        Ok(self.run(&content)?)
    }

    /// Runs one script. Diagnostics are reported whatever the outcome; the error is
    /// returned after it has been reported.
    pub fn run(&mut self, input: &str) -> Result<Object, ScriptError> {
        let script = match BlockParser::new().parse(input) {
            Ok(script) => script,
            Err(e) => {
                let e = ScriptError::Parse(e);
                self.error_reporter.script_error(&e);
                return Err(e);
            }
        };

        let result = self.interpreter.run(script);

        for diagnostic in self.interpreter.diagnostics() {
            self.error_reporter.diagnostic(diagnostic);
        }
        if let Err(ref e) = result {
            self.error_reporter.script_error(e);
        }

        result
    }
}

/// Prints problems on stderr and remembers what kind of failure ended the last runs.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    /// A script failed to parse.
    pub had_error: bool,
    /// A script was stopped while running.
    pub had_runtime_error: bool,
    pub warnings: usize,
    pub errors: usize,
}

impl ErrorReporter {
    pub fn diagnostic(&mut self, diagnostic: &Diagnostic) {
        eprintln!("{diagnostic}");

        match diagnostic.severity() {
            Severity::Warning => self.warnings += 1,
            Severity::Error => self.errors += 1,
        }
    }

    pub fn script_error(&mut self, e: &ScriptError) {
        eprintln!("{e}");

        match e {
            ScriptError::Parse(_) => self.had_error = true,
            _ => self.had_runtime_error = true,
        }
    }
}
