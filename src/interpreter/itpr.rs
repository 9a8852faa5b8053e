use std::f64::consts::PI;
use std::io::{self, Write};
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::limits::Budget;
use super::{native, Context, Function, Limits, RuntimeInterrupt, ScopeError};
use crate::prelude::*;

pub struct Interpreter {
    natives: Vec<Rc<Function>>,
    diagnostics: Vec<Diagnostic>,
    limits: Limits,
    budget: Budget,
    /// Source line of the instruction being executed, for diagnostics.
    pub(super) line: usize,
    pub(super) rng: StdRng,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new() -> Self {
        let mut interpreter = Self {
            natives: vec![],
            diagnostics: vec![],
            limits: Limits::default(),
            budget: Budget::new(),
            line: 0,
            rng: StdRng::from_entropy(),
            output: Box::new(io::stdout()),
        };

        interpreter.register_native(native::debug());
        interpreter.register_native(native::clock());
        interpreter
    }

    pub fn with_limits(self, limits: Limits) -> Self {
        Self { limits, ..self }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), ..self }
    }

    /// Where `debug` writes its lines. Defaults to stdout.
    pub fn with_output(self, output: Box<dyn Write>) -> Self {
        Self { output, ..self }
    }

    /// Makes a host function callable from every script this interpreter runs.
    pub fn register_native(&mut self, function: Function) {
        self.natives.push(Rc::new(function));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// A fresh root context holding the built-in globals and the native functions.
    pub fn root_context(&self) -> Shared<Context> {
        let root = Context::new().as_shared();

        {
            let mut root = root.borrow_mut();
            root.declare("PI", Object::Number(PI));
            root.declare("true", Object::Boolean(true));
            root.declare("false", Object::Boolean(false));
            root.declare("null", Object::Null);

            for function in &self.natives {
                root.register_function(function.clone());
            }
        }

        root
    }

    /// Executes a parsed script in a fresh root context. A `return` in the root block
    /// ends the run early and becomes its result.
    pub fn run(&mut self, script: Script) -> Result<Object, ScriptError> {
        let Script { block, functions, warnings } = script;

        self.diagnostics = warnings;
        self.budget = Budget::new();
        self.line = 0;

        let root = self.root_context();
        for function in functions {
            log::debug!("registering {function}");
            root.borrow_mut().register_function(Rc::new(function));
        }

        let result = self.execute_block(&block, &root);
        log::debug!(
            "run finished after {} step(s) with {} diagnostic(s)",
            self.budget.steps(),
            self.diagnostics.len()
        );

        RuntimeInterrupt::settle(result)
    }

    /// Writes one line to the output sink. Failures are logged and otherwise ignored.
    pub fn print(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{line}") {
            log::warn!("failed to write script output: {e}");
        }
    }

    pub(super) fn diagnose(&mut self, kind: DiagnosticKind, message: String) {
        let diagnostic = Diagnostic::new(kind, self.line, message);
        log::debug!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub(super) fn scope_error(&mut self, e: ScopeError) {
        self.diagnose(e.kind(), e.to_string());
    }

    pub(super) fn tick(&mut self) -> Result<(), RuntimeInterrupt> {
        self.budget.tick(&self.limits).map_err(|reason| self.cancel(reason))
    }

    pub(super) fn enter_call(&mut self) -> Result<(), RuntimeInterrupt> {
        self.budget.enter(&self.limits).map_err(|reason| self.cancel(reason))
    }

    pub(super) fn leave_call(&mut self) {
        self.budget.leave();
    }

    fn cancel(&self, reason: Cancellation) -> RuntimeInterrupt {
        log::debug!("cancelling run at line {}: {reason}", self.line);
        RuntimeInterrupt::Abort(ScriptError::Cancelled { line: self.line, reason })
    }
}
