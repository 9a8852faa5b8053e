use std::fmt::Display;

use crate::prelude::*;

/// Terminating results of an instruction. `Break`, `Continue` and `Return` unwind to
/// the nearest loop or function; `Abort` unwinds the whole run.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeInterrupt {
    Break { line: usize },
    Continue { line: usize },
    Return { line: usize, value: Object },
    Abort(ScriptError),
}

impl RuntimeInterrupt {
    /// Turns the outcome of a function body or the root block into its value.
    /// Loop control that reached this far has no loop left to consume it.
    pub fn settle(result: Result<(), RuntimeInterrupt>) -> Result<Object, ScriptError> {
        match result {
            Ok(()) => Ok(Object::Undefined),
            Err(RuntimeInterrupt::Return { value, .. }) => Ok(value),
            Err(RuntimeInterrupt::Break { line }) => {
                Err(ScriptError::StrayLoopControl { keyword: "break", line })
            }
            Err(RuntimeInterrupt::Continue { line }) => {
                Err(ScriptError::StrayLoopControl { keyword: "continue", line })
            }
            Err(RuntimeInterrupt::Abort(e)) => Err(e),
        }
    }
}

impl Display for RuntimeInterrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeInterrupt::Break { line } => {
                write!(f, "[line {}] Unexpected break statement", line)
            }
            RuntimeInterrupt::Continue { line } => {
                write!(f, "[line {}] Unexpected continue statement", line)
            }
            RuntimeInterrupt::Return { line, .. } => {
                write!(f, "[line {}] Unexpected return statement", line)
            }
            RuntimeInterrupt::Abort(e) => write!(f, "{e}"),
        }
    }
}

/// Failed lookups in the scope chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    UndeclaredVariable(String),
    UndeclaredFunction(String),
}

impl ScopeError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ScopeError::UndeclaredVariable(_) => DiagnosticKind::UndeclaredVariable,
            ScopeError::UndeclaredFunction(_) => DiagnosticKind::UndeclaredFunction,
        }
    }
}

impl Display for ScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeError::UndeclaredVariable(name) => {
                write!(f, "Usage of undeclared variable: {name}")
            }
            ScopeError::UndeclaredFunction(name) => {
                write!(f, "Usage of undeclared function: {name}")
            }
        }
    }
}
