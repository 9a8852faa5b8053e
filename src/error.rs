use std::fmt::Display;
use std::time::Duration;

/// An expression that could not be compiled. Never fatal: the owning instruction
/// reports it each time it runs and evaluates to `undefined`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(column: usize, message: impl Into<String>) -> Self {
        Self { column, message: message.into() }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at column {}", self.message, self.column)
    }
}

impl std::error::Error for SyntaxError {}

/// Structural problems in the block layout of a script. These abort parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnmatchedBlock { line: usize },
    DanglingElse { line: usize },
    MalformedFunction { line: usize, header: String },
    MalformedCondition { line: usize, header: String },
    MalformedDeclaration { line: usize, text: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnmatchedBlock { line }
            | ParseError::DanglingElse { line }
            | ParseError::MalformedFunction { line, .. }
            | ParseError::MalformedCondition { line, .. }
            | ParseError::MalformedDeclaration { line, .. } => *line,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnmatchedBlock { line } => {
                write!(f, "[line {line}] Error: No open block to close")
            }
            ParseError::DanglingElse { line } => {
                write!(f, "[line {line}] Error: 'else' without a matching 'if'")
            }
            ParseError::MalformedFunction { line, header } => {
                write!(f, "[line {line}] Error: Malformed function header '{header}'")
            }
            ParseError::MalformedCondition { line, header } => {
                write!(f, "[line {line}] Error: Expect '(<condition>)' in '{header}'")
            }
            ParseError::MalformedDeclaration { line, text } => {
                write!(f, "[line {line}] Error: Expect variable name in '{text}'")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Why a run was cut short by its execution limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cancellation {
    StepLimit { limit: u64 },
    Timeout { limit: Duration },
    CallDepth { limit: usize },
}

impl Display for Cancellation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cancellation::StepLimit { limit } => write!(f, "step limit of {limit} exceeded"),
            Cancellation::Timeout { limit } => {
                write!(f, "time limit of {}ms exceeded", limit.as_millis())
            }
            Cancellation::CallDepth { limit } => {
                write!(f, "call depth limit of {limit} exceeded")
            }
        }
    }
}

/// Failures that end a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptError {
    Parse(ParseError),
    StrayLoopControl { keyword: &'static str, line: usize },
    Cancelled { line: usize, reason: Cancellation },
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptError::Parse(e) => write!(f, "{e}"),
            ScriptError::StrayLoopControl { keyword, line } => {
                write!(f, "[line {line}] Error: Unexpected {keyword} statement outside of a loop")
            }
            ScriptError::Cancelled { line, reason } => {
                write!(f, "[line {line}] Error: Execution cancelled, {reason}")
            }
        }
    }
}

impl std::error::Error for ScriptError {}

impl From<ParseError> for ScriptError {
    fn from(e: ParseError) -> Self {
        ScriptError::Parse(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UndeclaredVariable,
    UndeclaredFunction,
    UndeclaredAssignment,
    Syntax,
    UnclosedBlock,
}

/// A non-fatal problem noticed while parsing or running a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, line: usize, message: impl Into<String>) -> Self {
        Self { kind, line, message: message.into() }
    }

    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::Syntax => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity() {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        write!(f, "[line {}] {severity}: {}", self.line, self.message)
    }
}
