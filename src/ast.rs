use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    /// `[a:b]`: integer when both bounds are integers, real otherwise.
    Auto,
    /// `[a:b:i]`
    Integer,
    /// `[a:b:d]`
    Real,
}

#[derive(Debug)]
pub enum Expr {
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Call {
        callee: Token,
        arguments: Vec<Expr>,
    },
    Grouping {
        expr: Box<Expr>,
    },
    Literal {
        value: Object,
    },
    /// A chain of `&&` / `||` evaluated strictly left to right.
    Logic {
        first: Box<Expr>,
        rest: Vec<(Token, Expr)>,
    },
    Range {
        low: Box<Expr>,
        high: Box<Expr>,
        mode: RangeMode,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Variable {
        name: Token,
    },
}

impl Expr {
    pub fn number_literal(v: f64) -> Expr {
        Expr::Literal { value: Object::Number(v) }
    }

    pub fn str_literal(s: &str) -> Expr {
        Expr::Literal { value: Object::String(s.to_owned()) }
    }
}

/// Expression text compiled once when the script is parsed.
#[derive(Debug)]
pub struct Expression {
    pub source: String,
    pub compiled: Result<Expr, SyntaxError>,
}

impl Expression {
    pub fn compile(source: &str) -> Self {
        let compiled = Scanner::new(source)
            .scan_tokens()
            .and_then(|tokens| Parser::new(tokens).parse());

        Self { source: source.trim().to_owned(), compiled }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl AssignOp {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(AssignOp::Add),
            '-' => Some(AssignOp::Subtract),
            '*' => Some(AssignOp::Multiply),
            '/' => Some(AssignOp::Divide),
            '%' => Some(AssignOp::Remainder),
            _ => None,
        }
    }

    /// Combines the current value of the target with the evaluated right-hand side.
    pub fn apply(self, current: &Object, value: Object) -> Object {
        match self {
            AssignOp::Assign => value,
            AssignOp::Add => current.plus(&value),
            AssignOp::Subtract => Object::Number(current.to_number() - value.to_number()),
            AssignOp::Multiply => Object::Number(current.to_number() * value.to_number()),
            AssignOp::Divide => Object::Number(current.to_number() / value.to_number()),
            AssignOp::Remainder => Object::Number(current.to_number() % value.to_number()),
        }
    }
}

#[derive(Debug)]
pub enum Instruction {
    Expression {
        line: usize,
        expr: Expression,
    },
    Declaration {
        line: usize,
        name: String,
        value: Option<Expression>,
    },
    Assignment {
        line: usize,
        name: String,
        operator: AssignOp,
        value: Expression,
    },
    Return {
        line: usize,
        value: Option<Expression>,
    },
    Break {
        line: usize,
    },
    Continue {
        line: usize,
    },
    If(IfInstruction),
    While(WhileInstruction),
}

impl Instruction {
    pub fn line(&self) -> usize {
        match self {
            Instruction::Expression { line, .. }
            | Instruction::Declaration { line, .. }
            | Instruction::Assignment { line, .. }
            | Instruction::Return { line, .. }
            | Instruction::Break { line }
            | Instruction::Continue { line } => *line,
            Instruction::If(instruction) => instruction.line,
            Instruction::While(instruction) => instruction.line,
        }
    }
}

#[derive(Debug)]
pub struct IfInstruction {
    pub line: usize,
    pub condition: Expression,
    pub then_block: Block,
    pub else_block: Option<Block>,
}

#[derive(Debug)]
pub struct WhileInstruction {
    pub line: usize,
    pub condition: Expression,
    pub body: Block,
}

#[derive(Debug, Default)]
pub struct Block {
    instructions: Vec<Instruction>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
