mod context;
mod error;
mod expr;
mod func;
mod itpr;
mod limits;
mod native;
mod stmt;

pub use context::Context;
pub use error::{RuntimeInterrupt, ScopeError};
pub use func::{Function, FunctionBody, NativeFn};
pub use itpr::Interpreter;
pub use limits::{Limits, DEFAULT_MAX_CALL_DEPTH};
