use std::fmt::{Debug, Display};
use std::rc::Rc;

use super::{Context, Interpreter, RuntimeInterrupt};
use crate::prelude::*;

/// Host callback behind a native function. It receives the root context, the
/// evaluated arguments and the interpreter that made the call.
pub type NativeFn = Rc<dyn Fn(&Shared<Context>, Vec<Object>, &mut Interpreter) -> Object>;

pub enum FunctionBody {
    Script(Block),
    Native(NativeFn),
}

pub struct Function {
    name: String,
    params: Vec<String>,
    body: FunctionBody,
}

impl Function {
    pub fn new(name: &str, params: Vec<String>, body: Block) -> Self {
        Self { name: name.to_owned(), params, body: FunctionBody::Script(body) }
    }

    pub fn native<F>(name: &str, params: &[&str], callback: F) -> Self
    where
        F: Fn(&Shared<Context>, Vec<Object>, &mut Interpreter) -> Object + 'static,
    {
        Self {
            name: name.to_owned(),
            params: params.iter().map(|p| (*p).to_owned()).collect(),
            body: FunctionBody::Native(Rc::new(callback)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn is_native(&self) -> bool {
        matches!(self.body, FunctionBody::Native(_))
    }

    /// Runs the function. Script bodies get a fresh child of `root`, so they see the
    /// globals and their own parameters but nothing of the caller's scope.
    /// Arity is not checked: missing arguments are `undefined`, extra ones are dropped.
    pub fn call(
        &self,
        root: &Shared<Context>,
        arguments: Vec<Object>,
        interpreter: &mut Interpreter,
    ) -> Result<Object, RuntimeInterrupt> {
        let body = match &self.body {
            FunctionBody::Native(callback) => return Ok(callback(root, arguments, interpreter)),
            FunctionBody::Script(body) => body,
        };

        log::trace!("calling {} with {} argument(s)", self.name, arguments.len());

        let environment = Context::new().with_parent(root.clone()).as_shared();
        {
            let mut env_borrow = environment.borrow_mut();
            let mut arguments = arguments.into_iter();
            for param in &self.params {
                let value = arguments.next().unwrap_or(Object::Undefined);
                if !is_variadic(param) {
                    env_borrow.declare(param, value);
                }
            }
        }

        interpreter.enter_call()?;
        let call_line = interpreter.line;
        let result = interpreter.execute_block(body, &environment);
        interpreter.line = call_line;
        interpreter.leave_call();

        RuntimeInterrupt::settle(result).map_err(RuntimeInterrupt::Abort)
    }
}

/// `...` and `name...` stand for "any number of further arguments" and bind nothing.
fn is_variadic(param: &str) -> bool {
    param.ends_with("...")
}

impl Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("native", &self.is_native())
            .finish()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_native() {
            write!(f, "<native fn {}>", self.name)
        } else {
            write!(f, "<fn {}>", self.name)
        }
    }
}
