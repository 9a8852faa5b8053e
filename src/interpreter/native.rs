use std::time::{SystemTime, UNIX_EPOCH};

use super::Function;
use crate::prelude::*;

/// `debug(a1, a2, ...)` prints its arguments separated by spaces. `undefined` and
/// `null` print as nothing.
pub fn debug() -> Function {
    Function::native("debug", &["a1", "a2", "..."], |_context, arguments, interpreter| {
        let line = arguments
            .iter()
            .map(|argument| match argument {
                Object::Undefined | Object::Null => String::new(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        interpreter.print(&line);
        Object::Undefined
    })
}

/// `clock()` returns the seconds elapsed since the UNIX epoch.
pub fn clock() -> Function {
    Function::native("clock", &[], |_context, _arguments, _interpreter| {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since_epoch) => Object::Number(since_epoch.as_millis() as f64 / 1000.0),
            Err(_) => Object::Undefined,
        }
    })
}
