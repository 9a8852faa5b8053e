use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{Function, ScopeError};
use crate::prelude::*;

/// One scope frame: variables, functions and a link to the enclosing frame.
#[derive(Debug, Default)]
pub struct Context {
    parent: Option<Shared<Context>>,
    /// Top of the parent chain. `None` when this context is the root itself.
    root: Option<Shared<Context>>,
    values: HashMap<String, Object>,
    functions: Vec<Rc<Function>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(self, parent: Shared<Context>) -> Self {
        let mut root = parent.clone();
        loop {
            let next = root.borrow().parent.clone();
            match next {
                Some(next) => root = next,
                None => break,
            }
        }

        Self { parent: Some(parent), root: Some(root), ..self }
    }

    pub fn as_shared(self) -> Shared<Self> {
        Rc::new(RefCell::new(self))
    }

    /// The topmost ancestor of `context`, or `context` itself when it has no parent.
    pub fn root(context: &Shared<Context>) -> Shared<Context> {
        context.borrow().root.clone().unwrap_or_else(|| context.clone())
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Always binds in this context, shadowing any binding of an ancestor.
    pub fn declare(&mut self, name: &str, value: Object) {
        self.values.insert(name.to_owned(), value);
    }

    pub fn get(&self, name: &str) -> Result<Object, ScopeError> {
        if let Some(value) = self.values.get(name) {
            return Ok(value.clone());
        }

        // Ask one level above if possible
        match self.parent {
            Some(ref parent) => parent.borrow().get(name),
            None => Err(ScopeError::UndeclaredVariable(name.to_owned())),
        }
    }

    /// Updates the nearest binding of `name`. Never declares a new variable.
    pub fn set(&mut self, name: &str, value: Object) -> Result<(), ScopeError> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return Ok(());
        }

        match self.parent {
            Some(ref parent) => parent.borrow_mut().set(name, value),
            None => Err(ScopeError::UndeclaredVariable(name.to_owned())),
        }
    }

    pub fn register_function(&mut self, function: Rc<Function>) {
        self.functions.push(function);
    }

    /// Looks in this registry first, then in the ancestors up to the root. The first
    /// function registered under a name wins.
    pub fn find_function(&self, name: &str) -> Result<Rc<Function>, ScopeError> {
        if let Some(function) = self.functions.iter().find(|f| f.name() == name) {
            return Ok(function.clone());
        }

        match self.parent {
            Some(ref parent) => parent.borrow().find_function(name),
            None => Err(ScopeError::UndeclaredFunction(name.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Shared<Context>, Shared<Context>, Shared<Context>) {
        let root = Context::new().as_shared();
        let middle = Context::new().with_parent(root.clone()).as_shared();
        let leaf = Context::new().with_parent(middle.clone()).as_shared();
        (root, middle, leaf)
    }

    #[test]
    fn root_is_resolved_through_the_chain() {
        let (root, middle, leaf) = chain();
        assert!(Rc::ptr_eq(&Context::root(&leaf), &root));
        assert!(Rc::ptr_eq(&Context::root(&middle), &root));
        assert!(Rc::ptr_eq(&Context::root(&root), &root));
        assert!(root.borrow().is_root());
        assert!(!leaf.borrow().is_root());
    }

    #[test]
    fn get_walks_up_and_declare_shadows() {
        let (root, _, leaf) = chain();
        root.borrow_mut().declare("x", Object::Number(1.0));
        assert_eq!(leaf.borrow().get("x"), Ok(Object::Number(1.0)));

        leaf.borrow_mut().declare("x", Object::Number(2.0));
        assert_eq!(leaf.borrow().get("x"), Ok(Object::Number(2.0)));
        assert_eq!(root.borrow().get("x"), Ok(Object::Number(1.0)));
    }

    #[test]
    fn set_updates_the_nearest_binding() {
        let (root, middle, leaf) = chain();
        root.borrow_mut().declare("x", Object::Number(1.0));
        middle.borrow_mut().declare("x", Object::Number(2.0));

        leaf.borrow_mut().set("x", Object::Number(3.0)).unwrap();
        assert_eq!(middle.borrow().get("x"), Ok(Object::Number(3.0)));
        assert_eq!(root.borrow().get("x"), Ok(Object::Number(1.0)));
    }

    #[test]
    fn set_never_declares() {
        let (root, _, leaf) = chain();
        let result = leaf.borrow_mut().set("missing", Object::Null);
        assert_eq!(result, Err(ScopeError::UndeclaredVariable("missing".to_owned())));
        assert!(root.borrow().get("missing").is_err());
        assert!(leaf.borrow().get("missing").is_err());
    }

    #[test]
    fn set_keeps_falsy_values_in_place() {
        let (root, _, leaf) = chain();
        leaf.borrow_mut().declare("n", Object::Number(0.0));
        leaf.borrow_mut().set("n", Object::Number(4.0)).unwrap();
        assert_eq!(leaf.borrow().get("n"), Ok(Object::Number(4.0)));
        assert!(root.borrow().get("n").is_err());
    }

    #[test]
    fn functions_resolve_from_ancestors() {
        let (root, _, leaf) = chain();
        root.borrow_mut().register_function(Rc::new(Function::native("one", &[], |_, _, _| {
            Object::Number(1.0)
        })));

        assert_eq!(leaf.borrow().find_function("one").unwrap().name(), "one");
        assert_eq!(
            leaf.borrow().find_function("two").unwrap_err(),
            ScopeError::UndeclaredFunction("two".to_owned())
        );
    }
}
