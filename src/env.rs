//! Lexical environment frames. Each frame is a `HashMap` of bindings plus
//! an optional link to its enclosing frame; lookup and `set!` walk that
//! chain outward. Frames are allocated and reclaimed through the
//! [`crate::arena::Arena`], never dropped ad hoc, since closures can keep
//! a frame reachable long after its creating call returns.

use crate::error::{Result, SchemeError};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type EnvRef = Rc<RefCell<Frame>>;

pub struct Frame {
    bindings: HashMap<String, Value>,
    pub parent: Option<EnvRef>,
}

impl Frame {
    pub fn new(parent: Option<EnvRef>) -> Self {
        Frame {
            bindings: HashMap::new(),
            parent,
        }
    }

    /// All values currently bound in this frame, for the arena's
    /// reachability walk.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.bindings.values()
    }
}

/// Binds `name` in `env`'s own frame, shadowing any same-named binding in
/// an enclosing frame. Always succeeds.
pub fn define(env: &EnvRef, name: &str, value: Value) {
    env.borrow_mut().bindings.insert(name.to_string(), value);
}

/// Looks up `name`, starting at `env` and walking outward through parents.
pub fn lookup(env: &EnvRef, name: &str) -> Result<Value> {
    let mut frame = Rc::clone(env);
    loop {
        if let Some(value) = frame.borrow().bindings.get(name) {
            return Ok(value.clone());
        }
        let parent = frame.borrow().parent.clone();
        match parent {
            Some(next) => frame = next,
            None => {
                return Err(SchemeError::name(format!(
                    "unbound variable: {name}"
                )));
            }
        }
    }
}

/// Rebinds `name` in whichever frame along the chain already holds it.
/// Unlike `define`, this never introduces a new binding.
pub fn assign(env: &EnvRef, name: &str, value: Value) -> Result<()> {
    let mut frame = Rc::clone(env);
    loop {
        if frame.borrow().bindings.contains_key(name) {
            frame.borrow_mut().bindings.insert(name.to_string(), value);
            return Ok(());
        }
        let parent = frame.borrow().parent.clone();
        match parent {
            Some(next) => frame = next,
            None => {
                return Err(SchemeError::name(format!(
                    "unbound variable: {name}"
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_binds_in_current_frame() {
        let root = Rc::new(RefCell::new(Frame::new(None)));
        define(&root, "x", Value::Integer(1));
        assert_eq!(lookup(&root, "x").unwrap(), Value::Integer(1));
    }

    #[test]
    fn lookup_walks_to_parent() {
        let root = Rc::new(RefCell::new(Frame::new(None)));
        define(&root, "x", Value::Integer(1));
        let child = Rc::new(RefCell::new(Frame::new(Some(Rc::clone(&root)))));
        assert_eq!(lookup(&child, "x").unwrap(), Value::Integer(1));
    }

    #[test]
    fn lookup_unbound_raises_name_error() {
        let root = Rc::new(RefCell::new(Frame::new(None)));
        assert!(matches!(lookup(&root, "x"), Err(SchemeError::Name(_))));
    }

    #[test]
    fn define_in_child_shadows_without_touching_parent() {
        let root = Rc::new(RefCell::new(Frame::new(None)));
        define(&root, "x", Value::Integer(1));
        let child = Rc::new(RefCell::new(Frame::new(Some(Rc::clone(&root)))));
        define(&child, "x", Value::Integer(2));
        assert_eq!(lookup(&child, "x").unwrap(), Value::Integer(2));
        assert_eq!(lookup(&root, "x").unwrap(), Value::Integer(1));
    }

    #[test]
    fn assign_rebinds_in_defining_frame() {
        let root = Rc::new(RefCell::new(Frame::new(None)));
        define(&root, "x", Value::Integer(1));
        let child = Rc::new(RefCell::new(Frame::new(Some(Rc::clone(&root)))));
        assign(&child, "x", Value::Integer(42)).unwrap();
        assert_eq!(lookup(&root, "x").unwrap(), Value::Integer(42));
    }

    #[test]
    fn assign_unbound_raises_name_error() {
        let root = Rc::new(RefCell::new(Frame::new(None)));
        assert!(matches!(
            assign(&root, "x", Value::Integer(1)),
            Err(SchemeError::Name(_))
        ));
    }
}
