//! The runtime value model: the tagged union every evaluated expression
//! reduces to, plus its printer (`repr`).

use crate::arena::Arena;
use crate::env::EnvRef;
use crate::error::Result;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A builtin's behavior: given the *unevaluated* argument tail (the cdr of
/// the call form, i.e. a Pair spine of argument expressions) and the
/// calling environment, produce a value. Special forms and eager
/// procedures share this one contract; eager procedures evaluate their
/// arguments themselves via `collect` + `evaluate` before doing real work.
pub type BuiltinFn = fn(&Value, &EnvRef, &mut Arena) -> Result<Value>;

#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Symbol(Rc<str>),
    Pair(Rc<RefCell<PairData>>),
    Builtin(BuiltinFn, &'static str),
    Closure(Rc<ClosureData>),
}

/// A cons cell. The empty pair is the unique `PairData` with no car/cdr.
pub struct PairData {
    pub car: Option<Value>,
    pub cdr: Option<Value>,
    proper_list: bool,
}

pub struct ClosureData {
    pub params: Vec<Rc<str>>,
    pub body: Vec<Value>,
    pub env: EnvRef,
}

impl PairData {
    /// The distinguished empty pair: `()`.
    pub fn empty() -> Self {
        PairData {
            car: None,
            cdr: None,
            proper_list: true,
        }
    }

    /// Builds a non-empty pair. Proper-list-ness is computed once, here,
    /// and never revisited even if `cdr` is later mutated through
    /// `set-cdr!` (see Open Question 1 in SPEC_FULL.md).
    pub fn cons(car: Value, cdr: Value) -> Self {
        let proper_list = match &cdr {
            Value::Pair(p) => p.borrow().proper_list,
            _ => false,
        };
        PairData {
            car: Some(car),
            cdr: Some(cdr),
            proper_list,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.car.is_none()
    }

    pub fn is_proper_list(&self) -> bool {
        self.proper_list
    }
}

impl Value {
    pub fn empty_pair() -> Value {
        Value::Pair(Rc::new(RefCell::new(PairData::empty())))
    }

    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Pair(Rc::new(RefCell::new(PairData::cons(car, cdr))))
    }

    pub fn symbol<S: AsRef<str>>(name: S) -> Value {
        Value::Symbol(Rc::from(name.as_ref()))
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false))
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Value::Pair(p) if !p.borrow().is_empty())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Pair(p) if p.borrow().is_empty())
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::Pair(p) if p.borrow().is_proper_list())
    }

    pub fn is_procedure(&self) -> bool {
        matches!(self, Value::Builtin(..) | Value::Closure(_))
    }

    pub fn as_pair(&self) -> Option<Rc<RefCell<PairData>>> {
        match self {
            Value::Pair(p) => Some(Rc::clone(p)),
            _ => None,
        }
    }

    pub fn as_symbol_name(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Total printer: `repr` is defined for every variant.
    pub fn repr(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Boolean(true) => "#t".to_string(),
            Value::Boolean(false) => "#f".to_string(),
            Value::Symbol(s) => s.to_string(),
            Value::Builtin(_, name) => name.to_string(),
            Value::Closure(_) => "unknown lambda".to_string(),
            Value::Pair(p) => {
                let pair = p.borrow();
                if pair.is_empty() {
                    return "()".to_string();
                }
                let mut out = String::from("(");
                out.push_str(&pair.car.as_ref().unwrap().repr());
                let mut cdr = pair.cdr.clone();
                loop {
                    match cdr {
                        Some(Value::Pair(ref next)) => {
                            let next_pair = next.borrow();
                            if next_pair.is_empty() {
                                out.push(')');
                                break;
                            }
                            out.push(' ');
                            out.push_str(&next_pair.car.as_ref().unwrap().repr());
                            cdr = next_pair.cdr.clone();
                        }
                        Some(other) => {
                            out.push_str(" . ");
                            out.push_str(&other.repr());
                            out.push(')');
                            break;
                        }
                        None => {
                            // Unreachable: a non-empty pair always has a cdr.
                            out.push(')');
                            break;
                        }
                    }
                }
                out
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Symbol(_) => "symbol",
            Value::Pair(p) if p.borrow().is_empty() => "null",
            Value::Pair(_) => "pair",
            Value::Builtin(..) => "procedure",
            Value::Closure(_) => "procedure",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr())
    }
}

/// Atoms compare by value; pairs and closures compare by identity
/// (shared mutable cells have no meaningful structural equality once
/// aliasing is possible).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(_, a), Value::Builtin(_, b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pair_prints_as_parens() {
        assert_eq!(Value::empty_pair().repr(), "()");
    }

    #[test]
    fn proper_list_prints_without_dots() {
        let list = Value::cons(
            Value::Integer(1),
            Value::cons(Value::Integer(2), Value::empty_pair()),
        );
        assert_eq!(list.repr(), "(1 2)");
        assert!(list.is_list());
    }

    #[test]
    fn dotted_pair_prints_with_dot() {
        let pair = Value::cons(Value::Integer(1), Value::Integer(2));
        assert_eq!(pair.repr(), "(1 . 2)");
        assert!(!pair.is_list());
    }

    #[test]
    fn proper_list_flag_is_cached_at_construction() {
        let tail = Value::empty_pair();
        let pair = Value::cons(Value::Integer(1), tail);
        assert!(pair.is_list());
        if let Value::Pair(p) = &pair {
            p.borrow_mut().cdr = Some(Value::Integer(99));
            // Mutation through set-cdr! does not recompute proper_list.
            assert!(pair.is_list());
        } else {
            unreachable!();
        }
    }

    #[test]
    fn booleans_print_as_hash_t_f() {
        assert_eq!(Value::Boolean(true).repr(), "#t");
        assert_eq!(Value::Boolean(false).repr(), "#f");
    }
}
