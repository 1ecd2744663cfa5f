//! The evaluator: `evaluate` dispatches on a value's shape, `apply` hands
//! an unevaluated argument spine to whatever procedure was found in head
//! position. No tail-call optimization — a straightforward recursive
//! descent, matching `Pair::Evaluate`/`Function::Apply` in the original
//! C++ source rather than the teacher's trampoline.

use crate::arena::Arena;
use crate::env::{define, lookup, EnvRef};
use crate::error::{Result, SchemeError};
use crate::value::{ClosureData, Value};
use std::rc::Rc;

/// Walks a proper-list spine and collects its elements. Fails with
/// `RuntimeError` if the spine is improper. This is the `RuntimeError`-
/// raising primitive; special forms needing their own shape diagnostics
/// go through `collect_syntax` instead.
pub fn collect(tail: &Value) -> Result<Vec<Value>> {
    let mut out = Vec::new();
    let mut cur = tail.clone();
    loop {
        match cur {
            Value::Pair(p) => {
                let pair = p.borrow();
                if pair.is_empty() {
                    return Ok(out);
                }
                out.push(pair.car.clone().unwrap());
                cur = pair.cdr.clone().unwrap();
            }
            _ => {
                return Err(SchemeError::runtime("improper argument list"));
            }
        }
    }
}

/// Same walk as `collect`, but any resulting `RuntimeError` is
/// reclassified as `SyntaxError` — used by special forms checking their
/// own argument shape (`if`, `set!`, `set-car!`, `set-cdr!`, lambda's
/// parameter list).
pub fn collect_syntax(tail: &Value) -> Result<Vec<Value>> {
    collect(tail).map_err(SchemeError::into_syntax)
}

pub fn evaluate(value: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    match value {
        Value::Integer(_) | Value::Boolean(_) | Value::Builtin(..) | Value::Closure(_) => {
            Ok(value.clone())
        }
        Value::Symbol(name) => lookup(env, name),
        Value::Pair(p) => {
            let (head, tail) = {
                let pair = p.borrow();
                if pair.is_empty() {
                    return Err(SchemeError::runtime("empty application"));
                }
                (pair.car.clone().unwrap(), pair.cdr.clone().unwrap())
            };
            let proc = evaluate(&head, env, arena)?;
            if !proc.is_procedure() {
                return Err(SchemeError::runtime(format!(
                    "not a procedure: {}",
                    proc.repr()
                )));
            }
            apply(&proc, &tail, env, arena)
        }
    }
}

/// Applies `proc` to the unevaluated argument tail `tail`, in calling
/// environment `env`. Builtins decide for themselves whether and how to
/// evaluate `tail`'s elements; closures always evaluate every argument.
pub fn apply(proc: &Value, tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    match proc {
        Value::Builtin(func, _) => func(tail, env, arena),
        Value::Closure(closure) => apply_closure(closure, tail, env, arena),
        _ => Err(SchemeError::runtime(format!(
            "not a procedure: {}",
            proc.repr()
        ))),
    }
}

fn apply_closure(
    closure: &Rc<ClosureData>,
    tail: &Value,
    caller_env: &EnvRef,
    arena: &mut Arena,
) -> Result<Value> {
    let arg_exprs = collect(tail)?;
    if arg_exprs.len() != closure.params.len() {
        return Err(SchemeError::runtime(format!(
            "expected {} argument(s), got {}",
            closure.params.len(),
            arg_exprs.len()
        )));
    }

    let mut values = Vec::with_capacity(arg_exprs.len());
    for expr in &arg_exprs {
        values.push(evaluate(expr, caller_env, arena)?);
    }

    let call_env = arena.alloc(&closure.env);
    for (param, value) in closure.params.iter().zip(values.into_iter()) {
        define(&call_env, param, value);
    }

    let (last, init) = closure
        .body
        .split_last()
        .expect("closure body is non-empty by construction");
    for form in init {
        evaluate(form, &call_env, arena)?;
    }
    evaluate(last, &call_env, arena)
}
