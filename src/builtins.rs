//! The fixed table of built-in names: special forms that inspect their
//! arguments unevaluated, and eager procedures that evaluate all of
//! theirs first via a shared helper. Every entry shares the one
//! `apply(unevaluated-arg-list, env)` contract.

use crate::arena::Arena;
use crate::env::{assign, define, lookup, EnvRef};
use crate::error::{Result, SchemeError};
use crate::eval::{collect, collect_syntax, evaluate};
use crate::value::{BuiltinFn, ClosureData, Value};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::rc::Rc;

macro_rules! check_arity {
    ($args:expr, $expected:expr, $name:expr) => {
        if $args.len() != $expected {
            return Err(SchemeError::runtime(format!(
                "{}: expected {} argument(s), got {}",
                $name,
                $expected,
                $args.len()
            )));
        }
    };
    ($args:expr, $min:expr, $max:expr, $name:expr) => {
        if $args.len() < $min || $args.len() > $max {
            return Err(SchemeError::runtime(format!(
                "{}: expected between {} and {} argument(s), got {}",
                $name,
                $min,
                $max,
                $args.len()
            )));
        }
    };
    ($args:expr, >= $min:expr, $name:expr) => {
        if $args.len() < $min {
            return Err(SchemeError::runtime(format!(
                "{}: expected at least {} argument(s), got {}",
                $name,
                $min,
                $args.len()
            )));
        }
    };
}

/// Like `check_arity!`, but raises `SyntaxError` instead of
/// `RuntimeError`. Special forms whose shape is checked by their own
/// logic (`if`, `define`, `set!`, `set-car!`, `set-cdr!`, `lambda`) use
/// this — grounded in `If`/`Helper::CheckPair` in the original source,
/// which raise `SyntaxError` for both improper spines and wrong counts.
macro_rules! check_arity_syntax {
    ($args:expr, $expected:expr, $name:expr) => {
        if $args.len() != $expected {
            return Err(SchemeError::syntax(format!(
                "{}: expected {} argument(s), got {}",
                $name,
                $expected,
                $args.len()
            )));
        }
    };
    ($args:expr, $min:expr, $max:expr, $name:expr) => {
        if $args.len() < $min || $args.len() > $max {
            return Err(SchemeError::syntax(format!(
                "{}: expected between {} and {} argument(s), got {}",
                $name,
                $min,
                $max,
                $args.len()
            )));
        }
    };
    ($args:expr, >= $min:expr, $name:expr) => {
        if $args.len() < $min {
            return Err(SchemeError::syntax(format!(
                "{}: expected at least {} argument(s), got {}",
                $name,
                $min,
                $args.len()
            )));
        }
    };
}

macro_rules! extract_int {
    ($val:expr, $name:expr) => {
        match $val {
            Value::Integer(i) => *i,
            other => {
                return Err(SchemeError::runtime(format!(
                    "{}: expected integer, got {}",
                    $name,
                    other.type_name()
                )))
            }
        }
    };
}

/// Evaluates every unevaluated argument expression in `tail`, left to
/// right, in `env`.
fn eval_args(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Vec<Value>> {
    collect(tail)?
        .iter()
        .map(|expr| evaluate(expr, env, arena))
        .collect()
}

// ---------------------------------------------------------------------
// Special forms
// ---------------------------------------------------------------------

fn quote(tail: &Value, _env: &EnvRef, _arena: &mut Arena) -> Result<Value> {
    let args = collect_syntax(tail)?;
    check_arity_syntax!(args, 1, "quote");
    Ok(args[0].clone())
}

fn and(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = collect(tail)?;
    let mut result = Value::Boolean(true);
    for expr in &args {
        result = evaluate(expr, env, arena)?;
        if !result.is_truthy() {
            return Ok(result);
        }
    }
    Ok(result)
}

fn or(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = collect(tail)?;
    let mut result = Value::Boolean(false);
    for expr in &args {
        result = evaluate(expr, env, arena)?;
        if result.is_truthy() {
            return Ok(result);
        }
    }
    Ok(result)
}

fn if_form(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = collect_syntax(tail)?;
    check_arity_syntax!(args, 2, 3, "if");
    let test = evaluate(&args[0], env, arena)?;
    if test.is_truthy() {
        evaluate(&args[1], env, arena)
    } else if args.len() == 3 {
        evaluate(&args[2], env, arena)
    } else {
        Ok(Value::empty_pair())
    }
}

fn define_form(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = collect_syntax(tail)?;
    check_arity_syntax!(args, >= 2, "define");

    match &args[0] {
        Value::Symbol(name) => {
            check_arity_syntax!(args, 2, "define");
            let value = evaluate(&args[1], env, arena)?;
            define(env, name, value.clone());
            Ok(value)
        }
        Value::Pair(p) if p.borrow().is_proper_list() && !p.borrow().is_empty() => {
            let (fname, params_tail) = {
                let pair = p.borrow();
                let fname = match &pair.car {
                    Some(Value::Symbol(s)) => s.clone(),
                    _ => {
                        return Err(SchemeError::syntax(
                            "define: procedure name must be a symbol",
                        ))
                    }
                };
                (fname, pair.cdr.clone().unwrap())
            };
            let params = parse_params(&params_tail)?;
            let body = args[1..].to_vec();
            if body.is_empty() {
                return Err(SchemeError::syntax("lambda body must be non-empty"));
            }
            let closure = Value::Closure(Rc::new(ClosureData {
                params,
                body,
                env: Rc::clone(env),
            }));
            define(env, &fname, closure.clone());
            Ok(closure)
        }
        _ => Err(SchemeError::syntax(
            "define requires a name or a (name params...) form",
        )),
    }
}

fn set_form(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = collect_syntax(tail)?;
    check_arity_syntax!(args, 2, "set!");
    let name = match &args[0] {
        Value::Symbol(s) => s.clone(),
        _ => return Err(SchemeError::syntax("set! requires an identifier")),
    };
    let value = evaluate(&args[1], env, arena)?;
    assign(env, &name, value.clone())?;
    Ok(value)
}

fn set_car_form(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = collect_syntax(tail)?;
    check_arity_syntax!(args, 2, "set-car!");
    let name = match &args[0] {
        Value::Symbol(s) => s.clone(),
        _ => return Err(SchemeError::syntax("set-car! requires an identifier")),
    };
    let target = lookup(env, &name)?;
    let pair = target
        .as_pair()
        .filter(|p| !p.borrow().is_empty())
        .ok_or_else(|| SchemeError::runtime(format!("{name} is not a pair")))?;
    let value = evaluate(&args[1], env, arena)?;
    pair.borrow_mut().car = Some(value);
    Ok(Value::empty_pair())
}

fn set_cdr_form(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = collect_syntax(tail)?;
    check_arity_syntax!(args, 2, "set-cdr!");
    let name = match &args[0] {
        Value::Symbol(s) => s.clone(),
        _ => return Err(SchemeError::syntax("set-cdr! requires an identifier")),
    };
    let target = lookup(env, &name)?;
    let pair = target
        .as_pair()
        .filter(|p| !p.borrow().is_empty())
        .ok_or_else(|| SchemeError::runtime(format!("{name} is not a pair")))?;
    let value = evaluate(&args[1], env, arena)?;
    pair.borrow_mut().cdr = Some(value);
    Ok(Value::empty_pair())
}

fn parse_params(tail: &Value) -> Result<Vec<Rc<str>>> {
    let raw = collect_syntax(tail)?;
    raw.into_iter()
        .map(|v| match v {
            Value::Symbol(s) => Ok(s),
            other => Err(SchemeError::syntax(format!(
                "lambda parameters must be symbols, got {}",
                other.type_name()
            ))),
        })
        .collect()
}

fn lambda(tail: &Value, env: &EnvRef, _arena: &mut Arena) -> Result<Value> {
    let args = collect_syntax(tail)?;
    check_arity_syntax!(args, >= 1, "lambda");
    let params = parse_params(&args[0])?;
    let body = args[1..].to_vec();
    if body.is_empty() {
        return Err(SchemeError::syntax("lambda body must be non-empty"));
    }
    Ok(Value::Closure(Rc::new(ClosureData {
        params,
        body,
        env: Rc::clone(env),
    })))
}

// ---------------------------------------------------------------------
// Eager procedures: predicates
// ---------------------------------------------------------------------

fn is_boolean(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 1, "boolean?");
    Ok(Value::Boolean(matches!(args[0], Value::Boolean(_))))
}

fn is_number(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 1, "number?");
    Ok(Value::Boolean(matches!(args[0], Value::Integer(_))))
}

fn is_symbol(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 1, "symbol?");
    Ok(Value::Boolean(matches!(args[0], Value::Symbol(_))))
}

fn is_pair(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 1, "pair?");
    Ok(Value::Boolean(args[0].is_pair()))
}

fn is_null(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 1, "null?");
    Ok(Value::Boolean(args[0].is_null()))
}

fn is_list(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 1, "list?");
    Ok(Value::Boolean(args[0].is_list()))
}

fn not(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 1, "not");
    Ok(Value::Boolean(matches!(args[0], Value::Boolean(false))))
}

// ---------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------

fn add(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    let mut sum: i64 = 0;
    for val in &args {
        sum = sum.wrapping_add(extract_int!(val, "+"));
    }
    Ok(Value::Integer(sum))
}

fn subtract(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, >= 2, "-");
    let mut result = extract_int!(&args[0], "-");
    for val in &args[1..] {
        result = result.wrapping_sub(extract_int!(val, "-"));
    }
    Ok(Value::Integer(result))
}

fn multiply(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    let mut prod: i64 = 1;
    for val in &args {
        prod = prod.wrapping_mul(extract_int!(val, "*"));
    }
    Ok(Value::Integer(prod))
}

fn divide(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, >= 2, "/");
    let mut result = extract_int!(&args[0], "/");
    for val in &args[1..] {
        let divisor = extract_int!(val, "/");
        if divisor == 0 {
            return Err(SchemeError::runtime("division by zero"));
        }
        result = result.wrapping_div(divisor);
    }
    Ok(Value::Integer(result))
}

fn min_builtin(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, >= 1, "min");
    let mut result = extract_int!(&args[0], "min");
    for val in &args[1..] {
        result = result.min(extract_int!(val, "min"));
    }
    Ok(Value::Integer(result))
}

fn max_builtin(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, >= 1, "max");
    let mut result = extract_int!(&args[0], "max");
    for val in &args[1..] {
        result = result.max(extract_int!(val, "max"));
    }
    Ok(Value::Integer(result))
}

fn abs_builtin(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 1, "abs");
    Ok(Value::Integer(extract_int!(&args[0], "abs").wrapping_abs()))
}

// ---------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------

fn compare(args: &[Value], name: &str, cmp: fn(i64, i64) -> bool) -> Result<Value> {
    if args.len() <= 1 {
        return Ok(Value::Boolean(true));
    }
    let mut prev = extract_int!(&args[0], name);
    for val in &args[1..] {
        let current = extract_int!(val, name);
        if !cmp(prev, current) {
            return Ok(Value::Boolean(false));
        }
        prev = current;
    }
    Ok(Value::Boolean(true))
}

fn num_eq(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    compare(&args, "=", |a, b| a == b)
}

fn less_than(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    compare(&args, "<", |a, b| a < b)
}

fn greater_than(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    compare(&args, ">", |a, b| a > b)
}

fn less_equal(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    compare(&args, "<=", |a, b| a <= b)
}

fn greater_equal(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    compare(&args, ">=", |a, b| a >= b)
}

// ---------------------------------------------------------------------
// Pair / list operations
// ---------------------------------------------------------------------

fn cons(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 2, "cons");
    Ok(Value::cons(args[0].clone(), args[1].clone()))
}

fn car(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 1, "car");
    let pair = args[0]
        .as_pair()
        .filter(|p| !p.borrow().is_empty())
        .ok_or_else(|| SchemeError::runtime(format!("car: not a pair: {}", args[0].repr())))?;
    Ok(pair.borrow().car.clone().unwrap())
}

fn cdr(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 1, "cdr");
    let pair = args[0]
        .as_pair()
        .filter(|p| !p.borrow().is_empty())
        .ok_or_else(|| SchemeError::runtime(format!("cdr: not a pair: {}", args[0].repr())))?;
    Ok(pair.borrow().cdr.clone().unwrap())
}

fn list(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    let mut result = Value::empty_pair();
    for val in args.into_iter().rev() {
        result = Value::cons(val, result);
    }
    Ok(result)
}

fn list_ref(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 2, "list-ref");
    let k = extract_int!(&args[1], "list-ref");
    if k < 0 {
        return Err(SchemeError::runtime("list-ref: negative index"));
    }
    let mut cur = args[0].clone();
    for _ in 0..k {
        cur = cdr_of(&cur, "list-ref")?;
    }
    car_of(&cur, "list-ref")
}

fn list_tail(tail: &Value, env: &EnvRef, arena: &mut Arena) -> Result<Value> {
    let args = eval_args(tail, env, arena)?;
    check_arity!(args, 2, "list-tail");
    let k = extract_int!(&args[1], "list-tail");
    if k < 0 {
        return Err(SchemeError::runtime("list-tail: negative index"));
    }
    let mut cur = args[0].clone();
    for _ in 0..k {
        cur = cdr_of(&cur, "list-tail")?;
    }
    Ok(cur)
}

fn car_of(value: &Value, name: &str) -> Result<Value> {
    let pair = value
        .as_pair()
        .filter(|p| !p.borrow().is_empty())
        .ok_or_else(|| SchemeError::runtime(format!("{name}: not a pair: {}", value.repr())))?;
    Ok(pair.borrow().car.clone().unwrap())
}

fn cdr_of(value: &Value, name: &str) -> Result<Value> {
    let pair = value
        .as_pair()
        .filter(|p| !p.borrow().is_empty())
        .ok_or_else(|| SchemeError::runtime(format!("{name}: not a pair: {}", value.repr())))?;
    Ok(pair.borrow().cdr.clone().unwrap())
}

// ---------------------------------------------------------------------
// Builtin table
// ---------------------------------------------------------------------

lazy_static! {
    pub static ref BUILTINS: HashMap<&'static str, BuiltinFn> = {
        let mut m: HashMap<&'static str, BuiltinFn> = HashMap::new();
        m.insert("quote", quote);
        m.insert("and", and);
        m.insert("or", or);
        m.insert("if", if_form);
        m.insert("define", define_form);
        m.insert("set!", set_form);
        m.insert("set-car!", set_car_form);
        m.insert("set-cdr!", set_cdr_form);
        m.insert("lambda", lambda);

        m.insert("boolean?", is_boolean);
        m.insert("number?", is_number);
        m.insert("symbol?", is_symbol);
        m.insert("pair?", is_pair);
        m.insert("null?", is_null);
        m.insert("list?", is_list);
        m.insert("not", not);

        m.insert("+", add);
        m.insert("-", subtract);
        m.insert("*", multiply);
        m.insert("/", divide);
        m.insert("min", min_builtin);
        m.insert("max", max_builtin);
        m.insert("abs", abs_builtin);

        m.insert("=", num_eq);
        m.insert("<", less_than);
        m.insert(">", greater_than);
        m.insert("<=", less_equal);
        m.insert(">=", greater_equal);

        m.insert("cons", cons);
        m.insert("car", car);
        m.insert("cdr", cdr);
        m.insert("list", list);
        m.insert("list-ref", list_ref);
        m.insert("list-tail", list_tail);

        m
    };
}
