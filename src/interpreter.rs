//! Ties lexer, parser, and evaluator together behind the one entry point
//! the driver needs: `run`. Owns the arena and its persistent root frame
//! across calls, mirroring `Interpreter::Run`/`ParseTypes` in the
//! original C++ source.

use crate::arena::Arena;
use crate::builtins::BUILTINS;
use crate::env::{define, EnvRef};
use crate::error::{Result, SchemeError};
use crate::eval::evaluate;
use crate::lexer::tokenize;
use crate::parser::{parse_one, Atom};
use crate::value::Value;

pub struct Interpreter {
    arena: Arena,
}

impl Interpreter {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.root();
        for (&name, &func) in BUILTINS.iter() {
            define(&root, name, Value::Builtin(func, name));
        }
        Interpreter { arena }
    }

    fn root(&self) -> EnvRef {
        self.arena.root()
    }

    /// Translates a parse-tree atom into a runtime value, per the
    /// external-interfaces translation table: null -> empty pair, number
    /// -> integer, `#t`/`#f` -> boolean, known builtin name -> that
    /// builtin value, any other symbol -> deferred-lookup symbol, cell ->
    /// recursively translated pair.
    fn translate(&self, atom: &Atom) -> Value {
        match atom {
            Atom::Integer(n) => Value::Integer(*n),
            Atom::Symbol(s) => match s.as_str() {
                "#t" => Value::Boolean(true),
                "#f" => Value::Boolean(false),
                name => match BUILTINS.get_key_value(name) {
                    Some((&key, &func)) => Value::Builtin(func, key),
                    None => Value::symbol(s),
                },
            },
            Atom::Cell(None, None) => Value::empty_pair(),
            Atom::Cell(car, cdr) => {
                let car_val = car
                    .as_ref()
                    .map(|a| self.translate(a))
                    .unwrap_or_else(Value::empty_pair);
                let cdr_val = cdr
                    .as_ref()
                    .map(|a| self.translate(a))
                    .unwrap_or_else(Value::empty_pair);
                Value::cons(car_val, cdr_val)
            }
        }
    }

    /// Runs exactly one top-level form read from `source`.
    ///
    /// 1. Empty source -> `""`.
    /// 2. Parse exactly one expression; trailing tokens -> `SyntaxError`.
    /// 3. Translate the parse tree into a `Value`.
    /// 4. Evaluate against the root frame.
    /// 5. Reclaim unreachable frames.
    /// 6. Return the printed result.
    pub fn run(&mut self, source: &str) -> Result<String> {
        if source.trim().is_empty() {
            return Ok(String::new());
        }

        let tokens = tokenize(source)?;
        let (atom, consumed) = parse_one(&tokens)?;
        if consumed != tokens.len() {
            return Err(SchemeError::syntax("trailing tokens after expression"));
        }

        let value = self.translate(&atom);
        let root = self.root();
        let result = evaluate(&value, &root, &mut self.arena);
        self.arena.clear();
        let result = result?;
        Ok(result.repr())
    }
}
