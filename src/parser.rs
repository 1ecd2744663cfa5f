//! Token stream to parse tree. Produces `Atom`, the pre-translation
//! reader-level tree (distinct from `Value`, the runtime model); see
//! `Interpreter::translate` for the Atom → Value step.

use crate::error::{Result, SchemeError};
use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Integer(i64),
    Symbol(String),
    /// A cons cell at the reader level. `None` for both fields is `()`.
    Cell(Option<Box<Atom>>, Option<Box<Atom>>),
}

impl Atom {
    fn null() -> Atom {
        Atom::Cell(None, None)
    }

    fn cons(car: Atom, cdr: Atom) -> Atom {
        Atom::Cell(Some(Box::new(car)), Some(Box::new(cdr)))
    }
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, pos: 0 }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    /// Parses exactly one expression.
    pub fn parse_expr(&mut self) -> Result<Atom> {
        match self.advance() {
            Some(Token::Integer(n)) => Ok(Atom::Integer(*n)),
            Some(Token::Symbol(s)) => Ok(Atom::Symbol(s.clone())),
            Some(Token::Quote) => {
                let inner = self.parse_expr()?;
                // 'expr desugars to the same shape as (quote expr): a
                // proper two-element list.
                Ok(Atom::cons(
                    Atom::Symbol("quote".to_string()),
                    Atom::cons(inner, Atom::null()),
                ))
            }
            Some(Token::LParen) => self.parse_list(),
            Some(Token::RParen) => Err(SchemeError::syntax("unexpected ')'")),
            None => Err(SchemeError::syntax("unexpected end of input")),
        }
    }

    /// Parses the contents of a list after the opening `(` has been
    /// consumed: `")" | expr "." expr ")" | expr list`.
    fn parse_list(&mut self) -> Result<Atom> {
        if matches!(self.peek(), Some(Token::RParen)) {
            self.advance();
            return Ok(Atom::null());
        }

        let head = self.parse_expr()?;

        if let Some(Token::Symbol(s)) = self.peek() {
            if s == "." {
                self.advance();
                let tail = self.parse_expr()?;
                match self.advance() {
                    Some(Token::RParen) => return Ok(Atom::cons(head, tail)),
                    _ => return Err(SchemeError::syntax("expected ')' after dotted pair")),
                }
            }
        }

        let rest = self.parse_list()?;
        Ok(Atom::cons(head, rest))
    }
}

/// Parses exactly one expression from `tokens`. Any tokens left over
/// after it are the caller's concern (see `Interpreter::run`, §6).
pub fn parse_one(tokens: &[Token]) -> Result<(Atom, usize)> {
    let mut parser = Parser::new(tokens);
    let atom = parser.parse_expr()?;
    Ok((atom, parser.pos))
}
