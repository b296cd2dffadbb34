//! # Arithmetic Expression Engine
//!
//! Tokenizer, shunting-yard parser, and AST evaluator for formula
//! expressions. The language is deliberately restricted to safe arithmetic
//! substitution: the four basic operators, exponentiation, parentheses, and
//! unary minus over numeric literals and variable identifiers. Formula
//! strings may originate from stored data, so there is no host-language
//! evaluation anywhere: a string is parsed to an AST once and evaluated
//! over a plain variable map.
//!
//! Parse errors are a registry configuration defect; the registry parses
//! every builtin expression at load time so a malformed formula never
//! reaches evaluation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced while tokenizing or parsing an expression string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("malformed number '{0}'")]
    MalformedNumber(String),
    #[error("unbalanced parentheses")]
    UnbalancedParens,
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("empty expression")]
    Empty,
}

/// Binary operators supported by the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// Operator precedence (higher binds tighter).
    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 3,
        }
    }

    /// Exponentiation is right-associative; everything else is left.
    fn is_right_assoc(self) -> bool {
        matches!(self, BinaryOp::Pow)
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Num(f64),
    Var(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Evaluate the tree over a variable map.
    ///
    /// Returns `None` if a referenced variable is absent. The registry
    /// guarantees this cannot happen for validated formulas, but the method
    /// stays total rather than panicking.
    pub fn evaluate(&self, vars: &HashMap<String, f64>) -> Option<f64> {
        match self {
            Expr::Num(n) => Some(*n),
            Expr::Var(name) => vars.get(name).copied(),
            Expr::Neg(inner) => inner.evaluate(vars).map(|v| -v),
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.evaluate(vars)?;
                let r = rhs.evaluate(vars)?;
                Some(op.apply(l, r))
            }
        }
    }

    /// Collect every variable identifier referenced in the tree.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out.sort_unstable();
        out.dedup();
        out
    }

    fn collect_vars<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Num(_) => {}
            Expr::Var(name) => out.push(name),
            Expr::Neg(inner) => inner.collect_vars(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_vars(out);
                rhs.collect_vars(out);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Op(BinaryOp),
    UnaryMinus,
    LParen,
    RParen,
}

/// Split an expression string into tokens.
///
/// Identifiers are `[A-Za-z_][A-Za-z0-9_]*`, numbers are decimal with an
/// optional fractional part. A `-` is unary when it starts the expression
/// or follows an operator or opening paren.
fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut text = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        text.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n: f64 = text
                    .parse()
                    .map_err(|_| ExprError::MalformedNumber(text.clone()))?;
                tokens.push(Token::Num(n));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        name.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Op(BinaryOp::Add));
            }
            '-' => {
                chars.next();
                let unary = matches!(
                    tokens.last(),
                    None | Some(Token::Op(_)) | Some(Token::LParen) | Some(Token::UnaryMinus)
                );
                if unary {
                    tokens.push(Token::UnaryMinus);
                } else {
                    tokens.push(Token::Op(BinaryOp::Sub));
                }
            }
            '*' => {
                chars.next();
                tokens.push(Token::Op(BinaryOp::Mul));
            }
            '/' => {
                chars.next();
                tokens.push(Token::Op(BinaryOp::Div));
            }
            '^' => {
                chars.next();
                tokens.push(Token::Op(BinaryOp::Pow));
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            other => return Err(ExprError::UnexpectedChar(other)),
        }
    }

    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }
    Ok(tokens)
}

/// Parse an expression string into an AST via shunting-yard.
pub fn parse(input: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(input)?;

    // Shunting-yard with an explicit output stack of sub-expressions.
    // Unary minus is pushed as a pseudo-operator above Pow precedence.
    let mut output: Vec<Expr> = Vec::new();
    let mut ops: Vec<Token> = Vec::new();
    let mut expect_operand = true;

    for token in tokens {
        match token {
            Token::Num(n) => {
                if !expect_operand {
                    return Err(ExprError::UnexpectedToken(n.to_string()));
                }
                output.push(Expr::Num(n));
                expect_operand = false;
            }
            Token::Ident(name) => {
                if !expect_operand {
                    return Err(ExprError::UnexpectedToken(name));
                }
                output.push(Expr::Var(name));
                expect_operand = false;
            }
            Token::UnaryMinus => {
                if !expect_operand {
                    return Err(ExprError::UnexpectedToken("-".to_string()));
                }
                ops.push(Token::UnaryMinus);
            }
            Token::Op(op) => {
                if expect_operand {
                    return Err(ExprError::UnexpectedToken(format!("{:?}", op)));
                }
                while let Some(top) = ops.last() {
                    let pop = match top {
                        Token::UnaryMinus => true,
                        Token::Op(top_op) => {
                            top_op.precedence() > op.precedence()
                                || (top_op.precedence() == op.precedence()
                                    && !op.is_right_assoc())
                        }
                        _ => false,
                    };
                    if pop {
                        let top = ops.pop().unwrap();
                        reduce(&mut output, top)?;
                    } else {
                        break;
                    }
                }
                ops.push(Token::Op(op));
                expect_operand = true;
            }
            Token::LParen => {
                if !expect_operand {
                    return Err(ExprError::UnexpectedToken("(".to_string()));
                }
                ops.push(Token::LParen);
            }
            Token::RParen => {
                if expect_operand {
                    return Err(ExprError::UnexpectedToken(")".to_string()));
                }
                loop {
                    match ops.pop() {
                        Some(Token::LParen) => break,
                        Some(top) => reduce(&mut output, top)?,
                        None => return Err(ExprError::UnbalancedParens),
                    }
                }
                expect_operand = false;
            }
        }
    }

    if expect_operand {
        return Err(ExprError::UnexpectedToken("end of input".to_string()));
    }

    while let Some(top) = ops.pop() {
        if matches!(top, Token::LParen) {
            return Err(ExprError::UnbalancedParens);
        }
        reduce(&mut output, top)?;
    }

    match output.len() {
        1 => Ok(output.pop().unwrap()),
        _ => Err(ExprError::UnexpectedToken("dangling operand".to_string())),
    }
}

fn reduce(output: &mut Vec<Expr>, op: Token) -> Result<(), ExprError> {
    match op {
        Token::UnaryMinus => {
            let inner = output.pop().ok_or(ExprError::Empty)?;
            output.push(Expr::Neg(Box::new(inner)));
        }
        Token::Op(op) => {
            let rhs = output.pop().ok_or(ExprError::Empty)?;
            let lhs = output.pop().ok_or(ExprError::Empty)?;
            output.push(Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }
        _ => return Err(ExprError::UnbalancedParens),
    }
    Ok(())
}
