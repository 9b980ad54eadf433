//! Postfix evaluation and the `evaluate_expression` entry point.
//!
//! Runs an expression through tokenizer, converter, evaluator and formatter,
//! producing either a settled display string or a typed error.

use thiserror::Error;

use super::format::{ERROR_TEXT, format_number};
use super::postfix::infix_to_postfix;
use super::token::{Operator, Token};
use super::tokenizer::tokenize;

/// Quotients smaller than this are treated as floating-point noise.
const DIVISION_NOISE_FLOOR: f64 = 1e-15;

/// Errors produced while evaluating an expression.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Modulo by zero")]
    ModuloByZero,
    /// Operand stack underflow, or more than one value left at the end.
    #[error("Invalid expression")]
    InvalidExpression,
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
    /// The arithmetic overflowed to infinity or produced NaN.
    #[error("Result is not a finite number")]
    NotFinite,
}

/// Result of evaluating a calculator expression.
#[derive(Clone, Debug, PartialEq)]
pub enum CalcResult {
    /// Successful calculation with a finite numeric result.
    Success {
        /// The expression, with whitespace collapsed.
        expression: String,
        /// The numeric value.
        value: f64,
        /// The settled display text.
        display_result: String,
    },
    /// The expression could not be evaluated.
    Error {
        /// The expression, with whitespace collapsed.
        expression: String,
        /// Why evaluation failed.
        error: CalcError,
    },
}

impl CalcResult {
    /// Get the expression that was evaluated.
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Error { expression, .. } => expression,
        }
    }

    /// Check if this is a successful result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The text to show: the formatted value, or `"Error"`.
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display_result, .. } => display_result,
            Self::Error { .. } => ERROR_TEXT,
        }
    }

    /// The numeric value of a successful result.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Success { value, .. } => Some(*value),
            Self::Error { .. } => None,
        }
    }

    /// The underlying error of a failed result.
    pub fn error(&self) -> Option<&CalcError> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error, .. } => Some(error),
        }
    }

    /// Diagnostic message for a failed result.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }
}

/// Evaluate an infix expression.
///
/// Blank input, and input with nothing evaluable in it, settles to `"0"`.
pub fn evaluate_expression(input: &str) -> CalcResult {
    let expression = input.split_whitespace().collect::<Vec<_>>().join(" ");

    let tokens = repair_unary_minus(tokenize(&expression));
    let postfix = infix_to_postfix(&tokens);
    if postfix.is_empty() {
        return CalcResult::Success {
            expression,
            value: 0.0,
            display_result: "0".to_string(),
        };
    }

    tracing::debug!(
        expression = %expression,
        postfix = %postfix.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "),
        "evaluating"
    );

    match evaluate_postfix(&postfix) {
        Ok(value) => CalcResult::Success {
            expression,
            display_result: format_number(value),
            value,
        },
        Err(error) => {
            tracing::debug!(expression = %expression, %error, "evaluation failed");
            CalcResult::Error { expression, error }
        }
    }
}

/// Evaluate tokens in postfix order.
///
/// Binary operators pop the right operand first. `%` only needs its right
/// operand; a left operand, when present, is popped and discarded.
pub fn evaluate_postfix(postfix: &[Token]) -> Result<f64, CalcError> {
    let mut stack: Vec<f64> = Vec::new();

    for token in postfix {
        match token {
            Token::Number(_) => {
                let value = token.value().ok_or(CalcError::InvalidExpression)?;
                stack.push(value);
            }
            Token::Operator(Operator::PercentSuffix) => {
                let b = stack.pop().ok_or(CalcError::InvalidExpression)?;
                stack.pop();
                stack.push(b / 100.0);
            }
            Token::Operator(op) => {
                let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
                    return Err(CalcError::InvalidExpression);
                };
                stack.push(apply(*op, a, b)?);
            }
            Token::OpenParen | Token::CloseParen => return Err(CalcError::InvalidExpression),
        }
    }

    match stack.as_slice() {
        [value] if value.is_finite() => Ok(*value),
        [_] => Err(CalcError::NotFinite),
        _ => Err(CalcError::InvalidExpression),
    }
}

fn apply(op: Operator, a: f64, b: f64) -> Result<f64, CalcError> {
    let result = match op {
        Operator::Add => a + b,
        Operator::Subtract => a - b,
        Operator::Multiply => a * b,
        Operator::Divide => {
            if b == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            let quotient = a / b;
            if quotient.abs() < DIVISION_NOISE_FLOOR {
                0.0
            } else {
                quotient
            }
        }
        Operator::Modulo => {
            if b == 0.0 {
                return Err(CalcError::ModuloByZero);
            }
            // Truncating remainder: the sign follows the dividend.
            a % b
        }
        Operator::PercentSuffix => b / 100.0,
    };
    Ok(result)
}

/// Give every unary minus a left operand.
///
/// A `-` at the start or right after `(` gets a zero in front of it. A `-`
/// right after a binary operator negates the operand that follows, which is
/// wrapped as `(0-x)` so `5mod-3` and `2×-3` keep the outer operator's
/// precedence. `%` is a suffix, so a `-` after it stays a subtraction.
fn repair_unary_minus(tokens: Vec<Token>) -> Vec<Token> {
    let mut repaired = Vec::with_capacity(tokens.len() + 1);
    // Paren depths at which a synthetic `(0-` still waits for its operand.
    let mut pending_closes: Vec<usize> = Vec::new();
    let mut depth = 0;

    for token in tokens {
        if token == Token::Operator(Operator::Subtract) {
            match repaired.last() {
                None | Some(Token::OpenParen) => {
                    repaired.push(Token::Number("0".to_string()));
                }
                Some(Token::Operator(op)) if *op != Operator::PercentSuffix => {
                    repaired.push(Token::OpenParen);
                    repaired.push(Token::Number("0".to_string()));
                    depth += 1;
                    pending_closes.push(depth);
                }
                _ => {}
            }
            repaired.push(token);
            continue;
        }

        let ends_operand = match &token {
            Token::Number(_) => true,
            Token::OpenParen => {
                depth += 1;
                false
            }
            Token::CloseParen => {
                depth = depth.saturating_sub(1);
                pending_closes.retain(|&close| close <= depth);
                true
            }
            Token::Operator(_) => false,
        };
        repaired.push(token);

        while ends_operand && pending_closes.last() == Some(&depth) {
            repaired.push(Token::CloseParen);
            pending_closes.pop();
            depth -= 1;
        }
    }
    repaired
}
