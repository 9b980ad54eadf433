//! Input checks used while an expression is being typed.
//!
//! [`can_append`] decides whether a keystroke may extend the current
//! expression; [`is_complete_expression`] decides whether the expression is
//! finished enough to be worth recording.

use lazy_static::lazy_static;
use regex::Regex;

use super::token::{Token, is_digit, is_operator};
use super::tokenizer::tokenize;

lazy_static! {
    /// The numeric run at the end of an expression: digits, an optional dot, digits.
    static ref TRAILING_NUMBER: Regex = Regex::new(r"\d+\.?\d*$").unwrap();
}

/// What kind of text is being appended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Candidate {
    Digit,
    Decimal,
    Minus,
    Operator,
    Open,
    Close,
    Other,
}

impl Candidate {
    fn of(text: &str) -> Self {
        if text == "mod" {
            return Self::Operator;
        }

        let mut chars = text.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Self::Other;
        };

        match c {
            '-' => Self::Minus,
            '.' => Self::Decimal,
            '(' => Self::Open,
            ')' => Self::Close,
            c if is_digit(c) => Self::Digit,
            c if is_operator(c) => Self::Operator,
            _ => Self::Other,
        }
    }

    fn is_operator(self) -> bool {
        matches!(self, Self::Operator | Self::Minus)
    }

    /// Digits, `(` or a unary minus: whatever may start an operand.
    fn starts_operand(self) -> bool {
        matches!(self, Self::Digit | Self::Open | Self::Minus)
    }
}

/// Check whether `next` may be appended to `expression`.
///
/// `next` is a single character, or `"mod"`. The decision depends only on how
/// the expression currently ends.
pub fn can_append(expression: &str, next: &str) -> bool {
    let candidate = Candidate::of(next);

    let Some(last) = expression.chars().last() else {
        return candidate.starts_operand();
    };

    if is_digit(last) {
        let in_decimal = TRAILING_NUMBER
            .find(expression)
            .is_some_and(|m| m.as_str().contains('.'));
        return match candidate {
            Candidate::Decimal => !in_decimal,
            Candidate::Digit | Candidate::Close => true,
            other => other.is_operator(),
        };
    }

    if is_operator(last) || expression.ends_with("mod") {
        return candidate.starts_operand();
    }

    match last {
        '(' => candidate.starts_operand(),
        ')' => candidate.is_operator() || candidate == Candidate::Close,
        _ => false,
    }
}

/// Check whether an expression is complete enough to evaluate.
///
/// Parentheses must balance without ever closing more than were opened, and
/// the last token must be a number or `)`.
pub fn is_complete_expression(expression: &str) -> bool {
    if expression.trim().is_empty() {
        return false;
    }

    let tokens = tokenize(expression);
    let mut depth: i32 = 0;
    for token in &tokens {
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return false;
    }

    match tokens.last() {
        Some(token @ Token::Number(_)) => token.value().is_some(),
        Some(Token::CloseParen) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_expression() {
        assert!(can_append("", "7"));
        assert!(can_append("", "("));
        assert!(can_append("", "-"));
        assert!(!can_append("", "+"));
        assert!(!can_append("", "."));
        assert!(!can_append("", ")"));
        assert!(!can_append("", "mod"));
    }

    #[test]
    fn test_after_digit() {
        assert!(can_append("12", "3"));
        assert!(can_append("12", "×"));
        assert!(can_append("12", "mod"));
        assert!(can_append("12", ")"));
        assert!(can_append("12", "."));
        assert!(!can_append("12", "("));
    }

    #[test]
    fn test_single_decimal_point_per_number() {
        assert!(!can_append("1.5", "."));
        assert!(!can_append("3+1.25", "."));
        assert!(can_append("1.5+2", "."));
    }

    #[test]
    fn test_after_operator() {
        assert!(can_append("5+", "3"));
        assert!(can_append("5×", "("));
        assert!(can_append("5÷", "-"));
        assert!(!can_append("5+", "×"));
        assert!(!can_append("5+", ")"));
        assert!(!can_append("5+", "."));
    }

    #[test]
    fn test_after_mod() {
        assert!(can_append("10mod", "3"));
        assert!(can_append("10mod", "("));
        assert!(can_append("10mod", "-"));
        assert!(!can_append("10mod", "+"));
    }

    #[test]
    fn test_after_parentheses() {
        assert!(can_append("(", "4"));
        assert!(can_append("(", "-"));
        assert!(can_append("(", "("));
        assert!(!can_append("(", "+"));
        assert!(can_append("(1)", "+"));
        assert!(can_append("(1)", "mod"));
        assert!(can_append("((1)", ")"));
        assert!(!can_append("(1)", "2"));
    }

    #[test]
    fn test_otherwise_rejected() {
        assert!(!can_append("5.", "3"));
        assert!(!can_append("12", "x"));
        assert!(!can_append("12", "*"));
    }

    #[test]
    fn test_complete_expressions() {
        assert!(is_complete_expression("2+3"));
        assert!(is_complete_expression("(2+3)×4"));
        assert!(is_complete_expression("7"));
        assert!(!is_complete_expression(""));
        assert!(!is_complete_expression("2+"));
        assert!(!is_complete_expression("(2+3"));
        assert!(!is_complete_expression(")2+3("));
        assert!(!is_complete_expression("."));
    }
}
