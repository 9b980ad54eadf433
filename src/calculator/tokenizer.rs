//! Expression tokenizer.
//!
//! Splits an expression into numbers, operators and parentheses. The scan
//! never fails: characters it does not recognise are skipped.

use super::token::{Operator, Token, is_decimal_point, is_digit, is_parenthesis};

/// Tokenize an expression.
///
/// Digits and decimal points accumulate into a pending literal that is flushed
/// by an operator, a parenthesis or whitespace. Unrecognised characters are
/// skipped without ending the literal, so `2*3` is the single number `23`.
/// `mod` is only recognised where the current character is not already a
/// digit, operator, parenthesis or whitespace.
pub fn tokenize(expression: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut number = String::new();
    let mut rest = expression;

    while let Some(c) = rest.chars().next() {
        if is_digit(c) || is_decimal_point(c) {
            number.push(c);
        } else if let Some(op) = Operator::from_char(c) {
            flush_number(&mut number, &mut tokens);
            tokens.push(Token::Operator(op));
        } else if is_parenthesis(c) {
            flush_number(&mut number, &mut tokens);
            tokens.push(if c == '(' {
                Token::OpenParen
            } else {
                Token::CloseParen
            });
        } else if c.is_whitespace() {
            flush_number(&mut number, &mut tokens);
        } else if rest.starts_with("mod") {
            flush_number(&mut number, &mut tokens);
            tokens.push(Token::Operator(Operator::Modulo));
            rest = &rest["mod".len()..];
            continue;
        }

        rest = &rest[c.len_utf8()..];
    }

    flush_number(&mut number, &mut tokens);
    tokens
}

fn flush_number(number: &mut String, tokens: &mut Vec<Token>) {
    if !number.is_empty() {
        tokens.push(Token::Number(std::mem::take(number)));
    }
}

/// Rebuild expression text from tokens, without whitespace.
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(ToString::to_string).collect()
}
