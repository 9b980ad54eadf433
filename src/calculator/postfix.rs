//! Infix to postfix conversion (Shunting-Yard).

use super::token::{Operator, Token};

/// Entries on the operator stack.
#[derive(Clone, Copy, Debug)]
enum Pending {
    Operator(Operator),
    OpenParen,
}

/// Reorder infix tokens into postfix order.
///
/// Never fails. An unmatched `)` is absorbed, unmatched `(` are dropped when
/// the stack is flushed, and number literals with no numeric value are
/// skipped. Missing operands surface later, in the evaluator.
pub fn infix_to_postfix(tokens: &[Token]) -> Vec<Token> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) => {
                if token.value().is_some() {
                    output.push(token.clone());
                }
            }
            Token::Operator(op) => {
                // Pop while the top binds at least as tightly: left-associative.
                while let Some(&Pending::Operator(top)) = stack.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    stack.pop();
                    output.push(Token::Operator(top));
                }
                stack.push(Pending::Operator(*op));
            }
            Token::OpenParen => stack.push(Pending::OpenParen),
            Token::CloseParen => {
                while let Some(pending) = stack.pop() {
                    match pending {
                        Pending::Operator(op) => output.push(Token::Operator(op)),
                        Pending::OpenParen => break,
                    }
                }
            }
        }
    }

    while let Some(pending) = stack.pop() {
        if let Pending::Operator(op) = pending {
            output.push(Token::Operator(op));
        }
    }

    output
}
