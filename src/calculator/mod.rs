//! Calculator module for evaluating arithmetic expressions.
//!
//! This module provides functionality to:
//! - Split an expression into tokens
//! - Reorder tokens into postfix order and evaluate them
//! - Format results for the settled display and the live preview
//! - Validate keystrokes before they extend an expression

mod evaluation;
mod format;
mod postfix;
mod token;
mod tokenizer;
mod validation;

pub use evaluation::{CalcError, CalcResult, evaluate_expression, evaluate_postfix};
pub use format::{ERROR_TEXT, format_for_display, format_number, format_with_commas};
pub use postfix::infix_to_postfix;
pub use token::{Operator, Token, is_decimal_point, is_digit, is_operator, is_parenthesis};
pub use tokenizer::{join_tokens, tokenize};
pub use validation::{can_append, is_complete_expression};
