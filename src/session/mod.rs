//! Calculator state machine.
//!
//! [`CalcState`] is a plain value: every key press consumes the old state and
//! returns the new one, so the caller decides where state lives.

mod key;

pub use key::{Key, keys_from_input};

use serde::{Deserialize, Serialize};

use crate::calculator::{
    CalcError, CalcResult, ERROR_TEXT, Operator, can_append, evaluate_expression,
    format_for_display, is_complete_expression, is_operator,
};
use crate::history::HistoryEntry;

/// Whether key presses are checked with [`can_append`] before being applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Keys that would make the expression uncompletable are ignored.
    #[default]
    Strict,
    /// Every key is applied as typed.
    Advisory,
}

/// Expression being typed, the last settled result and the last error.
#[derive(Clone, Debug, PartialEq)]
pub struct CalcState {
    expression: String,
    result: String,
    error: Option<CalcError>,
}

impl Default for CalcState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalcState {
    pub fn new() -> Self {
        Self {
            expression: String::new(),
            result: "0".to_string(),
            error: None,
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The last settled result: a formatted number, `"0"` or `"Error"`.
    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn error(&self) -> Option<&CalcError> {
        self.error.as_ref()
    }

    /// Apply one key press.
    pub fn apply(self, key: Key, mode: InputMode) -> Self {
        match key {
            Key::Digit(digit) => self.input_digit(digit, mode),
            Key::Operator(op) => self.input_operator(op, mode),
            Key::Decimal => self.input_decimal(mode),
            Key::OpenParen => self.input_parenthesis('(', mode),
            Key::CloseParen => self.input_parenthesis(')', mode),
            Key::Equals => self.calculate(),
            Key::Backspace => self.backspace(),
            Key::Clear => Self::new(),
        }
    }

    /// Apply key presses in order.
    pub fn apply_all(self, keys: impl IntoIterator<Item = Key>, mode: InputMode) -> Self {
        keys.into_iter().fold(self, |state, key| state.apply(key, mode))
    }

    fn input_digit(mut self, digit: char, mode: InputMode) -> Self {
        if !self.accepts(&digit.to_string(), mode) {
            return self.reject(Key::Digit(digit));
        }
        self.expression.push(digit);
        self.error = None;
        self
    }

    /// A new operator replaces a trailing single-character operator, so
    /// repeated presses overwrite. A trailing `mod` is not replaced.
    fn input_operator(mut self, op: Operator, mode: InputMode) -> Self {
        self.error = None;

        if self.expression.is_empty() {
            if op == Operator::Subtract {
                self.expression.push_str(op.symbol());
            }
            return self;
        }

        let trailing_operator = self.expression.chars().last().filter(|&c| is_operator(c));
        if let Some(last) = trailing_operator {
            let kept = self.expression.len() - last.len_utf8();
            if mode == InputMode::Strict && !can_append(&self.expression[..kept], op.symbol()) {
                return self.reject(Key::Operator(op));
            }
            self.expression.truncate(kept);
        } else if !self.accepts(op.symbol(), mode) {
            return self.reject(Key::Operator(op));
        }

        self.expression.push_str(op.symbol());
        self
    }

    fn input_decimal(mut self, mode: InputMode) -> Self {
        let current_number = self.expression.rsplit(is_operator).next().unwrap_or("");
        if current_number.contains('.') || !self.accepts(".", mode) {
            return self.reject(Key::Decimal);
        }
        self.expression.push('.');
        self.error = None;
        self
    }

    fn input_parenthesis(mut self, paren: char, mode: InputMode) -> Self {
        let key = if paren == '(' {
            Key::OpenParen
        } else {
            Key::CloseParen
        };
        if !self.accepts(&paren.to_string(), mode) {
            return self.reject(key);
        }
        self.expression.push(paren);
        self.error = None;
        self
    }

    fn backspace(mut self) -> Self {
        if self.expression.pop().is_some() {
            self.error = None;
        }
        self
    }

    /// Settle the expression. The expression itself is kept for further edits.
    fn calculate(mut self) -> Self {
        if self.expression.is_empty() {
            return self;
        }

        match evaluate_expression(&self.expression) {
            CalcResult::Success { display_result, .. } => {
                self.result = display_result;
                self.error = None;
            }
            CalcResult::Error { error, .. } => {
                self.result = ERROR_TEXT.to_string();
                self.error = Some(error);
            }
        }
        self
    }

    /// Load a history entry back into the calculator.
    pub fn recall(entry: &HistoryEntry) -> Self {
        Self {
            expression: entry.expression.clone(),
            result: entry.result.clone(),
            error: None,
        }
    }

    /// The text for the main display while typing.
    ///
    /// Shows `"Error"` while an error is flagged, the settled result when
    /// nothing is being typed, and otherwise a live evaluation of the
    /// expression through the preview formatter.
    pub fn preview(&self) -> String {
        if self.error.is_some() {
            return ERROR_TEXT.to_string();
        }
        if self.expression.is_empty() {
            return self.result.clone();
        }

        let live = evaluate_expression(&self.expression);
        if live.is_success() {
            format_for_display(live.display())
        } else {
            ERROR_TEXT.to_string()
        }
    }

    /// The `(expression, result)` pair worth recording after a settle.
    ///
    /// Only complete, error-free expressions with a non-zero result qualify.
    pub fn history_record(&self) -> Option<(&str, &str)> {
        let settled = self.error.is_none()
            && self.result != "0"
            && self.result != ERROR_TEXT
            && is_complete_expression(&self.expression);
        settled.then_some((self.expression.as_str(), self.result.as_str()))
    }

    /// In strict mode, check the key against the expression. A trailing
    /// decimal point counts as part of the number being typed.
    fn accepts(&self, next: &str, mode: InputMode) -> bool {
        match mode {
            InputMode::Advisory => true,
            InputMode::Strict => {
                let base = self
                    .expression
                    .strip_suffix('.')
                    .unwrap_or(&self.expression);
                can_append(base, next)
            }
        }
    }

    fn reject(self, key: Key) -> Self {
        tracing::debug!(expression = %self.expression, %key, "key rejected");
        self
    }
}
