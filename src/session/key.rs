//! Keystrokes accepted by the calculator state machine.

use std::fmt;
use std::str::FromStr;

use crate::calculator::{CalcError, Operator, is_digit};

/// A single key press on the calculator keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Operator(Operator),
    Decimal,
    OpenParen,
    CloseParen,
    Equals,
    Backspace,
    Clear,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{}", d),
            Self::Operator(op) => write!(f, "{}", op),
            Self::Decimal => f.write_str("."),
            Self::OpenParen => f.write_str("("),
            Self::CloseParen => f.write_str(")"),
            Self::Equals => f.write_str("="),
            Self::Backspace => f.write_str("⌫"),
            Self::Clear => f.write_str("C"),
        }
    }
}

impl FromStr for Key {
    type Err = CalcError;

    /// Parse the label of a single key, e.g. `"7"`, `"mod"` or `"="`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "." => Self::Decimal,
            "(" => Self::OpenParen,
            ")" => Self::CloseParen,
            "=" => Self::Equals,
            "C" | "c" => Self::Clear,
            "<" | "⌫" => Self::Backspace,
            s if s.len() == 1 && s.chars().all(is_digit) => match s.chars().next() {
                Some(digit) => Self::Digit(digit),
                None => return Err(CalcError::UnknownOperator(s.to_string())),
            },
            s => Self::Operator(s.parse()?),
        };
        Ok(key)
    }
}

/// Turn a typed line into key presses.
///
/// Recognises digits, `.`, `( )`, the keypad operators and `mod`, `=` for
/// equals, `C` for clear and `<` or `⌫` for backspace. With `ascii_operators`
/// set, `*` and `/` stand for `×` and `÷`. Whitespace is ignored; any other
/// character is skipped with a warning.
pub fn keys_from_input(input: &str, ascii_operators: bool) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        if rest.starts_with("mod") {
            keys.push(Key::Operator(Operator::Modulo));
            rest = &rest["mod".len()..];
            continue;
        }

        let key = match c {
            c if is_digit(c) => Some(Key::Digit(c)),
            '.' => Some(Key::Decimal),
            '(' => Some(Key::OpenParen),
            ')' => Some(Key::CloseParen),
            '=' => Some(Key::Equals),
            'C' | 'c' => Some(Key::Clear),
            '<' | '⌫' => Some(Key::Backspace),
            '*' if ascii_operators => Some(Key::Operator(Operator::Multiply)),
            '/' if ascii_operators => Some(Key::Operator(Operator::Divide)),
            c => Operator::from_char(c).map(Key::Operator),
        };

        match key {
            Some(key) => keys.push(key),
            None if c.is_whitespace() => {}
            None => tracing::warn!(key = %c, "ignoring unrecognised key"),
        }

        rest = &rest[c.len_utf8()..];
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_and_operators() {
        assert_eq!(
            keys_from_input("12+3", true),
            vec![
                Key::Digit('1'),
                Key::Digit('2'),
                Key::Operator(Operator::Add),
                Key::Digit('3'),
            ]
        );
    }

    #[test]
    fn test_mod_and_controls() {
        assert_eq!(
            keys_from_input("7 mod 2 = < C", true),
            vec![
                Key::Digit('7'),
                Key::Operator(Operator::Modulo),
                Key::Digit('2'),
                Key::Equals,
                Key::Backspace,
                Key::Clear,
            ]
        );
    }

    #[test]
    fn test_ascii_aliases() {
        assert_eq!(
            keys_from_input("2*3/4", true),
            vec![
                Key::Digit('2'),
                Key::Operator(Operator::Multiply),
                Key::Digit('3'),
                Key::Operator(Operator::Divide),
                Key::Digit('4'),
            ]
        );
        assert_eq!(
            keys_from_input("2*3", false),
            vec![Key::Digit('2'), Key::Digit('3')]
        );
    }

    #[test]
    fn test_unknown_skipped() {
        assert_eq!(keys_from_input("x?", true), vec![]);
        assert_eq!(
            keys_from_input("(.5)", true),
            vec![
                Key::OpenParen,
                Key::Decimal,
                Key::Digit('5'),
                Key::CloseParen
            ]
        );
    }

    #[test]
    fn test_parse_single_key() {
        assert_eq!("7".parse::<Key>().unwrap(), Key::Digit('7'));
        assert_eq!("mod".parse::<Key>().unwrap(), Key::Operator(Operator::Modulo));
        assert_eq!("÷".parse::<Key>().unwrap(), Key::Operator(Operator::Divide));
        assert_eq!("=".parse::<Key>().unwrap(), Key::Equals);
        assert_eq!(
            "^".parse::<Key>().unwrap_err(),
            CalcError::UnknownOperator("^".to_string())
        );
        assert!("42".parse::<Key>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Key::Operator(Operator::Modulo).to_string(), "mod");
        assert_eq!(Key::Digit('9').to_string(), "9");
        assert_eq!(Key::Backspace.to_string(), "⌫");
    }
}
