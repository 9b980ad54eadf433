//! Lexical tokens and operator metadata shared by every pipeline stage.

use std::fmt;
use std::str::FromStr;

use super::evaluation::CalcError;

/// Binary (or suffix) operators understood by the calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// The three-character `mod` operator.
    Modulo,
    /// `%`, which divides its right operand by 100.
    PercentSuffix,
}

impl Operator {
    /// Binding strength. All operators are left-associative.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Subtract => 1,
            Self::Multiply | Self::Divide => 2,
            Self::Modulo | Self::PercentSuffix => 3,
        }
    }

    /// The text this operator has inside an expression.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Modulo => "mod",
            Self::PercentSuffix => "%",
        }
    }

    /// Map a single-character operator symbol. `mod` has no single-char form.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '×' => Some(Self::Multiply),
            '÷' => Some(Self::Divide),
            '%' => Some(Self::PercentSuffix),
            _ => None,
        }
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "mod" {
            return Ok(Self::Modulo);
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Self::from_char(c).ok_or_else(|| CalcError::UnknownOperator(s.to_string()))
            }
            _ => Err(CalcError::UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single lexical unit of an expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Literal digits and decimal points, exactly as typed.
    Number(String),
    Operator(Operator),
    OpenParen,
    CloseParen,
}

impl Token {
    /// Numeric value of a number literal.
    ///
    /// Literals are read leniently: `"1.2.3"` is `1.2` and `"5."` is `5`.
    /// A literal with no leading numeric part (such as `"."`) has no value.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(text) => super::format::parse_leading_float(text),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(text) => f.write_str(text),
            Self::Operator(op) => f.write_str(op.symbol()),
            Self::OpenParen => f.write_str("("),
            Self::CloseParen => f.write_str(")"),
        }
    }
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_decimal_point(c: char) -> bool {
    c == '.'
}

/// Single-character operators: `+ - × ÷ %`.
pub fn is_operator(c: char) -> bool {
    Operator::from_char(c).is_some()
}

pub fn is_parenthesis(c: char) -> bool {
    c == '(' || c == ')'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_table() {
        assert_eq!(Operator::Add.precedence(), 1);
        assert_eq!(Operator::Subtract.precedence(), 1);
        assert_eq!(Operator::Multiply.precedence(), 2);
        assert_eq!(Operator::Divide.precedence(), 2);
        assert_eq!(Operator::Modulo.precedence(), 3);
        assert_eq!(Operator::PercentSuffix.precedence(), 3);
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!("mod".parse::<Operator>().unwrap(), Operator::Modulo);
        assert_eq!("×".parse::<Operator>().unwrap(), Operator::Multiply);
        assert_eq!("%".parse::<Operator>().unwrap(), Operator::PercentSuffix);
        assert_eq!(
            "^".parse::<Operator>().unwrap_err(),
            CalcError::UnknownOperator("^".to_string())
        );
        assert!("++".parse::<Operator>().is_err());
        assert!("".parse::<Operator>().is_err());
    }

    #[test]
    fn test_lenient_number_values() {
        assert_eq!(Token::Number("42".into()).value(), Some(42.0));
        assert_eq!(Token::Number("1.2.3".into()).value(), Some(1.2));
        assert_eq!(Token::Number("5.".into()).value(), Some(5.0));
        assert_eq!(Token::Number(".5".into()).value(), Some(0.5));
        assert_eq!(Token::Number(".".into()).value(), None);
        assert_eq!(Token::OpenParen.value(), None);
    }

    #[test]
    fn test_character_classes() {
        assert!(is_operator('×'));
        assert!(is_operator('%'));
        assert!(!is_operator('*'));
        assert!(!is_operator('m'));
        assert!(is_parenthesis(')'));
        assert!(is_digit('7'));
        assert!(!is_digit('.'));
        assert!(is_decimal_point('.'));
    }
}
