//! Arithmetic on amounts typed into the expense form.
//!
//! Grammar (left associative, `*` and `/` bind tighter):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | 'x' | '/') factor)*
//! factor := '-'* number
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("expression is empty")]
    Empty,

    #[error("unexpected {0:?} at position {1}")]
    UnexpectedChar(char, usize),

    #[error("expression ends where a number was expected")]
    UnexpectedEnd,

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("result is out of range")]
    Overflow,
}

/// Evaluates `input` and rounds the result half-up to two decimals.
pub fn evaluate(input: &str) -> Result<Decimal, CalcError> {
    if input.trim().is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser {
        input,
        chars: input.char_indices().peekable(),
    };
    let value = parser.expr()?;
    parser.skip_whitespace();
    if let Some((pos, c)) = parser.chars.next() {
        return Err(CalcError::UnexpectedChar(c, pos));
    }

    Ok(value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize())
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.peek().map(|&(_, c)| c)
    }

    fn expr(&mut self) -> Result<Decimal, CalcError> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.chars.next();
            let rhs = self.term()?;
            value = match op {
                '+' => value.checked_add(rhs),
                _ => value.checked_sub(rhs),
            }
            .ok_or(CalcError::Overflow)?;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Decimal, CalcError> {
        let mut value = self.factor()?;
        while let Some(op @ ('*' | 'x' | 'X' | '/')) = self.peek() {
            self.chars.next();
            let rhs = self.factor()?;
            value = if op == '/' {
                if rhs.is_zero() {
                    return Err(CalcError::DivisionByZero);
                }
                value.checked_div(rhs)
            } else {
                value.checked_mul(rhs)
            }
            .ok_or(CalcError::Overflow)?;
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<Decimal, CalcError> {
        let mut negative = false;
        while self.peek() == Some('-') {
            self.chars.next();
            negative = !negative;
        }

        let value = match self.peek() {
            Some(c) if c.is_ascii_digit() || c == '.' => self.number()?,
            Some(c) => {
                let pos = self.chars.peek().map(|&(pos, _)| pos).unwrap_or(self.input.len());
                return Err(CalcError::UnexpectedChar(c, pos));
            }
            None => return Err(CalcError::UnexpectedEnd),
        };

        Ok(if negative { -value } else { value })
    }

    fn number(&mut self) -> Result<Decimal, CalcError> {
        let start = self.chars.peek().map(|&(pos, _)| pos).unwrap_or(self.input.len());
        let mut end = start;
        while let Some(&(pos, c)) = self.chars.peek() {
            if !(c.is_ascii_digit() || c == '.') {
                break;
            }
            end = pos + c.len_utf8();
            self.chars.next();
        }

        let literal = &self.input[start..end];
        if literal.matches('.').count() > 1 || literal == "." {
            return Err(CalcError::InvalidNumber(literal.to_string()));
        }
        Decimal::from_str(literal).map_err(|_| CalcError::InvalidNumber(literal.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> Decimal {
        evaluate(input).unwrap()
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(eval("2 + 3 * 4"), Decimal::new(14, 0));
        assert_eq!(eval("10 - 4 - 3"), Decimal::new(3, 0));
        assert_eq!(eval("100 / 4 / 5"), Decimal::new(5, 0));
        assert_eq!(eval("1500 x 3"), Decimal::new(4500, 0));
    }

    #[test]
    fn test_decimals_and_unary_minus() {
        assert_eq!(eval("-250.5 + 1000"), Decimal::new(7495, 1));
        assert_eq!(eval("2 * -3"), Decimal::new(-6, 0));
        assert_eq!(eval(".5 + .25"), Decimal::new(75, 2));
    }

    #[test]
    fn test_result_rounds_to_two_places() {
        assert_eq!(eval("10 / 3"), Decimal::new(333, 2));
        assert_eq!(eval("2 / 3"), Decimal::new(67, 2));
        assert_eq!(eval("1.50 + 1.50").to_string(), "3");
    }

    #[test]
    fn test_repeated_unary_minus() {
        assert_eq!(eval("--5"), Decimal::new(5, 0));
        assert_eq!(eval("3 - - -2"), Decimal::new(1, 0));

        let odd = format!("{}5", "-".repeat(100_001));
        assert_eq!(eval(&odd), Decimal::new(-5, 0));
        let dangling = "-".repeat(100_000);
        assert_eq!(evaluate(&dangling), Err(CalcError::UnexpectedEnd));
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("   "), Err(CalcError::Empty));
        assert_eq!(evaluate("5 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("5 +"), Err(CalcError::UnexpectedEnd));
        assert_eq!(evaluate("5 $ 2"), Err(CalcError::UnexpectedChar('$', 2)));
        assert_eq!(
            evaluate("1.2.3"),
            Err(CalcError::InvalidNumber("1.2.3".to_string()))
        );
        assert_eq!(evaluate("alert(1)"), Err(CalcError::UnexpectedChar('a', 0)));
    }
}
