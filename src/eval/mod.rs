//! Arithmetic expression evaluation.
//!
//! A small recursive-descent evaluator over `+`, `-`, `*`, `/`, parentheses
//! and decimal literals. Expressions are computed as `f64`; results with no
//! fractional part render without a decimal point, so `"3 + 5 * 2"` yields
//! `"13"` and `"7/2"` yields `"3.5"`.
//!
//! The evaluator is a pure function with no state, so it can be called from
//! any number of concurrent sessions without synchronization.

mod parser;

use thiserror::Error;

/// Errors produced while tokenizing, parsing or computing an expression.
///
/// The `Display` form of each variant is written to be shown directly to the
/// requesting client, prefixed with `"Error evaluating expression: "`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("expected a number or '('")]
    ExpectedOperand,

    #[error("missing closing parenthesis")]
    UnmatchedParen,

    #[error("unexpected trailing input")]
    TrailingInput,

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("division by zero")]
    DivisionByZero,
}

/// Evaluates an arithmetic expression and returns its result as a string.
///
/// # Examples
///
/// ```
/// assert_eq!(calcsrv::evaluate("3 + 5 * 2").unwrap(), "13");
/// assert_eq!(calcsrv::evaluate("(1 + 2) / 4").unwrap(), "0.75");
/// assert!(calcsrv::evaluate("1/0").is_err());
/// ```
pub fn evaluate(expression: &str) -> Result<String, EvalError> {
    let value = parser::parse(expression)?;
    Ok(format_value(value))
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_results_have_no_decimal_point() {
        assert_eq!(evaluate("3 + 5 * 2").unwrap(), "13");
        assert_eq!(evaluate("10*10").unwrap(), "100");
        assert_eq!(evaluate("4/2").unwrap(), "2");
    }

    #[test]
    fn fractional_results_keep_their_fraction() {
        assert_eq!(evaluate("7/2").unwrap(), "3.5");
        assert_eq!(evaluate("1/4").unwrap(), "0.25");
    }

    #[test]
    fn negative_results() {
        assert_eq!(evaluate("2 - 5").unwrap(), "-3");
        assert_eq!(evaluate("-(3 * 4)").unwrap(), "-12");
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(evaluate("1/0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("5 / (2 - 2)"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(evaluate(""), Err(EvalError::Empty));
        assert_eq!(evaluate("   "), Err(EvalError::Empty));
    }

    #[test]
    fn error_messages_read_naturally() {
        assert_eq!(
            evaluate("2 $ 2").unwrap_err().to_string(),
            "unexpected character '$'"
        );
        assert_eq!(evaluate("1/0").unwrap_err().to_string(), "division by zero");
    }
}
