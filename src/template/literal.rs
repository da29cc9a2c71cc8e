// ABOUTME: Literal argument values passed to template functions
// ABOUTME: Tokenizes a call's argument list and coerces tokens to integers, floats or strings

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::error::InvocationError;

static FLOAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+\.[0-9]+$").expect("constant regex pattern is valid"));

/// A coerced function argument
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
}

impl Literal {
    /// Coerce a single trimmed argument token.
    ///
    /// All-digit tokens become integers, `-?digits.digits` becomes a float and
    /// anything else is a string with every quote character removed.
    pub fn coerce(token: &str) -> Self {
        if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(value) = token.parse::<i64>() {
                return Literal::Integer(value);
            }
        } else if FLOAT_PATTERN.is_match(token) {
            if let Ok(value) = token.parse::<f64>() {
                return Literal::Float(value);
            }
        }

        Literal::String(strip_quotes(token))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view of the literal; integers widen to floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Literal::Integer(value) => Some(*value as f64),
            Literal::Float(value) => Some(*value),
            Literal::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Integer(_) => "integer",
            Literal::Float(_) => "float",
            Literal::String(_) => "string",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{}", value),
            Literal::Float(value) => write!(f, "{}", value),
            Literal::String(value) => write!(f, "{}", value),
        }
    }
}

/// Remove every `"` and `'` from the token, not just the outer pair
pub fn strip_quotes(token: &str) -> String {
    token.chars().filter(|c| !matches!(c, '"' | '\'')).collect()
}

/// Split a raw argument list on commas and coerce each space-trimmed token.
///
/// An empty argument list yields no arguments. Anything else yields one
/// literal per comma-separated token, so `" "` is a single empty string.
pub fn parse_arguments(raw: &str) -> Vec<Literal> {
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(',')
        .map(|token| Literal::coerce(token.trim_matches(' ')))
        .collect()
}

/// Check that exactly `expected` arguments were passed
pub fn expect_arity(args: &[Literal], expected: usize) -> Result<(), InvocationError> {
    if args.len() != expected {
        return Err(InvocationError::arity(expected.to_string(), args.len()));
    }
    Ok(())
}

/// Fetch argument `index` as text; numbers are rendered with their display form
pub fn text_arg(args: &[Literal], index: usize) -> Result<String, InvocationError> {
    args.get(index)
        .map(|literal| literal.to_string())
        .ok_or_else(|| InvocationError::argument(index, "missing argument"))
}

/// Fetch argument `index` as a number
pub fn float_arg(args: &[Literal], index: usize) -> Result<f64, InvocationError> {
    let literal = args
        .get(index)
        .ok_or_else(|| InvocationError::argument(index, "missing argument"))?;

    literal.as_float().ok_or_else(|| {
        InvocationError::argument(
            index,
            format!("expected a number, got {} '{}'", literal.type_name(), literal),
        )
    })
}

/// Fetch argument `index` as an integer
pub fn int_arg(args: &[Literal], index: usize) -> Result<i64, InvocationError> {
    let literal = args
        .get(index)
        .ok_or_else(|| InvocationError::argument(index, "missing argument"))?;

    literal.as_int().ok_or_else(|| {
        InvocationError::argument(
            index,
            format!("expected an integer, got {} '{}'", literal.type_name(), literal),
        )
    })
}
