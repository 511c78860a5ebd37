//! Typed value coercion and user-input parse errors.
//!
//! Coercion turns a raw token into a [`Value`] according to a declared
//! [`ValueType`]. Failures carry the declared field label so they can be
//! surfaced to the user verbatim.

use std::fmt;

use thiserror::Error;

use crate::{Value, ValueType};

/// Identifies the schema field a parse error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    /// An option, by its canonical name.
    Option(String),
    /// A positional argument, by its declared label.
    Argument(String),
}

impl FieldRef {
    /// Field reference for an option.
    pub fn option(name: impl Into<String>) -> Self {
        FieldRef::Option(name.into())
    }

    /// Field reference for a positional argument.
    pub fn argument(name: impl Into<String>) -> Self {
        FieldRef::Argument(name.into())
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Option(name) => write!(f, "option '{name}'"),
            FieldRef::Argument(name) => write!(f, "argument '{name}'"),
        }
    }
}

/// Errors raised while parsing and binding user input.
///
/// These are always recoverable: the shell surfaces them as help text and
/// returns to the prompt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Input token looked like an option but matched no declared option.
    #[error("unrecognized option: '{0}'")]
    UnknownOption(String),
    /// A value-taking option appeared without a value.
    #[error("option '{0}' requires a value")]
    MissingOptionValue(String),
    /// A valueless option was given an inline `=value`.
    #[error("option '{0}' does not take a value")]
    UnexpectedOptionValue(String),
    /// A required positional argument was not supplied.
    #[error("argument '{0}' is not specified")]
    MissingArgument(String),
    /// A raw value could not be coerced to the declared type.
    #[error("{field} expected {expected} value but was: '{value}'")]
    InvalidValue {
        /// The offending field.
        field: FieldRef,
        /// Human-readable name of the expected type.
        expected: &'static str,
        /// The raw input value.
        value: String,
    },
    /// A raw value matched none of a choice type's symbols.
    #[error("{field} expected one of [{}] but was: '{value}'", choices.join(", "))]
    InvalidChoice {
        /// The offending field.
        field: FieldRef,
        /// The declared symbol set.
        choices: Vec<String>,
        /// The raw input value.
        value: String,
    },
    /// Free-form validation failure raised by a command handler.
    #[error("{0}")]
    Invalid(String),
}

impl ParseError {
    /// Free-form validation failure with the given message.
    pub fn invalid(message: impl Into<String>) -> Self {
        ParseError::Invalid(message.into())
    }
}

/// Coerces a raw token to the declared value type.
///
/// Integer and float parsing is locale-independent base-10. Booleans accept
/// `true`/`1` and `false`/`0` case-insensitively. Choice symbols match
/// case-insensitively and bind the symbol as declared. Strings pass through
/// unmodified.
///
/// # Examples
///
/// ```
/// use command_shell_core::{FieldRef, Value, ValueType, coerce};
///
/// let field = FieldRef::option("n");
/// assert_eq!(coerce(&ValueType::Int, "42", &field), Ok(Value::Int(42)));
/// assert_eq!(coerce(&ValueType::Bool, "1", &field), Ok(Value::Bool(true)));
/// assert!(coerce(&ValueType::Int, "4x", &field).is_err());
/// ```
pub fn coerce(ty: &ValueType, raw: &str, field: &FieldRef) -> Result<Value, ParseError> {
    match ty {
        ValueType::String => Ok(Value::String(raw.to_string())),
        ValueType::Int => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ParseError::InvalidValue {
                field: field.clone(),
                expected: "integer",
                value: raw.to_string(),
            }),
        ValueType::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ParseError::InvalidValue {
                field: field.clone(),
                expected: "float",
                value: raw.to_string(),
            }),
        ValueType::Bool => {
            if raw.eq_ignore_ascii_case("true") || raw == "1" {
                Ok(Value::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
                Ok(Value::Bool(false))
            } else {
                Err(ParseError::InvalidValue {
                    field: field.clone(),
                    expected: "boolean",
                    value: raw.to_string(),
                })
            }
        }
        ValueType::Choice(symbols) => symbols
            .iter()
            .find(|s| s.eq_ignore_ascii_case(raw))
            .map(|s| Value::Choice(s.clone()))
            .ok_or_else(|| ParseError::InvalidChoice {
                field: field.clone(),
                choices: symbols.clone(),
                value: raw.to_string(),
            }),
    }
}
