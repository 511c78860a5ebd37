//! Schema validation.
//!
//! Validates structural invariants of application schemas before they are
//! compiled into a command set: name patterns, duplicate option names,
//! duplicate argument indices, and type constraints. These are
//! configuration-time failures caused by the application author, distinct
//! from the user-input [`ParseError`](crate::ParseError)s raised at parse
//! time.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{ArgumentSpec, OptionSpec, ValueType};

static COMMAND_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z_.][a-z0-9_\-.]*(\s+[a-z_.][a-z0-9_\-.]*)*$")
        .expect("static regex must compile")
});
static SHORT_OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z_.][a-z0-9]*$").expect("static regex must compile")
});
static LONG_OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z_.][a-z0-9_\-.]+$").expect("static regex must compile")
});

/// Schema construction errors.
///
/// Fatal to schema compilation and never recoverable at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Command name contains illegal characters or word shapes.
    #[error("inappropriate command name: '{0}'")]
    InvalidCommandName(String),
    /// Short option name does not match the allowed pattern.
    #[error("invalid short option name: '{0}'")]
    InvalidShortOption(String),
    /// Long option name does not match the allowed pattern.
    #[error("invalid long option name: '{0}'")]
    InvalidLongOption(String),
    /// An option declares neither a short nor a long name.
    #[error("option must define a short or long name")]
    MissingOptionName,
    /// Two options in the same scope share a name.
    #[error("duplicate option in scope: '{0}'")]
    DuplicateOption(String),
    /// Two positional arguments of one command share an index.
    #[error("duplicate argument index {index} in command '{command}'")]
    DuplicateArgumentIndex {
        /// Qualified command name.
        command: String,
        /// The repeated 1-based index.
        index: usize,
    },
    /// A positional argument uses index 0 (indices are 1-based).
    #[error("argument '{0}' has index 0; indices are 1-based")]
    ZeroArgumentIndex(String),
    /// A valueless option declares a non-boolean value type.
    #[error("valueless option '{0}' must have a boolean value type")]
    ValuelessOptionType(String),
    /// A default command (empty name) was declared in an unnamed app.
    #[error("a default command cannot be declared in an unnamed application")]
    EmbeddedDefaultCommand,
    /// A command references a handler id with no registered handler.
    #[error("no handler registered for id '{0}'")]
    UnknownHandler(String),
}

/// Validates a (possibly multi-word) command name.
pub fn validate_command_name(name: &str) -> Result<(), SchemaError> {
    if COMMAND_NAME_RE.is_match(name.trim()) {
        Ok(())
    } else {
        Err(SchemaError::InvalidCommandName(name.to_string()))
    }
}

/// Validates one scope level of options: name patterns, per-scope
/// duplicates, and the valueless-implies-boolean constraint.
///
/// Cross-scope duplicates are legal (command-level options shadow app-level
/// ones) and resolved by [`compile`](crate::compile).
pub fn validate_options(options: &[OptionSpec]) -> Result<(), SchemaError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for option in options {
        if option.short.is_none() && option.long.is_none() {
            return Err(SchemaError::MissingOptionName);
        }

        if let Some(short) = &option.short {
            if !SHORT_OPTION_RE.is_match(short) {
                return Err(SchemaError::InvalidShortOption(short.clone()));
            }
            if !seen.insert(short) {
                return Err(SchemaError::DuplicateOption(short.clone()));
            }
        }

        if let Some(long) = &option.long {
            if !LONG_OPTION_RE.is_match(long) {
                return Err(SchemaError::InvalidLongOption(long.clone()));
            }
            if !seen.insert(long) {
                return Err(SchemaError::DuplicateOption(long.clone()));
            }
        }

        if !option.takes_value && option.value_type != ValueType::Bool {
            return Err(SchemaError::ValuelessOptionType(
                option.canonical_name().to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates a command's positional arguments: 1-based, unique indices.
pub fn validate_args(command: &str, args: &[ArgumentSpec]) -> Result<(), SchemaError> {
    let mut seen: HashSet<usize> = HashSet::new();

    for arg in args {
        if arg.index == 0 {
            return Err(SchemaError::ZeroArgumentIndex(arg.name.clone()));
        }
        if !seen.insert(arg.index) {
            return Err(SchemaError::DuplicateArgumentIndex {
                command: command.to_string(),
                index: arg.index,
            });
        }
    }

    Ok(())
}
