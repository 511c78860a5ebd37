//! Value binding: typed values from parsed tokens.
//!
//! The binder maps the raw output of the option-parsing delegate onto a
//! command's schema view, producing a [`BoundCommand`] of typed values.
//! Required-argument presence is checked before any value is bound, so a
//! missing argument fails fast without partial binding.

use std::collections::BTreeMap;
use std::sync::Arc;

use command_shell_core::{
    CommandSet, CompiledCommand, FieldRef, ParseError, SchemaView, Value, coerce,
};

use crate::optparse::{OptionParser, RawMatches};

/// Typed values bound for one dispatch: options and enumerated arguments
/// keyed by their declared names, plus the variadic trailing tokens.
///
/// Ephemeral; recomputed per input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundCommand {
    options: BTreeMap<String, Value>,
    args: BTreeMap<String, Value>,
    trailing: Option<Vec<String>>,
}

impl BoundCommand {
    /// The bound value of an option, by canonical name.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Whether a valueless option was present (absent options read as
    /// `false`).
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.options.get(name), Some(Value::Bool(true)))
    }

    /// The bound value of an enumerated argument, by declared name.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// String content of an enumerated argument, when bound as a string.
    pub fn arg_str(&self, name: &str) -> Option<&str> {
        self.args.get(name).and_then(Value::as_str)
    }

    /// The full trailing token vector, when the schema declares a variadic
    /// field.
    ///
    /// This is the *entire* positional residual, including tokens also
    /// consumed by enumerated arguments.
    pub fn trailing(&self) -> Option<&[String]> {
        self.trailing.as_deref()
    }
}

/// Binds raw matches onto a schema view.
///
/// Fails fast when a required argument is missing, then coerces option and
/// argument values by their declared types. Errors identify the offending
/// field and the raw value.
pub fn bind(view: SchemaView<'_>, raw: &RawMatches) -> Result<BoundCommand, ParseError> {
    let positionals = raw.positionals();

    for arg in view.args {
        if arg.required && arg.index > positionals.len() {
            return Err(ParseError::MissingArgument(arg.name.clone()));
        }
    }

    let mut bound = BoundCommand::default();

    for option in view.options {
        let Some(value) = raw.value_of(option) else {
            continue;
        };
        let key = option.canonical_name().to_string();
        if option.takes_value {
            let raw_value = value
                .as_deref()
                .ok_or_else(|| ParseError::MissingOptionValue(key.clone()))?;
            let field = FieldRef::option(&key);
            bound
                .options
                .insert(key, coerce(&option.value_type, raw_value, &field)?);
        } else {
            bound.options.insert(key, Value::Bool(true));
        }
    }

    for arg in view.args {
        if arg.index <= positionals.len() {
            let field = FieldRef::argument(&arg.name);
            let value = coerce(&arg.value_type, &positionals[arg.index - 1], &field)?;
            bound.args.insert(arg.name.clone(), value);
        }
    }

    if view.trailing.is_some() {
        bound.trailing = Some(positionals.to_vec());
    }

    Ok(bound)
}

/// Result of parsing one input vector against a command set.
#[derive(Debug)]
pub struct ParsedInput {
    /// The resolved command, or `None` for root-level input.
    pub command: Option<Arc<CompiledCommand>>,
    /// The bound values.
    pub values: BoundCommand,
}

/// Resolves and binds one input vector: the single-shot parsing entry
/// point, also usable outside any shell.
///
/// When a command resolves, its name words are stripped and the rest is
/// parsed against the command's effective schema; otherwise the whole input
/// is parsed against the set's root-level schema.
///
/// # Examples
///
/// ```
/// use command_shell_core::{AppSchema, ArgumentSpec, OptionSpec, ValueType, compile};
/// use command_shell_engine::{GnuTokenParser, parse_tokens};
///
/// let app = AppSchema::new("dummy", "0")
///     .with_option(OptionSpec::flag(Some("k1"), Some("key1")))
///     .with_arg(ArgumentSpec::required(1, "infile", ValueType::String));
/// let mut set = compile(&[app]).unwrap();
///
/// let tokens: Vec<String> = ["-k1", "in.txt"].iter().map(|s| s.to_string()).collect();
/// let parsed = parse_tokens(&mut set, &tokens, &GnuTokenParser).unwrap();
///
/// assert!(parsed.command.is_none());
/// assert!(parsed.values.flag("k1"));
/// assert_eq!(parsed.values.arg_str("infile"), Some("in.txt"));
/// ```
pub fn parse_tokens(
    set: &mut CommandSet,
    tokens: &[String],
    parser: &dyn OptionParser,
) -> Result<ParsedInput, ParseError> {
    match set.resolve(tokens) {
        Some(command) => {
            let raw = parser.parse(command.options(), command.residual(tokens))?;
            let values = bind(command.view(), &raw)?;
            Ok(ParsedInput {
                command: Some(command),
                values,
            })
        }
        None => {
            let raw = parser.parse(set.root_options(), tokens)?;
            let values = bind(set.root_view(), &raw)?;
            Ok(ParsedInput {
                command: None,
                values,
            })
        }
    }
}
