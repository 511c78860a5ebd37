//! Schema type definitions for command-line structure modeling.
//!
//! This module defines the declarative data model consumed by the shell
//! engine: applications, commands, options, positional arguments, and the
//! typed values they bind to. The types are designed for serialization with
//! [`serde`] so schemas can also be loaded from JSON or other declarative
//! sources.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value type for options and positional arguments.
///
/// Describes what kind of value a field accepts and therefore how a raw
/// token is coerced during binding.
///
/// # Examples
///
/// ```
/// use command_shell_core::ValueType;
///
/// let vt = ValueType::default();
/// assert_eq!(vt, ValueType::String);
///
/// let mode = ValueType::Choice(vec!["fast".into(), "safe".into()]);
/// assert!(matches!(mode, ValueType::Choice(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueType {
    /// String value, passed through unmodified (the default).
    #[default]
    String,
    /// Base-10 integer value.
    Int,
    /// Base-10 floating-point value.
    Float,
    /// Boolean value (`true`/`1` and `false`/`0`, case-insensitive).
    Bool,
    /// One of a fixed symbol set, matched case-insensitively.
    Choice(Vec<String>),
}

/// A typed value produced by the binder.
///
/// # Examples
///
/// ```
/// use command_shell_core::Value;
///
/// let v = Value::Int(42);
/// assert_eq!(v.as_int(), Some(42));
/// assert_eq!(v.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// String value.
    String(String),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Matched symbol of a `Choice` type (stored as declared, not as typed).
    Choice(String),
    /// Raw token list bound to a variadic trailing field.
    List(Vec<String>),
}

impl Value {
    /// Returns the string content, for `String` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, for `Int` values.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float content, for `Float` values.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean content, for `Bool` values.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the matched symbol, for `Choice` values.
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Value::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the token list, for `List` values.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Choice(s) => write!(f, "{s}"),
            Value::List(items) => write!(f, "{}", items.join(" ")),
        }
    }
}

/// Schema for a command option (flag).
///
/// An option has a short form (single-dash, possibly multi-character, e.g.
/// `-kv1`) and/or a long form (double-dash, e.g. `--key-value`), a
/// takes-value flag, and a value type used for coercion.
///
/// Use [`flag`](OptionSpec::flag) for valueless boolean options and
/// [`with_value`](OptionSpec::with_value) for options that consume a value,
/// then chain [`with_description`](OptionSpec::with_description).
///
/// # Examples
///
/// ```
/// use command_shell_core::{OptionSpec, ValueType};
///
/// let verbose = OptionSpec::flag(Some("v"), Some("verbose"))
///     .with_description("enable verbose output");
/// assert!(!verbose.takes_value);
/// assert!(verbose.matches("v"));
///
/// let key = OptionSpec::with_value(Some("kv1"), Some("keyValue1"), ValueType::String);
/// assert!(key.takes_value);
/// assert_eq!(key.canonical_name(), "kv1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Short name, written with a single dash on the command line.
    pub short: Option<String>,
    /// Long name, written with a double dash on the command line.
    pub long: Option<String>,
    /// Whether the option consumes a value.
    pub takes_value: bool,
    /// Type of the consumed value (`Bool` for valueless options).
    pub value_type: ValueType,
    /// Description shown in help output.
    pub description: Option<String>,
}

impl OptionSpec {
    /// Creates a valueless boolean option.
    pub fn flag(short: Option<&str>, long: Option<&str>) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            takes_value: false,
            value_type: ValueType::Bool,
            description: None,
        }
    }

    /// Creates an option that consumes a value of the given type.
    pub fn with_value(short: Option<&str>, long: Option<&str>, value_type: ValueType) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            takes_value: true,
            value_type,
            description: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Returns the canonical name (short form preferred, falls back to long).
    ///
    /// Bound values are keyed by this name.
    pub fn canonical_name(&self) -> &str {
        self.short
            .as_deref()
            .or(self.long.as_deref())
            .unwrap_or_default()
    }

    /// Checks whether the given dashless name is this option's short or
    /// long form.
    pub fn matches(&self, name: &str) -> bool {
        self.short.as_deref() == Some(name) || self.long.as_deref() == Some(name)
    }

    /// Checks whether this option names any of the same forms as `other`.
    pub fn shadows(&self, other: &OptionSpec) -> bool {
        (self.short.is_some() && self.short == other.short)
            || (self.long.is_some() && self.long == other.long)
    }
}

/// Schema for an enumerated positional argument.
///
/// Positional arguments are identified by their 1-based ordinal position in
/// the non-option token residual.
///
/// # Examples
///
/// ```
/// use command_shell_core::{ArgumentSpec, ValueType};
///
/// let infile = ArgumentSpec::required(1, "infile", ValueType::String);
/// assert!(infile.required);
///
/// let outfile = ArgumentSpec::optional(2, "outfile", ValueType::String);
/// assert!(!outfile.required);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// 1-based position in the positional token residual.
    pub index: usize,
    /// Label used in help output and error messages.
    pub name: String,
    /// Whether the argument must be supplied.
    pub required: bool,
    /// Type of the expected value.
    pub value_type: ValueType,
}

impl ArgumentSpec {
    /// Creates a required positional argument.
    pub fn required(index: usize, name: &str, value_type: ValueType) -> Self {
        Self {
            index,
            name: name.to_string(),
            required: true,
            value_type,
        }
    }

    /// Creates an optional positional argument.
    pub fn optional(index: usize, name: &str, value_type: ValueType) -> Self {
        Self {
            index,
            name: name.to_string(),
            required: false,
            value_type,
        }
    }
}

/// Schema for a dispatchable command.
///
/// A command has a (possibly multi-word) name, its own options and
/// positional arguments, an optional variadic trailing field, and an ordered
/// list of opaque handler identifiers resolved by the shell at dispatch.
///
/// # Examples
///
/// ```
/// use command_shell_core::{CommandSpec, OptionSpec, ArgumentSpec, ValueType};
///
/// let create = CommandSpec::new("create db", "create a new database")
///     .with_option(OptionSpec::flag(Some("f"), Some("force")))
///     .with_arg(ArgumentSpec::required(1, "name", ValueType::String))
///     .with_handler("db.create");
///
/// assert_eq!(create.name, "create db");
/// assert_eq!(create.handlers, vec!["db.create".to_string()]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Whitespace-separated command words. An empty name declares the
    /// application's default command, dispatched by the bare app name.
    pub name: String,
    /// Short description shown in help output.
    pub description: String,
    /// Options specific to this command. Shadow app-level options of the
    /// same name.
    pub options: Vec<OptionSpec>,
    /// Enumerated positional arguments.
    pub args: Vec<ArgumentSpec>,
    /// Syntax label of the variadic trailing field, when one is declared
    /// (e.g. `"[FILE]..."`). The field receives the full positional residual.
    pub trailing: Option<String>,
    /// Handler identifiers, invoked in declaration order.
    pub handlers: Vec<String>,
}

impl CommandSpec {
    /// Creates a new command schema with the given name and description.
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    /// Adds an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a positional argument.
    pub fn with_arg(mut self, arg: ArgumentSpec) -> Self {
        self.args.push(arg);
        self
    }

    /// Declares a variadic trailing field with the given syntax label.
    pub fn with_trailing(mut self, syntax: &str) -> Self {
        self.trailing = Some(syntax.to_string());
        self
    }

    /// Appends a handler identifier.
    pub fn with_handler(mut self, id: &str) -> Self {
        self.handlers.push(id.to_string());
        self
    }
}

/// Declarative schema of one application contributed to a shell.
///
/// The application name qualifies its command names (`dummy` + `create` is
/// dispatched as `dummy create`). An empty name makes the commands
/// *embedded*: available under their bare names, like the shell built-ins.
///
/// App-level options apply to every command of the application and are
/// shadowed by command-level options of the same name.
///
/// # Examples
///
/// ```
/// use command_shell_core::{AppSchema, CommandSpec, OptionSpec};
///
/// let app = AppSchema::new("dummy", "0")
///     .with_option(OptionSpec::flag(Some("h"), Some("help")))
///     .with_command(CommandSpec::new("create", "create a dummy"));
///
/// assert_eq!(app.commands.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSchema {
    /// Application name. Empty for embedded command sets.
    pub name: String,
    /// Application version string.
    pub version: String,
    /// Options shared by every command, and used for root-level parsing.
    pub options: Vec<OptionSpec>,
    /// Root-level positional arguments (un-commanded parsing).
    pub args: Vec<ArgumentSpec>,
    /// Root-level variadic trailing field syntax.
    pub trailing: Option<String>,
    /// The application's commands.
    pub commands: Vec<CommandSpec>,
}

impl AppSchema {
    /// Creates a new application schema.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            ..Default::default()
        }
    }

    /// Adds an app-level option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a root-level positional argument.
    pub fn with_arg(mut self, arg: ArgumentSpec) -> Self {
        self.args.push(arg);
        self
    }

    /// Declares a root-level variadic trailing field.
    pub fn with_trailing(mut self, syntax: &str) -> Self {
        self.trailing = Some(syntax.to_string());
        self
    }

    /// Adds a command.
    pub fn with_command(mut self, command: CommandSpec) -> Self {
        self.commands.push(command);
        self
    }
}
