//! Core schema model and resolution primitives for declarative shells.
//!
//! This crate defines the foundational types for describing a command-line
//! surface and resolving user input against it:
//!
//! - [`AppSchema`], [`CommandSpec`], [`OptionSpec`], [`ArgumentSpec`] — the
//!   declarative schema built by the application (structs + registration
//!   calls; no reflection involved).
//! - [`compile`] — validates the schema and produces an immutable
//!   [`CommandSet`] of [`CompiledCommand`]s with qualified name words and
//!   effective (layered) option sets.
//! - [`CommandSet::resolve`] — longest-prefix command resolution with
//!   deterministic tie-breaking.
//! - [`coerce`] — typed coercion of raw tokens into [`Value`]s.
//!
//! Validation errors ([`SchemaError`]) are configuration-time failures;
//! user-input failures are [`ParseError`]s and always recoverable.
//!
//! # Example
//!
//! ```
//! use command_shell_core::*;
//!
//! let app = AppSchema::new("dummy", "0")
//!     .with_command(
//!         CommandSpec::new("create", "create a new dummy")
//!             .with_option(OptionSpec::flag(Some("k2"), Some("key2")))
//!             .with_arg(ArgumentSpec::required(1, "filename", ValueType::String))
//!             .with_handler("dummy.create"),
//!     );
//!
//! let mut set = compile(&[app]).unwrap();
//! let input: Vec<String> = ["dummy", "create", "-k2", "file.txt"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let cmd = set.resolve(&input).unwrap();
//! assert_eq!(cmd.name(), "dummy create");
//! assert_eq!(cmd.residual(&input), ["-k2".to_string(), "file.txt".to_string()]);
//! ```

mod compile;
mod resolve;
mod types;
mod validate;
mod value;

pub use compile::{CommandSet, CompiledCommand, SchemaView, compile, merge_options};
pub use types::{AppSchema, ArgumentSpec, CommandSpec, OptionSpec, Value, ValueType};
pub use validate::{SchemaError, validate_args, validate_command_name, validate_options};
pub use value::{FieldRef, ParseError, coerce};
