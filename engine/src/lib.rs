//! Tokenizer, value binder, and interactive shell engine for declarative
//! command schemas.
//!
//! This crate turns the schema model of [`command_shell_core`] into a
//! running shell:
//!
//! - [`Tokenizer`] — quote- and escape-aware splitting of one input line,
//!   with incomplete-input detection for multi-line continuation.
//! - [`OptionParser`] / [`GnuTokenParser`] — the opaque GNU-style flag
//!   parsing delegate.
//! - [`bind`] / [`parse_tokens`] — typed value binding with fail-fast
//!   required-argument gating.
//! - [`Shell`] — the read-eval loop: greeting, prompt, namespace-aware
//!   dispatch, listener notification, help and error rendering.
//! - [`TreeModel`] — the traversable namespace overlay mounting command
//!   sets at virtual directory paths.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use command_shell_core::{AppSchema, ArgumentSpec, CommandSpec, ValueType};
//! use command_shell_engine::{
//!     BoundCommand, CommandHandler, HandlerError, MemorySink, Shell, ShellContext,
//! };
//!
//! struct Greet;
//!
//! impl CommandHandler for Greet {
//!     fn process(
//!         &self,
//!         values: &BoundCommand,
//!         ctx: &mut ShellContext<'_>,
//!     ) -> Result<(), HandlerError> {
//!         let name = values.arg_str("name").unwrap_or("world");
//!         ctx.append_line(&format!("hello, {name}"));
//!         Ok(())
//!     }
//! }
//!
//! let app = AppSchema::new("", "0").with_command(
//!     CommandSpec::new("greet", "print a greeting")
//!         .with_arg(ArgumentSpec::optional(1, "name", ValueType::String))
//!         .with_handler("demo.greet"),
//! );
//!
//! let sink = MemorySink::new();
//! let buffer = sink.buffer();
//! let mut shell = Shell::builder()
//!     .with_app(app)
//!     .with_handler("demo.greet", Rc::new(Greet))
//!     .with_output(Box::new(sink))
//!     .build()
//!     .unwrap();
//!
//! shell.run_once(&["greet".to_string(), "rust".to_string()]);
//! assert_eq!(*buffer.borrow(), "hello, rust\n");
//! ```

mod binder;
mod error;
mod io;
mod optparse;
mod shell;
mod tokenizer;
mod tree;

pub use binder::{BoundCommand, ParsedInput, bind, parse_tokens};
pub use error::HandlerError;
pub use io::{InputSource, MemorySink, OutputSink, ScriptedInput, StdinInput, StdoutSink};
pub use optparse::{GnuTokenParser, OptionParser, RawMatches};
pub use shell::handler::{
    CommandHandler, HandlerEvent, HandlerListener, HandlerRegistry, ListenerId, ListenerSet,
};
pub use shell::help::{render_command, render_set};
pub use shell::messages::{DefaultMessages, Messages};
pub use shell::{Shell, ShellBuilder, ShellContext};
pub use tokenizer::{Tokenizer, Unescaping, smart_split};
pub use tree::{MapTreeModel, TreeModel, TreeNode};
