//! Message formatting for shell output.
//!
//! Every user-facing message class the engine emits goes through the
//! [`Messages`] trait, so embedders can restyle greeting, info, error, and
//! help text without touching dispatch logic.

use command_shell_core::{CommandSet, CompiledCommand, ParseError};

use crate::error::HandlerError;
use crate::shell::help;

/// Formatter of the shell's outgoing messages.
pub trait Messages {
    /// Greeting printed when the interactive loop starts.
    fn greeting(&self, set: &CommandSet) -> String;

    /// Info message for input that resolved to no command.
    fn no_command(&self, first: &str) -> String;

    /// Error message for a handler failure.
    fn command_failed(&self, command: &str, error: &HandlerError) -> String;

    /// Help text, optionally scoped to a command and prefixed with the
    /// parse error that triggered it.
    fn help(
        &self,
        set: &CommandSet,
        command: Option<&CompiledCommand>,
        error: Option<&ParseError>,
    ) -> String;
}

/// Default message formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl Messages for DefaultMessages {
    fn greeting(&self, _set: &CommandSet) -> String {
        "Welcome to the command shell.\n\nPlease type 'help' to see all commands.".to_string()
    }

    fn no_command(&self, first: &str) -> String {
        format!("No appropriate command has been found for '{first}'")
    }

    fn command_failed(&self, command: &str, error: &HandlerError) -> String {
        format!(
            "{command}: command failed. error: {error}; type: {}",
            error.kind()
        )
    }

    fn help(
        &self,
        set: &CommandSet,
        command: Option<&CompiledCommand>,
        error: Option<&ParseError>,
    ) -> String {
        let mut out = String::new();
        if let Some(error) = error {
            out.push_str(&error.to_string());
            out.push('\n');
        }
        match command {
            Some(command) => out.push_str(&help::render_command(command)),
            None => out.push_str(&help::render_set(set)),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_shell_core::{AppSchema, CommandSpec, compile};

    #[test]
    fn test_no_command_message() {
        assert_eq!(
            DefaultMessages.no_command("frob"),
            "No appropriate command has been found for 'frob'"
        );
    }

    #[test]
    fn test_command_failed_names_kind() {
        let msg = DefaultMessages.command_failed("create", &HandlerError::failed("disk full"));
        assert_eq!(msg, "create: command failed. error: disk full; type: failure");
    }

    #[test]
    fn test_help_prefixes_error() {
        let app = AppSchema::new("", "0").with_command(CommandSpec::new("go", "go somewhere"));
        let set = compile(&[app]).unwrap();

        let msg = DefaultMessages.help(
            &set,
            Some(set.commands()[0].as_ref()),
            Some(&ParseError::MissingArgument("dir".into())),
        );
        assert!(msg.starts_with("argument 'dir' is not specified\n"));
        assert!(msg.contains("usage: go"));
    }
}
