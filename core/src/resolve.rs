//! Longest-prefix command resolution.
//!
//! Commands are kept sorted by descending word count of their qualified
//! names, so the first command whose name words are a case-insensitive
//! prefix of the input is the longest match. The sort is stable, which
//! makes the tie-break among same-length names the insertion order. A
//! dirty flag defers re-sorting until the next resolution after a mutation,
//! since namespace switching can replace the whole set between inputs.

use std::sync::Arc;

use crate::compile::{CommandSet, CompiledCommand};

impl CommandSet {
    /// Appends a command. Marks the set dirty.
    pub fn push(&mut self, command: Arc<CompiledCommand>) {
        self.commands.push(command);
        self.sorted = false;
    }

    /// Appends every command of `other`. Marks the set dirty.
    pub fn extend_from(&mut self, other: &CommandSet) {
        self.commands.extend(other.commands.iter().cloned());
        self.sorted = false;
    }

    /// Replaces the command list, keeping the root-level schema. Marks the
    /// set dirty.
    pub fn set_commands(&mut self, commands: Vec<Arc<CompiledCommand>>) {
        self.commands = commands;
        self.sorted = false;
    }

    /// Removes every command, keeping the root-level schema.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
        self.sorted = false;
    }

    /// Resolves the longest command whose name words prefix the input
    /// tokens, word for word and case-insensitively.
    ///
    /// Returns `None` when nothing matches; the caller then treats the
    /// whole input as root-level (un-commanded) parsing.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_shell_core::{AppSchema, CommandSpec, compile};
    ///
    /// let app = AppSchema::new("", "0")
    ///     .with_command(CommandSpec::new("create", "create"))
    ///     .with_command(CommandSpec::new("create db", "create a db"));
    /// let mut set = compile(&[app]).unwrap();
    ///
    /// let tokens: Vec<String> = ["create", "db", "x"].iter().map(|s| s.to_string()).collect();
    /// let cmd = set.resolve(&tokens).unwrap();
    /// assert_eq!(cmd.name(), "create db");
    /// assert_eq!(cmd.residual(&tokens), ["x".to_string()]);
    /// ```
    pub fn resolve(&mut self, tokens: &[String]) -> Option<Arc<CompiledCommand>> {
        if !self.sorted {
            self.commands
                .sort_by_key(|c| std::cmp::Reverse(c.word_count()));
            self.sorted = true;
        }

        self.commands
            .iter()
            .find(|c| starts_with(tokens, c.words()))
            .cloned()
    }
}

impl CompiledCommand {
    /// The input tokens left after stripping this command's name words.
    pub fn residual<'a>(&self, tokens: &'a [String]) -> &'a [String] {
        &tokens[self.word_count().min(tokens.len())..]
    }
}

/// Checks that `tokens` starts with `words`, case-insensitively, word for
/// word.
fn starts_with(tokens: &[String], words: &[String]) -> bool {
    if words.is_empty() || words.len() > tokens.len() {
        return false;
    }
    words
        .iter()
        .zip(tokens)
        .all(|(w, t)| w.eq_ignore_ascii_case(t))
}
