//! Help rendering from schema data.
//!
//! Renders usage lines, command lists, and option tables from the compiled
//! schema — nothing here inspects handlers or shell state.

use std::fmt::Write;

use command_shell_core::{CommandSet, CompiledCommand, OptionSpec};

const NAME_PAD: usize = 18;

/// Renders the overview help for a command set: usage line, header,
/// command list, and root options.
pub fn render_set(set: &CommandSet) -> String {
    let mut out = String::new();

    let names: Vec<&str> = set.commands().iter().map(|c| c.name()).collect();
    let mut usage = format!("usage: {}", names.join("|"));
    if !set.root_options().is_empty() {
        usage.push_str(" [options]");
    }
    let root_syntax = set.root_syntax();
    if !root_syntax.is_empty() {
        usage.push(' ');
        usage.push_str(&root_syntax);
    }
    out.push_str(&usage);
    out.push('\n');

    out.push_str(
        "These shell commands are defined internally. Type `help' to see this list.\n\
         Type `help <name>' to find out more about the command `<name>'.\n",
    );

    for command in set.commands() {
        let _ = writeln!(
            out,
            "  {:<NAME_PAD$} {}",
            command.name(),
            command.arg_syntax()
        );
    }

    if !set.root_options().is_empty() {
        out.push_str("\noptions:\n");
        out.push_str(&render_options(set.root_options()));
    }

    out.trim_end().to_string()
}

/// Renders the detailed help for one command: usage, description,
/// and options.
pub fn render_command(command: &CompiledCommand) -> String {
    let mut out = String::new();

    let mut usage = format!("usage: {}", command.name());
    if !command.options().is_empty() {
        usage.push_str(" [options]");
    }
    let syntax = command.arg_syntax();
    if !syntax.is_empty() {
        usage.push(' ');
        usage.push_str(&syntax);
    }
    out.push_str(&usage);
    out.push('\n');

    let _ = writeln!(out, "{}: {}", command.name(), command.description());

    if !command.options().is_empty() {
        out.push_str("\noptions:\n");
        out.push_str(&render_options(command.options()));
    }

    out.trim_end().to_string()
}

fn render_options(options: &[OptionSpec]) -> String {
    let mut out = String::new();
    for option in options {
        let names = match (&option.short, &option.long) {
            (Some(short), Some(long)) => format!("-{short}, --{long}"),
            (Some(short), None) => format!("-{short}"),
            (None, Some(long)) => format!("--{long}"),
            (None, None) => String::new(),
        };
        let names = if option.takes_value {
            format!("{names} <value>")
        } else {
            names
        };
        let _ = writeln!(
            out,
            "  {:<NAME_PAD$} {}",
            names,
            option.description.as_deref().unwrap_or_default()
        );
    }
    out
}
