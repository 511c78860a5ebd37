//! Built-in shell commands: `help`, `exit`, and the namespace commands
//! `ls` and `cd`.

use std::rc::Rc;

use command_shell_core::{AppSchema, ArgumentSpec, CommandSpec, ParseError, ValueType};

use crate::binder::BoundCommand;
use crate::error::HandlerError;
use crate::shell::handler::{CommandHandler, HandlerRegistry};
use crate::shell::{ShellContext, help};
use crate::tree::TreeNode;

pub(crate) const HELP_HANDLER: &str = "shell.help";
pub(crate) const EXIT_HANDLER: &str = "shell.exit";
pub(crate) const LS_HANDLER: &str = "shell.ls";
pub(crate) const CD_HANDLER: &str = "shell.cd";

/// Schema of the always-available console commands.
pub(crate) fn console_app() -> AppSchema {
    AppSchema::new("", "0")
        .with_command(CommandSpec::new("exit", "exit from the shell").with_handler(EXIT_HANDLER))
        .with_command(
            CommandSpec::new("help", "print this help or help for <command>")
                .with_arg(ArgumentSpec::optional(1, "command", ValueType::String))
                .with_handler(HELP_HANDLER),
        )
}

/// Schema of the namespace commands, added when a tree model is attached.
pub(crate) fn tree_app() -> AppSchema {
    AppSchema::new("", "0")
        .with_command(
            CommandSpec::new(
                "ls",
                "list information about the FILEs (the current directory by default)",
            )
            .with_trailing("[FILE]...")
            .with_handler(LS_HANDLER),
        )
        .with_command(
            CommandSpec::new("cd", "change the shell working directory")
                .with_arg(ArgumentSpec::required(1, "dir", ValueType::String))
                .with_handler(CD_HANDLER),
        )
}

pub(crate) fn register_builtins(registry: &mut HandlerRegistry, with_tree: bool) {
    registry.register(EXIT_HANDLER, Rc::new(ExitHandler));
    registry.register(HELP_HANDLER, Rc::new(HelpHandler));
    if with_tree {
        registry.register(LS_HANDLER, Rc::new(LsHandler));
        registry.register(CD_HANDLER, Rc::new(CdHandler));
    }
}

/// Raises the shell's termination signal.
struct ExitHandler;

impl CommandHandler for ExitHandler {
    fn process(
        &self,
        _values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        ctx.request_exit();
        Ok(())
    }
}

/// Prints the command overview, or detailed help for one command.
struct HelpHandler;

impl CommandHandler for HelpHandler {
    fn process(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        match values.arg_str("command") {
            None => {
                let msg = help::render_set(ctx.commands());
                ctx.append_line(&msg);
            }
            Some(name) => {
                let word = name.to_lowercase();
                let matches: Vec<_> = ctx
                    .commands()
                    .commands()
                    .iter()
                    .filter(|c| {
                        c.name().eq_ignore_ascii_case(name) || c.words().first() == Some(&word)
                    })
                    .cloned()
                    .collect();

                if matches.is_empty() {
                    ctx.append_line(&format!("help: no such command '{name}'"));
                } else {
                    for command in matches {
                        let msg = help::render_command(&command);
                        ctx.append_line(&msg);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Lists namespace folders.
struct LsHandler;

impl CommandHandler for LsHandler {
    fn validate(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), ParseError> {
        let Some(tree) = ctx.tree() else {
            return Err(ParseError::invalid("ls: no namespace attached"));
        };
        for file in values.trailing().unwrap_or_default() {
            if !tree.exists(file) {
                return Err(ParseError::invalid(format!(
                    "ls: cannot access {file}: No such file or directory"
                )));
            }
        }
        Ok(())
    }

    fn process(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        let files: Vec<String> = values.trailing().unwrap_or_default().to_vec();

        let listings: Vec<(String, Vec<String>)> = {
            let tree = ctx
                .tree()
                .ok_or_else(|| HandlerError::failed("ls: no namespace attached"))?;
            if files.len() > 1 {
                files
                    .iter()
                    .map(|f| (f.clone(), labels(tree.list(f))))
                    .collect()
            } else {
                let path = files.first().map(String::as_str).unwrap_or("./");
                vec![(String::new(), labels(tree.list(path)))]
            }
        };

        let headed = listings.len() > 1;
        for (name, entries) in listings {
            if headed {
                ctx.append_line(&format!("{name}:"));
            }
            for label in entries {
                ctx.append(&format!(" {label}"));
            }
            ctx.append_line("");
        }
        Ok(())
    }
}

/// Changes the namespace's current folder.
struct CdHandler;

impl CommandHandler for CdHandler {
    fn validate(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), ParseError> {
        let Some(dir) = values.arg_str("dir") else {
            return Err(ParseError::MissingArgument("dir".to_string()));
        };
        let Some(tree) = ctx.tree() else {
            return Err(ParseError::invalid("cd: no namespace attached"));
        };
        if !tree.is_folder(dir) {
            return Err(ParseError::invalid(format!("cd: {dir}: No such directory")));
        }
        Ok(())
    }

    fn process(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        let dir = values
            .arg_str("dir")
            .ok_or_else(|| HandlerError::failed("cd: missing directory"))?
            .to_string();
        let tree = ctx
            .tree_mut()
            .ok_or_else(|| HandlerError::failed("cd: no namespace attached"))?;
        tree.set_current(&dir);
        Ok(())
    }
}

fn labels(nodes: Vec<TreeNode>) -> Vec<String> {
    nodes.into_iter().map(|n| n.label().to_string()).collect()
}
