//! Schema compilation and layered option merging.
//!
//! Compilation turns declarative [`AppSchema`]s into an immutable, resolved
//! form: every command gets its qualified name words (application name plus
//! command name, lower-cased) and its *effective* option set, computed here
//! as an explicit merge of app-level and command-level options rather than
//! at lookup time. Command-level options shadow app-level options of the
//! same name.

use std::sync::Arc;

use crate::validate::{validate_args, validate_command_name, validate_options};
use crate::{AppSchema, ArgumentSpec, OptionSpec, SchemaError};

/// A command compiled into its resolved form.
///
/// Owned by a [`CommandSet`] and shared by reference; never copied per
/// input. Immutable once built.
#[derive(Debug)]
pub struct CompiledCommand {
    words: Vec<String>,
    name: String,
    description: String,
    options: Vec<OptionSpec>,
    args: Vec<ArgumentSpec>,
    trailing: Option<String>,
    handlers: Vec<String>,
}

impl CompiledCommand {
    /// Lower-cased qualified name words used for resolution.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of name words this command consumes from the input.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Qualified display name (name words joined by spaces).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Command description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Effective option set (app-level merged with command-level).
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Enumerated positional arguments, sorted by index.
    pub fn args(&self) -> &[ArgumentSpec] {
        &self.args
    }

    /// Variadic trailing field syntax, when declared.
    pub fn trailing(&self) -> Option<&str> {
        self.trailing.as_deref()
    }

    /// Handler identifiers in declaration order.
    pub fn handlers(&self) -> &[String] {
        &self.handlers
    }

    /// Schema view used by the binder.
    pub fn view(&self) -> SchemaView<'_> {
        SchemaView {
            options: &self.options,
            args: &self.args,
            trailing: self.trailing.as_deref(),
        }
    }

    /// Argument syntax for help output: the declared trailing syntax, or a
    /// string generated from the enumerated arguments (`name` for required,
    /// `[name]` for optional).
    pub fn arg_syntax(&self) -> String {
        match &self.trailing {
            Some(syntax) => syntax.clone(),
            None => enumerated_syntax(&self.args),
        }
    }
}

/// A flat view of the bindable parts of a schema: the effective options,
/// the enumerated arguments, and the trailing field. Produced for either a
/// compiled command or a command set's root level.
#[derive(Debug, Clone, Copy)]
pub struct SchemaView<'a> {
    /// Effective option set.
    pub options: &'a [OptionSpec],
    /// Enumerated positional arguments, sorted by index.
    pub args: &'a [ArgumentSpec],
    /// Variadic trailing field syntax, when declared.
    pub trailing: Option<&'a str>,
}

/// An ordered, resolvable collection of compiled commands plus the
/// root-level schema used for un-commanded parsing.
///
/// Cloning is cheap: commands are shared through [`Arc`]. The set tracks a
/// dirty flag so the resolver only re-sorts after a mutation (see
/// [`resolve`](CommandSet::resolve)).
#[derive(Debug, Clone, Default)]
pub struct CommandSet {
    pub(crate) commands: Vec<Arc<CompiledCommand>>,
    pub(crate) sorted: bool,
    root_options: Vec<OptionSpec>,
    root_args: Vec<ArgumentSpec>,
    root_trailing: Option<String>,
}

impl CommandSet {
    /// The compiled commands, in current (possibly unsorted) order.
    pub fn commands(&self) -> &[Arc<CompiledCommand>] {
        &self.commands
    }

    /// Root-level options.
    pub fn root_options(&self) -> &[OptionSpec] {
        &self.root_options
    }

    /// Root-level positional arguments.
    pub fn root_args(&self) -> &[ArgumentSpec] {
        &self.root_args
    }

    /// Root-level trailing syntax.
    pub fn root_trailing(&self) -> Option<&str> {
        self.root_trailing.as_deref()
    }

    /// Schema view of the root level, used for un-commanded parsing.
    pub fn root_view(&self) -> SchemaView<'_> {
        SchemaView {
            options: &self.root_options,
            args: &self.root_args,
            trailing: self.root_trailing.as_deref(),
        }
    }

    /// Root-level argument syntax for help output.
    pub fn root_syntax(&self) -> String {
        match &self.root_trailing {
            Some(syntax) => syntax.clone(),
            None => enumerated_syntax(&self.root_args),
        }
    }
}

/// Compiles application schemas into a [`CommandSet`].
///
/// Validates every name and scope along the way, merges app-level options
/// into each command, qualifies command names with the application name,
/// and sorts argument specs by index. An empty command name declares the
/// application's *default command*, dispatched by the bare app name; a
/// default command in an unnamed application is an error.
///
/// # Examples
///
/// ```
/// use command_shell_core::{AppSchema, CommandSpec, OptionSpec, compile};
///
/// let app = AppSchema::new("dummy", "0")
///     .with_option(OptionSpec::flag(Some("h"), Some("help")))
///     .with_command(CommandSpec::new("create", "create a dummy"));
///
/// let set = compile(&[app]).unwrap();
/// assert_eq!(set.commands().len(), 1);
/// assert_eq!(set.commands()[0].words(), ["dummy", "create"]);
/// // the app-level option is merged into the command
/// assert_eq!(set.commands()[0].options().len(), 1);
/// ```
pub fn compile(apps: &[AppSchema]) -> Result<CommandSet, SchemaError> {
    let mut set = CommandSet::default();

    for app in apps {
        validate_options(&app.options)?;
        validate_args("<root>", &app.args)?;

        let app_words = name_words(&app.name);

        for command in &app.commands {
            let cmd_name = command.name.trim();
            if cmd_name.is_empty() {
                if app_words.is_empty() {
                    return Err(SchemaError::EmbeddedDefaultCommand);
                }
            } else {
                validate_command_name(cmd_name)?;
            }
            validate_options(&command.options)?;

            let mut words = app_words.clone();
            words.extend(name_words(cmd_name));
            let qualified = words.join(" ");

            let mut args = command.args.clone();
            args.sort_by_key(|a| a.index);
            validate_args(&qualified, &args)?;

            set.commands.push(Arc::new(CompiledCommand {
                words,
                name: qualified,
                description: command.description.clone(),
                options: merge_options(&app.options, &command.options),
                args,
                trailing: command.trailing.clone(),
                handlers: command.handlers.clone(),
            }));
        }

        set.root_options = merge_options(&set.root_options, &app.options);
        set.root_args.extend(app.args.iter().cloned());
        set.root_args.sort_by_key(|a| a.index);
        if app.trailing.is_some() {
            set.root_trailing = app.trailing.clone();
        }
    }

    set.sorted = false;
    Ok(set)
}

/// Merges two option scopes: overlay options shadow base options sharing a
/// short or long name; everything else is kept, base first.
pub fn merge_options(base: &[OptionSpec], overlay: &[OptionSpec]) -> Vec<OptionSpec> {
    let mut merged: Vec<OptionSpec> = base
        .iter()
        .filter(|b| !overlay.iter().any(|o| o.shadows(b)))
        .cloned()
        .collect();
    merged.extend(overlay.iter().cloned());
    merged
}

fn name_words(name: &str) -> Vec<String> {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect()
}

fn enumerated_syntax(args: &[ArgumentSpec]) -> String {
    let mut out = String::new();
    for arg in args {
        if arg.required {
            out.push_str(&arg.name);
        } else {
            out.push('[');
            out.push_str(&arg.name);
            out.push(']');
        }
        out.push(' ');
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArgumentSpec, CommandSpec, ValueType};

    fn dummy_app() -> AppSchema {
        AppSchema::new("dummy", "0")
            .with_option(OptionSpec::flag(Some("eof"), Some("exitOnFinish")))
            .with_command(
                CommandSpec::new("create", "create a new dummy")
                    .with_option(OptionSpec::flag(Some("k2"), Some("key2")))
                    .with_arg(ArgumentSpec::required(1, "filename", ValueType::String)),
            )
    }

    #[test]
    fn test_compile_qualifies_command_words() {
        let set = compile(&[dummy_app()]).unwrap();
        assert_eq!(set.commands()[0].words(), ["dummy", "create"]);
        assert_eq!(set.commands()[0].name(), "dummy create");
    }

    #[test]
    fn test_compile_merges_app_options_into_commands() {
        let set = compile(&[dummy_app()]).unwrap();
        let options = set.commands()[0].options();
        assert_eq!(options.len(), 2);
        assert!(options.iter().any(|o| o.matches("eof")));
        assert!(options.iter().any(|o| o.matches("k2")));
    }

    #[test]
    fn test_command_option_shadows_app_option() {
        let app = AppSchema::new("app", "0")
            .with_option(OptionSpec::flag(Some("k"), Some("key")))
            .with_command(
                CommandSpec::new("go", "go")
                    .with_option(OptionSpec::with_value(Some("k"), None, ValueType::Int)),
            );

        let set = compile(&[app]).unwrap();
        let options = set.commands()[0].options();
        assert_eq!(options.len(), 1);
        assert!(options[0].takes_value);
    }

    #[test]
    fn test_embedded_commands_use_bare_names() {
        let app = AppSchema::new("", "0").with_command(CommandSpec::new("exit", "exit"));
        let set = compile(&[app]).unwrap();
        assert_eq!(set.commands()[0].words(), ["exit"]);
    }

    #[test]
    fn test_default_command_takes_app_name() {
        let app = AppSchema::new("dummy", "0").with_command(CommandSpec::new("", "default"));
        let set = compile(&[app]).unwrap();
        assert_eq!(set.commands()[0].words(), ["dummy"]);
    }

    #[test]
    fn test_default_command_rejected_in_unnamed_app() {
        let app = AppSchema::new("", "0").with_command(CommandSpec::new("", "default"));
        assert_eq!(
            compile(&[app]).unwrap_err(),
            SchemaError::EmbeddedDefaultCommand
        );
    }

    #[test]
    fn test_invalid_command_name_rejected() {
        let app = AppSchema::new("", "0").with_command(CommandSpec::new("9bad!", "bad"));
        assert!(matches!(
            compile(&[app]),
            Err(SchemaError::InvalidCommandName(_))
        ));
    }

    #[test]
    fn test_arg_syntax_generation() {
        let set = compile(&[dummy_app()]).unwrap();
        assert_eq!(set.commands()[0].arg_syntax(), "filename");

        let app = AppSchema::new("", "0").with_command(
            CommandSpec::new("ls", "list")
                .with_arg(ArgumentSpec::optional(1, "FILE", ValueType::String))
                .with_trailing("[FILE]..."),
        );
        let set = compile(&[app]).unwrap();
        assert_eq!(set.commands()[0].arg_syntax(), "[FILE]...");
    }

    #[test]
    fn test_root_level_collected_across_apps() {
        let a = AppSchema::new("a", "0").with_option(OptionSpec::flag(Some("x"), None));
        let b = AppSchema::new("b", "0")
            .with_option(OptionSpec::flag(Some("y"), None))
            .with_trailing("[WORD]...");

        let set = compile(&[a, b]).unwrap();
        assert_eq!(set.root_options().len(), 2);
        assert_eq!(set.root_trailing(), Some("[WORD]..."));
    }
}
