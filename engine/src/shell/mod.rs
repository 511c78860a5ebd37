//! The interactive shell engine.
//!
//! A [`Shell`] owns the compiled command set, the option-parsing delegate,
//! the handler registry, the listener set, and the I/O seams. Its loop
//! reads one line per prompt cycle, tokenizes it (asking for continuation
//! lines while a quote is open), lets the namespace model rewrite
//! path-qualified input, resolves the command, binds values, and runs the
//! command's handlers.
//!
//! Failure isolation: parse and handler failures are caught at the
//! dispatch boundary and rendered as help or error messages; the loop
//! always returns to the prompt unless a handler raised the termination
//! signal.

pub(crate) mod builtins;
pub mod handler;
pub mod help;
pub mod messages;

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use command_shell_core::{AppSchema, CommandSet, CompiledCommand, ParseError, SchemaError, compile};

use crate::binder::{BoundCommand, bind};
use crate::error::HandlerError;
use crate::io::{InputSource, OutputSink, StdinInput, StdoutSink};
use crate::optparse::{GnuTokenParser, OptionParser};
use crate::tokenizer::smart_split;
use crate::tree::{self, TreeModel};

use self::handler::{CommandHandler, HandlerEvent, HandlerRegistry, ListenerSet};
use self::messages::{DefaultMessages, Messages};

/// Shell facilities handed to handlers and built-ins during one dispatch.
pub struct ShellContext<'a> {
    out: &'a mut (dyn OutputSink + 'static),
    exit: &'a Cell<bool>,
    commands: &'a CommandSet,
    tree: Option<&'a mut (dyn TreeModel + 'static)>,
    listeners: &'a ListenerSet,
}

impl ShellContext<'_> {
    /// Appends a message line to the shell output.
    pub fn append_line(&mut self, msg: &str) {
        self.out.append_line(msg);
    }

    /// Appends a message to the shell output without a line break.
    pub fn append(&mut self, msg: &str) {
        self.out.append(msg);
    }

    /// Raises the shell's termination signal. The loop checks it after the
    /// current dispatch completes.
    pub fn request_exit(&self) {
        self.exit.set(true);
    }

    /// Whether termination has been requested.
    pub fn exit_requested(&self) -> bool {
        self.exit.get()
    }

    /// The active command set.
    pub fn commands(&self) -> &CommandSet {
        self.commands
    }

    /// The namespace model, when one is attached.
    pub fn tree(&self) -> Option<&dyn TreeModel> {
        self.tree.as_deref()
    }

    /// Mutable access to the namespace model.
    pub fn tree_mut(&mut self) -> Option<&mut (dyn TreeModel + 'static)> {
        self.tree.as_deref_mut()
    }

    /// The shell's listener set.
    pub fn listeners(&self) -> &ListenerSet {
        self.listeners
    }
}

/// Builder for [`Shell`].
pub struct ShellBuilder {
    apps: Vec<AppSchema>,
    handlers: HandlerRegistry,
    parser: Box<dyn OptionParser>,
    messages: Box<dyn Messages>,
    tree: Option<Box<dyn TreeModel>>,
    input: Box<dyn InputSource>,
    out: Box<dyn OutputSink>,
}

impl Default for ShellBuilder {
    fn default() -> Self {
        Self {
            apps: Vec::new(),
            handlers: HandlerRegistry::new(),
            parser: Box::new(GnuTokenParser),
            messages: Box::new(DefaultMessages),
            tree: None,
            input: Box::new(StdinInput),
            out: Box::new(StdoutSink),
        }
    }
}

impl ShellBuilder {
    /// Creates a builder with std I/O, the GNU token parser, and default
    /// messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contributes an application schema.
    pub fn with_app(mut self, app: AppSchema) -> Self {
        self.apps.push(app);
        self
    }

    /// Registers a command handler under an identifier.
    pub fn with_handler(mut self, id: &str, handler: Rc<dyn CommandHandler>) -> Self {
        self.handlers.register(id, handler);
        self
    }

    /// Replaces the option-parsing delegate.
    pub fn with_parser(mut self, parser: Box<dyn OptionParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Replaces the message formatter.
    pub fn with_messages(mut self, messages: Box<dyn Messages>) -> Self {
        self.messages = messages;
        self
    }

    /// Attaches a namespace model, enabling path-qualified dispatch and the
    /// `ls`/`cd` built-ins.
    pub fn with_tree(mut self, tree: Box<dyn TreeModel>) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Replaces the input source.
    pub fn with_input(mut self, input: Box<dyn InputSource>) -> Self {
        self.input = input;
        self
    }

    /// Replaces the output sink.
    pub fn with_output(mut self, out: Box<dyn OutputSink>) -> Self {
        self.out = out;
        self
    }

    /// Compiles the schemas (user apps first, then the shell built-ins)
    /// and builds the shell.
    ///
    /// Fails on schema errors, including handler identifiers in the
    /// embedded command set with no registered handler.
    pub fn build(mut self) -> Result<Shell, SchemaError> {
        builtins::register_builtins(&mut self.handlers, self.tree.is_some());

        let mut apps = self.apps;
        apps.push(builtins::console_app());
        if self.tree.is_some() {
            apps.push(builtins::tree_app());
        }
        let embedded = compile(&apps)?;

        for command in embedded.commands() {
            for id in command.handlers() {
                if !self.handlers.contains(id) {
                    return Err(SchemaError::UnknownHandler(id.clone()));
                }
            }
        }

        Ok(Shell {
            active: embedded.clone(),
            embedded,
            parser: self.parser,
            handlers: self.handlers,
            listeners: Rc::new(ListenerSet::new()),
            messages: self.messages,
            tree: self.tree,
            input: self.input,
            out: self.out,
            exit: Cell::new(false),
        })
    }
}

/// The REPL state machine.
pub struct Shell {
    embedded: CommandSet,
    active: CommandSet,
    parser: Box<dyn OptionParser>,
    handlers: HandlerRegistry,
    listeners: Rc<ListenerSet>,
    messages: Box<dyn Messages>,
    tree: Option<Box<dyn TreeModel>>,
    input: Box<dyn InputSource>,
    out: Box<dyn OutputSink>,
    exit: Cell<bool>,
}

impl Shell {
    /// Starts building a shell.
    pub fn builder() -> ShellBuilder {
        ShellBuilder::new()
    }

    /// Greets, dispatches the initial arguments when present, then loops on
    /// user input until a handler raises the termination signal or input
    /// ends.
    pub fn run(&mut self, init_args: &[String]) {
        let greeting = self.messages.greeting(&self.active);
        self.out.append_line(&greeting);

        if !init_args.is_empty() {
            self.dispatch(init_args);
        }

        while !self.exit.get() {
            match self.read_tokens() {
                Some(args) => self.dispatch(&args),
                None => break,
            }
        }
    }

    /// Dispatches one command vector and returns. An empty vector renders
    /// help with a `no command specified` notice.
    pub fn run_once(&mut self, args: &[String]) {
        if args.is_empty() {
            let err = ParseError::invalid("no command specified");
            let msg = self.messages.help(&self.active, None, Some(&err));
            self.out.append_line(&msg);
        } else {
            self.dispatch(args);
        }
    }

    /// Resolves, binds, and executes one input vector.
    ///
    /// One command's failure never corrupts the engine for subsequent
    /// commands.
    pub fn dispatch(&mut self, args: &[String]) {
        let mut args = args.to_vec();
        if args.is_empty() {
            return;
        }

        if let Some(model) = &self.tree {
            tree::switch_by_path(&mut args, model.as_ref(), &self.embedded, &mut self.active);
        }

        let Some(command) = self.active.resolve(&args) else {
            tracing::debug!(input = %args[0], "no command matched");
            let msg = self.messages.no_command(&args[0]);
            self.out.append_line(&msg);
            return;
        };
        tracing::debug!(command = %command.name(), "dispatching");

        let bound = self
            .parser
            .parse(command.options(), command.residual(&args))
            .and_then(|raw| bind(command.view(), &raw));
        match bound {
            Ok(values) => self.run_handlers(&command, &values),
            Err(err) => self.display_help(Some(command.as_ref()), &err),
        }
    }

    /// The shell's listener set, shareable with listeners that manage
    /// their own registration.
    pub fn listeners(&self) -> Rc<ListenerSet> {
        Rc::clone(&self.listeners)
    }

    /// The currently active command set.
    pub fn active_commands(&self) -> &CommandSet {
        &self.active
    }

    /// The attached namespace model, if any.
    pub fn tree_model(&self) -> Option<&dyn TreeModel> {
        self.tree.as_deref()
    }

    /// Whether the termination signal has been raised.
    pub fn exit_requested(&self) -> bool {
        self.exit.get()
    }

    fn prompt(&self) -> String {
        match &self.tree {
            Some(model) => format!("{}>", model.current()),
            None => ">".to_string(),
        }
    }

    /// Reads and tokenizes one input vector, prompting for continuation
    /// lines while a quote is open and re-prompting on blank input.
    /// Returns `None` at end of input.
    fn read_tokens(&mut self) -> Option<Vec<String>> {
        let mut pending = String::new();
        let mut continuation = false;

        loop {
            if continuation {
                self.out.append(">");
            } else {
                let prompt = self.prompt();
                self.out.append(&prompt);
            }

            let line = match self.input.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to read input");
                    return None;
                }
            };

            if !pending.is_empty() {
                pending.push('\n');
            }
            pending.push_str(&line);

            let (tokens, incomplete) = smart_split(&pending);
            if incomplete {
                continuation = true;
                continue;
            }
            if tokens.is_empty() {
                pending.clear();
                continuation = false;
                continue;
            }
            return Some(tokens);
        }
    }

    fn run_handlers(&mut self, command: &Arc<CompiledCommand>, values: &BoundCommand) {
        for id in command.handlers() {
            let event = HandlerEvent {
                command: command.as_ref(),
                handler_id: id,
                values,
            };

            let Some(handler) = self.handlers.get(id) else {
                let err = HandlerError::MissingHandler(id.clone());
                self.listeners.notify_failure(&event, &err);
                let msg = self.messages.command_failed(command.name(), &err);
                self.out.append_line(&msg);
                return;
            };

            self.listeners.notify_start(&event);

            let validated = {
                let mut ctx = ShellContext {
                    out: self.out.as_mut(),
                    exit: &self.exit,
                    commands: &self.active,
                    tree: self.tree.as_deref_mut(),
                    listeners: self.listeners.as_ref(),
                };
                handler.validate(values, &mut ctx)
            };
            if let Err(err) = validated {
                // malformed input, not an application failure
                self.display_help(Some(command.as_ref()), &err);
                return;
            }

            let processed = {
                let mut ctx = ShellContext {
                    out: self.out.as_mut(),
                    exit: &self.exit,
                    commands: &self.active,
                    tree: self.tree.as_deref_mut(),
                    listeners: self.listeners.as_ref(),
                };
                handler.process(values, &mut ctx)
            };
            match processed {
                Ok(()) => self.listeners.notify_success(&event),
                Err(err) => {
                    self.listeners.notify_failure(&event, &err);
                    let msg = self.messages.command_failed(command.name(), &err);
                    self.out.append_line(&msg);
                    return;
                }
            }
        }
    }

    fn display_help(&mut self, command: Option<&CompiledCommand>, err: &ParseError) {
        let msg = self.messages.help(&self.active, command, Some(err));
        self.out.append_line(&msg);
    }
}
