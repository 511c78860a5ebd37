//! End-to-end shell dispatch tests with scripted input and an in-memory
//! output sink.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use command_shell_core::{
    AppSchema, ArgumentSpec, CommandSpec, OptionSpec, ParseError, ValueType, compile,
};
use command_shell_engine::{
    BoundCommand, CommandHandler, HandlerError, HandlerEvent, HandlerListener, ListenerId,
    ListenerSet, MapTreeModel, MemorySink, ScriptedInput, Shell, ShellBuilder, ShellContext,
    TreeNode,
};

/// Prints its bound values in validate and process, like a typical
/// application handler would log its configuration.
struct CreateHandler;

impl CommandHandler for CreateHandler {
    fn validate(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), ParseError> {
        ctx.append_line(&format!(
            "validation: key = {}; file = {}",
            values.flag("k2"),
            values.arg_str("filename").unwrap_or("null")
        ));
        Ok(())
    }

    fn process(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        ctx.append_line(&format!(
            "process: key = {}; file = {}",
            values.flag("k2"),
            values.arg_str("filename").unwrap_or("null")
        ));
        Ok(())
    }
}

fn dummy_app() -> AppSchema {
    AppSchema::new("dummy", "0")
        .with_option(OptionSpec::flag(Some("eof"), Some("exitOnFinish")))
        .with_command(
            CommandSpec::new("create", "create a new dummy")
                .with_option(OptionSpec::flag(Some("k2"), Some("key2")))
                .with_arg(ArgumentSpec::required(1, "filename", ValueType::String))
                .with_handler("dummy.create"),
        )
        .with_command(CommandSpec::new("delete", "delete the active dummy"))
}

fn console_shell(builder: ShellBuilder) -> (Shell, Rc<RefCell<String>>) {
    let sink = MemorySink::new();
    let buffer = sink.buffer();
    let shell = builder
        .with_app(dummy_app())
        .with_handler("dummy.create", Rc::new(CreateHandler))
        .with_output(Box::new(sink))
        .build()
        .expect("schema must compile");
    (shell, buffer)
}

fn args(input: &[&str]) -> Vec<String> {
    input.iter().map(|s| s.to_string()).collect()
}

#[test]
fn dispatch_runs_validate_then_process() {
    let (mut shell, buffer) = console_shell(Shell::builder());

    shell.run_once(&args(&["dummy", "create", "-k2", "file.txt"]));

    assert_eq!(
        *buffer.borrow(),
        "validation: key = true; file = file.txt\nprocess: key = true; file = file.txt\n"
    );
}

#[test]
fn missing_required_argument_shows_help_before_any_handler() {
    let (mut shell, buffer) = console_shell(Shell::builder());

    shell.run_once(&args(&["dummy", "create", "-k2"]));

    let out = buffer.borrow();
    assert!(out.contains("argument 'filename' is not specified"), "{out}");
    assert!(out.contains("usage: dummy create"), "{out}");
    assert!(!out.contains("validation:"), "handler must not run: {out}");
}

#[test]
fn unknown_command_reports_info_and_keeps_engine_usable() {
    let (mut shell, buffer) = console_shell(Shell::builder());

    shell.run_once(&args(&["frob"]));
    shell.run_once(&args(&["dummy", "create", "f.txt"]));

    let out = buffer.borrow();
    assert!(out.contains("No appropriate command has been found for 'frob'"));
    assert!(out.contains("process: key = false; file = f.txt"));
}

#[test]
fn empty_run_once_renders_help_with_notice() {
    let (mut shell, buffer) = console_shell(Shell::builder());

    shell.run_once(&[]);

    let out = buffer.borrow();
    assert!(out.contains("no command specified"), "{out}");
    assert!(out.contains("dummy create"), "{out}");
}

#[test]
fn command_without_handlers_dispatches_to_nothing() {
    let (mut shell, buffer) = console_shell(Shell::builder());

    shell.run_once(&args(&["dummy", "delete"]));

    assert_eq!(*buffer.borrow(), "");
}

/// The `set name=value` pattern: a single positional argument split by the
/// handler, exercised as an embedded (bare-named) command.
struct SetHandler;

impl SetHandler {
    fn render(values: &BoundCommand) -> String {
        let property = values.arg_str("property").unwrap_or_default();
        let (name, value) = property.split_once('=').unwrap_or((property, ""));
        format!("name = {name}; value = {value}")
    }
}

impl CommandHandler for SetHandler {
    fn validate(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), ParseError> {
        ctx.append_line(&format!("validation: {}", Self::render(values)));
        Ok(())
    }

    fn process(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        ctx.append_line(&format!("process: {}", Self::render(values)));
        Ok(())
    }
}

#[test]
fn embedded_set_command_sees_key_value_token() {
    let app = AppSchema::new("", "0").with_command(
        CommandSpec::new("set", "set a property to the value")
            .with_arg(ArgumentSpec::required(1, "property", ValueType::String))
            .with_handler("test.set"),
    );

    let sink = MemorySink::new();
    let buffer = sink.buffer();
    let mut shell = Shell::builder()
        .with_app(app)
        .with_handler("test.set", Rc::new(SetHandler))
        .with_output(Box::new(sink))
        .build()
        .unwrap();

    shell.run_once(&args(&["set", "a=b"]));

    assert_eq!(
        *buffer.borrow(),
        "validation: name = a; value = b\nprocess: name = a; value = b\n"
    );
}

struct FailingHandler;

impl CommandHandler for FailingHandler {
    fn process(
        &self,
        _values: &BoundCommand,
        _ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        Err(HandlerError::failed("kaput"))
    }
}

#[test]
fn handler_failure_is_reported_and_loop_continues() {
    let app = AppSchema::new("", "0")
        .with_command(CommandSpec::new("boom", "always fails").with_handler("test.boom"));

    let sink = MemorySink::new();
    let buffer = sink.buffer();
    let mut shell = Shell::builder()
        .with_app(app)
        .with_handler("test.boom", Rc::new(FailingHandler))
        .with_input(Box::new(ScriptedInput::new(["boom", "exit"])))
        .with_output(Box::new(sink))
        .build()
        .unwrap();

    shell.run(&[]);

    let out = buffer.borrow();
    assert!(
        out.contains("boom: command failed. error: kaput; type: failure"),
        "{out}"
    );
    assert!(shell.exit_requested(), "the exit builtin must still work");
}

struct RejectingHandler;

impl CommandHandler for RejectingHandler {
    fn validate(
        &self,
        _values: &BoundCommand,
        _ctx: &mut ShellContext<'_>,
    ) -> Result<(), ParseError> {
        Err(ParseError::invalid("value out of range"))
    }

    fn process(
        &self,
        _values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        ctx.append_line("processed");
        Ok(())
    }
}

#[test]
fn validation_failure_renders_help_and_skips_process() {
    let app = AppSchema::new("", "0")
        .with_command(CommandSpec::new("check", "reject input").with_handler("test.check"));

    let sink = MemorySink::new();
    let buffer = sink.buffer();
    let mut shell = Shell::builder()
        .with_app(app)
        .with_handler("test.check", Rc::new(RejectingHandler))
        .with_output(Box::new(sink))
        .build()
        .unwrap();

    shell.run_once(&args(&["check"]));

    let out = buffer.borrow();
    assert!(out.contains("value out of range"), "{out}");
    assert!(out.contains("usage: check"), "{out}");
    assert!(!out.contains("processed"), "{out}");
    assert!(!out.contains("command failed"), "{out}");
}

#[derive(Default)]
struct RecordingListener {
    events: RefCell<Vec<String>>,
}

impl HandlerListener for RecordingListener {
    fn on_start(&self, event: &HandlerEvent<'_>) {
        self.events
            .borrow_mut()
            .push(format!("start:{}", event.command.name()));
    }

    fn on_success(&self, event: &HandlerEvent<'_>) {
        self.events
            .borrow_mut()
            .push(format!("success:{}", event.command.name()));
    }

    fn on_failure(&self, event: &HandlerEvent<'_>, error: &HandlerError) {
        self.events
            .borrow_mut()
            .push(format!("failure:{}:{}", event.command.name(), error));
    }
}

#[test]
fn listeners_observe_start_success_and_failure() {
    let app = AppSchema::new("", "0")
        .with_command(CommandSpec::new("ok", "succeeds").with_handler("test.ok"))
        .with_command(CommandSpec::new("boom", "fails").with_handler("test.boom"));

    struct OkHandler;
    impl CommandHandler for OkHandler {
        fn process(
            &self,
            _values: &BoundCommand,
            _ctx: &mut ShellContext<'_>,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    let mut shell = Shell::builder()
        .with_app(app)
        .with_handler("test.ok", Rc::new(OkHandler))
        .with_handler("test.boom", Rc::new(FailingHandler))
        .with_output(Box::new(MemorySink::new()))
        .build()
        .unwrap();

    let listener = Rc::new(RecordingListener::default());
    shell.listeners().add(listener.clone());

    shell.run_once(&args(&["ok"]));
    shell.run_once(&args(&["boom"]));

    assert_eq!(
        *listener.events.borrow(),
        vec![
            "start:ok".to_string(),
            "success:ok".to_string(),
            "start:boom".to_string(),
            "failure:boom:kaput".to_string(),
        ]
    );
}

struct SelfRemovingListener {
    listeners: Rc<ListenerSet>,
    my_id: Cell<Option<ListenerId>>,
}

impl HandlerListener for SelfRemovingListener {
    fn on_start(&self, _event: &HandlerEvent<'_>) {
        if let Some(id) = self.my_id.take() {
            self.listeners.remove(id);
        }
    }
}

#[test]
fn listener_removing_itself_does_not_disturb_delivery() {
    let app = AppSchema::new("", "0")
        .with_command(CommandSpec::new("ok", "succeeds").with_handler("test.ok"));

    struct OkHandler;
    impl CommandHandler for OkHandler {
        fn process(
            &self,
            _values: &BoundCommand,
            _ctx: &mut ShellContext<'_>,
        ) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    let mut shell = Shell::builder()
        .with_app(app)
        .with_handler("test.ok", Rc::new(OkHandler))
        .with_output(Box::new(MemorySink::new()))
        .build()
        .unwrap();

    let listeners = shell.listeners();
    let removing = Rc::new(SelfRemovingListener {
        listeners: Rc::clone(&listeners),
        my_id: Cell::new(None),
    });
    let id = listeners.add(removing.clone());
    removing.my_id.set(Some(id));

    let recording = Rc::new(RecordingListener::default());
    listeners.add(recording.clone());

    shell.run_once(&args(&["ok"]));

    // the remaining listener got the full lifecycle of the same dispatch
    assert_eq!(
        *recording.events.borrow(),
        vec!["start:ok".to_string(), "success:ok".to_string()]
    );
    assert_eq!(listeners.len(), 1);
}

#[test]
fn help_lists_commands_and_details_one() {
    let (mut shell, buffer) = console_shell(Shell::builder());

    shell.run_once(&args(&["help"]));
    shell.run_once(&args(&["help", "dummy"]));

    let out = buffer.borrow();
    assert!(out.contains("These shell commands are defined internally"), "{out}");
    assert!(out.contains("usage: dummy create"), "{out}");
    assert!(out.contains("dummy create: create a new dummy"), "{out}");
}

#[test]
fn help_for_unknown_command() {
    let (mut shell, buffer) = console_shell(Shell::builder());

    shell.run_once(&args(&["help", "frob"]));

    assert!(buffer.borrow().contains("help: no such command 'frob'"));
}

#[test]
fn quoted_arguments_survive_the_loop() {
    let sink = MemorySink::new();
    let buffer = sink.buffer();
    let mut shell = Shell::builder()
        .with_app(dummy_app())
        .with_handler("dummy.create", Rc::new(CreateHandler))
        .with_input(Box::new(ScriptedInput::new([
            "dummy create -k2 \"my file.txt\"",
            "exit",
        ])))
        .with_output(Box::new(sink))
        .build()
        .unwrap();

    shell.run(&[]);

    assert!(
        buffer
            .borrow()
            .contains("process: key = true; file = my file.txt")
    );
}

#[test]
fn open_quote_asks_for_continuation_line() {
    let sink = MemorySink::new();
    let buffer = sink.buffer();
    let mut shell = Shell::builder()
        .with_app(dummy_app())
        .with_handler("dummy.create", Rc::new(CreateHandler))
        .with_input(Box::new(ScriptedInput::new([
            "dummy create \"a.txt",
            "b\"",
            "exit",
        ])))
        .with_output(Box::new(sink))
        .build()
        .unwrap();

    shell.run(&[]);

    let out = buffer.borrow();
    // the joined token keeps the line break from the continuation
    assert!(out.contains("file = a.txt\nb"), "{out}");
}

#[test]
fn schema_can_be_declared_in_json() {
    let json = r#"{
        "name": "net",
        "version": "0",
        "options": [],
        "args": [],
        "trailing": null,
        "commands": [
            {
                "name": "ping",
                "description": "send a ping",
                "options": [],
                "args": [
                    { "index": 1, "name": "host", "required": true, "value_type": "String" }
                ],
                "trailing": null,
                "handlers": ["net.ping"]
            }
        ]
    }"#;
    let app: AppSchema = serde_json::from_str(json).expect("schema json must deserialize");

    struct PingHandler;
    impl CommandHandler for PingHandler {
        fn process(
            &self,
            values: &BoundCommand,
            ctx: &mut ShellContext<'_>,
        ) -> Result<(), HandlerError> {
            ctx.append_line(&format!("pong from {}", values.arg_str("host").unwrap_or("?")));
            Ok(())
        }
    }

    let sink = MemorySink::new();
    let buffer = sink.buffer();
    let mut shell = Shell::builder()
        .with_app(app)
        .with_handler("net.ping", Rc::new(PingHandler))
        .with_output(Box::new(sink))
        .build()
        .unwrap();

    shell.run_once(&args(&["net", "ping", "db1"]));

    assert_eq!(*buffer.borrow(), "pong from db1\n");
}

// ---------------------------------------------------------------------------
// Traversable namespace tests
// ---------------------------------------------------------------------------

struct EchoHandler(&'static str);

impl CommandHandler for EchoHandler {
    fn process(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        ctx.append_line(&format!(
            "{}: {}",
            self.0,
            values.arg_str("name").unwrap_or("-")
        ));
        Ok(())
    }
}

fn mounted_set() -> command_shell_core::CommandSet {
    let app = AppSchema::new("", "0").with_command(
        CommandSpec::new("create", "create something here")
            .with_arg(ArgumentSpec::optional(1, "name", ValueType::String))
            .with_handler("bin.create"),
    );
    compile(&[app]).unwrap()
}

fn tree_shell(lines: &[&str]) -> (Shell, Rc<RefCell<String>>) {
    let mut model = MapTreeModel::new();
    model.insert("/", vec![TreeNode::leaf("bin"), TreeNode::leaf("usr")]);
    model.insert(
        "/bin/",
        vec![
            TreeNode::mount("m1", mounted_set()),
            TreeNode::leaf("file1"),
            TreeNode::leaf("file2"),
        ],
    );
    model.insert("/usr/", vec![TreeNode::leaf("bin")]);
    model.insert("/usr/bin/", vec![TreeNode::mount("m1", mounted_set())]);

    let sink = MemorySink::new();
    let buffer = sink.buffer();
    let shell = Shell::builder()
        .with_tree(Box::new(model))
        .with_handler("bin.create", Rc::new(EchoHandler("created")))
        .with_input(Box::new(ScriptedInput::new(
            lines.iter().map(|s| s.to_string()),
        )))
        .with_output(Box::new(sink))
        .build()
        .unwrap();
    (shell, buffer)
}

#[test]
fn path_qualified_command_resolves_through_mount() {
    let (mut shell, buffer) = tree_shell(&[]);

    shell.run_once(&args(&["/bin/create", "x"]));

    assert_eq!(*buffer.borrow(), "created: x\n");
}

#[test]
fn cd_then_bare_command_resolves_identically() {
    let (mut shell, buffer) = tree_shell(&[]);

    shell.run_once(&args(&["cd", "/bin/"]));
    shell.run_once(&args(&["create", "x"]));

    assert_eq!(*buffer.borrow(), "created: x\n");
}

#[test]
fn ls_lists_current_and_given_folders() {
    let (mut shell, buffer) = tree_shell(&[]);

    shell.run_once(&args(&["ls"]));
    shell.run_once(&args(&["cd", "/bin/"]));
    shell.run_once(&args(&["ls"]));

    assert_eq!(*buffer.borrow(), " bin usr\n m1 file1 file2\n");
}

#[test]
fn ls_with_multiple_paths_prints_headers() {
    let (mut shell, buffer) = tree_shell(&[]);

    shell.run_once(&args(&["ls", "/bin/", "/usr/"]));

    assert_eq!(
        *buffer.borrow(),
        "/bin/:\n m1 file1 file2\n/usr/:\n bin\n"
    );
}

#[test]
fn ls_unknown_path_is_a_validation_error() {
    let (mut shell, buffer) = tree_shell(&[]);

    shell.run_once(&args(&["ls", "/nope/"]));

    let out = buffer.borrow();
    assert!(
        out.contains("ls: cannot access /nope/: No such file or directory"),
        "{out}"
    );
}

#[test]
fn cd_to_non_folder_is_a_validation_error() {
    let (mut shell, buffer) = tree_shell(&[]);

    shell.run_once(&args(&["cd", "/nope/"]));

    let out = buffer.borrow();
    assert!(out.contains("cd: /nope/: No such directory"), "{out}");
    assert_eq!(shell.tree_model().unwrap().current(), "/");
}

#[test]
fn nested_path_dispatch() {
    let (mut shell, buffer) = tree_shell(&[]);

    shell.run_once(&args(&["/usr/bin/create", "deep"]));

    assert_eq!(*buffer.borrow(), "created: deep\n");
}

#[test]
fn prompt_shows_current_folder() {
    let (mut shell, buffer) = tree_shell(&["cd /bin/", "exit"]);

    shell.run(&[]);

    let out = buffer.borrow();
    assert!(out.contains("/>"), "{out}");
    assert!(out.contains("/bin/>"), "{out}");
}

#[test]
fn unknown_path_falls_through_to_no_command() {
    let (mut shell, buffer) = tree_shell(&[]);

    shell.run_once(&args(&["/nowhere/create", "x"]));

    assert!(
        buffer
            .borrow()
            .contains("No appropriate command has been found for 'create'")
    );
}
