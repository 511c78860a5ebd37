//! Demo application wiring for the `metash` binary.
//!
//! An in-memory key/value store exposed through the shell engine: the
//! commands are declared as schema data, the store operations are command
//! handlers, and the same command set is reachable both under the `kv`
//! application name and mounted at `/kv/` in the namespace overlay.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use command_shell_core::{
    AppSchema, ArgumentSpec, CommandSpec, OptionSpec, SchemaError, ValueType, compile,
};
use command_shell_engine::{
    BoundCommand, CommandHandler, HandlerError, MapTreeModel, Shell, ShellBuilder, ShellContext,
    TreeNode,
};

/// Shared in-memory store backing the demo commands.
pub type Store = Rc<RefCell<BTreeMap<String, String>>>;

/// Creates an empty store.
pub fn new_store() -> Store {
    Rc::new(RefCell::new(BTreeMap::new()))
}

/// Command declarations of the demo store.
fn store_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("set", "store a value under a key")
            .with_option(OptionSpec::flag(Some("q"), Some("quiet")).with_description("suppress confirmation output"))
            .with_arg(ArgumentSpec::required(1, "key", ValueType::String))
            .with_arg(ArgumentSpec::required(2, "value", ValueType::String))
            .with_handler("kv.set"),
        CommandSpec::new("get", "print the value stored under a key")
            .with_arg(ArgumentSpec::required(1, "key", ValueType::String))
            .with_handler("kv.get"),
        CommandSpec::new("del", "remove one or more keys")
            .with_trailing("KEY [KEY]...")
            .with_handler("kv.del"),
        CommandSpec::new("keys", "list all stored keys")
            .with_handler("kv.keys"),
    ]
}

/// The store commands qualified under the `kv` application name.
pub fn kv_app() -> AppSchema {
    let mut app = AppSchema::new("kv", "0.1.0");
    for command in store_commands() {
        app = app.with_command(command);
    }
    app
}

/// Namespace overlay mounting the bare-named store commands at `/kv/`.
pub fn kv_tree() -> Result<MapTreeModel, SchemaError> {
    let mut bare = AppSchema::new("", "0.1.0");
    for command in store_commands() {
        bare = bare.with_command(command);
    }
    let mounted = compile(&[bare])?;

    let mut model = MapTreeModel::new();
    model.insert("/", vec![TreeNode::leaf("kv")]);
    model.insert("/kv/", vec![TreeNode::mount("kv", mounted)]);
    Ok(model)
}

struct SetHandler {
    store: Store,
}

impl CommandHandler for SetHandler {
    fn process(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        let key = values
            .arg_str("key")
            .ok_or_else(|| HandlerError::failed("set: missing key"))?;
        let value = values
            .arg_str("value")
            .ok_or_else(|| HandlerError::failed("set: missing value"))?;

        self.store
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        if !values.flag("q") {
            ctx.append_line(&format!("{key} = {value}"));
        }
        Ok(())
    }
}

struct GetHandler {
    store: Store,
}

impl CommandHandler for GetHandler {
    fn process(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        let key = values
            .arg_str("key")
            .ok_or_else(|| HandlerError::failed("get: missing key"))?;

        match self.store.borrow().get(key) {
            Some(value) => {
                ctx.append_line(value);
                Ok(())
            }
            None => Err(HandlerError::failed(format!("no such key: {key}"))),
        }
    }
}

struct DelHandler {
    store: Store,
}

impl CommandHandler for DelHandler {
    fn validate(
        &self,
        values: &BoundCommand,
        _ctx: &mut ShellContext<'_>,
    ) -> Result<(), command_shell_core::ParseError> {
        if values.trailing().unwrap_or_default().is_empty() {
            return Err(command_shell_core::ParseError::MissingArgument(
                "KEY".to_string(),
            ));
        }
        Ok(())
    }

    fn process(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        let mut removed = 0;
        let mut store = self.store.borrow_mut();
        for key in values.trailing().unwrap_or_default() {
            if store.remove(key).is_some() {
                removed += 1;
            }
        }
        drop(store);
        ctx.append_line(&format!("removed {removed}"));
        Ok(())
    }
}

struct KeysHandler {
    store: Store,
}

impl CommandHandler for KeysHandler {
    fn process(
        &self,
        _values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), HandlerError> {
        let keys: Vec<String> = self.store.borrow().keys().cloned().collect();
        for key in keys {
            ctx.append_line(&key);
        }
        Ok(())
    }
}

/// Registers the demo schema, handlers, and namespace on a shell builder.
pub fn wire_demo(builder: ShellBuilder, store: &Store) -> Result<ShellBuilder, SchemaError> {
    Ok(builder
        .with_app(kv_app())
        .with_handler(
            "kv.set",
            Rc::new(SetHandler {
                store: Rc::clone(store),
            }),
        )
        .with_handler(
            "kv.get",
            Rc::new(GetHandler {
                store: Rc::clone(store),
            }),
        )
        .with_handler(
            "kv.del",
            Rc::new(DelHandler {
                store: Rc::clone(store),
            }),
        )
        .with_handler(
            "kv.keys",
            Rc::new(KeysHandler {
                store: Rc::clone(store),
            }),
        )
        .with_tree(Box::new(kv_tree()?)))
}

/// Builds the demo shell with default (std) I/O.
pub fn build_demo_shell() -> Result<(Shell, Store), SchemaError> {
    let store = new_store();
    let shell = wire_demo(Shell::builder(), &store)?.build()?;
    Ok((shell, store))
}
