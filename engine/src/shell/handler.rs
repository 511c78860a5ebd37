//! Command handlers and the listener fabric.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use command_shell_core::{CompiledCommand, ParseError};

use crate::binder::BoundCommand;
use crate::error::HandlerError;
use crate::shell::ShellContext;

/// Application-side implementation of a command.
///
/// Handlers are registered on the shell under an identifier and referenced
/// by that identifier from [`CommandSpec::handlers`]. For each dispatch the
/// shell calls `validate` and then `process`, in the command's handler
/// declaration order.
///
/// A `validate` failure signals malformed *input*: the shell renders
/// context-aware help and keeps looping. A `process` failure signals a
/// runtime problem: it is reported through the failure listeners and an
/// error message.
///
/// [`CommandSpec::handlers`]: command_shell_core::CommandSpec
pub trait CommandHandler {
    /// Checks the bound values before execution starts.
    fn validate(
        &self,
        values: &BoundCommand,
        ctx: &mut ShellContext<'_>,
    ) -> Result<(), ParseError> {
        let _ = (values, ctx);
        Ok(())
    }

    /// Executes the command.
    fn process(&self, values: &BoundCommand, ctx: &mut ShellContext<'_>)
    -> Result<(), HandlerError>;
}

/// Registry mapping handler identifiers to implementations.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Rc<dyn CommandHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under an identifier, replacing any previous one.
    pub fn register(&mut self, id: impl Into<String>, handler: Rc<dyn CommandHandler>) {
        self.handlers.insert(id.into(), handler);
    }

    /// Looks up a handler.
    pub fn get(&self, id: &str) -> Option<Rc<dyn CommandHandler>> {
        self.handlers.get(id).cloned()
    }

    /// Whether the identifier is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }
}

/// Context of one handler invocation, passed to listeners.
pub struct HandlerEvent<'a> {
    /// The dispatched command.
    pub command: &'a CompiledCommand,
    /// Identifier of the handler being run.
    pub handler_id: &'a str,
    /// The bound values handed to the handler.
    pub values: &'a BoundCommand,
}

/// Observer of per-command handler lifecycle.
///
/// All methods default to no-ops so listeners implement only what they
/// observe.
pub trait HandlerListener {
    /// A handler is about to run.
    fn on_start(&self, event: &HandlerEvent<'_>) {
        let _ = event;
    }

    /// A handler finished successfully.
    fn on_success(&self, event: &HandlerEvent<'_>) {
        let _ = event;
    }

    /// A handler failed during processing.
    fn on_failure(&self, event: &HandlerEvent<'_>, error: &HandlerError) {
        let _ = (event, error);
    }
}

/// Registration handle returned by [`ListenerSet::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(usize);

/// Listener registry with snapshot notification.
///
/// A notification pass iterates over a snapshot of the registration list,
/// so listeners may be added or removed while notifications are in flight
/// — including a listener removing itself from inside its own callback —
/// without disturbing delivery to the remaining listeners.
#[derive(Default)]
pub struct ListenerSet {
    entries: RefCell<Vec<(ListenerId, Rc<dyn HandlerListener>)>>,
    next_id: Cell<usize>,
}

impl ListenerSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its removal handle. Registering
    /// the same listener instance again returns the existing handle.
    pub fn add(&self, listener: Rc<dyn HandlerListener>) -> ListenerId {
        let mut entries = self.entries.borrow_mut();
        if let Some((id, _)) = entries
            .iter()
            .find(|(_, registered)| Rc::ptr_eq(registered, &listener))
        {
            return *id;
        }
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        entries.push((id, listener));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub(crate) fn notify_start(&self, event: &HandlerEvent<'_>) {
        for listener in self.snapshot() {
            listener.on_start(event);
        }
    }

    pub(crate) fn notify_success(&self, event: &HandlerEvent<'_>) {
        for listener in self.snapshot() {
            listener.on_success(event);
        }
    }

    pub(crate) fn notify_failure(&self, event: &HandlerEvent<'_>, error: &HandlerError) {
        for listener in self.snapshot() {
            listener.on_failure(event, error);
        }
    }

    fn snapshot(&self) -> Vec<Rc<dyn HandlerListener>> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_shell_core::{AppSchema, CommandSpec, compile};

    struct Recorder {
        seen: RefCell<Vec<&'static str>>,
    }

    impl HandlerListener for Recorder {
        fn on_start(&self, _event: &HandlerEvent<'_>) {
            self.seen.borrow_mut().push("start");
        }

        fn on_success(&self, _event: &HandlerEvent<'_>) {
            self.seen.borrow_mut().push("success");
        }
    }

    #[test]
    fn test_add_remove() {
        let set = ListenerSet::new();
        let id = set.add(Rc::new(Recorder {
            seen: RefCell::new(Vec::new()),
        }));
        assert_eq!(set.len(), 1);
        assert!(set.remove(id));
        assert!(!set.remove(id));
        assert!(set.is_empty());
    }

    #[test]
    fn test_duplicate_registration_returns_same_handle() {
        let set = ListenerSet::new();
        let listener: Rc<dyn HandlerListener> = Rc::new(Recorder {
            seen: RefCell::new(Vec::new()),
        });

        let a = set.add(listener.clone());
        let b = set.add(listener);

        assert_eq!(a, b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_snapshot_notification_tolerates_mutation() {
        let app = AppSchema::new("", "0").with_command(CommandSpec::new("go", "go"));
        let compiled = compile(&[app]).unwrap();
        let values = BoundCommand::default();
        let event = HandlerEvent {
            command: compiled.commands()[0].as_ref(),
            handler_id: "h",
            values: &values,
        };

        struct SelfRemoving {
            set: Rc<ListenerSet>,
            my_id: Cell<Option<ListenerId>>,
            started: Cell<bool>,
        }

        impl HandlerListener for SelfRemoving {
            fn on_start(&self, _event: &HandlerEvent<'_>) {
                self.started.set(true);
                if let Some(id) = self.my_id.get() {
                    self.set.remove(id);
                }
            }
        }

        let set = Rc::new(ListenerSet::new());
        let recorder = Rc::new(Recorder {
            seen: RefCell::new(Vec::new()),
        });
        let removing = Rc::new(SelfRemoving {
            set: Rc::clone(&set),
            my_id: Cell::new(None),
            started: Cell::new(false),
        });
        let id = set.add(removing.clone());
        removing.my_id.set(Some(id));
        set.add(recorder.clone());

        set.notify_start(&event);
        set.notify_success(&event);

        assert!(removing.started.get());
        assert_eq!(set.len(), 1);
        // the remaining listener saw both notifications
        assert_eq!(*recorder.seen.borrow(), vec!["start", "success"]);
    }
}
