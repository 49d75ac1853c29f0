//! Command registration and dispatch.
//!
//! Commands are registered once per controller instance, during
//! initialization, by [`Commands::register_commands`]. The
//! [`derive_commands`](crate::derive_commands) macro generates that function
//! from the `#[command]` methods of an impl block.

use std::{collections::BTreeMap, fmt, rc::Rc};

use tracing::trace;

use crate::{
    Context, Controller,
    error::{Error, Result},
};

/// Action body of a command.
pub type Action<C> = Rc<dyn Fn(&C, &Context<C>) -> anyhow::Result<()>>;

/// Availability predicate of a command.
pub type Predicate<C> = Rc<dyn Fn(&C, &Context<C>) -> bool>;

/// Convert any action error into the error type carried by [`Error::Exec`].
#[doc(hidden)]
pub fn exec_error<E: Into<anyhow::Error>>(e: E) -> anyhow::Error {
    e.into()
}

/// Implemented by controllers to declare their commands.
pub trait Commands: Sized + 'static {
    /// Register every command this controller exposes.
    fn register_commands(registry: &mut CommandRegistry<Self>) -> Result<()>
    where
        Self: Controller;
}

/// A registered command.
pub struct CommandEntry<C: Controller> {
    /// Unique command name.
    name: String,
    /// Action body.
    action: Action<C>,
    /// Explicit predicate. When absent the controller's
    /// [`Controller::can_execute`] decides.
    predicate: Option<Predicate<C>>,
}

impl<C: Controller> fmt::Debug for CommandEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

impl<C: Controller> CommandEntry<C> {
    /// Command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the command's availability.
    fn can_execute(&self, cx: &Context<C>) -> bool {
        match &self.predicate {
            Some(predicate) => predicate(cx.controller(), cx),
            None => cx.controller().can_execute(cx, &self.name),
        }
    }
}

/// Name-keyed command table for one controller.
pub struct CommandRegistry<C: Controller> {
    /// Commands by name.
    commands: BTreeMap<String, CommandEntry<C>>,
}

impl<C: Controller> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }
}

impl<C: Controller> fmt::Debug for CommandRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.commands.keys()).finish()
    }
}

impl<C: Controller> CommandRegistry<C> {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command whose availability comes from
    /// [`Controller::can_execute`].
    pub fn register<A>(&mut self, name: &str, action: A) -> Result<()>
    where
        A: Fn(&C, &Context<C>) -> anyhow::Result<()> + 'static,
    {
        self.insert(name, Rc::new(action), None)
    }

    /// Register a command with its own availability predicate.
    pub fn register_with_predicate<P, A>(&mut self, name: &str, predicate: P, action: A) -> Result<()>
    where
        P: Fn(&C, &Context<C>) -> bool + 'static,
        A: Fn(&C, &Context<C>) -> anyhow::Result<()> + 'static,
    {
        self.insert(name, Rc::new(action), Some(Rc::new(predicate)))
    }

    /// Validate and store an entry.
    fn insert(
        &mut self,
        name: &str,
        action: Action<C>,
        predicate: Option<Predicate<C>>,
    ) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument("command name is empty".into()));
        }
        if self.commands.contains_key(name) {
            return Err(Error::DuplicateCommand(name.to_string()));
        }
        self.commands.insert(
            name.to_string(),
            CommandEntry {
                name: name.to_string(),
                action,
                predicate,
            },
        );
        Ok(())
    }

    /// Look up a command.
    pub fn get(&self, name: &str) -> Option<&CommandEntry<C>> {
        self.commands.get(name)
    }

    /// Is `name` registered?
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.keys().map(String::as_str)
    }

    /// Registered entries in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry<C>> + '_ {
        self.commands.values()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Executable handle to a registered command.
pub struct Command<'a, C: Controller> {
    /// Owning controller context.
    cx: &'a Context<C>,
    /// Registry entry.
    entry: &'a CommandEntry<C>,
}

impl<C: Controller> fmt::Debug for Command<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Command").field(&self.entry.name).finish()
    }
}

impl<'a, C: Controller> Command<'a, C> {
    /// Pair an entry with its context.
    pub(crate) fn new(cx: &'a Context<C>, entry: &'a CommandEntry<C>) -> Self {
        Self { cx, entry }
    }

    /// Command name.
    pub fn name(&self) -> &'a str {
        &self.entry.name
    }

    /// Can the command run right now?
    pub fn can_execute(&self) -> bool {
        self.entry.can_execute(self.cx)
    }

    /// Run the command if it can execute. Availability is evaluated again
    /// here, so a control whose enabled state is stale cannot slip through.
    /// Action failures are returned unchanged as [`Error::Exec`].
    pub fn execute(&self) -> Result<()> {
        if !self.can_execute() {
            trace!(command = %self.entry.name, "command not executable, skipped");
            return Ok(());
        }
        trace!(command = %self.entry.name, "executing command");
        let action = self.entry.action.clone();
        action(self.cx.controller(), self.cx).map_err(Error::Exec)
    }
}
