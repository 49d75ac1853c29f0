//! Controllers and their lifecycle.
//!
//! A [`Controller`] is plain user code: hooks plus a command list. The
//! [`Context`] wrapped around it owns the view, the current model, the
//! binding table, the command registry and the control bindings, and runs
//! the lifecycle:
//!
//! ```text
//! Uninitialized --initialize--> Initialized --window closed--> Unloaded
//! ```

/// Control-to-command bookkeeping.
mod buttons;
/// Window close detection.
mod close;

use std::{
    any::type_name,
    cell::{Cell, OnceCell, RefCell},
    fmt,
    io::Write,
    rc::{Rc, Weak},
};

use comfy_table::{Cell as TableCell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use scopeguard::guard;
use tracing::{debug, error, trace};

use self::{buttons::ButtonBindings, close::CloseWatch};
use crate::{
    binding::BindingTable,
    commands::{Command, CommandRegistry, Commands},
    error::{Error, Result},
    model::ObservableModel,
    signal::HandlerId,
    view::{Control, View},
};

/// Lifecycle state of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, `initialize` not yet called.
    Uninitialized,
    /// Initialized and live.
    Initialized,
    /// The hosting window closed. Terminal.
    Unloaded,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Unloaded => "unloaded",
        };
        f.write_str(name)
    }
}

/// A UI controller: connects a view to a model and exposes commands.
///
/// Every hook receives `&self` and the controller's [`Context`]. Hooks may
/// call back into the context freely, including while a model notification
/// is being delivered, so any controller state that changes after
/// construction should live in cells.
pub trait Controller: Commands {
    /// The view type this controller manages.
    type View: View;
    /// The model type this controller binds to.
    type Model: ObservableModel;

    /// Availability of a command registered without its own predicate.
    /// Called on every refresh, so it must be cheap and free of side
    /// effects. Commands are unavailable by default.
    fn can_execute(&self, _cx: &Context<Self>, _command: &str) -> bool {
        false
    }

    /// Declare binding rules. Called once, during initialization.
    fn setup_bindings(&self, _view: &Self::View, _bindings: &mut BindingTable<Self::Model>) {}

    /// Called at the end of initialization. The view and commands are
    /// available; this is where controls get bound to commands.
    fn on_initialized(&self, _cx: &Context<Self>) -> Result<()> {
        Ok(())
    }

    /// Called after the model is replaced.
    fn on_model_changed(
        &self,
        _cx: &Context<Self>,
        _old: Option<&Rc<Self::Model>>,
        _new: &Rc<Self::Model>,
    ) {
    }

    /// Called for every property change notification from the current
    /// model.
    fn on_model_property_changed(&self, _cx: &Context<Self>, _property: &str) {}

    /// Called exactly once, when the window hosting the view closes.
    fn on_unload(&self, _cx: &Context<Self>) {}
}

/// Shared handle to a controller context.
pub type Handle<C> = Rc<Context<C>>;

/// Runtime state wrapped around a [`Controller`].
pub struct Context<C: Controller> {
    /// The user controller.
    controller: C,
    /// Weak self reference for handlers installed on models and controls.
    this: Weak<Self>,
    /// Lifecycle state.
    lifecycle: Cell<Lifecycle>,
    /// Set once unloading starts, so a repeated close is absorbed.
    closing: Cell<bool>,
    /// The view, set once at initialization.
    view: OnceCell<Rc<C::View>>,
    /// Current model.
    model: RefCell<Option<Rc<C::Model>>>,
    /// Our listener on the current model.
    model_listener: Cell<Option<HandlerId>>,
    /// Commands, built once at initialization.
    commands: OnceCell<CommandRegistry<C>>,
    /// Binding rules.
    bindings: RefCell<BindingTable<C::Model>>,
    /// Controls bound to commands.
    buttons: RefCell<ButtonBindings>,
    /// Close detection for the hosting window.
    close_watch: OnceCell<CloseWatch>,
}

impl<C: Controller> fmt::Debug for Context<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("controller", &type_name::<C>())
            .field("lifecycle", &self.lifecycle.get())
            .field("has_model", &self.model.borrow().is_some())
            .field("commands", &self.commands.get())
            .finish()
    }
}

impl<C: Controller> Context<C> {
    /// Wrap a controller. The result is uninitialized.
    pub fn new(controller: C) -> Handle<C> {
        Rc::new_cyclic(|this| Self {
            controller,
            this: this.clone(),
            lifecycle: Cell::new(Lifecycle::Uninitialized),
            closing: Cell::new(false),
            view: OnceCell::new(),
            model: RefCell::new(None),
            model_listener: Cell::new(None),
            commands: OnceCell::new(),
            bindings: RefCell::new(BindingTable::new()),
            buttons: RefCell::new(ButtonBindings::default()),
            close_watch: OnceCell::new(),
        })
    }

    /// One-shot initialization: build the command registry, declare and
    /// activate bindings, start watching for the window close, then call
    /// [`Controller::on_initialized`].
    ///
    /// Fails before any state changes if the command list is invalid.
    pub fn initialize(&self, view: Rc<C::View>) -> Result<()> {
        match self.lifecycle.get() {
            Lifecycle::Uninitialized => {}
            Lifecycle::Initialized => return Err(Error::AlreadyInitialized),
            Lifecycle::Unloaded => return Err(Error::Unloaded),
        }
        if self.view.get().is_some() || self.commands.get().is_some() {
            return Err(Error::AlreadyInitialized);
        }

        let mut registry = CommandRegistry::new();
        C::register_commands(&mut registry)?;

        let mut bindings = BindingTable::new();
        self.controller.setup_bindings(&view, &mut bindings);
        if let Some(model) = self.model() {
            bindings.attach(&model)?;
        }

        debug!(
            controller = type_name::<C>(),
            commands = registry.len(),
            bindings = bindings.len(),
            "initializing controller"
        );
        *self.bindings.borrow_mut() = bindings;
        if self.commands.set(registry).is_err() {
            return Err(Error::AlreadyInitialized);
        }
        let view = self.view.get_or_init(|| view);

        let this = self.this.clone();
        let watch = CloseWatch::install(view, move || {
            if let Some(cx) = this.upgrade() {
                cx.closed();
            }
        });
        if self.close_watch.set(watch).is_err() {
            return Err(Error::AlreadyInitialized);
        }

        self.lifecycle.set(Lifecycle::Initialized);
        self.controller.on_initialized(self)
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    /// Is the controller initialized and not yet unloaded?
    pub fn is_initialized(&self) -> bool {
        self.lifecycle.get() == Lifecycle::Initialized
    }

    /// Fail unless initialized.
    fn ensure_initialized(&self) -> Result<()> {
        match self.lifecycle.get() {
            Lifecycle::Initialized => Ok(()),
            Lifecycle::Uninitialized => Err(Error::NotInitialized),
            Lifecycle::Unloaded => Err(Error::Unloaded),
        }
    }

    /// The registry, once initialized.
    fn registry(&self) -> Result<&CommandRegistry<C>> {
        self.ensure_initialized()?;
        self.commands.get().ok_or(Error::NotInitialized)
    }

    /// The wrapped controller.
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// The view, once initialized.
    pub fn view(&self) -> Option<&Rc<C::View>> {
        self.view.get()
    }

    /// The current model.
    pub fn model(&self) -> Option<Rc<C::Model>> {
        self.model.borrow().clone()
    }

    /// Replace the model.
    ///
    /// A no-op when `model` is the current model. Otherwise the controller
    /// stops listening to the old model and its bindings are detached from
    /// it; the new model is installed and listened to. When initialized,
    /// bindings are attached to the new model, then
    /// [`Controller::on_model_changed`] runs, then every command's
    /// availability is refreshed. Before initialization only the hook runs.
    ///
    /// If the new model lacks a bound property the call fails and the old
    /// model stays fully attached.
    pub fn set_model(&self, model: Rc<C::Model>) -> Result<()> {
        if self.lifecycle.get() == Lifecycle::Unloaded {
            return Err(Error::Unloaded);
        }
        let old = self.model();
        if old.as_ref().is_some_and(|old| Rc::ptr_eq(old, &model)) {
            return Ok(());
        }
        let initialized = self.is_initialized();
        if initialized {
            self.bindings.borrow().validate(&model)?;
        }

        if let Some(old) = &old {
            if let Some(id) = self.model_listener.take() {
                old.changes().unsubscribe(id);
            }
            if initialized {
                self.bindings.borrow_mut().detach();
            }
        }

        *self.model.borrow_mut() = Some(model.clone());
        self.model_listener.set(Some(self.listen(&model)));
        debug!(replaced = old.is_some(), "model set");

        if initialized {
            self.bindings.borrow_mut().attach(&model)?;
        }
        self.controller.on_model_changed(self, old.as_ref(), &model);
        if initialized {
            self.refresh_can_execute_commands()?;
        }
        Ok(())
    }

    /// Subscribe to a model's property changes.
    fn listen(&self, model: &C::Model) -> HandlerId {
        let this = self.this.clone();
        model.changes().subscribe(move |property| {
            if let Some(cx) = this.upgrade() {
                trace!(property, "model property changed");
                cx.controller.on_model_property_changed(&cx, property);
            }
        })
    }

    /// Look up a command by name.
    pub fn command(&self, name: &str) -> Result<Command<'_, C>> {
        let registry = self.registry()?;
        if name.is_empty() {
            return Err(Error::InvalidArgument("command name is empty".into()));
        }
        let entry = registry
            .get(name)
            .ok_or_else(|| Error::UnknownCommand(name.to_string()))?;
        Ok(Command::new(self, entry))
    }

    /// Registered command names in lexical order. Empty before
    /// initialization.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands
            .get()
            .map(|r| r.names().collect())
            .unwrap_or_default()
    }

    /// Recompute one command's availability and push it to every control
    /// bound to that command.
    pub fn refresh_can_execute_command(&self, name: &str) -> Result<()> {
        let command = self.command(name)?;
        let controls = self.buttons.borrow().controls(name);
        if controls.is_empty() {
            return Ok(());
        }
        let enabled = command.can_execute();
        trace!(command = name, enabled, controls = controls.len(), "refresh");
        for control in controls {
            control.set_enabled(enabled);
        }
        Ok(())
    }

    /// Refresh every registered command.
    pub fn refresh_can_execute_commands(&self) -> Result<()> {
        for name in self.registry()?.names() {
            self.refresh_can_execute_command(name)?;
        }
        Ok(())
    }

    /// Make `control` run the named command when activated, and keep its
    /// enabled state in step with the command's availability. A control
    /// triggers at most one command at a time.
    pub fn bind_button_to_command<B: Control>(&self, control: &Rc<B>, name: &str) -> Result<()> {
        self.command(name)?;
        let control: Rc<dyn Control> = control.clone();
        if let Some(existing) = self.buttons.borrow().command_for(&control) {
            return Err(Error::AlreadyBound(existing.to_string()));
        }

        let this = self.this.clone();
        let command = name.to_string();
        let handler = control.activated().connect(move |_| {
            let Some(cx) = this.upgrade() else {
                return;
            };
            if let Err(e) = cx.command(&command).and_then(|c| c.execute()) {
                error!(command = %command, error = %e, "command failed");
            }
        });
        self.buttons.borrow_mut().insert(name, control, handler);
        trace!(command = name, "control bound");
        self.refresh_can_execute_command(name)
    }

    /// Undo [`Context::bind_button_to_command`].
    pub fn unbind_button_from_command<B: Control>(
        &self,
        control: &Rc<B>,
        name: &str,
    ) -> Result<()> {
        self.ensure_initialized()?;
        let control: Rc<dyn Control> = control.clone();
        let handler = self.buttons.borrow_mut().remove(name, &control)?;
        control.activated().disconnect(handler);
        trace!(command = name, "control unbound");
        Ok(())
    }

    /// Number of controls bound to a command.
    pub fn bound_controls(&self, name: &str) -> usize {
        self.buttons.borrow().count(name)
    }

    /// Write a table of commands, their availability and bound control
    /// counts.
    pub fn print_command_table(&self, w: &mut dyn Write) -> Result<()> {
        let registry = self.registry()?;
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["command", "available", "controls"]);
        for entry in registry.iter() {
            let available = Command::new(self, entry).can_execute();
            let color = if available {
                Color::Green
            } else {
                Color::Red
            };
            table.add_row(vec![
                TableCell::new(entry.name()).fg(Color::Green),
                TableCell::new(if available { "yes" } else { "no" }).fg(color),
                TableCell::new(self.bound_controls(entry.name())),
            ]);
        }
        writeln!(w, "{table}").map_err(|x| Error::Internal(x.to_string()))
    }

    /// Is the close watch hooked into a window yet?
    pub fn is_watching_close(&self) -> bool {
        self.close_watch.get().is_some_and(CloseWatch::is_attached)
    }

    /// The hosting window closed.
    fn closed(&self) {
        if !self.is_initialized() || self.closing.replace(true) {
            trace!("repeated close absorbed");
            return;
        }
        debug!(
            controller = type_name::<C>(),
            "window closed, unloading controller"
        );
        let _unload = guard((), |()| self.release());
        self.controller.on_unload(self);
    }

    /// Tear down every listener and handler, then enter `Unloaded`.
    fn release(&self) {
        self.disconnect();
        self.bindings.borrow_mut().detach();
        self.lifecycle.set(Lifecycle::Unloaded);
        debug!("controller unloaded");
    }

    /// Remove the handlers this context installed on the window, the model
    /// and bound controls.
    fn disconnect(&self) {
        if let (Some(watch), Some(view)) = (self.close_watch.get(), self.view.get()) {
            watch.release(&**view);
        }
        if let (Some(id), Some(model)) = (self.model_listener.take(), self.model()) {
            model.changes().unsubscribe(id);
        }
        let bound = self.buttons.borrow_mut().drain();
        for (control, handler) in bound {
            control.activated().disconnect(handler);
        }
    }
}

impl<C: Controller> Drop for Context<C> {
    /// A context dropped while still live leaves nothing connected. The
    /// unload hook does not run.
    fn drop(&mut self) {
        if self.lifecycle.get() != Lifecycle::Unloaded {
            trace!(controller = type_name::<C>(), "context dropped while live");
            self.disconnect();
        }
    }
}
