use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
    result::Result as StdResult,
};

use arbor::{
    Context, Controller, Module,
    binding::BindingTable,
    config::RuntimeConfig,
    derive_commands,
    error::{BindingError, Result},
    model::{ObservableModel, Property, PropertyChanges},
    signal::Signal,
    value::{IntoValue, Value},
    view::{TopLevel, View},
    widgets::{Button, Panel, TextField, Window},
};
use tracing::{info, warn};

use crate::action_dialog::{ActionDialogController, ActionDialogView};

/// Minimum age for a record to be saved.
pub const MIN_AGE: i64 = 10;

/// A person record.
#[derive(Default)]
pub struct PersonVm {
    /// Listener registry.
    changes: PropertyChanges,
    /// Person name.
    name: Property<Option<String>>,
    /// Age in years.
    age: Property<Option<i64>>,
}

impl PersonVm {
    /// An empty record.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Current name.
    pub fn name(&self) -> Option<String> {
        self.name.get()
    }

    /// Set the name.
    pub fn set_name(&self, name: Option<String>) {
        self.name.set(&self.changes, "name", name);
    }

    /// Current age.
    pub fn age(&self) -> Option<i64> {
        self.age.get()
    }

    /// Set the age.
    pub fn set_age(&self, age: Option<i64>) {
        self.age.set(&self.changes, "age", age);
    }

    /// Is the record complete enough to save?
    pub fn is_valid(&self) -> bool {
        self.name.borrow().as_deref().is_some_and(|n| !n.is_empty())
            && self.age.get().is_some_and(|a| a > MIN_AGE)
    }
}

impl ObservableModel for PersonVm {
    fn changes(&self) -> &PropertyChanges {
        &self.changes
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(self.name.get().into_value()),
            "age" => Some(self.age.get().into_value()),
            _ => None,
        }
    }

    fn set_property(&self, name: &str, value: Value) -> StdResult<(), BindingError> {
        match name {
            "name" => self.name.set_value(&self.changes, name, &value).map(drop),
            "age" => self.age.set_value(&self.changes, name, &value).map(drop),
            _ => Err(BindingError::UnknownProperty(name.to_string())),
        }
    }
}

/// Form with name and age fields and save/clear buttons.
pub struct PersonTableView {
    /// Container for the form.
    pub root: Rc<Panel>,
    /// Name input.
    pub name: Rc<TextField>,
    /// Age input.
    pub age: Rc<TextField>,
    /// Save button.
    pub save: Rc<Button>,
    /// Clear button.
    pub clear: Rc<Button>,
}

impl PersonTableView {
    /// Build the form.
    pub fn new() -> Rc<Self> {
        let view = Self {
            root: Panel::new(),
            name: Rc::new(TextField::new()),
            age: Rc::new(TextField::new()),
            save: Rc::new(Button::new("Save")),
            clear: Rc::new(Button::new("Clear")),
        };
        view.root.add(&view.name);
        view.root.add(&view.age);
        view.root.add(&view.save);
        view.root.add(&view.clear);
        Rc::new(view)
    }
}

impl View for PersonTableView {
    fn top_level(&self) -> Option<Rc<dyn TopLevel>> {
        self.root.top_level()
    }

    fn hierarchy_changed(&self) -> &Signal<()> {
        self.root.hierarchy_changed()
    }
}

/// Controller for the person form.
pub struct PersonTableController {
    /// Window that owns the dialogs opened by `save`.
    owner: Weak<Window>,
    /// Configuration handed to dialog modules.
    config: RuntimeConfig,
    /// Dialogs opened by `save` that are still open.
    dialogs: RefCell<Vec<Module<ActionDialogController>>>,
    /// Total dialogs opened.
    opened: Cell<usize>,
    /// Set when the hosting window closes.
    unloaded: Cell<bool>,
}

impl PersonTableController {
    /// Construct a controller whose dialogs are owned by `owner`.
    pub fn new(owner: Weak<Window>, config: RuntimeConfig) -> Self {
        Self {
            owner,
            config,
            dialogs: RefCell::new(Vec::new()),
            opened: Cell::new(0),
            unloaded: Cell::new(false),
        }
    }

    /// Number of dialogs opened so far.
    pub fn dialogs_opened(&self) -> usize {
        self.opened.get()
    }

    /// Number of dialogs still held open.
    pub fn open_dialogs(&self) -> usize {
        self.dialogs.borrow().len()
    }

    /// The most recently opened dialog.
    pub fn last_dialog(&self) -> Option<Rc<ActionDialogView>> {
        self.dialogs.borrow().last().map(|m| m.view().clone())
    }

    /// Has the hosting window closed?
    pub fn is_unloaded(&self) -> bool {
        self.unloaded.get()
    }
}

#[derive_commands]
impl PersonTableController {
    /// Open the action dialog for the current record.
    #[command]
    fn save(&self, cx: &Context<Self>) -> Result<()> {
        let owner = self.owner.upgrade();
        let view = ActionDialogView::new(owner.as_ref());
        if let Some(person) = cx.model() {
            view.set_message(format!(
                "{} ({})",
                person.name().unwrap_or_default(),
                person.age().unwrap_or_default()
            ));
        }
        let module = Module::with_config(&self.config, view.clone(), ActionDialogController::default)?;
        view.window.show();
        self.opened.set(self.opened.get() + 1);
        info!(dialogs = self.opened.get(), "action dialog opened");

        let mut dialogs = self.dialogs.borrow_mut();
        dialogs.retain(|m| m.controller().is_some_and(|cx| cx.is_initialized()));
        dialogs.push(module);
        Ok(())
    }

    /// Reset the record.
    #[command]
    fn clear(&self, cx: &Context<Self>) {
        if let Some(person) = cx.model() {
            person.set_name(None);
            person.set_age(None);
        }
    }
}

impl Controller for PersonTableController {
    type View = PersonTableView;
    type Model = PersonVm;

    fn can_execute(&self, cx: &Context<Self>, command: &str) -> bool {
        match command {
            "save" => cx.model().is_some_and(|p| p.is_valid()),
            "clear" => true,
            _ => false,
        }
    }

    fn setup_bindings(&self, view: &PersonTableView, bindings: &mut BindingTable<PersonVm>) {
        bindings.add(&view.name, "name");
        bindings.add(&view.age, "age").on_every_change();
    }

    fn on_initialized(&self, cx: &Context<Self>) -> Result<()> {
        if let Some(view) = cx.view() {
            cx.bind_button_to_command(&view.save, "save")?;
            cx.bind_button_to_command(&view.clear, "clear")?;
        }
        Ok(())
    }

    fn on_model_property_changed(&self, cx: &Context<Self>, property: &str) {
        if matches!(property, "name" | "age")
            && cx.is_initialized()
            && let Err(e) = cx.refresh_can_execute_command("save")
        {
            warn!(error = %e, "refresh failed");
        }
    }

    fn on_unload(&self, _cx: &Context<Self>) {
        self.unloaded.set(true);
        info!("person table unloaded");
    }
}
