//! Fixtures shared by the integration tests: a person model, a form view
//! and the controller that runs it.

#![allow(dead_code)]

use std::{cell::Cell, rc::Rc, result::Result as StdResult};

use arbor::{
    prelude::*,
    signal::Signal,
    testing::Recorder,
    widgets::{Button, Panel, TextField},
};

/// Person view-model.
#[derive(Default)]
pub struct Person {
    pub changes: PropertyChanges,
    name: Property<Option<String>>,
    age: Property<Option<i64>>,
}

impl Person {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn with(name: &str, age: i64) -> Rc<Self> {
        let p = Self::default();
        p.name.set(&p.changes, "name", Some(name.to_string()));
        p.age.set(&p.changes, "age", Some(age));
        Rc::new(p)
    }

    pub fn name(&self) -> Option<String> {
        self.name.get()
    }

    pub fn set_name(&self, name: Option<&str>) -> bool {
        self.name
            .set(&self.changes, "name", name.map(str::to_string))
    }

    pub fn age(&self) -> Option<i64> {
        self.age.get()
    }

    pub fn set_age(&self, age: Option<i64>) -> bool {
        self.age.set(&self.changes, "age", age)
    }
}

impl ObservableModel for Person {
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

/// A form with name and age fields and save/clear buttons.
pub struct PersonForm {
    pub root: Rc<Panel>,
    pub name: Rc<TextField>,
    pub age: Rc<TextField>,
    pub save: Rc<Button>,
    pub clear: Rc<Button>,
}

impl PersonForm {
    pub fn new() -> Rc<Self> {
        let form = Self {
            root: Panel::new(),
            name: Rc::new(TextField::new()),
            age: Rc::new(TextField::new()),
            save: Rc::new(Button::new("Save")),
            clear: Rc::new(Button::new("Clear")),
        };
        form.root.add(&form.name);
        form.root.add(&form.age);
        form.root.add(&form.save);
        form.root.add(&form.clear);
        Rc::new(form)
    }
}

impl View for PersonForm {
    fn top_level(&self) -> Option<Rc<dyn TopLevel>> {
        self.root.top_level()
    }

    fn hierarchy_changed(&self) -> &Signal<()> {
        self.root.hierarchy_changed()
    }
}

/// Controller for [`PersonForm`]. Records hook calls.
#[derive(Default)]
pub struct PersonController {
    pub log: Recorder,
    pub saves: Cell<usize>,
    /// Bind the form buttons in `on_initialized`.
    pub bind_buttons: bool,
}

impl PersonController {
    pub fn binding_buttons() -> Self {
        Self {
            bind_buttons: true,
            ..Self::default()
        }
    }
}

#[derive_commands]
impl PersonController {
    #[command]
    fn save(&self) {
        self.saves.set(self.saves.get() + 1);
        self.log.push("save");
    }

    #[command]
    fn clear(&self, cx: &Context<Self>) {
        if let Some(model) = cx.model() {
            model.set_name(None);
            model.set_age(None);
        }
        self.log.push("clear");
    }
}

impl Controller for PersonController {
    type View = PersonForm;
    type Model = Person;

    fn can_execute(&self, cx: &Context<Self>, command: &str) -> bool {
        match command {
            "save" => cx.model().is_some_and(|m| {
                m.name().is_some_and(|n| !n.is_empty()) && m.age().is_some_and(|a| a > 10)
            }),
            "clear" => true,
            _ => false,
        }
    }

    fn setup_bindings(&self, view: &PersonForm, bindings: &mut BindingTable<Person>) {
        bindings.add(&view.name, "name");
        bindings.add(&view.age, "age").on_every_change();
    }

    fn on_initialized(&self, cx: &Context<Self>) -> Result<()> {
        self.log.push("initialized");
        if self.bind_buttons
            && let Some(view) = cx.view()
        {
            cx.bind_button_to_command(&view.save, "save")?;
            cx.bind_button_to_command(&view.clear, "clear")?;
        }
        Ok(())
    }

    fn on_model_changed(&self, _cx: &Context<Self>, old: Option<&Rc<Person>>, _new: &Rc<Person>) {
        self.log.push(if old.is_some() {
            "model replaced"
        } else {
            "model set"
        });
    }

    fn on_model_property_changed(&self, cx: &Context<Self>, property: &str) {
        self.log.push(format!("changed {property}"));
        if matches!(property, "name" | "age")
            && cx.is_initialized()
            && let Err(e) = cx.refresh_can_execute_command("save")
        {
            self.log.push(format!("refresh failed: {e}"));
        }
    }

    fn on_unload(&self, _cx: &Context<Self>) {
        self.log.push("unloaded");
    }
}
