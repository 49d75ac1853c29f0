use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use super::{Node, Widget, top_level_of};
use crate::{
    binding::UpdateTrigger,
    signal::Signal,
    value::Value,
    view::{Field, TopLevel, View},
};

/// Single-line text input.
///
/// Bindings to a text field write back on commit unless the field, or the
/// binding rule, says otherwise.
pub struct TextField {
    /// Tree state.
    node: Node,
    /// Current text.
    text: RefCell<String>,
    /// Trigger used by bindings that do not choose one.
    default_trigger: Cell<UpdateTrigger>,
    /// Fired on every user change.
    edited: Signal<()>,
    /// Fired on commit.
    committed: Signal<()>,
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

impl TextField {
    /// Construct an empty field.
    pub fn new() -> Self {
        Self {
            node: Node::new(),
            text: RefCell::new(String::new()),
            default_trigger: Cell::new(UpdateTrigger::Commit),
            edited: Signal::new(),
            committed: Signal::new(),
        }
    }

    /// Build a field whose bindings default to `trigger`.
    pub fn with_default_trigger(self, trigger: UpdateTrigger) -> Self {
        self.default_trigger.set(trigger);
        self
    }

    /// Current text.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Simulate the user replacing the whole text. Fires `edited` once.
    pub fn input(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        self.edited.emit(&());
    }

    /// Simulate the user typing `text` at the end, one character at a time.
    /// Fires `edited` per character.
    pub fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.text.borrow_mut().push(c);
            self.edited.emit(&());
        }
    }

    /// Simulate the user clearing the field. Fires `edited` if it had text.
    pub fn clear(&self) {
        if !self.text.borrow().is_empty() {
            self.input("");
        }
    }

    /// Simulate focus leaving the field. Fires `committed`.
    pub fn commit(&self) {
        self.committed.emit(&());
    }
}

impl Widget for TextField {
    fn node(&self) -> &Node {
        &self.node
    }
}

impl Field for TextField {
    fn value(&self) -> Value {
        Value::Text(self.text())
    }

    fn set_value(&self, value: &Value) {
        *self.text.borrow_mut() = value.to_display_string();
    }

    fn edited(&self) -> &Signal<()> {
        &self.edited
    }

    fn committed(&self) -> &Signal<()> {
        &self.committed
    }

    fn default_trigger(&self) -> UpdateTrigger {
        self.default_trigger.get()
    }
}

impl View for TextField {
    fn top_level(&self) -> Option<Rc<dyn TopLevel>> {
        top_level_of(self)
    }

    fn hierarchy_changed(&self) -> &Signal<()> {
        self.node.hierarchy_changed()
    }
}
