use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use super::{Node, Widget, top_level_of};
use crate::{
    signal::Signal,
    view::{Control, TopLevel, View},
};

/// Button that fires `activated` when clicked while enabled.
pub struct Button {
    /// Tree state.
    node: Node,
    /// Button label.
    label: RefCell<String>,
    /// Enabled state.
    enabled: Cell<bool>,
    /// Activation signal.
    activated: Signal<()>,
}

impl Button {
    /// Construct an enabled button with a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            node: Node::new(),
            label: RefCell::new(label.into()),
            enabled: Cell::new(true),
            activated: Signal::new(),
        }
    }

    /// Return the button label.
    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    /// Replace the button label.
    pub fn set_label(&self, label: impl Into<String>) {
        *self.label.borrow_mut() = label.into();
    }

    /// Simulate a user click. Disabled buttons ignore clicks.
    pub fn click(&self) {
        if self.enabled.get() {
            self.activated.emit(&());
        }
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::new("")
    }
}

impl Widget for Button {
    fn node(&self) -> &Node {
        &self.node
    }
}

impl Control for Button {
    fn activated(&self) -> &Signal<()> {
        &self.activated
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

impl View for Button {
    fn top_level(&self) -> Option<Rc<dyn TopLevel>> {
        top_level_of(self)
    }

    fn hierarchy_changed(&self) -> &Signal<()> {
        self.node.hierarchy_changed()
    }
}
