//! Headless reference widgets.
//!
//! These implement the [`crate::view`] contracts without drawing anything.
//! They keep a parent/child tree so views can be reparented into windows,
//! and expose methods that stand in for user input.

/// Push button.
pub mod button;
/// Container.
pub mod panel;
/// Single-line text input.
pub mod text_field;
/// Top-level window.
pub mod window;

use std::{
    cell::RefCell,
    ptr,
    rc::{Rc, Weak},
};

pub use button::Button;
pub use panel::Panel;
pub use text_field::TextField;
pub use window::Window;

use crate::{signal::Signal, view::TopLevel};

/// State every widget carries: its parent link and hierarchy signal.
#[derive(Default)]
pub struct Node {
    /// Parent widget, if any.
    parent: RefCell<Option<Weak<dyn Widget>>>,
    /// Fired when this widget or an ancestor is reparented.
    hierarchy_changed: Signal<()>,
}

impl Node {
    /// Construct a detached node.
    pub fn new() -> Self {
        Self::default()
    }

    /// The parent widget, if it is still alive.
    pub fn parent(&self) -> Option<Rc<dyn Widget>> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// The hierarchy signal.
    pub fn hierarchy_changed(&self) -> &Signal<()> {
        &self.hierarchy_changed
    }

    /// Replace the parent link.
    fn set_parent(&self, parent: Option<Weak<dyn Widget>>) {
        *self.parent.borrow_mut() = parent;
    }
}

/// A node in the headless widget tree.
pub trait Widget: 'static {
    /// Shared widget state.
    fn node(&self) -> &Node;

    /// Direct children.
    fn children(&self) -> Vec<Rc<dyn Widget>> {
        Vec::new()
    }

    /// This widget as a top-level window, if it is one.
    fn as_top_level(&self) -> Option<Rc<dyn TopLevel>> {
        None
    }

    /// Forget a child. Called when the child moves to another parent.
    fn detach_child(&self, _child: &Rc<dyn Widget>) {}
}

/// Pointer identity for widgets.
fn same_widget(a: &Rc<dyn Widget>, b: &Rc<dyn Widget>) -> bool {
    ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Walk up from `widget` to the nearest top-level window.
pub fn top_level_of(widget: &dyn Widget) -> Option<Rc<dyn TopLevel>> {
    if let Some(top) = widget.as_top_level() {
        return Some(top);
    }
    let mut current = widget.node().parent();
    while let Some(w) = current {
        if let Some(top) = w.as_top_level() {
            return Some(top);
        }
        current = w.node().parent();
    }
    None
}

/// Fire `hierarchy_changed` on `widget` and every descendant.
fn notify_hierarchy(widget: &dyn Widget) {
    widget.node().hierarchy_changed.emit(&());
    for child in widget.children() {
        notify_hierarchy(&*child);
    }
}

/// Detach `child` from its current parent, if any.
fn orphan(child: &Rc<dyn Widget>) {
    if let Some(old) = child.node().parent() {
        old.detach_child(child);
    }
}

/// Point `child` at `parent` and notify its subtree. The caller has already
/// updated the child lists.
fn reparent(child: &Rc<dyn Widget>, parent: Option<Weak<dyn Widget>>) {
    child.node().set_parent(parent);
    notify_hierarchy(&**child);
}
