use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use super::{Node, Widget, orphan, reparent, same_widget, top_level_of};
use crate::{
    signal::Signal,
    view::{TopLevel, View},
};

/// Container holding an ordered list of children.
pub struct Panel {
    /// Tree state.
    node: Node,
    /// Children, in insertion order.
    children: RefCell<Vec<Rc<dyn Widget>>>,
    /// Self reference handed to children as their parent.
    this: Weak<Self>,
}

impl Panel {
    /// Construct an empty panel.
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            node: Node::new(),
            children: RefCell::new(Vec::new()),
            this: this.clone(),
        })
    }

    /// Append `child`, moving it out of its previous parent. Fires
    /// `hierarchy_changed` on the child's subtree.
    pub fn add<W: Widget>(&self, child: &Rc<W>) {
        let child: Rc<dyn Widget> = child.clone();
        if self.contains(&child) {
            return;
        }
        let parent: Weak<dyn Widget> = self.this.clone();
        orphan(&child);
        self.children.borrow_mut().push(child.clone());
        reparent(&child, Some(parent));
    }

    /// Remove `child`. Returns false if it is not a child of this panel.
    pub fn remove<W: Widget>(&self, child: &Rc<W>) -> bool {
        let child: Rc<dyn Widget> = child.clone();
        if !self.contains(&child) {
            return false;
        }
        self.detach_child(&child);
        reparent(&child, None);
        true
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    /// Does the panel have no children?
    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    /// Is `child` a direct child of this panel?
    fn contains(&self, child: &Rc<dyn Widget>) -> bool {
        self.children.borrow().iter().any(|c| same_widget(c, child))
    }
}

impl Widget for Panel {
    fn node(&self) -> &Node {
        &self.node
    }

    fn children(&self) -> Vec<Rc<dyn Widget>> {
        self.children.borrow().clone()
    }

    fn detach_child(&self, child: &Rc<dyn Widget>) {
        self.children.borrow_mut().retain(|c| !same_widget(c, child));
    }
}

impl View for Panel {
    fn top_level(&self) -> Option<Rc<dyn TopLevel>> {
        top_level_of(self)
    }

    fn hierarchy_changed(&self) -> &Signal<()> {
        self.node.hierarchy_changed()
    }
}
