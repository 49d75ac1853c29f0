use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use tracing::trace;

use super::{Node, Widget, orphan, reparent, same_widget};
use crate::{
    signal::Signal,
    view::{TopLevel, View},
};

/// Top-level window with a single content widget.
pub struct Window {
    /// Tree state.
    node: Node,
    /// Window title.
    title: RefCell<String>,
    /// Owning window for dialogs.
    owner: Option<Weak<Window>>,
    /// Is the window showing?
    visible: Cell<bool>,
    /// Content widget.
    content: RefCell<Option<Rc<dyn Widget>>>,
    /// Fired on every close.
    closed: Signal<()>,
    /// Self reference handed to the content as its parent.
    this: Weak<Self>,
}

impl Window {
    /// Construct a hidden window.
    pub fn new(title: impl Into<String>) -> Rc<Self> {
        Self::build(title.into(), None)
    }

    /// Construct a hidden dialog owned by `owner`.
    pub fn dialog(owner: &Rc<Self>, title: impl Into<String>) -> Rc<Self> {
        Self::build(title.into(), Some(Rc::downgrade(owner)))
    }

    /// Shared constructor.
    fn build(title: String, owner: Option<Weak<Self>>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            node: Node::new(),
            title: RefCell::new(title),
            owner,
            visible: Cell::new(false),
            content: RefCell::new(None),
            closed: Signal::new(),
            this: this.clone(),
        })
    }

    /// Window title.
    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    /// Replace the title.
    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.borrow_mut() = title.into();
    }

    /// Owning window, for dialogs.
    pub fn owner(&self) -> Option<Rc<Self>> {
        self.owner.as_ref().and_then(Weak::upgrade)
    }

    /// Is the window showing?
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Show the window.
    pub fn show(&self) {
        self.visible.set(true);
    }

    /// Current content widget.
    pub fn content(&self) -> Option<Rc<dyn Widget>> {
        self.content.borrow().clone()
    }

    /// Replace the content widget. Both the old and new content subtrees see
    /// `hierarchy_changed`.
    pub fn set_content<W: Widget>(&self, content: &Rc<W>) {
        let content: Rc<dyn Widget> = content.clone();
        if self.content().is_some_and(|c| same_widget(&c, &content)) {
            return;
        }
        let old = self.content.borrow_mut().take();
        if let Some(old) = old {
            reparent(&old, None);
        }
        orphan(&content);
        let parent: Weak<dyn Widget> = self.this.clone();
        *self.content.borrow_mut() = Some(content.clone());
        reparent(&content, Some(parent));
    }

    /// Close the window. Fires `closed` on every call, including repeats.
    pub fn close(&self) {
        trace!(title = %self.title(), "window closed");
        self.visible.set(false);
        self.closed.emit(&());
    }
}

impl Widget for Window {
    fn node(&self) -> &Node {
        &self.node
    }

    fn children(&self) -> Vec<Rc<dyn Widget>> {
        self.content().into_iter().collect()
    }

    fn as_top_level(&self) -> Option<Rc<dyn TopLevel>> {
        self.this.upgrade().map(|w| w as Rc<dyn TopLevel>)
    }

    fn detach_child(&self, child: &Rc<dyn Widget>) {
        let mut content = self.content.borrow_mut();
        if content.as_ref().is_some_and(|c| same_widget(c, child)) {
            *content = None;
        }
    }
}

impl TopLevel for Window {
    fn closed(&self) -> &Signal<()> {
        &self.closed
    }
}

impl View for Window {
    fn top_level(&self) -> Option<Rc<dyn TopLevel>> {
        self.as_top_level()
    }

    fn hierarchy_changed(&self) -> &Signal<()> {
        self.node.hierarchy_changed()
    }
}
