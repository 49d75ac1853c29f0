use std::{cell::RefCell, rc::Rc};

use arbor::{
    Context, Controller, derive_commands,
    error::Result,
    model::PropertyBag,
    signal::Signal,
    view::{TopLevel, View},
    widgets::{Button, Panel, Window},
};
use tracing::debug;

/// A modal dialog with a message and an OK button.
pub struct ActionDialogView {
    /// The dialog window.
    pub window: Rc<Window>,
    /// Dialog body.
    pub body: Rc<Panel>,
    /// Confirms and closes the dialog.
    pub ok: Rc<Button>,
    /// Message shown in the body.
    message: RefCell<String>,
}

impl ActionDialogView {
    /// Build a dialog, owned by `owner` when given.
    pub fn new(owner: Option<&Rc<Window>>) -> Rc<Self> {
        let window = match owner {
            Some(owner) => Window::dialog(owner, "Action"),
            None => Window::new("Action"),
        };
        let body = Panel::new();
        let ok = Rc::new(Button::new("OK"));
        body.add(&ok);
        window.set_content(&body);
        Rc::new(Self {
            window,
            body,
            ok,
            message: RefCell::new(String::new()),
        })
    }

    /// The message text.
    pub fn message(&self) -> String {
        self.message.borrow().clone()
    }

    /// Replace the message text.
    pub fn set_message(&self, message: impl Into<String>) {
        *self.message.borrow_mut() = message.into();
    }
}

impl View for ActionDialogView {
    fn top_level(&self) -> Option<Rc<dyn TopLevel>> {
        self.window.top_level()
    }

    fn hierarchy_changed(&self) -> &Signal<()> {
        self.window.hierarchy_changed()
    }
}

/// Controller for [`ActionDialogView`]. The dialog has no model of its own.
#[derive(Default)]
pub struct ActionDialogController;

#[derive_commands]
impl ActionDialogController {
    /// Close the dialog.
    #[command]
    fn ok(&self, cx: &Context<Self>) {
        if let Some(view) = cx.view() {
            view.window.close();
        }
    }
}

impl Controller for ActionDialogController {
    type View = ActionDialogView;
    type Model = PropertyBag;

    fn can_execute(&self, _cx: &Context<Self>, _command: &str) -> bool {
        true
    }

    fn on_initialized(&self, cx: &Context<Self>) -> Result<()> {
        if let Some(view) = cx.view() {
            cx.bind_button_to_command(&view.ok, "ok")?;
        }
        Ok(())
    }

    fn on_unload(&self, _cx: &Context<Self>) {
        debug!("action dialog closed");
    }
}
