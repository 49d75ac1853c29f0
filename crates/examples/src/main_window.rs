use std::rc::Rc;

use arbor::{
    Context, Controller, Module,
    config::RuntimeConfig,
    derive_commands,
    error::Result,
    model::PropertyBag,
    signal::Signal,
    view::{TopLevel, View},
    widgets::{Button, Panel, Window},
};
use tracing::debug;

use crate::person_table::{PersonTableController, PersonTableView, PersonVm};

/// The application's main window: a content panel and a quit button.
pub struct MainWindowView {
    /// Top-level window.
    pub window: Rc<Window>,
    /// Window content.
    pub root: Rc<Panel>,
    /// Closes the window.
    pub quit: Rc<Button>,
}

impl MainWindowView {
    /// Build the window.
    pub fn new(title: &str) -> Rc<Self> {
        let window = Window::new(title);
        let root = Panel::new();
        let quit = Rc::new(Button::new("Quit"));
        root.add(&quit);
        window.set_content(&root);
        Rc::new(Self { window, root, quit })
    }
}

impl View for MainWindowView {
    fn top_level(&self) -> Option<Rc<dyn TopLevel>> {
        self.window.top_level()
    }

    fn hierarchy_changed(&self) -> &Signal<()> {
        self.window.hierarchy_changed()
    }
}

/// Controller for the main window.
#[derive(Default)]
pub struct MainWindowController;

#[derive_commands]
impl MainWindowController {
    /// Close the main window.
    #[command]
    fn quit(&self, cx: &Context<Self>) {
        if let Some(view) = cx.view() {
            view.window.close();
        }
    }
}

impl Controller for MainWindowController {
    type View = MainWindowView;
    type Model = PropertyBag;

    fn can_execute(&self, _cx: &Context<Self>, command: &str) -> bool {
        command == "quit"
    }

    fn on_initialized(&self, cx: &Context<Self>) -> Result<()> {
        if let Some(view) = cx.view() {
            cx.bind_button_to_command(&view.quit, "quit")?;
        }
        Ok(())
    }

    fn on_unload(&self, _cx: &Context<Self>) {
        debug!("main window unloaded");
    }
}

/// The assembled application: the main window with the person form
/// embedded in it.
pub struct App {
    /// Main window module.
    pub main: Module<MainWindowController>,
    /// Person form module.
    pub person: Module<PersonTableController>,
}

impl App {
    /// Build and initialize the application.
    pub fn open(config: &RuntimeConfig) -> Result<Self> {
        let view = MainWindowView::new("People");
        let main = Module::with_config(config, view.clone(), MainWindowController::default)?;

        // The form is initialized before it joins the window, so its
        // controller starts watching for close once it is added.
        let form = PersonTableView::new();
        let owner = Rc::downgrade(&view.window);
        let person = Module::with_config(config, form.clone(), move || {
            PersonTableController::new(owner, config.clone())
        })?;
        view.root.add(&form.root);

        if !person.is_designer() {
            person.set_model(PersonVm::new())?;
        }
        view.window.show();
        Ok(Self { main, person })
    }

    /// The main window.
    pub fn window(&self) -> &Rc<Window> {
        &self.main.view().window
    }

    /// The person form.
    pub fn form(&self) -> &Rc<PersonTableView> {
        self.person.view()
    }
}
