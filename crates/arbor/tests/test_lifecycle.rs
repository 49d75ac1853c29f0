//! Integration tests for the controller lifecycle and window-close handling.

mod support;

#[cfg(test)]
mod tests {
    use arbor::{
        Context, Lifecycle,
        commands::{CommandRegistry, Commands},
        error::{Error, ErrorKind},
        model::{ObservableModel, PropertyBag},
        view::{Control, Field, TopLevel, View},
        widgets::{Panel, Window},
    };
    use pretty_assertions::assert_eq;

    use crate::support::{Person, PersonController, PersonForm};

    #[test]
    fn operations_before_initialize_fail() {
        let cx = Context::new(PersonController::default());
        assert_eq!(cx.lifecycle(), Lifecycle::Uninitialized);
        assert!(matches!(cx.command("save"), Err(Error::NotInitialized)));
        assert!(matches!(
            cx.refresh_can_execute_command("save"),
            Err(Error::NotInitialized)
        ));
        assert!(matches!(
            cx.refresh_can_execute_commands(),
            Err(Error::NotInitialized)
        ));
        let form = PersonForm::new();
        let err = cx.bind_button_to_command(&form.save, "save").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert!(cx.command_names().is_empty());
    }

    #[test]
    fn initialize_is_one_shot() {
        let cx = Context::new(PersonController::default());
        cx.initialize(PersonForm::new()).unwrap();
        assert!(cx.is_initialized());
        assert!(matches!(
            cx.initialize(PersonForm::new()),
            Err(Error::AlreadyInitialized)
        ));
        assert_eq!(cx.controller().log.count("initialized"), 1);
        assert_eq!(cx.command_names(), vec!["clear", "save"]);
    }

    #[test]
    fn model_set_before_initialize_is_bound_on_initialize() {
        let cx = Context::new(PersonController::default());
        let person = Person::with("Ann", 25);
        cx.set_model(person.clone()).unwrap();
        assert_eq!(cx.controller().log.entries(), vec!["model set"]);

        let form = PersonForm::new();
        cx.initialize(form.clone()).unwrap();
        assert_eq!(form.name.text(), "Ann");
        assert_eq!(form.age.text(), "25");
        assert!(cx.command("save").unwrap().can_execute());
    }

    #[test]
    fn close_unloads_exactly_once() {
        let window = Window::new("main");
        let form = PersonForm::new();
        window.set_content(&form.root);

        let cx = Context::new(PersonController::binding_buttons());
        cx.initialize(form.clone()).unwrap();
        assert!(cx.is_watching_close());

        window.close();
        window.close();
        assert_eq!(cx.lifecycle(), Lifecycle::Unloaded);
        assert_eq!(cx.controller().log.count("unloaded"), 1);
        assert_eq!(window.closed().len(), 0);
    }

    #[test]
    fn close_watch_waits_for_reparent() {
        let form = PersonForm::new();
        let cx = Context::new(PersonController::default());
        cx.initialize(form.clone()).unwrap();
        assert!(!cx.is_watching_close());

        // Moving into a panel that has no window changes nothing.
        let outer = Panel::new();
        outer.add(&form.root);
        assert!(!cx.is_watching_close());

        let window = Window::new("main");
        window.set_content(&outer);
        assert!(cx.is_watching_close());
        assert_eq!(window.closed().len(), 1);

        // Further reparenting does not install a second watch.
        let other = Window::new("other");
        other.set_content(&outer);
        window.set_content(&outer);
        assert_eq!(window.closed().len(), 1);
        assert_eq!(other.closed().len(), 0);

        window.close();
        assert_eq!(cx.lifecycle(), Lifecycle::Unloaded);
        assert_eq!(cx.controller().log.count("unloaded"), 1);
    }

    #[test]
    fn close_before_initialize_is_ignored() {
        let window = Window::new("main");
        let form = PersonForm::new();
        window.set_content(&form.root);
        window.close();

        let cx = Context::new(PersonController::default());
        cx.initialize(form).unwrap();
        assert!(cx.is_initialized());
    }

    #[test]
    fn unload_releases_everything() {
        let window = Window::new("main");
        let form = PersonForm::new();
        window.set_content(&form.root);
        let person = Person::with("Ann", 25);

        let cx = Context::new(PersonController::binding_buttons());
        cx.initialize(form.clone()).unwrap();
        cx.set_model(person.clone()).unwrap();
        assert_eq!(cx.bound_controls("save"), 1);

        window.close();
        assert_eq!(person.changes.listener_count(), 0);
        assert_eq!(cx.bound_controls("save"), 0);
        assert!(!cx.is_watching_close());

        // The form is no longer wired to the model.
        form.name.input("Bob");
        form.name.commit();
        assert_eq!(person.name().as_deref(), Some("Ann"));
        form.save.click();
        assert_eq!(cx.controller().saves.get(), 0);

        assert!(matches!(cx.command("save"), Err(Error::Unloaded)));
        assert!(matches!(cx.set_model(Person::new()), Err(Error::Unloaded)));
        assert!(matches!(
            cx.initialize(PersonForm::new()),
            Err(Error::Unloaded)
        ));
    }

    #[test]
    fn window_view_closes_itself() {
        let cx = Context::new(WindowController);
        let window = Window::new("main");
        cx.initialize(window.clone()).unwrap();
        assert!(cx.is_watching_close());
        window.close();
        assert_eq!(cx.lifecycle(), Lifecycle::Unloaded);
    }

    #[test]
    fn dropping_a_live_context_disconnects_everything() {
        let window = Window::new("main");
        let form = PersonForm::new();
        window.set_content(&form.root);
        let cx = Context::new(PersonController::binding_buttons());
        cx.initialize(form.clone()).unwrap();
        let person = Person::with("Ann", 25);
        cx.set_model(person.clone()).unwrap();
        assert_eq!(window.closed().len(), 1);
        assert_eq!(form.save.activated().len(), 1);

        drop(cx);
        assert_eq!(person.changes().listener_count(), 0);
        assert_eq!(form.save.activated().len(), 0);
        assert_eq!(form.clear.activated().len(), 0);
        assert_eq!(form.name.committed().len(), 0);
        assert_eq!(window.closed().len(), 0);
    }

    #[test]
    fn dropping_an_unattached_context_releases_the_reparent_watch() {
        let form = PersonForm::new();
        let cx = Context::new(PersonController::default());
        cx.initialize(form.clone()).unwrap();
        assert_eq!(form.root.hierarchy_changed().len(), 1);
        drop(cx);
        assert_eq!(form.root.hierarchy_changed().len(), 0);
    }

    #[test]
    fn duplicate_command_names_fail_initialize() {
        let window = Window::new("main");
        let cx = Context::new(Duplicated);
        let err = cx.initialize(window.clone()).unwrap_err();
        assert!(matches!(err, Error::DuplicateCommand(ref name) if name == "a"));
        assert_eq!(err.kind(), ErrorKind::Duplicate);
        assert_eq!(cx.lifecycle(), Lifecycle::Uninitialized);
        assert!(cx.view().is_none());
        assert!(cx.command_names().is_empty());
        assert_eq!(window.closed().len(), 0);
    }

    #[test]
    fn empty_command_names_fail_initialize() {
        let window = Window::new("main");
        let cx = Context::new(Unnamed);
        let err = cx.initialize(window.clone()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(cx.lifecycle(), Lifecycle::Uninitialized);
        assert_eq!(window.closed().len(), 0);
    }

    /// Registers "a" twice.
    struct Duplicated;

    impl Commands for Duplicated {
        fn register_commands(registry: &mut CommandRegistry<Self>) -> arbor::error::Result<()>
        where
            Self: arbor::Controller,
        {
            registry.register("a", |_, _| Ok(()))?;
            registry.register("a", |_, _| Ok(()))
        }
    }

    impl arbor::Controller for Duplicated {
        type View = Window;
        type Model = PropertyBag;
    }

    /// Registers a command with an empty name.
    struct Unnamed;

    impl Commands for Unnamed {
        fn register_commands(registry: &mut CommandRegistry<Self>) -> arbor::error::Result<()>
        where
            Self: arbor::Controller,
        {
            registry.register("ok", |_, _| Ok(()))?;
            registry.register("", |_, _| Ok(()))
        }
    }

    impl arbor::Controller for Unnamed {
        type View = Window;
        type Model = PropertyBag;
    }

    struct WindowController;

    #[arbor::derive_commands]
    impl WindowController {}

    impl arbor::Controller for WindowController {
        type View = Window;
        type Model = PropertyBag;
    }
}
