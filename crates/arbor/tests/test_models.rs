//! Integration tests for model notifications and model replacement.

mod support;

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use arbor::{
        Context, Controller,
        binding::BindingTable,
        derive_commands,
        error::{BindingError, Error},
        model::{ObservableModel, PropertyBag},
        signal::Signal,
        testing::record_changes,
        value::Value,
        view::{TopLevel, View},
        widgets::{Panel, TextField},
    };
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use crate::support::{Person, PersonController, PersonForm};

    #[test]
    fn model_swap_releases_old_model() {
        let cx = Context::new(PersonController::binding_buttons());
        let form = PersonForm::new();
        cx.initialize(form.clone()).unwrap();

        let models: Vec<_> = (0..4).map(|i| Person::with("p", i)).collect();
        for (i, model) in models.iter().enumerate() {
            cx.set_model(model.clone()).unwrap();
            assert!(model.changes().listener_count() > 0);
            for old in &models[..i] {
                assert_eq!(old.changes().listener_count(), 0);
            }
        }

        // Changes on a replaced model never reach the controller or view.
        cx.controller().log.clear();
        models[0].set_name(Some("ghost"));
        assert!(cx.controller().log.is_empty());
        assert_eq!(form.name.text(), "p");
        assert_eq!(form.age.text(), "3");
    }

    #[test]
    fn setting_the_same_model_is_a_noop() {
        let cx = Context::new(PersonController::default());
        cx.initialize(PersonForm::new()).unwrap();
        let person = Person::new();
        cx.set_model(person.clone()).unwrap();
        let listeners = person.changes().listener_count();
        cx.set_model(person.clone()).unwrap();
        assert_eq!(person.changes().listener_count(), listeners);
        assert_eq!(cx.controller().log.count("model set"), 1);
        assert_eq!(cx.controller().log.count("model replaced"), 0);
        assert!(Rc::ptr_eq(&cx.model().unwrap(), &person));
    }

    #[test]
    fn model_hooks_see_old_and_new() {
        let cx = Context::new(PersonController::default());
        cx.initialize(PersonForm::new()).unwrap();
        cx.set_model(Person::new()).unwrap();
        cx.set_model(Person::new()).unwrap();
        assert_eq!(
            cx.controller().log.entries(),
            vec!["initialized", "model set", "model replaced"]
        );
    }

    #[test]
    fn notifications_are_not_coalesced() {
        let person = Person::new();
        let (rec, _) = record_changes(&*person);
        person.set_name(Some("a"));
        person.set_name(Some("b"));
        person.set_name(Some("b"));
        person.set_age(Some(1));
        person.set_name(None);
        assert_eq!(rec.entries(), vec!["name", "name", "age", "name"]);
    }

    #[test]
    fn listeners_fire_in_subscription_order() {
        let person = Person::new();
        let (first, _) = record_changes(&*person);
        let f = first.clone();
        person.changes().subscribe(move |p| f.push(format!("second {p}")));
        person.set_age(Some(3));
        assert_eq!(first.entries(), vec!["age", "second age"]);
    }

    /// A form with a single name field bound to a property bag.
    struct BagForm {
        root: Rc<Panel>,
        name: Rc<TextField>,
    }

    impl View for BagForm {
        fn top_level(&self) -> Option<Rc<dyn TopLevel>> {
            self.root.top_level()
        }

        fn hierarchy_changed(&self) -> &Signal<()> {
            self.root.hierarchy_changed()
        }
    }

    #[derive(Default)]
    struct BagController {
        changes: Cell<usize>,
    }

    #[derive_commands]
    impl BagController {}

    impl Controller for BagController {
        type View = BagForm;
        type Model = PropertyBag;

        fn setup_bindings(&self, view: &BagForm, bindings: &mut BindingTable<PropertyBag>) {
            bindings.add(&view.name, "name");
        }

        fn on_model_changed(
            &self,
            _cx: &Context<Self>,
            _old: Option<&Rc<PropertyBag>>,
            _new: &Rc<PropertyBag>,
        ) {
            self.changes.set(self.changes.get() + 1);
        }
    }

    #[test]
    fn rejected_model_leaves_the_old_one_attached() {
        let form = Rc::new(BagForm {
            root: Panel::new(),
            name: Rc::new(TextField::new()),
        });
        form.root.add(&form.name);
        let cx = Context::new(BagController::default());
        cx.initialize(form.clone()).unwrap();

        let good = Rc::new(PropertyBag::with_values([("name", Value::Text("Ann".into()))]));
        let bad = Rc::new(PropertyBag::with_values([("age", Value::Int(3))]));
        cx.set_model(good.clone()).unwrap();
        let listeners = good.changes().listener_count();

        let err = cx.set_model(bad.clone()).unwrap_err();
        assert!(matches!(
            err,
            Error::Binding(BindingError::UnknownProperty(ref p)) if p == "name"
        ));
        assert!(Rc::ptr_eq(&cx.model().unwrap(), &good));
        assert_eq!(good.changes().listener_count(), listeners);
        assert_eq!(bad.changes().listener_count(), 0);
        assert_eq!(cx.controller().changes.get(), 1);

        // The old model still drives the field, and the rejected model is
        // rejected again rather than treated as current.
        good.set("name", Value::Text("Cy".into()));
        assert_eq!(form.name.text(), "Cy");
        assert!(cx.set_model(bad).is_err());
    }

    proptest! {
        #[test]
        fn one_notification_per_actual_change(ages in proptest::collection::vec(proptest::option::of(0i64..4), 0..40)) {
            let person = Person::new();
            let (rec, _) = record_changes(&*person);
            let mut current = None;
            let mut expected = 0;
            for age in ages {
                let changed = person.set_age(age);
                prop_assert_eq!(changed, age != current);
                if age != current {
                    expected += 1;
                    current = age;
                }
            }
            prop_assert_eq!(rec.count("age"), expected);
            prop_assert_eq!(person.age(), current);
        }

        #[test]
        fn replaced_models_are_fully_released(count in 1usize..6) {
            let cx = Context::new(PersonController::default());
            cx.initialize(PersonForm::new()).unwrap();
            let models: Vec<_> = (0..count).map(|_| Person::new()).collect();
            for m in &models {
                cx.set_model(m.clone()).unwrap();
            }
            for m in &models[..count - 1] {
                prop_assert_eq!(m.changes().listener_count(), 0);
            }
            // One controller listener plus one per binding rule.
            prop_assert_eq!(models[count - 1].changes().listener_count(), 3);
        }
    }
}
