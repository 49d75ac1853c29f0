//! Integration tests for binding tables.

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use arbor::{
        binding::{BindingMode, BindingTable, UpdateTrigger},
        error::BindingError,
        model::{ObservableModel, PropertyBag},
        testing::record_changes,
        value::Value,
        view::Field,
        widgets::TextField,
    };
    use pretty_assertions::assert_eq;

    fn bag(name: &str, age: i64) -> Rc<PropertyBag> {
        Rc::new(PropertyBag::with_values([
            ("name", Value::Text(name.into())),
            ("age", Value::Int(age)),
        ]))
    }

    #[test]
    fn attach_pushes_values_and_tracks_changes() {
        let name = Rc::new(TextField::new());
        let mut table = BindingTable::<PropertyBag>::new();
        table.add(&name, "name");
        let model = bag("Ann", 25);

        table.attach(&model).unwrap();
        assert!(table.is_attached());
        assert_eq!(name.text(), "Ann");

        model.set("name", Value::Text("Bob".into()));
        assert_eq!(name.text(), "Bob");
        // Other properties leave the field alone.
        model.set("age", Value::Int(30));
        assert_eq!(name.text(), "Bob");
    }

    #[test]
    fn detach_removes_every_listener() {
        let name = Rc::new(TextField::new());
        let mut table = BindingTable::<PropertyBag>::new();
        table.add(&name, "name");
        let model = bag("Ann", 25);

        table.attach(&model).unwrap();
        assert_eq!(model.changes().listener_count(), 1);
        assert_eq!(name.committed().len(), 1);

        table.detach();
        assert!(!table.is_attached());
        assert_eq!(model.changes().listener_count(), 0);
        assert_eq!(name.committed().len(), 0);

        model.set("name", Value::Text("Bob".into()));
        assert_eq!(name.text(), "Ann");
        table.detach();
    }

    #[test]
    fn reattach_moves_to_the_new_model() {
        let name = Rc::new(TextField::new());
        let mut table = BindingTable::<PropertyBag>::new();
        table.add(&name, "name");
        let first = bag("Ann", 25);
        let second = bag("Cy", 40);

        table.attach(&first).unwrap();
        table.attach(&second).unwrap();
        assert_eq!(first.changes().listener_count(), 0);
        assert_eq!(name.text(), "Cy");

        name.input("Dee");
        name.commit();
        assert_eq!(second.get("name"), Some(Value::Text("Dee".into())));
        assert_eq!(first.get("name"), Some(Value::Text("Ann".into())));
        assert!(Rc::ptr_eq(table.model().unwrap(), &second));
    }

    #[test]
    fn trigger_controls_write_back() {
        let name = Rc::new(TextField::new());
        let age = Rc::new(TextField::new());
        let mut table = BindingTable::<PropertyBag>::new();
        table.add(&name, "name");
        table
            .add(&age, "age")
            .update_on(UpdateTrigger::PropertyChanged);
        assert_eq!(table.rules()[0].trigger(), UpdateTrigger::Commit);
        assert_eq!(table.rules()[1].trigger(), UpdateTrigger::PropertyChanged);

        let model = bag("Ann", 25);
        table.attach(&model).unwrap();

        name.input("Bo");
        assert_eq!(model.get("name"), Some(Value::Text("Ann".into())));
        name.commit();
        assert_eq!(model.get("name"), Some(Value::Text("Bo".into())));

        age.input("26");
        assert_eq!(model.get("age"), Some(Value::Int(26)));
    }

    #[test]
    fn commit_without_edit_keeps_null() {
        let field = Rc::new(TextField::new());
        let mut table = BindingTable::<PropertyBag>::new();
        table.add(&field, "name");
        let model = Rc::new(PropertyBag::from_json(r#"{"name": null}"#).unwrap());
        table.attach(&model).unwrap();
        let (rec, _) = record_changes(&*model);

        field.commit();
        assert_eq!(model.to_json(), r#"{"name":null}"#);
        assert!(rec.is_empty());

        field.input("Ann");
        field.commit();
        assert_eq!(model.get("name"), Some(Value::Text("Ann".into())));
        assert_eq!(rec.entries(), vec!["name"]);
    }

    #[test]
    fn bad_text_is_not_written_back() {
        let age = Rc::new(TextField::new());
        let mut table = BindingTable::<PropertyBag>::new();
        table.add(&age, "age").on_every_change();
        let model = bag("Ann", 25);
        table.attach(&model).unwrap();

        age.type_text("x");
        assert_eq!(model.get("age"), Some(Value::Int(25)));
        assert_eq!(age.text(), "25x");
    }

    #[test]
    fn field_default_trigger_is_respected() {
        let field = Rc::new(TextField::new().with_default_trigger(UpdateTrigger::PropertyChanged));
        let mut table = BindingTable::<PropertyBag>::new();
        table.add(&field, "name");
        let model = bag("Ann", 25);
        table.attach(&model).unwrap();
        field.type_text("e");
        assert_eq!(model.get("name"), Some(Value::Text("Anne".into())));
    }

    #[test]
    fn one_way_never_writes_back() {
        let name = Rc::new(TextField::new());
        let mut table = BindingTable::<PropertyBag>::new();
        table.add(&name, "name").one_way();
        assert_eq!(table.rules()[0].binding_mode(), BindingMode::OneWay);
        let model = bag("Ann", 25);
        table.attach(&model).unwrap();
        assert_eq!(name.committed().len(), 0);

        name.input("Bob");
        name.commit();
        assert_eq!(model.get("name"), Some(Value::Text("Ann".into())));
        model.set("name", Value::Text("Cy".into()));
        assert_eq!(name.text(), "Cy");
    }

    #[test]
    fn unknown_properties_fail_attach() {
        let field = Rc::new(TextField::new());
        let mut table = BindingTable::<PropertyBag>::new();
        table.add(&field, "nickname");
        let model = bag("Ann", 25);
        assert_eq!(
            table.attach(&model).unwrap_err(),
            BindingError::UnknownProperty("nickname".into())
        );
        assert!(!table.is_attached());
        assert_eq!(model.changes().listener_count(), 0);
        assert_eq!(field.text(), "");
    }

    #[test]
    fn dropping_the_table_detaches() {
        let field = Rc::new(TextField::new());
        let model = bag("Ann", 25);
        {
            let mut table = BindingTable::<PropertyBag>::new();
            table.add(&field, "name");
            table.attach(&model).unwrap();
            assert_eq!(model.changes().listener_count(), 1);
        }
        assert_eq!(model.changes().listener_count(), 0);
        assert_eq!(field.committed().len(), 0);
    }
}
