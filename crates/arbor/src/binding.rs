//! Declarative field-to-property bindings.
//!
//! A controller declares its [`FieldBinding`] rules once, at initialization.
//! The rules never change afterwards; only the model they are attached to
//! does.

use std::{
    fmt,
    rc::{Rc, Weak},
};

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::{
    error::BindingError,
    model::ObservableModel,
    signal::HandlerId,
    value::Value,
    view::Field,
};

/// Direction of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingMode {
    /// Model to view only.
    OneWay,
    /// Model to view, and user edits back into the model.
    #[default]
    TwoWay,
}

/// When a two-way binding writes user edits back into the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateTrigger {
    /// On every change, as the user types.
    PropertyChanged,
    /// When the field commits, e.g. on focus loss.
    Commit,
}

/// One rule coupling a field to a model property.
pub struct FieldBinding {
    /// The bound field.
    field: Rc<dyn Field>,
    /// Model property name.
    property: String,
    /// Transfer direction.
    mode: BindingMode,
    /// Explicit trigger; the field's default applies when unset.
    trigger: Option<UpdateTrigger>,
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("property", &self.property)
            .field("mode", &self.mode)
            .field("trigger", &self.trigger())
            .finish()
    }
}

impl FieldBinding {
    /// Set the binding direction.
    pub fn mode(&mut self, mode: BindingMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Make this a model-to-view binding.
    pub fn one_way(&mut self) -> &mut Self {
        self.mode(BindingMode::OneWay)
    }

    /// Override the field's default update trigger.
    pub fn update_on(&mut self, trigger: UpdateTrigger) -> &mut Self {
        self.trigger = Some(trigger);
        self
    }

    /// Write back on every change.
    pub fn on_every_change(&mut self) -> &mut Self {
        self.update_on(UpdateTrigger::PropertyChanged)
    }

    /// Bound property name.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Binding direction.
    pub fn binding_mode(&self) -> BindingMode {
        self.mode
    }

    /// Effective update trigger.
    pub fn trigger(&self) -> UpdateTrigger {
        self.trigger.unwrap_or_else(|| self.field.default_trigger())
    }

    /// Push the model's current value into the field.
    fn push<M: ObservableModel>(&self, model: &M) {
        let value = model.property(&self.property).unwrap_or(Value::Null);
        self.field.set_value(&value);
    }
}

/// Listener handles installed for one rule while attached.
struct Link {
    /// Listener on the model's property changes.
    model_listener: HandlerId,
    /// Listener on the field's trigger signal, for two-way rules.
    field_listener: Option<HandlerId>,
}

/// The model a table is attached to and the listeners it installed.
struct Activation<M> {
    /// Attached model.
    model: Rc<M>,
    /// One link per rule, in rule order.
    links: Vec<Link>,
}

/// The set of binding rules a controller declared.
pub struct BindingTable<M: ObservableModel> {
    /// Rules in declaration order.
    rules: Vec<FieldBinding>,
    /// Present while attached to a model.
    active: Option<Activation<M>>,
}

impl<M: ObservableModel> Default for BindingTable<M> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            active: None,
        }
    }
}

impl<M: ObservableModel> fmt::Debug for BindingTable<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingTable")
            .field("rules", &self.rules)
            .field("attached", &self.active.is_some())
            .finish()
    }
}

impl<M: ObservableModel> BindingTable<M> {
    /// Construct an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a two-way binding from `field` to `property`, using the
    /// field's default trigger. The returned rule can be adjusted in place.
    pub fn add<F: Field>(&mut self, field: &Rc<F>, property: &str) -> &mut FieldBinding {
        let field: Rc<dyn Field> = field.clone();
        self.rules.push(FieldBinding {
            field,
            property: property.to_string(),
            mode: BindingMode::default(),
            trigger: None,
        });
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }

    /// Declared rules.
    pub fn rules(&self) -> &[FieldBinding] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are declared.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Is the table attached to a model?
    pub fn is_attached(&self) -> bool {
        self.active.is_some()
    }

    /// The model the table is attached to.
    pub fn model(&self) -> Option<&Rc<M>> {
        self.active.as_ref().map(|a| &a.model)
    }

    /// Attach to `model`: push its values into every field and install the
    /// listeners that keep both directions live. Any previous attachment is
    /// detached first. Fails without attaching if a bound property does not
    /// exist on the model.
    pub fn attach(&mut self, model: &Rc<M>) -> Result<(), BindingError> {
        self.detach();
        self.validate(model)?;

        let mut links = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            rule.push(model.as_ref());
            links.push(Link {
                model_listener: Self::watch_model(rule, model),
                field_listener: Self::watch_field(rule, model),
            });
        }
        trace!(rules = links.len(), "bindings attached");
        self.active = Some(Activation {
            model: model.clone(),
            links,
        });
        Ok(())
    }

    /// Check that `model` exposes every bound property, without attaching.
    pub fn validate(&self, model: &M) -> Result<(), BindingError> {
        match self
            .rules
            .iter()
            .find(|r| model.property(&r.property).is_none())
        {
            Some(rule) => Err(BindingError::UnknownProperty(rule.property.clone())),
            None => Ok(()),
        }
    }

    /// Remove every listener installed by [`BindingTable::attach`].
    pub fn detach(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        for (rule, link) in self.rules.iter().zip(active.links) {
            active.model.changes().unsubscribe(link.model_listener);
            if let Some(id) = link.field_listener {
                rule.field.trigger_signal(rule.trigger()).disconnect(id);
            }
        }
        trace!("bindings detached");
    }

    /// Model to view: refresh the field when its property changes.
    fn watch_model(rule: &FieldBinding, model: &Rc<M>) -> HandlerId {
        let property = rule.property.clone();
        let field: Weak<dyn Field> = Rc::downgrade(&rule.field);
        let source = Rc::downgrade(model);
        model.changes().subscribe(move |changed| {
            if changed != property {
                return;
            }
            if let (Some(field), Some(model)) = (field.upgrade(), source.upgrade()) {
                field.set_value(&model.property(&property).unwrap_or(Value::Null));
            }
        })
    }

    /// View to model: write user edits back, for two-way rules.
    fn watch_field(rule: &FieldBinding, model: &Rc<M>) -> Option<HandlerId> {
        if rule.mode != BindingMode::TwoWay {
            return None;
        }
        let property = rule.property.clone();
        let field: Weak<dyn Field> = Rc::downgrade(&rule.field);
        let target = Rc::downgrade(model);
        let id = rule
            .field
            .trigger_signal(rule.trigger())
            .connect(move |_| {
                let (Some(field), Some(model)) = (field.upgrade(), target.upgrade()) else {
                    return;
                };
                if let Err(e) = model.set_property(&property, field.value()) {
                    warn!(property = %property, error = %e, "binding write-back failed");
                }
            });
        Some(id)
    }
}

impl<M: ObservableModel> Drop for BindingTable<M> {
    fn drop(&mut self) {
        self.detach();
    }
}
