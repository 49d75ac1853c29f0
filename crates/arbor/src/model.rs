//! Observable view-models.

use std::{
    cell::{Ref, RefCell},
    collections::BTreeMap,
    fmt,
};

use tracing::trace;

use crate::{
    error::BindingError,
    signal::{HandlerId, Signal},
    value::{FromValue, Value},
};

/// Listener registry for a model's property-change notifications.
///
/// The model owns the list. Subscribers hold the returned [`HandlerId`] and
/// are responsible for unsubscribing.
#[derive(Default, Debug)]
pub struct PropertyChanges {
    /// Listeners, called with the changed property name.
    signal: Signal<str>,
}

impl PropertyChanges {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener. Listeners fire in subscription order.
    pub fn subscribe(&self, listener: impl Fn(&str) + 'static) -> HandlerId {
        self.signal.connect(listener)
    }

    /// Remove a listener. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        self.signal.disconnect(id)
    }

    /// Notify every listener that `property` changed.
    pub fn raise(&self, property: &str) {
        trace!(property, listeners = self.signal.len(), "property changed");
        self.signal.emit(property);
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.signal.len()
    }
}

/// A model that reports property changes and exposes its properties by name.
///
/// Setters take `&self`; implementors keep property state in cells such as
/// [`Property`] so listeners can read the model during a notification.
pub trait ObservableModel: 'static {
    /// The model's listener registry.
    fn changes(&self) -> &PropertyChanges;

    /// Read a property by name. `None` means no such property.
    fn property(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Write a property by name, used by two-way bindings.
    fn set_property(&self, name: &str, _value: Value) -> Result<(), BindingError> {
        Err(BindingError::UnknownProperty(name.to_string()))
    }
}

/// A single observable property value.
pub struct Property<T> {
    /// Current value.
    value: RefCell<T>,
}

impl<T: Default> Default for Property<T> {
    fn default() -> Self {
        Self {
            value: RefCell::new(T::default()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.borrow().fmt(f)
    }
}

impl<T: PartialEq + Clone> Property<T> {
    /// Construct a property holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
        }
    }

    /// Clone out the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Borrow the current value.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.value.borrow()
    }

    /// Store `value` and raise one notification for `name` if it differs
    /// from the current value. Returns whether anything changed.
    pub fn set(&self, changes: &PropertyChanges, name: &str, value: T) -> bool {
        {
            let mut current = self.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        changes.raise(name);
        true
    }

    /// Decode `value` and store it as [`Property::set`] does.
    pub fn set_value(
        &self,
        changes: &PropertyChanges,
        name: &str,
        value: &Value,
    ) -> Result<bool, BindingError>
    where
        T: FromValue,
    {
        let decoded = T::from_value(value).map_err(|e| e.with_property(name))?;
        Ok(self.set(changes, name, decoded))
    }
}

/// A model whose properties are an open set of named [`Value`]s.
#[derive(Default, Debug)]
pub struct PropertyBag {
    /// Listener registry.
    changes: PropertyChanges,
    /// Property values by name.
    values: RefCell<BTreeMap<String, Value>>,
}

impl PropertyBag {
    /// Construct an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a bag with the given properties, without notifying.
    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            changes: PropertyChanges::new(),
            values: RefCell::new(values.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// Parse a bag from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let values: BTreeMap<String, Value> = serde_json::from_str(json)?;
        Ok(Self::with_values(values))
    }

    /// Render the current properties as a JSON object.
    pub fn to_json(&self) -> String {
        // A map of untagged scalars always serializes.
        serde_json::to_string(&*self.values.borrow()).unwrap_or_default()
    }

    /// Read a property.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.borrow().get(name).cloned()
    }

    /// Write a property, adding it if absent. Notifies once if the stored
    /// value changed.
    pub fn set(&self, name: &str, value: Value) -> bool {
        {
            let mut values = self.values.borrow_mut();
            if values.get(name) == Some(&value) {
                return false;
            }
            values.insert(name.to_string(), value);
        }
        self.changes.raise(name);
        true
    }

    /// Property names in lexical order.
    pub fn names(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }
}

impl ObservableModel for PropertyBag {
    fn changes(&self) -> &PropertyChanges {
        &self.changes
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.get(name)
    }

    /// Writes keep the stored value's kind: text is parsed into numbers and
    /// booleans, and blank text clears those to `Null`. A `Null` property
    /// stays `Null` when given blank text.
    fn set_property(&self, name: &str, value: Value) -> Result<(), BindingError> {
        let Some(current) = self.get(name) else {
            return Err(BindingError::UnknownProperty(name.to_string()));
        };
        let value = coerce(&current, value).map_err(|e| e.with_property(name))?;
        self.set(name, value);
        Ok(())
    }
}

/// Convert `value` to the kind of `current`.
fn coerce(current: &Value, value: Value) -> Result<Value, BindingError> {
    let coerced = match current {
        Value::Int(_) => Option::<i64>::from_value(&value)?.map_or(Value::Null, Value::Int),
        Value::Float(_) => Option::<f64>::from_value(&value)?.map_or(Value::Null, Value::Float),
        Value::Bool(_) => Option::<bool>::from_value(&value)?.map_or(Value::Null, Value::Bool),
        Value::Null => match &value {
            Value::Text(text) if text.trim().is_empty() => Value::Null,
            _ => value,
        },
        Value::Text(_) => value,
    };
    Ok(coerced)
}
