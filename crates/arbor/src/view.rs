//! Contracts between the controller core and the widget toolkit.
//!
//! arbor never draws anything. A toolkit (or the headless widgets in
//! [`crate::widgets`]) implements these traits and the core drives them.

use std::rc::Rc;

use crate::{binding::UpdateTrigger, signal::Signal, value::Value};

/// A top-level window that reports when it closes.
pub trait TopLevel {
    /// Fired when the window closes. Toolkits may fire this more than once
    /// for a single logical close.
    fn closed(&self) -> &Signal<()>;
}

/// A view managed by a controller.
pub trait View: 'static {
    /// The top-level window currently hosting this view, if any. A view that
    /// is itself a window returns itself.
    fn top_level(&self) -> Option<Rc<dyn TopLevel>>;

    /// Fired when the view, or one of its ancestors, is reparented.
    fn hierarchy_changed(&self) -> &Signal<()>;
}

/// A control that can trigger a command and be enabled or disabled.
pub trait Control: 'static {
    /// Fired when the user activates the control.
    fn activated(&self) -> &Signal<()>;

    /// Enable or disable the control.
    fn set_enabled(&self, enabled: bool);

    /// Is the control enabled?
    fn is_enabled(&self) -> bool;
}

/// A UI-exposed field that a binding can read and write.
pub trait Field: 'static {
    /// The field's current value.
    fn value(&self) -> Value;

    /// Show a value without firing `edited` or `committed`.
    fn set_value(&self, value: &Value);

    /// Fired on every user change.
    fn edited(&self) -> &Signal<()>;

    /// Fired when the user commits an edit, e.g. by leaving the field.
    fn committed(&self) -> &Signal<()>;

    /// Trigger used by bindings that do not choose one.
    fn default_trigger(&self) -> UpdateTrigger {
        UpdateTrigger::Commit
    }

    /// The signal that carries user edits for `trigger`.
    fn trigger_signal(&self, trigger: UpdateTrigger) -> &Signal<()> {
        match trigger {
            UpdateTrigger::PropertyChanged => self.edited(),
            UpdateTrigger::Commit => self.committed(),
        }
    }
}
