use std::{collections::BTreeMap, mem, ptr, rc::Rc};

use crate::{
    error::{Error, Result},
    signal::HandlerId,
    view::Control,
};

/// A control bound to a command and the activation handler installed on it.
struct BoundControl {
    /// The control.
    control: Rc<dyn Control>,
    /// Handler connected to the control's `activated` signal.
    handler: HandlerId,
}

/// Pointer identity for controls.
fn same_control(a: &Rc<dyn Control>, b: &Rc<dyn Control>) -> bool {
    ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Bookkeeping for controls bound to commands, keyed by command name.
#[derive(Default)]
pub struct ButtonBindings {
    /// Bound controls per command, in binding order. Empty lists are
    /// removed.
    by_command: BTreeMap<String, Vec<BoundControl>>,
}

impl ButtonBindings {
    /// The command a control is bound to, if any.
    pub fn command_for(&self, control: &Rc<dyn Control>) -> Option<&str> {
        self.by_command
            .iter()
            .find(|(_, bound)| bound.iter().any(|b| same_control(&b.control, control)))
            .map(|(name, _)| name.as_str())
    }

    /// Record a binding.
    pub fn insert(&mut self, command: &str, control: Rc<dyn Control>, handler: HandlerId) {
        self.by_command
            .entry(command.to_string())
            .or_default()
            .push(BoundControl { control, handler });
    }

    /// Forget a binding and return its handler. The command's entry is
    /// dropped once its last control is removed.
    pub fn remove(&mut self, command: &str, control: &Rc<dyn Control>) -> Result<HandlerId> {
        let Some(bound) = self.by_command.get_mut(command) else {
            return Err(Error::NotBound(command.to_string()));
        };
        let Some(idx) = bound.iter().position(|b| same_control(&b.control, control)) else {
            return Err(Error::ControlNotBound(command.to_string()));
        };
        let removed = bound.remove(idx);
        if bound.is_empty() {
            self.by_command.remove(command);
        }
        Ok(removed.handler)
    }

    /// Controls bound to a command.
    pub fn controls(&self, command: &str) -> Vec<Rc<dyn Control>> {
        self.by_command
            .get(command)
            .map(|bound| bound.iter().map(|b| b.control.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of controls bound to a command.
    pub fn count(&self, command: &str) -> usize {
        self.by_command.get(command).map_or(0, Vec::len)
    }

    /// Remove every binding, returning controls and their handlers.
    pub fn drain(&mut self) -> Vec<(Rc<dyn Control>, HandlerId)> {
        mem::take(&mut self.by_command)
            .into_values()
            .flatten()
            .map(|b| (b.control, b.handler))
            .collect()
    }
}
