//! Helpers for testing controllers and models.

use std::{cell::RefCell, rc::Rc};

use crate::{model::ObservableModel, signal::HandlerId};

/// A shared, cloneable list of recorded events.
///
/// Clones share storage, so one clone can be moved into a handler while the
/// test inspects another.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    /// Recorded entries, oldest first.
    entries: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    /// Construct an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// Snapshot of every entry.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Number of entries equal to `entry`.
    pub fn count(&self, entry: &str) -> usize {
        self.entries.borrow().iter().filter(|e| *e == entry).count()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Is the recorder empty?
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Record every property-change notification raised by `model`. Returns the
/// recorder and the listener id, for unsubscribing.
pub fn record_changes<M: ObservableModel + ?Sized>(model: &M) -> (Recorder, HandlerId) {
    let recorder = Recorder::new();
    let r = recorder.clone();
    let id = model.changes().subscribe(move |property| r.push(property));
    (recorder, id)
}
