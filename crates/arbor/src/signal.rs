//! Ordered, synchronous callback fan-out.
//!
//! Every notification path in arbor runs through a [`Signal`]: model property
//! changes, button activation, field edits, reparenting and window close.
//! Handlers run on the calling thread in the order they were connected.

use std::{cell::RefCell, fmt, rc::Rc};

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Opaque identifier for a connected handler.
    pub struct HandlerId;
}

/// Boxed handler stored in a signal.
type Handler<T> = Rc<dyn Fn(&T)>;

/// Handler storage plus connection order.
struct Slots<T: ?Sized> {
    /// Live handlers.
    handlers: SlotMap<HandlerId, Handler<T>>,
    /// Connection order.
    order: Vec<HandlerId>,
}

/// A list of handlers invoked in connection order.
///
/// A handler may connect or disconnect handlers (including itself) while the
/// signal is emitting. A handler disconnected during an emission is not
/// called later in that same emission; one connected during an emission is
/// first called on the next one.
pub struct Signal<T: ?Sized> {
    /// Connected handlers.
    slots: RefCell<Slots<T>>,
}

impl<T: ?Sized> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.len())
            .finish()
    }
}

impl<T: ?Sized> Signal<T> {
    /// Construct a signal with no handlers.
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(Slots {
                handlers: SlotMap::with_key(),
                order: Vec::new(),
            }),
        }
    }

    /// Connect a handler and return its id.
    pub fn connect(&self, handler: impl Fn(&T) + 'static) -> HandlerId {
        let mut slots = self.slots.borrow_mut();
        let id = slots.handlers.insert(Rc::new(handler));
        slots.order.push(id);
        id
    }

    /// Disconnect a handler. Returns false if the id was not connected to
    /// this signal.
    pub fn disconnect(&self, id: HandlerId) -> bool {
        let mut slots = self.slots.borrow_mut();
        if slots.handlers.remove(id).is_none() {
            return false;
        }
        slots.order.retain(|x| *x != id);
        true
    }

    /// Is this handler currently connected?
    pub fn is_connected(&self, id: HandlerId) -> bool {
        self.slots.borrow().handlers.contains_key(id)
    }

    /// Number of connected handlers.
    pub fn len(&self) -> usize {
        self.slots.borrow().order.len()
    }

    /// True when no handlers are connected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every connected handler with `arg`.
    pub fn emit(&self, arg: &T) {
        let pending: Vec<(HandlerId, Handler<T>)> = {
            let slots = self.slots.borrow();
            slots
                .order
                .iter()
                .map(|id| (*id, slots.handlers[*id].clone()))
                .collect()
        };
        for (id, handler) in pending {
            if self.is_connected(id) {
                handler(arg);
            }
        }
    }

    /// Drop every handler.
    pub fn clear(&self) {
        let mut slots = self.slots.borrow_mut();
        slots.handlers.clear();
        slots.order.clear();
    }
}
