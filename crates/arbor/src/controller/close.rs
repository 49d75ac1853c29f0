use std::{
    cell::RefCell,
    mem,
    rc::{Rc, Weak},
};

use tracing::{debug, trace};

use crate::{
    signal::HandlerId,
    view::{TopLevel, View},
};

/// Where the watch is in its life.
enum WatchState {
    /// The view has no window yet; waiting for a reparent that puts it in
    /// one.
    AwaitingWindow {
        /// Handler on the view's `hierarchy_changed` signal.
        handler: HandlerId,
    },
    /// Hooked into a window's `closed` signal.
    Attached {
        /// The window.
        window: Weak<dyn TopLevel>,
        /// Handler on the window's `closed` signal.
        handler: HandlerId,
    },
    /// All handlers removed.
    Released,
}

/// Watches for the close of the window hosting a view.
///
/// The transition from waiting-for-a-window to watching-for-close happens at
/// most once; the reparent handler is removed when it does.
pub struct CloseWatch {
    /// Shared with the reparent handler.
    state: Rc<RefCell<WatchState>>,
}

impl CloseWatch {
    /// Start watching `view`. `on_close` runs every time the hosting window
    /// reports a close.
    pub fn install<V: View>(view: &Rc<V>, on_close: impl Fn() + 'static) -> Self {
        let on_close: Rc<dyn Fn()> = Rc::new(on_close);
        let state = Rc::new(RefCell::new(WatchState::Released));

        if let Some(window) = view.top_level() {
            *state.borrow_mut() = attach(&window, on_close);
            debug!("view is hosted by a window, watching for close");
        } else {
            let weak_view = Rc::downgrade(view);
            let shared = state.clone();
            let handler = view.hierarchy_changed().connect(move |_| {
                if let Some(view) = weak_view.upgrade() {
                    reparented(&*view, &shared, &on_close);
                }
            });
            *state.borrow_mut() = WatchState::AwaitingWindow { handler };
            debug!("view has no window yet, watching for reparent");
        }
        Self { state }
    }

    /// Is the watch hooked into a window?
    pub fn is_attached(&self) -> bool {
        matches!(*self.state.borrow(), WatchState::Attached { .. })
    }

    /// Remove whichever handler is installed.
    pub fn release(&self, view: &dyn View) {
        let state = mem::replace(&mut *self.state.borrow_mut(), WatchState::Released);
        match state {
            WatchState::AwaitingWindow { handler } => {
                view.hierarchy_changed().disconnect(handler);
            }
            WatchState::Attached { window, handler } => {
                if let Some(window) = window.upgrade() {
                    window.closed().disconnect(handler);
                }
            }
            WatchState::Released => {}
        }
    }
}

/// Hook the close signal of `window`.
fn attach(window: &Rc<dyn TopLevel>, on_close: Rc<dyn Fn()>) -> WatchState {
    let handler = window.closed().connect(move |_| on_close());
    WatchState::Attached {
        window: Rc::downgrade(window),
        handler,
    }
}

/// Reparent handler: once the view lands in a window, swap the reparent
/// handler for a close handler.
fn reparented(view: &dyn View, state: &RefCell<WatchState>, on_close: &Rc<dyn Fn()>) {
    let handler = match &*state.borrow() {
        WatchState::AwaitingWindow { handler } => *handler,
        _ => return,
    };
    let Some(window) = view.top_level() else {
        trace!("view reparented outside a window");
        return;
    };
    view.hierarchy_changed().disconnect(handler);
    *state.borrow_mut() = attach(&window, on_close.clone());
    debug!("view attached to a window, watching for close");
}
