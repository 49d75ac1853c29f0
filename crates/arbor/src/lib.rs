//! Arbor: a controller and data-binding core for widget toolkits.
//!
//! Arbor connects three parties: a view built from toolkit widgets, an
//! observable view-model, and a controller that owns the commands the view
//! can trigger. It provides:
//!
//! - A controller lifecycle that initializes once against a view and
//!   unloads exactly once when the view's window closes.
//! - Declarative two-way bindings between view fields and model properties,
//!   re-pointed automatically when the model is replaced.
//! - Named commands declared with [`derive_commands`], dispatched from
//!   controls whose enabled state tracks each command's availability.
//!
//! # Module Organization
//!
//! - [`view`] - The contracts a toolkit implements
//! - [`model`] - Observable models and property helpers
//! - [`binding`] - Field-to-property binding rules
//! - [`commands`] - Command registry and dispatch
//! - [`widgets`] - Headless widgets implementing the view contracts
//! - [`module`] - A view paired with its controller

#![warn(missing_docs)]

// Allow derive macros to reference `arbor::` from within this crate
extern crate self as arbor;

/// Controller lifecycle and context.
mod controller;

pub mod binding;
pub mod commands;
pub mod config;
pub mod designer;
pub mod error;
pub mod model;
pub mod module;
pub mod signal;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod value;
pub mod view;
pub mod widgets;

pub use arbor_derive::{command, derive_commands};
pub use controller::{Context, Controller, Handle, Lifecycle};
pub use module::Module;

/// Common imports for controller and model code.
pub mod prelude {
    pub use crate::{
        Context, Controller, Handle, Lifecycle, Module,
        binding::{BindingMode, BindingTable, UpdateTrigger},
        command,
        commands::Commands,
        derive_commands,
        error::{BindingError, Error, ErrorKind, Result},
        model::{ObservableModel, Property, PropertyBag, PropertyChanges},
        value::{FromValue, IntoValue, Value},
        view::{Control, Field, TopLevel, View},
    };
}
