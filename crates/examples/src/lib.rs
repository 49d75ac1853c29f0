//! A small person-editing application built on arbor.
//!
//! The main window hosts a form with name and age fields. Save is only
//! available for a named person older than [`person_table::MIN_AGE`], and
//! opens a dialog describing the record. The whole thing runs headless;
//! [`session::run`] drives it from a script.

/// The action dialog opened by save.
pub mod action_dialog;
/// The main window and application assembly.
pub mod main_window;
/// The person form, its model and controller.
pub mod person_table;
/// Scripted headless sessions.
pub mod session;
