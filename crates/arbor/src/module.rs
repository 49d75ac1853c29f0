//! Modules: a view paired with the controller that runs it.
//!
//! A module is the unit an application instantiates. It always builds the
//! view. Outside a designer it also builds the controller and initializes it
//! against the view, so the view's window close unloads the controller.

use std::{any::type_name, fmt, rc::Rc};

use tracing::debug;

use crate::{
    Context, Controller, Handle,
    config::RuntimeConfig,
    error::{Error, Result},
};

/// A view with its controller.
pub struct Module<C: Controller> {
    /// The view.
    view: Rc<C::View>,
    /// The controller. Absent in designer mode.
    controller: Option<Handle<C>>,
}

impl<C: Controller> fmt::Debug for Module<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("controller", &self.controller)
            .finish()
    }
}

impl<C: Controller> Module<C> {
    /// Build a module, reading [`RuntimeConfig`] from the environment.
    pub fn new(view: Rc<C::View>, factory: impl FnOnce() -> C) -> Result<Self> {
        Self::with_config(&RuntimeConfig::from_env(), view, factory)
    }

    /// Build a module with an explicit configuration. In designer mode
    /// `factory` is never called.
    pub fn with_config(
        config: &RuntimeConfig,
        view: Rc<C::View>,
        factory: impl FnOnce() -> C,
    ) -> Result<Self> {
        if config.designer {
            debug!(
                controller = type_name::<C>(),
                "designer attached, skipping controller"
            );
            return Ok(Self {
                view,
                controller: None,
            });
        }
        let cx = Context::new(factory());
        cx.initialize(view.clone())?;
        Ok(Self {
            view,
            controller: Some(cx),
        })
    }

    /// The view.
    pub fn view(&self) -> &Rc<C::View> {
        &self.view
    }

    /// The controller, unless running in a designer.
    pub fn controller(&self) -> Option<&Handle<C>> {
        self.controller.as_ref()
    }

    /// Was the module built for a designer?
    pub fn is_designer(&self) -> bool {
        self.controller.is_none()
    }

    /// The controller's current model.
    pub fn model(&self) -> Option<Rc<C::Model>> {
        self.controller.as_ref().and_then(|cx| cx.model())
    }

    /// Hand a model to the controller.
    pub fn set_model(&self, model: Rc<C::Model>) -> Result<()> {
        self.controller
            .as_ref()
            .ok_or(Error::Designer)?
            .set_model(model)
    }
}
