//! Error types.

use std::result::Result as StdResult;

use thiserror::Error;

/// Result type for arbor operations.
pub type Result<T> = StdResult<T, Error>;

/// Failures raised while moving values between fields and model properties.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum BindingError {
    /// The model does not expose a property with this name.
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// The property exists but cannot be written.
    #[error("property is read-only: {0}")]
    ReadOnly(String),

    /// A value could not be converted to the property's type.
    #[error("conversion error for property `{property}`: {message}")]
    Conversion {
        /// Property name, empty until the binding layer fills it in.
        property: String,
        /// Error message.
        message: String,
    },
}

impl BindingError {
    #[doc(hidden)]
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            property: String::new(),
            message: message.into(),
        }
    }

    /// Attach a property name to a conversion error.
    pub fn with_property(self, property: &str) -> Self {
        match self {
            Self::Conversion { message, .. } => Self::Conversion {
                property: property.to_string(),
                message,
            },
            other => other,
        }
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A missing or empty argument.
    InvalidArgument,
    /// Lookup of something that was never registered.
    NotFound,
    /// An operation attempted in the wrong lifecycle state, or against a
    /// control that is not bound. These are programming errors.
    Precondition,
    /// Two commands share a name.
    Duplicate,
    /// A command action failed.
    ActionFailure,
    /// A field/property transfer failed.
    Binding,
    /// Output or other environment failure.
    Internal,
}

/// Core error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Null or empty argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command not found.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Two commands registered under one name.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),

    /// Operation requires an initialized controller.
    #[error("controller is not initialized")]
    NotInitialized,

    /// `initialize` called a second time.
    #[error("controller is already initialized")]
    AlreadyInitialized,

    /// Operation attempted after the controller was unloaded.
    #[error("controller has been unloaded")]
    Unloaded,

    /// Unbind requested for a command with no bound controls.
    #[error("command {0} is not bound to any control")]
    NotBound(String),

    /// Unbind requested for a control that is not bound to the command.
    #[error("command {0} is not bound to the specified control")]
    ControlNotBound(String),

    /// The control already triggers a command.
    #[error("control is already bound to command {0}")]
    AlreadyBound(String),

    /// The module was built in designer mode and has no controller.
    #[error("module has no controller (designer mode)")]
    Designer,

    /// Binding failure.
    #[error("binding: {0}")]
    Binding(#[from] BindingError),

    /// Command execution failure.
    #[error("command execution failed: {0}")]
    Exec(#[from] anyhow::Error),

    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::UnknownCommand(_) => ErrorKind::NotFound,
            Self::DuplicateCommand(_) => ErrorKind::Duplicate,
            Self::NotInitialized
            | Self::AlreadyInitialized
            | Self::Unloaded
            | Self::NotBound(_)
            | Self::ControlNotBound(_)
            | Self::AlreadyBound(_)
            | Self::Designer => ErrorKind::Precondition,
            Self::Binding(_) => ErrorKind::Binding,
            Self::Exec(_) => ErrorKind::ActionFailure,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
