//! Visual designer detection.
//!
//! A designer instantiates views to lay them out but must not run
//! application logic. Designers announce themselves by setting
//! [`DESIGNER_ENV`] in the process environment.

use crate::config::RuntimeConfig;

/// Environment variable a designer sets for the processes it hosts.
pub const DESIGNER_ENV: &str = "ARBOR_DESIGNER";

/// Is the current process hosted by a visual designer?
pub fn is_attached() -> bool {
    RuntimeConfig::from_env().designer
}
