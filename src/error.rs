//! Errors found throughout this crate

use thiserror::Error;
use x11rb::errors::ConnectError;

/// Errors that end an invocation of `moveto`
#[derive(Debug, Error)]
pub(crate) enum Error {
    /// Nothing has the input focus, so there is nothing to move
    #[error("no window is focused")]
    NoFocusedWindow,

    /// No connected monitor carries the requested name
    #[error("no monitor named `{0}` is connected")]
    MonitorNotFound(String),

    /// The display server did not report any active output
    #[error("the X11 server reported no active monitors")]
    NoMonitors,

    /// Invalid property (`Atom`) queried for
    #[error("the property {0} was not found on this server")]
    InvalidProperty(String),

    /// Failure to connect to the server
    #[error("failed to connect to the X11 server: {0}")]
    DisplayConnectionFailed(#[from] ConnectError),
}
