//! Various utilities specifically dealing with X

use crate::error::Error;
use anyhow::Result;
use colored::Colorize;
use x11rb::rust_connection::RustConnection;

// ============================= XUtility =============================

/// Wrapper to do basic X11 commands
pub(crate) struct XUtility;

impl XUtility {
    /// Setup the X11 [`Connection`](RustConnection) to `display`, or to
    /// `$DISPLAY` when none is given
    pub(crate) fn setup_connection(display: Option<&str>) -> Result<(RustConnection, usize), Error> {
        log::debug!(
            "connecting to display {}",
            display.unwrap_or("$DISPLAY").green()
        );
        RustConnection::connect(display).map_err(Error::DisplayConnectionFailed)
    }
}
