//! The operations `moveto` needs from a display server.
//!
//! The [`Controller`](crate::controller::Controller) only talks to the screen
//! through [`DisplayServer`], which keeps it testable without an X-Server.

use crate::{
    geometry::{Extents, Point, Rectangle},
    monitor::Monitor,
};
use anyhow::Result;

/// Type alias used for syntax compatibility
pub(crate) type Xid = u32;

/// The window that has the focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FocusedWindow {
    /// ID of the client window
    pub(crate) id:      Xid,
    /// Geometry of the window including the decorations drawn by the window
    /// manager
    pub(crate) frame:   Rectangle,
    /// Size of those decorations on each side of the client
    pub(crate) extents: Extents,
}

/// Capabilities of a display server
pub(crate) trait DisplayServer {
    /// Every connected and enabled monitor, in no particular order
    fn monitors(&self) -> Result<Vec<Monitor>>;

    /// The focused window.
    ///
    /// # Errors
    /// [`Error::NoFocusedWindow`](crate::error::Error::NoFocusedWindow) if
    /// nothing has the focus
    fn focused_window(&self) -> Result<FocusedWindow>;

    /// Move and resize a window so that its frame covers `rect`
    fn place_window(&self, window: &FocusedWindow, rect: Rectangle) -> Result<()>;

    /// Position of the pointer in root window coordinates
    fn pointer_position(&self) -> Result<Point>;

    /// Move the pointer to the given [`Point`] in root window coordinates
    fn warp_pointer(&self, point: Point) -> Result<()>;

    /// The `x` of the column WindowMaker's dock occupies, found from the
    /// `tile`-sized top-level windows. `None` without any such window
    fn dock_column(&self, tile: u32) -> Result<Option<i32>>;
}
