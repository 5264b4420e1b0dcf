//! The placements a window cycles through.
//!
//! Every monitor offers three placements: the left half of its usable area,
//! the whole usable area, and the right half. Chained from the leftmost
//! monitor to the rightmost one they form a single sequence, which is walked
//! one step at a time with [`Direction::Left`] or [`Direction::Right`]. The
//! ends of the sequence are boundaries; stepping past them does nothing.
//!
//! The usable area of a monitor is what is left after removing the strips
//! WindowMaker reserves for its dock and for miniwindows (see [`Reserve`]).
//!
//! Nothing about the current placement is remembered between runs. It is
//! inferred every time from the window's geometry (see [`Layout::locate`]).

use crate::{
    geometry::{Padding, Rectangle},
    monitor::Monitors,
};
use serde::{Deserialize, Serialize};
use strum::Display;

// ============================= Direction ============================

/// Direction a window is pushed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, clap::ArgEnum)]
pub(crate) enum Direction {
    /// Towards the leftmost monitor
    #[strum(serialize = "left")]
    Left,
    /// Towards the rightmost monitor
    #[strum(serialize = "right")]
    Right,
}

// ========================== PlacementState ==========================

/// Where on a monitor a window sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub(crate) enum PlacementState {
    /// Left half of the usable area
    #[strum(serialize = "maximized-left")]
    MaximizedLeft,
    /// The entire usable area
    #[strum(serialize = "fullscreen")]
    Fullscreen,
    /// Right half of the usable area
    #[strum(serialize = "maximized-right")]
    MaximizedRight,
}

impl PlacementState {
    /// All states, in the order ties are broken when inferring one
    pub(crate) const ALL: [Self; 3] = [Self::MaximizedLeft, Self::Fullscreen, Self::MaximizedRight];
}

// ============================== Reserve =============================

/// Edge of the screen WindowMaker's dock is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DockSide {
    #[strum(serialize = "left")]
    Left,
    #[strum(serialize = "right")]
    Right,
}

/// Strips of a monitor WindowMaker keeps free of maximized windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Reserve {
    /// Side of the dock monitor the dock is attached to
    pub(crate) dock_side:         DockSide,
    /// Width of the dock column
    pub(crate) dock_width:        u32,
    /// Height of the miniwindow row along the bottom of every monitor
    pub(crate) icon_height:       u32,
    /// Extra space kept between a strip and a window
    pub(crate) border:            u32,
    /// Windows may overlap the dock
    pub(crate) cover_dock:        bool,
    /// Windows may overlap miniwindows
    pub(crate) cover_miniwindows: bool,
}

impl Default for Reserve {
    fn default() -> Self {
        Self {
            dock_side:         DockSide::Right,
            dock_width:        64,
            icon_height:       64,
            border:            2,
            cover_dock:        false,
            cover_miniwindows: true,
        }
    }
}

impl Reserve {
    /// Space to remove from a monitor, which may or may not carry the dock
    pub(crate) const fn padding(&self, has_dock: bool) -> Padding {
        let mut padding = Padding::new(0, 0, 0, 0);

        if has_dock && !self.cover_dock {
            let strip = self.dock_width + self.border;
            match self.dock_side {
                DockSide::Left => padding.left = strip,
                DockSide::Right => padding.right = strip,
            }
        }

        if !self.cover_miniwindows {
            padding.bottom = self.icon_height + self.border;
        }

        padding
    }
}

// ============================== Layout ==============================

/// A monitor and a state on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    /// Index into the ordered [`Monitors`]
    pub(crate) monitor: usize,
    /// State on that monitor
    pub(crate) state:   PlacementState,
}

impl Placement {
    /// Create a new [`Placement`]
    pub(crate) const fn new(monitor: usize, state: PlacementState) -> Self {
        Self { monitor, state }
    }
}

/// Result of inferring the [`Placement`] of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Located {
    /// The nearest [`Placement`]
    pub(crate) placement: Placement,
    /// How far the window is from the placement's geometry
    pub(crate) distance:  u64,
}

/// Outcome of pushing a window one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The window moves to a new [`Placement`]
    Move(Placement),
    /// The window is at the end of the sequence and stays where it is
    Boundary(Placement),
}

/// The [`Monitors`] plus everything needed to compute placements on them
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    /// The connected monitors, left to right
    monitors: Monitors,
    /// Index of the monitor carrying the dock
    dock:     Option<usize>,
    /// Reserved strips
    reserve:  Reserve,
}

impl Layout {
    /// Create a new [`Layout`]
    pub(crate) const fn new(monitors: Monitors, dock: Option<usize>, reserve: Reserve) -> Self {
        Self { monitors, dock, reserve }
    }

    /// Return the [`Monitors`]
    pub(crate) const fn monitors(&self) -> &Monitors {
        &self.monitors
    }

    /// Area of a monitor windows may occupy
    pub(crate) fn usable(&self, monitor: usize) -> Option<Rectangle> {
        let has_dock = self.dock == Some(monitor);
        self.monitors
            .get(monitor)
            .map(|m| m.rectangle - self.reserve.padding(has_dock))
    }

    /// Geometry of a [`Placement`]
    pub(crate) fn geometry(&self, placement: Placement) -> Option<Rectangle> {
        let usable = self.usable(placement.monitor)?;
        let (left, right) = usable.halves();

        Some(match placement.state {
            PlacementState::MaximizedLeft => left,
            PlacementState::Fullscreen => usable,
            PlacementState::MaximizedRight => right,
        })
    }

    /// Infer the [`Placement`] of a window on the monitor it is on. A window
    /// that matches none of the three placements exactly is treated as being
    /// in the nearest one
    pub(crate) fn locate(&self, window: Rectangle) -> Option<Located> {
        let monitor = self.monitors.containing(window)?;

        PlacementState::ALL
            .iter()
            .filter_map(|&state| {
                let placement = Placement::new(monitor, state);
                self.geometry(placement).map(|rect| Located {
                    placement,
                    distance: rect.distance(window),
                })
            })
            .min_by_key(|located| located.distance)
    }

    /// The [`Placement`] one step from `from` in the given [`Direction`]
    pub(crate) fn step(&self, from: Placement, direction: Direction) -> Step {
        use PlacementState::{Fullscreen, MaximizedLeft, MaximizedRight};

        let on_same = |state| Step::Move(Placement::new(from.monitor, state));

        match (direction, from.state) {
            (Direction::Right, MaximizedLeft) => on_same(Fullscreen),
            (Direction::Right, Fullscreen) => on_same(MaximizedRight),
            (Direction::Right, MaximizedRight) => self
                .monitors
                .right_of(from.monitor)
                .map_or(Step::Boundary(from), |next| {
                    Step::Move(Placement::new(next, MaximizedLeft))
                }),
            (Direction::Left, MaximizedRight) => on_same(Fullscreen),
            (Direction::Left, Fullscreen) => on_same(MaximizedLeft),
            (Direction::Left, MaximizedLeft) => self
                .monitors
                .left_of(from.monitor)
                .map_or(Step::Boundary(from), |prev| {
                    Step::Move(Placement::new(prev, MaximizedRight))
                }),
        }
    }
}
