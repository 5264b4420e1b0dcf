//! Moves the focused window and the pointer around.
//!
//! Each operation queries the [`DisplayServer`] afresh and mutates it only
//! after every lookup succeeded. A [`cycle`](Controller::cycle) changes the
//! window geometry and the pointer position at most once each.

use crate::{
    display::{DisplayServer, FocusedWindow},
    error::Error,
    geometry::{Point, Rectangle},
    monitor::Monitors,
    placement::{Direction, DockSide, Layout, Placement, Reserve, Step},
};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// How placements are computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    /// Strips reserved by the window manager
    pub(crate) reserve:      Reserve,
    /// Name of the monitor carrying the dock
    pub(crate) dock_monitor: Option<String>,
    /// The dock is on the outermost monitor of its side, as opposed to the
    /// one it is detected on
    pub(crate) dock_at_edge: bool,
    /// Largest distance at which a window still counts as being in a
    /// placement
    pub(crate) tolerance:    u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reserve:      Reserve::default(),
            dock_monitor: None,
            dock_at_edge: false,
            tolerance:    32,
        }
    }
}

/// What a [`cycle`](Controller::cycle) did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cycled {
    /// The window was moved from one placement to the next
    Moved {
        from:     Placement,
        to:       Placement,
        geometry: Rectangle,
    },
    /// The window is at the end of the sequence. It is `snapped` onto the
    /// boundary placement if it was not quite in it yet
    Boundary { at: Placement, snapped: bool },
}

/// One line of [`list_monitors`](Controller::list_monitors)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct MonitorEntry {
    /// Output name
    pub(crate) name:     String,
    /// Geometry in root window coordinates
    pub(crate) geometry: Rectangle,
    /// Whether RandR marks this output as the primary one
    pub(crate) primary:  bool,
    /// Whether the pointer is on this monitor
    pub(crate) active:   bool,
}

/// Carries out the operations of `moveto` against a [`DisplayServer`]
pub(crate) struct Controller<'a, D: DisplayServer> {
    /// The display server
    display:  &'a D,
    /// How placements are computed
    settings: Settings,
}

impl<'a, D: DisplayServer> Controller<'a, D> {
    /// Create a new [`Controller`]
    pub(crate) const fn new(display: &'a D, settings: Settings) -> Self {
        Self { display, settings }
    }

    /// Query the connected monitors
    fn monitors(&self) -> Result<Monitors> {
        let monitors = Monitors::new(self.display.monitors()?);
        if monitors.is_empty() {
            return Err(Error::NoMonitors.into());
        }

        Ok(monitors)
    }

    /// Index of the monitor carrying the dock. In order of preference:
    /// the monitor named in the [`Settings`], the outermost monitor when
    /// asked for, the monitor the dock is detected on, the primary output
    /// and finally the outermost monitor on the dock's side
    fn dock_monitor(&self, monitors: &Monitors) -> Option<usize> {
        let outermost = || match self.settings.reserve.dock_side {
            DockSide::Left => Some(0),
            DockSide::Right => monitors.len().checked_sub(1),
        };

        if let Some(name) = &self.settings.dock_monitor {
            match monitors.position(name) {
                Some(idx) => return Some(idx),
                None => log::warn!("dock monitor {} is not connected", name.red()),
            }
        }

        if self.settings.dock_at_edge {
            return outermost();
        }

        if monitors.len() > 1 {
            if let Some(idx) = self.detect_dock(monitors) {
                return Some(idx);
            }
        }

        monitors.primary().or_else(outermost)
    }

    /// Index of the monitor the dock's tiles are found on
    fn detect_dock(&self, monitors: &Monitors) -> Option<usize> {
        let column = match self.display.dock_column(self.settings.reserve.dock_width) {
            Ok(column) => column?,
            Err(e) => {
                log::warn!("failed to detect the dock: {:#}", e);
                return None;
            },
        };

        let idx = monitors.spanning_column(column)?;
        log::debug!(
            "dock detected at x={} on {}",
            column,
            monitors.get(idx).map_or("?", |m| m.name.as_str()).green()
        );

        Some(idx)
    }

    /// Push the focused window one placement in the given [`Direction`]
    pub(crate) fn cycle(&self, direction: Direction) -> Result<Cycled> {
        let monitors = self.monitors()?;
        let window = self.display.focused_window()?;
        let dock = self.dock_monitor(&monitors);
        let layout = Layout::new(monitors, dock, self.settings.reserve);

        let located = layout.locate(window.frame).ok_or(Error::NoMonitors)?;
        let from = located.placement;
        log::info!(
            "Window({:#0x}) at {} is {} {} on {}",
            window.id,
            window.frame,
            if located.distance <= self.settings.tolerance {
                "in"
            } else {
                "nearest to"
            },
            from.state.to_string().green(),
            monitor_name(&layout, from.monitor),
        );

        match layout.step(from, direction) {
            Step::Move(to) => {
                let geometry = layout.geometry(to).ok_or(Error::NoMonitors)?;
                let pointer = self.display.pointer_position()?;

                log::info!(
                    "moving {} to {} on {}: {}",
                    direction,
                    to.state.to_string().green(),
                    monitor_name(&layout, to.monitor),
                    geometry
                );
                self.display.place_window(&window, geometry)?;
                self.display
                    .warp_pointer(follow_pointer(pointer, &window, geometry))?;

                Ok(Cycled::Moved { from, to, geometry })
            },
            Step::Boundary(at) => {
                log::info!(
                    "cannot move {} past {}",
                    direction,
                    monitor_name(&layout, at.monitor)
                );

                let snapped = located.distance > self.settings.tolerance;
                if snapped {
                    let geometry = layout.geometry(at).ok_or(Error::NoMonitors)?;
                    self.display.place_window(&window, geometry)?;
                }

                Ok(Cycled::Boundary { at, snapped })
            },
        }
    }

    /// Move the pointer to the center of the monitor with the given name
    pub(crate) fn send_cursor_to_monitor(&self, name: &str) -> Result<Point> {
        let monitors = self.monitors()?;
        let monitor = monitors
            .find(name)
            .ok_or_else(|| Error::MonitorNotFound(name.to_owned()))?;

        let center = monitor.rectangle.center();
        log::info!("sending pointer to {} at {}", name.green(), center);
        self.display.warp_pointer(center)?;

        Ok(center)
    }

    /// List the connected monitors from left to right
    pub(crate) fn list_monitors(&self) -> Result<Vec<MonitorEntry>> {
        let monitors = self.monitors()?;
        let active = self
            .display
            .pointer_position()
            .map(|pointer| monitors.at_point(pointer))
            .unwrap_or_else(|e| {
                log::warn!("could not locate the pointer: {:#}", e);
                None
            });

        Ok(monitors
            .iter()
            .enumerate()
            .map(|(idx, m)| MonitorEntry {
                name:     m.name.clone(),
                geometry: m.rectangle,
                primary:  m.primary,
                active:   active == Some(idx),
            })
            .collect())
    }
}

/// Name of a monitor in a [`Layout`], for logging
fn monitor_name(layout: &Layout, idx: usize) -> String {
    layout
        .monitors()
        .get(idx)
        .map_or_else(|| String::from("?"), |m| m.name.clone())
}

/// Where the pointer goes when a window moves to `geometry`. A pointer that
/// was inside the window keeps its offset from the window's corner (pulled
/// inside if the window shrank). Otherwise it is centered in the window
fn follow_pointer(pointer: Point, window: &FocusedWindow, geometry: Rectangle) -> Point {
    if pointer.is_inside(window.frame) {
        geometry.clamp_point(geometry.point + pointer.relative(window.frame.point))
    } else {
        geometry.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::{Extents, Padding},
        monitor::Monitor,
        placement::PlacementState::{Fullscreen, MaximizedLeft, MaximizedRight},
    };
    use std::cell::RefCell;

    /// A display server that records every mutation
    #[derive(Debug)]
    struct RecorderDisplay {
        monitors: Vec<Monitor>,
        window:   RefCell<Option<FocusedWindow>>,
        pointer:  RefCell<Point>,
        placed:   RefCell<Vec<Rectangle>>,
        warps:    RefCell<Vec<Point>>,
        dock:     Option<i32>,
        scans:    RefCell<usize>,
    }

    impl RecorderDisplay {
        fn new(window: Option<Rectangle>, pointer: Point) -> Self {
            Self {
                monitors: vec![
                    Monitor::new("VGA1", Rectangle::new(1280, 0, 1920, 1080), false),
                    Monitor::new("LVDS1", Rectangle::new(0, 0, 1280, 800), false),
                ],
                window: RefCell::new(window.map(|frame| FocusedWindow {
                    id: 0x0140_0007,
                    frame,
                    extents: Extents::EMPTY,
                })),
                pointer: RefCell::new(pointer),
                placed: RefCell::default(),
                warps: RefCell::default(),
                dock: None,
                scans: RefCell::default(),
            }
        }

        fn frame(&self) -> Rectangle {
            self.window.borrow().unwrap().frame
        }
    }

    impl DisplayServer for RecorderDisplay {
        fn monitors(&self) -> Result<Vec<Monitor>> {
            Ok(self.monitors.clone())
        }

        fn focused_window(&self) -> Result<FocusedWindow> {
            self.window.borrow().ok_or_else(|| Error::NoFocusedWindow.into())
        }

        fn place_window(&self, _window: &FocusedWindow, rect: Rectangle) -> Result<()> {
            self.placed.borrow_mut().push(rect);
            if let Some(w) = self.window.borrow_mut().as_mut() {
                w.frame = rect;
            }
            Ok(())
        }

        fn pointer_position(&self) -> Result<Point> {
            Ok(*self.pointer.borrow())
        }

        fn warp_pointer(&self, point: Point) -> Result<()> {
            self.warps.borrow_mut().push(point);
            *self.pointer.borrow_mut() = point;
            Ok(())
        }

        fn dock_column(&self, tile: u32) -> Result<Option<i32>> {
            assert_eq!(tile, 64);
            *self.scans.borrow_mut() += 1;
            Ok(self.dock)
        }
    }

    fn settings() -> Settings {
        Settings {
            reserve: Reserve {
                cover_miniwindows: false,
                ..Reserve::default()
            },
            ..Settings::default()
        }
    }

    /// Geometry of a placement under [`settings`] with the recorder's monitors
    fn geometry(display: &RecorderDisplay, placement: Placement) -> Rectangle {
        let monitors = Monitors::new(display.monitors.clone());
        Layout::new(monitors, Some(1), settings().reserve)
            .geometry(placement)
            .unwrap()
    }

    #[test]
    fn cycle_right_moves_window_and_pointer() {
        let display = RecorderDisplay::new(None, Point::new(100, 100));
        let left = geometry(&display, Placement::new(0, MaximizedLeft));
        *display.window.borrow_mut() = Some(FocusedWindow {
            id:      1,
            frame:   left,
            extents: Extents::EMPTY,
        });

        let controller = Controller::new(&display, settings());
        let cycled = controller.cycle(Direction::Right).unwrap();

        let full = geometry(&display, Placement::new(0, Fullscreen));
        assert_eq!(cycled, Cycled::Moved {
            from:     Placement::new(0, MaximizedLeft),
            to:       Placement::new(0, Fullscreen),
            geometry: full,
        });
        assert_eq!(*display.placed.borrow(), vec![full]);
        assert_eq!(*display.warps.borrow(), vec![Point::new(100, 100)]);
    }

    #[test]
    fn pointer_keeps_its_offset_across_monitors() {
        let display = RecorderDisplay::new(None, Point::new(1000, 300));
        let right = geometry(&display, Placement::new(0, MaximizedRight));
        *display.window.borrow_mut() = Some(FocusedWindow {
            id:      1,
            frame:   right,
            extents: Extents::EMPTY,
        });

        let controller = Controller::new(&display, settings());
        controller.cycle(Direction::Right).unwrap();

        let next = geometry(&display, Placement::new(1, MaximizedLeft));
        assert_eq!(display.frame(), next);
        assert_eq!(
            *display.warps.borrow(),
            vec![Point::new(1280 + (1000 - 640), 300)]
        );
    }

    #[test]
    fn pointer_outside_window_is_centered() {
        let display = RecorderDisplay::new(None, Point::new(3000, 900));
        let left = geometry(&display, Placement::new(0, MaximizedLeft));
        *display.window.borrow_mut() = Some(FocusedWindow {
            id:      1,
            frame:   left,
            extents: Extents::EMPTY,
        });

        Controller::new(&display, settings())
            .cycle(Direction::Right)
            .unwrap();

        assert_eq!(*display.warps.borrow(), vec![display.frame().center()]);
    }

    #[test]
    fn rightmost_boundary_is_idempotent() {
        let display = RecorderDisplay::new(None, Point::new(3000, 500));
        let right = geometry(&display, Placement::new(1, MaximizedRight));
        *display.window.borrow_mut() = Some(FocusedWindow {
            id:      1,
            frame:   right,
            extents: Extents::EMPTY,
        });

        let controller = Controller::new(&display, settings());
        let once = controller.cycle(Direction::Right).unwrap();
        let after_once = display.frame();
        let twice = controller.cycle(Direction::Right).unwrap();

        assert_eq!(once, Cycled::Boundary {
            at:      Placement::new(1, MaximizedRight),
            snapped: false,
        });
        assert_eq!(once, twice);
        assert_eq!(display.frame(), after_once);
        assert!(display.placed.borrow().is_empty());
        assert!(display.warps.borrow().is_empty());
    }

    #[test]
    fn boundary_snaps_a_drifted_window() {
        let display = RecorderDisplay::new(
            Some(Rectangle::new(10, 40, 500, 500)),
            Point::new(20, 50),
        );

        let controller = Controller::new(&display, settings());
        let cycled = controller.cycle(Direction::Left).unwrap();

        let left = geometry(&display, Placement::new(0, MaximizedLeft));
        assert_eq!(cycled, Cycled::Boundary {
            at:      Placement::new(0, MaximizedLeft),
            snapped: true,
        });
        assert_eq!(*display.placed.borrow(), vec![left]);
        assert!(display.warps.borrow().is_empty());

        // Snapped, so another push is a no-op
        controller.cycle(Direction::Left).unwrap();
        assert_eq!(display.placed.borrow().len(), 1);
    }

    #[test]
    fn right_then_left_round_trips() {
        let display = RecorderDisplay::new(None, Point::new(0, 0));
        let controller = Controller::new(&display, settings());

        for monitor in 0..2 {
            for state in [MaximizedLeft, Fullscreen, MaximizedRight] {
                let start = geometry(&display, Placement::new(monitor, state));
                *display.window.borrow_mut() = Some(FocusedWindow {
                    id:      1,
                    frame:   start,
                    extents: Extents::EMPTY,
                });

                if let Cycled::Moved { .. } = controller.cycle(Direction::Right).unwrap() {
                    controller.cycle(Direction::Left).unwrap();
                    assert_eq!(display.frame(), start, "{} on {}", state, monitor);
                }
            }
        }
    }

    #[test]
    fn manual_geometry_is_inferred_then_moved() {
        // Small window near the right edge of the left monitor
        let display = RecorderDisplay::new(
            Some(Rectangle::new(900, 20, 300, 200)),
            Point::new(950, 30),
        );

        let cycled = Controller::new(&display, settings())
            .cycle(Direction::Left)
            .unwrap();

        assert_eq!(cycled, Cycled::Moved {
            from:     Placement::new(0, MaximizedRight),
            to:       Placement::new(0, Fullscreen),
            geometry: geometry(&display, Placement::new(0, Fullscreen)),
        });
    }

    #[test]
    fn nothing_focused() {
        let display = RecorderDisplay::new(None, Point::new(0, 0));
        let err = Controller::new(&display, settings())
            .cycle(Direction::Right)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NoFocusedWindow)
        ));
        assert!(display.placed.borrow().is_empty());
    }

    #[test]
    fn cursor_to_monitor_center() {
        let display = RecorderDisplay::new(None, Point::new(0, 0));
        let controller = Controller::new(&display, settings());

        let center = controller.send_cursor_to_monitor("VGA1").unwrap();
        assert_eq!(center, Point::new(1280 + 1920 / 2, 1080 / 2));
        assert_eq!(*display.warps.borrow(), vec![center]);
    }

    #[test]
    fn cursor_to_unknown_monitor() {
        let display = RecorderDisplay::new(None, Point::new(0, 0));
        let err = Controller::new(&display, settings())
            .send_cursor_to_monitor("NOPE")
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::MonitorNotFound(name)) if name == "NOPE"
        ));
        assert!(display.warps.borrow().is_empty());
    }

    #[test]
    fn monitors_listed_left_to_right() {
        let display = RecorderDisplay::new(None, Point::new(2000, 10));
        let entries = Controller::new(&display, settings())
            .list_monitors()
            .unwrap();

        assert_eq!(entries, vec![
            MonitorEntry {
                name:     String::from("LVDS1"),
                geometry: Rectangle::new(0, 0, 1280, 800),
                primary:  false,
                active:   false,
            },
            MonitorEntry {
                name:     String::from("VGA1"),
                geometry: Rectangle::new(1280, 0, 1920, 1080),
                primary:  false,
                active:   true,
            },
        ]);
    }

    #[test]
    fn dock_monitor_resolution() {
        let display = RecorderDisplay::new(None, Point::new(0, 0));
        let monitors = Monitors::new(display.monitors.clone());

        let named = Controller::new(&display, Settings {
            dock_monitor: Some(String::from("LVDS1")),
            ..settings()
        });
        assert_eq!(named.dock_monitor(&monitors), Some(0));

        let right = Controller::new(&display, settings());
        assert_eq!(right.dock_monitor(&monitors), Some(1));

        let left = Controller::new(&display, Settings {
            reserve: Reserve {
                dock_side: DockSide::Left,
                ..settings().reserve
            },
            ..settings()
        });
        assert_eq!(left.dock_monitor(&monitors), Some(0));

        let flagged = Controller::new(&display, Settings {
            dock_at_edge: true,
            ..settings()
        });
        assert_eq!(flagged.dock_monitor(&monitors), Some(1));

        assert_eq!(
            Layout::new(monitors, Some(1), settings().reserve)
                .usable(1)
                .map(|r| r.dimension.width),
            Some(1920 - Padding::new(0, 66, 0, 0).right)
        );
    }

    #[test]
    fn dock_flag_wins_over_primary_output() {
        let mut display = RecorderDisplay::new(None, Point::new(0, 0));
        display.monitors[0].primary = true;
        display.dock = Some(1216);
        let monitors = Monitors::new(display.monitors.clone());
        assert_eq!(monitors.primary(), Some(1));

        let left = Controller::new(&display, Settings {
            reserve: Reserve {
                dock_side: DockSide::Left,
                ..settings().reserve
            },
            dock_at_edge: true,
            ..settings()
        });
        assert_eq!(left.dock_monitor(&monitors), Some(0));

        let right = Controller::new(&display, Settings {
            dock_at_edge: true,
            ..settings()
        });
        assert_eq!(right.dock_monitor(&monitors), Some(1));
        assert_eq!(*display.scans.borrow(), 0);
    }

    #[test]
    fn detected_dock_wins_over_primary_output() {
        let mut display = RecorderDisplay::new(None, Point::new(0, 0));
        display.monitors[0].primary = true;
        let monitors = Monitors::new(display.monitors.clone());

        // Nothing detected: the primary output carries the dock
        let controller = Controller::new(&display, settings());
        assert_eq!(controller.dock_monitor(&monitors), Some(1));

        // Dock tiles along the right edge of the left monitor
        display.dock = Some(1280 - 64);
        let controller = Controller::new(&display, settings());
        assert_eq!(controller.dock_monitor(&monitors), Some(0));
        assert_eq!(*display.scans.borrow(), 2);

        // A named monitor is not second-guessed
        let named = Controller::new(&display, Settings {
            dock_monitor: Some(String::from("VGA1")),
            ..settings()
        });
        assert_eq!(named.dock_monitor(&monitors), Some(1));
        assert_eq!(*display.scans.borrow(), 2);
    }

    #[test]
    fn detected_dock_shapes_the_placement() {
        let mut display = RecorderDisplay::new(
            Some(Rectangle::new(10, 10, 300, 300)),
            Point::new(0, 0),
        );
        display.dock = Some(1280 - 64);

        let cycled = Controller::new(&display, settings())
            .cycle(Direction::Left)
            .unwrap();

        let expected = Layout::new(
            Monitors::new(display.monitors.clone()),
            Some(0),
            settings().reserve,
        )
        .geometry(Placement::new(0, MaximizedLeft))
        .unwrap();
        assert_eq!(expected, Rectangle::new(0, 0, 607, 734));
        assert_eq!(*display.placed.borrow(), vec![expected]);
        assert!(matches!(cycled, Cycled::Boundary { snapped: true, .. }));
    }

    #[test]
    fn single_monitor_skips_dock_detection() {
        let mut display = RecorderDisplay::new(None, Point::new(0, 0));
        display.monitors.truncate(1);
        display.dock = Some(1216);
        let monitors = Monitors::new(display.monitors.clone());

        let controller = Controller::new(&display, settings());
        assert_eq!(controller.dock_monitor(&monitors), Some(0));
        assert_eq!(*display.scans.borrow(), 0);
    }

    #[test]
    fn mirrored_outputs_reach_the_boundary() {
        let mut display = RecorderDisplay::new(None, Point::new(0, 0));
        display.monitors = vec![
            Monitor::new("LVDS1", Rectangle::new(0, 0, 1280, 800), false),
            Monitor::new("VGA1", Rectangle::new(0, 0, 1280, 800), false),
        ];
        let controller = Controller::new(&display, settings());

        let entries = controller.list_monitors().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries
            .windows(2)
            .all(|w| w[0].geometry.point.x < w[1].geometry.point.x));

        let start = Layout::new(
            Monitors::new(display.monitors.clone()),
            Some(0),
            settings().reserve,
        )
        .geometry(Placement::new(0, MaximizedLeft))
        .unwrap();
        *display.window.borrow_mut() = Some(FocusedWindow {
            id:      1,
            frame:   start,
            extents: Extents::EMPTY,
        });

        let steps = (0..6)
            .map(|_| controller.cycle(Direction::Right).unwrap())
            .collect::<Vec<_>>();

        assert!(matches!(steps[0], Cycled::Moved { to, .. } if to == Placement::new(0, Fullscreen)));
        assert!(matches!(steps[1], Cycled::Moved { to, .. } if to == Placement::new(0, MaximizedRight)));
        assert!(steps[2..]
            .iter()
            .all(|s| matches!(s, Cycled::Boundary { at, snapped: false }
                if *at == Placement::new(0, MaximizedRight))));
    }
}
