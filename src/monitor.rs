//! Interactions with the [`Monitor`] struct

use crate::geometry::{Point, Rectangle};
use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Represents a monitor connected to the X-Server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Monitor {
    /// Output name reported by RandR (e.g., `VGA1`)
    pub(crate) name:      String,
    /// Area of the root window the monitor displays
    pub(crate) rectangle: Rectangle,
    /// Whether RandR marks this output as the primary one
    pub(crate) primary:   bool,
}

impl Monitor {
    /// Create a new [`Monitor`]
    pub(crate) fn new<S: Into<String>>(name: S, rectangle: Rectangle, primary: bool) -> Self {
        Self {
            name: name.into(),
            rectangle,
            primary,
        }
    }
}

/// The connected [`Monitor`]s, ordered left to right
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Monitors {
    /// Ordered [`Monitor`]s
    inner: Vec<Monitor>,
}

impl Monitors {
    /// Order the [`Monitor`]s by their `x` coordinate, dropping those with a
    /// duplicate name or no area.
    ///
    /// Outputs starting at the same `x` (mirrored or cloned outputs) collapse
    /// into one, preferring the primary output, so every column is visited
    /// exactly once
    pub(crate) fn new(monitors: Vec<Monitor>) -> Self {
        let inner = monitors
            .into_iter()
            .filter(|m| !m.rectangle.is_zero())
            .unique_by(|m| m.name.clone())
            .sorted_by_key(|m| (m.rectangle.point.x, !m.primary, m.rectangle.point.y))
            .dedup_by(|a, b| a.rectangle.point.x == b.rectangle.point.x)
            .collect();

        Self { inner }
    }

    /// Number of [`Monitor`]s
    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether there are no [`Monitor`]s at all
    pub(crate) fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// [`Monitor`] at the given index
    pub(crate) fn get(&self, idx: usize) -> Option<&Monitor> {
        self.inner.get(idx)
    }

    /// Iterate over the [`Monitor`]s from left to right
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Monitor> {
        self.inner.iter()
    }

    /// Index of the [`Monitor`] with exactly the given name
    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.inner.iter().position(|m| m.name == name)
    }

    /// [`Monitor`] with exactly the given name
    pub(crate) fn find(&self, name: &str) -> Option<&Monitor> {
        self.position(name).and_then(|idx| self.get(idx))
    }

    /// Index of the [`Monitor`] displaying the given [`Point`]
    pub(crate) fn at_point(&self, point: Point) -> Option<usize> {
        self.inner.iter().position(|m| m.rectangle.is_inside(point))
    }

    /// Index of the [`Monitor`] a window with the given geometry is on.
    ///
    /// This is the monitor holding the window's center. Windows whose center
    /// is off-screen belong to the monitor they overlap the most, and failing
    /// that to the first monitor
    pub(crate) fn containing(&self, rect: Rectangle) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        self.at_point(rect.center()).or_else(|| {
            self.inner
                .iter()
                .enumerate()
                .map(|(idx, m)| (idx, m.rectangle.overlap(rect)))
                .filter(|(_, area)| *area > 0)
                .max_by_key(|(idx, area)| (*area, std::cmp::Reverse(*idx)))
                .map(|(idx, _)| idx)
                .or(Some(0))
        })
    }

    /// Index of the [`Monitor`] whose horizontal span holds the column `x`
    pub(crate) fn spanning_column(&self, x: i32) -> Option<usize> {
        self.inner.iter().position(|m| {
            let start = i64::from(m.rectangle.point.x);
            (start..start + i64::from(m.rectangle.dimension.width)).contains(&i64::from(x))
        })
    }

    /// Index of the first primary [`Monitor`]
    pub(crate) fn primary(&self) -> Option<usize> {
        self.inner.iter().position(|m| m.primary)
    }

    /// Index of the neighbor to the left of `idx`
    pub(crate) fn left_of(&self, idx: usize) -> Option<usize> {
        idx.checked_sub(1)
    }

    /// Index of the neighbor to the right of `idx`
    pub(crate) fn right_of(&self, idx: usize) -> Option<usize> {
        let next = idx + 1;
        (next < self.len()).then(|| next)
    }
}

/// Column WindowMaker's dock sits in, given the top-left corners of every
/// dock-sized tile on screen.
///
/// The dock stacks its tiles vertically, so its column is the `x` holding the
/// most distinct rows. Loose appicons or the clip may share a row with it but
/// rarely fill a column. Ties go to the rightmost column
pub(crate) fn dock_column<I: IntoIterator<Item = Point>>(tiles: I) -> Option<i32> {
    let mut columns = BTreeMap::<i32, BTreeSet<i32>>::new();
    for tile in tiles {
        columns.entry(tile.x).or_default().insert(tile.y);
    }

    columns
        .into_iter()
        .max_by_key(|(_, rows)| rows.len())
        .map(|(x, _)| x)
}
