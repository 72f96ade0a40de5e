//! The event-emitting owner of the grid and its markers.

use rand::{Rng, RngExt};

use crate::cell::{CellKind, MarkerKind};
use crate::events::{EventHub, GridEvent};
use crate::geom::Point;
use crate::grid::Grid;

/// Wall density used by callers that don't supply their own.
pub const DEFAULT_WALL_PROBABILITY: f64 = 0.3;

/// Grid plus markers plus change notification.
///
/// All mutation goes through the store so the marker invariants hold: at
/// most one start and one end, each on a walkable cell, each stamped into
/// the grid at its coordinate. The marker fields are authoritative; the
/// cell stamps exist for readers that only look at cells.
///
/// Markers are accepted on [`CellKind::Empty`] cells only. That refuses
/// walls and cells already holding either marker in one check, so the two
/// markers can never collide.
#[derive(Debug)]
pub struct GridStore {
    grid: Grid,
    start: Option<Point>,
    end: Option<Point>,
    events: EventHub<GridEvent>,
}

impl GridStore {
    /// Create a store over a fresh empty grid. Dimensions are clamped
    /// into `[MIN_GRID_DIM, MAX_GRID_DIM]`.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid: Grid::new(width, height),
            start: None,
            end: None,
            events: EventHub::new(),
        }
    }

    /// Register a subscriber for change events.
    pub fn subscribe(&mut self) -> std::sync::mpsc::Receiver<GridEvent> {
        self.events.subscribe()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Replace the grid with a fresh empty one of the given (clamped)
    /// dimensions and drop both markers. Emits [`GridEvent::Changed`].
    pub fn initialize(&mut self, width: i32, height: i32) {
        self.grid = Grid::new(width, height);
        self.start = None;
        self.end = None;
        self.events.emit(GridEvent::Changed);
    }

    /// Re-roll every cell: with probability `p` (clamped into `[0, 1]`)
    /// a cell becomes a wall, otherwise empty. Marker cells are
    /// overwritten like any other; a marker whose cell came up as a wall
    /// is cleared (with a marker event), while a survivor keeps its
    /// coordinate even though its cell now reads empty.
    pub fn generate_random_walls(&mut self, rng: &mut impl Rng, p: f64) {
        let p = p.clamp(0.0, 1.0);
        for pt in self.grid.points() {
            let r: f64 = rng.random();
            let kind = if r < p { CellKind::Wall } else { CellKind::Empty };
            self.grid.set(pt, kind);
        }

        if self.start.is_some_and(|s| !self.grid.is_walkable(s)) {
            self.start = None;
            self.events.emit(GridEvent::marker(MarkerKind::Start, None));
        }
        if self.end.is_some_and(|e| !self.grid.is_walkable(e)) {
            self.end = None;
            self.events.emit(GridEvent::marker(MarkerKind::End, None));
        }

        self.events.emit(GridEvent::Changed);
    }

    /// Place (or move) the start marker. No-op unless `p` is an empty
    /// cell inside the grid.
    pub fn set_start(&mut self, p: Point) {
        self.set_marker(MarkerKind::Start, p);
    }

    /// Place (or move) the end marker. No-op unless `p` is an empty cell
    /// inside the grid.
    pub fn set_end(&mut self, p: Point) {
        self.set_marker(MarkerKind::End, p);
    }

    fn set_marker(&mut self, kind: MarkerKind, p: Point) {
        // Out-of-range points read as Wall, so one check covers bounds,
        // walls and cells already holding a marker.
        if self.grid.at(p) != CellKind::Empty {
            return;
        }
        let slot = match kind {
            MarkerKind::Start => &mut self.start,
            MarkerKind::End => &mut self.end,
        };
        let old = slot.replace(p);
        if let Some(old) = old {
            self.grid.set(old, CellKind::Empty);
        }
        self.grid.set(p, kind.cell());
        self.events.emit(GridEvent::marker(kind, Some(p)));
        self.events.emit(GridEvent::Changed);
    }

    /// Remove both markers, reverting their cells to empty. Emits both
    /// marker events and [`GridEvent::Changed`] whether or not the
    /// markers existed.
    pub fn clear_markers(&mut self) {
        if let Some(p) = self.start.take() {
            self.grid.set(p, CellKind::Empty);
        }
        if let Some(p) = self.end.take() {
            self.grid.set(p, CellKind::Empty);
        }
        self.events.emit(GridEvent::marker(MarkerKind::Start, None));
        self.events.emit(GridEvent::marker(MarkerKind::End, None));
        self.events.emit(GridEvent::Changed);
    }

    /// Click policy for marker placement: the first walkable click
    /// places the start, the second places the end, a third clears both
    /// and starts over. Unwalkable points are ignored.
    pub fn cycle_marker(&mut self, p: Point) {
        if !self.grid.is_walkable(p) {
            return;
        }
        if self.start.is_none() {
            self.set_start(p);
        } else if self.end.is_none() {
            self.set_end(p);
        } else {
            self.clear_markers();
            self.set_start(p);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    /// The cell at a point (out-of-range reads as wall).
    #[inline]
    pub fn at(&self, p: Point) -> CellKind {
        self.grid.at(p)
    }

    /// Whether the point lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.grid.contains(p)
    }

    /// Whether a path may pass through the cell at `p`.
    #[inline]
    pub fn is_walkable(&self, p: Point) -> bool {
        self.grid.is_walkable(p)
    }

    /// The start marker's coordinate, if placed.
    #[inline]
    pub fn start_point(&self) -> Option<Point> {
        self.start
    }

    /// The end marker's coordinate, if placed.
    #[inline]
    pub fn end_point(&self) -> Option<Point> {
        self.end
    }

    /// Whether the start marker is placed.
    #[inline]
    pub fn has_start(&self) -> bool {
        self.start.is_some()
    }

    /// Whether the end marker is placed.
    #[inline]
    pub fn has_end(&self) -> bool {
        self.end.is_some()
    }

    /// Read access to the underlying cells.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Clone the cell container for a background computation. Later
    /// store mutations leave the snapshot untouched.
    #[inline]
    pub fn snapshot(&self) -> Grid {
        self.grid.clone()
    }
}
