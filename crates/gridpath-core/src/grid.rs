//! The pure cell container.

use crate::cell::CellKind;
use crate::geom::Point;

/// Smallest accepted grid dimension.
pub const MIN_GRID_DIM: i32 = 1;
/// Largest accepted grid dimension.
pub const MAX_GRID_DIM: i32 = 100;

/// A bounded 2D grid of [`CellKind`] values in row-major order.
///
/// `Grid` is plain data: it knows nothing about markers or events and is
/// cheap to clone, which is how read snapshots reach background searches.
/// Dimensions are clamped into `[MIN_GRID_DIM, MAX_GRID_DIM]` at
/// construction, so a `Grid` always holds at least one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Create a grid of the given dimensions, clamped into range and
    /// filled with [`CellKind::Empty`].
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.clamp(MIN_GRID_DIM, MAX_GRID_DIM);
        let height = height.clamp(MIN_GRID_DIM, MAX_GRID_DIM);
        Self {
            width,
            height,
            cells: vec![CellKind::Empty; (width * height) as usize],
        }
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total cell count (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: dimensions are clamped to at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the point lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// The cell at a point. Out-of-range reads as [`CellKind::Wall`]:
    /// space outside the grid is treated as blocked.
    #[inline]
    pub fn at(&self, p: Point) -> CellKind {
        if !self.contains(p) {
            return CellKind::Wall;
        }
        self.cells[(p.y * self.width + p.x) as usize]
    }

    /// Set the cell at a point. Does nothing if out of range.
    #[inline]
    pub fn set(&mut self, p: Point, kind: CellKind) {
        if !self.contains(p) {
            return;
        }
        self.cells[(p.y * self.width + p.x) as usize] = kind;
    }

    /// Whether a path may pass through the cell at `p`.
    #[inline]
    pub fn is_walkable(&self, p: Point) -> bool {
        self.at(p).is_walkable()
    }

    /// Fill every cell with the given kind.
    pub fn fill(&mut self, kind: CellKind) {
        self.cells.fill(kind);
    }

    /// Iterate over all grid points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Point::new(x, y)))
    }

    /// Count the cells of a given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }
}
