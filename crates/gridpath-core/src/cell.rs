//! Cell and marker vocabulary.

/// What a grid cell holds.
///
/// `Start` and `End` are the stamped forms of the two markers; the
/// authoritative marker coordinates live on
/// [`GridStore`](crate::GridStore).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    #[default]
    Empty,
    Wall,
    Start,
    End,
}

impl CellKind {
    /// Whether a path may pass through a cell of this kind.
    #[inline]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, CellKind::Wall)
    }
}

/// Which of the two markers an event or operation refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkerKind {
    Start,
    End,
}

impl MarkerKind {
    /// The cell stamp for this marker.
    #[inline]
    pub const fn cell(self) -> CellKind {
        match self {
            MarkerKind::Start => CellKind::Start,
            MarkerKind::End => CellKind::End,
        }
    }
}
