//! Quadtree tile address in the slippy-map scheme.

/// Identifies one tile of the global quadtree.
///
/// - `level`: resolution level. Level 0 is a single tile covering the whole
///   map; each level doubles the tile count along both axes.
/// - `x`, `y`: column and row within the `2^level × 2^level` grid. `x` grows
///   eastward from the antimeridian, `y` grows southward from the north edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileAddress {
    /// Resolution level (0 = coarsest, [`Self::MAX_LEVEL`] = finest).
    pub level: u8,
    /// Column within the grid at this level.
    pub x: u32,
    /// Row within the grid at this level.
    pub y: u32,
}

impl TileAddress {
    /// Finest supported level. `2^30` tiles per axis still fits in `u32`.
    pub const MAX_LEVEL: u8 = 30;

    /// Number of tiles along one axis at the given level.
    ///
    /// # Panics
    ///
    /// Panics if `level` exceeds [`Self::MAX_LEVEL`].
    #[must_use]
    pub fn tiles_per_axis(level: u8) -> u32 {
        assert!(
            level <= Self::MAX_LEVEL,
            "level {level} exceeds MAX_LEVEL {}",
            Self::MAX_LEVEL
        );
        1 << level
    }

    /// Construct a `TileAddress`, validating that `x` and `y` lie inside the
    /// grid for `level`.
    ///
    /// # Panics
    ///
    /// Panics if `level` exceeds [`Self::MAX_LEVEL`] or if `x`/`y` are out of range.
    #[must_use]
    pub fn new(level: u8, x: u32, y: u32) -> Self {
        let size = Self::tiles_per_axis(level);
        assert!(x < size, "x={x} out of range for level {level} (max {size})");
        assert!(y < size, "y={y} out of range for level {level} (max {size})");
        Self { level, x, y }
    }

    /// The enclosing tile one level coarser, or `None` at level 0.
    #[must_use]
    pub fn parent(&self) -> Option<TileAddress> {
        if self.level == 0 {
            return None;
        }
        Some(TileAddress {
            level: self.level - 1,
            x: self.x / 2,
            y: self.y / 2,
        })
    }

    /// The four tiles one level finer, ordered
    /// `[(2x, 2y), (2x+1, 2y), (2x, 2y+1), (2x+1, 2y+1)]`.
    ///
    /// Returns `None` at [`Self::MAX_LEVEL`].
    #[must_use]
    pub fn children(&self) -> Option<[TileAddress; 4]> {
        if self.level >= Self::MAX_LEVEL {
            return None;
        }
        let level = self.level + 1;
        let cx = self.x * 2;
        let cy = self.y * 2;
        Some([
            TileAddress::new(level, cx, cy),
            TileAddress::new(level, cx + 1, cy),
            TileAddress::new(level, cx, cy + 1),
            TileAddress::new(level, cx + 1, cy + 1),
        ])
    }

    /// Returns `true` if `other` lies strictly inside this tile at a finer level.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &TileAddress) -> bool {
        if other.level <= self.level {
            return false;
        }
        let shift = other.level - self.level;
        other.x >> shift == self.x && other.y >> shift == self.y
    }
}

impl std::fmt::Display for TileAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.level, self.x, self.y)
    }
}
