//! Distance-driven quadtree selection of the leaf tiles to render around a viewer.

use std::collections::BTreeMap;

use tracing::debug;

use crate::mapper::distance_between;
use crate::{
    GeoBounds, GeoPoint, KM_PER_DEGREE, TileAddress, TileError, approximate_size_km, tile_bounds,
    to_tile_address,
};

/// Tiling parameters for one selection pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionParams {
    /// Coarsest level; seeds the traversal and bounds tile size at the periphery.
    pub min_level: u8,
    /// Finest level; tiles at this level are never subdivided.
    pub max_level: u8,
    /// A tile is subdivided while `distance < size * subdivision_factor`.
    pub subdivision_factor: f64,
    /// Radius of the area of interest around the viewer, in kilometres.
    pub max_radius_km: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            min_level: 6,
            max_level: 12,
            subdivision_factor: 2.0,
            max_radius_km: 800.0,
        }
    }
}

impl SelectionParams {
    /// Check the parameters for internal consistency.
    pub fn validate(&self) -> Result<(), TileError> {
        if self.min_level > self.max_level || self.max_level > TileAddress::MAX_LEVEL {
            return Err(TileError::InvalidLevelRange {
                min: self.min_level,
                max: self.max_level,
            });
        }
        if !(self.subdivision_factor.is_finite() && self.subdivision_factor > 0.0) {
            return Err(TileError::InvalidSubdivisionFactor(self.subdivision_factor));
        }
        if !(self.max_radius_km.is_finite() && self.max_radius_km > 0.0) {
            return Err(TileError::InvalidRadius(self.max_radius_km));
        }
        Ok(())
    }
}

/// A tile address together with its geographic bounds.
///
/// Tree edges are implicit: children are computed from the address on demand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadtreeNode {
    /// The tile this node covers.
    pub address: TileAddress,
    /// Bounds derived from `address`.
    pub bounds: GeoBounds,
}

impl QuadtreeNode {
    /// Build the node for `address`, deriving its bounds.
    #[must_use]
    pub fn new(address: TileAddress) -> Self {
        Self {
            address,
            bounds: tile_bounds(address),
        }
    }

    /// The four child nodes, or `None` at the finest supported level.
    #[must_use]
    pub fn children(&self) -> Option<[QuadtreeNode; 4]> {
        self.address.children().map(|c| c.map(QuadtreeNode::new))
    }

    /// Heuristic edge length in kilometres.
    #[must_use]
    pub fn size_km(&self) -> f64 {
        approximate_size_km(&self.bounds)
    }

    /// Great-circle distance from `point` to the bounds center.
    #[must_use]
    pub fn distance_km(&self, point: GeoPoint) -> f64 {
        distance_between(point, self.bounds.center())
    }
}

/// What the selector does with a visited node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeAction {
    /// Outside the area of interest: neither emitted nor refined.
    Discard,
    /// Replace the node by its four children.
    Subdivide,
    /// Render the node at its own resolution.
    Emit,
}

/// The flat, ordered set of leaf tiles chosen for one viewer location.
///
/// No tile in the set is an ancestor of another and no two tiles overlap.
#[derive(Clone, Debug)]
pub struct LeafTileSet {
    viewer: GeoPoint,
    nodes: Vec<QuadtreeNode>,
}

impl LeafTileSet {
    /// The viewer location the set was computed for.
    pub fn viewer(&self) -> GeoPoint {
        self.viewer
    }

    /// Number of leaf tiles.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no tile was selected.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaf nodes in selection order.
    pub fn nodes(&self) -> &[QuadtreeNode] {
        &self.nodes
    }

    /// Iterate the leaf nodes in selection order.
    pub fn iter(&self) -> std::slice::Iter<'_, QuadtreeNode> {
        self.nodes.iter()
    }

    /// Leaf addresses in selection order.
    pub fn addresses(&self) -> Vec<TileAddress> {
        self.nodes.iter().map(|n| n.address).collect()
    }

    /// Number of leaves at exactly `level`.
    pub fn count_at_level(&self, level: u8) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.address.level == level)
            .count()
    }

    /// Leaf counts keyed by level, in ascending level order.
    pub fn level_histogram(&self) -> BTreeMap<u8, usize> {
        let mut histogram = BTreeMap::new();
        for node in &self.nodes {
            *histogram.entry(node.address.level).or_insert(0) += 1;
        }
        histogram
    }

    /// The leaf whose bounds contain `point`, if any.
    pub fn find_leaf(&self, point: GeoPoint) -> Option<&QuadtreeNode> {
        self.nodes.iter().find(|n| n.bounds.contains(point))
    }

    /// Consume the set, returning the leaf nodes.
    pub fn into_nodes(self) -> Vec<QuadtreeNode> {
        self.nodes
    }
}

impl<'a> IntoIterator for &'a LeafTileSet {
    type Item = &'a QuadtreeNode;
    type IntoIter = std::slice::Iter<'a, QuadtreeNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Selects leaf tiles around a viewer by refining a quadtree seeded at
/// `min_level`.
///
/// The refinement uses an explicit work stack instead of recursion, so the
/// traversal depth never depends on the call stack.
#[derive(Clone, Debug)]
pub struct QuadtreeSelector {
    params: SelectionParams,
}

impl QuadtreeSelector {
    /// Create a selector, rejecting inconsistent parameters.
    pub fn new(params: SelectionParams) -> Result<Self, TileError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The parameters this selector was built with.
    pub fn params(&self) -> &SelectionParams {
        &self.params
    }

    /// Decide whether a node is discarded, refined, or emitted.
    ///
    /// The distance is measured to the bounds center rather than the nearest
    /// edge, so refinement can be slightly asymmetric across a tile.
    ///
    /// A node is only subdivided if at least one child survives the discard
    /// test; otherwise it is emitted whole. Every subdivided node therefore
    /// yields at least one leaf, and raising `subdivision_factor` never
    /// lowers the leaf count.
    pub fn evaluate(&self, node: &QuadtreeNode, viewer: GeoPoint) -> NodeAction {
        let distance = node.distance_km(viewer);
        let size = node.size_km();

        if distance > self.params.max_radius_km + size {
            return NodeAction::Discard;
        }
        if node.address.level < self.params.max_level
            && distance < size * self.params.subdivision_factor
            && node
                .children()
                .is_some_and(|children| children.iter().any(|c| !self.is_outside(c, viewer)))
        {
            NodeAction::Subdivide
        } else {
            NodeAction::Emit
        }
    }

    fn is_outside(&self, node: &QuadtreeNode, viewer: GeoPoint) -> bool {
        node.distance_km(viewer) > self.params.max_radius_km + node.size_km()
    }

    /// All `min_level` tiles whose centers lie within `max_radius_km` plus
    /// their own size of the viewer, ordered row by row.
    pub fn seed_tiles(&self, viewer: GeoPoint) -> Vec<QuadtreeNode> {
        let level = self.params.min_level;
        let n = TileAddress::tiles_per_axis(level) as i64;
        let radius = self.params.max_radius_km;

        // Candidate window: the radius converted to degrees, padded by two
        // tiles on every side to absorb the `+ size` slack of the filter.
        let lat_pad = radius / KM_PER_DEGREE;
        let north = (viewer.lat + lat_pad).clamp(-89.0, 89.0);
        let south = (viewer.lat - lat_pad).clamp(-89.0, 89.0);
        let widest_lat = north.abs().max(south.abs()).to_radians();
        let lon_pad = radius / (KM_PER_DEGREE * widest_lat.cos().max(1e-6));

        let y_min = (to_tile_address(north, viewer.lon, level).y as i64 - 2).max(0);
        let y_max = (to_tile_address(south, viewer.lon, level).y as i64 + 2).min(n - 1);

        let columns: Vec<u32> = if 2.0 * lon_pad >= 360.0 {
            (0..n as u32).collect()
        } else {
            let tile_lon = 360.0 / n as f64;
            let x_start = ((viewer.lon - lon_pad + 180.0) / tile_lon).floor() as i64 - 2;
            let x_end = ((viewer.lon + lon_pad + 180.0) / tile_lon).floor() as i64 + 2;
            if x_end - x_start + 1 >= n {
                (0..n as u32).collect()
            } else {
                (x_start..=x_end).map(|k| k.rem_euclid(n) as u32).collect()
            }
        };

        let mut seeds = Vec::new();
        for y in y_min..=y_max {
            for &x in &columns {
                let node = QuadtreeNode::new(TileAddress::new(level, x, y as u32));
                if node.distance_km(viewer) <= radius + node.size_km() {
                    seeds.push(node);
                }
            }
        }
        seeds
    }

    /// Compute the leaf tile set for a viewer location.
    ///
    /// The viewer must lie inside ±85° latitude; use [`GeoPoint::new`] to
    /// validate untrusted input.
    pub fn select(&self, viewer: GeoPoint) -> LeafTileSet {
        let seeds = self.seed_tiles(viewer);
        let seed_count = seeds.len();

        let mut stack: Vec<QuadtreeNode> = seeds;
        stack.reverse();

        let mut leaves = Vec::new();
        let mut discarded = 0usize;
        let mut max_stack = stack.len();

        while let Some(node) = stack.pop() {
            match self.evaluate(&node, viewer) {
                NodeAction::Discard => discarded += 1,
                NodeAction::Emit => leaves.push(node),
                NodeAction::Subdivide => match node.children() {
                    Some(children) => {
                        // Reversed so children pop in (2x,2y), (2x+1,2y), ... order.
                        stack.extend(children.into_iter().rev());
                        max_stack = max_stack.max(stack.len());
                    }
                    None => leaves.push(node),
                },
            }
        }

        debug!(
            lat = viewer.lat,
            lon = viewer.lon,
            seeds = seed_count,
            leaves = leaves.len(),
            discarded,
            max_stack,
            "quadtree selection complete"
        );

        LeafTileSet {
            viewer,
            nodes: leaves,
        }
    }
}
