//! Skirt geometry along tile boundaries.
//!
//! Neighbouring tiles at different levels sample elevation on different
//! grids, so their shared edges rarely coincide and hairline cracks open
//! between them. Each skirt is a strip hanging from one tile edge radially
//! outward (away from the sphere center, behind the interior surface), which
//! covers those cracks from any ordinary interior viewpoint.

use glam::Vec3;

use crate::TileMesh;

/// One of the four boundary edges of a tile's grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileEdge {
    /// Row 0.
    North,
    /// Last column.
    East,
    /// Last row.
    South,
    /// Column 0.
    West,
}

impl TileEdge {
    /// All edges in perimeter order.
    pub const ALL: [TileEdge; 4] = [
        TileEdge::North,
        TileEdge::East,
        TileEdge::South,
        TileEdge::West,
    ];

    /// Grid vertex indices along this edge, walking the perimeter clockwise
    /// as seen on a north-up map.
    fn vertex_indices(self, mesh: &TileMesh) -> Vec<u32> {
        let n = mesh.segments;
        match self {
            TileEdge::North => (0..=n).map(|col| mesh.grid_index(0, col)).collect(),
            TileEdge::East => (0..=n).map(|row| mesh.grid_index(row, n)).collect(),
            TileEdge::South => (0..=n).rev().map(|col| mesh.grid_index(n, col)).collect(),
            TileEdge::West => (0..=n).rev().map(|row| mesh.grid_index(row, 0)).collect(),
        }
    }
}

/// Append a skirt strip along `edge`, pushed `depth_km` radially outward.
///
/// Each edge vertex is duplicated with the same texture coordinate and the
/// pair of rows is stitched into quads facing away from the tile.
///
/// Returns the number of triangles added (0 if `depth_km` is not positive).
pub fn generate_skirt(mesh: &mut TileMesh, edge: TileEdge, depth_km: f32) -> usize {
    if depth_km <= 0.0 || mesh.segments == 0 {
        return 0;
    }

    let edge_vertices = edge.vertex_indices(mesh);
    let base = mesh.positions.len() as u32;

    for &i in &edge_vertices {
        let p = Vec3::from_array(mesh.positions[i as usize]);
        let dropped = p + p.normalize_or_zero() * depth_km;
        mesh.positions.push(dropped.to_array());
        mesh.uvs.push(mesh.uvs[i as usize]);
    }

    let mut triangles_added = 0;
    for (k, pair) in edge_vertices.windows(2).enumerate() {
        let (p0, p1) = (pair[0], pair[1]);
        let q0 = base + k as u32;
        let q1 = q0 + 1;
        mesh.indices.extend_from_slice(&[p0, p1, q0]);
        mesh.indices.extend_from_slice(&[p1, q1, q0]);
        triangles_added += 2;
    }
    triangles_added
}

/// Append skirts along all four edges. Returns the total triangles added.
pub fn generate_skirts(mesh: &mut TileMesh, depth_km: f32) -> usize {
    TileEdge::ALL
        .into_iter()
        .map(|edge| generate_skirt(mesh, edge, depth_km))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spherical::spherical_to_cartesian;

    /// Flat grid on a sphere of radius 100 spanning ±1° around (0, 0).
    fn flat_grid(segments: u32) -> TileMesh {
        let n = segments;
        let mut positions = Vec::new();
        let mut uvs = Vec::new();
        for row in 0..=n {
            for col in 0..=n {
                let u = col as f64 / n as f64;
                let t = row as f64 / n as f64;
                let lat = 1.0 - 2.0 * t;
                let lon = -1.0 + 2.0 * u;
                positions.push(spherical_to_cartesian(lat, lon, 100.0).as_vec3().to_array());
                uvs.push([u as f32, t as f32]);
            }
        }
        let mut indices = Vec::new();
        for row in 0..n {
            for col in 0..n {
                let a = row * (n + 1) + col;
                let s = a + n + 1;
                indices.extend_from_slice(&[a, s, a + 1, a + 1, s, s + 1]);
            }
        }
        TileMesh {
            grid_vertex_count: positions.len(),
            grid_index_count: indices.len(),
            positions,
            uvs,
            indices,
            segments,
        }
    }

    #[test]
    fn test_skirt_counts() {
        let mut mesh = flat_grid(4);
        let before = mesh.vertex_count();
        let added = generate_skirt(&mut mesh, TileEdge::North, 1.0);
        assert_eq!(added, 8);
        assert_eq!(mesh.vertex_count(), before + 5);

        let mut mesh = flat_grid(4);
        let total = generate_skirts(&mut mesh, 1.0);
        assert_eq!(total, 4 * 8);
        assert_eq!(mesh.skirt_triangle_count(), total);
        assert_eq!(mesh.vertex_count(), 25 + 4 * 5);
    }

    #[test]
    fn test_zero_depth_is_noop() {
        let mut mesh = flat_grid(4);
        let before = mesh.clone();
        assert_eq!(generate_skirts(&mut mesh, 0.0), 0);
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_skirt_vertices_pushed_outward_by_depth() {
        let mut mesh = flat_grid(8);
        generate_skirts(&mut mesh, 2.5);
        for (i, p) in mesh.positions[mesh.grid_vertex_count..].iter().enumerate() {
            let r = Vec3::from_array(*p).length();
            assert!((r - 102.5).abs() < 1e-3, "skirt vertex {i} at radius {r}");
        }
    }

    #[test]
    fn test_skirt_indices_valid_and_uvs_copied() {
        let mut mesh = flat_grid(4);
        generate_skirt(&mut mesh, TileEdge::West, 1.0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        assert_eq!(mesh.uvs.len(), mesh.positions.len());
        // West edge is walked south to north, so the first skirt vertex
        // duplicates the south-west corner.
        let corner = mesh.grid_index(4, 0) as usize;
        assert_eq!(mesh.uvs[mesh.grid_vertex_count], mesh.uvs[corner]);
    }

    #[test]
    fn test_skirt_faces_away_from_tile() {
        let mut mesh = flat_grid(4);
        generate_skirts(&mut mesh, 1.0);
        let center = spherical_to_cartesian(0.0, 0.0, 100.0).as_vec3();
        for t in mesh.grid_index_count / 3..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(t);
            let centroid = (a + b + c) / 3.0;
            let n = mesh.face_normal(t);
            assert!(
                n.dot(centroid - center) > 0.0,
                "skirt triangle {t} faces into the tile"
            );
        }
    }
}
