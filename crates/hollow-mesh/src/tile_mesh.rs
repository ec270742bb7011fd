//! Indexed triangle mesh for one terrain tile, ready for GPU upload.

use glam::Vec3;

/// Geometry for one leaf tile.
///
/// The first [`Self::grid_vertex_count`] vertices and
/// [`Self::grid_index_count`] indices form the displaced
/// `(segments + 1)²` grid; skirt geometry is appended after them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileMesh {
    /// Vertex positions in kilometres, sphere center at the origin.
    pub positions: Vec<[f32; 3]>,
    /// Texture coordinates into the tile's colour raster (`v = 0` is the top row).
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
    /// Grid cells along each axis.
    pub segments: u32,
    /// Vertices belonging to the primary grid.
    pub grid_vertex_count: usize,
    /// Indices belonging to the primary grid.
    pub grid_index_count: usize,
}

impl TileMesh {
    /// Number of vertices, skirts included.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles, skirts included.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles appended after the primary grid.
    pub fn skirt_triangle_count(&self) -> usize {
        (self.indices.len() - self.grid_index_count) / 3
    }

    /// Returns `true` if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Grid vertex index for `(row, col)`; row 0 is the northern edge,
    /// col 0 the western edge.
    pub fn grid_index(&self, row: u32, col: u32) -> u32 {
        row * (self.segments + 1) + col
    }

    /// The three corner positions of triangle `triangle`.
    pub fn triangle(&self, triangle: usize) -> [Vec3; 3] {
        let i = &self.indices[triangle * 3..triangle * 3 + 3];
        [
            Vec3::from_array(self.positions[i[0] as usize]),
            Vec3::from_array(self.positions[i[1] as usize]),
            Vec3::from_array(self.positions[i[2] as usize]),
        ]
    }

    /// Unnormalised face normal (`(b - a) × (c - a)`) of triangle `triangle`.
    pub fn face_normal(&self, triangle: usize) -> Vec3 {
        let [a, b, c] = self.triangle(triangle);
        (b - a).cross(c - a)
    }

    /// Area-weighted vertex normals, one per vertex.
    ///
    /// Primary grid normals point toward the sphere center, matching the
    /// inward-facing winding of the grid.
    pub fn compute_normals(&self) -> Vec<[f32; 3]> {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for triangle in 0..self.triangle_count() {
            let n = self.face_normal(triangle);
            for &i in &self.indices[triangle * 3..triangle * 3 + 3] {
                normals[i as usize] += n;
            }
        }
        normals
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect()
    }

    /// Position buffer as bytes.
    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Texture coordinate buffer as bytes.
    pub fn uvs_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Index buffer as bytes.
    pub fn indices_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
