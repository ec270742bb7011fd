//! Meshing and raster error types.

/// A raster buffer that cannot be sampled as described.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    /// Zero width or height.
    #[error("raster has no pixels ({width}x{height})")]
    Empty {
        /// Reported width.
        width: u32,
        /// Reported height.
        height: u32,
    },

    /// Row stride shorter than one row of pixels.
    #[error("stride {stride} is smaller than a row of {row_bytes} bytes")]
    StrideTooSmall {
        /// Reported stride in bytes.
        stride: usize,
        /// Bytes needed for one row.
        row_bytes: usize,
    },

    /// Pixel buffer shorter than `stride * height`.
    #[error("buffer holds {actual} bytes, expected at least {expected}")]
    BufferTooShort {
        /// Bytes needed.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },

    /// Dimensions differ from what the caller requires.
    #[error("raster is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    UnexpectedSize {
        /// Required width.
        expected_width: u32,
        /// Required height.
        expected_height: u32,
        /// Actual width.
        actual_width: u32,
        /// Actual height.
        actual_height: u32,
    },
}

/// Mesh parameters that cannot produce a valid mesh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// Planet radius minus surface offset is not positive and finite.
    #[error("base radius must be positive and finite, got {0} km")]
    InvalidRadius(f64),

    /// Segment bounds are zero, inverted, or above [`MAX_SEGMENTS`](crate::MAX_SEGMENTS).
    #[error("invalid segment bounds {min}..={max}")]
    InvalidSegments {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },

    /// Skirt depth is negative or not finite.
    #[error("skirt depth must be non-negative and finite, got {0} km")]
    InvalidSkirtDepth(f64),

    /// Exaggeration is negative or not finite.
    #[error("exaggeration must be non-negative and finite, got {0}")]
    InvalidExaggeration(f64),

    /// Ocean floor is positive or not finite.
    #[error("ocean floor must be non-positive and finite, got {0} m")]
    InvalidOceanFloor(f64),
}
