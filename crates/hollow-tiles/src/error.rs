//! Tiling error types.

/// Errors raised when validating viewer coordinates or selection parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TileError {
    /// Latitude outside the range the Mercator tile scheme can represent.
    #[error("latitude {0} is outside ±85°")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180].
    #[error("longitude {0} is outside ±180°")]
    InvalidLongitude(f64),

    /// `min_level` greater than `max_level`, or `max_level` beyond the finest level.
    #[error("invalid level range {min}..={max}")]
    InvalidLevelRange {
        /// Requested coarsest level.
        min: u8,
        /// Requested finest level.
        max: u8,
    },

    /// Subdivision factor that is not positive and finite.
    #[error("subdivision factor must be positive and finite, got {0}")]
    InvalidSubdivisionFactor(f64),

    /// Area-of-interest radius that is not positive and finite.
    #[error("max radius must be positive and finite, got {0} km")]
    InvalidRadius(f64),
}
