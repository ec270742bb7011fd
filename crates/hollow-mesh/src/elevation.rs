//! Terrain-RGB elevation decoding and the displacement policy applied to it.

use crate::Raster;

/// Elevation encoded by the all-zero pixel.
pub const ELEVATION_BASE_M: f64 = -10_000.0;

/// Elevation step of one unit of the packed 24-bit value.
pub const ELEVATION_STEP_M: f64 = 0.1;

/// Decode a Terrain-RGB pixel to metres:
/// `-10000 + (R·65536 + G·256 + B) × 0.1`.
#[must_use]
pub fn decode_terrain_rgb(r: u8, g: u8, b: u8) -> f64 {
    let packed = ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
    ELEVATION_BASE_M + packed as f64 * ELEVATION_STEP_M
}

/// Bilinearly interpolated elevation in metres at normalised `(u, v)`.
///
/// The four surrounding pixels are decoded first and then blended, so the
/// result never mixes the packed channels of neighbouring pixels.
#[must_use]
pub fn sample_elevation_m(raster: &Raster, u: f64, v: f64) -> f64 {
    let (fx, fy) = raster.texel_position(u, v);
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as u32, y0 as u32);

    let decode = |x: u32, y: u32| {
        let p = raster.pixel(x, y);
        decode_terrain_rgb(p[0], p[1], p[2])
    };

    let top = lerp(decode(x0, y0), decode(x0 + 1, y0), tx);
    let bottom = lerp(decode(x0, y0 + 1), decode(x0 + 1, y0 + 1), tx);
    lerp(top, bottom, ty)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t == 0.0 { a } else { a + (b - a) * t }
}

/// How decoded elevations become radial displacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevationParams {
    /// Uniform multiplier applied after clamping and conversion to kilometres.
    pub exaggeration: f64,
    /// Lowest elevation kept for negative (ocean) samples, in metres.
    pub ocean_floor_m: f64,
}

impl Default for ElevationParams {
    fn default() -> Self {
        Self {
            exaggeration: 3.0,
            ocean_floor_m: -50.0,
        }
    }
}

impl ElevationParams {
    /// Clamp ocean depths to `ocean_floor_m`; land passes through unchanged.
    #[must_use]
    pub fn clamp_m(&self, elevation_m: f64) -> f64 {
        if elevation_m < 0.0 {
            elevation_m.max(self.ocean_floor_m)
        } else {
            elevation_m
        }
    }

    /// Clamped, exaggerated elevation in kilometres.
    #[must_use]
    pub fn displacement_km(&self, elevation_m: f64) -> f64 {
        self.clamp_m(elevation_m) / 1000.0 * self.exaggeration
    }
}
