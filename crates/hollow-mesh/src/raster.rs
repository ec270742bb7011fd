//! Read-only 2D pixel buffers sampled by normalised `(u, v)` coordinates.

use crate::RasterError;

/// Pixel layout of a [`Raster`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Three 8-bit channels.
    Rgb8,
    /// Four 8-bit channels.
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// An immutable pixel buffer with explicit `(width, height, stride)`.
///
/// Row 0 is the top (northern) row. `(u, v) = (0, 0)` addresses the top-left
/// pixel and `(1, 1)` the bottom-right one.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap a pixel buffer, checking that `data` covers `stride * height` bytes.
    pub fn new(
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::Empty { width, height });
        }
        let row_bytes = width as usize * format.channels();
        if stride < row_bytes {
            return Err(RasterError::StrideTooSmall { stride, row_bytes });
        }
        // The last row only needs `row_bytes`, not a full stride.
        let expected = stride * (height as usize - 1) + row_bytes;
        if data.len() < expected {
            return Err(RasterError::BufferTooShort {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    /// Wrap a tightly packed buffer (stride = width × channels).
    pub fn from_packed(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        let stride = width as usize * format.channels();
        Self::new(width, height, stride, format, data)
    }

    /// A raster where every pixel equals `pixel`.
    ///
    /// # Panics
    ///
    /// Panics if `pixel.len()` differs from the format's channel count or a
    /// dimension is zero.
    pub fn filled(width: u32, height: u32, format: PixelFormat, pixel: &[u8]) -> Self {
        assert_eq!(
            pixel.len(),
            format.channels(),
            "pixel must have {} channels",
            format.channels()
        );
        let data = pixel.repeat(width as usize * height as usize);
        Self::from_packed(width, height, format, data).expect("filled raster is well formed")
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The raw buffer, including any row padding.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Fail with [`RasterError::UnexpectedSize`] unless the raster is exactly
    /// `width × height`.
    pub fn expect_size(&self, width: u32, height: u32) -> Result<(), RasterError> {
        if self.width == width && self.height == height {
            Ok(())
        } else {
            Err(RasterError::UnexpectedSize {
                expected_width: width,
                expected_height: height,
                actual_width: self.width,
                actual_height: self.height,
            })
        }
    }

    /// Channels of the pixel at column `x`, row `y`. Coordinates are clamped.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let channels = self.format.channels();
        let start = y * self.stride + x * channels;
        &self.data[start..start + channels]
    }

    /// Continuous pixel coordinates for normalised `(u, v)`, with pixel
    /// centers at integers and the edges mapped onto the outermost pixels.
    pub fn texel_position(&self, u: f64, v: f64) -> (f64, f64) {
        (
            u.clamp(0.0, 1.0) * (self.width - 1) as f64,
            v.clamp(0.0, 1.0) * (self.height - 1) as f64,
        )
    }

    /// Nearest-pixel sample at normalised `(u, v)`.
    pub fn sample(&self, u: f64, v: f64) -> &[u8] {
        let (fx, fy) = self.texel_position(u, v);
        self.pixel(fx.round() as u32, fy.round() as u32)
    }
}
