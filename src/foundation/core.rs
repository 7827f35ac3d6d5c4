pub use kurbo::{Point, Vec2};

/// Host-assigned identifier for a render surface.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SurfaceId(pub u32);

/// Supported pixel formats for render surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA with color channels premultiplied by alpha.
    Rgba8Premul,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8Premul => 4,
        }
    }
}

/// Surface declaration: dimensions + pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SurfaceDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: PixelFormat,
}

impl SurfaceDesc {
    /// Premultiplied RGBA8 surface of the given size.
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Rgba8Premul,
        }
    }

    /// Size of the pixel storage in bytes (saturating).
    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(self.format.bytes_per_pixel())
    }
}

/// Opaque handle to a 2D pixel buffer owned by a [`crate::RenderHost`].
///
/// The pipeline never owns pixel memory. A `Surface` is either supplied by the caller (filter
/// input/output) or on loan from a [`crate::SurfacePool`] for the duration of one `apply()` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Surface {
    id: SurfaceId,
    desc: SurfaceDesc,
}

impl Surface {
    /// Wrap a host-side surface. Only hosts should need this.
    pub fn new(id: SurfaceId, desc: SurfaceDesc) -> Self {
        Self { id, desc }
    }

    /// Host identifier.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Full surface declaration.
    pub fn desc(&self) -> SurfaceDesc {
        self.desc
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.desc.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// Return `true` when `other` has the same dimensions and format.
    pub fn same_shape(&self, other: &Surface) -> bool {
        self.desc == other.desc
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
