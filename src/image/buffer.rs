//! Image buffer type and fallible allocation.

use std::fmt;

/// Largest buffer the testbed will allocate (1 GiB).
const MAX_IMAGE_BYTES: usize = 1 << 30;

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by this size.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Per-channel sample type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    U8,
    S8,
    U16,
    S16,
    S32,
    F32,
    F64,
}

impl Depth {
    /// Bytes used by one sample of this depth.
    pub fn bytes(&self) -> usize {
        match self {
            Depth::U8 | Depth::S8 => 1,
            Depth::U16 | Depth::S16 => 2,
            Depth::S32 | Depth::F32 => 4,
            Depth::F64 => 8,
        }
    }
}

/// Row order of the pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// First row is the top of the image
    #[default]
    TopLeft,
    /// First row is the bottom of the image (bottom-up DIBs and some capture drivers)
    BottomLeft,
}

/// Errors that can occur when allocating an image.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image geometry {size} with {channels} channel(s)")]
    InvalidGeometry { size: ImageSize, channels: u8 },

    #[error("image of {size} with {channels} channel(s) exceeds the size limit")]
    TooLarge { size: ImageSize, channels: u8 },

    #[error("failed to allocate {bytes} bytes for image")]
    AllocationFailed { bytes: usize },
}

/// An interleaved image with row-major pixel data.
#[derive(Clone, PartialEq)]
pub struct ImageBuffer {
    size: ImageSize,
    depth: Depth,
    channels: u8,
    origin: Origin,
    data: Vec<u8>,
}

impl fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("size", &self.size)
            .field("depth", &self.depth)
            .field("channels", &self.channels)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl ImageBuffer {
    /// Allocate a zero-filled image.
    ///
    /// # Errors
    /// * `ImageError::InvalidGeometry` - zero width/height, or channels outside 1..=4
    /// * `ImageError::TooLarge` - byte size overflows or exceeds the 1 GiB limit
    /// * `ImageError::AllocationFailed` - the allocator refused the request
    pub fn new(size: ImageSize, depth: Depth, channels: u8) -> Result<Self, ImageError> {
        let bytes = Self::byte_len(size, depth, channels)?;

        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| ImageError::AllocationFailed { bytes })?;
        data.resize(bytes, 0);

        Ok(Self {
            size,
            depth,
            channels,
            origin: Origin::TopLeft,
            data,
        })
    }

    /// Number of bytes an image with this layout needs, without allocating.
    ///
    /// Fails the same way as [`ImageBuffer::new`] for invalid or oversized layouts.
    pub fn byte_len(size: ImageSize, depth: Depth, channels: u8) -> Result<usize, ImageError> {
        if size.width == 0 || size.height == 0 || !(1..=4).contains(&channels) {
            return Err(ImageError::InvalidGeometry { size, channels });
        }

        (size.width as usize)
            .checked_mul(size.height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .and_then(|n| n.checked_mul(depth.bytes()))
            .filter(|&n| n <= MAX_IMAGE_BYTES)
            .ok_or(ImageError::TooLarge { size, channels })
    }

    /// Allocate an image with the geometry and origin of `proto`.
    ///
    /// `depth` and `channels` default to the prototype's when `None`.
    pub fn like(
        proto: &ImageBuffer,
        depth: Option<Depth>,
        channels: Option<u8>,
    ) -> Result<Self, ImageError> {
        let mut image = Self::new(
            proto.size,
            depth.unwrap_or(proto.depth),
            channels.unwrap_or(proto.channels),
        )?;
        image.origin = proto.origin;
        Ok(image)
    }

    /// Wrap 8-bit RGB pixel data.
    ///
    /// Returns `None` if `data` does not hold exactly `width * height * 3` bytes.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let size = ImageSize::new(width, height);
        if width == 0 || height == 0 || data.len() != size.area() * 3 {
            return None;
        }
        Some(Self {
            size,
            depth: Depth::U8,
            channels: 3,
            origin: Origin::TopLeft,
            data,
        })
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Origin) {
        self.origin = origin;
    }

    /// Bytes per row (no padding between rows).
    pub fn stride(&self) -> usize {
        self.size.width as usize * self.channels as usize * self.depth.bytes()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
