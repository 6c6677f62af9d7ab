//! UV-sphere geometry descriptors for entry orbs.

use thiserror::Error;

/// Smallest segment counts that still close a sphere.
const MIN_WIDTH_SEGMENTS: u32 = 3;
const MIN_HEIGHT_SEGMENTS: u32 = 2;

/// Errors returned when a sphere cannot be built from the given parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// Radius is zero, negative, or not finite.
    #[error("invalid sphere radius: {0}")]
    InvalidRadius(f32),

    /// Too few segments to form a closed sphere.
    #[error("sphere needs at least 3x2 segments, got {width}x{height}")]
    TooFewSegments {
        /// Requested longitudinal segments.
        width: u32,
        /// Requested latitudinal segments.
        height: u32,
    },
}

/// A UV sphere: radius plus longitudinal/latitudinal tessellation.
///
/// The host renderer builds its vertex buffers from this descriptor. Items
/// share descriptors through `Arc`, so two orbs at the same detail and
/// rounded radius point at the same geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereGeometry {
    radius: f32,
    width_segments: u32,
    height_segments: u32,
}

impl SphereGeometry {
    /// Create a sphere descriptor after validating its parameters.
    pub fn new(
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    ) -> Result<Self, GeometryError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        if width_segments < MIN_WIDTH_SEGMENTS || height_segments < MIN_HEIGHT_SEGMENTS {
            return Err(GeometryError::TooFewSegments {
                width: width_segments,
                height: height_segments,
            });
        }
        Ok(Self {
            radius,
            width_segments,
            height_segments,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn width_segments(&self) -> u32 {
        self.width_segments
    }

    pub fn height_segments(&self) -> u32 {
        self.height_segments
    }
}
