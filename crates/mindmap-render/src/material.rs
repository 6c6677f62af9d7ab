//! Orb materials: the lit material an entry starts with and the cheap unlit
//! variant substituted at distance.

use thiserror::Error;

// ---------------------------------------------------------------------------
// MaterialError
// ---------------------------------------------------------------------------

/// Errors returned when deriving a material.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MaterialError {
    /// A color channel is NaN or infinite.
    #[error("material color is not finite: {0:?}")]
    NonFiniteColor([f32; 3]),

    /// Opacity is NaN or infinite.
    #[error("material opacity is not finite: {0}")]
    NonFiniteOpacity(f32),

    /// The opacity factor for a simplified material must lie in `(0, 1]`.
    #[error("opacity factor out of range: {0}")]
    InvalidOpacityFactor(f32),
}

// ---------------------------------------------------------------------------
// OrbMaterial
// ---------------------------------------------------------------------------

/// Shading model requested from the host renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    /// Physically based, lit, with emission.
    Standard,
    /// Unlit flat color. Much cheaper per fragment.
    Basic,
}

/// Surface appearance of an entry orb.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbMaterial {
    /// Shading model.
    pub shading: Shading,
    /// Base color in linear RGB, each channel in `[0.0, 1.0]`.
    pub color: [f32; 3],
    /// Opacity: 1.0 = fully opaque.
    pub opacity: f32,
    /// Emissive glow multiplier applied to `color`. Ignored by [`Shading::Basic`].
    pub emissive_intensity: f32,
}

impl Default for OrbMaterial {
    fn default() -> Self {
        Self {
            shading: Shading::Standard,
            color: [0.8, 0.8, 0.8],
            opacity: 0.9,
            emissive_intensity: 0.0,
        }
    }
}

impl OrbMaterial {
    /// Create a lit orb material, clamping color and opacity into range.
    pub fn standard(color: [f32; 3], opacity: f32, emissive_intensity: f32) -> Self {
        Self {
            shading: Shading::Standard,
            color: color.map(|c| c.clamp(0.0, 1.0)),
            opacity: opacity.clamp(0.0, 1.0),
            emissive_intensity: emissive_intensity.max(0.0),
        }
    }

    /// Derive the cheap unlit stand-in: same color, opacity scaled by `opacity_factor`.
    ///
    /// # Errors
    ///
    /// Fails if this material carries non-finite values or the factor is outside `(0, 1]`.
    pub fn simplified(&self, opacity_factor: f32) -> Result<Self, MaterialError> {
        if !(opacity_factor > 0.0 && opacity_factor <= 1.0) {
            return Err(MaterialError::InvalidOpacityFactor(opacity_factor));
        }
        if self.color.iter().any(|c| !c.is_finite()) {
            return Err(MaterialError::NonFiniteColor(self.color));
        }
        if !self.opacity.is_finite() {
            return Err(MaterialError::NonFiniteOpacity(self.opacity));
        }
        Ok(Self {
            shading: Shading::Basic,
            color: self.color,
            opacity: (self.opacity * opacity_factor).clamp(0.0, 1.0),
            emissive_intensity: 0.0,
        })
    }
}
