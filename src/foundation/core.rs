use serde::{Deserialize, Serialize};

/// Device pixel ratios above this are clamped when sizing the drawing surface.
pub const MAX_DEVICE_PIXEL_RATIO: f32 = 2.0;

/// Pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Construct a size; zero dimensions are bumped to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Size the surface for a viewport given in CSS pixels at `device_pixel_ratio`.
    ///
    /// The ratio is capped at [`MAX_DEVICE_PIXEL_RATIO`]; non-finite or non-positive ratios fall
    /// back to `1.0`.
    pub fn for_viewport(css_width: f32, css_height: f32, device_pixel_ratio: f32) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO)
        } else {
            1.0
        };
        let scale = |v: f32| -> u32 {
            if v.is_finite() && v > 0.0 {
                (v * dpr).floor() as u32
            } else {
                1
            }
        };
        Self::new(scale(css_width), scale(css_height))
    }

    /// Number of pixels.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

/// Straight-alpha RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Linear blend toward `other` by `t` in `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
