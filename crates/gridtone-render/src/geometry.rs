//! Fit policy and quad placement.
//!
//! The source image is drawn as one quad centered on the surface, sized by
//! the image aspect ratio under a [`FitMode`]:
//!
//! - `Contain`: the whole image is visible, letterboxed on the short axis
//! - `Cover`: the surface is filled, overflow is cropped
//!
//! Geometry never changes pixel colors, only which source position a
//! surface pixel samples.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How the image quad fits the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Whole image visible, letterboxed.
    #[default]
    Contain,
    /// Surface filled, overflow cropped.
    Cover,
}

impl std::str::FromStr for FitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "contain" => Ok(Self::Contain),
            "cover" => Ok(Self::Cover),
            other => Err(format!("unknown fit mode '{other}' (expected contain or cover)")),
        }
    }
}

/// Quad placement in surface pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Top-left corner (may be negative under `Cover`)
    pub origin: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Quad {
    /// Places an image of `image` size on a surface of `surface` size.
    pub fn fit(image: (u32, u32), surface: (u32, u32), mode: FitMode) -> Self {
        let sw = surface.0 as f32;
        let sh = surface.1 as f32;
        let aspect = image.0 as f32 / (image.1 as f32).max(1.0);
        let surface_aspect = sw / sh.max(1.0);

        let wider = aspect > surface_aspect;
        let size = match (mode, wider) {
            (FitMode::Contain, true) | (FitMode::Cover, false) => Vec2::new(sw, sw / aspect),
            (FitMode::Contain, false) | (FitMode::Cover, true) => Vec2::new(sh * aspect, sh),
        };
        let origin = (Vec2::new(sw, sh) - size) * 0.5;
        Self { origin, size }
    }

    /// Texture coordinate under surface point `p`, `None` outside the quad.
    #[inline]
    pub fn uv_at(&self, p: Vec2) -> Option<Vec2> {
        let uv = (p - self.origin) / self.size;
        (uv.x >= 0.0 && uv.x < 1.0 && uv.y >= 0.0 && uv.y < 1.0).then_some(uv)
    }
}
