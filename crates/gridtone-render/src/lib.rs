//! # gridtone-render
//!
//! Render surface for the gridtone grading engine.
//!
//! This crate turns a decoded image plus an [`ImageProperties`] snapshot
//! into frames and PNG captures:
//!
//! - [`RenderSurface`] - state machine, dirty tracking and capture
//! - [`geometry`] - [`FitMode`] and quad placement
//! - [`backend`] - CPU (rayon) and optional `wgpu` frame evaluation
//! - [`loader`] - background `.cube` loading with last-request-wins
//! - [`texture`] / [`capture`] - PNG/JPEG decode, PNG encode
//! - [`config`] - YAML configuration with environment overrides
//!
//! # Example
//!
//! ```no_run
//! use gridtone_core::ImageProperties;
//! use gridtone_render::{RenderConfig, RenderSurface};
//!
//! # fn main() -> gridtone_render::RenderResult<()> {
//! let mut surface = RenderSurface::from_config(RenderConfig::default())?;
//! surface.load_texture(&std::fs::read("photo.jpg")?)?;
//!
//! let mut props = ImageProperties::default();
//! props.contrast = 115.0;
//! props.lut = Some("kodak".into());
//! surface.submit(props);
//!
//! let png = surface.capture_frame()?;
//! std::fs::write("graded.png", png)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `wgpu`: compute-shader backend (`BackendKind::Wgpu`)
//!
//! [`ImageProperties`]: gridtone_core::ImageProperties

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod backend;
pub mod capture;
pub mod config;
pub mod geometry;
pub mod loader;
#[cfg(feature = "wgpu")]
pub mod shaders;
pub mod surface;
pub mod texture;

pub use backend::{CpuBackend, FrameJob, RenderBackend, create_backend};
pub use capture::encode_png;
pub use config::{BackendKind, RenderConfig, SurfaceDims};
pub use error::{RenderError, RenderResult};
pub use geometry::{FitMode, Quad};
pub use loader::LutLoader;
pub use surface::{RenderSurface, SurfaceState};
